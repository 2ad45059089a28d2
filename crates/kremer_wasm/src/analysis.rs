//! Growth-rate and regression bindings.

use anyhow::{bail, Result};
use kremer_core::{
    fit_no_intercept_slope as core_no_intercept, fit_with_intercept as core_with_intercept,
    growth_rate_series_from_points, GrowthRateSeries, InterceptRegressionResult,
};
use serde_wasm_bindgen::to_value;
use wasm_bindgen::prelude::*;

pub(crate) fn pair_observations(xs: &[f64], ys: &[f64]) -> Result<Vec<(f64, f64)>> {
    if xs.len() != ys.len() {
        bail!(
            "Observation length mismatch. Got {} regressors and {} responses.",
            xs.len(),
            ys.len()
        );
    }
    Ok(xs.iter().copied().zip(ys.iter().copied()).collect())
}

pub(crate) fn compute_growth_rates(
    times: &[f64],
    populations: &[f64],
    percent: bool,
) -> Result<GrowthRateSeries> {
    let series = growth_rate_series_from_points(times, populations)?;
    Ok(if percent { series.as_percent() } else { series })
}

pub(crate) fn compute_no_intercept_slope(xs: &[f64], ys: &[f64]) -> Result<f64> {
    let observations = pair_observations(xs, ys)?;
    Ok(core_no_intercept(&observations)?.slope)
}

pub(crate) fn compute_intercept_fit(xs: &[f64], ys: &[f64]) -> Result<InterceptRegressionResult> {
    let observations = pair_observations(xs, ys)?;
    Ok(core_with_intercept(&observations)?)
}

/// Works for simulated trajectories and historical estimates alike.
#[wasm_bindgen]
pub fn growth_rate_series(
    times: Vec<f64>,
    populations: Vec<f64>,
    percent: bool,
) -> Result<JsValue, JsValue> {
    let series = compute_growth_rates(&times, &populations, percent)
        .map_err(|e| JsValue::from_str(&format!("Growth-rate computation failed: {}", e)))?;
    to_value(&series).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

#[wasm_bindgen]
pub fn fit_no_intercept_slope(populations: Vec<f64>, rates: Vec<f64>) -> Result<f64, JsValue> {
    compute_no_intercept_slope(&populations, &rates)
        .map_err(|e| JsValue::from_str(&format!("Regression failed: {}", e)))
}

#[wasm_bindgen]
pub fn fit_with_intercept(populations: Vec<f64>, rates: Vec<f64>) -> Result<JsValue, JsValue> {
    let fit = compute_intercept_fit(&populations, &rates)
        .map_err(|e| JsValue::from_str(&format!("Regression failed: {}", e)))?;
    to_value(&fit).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}
