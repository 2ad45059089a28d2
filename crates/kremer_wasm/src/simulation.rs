//! Trajectory, isolated-region and scenario bindings.

use anyhow::{Context, Result};
use kremer_core::regions::isolation_grid;
use kremer_core::scenario::{run_scenario as core_run_scenario, ScenarioConfig, ScenarioReport};
use kremer_core::{
    simulate_region_pair as core_region_pair, simulate_trajectory as core_trajectory, Containment,
    RegionPair, SimulationParameters, TimeGrid, TransitionPolicy,
};
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Debug, Serialize)]
pub(crate) struct TrajectoryPayload {
    times: Vec<f64>,
    populations: Vec<f64>,
    exploded: bool,
    containment: Option<Containment>,
}

pub(crate) fn build_trajectory(
    params: SimulationParameters,
    initial_population: f64,
    start_year: f64,
    end_year: f64,
    transition: Option<TransitionPolicy>,
) -> Result<TrajectoryPayload> {
    let grid = TimeGrid::exclusive(start_year, end_year, params.time_step)
        .context("Failed to build the time grid.")?;
    let trajectory = core_trajectory(&params, initial_population, &grid, transition.as_ref())?;
    Ok(TrajectoryPayload {
        exploded: trajectory.exploded(),
        containment: trajectory.containment,
        times: trajectory.times,
        populations: trajectory.populations,
    })
}

pub(crate) fn build_region_pair(
    params: SimulationParameters,
    initial_population_a: f64,
    initial_population_b: f64,
) -> Result<RegionPair> {
    let grid = isolation_grid(&params).context("Failed to build the isolation grid.")?;
    Ok(core_region_pair(
        &params,
        initial_population_a,
        initial_population_b,
        &grid,
    )?)
}

pub(crate) fn build_scenario(config: Option<ScenarioConfig>) -> Result<ScenarioReport> {
    core_run_scenario(&config.unwrap_or_default())
}

fn js_error(context: &str, err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{}: {}", context, err))
}

fn serialize<T: Serialize>(payload: &T) -> Result<JsValue, JsValue> {
    to_value(payload).map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// `transition` is an optional `TransitionPolicy` object; `undefined` disables it.
#[wasm_bindgen]
pub fn simulate_trajectory(
    g: f64,
    alpha: f64,
    time_step: f64,
    initial_population: f64,
    start_year: f64,
    end_year: f64,
    transition: JsValue,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let policy: Option<TransitionPolicy> =
        from_value(transition).map_err(|e| js_error("Invalid transition policy", e))?;
    let params = SimulationParameters::new(g, alpha, time_step)
        .map_err(|e| js_error("Invalid parameters", e))?;
    let payload = build_trajectory(params, initial_population, start_year, end_year, policy)
        .map_err(|e| js_error("Trajectory simulation failed", format!("{:#}", e)))?;
    serialize(&payload)
}

#[wasm_bindgen]
pub fn simulate_region_pair(
    g: f64,
    alpha: f64,
    time_step: f64,
    initial_population_a: f64,
    initial_population_b: f64,
) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let params = SimulationParameters::new(g, alpha, time_step)
        .map_err(|e| js_error("Invalid parameters", e))?;
    let pair = build_region_pair(params, initial_population_a, initial_population_b)
        .map_err(|e| js_error("Region simulation failed", format!("{:#}", e)))?;
    serialize(&pair)
}

/// `config` is a (possibly partial) `ScenarioConfig`; `undefined` runs the defaults.
#[wasm_bindgen]
pub fn run_scenario(config: JsValue) -> Result<JsValue, JsValue> {
    console_error_panic_hook::set_once();

    let config: Option<ScenarioConfig> = if config.is_undefined() || config.is_null() {
        None
    } else {
        Some(from_value(config).map_err(|e| js_error("Invalid scenario configuration", e))?)
    };
    let report = build_scenario(config)
        .map_err(|e| js_error("Scenario failed", format!("{:#}", e)))?;
    serialize(&report)
}
