//! Growth rates and the growth-rate-versus-level regression.
//!
//! The model predicts `Ṗ/P = k·P`: the growth rate is proportional to the
//! population level. Kremer tests this by regressing growth rate on population
//! through the origin, so the primary estimator here has no intercept.

use crate::error::{Result, SimulationError};
use crate::trajectory::Trajectory;
use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};

const SVD_EPS: f64 = 1e-12;

/// Growth over the interval starting at `year` with population `population`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthRatePoint {
    pub year: f64,
    pub population: f64,
    pub rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrowthRateSeries {
    pub points: Vec<GrowthRatePoint>,
}

impl GrowthRateSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn years(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.year).collect()
    }

    pub fn rates(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.rate).collect()
    }

    /// (population, rate) pairs for the regressions.
    pub fn observations(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.population, p.rate)).collect()
    }

    /// Rates expressed in percent per year.
    pub fn as_percent(&self) -> GrowthRateSeries {
        GrowthRateSeries {
            points: self
                .points
                .iter()
                .map(|p| GrowthRatePoint {
                    rate: p.rate * 100.0,
                    ..*p
                })
                .collect(),
        }
    }
}

pub fn growth_rate_series(trajectory: &Trajectory) -> GrowthRateSeries {
    collect_growth_rates(&trajectory.times, &trajectory.populations)
}

/// Growth rates from arbitrary (year, population) samples, e.g. historical estimates.
pub fn growth_rate_series_from_points(
    times: &[f64],
    populations: &[f64],
) -> Result<GrowthRateSeries> {
    if times.len() != populations.len() {
        return Err(SimulationError::invalid(format!(
            "got {} years but {} population values",
            times.len(),
            populations.len()
        )));
    }
    Ok(collect_growth_rates(times, populations))
}

/// Pairs past the shorter of the two slices are ignored.
fn collect_growth_rates(times: &[f64], populations: &[f64]) -> GrowthRateSeries {
    let len = times.len().min(populations.len());
    let mut points = Vec::with_capacity(len.saturating_sub(1));
    for i in 0..len.saturating_sub(1) {
        let (p0, p1) = (populations[i], populations[i + 1]);
        let dt = times[i + 1] - times[i];
        if p0 <= 0.0 || p1 <= 0.0 || dt == 0.0 {
            continue;
        }
        let rate = (p1.ln() - p0.ln()) / dt;
        if !rate.is_finite() {
            continue;
        }
        points.push(GrowthRatePoint {
            year: times[i],
            population: p0,
            rate,
        });
    }
    GrowthRateSeries { points }
}

/// Least-squares fit of `y = slope·x` through the origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub observations: usize,
}

impl RegressionResult {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InterceptRegressionResult {
    pub intercept: f64,
    pub slope: f64,
    pub observations: usize,
}

impl InterceptRegressionResult {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

fn usable_observations(observations: &[(f64, f64)]) -> (Vec<f64>, Vec<f64>) {
    observations
        .iter()
        .filter(|(x, y)| x.is_finite() && *x > 0.0 && y.is_finite())
        .copied()
        .unzip()
}

/// slope = Σxy / Σx² over observations with finite positive x and finite y.
///
/// Regressors are scaled by their maximum first, so plateaued populations
/// near the overflow limit still produce a finite slope.
pub fn fit_no_intercept_slope(observations: &[(f64, f64)]) -> Result<RegressionResult> {
    let (xs, ys) = usable_observations(observations);
    if xs.is_empty() {
        return Err(SimulationError::NoUsableObservations);
    }
    let count = xs.len();
    let scale = xs.iter().copied().fold(0.0_f64, f64::max);
    let x = DVector::from_vec(xs) / scale;
    let y = DVector::from_vec(ys);

    // Σ(x/s)² lies in [1, count].
    let sxx = x.dot(&x);
    if !sxx.is_finite() || sxx <= 0.0 {
        return Err(SimulationError::DegenerateRegression(format!(
            "sum of squared regressors is {sxx}"
        )));
    }
    let slope = x.dot(&y) / sxx / scale;
    if !slope.is_finite() {
        return Err(SimulationError::DegenerateRegression(format!(
            "slope evaluated to {slope}"
        )));
    }

    Ok(RegressionResult {
        slope,
        observations: count,
    })
}

/// Ordinary least squares `y = intercept + slope·x`, for comparison with the
/// through-origin fit.
pub fn fit_with_intercept(observations: &[(f64, f64)]) -> Result<InterceptRegressionResult> {
    let (xs, ys) = usable_observations(observations);
    if xs.is_empty() {
        return Err(SimulationError::NoUsableObservations);
    }
    let first = xs[0];
    if xs.iter().all(|&x| x == first) {
        return Err(SimulationError::DegenerateRegression(
            "an intercept fit needs at least two distinct regressor values".to_string(),
        ));
    }
    let count = xs.len();

    let design = DMatrix::from_fn(count, 2, |row, col| if col == 0 { 1.0 } else { xs[row] });
    let rhs = DVector::from_vec(ys);
    let svd = design.svd(true, true);
    let coefficients = svd
        .solve(&rhs, SVD_EPS)
        .map_err(|e| SimulationError::DegenerateRegression(e.to_string()))?;

    let (intercept, slope) = (coefficients[0], coefficients[1]);
    if !intercept.is_finite() || !slope.is_finite() {
        return Err(SimulationError::DegenerateRegression(
            "least-squares coefficients are not finite".to_string(),
        ));
    }

    Ok(InterceptRegressionResult {
        intercept,
        slope,
        observations: count,
    })
}
