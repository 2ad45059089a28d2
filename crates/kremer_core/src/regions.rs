//! Technologically isolated regions.
//!
//! Until roughly 1500 CE the Old World, the Americas, Australia and Tasmania
//! had no contact, so each developed technology from its own population.
//! Running the same growth law from different initial populations shows how
//! an early size advantage compounds.

use crate::error::{Result, SimulationError};
use crate::grid::TimeGrid;
use crate::guard::BOUNDED_CEILING;
use crate::model::SimulationParameters;
use crate::trajectory::{simulate_bounded_trajectory, Trajectory};
use serde::{Deserialize, Serialize};

pub const ISOLATION_START_YEAR: f64 = -10000.0;
pub const ISOLATION_CUTOVER_YEAR: f64 = 1500.0;

/// Grid from the start of isolation up to (excluding) the cutover year.
pub fn isolation_grid(params: &SimulationParameters) -> Result<TimeGrid> {
    params.validate()?;
    TimeGrid::exclusive(ISOLATION_START_YEAR, ISOLATION_CUTOVER_YEAR, params.time_step)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionPair {
    pub region_a: Trajectory,
    pub region_b: Trajectory,
    /// region_a / region_b per grid point.
    pub ratio: Vec<f64>,
}

impl RegionPair {
    pub fn initial_ratio(&self) -> Option<f64> {
        self.ratio.first().copied()
    }

    pub fn final_ratio(&self) -> Option<f64> {
        self.ratio.last().copied()
    }

    /// First index at which either region sits on its ceiling.
    pub fn first_containment(&self) -> Option<usize> {
        match (self.region_a.truncated_at(), self.region_b.truncated_at()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}

/// Two isolated runs sharing rates and grid, plus their ratio.
pub fn simulate_region_pair(
    params: &SimulationParameters,
    initial_population_a: f64,
    initial_population_b: f64,
    grid: &TimeGrid,
) -> Result<RegionPair> {
    let region_a =
        simulate_bounded_trajectory(params, initial_population_a, grid, None, BOUNDED_CEILING)?;
    let region_b =
        simulate_bounded_trajectory(params, initial_population_b, grid, None, BOUNDED_CEILING)?;
    let ratio = ratio_series(&region_a.populations, &region_b.populations)?;

    log::debug!(
        "Isolated regions simulated over {} points; ratio {:e} -> {:e}.",
        ratio.len(),
        ratio.first().copied().unwrap_or(1.0),
        ratio.last().copied().unwrap_or(1.0)
    );

    Ok(RegionPair {
        region_a,
        region_b,
        ratio,
    })
}

/// Elementwise a / b; points with an unusable denominator read 1.
pub fn ratio_series(numerator: &[f64], denominator: &[f64]) -> Result<Vec<f64>> {
    if numerator.len() != denominator.len() {
        return Err(SimulationError::invalid(format!(
            "ratio series length mismatch: {} vs {}",
            numerator.len(),
            denominator.len()
        )));
    }
    Ok(numerator
        .iter()
        .zip(denominator)
        .map(|(&a, &b)| {
            if b.is_finite() && b.abs() > f64::EPSILON {
                a / b
            } else {
                1.0
            }
        })
        .collect())
}
