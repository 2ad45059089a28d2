//! Demographic transition: fertility decline once income passes a threshold.
//!
//! There is no income variable in the scalar model, so the transition is an
//! overlay on the population path. From `threshold_year` on, each step's
//! log-growth is scaled by a damping factor that falls linearly with the years
//! elapsed and never drops below `floor_factor`.

use crate::error::{Result, SimulationError};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransitionPolicy {
    pub threshold_year: i32,
    pub decay_rate_per_year: f64,
    pub floor_factor: f64,
}

impl Default for TransitionPolicy {
    fn default() -> Self {
        Self {
            threshold_year: 1950,
            decay_rate_per_year: 0.015,
            floor_factor: 0.2,
        }
    }
}

impl TransitionPolicy {
    pub fn validate(&self) -> Result<()> {
        if !self.decay_rate_per_year.is_finite() || self.decay_rate_per_year < 0.0 {
            return Err(SimulationError::invalid(format!(
                "transition decay rate must be non-negative, got {}",
                self.decay_rate_per_year
            )));
        }
        if !self.floor_factor.is_finite() || self.floor_factor <= 0.0 || self.floor_factor >= 1.0 {
            return Err(SimulationError::invalid(format!(
                "transition floor factor must lie strictly between 0 and 1, got {}",
                self.floor_factor
            )));
        }
        Ok(())
    }

    pub fn applies_at(&self, year: f64) -> bool {
        year >= f64::from(self.threshold_year)
    }

    /// max(floor, 1 - decay·(year - threshold))
    pub fn reduction_factor(&self, year: f64) -> f64 {
        let elapsed = year - f64::from(self.threshold_year);
        (1.0 - self.decay_rate_per_year * elapsed).max(self.floor_factor)
    }

    /// Re-applies the step from `previous` to `base` with damped log-growth.
    ///
    /// Returns `base` unchanged before the threshold year.
    pub fn damp(&self, year: f64, previous: f64, base: f64) -> f64 {
        if !self.applies_at(year) {
            return base;
        }
        let log_growth = (base / previous).ln();
        previous * (log_growth * self.reduction_factor(year)).exp()
    }
}
