//! Containment of a single integration step.

use crate::error::{Result, SimulationError};
use serde::{Deserialize, Serialize};

/// Smallest population a step may produce; keeps logarithms defined.
pub const POPULATION_FLOOR: f64 = 1e-12;

/// Ceiling (billions) used by the isolated-region and recent-history runs.
pub const BOUNDED_CEILING: f64 = 1000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GuardLimits {
    pub ceiling: Option<f64>,
}

impl GuardLimits {
    pub fn unbounded() -> Self {
        Self { ceiling: None }
    }

    pub fn bounded(ceiling: f64) -> Result<Self> {
        let limits = Self {
            ceiling: Some(ceiling),
        };
        limits.validate()?;
        Ok(limits)
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(ceiling) = self.ceiling {
            if !ceiling.is_finite() || ceiling <= POPULATION_FLOOR {
                return Err(SimulationError::invalid(format!(
                    "population ceiling must be finite and above {POPULATION_FLOOR}, got {ceiling}"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GuardOutcome {
    /// Keep stepping from this value.
    Advance(f64),
    /// The step overflowed; hold the previous value from here on.
    Explosion,
    /// The step crossed the ceiling; hold the ceiling from here on.
    Ceiling(f64),
}

/// Classify a candidate population produced by one step.
pub fn guard_step(candidate: f64, limits: &GuardLimits) -> GuardOutcome {
    if let Some(ceiling) = limits.ceiling {
        if !candidate.is_finite() || candidate > ceiling {
            return GuardOutcome::Ceiling(ceiling);
        }
    }
    if !candidate.is_finite() {
        return GuardOutcome::Explosion;
    }
    if candidate <= 0.0 {
        return GuardOutcome::Advance(POPULATION_FLOOR);
    }
    GuardOutcome::Advance(candidate)
}
