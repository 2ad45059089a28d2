//! Population dynamics of the Kremer (1993) model.
//!
//! Technology grows at a rate proportional to population (`Ȧ/A = g·P`) and
//! population is pinned to technology through the Malthusian condition
//! `P ∝ A^((1-α)/α)`. Together they collapse into a single scalar law,
//! `dP/dt = k·P²` with `k = g·(1-α)/α`.

use crate::error::{Result, SimulationError};
use crate::solvers::ForwardEuler;
use crate::traits::{Integrator, Scalar, VectorField};
use serde::{Deserialize, Serialize};

/// Rate parameters shared by every trajectory in a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationParameters {
    /// Research productivity per person.
    pub g: f64,
    /// Land elasticity in the agricultural production function.
    pub alpha: f64,
    /// Integration step in years.
    pub time_step: f64,
}

impl Default for SimulationParameters {
    fn default() -> Self {
        Self {
            g: 0.005,
            alpha: 0.7,
            time_step: 10.0,
        }
    }
}

impl SimulationParameters {
    pub fn new(g: f64, alpha: f64, time_step: f64) -> Result<Self> {
        let params = Self {
            g,
            alpha,
            time_step,
        };
        params.validate()?;
        Ok(params)
    }

    /// Values calibrated against the historical record in Kremer (1993).
    pub fn calibrated() -> Self {
        Self {
            g: 0.00016,
            ..Self::default()
        }
    }

    /// Same rates with a different step, e.g. yearly stepping for recent history.
    pub fn with_time_step(self, time_step: f64) -> Self {
        Self { time_step, ..self }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.g.is_finite() || self.g <= 0.0 {
            return Err(SimulationError::invalid(format!(
                "research productivity g must be positive, got {}",
                self.g
            )));
        }
        if !self.alpha.is_finite() || self.alpha <= 0.0 || self.alpha >= 1.0 {
            return Err(SimulationError::invalid(format!(
                "alpha must lie strictly between 0 and 1, got {}",
                self.alpha
            )));
        }
        if !self.time_step.is_finite() || self.time_step <= 0.0 {
            return Err(SimulationError::invalid(format!(
                "time step must be positive, got {}",
                self.time_step
            )));
        }
        Ok(())
    }

    /// k = g·(1-α)/α
    pub fn growth_coefficient(&self) -> f64 {
        self.g * (1.0 - self.alpha) / self.alpha
    }
}

/// The vector field dP/dt = k·P².
#[derive(Debug, Clone, Copy)]
pub struct PopulationDynamics {
    k: f64,
}

impl PopulationDynamics {
    pub fn new(params: &SimulationParameters) -> Self {
        Self {
            k: params.growth_coefficient(),
        }
    }

    pub fn growth_coefficient(&self) -> f64 {
        self.k
    }
}

impl<T: Scalar> VectorField<T> for PopulationDynamics {
    fn dimension(&self) -> usize {
        1
    }

    fn derivative(&self, _t: T, x: &[T], out: &mut [T]) {
        let k = T::from_f64(self.k).unwrap_or_else(T::nan);
        out[0] = k * x[0] * x[0];
    }
}

/// One explicit Euler step: P + k·P²·dt.
///
/// The result is unguarded and may be infinite or NaN for large inputs.
pub fn next_population(params: &SimulationParameters, population: f64) -> f64 {
    let system = PopulationDynamics::new(params);
    let mut stepper = ForwardEuler::new(1);
    let mut t = 0.0;
    let mut state = [population];
    stepper.advance(&system, &mut t, &mut state, params.time_step);
    state[0]
}
