use thiserror::Error;

/// Failures that reject a request before any stepping happens.
///
/// Numeric blow-up during stepping is not an error: it is reported through
/// [`crate::trajectory::Containment`] on an otherwise successful trajectory.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("time grid spacing {grid_step} does not match time step {time_step}")]
    GridMismatch { grid_step: f64, time_step: f64 },
    #[error("no usable observations remain after filtering")]
    NoUsableObservations,
    #[error("degenerate regression: {0}")]
    DegenerateRegression(String),
}

impl SimulationError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        SimulationError::InvalidInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
