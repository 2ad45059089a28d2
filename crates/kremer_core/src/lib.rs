pub mod analytics;
pub mod error;
pub mod grid;
pub mod guard;
pub mod model;
pub mod recent;
pub mod regions;
pub mod scenario;
pub mod solvers;
pub mod trajectory;
pub mod transition;
/// The `kremer_core` crate is the numerical engine behind the Kremer (1993)
/// population and technology model, where `dP/dt = k·P²`.
///
/// Key components:
/// - **Traits**: `Scalar`, `VectorField`, `Integrator` (shared by the growth law and its stepper).
/// - **Model / Solvers**: the growth law and a fixed-step forward Euler integrator.
/// - **Guard / Transition**: overflow and ceiling containment, and the post-threshold
///   fertility-decline overlay.
/// - **Trajectory / Regions / Recent**: full runs over a `TimeGrid`, isolated-region
///   comparisons and the twentieth-century slowdown.
/// - **Analytics**: growth-rate series and the through-origin regression.
/// - **Scenario**: serde-configurable orchestration of all of the above.
pub mod traits;

pub use analytics::{
    fit_no_intercept_slope, fit_with_intercept, growth_rate_series,
    growth_rate_series_from_points, GrowthRatePoint, GrowthRateSeries,
    InterceptRegressionResult, RegressionResult,
};
pub use error::SimulationError;
pub use grid::TimeGrid;
pub use model::SimulationParameters;
pub use regions::{simulate_region_pair, RegionPair};
pub use trajectory::{
    simulate_bounded_trajectory, simulate_trajectory, Containment, ContainmentKind, Trajectory,
};
pub use transition::TransitionPolicy;
