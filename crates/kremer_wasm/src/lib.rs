//! WASM bridge for `kremer_core`.
//!
//! Every binding takes plain numbers or serde-compatible objects and returns
//! serialized payloads; errors surface as JS strings.

mod analysis;
mod simulation;

pub use analysis::{fit_no_intercept_slope, fit_with_intercept, growth_rate_series};
pub use simulation::{run_scenario, simulate_region_pair, simulate_trajectory};
