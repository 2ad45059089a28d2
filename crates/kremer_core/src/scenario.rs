//! One full run of the application: the long-run global path, its
//! growth-rate regression, the isolated regions and the recent slowdown.

use crate::analytics::{
    fit_no_intercept_slope, growth_rate_series, GrowthRateSeries, RegressionResult,
};
use crate::error::SimulationError;
use crate::grid::TimeGrid;
use crate::model::SimulationParameters;
use crate::recent::{simulate_recent_slowdown, RecentHistorySettings, RecentSlowdown};
use crate::regions::{
    simulate_region_pair, RegionPair, ISOLATION_CUTOVER_YEAR, ISOLATION_START_YEAR,
};
use crate::trajectory::{simulate_trajectory, ContainmentKind, Trajectory};
use crate::transition::TransitionPolicy;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

const LOW_RESEARCH_PRODUCTIVITY: f64 = 0.005;
const HIGH_RESEARCH_PRODUCTIVITY: f64 = 0.015;
/// One million people, in billions.
const MIN_PLAUSIBLE_POPULATION: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalRunSettings {
    pub start_year: f64,
    /// Exclusive.
    pub end_year: f64,
    /// Billions.
    pub initial_population: f64,
    pub include_transition: bool,
    pub transition: TransitionPolicy,
}

impl Default for GlobalRunSettings {
    fn default() -> Self {
        Self {
            start_year: -10000.0,
            end_year: 2000.0,
            initial_population: 0.004,
            include_transition: true,
            transition: TransitionPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionRunSettings {
    pub start_year: f64,
    /// Exclusive.
    pub cutover_year: f64,
    /// Old World, billions.
    pub initial_population_a: f64,
    /// Tasmania, billions.
    pub initial_population_b: f64,
}

impl Default for RegionRunSettings {
    fn default() -> Self {
        Self {
            start_year: ISOLATION_START_YEAR,
            cutover_year: ISOLATION_CUTOVER_YEAR,
            initial_population_a: 0.05,
            initial_population_b: 0.000004,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    pub parameters: SimulationParameters,
    pub global: GlobalRunSettings,
    pub regions: RegionRunSettings,
    pub recent: RecentHistorySettings,
}

impl ScenarioConfig {
    /// Defaults with the Kremer (1993) calibration.
    pub fn calibrated() -> Self {
        Self {
            parameters: SimulationParameters::calibrated(),
            ..Self::default()
        }
    }
}

/// Informational notes on a run. None of them stop the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Advisory {
    LowResearchProductivity { g: f64 },
    HighResearchProductivity { g: f64 },
    VeryLowInitialPopulation { population: f64 },
    Explosion { year: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advisory::LowResearchProductivity { g } => {
                write!(f, "research productivity g = {g} is low; growth will be very slow")
            }
            Advisory::HighResearchProductivity { g } => write!(
                f,
                "research productivity g = {g} is high; population will explode before 1950"
            ),
            Advisory::VeryLowInitialPopulation { population } => write!(
                f,
                "initial population {population} billion is below one million; growth will be extremely slow"
            ),
            Advisory::Explosion { year } => {
                write!(f, "population explosion detected in year {year}")
            }
        }
    }
}

/// Advisories that depend only on the inputs.
pub fn parameter_advisories(params: &SimulationParameters, initial_population: f64) -> Vec<Advisory> {
    let mut advisories = Vec::new();
    if params.g < LOW_RESEARCH_PRODUCTIVITY {
        advisories.push(Advisory::LowResearchProductivity { g: params.g });
    } else if params.g > HIGH_RESEARCH_PRODUCTIVITY {
        advisories.push(Advisory::HighResearchProductivity { g: params.g });
    }
    if initial_population < MIN_PLAUSIBLE_POPULATION {
        advisories.push(Advisory::VeryLowInitialPopulation {
            population: initial_population,
        });
    }
    advisories
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioReport {
    pub global: Trajectory,
    pub global_growth: GrowthRateSeries,
    /// Absent when no growth observation survived filtering or the fit was degenerate.
    pub global_slope: Option<RegressionResult>,
    pub regions: RegionPair,
    pub recent: RecentSlowdown,
    pub advisories: Vec<Advisory>,
}

pub fn run_scenario(config: &ScenarioConfig) -> Result<ScenarioReport> {
    let params = config.parameters;
    params.validate().context("Invalid simulation parameters.")?;

    let global_grid = TimeGrid::exclusive(
        config.global.start_year,
        config.global.end_year,
        params.time_step,
    )
    .context("Failed to build the global time grid.")?;
    let transition = config
        .global
        .include_transition
        .then_some(&config.global.transition);
    let global = simulate_trajectory(
        &params,
        config.global.initial_population,
        &global_grid,
        transition,
    )
    .context("Failed to simulate the global trajectory.")?;

    let global_growth = growth_rate_series(&global);
    let global_slope = match fit_no_intercept_slope(&global_growth.observations()) {
        Ok(fit) => Some(fit),
        Err(err @ SimulationError::NoUsableObservations)
        | Err(err @ SimulationError::DegenerateRegression(_)) => {
            log::warn!("No growth-rate slope for the global run: {err}");
            None
        }
        Err(err) => return Err(err).context("Failed to fit the growth-rate regression."),
    };

    let region_grid = TimeGrid::exclusive(
        config.regions.start_year,
        config.regions.cutover_year,
        params.time_step,
    )
    .context("Failed to build the isolation time grid.")?;
    let regions = simulate_region_pair(
        &params,
        config.regions.initial_population_a,
        config.regions.initial_population_b,
        &region_grid,
    )
    .context("Failed to simulate the isolated regions.")?;

    let recent = simulate_recent_slowdown(&params, &global, &config.recent)
        .context("Failed to simulate the recent slowdown.")?;

    let mut advisories = parameter_advisories(&params, config.global.initial_population);
    if let Some(containment) = global.containment {
        if containment.kind == ContainmentKind::Explosion {
            advisories.push(Advisory::Explosion {
                year: containment.year,
            });
        }
    }
    for advisory in &advisories {
        log::warn!("{advisory}");
    }

    log::debug!(
        "Scenario finished: {} global points, {} region points, {} advisories.",
        global.len(),
        regions.ratio.len(),
        advisories.len()
    );

    Ok(ScenarioReport {
        global,
        global_growth,
        global_slope,
        regions,
        recent,
        advisories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scenario_runs_every_stage() {
        let report = run_scenario(&ScenarioConfig::default()).expect("scenario");
        assert_eq!(report.global.len(), 1200);
        assert!(!report.global.exploded());
        assert_eq!(report.global_growth.len(), 1199);
        assert!(report.global_slope.expect("slope").slope > 0.0);
        assert_eq!(report.regions.ratio.len(), 1150);
        assert_eq!(report.recent.with_transition.len(), 101);
        assert!(report.advisories.is_empty());
    }

    #[test]
    fn explosive_parameters_are_flagged() {
        let mut config = ScenarioConfig::default();
        config.parameters.g = 0.02;
        config.global.initial_population = 0.05;
        let report = run_scenario(&config).expect("scenario");

        assert!(report.global.exploded());
        let slope = report.global_slope.expect("slope");
        assert!(slope.slope.is_finite());
        assert_eq!(report.regions.ratio.len(), 1150);
        assert_eq!(report.recent.with_transition.len(), 101);
        assert!(report
            .advisories
            .contains(&Advisory::HighResearchProductivity { g: 0.02 }));
        assert!(report
            .advisories
            .iter()
            .any(|a| matches!(a, Advisory::Explosion { .. })));
    }

    #[test]
    fn calibrated_scenario_warns_about_low_productivity() {
        let report = run_scenario(&ScenarioConfig::calibrated()).expect("scenario");
        assert_eq!(
            report.advisories,
            vec![Advisory::LowResearchProductivity { g: 0.00016 }]
        );
    }

    #[test]
    fn tiny_initial_population_is_flagged() {
        let advisories = parameter_advisories(&SimulationParameters::default(), 0.0005);
        assert_eq!(
            advisories,
            vec![Advisory::VeryLowInitialPopulation { population: 0.0005 }]
        );
    }

    #[test]
    fn invalid_configuration_reports_context() {
        let mut config = ScenarioConfig::default();
        config.global.initial_population = 0.0;
        let err = run_scenario(&config).expect_err("expected error");
        let message = format!("{err:#}");
        assert!(message.contains("global trajectory"), "{message}");
        assert!(message.contains("initial population must be positive"), "{message}");

        let mut config = ScenarioConfig::default();
        config.parameters.alpha = 1.5;
        let err = run_scenario(&config).expect_err("expected error");
        assert!(format!("{err:#}").contains("Invalid simulation parameters"));
    }

    #[test]
    fn partial_config_fills_in_defaults() {
        let config: ScenarioConfig = serde_json::from_str(
            r#"{ "parameters": { "g": 0.008 }, "global": { "include_transition": false } }"#,
        )
        .expect("config");
        assert_eq!(config.parameters.g, 0.008);
        assert_eq!(config.parameters.alpha, 0.7);
        assert_eq!(config.parameters.time_step, 10.0);
        assert!(!config.global.include_transition);
        assert_eq!(config.global.initial_population, 0.004);
        assert_eq!(config.recent, RecentHistorySettings::default());
    }

    #[test]
    fn advisories_serialize_with_a_type_tag() {
        let value = serde_json::to_value(Advisory::Explosion { year: 1500.0 }).expect("json");
        assert_eq!(value["type"], "Explosion");
        assert_eq!(value["year"], 1500.0);
    }
}
