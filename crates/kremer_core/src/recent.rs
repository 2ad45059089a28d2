//! Twentieth-century slowdown: the same yearly run with and without the
//! demographic transition, started from the long-run trajectory.

use crate::analytics::{growth_rate_series, GrowthRateSeries};
use crate::error::{Result, SimulationError};
use crate::grid::TimeGrid;
use crate::guard::BOUNDED_CEILING;
use crate::model::SimulationParameters;
use crate::trajectory::{simulate_bounded_trajectory, Trajectory};
use crate::transition::TransitionPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentHistorySettings {
    pub start_year: f64,
    /// Inclusive.
    pub end_year: f64,
    pub time_step: f64,
    pub ceiling: f64,
    pub transition: TransitionPolicy,
}

impl Default for RecentHistorySettings {
    fn default() -> Self {
        Self {
            start_year: 1900.0,
            end_year: 2000.0,
            time_step: 1.0,
            ceiling: BOUNDED_CEILING,
            transition: TransitionPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentSlowdown {
    pub start_population: f64,
    pub with_transition: Trajectory,
    pub without_transition: Trajectory,
    /// Percent per year.
    pub growth_with_transition: GrowthRateSeries,
    /// Percent per year.
    pub growth_without_transition: GrowthRateSeries,
}

pub fn simulate_recent_slowdown(
    params: &SimulationParameters,
    global: &Trajectory,
    settings: &RecentHistorySettings,
) -> Result<RecentSlowdown> {
    let start_population = global
        .value_nearest(settings.start_year)
        .ok_or_else(|| SimulationError::invalid("global trajectory is empty"))?
        .min(settings.ceiling);

    let yearly = params.with_time_step(settings.time_step);
    let grid = TimeGrid::inclusive(settings.start_year, settings.end_year, settings.time_step)?;

    let without_transition =
        simulate_bounded_trajectory(&yearly, start_population, &grid, None, settings.ceiling)?;
    let with_transition = simulate_bounded_trajectory(
        &yearly,
        start_population,
        &grid,
        Some(&settings.transition),
        settings.ceiling,
    )?;

    Ok(RecentSlowdown {
        start_population,
        growth_with_transition: growth_rate_series(&with_transition).as_percent(),
        growth_without_transition: growth_rate_series(&without_transition).as_percent(),
        with_transition,
        without_transition,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trajectory::simulate_trajectory;

    fn global_run(initial: f64) -> Trajectory {
        let params = SimulationParameters::default();
        let grid = TimeGrid::exclusive(-10000.0, 2000.0, 10.0).expect("grid");
        simulate_trajectory(&params, initial, &grid, None).expect("global")
    }

    fn industrial_era() -> Trajectory {
        Trajectory {
            times: vec![1890.0, 1900.0, 1910.0],
            populations: vec![1.5, 1.6, 1.7],
            containment: None,
        }
    }

    #[test]
    fn starts_from_the_global_value_nearest_the_start_year() {
        let global = global_run(0.004);
        let params = SimulationParameters::default();
        let recent = simulate_recent_slowdown(&params, &global, &RecentHistorySettings::default())
            .expect("recent");

        let expected = global.value_nearest(1900.0).expect("value");
        assert_eq!(recent.start_population, expected);
        assert_eq!(recent.with_transition.populations[0], expected);
        assert_eq!(recent.without_transition.populations[0], expected);
        assert_eq!(recent.with_transition.len(), 101);
        assert_eq!(recent.growth_with_transition.len(), 100);
        assert_eq!(recent.growth_without_transition.points[0].year, 1900.0);
        assert_eq!(recent.growth_without_transition.points[99].year, 1999.0);
    }

    #[test]
    fn growth_is_reported_in_percent_per_year() {
        let global = industrial_era();
        let params = SimulationParameters::default();
        let recent = simulate_recent_slowdown(&params, &global, &RecentHistorySettings::default())
            .expect("recent");

        let p = &recent.without_transition.populations;
        let expected = (p[1] / p[0]).ln() * 100.0;
        assert!((recent.growth_without_transition.points[0].rate - expected).abs() < 1e-12);
    }

    #[test]
    fn transition_slows_growth_after_threshold() {
        let global = industrial_era();
        let params = SimulationParameters::default();
        let recent = simulate_recent_slowdown(&params, &global, &RecentHistorySettings::default())
            .expect("recent");

        let with = &recent.growth_with_transition.points;
        let without = &recent.growth_without_transition.points;
        for (a, b) in with.iter().zip(without) {
            if a.year + 1.0 < 1950.0 {
                assert_eq!(a.rate, b.rate);
            } else {
                assert!(a.rate <= b.rate + 1e-12, "year {}", a.year);
            }
        }
        let last_with = with.last().expect("rate").rate;
        let last_without = without.last().expect("rate").rate;
        assert!(last_with < 0.5 * last_without);
    }

    #[test]
    fn short_population_column_is_not_read_past_its_end() {
        let global = Trajectory {
            times: vec![1890.0, 1900.0],
            populations: vec![1.0],
            containment: None,
        };
        let params = SimulationParameters::default();
        let recent = simulate_recent_slowdown(&params, &global, &RecentHistorySettings::default())
            .expect("recent");
        assert_eq!(recent.start_population, 1.0);
    }

    #[test]
    fn exploded_global_run_starts_at_the_ceiling() {
        let params = SimulationParameters::default();
        let grid = TimeGrid::exclusive(1800.0, 2000.0, 10.0).expect("grid");
        let global = simulate_trajectory(&params, 1e200, &grid, None).expect("global");
        let recent = simulate_recent_slowdown(&params, &global, &RecentHistorySettings::default())
            .expect("recent");
        assert_eq!(recent.start_population, BOUNDED_CEILING);
        assert!(recent
            .without_transition
            .populations
            .iter()
            .all(|&p| p <= BOUNDED_CEILING));
    }
}
