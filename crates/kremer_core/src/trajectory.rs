use crate::error::{Result, SimulationError};
use crate::grid::{nearest_index, TimeGrid};
use crate::guard::{guard_step, GuardLimits, GuardOutcome};
use crate::model::{PopulationDynamics, SimulationParameters};
use crate::solvers::ForwardEuler;
use crate::traits::{Integrator, VectorField};
use crate::transition::TransitionPolicy;
use serde::{Deserialize, Serialize};

const STEP_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContainmentKind {
    Explosion,
    Ceiling,
}

/// Where and why stepping stopped. Every point from `index` on holds the
/// plateau value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Containment {
    pub kind: ContainmentKind,
    pub index: usize,
    pub year: f64,
}

/// Population (billions) on each grid year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub times: Vec<f64>,
    pub populations: Vec<f64>,
    pub containment: Option<Containment>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.populations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.populations.is_empty()
    }

    pub fn exploded(&self) -> bool {
        matches!(
            self.containment,
            Some(Containment {
                kind: ContainmentKind::Explosion,
                ..
            })
        )
    }

    pub fn truncated_at(&self) -> Option<usize> {
        self.containment.map(|c| c.index)
    }

    pub fn final_population(&self) -> Option<f64> {
        self.populations.last().copied()
    }

    /// Population at the grid year closest to `year`. Only years that carry a
    /// population are considered.
    pub fn value_nearest(&self, year: f64) -> Option<f64> {
        let len = self.times.len().min(self.populations.len());
        if len == 0 {
            return None;
        }
        Some(self.populations[nearest_index(&self.times[..len], year)])
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.times
            .iter()
            .copied()
            .zip(self.populations.iter().copied())
    }
}

/// Unbounded run: only overflow stops the stepping.
pub fn simulate_trajectory(
    params: &SimulationParameters,
    initial_population: f64,
    grid: &TimeGrid,
    transition: Option<&TransitionPolicy>,
) -> Result<Trajectory> {
    simulate_with_limits(
        params,
        initial_population,
        grid,
        transition,
        GuardLimits::unbounded(),
    )
}

/// Run that plateaus at `ceiling` once a step would exceed it.
pub fn simulate_bounded_trajectory(
    params: &SimulationParameters,
    initial_population: f64,
    grid: &TimeGrid,
    transition: Option<&TransitionPolicy>,
    ceiling: f64,
) -> Result<Trajectory> {
    let limits = GuardLimits::bounded(ceiling)?;
    simulate_with_limits(params, initial_population, grid, transition, limits)
}

pub fn simulate_with_limits(
    params: &SimulationParameters,
    initial_population: f64,
    grid: &TimeGrid,
    transition: Option<&TransitionPolicy>,
    limits: GuardLimits,
) -> Result<Trajectory> {
    params.validate()?;
    limits.validate()?;
    if !initial_population.is_finite() || initial_population <= 0.0 {
        return Err(SimulationError::invalid(format!(
            "initial population must be positive, got {initial_population}"
        )));
    }
    if let Some(ceiling) = limits.ceiling {
        if initial_population > ceiling {
            return Err(SimulationError::invalid(format!(
                "initial population {initial_population} exceeds the ceiling {ceiling}"
            )));
        }
    }
    if let Some(policy) = transition {
        policy.validate()?;
    }
    let grid_step = grid.step();
    if (grid_step - params.time_step).abs() > STEP_TOLERANCE * params.time_step.max(1.0) {
        return Err(SimulationError::GridMismatch {
            grid_step,
            time_step: params.time_step,
        });
    }

    let times = grid.times().to_vec();
    let mut populations = Vec::with_capacity(times.len());
    populations.push(initial_population);

    let system = PopulationDynamics::new(params);
    let mut stepper = ForwardEuler::new(VectorField::<f64>::dimension(&system));
    let mut containment = None;

    for i in 1..times.len() {
        let previous = populations[i - 1];
        let mut t = times[i - 1];
        let mut state = [previous];
        stepper.advance(&system, &mut t, &mut state, params.time_step);

        match guard_step(state[0], &limits) {
            GuardOutcome::Advance(base) => {
                // The damped value becomes the next step's predecessor.
                let value = match transition {
                    Some(policy) => policy.damp(times[i], previous, base),
                    None => base,
                };
                populations.push(value);
            }
            GuardOutcome::Explosion => {
                log::warn!(
                    "Population explosion detected in year {}; holding {:e} for the rest of the run.",
                    times[i],
                    previous
                );
                containment = Some(Containment {
                    kind: ContainmentKind::Explosion,
                    index: i,
                    year: times[i],
                });
                populations.resize(times.len(), previous);
                break;
            }
            GuardOutcome::Ceiling(ceiling) => {
                log::debug!(
                    "Population reached the ceiling {} in year {}.",
                    ceiling,
                    times[i]
                );
                containment = Some(Containment {
                    kind: ContainmentKind::Ceiling,
                    index: i,
                    year: times[i],
                });
                populations.resize(times.len(), ceiling);
                break;
            }
        }
    }

    Ok(Trajectory {
        times,
        populations,
        containment,
    })
}
