use crate::error::{Result, SimulationError};
use serde::Serialize;

const SPAN_TOLERANCE: f64 = 1e-9;
/// Largest grid a single run will allocate.
pub const MAX_GRID_POINTS: usize = 10_000_000;

/// Evenly spaced calendar years. Negative years are BCE.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeGrid {
    step: f64,
    times: Vec<f64>,
}

impl TimeGrid {
    /// Years `start, start + step, ...` strictly below `end`.
    pub fn exclusive(start: f64, end: f64, step: f64) -> Result<Self> {
        let ratio = Self::span_ratio(start, end, step)?;
        let count = (ratio - SPAN_TOLERANCE).ceil().max(0.0);
        Self::build(start, step, count)
    }

    /// Years `start, start + step, ...` up to and including `end`.
    pub fn inclusive(start: f64, end: f64, step: f64) -> Result<Self> {
        let ratio = Self::span_ratio(start, end, step)?;
        let count = if ratio < -SPAN_TOLERANCE {
            0.0
        } else {
            (ratio + SPAN_TOLERANCE).floor().max(0.0) + 1.0
        };
        Self::build(start, step, count)
    }

    fn span_ratio(start: f64, end: f64, step: f64) -> Result<f64> {
        if !start.is_finite() || !end.is_finite() {
            return Err(SimulationError::invalid(format!(
                "time grid bounds must be finite, got [{start}, {end}]"
            )));
        }
        if !step.is_finite() || step <= 0.0 {
            return Err(SimulationError::invalid(format!(
                "time grid step must be positive, got {step}"
            )));
        }
        Ok((end - start) / step)
    }

    fn build(start: f64, step: f64, count: f64) -> Result<Self> {
        if count < 1.0 {
            return Err(SimulationError::invalid(
                "time grid must contain at least one point",
            ));
        }
        if count > MAX_GRID_POINTS as f64 {
            return Err(SimulationError::invalid(format!(
                "time grid would hold {count:e} points, more than {MAX_GRID_POINTS}"
            )));
        }
        let count = count as usize;
        // Each point is start + i·step, never a running sum.
        let times = (0..count).map(|i| start + step * i as f64).collect();
        Ok(Self { step, times })
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn start(&self) -> f64 {
        self.times[0]
    }

    pub fn last(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Index of the grid year closest to `year`; the earlier point wins ties.
    pub fn nearest_index(&self, year: f64) -> usize {
        nearest_index(&self.times, year)
    }
}

pub(crate) fn nearest_index(times: &[f64], year: f64) -> usize {
    let mut best = 0usize;
    let mut best_distance = f64::INFINITY;
    for (idx, &t) in times.iter().enumerate() {
        let distance = (t - year).abs();
        if distance < best_distance {
            best = idx;
            best_distance = distance;
        }
    }
    best
}
