// src/time_grid.rs
//! Observation grids and their refinement into integration sub-steps.

use crate::error::{validation::*, SdeError, SdeResult};

/// How finely each observation interval is subdivided.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepResolution {
    /// Exactly this many equal sub-steps per interval.
    Count(usize),
    /// Equal sub-steps no longer than this bound.
    MaxStep(f64),
    /// One Euler step per interval.
    PerInterval,
}

impl StepResolution {
    /// Number of equal sub-steps for an interval of length `span`.
    pub fn substeps(&self, span: f64) -> usize {
        match *self {
            StepResolution::Count(n) => n,
            // Shave a relative epsilon so that e.g. 0.3 / 0.1 does not round up to 4.
            StepResolution::MaxStep(h) => ((span / h) * (1.0 - 1e-12)).ceil().max(1.0) as usize,
            StepResolution::PerInterval => 1,
        }
    }

    pub fn validate(&self) -> SdeResult<()> {
        match *self {
            StepResolution::Count(n) => validate_steps(n),
            StepResolution::MaxStep(h) => {
                validate_finite("time_step", h)?;
                validate_positive("time_step", h)
            }
            StepResolution::PerInterval => Ok(()),
        }
    }
}

/// Strictly increasing observation times.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
}

impl TimeGrid {
    pub fn new(times: Vec<f64>) -> SdeResult<Self> {
        validate_time_grid(&times)?;
        Ok(Self { times })
    }

    /// `n + 1` equally spaced points covering `[start, end]`.
    pub fn uniform(start: f64, end: f64, n: usize) -> SdeResult<Self> {
        validate_steps(n)?;
        let span = end - start;
        let mut times: Vec<f64> = (0..n).map(|i| start + span * i as f64 / n as f64).collect();
        times.push(end);
        Self::new(times)
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn first(&self) -> f64 {
        self.times[0]
    }

    pub fn last(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Expands the grid into integration points beginning at `start_time`.
    pub fn refine(&self, start_time: f64, resolution: StepResolution) -> SdeResult<RefinedGrid> {
        validate_finite("start_time", start_time)?;
        resolution.validate()?;
        if self.first() < start_time {
            return Err(SdeError::InvalidConfiguration {
                field: "times".to_string(),
                reason: format!(
                    "first observation time {} precedes the start time {}",
                    self.first(),
                    start_time
                ),
            });
        }

        let mut points = vec![start_time];
        let mut record_at = Vec::with_capacity(self.times.len());
        let mut left = start_time;

        for &right in &self.times {
            if right > left {
                let n = resolution.substeps(right - left);
                let span = right - left;
                points.extend((1..n).map(|j| left + span * j as f64 / n as f64));
                // Observation times are pushed verbatim, never recomputed.
                points.push(right);
            }
            record_at.push(points.len() - 1);
            left = right;
        }

        Ok(RefinedGrid { points, record_at })
    }
}

/// Integration points plus the positions at which observations are recorded.
#[derive(Debug, Clone, PartialEq)]
pub struct RefinedGrid {
    /// All integration points, starting at the process start time.
    pub points: Vec<f64>,
    /// `record_at[k]` is the index in `points` of observation `k`.
    pub record_at: Vec<usize>,
}

impl RefinedGrid {
    pub fn num_steps(&self) -> usize {
        self.points.len() - 1
    }
}
