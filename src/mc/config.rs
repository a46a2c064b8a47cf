// src/mc/config.rs
use crate::error::{validation::*, SdeResult};
use crate::rng::RandomType;
use crate::time_grid::{StepResolution, TimeGrid};
use tracing::warn;

/// A request to simulate paths of an Itô process.
///
/// Sub-step resolution precedence: `num_time_steps` (per observation
/// interval) wins over `time_step` (upper bound on the step size); with
/// neither set every observation interval is a single Euler step.
#[derive(Clone, Debug, PartialEq)]
pub struct SamplePathsConfig {
    pub times: Vec<f64>,
    pub num_samples: usize,
    pub initial_state: Vec<f64>,
    pub random_type: RandomType,
    /// `None` draws a fresh seed from the operating system.
    pub seed: Option<u64>,
    pub num_time_steps: Option<usize>,
    pub time_step: Option<f64>,
    /// Time at which `initial_state` holds; must not exceed `times[0]`.
    pub start_time: f64,
}

impl SamplePathsConfig {
    /// Validate the request against a process of the given dimension
    pub fn validate(&self, dimension: usize) -> SdeResult<()> {
        validate_paths(self.num_samples)?;
        validate_time_grid(&self.times)?;
        validate_dimension("initial_state", dimension, self.initial_state.len())?;
        for (i, &x) in self.initial_state.iter().enumerate() {
            validate_finite(&format!("initial_state[{}]", i), x)?;
        }
        validate_finite("start_time", self.start_time)?;
        self.resolution().validate()
    }

    pub fn time_grid(&self) -> SdeResult<TimeGrid> {
        TimeGrid::new(self.times.clone())
    }

    pub fn resolution(&self) -> StepResolution {
        match (self.num_time_steps, self.time_step) {
            (Some(n), Some(h)) => {
                warn!(
                    num_time_steps = n,
                    time_step = h,
                    "both num_time_steps and time_step set; using num_time_steps"
                );
                StepResolution::Count(n)
            }
            (Some(n), None) => StepResolution::Count(n),
            (None, Some(h)) => StepResolution::MaxStep(h),
            (None, None) => StepResolution::PerInterval,
        }
    }
}

impl Default for SamplePathsConfig {
    fn default() -> Self {
        SamplePathsConfig {
            times: vec![1.0],
            num_samples: 1,
            initial_state: Vec::new(),
            random_type: RandomType::Pseudo,
            seed: None,
            num_time_steps: None,
            time_step: None,
            start_time: 0.0,
        }
    }
}
