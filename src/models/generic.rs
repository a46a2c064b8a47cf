// src/models/generic.rs
//! Itô process assembled from caller-supplied drift and volatility closures.

use super::ito_process::ItoProcess;
use crate::correlation::CorrelationMatrix;
use crate::error::{validation::*, SdeError, SdeResult};
use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1};
use std::fmt;
use std::sync::Arc;

pub type DriftFn = dyn Fn(f64, ArrayView1<f64>) -> Array1<f64> + Send + Sync;
pub type VolatilityFn = dyn Fn(f64, ArrayView1<f64>) -> Array2<f64> + Send + Sync;
pub type BoundaryFn = dyn Fn(ArrayViewMut1<f64>) + Send + Sync;

/// A process defined entirely by two closures.
///
/// # Example
///
/// ```rust
/// use fast_ito::models::generic::GenericItoProcess;
/// use fast_ito::models::ito_process::ItoProcess;
/// use fast_ito::mc::config::SamplePathsConfig;
/// use ndarray::{array, Array2};
///
/// // dX = 0.05 dt + 0.2 dW
/// let process = GenericItoProcess::new(
///     1,
///     |_t, _x| array![0.05],
///     |_t, _x| Array2::from_elem((1, 1), 0.2),
/// )
/// .unwrap();
///
/// let batch = process
///     .sample_paths(&SamplePathsConfig {
///         times: vec![0.0, 1.0],
///         num_samples: 2,
///         initial_state: vec![1.0],
///         seed: Some(42),
///         ..Default::default()
///     })
///     .unwrap();
/// assert_eq!(batch.shape(), (2, 2, 1));
/// ```
#[derive(Clone)]
pub struct GenericItoProcess {
    dimension: usize,
    noise_dimension: usize,
    drift_fn: Arc<DriftFn>,
    volatility_fn: Arc<VolatilityFn>,
    correlation: Option<CorrelationMatrix>,
    boundary_fn: Option<Arc<BoundaryFn>>,
}

impl GenericItoProcess {
    /// Process of the given dimension with as many Brownian drivers as states.
    pub fn new<D, V>(dimension: usize, drift_fn: D, volatility_fn: V) -> SdeResult<Self>
    where
        D: Fn(f64, ArrayView1<f64>) -> Array1<f64> + Send + Sync + 'static,
        V: Fn(f64, ArrayView1<f64>) -> Array2<f64> + Send + Sync + 'static,
    {
        if dimension == 0 {
            return Err(SdeError::InvalidConfiguration {
                field: "dimension".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(Self {
            dimension,
            noise_dimension: dimension,
            drift_fn: Arc::new(drift_fn),
            volatility_fn: Arc::new(volatility_fn),
            correlation: None,
            boundary_fn: None,
        })
    }

    /// Overrides the number of Brownian drivers.
    pub fn with_noise_dimension(mut self, noise_dimension: usize) -> SdeResult<Self> {
        if noise_dimension == 0 {
            return Err(SdeError::InvalidConfiguration {
                field: "noise_dimension".to_string(),
                reason: "must be greater than 0".to_string(),
            });
        }
        if let Some(corr) = &self.correlation {
            validate_dimension("correlation matrix", noise_dimension, corr.dim())?;
        }
        self.noise_dimension = noise_dimension;
        Ok(self)
    }

    /// Correlates the Brownian drivers.
    pub fn with_correlation(mut self, correlation: CorrelationMatrix) -> SdeResult<Self> {
        validate_dimension("correlation matrix", self.noise_dimension, correlation.dim())?;
        self.correlation = Some(correlation);
        Ok(self)
    }

    /// Installs a projection applied to each state after every Euler step.
    pub fn with_boundary<B>(mut self, boundary_fn: B) -> Self
    where
        B: Fn(ArrayViewMut1<f64>) + Send + Sync + 'static,
    {
        self.boundary_fn = Some(Arc::new(boundary_fn));
        self
    }
}

impl fmt::Debug for GenericItoProcess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericItoProcess")
            .field("dimension", &self.dimension)
            .field("noise_dimension", &self.noise_dimension)
            .field("correlation", &self.correlation)
            .field("has_boundary", &self.boundary_fn.is_some())
            .finish()
    }
}

impl ItoProcess for GenericItoProcess {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn noise_dimension(&self) -> usize {
        self.noise_dimension
    }

    fn drift(&self, t: f64, x: ArrayView1<f64>) -> Array1<f64> {
        (self.drift_fn)(t, x)
    }

    fn volatility(&self, t: f64, x: ArrayView1<f64>) -> Array2<f64> {
        (self.volatility_fn)(t, x)
    }

    fn correlation(&self) -> Option<&CorrelationMatrix> {
        self.correlation.as_ref()
    }

    fn enforce_boundary(&self, x: ArrayViewMut1<f64>) {
        if let Some(boundary_fn) = &self.boundary_fn {
            boundary_fn(x);
        }
    }
}
