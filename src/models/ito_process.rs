// src/models/ito_process.rs
//! The Itô process contract.
//!
//! A process of dimension `d` driven by `m` Brownian motions satisfies
//! ```text
//! dX_t = a(t, X_t) dt + b(t, X_t) dW_t
//! ```
//! with drift `a: R × R^d → R^d`, volatility `b: R × R^d → R^{d×m}` and
//! `dW_t` correlated according to [`ItoProcess::correlation`].

use crate::correlation::CorrelationMatrix;
use crate::error::SdeResult;
use crate::mc::config::SamplePathsConfig;
use crate::mc::path_batch::SamplePathBatch;
use crate::rng::RandomDrawSource;
use crate::solvers::euler_maruyama::EulerSampler;
use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1};

/// A diffusion process described by its drift and volatility.
///
/// Implementations must be pure: `drift` and `volatility` depend only on
/// their arguments, so the sampler may evaluate them for many paths at once.
pub trait ItoProcess: Send + Sync {
    /// Number of coupled state variables.
    fn dimension(&self) -> usize;

    /// Number of Brownian drivers (columns of the volatility matrix).
    fn noise_dimension(&self) -> usize {
        self.dimension()
    }

    /// Drift vector `a(t, x)` of length `dimension()`.
    fn drift(&self, t: f64, x: ArrayView1<f64>) -> Array1<f64>;

    /// Volatility matrix `b(t, x)` of shape `dimension() x noise_dimension()`.
    fn volatility(&self, t: f64, x: ArrayView1<f64>) -> Array2<f64>;

    /// Instantaneous correlation of the Brownian drivers; `None` means independent.
    fn correlation(&self) -> Option<&CorrelationMatrix> {
        None
    }

    /// Projects a freshly stepped state back into the admissible domain.
    fn enforce_boundary(&self, _x: ArrayViewMut1<f64>) {}

    /// Exact mean of `X_t` given `X_0 = x0`, when known in closed form.
    ///
    /// `None` also when `x0` does not have `dimension()` entries.
    fn mean(&self, _t: f64, _x0: ArrayView1<f64>) -> Option<Array1<f64>> {
        None
    }

    /// Exact covariance of `X_t` given `X_0 = x0`, when known in closed form.
    fn covariance(&self, _t: f64, _x0: ArrayView1<f64>) -> Option<Array2<f64>> {
        None
    }

    /// Simulates paths with the Euler-Maruyama scheme.
    fn sample_paths(&self, config: &SamplePathsConfig) -> SdeResult<SamplePathBatch> {
        EulerSampler::new().sample(self, config)
    }

    /// Simulates paths drawing the Gaussian increments from `source`.
    fn sample_paths_with_source(
        &self,
        config: &SamplePathsConfig,
        source: &dyn RandomDrawSource,
    ) -> SdeResult<SamplePathBatch> {
        EulerSampler::new().sample_with_source(self, config, source)
    }
}
