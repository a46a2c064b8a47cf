// src/models/heston.rs
//! Heston Stochastic Volatility Model
//!
//! # Mathematical Framework
//!
//! The state is `(X_t, V_t)` with `X_t = ln S_t`:
//! ```text
//! dX_t = (r(t) - q(t) - V_t⁺/2) dt + √V_t⁺ dW_t^(1)
//! dV_t = κ(θ(t) - V_t) dt + ξ√V_t⁺ dW_t^(2)
//! d⟨W^(1), W^(2)⟩_t = ρ dt
//! ```
//!
//! Where:
//! - r, q: Risk-free rate and dividend yield (possibly time-dependent)
//! - κ: Mean reversion speed for variance
//! - θ: Long-term variance level (possibly time-dependent)
//! - ξ: Volatility of variance (vol-of-vol)
//! - ρ: Correlation between the two Brownian drivers
//! - V⁺ = max(V, 0)
//!
//! # Feller Condition
//!
//! The continuous variance process stays strictly positive when
//! ```text
//! 2κθ > ξ²
//! ```
//!
//! The Euler scheme can still step below zero, so every step is followed by
//! the configured [`VarianceBoundary`].

use super::generic::GenericItoProcess;
use super::ito_process::ItoProcess;
use crate::correlation::CorrelationMatrix;
use crate::error::{validation::*, SdeResult};
use crate::mc::config::SamplePathsConfig;
use crate::mc::path_batch::SamplePathBatch;
use crate::parameter::{Constant, TimeDependentParameter};
use crate::rng::RandomDrawSource;
use ndarray::{array, Array1, Array2, ArrayView1, ArrayViewMut1};
use std::fmt;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HestonParams {
    pub r: f64,     // Risk-free rate
    pub q: f64,     // Dividend yield
    pub kappa: f64, // Mean reversion speed
    pub theta: f64, // Long-term variance
    pub xi: f64,    // Volatility of variance (vol-of-vol)
    pub rho: f64,   // Correlation between log-spot and variance
}

impl HestonParams {
    pub fn validate(&self) -> SdeResult<()> {
        validate_finite("r", self.r)?;
        validate_finite("q", self.q)?;
        validate_finite("kappa", self.kappa)?;
        validate_non_negative("kappa", self.kappa)?;
        validate_finite("theta", self.theta)?;
        validate_non_negative("theta", self.theta)?;
        validate_finite("xi", self.xi)?;
        validate_non_negative("xi", self.xi)?;
        validate_correlation("rho", self.rho)
    }

    /// `2κθ > ξ²`
    pub fn feller_condition_holds(&self) -> bool {
        2.0 * self.kappa * self.theta > self.xi * self.xi
    }
}

impl Default for HestonParams {
    fn default() -> Self {
        HestonParams {
            r: 0.05,
            q: 0.0,
            kappa: 2.0,
            theta: 0.04,
            xi: 0.3,
            rho: -0.7,
        }
    }
}

/// What happens to a variance that an Euler step pushed below zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum VarianceBoundary {
    /// `v ← max(v, 0)`
    #[default]
    Clamp,
    /// `v ← |v|`
    Reflect,
}

impl VarianceBoundary {
    pub fn apply(self, v: f64) -> f64 {
        match self {
            VarianceBoundary::Clamp => v.max(0.0),
            VarianceBoundary::Reflect => v.abs(),
        }
    }
}

/// Heston model over `(log-spot, variance)`, simulated through a
/// [`GenericItoProcess`].
#[derive(Clone)]
pub struct HestonModel {
    params: HestonParams,
    boundary: VarianceBoundary,
    rate: Arc<dyn TimeDependentParameter>,
    dividend_yield: Arc<dyn TimeDependentParameter>,
    long_run_variance: Arc<dyn TimeDependentParameter>,
    constant_coefficients: bool,
    process: GenericItoProcess,
}

impl HestonModel {
    pub fn new(params: HestonParams) -> SdeResult<Self> {
        Self::new_with_boundary(params, VarianceBoundary::default())
    }

    pub fn new_with_boundary(params: HestonParams, boundary: VarianceBoundary) -> SdeResult<Self> {
        params.validate()?;
        if !params.feller_condition_holds() {
            warn!(
                kappa = params.kappa,
                theta = params.theta,
                xi = params.xi,
                "Feller condition violated (2κθ ≤ ξ²); variance may reach zero"
            );
        }

        let rate: Arc<dyn TimeDependentParameter> = Arc::new(Constant(params.r));
        let dividend_yield: Arc<dyn TimeDependentParameter> = Arc::new(Constant(params.q));
        let long_run_variance: Arc<dyn TimeDependentParameter> = Arc::new(Constant(params.theta));
        let process = Self::build_process(
            &params,
            boundary,
            Arc::clone(&rate),
            Arc::clone(&dividend_yield),
            Arc::clone(&long_run_variance),
        )?;

        Ok(HestonModel {
            params,
            boundary,
            rate,
            dividend_yield,
            long_run_variance,
            constant_coefficients: true,
            process,
        })
    }

    /// Replaces the constant `r` with a time-dependent rate.
    pub fn with_rate<P: TimeDependentParameter + 'static>(mut self, rate: P) -> SdeResult<Self> {
        self.rate = Arc::new(rate);
        self.rebuild()
    }

    /// Replaces the constant `q` with a time-dependent dividend yield.
    pub fn with_dividend_yield<P: TimeDependentParameter + 'static>(
        mut self,
        dividend_yield: P,
    ) -> SdeResult<Self> {
        self.dividend_yield = Arc::new(dividend_yield);
        self.rebuild()
    }

    /// Replaces the constant `θ` with a time-dependent long-run variance.
    pub fn with_long_run_variance<P: TimeDependentParameter + 'static>(
        mut self,
        long_run_variance: P,
    ) -> SdeResult<Self> {
        self.long_run_variance = Arc::new(long_run_variance);
        self.rebuild()
    }

    pub fn params(&self) -> &HestonParams {
        &self.params
    }

    pub fn boundary(&self) -> VarianceBoundary {
        self.boundary
    }

    fn rebuild(mut self) -> SdeResult<Self> {
        self.constant_coefficients = false;
        self.process = Self::build_process(
            &self.params,
            self.boundary,
            Arc::clone(&self.rate),
            Arc::clone(&self.dividend_yield),
            Arc::clone(&self.long_run_variance),
        )?;
        Ok(self)
    }

    fn build_process(
        params: &HestonParams,
        boundary: VarianceBoundary,
        rate: Arc<dyn TimeDependentParameter>,
        dividend_yield: Arc<dyn TimeDependentParameter>,
        long_run_variance: Arc<dyn TimeDependentParameter>,
    ) -> SdeResult<GenericItoProcess> {
        let kappa = params.kappa;
        let xi = params.xi;

        let process = GenericItoProcess::new(
            2,
            move |t, x| {
                let v = x[1];
                array![
                    rate.value(t) - dividend_yield.value(t) - 0.5 * v.max(0.0),
                    kappa * (long_run_variance.value(t) - v)
                ]
            },
            move |_t, x| {
                let sqrt_v = x[1].max(0.0).sqrt();
                array![[sqrt_v, 0.0], [0.0, xi * sqrt_v]]
            },
        )?
        .with_correlation(CorrelationMatrix::two_factor(params.rho)?)?
        .with_boundary(move |mut x| x[1] = boundary.apply(x[1]));

        Ok(process)
    }

    fn validate_initial_state(config: &SamplePathsConfig) -> SdeResult<()> {
        validate_dimension("initial_state", 2, config.initial_state.len())?;
        validate_non_negative("initial variance", config.initial_state[1])
    }
}

impl fmt::Debug for HestonModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HestonModel")
            .field("params", &self.params)
            .field("boundary", &self.boundary)
            .field("constant_coefficients", &self.constant_coefficients)
            .finish()
    }
}

impl ItoProcess for HestonModel {
    fn dimension(&self) -> usize {
        self.process.dimension()
    }

    fn noise_dimension(&self) -> usize {
        self.process.noise_dimension()
    }

    fn drift(&self, t: f64, x: ArrayView1<f64>) -> Array1<f64> {
        self.process.drift(t, x)
    }

    fn volatility(&self, t: f64, x: ArrayView1<f64>) -> Array2<f64> {
        self.process.volatility(t, x)
    }

    fn correlation(&self) -> Option<&CorrelationMatrix> {
        self.process.correlation()
    }

    fn enforce_boundary(&self, x: ArrayViewMut1<f64>) {
        self.process.enforce_boundary(x)
    }

    /// Exact first moments of `(ln S_t, V_t)`; only available while all
    /// coefficients are constant.
    fn mean(&self, t: f64, x0: ArrayView1<f64>) -> Option<Array1<f64>> {
        if !self.constant_coefficients || x0.len() != 2 {
            return None;
        }
        let HestonParams {
            r,
            q,
            kappa,
            theta,
            ..
        } = self.params;
        let v0 = x0[1];

        // ∫₀ᵗ E[V_s] ds
        let integrated_variance = if kappa == 0.0 {
            v0 * t
        } else {
            theta * t - (v0 - theta) * (-kappa * t).exp_m1() / kappa
        };
        let mean_variance = theta + (v0 - theta) * (-kappa * t).exp();
        let mean_log_spot = x0[0] + (r - q) * t - 0.5 * integrated_variance;
        Some(array![mean_log_spot, mean_variance])
    }

    fn sample_paths(&self, config: &SamplePathsConfig) -> SdeResult<SamplePathBatch> {
        Self::validate_initial_state(config)?;
        self.process.sample_paths(config)
    }

    fn sample_paths_with_source(
        &self,
        config: &SamplePathsConfig,
        source: &dyn RandomDrawSource,
    ) -> SdeResult<SamplePathBatch> {
        Self::validate_initial_state(config)?;
        self.process.sample_paths_with_source(config, source)
    }
}
