// src/solvers/euler_maruyama.rs
//! Euler-Maruyama Scheme for Itô Process Integration
//!
//! # Mathematical Framework
//!
//! For a `d`-dimensional SDE driven by `m` correlated Brownian motions:
//! ```text
//! dX_t = a(t, X_t) dt + b(t, X_t) dW_t,    d⟨W⟩_t = Σ dt
//! ```
//!
//! The Euler-Maruyama scheme provides the discretization:
//! ```text
//! X_{n+1} = X_n + a(t_n, X_n) Δt + b(t_n, X_n) ΔW_n,    ΔW_n = √Δt · C Z_n
//! ```
//!
//! Where:
//! - `Z_n ~ N(0, I_m)` are drawn from a [`RandomDrawSource`]
//! - `C` is the eigen-clipped square root of `Σ` (identity when uncorrelated)
//!
//! # Batching
//!
//! The whole ensemble lives in one `(num_samples, d)` matrix. Each sub-step
//! pulls a `(num_samples, m)` block of draws and advances every row in
//! parallel; only the time loop is sequential.
//!
//! # Convergence Properties
//!
//! - **Strong convergence**: Order 0.5 in step size
//! - **Weak convergence**: Order 1.0 in step size

use crate::error::{validation::*, SdeError, SdeResult};
use crate::mc::config::SamplePathsConfig;
use crate::mc::path_batch::SamplePathBatch;
use crate::models::ito_process::ItoProcess;
use crate::rng::{DrawRequest, RandomDrawSource, RandomType, StandardDrawSource};
use ndarray::{s, Array1, Array2, Array3, ArrayView1, Axis, Zip};
use rayon::prelude::*;
use tracing::debug;

/// Batched Euler-Maruyama sampler
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerSampler;

impl EulerSampler {
    pub fn new() -> Self {
        EulerSampler
    }

    /// Simulates `config.num_samples` paths using the library's draw source.
    pub fn sample<P: ItoProcess + ?Sized>(
        &self,
        process: &P,
        config: &SamplePathsConfig,
    ) -> SdeResult<SamplePathBatch> {
        let source = match config.random_type {
            RandomType::Halton => {
                let num_steps = config
                    .time_grid()?
                    .refine(config.start_time, config.resolution())?
                    .num_steps();
                StandardDrawSource::for_steps(num_steps, process.noise_dimension())
            }
            RandomType::Pseudo | RandomType::PseudoAntithetic => StandardDrawSource::new(),
        };
        self.sample_with_source(process, config, &source)
    }

    /// Simulates paths with increments drawn from `source`.
    ///
    /// # Algorithm
    ///
    /// 1. Validate the request and probe drift/volatility shapes at the
    ///    initial state (no draw is consumed on failure)
    /// 2. Refine the observation grid into sub-steps
    /// 3. For each sub-step: draw, correlate, scale by `√Δt`, step all paths
    /// 4. Copy the ensemble out whenever a sub-step lands on an observation
    pub fn sample_with_source<P, S>(
        &self,
        process: &P,
        config: &SamplePathsConfig,
        source: &S,
    ) -> SdeResult<SamplePathBatch>
    where
        P: ItoProcess + ?Sized,
        S: RandomDrawSource + ?Sized,
    {
        let dim = process.dimension();
        let noise_dim = process.noise_dimension();
        config.validate(dim)?;
        let grid = config.time_grid()?;
        let refined = grid.refine(config.start_time, config.resolution())?;

        let x0 = Array1::from(config.initial_state.clone());
        Self::check_shapes(process, config.start_time, x0.view())?;
        let corr_sqrt = match process.correlation() {
            Some(corr) => {
                validate_dimension("correlation matrix", noise_dim, corr.dim())?;
                Some(corr.sqrt().clone())
            }
            None => None,
        };

        let n = config.num_samples;
        let seed = config.seed.unwrap_or_else(rand::random);
        debug!(
            num_samples = n,
            num_times = grid.len(),
            num_steps = refined.num_steps(),
            dimension = dim,
            noise_dimension = noise_dim,
            random_type = ?config.random_type,
            seed,
            "starting Euler-Maruyama simulation"
        );

        let mut states = Array2::from_shape_fn((n, dim), |(_, j)| x0[j]);
        let mut out = Array3::<f64>::zeros((n, grid.len(), dim));
        let mut record = refined.record_at.iter().enumerate().peekable();

        while let Some((k, _)) = record.next_if(|&(_, &at)| at == 0) {
            out.slice_mut(s![.., k, ..]).assign(&states);
        }

        for step in 0..refined.num_steps() {
            let t = refined.points[step];
            let dt = refined.points[step + 1] - t;

            let request = DrawRequest {
                num_samples: n,
                noise_dim,
                step,
                seed,
                random_type: config.random_type,
            };
            let draws = source.draw(&request);
            if draws.dim() != request.shape() {
                return Err(SdeError::DimensionMismatch {
                    context: "random draws".to_string(),
                    expected: n * noise_dim,
                    got: draws.len(),
                });
            }
            if let Some(bad) = draws.iter().find(|z| !z.is_finite()) {
                return Err(SdeError::NumericalInstability {
                    method: "Euler-Maruyama".to_string(),
                    reason: format!("non-finite draw {} at sub-step {}", bad, step),
                });
            }

            let mut dw = match &corr_sqrt {
                Some(c) => draws.dot(&c.t()),
                None => draws,
            };
            dw *= dt.sqrt();

            Self::step(process, t, dt, &mut states, &dw)?;

            while let Some((k, _)) = record.next_if(|&(_, &at)| at == step + 1) {
                out.slice_mut(s![.., k, ..]).assign(&states);
            }
        }

        Ok(SamplePathBatch::new(grid.times().to_vec(), out))
    }

    /// One Euler-Maruyama step for the whole ensemble
    ///
    /// `states` has one row per path; `dw` holds the matching rows of
    /// already-scaled Brownian increments.
    pub fn step<P: ItoProcess + ?Sized>(
        process: &P,
        t: f64,
        dt: f64,
        states: &mut Array2<f64>,
        dw: &Array2<f64>,
    ) -> SdeResult<()> {
        let dim = process.dimension();
        let noise_dim = process.noise_dimension();

        states
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .zip(dw.axis_iter(Axis(0)).into_par_iter())
            .try_for_each(|(mut x, dw)| {
                let mu = process.drift(t, x.view());
                let sigma = process.volatility(t, x.view());
                validate_dimension("drift", dim, mu.len())?;
                if sigma.dim() != (dim, noise_dim) {
                    return Err(SdeError::DimensionMismatch {
                        context: "volatility".to_string(),
                        expected: dim * noise_dim,
                        got: sigma.len(),
                    });
                }

                // A zero volatility row contributes an exact zero, never NaN.
                let diffusion = sigma.dot(&dw);
                Zip::from(&mut x)
                    .and(&mu)
                    .and(&diffusion)
                    .for_each(|xi, &a, &b| *xi += a * dt + b);
                process.enforce_boundary(x.view_mut());
                Ok(())
            })
    }

    fn check_shapes<P: ItoProcess + ?Sized>(
        process: &P,
        t: f64,
        x: ArrayView1<f64>,
    ) -> SdeResult<()> {
        let dim = process.dimension();
        let noise_dim = process.noise_dimension();
        validate_dimension("drift", dim, process.drift(t, x).len())?;
        let sigma = process.volatility(t, x);
        validate_dimension("volatility rows", dim, sigma.nrows())?;
        validate_dimension("volatility columns", noise_dim, sigma.ncols())
    }
}
