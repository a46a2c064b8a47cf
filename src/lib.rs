//! # fast-ito: Batched Monte Carlo Sampling of Itô Processes
//!
//! A Rust library for simulating sample paths of multi-dimensional Itô
//! processes with the Euler-Maruyama scheme, with correlated Brownian drivers
//! and reproducible random draws.
//!
//! ## Key Features
//!
//! - **Generic Processes**: Any drift/volatility pair via [`models::generic::GenericItoProcess`]
//! - **Batched Stepping**: All paths advance together; rows are stepped in parallel with Rayon
//! - **Correlated Noise**: Eigen-clipped square root of the Brownian correlation matrix
//! - **Reproducible Draws**: Counter-based streams, antithetic pairs, randomized Halton points
//! - **Models**: Heston stochastic volatility, geometric Brownian motion, Ornstein-Uhlenbeck
//!
//! ## Quick Start
//!
//! ```rust
//! use fast_ito::mc::config::SamplePathsConfig;
//! use fast_ito::models::heston::{HestonModel, HestonParams};
//! use fast_ito::models::ito_process::ItoProcess;
//!
//! let model = HestonModel::new(HestonParams::default()).expect("Valid parameters");
//!
//! let batch = model
//!     .sample_paths(&SamplePathsConfig {
//!         times: vec![0.25, 0.5, 1.0],
//!         num_samples: 1_000,
//!         initial_state: vec![100f64.ln(), 0.04],
//!         num_time_steps: Some(25),
//!         seed: Some(42),
//!         ..Default::default()
//!     })
//!     .expect("Valid request");
//!
//! assert_eq!(batch.shape(), (1_000, 3, 2));
//! println!("E[ln S_1] ≈ {:.4}", batch.sample_mean(2)[0]);
//! ```
//!
//! ## Mathematical Foundation
//!
//! A process of dimension `d` driven by `m` Brownian motions follows
//! `dX_t = a(t, X_t) dt + b(t, X_t) dW_t`. Each observation interval is split
//! into sub-steps and every sub-step applies
//! `X += a Δt + b ΔW` to the whole ensemble at once.

// Module declarations
pub mod correlation;
pub mod error;
pub mod math_utils;
pub mod mc;
pub mod models;
pub mod output;
pub mod parameter;
pub mod rng;
pub mod solvers;
pub mod time_grid;

// Re-export commonly used types for convenience
pub use error::{ErrorKind, SdeError, SdeResult};
pub use mc::config::SamplePathsConfig;
pub use mc::path_batch::SamplePathBatch;
pub use models::ito_process::ItoProcess;
pub use rng::RandomType;
