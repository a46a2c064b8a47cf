// src/models/gbm.rs
use super::ito_process::ItoProcess;
use crate::error::{validation::*, SdeResult};
use ndarray::{array, Array1, Array2, ArrayView1};

/// Geometric Brownian motion `dX = μ X dt + σ X dW`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gbm {
    pub mu: f64,
    pub sigma: f64,
}

impl Gbm {
    pub fn new(mu: f64, sigma: f64) -> SdeResult<Self> {
        validate_finite("mu", mu)?;
        validate_non_negative("sigma", sigma)?;
        Ok(Gbm { mu, sigma })
    }

    /// Exact log-normal transition over `dt` for a standard normal draw.
    pub fn exact_step(&self, x: f64, dt: f64, normal_draw: f64) -> f64 {
        x * ((self.mu - 0.5 * self.sigma * self.sigma) * dt + self.sigma * dt.sqrt() * normal_draw).exp()
    }
}

impl ItoProcess for Gbm {
    fn dimension(&self) -> usize {
        1
    }

    fn drift(&self, _t: f64, x: ArrayView1<f64>) -> Array1<f64> {
        array![self.mu * x[0]]
    }

    fn volatility(&self, _t: f64, x: ArrayView1<f64>) -> Array2<f64> {
        array![[self.sigma * x[0]]]
    }

    fn mean(&self, t: f64, x0: ArrayView1<f64>) -> Option<Array1<f64>> {
        if x0.len() != 1 {
            return None;
        }
        Some(array![x0[0] * (self.mu * t).exp()])
    }

    fn covariance(&self, t: f64, x0: ArrayView1<f64>) -> Option<Array2<f64>> {
        if x0.len() != 1 {
            return None;
        }
        let var = x0[0] * x0[0] * (2.0 * self.mu * t).exp() * ((self.sigma * self.sigma * t).exp_m1());
        Some(array![[var]])
    }
}
