// src/models/ou_process.rs
use super::ito_process::ItoProcess;
use crate::error::{validation::*, SdeResult};
use ndarray::{array, Array1, Array2, ArrayView1};

/// Ornstein-Uhlenbeck process `dX = θ (μ - X) dt + σ dW`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OuProcess {
    pub theta: f64,
    pub mu: f64,
    pub sigma: f64,
}

impl OuProcess {
    pub fn new(theta: f64, mu: f64, sigma: f64) -> SdeResult<Self> {
        validate_non_negative("theta", theta)?;
        validate_finite("mu", mu)?;
        validate_non_negative("sigma", sigma)?;
        Ok(OuProcess { theta, mu, sigma })
    }
}

impl ItoProcess for OuProcess {
    fn dimension(&self) -> usize {
        1
    }

    fn drift(&self, _t: f64, x: ArrayView1<f64>) -> Array1<f64> {
        array![self.theta * (self.mu - x[0])]
    }

    fn volatility(&self, _t: f64, _x: ArrayView1<f64>) -> Array2<f64> {
        array![[self.sigma]]
    }

    fn mean(&self, t: f64, x0: ArrayView1<f64>) -> Option<Array1<f64>> {
        if x0.len() != 1 {
            return None;
        }
        let decay = (-self.theta * t).exp();
        Some(array![x0[0] * decay + self.mu * (1.0 - decay)])
    }

    fn covariance(&self, t: f64, x0: ArrayView1<f64>) -> Option<Array2<f64>> {
        if x0.len() != 1 {
            return None;
        }
        let var = if self.theta == 0.0 {
            self.sigma * self.sigma * t
        } else {
            // σ²/(2θ) (1 - e^{-2θt})
            -self.sigma * self.sigma * (-2.0 * self.theta * t).exp_m1() / (2.0 * self.theta)
        };
        Some(array![[var]])
    }
}
