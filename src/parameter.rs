// src/parameter.rs
//! Coefficients that may vary with time.
//!
//! Models take their rate-like inputs through these traits so that a plain
//! constant, a closure, or any piecewise schedule supplied by the caller can be
//! plugged in without the model knowing which.

use ndarray::Array1;

/// A scalar coefficient `t ↦ value(t)`. Must be a pure function of `t`.
pub trait TimeDependentParameter: Send + Sync {
    fn value(&self, t: f64) -> f64;
}

/// A vector-valued coefficient `t ↦ value(t)`. Must be a pure function of `t`.
pub trait VectorParameter: Send + Sync {
    fn value(&self, t: f64) -> Array1<f64>;
}

/// A coefficient that does not depend on time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constant(pub f64);

impl TimeDependentParameter for Constant {
    fn value(&self, _t: f64) -> f64 {
        self.0
    }
}

/// A vector coefficient that does not depend on time.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantVector(pub Array1<f64>);

impl VectorParameter for ConstantVector {
    fn value(&self, _t: f64) -> Array1<f64> {
        self.0.clone()
    }
}

impl<F> TimeDependentParameter for F
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn value(&self, t: f64) -> f64 {
        self(t)
    }
}

impl<F> VectorParameter for F
where
    F: Fn(f64) -> Array1<f64> + Send + Sync,
{
    fn value(&self, t: f64) -> Array1<f64> {
        self(t)
    }
}
