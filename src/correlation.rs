// src/correlation.rs
//! Correlation structure among the Brownian drivers of a process.
//!
//! # Matrix Square Root
//!
//! Correlated increments are produced as `ΔW = √Δt · Z · Cᵀ` where `C` is a
//! square root of the correlation matrix `Σ`. Rather than a Cholesky factor,
//! the symmetric root is built from the eigen-decomposition
//! ```text
//! Σ = Q Λ Qᵀ,    C = Q √max(Λ, 0) Qᵀ
//! ```
//! Negative eigenvalues produced by rounding on (near-)singular inputs such as
//! `ρ = ±1` are clipped to zero, so the root always exists.

use crate::error::{validation::*, SdeError, SdeResult};
use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::Array2;

/// Tolerance for symmetry and unit-diagonal checks.
const STRUCTURE_TOLERANCE: f64 = 1e-12;

/// A validated correlation matrix together with its stable square root.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    matrix: Array2<f64>,
    sqrt: Array2<f64>,
}

impl CorrelationMatrix {
    /// Builds a correlation matrix from a square array.
    ///
    /// The matrix must be symmetric with unit diagonal and entries in
    /// `[-1, 1]`. Positive semi-definiteness is not required: the square root
    /// clips whatever negative spectrum remains.
    pub fn new(matrix: Array2<f64>) -> SdeResult<Self> {
        let (rows, cols) = matrix.dim();
        validate_dimension("correlation matrix columns", rows, cols)?;
        if rows == 0 {
            return Err(SdeError::InvalidConfiguration {
                field: "correlation".to_string(),
                reason: "matrix must not be empty".to_string(),
            });
        }

        for i in 0..rows {
            if (matrix[[i, i]] - 1.0).abs() > STRUCTURE_TOLERANCE {
                return Err(SdeError::InvalidParameters {
                    parameter: format!("correlation[{}][{}]", i, i),
                    value: matrix[[i, i]],
                    constraint: "diagonal entries must equal 1".to_string(),
                });
            }
            for j in 0..i {
                validate_correlation(&format!("correlation[{}][{}]", i, j), matrix[[i, j]])?;
                if (matrix[[i, j]] - matrix[[j, i]]).abs() > STRUCTURE_TOLERANCE {
                    return Err(SdeError::InvalidConfiguration {
                        field: "correlation".to_string(),
                        reason: format!("matrix is not symmetric at ({}, {})", i, j),
                    });
                }
            }
        }

        let sqrt = stable_sqrt(&matrix);
        Ok(Self { matrix, sqrt })
    }

    /// Two-factor correlation `[[1, ρ], [ρ, 1]]`.
    pub fn two_factor(rho: f64) -> SdeResult<Self> {
        validate_correlation("rho", rho)?;
        Self::new(ndarray::arr2(&[[1.0, rho], [rho, 1.0]]))
    }

    pub fn identity(dim: usize) -> SdeResult<Self> {
        Self::new(Array2::eye(dim))
    }

    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn matrix(&self) -> &Array2<f64> {
        &self.matrix
    }

    /// Symmetric square root `C` with `C Cᵀ ≈ Σ`.
    pub fn sqrt(&self) -> &Array2<f64> {
        &self.sqrt
    }
}

/// Symmetric positive semi-definite square root via eigen-decomposition with
/// negative eigenvalues clipped to zero.
pub fn stable_sqrt(matrix: &Array2<f64>) -> Array2<f64> {
    let n = matrix.nrows();
    let m = DMatrix::from_fn(n, n, |i, j| 0.5 * (matrix[[i, j]] + matrix[[j, i]]));
    let eigen = SymmetricEigen::new(m);
    let root_values = eigen.eigenvalues.map(|lambda| lambda.max(0.0).sqrt());
    let q = &eigen.eigenvectors;
    let root = q * DMatrix::from_diagonal(&root_values) * q.transpose();
    Array2::from_shape_fn((n, n), |(i, j)| root[(i, j)])
}
