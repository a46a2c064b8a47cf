// src/error.rs
use std::fmt;

/// Broad classification of [`SdeError`] values.
///
/// Every caller mistake maps to `InvalidArgument` and is never worth
/// retrying; `Numerical` covers failures that depend on the data flowing
/// through the integrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    Numerical,
}

/// Custom error types for the fast-ito library
#[derive(Debug, Clone)]
pub enum SdeError {
    /// Invalid parameter values
    InvalidParameters {
        parameter: String,
        value: f64,
        constraint: String,
    },

    /// Malformed simulation request (time grid, sample count, sub-steps)
    InvalidConfiguration { field: String, reason: String },

    /// A vector or matrix does not have the shape the process requires
    DimensionMismatch {
        context: String,
        expected: usize,
        got: usize,
    },

    /// A draw source handed the integrator non-finite normals
    NumericalInstability { method: String, reason: String },
}

impl SdeError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SdeError::InvalidParameters { .. }
            | SdeError::InvalidConfiguration { .. }
            | SdeError::DimensionMismatch { .. } => ErrorKind::InvalidArgument,
            SdeError::NumericalInstability { .. } => ErrorKind::Numerical,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind() == ErrorKind::InvalidArgument
    }
}

impl fmt::Display for SdeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SdeError::InvalidParameters {
                parameter,
                value,
                constraint,
            } => {
                write!(
                    f,
                    "Invalid parameter '{}' = {}: {}",
                    parameter, value, constraint
                )
            }
            SdeError::InvalidConfiguration { field, reason } => {
                write!(f, "Invalid configuration for '{}': {}", field, reason)
            }
            SdeError::DimensionMismatch {
                context,
                expected,
                got,
            } => {
                write!(
                    f,
                    "Dimension mismatch in {}: expected {}, got {}",
                    context, expected, got
                )
            }
            SdeError::NumericalInstability { method, reason } => {
                write!(f, "Numerical instability in {}: {}", method, reason)
            }
        }
    }
}

impl std::error::Error for SdeError {}

/// Result type alias for fast-ito operations
pub type SdeResult<T> = Result<T, SdeError>;

/// Validation utilities
pub mod validation {
    use super::{SdeError, SdeResult};

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> SdeResult<()> {
        if !(value > 0.0) {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be positive (> 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> SdeResult<()> {
        if !(value >= 0.0) {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be non-negative (≥ 0)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is within a range
    pub fn validate_range(name: &str, value: f64, min: f64, max: f64) -> SdeResult<()> {
        if !(value >= min && value <= max) {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: format!("must be in range [{}, {}]", min, max),
            })
        } else {
            Ok(())
        }
    }

    /// Validate correlation parameter
    pub fn validate_correlation(name: &str, rho: f64) -> SdeResult<()> {
        validate_range(name, rho, -1.0, 1.0)
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> SdeResult<()> {
        if !value.is_finite() {
            Err(SdeError::InvalidParameters {
                parameter: name.to_string(),
                value,
                constraint: "must be finite (not NaN or infinite)".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate the number of sample paths
    pub fn validate_paths(paths: usize) -> SdeResult<()> {
        if paths == 0 {
            Err(SdeError::InvalidConfiguration {
                field: "num_samples".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate a sub-step count
    pub fn validate_steps(steps: usize) -> SdeResult<()> {
        if steps == 0 {
            Err(SdeError::InvalidConfiguration {
                field: "num_time_steps".to_string(),
                reason: "must be greater than 0".to_string(),
            })
        } else {
            Ok(())
        }
    }

    /// Validate that observation times are finite and strictly increasing
    pub fn validate_time_grid(times: &[f64]) -> SdeResult<()> {
        if times.is_empty() {
            return Err(SdeError::InvalidConfiguration {
                field: "times".to_string(),
                reason: "must contain at least one time point".to_string(),
            });
        }
        if let Some(t) = times.iter().find(|t| !t.is_finite()) {
            return Err(SdeError::InvalidConfiguration {
                field: "times".to_string(),
                reason: format!("contains a non-finite time point ({})", t),
            });
        }
        if let Some(i) = times.windows(2).position(|w| w[1] <= w[0]) {
            return Err(SdeError::InvalidConfiguration {
                field: "times".to_string(),
                reason: format!(
                    "must be strictly increasing, but times[{}] = {} and times[{}] = {}",
                    i,
                    times[i],
                    i + 1,
                    times[i + 1]
                ),
            });
        }
        Ok(())
    }

    /// Validate that a vector length matches the expected dimension
    pub fn validate_dimension(context: &str, expected: usize, got: usize) -> SdeResult<()> {
        if expected != got {
            Err(SdeError::DimensionMismatch {
                context: context.to_string(),
                expected,
                got,
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::validation::*;
    use super::*;

    #[test]
    fn test_validate_positive() {
        assert!(validate_positive("time_step", 0.2).is_ok());
        assert!(validate_positive("time_step", 0.0).is_err());
        assert!(validate_positive("time_step", -0.1).is_err());
        assert!(validate_positive("time_step", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_correlation() {
        assert!(validate_correlation("rho", 0.5).is_ok());
        assert!(validate_correlation("rho", -0.8).is_ok());
        assert!(validate_correlation("rho", 1.0).is_ok());
        assert!(validate_correlation("rho", -1.0).is_ok());
        assert!(validate_correlation("rho", 1.1).is_err());
        assert!(validate_correlation("rho", -1.1).is_err());
        assert!(validate_correlation("rho", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_finite() {
        assert!(validate_finite("value", 1.0).is_ok());
        assert!(validate_finite("value", f64::NAN).is_err());
        assert!(validate_finite("value", f64::INFINITY).is_err());
        assert!(validate_finite("value", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_validate_time_grid() {
        assert!(validate_time_grid(&[0.0]).is_ok());
        assert!(validate_time_grid(&[0.0, 0.5, 2.0]).is_ok());
        assert!(validate_time_grid(&[]).is_err());
        assert!(validate_time_grid(&[0.0, 0.5, 0.5]).is_err());
        assert!(validate_time_grid(&[1.0, 0.5]).is_err());
        assert!(validate_time_grid(&[0.0, f64::NAN]).is_err());
    }

    #[test]
    fn test_error_kind() {
        let err = SdeError::DimensionMismatch {
            context: "initial_state".to_string(),
            expected: 2,
            got: 3,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert!(validate_paths(0).unwrap_err().is_invalid_argument());

        let err = SdeError::NumericalInstability {
            method: "Euler".to_string(),
            reason: "NaN".to_string(),
        };
        assert_eq!(err.kind(), ErrorKind::Numerical);
    }

    #[test]
    fn test_error_display() {
        let error = SdeError::InvalidParameters {
            parameter: "xi".to_string(),
            value: -0.1,
            constraint: "must be non-negative".to_string(),
        };

        let display = format!("{}", error);
        assert!(display.contains("xi"));
        assert!(display.contains("-0.1"));
        assert!(display.contains("non-negative"));

        let display = format!("{}", validate_dimension("initial_state", 2, 1).unwrap_err());
        assert!(display.contains("initial_state"));
        assert!(display.contains("expected 2, got 1"));
    }
}
