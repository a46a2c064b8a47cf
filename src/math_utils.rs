// src/math_utils.rs
use statrs::function::erf;
use std::f64::consts::SQRT_2;

pub fn norm_cdf(x: f64) -> f64 {
    0.5 * (1.0 + erf::erf(x / SQRT_2))
}

/// Inverse of the standard normal CDF on the open interval (0, 1).
///
/// Inputs are clamped away from 0 and 1 so the result is always finite.
pub fn norm_inv_cdf(p: f64) -> f64 {
    let p = p.clamp(f64::EPSILON, 1.0 - f64::EPSILON);
    -SQRT_2 * erf::erfc_inv(2.0 * p)
}

/// The first `n` prime numbers, used as Halton bases.
pub fn first_primes(n: usize) -> Vec<u64> {
    let mut primes: Vec<u64> = Vec::with_capacity(n);
    let mut candidate = 2u64;
    while primes.len() < n {
        if primes
            .iter()
            .take_while(|&&p| p * p <= candidate)
            .all(|&p| candidate % p != 0)
        {
            primes.push(candidate);
        }
        candidate += 1;
    }
    primes
}

pub struct Timer {
    start_time: std::time::Instant,
}

impl Timer {
    pub fn new() -> Timer {
        Timer {
            start_time: std::time::Instant::now(),
        }
    }

    pub fn start(&mut self) {
        self.start_time = std::time::Instant::now();
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64() * 1000.0
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_norm_inv_cdf_inverts_cdf() {
        for &x in &[-3.0, -1.2, -0.1, 0.0, 0.4, 1.96, 2.5] {
            assert_abs_diff_eq!(norm_inv_cdf(norm_cdf(x)), x, epsilon = 1e-8);
        }
        assert_abs_diff_eq!(norm_inv_cdf(0.5), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_norm_inv_cdf_is_finite_at_edges() {
        assert!(norm_inv_cdf(0.0).is_finite());
        assert!(norm_inv_cdf(1.0).is_finite());
    }

    #[test]
    fn test_first_primes() {
        assert_eq!(first_primes(0), Vec::<u64>::new());
        assert_eq!(first_primes(8), vec![2, 3, 5, 7, 11, 13, 17, 19]);
    }
}
