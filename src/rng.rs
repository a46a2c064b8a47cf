// src/rng.rs
//! Random Number Generation for Path Simulation
//!
//! # Design Philosophy
//!
//! The Euler sampler consumes one block of standard normals per sub-step.
//! Those blocks must be:
//! 1. **Reproducible**: same seed → bit-identical paths
//! 2. **Batch independent**: the value drawn for (sub-step, path) never depends
//!    on how many threads filled the block or in which order
//! 3. **Explicitly seeded**: no ambient global generator state
//!
//! # Counter-Based RNG
//!
//! Every (seed, sub-step, path) triple is hashed into its own stream of a
//! splitmix64 counter generator, so rows of a draw block can be filled in
//! parallel without coordination.
//!
//! # Draw Modes
//!
//! - [`RandomType::Pseudo`]: i.i.d. pseudo-random normals
//! - [`RandomType::PseudoAntithetic`]: rows `i` and `i + n/2` are exact negations
//! - [`RandomType::Halton`]: Halton points with random digit permutations,
//!   mapped through the inverse normal CDF

use crate::math_utils::{first_primes, norm_inv_cdf};
use ndarray::{Array2, Axis};
use rand::seq::SliceRandom;
use rand::RngCore;
use rand_distr::{Distribution, StandardNormal};
use rayon::prelude::*;
use std::ops::Range;

/// Stream index reserved for the Halton digit permutations.
const HALTON_SCRAMBLE_STREAM: u64 = u64::MAX;
/// Keeps Halton jitter streams apart from the pseudo-random ones.
const HALTON_JITTER_SALT: u64 = 0x5851_f42d_4c95_7f2d;

fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9u64);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111ebu64);
    z ^ (z >> 31)
}

/// Counter-based RNG for reproducible parallel simulations
///
/// # Algorithm
///
/// Uses splitmix64 over `base_seed + counter`:
/// ```text
/// z = base_seed + counter
/// z = (z ⊕ (z >> 30)) * 0xbf58476d1ce4e5b9
/// z = (z ⊕ (z >> 27)) * 0x94d049bb133111eb
/// output = z ⊕ (z >> 31)
/// ```
#[derive(Debug, Clone)]
pub struct CounterRng {
    base_seed: u64,
    counter: u64,
}

impl CounterRng {
    pub fn new(base_seed: u64, counter: u64) -> Self {
        Self { base_seed, counter }
    }

    /// Generator dedicated to one path of one sub-step.
    pub fn for_stream(seed: u64, step: u64, path: u64) -> Self {
        let base_seed = splitmix64(seed ^ splitmix64(step));
        Self::new(base_seed, path << 32)
    }

    pub fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / 9007199254740992.0) // 2^53
    }

    pub fn normal(&mut self) -> f64 {
        StandardNormal.sample(self)
    }
}

impl RngCore for CounterRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    fn next_u64(&mut self) -> u64 {
        self.counter = self.counter.wrapping_add(1);
        let mut z = self.base_seed.wrapping_add(self.counter);
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9u64);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111ebu64);
        z ^ (z >> 31)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(8) {
            let bytes = self.next_u64().to_le_bytes();
            chunk.copy_from_slice(&bytes[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// How the standard normals driving the simulation are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RandomType {
    #[default]
    Pseudo,
    PseudoAntithetic,
    Halton,
}

/// One block of draws: `num_samples x noise_dim` normals for sub-step `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawRequest {
    pub num_samples: usize,
    pub noise_dim: usize,
    pub step: usize,
    pub seed: u64,
    pub random_type: RandomType,
}

impl DrawRequest {
    pub fn shape(&self) -> (usize, usize) {
        (self.num_samples, self.noise_dim)
    }
}

/// Supplier of standard-normal draws to the sampler.
///
/// Implementations must be deterministic: the same request always yields the
/// same block.
pub trait RandomDrawSource: Send + Sync {
    fn draw(&self, request: &DrawRequest) -> Array2<f64>;
}

/// Halton sequence with a pre-computed table of prime bases.
#[derive(Debug, Clone, Default)]
pub struct HaltonSequence {
    bases: Vec<u64>,
}

impl HaltonSequence {
    pub fn new(dimension: usize) -> Self {
        Self {
            bases: first_primes(dimension),
        }
    }

    pub fn dimension(&self) -> usize {
        self.bases.len()
    }

    /// Radical inverse of `index` in base `base`.
    pub fn radical_inverse(mut index: u64, base: u64) -> f64 {
        let inv_base = 1.0 / base as f64;
        let mut factor = inv_base;
        let mut value = 0.0;
        while index > 0 {
            value += (index % base) as f64 * factor;
            index /= base;
            factor *= inv_base;
        }
        value
    }

    /// Bases of the coordinates in `dims`. Coordinates past the table are
    /// covered by one prime search for the whole range.
    pub fn bases(&self, dims: Range<usize>) -> Vec<u64> {
        if dims.end <= self.bases.len() {
            self.bases[dims].to_vec()
        } else {
            first_primes(dims.end)[dims].to_vec()
        }
    }
}

/// Random digit permutations for one Halton coordinate.
///
/// Digit `k` of the index is sent through its own permutation of
/// `0..base`, which keeps the stratification of the sequence while
/// breaking the near-linear dependence of large-base coordinates on the
/// point index.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitScramble {
    base: u64,
    permutations: Vec<Vec<u64>>,
}

impl DigitScramble {
    /// Scramble covering indices below `base^num_digits`.
    pub fn new<R: RngCore + ?Sized>(base: u64, num_digits: usize, rng: &mut R) -> Self {
        let permutations = (0..num_digits.max(1))
            .map(|_| {
                let mut permutation: Vec<u64> = (0..base).collect();
                permutation.shuffle(rng);
                permutation
            })
            .collect();
        Self { base, permutations }
    }

    /// Number of base-`base` digits needed to write `max_index`.
    pub fn digits_for(max_index: u64, base: u64) -> usize {
        let mut digits = 1;
        let mut remaining = max_index / base;
        while remaining > 0 {
            digits += 1;
            remaining /= base;
        }
        digits
    }

    /// Scrambled radical inverse of `index`, placed uniformly inside its
    /// finest cell by `jitter ∈ [0, 1)`. The result lies in `[0, 1)`.
    pub fn apply(&self, mut index: u64, jitter: f64) -> f64 {
        let inv_base = 1.0 / self.base as f64;
        let mut cell = 1.0;
        let mut value = 0.0;
        for permutation in &self.permutations {
            cell *= inv_base;
            value += permutation[(index % self.base) as usize] as f64 * cell;
            index /= self.base;
        }
        (value + jitter * cell).min(1.0 - f64::EPSILON)
    }
}

/// The library's draw source: counter-based pseudo-random normals, their
/// antithetic variant, and digit-scrambled Halton points.
#[derive(Debug, Clone, Default)]
pub struct StandardDrawSource {
    halton: HaltonSequence,
}

impl StandardDrawSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-computes Halton bases for `num_steps` sub-steps of `noise_dim` draws.
    pub fn for_steps(num_steps: usize, noise_dim: usize) -> Self {
        Self {
            halton: HaltonSequence::new(num_steps * noise_dim),
        }
    }

    fn fill_pseudo(row: &mut [f64], seed: u64, step: usize, stream: usize, sign: f64) {
        let mut rng = CounterRng::for_stream(seed, step as u64, stream as u64);
        for z in row.iter_mut() {
            *z = sign * rng.normal();
        }
    }

    /// Scrambles for the coordinates of one sub-step, built once per request.
    fn halton_scrambles(&self, request: &DrawRequest) -> Vec<DigitScramble> {
        let first = request.step * request.noise_dim;
        let max_index = request.num_samples as u64;
        self.halton
            .bases(first..first + request.noise_dim)
            .into_iter()
            .enumerate()
            .map(|(j, base)| {
                let mut rng =
                    CounterRng::for_stream(request.seed, HALTON_SCRAMBLE_STREAM, (first + j) as u64);
                DigitScramble::new(base, DigitScramble::digits_for(max_index, base), &mut rng)
            })
            .collect()
    }

    fn fill_halton(row: &mut [f64], scrambles: &[DigitScramble], seed: u64, step: usize, path: usize) {
        let mut jitter = CounterRng::for_stream(seed ^ HALTON_JITTER_SALT, step as u64, path as u64);
        for (z, scramble) in row.iter_mut().zip(scrambles) {
            *z = norm_inv_cdf(scramble.apply(path as u64 + 1, jitter.uniform()));
        }
    }
}

impl RandomDrawSource for StandardDrawSource {
    fn draw(&self, request: &DrawRequest) -> Array2<f64> {
        let n = request.num_samples;
        let paired = n / 2;
        let mut draws = Array2::<f64>::zeros(request.shape());
        let scrambles = match request.random_type {
            RandomType::Halton => self.halton_scrambles(request),
            RandomType::Pseudo | RandomType::PseudoAntithetic => Vec::new(),
        };

        draws
            .axis_iter_mut(Axis(0))
            .into_par_iter()
            .enumerate()
            .for_each(|(i, mut row)| {
                let mut buffer = vec![0.0; request.noise_dim];
                match request.random_type {
                    RandomType::Pseudo => {
                        Self::fill_pseudo(&mut buffer, request.seed, request.step, i, 1.0)
                    }
                    RandomType::PseudoAntithetic => {
                        // Rows [paired, 2 * paired) mirror rows [0, paired); an odd
                        // trailing row gets the first unused stream.
                        let (stream, sign) = if i < paired {
                            (i, 1.0)
                        } else if i < 2 * paired {
                            (i - paired, -1.0)
                        } else {
                            (paired, 1.0)
                        };
                        Self::fill_pseudo(&mut buffer, request.seed, request.step, stream, sign)
                    }
                    RandomType::Halton => {
                        Self::fill_halton(&mut buffer, &scrambles, request.seed, request.step, i)
                    }
                }
                row.iter_mut().zip(buffer).for_each(|(z, value)| *z = value);
            });

        draws
    }
}
