// src/mc/path_batch.rs
use ndarray::{s, Array1, Array3, ArrayView2, Axis};

/// Simulated states of shape `(num_samples, num_times, dimension)`.
///
/// Entry `[i, k, j]` is component `j` of path `i` at `times()[k]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePathBatch {
    times: Vec<f64>,
    values: Array3<f64>,
}

impl SamplePathBatch {
    pub(crate) fn new(times: Vec<f64>, values: Array3<f64>) -> Self {
        debug_assert_eq!(times.len(), values.len_of(Axis(1)));
        Self { times, values }
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        self.values.dim()
    }

    pub fn num_samples(&self) -> usize {
        self.values.len_of(Axis(0))
    }

    pub fn num_times(&self) -> usize {
        self.values.len_of(Axis(1))
    }

    pub fn dimension(&self) -> usize {
        self.values.len_of(Axis(2))
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn values(&self) -> &Array3<f64> {
        &self.values
    }

    pub fn into_array(self) -> Array3<f64> {
        self.values
    }

    /// One path, shape `(num_times, dimension)`.
    pub fn path(&self, sample: usize) -> ArrayView2<f64> {
        self.values.index_axis(Axis(0), sample)
    }

    /// Cross-section at an observation, shape `(num_samples, dimension)`.
    pub fn at_time(&self, time_index: usize) -> ArrayView2<f64> {
        self.values.index_axis(Axis(1), time_index)
    }

    /// One state component across all paths and times, shape `(num_samples, num_times)`.
    pub fn component(&self, component: usize) -> ArrayView2<f64> {
        self.values.slice(s![.., .., component])
    }

    /// Per-component sample mean at an observation.
    pub fn sample_mean(&self, time_index: usize) -> Array1<f64> {
        let n = self.num_samples() as f64;
        self.at_time(time_index).sum_axis(Axis(0)) / n
    }

    /// Per-component unbiased sample variance at an observation.
    pub fn sample_variance(&self, time_index: usize) -> Array1<f64> {
        let n = self.num_samples();
        if n < 2 {
            return Array1::zeros(self.dimension());
        }
        let cross_section = self.at_time(time_index);
        let mean = self.sample_mean(time_index);
        let centered = &cross_section - &mean;
        centered.mapv(|d| d * d).sum_axis(Axis(0)) / (n - 1) as f64
    }
}
