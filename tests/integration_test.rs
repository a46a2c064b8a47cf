// tests/integration_test.rs
use fast_ito::mc::config::SamplePathsConfig;
use fast_ito::models::generic::GenericItoProcess;
use fast_ito::models::heston::{HestonModel, HestonParams};
use fast_ito::models::ito_process::ItoProcess;
use fast_ito::rng::{DrawRequest, RandomDrawSource, RandomType, StandardDrawSource};
use fast_ito::ErrorKind;
use ndarray::{array, Array2};
use std::sync::Mutex;

fn drifting_brownian() -> GenericItoProcess {
    GenericItoProcess::new(
        1,
        |_t, _x| array![0.05],
        |_t, _x| array![[0.2]],
    )
    .expect("Valid process")
}

fn scenario_config(seed: u64) -> SamplePathsConfig {
    SamplePathsConfig {
        times: vec![0.0, 1.0],
        num_samples: 2,
        initial_state: vec![1.0],
        seed: Some(seed),
        ..Default::default()
    }
}

/// Delegates to the standard source and keeps every block it hands out.
#[derive(Default)]
struct RecordingSource {
    inner: StandardDrawSource,
    blocks: Mutex<Vec<Array2<f64>>>,
}

impl RandomDrawSource for RecordingSource {
    fn draw(&self, request: &DrawRequest) -> Array2<f64> {
        let block = self.inner.draw(request);
        self.blocks.lock().unwrap().push(block.clone());
        block
    }
}

#[test]
fn test_seeded_scenario_is_reproducible() {
    let process = drifting_brownian();

    let first = process.sample_paths(&scenario_config(42)).expect("Valid request");
    let second = process.sample_paths(&scenario_config(42)).expect("Valid request");
    let other = process.sample_paths(&scenario_config(7)).expect("Valid request");

    assert_eq!(first.shape(), (2, 2, 1));
    assert_eq!(first, second, "same seed must reproduce bit-identical paths");
    assert_ne!(first.values(), other.values());

    // Observation at t = 0 is the initial state.
    assert_eq!(first.at_time(0), array![[1.0], [1.0]]);
}

#[test]
fn test_determinism_across_modes() {
    let model = HestonModel::new(HestonParams::default()).expect("Valid parameters");
    for random_type in [
        RandomType::Pseudo,
        RandomType::PseudoAntithetic,
        RandomType::Halton,
    ] {
        let config = SamplePathsConfig {
            times: vec![0.1, 0.5, 1.0],
            num_samples: 64,
            initial_state: vec![0.0, 0.04],
            random_type,
            num_time_steps: Some(4),
            seed: Some(2024),
            ..Default::default()
        };
        let a = model.sample_paths(&config).expect("Valid request");
        let b = model.sample_paths(&config).expect("Valid request");
        assert_eq!(a, b, "{:?} draws are not reproducible", random_type);
    }
}

#[test]
fn test_shape_contract() {
    let process = GenericItoProcess::new(
        3,
        |_t, x| x.mapv(|v| -0.1 * v),
        |_t, _x| Array2::from_elem((3, 2), 0.1),
    )
    .and_then(|p| p.with_noise_dimension(2))
    .expect("Valid process");

    for (num_samples, times) in [
        (1, vec![1.0]),
        (5, vec![0.0, 0.3, 0.7]),
        (17, vec![0.25, 0.5, 0.75, 1.0, 2.0]),
    ] {
        let config = SamplePathsConfig {
            times: times.clone(),
            num_samples,
            initial_state: vec![1.0, 2.0, 3.0],
            time_step: Some(0.1),
            seed: Some(1),
            ..Default::default()
        };
        let batch = process.sample_paths(&config).expect("Valid request");
        assert_eq!(batch.shape(), (num_samples, times.len(), 3));
    }
}

#[test]
fn test_time_grid_fidelity() {
    let times = vec![0.1, 0.35, 0.36, 1.0];
    for (num_time_steps, time_step) in [(None, None), (Some(7), None), (None, Some(0.013))] {
        let config = SamplePathsConfig {
            times: times.clone(),
            num_samples: 3,
            initial_state: vec![1.0],
            num_time_steps,
            time_step,
            seed: Some(5),
            ..Default::default()
        };
        let batch = drifting_brownian().sample_paths(&config).expect("Valid request");
        assert_eq!(batch.times(), times.as_slice());
    }
}

#[test]
fn test_antithetic_pairs_cancel() {
    let process = GenericItoProcess::new(
        2,
        |_t, _x| array![0.0, 0.0],
        |_t, _x| Array2::eye(2),
    )
    .expect("Valid process");
    let config = SamplePathsConfig {
        times: vec![0.5, 1.0],
        num_samples: 10,
        initial_state: vec![0.0, 0.0],
        random_type: RandomType::PseudoAntithetic,
        num_time_steps: Some(3),
        seed: Some(11),
        ..Default::default()
    };
    let source = RecordingSource::default();
    let batch = process
        .sample_paths_with_source(&config, &source)
        .expect("Valid request");

    let blocks = source.blocks.lock().unwrap();
    assert_eq!(blocks.len(), 6);
    for block in blocks.iter() {
        for i in 0..5 {
            for j in 0..2 {
                assert_eq!(block[[i, j]] + block[[i + 5, j]], 0.0);
            }
        }
    }

    // Pure Brownian motion from zero: paired paths mirror each other.
    for i in 0..5 {
        assert_eq!(batch.path(i), batch.path(i + 5).mapv(|v| -v));
    }
}

#[test]
fn test_invalid_requests_fail_before_drawing() {
    struct NoDraws;
    impl RandomDrawSource for NoDraws {
        fn draw(&self, _request: &DrawRequest) -> Array2<f64> {
            panic!("validation must precede drawing");
        }
    }

    let process = drifting_brownian();
    let bad_configs = [
        SamplePathsConfig {
            initial_state: vec![1.0, 2.0],
            ..scenario_config(42)
        },
        SamplePathsConfig {
            times: vec![0.0, 1.0, 0.5],
            ..scenario_config(42)
        },
        SamplePathsConfig {
            times: vec![],
            ..scenario_config(42)
        },
        SamplePathsConfig {
            num_samples: 0,
            ..scenario_config(42)
        },
        SamplePathsConfig {
            start_time: 0.5,
            ..scenario_config(42)
        },
        SamplePathsConfig {
            time_step: Some(-0.1),
            ..scenario_config(42)
        },
    ];

    for config in bad_configs.iter() {
        let err = process
            .sample_paths_with_source(config, &NoDraws)
            .expect_err("request should be rejected");
        assert_eq!(err.kind(), ErrorKind::InvalidArgument, "{}", err);
    }
}

#[test]
fn test_heston_invalid_correlation() {
    let params = HestonParams {
        rho: 1.5,
        ..HestonParams::default()
    };
    let err = HestonModel::new(params).expect_err("ρ outside [-1, 1] must be rejected");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
}

#[test]
fn test_correlated_increments() {
    let rho = 0.8;
    let process = GenericItoProcess::new(
        2,
        |_t, _x| array![0.0, 0.0],
        |_t, _x| Array2::eye(2),
    )
    .and_then(|p| p.with_correlation(fast_ito::correlation::CorrelationMatrix::two_factor(rho)?))
    .expect("Valid process");
    let config = SamplePathsConfig {
        times: vec![1.0],
        num_samples: 50_000,
        initial_state: vec![0.0, 0.0],
        seed: Some(99),
        ..Default::default()
    };
    let batch = process.sample_paths(&config).expect("Valid request");
    let terminal = batch.at_time(0);
    let n = terminal.nrows() as f64;
    let cov = terminal.t().dot(&terminal) / n;

    assert!((cov[[0, 0]] - 1.0).abs() < 0.03, "var(W1) = {}", cov[[0, 0]]);
    assert!((cov[[1, 1]] - 1.0).abs() < 0.03, "var(W2) = {}", cov[[1, 1]]);
    assert!((cov[[0, 1]] - rho).abs() < 0.03, "cov(W1, W2) = {}", cov[[0, 1]]);
}

#[test]
fn test_randomly_drawn_time_grid() {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // Caller-drawn, non-uniform observation times; sub-steps bounded by `time_step`.
    let mut rng = StdRng::seed_from_u64(11);
    let mut times: Vec<f64> = (0..6).map(|_| rng.gen_range(0.05..2.0)).collect();
    times.sort_by(|a, b| a.partial_cmp(b).expect("finite times"));
    times.dedup();

    let process = GenericItoProcess::new(1, |_t, _x| array![0.0], |_t, _x| Array2::eye(1))
        .expect("Valid process");
    let config = SamplePathsConfig {
        times: times.clone(),
        num_samples: 20_000,
        initial_state: vec![0.0],
        time_step: Some(0.05),
        seed: Some(5),
        ..Default::default()
    };
    let batch = process.sample_paths(&config).expect("Valid request");

    assert_eq!(batch.times(), times.as_slice());
    for (k, &t) in times.iter().enumerate() {
        let var = batch.sample_variance(k)[0];
        assert!(
            (var - t).abs() < 0.06 * t + 0.01,
            "variance {} at t = {}",
            var,
            t
        );
    }
}
