// tests/solver_convergence_test.rs
use approx::assert_abs_diff_eq;
use fast_ito::mc::config::SamplePathsConfig;
use fast_ito::models::gbm::Gbm;
use fast_ito::models::generic::GenericItoProcess;
use fast_ito::models::ito_process::ItoProcess;
use fast_ito::models::ou_process::OuProcess;
use fast_ito::parameter::VectorParameter;
use fast_ito::rng::{DrawRequest, RandomDrawSource, RandomType, StandardDrawSource};
use fast_ito::time_grid::{StepResolution, TimeGrid};
use ndarray::{array, Array1, Array2};
use std::sync::Mutex;

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
fn test_gbm_known_moments() {
    let (mu, sigma) = (0.05, 0.2);
    let process = GenericItoProcess::new(
        1,
        move |_t, x| array![mu * x[0]],
        move |_t, x| array![[sigma * x[0]]],
    )
    .expect("Valid process");
    let reference = Gbm::new(mu, sigma).expect("Valid parameters");

    let config = SamplePathsConfig {
        times: vec![1.0],
        num_samples: 100_000,
        initial_state: vec![1.0],
        num_time_steps: Some(50),
        seed: Some(42),
        ..Default::default()
    };
    let batch = process.sample_paths(&config).expect("Valid request");

    let x0 = array![1.0];
    let exact_mean = reference.mean(1.0, x0.view()).unwrap()[0];
    let exact_var = reference.covariance(1.0, x0.view()).unwrap()[[0, 0]];
    let sample_mean = batch.sample_mean(0)[0];
    let sample_var = batch.sample_variance(0)[0];

    println!(
        "GBM mean {:.6} (exact {:.6}), variance {:.6} (exact {:.6})",
        sample_mean, exact_mean, sample_var, exact_var
    );
    assert_abs_diff_eq!(sample_mean, exact_mean, epsilon = 0.005);
    assert_abs_diff_eq!(sample_var, exact_var, epsilon = 0.002);
}

#[test]
fn test_euler_maruyama_ou_weak_convergence() {
    let ou = OuProcess::new(0.5, 0.1, 0.2).expect("Valid parameters");
    let x0 = array![100.0];
    let exact_mean = ou.mean(1.0, x0.view()).unwrap()[0];

    let mut errors = Vec::new();
    for num_steps in [1, 4, 16, 64] {
        let config = SamplePathsConfig {
            times: vec![1.0],
            num_samples: 10_000,
            initial_state: vec![100.0],
            num_time_steps: Some(num_steps),
            seed: Some(42),
            ..Default::default()
        };
        let batch = ou.sample_paths(&config).expect("Valid request");
        errors.push((batch.sample_mean(0)[0] - exact_mean).abs());
    }
    println!("OU mean errors: {:?}", errors);

    for i in 0..(errors.len() - 1) {
        assert!(
            errors[i] > errors[i + 1],
            "Euler-Maruyama did not converge (weak) as expected at refinement {}",
            i
        );
    }
    assert!(errors[3] < 0.15, "final weak error too high: {}", errors[3]);
}

#[test]
fn test_euler_maruyama_gbm_strong_convergence() {
    let gbm = Gbm::new(0.05, 0.2).expect("Valid parameters");
    let num_paths = 4_000;

    let mut rms_errors = Vec::new();
    for num_steps in [10, 20, 40, 80, 160] {
        let dt = 1.0 / num_steps as f64;
        let config = SamplePathsConfig {
            times: vec![1.0],
            num_samples: num_paths,
            initial_state: vec![100.0],
            num_time_steps: Some(num_steps),
            seed: Some(7),
            ..Default::default()
        };
        let source = RecordingSource::default();
        let batch = gbm
            .sample_paths_with_source(&config, &source)
            .expect("Valid request");
        let blocks = source.blocks.lock().unwrap();

        // Exact solution driven by the same normals
        let mut sum_sq_diff = 0.0;
        for i in 0..num_paths {
            let exact = blocks
                .iter()
                .fold(100.0, |x, block| gbm.exact_step(x, dt, block[[i, 0]]));
            sum_sq_diff += (batch.values()[[i, 0, 0]] - exact).powi(2);
        }
        rms_errors.push((sum_sq_diff / num_paths as f64).sqrt());
    }
    println!("GBM strong RMSEs: {:?}", rms_errors);

    // Strong order 0.5: halving dt shrinks the error by about √2.
    for i in 0..(rms_errors.len() - 1) {
        let ratio = rms_errors[i] / rms_errors[i + 1];
        assert!(
            ratio > 1.2 && ratio < 1.7,
            "strong convergence ratio {} outside [1.2, 1.7] at refinement {}",
            ratio,
            i
        );
    }
}

#[test]
fn test_zero_volatility_matches_forward_euler() {
    let process = GenericItoProcess::new(
        2,
        |t, x| array![-x[0] + t, 0.5 * x[0] * x[1]],
        |_t, _x| Array2::zeros((2, 2)),
    )
    .expect("Valid process");
    let times = vec![0.3, 0.8, 1.0];
    let resolution = StepResolution::Count(6);

    let config = SamplePathsConfig {
        times: times.clone(),
        num_samples: 4,
        initial_state: vec![1.0, 0.5],
        num_time_steps: Some(6),
        seed: Some(3),
        ..Default::default()
    };
    let batch = process.sample_paths(&config).expect("Valid request");

    let refined = TimeGrid::new(times)
        .and_then(|grid| grid.refine(0.0, resolution))
        .expect("Valid grid");
    let mut x = array![1.0, 0.5];
    let mut expected = Vec::new();
    for (k, window) in refined.points.windows(2).enumerate() {
        let (t, dt) = (window[0], window[1] - window[0]);
        x = &x + &(process.drift(t, x.view()) * dt);
        if refined.record_at.contains(&(k + 1)) {
            expected.push(x.clone());
        }
    }

    for i in 0..4 {
        for (k, state) in expected.iter().enumerate() {
            for j in 0..2 {
                assert_abs_diff_eq!(batch.values()[[i, k, j]], state[j], epsilon = 1e-12);
            }
        }
    }
}

#[test]
fn test_time_dependent_drift() {
    // dX = b(t) dt with b(t) = (1, 2t): X_1 = X_0 + (1, 1) under any refinement.
    let schedule = |t: f64| array![1.0, 2.0 * t];
    let process = GenericItoProcess::new(
        2,
        move |t, _x| VectorParameter::value(&schedule, t),
        |_t, _x| Array2::zeros((2, 2)),
    )
    .expect("Valid process");

    let config = SamplePathsConfig {
        times: vec![1.0],
        num_samples: 2,
        initial_state: vec![0.0, 0.0],
        num_time_steps: Some(1_000),
        seed: Some(1),
        ..Default::default()
    };
    let batch = process.sample_paths(&config).expect("Valid request");
    let terminal: Array1<f64> = batch.sample_mean(0);
    assert_abs_diff_eq!(terminal[0], 1.0, epsilon = 1e-9);
    // Left-point rule on 2t is biased by exactly dt.
    assert_abs_diff_eq!(terminal[1], 1.0 - 1e-3, epsilon = 1e-9);
}

#[test]
fn test_halton_draws_reduce_error() {
    let ou = OuProcess::new(0.0, 0.0, 1.0).expect("Valid parameters");
    let x0 = array![0.0];
    let exact_var = ou.covariance(1.0, x0.view()).unwrap()[[0, 0]];

    let config = SamplePathsConfig {
        times: vec![1.0],
        num_samples: 4_096,
        initial_state: vec![0.0],
        random_type: RandomType::Halton,
        seed: Some(17),
        ..Default::default()
    };
    let batch = ou.sample_paths(&config).expect("Valid request");
    assert_abs_diff_eq!(batch.sample_mean(0)[0], 0.0, epsilon = 0.01);
    assert_abs_diff_eq!(batch.sample_variance(0)[0], exact_var, epsilon = 0.05);
}

#[test]
fn test_halton_brownian_motion_over_many_substeps() {
    let process = GenericItoProcess::new(1, |_t, _x| array![0.0], |_t, _x| Array2::eye(1))
        .expect("Valid process");

    for num_steps in [50, 100, 200] {
        let config = SamplePathsConfig {
            times: vec![1.0],
            num_samples: 2_000,
            initial_state: vec![0.0],
            random_type: RandomType::Halton,
            num_time_steps: Some(num_steps),
            seed: Some(17),
            ..Default::default()
        };
        let batch = process.sample_paths(&config).expect("Valid request");
        let mean = batch.sample_mean(0)[0];
        let var = batch.sample_variance(0)[0];
        println!("Halton, {} sub-steps: mean {:.4}, variance {:.4}", num_steps, mean, var);
        assert_abs_diff_eq!(mean, 0.0, epsilon = 0.1);
        assert_abs_diff_eq!(var, 1.0, epsilon = 0.12);
    }
}
