// demos/demo.rs
use fast_ito::correlation::CorrelationMatrix;
use fast_ito::math_utils::Timer;
use fast_ito::mc::config::SamplePathsConfig;
use fast_ito::models::gbm::Gbm;
use fast_ito::models::generic::GenericItoProcess;
use fast_ito::models::heston::{HestonModel, HestonParams};
use fast_ito::models::ito_process::ItoProcess;
use fast_ito::output;
use fast_ito::rng::RandomType;
use ndarray::{array, Array2};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let csv_path = args
        .iter()
        .position(|a| a == "--csv")
        .and_then(|i| args.get(i + 1))
        .cloned();

    println!("Running fast-ito Path Sampling Demo\n");

    run_gbm_section();
    run_heston_section(csv_path.as_deref());
    run_generic_section();
}

fn run_gbm_section() {
    println!("--- Geometric Brownian Motion ---");
    let gbm = Gbm::new(0.05, 0.2).expect("Valid parameters");
    let x0 = array![100.0];
    let exact_mean = gbm.mean(1.0, x0.view()).expect("closed form")[0];
    let exact_var = gbm.covariance(1.0, x0.view()).expect("closed form")[[0, 0]];

    for random_type in [
        RandomType::Pseudo,
        RandomType::PseudoAntithetic,
        RandomType::Halton,
    ] {
        let config = SamplePathsConfig {
            times: vec![1.0],
            num_samples: 100_000,
            initial_state: vec![100.0],
            random_type,
            num_time_steps: Some(50),
            seed: Some(42),
            ..Default::default()
        };

        let mut timer = Timer::new();
        timer.start();
        let batch = gbm.sample_paths(&config).expect("Valid request");
        let elapsed = timer.elapsed_ms();

        println!(
            "{:<18} mean {:>9.4} (exact {:.4})  var {:>9.4} (exact {:.4})  [{:.1} ms]",
            format!("{:?}", random_type),
            batch.sample_mean(0)[0],
            exact_mean,
            batch.sample_variance(0)[0],
            exact_var,
            elapsed
        );
    }
    println!();
}

fn run_heston_section(csv_path: Option<&str>) {
    println!("--- Heston Stochastic Volatility ---");
    let params = HestonParams {
        r: 0.03,
        q: 0.01,
        kappa: 1.5,
        theta: 0.04,
        xi: 0.5,
        rho: -0.7,
    };
    println!("Feller condition holds: {}", params.feller_condition_holds());

    let model = HestonModel::new(params).expect("Valid parameters");
    let x0 = array![100f64.ln(), 0.04];
    let times: Vec<f64> = (1..=4).map(|q| q as f64 * 0.25).collect();
    let config = SamplePathsConfig {
        times: times.clone(),
        num_samples: 50_000,
        initial_state: x0.to_vec(),
        time_step: Some(1.0 / 252.0),
        seed: Some(7),
        ..Default::default()
    };

    let mut timer = Timer::new();
    timer.start();
    let batch = model.sample_paths(&config).expect("Valid request");
    println!(
        "Simulated {} paths over {} observations in {:.1} ms",
        batch.num_samples(),
        batch.num_times(),
        timer.elapsed_ms()
    );

    println!("{:>6} {:>12} {:>12} {:>12} {:>12}", "t", "E[ln S]", "exact", "E[v]", "exact");
    for (k, &t) in times.iter().enumerate() {
        let sample = batch.sample_mean(k);
        let exact = model.mean(t, x0.view()).expect("constant coefficients");
        println!(
            "{:>6.2} {:>12.6} {:>12.6} {:>12.6} {:>12.6}",
            t, sample[0], exact[0], sample[1], exact[1]
        );
    }

    let min_variance = batch
        .component(1)
        .iter()
        .cloned()
        .fold(f64::INFINITY, f64::min);
    println!("Smallest recorded variance: {:.6}\n", min_variance);

    if let Some(path) = csv_path {
        output::write_batch_to_csv(path, &batch).expect("Could not write CSV");
        println!("Paths written to {}\n", path);
    }
}

fn run_generic_section() {
    println!("--- Correlated Generic Process ---");
    // Two correlated arithmetic Brownian motions with opposite drifts
    let process = GenericItoProcess::new(
        2,
        |_t, _x| array![0.1, -0.1],
        |_t, _x| Array2::eye(2) * 0.3,
    )
    .and_then(|p| p.with_correlation(CorrelationMatrix::two_factor(0.6)?))
    .expect("Valid process");

    let config = SamplePathsConfig {
        times: vec![1.0],
        num_samples: 100_000,
        initial_state: vec![0.0, 0.0],
        seed: Some(11),
        ..Default::default()
    };
    let batch = process.sample_paths(&config).expect("Valid request");
    let terminal = batch.at_time(0);
    let mean = batch.sample_mean(0);
    let centered = &terminal - &mean;
    let cov = centered.t().dot(&centered) / (batch.num_samples() - 1) as f64;
    let corr = cov[[0, 1]] / (cov[[0, 0]] * cov[[1, 1]]).sqrt();

    println!("Terminal means: [{:.4}, {:.4}]", mean[0], mean[1]);
    println!("Terminal correlation: {:.4} (target 0.6)", corr);
}
