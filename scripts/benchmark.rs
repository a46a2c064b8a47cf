// scripts/benchmark.rs
use fast_ito::math_utils::Timer;
use fast_ito::mc::config::SamplePathsConfig;
use fast_ito::models::gbm::Gbm;
use fast_ito::models::heston::{HestonModel, HestonParams};
use fast_ito::models::ito_process::ItoProcess;
use fast_ito::rng::RandomType;
use ndarray::array;
use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::process::Command;

#[derive(Debug)]
struct SystemInfo {
    os: String,
    cpu_model: String,
    cpu_cores: usize,
    rust_version: String,
    rustc_flags: String,
    rayon_threads: usize,
}

impl SystemInfo {
    fn gather() -> Self {
        Self {
            os: env::consts::OS.to_string(),
            cpu_model: Self::get_cpu_model(),
            cpu_cores: num_cpus::get(),
            rust_version: Self::get_rust_version(),
            rustc_flags: env::var("RUSTFLAGS").unwrap_or_else(|_| "default".to_string()),
            rayon_threads: rayon::current_num_threads(),
        }
    }

    fn get_cpu_model() -> String {
        std::fs::read_to_string("/proc/cpuinfo")
            .ok()
            .and_then(|content| {
                content
                    .lines()
                    .find(|line| line.starts_with("model name"))
                    .and_then(|line| line.split(':').nth(1))
                    .map(|s| s.trim().to_string())
            })
            .unwrap_or_else(|| "Unknown CPU".to_string())
    }

    fn get_rust_version() -> String {
        Command::new("rustc")
            .arg("--version")
            .output()
            .map(|output| String::from_utf8_lossy(&output.stdout).trim().to_string())
            .unwrap_or_else(|_| "Unknown Rust version".to_string())
    }
}

#[derive(Debug)]
struct BenchmarkResult {
    name: String,
    paths: usize,
    steps: usize,
    time_ms: f64,
    path_steps_per_sec: f64,
    value: f64,
    reference: Option<f64>,
}

fn time_sampling<P: ItoProcess + ?Sized>(
    name: String,
    process: &P,
    config: &SamplePathsConfig,
    steps: usize,
    reference: Option<f64>,
    component: usize,
) -> BenchmarkResult {
    let mut timer = Timer::new();
    timer.start();
    let batch = process.sample_paths(config).expect("Valid request");
    let time_ms = timer.elapsed_ms();
    let last = batch.num_times() - 1;

    BenchmarkResult {
        name,
        paths: config.num_samples,
        steps,
        time_ms,
        path_steps_per_sec: (config.num_samples * steps) as f64 / (time_ms / 1000.0),
        value: batch.sample_mean(last)[component],
        reference,
    }
}

fn run_gbm_benchmarks() -> Vec<BenchmarkResult> {
    let gbm = Gbm::new(0.05, 0.2).expect("Valid parameters");
    let x0 = array![100.0];
    let exact = gbm.mean(1.0, x0.view()).map(|m| m[0]);
    let steps = 50;

    [10_000, 100_000, 1_000_000]
        .iter()
        .map(|&paths| {
            println!("Running GBM benchmark with {} paths...", paths);
            let config = SamplePathsConfig {
                times: vec![1.0],
                num_samples: paths,
                initial_state: vec![100.0],
                num_time_steps: Some(steps),
                seed: Some(42),
                ..Default::default()
            };
            time_sampling(
                format!("GBM E[X_1] ({}k paths)", paths / 1000),
                &gbm,
                &config,
                steps,
                exact,
                0,
            )
        })
        .collect()
}

fn run_heston_benchmarks() -> Vec<BenchmarkResult> {
    let model = HestonModel::new(HestonParams::default()).expect("Valid parameters");
    let x0 = array![100f64.ln(), 0.06];
    let exact = model.mean(1.0, x0.view()).map(|m| m[1]);
    let paths = 100_000;
    let steps = 252;

    [
        RandomType::Pseudo,
        RandomType::PseudoAntithetic,
        RandomType::Halton,
    ]
    .iter()
    .map(|&random_type| {
        println!("Benchmarking Heston with {:?} draws...", random_type);
        let config = SamplePathsConfig {
            times: vec![0.25, 0.5, 0.75, 1.0],
            num_samples: paths,
            initial_state: x0.to_vec(),
            random_type,
            time_step: Some(1.0 / steps as f64),
            seed: Some(42),
            ..Default::default()
        };
        time_sampling(
            format!("Heston E[v_1] {:?}", random_type),
            &model,
            &config,
            steps,
            exact,
            1,
        )
    })
    .collect()
}

fn write_results_to_csv(
    results: &[BenchmarkResult],
    system_info: &SystemInfo,
    filename: &str,
) -> io::Result<()> {
    let mut file = File::create(filename)?;

    // Write system information as comments
    writeln!(file, "# System Information")?;
    writeln!(file, "# OS: {}", system_info.os)?;
    writeln!(file, "# CPU: {}", system_info.cpu_model)?;
    writeln!(file, "# CPU Cores: {}", system_info.cpu_cores)?;
    writeln!(file, "# Rust Version: {}", system_info.rust_version)?;
    writeln!(file, "# RUSTFLAGS: {}", system_info.rustc_flags)?;
    writeln!(file, "# Rayon Threads: {}", system_info.rayon_threads)?;
    writeln!(
        file,
        "# Benchmark Date: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;
    writeln!(file, "#")?;

    writeln!(file, "Benchmark,Paths,Steps,Time_ms,Path_steps_per_sec,Value,Reference")?;
    for result in results {
        writeln!(
            file,
            "{},{},{},{:.2},{:.0},{:.6},{}",
            result.name,
            result.paths,
            result.steps,
            result.time_ms,
            result.path_steps_per_sec,
            result.value,
            result
                .reference
                .map(|v| format!("{:.6}", v))
                .unwrap_or_else(|| "N/A".to_string())
        )?;
    }
    Ok(())
}

fn main() {
    println!("fast-ito Path Sampling Benchmark");
    println!("================================\n");

    let system_info = SystemInfo::gather();
    println!("System Information:");
    println!("  OS: {}", system_info.os);
    println!("  CPU: {}", system_info.cpu_model);
    println!("  CPU Cores: {}", system_info.cpu_cores);
    println!("  Rust Version: {}", system_info.rust_version);
    println!("  RUSTFLAGS: {}", system_info.rustc_flags);
    println!("  Rayon Threads: {}", system_info.rayon_threads);
    println!();

    let mut all_results = run_gbm_benchmarks();
    all_results.extend(run_heston_benchmarks());

    println!("\n{:=<96}", "");
    println!(
        "{:<32} {:>9} {:>6} {:>12} {:>16} {:>8} {:>8}",
        "Benchmark", "Paths", "Steps", "Time (ms)", "Path-steps/s", "Value", "Exact"
    );
    println!("{:-<96}", "");
    for result in &all_results {
        println!(
            "{:<32} {:>9} {:>6} {:>12.2} {:>16.0} {:>8.4} {:>8}",
            result.name,
            result.paths,
            result.steps,
            result.time_ms,
            result.path_steps_per_sec,
            result.value,
            result
                .reference
                .map(|v| format!("{:.4}", v))
                .unwrap_or_else(|| "N/A".to_string())
        );
    }
    println!("{:=<96}", "");

    let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S");
    let filename = format!("benchmark_results_{}.csv", timestamp);
    match write_results_to_csv(&all_results, &system_info, &filename) {
        Ok(()) => println!("\nResults saved to: {}", filename),
        Err(e) => eprintln!("\nCould not write {}: {}", filename, e),
    }
    println!("Run again with: cargo run --bin benchmark --release");
}
