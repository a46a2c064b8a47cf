// demos/error_handling_demo.rs
use fast_ito::error::SdeError;
use fast_ito::mc::config::SamplePathsConfig;
use fast_ito::models::generic::GenericItoProcess;
use fast_ito::models::heston::{HestonModel, HestonParams};
use fast_ito::models::ito_process::ItoProcess;
use ndarray::{array, Array2};

fn main() {
    println!("Error Handling Demo for fast-ito");
    println!("=================================\n");

    let heston = HestonModel::new(HestonParams::default()).expect("Valid parameters");
    let valid_request = SamplePathsConfig {
        times: vec![0.5, 1.0],
        num_samples: 10_000,
        initial_state: vec![100f64.ln(), 0.04],
        num_time_steps: Some(20),
        seed: Some(42),
        ..Default::default()
    };

    // Test 1: Invalid correlation
    println!("1. Testing invalid correlation...");

    let invalid_rho_params = HestonParams {
        rho: 1.5, // Invalid correlation > 1
        ..HestonParams::default()
    };

    match HestonModel::new(invalid_rho_params) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error ({:?}): {}", e.kind(), e),
    }

    // Test 2: Parameters that should warn but not fail
    println!("\n2. Testing Feller-violating but valid parameters...");

    let extreme_params = HestonParams {
        kappa: 1.0,
        xi: 0.8, // High vol-of-vol, violates Feller condition
        ..HestonParams::default()
    };

    match HestonModel::new(extreme_params) {
        Ok(_) => println!("   ✓ Created (Feller condition violated, variance is clamped at zero)"),
        Err(e) => println!("   Error: {}", e),
    }

    // Test 3: Malformed sampling requests
    println!("\n3. Testing malformed sampling requests...");

    let bad_requests = [
        (
            "zero samples",
            SamplePathsConfig {
                num_samples: 0,
                ..valid_request.clone()
            },
        ),
        (
            "non-increasing times",
            SamplePathsConfig {
                times: vec![1.0, 0.5],
                ..valid_request.clone()
            },
        ),
        (
            "wrong state dimension",
            SamplePathsConfig {
                initial_state: vec![100f64.ln()],
                ..valid_request.clone()
            },
        ),
        (
            "negative initial variance",
            SamplePathsConfig {
                initial_state: vec![100f64.ln(), -0.04],
                ..valid_request.clone()
            },
        ),
        (
            "non-positive time step",
            SamplePathsConfig {
                time_step: Some(0.0),
                num_time_steps: None,
                ..valid_request.clone()
            },
        ),
    ];

    for (label, request) in bad_requests.iter() {
        match heston.sample_paths(request) {
            Ok(_) => println!("   Unexpected: {} should have failed!", label),
            Err(e) => println!("   ✓ {}: {}", label, e),
        }
    }

    // Test 4: A process whose volatility has the wrong shape
    println!("\n4. Testing inconsistent drift/volatility shapes...");

    let broken = GenericItoProcess::new(
        2,
        |_t, _x| array![0.0, 0.0],
        |_t, _x| Array2::zeros((2, 3)),
    )
    .expect("Valid dimension");

    match broken.sample_paths(&valid_request) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(SdeError::DimensionMismatch {
            context,
            expected,
            got,
        }) => {
            println!(
                "   ✓ Caught DimensionMismatch: {} expected {}, got {}",
                context, expected, got
            );
        }
        Err(other) => println!("   Unexpected error type: {}", other),
    }

    // Test 5: Valid request should work
    println!("\n5. Testing valid request...");

    match heston.sample_paths(&valid_request) {
        Ok(batch) => println!(
            "   ✓ Success: shape = {:?}, E[v_1] = {:.6}",
            batch.shape(),
            batch.sample_mean(1)[1]
        ),
        Err(e) => println!("   Unexpected error: {}", e),
    }

    // Test 6: Error type matching
    println!("\n6. Testing error type matching...");

    let bad_params = HestonParams {
        kappa: -2.0, // Negative mean reversion
        ..HestonParams::default()
    };

    match HestonModel::new(bad_params) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(SdeError::InvalidParameters {
            parameter,
            value,
            constraint,
        }) => {
            println!(
                "   ✓ Caught InvalidParameters: {} = {} ({})",
                parameter, value, constraint
            );
        }
        Err(other) => println!("   Unexpected error type: {}", other),
    }

    println!("\n✓ Error handling demo complete!");
    println!("All error cases were properly caught and handled.");
}
