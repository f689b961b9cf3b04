//! Eye extrinsics calibration with synthetic data.
//!
//! 1. Fabricate observations from a known pose, with a little measurement noise
//! 2. Run the particle swarm through the pipeline front end
//! 3. Compare the recovered pose with ground truth
//!
//! Run with: `RUST_LOG=debug cargo run -p eyecal --example eyes_synthetic`

use anyhow::Result;
use eyecal::core::synthetic::eyes;
use eyecal::prelude::*;

fn main() -> Result<()> {
    env_logger::init();
    println!("=== Eye Extrinsics Calibration (Synthetic) ===\n");

    let truth = EyePose::new(0.034, 0.0, 0.005, 0.02, -0.04, 0.08);
    let clean = eyes::observations_from_pose(&truth, 15, 7);
    let observations = eyes::add_noise(&clean, 2e-4, 2e-3, 8);
    println!("Ground truth pose: {:.4?}", truth.to_array());
    println!("Observations: {}\n", observations.len());

    let config = EyesCalibrationConfig {
        pso: PsoOptions {
            num_particles: 30,
            max_iters: Some(3000),
            max_time_s: Some(30.0),
            ..PsoOptions::default()
        },
        seed: Some(42),
        ..EyesCalibrationConfig::default()
    };
    let mut calib = EyesCalibration::with_config(config);
    for obs in observations {
        calib.add_data(obs)?;
    }

    let report = calib.run_calibration()?;
    println!("Recovered pose:    {:.4?}", report.pose);
    println!(
        "Cost: {:.6} after {} iterations ({} restarts, {:.2} s)",
        report.cost, report.iterations, report.restarts, report.elapsed_s
    );
    println!(
        "Mean errors: translation {:.2e} m, rotation {:.2e} rad",
        report.mean_translation_error, report.mean_rotation_error
    );

    let recovered = EyePose::from(report.pose);
    println!(
        "\n|Δt| = {:.2e} m, |Δrpy| = {:.2e} rad",
        (recovered.translation() - truth.translation()).norm(),
        (recovered.rpy() - truth.rpy()).norm()
    );
    for warning in &report.warnings {
        println!("warning: {warning}");
    }
    Ok(())
}
