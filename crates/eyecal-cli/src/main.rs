use std::{fs, path::Path, path::PathBuf};

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use eyecal_core::{synthetic::eyes, CalibrationDataset, EyePose, Real};
use eyecal_pipeline::{EyesCalibration, EyesCalibrationConfig, EyesCalibrationReport};
use log::info;

/// Eye extrinsics calibration from stereo relative-pose observations.
#[derive(Debug, Parser)]
#[command(name = "eyecal", author, version, about = "Eye extrinsics calibration")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Calibrate from a JSON dataset and print (or write) the JSON report.
    Calibrate {
        /// Path to a JSON CalibrationDataset.
        #[arg(long)]
        input: PathBuf,

        /// Optional path to a JSON EyesCalibrationConfig. Defaults are used if omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Seed overriding the one in the config.
        #[arg(long)]
        seed: Option<u64>,

        /// Write the report here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Fabricate a dataset from a known pose.
    Synth {
        /// Ground-truth pose `tx,ty,tz,roll,pitch,yaw` (meters, radians).
        #[arg(long, value_parser = parse_pose, allow_hyphen_values = true)]
        pose: EyePose,

        /// Number of observations.
        #[arg(long, default_value_t = 20)]
        count: usize,

        #[arg(long, default_value_t = 0)]
        seed: u64,

        /// Translation noise on the measured relative pose, meters.
        #[arg(long, default_value_t = 0.0)]
        noise_t: Real,

        /// Rotation noise on the measured relative pose, radians.
        #[arg(long, default_value_t = 0.0)]
        noise_r: Real,

        /// Write the dataset here instead of stdout.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn parse_pose(s: &str) -> Result<EyePose, String> {
    let values = s
        .split(',')
        .map(|v| v.trim().parse::<Real>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid pose component: {e}"))?;
    if values.len() != 6 {
        return Err(format!("pose needs 6 comma-separated values, got {}", values.len()));
    }
    EyePose::from_slice(&values).map_err(|e| e.to_string())
}

fn load_json_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let value =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(value)
}

fn emit(json: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            info!("written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn run_calibrate_from_files(
    input_path: &Path,
    config_path: Option<&Path>,
    seed: Option<u64>,
) -> Result<EyesCalibrationReport> {
    let dataset: CalibrationDataset = load_json_file(input_path)?;

    let mut config = if let Some(cfg_path) = config_path {
        load_json_file::<EyesCalibrationConfig>(cfg_path)?
    } else {
        EyesCalibrationConfig::default()
    };
    if seed.is_some() {
        config.seed = seed;
    }

    let mut calib = EyesCalibration::with_config(config);
    for (i, obs) in dataset.iter().enumerate() {
        calib
            .add_data(*obs)
            .with_context(|| format!("observation {i}"))?;
    }
    info!("loaded {} observations", calib.num_data());
    calib.run_calibration()
}

fn synth_dataset(
    pose: &EyePose,
    count: usize,
    seed: u64,
    noise_t: Real,
    noise_r: Real,
) -> Result<CalibrationDataset> {
    ensure!(count > 0, "count must be positive");
    ensure!(
        noise_t >= 0.0 && noise_r >= 0.0,
        "noise levels must be non-negative"
    );
    let clean = eyes::observations_from_pose(pose, count, seed);
    let observations = if noise_t > 0.0 || noise_r > 0.0 {
        eyes::add_noise(&clean, noise_t, noise_r, seed.wrapping_add(1))
    } else {
        clean
    };
    CalibrationDataset::from_observations(observations)
}

fn main() {
    env_logger::init();
    if let Err(err) = try_main() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<()> {
    match Cli::parse().command {
        Command::Calibrate {
            input,
            config,
            seed,
            output,
        } => {
            let report = run_calibrate_from_files(&input, config.as_deref(), seed)?;
            emit(&serde_json::to_string_pretty(&report)?, output.as_deref())
        }
        Command::Synth {
            pose,
            count,
            seed,
            noise_t,
            noise_r,
            output,
        } => {
            let dataset = synth_dataset(&pose, count, seed, noise_t, noise_r)?;
            emit(&serde_json::to_string_pretty(&dataset)?, output.as_deref())
        }
    }
}
