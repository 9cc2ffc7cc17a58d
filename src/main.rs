// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Main entry point for the triaxial vibration analyzer

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use rust_vibration::acquisition;
use rust_vibration::analysis::{AnalysisOutcome, AnalysisReport, AnalysisService};
use rust_vibration::config::{self, Config};
use rust_vibration::preprocessing::FrequencyWeighting;
use std::path::PathBuf;

/// Whole-body vibration analyzer for triaxial acceleration recordings
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (YAML), created with defaults when missing
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Input recording (3-channel WAV: x, y, z in m/s²)
    #[arg(long)]
    input_file: Option<PathBuf>,

    /// Analyze a simulated recording instead of a file
    #[arg(long, conflicts_with = "input_file")]
    simulate: bool,

    /// Frequency weighting applied before the dose values
    #[arg(long, value_enum)]
    weighting: Option<FrequencyWeighting>,

    /// MTVV integration window in seconds
    #[arg(long)]
    mtvv_window: Option<f64>,

    /// Output file for the analysis report (JSON)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print the configuration JSON schema and exit
    #[arg(long)]
    show_config_schema: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.show_config_schema {
        return config::output_config_schema();
    }

    let mut config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load configuration {}", args.config.display()))?;
    config.apply_args(
        args.input_file,
        args.simulate,
        args.weighting,
        args.mtvv_window,
    );
    config::validate_specific_rules(&config)?;

    println!("Vibration Analyzer");
    println!("------------------");

    let mut source = acquisition::get_motion_source(&config.acquisition)?;
    match &config.acquisition.input_file {
        Some(file) if !config.acquisition.simulated => println!("Using recording: {}", file),
        _ => println!(
            "Using simulated source: {} s at {} Hz",
            config.acquisition.duration_seconds, config.acquisition.sample_rate
        ),
    }

    let recording = source.read_recording()?;
    info!(
        "Recording holds {} samples per axis at {} Hz ({:.2} s)",
        recording.len(),
        recording.samples.sample_rate,
        recording.samples.duration_seconds()
    );

    let service = AnalysisService::new(config.analysis.clone());
    let report = match service.submit_owned(recording.into_samples()).outcome().await? {
        AnalysisOutcome::Completed(report) => report,
        AnalysisOutcome::Superseded => anyhow::bail!("Analysis was superseded"),
    };

    if let Some(output_path) = args.output {
        println!("Saving report to: {}", output_path.display());
        let json = serde_json::to_string_pretty(report.as_ref())
            .context("Failed to serialize analysis report")?;
        std::fs::write(&output_path, json)
            .with_context(|| format!("Failed to write report to {}", output_path.display()))?;
    } else {
        print_summary(&report);
    }

    Ok(())
}

fn print_summary(report: &AnalysisReport) {
    println!(
        "Samples: {} per axis at {:.2} Hz, weighting {}",
        report.sample_count, report.sample_rate, report.weighting
    );

    for axis in report.axes() {
        println!("Axis {}:", axis.axis);
        if let Some((frequency, magnitude)) = axis.spectrum.dominant_frequency() {
            println!(
                "- Dominant frequency: {:.2} Hz ({:.4} m/s²)",
                frequency, magnitude
            );
        }
        if let Some(dose) = &axis.dose {
            println!("- RMS: {}", format_value(dose.rms, "m/s²"));
            println!("- VDV: {}", format_value(dose.vdv, "m/s^1.75"));
            println!("- MTVV: {}", format_value(dose.mtvv, "m/s²"));
            println!("- Peak: {}", format_value(dose.peak, "m/s²"));
            println!("- Crest factor: {}", format_value(dose.crest_factor, ""));
        }
    }

    if let Some(total) = report.vdv_total {
        println!("Combined VDV: {:.4} m/s^1.75", total);
    }
}

fn format_value(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(value) => format!("{:.4} {}", value, unit).trim_end().to_string(),
        None => "unavailable".to_string(),
    }
}
