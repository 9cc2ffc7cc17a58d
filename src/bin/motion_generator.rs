// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

// Triaxial motion generator for analyzer testing
// Writes a 3-channel float WAV holding one tone plus Gaussian noise per axis

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use rust_vibration::acquisition::{write_recording_wav, AxisTone, MotionSource, SimulatedSource};

/// Triaxial motion generator for analyzer testing
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Output file path (.wav)
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Duration in seconds
    #[arg(short, long, default_value_t = 10.0)]
    duration: f64,

    /// Sample rate in Hz
    #[arg(short, long, default_value_t = 100)]
    sample_rate: u32,

    /// Tone frequencies of the x, y and z axes in Hz
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], default_values_t = [1.5, 2.5, 6.0])]
    frequencies: Vec<f64>,

    /// Tone amplitudes of the x, y and z axes in m/s²
    #[arg(long, num_args = 3, value_names = ["X", "Y", "Z"], default_values_t = [0.3, 0.2, 0.8])]
    amplitudes: Vec<f64>,

    /// Standard deviation of the Gaussian noise in m/s²
    #[arg(short, long, default_value_t = 0.05)]
    noise: f64,

    /// Noise seed for reproducible recordings
    #[arg(long)]
    seed: Option<u32>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.sample_rate == 0 {
        anyhow::bail!("Sample rate must be positive");
    }
    if args.noise < 0.0 {
        anyhow::bail!("Noise standard deviation must not be negative");
    }

    let tones: Vec<AxisTone> = args
        .frequencies
        .iter()
        .zip(&args.amplitudes)
        .map(|(&frequency, &amplitude)| AxisTone::new(frequency, amplitude))
        .collect();
    let tones: [AxisTone; 3] = tones
        .try_into()
        .map_err(|_| anyhow::anyhow!("Exactly three frequencies and amplitudes are required"))?;

    let mut source = SimulatedSource::new(args.sample_rate as f64, args.duration)?
        .with_tones(tones)
        .with_noise(args.noise);
    if let Some(seed) = args.seed {
        source = source.with_seed(seed);
    }

    println!("Generating {} seconds of triaxial motion...", args.duration);
    println!("Sample rate: {} Hz", args.sample_rate);
    for (axis, tone) in ["x", "y", "z"].iter().zip(source.tones()) {
        println!(
            "Axis {}: {} Hz, {} m/s²",
            axis, tone.frequency, tone.amplitude
        );
    }
    println!("Noise: {} m/s²", args.noise);

    let recording = source.read_recording()?;
    write_recording_wav(&args.output, &recording)?;

    println!(
        "Motion recording successfully generated and saved to: {}",
        args.output.display()
    );

    Ok(())
}
