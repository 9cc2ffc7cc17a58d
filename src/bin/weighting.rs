// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Frequency weighting utility
//!
//! This binary tool applies a vibration frequency weighting (Wg, Wb or Wd)
//! to every channel of a WAV file, or to a single one, and writes the
//! weighted signal with the same WAV specification.
//!
//! ## Usage
//!
//! ```
//! weighting --input ride.wav --output ride_wb.wav --weighting wb
//! weighting --input ride.wav --output ride_wd_x.wav --weighting wd --channel 0
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use rust_vibration::preprocessing::{create_weighting_filter, Filter, FrequencyWeighting};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "weighting")]
#[command(author = "Ronan Le Meillat")]
#[command(version = "1.0")]
#[command(about = "Apply vibration frequency weightings to WAV files", long_about = None)]
struct Args {
    /// Input WAV file
    #[arg(short = 'i', long)]
    input: PathBuf,

    /// Output WAV file
    #[arg(short = 'o', long)]
    output: PathBuf,

    /// Frequency weighting
    #[arg(short = 'w', long, value_enum, default_value_t = FrequencyWeighting::Wb)]
    weighting: FrequencyWeighting,

    /// Apply the weighting to a specific channel (none = all channels)
    #[arg(short = 'l', long)]
    channel: Option<usize>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    println!("Reading WAV file: {:?}", args.input);
    let mut reader = WavReader::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;
    let spec = reader.spec();

    println!("Input WAV specifications:");
    println!("- Sample rate: {} Hz", spec.sample_rate);
    println!("- Bits per sample: {}", spec.bits_per_sample);
    println!("- Sample format: {:?}", spec.sample_format);
    println!("- Channels: {}", spec.channels);

    let samples = read_normalized(&mut reader, &spec)?;

    // Split samples into channels
    let channels = spec.channels as usize;
    let mut channel_samples = vec![Vec::with_capacity(samples.len() / channels); channels];
    for (i, &sample) in samples.iter().enumerate() {
        channel_samples[i % channels].push(sample);
    }

    println!("Applying {} weighting", args.weighting);
    let filter: Box<dyn Filter> =
        create_weighting_filter(args.weighting, spec.sample_rate as f64);

    let weighted_channels: Vec<Vec<f64>> = match args.channel {
        Some(ch) if ch < channels => {
            println!("Weighting only channel {}", ch);
            let mut result = channel_samples.clone();
            result[ch] = filter.apply(&channel_samples[ch]);
            result
        }
        Some(ch) => anyhow::bail!("Channel {} does not exist ({} channels)", ch, channels),
        None => {
            println!("Weighting all channels");
            channel_samples
                .iter()
                .map(|samples| filter.apply(samples))
                .collect()
        }
    };

    println!("Writing output to {:?}", args.output);
    write_normalized(&args.output, spec, &weighted_channels)?;

    println!("Weighting complete!");
    Ok(())
}

/// Read every sample as a float, integer formats mapped to [-1, 1)
fn read_normalized<R: std::io::Read>(reader: &mut WavReader<R>, spec: &WavSpec) -> Result<Vec<f64>> {
    let samples = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<Vec<_>, _>>()?,
        SampleFormat::Int => {
            let full_scale = int_full_scale(spec.bits_per_sample);
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / full_scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };
    Ok(samples)
}

/// Interleave the channels and write them with the input specification
fn write_normalized(path: &Path, spec: WavSpec, channels: &[Vec<f64>]) -> Result<()> {
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    let full_scale = int_full_scale(spec.bits_per_sample);

    for i in 0..frames {
        for channel in channels {
            let sample = channel[i];
            match spec.sample_format {
                SampleFormat::Float => writer.write_sample(sample as f32)?,
                SampleFormat::Int => {
                    let value = (sample * full_scale).round().clamp(-full_scale, full_scale - 1.0);
                    writer.write_sample(value as i32)?
                }
            }
        }
    }
    writer.finalize()?;
    Ok(())
}

fn int_full_scale(bits_per_sample: u16) -> f64 {
    (1i64 << (bits_per_sample.clamp(1, 32) - 1)) as f64
}
