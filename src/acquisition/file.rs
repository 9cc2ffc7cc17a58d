// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Triaxial recordings stored as 3-channel WAV files
//!
//! Channels are interleaved x, y, z. Float files hold accelerations in m/s²
//! directly; integer files are scaled so that full-scale digital values map to
//! `±full_scale` m/s².

use anyhow::{Context, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::info;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{MotionSource, TriaxialRecording};

/// Number of interleaved channels in a recording file
const CHANNELS: u16 = 3;

/// Errors raised while decoding a recording file
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error("recording must have {expected} channels (x, y, z), got {actual}")]
    ChannelCount { expected: u16, actual: u16 },

    #[error("unsupported sample format: {bits} bit {format:?}")]
    UnsupportedFormat { format: SampleFormat, bits: u16 },

    #[error("recording sample rate must be positive")]
    InvalidSampleRate,

    #[error("WAV decoding failed: {0}")]
    Wav(#[from] hound::Error),
}

/// Motion source that reads a complete WAV recording using hound
pub struct FileSource {
    path: PathBuf,
    spec: WavSpec,
    full_scale: f64,
}

impl FileSource {
    /// Open a WAV recording and check that it holds three channels
    pub fn new<P: AsRef<Path>>(file_path: P, full_scale: f64) -> Result<Self> {
        let path = file_path.as_ref().to_path_buf();
        let reader = open_reader(&path)?;
        let spec = reader.spec();

        check_spec(&spec)?;

        info!("Opened recording: {}", path.display());
        info!("  Sample rate: {} Hz", spec.sample_rate);
        info!("  Bits per sample: {}", spec.bits_per_sample);
        info!("  Sample format: {:?}", spec.sample_format);

        Ok(Self {
            path,
            spec,
            full_scale,
        })
    }

    fn read_interleaved(&self) -> Result<Vec<f64>> {
        let mut reader = open_reader(&self.path)?;
        read_samples(&mut reader, &self.spec, self.full_scale)
    }
}

impl MotionSource for FileSource {
    fn read_recording(&mut self) -> Result<TriaxialRecording> {
        let interleaved = self.read_interleaved()?;

        let frames = interleaved.len() / CHANNELS as usize;
        let mut x = Vec::with_capacity(frames);
        let mut y = Vec::with_capacity(frames);
        let mut z = Vec::with_capacity(frames);

        for chunk in interleaved.chunks_exact(CHANNELS as usize) {
            x.push(chunk[0]);
            y.push(chunk[1]);
            z.push(chunk[2]);
        }

        info!(
            "Read {} samples per axis ({:.1} s) from {}",
            frames,
            frames as f64 / self.sample_rate(),
            self.path.display()
        );

        Ok(TriaxialRecording::uniform(x, y, z, self.sample_rate()))
    }

    fn sample_rate(&self) -> f64 {
        self.spec.sample_rate as f64
    }
}

fn check_spec(spec: &WavSpec) -> Result<(), AcquisitionError> {
    if spec.channels != CHANNELS {
        return Err(AcquisitionError::ChannelCount {
            expected: CHANNELS,
            actual: spec.channels,
        });
    }
    if spec.sample_rate == 0 {
        return Err(AcquisitionError::InvalidSampleRate);
    }
    match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Float, 32) | (SampleFormat::Int, 8..=32) => Ok(()),
        (format, bits) => Err(AcquisitionError::UnsupportedFormat { format, bits }),
    }
}

fn read_samples<R: std::io::Read>(
    reader: &mut WavReader<R>,
    spec: &WavSpec,
    full_scale: f64,
) -> Result<Vec<f64>> {
    let samples = match spec.sample_format {
        SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<Vec<_>, _>>()
            .map_err(AcquisitionError::from)?,
        SampleFormat::Int => {
            let scale = full_scale / (1i64 << (spec.bits_per_sample - 1)) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 * scale))
                .collect::<Result<Vec<_>, _>>()
                .map_err(AcquisitionError::from)?
        }
    };
    Ok(samples)
}

/// Write a recording as a 3-channel 32-bit float WAV file
///
/// The sample rate is rounded to the nearest whole Hz, as required by the
/// WAV header. Axes are truncated to the shortest one.
pub fn write_recording_wav<P: AsRef<Path>>(path: P, recording: &TriaxialRecording) -> Result<()> {
    let samples = &recording.samples;
    let sample_rate = samples.sample_rate.round();
    if !(1.0..=u32::MAX as f64).contains(&sample_rate) {
        return Err(AcquisitionError::InvalidSampleRate.into());
    }

    let spec = WavSpec {
        channels: CHANNELS,
        sample_rate: sample_rate as u32,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };

    let path = path.as_ref();
    let mut writer = WavWriter::create(path, spec)
        .with_context(|| format!("Failed to create recording: {}", path.display()))?;

    for ((&x, &y), &z) in samples.x.iter().zip(&samples.y).zip(&samples.z) {
        writer.write_sample(x as f32)?;
        writer.write_sample(y as f32)?;
        writer.write_sample(z as f32)?;
    }
    writer.finalize()?;

    info!("Wrote recording: {}", path.display());
    Ok(())
}

fn open_reader(path: &Path) -> Result<WavReader<BufReader<File>>> {
    WavReader::open(path).with_context(|| format!("Failed to open WAV file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_float_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("recording.wav");

        let recording = TriaxialRecording::uniform(
            vec![0.5, -0.25, 1.0],
            vec![0.0, 2.0, -3.5],
            vec![9.81, 9.75, 9.9],
            50.0,
        );
        write_recording_wav(&path, &recording)?;

        let mut source = FileSource::new(&path, 1.0)?;
        assert_eq!(source.sample_rate(), 50.0);
        let read = source.read_recording()?;
        assert_eq!(read.len(), 3);
        for (a, b) in read.samples.z.iter().zip(&recording.samples.z) {
            assert!((a - b).abs() < 1e-5);
        }
        assert_eq!(read.samples.y[2], -3.5);
        Ok(())
    }

    #[test]
    fn test_int_samples_scaled_by_full_scale() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("int.wav");
        let spec = WavSpec {
            channels: 3,
            sample_rate: 100,
            bits_per_sample: 16,
            sample_format: SampleFormat::Int,
        };
        let mut writer = WavWriter::create(&path, spec)?;
        for &v in &[16384i16, -16384, 0, 32767, -32768, 8192] {
            writer.write_sample(v)?;
        }
        writer.finalize()?;

        let mut source = FileSource::new(&path, 2.0)?;
        let recording = source.read_recording()?;
        assert_eq!(recording.samples.x, vec![1.0, 32767.0 / 16384.0]);
        assert_eq!(recording.samples.y, vec![-1.0, -2.0]);
        assert_eq!(recording.samples.z, vec![0.0, 0.5]);
        Ok(())
    }

    #[test]
    fn test_stereo_file_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec {
            channels: 2,
            sample_rate: 100,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(&path, spec)?;
        writer.write_sample(0.0f32)?;
        writer.write_sample(0.0f32)?;
        writer.finalize()?;

        let err = match FileSource::new(&path, 1.0) {
            Ok(_) => panic!("stereo file must be rejected"),
            Err(e) => e,
        };
        assert!(matches!(
            err.downcast_ref::<AcquisitionError>(),
            Some(AcquisitionError::ChannelCount { actual: 2, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        assert!(FileSource::new("/nonexistent/recording.wav", 1.0).is_err());
        assert!(open_reader(Path::new("/nonexistent/recording.wav")).is_err());
    }
}
