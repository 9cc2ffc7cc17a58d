// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Motion acquisition module
//!
//! This module provides triaxial acceleration recordings to the analysis
//! pipeline, either from 3-channel WAV files or from a simulated source.
//! Live sensor capture is left to the host application; it only has to hand
//! over timestamped samples through [`TriaxialRecording::from_timestamped`].

mod file;
mod simulated;

use anyhow::Result;
use log::debug;
use std::path::Path;

use crate::analysis::TriaxialSamples;
use crate::config::AcquisitionConfig;

pub use file::{write_recording_wav, AcquisitionError, FileSource};
pub use simulated::{AxisTone, SimulatedSource};

/// Represents a motion source (recorded file or simulation)
pub trait MotionSource: Send {
    /// Read the complete recording held by this source
    fn read_recording(&mut self) -> Result<TriaxialRecording>;

    /// Get the nominal sample rate of this source in Hz
    fn sample_rate(&self) -> f64;
}

/// Triaxial acceleration samples with their capture timestamps
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TriaxialRecording {
    /// Capture time of every sample in seconds
    pub timestamps: Vec<f64>,
    pub samples: TriaxialSamples,
}

impl TriaxialRecording {
    /// Build a recording sampled at a fixed rate, timestamps starting at zero
    pub fn uniform(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>, sample_rate: f64) -> Self {
        let len = x.len().max(y.len()).max(z.len());
        let timestamps = if sample_rate > 0.0 && sample_rate.is_finite() {
            (0..len).map(|i| i as f64 / sample_rate).collect()
        } else {
            Vec::new()
        };

        Self {
            timestamps,
            samples: TriaxialSamples::new(x, y, z, sample_rate),
        }
    }

    /// Build a recording from captured timestamps
    ///
    /// The sample rate is the average effective rate of the timestamps. When
    /// it cannot be estimated the rate is `0.0`, which the analysis treats as
    /// invalid.
    ///
    /// ```
    /// use rust_vibration::acquisition::TriaxialRecording;
    ///
    /// let t = vec![0.0, 0.01, 0.02, 0.03, 0.04];
    /// let recording = TriaxialRecording::from_timestamped(
    ///     t,
    ///     vec![0.0; 5],
    ///     vec![0.0; 5],
    ///     vec![9.81; 5],
    /// );
    /// assert!((recording.samples.sample_rate - 100.0).abs() < 1e-9);
    /// ```
    pub fn from_timestamped(timestamps: Vec<f64>, x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> Self {
        let sample_rate = estimate_sample_rate(&timestamps).unwrap_or(0.0);
        debug!(
            "Estimated sample rate {:.3} Hz from {} timestamps",
            sample_rate,
            timestamps.len()
        );

        Self {
            timestamps,
            samples: TriaxialSamples::new(x, y, z, sample_rate),
        }
    }

    /// Number of samples per axis (length of the x series)
    pub fn len(&self) -> usize {
        self.samples.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn into_samples(self) -> TriaxialSamples {
        self.samples
    }
}

/// Average effective sample rate of a sequence of timestamps in seconds
///
/// `(n - 1) / (t_last - t_first)`; `None` with fewer than two timestamps or
/// when the span is not a positive finite duration.
pub fn estimate_sample_rate(timestamps: &[f64]) -> Option<f64> {
    let (first, last) = match (timestamps.first(), timestamps.last()) {
        (Some(&first), Some(&last)) if timestamps.len() >= 2 => (first, last),
        _ => return None,
    };

    let span = last - first;
    if span > 0.0 && span.is_finite() {
        Some((timestamps.len() - 1) as f64 / span)
    } else {
        None
    }
}

/// Get a motion source from the specified WAV file
pub fn get_motion_source_from_file<P: AsRef<Path>>(
    file_path: P,
    full_scale: f64,
) -> Result<Box<dyn MotionSource>> {
    Ok(Box::new(FileSource::new(file_path, full_scale)?))
}

/// Get a simulated motion source
pub fn get_simulated_motion_source(
    sample_rate: f64,
    duration_seconds: f64,
) -> Result<Box<dyn MotionSource>> {
    Ok(Box::new(SimulatedSource::new(sample_rate, duration_seconds)?))
}

/// Get the motion source described by the acquisition configuration
///
/// A configured input file wins; otherwise a simulated source is created.
pub fn get_motion_source(config: &AcquisitionConfig) -> Result<Box<dyn MotionSource>> {
    match &config.input_file {
        Some(path) if !config.simulated => get_motion_source_from_file(path, config.full_scale),
        _ => get_simulated_motion_source(config.sample_rate, config.duration_seconds),
    }
}
