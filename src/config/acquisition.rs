// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Data acquisition configuration
//!
//! This module defines where the triaxial recording comes from.

use serde::{Deserialize, Serialize};

/// Standard gravity in m/s²
pub const STANDARD_GRAVITY: f64 = 9.81;

/// Configuration of the recording source.
///
/// # Input Sources
///
/// The configuration supports two mutually exclusive input sources:
/// * `input_file` - A 3-channel WAV file holding the x, y and z axes
/// * `simulated` - Synthetic tones and noise at `sample_rate` for `duration_seconds`
///
/// Without an input file the simulated source is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcquisitionConfig {
    /// The recording to analyze, mutually exclusive with `simulated`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_file: Option<String>,

    /// Use the simulated motion source
    #[serde(default)]
    pub simulated: bool,

    /// Sample rate of the simulated source in Hz
    #[serde(default = "default_sample_rate")]
    pub sample_rate: f64,

    /// Length of the simulated recording in seconds
    #[serde(default = "default_duration_seconds")]
    pub duration_seconds: f64,

    /// Acceleration in m/s² matching the full-scale value of integer WAV samples
    #[serde(default = "default_full_scale")]
    pub full_scale: f64,
}

fn default_sample_rate() -> f64 {
    100.0
}

fn default_duration_seconds() -> f64 {
    10.0
}

fn default_full_scale() -> f64 {
    // ±16 g accelerometer range
    STANDARD_GRAVITY * 16.0
}

impl Default for AcquisitionConfig {
    fn default() -> Self {
        Self {
            input_file: None,
            simulated: false,
            sample_rate: default_sample_rate(),
            duration_seconds: default_duration_seconds(),
            full_scale: default_full_scale(),
        }
    }
}
