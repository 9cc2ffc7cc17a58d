// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Analysis configuration
//!
//! This module defines the settings of the vibration analysis pipeline:
//! the frequency weighting, the MTVV window and how the spectra are computed.

use serde::{Deserialize, Serialize};

use crate::dose::DEFAULT_MTVV_WINDOW_SECONDS;
use crate::preprocessing::FrequencyWeighting;
use crate::spectral::WindowFunction;

/// Configuration for the vibration analysis pipeline.
///
/// # Example
///
/// ```
/// use rust_vibration::config::AnalysisConfig;
/// use rust_vibration::preprocessing::FrequencyWeighting;
///
/// let config = AnalysisConfig {
///     weighting: FrequencyWeighting::Wd,
///     mtvv_window_seconds: 1.0,
///     ..AnalysisConfig::default()
/// };
/// assert!(config.parallel_axes);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Frequency weighting applied before computing the dose values.
    ///
    /// `none` disables the weighted path: only the unweighted spectra are
    /// reported.
    #[serde(default)]
    pub weighting: FrequencyWeighting,

    /// Integration window of the MTVV running RMS in seconds
    #[serde(default = "default_mtvv_window_seconds")]
    pub mtvv_window_seconds: f64,

    /// Window function used for the displayed spectra only.
    ///
    /// The weighting path always transforms the raw samples.
    #[serde(default)]
    pub display_window: WindowFunction,

    /// Compute the three axes concurrently
    #[serde(default = "default_true")]
    pub parallel_axes: bool,

    /// Keep the weighted time series in the analysis report
    #[serde(default = "default_true")]
    pub keep_weighted_series: bool,
}

fn default_mtvv_window_seconds() -> f64 {
    DEFAULT_MTVV_WINDOW_SECONDS
}

fn default_true() -> bool {
    true
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            weighting: FrequencyWeighting::default(),
            mtvv_window_seconds: default_mtvv_window_seconds(),
            display_window: WindowFunction::default(),
            parallel_axes: true,
            keep_weighted_series: true,
        }
    }
}
