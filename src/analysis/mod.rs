// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Triaxial Vibration Analysis
//!
//! This module ties the spectral, weighting and dose building blocks together
//! for the three axes of an accelerometer recording.
//!
//! - [`AnalysisOrchestrator`] runs one analysis synchronously and guards it
//!   with an [`AnalysisState`] machine (`Idle → Computing → Ready | Failed`).
//! - [`AnalysisService`] submits analyses to the tokio blocking pool, copies
//!   the input at submission time and lets the latest request win.
//!
//! ## Per-axis pipeline
//!
//! ```text
//! samples ──► forward FFT ──► display spectrum
//!                 │
//!                 └─► × gain(f) ──► weighted spectrum ──► inverse FFT
//!                                                            │
//!                             RMS / VDV / MTVV ◄── weighted series
//! ```
//!
//! The three per-axis VDVs are then combined into the triaxial total.

pub mod orchestrator;
pub mod samples;
pub mod service;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::dose::AxisDose;
use crate::preprocessing::FrequencyWeighting;
use crate::spectral::{SpectralError, Spectrum};

pub use orchestrator::{AnalysisOrchestrator, AnalysisState};
pub use samples::{Axis, TriaxialSamples};
pub use service::{AnalysisOutcome, AnalysisService, AnalysisTicket};

/// Errors reported by an analysis run
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    /// Another analysis is running on the same orchestrator
    #[error("an analysis is already in progress")]
    Busy,

    /// The three axes do not hold the same number of samples
    #[error("axis lengths differ (x: {x}, y: {y}, z: {z})")]
    AxisLengthMismatch { x: usize, y: usize, z: usize },

    /// The FFT backend failed on one axis
    #[error("spectral transform failed on axis {axis}: {source}")]
    Transform {
        axis: Axis,
        #[source]
        source: SpectralError,
    },

    /// The background task running the analysis did not complete
    #[error("analysis task failed: {0}")]
    TaskFailed(String),
}

/// Results of one axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisAnalysis {
    pub axis: Axis,
    /// Unweighted spectrum of the raw samples, for display
    pub spectrum: Spectrum,
    /// Spectrum after the weighting curve, when a weighting is selected and
    /// the sample rate is valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_spectrum: Option<Spectrum>,
    /// Weighted time series, when a weighting is selected and the series is kept
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weighted_series: Option<Vec<f64>>,
    /// Dose values of the weighted series, when a weighting is selected
    pub dose: Option<AxisDose>,
}

impl AxisAnalysis {
    /// VDV of this axis, if computed and available
    pub fn vdv(&self) -> Option<f64> {
        self.dose.and_then(|dose| dose.vdv)
    }
}

/// Complete result of a triaxial analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub weighting: FrequencyWeighting,
    /// Sample rate the analysis ran with, in Hz
    pub sample_rate: f64,
    /// Number of samples per axis
    pub sample_count: usize,
    pub mtvv_window_seconds: f64,
    pub x: AxisAnalysis,
    pub y: AxisAnalysis,
    pub z: AxisAnalysis,
    /// Fourth-power sum of the available axis VDVs
    pub vdv_total: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl AnalysisReport {
    pub fn axis(&self, axis: Axis) -> &AxisAnalysis {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// Frequency axis shared by the three spectra
    pub fn frequencies(&self) -> &[f64] {
        &self.x.spectrum.frequencies
    }

    pub fn axes(&self) -> [&AxisAnalysis; 3] {
        [&self.x, &self.y, &self.z]
    }
}
