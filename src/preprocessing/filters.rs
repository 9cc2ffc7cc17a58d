// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Spectral-domain frequency weighting
//!
//! Weighting is applied in the frequency domain: the signal is transformed,
//! every bin is multiplied by the gain of the selected curve at the bin
//! frequency, and the weighted spectrum is transformed back. There is no
//! time-domain filter state, so the output has exactly the input length and no
//! start-up transient.
//!
//! # Examples
//!
//! ```
//! use rust_vibration::preprocessing::filters::{apply_weighting, Filter, SpectralWeightingFilter};
//! use rust_vibration::preprocessing::weighting::FrequencyWeighting;
//! use std::f64::consts::PI;
//!
//! // 10 Hz tone sampled at 100 Hz: Wd has a gain of 2/10 there
//! let signal: Vec<f64> = (0..200)
//!     .map(|i| (2.0 * PI * 10.0 * i as f64 / 100.0).sin())
//!     .collect();
//!
//! let weighted = apply_weighting(&signal, 100.0, FrequencyWeighting::Wd).unwrap();
//! assert_eq!(weighted.len(), signal.len());
//! assert!((weighted[5] - 0.2 * signal[5]).abs() < 1e-9);
//!
//! // The same operation through the Filter trait
//! let filter = SpectralWeightingFilter::new(FrequencyWeighting::Wd).with_sample_rate(100.0);
//! assert_eq!(filter.apply(&signal), weighted);
//! ```

use log::{debug, error, warn};

use super::weighting::{gain, FrequencyWeighting};
use crate::spectral::{FftAnalyzer, SpectralAnalyzer, SpectralError, Spectrum};

/// Trait for implementing filters over acceleration time series
///
/// All filters are thread-safe and return a new vector of the same length as
/// their input.
pub trait Filter: Send + Sync {
    /// Apply the filter to a signal and return the filtered signal
    fn apply(&self, signal: &[f64]) -> Vec<f64>;
}

/// Frequency weighting filter operating on the FFT of the whole signal
///
/// ### Examples
///
/// ```
/// use rust_vibration::preprocessing::filters::{Filter, SpectralWeightingFilter};
/// use rust_vibration::preprocessing::weighting::FrequencyWeighting;
///
/// let filter = SpectralWeightingFilter::new(FrequencyWeighting::Wb).with_sample_rate(50.0);
/// let output = filter.apply(&[0.1, 0.4, -0.2, 0.3]);
/// assert_eq!(output.len(), 4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SpectralWeightingFilter {
    weighting: FrequencyWeighting,
    sample_rate: f64,
}

impl SpectralWeightingFilter {
    /// Create a filter for the given weighting curve
    ///
    /// The sample rate defaults to 100 Hz, a typical rate for phone motion
    /// sensors.
    pub fn new(weighting: FrequencyWeighting) -> Self {
        Self {
            weighting,
            sample_rate: 100.0,
        }
    }

    /// Set the sample rate of the signals this filter will receive
    pub fn with_sample_rate(mut self, sample_rate: f64) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    /// Weighting curve applied by this filter
    pub fn weighting(&self) -> FrequencyWeighting {
        self.weighting
    }

    /// Sample rate in Hz
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Fallible form of [`Filter::apply`]
    pub fn try_apply(&self, signal: &[f64]) -> Result<Vec<f64>, SpectralError> {
        apply_weighting(signal, self.sample_rate, self.weighting)
    }
}

impl Filter for SpectralWeightingFilter {
    fn apply(&self, signal: &[f64]) -> Vec<f64> {
        match self.try_apply(signal) {
            Ok(weighted) => weighted,
            Err(e) => {
                error!("Frequency weighting {} failed: {}", self.weighting, e);
                signal.to_vec()
            }
        }
    }
}

/// Apply a frequency weighting to a time series
///
/// ### Arguments
///
/// * `samples` - Input time series
/// * `sample_rate` - Sample rate in Hz
/// * `kind` - Weighting curve
///
/// ### Returns
///
/// The weighted time series, same length as `samples`. The input is returned
/// unchanged, without any transform, when `kind` is
/// [`FrequencyWeighting::None`], when `samples` is empty, or when
/// `sample_rate` is not a positive finite number (no frequency axis exists).
///
/// ### Errors
///
/// Only FFT backend failures are reported.
pub fn apply_weighting(
    samples: &[f64],
    sample_rate: f64,
    kind: FrequencyWeighting,
) -> Result<Vec<f64>, SpectralError> {
    if !kind.is_weighted() || samples.is_empty() {
        return Ok(samples.to_vec());
    }
    if sample_rate <= 0.0 || !sample_rate.is_finite() {
        warn!(
            "Cannot apply {} weighting with sample rate {} Hz, passing signal through",
            kind, sample_rate
        );
        return Ok(samples.to_vec());
    }

    let analyzer = FftAnalyzer::new();
    let spectrum = analyzer.forward_transform(samples, sample_rate)?;
    let weighted = weight_spectrum(&spectrum, kind);
    debug!(
        "Applied {} weighting to {} samples at {} Hz",
        kind,
        samples.len(),
        sample_rate
    );

    analyzer.inverse_transform(&weighted, samples.len())
}

/// Multiply every bin of a spectrum by the gain of `kind` at the bin frequency
///
/// The DC bin always receives a gain of `1.0`.
pub fn weight_spectrum(spectrum: &Spectrum, kind: FrequencyWeighting) -> Spectrum {
    if !kind.is_weighted() {
        return spectrum.clone();
    }
    spectrum.scaled(|frequency| gain(frequency, kind))
}
