// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Fast Fourier Transform (FFT) implementation for spectral analysis
//!
//! This module converts acceleration time series to the frequency domain and
//! back. It includes:
//!
//! - The [`SpectralAnalyzer`] trait with a forward and an inverse transform
//! - [`FftAnalyzer`], an implementation backed by the `realfft` crate
//! - The [`Spectrum`] value produced by the forward transform and consumed by
//!   the inverse transform
//! - Optional window functions for display spectra
//!
//! # Example
//!
//! ```
//! use rust_vibration::spectral::fft::{FftAnalyzer, SpectralAnalyzer};
//!
//! // A 4 Hz tone of amplitude 2.0 sampled at 128 Hz for 2 seconds
//! let sample_rate = 128.0;
//! let signal: Vec<f64> = (0..256)
//!     .map(|i| 2.0 * (2.0 * std::f64::consts::PI * 4.0 * i as f64 / sample_rate).sin())
//!     .collect();
//!
//! let analyzer = FftAnalyzer::new();
//! let spectrum = analyzer.forward_transform(&signal, sample_rate).unwrap();
//! assert_eq!(spectrum.len(), 128);
//! assert!((spectrum.amplitude_at(4.0).unwrap() - 2.0).abs() < 1e-9);
//!
//! // The inverse transform restores the original samples
//! let restored = analyzer.inverse_transform(&spectrum, signal.len()).unwrap();
//! assert!((restored[10] - signal[10]).abs() < 1e-9);
//! ```
//!
//! # Normalization
//!
//! Magnitudes are amplitude-correct: the DC bin is divided by `N` and every
//! other bin is multiplied by `2/N`, so a sine of amplitude `A` landing exactly
//! on a bin reads `A`. The raw complex bins are kept unnormalized and the
//! inverse transform applies the matching `1/N`.

use std::f64::consts::PI;

use clap::ValueEnum;
use realfft::{num_complex::Complex64, RealFftPlanner};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by spectral transforms
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpectralError {
    /// The FFT backend rejected the transform
    #[error("FFT backend failure: {0}")]
    Transform(String),

    /// A spectrum and a signal length do not describe the same transform
    #[error("Transform length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Trait for implementing spectral analysis algorithms
///
/// Implementations must be thread-safe so that the three axes of a recording
/// can be transformed concurrently with a shared analyzer.
pub trait SpectralAnalyzer: Send + Sync {
    /// Transform a real time series to the frequency domain
    ///
    /// ### Parameters
    ///
    /// * `samples` - The time-domain signal
    /// * `sample_rate` - The sample rate of the signal in Hz
    ///
    /// ### Returns
    ///
    /// A [`Spectrum`] with `samples.len() / 2` display bins. An empty input
    /// yields an empty spectrum, not an error.
    ///
    /// ### Errors
    ///
    /// [`SpectralError::Transform`] if the FFT backend fails.
    fn forward_transform(&self, samples: &[f64], sample_rate: f64)
        -> Result<Spectrum, SpectralError>;

    /// Reconstruct a real time series of `length` samples from a spectrum
    ///
    /// The spectrum may have been modified (weighted) since it was produced.
    ///
    /// ### Errors
    ///
    /// * [`SpectralError::LengthMismatch`] if `length` is not the length the
    ///   spectrum was computed from
    /// * [`SpectralError::Transform`] if the FFT backend fails
    fn inverse_transform(&self, spectrum: &Spectrum, length: usize)
        -> Result<Vec<f64>, SpectralError>;
}

/// Frequency-domain representation of a real time series
///
/// `frequencies`, `magnitudes` and `phases` are parallel vectors of `N/2`
/// entries for an input of `N` samples, with `frequencies[k] = k * sample_rate / N`.
/// The complete one-sided complex spectrum (`N/2 + 1` unnormalized bins, Nyquist
/// included) is retained privately so the inverse transform is exact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrum {
    /// Bin frequencies in Hz, ascending from 0
    pub frequencies: Vec<f64>,

    /// Amplitude-normalized magnitude per bin, in the unit of the input
    pub magnitudes: Vec<f64>,

    /// Phase per bin in radians, in `[-π, π]`
    pub phases: Vec<f64>,

    /// Sample rate of the original signal in Hz
    pub sample_rate: f64,

    /// Number of time-domain samples the spectrum was computed from
    pub sample_count: usize,

    #[serde(skip)]
    bins: Vec<Complex64>,
}

impl Spectrum {
    /// Spectrum of an empty signal
    pub fn empty(sample_rate: f64) -> Self {
        Self {
            frequencies: Vec::new(),
            magnitudes: Vec::new(),
            phases: Vec::new(),
            sample_rate,
            sample_count: 0,
            bins: Vec::new(),
        }
    }

    /// Build a spectrum from raw one-sided FFT bins
    ///
    /// `bins` must hold `sample_count / 2 + 1` values (none for an empty signal).
    pub fn from_bins(
        bins: Vec<Complex64>,
        sample_count: usize,
        sample_rate: f64,
    ) -> Result<Self, SpectralError> {
        let expected = one_sided_len(sample_count);
        if bins.len() != expected {
            return Err(SpectralError::LengthMismatch {
                expected,
                actual: bins.len(),
            });
        }

        Ok(Self::assemble(bins, sample_count, sample_rate))
    }

    fn assemble(bins: Vec<Complex64>, sample_count: usize, sample_rate: f64) -> Self {
        if sample_count == 0 {
            return Self::empty(sample_rate);
        }

        let n = sample_count as f64;
        let df = frequency_resolution(sample_rate, sample_count);
        let useful_bins = sample_count / 2;

        let mut frequencies = Vec::with_capacity(useful_bins);
        let mut magnitudes = Vec::with_capacity(useful_bins);
        let mut phases = Vec::with_capacity(useful_bins);

        for (k, bin) in bins.iter().take(useful_bins).enumerate() {
            let scale = if k == 0 { 1.0 / n } else { 2.0 / n };
            frequencies.push(k as f64 * df);
            magnitudes.push(bin.norm() * scale);
            phases.push(bin.arg());
        }

        Self {
            frequencies,
            magnitudes,
            phases,
            sample_rate,
            sample_count,
            bins,
        }
    }

    /// Number of display bins (`N/2`)
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// `true` when there is no display bin, as for signals shorter than two samples
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Frequency spacing between bins in Hz
    pub fn resolution(&self) -> f64 {
        frequency_resolution(self.sample_rate, self.sample_count)
    }

    /// Raw one-sided complex bins (`N/2 + 1` values, unnormalized)
    pub fn bins(&self) -> &[Complex64] {
        &self.bins
    }

    /// Unnormalized real parts of the `N/2` display bins
    pub fn real_parts(&self) -> Vec<f64> {
        self.bins.iter().take(self.len()).map(|c| c.re).collect()
    }

    /// Unnormalized imaginary parts of the `N/2` display bins
    pub fn imag_parts(&self) -> Vec<f64> {
        self.bins.iter().take(self.len()).map(|c| c.im).collect()
    }

    /// New spectrum whose bins are multiplied by `gain_at(frequency)`
    ///
    /// Every bin, Nyquist included, is scaled; magnitudes and phases are
    /// recomputed.
    pub fn scaled<F>(&self, gain_at: F) -> Spectrum
    where
        F: Fn(f64) -> f64,
    {
        let df = self.resolution();
        let bins = self
            .bins
            .iter()
            .enumerate()
            .map(|(k, &bin)| bin * gain_at(k as f64 * df))
            .collect();

        Self::assemble(bins, self.sample_count, self.sample_rate)
    }

    /// Magnitude of the bin closest to `frequency`
    ///
    /// Returns `None` if the frequency is outside the analyzed range or the
    /// spectrum has no valid frequency axis.
    pub fn amplitude_at(&self, frequency: f64) -> Option<f64> {
        let df = self.resolution();
        if df <= 0.0 || frequency < 0.0 || !frequency.is_finite() {
            return None;
        }

        let bin = (frequency / df).round() as usize;
        self.magnitudes.get(bin).copied()
    }

    /// Frequency and magnitude of the strongest non-DC bin
    pub fn dominant_frequency(&self) -> Option<(f64, f64)> {
        self.frequencies
            .iter()
            .zip(self.magnitudes.iter())
            .skip(1)
            .fold(None, |best: Option<(f64, f64)>, (&f, &m)| match best {
                Some((_, best_m)) if best_m >= m => best,
                _ => Some((f, m)),
            })
    }
}

fn one_sided_len(sample_count: usize) -> usize {
    if sample_count == 0 {
        0
    } else {
        sample_count / 2 + 1
    }
}

fn frequency_resolution(sample_rate: f64, sample_count: usize) -> f64 {
    if sample_count == 0 || sample_rate <= 0.0 || !sample_rate.is_finite() {
        return 0.0;
    }
    sample_rate / sample_count as f64
}

/// Available window functions for display spectra
///
/// Windowing tapers the frame edges to reduce spectral leakage at the cost of
/// amplitude accuracy. It breaks the inverse-transform round trip, so the
/// weighting path always uses [`WindowFunction::Rectangular`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WindowFunction {
    /// Rectangular window (no windowing)
    #[default]
    Rectangular,
    /// Raised cosine window
    Hann,
    /// Three-term Blackman window
    Blackman,
}

/// FFT-based spectral analyzer
///
/// A fresh FFT plan is built for every call, so the analyzer holds no mutable
/// state and a single instance can be shared between threads. Any signal length
/// is accepted; `realfft` handles mixed radices.
///
/// ### Example
///
/// ```
/// use rust_vibration::spectral::fft::{FftAnalyzer, SpectralAnalyzer, WindowFunction};
///
/// let analyzer = FftAnalyzer::new().with_window(WindowFunction::Hann);
/// let spectrum = analyzer.forward_transform(&[0.0f64; 100], 50.0).unwrap();
/// assert_eq!(spectrum.len(), 50);
/// assert!((spectrum.resolution() - 0.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FftAnalyzer {
    window_function: WindowFunction,
}

impl FftAnalyzer {
    /// Create an analyzer with a rectangular window
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the window applied before the forward transform
    pub fn with_window(mut self, window_function: WindowFunction) -> Self {
        self.window_function = window_function;
        self
    }

    /// Window applied before the forward transform
    pub fn window_function(&self) -> WindowFunction {
        self.window_function
    }

    /// Apply the configured window function to a signal
    ///
    /// Signals shorter than two samples are returned unchanged.
    ///
    /// ### Example
    ///
    /// ```
    /// use rust_vibration::spectral::fft::{FftAnalyzer, WindowFunction};
    /// let analyzer = FftAnalyzer::new().with_window(WindowFunction::Hann);
    /// let signal = vec![1.0f64; 64];
    /// let windowed = analyzer.apply_window(&signal);
    /// assert!(windowed[0] < signal[0]);
    /// assert!(windowed[63] < signal[63]);
    /// ```
    pub fn apply_window(&self, signal: &[f64]) -> Vec<f64> {
        if signal.len() < 2 || self.window_function == WindowFunction::Rectangular {
            return signal.to_vec();
        }

        let last = (signal.len() - 1) as f64;
        signal
            .iter()
            .enumerate()
            .map(|(i, &sample)| {
                let x = i as f64 / last;
                let window_factor = match self.window_function {
                    WindowFunction::Rectangular => 1.0,
                    WindowFunction::Hann => 0.5 * (1.0 - (2.0 * PI * x).cos()),
                    WindowFunction::Blackman => {
                        0.42 - 0.5 * (2.0 * PI * x).cos() + 0.08 * (4.0 * PI * x).cos()
                    }
                };
                sample * window_factor
            })
            .collect()
    }

    /// Compute the one-sided FFT of a real signal
    fn compute_fft(&self, mut signal: Vec<f64>) -> Result<Vec<Complex64>, SpectralError> {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(signal.len());
        let mut spectrum = r2c.make_output_vec();

        // `signal` doubles as scratch space and is clobbered here
        r2c.process(&mut signal, &mut spectrum)
            .map_err(|e| SpectralError::Transform(e.to_string()))?;

        Ok(spectrum)
    }
}

impl SpectralAnalyzer for FftAnalyzer {
    fn forward_transform(
        &self,
        samples: &[f64],
        sample_rate: f64,
    ) -> Result<Spectrum, SpectralError> {
        if samples.is_empty() {
            return Ok(Spectrum::empty(sample_rate));
        }

        let windowed = self.apply_window(samples);
        let bins = self.compute_fft(windowed)?;

        Ok(Spectrum::assemble(bins, samples.len(), sample_rate))
    }

    fn inverse_transform(
        &self,
        spectrum: &Spectrum,
        length: usize,
    ) -> Result<Vec<f64>, SpectralError> {
        if length != spectrum.sample_count {
            return Err(SpectralError::LengthMismatch {
                expected: spectrum.sample_count,
                actual: length,
            });
        }
        if length == 0 {
            return Ok(Vec::new());
        }

        let mut input = spectrum.bins.clone();
        // DC and (for even lengths) Nyquist must be purely real
        input[0].im = 0.0;
        if length % 2 == 0 {
            if let Some(nyquist) = input.last_mut() {
                nyquist.im = 0.0;
            }
        }

        let mut planner = RealFftPlanner::<f64>::new();
        let c2r = planner.plan_fft_inverse(length);
        let mut output = c2r.make_output_vec();
        c2r.process(&mut input, &mut output)
            .map_err(|e| SpectralError::Transform(e.to_string()))?;

        let scale = 1.0 / length as f64;
        Ok(output.into_iter().map(|x| x * scale).collect())
    }
}
