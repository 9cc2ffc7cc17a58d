// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//!
//! # Spectral Analysis Module
//!
//! This module moves acceleration signals between the time and frequency
//! domains. The forward transform feeds the spectrum display and the
//! frequency weighting filter; the inverse transform rebuilds the weighted
//! time series the dose metrics are computed on.
//!
//! ## Architecture
//!
//! - `SpectralAnalyzer` trait defines the forward/inverse interface
//! - `FftAnalyzer` provides a concrete implementation using a real FFT
//! - `Spectrum` carries frequencies, magnitudes, phases and the raw bins
//! - Factory function `create_spectral_analyzer()` instantiates a suitable analyzer
//!
//! ## Usage
//!
//! ```
//! use rust_vibration::spectral::{self, WindowFunction};
//!
//! let analyzer = spectral::create_spectral_analyzer(WindowFunction::Rectangular);
//! let signal = vec![0.5f64; 200];
//! let spectrum = analyzer.forward_transform(&signal, 100.0).unwrap();
//!
//! println!("Number of frequency bins: {}", spectrum.len());
//! println!("Frequency resolution: {:.2} Hz", spectrum.resolution());
//! assert!((spectrum.magnitudes[0] - 0.5).abs() < 1e-12);
//! ```

pub mod fft;

pub use fft::{FftAnalyzer, SpectralAnalyzer, SpectralError, Spectrum, WindowFunction};

/// Create a new spectral analyzer applying `window` before the forward transform
///
/// Use [`WindowFunction::Rectangular`] whenever the spectrum is going to be
/// transformed back to the time domain.
pub fn create_spectral_analyzer(window: WindowFunction) -> Box<dyn SpectralAnalyzer> {
    Box::new(FftAnalyzer::new().with_window(window))
}
