// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Rust Vibration library
//!
//! This library computes whole-body vibration metrics from triaxial
//! acceleration recordings: amplitude spectra, frequency-weighted time series,
//! RMS, VDV and MTVV per axis, and the combined triaxial VDV.
//!
//! # Example
//!
//! ```
//! use rust_vibration::analysis::{AnalysisOrchestrator, TriaxialSamples};
//! use rust_vibration::config::AnalysisConfig;
//!
//! let rate = 100.0;
//! let z: Vec<f64> = (0..1000)
//!     .map(|i| (2.0 * std::f64::consts::PI * 8.0 * i as f64 / rate).sin())
//!     .collect();
//! let samples = TriaxialSamples::new(vec![0.0; 1000], vec![0.0; 1000], z, rate);
//!
//! let report = AnalysisOrchestrator::new(AnalysisConfig::default())
//!     .analyze(&samples)
//!     .unwrap();
//! let dose = report.z.dose.unwrap();
//! assert!((dose.rms.unwrap() - 1.0 / 2f64.sqrt()).abs() < 1e-6);
//! ```

pub mod acquisition;
pub mod analysis;
pub mod config;
pub mod dose;
pub mod preprocessing;
pub mod spectral;
pub mod utility;
