// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Frequency weighting curves
//!
//! Human sensitivity to vibration depends on frequency and on the direction of
//! the excitation. The curves below approximate that sensitivity with closed-form
//! piecewise gains, cheap enough to evaluate once per FFT bin:
//!
//! | Kind | Use                         | Shape                                            |
//! |------|-----------------------------|--------------------------------------------------|
//! | `Wg` | motion sickness             | `0.5·√f` up to 4 Hz, flat 4–8 Hz, `8/f` above    |
//! | `Wb` | vertical whole-body         | `0.4·√f` 1–2 Hz, `f/5` 2–5 Hz, flat 5–16 Hz, `16/f` |
//! | `Wd` | horizontal whole-body       | flat 1–2 Hz, `2/f` above                         |
//!
//! All weighted curves return `0.0` below 1 Hz. This is a simplification of the
//! full standard curves, which keep a low-frequency skirt.
//!
//! # Example
//!
//! ```
//! use rust_vibration::preprocessing::weighting::{gain, FrequencyWeighting};
//!
//! assert_eq!(gain(0.0, FrequencyWeighting::Wb), 1.0); // DC is never attenuated
//! assert!((gain(10.0, FrequencyWeighting::Wd) - 0.2).abs() < 1e-12);
//! assert_eq!(FrequencyWeighting::Wg.gain(6.0), 1.0);
//! ```

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Named frequency weighting curve
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyWeighting {
    /// No weighting, every frequency passes with unit gain
    None,
    /// Motion sickness
    Wg,
    /// Vertical whole-body vibration
    #[default]
    Wb,
    /// Horizontal whole-body vibration
    Wd,
}

impl FrequencyWeighting {
    /// Every available weighting, in declaration order
    pub const ALL: [FrequencyWeighting; 4] = [
        FrequencyWeighting::None,
        FrequencyWeighting::Wg,
        FrequencyWeighting::Wb,
        FrequencyWeighting::Wd,
    ];

    /// `true` for every kind except [`FrequencyWeighting::None`]
    pub fn is_weighted(self) -> bool {
        self != FrequencyWeighting::None
    }

    /// Gain of this curve at `frequency` (Hz)
    pub fn gain(self, frequency: f64) -> f64 {
        gain(frequency, self)
    }

    /// Lowercase identifier used in configuration files and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            FrequencyWeighting::None => "none",
            FrequencyWeighting::Wg => "wg",
            FrequencyWeighting::Wb => "wb",
            FrequencyWeighting::Wd => "wd",
        }
    }
}

impl fmt::Display for FrequencyWeighting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FrequencyWeighting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(FrequencyWeighting::None),
            "wg" => Ok(FrequencyWeighting::Wg),
            "wb" => Ok(FrequencyWeighting::Wb),
            "wd" => Ok(FrequencyWeighting::Wd),
            other => Err(format!(
                "Unknown frequency weighting '{}' (expected none, wg, wb or wd)",
                other
            )),
        }
    }
}

/// Evaluate the gain of a weighting curve at the given frequency
///
/// The function is total: any frequency is accepted. Frequencies at or below
/// 0 Hz, and the [`FrequencyWeighting::None`] kind, always yield `1.0`, so the
/// DC bin of a spectrum passes through unchanged.
///
/// Segment boundaries belong to the higher segment, except for the upper edge
/// of each flat band which is inclusive (`Wg` is `1.0` at exactly 8 Hz, `Wb` at
/// exactly 16 Hz).
///
/// ### Arguments
///
/// * `frequency` - Frequency in Hz
/// * `kind` - Weighting curve to evaluate
///
/// ### Returns
///
/// The linear gain at `frequency`
pub fn gain(frequency: f64, kind: FrequencyWeighting) -> f64 {
    if frequency <= 0.0 {
        return 1.0;
    }

    match kind {
        FrequencyWeighting::None => 1.0,
        FrequencyWeighting::Wg => wg(frequency),
        FrequencyWeighting::Wb => wb(frequency),
        FrequencyWeighting::Wd => wd(frequency),
    }
}

fn wg(f: f64) -> f64 {
    if f < 1.0 {
        0.0
    } else if f < 4.0 {
        0.5 * f.sqrt()
    } else if f <= 8.0 {
        1.0
    } else {
        8.0 / f
    }
}

fn wb(f: f64) -> f64 {
    if f < 1.0 {
        0.0
    } else if f < 2.0 {
        0.4 * f.sqrt()
    } else if f < 5.0 {
        f / 5.0
    } else if f <= 16.0 {
        1.0
    } else {
        16.0 / f
    }
}

fn wd(f: f64) -> f64 {
    if f < 1.0 {
        0.0
    } else if f < 2.0 {
        1.0
    } else {
        2.0 / f
    }
}
