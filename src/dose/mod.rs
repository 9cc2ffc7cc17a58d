// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Vibration Dose Module
//!
//! Scalar summaries of a (usually frequency-weighted) acceleration series:
//!
//! - **RMS**: overall energy of the signal
//! - **VDV**: fourth-power dose, sensitive to shocks
//! - **MTVV**: maximum one-second running RMS, flags transient events
//! - **Peak** and **crest factor**: tell whether RMS alone is representative
//!
//! [`DoseResult`] is the raw numeric bundle where unavailable values read
//! `0.0`. [`AxisDose`] is what reports carry: each value is `None` when it
//! could not be computed, so a missing measurement is never confused with a
//! perfectly still one.

pub mod metrics;

use serde::{Deserialize, Serialize};

pub use metrics::{crest_factor, mtvv, peak, rms, vdv, vdv_total, DEFAULT_MTVV_WINDOW_SECONDS};

/// Raw dose values for one axis, `0.0` where preconditions fail
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DoseResult {
    pub rms: f64,
    pub vdv: f64,
    pub mtvv: f64,
}

impl DoseResult {
    /// Compute RMS, VDV and MTVV of `series`
    pub fn compute(series: &[f64], sample_rate: f64, mtvv_window_seconds: f64) -> Self {
        Self {
            rms: rms(series),
            vdv: vdv(series, sample_rate),
            mtvv: mtvv(series, sample_rate, mtvv_window_seconds),
        }
    }
}

/// Dose values for one axis with explicit availability
///
/// ```
/// use rust_vibration::dose::AxisDose;
///
/// // Three samples at 10 Hz are shorter than a one-second MTVV window
/// let dose = AxisDose::evaluate(&[1.0, 2.0, 3.0], 10.0, 1.0);
/// assert!(dose.rms.is_some());
/// assert!(dose.vdv.is_some());
/// assert_eq!(dose.mtvv, None);
///
/// let missing = AxisDose::evaluate(&[], 10.0, 1.0);
/// assert_eq!(missing, AxisDose::default());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisDose {
    /// RMS, unavailable for an empty series
    pub rms: Option<f64>,
    /// VDV, unavailable for an empty series or an invalid sample rate
    pub vdv: Option<f64>,
    /// MTVV, unavailable when no complete window fits in the series
    pub mtvv: Option<f64>,
    /// Peak absolute value, unavailable for an empty series
    pub peak: Option<f64>,
    /// Peak over RMS, unavailable when the RMS is missing or zero
    pub crest_factor: Option<f64>,
}

impl AxisDose {
    /// Compute every dose value of `series`, marking unavailable ones as `None`
    pub fn evaluate(series: &[f64], sample_rate: f64, mtvv_window_seconds: f64) -> Self {
        if series.is_empty() {
            return Self::default();
        }

        let rate_ok = sample_rate > 0.0 && sample_rate.is_finite();
        let window_fits = metrics::mtvv_window_samples(sample_rate, mtvv_window_seconds)
            .is_some_and(|window| window <= series.len());

        Self {
            rms: Some(rms(series)),
            vdv: rate_ok.then(|| vdv(series, sample_rate)),
            mtvv: window_fits.then(|| mtvv(series, sample_rate, mtvv_window_seconds)),
            peak: Some(peak(series)),
            crest_factor: crest_factor(series),
        }
    }

    /// Raw values with unavailable entries replaced by `0.0`
    pub fn to_result(&self) -> DoseResult {
        DoseResult {
            rms: self.rms.unwrap_or(0.0),
            vdv: self.vdv.unwrap_or(0.0),
            mtvv: self.mtvv.unwrap_or(0.0),
        }
    }
}

/// Combine per-axis VDVs into the triaxial total
///
/// Unavailable axes are left out of the sum; `None` when no axis has a VDV.
pub fn combined_vdv<I>(vdvs: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let available: Vec<f64> = vdvs.into_iter().flatten().collect();
    if available.is_empty() {
        None
    } else {
        Some(vdv_total(&available))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dose_result_matches_metrics() {
        let series = [1.0, 2.0, 2.0, 1.0];
        let result = DoseResult::compute(&series, 2.0, 1.0);
        assert_eq!(result.rms, rms(&series));
        assert_eq!(result.vdv, vdv(&series, 2.0));
        assert_eq!(result.mtvv, mtvv(&series, 2.0, 1.0));
    }

    #[test]
    fn test_zero_signal_is_available_and_zero() {
        let dose = AxisDose::evaluate(&[0.0; 20], 10.0, 1.0);
        assert_eq!(dose.rms, Some(0.0));
        assert_eq!(dose.vdv, Some(0.0));
        assert_eq!(dose.mtvv, Some(0.0));
        assert_eq!(dose.peak, Some(0.0));
        assert_eq!(dose.crest_factor, None);
    }

    #[test]
    fn test_invalid_rate_marks_rate_dependent_values() {
        let dose = AxisDose::evaluate(&[1.0, -1.0], 0.0, 1.0);
        assert_eq!(dose.rms, Some(1.0));
        assert_eq!(dose.vdv, None);
        assert_eq!(dose.mtvv, None);
        assert_eq!(dose.to_result().vdv, 0.0);
    }

    #[test]
    fn test_to_result_round_trip() {
        let series = [2.0, 2.0, 2.0, 2.0, 2.0];
        let dose = AxisDose::evaluate(&series, 1.0, 1.0);
        assert_eq!(dose.to_result(), DoseResult::compute(&series, 1.0, 1.0));
        assert_eq!(dose.crest_factor, Some(1.0));
    }

    #[test]
    fn test_combined_vdv() {
        assert_eq!(combined_vdv([None, None, None]), None);
        assert_eq!(combined_vdv([Some(2.0), None, None]), Some(2.0));
        let total = combined_vdv([Some(1.0), Some(1.0), Some(1.0)]).unwrap();
        assert!((total - 3f64.powf(0.25)).abs() < 1e-12);
    }
}
