// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Scalar vibration dose statistics
//!
//! All functions are pure and total. Inputs that make a metric meaningless
//! (empty series, non-positive sample rate, series shorter than the MTVV
//! window) yield `0.0` instead of an error; [`super::AxisDose`] turns those
//! cases into explicit "unavailable" values.

/// Default MTVV integration window in seconds
pub const DEFAULT_MTVV_WINDOW_SECONDS: f64 = 1.0;

/// Root-mean-square value, `sqrt(mean(x²))`
///
/// ```
/// use rust_vibration::dose::metrics::rms;
/// assert!((rms(&[3.0, -3.0, 3.0, -3.0]) - 3.0).abs() < 1e-12);
/// assert_eq!(rms(&[]), 0.0);
/// ```
pub fn rms(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let sum_of_squares: f64 = series.iter().map(|x| x * x).sum();
    (sum_of_squares / series.len() as f64).sqrt()
}

/// Vibration Dose Value, `(Σ x⁴ · dt)^(1/4)` with `dt = 1 / sample_rate`
///
/// Returns `0.0` for an empty series or a sample rate that is not a positive
/// finite number.
///
/// ```
/// use rust_vibration::dose::metrics::vdv;
/// assert!((vdv(&[1.0, 2.0], 1.0) - 17f64.powf(0.25)).abs() < 1e-12);
/// assert_eq!(vdv(&[1.0, 2.0], 0.0), 0.0);
/// ```
pub fn vdv(series: &[f64], sample_rate: f64) -> f64 {
    if series.is_empty() || !positive_finite(sample_rate) {
        return 0.0;
    }
    let dt = 1.0 / sample_rate;
    let fourth_power_sum: f64 = series.iter().map(|x| (x * x) * (x * x)).sum();
    (fourth_power_sum * dt).powf(0.25)
}

/// Number of samples in an MTVV window, if the window is usable
pub(crate) fn mtvv_window_samples(sample_rate: f64, window_seconds: f64) -> Option<usize> {
    if !positive_finite(sample_rate) || !positive_finite(window_seconds) {
        return None;
    }
    let samples = (window_seconds * sample_rate).floor();
    if samples < 1.0 {
        return None;
    }
    Some(samples as usize)
}

/// Maximum Transient Vibration Value
///
/// Maximum of the running RMS over windows of `floor(window_seconds * sample_rate)`
/// samples, advanced one sample at a time. The sum of squares is updated
/// incrementally so the cost is linear in the series length.
///
/// Returns `0.0` when the series is empty, the rate or window is not positive,
/// or the series is shorter than a single window. Windows holding a NaN
/// sample are skipped.
///
/// ```
/// use rust_vibration::dose::metrics::mtvv;
/// assert!((mtvv(&[1.0, 1.0, 5.0, 5.0, 1.0, 1.0], 1.0, 2.0) - 5.0).abs() < 1e-12);
/// assert_eq!(mtvv(&[1.0, 2.0, 3.0], 10.0, 1.0), 0.0);
/// ```
pub fn mtvv(series: &[f64], sample_rate: f64, window_seconds: f64) -> f64 {
    let window = match mtvv_window_samples(sample_rate, window_seconds) {
        Some(window) if window <= series.len() => window,
        _ => return 0.0,
    };

    let mut sum_of_squares: f64 = series[..window].iter().map(|x| x * x).sum();
    let mut max_mean_square = sum_of_squares / window as f64;

    for i in window..series.len() {
        let entering = series[i];
        let leaving = series[i - window];
        sum_of_squares += entering * entering - leaving * leaving;
        if !sum_of_squares.is_finite() {
            // A NaN or infinite sample poisons the running sum until rebuilt
            sum_of_squares = series[i + 1 - window..=i].iter().map(|x| x * x).sum();
        } else if sum_of_squares < 0.0 {
            // Rounding drift can push a silent window slightly negative
            sum_of_squares = 0.0;
        }
        max_mean_square = max_mean_square.max(sum_of_squares / window as f64);
    }

    max_mean_square.sqrt()
}

/// Largest absolute sample value; `0.0` for an empty series
pub fn peak(series: &[f64]) -> f64 {
    series.iter().fold(0.0, |acc: f64, x| acc.max(x.abs()))
}

/// Ratio of peak to RMS, `None` when the RMS is zero
pub fn crest_factor(series: &[f64]) -> Option<f64> {
    let rms = rms(series);
    if rms > 0.0 {
        Some(peak(series) / rms)
    } else {
        None
    }
}

/// Fourth-power vector sum of per-axis VDVs, `(Σ vdv⁴)^(1/4)`
pub fn vdv_total(vdvs: &[f64]) -> f64 {
    vdvs.iter()
        .map(|v| (v * v) * (v * v))
        .sum::<f64>()
        .powf(0.25)
}

fn positive_finite(value: f64) -> bool {
    value > 0.0 && value.is_finite()
}
