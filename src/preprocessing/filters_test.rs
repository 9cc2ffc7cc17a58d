// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use super::filters::{apply_weighting, weight_spectrum, Filter, SpectralWeightingFilter};
use super::weighting::{gain, FrequencyWeighting};
use crate::spectral::{FftAnalyzer, SpectralAnalyzer};
use std::f64::consts::PI;

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-3;

    fn assert_gain(kind: FrequencyWeighting, frequency: f64, expected: f64) {
        let actual = gain(frequency, kind);
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "{} at {} Hz: expected {}, got {}",
            kind,
            frequency,
            expected,
            actual
        );
    }

    fn tone(frequency: f64, sample_rate: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * frequency * i as f64 / sample_rate).sin())
            .collect()
    }

    fn rms(signal: &[f64]) -> f64 {
        (signal.iter().map(|x| x * x).sum::<f64>() / signal.len() as f64).sqrt()
    }

    #[test]
    fn test_wg_boundaries() {
        assert_gain(FrequencyWeighting::Wg, 0.99, 0.0);
        assert_gain(FrequencyWeighting::Wg, 1.0, 0.5);
        assert_gain(FrequencyWeighting::Wg, 4.0, 1.0);
        assert_gain(FrequencyWeighting::Wg, 8.0, 1.0);
        assert_gain(FrequencyWeighting::Wg, 16.0, 0.5);
    }

    #[test]
    fn test_wb_boundaries() {
        assert_gain(FrequencyWeighting::Wb, 1.0, 0.4);
        assert_gain(FrequencyWeighting::Wb, 2.0, 0.4);
        assert_gain(FrequencyWeighting::Wb, 5.0, 1.0);
        assert_gain(FrequencyWeighting::Wb, 16.0, 1.0);
        assert_gain(FrequencyWeighting::Wb, 16.01, 0.9994);
        assert_gain(FrequencyWeighting::Wb, 0.5, 0.0);
    }

    #[test]
    fn test_wd_boundaries() {
        assert_gain(FrequencyWeighting::Wd, 1.0, 1.0);
        assert_gain(FrequencyWeighting::Wd, 1.99, 1.0);
        assert_gain(FrequencyWeighting::Wd, 2.0, 1.0);
        assert_gain(FrequencyWeighting::Wd, 10.0, 0.2);
        assert_gain(FrequencyWeighting::Wd, 0.2, 0.0);
    }

    #[test]
    fn test_unweighted_and_dc_gain() {
        for &f in &[0.0, 0.5, 1.0, 3.0, 12.0, 1000.0, -5.0] {
            assert_eq!(gain(f, FrequencyWeighting::None), 1.0);
        }
        for kind in FrequencyWeighting::ALL {
            assert_eq!(gain(0.0, kind), 1.0, "DC gain for {}", kind);
            assert_eq!(gain(-1.0, kind), 1.0, "negative frequency gain for {}", kind);
        }
    }

    #[test]
    fn test_weighting_names() {
        for kind in FrequencyWeighting::ALL {
            assert_eq!(kind.as_str().parse::<FrequencyWeighting>().unwrap(), kind);
        }
        assert_eq!("WB".parse::<FrequencyWeighting>().unwrap(), FrequencyWeighting::Wb);
        assert!("wk".parse::<FrequencyWeighting>().is_err());
        assert_eq!(FrequencyWeighting::default(), FrequencyWeighting::Wb);
    }

    #[test]
    fn test_none_weighting_is_identity() {
        let signal = vec![0.3, -1.2, 4.5, 0.0, 2.25];
        for &rate in &[1.0, 50.0, 0.0, -3.0] {
            let output = apply_weighting(&signal, rate, FrequencyWeighting::None).unwrap();
            assert_eq!(output, signal);
        }
    }

    #[test]
    fn test_empty_signal() {
        let output = apply_weighting(&[], 100.0, FrequencyWeighting::Wb).unwrap();
        assert!(output.is_empty());
    }

    #[test]
    fn test_invalid_sample_rate_passes_through() {
        let signal = tone(3.0, 50.0, 100);
        for &rate in &[0.0, -10.0, f64::NAN, f64::INFINITY] {
            let output = apply_weighting(&signal, rate, FrequencyWeighting::Wd).unwrap();
            assert_eq!(output, signal);
        }
    }

    #[test]
    fn test_weighting_preserves_length() {
        for &len in &[1usize, 2, 9, 64, 101] {
            let signal = tone(5.0, 40.0, len);
            let output = apply_weighting(&signal, 40.0, FrequencyWeighting::Wg).unwrap();
            assert_eq!(output.len(), len);
        }
    }

    #[test]
    fn test_wd_halves_four_hertz_tone() {
        let sample_rate = 64.0;
        let signal = tone(4.0, sample_rate, 256);
        let output = apply_weighting(&signal, sample_rate, FrequencyWeighting::Wd).unwrap();

        let ratio = rms(&output) / rms(&signal);
        assert!((ratio - 0.5).abs() < 1e-6, "ratio was {}", ratio);
    }

    #[test]
    fn test_sub_hertz_content_is_removed_but_dc_kept() {
        let sample_rate = 20.0;
        // 0.5 Hz tone on a 2.0 offset, 10 whole cycles
        let signal: Vec<f64> = tone(0.5, sample_rate, 400).iter().map(|x| x + 2.0).collect();
        let output = apply_weighting(&signal, sample_rate, FrequencyWeighting::Wb).unwrap();

        for &y in &output {
            assert!((y - 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_weight_spectrum_matches_time_domain_path() {
        let sample_rate = 100.0;
        let signal: Vec<f64> = tone(3.0, sample_rate, 300)
            .iter()
            .zip(tone(20.0, sample_rate, 300))
            .map(|(a, b)| a + 0.5 * b)
            .collect();

        let analyzer = FftAnalyzer::new();
        let spectrum = analyzer.forward_transform(&signal, sample_rate).unwrap();
        let weighted_spectrum = weight_spectrum(&spectrum, FrequencyWeighting::Wb);

        // 3 Hz: f/5, 20 Hz: 16/f
        assert!((weighted_spectrum.amplitude_at(3.0).unwrap() - 0.6).abs() < 1e-9);
        assert!((weighted_spectrum.amplitude_at(20.0).unwrap() - 0.4).abs() < 1e-9);

        let via_spectrum = analyzer
            .inverse_transform(&weighted_spectrum, signal.len())
            .unwrap();
        let direct = apply_weighting(&signal, sample_rate, FrequencyWeighting::Wb).unwrap();
        assert_eq!(via_spectrum, direct);

        let unchanged = weight_spectrum(&spectrum, FrequencyWeighting::None);
        assert_eq!(unchanged, spectrum);
    }

    #[test]
    fn test_filter_trait_object() {
        let sample_rate = 80.0;
        let signal = tone(10.0, sample_rate, 160);
        let filter: Box<dyn Filter> = crate::preprocessing::create_weighting_filter(
            FrequencyWeighting::Wg,
            sample_rate,
        );

        let output = filter.apply(&signal);
        let ratio = rms(&output) / rms(&signal);
        assert!((ratio - 0.8).abs() < 1e-6, "ratio was {}", ratio);

        let concrete = SpectralWeightingFilter::new(FrequencyWeighting::Wg).with_sample_rate(sample_rate);
        assert_eq!(concrete.weighting(), FrequencyWeighting::Wg);
        assert_eq!(concrete.sample_rate(), sample_rate);
        assert_eq!(concrete.try_apply(&signal).unwrap(), output);
    }
}
