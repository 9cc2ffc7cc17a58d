// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! # Gaussian Noise Generator
//!
//! Lightweight Gaussian white noise used to build synthetic acceleration
//! recordings:
//!
//! - Simulated motion sources for demos and tests
//! - Background noise on top of test tones when validating weighting curves
//!
//! ## Features
//!
//! * Fast XORShift pseudo-random number generation
//! * Box-Muller transform for Gaussian distribution
//! * Reproducible sequences from an explicit seed
//!
//! ## Examples
//!
//! ```rust
//! use rust_vibration::utility::noise_generator::NoiseGenerator;
//!
//! let mut generator = NoiseGenerator::new(42);
//!
//! // 10 seconds of noise at 100 Hz with a 0.05 m/s² standard deviation
//! let noise = generator.generate_gaussian(1000, 0.05);
//! assert_eq!(noise.len(), 1000);
//! ```

use std::f64::consts::PI;

/// Random number generator using the XORShift algorithm
///
/// Fast and small, suitable for noise synthesis. Not for cryptographic use.
/// The same seed always produces the same sequence.
pub struct NoiseGenerator {
    rng_state: u32,
}

impl NoiseGenerator {
    /// Creates a new noise generator with a given seed.
    ///
    /// A zero seed would lock XORShift at zero forever, so it is replaced by a
    /// fixed non-zero constant.
    pub fn new(seed: u32) -> Self {
        let rng_state = if seed == 0 { 0x9E37_79B9 } else { seed };
        Self { rng_state }
    }

    /// Creates a new noise generator seeded from the thread-local entropy source.
    pub fn from_entropy() -> Self {
        Self::new(rand::random::<u32>())
    }

    /// Generates a random number between -1.0 and 1.0.
    ///
    /// ```
    /// use rust_vibration::utility::noise_generator::NoiseGenerator;
    ///
    /// let mut generator = NoiseGenerator::new(12345);
    /// let value = generator.random_float();
    /// assert!((-1.0..=1.0).contains(&value));
    /// ```
    pub fn random_float(&mut self) -> f64 {
        self.rng_state ^= self.rng_state << 13;
        self.rng_state ^= self.rng_state >> 17;
        self.rng_state ^= self.rng_state << 5;

        (self.rng_state as f64 / u32::MAX as f64) * 2.0 - 1.0
    }

    /// Generates a value from a standard normal distribution (mean 0, sigma 1).
    ///
    /// Uses the Box-Muller transform:
    /// ```text
    /// z = sqrt(-2 * ln(u1)) * cos(2 * π * u2)
    /// ```
    /// where u1 and u2 are uniform in (0, 1).
    pub fn random_gaussian(&mut self) -> f64 {
        let u1 = (self.random_float() + 1.0) / 2.0;
        let u2 = (self.random_float() + 1.0) / 2.0;

        // Avoid ln(0)
        let u1 = u1.max(1e-12);

        (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
    }

    /// Generates `num_samples` of Gaussian white noise with the given standard deviation.
    pub fn generate_gaussian(&mut self, num_samples: usize, std_dev: f64) -> Vec<f64> {
        (0..num_samples)
            .map(|_| self.random_gaussian() * std_dev)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = NoiseGenerator::new(7);
        let mut b = NoiseGenerator::new(7);
        assert_eq!(a.generate_gaussian(64, 1.0), b.generate_gaussian(64, 1.0));
    }

    #[test]
    fn test_zero_seed_is_not_stuck() {
        let mut generator = NoiseGenerator::new(0);
        let values: Vec<f64> = (0..10).map(|_| generator.random_float()).collect();
        assert!(values.iter().any(|&v| v != values[0]));
    }

    #[test]
    fn test_random_float_range() {
        let mut generator = NoiseGenerator::new(12345);
        for _ in 0..10_000 {
            let value = generator.random_float();
            assert!((-1.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_gaussian_statistics() {
        let mut generator = NoiseGenerator::new(2024);
        let samples = generator.generate_gaussian(50_000, 0.5);

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let variance =
            samples.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / samples.len() as f64;

        assert!(mean.abs() < 0.02, "mean was {}", mean);
        assert!((variance.sqrt() - 0.5).abs() < 0.02, "std dev was {}", variance.sqrt());
    }
}
