// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Simulated triaxial motion
//!
//! Each axis carries one sine tone plus Gaussian white noise. The defaults
//! roughly mimic a vehicle ride: low-frequency sway on x and y, a stronger
//! vertical component around 6 Hz on z.

use anyhow::{bail, Result};
use log::debug;
use std::f64::consts::PI;

use super::{MotionSource, TriaxialRecording};
use crate::utility::noise_generator::NoiseGenerator;

/// Sine component of one simulated axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisTone {
    /// Frequency in Hz
    pub frequency: f64,
    /// Peak amplitude in m/s²
    pub amplitude: f64,
}

impl AxisTone {
    pub const fn new(frequency: f64, amplitude: f64) -> Self {
        Self {
            frequency,
            amplitude,
        }
    }
}

const DEFAULT_TONES: [AxisTone; 3] = [
    AxisTone::new(1.5, 0.3),
    AxisTone::new(2.5, 0.2),
    AxisTone::new(6.0, 0.8),
];

const DEFAULT_NOISE_STD_DEV: f64 = 0.05;

/// Motion source generating tones and noise on demand
pub struct SimulatedSource {
    sample_rate: f64,
    duration_seconds: f64,
    tones: [AxisTone; 3],
    noise_std_dev: f64,
    generator: NoiseGenerator,
}

impl SimulatedSource {
    pub fn new(sample_rate: f64, duration_seconds: f64) -> Result<Self> {
        if sample_rate <= 0.0 || !sample_rate.is_finite() {
            bail!("Simulated sample rate must be positive, got {}", sample_rate);
        }
        if duration_seconds < 0.0 || !duration_seconds.is_finite() {
            bail!(
                "Simulated duration must be zero or positive, got {}",
                duration_seconds
            );
        }

        Ok(Self {
            sample_rate,
            duration_seconds,
            tones: DEFAULT_TONES,
            noise_std_dev: DEFAULT_NOISE_STD_DEV,
            generator: NoiseGenerator::from_entropy(),
        })
    }

    /// Use a fixed noise seed for reproducible recordings
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.generator = NoiseGenerator::new(seed);
        self
    }

    /// Replace the x, y and z tones
    pub fn with_tones(mut self, tones: [AxisTone; 3]) -> Self {
        self.tones = tones;
        self
    }

    pub fn with_noise(mut self, std_dev: f64) -> Self {
        self.noise_std_dev = std_dev.max(0.0);
        self
    }

    pub fn tones(&self) -> [AxisTone; 3] {
        self.tones
    }

    fn sample_count(&self) -> usize {
        (self.duration_seconds * self.sample_rate).round() as usize
    }

    fn synthesize(&mut self, tone: AxisTone, len: usize) -> Vec<f64> {
        let noise = self.generator.generate_gaussian(len, self.noise_std_dev);
        noise
            .into_iter()
            .enumerate()
            .map(|(i, n)| {
                let t = i as f64 / self.sample_rate;
                tone.amplitude * (2.0 * PI * tone.frequency * t).sin() + n
            })
            .collect()
    }
}

impl MotionSource for SimulatedSource {
    fn read_recording(&mut self) -> Result<TriaxialRecording> {
        let len = self.sample_count();
        let [tx, ty, tz] = self.tones;
        debug!(
            "Simulating {} samples at {} Hz (tones {:?})",
            len, self.sample_rate, self.tones
        );

        let x = self.synthesize(tx, len);
        let y = self.synthesize(ty, len);
        let z = self.synthesize(tz, len);

        Ok(TriaxialRecording::uniform(x, y, z, self.sample_rate))
    }

    fn sample_rate(&self) -> f64 {
        self.sample_rate
    }
}
