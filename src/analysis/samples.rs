// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Triaxial sample container handed to the analysis pipeline

use std::fmt;

use serde::{Deserialize, Serialize};

/// Measurement axis of a triaxial accelerometer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Acceleration samples of the three axes with their average sample rate
///
/// Values are in m/s². The three series are expected to have the same length;
/// the analysis rejects inputs where they do not.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TriaxialSamples {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    /// Average sample rate in Hz
    pub sample_rate: f64,
}

impl TriaxialSamples {
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>, sample_rate: f64) -> Self {
        Self { x, y, z, sample_rate }
    }

    /// Samples of one axis
    pub fn samples(&self, axis: Axis) -> &[f64] {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    /// Common length of the three axes, or `None` if they differ
    pub fn common_len(&self) -> Option<usize> {
        let len = self.x.len();
        (self.y.len() == len && self.z.len() == len).then_some(len)
    }

    /// Lengths of the x, y and z series
    pub fn lengths(&self) -> [usize; 3] {
        [self.x.len(), self.y.len(), self.z.len()]
    }

    /// `true` when every axis is empty
    pub fn is_empty(&self) -> bool {
        self.x.is_empty() && self.y.is_empty() && self.z.is_empty()
    }

    /// Duration covered by the samples in seconds, `0.0` without a valid rate
    pub fn duration_seconds(&self) -> f64 {
        if self.sample_rate > 0.0 && self.sample_rate.is_finite() {
            self.x.len() as f64 / self.sample_rate
        } else {
            0.0
        }
    }
}
