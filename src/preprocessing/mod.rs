// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).
//! Signal preprocessing module
//!
//! This module handles frequency weighting of acceleration signals before the
//! dose metrics are computed: the weighting curves themselves and the spectral
//! filter that applies them.

pub mod filters;
pub mod weighting;
#[cfg(test)]
mod filters_test;

pub use filters::{apply_weighting, weight_spectrum, Filter, SpectralWeightingFilter};
pub use weighting::{gain, FrequencyWeighting};

/// Create a frequency weighting filter for signals sampled at `sample_rate` Hz
pub fn create_weighting_filter(weighting: FrequencyWeighting, sample_rate: f64) -> Box<dyn Filter> {
    Box::new(SpectralWeightingFilter::new(weighting).with_sample_rate(sample_rate))
}
