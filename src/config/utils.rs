// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration utilities
//!
//! This module provides utility functions for working with configuration
//! settings, including validation and schema management.

use anyhow::{Context, Result};
use jsonschema::Validator;
use log::debug;

use super::Config;

/// JSON schema of the configuration file, embedded at build time
const CONFIG_SCHEMA: &str = include_str!("../../resources/config.schema.json");

/// Build the draft 2020-12 validator for the embedded schema
pub(crate) fn schema_validator() -> Result<Validator> {
    let schema: serde_json::Value = serde_json::from_str(CONFIG_SCHEMA).with_context(|| {
        debug!("JSON schema string: {}", CONFIG_SCHEMA);
        "Failed to parse JSON schema"
    })?;

    let validator = jsonschema::draft202012::options()
        .should_validate_formats(true)
        .build(&schema)?;
    Ok(validator)
}

/// Output the embedded JSON schema to the console.
///
/// This function is called when the `--show-config-schema` flag is provided
/// on the command line. It outputs the full JSON schema for the configuration
/// to stdout, formatted for readability.
///
/// # Example
///
/// ```bash
/// ./rust_vibration --show-config-schema > config_schema.json
/// ```
pub fn output_config_schema() -> Result<()> {
    let schema: serde_json::Value =
        serde_json::from_str(CONFIG_SCHEMA).context("Failed to parse JSON schema")?;

    let formatted_schema =
        serde_json::to_string_pretty(&schema).context("Failed to format JSON schema")?;

    println!("{}", formatted_schema);

    Ok(())
}

/// Validates the configuration against additional rules that aren't covered by the JSON schema.
///
/// # Validation Rules
///
/// - **MTVV window**: must be a positive, finite number of seconds
/// - **Simulated source**: sample rate must be positive, duration must not be negative
/// - **Full scale**: integer WAV scaling must be positive
/// - **Sources**: `simulated` and `input_file` are mutually exclusive
///
/// These also guard configurations built in code, which never go through
/// the schema.
pub fn validate_specific_rules(config: &Config) -> Result<()> {
    debug!("Performing additional validation checks");

    let analysis = &config.analysis;
    if analysis.mtvv_window_seconds <= 0.0 || !analysis.mtvv_window_seconds.is_finite() {
        anyhow::bail!(
            "Invalid MTVV window: {} s (must be positive)",
            analysis.mtvv_window_seconds
        );
    }

    let acquisition = &config.acquisition;
    if acquisition.sample_rate <= 0.0 || !acquisition.sample_rate.is_finite() {
        anyhow::bail!(
            "Invalid simulated sample rate: {} Hz (must be positive)",
            acquisition.sample_rate
        );
    }

    if acquisition.duration_seconds < 0.0 || !acquisition.duration_seconds.is_finite() {
        anyhow::bail!(
            "Invalid simulated duration: {} s",
            acquisition.duration_seconds
        );
    }

    if acquisition.full_scale <= 0.0 || !acquisition.full_scale.is_finite() {
        anyhow::bail!("Invalid full scale: {} m/s²", acquisition.full_scale);
    }

    if acquisition.simulated && acquisition.input_file.is_some() {
        anyhow::bail!("Input file and simulated source are mutually exclusive");
    }

    if let Some(file) = &acquisition.input_file {
        if file.trim().is_empty() {
            anyhow::bail!("Input file path is empty");
        }
    }

    Ok(())
}
