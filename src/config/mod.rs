// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

//! Configuration management for the vibration analyzer
//!
//! This module provides functionality for loading, validating, and applying
//! configuration settings. The configuration is backed by a YAML file and
//! validated against a JSON schema before it is deserialized.
//!
//! ## Configuration Structure
//!
//! - `analysis`: frequency weighting, MTVV window and spectrum settings
//! - `acquisition`: where the triaxial recording comes from
//!
//! ## Usage
//!
//! ```no_run
//! use rust_vibration::config::Config;
//! use rust_vibration::preprocessing::FrequencyWeighting;
//! use std::path::Path;
//!
//! // Load config from file, creates a default if not found
//! let mut config = Config::from_file(Path::new("config.yaml")).unwrap();
//!
//! // Apply command line overrides if needed
//! config.apply_args(
//!     Some("ride.wav".into()),       // Input file
//!     false,                         // Simulate
//!     Some(FrequencyWeighting::Wd),  // Weighting
//!     Some(2.0),                     // MTVV window
//! );
//!
//! println!("Weighting: {}", config.analysis.weighting);
//! ```

pub mod acquisition;
pub mod analysis;
pub mod utils;

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, error};
use serde::{Deserialize, Serialize};

pub use acquisition::{AcquisitionConfig, STANDARD_GRAVITY};
pub use analysis::AnalysisConfig;
pub use utils::{output_config_schema, validate_specific_rules};

use crate::preprocessing::FrequencyWeighting;

/// Root configuration structure.
///
/// Each section uses default values when not explicitly specified in the
/// configuration file, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analysis pipeline settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Recording source settings
    #[serde(default)]
    pub acquisition: AcquisitionConfig,
}

impl Config {
    /// Helper method to create a sample config file when validation fails
    fn create_sample_config<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        let sample_path = path.with_extension("sample.yaml");
        debug!("Creating sample configuration file at {:?}", sample_path);

        if let Some(parent) = sample_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                debug!("Creating parent directory: {:?}", parent);
                fs::create_dir_all(parent).with_context(|| {
                    format!(
                        "Failed to create parent directory for sample config at {:?}",
                        parent
                    )
                })?;
            }
        }

        Self::default()
            .save_to_file(&sample_path)
            .with_context(|| format!("Failed to save sample config to {:?}", sample_path))?;

        error!(
            "Sample configuration file created at {:?}\nPlease edit and rename it",
            sample_path
        );
        Ok(())
    }

    /// Load configuration from a file
    ///
    /// A missing file is created with the default configuration. When the file
    /// fails schema validation, deserialization or the additional rules, a
    /// `<name>.sample.yaml` file holding the defaults is written next to it and
    /// an error is returned.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(
                "Configuration file not found at {:?}, creating default",
                path
            );
            let default_config = Self::default();
            default_config.save_to_file(path)?;
            return Ok(default_config);
        }

        debug!("Loading configuration from {:?}", path);
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file at {:?}", path))?;

        // First step: convert YAML to a generic Value
        let yaml_value: serde_yml::Value = serde_yml::from_str(&contents)
            .with_context(|| format!("Failed to parse YAML configuration from {:?}", path))?;

        // An empty document parses as null, which means "all defaults"
        let json_value = match serde_json::to_value(&yaml_value).with_context(|| {
            format!("Failed to convert YAML to JSON for validation: {:?}", path)
        })? {
            serde_json::Value::Null => serde_json::Value::Object(serde_json::Map::new()),
            value => value,
        };

        let validator = utils::schema_validator()?;

        debug!("Validating {} configuration against schema", path.display());
        if let Err(error) = validator.validate(&json_value) {
            error!("Configuration validation error before deserialization");
            Self::create_sample_config(path)?;
            anyhow::bail!("Configuration validation failed: {}", error);
        }

        debug!("Schema validation passed, deserializing into Config structure");
        let config: Config = match serde_json::from_value(json_value) {
            Ok(config) => config,
            Err(err) => {
                error!("Configuration deserialization error: {}", err);
                if let Err(e) = Self::create_sample_config(path) {
                    error!("Failed to create sample config: {}", e);
                }
                return Err(anyhow::anyhow!(
                    "Failed to deserialize configuration from {}: {}",
                    path.display(),
                    err
                ));
            }
        };

        if let Err(err) = validate_specific_rules(&config) {
            error!("Configuration specific validation error: {}", err);
            Self::create_sample_config(path)?;
            return Err(err);
        }

        Ok(config)
    }

    /// Save the configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml =
            serde_yml::to_string(self).context("Failed to serialize configuration to YAML")?;

        let mut file = File::create(path.as_ref())
            .with_context(|| format!("Failed to create config file at {:?}", path.as_ref()))?;

        file.write_all(yaml.as_bytes())
            .with_context(|| format!("Failed to write configuration to {:?}", path.as_ref()))?;

        Ok(())
    }

    /// Apply command line arguments to override configuration values.
    ///
    /// Only arguments that were provided override the loaded values. An input
    /// file disables the simulated source and `simulate` clears the input file,
    /// keeping the two sources mutually exclusive.
    ///
    /// # Parameters
    ///
    /// * `input_file` - Optional WAV recording to analyze
    /// * `simulate` - If true, analyze a simulated recording instead of a file
    /// * `weighting` - Optional frequency weighting
    /// * `mtvv_window` - Optional MTVV window in seconds
    pub fn apply_args(
        &mut self,
        input_file: Option<PathBuf>,
        simulate: bool,
        weighting: Option<FrequencyWeighting>,
        mtvv_window: Option<f64>,
    ) {
        if let Some(file) = input_file {
            debug!("Overriding input file from command line: {:?}", file);
            self.acquisition.input_file = Some(file.to_string_lossy().to_string());
            self.acquisition.simulated = false;
        }

        if simulate {
            debug!("Using the simulated source from command line");
            self.acquisition.simulated = true;
            self.acquisition.input_file = None;
        }

        if let Some(weighting) = weighting {
            debug!("Overriding weighting from command line: {}", weighting);
            self.analysis.weighting = weighting;
        }

        if let Some(window) = mtvv_window {
            debug!("Overriding MTVV window from command line: {}", window);
            self.analysis.mtvv_window_seconds = window;
        }
    }
}
