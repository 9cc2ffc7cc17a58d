// Copyright (c) 2025 Ronan LE MEILLAT, SCTG Development
// This file is part of the rust-vibration project and is licensed under the
// SCTG Development Non-Commercial License v1.0 (see LICENSE.md for details).

use anyhow::Result;
use rust_vibration::config::Config;
use std::fs;
use std::path::Path;
use std::sync::Once;
use tempfile::tempdir;

static INIT: Once = Once::new();

// Setup logger for tests
fn setup() {
    INIT.call_once(|| {
        let _ = env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .try_init();
    });
}

fn assert_rejected_with_sample(yaml: &str) -> Result<()> {
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, yaml)?;

    let result = Config::from_file(&config_path);
    assert!(result.is_err(), "Config loading should have failed");

    let sample_path = config_path.with_extension("sample.yaml");
    assert!(
        Path::new(&sample_path).exists(),
        "Sample config file was not created"
    );

    // The sample file holds the defaults and loads cleanly
    let sample_config = Config::from_file(&sample_path)?;
    assert_eq!(sample_config, Config::default());
    Ok(())
}

#[test]
fn test_type_mismatch_creates_sample_file() -> Result<()> {
    setup();
    assert_rejected_with_sample(
        r#"
analysis:
  weighting: 12
  mtvv_window_seconds: "one second"
  parallel_axes: "yes"
"#,
    )
}

#[test]
fn test_unknown_weighting_creates_sample_file() -> Result<()> {
    setup();
    assert_rejected_with_sample(
        r#"
analysis:
  weighting: wk
"#,
    )
}

#[test]
fn test_non_positive_window_creates_sample_file() -> Result<()> {
    setup();
    assert_rejected_with_sample(
        r#"
analysis:
  mtvv_window_seconds: 0
"#,
    )
}

#[test]
fn test_unknown_key_creates_sample_file() -> Result<()> {
    setup();
    assert_rejected_with_sample(
        r#"
analysis:
  weigthing: wb
"#,
    )
}

#[test]
fn test_conflicting_sources_create_sample_file() -> Result<()> {
    setup();
    // Valid for the schema, rejected by the additional rules
    assert_rejected_with_sample(
        r#"
acquisition:
  input_file: ride.wav
  simulated: true
"#,
    )
}

#[test]
fn test_invalid_yaml_is_an_error() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, "analysis: [unclosed")?;

    assert!(Config::from_file(&config_path).is_err());
    Ok(())
}
