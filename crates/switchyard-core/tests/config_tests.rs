//! Integration tests for configuration loading

use std::io::Write;
use std::time::Duration;
use switchyard_core::config::Config;
use switchyard_core::Error;
use tempfile::NamedTempFile;

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
name = "router1"

[capture]
poll_interval_ms = 100
promiscuous = false

[devices]
include = ["eth0", "eth1"]
exclude = ["eth2"]
"#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.name.as_deref(), Some("router1"));
    assert_eq!(config.capture.poll_interval(), Duration::from_millis(100));
    assert!(!config.capture.promiscuous);
    assert_eq!(config.devices.include, vec!["eth0", "eth1"]);
    assert_eq!(config.devices.exclude, vec!["eth2"]);
    assert!(config.validate().is_ok());
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = Config::load(dir.path().join("missing.toml"));
    assert!(matches!(result, Err(Error::ConfigNotFound { .. })));
}

#[test]
fn test_load_empty_file_uses_defaults() {
    let file = NamedTempFile::new().unwrap();
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_generated_config_reloads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("switchyard.toml");

    let mut config = Config::default();
    config.devices.include_loopback = true;
    std::fs::write(&path, config.to_toml().unwrap()).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert!(loaded.devices.include_loopback);
    assert_eq!(loaded, config);
}

#[test]
fn test_invalid_value_is_rejected() {
    let config = Config::from_toml("[capture]\npoll_interval_ms = 0\n").unwrap();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, Error::ConfigValue { ref key, .. } if key == "capture.poll_interval_ms"));
}

#[test]
fn test_wrong_type_is_parse_error() {
    let result = Config::from_toml("[capture]\npoll_interval_ms = \"fast\"\n");
    assert!(matches!(result, Err(Error::TomlParse(_))));
}
