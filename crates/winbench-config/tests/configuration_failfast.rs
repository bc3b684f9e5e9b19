//! Configuration errors surface before the benchmark touches the socket.

use std::ffi::OsString;
use std::fs;

use ortho_config::OrthoConfig;
use tempfile::TempDir;
use winbench_config::{Config, ConfigError};

#[test]
fn malformed_config_file_fails_to_load() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("winbench.toml");
    fs::write(&path, "iterations = \"many\"\n").expect("write malformed config");

    let args = vec![
        OsString::from("winbench"),
        OsString::from("--config-path"),
        path.into_os_string(),
    ];

    let error = Config::load_from_iter(args).expect_err("loading must fail");
    assert!(!error.to_string().is_empty());
}

#[test]
fn zero_timeout_from_cli_fails_validation() {
    let args = vec![
        OsString::from("winbench"),
        OsString::from("--timeout-ms"),
        OsString::from("0"),
    ];
    let config = Config::load_from_iter(args).expect("configuration should load");
    assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
}
