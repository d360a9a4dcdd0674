//! Configuration loading integration tests
//!
//! Covers file loading, missing-file defaults, and environment / CLI
//! overrides. Tests touching environment variables run serially.

use std::io::Write;

use serial_test::serial;
use tempfile::NamedTempFile;

use chatroll::cli::Cli;
use chatroll::config::Config;

const ENV_VARS: [&str; 5] = [
    "CHATROLL_API_BASE",
    "CHATROLL_TIMEOUT_SECONDS",
    "CHATROLL_TOKEN",
    "CHATROLL_TITLE_MIN",
    "CHATROLL_TITLE_MAX",
];

fn clear_env() {
    for var in ENV_VARS {
        std::env::remove_var(var);
    }
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(contents.as_bytes()).expect("write config");
    file
}

#[test]
#[serial]
fn test_load_reads_yaml_file() {
    clear_env();
    let file = write_config(
        "api:\n  base_url: https://chat.example.com\n  timeout_seconds: 12\ntitles:\n  min_length: 2\n",
    );

    let config = Config::load(file.path().to_str().unwrap(), &Cli::default()).unwrap();

    assert_eq!(config.api.base_url, "https://chat.example.com");
    assert_eq!(config.api.timeout_seconds, 12);
    assert_eq!(config.titles.min_length, 2);
    assert_eq!(config.titles.max_length, 60);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_load_missing_file_uses_defaults() {
    clear_env();
    let config = Config::load("/nonexistent/chatroll.yaml", &Cli::default()).unwrap();
    assert_eq!(config.api.base_url, "http://localhost:8000");
}

#[test]
#[serial]
fn test_load_rejects_malformed_yaml() {
    clear_env();
    let file = write_config("api: [this is not a mapping");
    let err = Config::load(file.path().to_str().unwrap(), &Cli::default()).unwrap_err();
    assert!(err.to_string().contains("Failed to parse config"));
}

#[test]
#[serial]
fn test_env_vars_override_file() {
    clear_env();
    let file = write_config("api:\n  base_url: https://file.example.com\n");
    std::env::set_var("CHATROLL_API_BASE", "https://env.example.com");
    std::env::set_var("CHATROLL_TIMEOUT_SECONDS", "7");
    std::env::set_var("CHATROLL_TOKEN", "env-token");
    std::env::set_var("CHATROLL_TITLE_MAX", "not-a-number");

    let config = Config::load(file.path().to_str().unwrap(), &Cli::default()).unwrap();
    clear_env();

    assert_eq!(config.api.base_url, "https://env.example.com");
    assert_eq!(config.api.timeout_seconds, 7);
    assert_eq!(config.api.token.as_deref(), Some("env-token"));
    assert_eq!(config.titles.max_length, 60);
}

#[test]
#[serial]
fn test_cli_overrides_env() {
    clear_env();
    std::env::set_var("CHATROLL_API_BASE", "https://env.example.com");
    let cli = Cli {
        api_base: Some("https://cli.example.com".to_string()),
        token: Some("cli-token".to_string()),
        ..Cli::default()
    };

    let config = Config::load("/nonexistent/chatroll.yaml", &cli).unwrap();
    clear_env();

    assert_eq!(config.api.base_url, "https://cli.example.com");
    assert_eq!(config.api.token.as_deref(), Some("cli-token"));
}
