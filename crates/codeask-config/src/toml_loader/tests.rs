//! Tests for TOML config loading and default file creation.

use super::*;
use crate::schema::{AiProvider, LogLevel};
use codeask_common::{ConfigError, TrackingPolicy};
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_file_not_found() {
    let result = load_from_path(Path::new("/tmp/nonexistent_codeask_config.toml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[ai]
provider = "claude"
max_tokens = 1024

[tracking]
policy = "workspace"
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.ai.provider, AiProvider::Claude);
    assert_eq!(config.ai.max_tokens, 1024);
    assert_eq!(config.tracking.policy, TrackingPolicy::Workspace);
    // Defaults preserved
    assert_eq!(config.ai.temperature, 0.7);
    assert_eq!(config.logging.level, LogLevel::Info);
    assert!(config.ai.request_timeout_secs.is_none());
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_unknown_provider_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[ai]\nprovider = \"mystery\"\n").unwrap();

    let result = load_from_path(&path);
    assert!(matches!(result, Err(ConfigError::ParseError(_))));
}

#[test]
fn load_config_with_invalid_values_falls_back_to_default() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[ai]
provider = "claude"
temperature = 9.0
"#,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.ai.provider, AiProvider::OpenAi);
    assert_eq!(config.ai.temperature, 0.7);
}

#[test]
fn create_default_config_writes_parseable_template() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.ai.provider, AiProvider::OpenAi);
    assert_eq!(config.tracking.policy, TrackingPolicy::Manual);
}

#[test]
fn default_config_path_ends_with_codeask_config() {
    if let Ok(path) = default_config_path() {
        assert!(path.ends_with("codeask/config.toml"));
    }
}
