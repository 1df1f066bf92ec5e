//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Note: These tests run without a global config (temp directories only),
//! so they effectively test local config merging with defaults.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use treestore::config::{local_config_path, OutputFormat, Settings};

#[test]
fn given_no_local_config_when_load_then_defaults() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings, Settings::default());
}

#[test]
fn given_local_config_when_load_then_overrides_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        r#"
input = "nodes.json"
format = "json"
strict = true
label_field = "type"
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings.input, Some(PathBuf::from("nodes.json")));
    assert_eq!(settings.format, OutputFormat::Json);
    assert!(settings.strict);
    assert_eq!(settings.label_field.as_deref(), Some("type"));
}

#[test]
fn given_partial_local_config_when_load_then_keeps_other_defaults() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "strict = true\n").unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert!(settings.strict);
    assert_eq!(settings.format, OutputFormat::Text);
    assert_eq!(settings.input, None);
}

#[test]
fn given_tilde_in_input_when_load_then_expanded() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "input = \"~/nodes.json\"\n").unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    let input = settings.input.unwrap();
    assert!(!input.to_string_lossy().starts_with('~'));
    assert!(input.ends_with("nodes.json"));
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "format = [not toml").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(err.to_string().starts_with("config error: parse"));
}

#[test]
fn given_unknown_format_in_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "format = \"yaml\"\n").unwrap();

    assert!(Settings::load(Some(dir.path())).is_err());
}

#[test]
fn given_loaded_settings_when_rendering_toml_then_round_trips() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "format = \"json\"\nlabel_field = \"name\"\n",
    )
    .unwrap();
    let settings = Settings::load(Some(dir.path())).unwrap();

    let rendered = settings.to_toml().unwrap();
    let reparsed: Settings = toml::from_str(&rendered).unwrap();

    assert_eq!(reparsed, settings);
}
