//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/treestore/treestore.toml`
//! 3. Local config: `<dir>/.treestore.toml`
//! 4. Environment variables: `TREESTORE_*` prefix
//!
//! Command line flags are applied on top by the CLI.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::infrastructure::InfraError;

/// How query results are printed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One compact JSON object per line
    #[default]
    Text,
    /// A single pretty-printed JSON document
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = InfraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(InfraError::Config {
                message: format!("unknown output format: {other}"),
            }),
        }
    }
}

/// Unified configuration for treestore.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Node list read when no file is given on the command line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<PathBuf>,
    /// Output format
    pub format: OutputFormat,
    /// Reject duplicate ids instead of letting the last one win
    pub strict: bool,
    /// Payload field appended to node labels in tree output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_field: Option<String>,
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub input: Option<PathBuf>,
    pub format: Option<OutputFormat>,
    pub strict: Option<bool>,
    pub label_field: Option<String>,
}

/// Get the XDG config directory for treestore.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "treestore").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("treestore.toml"))
}

/// Get the path to the local config file in `dir`.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".treestore.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, InfraError> {
    let content = std::fs::read_to_string(path).map_err(|e| InfraError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| InfraError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> InfraError {
    InfraError::Config {
        message: e.to_string(),
    }
}

/// Expand `~`, `$VAR` and `${VAR}`; unresolvable input is returned as is.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Overlay wins wherever it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            input: overlay.input.clone().or_else(|| self.input.clone()),
            format: overlay.format.unwrap_or(self.format),
            strict: overlay.strict.unwrap_or(self.strict),
            label_field: overlay
                .label_field
                .clone()
                .or_else(|| self.label_field.clone()),
        }
    }

    fn expand_paths(&mut self) {
        if let Some(input) = &self.input {
            self.input = Some(PathBuf::from(expand_env_vars(
                input.to_string_lossy().as_ref(),
            )));
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.treestore.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, InfraError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply TREESTORE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, InfraError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(Environment::with_prefix("TREESTORE").prefix_separator("_"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("input") {
            settings.input = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("format") {
            settings.format = val.parse()?;
        }
        if let Ok(val) = config.get_bool("strict") {
            settings.strict = val;
        }
        if let Ok(val) = config.get_string("label_field") {
            settings.label_field = Some(val);
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, InfraError> {
        toml::to_string_pretty(self).map_err(|e| InfraError::Config {
            message: format!("serialize config: {e}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("text", OutputFormat::Text)]
    #[case("JSON", OutputFormat::Json)]
    #[case(" json ", OutputFormat::Json)]
    fn given_format_name_when_parsing_then_case_insensitive(
        #[case] input: &str,
        #[case] expected: OutputFormat,
    ) {
        assert_eq!(input.parse::<OutputFormat>().unwrap(), expected);
    }

    #[test]
    fn given_unknown_format_when_parsing_then_config_error() {
        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert!(err.to_string().contains("unknown output format: yaml"));
    }

    #[test]
    fn given_partial_overlay_when_merging_then_only_specified_fields_change() {
        let base = Settings {
            input: Some(PathBuf::from("nodes.json")),
            format: OutputFormat::Json,
            strict: true,
            label_field: None,
        };
        let overlay = RawSettings {
            label_field: Some("type".into()),
            ..Default::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.input, Some(PathBuf::from("nodes.json")));
        assert_eq!(merged.format, OutputFormat::Json);
        assert!(merged.strict);
        assert_eq!(merged.label_field.as_deref(), Some("type"));
    }

    #[test]
    fn given_defaults_when_rendering_toml_then_omits_unset_options() {
        let toml = Settings::default().to_toml().unwrap();

        assert!(toml.contains("format = \"text\""));
        assert!(toml.contains("strict = false"));
        assert!(!toml.contains("input"));
        assert!(!toml.contains("label_field"));
    }
}
