//! Environment overrides live in their own test binary: env vars are process-global.

use std::env;
use std::fs;

use tempfile::TempDir;

use treestore::config::{local_config_path, OutputFormat, Settings};

#[test]
fn given_env_vars_when_load_then_override_local_config() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "format = \"text\"\nstrict = false\n",
    )
    .unwrap();

    env::set_var("TREESTORE_FORMAT", "json");
    env::set_var("TREESTORE_STRICT", "true");
    env::set_var("TREESTORE_LABEL_FIELD", "type");
    let settings = Settings::load(Some(dir.path()));
    env::remove_var("TREESTORE_FORMAT");
    env::remove_var("TREESTORE_STRICT");
    env::remove_var("TREESTORE_LABEL_FIELD");

    let settings = settings.expect("load settings");
    assert_eq!(settings.format, OutputFormat::Json);
    assert!(settings.strict);
    assert_eq!(settings.label_field.as_deref(), Some("type"));
}
