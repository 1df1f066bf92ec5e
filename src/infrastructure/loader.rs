//! JSON node list input.
//!
//! Expects a top-level array of objects, each with an `id` and an optional
//! `parent`; all other fields are carried along untouched.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use tracing::{debug, instrument};

use crate::domain::{Record, TreeStore};
use crate::infrastructure::error::{InfraError, InfraResult};

/// Path value that selects standard input.
pub const STDIN_PATH: &str = "-";

/// Parse a JSON array of node records. `origin` only shows up in errors.
pub fn parse_records(content: &str, origin: &str) -> InfraResult<Vec<Record>> {
    serde_json::from_str(content).map_err(|source| InfraError::Parse {
        origin: origin.to_string(),
        source,
    })
}

/// Read node records from `path`, or from stdin when `path` is `-`.
#[instrument(level = "debug")]
pub fn load_records(path: &Path) -> InfraResult<Vec<Record>> {
    let (content, origin) = if path == Path::new(STDIN_PATH) {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| InfraError::io("read stdin", e))?;
        (buf, "<stdin>".to_string())
    } else {
        let content = fs::read_to_string(path)
            .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
        (content, path.display().to_string())
    };

    let records = parse_records(&content, &origin)?;
    debug!(records = records.len(), %origin, "node list loaded");
    Ok(records)
}

/// Load and index a node list; `strict` rejects duplicate ids.
pub fn load_store(path: &Path, strict: bool) -> InfraResult<TreeStore<Record>> {
    let records = load_records(path)?;
    if strict {
        Ok(TreeStore::try_build(records)?)
    } else {
        Ok(TreeStore::build(records))
    }
}
