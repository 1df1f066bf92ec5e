//! Process exit codes, numbered after BSD sysexits.h.
//!
//! [`CliError::exit_code`](crate::cli::CliError::exit_code) is the only place
//! that picks one of these for a failure.

/// Query ran, including "id not found" results.
pub const OK: i32 = 0;

/// No node list given by `--file` or `input`, or a non-query command handed
/// to the query runner.
pub const USAGE: i32 = 64;

/// Node list is not a JSON array of records, a node id is neither an integer
/// nor a string, or `--strict` found a repeated id.
pub const DATAERR: i32 = 65;

/// Node list file does not exist.
pub const NOINPUT: i32 = 66;

/// Query result could not be serialized for output.
pub const SOFTWARE: i32 = 70;

/// Reading the node list or writing help text failed.
pub const IOERR: i32 = 74;

/// Unreadable settings file, bad TOML, or an invalid `TREESTORE_*` value.
pub const CONFIG: i32 = 78;
