//! Infrastructure layer: reading node lists from the outside world

pub mod error;
pub mod loader;

pub use error::{InfraError, InfraResult};
pub use loader::{load_records, load_store, parse_records};
