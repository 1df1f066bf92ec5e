//! Domain layer: node model and the indexed tree
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod iter;
pub mod node;
pub mod render;
pub mod store;

pub use error::{DomainError, DomainResult};
pub use iter::{Ancestors, Descendants};
pub use node::{NodeId, Record, TreeNode};
pub use render::TreeNodeConvert;
pub use store::TreeStore;
