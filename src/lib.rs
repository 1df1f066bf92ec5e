//! treestore: an in-memory index over a flat list of parent-referencing nodes.
//!
//! [`TreeStore`] is built once from a node list and then answers structural
//! queries: lookup by id, direct children, all descendants (breadth-first),
//! direct parent and the ancestor chain.
//!
//! ```
//! use treestore::{NodeId, Record, TreeStore};
//!
//! let store = TreeStore::build(vec![
//!     Record::new(1, None),
//!     Record::new(2, Some(NodeId::Int(1))),
//!     Record::new(3, Some(NodeId::Int(2))),
//! ]);
//!
//! assert_eq!(store.get_all_children(1).len(), 2);
//! assert_eq!(store.get_all_parents(3)[0].id, NodeId::Int(2));
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use domain::{DomainError, NodeId, Record, TreeNode, TreeNodeConvert, TreeStore};
