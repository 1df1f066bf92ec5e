//! Indexed tree over a flat list of parent-referencing nodes.

use std::collections::HashMap;

use tracing::{debug, instrument, trace};

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::iter::{Ancestors, Descendants};
use crate::domain::node::{NodeId, TreeNode};

/// Read-only index over a node list, built once in a single pass.
///
/// The store owns the input vector; every query hands out references into it,
/// so results are the original nodes in their original order, never copies.
/// Internally three hash maps hold positions into that vector:
/// id -> node, parent id -> children, node id -> resolved parent.
///
/// Input is trusted. Duplicate ids resolve to the last occurrence, dangling
/// parents are ignored and cycles are not detected: a self-parenting node
/// makes [`descendants`](Self::descendants) and [`ancestors`](Self::ancestors)
/// unbounded.
#[derive(Debug, Clone)]
pub struct TreeStore<N> {
    nodes: Vec<N>,
    by_id: HashMap<NodeId, usize>,
    children: HashMap<NodeId, Vec<usize>>,
    parents: HashMap<NodeId, usize>,
}

impl<N: TreeNode> TreeStore<N> {
    /// Indexes `nodes` in one pass, in input order.
    ///
    /// A node's parent is resolved against the nodes scanned *before* it:
    /// a child listed ahead of its parent still shows up in the parent's
    /// children, but [`get_parent`](Self::get_parent) returns `None` for it.
    /// Each truthy parent overwrites the parent entry of its id, so with
    /// duplicate ids the last declaration decides, resolved or not.
    #[instrument(level = "debug", skip_all, fields(nodes = nodes.len()))]
    pub fn build(nodes: Vec<N>) -> Self {
        let mut by_id = HashMap::with_capacity(nodes.len());
        let mut children: HashMap<NodeId, Vec<usize>> = HashMap::new();
        let mut parents = HashMap::new();

        for (pos, node) in nodes.iter().enumerate() {
            by_id.insert(node.id().clone(), pos);

            if let Some(parent) = node.parent().filter(|p| p.is_truthy()) {
                children.entry(parent.clone()).or_default().push(pos);

                match by_id.get(parent) {
                    Some(&parent_pos) => {
                        parents.insert(node.id().clone(), parent_pos);
                    }
                    // a later duplicate id must not inherit the earlier node's parent
                    None => {
                        parents.remove(node.id());
                    }
                }
            }
        }

        debug!(
            ids = by_id.len(),
            parent_keys = children.len(),
            resolved_parents = parents.len(),
            "tree index built"
        );

        Self {
            nodes,
            by_id,
            children,
            parents,
        }
    }

    /// Like [`build`](Self::build) but rejects repeated ids instead of
    /// letting the last occurrence win. Nothing else is validated.
    #[instrument(level = "debug", skip_all, fields(nodes = nodes.len()))]
    pub fn try_build(nodes: Vec<N>) -> DomainResult<Self> {
        {
            let mut seen: HashMap<&NodeId, usize> = HashMap::with_capacity(nodes.len());
            for (pos, node) in nodes.iter().enumerate() {
                if let Some(first) = seen.insert(node.id(), pos) {
                    debug!(id = %node.id(), first, second = pos, "duplicate id rejected");
                    return Err(DomainError::DuplicateId {
                        id: node.id().clone(),
                        first,
                        second: pos,
                    });
                }
            }
        }
        Ok(Self::build(nodes))
    }

    /// The original input, same order and length.
    pub fn get_all(&self) -> &[N] {
        &self.nodes
    }

    pub fn get_item(&self, id: impl Into<NodeId>) -> Option<&N> {
        self.by_id.get(&id.into()).map(|&pos| &self.nodes[pos])
    }

    /// Direct children in input order; empty when there are none.
    ///
    /// `id` is matched against declared parent values, so it does not have to
    /// be the id of an indexed node.
    pub fn get_children(&self, id: impl Into<NodeId>) -> Vec<&N> {
        self.child_positions(&id.into())
            .iter()
            .map(|&pos| &self.nodes[pos])
            .collect()
    }

    /// All descendants, breadth-first: every level before the next one.
    pub fn get_all_children(&self, id: impl Into<NodeId>) -> Vec<&N> {
        let id = id.into();
        let found: Vec<&N> = self.descendants(&id).collect();
        trace!(%id, found = found.len(), "descendants collected");
        found
    }

    /// Parent resolved at construction time.
    pub fn get_parent(&self, id: impl Into<NodeId>) -> Option<&N> {
        self.parent_position(&id.into()).map(|pos| &self.nodes[pos])
    }

    /// Ancestor chain from the direct parent up to the root, excluding `id`.
    pub fn get_all_parents(&self, id: impl Into<NodeId>) -> Vec<&N> {
        let id = id.into();
        let found: Vec<&N> = self.ancestors(&id).collect();
        trace!(%id, found = found.len(), "ancestors collected");
        found
    }

    /// Lazy breadth-first walk over the descendants of `id`.
    pub fn descendants(&self, id: impl Into<NodeId>) -> Descendants<'_, N> {
        let start = self.child_positions(&id.into()).iter().copied().collect();
        Descendants::new(self, start)
    }

    /// Lazy walk from the direct parent of `id` towards the root.
    pub fn ancestors(&self, id: impl Into<NodeId>) -> Ancestors<'_, N> {
        Ancestors::new(self, self.parent_position(&id.into()))
    }

    /// Nodes without a resolved parent, in input order.
    pub fn roots(&self) -> Vec<&N> {
        self.nodes
            .iter()
            .filter(|node| !self.parents.contains_key(node.id()))
            .collect()
    }

    /// Descendants of `id` that have no children themselves, breadth-first.
    pub fn leaf_nodes(&self, id: impl Into<NodeId>) -> Vec<&N> {
        self.descendants(id)
            .filter(|node| self.child_positions(node.id()).is_empty())
            .collect()
    }

    /// Number of ancestors; `0` for roots and unknown ids.
    pub fn depth(&self, id: impl Into<NodeId>) -> usize {
        self.ancestors(id).count()
    }

    pub fn contains(&self, id: impl Into<NodeId>) -> bool {
        self.by_id.contains_key(&id.into())
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub(crate) fn node_at(&self, pos: usize) -> &N {
        &self.nodes[pos]
    }

    pub(crate) fn child_positions(&self, id: &NodeId) -> &[usize] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn parent_position(&self, id: &NodeId) -> Option<usize> {
        self.parents.get(id).copied()
    }
}

impl<N: TreeNode> From<Vec<N>> for TreeStore<N> {
    fn from(nodes: Vec<N>) -> Self {
        Self::build(nodes)
    }
}

impl<N: TreeNode> FromIterator<N> for TreeStore<N> {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self::build(iter.into_iter().collect())
    }
}
