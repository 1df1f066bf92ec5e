//! Rendering of stored hierarchies as `termtree` trees.

use std::fmt::Display;

use termtree::Tree;
use tracing::instrument;

use crate::domain::node::{NodeId, TreeNode};
use crate::domain::store::TreeStore;

pub trait TreeNodeConvert {
    /// Renders the subtree below `id`, labelling nodes with their `Display`.
    fn to_tree_string(&self, id: &NodeId) -> Tree<String>;
}

impl<N: TreeNode + Display> TreeNodeConvert for TreeStore<N> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, id: &NodeId) -> Tree<String> {
        self.to_tree_with(id, |node| node.to_string())
    }
}

impl<N: TreeNode> TreeStore<N> {
    /// Renders the subtree below `id` using `label` for every node.
    ///
    /// The root label is `label(node)` when `id` is indexed, otherwise the raw
    /// id; this way a shared parent key such as `"root"` renders the whole
    /// hierarchy underneath it.
    pub fn to_tree_with<F>(&self, id: &NodeId, label: F) -> Tree<String>
    where
        F: Fn(&N) -> String,
    {
        let root = self
            .get_item(id)
            .map(&label)
            .unwrap_or_else(|| id.to_string());
        let mut tree = Tree::new(root);
        self.push_children(id, &label, &mut tree);
        tree
    }

    /// One tree per root node, in input order.
    pub fn forest_with<F>(&self, label: F) -> Vec<Tree<String>>
    where
        F: Fn(&N) -> String,
    {
        self.roots()
            .into_iter()
            .map(|root| self.to_tree_with(root.id(), &label))
            .collect()
    }

    fn push_children<F>(&self, id: &NodeId, label: &F, parent_tree: &mut Tree<String>)
    where
        F: Fn(&N) -> String,
    {
        for child in self.get_children(id) {
            let mut child_tree = Tree::new(label(child));
            self.push_children(child.id(), label, &mut child_tree);
            parent_tree.push(child_tree);
        }
    }
}
