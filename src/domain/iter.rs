use std::collections::VecDeque;

use crate::domain::node::TreeNode;
use crate::domain::store::TreeStore;

/// Breadth-first iterator over the descendants of a node.
pub struct Descendants<'a, N> {
    store: &'a TreeStore<N>,
    queue: VecDeque<usize>,
}

impl<'a, N: TreeNode> Descendants<'a, N> {
    pub(crate) fn new(store: &'a TreeStore<N>, queue: VecDeque<usize>) -> Self {
        Self { store, queue }
    }
}

impl<'a, N: TreeNode> Iterator for Descendants<'a, N> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.queue.pop_front()?;
        let node = self.store.node_at(pos);
        // FIFO keeps whole levels together
        self.queue
            .extend(self.store.child_positions(node.id()).iter().copied());
        Some(node)
    }
}

/// Iterator from a node's parent up to its root.
pub struct Ancestors<'a, N> {
    store: &'a TreeStore<N>,
    next: Option<usize>,
}

impl<'a, N: TreeNode> Ancestors<'a, N> {
    pub(crate) fn new(store: &'a TreeStore<N>, next: Option<usize>) -> Self {
        Self { store, next }
    }
}

impl<'a, N: TreeNode> Iterator for Ancestors<'a, N> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        let pos = self.next?;
        let node = self.store.node_at(pos);
        self.next = self.store.parent_position(node.id());
        Some(node)
    }
}
