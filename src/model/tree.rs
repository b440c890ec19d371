// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Tree store: the flat node collection of one open map.
//!
//! Nodes live in a `Vec` (document order, which is also draw order) with a
//! `HashMap` from id to slot for O(1) lookup. Parent links are plain ids, so
//! the forest has no owning cycles; children and ancestors are derived by
//! scanning. Acyclicity is checked on every reparent.

use super::node::{Node, Side};
use super::node_id::NodeId;
use crate::settings;
use kurbo::Point;
use std::collections::{HashMap, HashSet};

/// Result of a guarded delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The node and its subtree were removed
    Deleted {
        /// Former parent of the removed node
        parent: Option<NodeId>,
        /// Number of nodes removed, including the node itself
        removed: usize,
    },
    /// Refused: the node is the only remaining root
    LastRoot,
    NotFound,
}

/// The node collection of a single map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
    index: HashMap<NodeId, usize>,
}

impl Tree {
    /// An empty tree (no roots yet)
    pub fn new() -> Self {
        Self::default()
    }

    /// A tree with the single root of a freshly created map
    pub fn with_root(text: impl Into<String>) -> Self {
        let mut root = Node::new(text, None, Side::Right);
        root.id = NodeId::root();
        let mut tree = Self::new();
        tree.insert(root);
        tree
    }

    /// Build a tree from stored records, repairing anything that would
    /// break the forest invariant.
    ///
    /// Duplicate ids keep their first occurrence, parents that do not exist
    /// turn the node into a root, and a node found on a parent cycle is
    /// detached to break it.
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        let mut tree = Self::new();
        for node in nodes {
            if tree.contains(&node.id) {
                tracing::warn!("Dropping node with duplicate id {}", node.id);
                continue;
            }
            tree.insert(node);
        }

        for i in 0..tree.nodes.len() {
            let dangling = match &tree.nodes[i].parent_id {
                Some(parent) => !tree.index.contains_key(parent),
                None => false,
            };
            if dangling {
                tracing::warn!("Node {} has a missing parent, making it a root", tree.nodes[i].id);
                tree.nodes[i].parent_id = None;
            }
        }

        for i in 0..tree.nodes.len() {
            let id = tree.nodes[i].id.clone();
            if tree.ancestors(&id).any(|a| a.id == id) {
                tracing::warn!("Node {} is its own ancestor, detaching it", id);
                tree.nodes[i].parent_id = None;
            }
        }

        tree
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.index.contains_key(id)
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn get_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.index.get(id).map(|&i| &mut self.nodes[i])
    }

    /// Parent record of `id`, if it has one
    pub fn parent(&self, id: &NodeId) -> Option<&Node> {
        self.get(id)?.parent_id.as_ref().and_then(|p| self.get(p))
    }

    /// Direct children of `id`, in document order
    pub fn children<'a>(&'a self, id: &'a NodeId) -> impl Iterator<Item = &'a Node> + 'a {
        self.nodes
            .iter()
            .filter(move |n| n.parent_id.as_ref() == Some(id))
    }

    /// Children of `id` on one side
    pub fn children_on<'a>(
        &'a self,
        id: &'a NodeId,
        side: Side,
    ) -> impl Iterator<Item = &'a Node> + 'a {
        self.children(id).filter(move |n| n.side == side)
    }

    pub fn roots(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_root())
    }

    pub fn root_count(&self) -> usize {
        self.roots().count()
    }

    /// Walk from the parent of `id` up to its root.
    ///
    /// The walk is bounded by the node count, so a corrupted parent cycle
    /// cannot loop forever.
    pub fn ancestors<'a>(&'a self, id: &NodeId) -> impl Iterator<Item = &'a Node> + use<'a> {
        let mut current = self.parent(id);
        let mut remaining = self.nodes.len();
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            remaining -= 1;
            let node = current?;
            current = node.parent_id.as_ref().and_then(|p| self.get(p));
            Some(node)
        })
    }

    /// Whether `candidate` lies somewhere below `node`
    pub fn is_descendant(&self, node: &NodeId, candidate: &NodeId) -> bool {
        self.ancestors(candidate).any(|a| &a.id == node)
    }

    /// Ids of `id` and everything below it, parents before children
    pub fn subtree_ids(&self, id: &NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        let mut out = Vec::new();
        let mut stack = vec![id.clone()];
        while let Some(current) = stack.pop() {
            stack.extend(self.children(&current).map(|c| c.id.clone()));
            out.push(current);
        }
        out
    }

    // ===== MUTATIONS =====

    fn insert(&mut self, node: Node) {
        self.index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    fn reindex(&mut self) {
        self.index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
    }

    /// Add a new root at a document position
    pub fn add_root(&mut self, text: impl Into<String>, position: Point) -> NodeId {
        let mut node = Node::new(text, None, Side::Right);
        node.set_position(position);
        let id = node.id.clone();
        self.insert(node);
        tracing::debug!("Created root {}", id);
        id
    }

    /// Add a child under `parent` on `side`; `None` if the parent is unknown
    pub fn add_child(
        &mut self,
        parent: &NodeId,
        text: impl Into<String>,
        side: Side,
    ) -> Option<NodeId> {
        let origin = self.get(parent)?.position();
        let mut node = Node::new(text, Some(parent.clone()), side);
        node.set_position(origin);
        let id = node.id.clone();
        self.insert(node);
        tracing::debug!("Created child {} under {}", id, parent);
        Some(id)
    }

    /// Remove `id` and its whole subtree, returning the removed ids
    pub fn remove_subtree(&mut self, id: &NodeId) -> Vec<NodeId> {
        let doomed = self.subtree_ids(id);
        if doomed.is_empty() {
            return doomed;
        }
        let set: HashSet<&NodeId> = doomed.iter().collect();
        self.nodes.retain(|n| !set.contains(&n.id));
        self.reindex();
        doomed
    }

    /// Delete `id` recursively unless it is the last remaining root
    pub fn delete(&mut self, id: &NodeId) -> DeleteOutcome {
        let Some(node) = self.get(id) else {
            return DeleteOutcome::NotFound;
        };
        if node.is_root() && self.root_count() <= 1 {
            tracing::debug!("Refusing to delete the last root {}", id);
            return DeleteOutcome::LastRoot;
        }
        let parent = node.parent_id.clone();
        let removed = self.remove_subtree(id).len();
        tracing::debug!("Deleted {} ({} nodes)", id, removed);
        DeleteOutcome::Deleted { parent, removed }
    }

    /// Move `id` under `new_parent` on `side`.
    ///
    /// Returns `false` and leaves the tree unchanged if either node is
    /// unknown, or if the move would make `id` its own ancestor.
    pub fn reparent(&mut self, id: &NodeId, new_parent: &NodeId, side: Side) -> bool {
        if id == new_parent || !self.contains(new_parent) || !self.contains(id) {
            return false;
        }
        if self.is_descendant(id, new_parent) {
            tracing::debug!("Rejected reparent of {} under its descendant {}", id, new_parent);
            return false;
        }
        if let Some(node) = self.get_mut(id) {
            node.parent_id = Some(new_parent.clone());
            node.side = side;
        }
        true
    }

    /// Make `id` a root; its current position becomes its anchor
    pub fn detach(&mut self, id: &NodeId) -> bool {
        match self.get_mut(id) {
            Some(node) if !node.is_root() => {
                node.parent_id = None;
                true
            }
            _ => false,
        }
    }

    /// Flip the collapse flag of `id` for one side, returning the new state
    pub fn toggle_collapsed(&mut self, id: &NodeId, side: Side) -> Option<bool> {
        let node = self.get_mut(id)?;
        let collapsed = !node.is_collapsed(side);
        node.set_collapsed(side, collapsed);
        Some(collapsed)
    }

    /// Adjust the font size of `id` by `delta`, clamped to the allowed range
    pub fn change_font_size(&mut self, id: &NodeId, delta: i32) -> Option<u32> {
        let node = self.get_mut(id)?;
        let size = (node.font_size as i64 + delta as i64).clamp(
            settings::node::MIN_FONT_SIZE as i64,
            settings::node::MAX_FONT_SIZE as i64,
        ) as u32;
        node.font_size = size;
        Some(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// root -> a -> b, root -> c
    fn sample() -> (Tree, NodeId, NodeId, NodeId, NodeId) {
        let mut tree = Tree::with_root("Root");
        let root = NodeId::root();
        let a = tree.add_child(&root, "A", Side::Right).unwrap();
        let b = tree.add_child(&a, "B", Side::Right).unwrap();
        let c = tree.add_child(&root, "C", Side::Left).unwrap();
        (tree, root, a, b, c)
    }

    #[test]
    fn add_child_links_parent_and_side() {
        let (tree, root, a, _, c) = sample();
        let node = tree.get(&a).unwrap();
        assert_eq!(node.parent_id.as_ref(), Some(&root));
        assert_eq!(node.side, Side::Right);
        assert_eq!(tree.get(&c).unwrap().side, Side::Left);
        assert_eq!(tree.children(&root).count(), 2);
        assert_eq!(tree.children_on(&root, Side::Left).count(), 1);
    }

    #[test]
    fn add_child_to_unknown_parent_fails() {
        let mut tree = Tree::with_root("Root");
        assert!(tree.add_child(&NodeId::from("nope"), "X", Side::Right).is_none());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn ancestors_walk_to_root() {
        let (tree, root, a, b, _) = sample();
        let chain: Vec<_> = tree.ancestors(&b).map(|n| n.id.clone()).collect();
        assert_eq!(chain, vec![a, root]);
    }

    #[test]
    fn descendant_queries() {
        let (tree, root, a, b, c) = sample();
        assert!(tree.is_descendant(&a, &b));
        assert!(tree.is_descendant(&root, &b));
        assert!(!tree.is_descendant(&b, &a));
        assert!(!tree.is_descendant(&a, &c));
        assert!(!tree.is_descendant(&a, &a));
    }

    #[test]
    fn delete_is_recursive() {
        let (mut tree, root, a, b, c) = sample();
        let outcome = tree.delete(&a);
        assert_eq!(
            outcome,
            DeleteOutcome::Deleted {
                parent: Some(root.clone()),
                removed: 2
            }
        );
        assert!(!tree.contains(&a));
        assert!(!tree.contains(&b));
        assert!(tree.contains(&c));
        assert_eq!(tree.get(&c).unwrap().id, c);
    }

    #[test]
    fn last_root_cannot_be_deleted() {
        let (mut tree, root, ..) = sample();
        assert_eq!(tree.delete(&root), DeleteOutcome::LastRoot);
        assert_eq!(tree.root_count(), 1);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn one_of_several_roots_can_be_deleted() {
        let (mut tree, root, ..) = sample();
        let other = tree.add_root("Other", Point::new(0.0, 300.0));
        assert!(matches!(tree.delete(&root), DeleteOutcome::Deleted { parent: None, removed: 4 }));
        assert_eq!(tree.root_count(), 1);
        assert!(tree.contains(&other));
    }

    #[test]
    fn reparent_onto_descendant_is_rejected() {
        let (mut tree, root, a, b, _) = sample();
        assert!(!tree.reparent(&a, &b, Side::Left));
        assert_eq!(tree.get(&a).unwrap().parent_id.as_ref(), Some(&root));
        assert!(!tree.reparent(&a, &a, Side::Left));
    }

    #[test]
    fn reparent_changes_only_parent_and_side() {
        let (mut tree, _, a, _, c) = sample();
        let before = tree.get(&a).unwrap().clone();
        assert!(tree.reparent(&a, &c, Side::Left));
        let after = tree.get(&a).unwrap();
        assert_eq!(after.parent_id.as_ref(), Some(&c));
        assert_eq!(after.side, Side::Left);
        assert_eq!(after.text, before.text);
        assert_eq!(after.id, before.id);
    }

    #[test]
    fn random_reparents_never_create_cycles() {
        let mut tree = Tree::with_root("Root");
        let mut ids = vec![NodeId::root()];
        for i in 0..12 {
            let parent = ids[i / 2].clone();
            ids.push(tree.add_child(&parent, format!("{i}"), Side::Right).unwrap());
        }
        // Deterministic pseudo-random pairs
        let mut seed: usize = 7;
        for _ in 0..200 {
            seed = (seed * 31 + 17) % 1009;
            let from = &ids[seed % ids.len()];
            let to = &ids[(seed / 7) % ids.len()];
            tree.reparent(from, to, Side::Left);
            for id in &ids {
                assert!(tree.ancestors(id).all(|a| &a.id != id));
            }
        }
    }

    #[test]
    fn detach_makes_root() {
        let (mut tree, _, a, b, _) = sample();
        assert!(tree.detach(&a));
        assert!(tree.get(&a).unwrap().is_root());
        assert_eq!(tree.root_count(), 2);
        assert!(tree.is_descendant(&a, &b));
        assert!(!tree.detach(&a));
    }

    #[test]
    fn toggle_collapsed_flips_one_side() {
        let (mut tree, root, ..) = sample();
        assert_eq!(tree.toggle_collapsed(&root, Side::Right), Some(true));
        assert!(tree.get(&root).unwrap().collapsed_right);
        assert!(!tree.get(&root).unwrap().collapsed_left);
        assert_eq!(tree.toggle_collapsed(&root, Side::Right), Some(false));
    }

    #[test]
    fn font_size_is_clamped() {
        let (mut tree, root, ..) = sample();
        assert_eq!(tree.change_font_size(&root, 2), Some(16));
        assert_eq!(tree.change_font_size(&root, 500), Some(100));
        assert_eq!(tree.change_font_size(&root, -500), Some(8));
    }

    #[test]
    fn from_nodes_repairs_forest() {
        let mut a = Node::new("A", Some(NodeId::from("missing")), Side::Right);
        a.id = NodeId::from("a");
        let mut b = Node::new("B", Some(NodeId::from("c")), Side::Right);
        b.id = NodeId::from("b");
        let mut c = Node::new("C", Some(NodeId::from("b")), Side::Right);
        c.id = NodeId::from("c");
        let dup = a.clone();

        let tree = Tree::from_nodes(vec![a, b, c, dup]);
        assert_eq!(tree.len(), 3);
        assert!(tree.get(&NodeId::from("a")).unwrap().is_root());
        // The b <-> c cycle is broken at the first node found on it
        assert!(tree.get(&NodeId::from("b")).unwrap().is_root());
        assert_eq!(
            tree.get(&NodeId::from("c")).unwrap().parent_id,
            Some(NodeId::from("b"))
        );
    }
}
