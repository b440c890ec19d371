// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Visibility and automatic layout of a map.
//!
//! Everything here is derived from the tree on demand: nothing is cached,
//! so callers must re-query after any mutation. Hiding is a property of the
//! edge between a node and its parent: a child is hidden when its parent has
//! collapsed the child's side.
//!
//! Layout places each root at its stored position and stacks the visible
//! children of every node in one column per node, offset horizontally by a
//! fixed step toward the child's side. A child's band is the height of its
//! own visible subtree, so collapsing reclaims space.

mod geometry;

pub use geometry::{Connector, NodeExtents, ToggleButton, connectors, node_at, toggle_at, toggles};

use crate::model::{Node, NodeId, Tree};
use crate::settings::layout::{HORIZONTAL_STEP, LEAF_HEIGHT, SIBLING_GAP};
use kurbo::Point;

/// Whether `child` is shown when its parent is shown
fn edge_open(parent: &Node, child: &Node) -> bool {
    !parent.is_collapsed(child.side)
}

/// Whether a node is currently shown.
///
/// Roots are always visible. Any collapsed edge on the path to the root
/// hides the node, whichever ancestor it belongs to.
pub fn is_visible(tree: &Tree, id: &NodeId) -> bool {
    let Some(mut node) = tree.get(id) else {
        return false;
    };
    for parent in tree.ancestors(id) {
        if !edge_open(parent, node) {
            return false;
        }
        node = parent;
    }
    true
}

/// Children of `id` that are not hidden by `id`'s own collapse flags
pub fn visible_children<'a>(tree: &'a Tree, id: &'a NodeId) -> impl Iterator<Item = &'a Node> + 'a {
    let parent = tree.get(id);
    tree.children(id)
        .filter(move |child| parent.is_some_and(|p| edge_open(p, child)))
}

/// All visible nodes in draw order
pub fn visible_nodes(tree: &Tree) -> impl Iterator<Item = &Node> {
    tree.nodes().iter().filter(|n| is_visible(tree, &n.id))
}

/// Vertical space taken by `id` and its visible descendants
pub fn subtree_height(tree: &Tree, id: &NodeId) -> f64 {
    let mut count = 0usize;
    let mut total = 0.0;
    for child in visible_children(tree, id) {
        total += subtree_height(tree, &child.id);
        count += 1;
    }
    if count == 0 {
        LEAF_HEIGHT
    } else {
        total + (count - 1) as f64 * SIBLING_GAP
    }
}

/// Recompute the position of every visible non-root node.
///
/// `frozen` is the node being dragged, if any: its own coordinates are left
/// alone, but its subtree is still placed relative to them.
pub fn layout(tree: &mut Tree, frozen: Option<&NodeId>) {
    let roots: Vec<(NodeId, Point)> = tree
        .roots()
        .map(|r| (r.id.clone(), r.position()))
        .collect();

    let mut placements = Vec::with_capacity(tree.len());
    for (root, anchor) in roots {
        place_subtree(tree, &root, anchor, frozen, &mut placements);
    }

    for (id, pos) in placements {
        if let Some(node) = tree.get_mut(&id) {
            node.set_position(pos);
        }
    }
    tracing::debug!("Layout pass over {} nodes", tree.len());
}

/// Depth-first placement of `id` at `at` and its visible children
fn place_subtree(
    tree: &Tree,
    id: &NodeId,
    at: Point,
    frozen: Option<&NodeId>,
    out: &mut Vec<(NodeId, Point)>,
) {
    let origin = if frozen == Some(id) {
        match tree.get(id) {
            Some(node) => node.position(),
            None => return,
        }
    } else {
        out.push((id.clone(), at));
        at
    };

    let mut cursor_y = origin.y - subtree_height(tree, id) / 2.0;
    for child in visible_children(tree, id) {
        let band = subtree_height(tree, &child.id);
        let child_at = Point::new(
            origin.x + child.side.sign() * HORIZONTAL_STEP,
            cursor_y + band / 2.0,
        );
        place_subtree(tree, &child.id, child_at, frozen, out);
        cursor_y += band + SIBLING_GAP;
    }
}
