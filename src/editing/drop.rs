// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Turning a finished node drag into a tree change.
//!
//! Dropping on another node reparents onto it, unless that node lies inside
//! the dragged subtree. Dropping on empty canvas far enough from the old
//! parent detaches the node into a new root; dropping close to it cancels
//! the drag and the next layout pass snaps the node back.

use super::pointer::DragSubject;
use crate::model::{NodeId, Side, Tree};
use crate::settings::interaction::DETACH_DISTANCE;

/// How a drop was resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// Moved under a new parent on the given side
    Reparented { parent: NodeId, side: Side },
    /// The target was inside the dragged subtree; nothing changed
    Rejected,
    /// Became a new root
    Detached,
    /// Dropped near the old parent; nothing changed
    Cancelled,
    /// A root dropped on empty canvas keeps its new position
    RootMoved,
}

impl DropOutcome {
    /// Whether the tree structure changed
    pub fn is_structural(&self) -> bool {
        matches!(self, DropOutcome::Reparented { .. } | DropOutcome::Detached)
    }
}

/// Decide what a drop means without changing anything
pub fn resolve_drop(tree: &Tree, subject: &DragSubject, candidate: Option<&NodeId>) -> DropOutcome {
    let Some(node) = tree.get(&subject.id) else {
        return DropOutcome::Cancelled;
    };

    if let Some(target_id) = candidate.filter(|c| **c != subject.id) {
        let Some(target) = tree.get(target_id) else {
            return DropOutcome::Cancelled;
        };
        if tree.is_descendant(&subject.id, target_id) {
            return DropOutcome::Rejected;
        }
        let side = if node.x < target.x {
            Side::Left
        } else {
            Side::Right
        };
        return DropOutcome::Reparented {
            parent: target_id.clone(),
            side,
        };
    }

    match subject.parent.as_ref().and_then(|p| tree.get(p)) {
        Some(parent) => {
            if node.position().distance(parent.position()) > DETACH_DISTANCE {
                DropOutcome::Detached
            } else {
                DropOutcome::Cancelled
            }
        }
        None if subject.parent.is_none() => DropOutcome::RootMoved,
        None => DropOutcome::Cancelled,
    }
}

/// Resolve a drop and apply it to the tree
pub fn apply_drop(tree: &mut Tree, subject: &DragSubject, candidate: Option<&NodeId>) -> DropOutcome {
    let outcome = resolve_drop(tree, subject, candidate);
    match &outcome {
        DropOutcome::Reparented { parent, side } => {
            if !tree.reparent(&subject.id, parent, *side) {
                return DropOutcome::Rejected;
            }
        }
        DropOutcome::Detached => {
            tree.detach(&subject.id);
        }
        DropOutcome::Rejected | DropOutcome::Cancelled | DropOutcome::RootMoved => {}
    }
    tracing::debug!("Drop of {} resolved as {:?}", subject.id, outcome);
    outcome
}

/// Live readout of the detach decision while `id` is being dragged
pub fn is_detaching(tree: &Tree, id: &NodeId) -> bool {
    match (tree.get(id), tree.parent(id)) {
        (Some(node), Some(parent)) => node.position().distance(parent.position()) > DETACH_DISTANCE,
        _ => false,
    }
}
