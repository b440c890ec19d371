// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Single-node selection.
//!
//! A map has at most one selected node. It doubles as keyboard focus:
//! shortcuts such as Tab and Delete act on the selected node.

use crate::model::NodeId;

/// The selected node, if any
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    current: Option<NodeId>,
}

impl Selection {
    /// Create a new empty selection
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    pub fn get(&self) -> Option<&NodeId> {
        self.current.as_ref()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.current.as_ref() == Some(id)
    }

    /// Replace the selection
    pub fn select(&mut self, id: NodeId) {
        self.current = Some(id);
    }

    /// Select `id` or clear when `None`
    pub fn set(&mut self, id: Option<NodeId>) {
        self.current = id;
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Drop the selection if it points at one of `removed`
    pub fn forget(&mut self, removed: &[NodeId]) {
        if self.current.as_ref().is_some_and(|id| removed.contains(id)) {
            self.current = None;
        }
    }
}
