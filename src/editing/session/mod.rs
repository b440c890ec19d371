// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Map session: everything needed to edit one open map

mod commands;
mod pointer_input;

use super::drop::is_detaching;
use super::input::PointerTarget;
use super::pointer::{DragEnv, PointerState};
use super::selection::Selection;
use super::viewport::ViewPort;
use crate::layout::{self, Connector, ToggleButton};
use crate::model::{NodeId, Tree};
use kurbo::{Point, Size};
use std::collections::HashMap;

/// What the host has to do after the session handled an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[must_use]
pub struct SessionUpdate {
    /// Something visible changed
    pub redraw: bool,
    /// The map content changed and should be written to the store
    pub persist: bool,
}

impl SessionUpdate {
    pub const NONE: Self = Self {
        redraw: false,
        persist: false,
    };

    pub const REDRAW: Self = Self {
        redraw: true,
        persist: false,
    };

    pub const CHANGED: Self = Self {
        redraw: true,
        persist: true,
    };

    pub fn merge(self, other: Self) -> Self {
        Self {
            redraw: self.redraw || other.redraw,
            persist: self.persist || other.persist,
        }
    }
}

/// Text edit in progress on one node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub node: NodeId,
    /// Current contents of the editor
    pub buffer: String,
}

/// Editing session for a single map
///
/// Owns the node tree, the gesture state, the selection and the camera.
/// The host feeds it abstract input events and redraws from its queries
/// after every [`SessionUpdate`] that asks for it.
#[derive(Debug, Clone)]
pub struct MapSession {
    pub tree: Tree,

    /// Selected node (also keyboard focus)
    pub selection: Selection,

    /// Viewport transformation
    pub viewport: ViewPort,

    /// Node sizes measured by the renderer after the last draw
    pub extents: HashMap<NodeId, Size>,

    pointer: PointerState,

    editing: Option<TextEdit>,
}

impl MapSession {
    pub fn new(tree: Tree) -> Self {
        let mut session = Self {
            tree,
            selection: Selection::new(),
            viewport: ViewPort::new(),
            extents: HashMap::new(),
            pointer: PointerState::Idle,
            editing: None,
        };
        session.relayout();
        session
    }

    pub fn pointer_state(&self) -> &PointerState {
        &self.pointer
    }

    pub fn editing(&self) -> Option<&TextEdit> {
        self.editing.as_ref()
    }

    pub fn is_editing(&self, id: &NodeId) -> bool {
        self.editing.as_ref().is_some_and(|e| e.node == *id)
    }

    /// Record the renderer's measured size of a node
    pub fn set_extent(&mut self, id: NodeId, size: Size) {
        self.extents.insert(id, size);
    }

    /// Recompute node positions. Does nothing while a node is being dragged.
    pub fn relayout(&mut self) {
        if self.pointer.dragged().is_some() {
            return;
        }
        layout::layout(&mut self.tree, None);
    }

    /// Node currently showing the "will detach" indicator
    pub fn detaching_node(&self) -> Option<&NodeId> {
        let subject = self.pointer.dragged()?;
        is_detaching(&self.tree, &subject.id).then_some(&subject.id)
    }

    /// Node under the drag as a drop target, for highlighting
    pub fn drop_target(&self) -> Option<&NodeId> {
        self.pointer.drop_candidate()
    }

    pub fn connectors(&self) -> Vec<Connector> {
        layout::connectors(&self.tree, &self.extents, self.detaching_node())
    }

    pub fn toggles(&self) -> Vec<ToggleButton> {
        layout::toggles(&self.tree, &self.extents)
    }

    /// Hit test a screen position against toggles, then nodes
    pub fn target_at(&self, screen: Point) -> PointerTarget {
        let doc = self.viewport.screen_to_document(screen);
        if let Some((id, side)) = layout::toggle_at(&self.tree, &self.extents, doc) {
            return PointerTarget::Toggle(id, side);
        }
        match layout::node_at(&self.tree, &self.extents, doc, None) {
            Some(id) => PointerTarget::Node(id),
            None => PointerTarget::Background,
        }
    }

    /// Drop the selection and edit state if they point at removed nodes
    fn forget(&mut self, removed: &[NodeId]) {
        self.selection.forget(removed);
        if self.editing.as_ref().is_some_and(|e| removed.contains(&e.node)) {
            self.editing = None;
        }
        for id in removed {
            self.extents.remove(id);
        }
    }
}

impl DragEnv for MapSession {
    fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    fn drop_candidate(&self, screen: Point, subject: &NodeId) -> Option<NodeId> {
        let doc = self.viewport.screen_to_document(screen);
        layout::node_at(&self.tree, &self.extents, doc, Some(subject))
    }
}
