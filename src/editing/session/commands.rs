// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Keyboard commands, text editing and view commands for MapSession

use super::{MapSession, SessionUpdate, TextEdit};
use crate::editing::input::{Key, KeyEvent};
use crate::editing::navigation::{Direction, find_target};
use crate::editing::pointer::PointerEvent;
use crate::model::{DeleteOutcome, NodeId, Side};
use crate::settings;
use kurbo::{Size, Vec2};

impl MapSession {
    /// Enter text edit mode on `id`.
    ///
    /// Any gesture in flight is abandoned first, and an edit running on
    /// another node is committed.
    pub fn begin_edit(&mut self, id: &NodeId) -> SessionUpdate {
        let mut update = SessionUpdate::NONE;
        if self.editing.as_ref().is_some_and(|e| e.node != *id) {
            update = self.commit_edit();
        }
        let Some(node) = self.tree.get(id) else {
            return update;
        };
        let buffer = node.text.clone();

        update = update.merge(self.dispatch(PointerEvent::Reset));
        self.selection.select(id.clone());
        self.editing = Some(TextEdit {
            node: id.clone(),
            buffer,
        });
        tracing::debug!("Editing {}", id);
        update.merge(SessionUpdate::REDRAW)
    }

    /// Replace the contents of the running edit
    pub fn set_edit_text(&mut self, text: impl Into<String>) {
        if let Some(edit) = self.editing.as_mut() {
            edit.buffer = text.into();
        }
    }

    /// Leave edit mode, writing the text back.
    ///
    /// Blank text deletes a non-root node with its subtree and selects the
    /// former parent; a blank root gets the default root text.
    pub fn commit_edit(&mut self) -> SessionUpdate {
        let Some(edit) = self.editing.take() else {
            return SessionUpdate::NONE;
        };
        let Some(node) = self.tree.get_mut(&edit.node) else {
            return SessionUpdate::NONE;
        };

        if edit.buffer.trim().is_empty() {
            if let Some(parent) = node.parent_id.clone() {
                let removed = self.tree.remove_subtree(&edit.node);
                tracing::debug!("Blank text removed {} ({} nodes)", edit.node, removed.len());
                self.forget(&removed);
                self.selection.select(parent);
                self.relayout();
                return SessionUpdate::CHANGED;
            }
            node.text = settings::node::EMPTY_ROOT_TEXT.to_string();
        } else {
            node.text = edit.buffer;
        }
        SessionUpdate::CHANGED
    }

    /// Handle a key press aimed at the focused node
    pub fn key_down(&mut self, event: KeyEvent) -> SessionUpdate {
        let focused = match &self.editing {
            Some(edit) => Some(edit.node.clone()),
            None => self.selection.get().cloned(),
        };
        let Some(id) = focused.filter(|id| self.tree.contains(id)) else {
            return SessionUpdate::NONE;
        };
        let editing = self.editing.is_some();

        match event.key {
            Key::F2 => self.begin_edit(&id),
            Key::Escape => self.commit_edit(),
            Key::Tab => self.add_child_and_edit(&id),
            Key::Enter if !event.modifiers.shift => self.add_sibling_and_edit(&id),
            Key::Delete | Key::Backspace if !editing => self.delete_node(&id),
            Key::ArrowUp if !editing => self.navigate(&id, Direction::Up),
            Key::ArrowDown if !editing => self.navigate(&id, Direction::Down),
            Key::ArrowLeft if !editing => self.navigate(&id, Direction::Left),
            Key::ArrowRight if !editing => self.navigate(&id, Direction::Right),
            // Everything else belongs to the text editor
            _ => SessionUpdate::NONE,
        }
    }

    /// New child on the right of `parent`, selected and in edit mode
    ///
    /// When the running edit on `parent` is blank, committing it removes
    /// `parent` and the child goes to its former parent instead.
    pub fn add_child_and_edit(&mut self, parent: &NodeId) -> SessionUpdate {
        let update = self.dispatch(PointerEvent::Reset).merge(self.commit_edit());
        let parent = if self.tree.contains(parent) {
            parent.clone()
        } else {
            match self.selection.get() {
                Some(survivor) => survivor.clone(),
                None => return update,
            }
        };
        let Some(child) = self.tree.add_child(&parent, "", Side::Right) else {
            return update;
        };
        if let Some(node) = self.tree.get_mut(&parent) {
            node.set_collapsed(Side::Right, false);
        }
        self.relayout();
        update
            .merge(SessionUpdate::CHANGED)
            .merge(self.begin_edit(&child))
    }

    /// New sibling of `id` (a new root below it for roots), selected and in
    /// edit mode
    pub fn add_sibling_and_edit(&mut self, id: &NodeId) -> SessionUpdate {
        let update = self.dispatch(PointerEvent::Reset);
        // Snap an abandoned drag back before reading positions
        self.relayout();
        let Some(node) = self.tree.get(id) else {
            return update;
        };
        let parent = node.parent_id.clone();
        let side = node.side;
        let below = node.position() + Vec2::new(0.0, settings::layout::NEW_ROOT_OFFSET_Y);

        let update = update.merge(self.commit_edit());
        let created = match parent {
            Some(parent) => self.tree.add_child(&parent, "", side),
            None => Some(self.tree.add_root("", below)),
        };
        let Some(created) = created else {
            return update;
        };
        self.relayout();
        update
            .merge(SessionUpdate::CHANGED)
            .merge(self.begin_edit(&created))
    }

    /// Recursive delete of `id`; the former parent becomes selected.
    /// The last remaining root is never deleted.
    pub fn delete_node(&mut self, id: &NodeId) -> SessionUpdate {
        let removed = self.tree.subtree_ids(id);
        match self.tree.delete(id) {
            DeleteOutcome::Deleted { parent, .. } => {
                self.forget(&removed);
                self.selection.set(parent);
                self.relayout();
                SessionUpdate::CHANGED
            }
            DeleteOutcome::LastRoot | DeleteOutcome::NotFound => SessionUpdate::NONE,
        }
    }

    fn navigate(&mut self, from: &NodeId, direction: Direction) -> SessionUpdate {
        match find_target(&self.tree, from, direction) {
            Some(target) => {
                self.selection.select(target);
                SessionUpdate::REDRAW
            }
            None => SessionUpdate::NONE,
        }
    }

    /// Grow or shrink the selected node's text
    pub fn change_font_size(&mut self, delta: i32) -> SessionUpdate {
        let Some(id) = self.selection.get().cloned() else {
            return SessionUpdate::NONE;
        };
        match self.tree.change_font_size(&id, delta) {
            Some(size) => {
                tracing::debug!("{} font size {}", id, size);
                SessionUpdate::CHANGED
            }
            None => SessionUpdate::NONE,
        }
    }

    pub fn zoom_in(&mut self) -> SessionUpdate {
        if self.viewport.zoom_in() {
            SessionUpdate::REDRAW
        } else {
            SessionUpdate::NONE
        }
    }

    pub fn zoom_out(&mut self) -> SessionUpdate {
        if self.viewport.zoom_out() {
            SessionUpdate::REDRAW
        } else {
            SessionUpdate::NONE
        }
    }

    /// Back to 100% zoom, centered in a viewport of `size`
    pub fn reset_zoom(&mut self, size: Size) -> SessionUpdate {
        self.viewport.reset(size);
        SessionUpdate::REDRAW
    }

    pub fn center(&mut self, size: Size) -> SessionUpdate {
        self.viewport.center(size);
        SessionUpdate::REDRAW
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::session_with_child;
    use super::*;
    use crate::editing::input::Modifiers;
    use crate::layout::is_visible;
    use kurbo::Point;

    fn press(session: &mut MapSession, key: Key) -> SessionUpdate {
        session.key_down(KeyEvent::new(key))
    }

    #[test]
    fn tab_creates_child_in_edit_mode() {
        let (mut session, a) = session_with_child();
        session.tree.toggle_collapsed(&a, Side::Right);
        session.selection.select(a.clone());

        let update = press(&mut session, Key::Tab);
        assert!(update.persist);

        let child = session.selection.get().cloned().unwrap();
        assert_eq!(session.tree.get(&child).unwrap().parent_id.as_ref(), Some(&a));
        assert!(session.is_editing(&child));
        assert!(is_visible(&session.tree, &child));
        assert_eq!(session.tree.get(&child).unwrap().position(), Point::new(440.0, 0.0));
    }

    #[test]
    fn blank_commit_deletes_child_and_selects_parent() {
        let (mut session, a) = session_with_child();
        let b = session.tree.add_child(&a, "B", Side::Right).unwrap();
        let _ = session.begin_edit(&a);
        session.set_edit_text("   ");

        let update = press(&mut session, Key::Escape);
        assert!(update.persist);
        assert!(!session.tree.contains(&a));
        assert!(!session.tree.contains(&b));
        assert!(session.selection.contains(&NodeId::root()));
        assert!(session.editing().is_none());
    }

    #[test]
    fn blank_commit_on_root_restores_default_text() {
        let (mut session, _) = session_with_child();
        let _ = session.begin_edit(&NodeId::root());
        session.set_edit_text("");
        let _ = session.commit_edit();
        assert_eq!(session.tree.get(&NodeId::root()).unwrap().text, "Central Idea");
    }

    #[test]
    fn enter_while_editing_commits_then_adds_sibling() {
        let (mut session, a) = session_with_child();
        let _ = session.begin_edit(&a);
        session.set_edit_text("First");
        let _ = press(&mut session, Key::Enter);

        assert_eq!(session.tree.get(&a).unwrap().text, "First");
        let sibling = session.selection.get().cloned().unwrap();
        assert_ne!(sibling, a);
        assert_eq!(
            session.tree.get(&sibling).unwrap().parent_id,
            Some(NodeId::root())
        );
        assert!(session.is_editing(&sibling));
    }

    #[test]
    fn enter_on_root_adds_root_below() {
        let (mut session, _) = session_with_child();
        session.selection.select(NodeId::root());
        let _ = press(&mut session, Key::Enter);

        let created = session.selection.get().cloned().unwrap();
        let node = session.tree.get(&created).unwrap();
        assert!(node.is_root());
        assert_eq!(node.position(), Point::new(0.0, 80.0));
    }

    #[test]
    fn shift_enter_is_left_to_the_editor() {
        let (mut session, a) = session_with_child();
        let _ = session.begin_edit(&a);
        let shift = Modifiers {
            shift: true,
            ..Default::default()
        };
        let update = session.key_down(KeyEvent::with_modifiers(Key::Enter, shift));
        assert_eq!(update, SessionUpdate::NONE);
        assert!(session.is_editing(&a));
        assert_eq!(session.tree.len(), 2);
    }

    #[test]
    fn delete_selects_parent_and_guards_last_root() {
        let (mut session, a) = session_with_child();
        session.selection.select(a.clone());
        assert!(press(&mut session, Key::Delete).persist);
        assert!(!session.tree.contains(&a));
        assert!(session.selection.contains(&NodeId::root()));

        let update = press(&mut session, Key::Backspace);
        assert_eq!(update, SessionUpdate::NONE);
        assert_eq!(session.tree.len(), 1);
    }

    #[test]
    fn delete_is_text_editing_while_editing() {
        let (mut session, a) = session_with_child();
        let _ = session.begin_edit(&a);
        let _ = press(&mut session, Key::Delete);
        assert!(session.tree.contains(&a));
    }

    #[test]
    fn arrows_move_selection() {
        let (mut session, a) = session_with_child();
        session.selection.select(NodeId::root());
        let _ = press(&mut session, Key::ArrowRight);
        assert!(session.selection.contains(&a));
        let _ = press(&mut session, Key::ArrowLeft);
        assert!(session.selection.contains(&NodeId::root()));
        assert_eq!(press(&mut session, Key::ArrowUp), SessionUpdate::NONE);
    }

    #[test]
    fn f2_aborts_gesture_in_flight() {
        let (mut session, a) = session_with_child();
        session.selection.select(a.clone());
        let _ = session.pointer_down(
            Point::new(230.0, 10.0),
            crate::editing::input::PointerTarget::Node(a.clone()),
        );
        let _ = session.pointer_move(Point::new(300.0, 10.0));
        assert!(session.pointer_state().is_dragging());

        let _ = press(&mut session, Key::F2);
        assert!(session.pointer_state().is_idle());
        assert!(session.is_editing(&a));

        // The release that follows does nothing
        let update = session.pointer_up(Point::new(300.0, 10.0));
        assert_eq!(update, SessionUpdate::NONE);
    }

    /// Press on `a` and drag it far below its parent without releasing
    fn start_drag(session: &mut MapSession, a: &NodeId) {
        let _ = session.pointer_down(
            Point::new(230.0, 10.0),
            crate::editing::input::PointerTarget::Node(a.clone()),
        );
        let _ = session.pointer_move(Point::new(230.0, 300.0));
        assert!(session.pointer_state().is_dragging());
        assert_eq!(session.tree.get(a).unwrap().position(), Point::new(220.0, 290.0));
    }

    #[test]
    fn tab_during_drag_lays_out_new_child() {
        let (mut session, a) = session_with_child();
        session.selection.select(NodeId::root());
        start_drag(&mut session, &a);

        let update = press(&mut session, Key::Tab);
        assert!(update.persist);
        assert!(session.pointer_state().is_idle());

        let child = session.selection.get().cloned().unwrap();
        assert_eq!(session.tree.get(&child).unwrap().position(), Point::new(220.0, 35.0));
        // The abandoned drag snaps back into the column
        assert_eq!(session.tree.get(&a).unwrap().position(), Point::new(220.0, -35.0));
    }

    #[test]
    fn enter_during_drag_lays_out_new_sibling() {
        let (mut session, a) = session_with_child();
        session.selection.select(a.clone());
        start_drag(&mut session, &a);

        let _ = press(&mut session, Key::Enter);
        assert!(session.pointer_state().is_idle());

        let sibling = session.selection.get().cloned().unwrap();
        assert_ne!(sibling, a);
        assert_eq!(session.tree.get(&sibling).unwrap().position(), Point::new(220.0, 35.0));
        assert_eq!(session.tree.get(&a).unwrap().position(), Point::new(220.0, -35.0));
    }

    #[test]
    fn tab_on_blank_edit_adds_child_to_former_parent() {
        let (mut session, a) = session_with_child();
        let _ = session.begin_edit(&a);
        session.set_edit_text("");

        let update = press(&mut session, Key::Tab);
        assert!(update.persist);
        assert!(!session.tree.contains(&a));

        let child = session.selection.get().cloned().unwrap();
        assert_eq!(
            session.tree.get(&child).unwrap().parent_id,
            Some(NodeId::root())
        );
        assert!(session.is_editing(&child));
        assert_eq!(session.tree.len(), 2);
    }

    #[test]
    fn font_size_is_clamped() {
        let (mut session, a) = session_with_child();
        assert_eq!(session.change_font_size(2), SessionUpdate::NONE);

        session.selection.select(a.clone());
        for _ in 0..100 {
            let _ = session.change_font_size(2);
        }
        assert_eq!(session.tree.get(&a).unwrap().font_size, 100);
        for _ in 0..100 {
            let _ = session.change_font_size(-2);
        }
        assert_eq!(session.tree.get(&a).unwrap().font_size, 8);
    }

    #[test]
    fn reset_zoom_recenters() {
        let (mut session, _) = session_with_child();
        let _ = session.zoom_in();
        let _ = session.reset_zoom(Size::new(800.0, 600.0));
        assert_eq!(session.viewport.zoom, 1.0);
        assert_eq!(session.viewport.offset, Vec2::new(300.0, 300.0));
    }
}
