// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer handling for MapSession

use super::{MapSession, SessionUpdate};
use crate::editing::drop::apply_drop;
use crate::editing::input::PointerTarget;
use crate::editing::pointer::{DragSubject, Gesture, PointerEffect, PointerEvent};
use crate::model::{NodeId, Side};
use crate::settings;
use kurbo::Point;

impl MapSession {
    /// Pointer button pressed at a screen position over `target`
    pub fn pointer_down(&mut self, position: Point, target: PointerTarget) -> SessionUpdate {
        if let PointerTarget::Node(id) = &target
            && self.is_editing(id)
        {
            // Text selection wins over dragging inside the editor
            return SessionUpdate::NONE;
        }
        // Pressing anywhere else ends the edit
        let update = self.commit_edit();

        let gesture = match target {
            PointerTarget::Toggle(id, side) => return update.merge(self.toggle_side(&id, side)),
            PointerTarget::Node(id) => match self.tree.get(&id) {
                Some(node) => Gesture::Node(DragSubject {
                    origin: node.position(),
                    parent: node.parent_id.clone(),
                    id,
                }),
                None => return update,
            },
            PointerTarget::Background => Gesture::Pan,
        };
        update.merge(self.dispatch(PointerEvent::Down { position, gesture }))
    }

    pub fn pointer_move(&mut self, position: Point) -> SessionUpdate {
        self.dispatch(PointerEvent::Move { position })
    }

    pub fn pointer_up(&mut self, position: Point) -> SessionUpdate {
        self.dispatch(PointerEvent::Up { position })
    }

    /// Double click: edit a node, or create a new root on empty canvas
    pub fn double_click(&mut self, position: Point, target: PointerTarget) -> SessionUpdate {
        match target {
            PointerTarget::Node(id) => self.begin_edit(&id),
            PointerTarget::Background => {
                let at = self.viewport.screen_to_document(position);
                let id = self.tree.add_root(settings::node::NEW_MAP_TEXT, at);
                tracing::debug!("New root {} at ({:.1}, {:.1})", id, at.x, at.y);
                self.relayout();
                SessionUpdate::CHANGED.merge(self.begin_edit(&id))
            }
            PointerTarget::Toggle(..) => SessionUpdate::NONE,
        }
    }

    /// Mouse wheel zoom
    pub fn wheel(&mut self, delta_y: f64) -> SessionUpdate {
        if self.viewport.wheel(delta_y) {
            SessionUpdate::REDRAW
        } else {
            SessionUpdate::NONE
        }
    }

    /// Flip the collapse state of one side of `id` and relayout
    pub fn toggle_side(&mut self, id: &NodeId, side: Side) -> SessionUpdate {
        match self.tree.toggle_collapsed(id, side) {
            Some(collapsed) => {
                tracing::debug!("{} {:?} side collapsed: {}", id, side, collapsed);
                self.relayout();
                SessionUpdate::CHANGED
            }
            None => SessionUpdate::NONE,
        }
    }

    /// Run one event through the gesture machine and apply its effects
    pub(super) fn dispatch(&mut self, event: PointerEvent) -> SessionUpdate {
        let state = std::mem::take(&mut self.pointer);
        let (next, effects) = state.next(event, &*self);
        self.pointer = next;

        effects
            .into_iter()
            .fold(SessionUpdate::NONE, |update, effect| {
                update.merge(self.apply_effect(effect))
            })
    }

    fn apply_effect(&mut self, effect: PointerEffect) -> SessionUpdate {
        match effect {
            PointerEffect::ClearSelection => {
                if self.selection.is_empty() {
                    SessionUpdate::NONE
                } else {
                    self.selection.clear();
                    SessionUpdate::REDRAW
                }
            }
            PointerEffect::Select(id) => {
                self.selection.select(id);
                SessionUpdate::REDRAW
            }
            PointerEffect::EndTextEdit => self.commit_edit(),
            PointerEffect::Pan(delta) => {
                self.viewport.pan_by(delta);
                SessionUpdate::REDRAW
            }
            PointerEffect::MoveNode { id, position } => match self.tree.get_mut(&id) {
                Some(node) => {
                    node.set_position(position);
                    SessionUpdate::REDRAW
                }
                None => SessionUpdate::NONE,
            },
            PointerEffect::Drop { subject, candidate } => {
                let outcome = apply_drop(&mut self.tree, &subject, candidate.as_ref());
                if outcome.is_structural() {
                    tracing::info!("Node {} dropped: {:?}", subject.id, outcome);
                }
                self.relayout();
                SessionUpdate::CHANGED
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::session_with_child;
    use super::*;
    use crate::model::Tree;
    use kurbo::{Size, Vec2};

    #[test]
    fn click_on_node_selects_without_moving() {
        let (mut session, a) = session_with_child();
        let before = session.tree.clone();

        let _ = session.pointer_down(Point::new(230.0, 10.0), PointerTarget::Node(a.clone()));
        let _ = session.pointer_move(Point::new(232.0, 12.0));
        let update = session.pointer_up(Point::new(232.0, 12.0));

        assert!(session.selection.contains(&a));
        assert_eq!(session.tree, before);
        assert!(!update.persist);
    }

    #[test]
    fn background_down_clears_selection() {
        let (mut session, a) = session_with_child();
        session.selection.select(a);
        let update = session.pointer_down(Point::new(500.0, 500.0), PointerTarget::Background);
        assert!(session.selection.is_empty());
        assert!(update.redraw);
    }

    #[test]
    fn far_drag_into_empty_space_detaches() {
        let (mut session, a) = session_with_child();
        let _ = session.pointer_down(Point::new(230.0, 10.0), PointerTarget::Node(a.clone()));
        let _ = session.pointer_move(Point::new(230.0, 400.0));

        assert_eq!(session.detaching_node(), Some(&a));
        assert!(session.connectors().iter().any(|c| c.detaching));

        let update = session.pointer_up(Point::new(230.0, 400.0));
        assert!(update.persist);
        let node = session.tree.get(&a).unwrap();
        assert!(node.is_root());
        // Roots keep their dropped position through layout
        assert_eq!(node.position(), Point::new(220.0, 390.0));
        assert_eq!(session.detaching_node(), None);
    }

    #[test]
    fn short_drag_snaps_back() {
        let (mut session, a) = session_with_child();
        let _ = session.pointer_down(Point::new(230.0, 10.0), PointerTarget::Node(a.clone()));
        let _ = session.pointer_move(Point::new(130.0, 50.0));
        assert_eq!(session.tree.get(&a).unwrap().position(), Point::new(120.0, 40.0));
        assert_eq!(session.detaching_node(), None);

        let _ = session.pointer_up(Point::new(130.0, 50.0));
        let node = session.tree.get(&a).unwrap();
        assert_eq!(node.parent_id, Some(NodeId::root()));
        assert_eq!(node.position(), Point::new(220.0, 0.0));
    }

    #[test]
    fn drop_on_sibling_reparents() {
        let mut tree = Tree::with_root("Root");
        let root = NodeId::root();
        let a = tree.add_child(&root, "A", Side::Right).unwrap();
        let b = tree.add_child(&root, "B", Side::Right).unwrap();
        let mut session = MapSession::new(tree);
        for id in [&root, &a, &b] {
            session.set_extent(id.clone(), Size::new(100.0, 30.0));
        }
        // a at (220, -35), b at (220, 35)
        let _ = session.pointer_down(Point::new(230.0, 45.0), PointerTarget::Node(b.clone()));
        let _ = session.pointer_move(Point::new(240.0, -25.0));
        assert_eq!(session.drop_target(), Some(&a));

        let update = session.pointer_up(Point::new(240.0, -25.0));
        assert!(update.persist);
        let node = session.tree.get(&b).unwrap();
        assert_eq!(node.parent_id.as_ref(), Some(&a));
        assert_eq!(node.side, Side::Right);
        assert_eq!(node.position(), Point::new(440.0, 0.0));
    }

    #[test]
    fn pan_moves_viewport_only() {
        let (mut session, a) = session_with_child();
        session.viewport.zoom = 2.0;
        let _ = session.pointer_down(Point::new(500.0, 500.0), PointerTarget::Background);
        let _ = session.pointer_move(Point::new(510.0, 520.0));
        let _ = session.pointer_up(Point::new(510.0, 520.0));

        assert_eq!(session.viewport.offset, Vec2::new(10.0, 20.0));
        assert_eq!(session.tree.get(&a).unwrap().position(), Point::new(220.0, 0.0));
    }

    #[test]
    fn toggle_collapses_without_gesture() {
        let (mut session, a) = session_with_child();
        let update =
            session.pointer_down(Point::new(114.0, 15.0), PointerTarget::Toggle(NodeId::root(), Side::Right));
        assert!(update.persist);
        assert!(session.pointer_state().is_idle());
        assert!(!crate::layout::is_visible(&session.tree, &a));
        assert!(session.connectors().is_empty());
    }

    #[test]
    fn background_double_click_creates_root_in_document_space() {
        let (mut session, _) = session_with_child();
        session.viewport.zoom = 2.0;
        session.viewport.offset = Vec2::new(100.0, 0.0);

        let update = session.double_click(Point::new(300.0, 100.0), PointerTarget::Background);
        assert!(update.persist);
        let id = session.selection.get().cloned().unwrap();
        let node = session.tree.get(&id).unwrap();
        assert!(node.is_root());
        assert_eq!(node.text, "New Idea");
        assert_eq!(node.position(), Point::new(100.0, 50.0));
        assert!(session.is_editing(&id));
    }

    #[test]
    fn pressing_inside_the_editor_does_not_drag() {
        let (mut session, a) = session_with_child();
        let _ = session.double_click(Point::new(230.0, 10.0), PointerTarget::Node(a.clone()));
        let _ = session.pointer_down(Point::new(230.0, 10.0), PointerTarget::Node(a.clone()));
        let _ = session.pointer_move(Point::new(300.0, 300.0));

        assert!(session.pointer_state().is_idle());
        assert!(session.is_editing(&a));
        assert_eq!(session.tree.get(&a).unwrap().position(), Point::new(220.0, 0.0));
    }

    #[test]
    fn pressing_elsewhere_commits_the_edit() {
        let (mut session, a) = session_with_child();
        let _ = session.begin_edit(&a);
        session.set_edit_text("Renamed");
        let update = session.pointer_down(Point::new(10.0, 10.0), PointerTarget::Node(NodeId::root()));

        assert!(update.persist);
        assert!(session.editing().is_none());
        assert_eq!(session.tree.get(&a).unwrap().text, "Renamed");
    }

    #[test]
    fn wheel_zooms() {
        let (mut session, _) = session_with_child();
        assert!(session.wheel(-120.0).redraw);
        assert!((session.viewport.zoom - 1.1).abs() < 1e-9);
    }
}
