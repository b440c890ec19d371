// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer gesture state machine.
//!
//! One pointer stream (down, moves, up) becomes exactly one of: a click
//! that selects a node, a canvas pan, or a node drag that ends in a drop.
//! Until the pointer has moved [`DRAG_THRESHOLD`] screen pixels from where
//! it went down the gesture is still a potential click.
//!
//! The machine is a pure transition function: [`PointerState::next`] takes
//! the current state and an event and returns the new state plus a list of
//! effects for the session to apply. It never touches the tree itself; the
//! two things it needs from the outside world (zoom and drop-target hit
//! testing) come through [`DragEnv`].

use crate::model::NodeId;
use crate::settings::interaction::DRAG_THRESHOLD;
use kurbo::{Point, Vec2};

/// Snapshot of a node taken when a drag gesture starts
#[derive(Debug, Clone, PartialEq)]
pub struct DragSubject {
    pub id: NodeId,
    /// Position before the drag, in document coordinates
    pub origin: Point,
    /// Parent before the drag
    pub parent: Option<NodeId>,
}

/// What a pointer-down started
#[derive(Debug, Clone, PartialEq)]
pub enum Gesture {
    /// Background: pans the canvas once it becomes a drag
    Pan,
    /// A node: selects on click, moves on drag
    Node(DragSubject),
}

/// Where the machine is in the current gesture
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PointerState {
    #[default]
    Idle,
    /// Pointer is down but has not crossed the drag threshold
    Pending { gesture: Gesture, anchor: Point },
    /// Threshold crossed
    ///
    /// For pans `anchor` follows the pointer; for node drags it stays where
    /// the pointer went down.
    Dragging {
        gesture: Gesture,
        anchor: Point,
        drop_candidate: Option<NodeId>,
    },
}

/// Input to the state machine, in screen coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEvent {
    Down { position: Point, gesture: Gesture },
    Move { position: Point },
    Up { position: Point },
    /// Abort whatever is in flight (entering text edit)
    Reset,
}

/// What the session must do as a result of a transition
#[derive(Debug, Clone, PartialEq)]
pub enum PointerEffect {
    ClearSelection,
    Select(NodeId),
    /// Leave text-edit mode before a node starts moving
    EndTextEdit,
    /// Translate the viewport by a screen-space delta
    Pan(Vec2),
    /// Put the dragged node at a document position
    MoveNode { id: NodeId, position: Point },
    /// The drag ended; resolve reparent / detach
    Drop {
        subject: DragSubject,
        candidate: Option<NodeId>,
    },
}

/// Queries the machine needs while a node is being dragged
pub trait DragEnv {
    /// Current zoom factor of the viewport
    fn zoom(&self) -> f64;

    /// Topmost node under the screen position, other than `subject`
    fn drop_candidate(&self, screen: Point, subject: &NodeId) -> Option<NodeId>;
}

impl PointerState {
    /// The node being dragged, once the threshold has been crossed
    pub fn dragged(&self) -> Option<&DragSubject> {
        match self {
            PointerState::Dragging {
                gesture: Gesture::Node(subject),
                ..
            } => Some(subject),
            _ => None,
        }
    }

    /// Current drop target of a node drag
    pub fn drop_candidate(&self) -> Option<&NodeId> {
        match self {
            PointerState::Dragging { drop_candidate, .. } => drop_candidate.as_ref(),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, PointerState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, PointerState::Dragging { .. })
    }

    /// Advance the machine by one event
    pub fn next(self, event: PointerEvent, env: &impl DragEnv) -> (PointerState, Vec<PointerEffect>) {
        match (self, event) {
            (_, PointerEvent::Reset) => (PointerState::Idle, Vec::new()),

            // A stray down while a gesture is open starts over.
            (_, PointerEvent::Down { position, gesture }) => {
                let effects = match gesture {
                    Gesture::Pan => vec![PointerEffect::ClearSelection],
                    Gesture::Node(_) => Vec::new(),
                };
                let state = PointerState::Pending {
                    gesture,
                    anchor: position,
                };
                (state, effects)
            }

            (PointerState::Idle, PointerEvent::Move { .. } | PointerEvent::Up { .. }) => {
                (PointerState::Idle, Vec::new())
            }

            (PointerState::Pending { gesture, anchor }, PointerEvent::Move { position }) => {
                if anchor.distance(position) < DRAG_THRESHOLD {
                    return (PointerState::Pending { gesture, anchor }, Vec::new());
                }
                let mut effects = Vec::new();
                if matches!(gesture, Gesture::Node(_)) {
                    effects.push(PointerEffect::EndTextEdit);
                }
                let (state, more) = drag_move(gesture, anchor, position, env);
                effects.extend(more);
                (state, effects)
            }

            (
                PointerState::Dragging {
                    gesture, anchor, ..
                },
                PointerEvent::Move { position },
            ) => drag_move(gesture, anchor, position, env),

            (PointerState::Pending { gesture, .. }, PointerEvent::Up { .. }) => {
                let effects = match gesture {
                    Gesture::Node(subject) => vec![PointerEffect::Select(subject.id)],
                    Gesture::Pan => Vec::new(),
                };
                (PointerState::Idle, effects)
            }

            (
                PointerState::Dragging {
                    gesture,
                    drop_candidate,
                    ..
                },
                PointerEvent::Up { .. },
            ) => {
                let effects = match gesture {
                    Gesture::Node(subject) => vec![PointerEffect::Drop {
                        subject,
                        candidate: drop_candidate,
                    }],
                    Gesture::Pan => Vec::new(),
                };
                (PointerState::Idle, effects)
            }
        }
    }
}

/// One move of an active drag
fn drag_move(
    gesture: Gesture,
    anchor: Point,
    position: Point,
    env: &impl DragEnv,
) -> (PointerState, Vec<PointerEffect>) {
    match gesture {
        Gesture::Pan => {
            let delta = position - anchor;
            let state = PointerState::Dragging {
                gesture: Gesture::Pan,
                anchor: position,
                drop_candidate: None,
            };
            (state, vec![PointerEffect::Pan(delta)])
        }
        Gesture::Node(subject) => {
            let zoom = env.zoom();
            let offset = (position - anchor) / zoom;
            let target = subject.origin + offset;
            let candidate = env.drop_candidate(position, &subject.id);
            let effects = vec![PointerEffect::MoveNode {
                id: subject.id.clone(),
                position: target,
            }];
            let state = PointerState::Dragging {
                gesture: Gesture::Node(subject),
                anchor,
                drop_candidate: candidate,
            };
            (state, effects)
        }
    }
}
