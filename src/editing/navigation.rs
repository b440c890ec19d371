// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Arrow-key navigation between visible nodes.
//!
//! Navigation is visual, not structural: the target is the nearest visible
//! node strictly in the arrow's direction, with a heavy penalty on offset
//! along the other axis so that "down" prefers the node straight below.

use crate::layout::visible_nodes;
use crate::model::{NodeId, Tree};
use crate::settings::interaction::NAVIGATION_OFF_AXIS_WEIGHT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    fn unit(self) -> (f64, f64) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }
}

/// Best visible node to move to from `from` in `direction`
pub fn find_target(tree: &Tree, from: &NodeId, direction: Direction) -> Option<NodeId> {
    let current = tree.get(from)?;
    let (dx, dy) = direction.unit();

    let mut best: Option<(f64, &NodeId)> = None;
    for candidate in visible_nodes(tree) {
        if candidate.id == *from {
            continue;
        }
        let off_x = candidate.x - current.x;
        let off_y = candidate.y - current.y;

        // Strictly in the requested direction
        let along = off_x * dx + off_y * dy;
        if along <= 0.0 {
            continue;
        }

        let across = if dx != 0.0 { off_y.abs() } else { off_x.abs() };
        let score = off_x * off_x + off_y * off_y + across * NAVIGATION_OFF_AXIS_WEIGHT;
        if best.is_none_or(|(s, _)| score < s) {
            best = Some((score, &candidate.id));
        }
    }
    best.map(|(_, id)| id.clone())
}
