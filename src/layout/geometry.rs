// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Geometry that depends on measured node sizes: connector curves, collapse
//! toggles and hit testing.
//!
//! Node boxes are anchored at their top-left corner `(x, y)`. Their size is
//! whatever the renderer measured after drawing, supplied through
//! [`NodeExtents`]; a node without a measured extent is skipped.

use super::visible_nodes;
use crate::model::{NodeId, Side, Tree};
use crate::settings;
use kurbo::{CubicBez, Point, Rect, Size};
use std::collections::HashMap;

/// Rendered size of each node, as measured by the drawing surface
pub trait NodeExtents {
    fn extent(&self, id: &NodeId) -> Option<Size>;
}

impl NodeExtents for HashMap<NodeId, Size> {
    fn extent(&self, id: &NodeId) -> Option<Size> {
        self.get(id).copied()
    }
}

/// A curve from a parent's edge to one of its children
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    pub parent: NodeId,
    pub child: NodeId,
    pub curve: CubicBez,
    /// The child is being dragged far enough away to detach on drop
    pub detaching: bool,
}

/// The collapse button drawn beside a node for one of its sides
#[derive(Debug, Clone, PartialEq)]
pub struct ToggleButton {
    pub node: NodeId,
    pub side: Side,
    pub center: Point,
    pub collapsed: bool,
}

impl ToggleButton {
    pub fn contains(&self, point: Point) -> bool {
        self.center.distance(point) <= settings::toggle::RADIUS
    }
}

fn node_rect(origin: Point, size: Size) -> Rect {
    Rect::from_origin_size(origin, size)
}

/// Connector curves for every visible child.
///
/// The curve leaves the parent from the edge facing the child and enters
/// the child from the edge facing the parent, both at mid-height, with
/// both control points on the vertical line halfway between.
pub fn connectors(
    tree: &Tree,
    extents: &impl NodeExtents,
    detaching: Option<&NodeId>,
) -> Vec<Connector> {
    let mut out = Vec::new();
    for child in visible_nodes(tree) {
        let Some(parent) = tree.parent(&child.id) else {
            continue;
        };
        let (Some(ps), Some(cs)) = (extents.extent(&parent.id), extents.extent(&child.id)) else {
            continue;
        };

        let (start, end) = if child.x >= parent.x {
            (
                Point::new(parent.x + ps.width, parent.y + ps.height / 2.0),
                Point::new(child.x, child.y + cs.height / 2.0),
            )
        } else {
            (
                Point::new(parent.x, parent.y + ps.height / 2.0),
                Point::new(child.x + cs.width, child.y + cs.height / 2.0),
            )
        };
        let mid_x = (start.x + end.x) / 2.0;
        let curve = CubicBez::new(
            start,
            Point::new(mid_x, start.y),
            Point::new(mid_x, end.y),
            end,
        );

        out.push(Connector {
            parent: parent.id.clone(),
            child: child.id.clone(),
            curve,
            detaching: detaching == Some(&child.id),
        });
    }
    out
}

/// Collapse toggles for every visible node that has children on a side
pub fn toggles(tree: &Tree, extents: &impl NodeExtents) -> Vec<ToggleButton> {
    let mut out = Vec::new();
    for node in visible_nodes(tree) {
        let Some(size) = extents.extent(&node.id) else {
            continue;
        };
        let mid_y = node.y + size.height / 2.0;
        for side in [Side::Left, Side::Right] {
            if tree.children_on(&node.id, side).next().is_none() {
                continue;
            }
            let x = match side {
                Side::Left => node.x - settings::toggle::OFFSET,
                Side::Right => node.x + size.width + settings::toggle::OFFSET,
            };
            out.push(ToggleButton {
                node: node.id.clone(),
                side,
                center: Point::new(x, mid_y),
                collapsed: node.is_collapsed(side),
            });
        }
    }
    out
}

/// Topmost visible node whose box contains `point`, skipping `exclude`.
///
/// Later nodes are drawn over earlier ones, so the search runs backwards.
pub fn node_at(
    tree: &Tree,
    extents: &impl NodeExtents,
    point: Point,
    exclude: Option<&NodeId>,
) -> Option<NodeId> {
    let visible: Vec<_> = visible_nodes(tree).collect();
    visible
        .into_iter()
        .rev()
        .filter(|n| exclude != Some(&n.id))
        .find(|n| {
            extents
                .extent(&n.id)
                .is_some_and(|size| node_rect(n.position(), size).contains(point))
        })
        .map(|n| n.id.clone())
}

/// The collapse toggle under `point`, if any
pub fn toggle_at(tree: &Tree, extents: &impl NodeExtents, point: Point) -> Option<(NodeId, Side)> {
    toggles(tree, extents)
        .into_iter()
        .find(|t| t.contains(point))
        .map(|t| (t.node, t.side))
}
