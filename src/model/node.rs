// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! The node record, the unit of a mind map.

use super::node_id::NodeId;
use crate::settings;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Which half-plane of its parent a node grows into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    #[default]
    Right,
}

impl Side {
    /// Sign of the horizontal offset from the parent
    pub fn sign(self) -> f64 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// A single node of the map
///
/// The field names match the archived JSON shape (`parentId`,
/// `collapsedLeft`, `fontSize`, ...). Everything but `id` has a default so
/// that hand-written or older documents import cleanly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub text: String,
    /// Non-owning back-reference; `None` marks a root
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    /// Only meaningful for non-root nodes
    #[serde(default)]
    pub side: Side,
    #[serde(default)]
    pub collapsed_left: bool,
    #[serde(default)]
    pub collapsed_right: bool,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default = "default_font_size", deserialize_with = "font_size::deserialize")]
    pub font_size: u32,
}

fn default_font_size() -> u32 {
    settings::node::DEFAULT_FONT_SIZE
}

impl Node {
    /// Create a node at the origin
    pub fn new(text: impl Into<String>, parent_id: Option<NodeId>, side: Side) -> Self {
        Self {
            id: NodeId::next(),
            text: text.into(),
            parent_id,
            side,
            collapsed_left: false,
            collapsed_right: false,
            x: 0.0,
            y: 0.0,
            font_size: settings::node::DEFAULT_FONT_SIZE,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, pos: Point) {
        self.x = pos.x;
        self.y = pos.y;
    }

    /// Collapse flag for the children on `side`
    pub fn is_collapsed(&self, side: Side) -> bool {
        match side {
            Side::Left => self.collapsed_left,
            Side::Right => self.collapsed_right,
        }
    }

    pub fn set_collapsed(&mut self, side: Side, collapsed: bool) {
        match side {
            Side::Left => self.collapsed_left = collapsed,
            Side::Right => self.collapsed_right = collapsed,
        }
    }
}

/// Font sizes arrive as numbers, numeric strings, `0` or `null` in older
/// documents; anything unusable becomes the default size.
mod font_size {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
        Missing(Option<()>),
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<u32, D::Error> {
        let size = match Raw::deserialize(de)? {
            Raw::Number(n) => n,
            Raw::Text(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            Raw::Missing(_) => 0.0,
        };
        if size.is_finite() && size >= 1.0 {
            Ok(size as u32)
        } else {
            Ok(super::default_font_size())
        }
    }
}
