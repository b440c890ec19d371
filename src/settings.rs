// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Application settings and configuration constants.
//!
//! The constants here fix the geometry of the automatic layout and the
//! thresholds the pointer state machine uses to tell clicks from drags.
//! `Preferences` holds the few values a user may override from a TOML file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ============================================================================
// LAYOUT SETTINGS
// ============================================================================
/// Height of a node with no visible children (document units)
const LEAF_HEIGHT: f64 = 50.0;

/// Vertical gap between sibling subtrees
const SIBLING_GAP: f64 = 20.0;

/// Horizontal distance from a parent to its children
const HORIZONTAL_STEP: f64 = 220.0;

/// Offset of a new root created with Enter on another root
const NEW_ROOT_OFFSET_Y: f64 = 80.0;

// ============================================================================
// INTERACTION SETTINGS
// ============================================================================
/// Pointer movement (screen px) below which a gesture stays a click
const DRAG_THRESHOLD: f64 = 5.0;

/// Drop distance from the old parent beyond which a node detaches
const DETACH_DISTANCE: f64 = 150.0;

/// Weight against off-axis offset when navigating with arrow keys
const NAVIGATION_OFF_AXIS_WEIGHT: f64 = 1000.0;

// ============================================================================
// VIEWPORT SETTINGS
// ============================================================================
/// Lower zoom bound (exclusive)
const MIN_ZOOM: f64 = 0.2;

/// Upper zoom bound (exclusive)
const MAX_ZOOM: f64 = 4.0;

/// Additive zoom step for buttons and the scroll wheel
const ZOOM_STEP: f64 = 0.1;

/// Horizontal bias applied when centering the map in the viewport
const CENTER_BIAS_X: f64 = 100.0;

// ============================================================================
// NODE SETTINGS
// ============================================================================
const DEFAULT_FONT_SIZE: u32 = 14;
const MIN_FONT_SIZE: u32 = 8;
const MAX_FONT_SIZE: u32 = 100;

const NEW_MAP_TEXT: &str = "New Idea";
const EMPTY_ROOT_TEXT: &str = "Central Idea";

// ============================================================================
// COLLAPSE TOGGLE SETTINGS
// ============================================================================
/// Distance of the toggle center from the node edge
const TOGGLE_OFFSET: f64 = 14.0;

/// Toggle radius, also used for hit testing
const TOGGLE_RADIUS: f64 = 6.0;

// ============================================================================
// PUBLIC API - Don't edit below this line unless you know what you're doing
// ============================================================================

/// Automatic layout geometry
pub mod layout {
    pub const LEAF_HEIGHT: f64 = super::LEAF_HEIGHT;
    pub const SIBLING_GAP: f64 = super::SIBLING_GAP;
    pub const HORIZONTAL_STEP: f64 = super::HORIZONTAL_STEP;
    pub const NEW_ROOT_OFFSET_Y: f64 = super::NEW_ROOT_OFFSET_Y;
}

/// Gesture thresholds
pub mod interaction {
    /// Click/drag threshold in screen pixels
    pub const DRAG_THRESHOLD: f64 = super::DRAG_THRESHOLD;

    /// Detach threshold in document units
    pub const DETACH_DISTANCE: f64 = super::DETACH_DISTANCE;

    pub const NAVIGATION_OFF_AXIS_WEIGHT: f64 = super::NAVIGATION_OFF_AXIS_WEIGHT;
}

/// Viewport (zoom, pan) settings
pub mod viewport {
    /// Minimum zoom level (exclusive bound)
    pub const MIN_ZOOM: f64 = super::MIN_ZOOM;

    /// Maximum zoom level (exclusive bound)
    pub const MAX_ZOOM: f64 = super::MAX_ZOOM;

    pub const ZOOM_STEP: f64 = super::ZOOM_STEP;
    pub const CENTER_BIAS_X: f64 = super::CENTER_BIAS_X;
}

/// Node text and font defaults
pub mod node {
    pub const DEFAULT_FONT_SIZE: u32 = super::DEFAULT_FONT_SIZE;
    pub const MIN_FONT_SIZE: u32 = super::MIN_FONT_SIZE;
    pub const MAX_FONT_SIZE: u32 = super::MAX_FONT_SIZE;

    /// Text of the root of a freshly created map
    pub const NEW_MAP_TEXT: &str = super::NEW_MAP_TEXT;

    /// Replacement text when a root is committed empty
    pub const EMPTY_ROOT_TEXT: &str = super::EMPTY_ROOT_TEXT;
}

/// Collapse toggle placement
pub mod toggle {
    pub const OFFSET: f64 = super::TOGGLE_OFFSET;
    pub const RADIUS: f64 = super::TOGGLE_RADIUS;
}

// ============================================================================
// USER PREFERENCES
// ============================================================================

/// User-overridable preferences, read from a TOML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Where the map archive is stored
    pub store_path: PathBuf,
    /// Size of the viewport the map is centered in
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("mindmaps.json"),
            viewport_width: 1280.0,
            viewport_height: 800.0,
        }
    }
}

impl Preferences {
    /// Load preferences from a TOML file, falling back to defaults if the
    /// file does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No preferences at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read preferences: {}", path.display()))?;
        let prefs = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse preferences: {}", path.display()))?;
        Ok(prefs)
    }
}
