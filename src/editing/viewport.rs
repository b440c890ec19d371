// Copyright 2025 the Runebender Xilem Authors
// SPDX-License-Identifier: Apache-2.0

//! Viewport: the camera over the map.
//!
//! `document = (screen - offset) / zoom`. Zoom changes never recenter on
//! the cursor, and nothing ties the offset to node positions.

use crate::settings;
use kurbo::{Affine, Point, Size, Vec2};

/// Pan offset and zoom of the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewPort {
    /// Scale factor, kept inside the open zoom interval
    pub zoom: f64,
    /// Screen-space translation
    pub offset: Vec2,
}

impl Default for ViewPort {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewPort {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            offset: Vec2::ZERO,
        }
    }

    pub fn screen_to_document(&self, screen: Point) -> Point {
        ((screen.to_vec2() - self.offset) / self.zoom).to_point()
    }

    pub fn document_to_screen(&self, document: Point) -> Point {
        (document.to_vec2() * self.zoom + self.offset).to_point()
    }

    /// Transform for the renderer: document to screen
    pub fn affine(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Change zoom by `delta`; ignored if the result would leave the
    /// allowed interval. Returns whether the zoom changed.
    pub fn zoom_by(&mut self, delta: f64) -> bool {
        let zoom = self.zoom + delta;
        if zoom > settings::viewport::MIN_ZOOM && zoom < settings::viewport::MAX_ZOOM {
            self.zoom = zoom;
            true
        } else {
            false
        }
    }

    pub fn zoom_in(&mut self) -> bool {
        self.zoom_by(settings::viewport::ZOOM_STEP)
    }

    pub fn zoom_out(&mut self) -> bool {
        self.zoom_by(-settings::viewport::ZOOM_STEP)
    }

    /// Wheel zoom: scrolling up (negative delta) zooms in
    pub fn wheel(&mut self, delta_y: f64) -> bool {
        if delta_y < 0.0 {
            self.zoom_in()
        } else if delta_y > 0.0 {
            self.zoom_out()
        } else {
            false
        }
    }

    /// Put the document origin near the middle of a viewport of `size`
    pub fn center(&mut self, size: Size) {
        self.offset = Vec2::new(
            size.width / 2.0 - settings::viewport::CENTER_BIAS_X,
            size.height / 2.0,
        );
    }

    /// Back to 100% and centered
    pub fn reset(&mut self, size: Size) {
        self.zoom = 1.0;
        self.center(size);
    }
}
