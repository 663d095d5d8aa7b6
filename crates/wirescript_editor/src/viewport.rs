// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canvas pan/zoom state.

use serde::{Deserialize, Serialize};
use wirescript_graph::Position;

/// Minimum zoom factor
pub const MIN_ZOOM: f32 = 0.25;

/// Maximum zoom factor
pub const MAX_ZOOM: f32 = 0.75;

/// Pan/zoom of the canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Canvas-space point under the view origin
    pub pan: Position,
    /// Zoom factor, always within `[MIN_ZOOM, MAX_ZOOM]`
    zoom: f32,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self {
            pan: Position::default(),
            zoom: 0.5,
        }
    }
}

impl ViewportState {
    /// Current zoom factor
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Set the zoom factor, clamped to `[MIN_ZOOM, MAX_ZOOM]`
    pub fn set_zoom(&mut self, zoom: f32) {
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// Multiply the zoom factor, clamped the same way
    pub fn zoom_by(&mut self, factor: f32) {
        self.set_zoom(self.zoom * factor);
    }
}
