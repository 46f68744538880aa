use egui::{Pos2, Vec2};

use crate::config::{MAX_ZOOM, MIN_ZOOM};

/// Zoom and pan of the canvas view. Only affects how pointer positions map
/// onto the canvas, never what gets exported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: f32,
    pan: Vec2,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan: Vec2::ZERO,
        }
    }
}

impl Viewport {
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn pan(&self) -> Vec2 {
        self.pan
    }

    /// Sets the zoom, clamped to [`MIN_ZOOM`, `MAX_ZOOM`]; returns the value applied
    pub fn set_zoom(&mut self, zoom: f32) -> f32 {
        self.zoom = if zoom.is_nan() {
            1.0
        } else {
            zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        };
        self.zoom
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.pan += delta;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn screen_to_canvas(&self, screen: Pos2) -> Pos2 {
        ((screen.to_vec2() - self.pan) / self.zoom).to_pos2()
    }

    pub fn canvas_to_screen(&self, canvas: Pos2) -> Pos2 {
        (canvas.to_vec2() * self.zoom + self.pan).to_pos2()
    }
}
