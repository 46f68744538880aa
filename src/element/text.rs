use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

use crate::renderer::text;

pub const DEFAULT_TEXT: &str = "Text";
pub const DEFAULT_FONT_SIZE: f32 = 32.0;
/// Font sizes are clamped into `[MIN_FONT_SIZE, MAX_FONT_SIZE]` pixels
pub const MIN_FONT_SIZE: f32 = 1.0;
pub const MAX_FONT_SIZE: f32 = 512.0;

/// Clamps a requested font size into the supported range; NaN falls back to the default
pub fn clamp_font_size(size: f32) -> f32 {
    if size.is_nan() {
        DEFAULT_FONT_SIZE
    } else {
        size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextStyle {
    pub font_family: String,
    pub font_size: f32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "sans-serif".to_owned(),
            font_size: DEFAULT_FONT_SIZE,
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

/// A text run; line breaks in `content` start new lines
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextData {
    pub content: String,
    pub style: TextStyle,
}

impl TextStyle {
    pub fn clamped(mut self) -> Self {
        self.font_size = clamp_font_size(self.font_size);
        self
    }
}

impl TextData {
    pub fn new(content: impl Into<String>, style: TextStyle) -> Self {
        Self {
            content: content.into(),
            style,
        }
    }

    pub fn local_bounds(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, text::measure(self))
    }

    pub fn hit_test(&self, local: Pos2) -> bool {
        self.local_bounds().contains(local)
    }
}
