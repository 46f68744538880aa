use std::fmt;

use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod common;
pub(crate) mod image;
pub(crate) mod shape;
pub(crate) mod stroke;
pub(crate) mod text;

pub(crate) use common::calculate_bounds;
pub use common::{Fill, MIN_ELEMENT_SIZE, Style, Transform};
pub use image::ImageData;
pub use shape::{DEFAULT_SHAPE_SIZE, Shape, ShapeKind};
pub use stroke::{BrushType, StrokeData};
pub use text::{DEFAULT_TEXT, MAX_FONT_SIZE, MIN_FONT_SIZE, TextData, TextStyle, clamp_font_size};

use crate::filter::Filter;

/// Session-unique object identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-variant payload of a drawing object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ObjectKind {
    Stroke(StrokeData),
    Shape(Shape),
    Text(TextData),
    Image(ImageData),
}

impl ObjectKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObjectKind::Stroke(_) => "stroke",
            ObjectKind::Shape(_) => "shape",
            ObjectKind::Text(_) => "text",
            ObjectKind::Image(_) => "image",
        }
    }
}

/// One visual object of the drawing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrawingObject {
    pub id: ObjectId,
    /// Layer the object was drawn on
    pub layer: Uuid,
    pub transform: Transform,
    pub style: Style,
    /// Applied in order to the object's unfiltered pixels at render time
    pub filters: Vec<Filter>,
    pub kind: ObjectKind,
}

impl DrawingObject {
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    /// Bounds in the object's own coordinate space, including outline width
    pub fn local_bounds(&self) -> Rect {
        match &self.kind {
            ObjectKind::Stroke(stroke) => stroke.local_bounds(self.style.stroke_width),
            ObjectKind::Shape(shape) => shape.local_bounds(self.style.stroke_width),
            ObjectKind::Text(text) => text.local_bounds(),
            ObjectKind::Image(image) => image.local_bounds(),
        }
    }

    /// Axis-aligned bounds on the canvas
    pub fn bounds(&self) -> Rect {
        self.transform.map_rect(self.local_bounds())
    }

    pub fn hit_test(&self, canvas_pos: Pos2) -> bool {
        let local = self.transform.invert(canvas_pos);
        match &self.kind {
            ObjectKind::Stroke(stroke) => stroke.hit_test(local, self.style.stroke_width),
            ObjectKind::Shape(shape) => shape.hit_test(local, self.style.stroke_width),
            ObjectKind::Text(text) => text.hit_test(local),
            ObjectKind::Image(image) => image.hit_test(local),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.transform.position += delta;
    }

    pub fn as_text(&self) -> Option<&TextData> {
        match &self.kind {
            ObjectKind::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// An object that has not been added to a document yet (no id, no layer)
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectDraft {
    pub transform: Transform,
    pub style: Style,
    pub filters: Vec<Filter>,
    pub kind: ObjectKind,
}

impl ObjectDraft {
    pub fn new(kind: ObjectKind, transform: Transform, style: Style) -> Self {
        Self {
            transform,
            style,
            filters: Vec::new(),
            kind,
        }
    }

    pub(crate) fn into_object(self, id: ObjectId, layer: Uuid) -> DrawingObject {
        DrawingObject {
            id,
            layer,
            transform: self.transform,
            style: self.style,
            filters: self.filters,
            kind: self.kind,
        }
    }
}

/// Partial update of an object; `None` fields are left alone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectPatch {
    pub position: Option<Pos2>,
    pub scale: Option<Vec2>,
    pub rotation: Option<f32>,
    pub stroke_color: Option<Color32>,
    pub fill: Option<Fill>,
    pub stroke_width: Option<f32>,

    // Text only
    pub content: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<f32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
}

impl ObjectPatch {
    pub fn touches_text(&self) -> bool {
        self.content.is_some()
            || self.font_family.is_some()
            || self.font_size.is_some()
            || self.bold.is_some()
            || self.italic.is_some()
            || self.underline.is_some()
    }
}

/// Factory functions for creating object drafts
pub mod factory {
    use super::*;

    /// Stroke from canvas-space points; the points are re-based so the
    /// transform carries the position
    pub fn stroke(points: Vec<Pos2>, brush: BrushType, color: Color32, width: f32) -> ObjectDraft {
        let mut data = StrokeData::new(points, brush);
        let offset = data.normalize();
        ObjectDraft::new(
            ObjectKind::Stroke(data),
            Transform::at(offset.to_pos2()),
            Style {
                stroke: color,
                fill: Fill::None,
                stroke_width: width,
            },
        )
    }

    pub fn shape(shape: Shape, top_left: Pos2, style: Style) -> ObjectDraft {
        ObjectDraft::new(ObjectKind::Shape(shape), Transform::at(top_left), style)
    }

    /// Text painted with `fill` (falls back to black when the fill is empty)
    pub fn text(content: impl Into<String>, style: TextStyle, top_left: Pos2, fill: Fill) -> ObjectDraft {
        let fill = if fill.is_none() {
            Fill::Solid(Color32::BLACK)
        } else {
            fill
        };
        ObjectDraft::new(
            ObjectKind::Text(TextData::new(content, style.clamped())),
            Transform::at(top_left),
            Style {
                stroke: Color32::TRANSPARENT,
                fill,
                stroke_width: 0.0,
            },
        )
    }

    pub fn image(bitmap: ::image::RgbaImage, top_left: Pos2) -> ObjectDraft {
        ObjectDraft::new(
            ObjectKind::Image(ImageData::new(bitmap)),
            Transform::at(top_left),
            Style {
                stroke: Color32::TRANSPARENT,
                fill: Fill::None,
                stroke_width: 0.0,
            },
        )
    }
}
