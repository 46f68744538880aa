use egui::{Color32, Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

// Common constants for all element types
pub const MIN_ELEMENT_SIZE: f32 = 2.0;
pub const MIN_SCALE: f32 = 0.01;

/// Placement of an object on the canvas.
///
/// Object geometry is stored in local coordinates; a point is mapped to the
/// canvas by scaling, then rotating around the local origin, then moving by
/// `position`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Transform {
    pub position: Pos2,
    pub scale: Vec2,
    /// Rotation in degrees, clockwise in screen space (y points down)
    pub rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Pos2::ZERO,
            scale: Vec2::new(1.0, 1.0),
            rotation: 0.0,
        }
    }
}

impl Transform {
    pub fn at(position: Pos2) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn apply(&self, local: Pos2) -> Pos2 {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let x = local.x * self.scale.x;
        let y = local.y * self.scale.y;
        Pos2::new(
            self.position.x + x * cos - y * sin,
            self.position.y + x * sin + y * cos,
        )
    }

    /// Maps a canvas point back into local coordinates
    pub fn invert(&self, canvas: Pos2) -> Pos2 {
        let (sin, cos) = self.rotation.to_radians().sin_cos();
        let dx = canvas.x - self.position.x;
        let dy = canvas.y - self.position.y;
        let x = dx * cos + dy * sin;
        let y = -dx * sin + dy * cos;
        Pos2::new(
            x / self.scale.x.abs().max(MIN_SCALE) * self.scale.x.signum(),
            y / self.scale.y.abs().max(MIN_SCALE) * self.scale.y.signum(),
        )
    }

    /// Equivalent tiny-skia transform
    pub fn to_skia(&self) -> tiny_skia::Transform {
        tiny_skia::Transform::from_translate(self.position.x, self.position.y)
            .pre_concat(tiny_skia::Transform::from_rotate(self.rotation))
            .pre_concat(tiny_skia::Transform::from_scale(self.scale.x, self.scale.y))
    }

    /// Axis-aligned canvas bounds of a local rectangle under this transform
    pub fn map_rect(&self, local: Rect) -> Rect {
        if local == Rect::NOTHING {
            return Rect::NOTHING;
        }
        let corners = [
            local.left_top(),
            local.right_top(),
            local.left_bottom(),
            local.right_bottom(),
        ]
        .map(|corner| self.apply(corner));
        calculate_bounds(&corners, 0.0)
    }
}

/// How the inside of a closed shape (or a text run) is painted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub enum Fill {
    #[default]
    None,
    Solid(Color32),
    /// Left-to-right gradient across the object's local bounds
    LinearGradient { start: Color32, end: Color32 },
}

impl Fill {
    pub fn is_none(&self) -> bool {
        matches!(self, Fill::None)
    }

    /// A single representative color, used where a gradient cannot apply
    pub fn primary_color(&self) -> Option<Color32> {
        match self {
            Fill::None => None,
            Fill::Solid(color) => Some(*color),
            Fill::LinearGradient { start, .. } => Some(*start),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Style {
    pub stroke: Color32,
    pub fill: Fill,
    pub stroke_width: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            stroke: Color32::BLACK,
            fill: Fill::None,
            stroke_width: 2.0,
        }
    }
}

/// Calculate the bounding box for a set of points
pub(crate) fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}

/// Calculate distance from a point to a line segment (useful for stroke hit testing)
pub(crate) fn distance_to_line_segment(point: Pos2, line_start: Pos2, line_end: Pos2) -> f32 {
    let line_vec = line_end - line_start;
    let point_vec = point - line_start;

    let line_len = line_vec.length();
    if line_len == 0.0 {
        return point_vec.length();
    }

    let t = ((point_vec.x * line_vec.x + point_vec.y * line_vec.y) / line_len).clamp(0.0, line_len);
    let projection = line_start + (line_vec * t / line_len);
    (point - projection).length()
}
