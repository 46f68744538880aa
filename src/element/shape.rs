use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::element::common::{self, MIN_ELEMENT_SIZE};

pub const DEFAULT_SHAPE_SIZE: f32 = 100.0;

/// Which primitive a shape tool places
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ShapeKind {
    Rect,
    Circle,
    Triangle,
}

/// Closed primitive shapes, sized in local coordinates with the bounding box
/// starting at the local origin
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Shape {
    Rect { width: f32, height: f32 },
    Circle { radius: f32 },
    /// Isosceles triangle, apex at the top center
    Triangle { width: f32, height: f32 },
}

impl Shape {
    /// Shape of the default size, as placed by a click without drag
    pub fn default_of(kind: ShapeKind) -> Self {
        Self::from_drag(kind, Vec2::ZERO)
    }

    /// Shape spanning a drag of `extent`; tiny drags fall back to the default size
    pub fn from_drag(kind: ShapeKind, extent: Vec2) -> Self {
        let w = extent.x.abs();
        let h = extent.y.abs();
        let dragged = w >= MIN_ELEMENT_SIZE || h >= MIN_ELEMENT_SIZE;
        let (w, h) = if dragged {
            (w.max(MIN_ELEMENT_SIZE), h.max(MIN_ELEMENT_SIZE))
        } else {
            (DEFAULT_SHAPE_SIZE, DEFAULT_SHAPE_SIZE)
        };
        match kind {
            ShapeKind::Rect => Shape::Rect { width: w, height: h },
            ShapeKind::Circle => Shape::Circle {
                radius: w.max(h) / 2.0,
            },
            ShapeKind::Triangle => Shape::Triangle { width: w, height: h },
        }
    }

    pub fn kind(&self) -> ShapeKind {
        match self {
            Shape::Rect { .. } => ShapeKind::Rect,
            Shape::Circle { .. } => ShapeKind::Circle,
            Shape::Triangle { .. } => ShapeKind::Triangle,
        }
    }

    pub fn size(&self) -> Vec2 {
        match *self {
            Shape::Rect { width, height } | Shape::Triangle { width, height } => {
                Vec2::new(width, height)
            }
            Shape::Circle { radius } => Vec2::splat(radius * 2.0),
        }
    }

    pub fn local_bounds(&self, stroke_width: f32) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.size()).expand(stroke_width / 2.0)
    }

    /// Triangle corners in local coordinates
    pub fn triangle_points(width: f32, height: f32) -> [Pos2; 3] {
        [
            Pos2::new(width / 2.0, 0.0),
            Pos2::new(width, height),
            Pos2::new(0.0, height),
        ]
    }

    pub fn hit_test(&self, local: Pos2, stroke_width: f32) -> bool {
        let slack = stroke_width / 2.0;
        match *self {
            Shape::Rect { .. } => self.local_bounds(stroke_width).contains(local),
            Shape::Circle { radius } => {
                (local - Pos2::new(radius, radius)).length() <= radius + slack
            }
            Shape::Triangle { width, height } => {
                let [a, b, c] = Self::triangle_points(width, height);
                if point_in_triangle(local, a, b, c) {
                    return true;
                }
                // Thick outlines extend past the edges.
                [(a, b), (b, c), (c, a)]
                    .iter()
                    .any(|(s, e)| common::distance_to_line_segment(local, *s, *e) <= slack)
            }
        }
    }
}

fn point_in_triangle(p: Pos2, a: Pos2, b: Pos2, c: Pos2) -> bool {
    let cross = |o: Pos2, u: Pos2, v: Pos2| (u.x - o.x) * (v.y - o.y) - (u.y - o.y) * (v.x - o.x);
    let d1 = cross(p, a, b);
    let d2 = cross(p, b, c);
    let d3 = cross(p, c, a);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}
