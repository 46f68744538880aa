use egui::{Pos2, Rect, Vec2};
use serde::{Deserialize, Serialize};

use crate::element::common;

/// How a stroke's path is turned into ink
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BrushType {
    /// Continuous line through the path points
    #[default]
    Pencil,
    /// Scattered particles; the path points are the particle centers
    Spray,
    /// Line painted with a tiled micro-texture
    Pattern,
}

/// Freehand stroke in local coordinates
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrokeData {
    pub points: Vec<Pos2>,
    pub brush: BrushType,
}

impl StrokeData {
    pub fn new(points: Vec<Pos2>, brush: BrushType) -> Self {
        Self { points, brush }
    }

    /// Radius of a single spray particle for a brush of `width`
    pub fn particle_radius(width: f32) -> f32 {
        (width / 10.0).max(0.5)
    }

    /// Spray particles drawn for a stroke, as (center, radius)
    pub fn particles(&self, width: f32) -> impl Iterator<Item = (Pos2, f32)> + '_ {
        let radius = Self::particle_radius(width);
        self.points.iter().map(move |p| (*p, radius))
    }

    pub fn local_bounds(&self, width: f32) -> Rect {
        let padding = match self.brush {
            BrushType::Pencil | BrushType::Pattern => width / 2.0,
            BrushType::Spray => Self::particle_radius(width),
        };
        common::calculate_bounds(&self.points, padding)
    }

    pub fn hit_test(&self, local: Pos2, width: f32) -> bool {
        let tolerance = (width / 2.0).max(common::MIN_ELEMENT_SIZE);
        match self.points.as_slice() {
            [] => false,
            [only] => (local - *only).length() <= tolerance,
            points => match self.brush {
                BrushType::Spray => points.iter().any(|p| (local - *p).length() <= tolerance),
                BrushType::Pencil | BrushType::Pattern => points
                    .windows(2)
                    .any(|w| common::distance_to_line_segment(local, w[0], w[1]) <= tolerance),
            },
        }
    }

    /// Moves the points so their bounding box starts at the local origin and
    /// returns the offset that was removed
    pub(crate) fn normalize(&mut self) -> Vec2 {
        let bounds = common::calculate_bounds(&self.points, 0.0);
        if bounds == Rect::NOTHING {
            return Vec2::ZERO;
        }
        let offset = bounds.min.to_vec2();
        for point in &mut self.points {
            *point -= offset;
        }
        offset
    }
}
