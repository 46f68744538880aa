use egui::{Color32, Pos2};
use serde::{Deserialize, Serialize};

use crate::element::{BrushType, ObjectDraft, factory};

pub const MIN_BRUSH_WIDTH: f32 = 1.0;
pub const MAX_BRUSH_WIDTH: f32 = 50.0;
pub const MIN_SPRAY_DENSITY: f32 = 0.05;
pub const MAX_SPRAY_DENSITY: f32 = 5.0;

/// Brush parameters; changes apply to the next stroke only
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BrushSettings {
    pub color: Color32,
    /// Clamped to [1, 50]
    pub width: f32,
    pub brush_type: BrushType,
    /// Spray particles per pixel of drag distance
    pub spray_density: f32,
}

impl Default for BrushSettings {
    fn default() -> Self {
        Self {
            color: Color32::BLACK,
            width: 5.0,
            brush_type: BrushType::Pencil,
            spray_density: 0.5,
        }
    }
}

impl BrushSettings {
    pub fn set_color(&mut self, color: Color32) {
        self.color = color;
    }

    pub fn set_width(&mut self, width: f32) {
        self.width = clamp_width(width);
    }

    pub fn set_brush_type(&mut self, brush_type: BrushType) {
        self.brush_type = brush_type;
    }

    pub fn set_spray_density(&mut self, density: f32) {
        self.spray_density = density.clamp(MIN_SPRAY_DENSITY, MAX_SPRAY_DENSITY);
    }

    /// Copy with every parameter inside its allowed range
    pub fn sanitized(mut self) -> Self {
        self.set_width(self.width);
        self.set_spray_density(self.spray_density);
        self
    }
}

fn clamp_width(width: f32) -> f32 {
    if width.is_nan() {
        MIN_BRUSH_WIDTH
    } else {
        width.clamp(MIN_BRUSH_WIDTH, MAX_BRUSH_WIDTH)
    }
}

/// 32-bit integer mix, good enough to decorrelate neighbouring seeds
fn hash_u32(mut x: u32) -> u32 {
    x ^= x >> 16;
    x = x.wrapping_mul(0x7feb_352d);
    x ^= x >> 15;
    x = x.wrapping_mul(0x846c_a68b);
    x ^= x >> 16;
    x
}

fn hash01(x: u32) -> f32 {
    hash_u32(x) as f32 / u32::MAX as f32
}

/// An in-progress stroke.
///
/// The brush settings are copied when the stroke starts, so later changes
/// to the brush never alter a stroke that is already being drawn.
#[derive(Debug, Clone)]
pub struct StrokeBuilder {
    settings: BrushSettings,
    points: Vec<Pos2>,
    last: Pos2,
    seed: u32,
    draws: u32,
}

impl StrokeBuilder {
    pub fn begin(settings: BrushSettings, start: Pos2, seed: u32) -> Self {
        let mut builder = Self {
            settings: settings.sanitized(),
            points: Vec::new(),
            last: start,
            seed: hash_u32(seed),
            draws: 0,
        };
        match builder.settings.brush_type {
            BrushType::Pencil | BrushType::Pattern => builder.points.push(start),
            BrushType::Spray => {
                let burst = (builder.settings.spray_density * builder.settings.width).ceil().max(1.0) as u32;
                for _ in 0..burst {
                    builder.scatter_around(start);
                }
            }
        }
        builder
    }

    pub fn settings(&self) -> &BrushSettings {
        &self.settings
    }

    /// Path points so far (particle centers for spray)
    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn extend(&mut self, pos: Pos2) {
        match self.settings.brush_type {
            BrushType::Pencil | BrushType::Pattern => {
                if self.points.last() != Some(&pos) {
                    self.points.push(pos);
                }
            }
            BrushType::Spray => {
                let from = self.last;
                let distance = (pos - from).length();
                let count = (distance * self.settings.spray_density).ceil().max(1.0) as u32;
                for i in 0..count {
                    let t = (i + 1) as f32 / count as f32;
                    self.scatter_around(from + (pos - from) * t);
                }
            }
        }
        self.last = pos;
    }

    /// Adds one particle uniformly distributed in the brush disc around `center`
    fn scatter_around(&mut self, center: Pos2) {
        let radius = self.settings.width / 2.0;
        let u = hash01(self.seed ^ self.draws.wrapping_mul(2));
        let v = hash01(self.seed ^ self.draws.wrapping_mul(2).wrapping_add(1));
        self.draws = self.draws.wrapping_add(1);

        let r = radius * u.sqrt();
        let angle = v * std::f32::consts::TAU;
        self.points.push(Pos2::new(center.x + r * angle.cos(), center.y + r * angle.sin()));
    }

    /// Whether finishing now would produce an object
    pub fn has_ink(&self) -> bool {
        match self.settings.brush_type {
            BrushType::Pencil | BrushType::Pattern => self.points.len() > 1,
            BrushType::Spray => !self.points.is_empty(),
        }
    }

    pub fn finish(self) -> Option<ObjectDraft> {
        if !self.has_ink() {
            return None;
        }
        Some(factory::stroke(
            self.points,
            self.settings.brush_type,
            self.settings.color,
            self.settings.width,
        ))
    }
}
