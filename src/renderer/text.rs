//! Text layout and rasterization with rusttype.
//!
//! Glyphs are drawn into a coverage mask in the text object's local space and
//! then colored with the object's fill. Bold and italic are synthesized from
//! the regular face.

use std::sync::OnceLock;

use egui::{Color32, Pos2, Rect, Vec2};
use rusttype::{Font, Scale, point as rt_point};
use tiny_skia::{Pixmap, PremultipliedColorU8};

use crate::element::{Fill, TextData, clamp_font_size};
use crate::error::RenderError;

const ITALIC_SHEAR: f32 = 0.2;
const BOLD_OFFSET: i32 = 1;
/// Rough advance per character when no font could be loaded
const FALLBACK_ADVANCE: f32 = 0.6;
/// Upper bound on the pixels of one coverage mask (16 megapixels)
const MAX_MASK_PIXELS: usize = 4096 * 4096;

fn proportional_font() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(|| Font::try_from_bytes(epaint_default_fonts::UBUNTU_LIGHT))
        .as_ref()
}

fn monospace_font() -> Option<&'static Font<'static>> {
    static FONT: OnceLock<Option<Font<'static>>> = OnceLock::new();
    FONT.get_or_init(|| Font::try_from_bytes(epaint_default_fonts::HACK_REGULAR))
        .as_ref()
}

/// Picks the bundled face closest to a CSS-like family name
fn font_for(family: &str) -> Option<&'static Font<'static>> {
    let family = family.trim().to_ascii_lowercase();
    let monospace = family.contains("mono") || family.contains("courier") || family == "hack";
    if monospace {
        monospace_font().or_else(proportional_font)
    } else {
        proportional_font()
    }
}

struct LineMetrics {
    ascent: f32,
    line_height: f32,
}

fn line_metrics(font: &Font<'_>, scale: Scale) -> LineMetrics {
    let v = font.v_metrics(scale);
    LineMetrics {
        ascent: v.ascent,
        line_height: (v.ascent - v.descent + v.line_gap).max(1.0),
    }
}

fn line_width(font: &Font<'_>, scale: Scale, line: &str) -> f32 {
    font.layout(line, scale, rt_point(0.0, 0.0))
        .last()
        .map(|glyph| glyph.position().x + glyph.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

fn font_size(text: &TextData) -> f32 {
    clamp_font_size(text.style.font_size)
}

/// Size of the rendered text block in local coordinates
pub fn measure(text: &TextData) -> Vec2 {
    let size = font_size(text);
    let line_count = text.content.split('\n').count() as f32;

    let Some(font) = font_for(&text.style.font_family) else {
        let longest = text
            .content
            .split('\n')
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0) as f32;
        return Vec2::new(
            (longest * size * FALLBACK_ADVANCE).ceil().max(1.0),
            (line_count * size).ceil(),
        );
    };

    let scale = Scale::uniform(size);
    let metrics = line_metrics(font, scale);
    let widest = text
        .content
        .split('\n')
        .map(|line| line_width(font, scale, line))
        .fold(0.0_f32, f32::max);

    let mut width = widest;
    if text.style.italic {
        width += metrics.ascent * ITALIC_SHEAR;
    }
    if text.style.bold {
        width += BOLD_OFFSET as f32;
    }
    Vec2::new(
        width.ceil().max(1.0),
        (line_count * metrics.line_height).ceil().max(1.0),
    )
}

/// Coverage of a window of the text block, one value in [0, 1] per pixel.
/// `origin` is the window's top-left corner in the text's local space.
struct Mask {
    origin: (i32, i32),
    width: u32,
    height: u32,
    coverage: Vec<f32>,
}

impl Mask {
    fn new(origin: (i32, i32), width: u32, height: u32) -> Result<Self, RenderError> {
        let too_large = RenderError::TextTooLarge { width, height };
        let pixels = (width as usize)
            .checked_mul(height as usize)
            .filter(|&pixels| pixels <= MAX_MASK_PIXELS)
            .ok_or(too_large)?;
        Ok(Self {
            origin,
            width,
            height,
            coverage: vec![0.0; pixels],
        })
    }

    fn add(&mut self, x: i32, y: i32, value: f32) {
        let (x, y) = (x - self.origin.0, y - self.origin.1);
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let cell = &mut self.coverage[y as usize * self.width as usize + x as usize];
        *cell = cell.max(value);
    }
}

/// Glyph pixels for the visible part of a text block
pub struct TextRaster {
    pub pixmap: Pixmap,
    /// Top-left corner of `pixmap` in the text's local space
    pub offset: Vec2,
}

/// Integer pixel window of the text block that falls inside `visible`
fn raster_window(size: Vec2, visible: Rect) -> Option<(i32, i32, u32, u32)> {
    let block = Rect::from_min_size(Pos2::ZERO, size);
    let window = block.intersect(visible);
    if !(window.is_positive() && window.is_finite()) {
        return None;
    }
    let left = window.min.x.floor();
    let top = window.min.y.floor();
    let width = window.max.x.ceil() - left;
    let height = window.max.y.ceil() - top;
    Some((left as i32, top as i32, width as u32, height as u32))
}

/// Rasterizes the part of the text that lies inside `visible` (a rectangle in
/// the text's local space), painted with `fill`. Returns `Ok(None)` for empty
/// or fully clipped text, or when no font is available.
pub fn rasterize(text: &TextData, fill: Fill, visible: Rect) -> Result<Option<TextRaster>, RenderError> {
    if text.content.trim().is_empty() {
        return Ok(None);
    }
    let Some(font) = font_for(&text.style.font_family) else {
        return Ok(None);
    };
    let size = measure(text);
    let Some((left, top, width, height)) = raster_window(size, visible) else {
        return Ok(None);
    };

    let scale = Scale::uniform(font_size(text));
    let metrics = line_metrics(font, scale);
    let mut mask = Mask::new((left, top), width, height)?;

    for (index, line) in text.content.split('\n').enumerate() {
        let baseline = metrics.ascent + index as f32 * metrics.line_height;

        for glyph in font.layout(line, scale, rt_point(0.0, baseline)) {
            let Some(bbox) = glyph.pixel_bounding_box() else {
                continue;
            };
            // Italic shear moves pixels by at most this much horizontally
            let slant = (metrics.line_height * ITALIC_SHEAR).ceil() as i32 + BOLD_OFFSET;
            let outside = bbox.max.x + slant < left
                || bbox.min.x - slant > left + width as i32
                || bbox.max.y < top
                || bbox.min.y > top + height as i32;
            if outside {
                continue;
            }
            glyph.draw(|gx, gy, v| {
                let py = gy as i32 + bbox.min.y;
                let mut px = gx as i32 + bbox.min.x;
                if text.style.italic {
                    px += ((baseline - py as f32) * ITALIC_SHEAR).round() as i32;
                }
                mask.add(px, py, v);
                if text.style.bold {
                    mask.add(px + BOLD_OFFSET, py, v);
                }
            });
        }

        if text.style.underline {
            let thickness = (font_size(text) / 16.0).max(1.0).round() as i32;
            let rule_top = (baseline + font_size(text) * 0.08).round() as i32;
            let right = line_width(font, scale, line).ceil() as i32;
            for y in rule_top..rule_top + thickness {
                for x in left.max(0)..right.min(left + width as i32) {
                    mask.add(x, y, 1.0);
                }
            }
        }
    }

    Ok(paint_mask(&mask, fill, size.x).map(|pixmap| TextRaster {
        pixmap,
        offset: Vec2::new(left as f32, top as f32),
    }))
}

fn lerp_channel(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t).round() as u8
}

/// Color of the fill at horizontal position `t` in [0, 1]; premultiplied
fn fill_color(fill: Fill, t: f32) -> Color32 {
    match fill {
        Fill::None => Color32::BLACK,
        Fill::Solid(color) => color,
        Fill::LinearGradient { start, end } => Color32::from_rgba_premultiplied(
            lerp_channel(start.r(), end.r(), t),
            lerp_channel(start.g(), end.g(), t),
            lerp_channel(start.b(), end.b(), t),
            lerp_channel(start.a(), end.a(), t),
        ),
    }
}

/// Colors the mask; gradients span the full text width `block_width`
fn paint_mask(mask: &Mask, fill: Fill, block_width: f32) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(mask.width, mask.height)?;
    let span = (block_width - 1.0).max(1.0);

    for (index, pixel) in pixmap.pixels_mut().iter_mut().enumerate() {
        let coverage = mask.coverage[index];
        if coverage <= 0.0 {
            continue;
        }
        let x = (index % mask.width as usize) as i32 + mask.origin.0;
        let color = fill_color(fill, (x as f32 / span).clamp(0.0, 1.0));
        let scale = |c: u8| (c as f32 * coverage.min(1.0)).round() as u8;
        if let Some(premultiplied) =
            PremultipliedColorU8::from_rgba(scale(color.r()), scale(color.g()), scale(color.b()), scale(color.a()))
        {
            *pixel = premultiplied;
        }
    }
    Some(pixmap)
}
