//! Flattening of a document into a single raster with tiny-skia.
//!
//! Objects are painted bottom to top onto a background-filled canvas. An
//! object with filters is first painted on its own transparent layer (images
//! use their source bitmap instead), the filters run on those unfiltered
//! pixels, and the result is composited.

pub mod text;

use egui::{Color32, Pos2, Rect};
use image::RgbaImage;
use log::debug;
use tiny_skia::{
    Color, ColorU8, FillRule, FilterQuality, GradientStop, LineCap, LineJoin, LinearGradient, Paint, Path,
    PathBuilder, Pattern, Pixmap, PixmapPaint, Point, SpreadMode, Stroke, Transform,
};

use crate::document::Document;
use crate::element::{BrushType, DrawingObject, Fill, ObjectKind, Shape, StrokeData, Style, calculate_bounds};
use crate::error::RenderError;
use crate::filter;

/// Side of the tile used by pattern brushes
const PATTERN_TILE: u32 = 6;

/// Renders every visible object of `document` at `width`x`height` onto
/// `background`. Pure: the same document always produces the same pixels.
pub fn render(
    document: &Document,
    width: u32,
    height: u32,
    background: Color32,
) -> Result<RgbaImage, RenderError> {
    let invalid = RenderError::InvalidCanvasSize { width, height };
    let mut canvas = Pixmap::new(width, height).ok_or(invalid)?;
    canvas.fill(skia_color(background));

    for object in document.visible_objects() {
        if object.filters.is_empty() {
            draw_object(&mut canvas, object)?;
            continue;
        }

        debug!("🎨 Filtering {} {} ({} filters)", object.kind_name(), object.id, object.filters.len());
        match &object.kind {
            ObjectKind::Image(image) => {
                let filtered = filter::apply_all(&object.filters, &image.source);
                draw_bitmap(&mut canvas, &filtered, object.transform.to_skia());
            }
            _ => {
                let mut layer = Pixmap::new(width, height).ok_or(invalid)?;
                draw_object(&mut layer, object)?;
                let filtered = filter::apply_all(&object.filters, &pixmap_to_image(&layer).ok_or(invalid)?);
                draw_bitmap(&mut canvas, &filtered, Transform::identity());
            }
        }
    }

    pixmap_to_image(&canvas).ok_or(invalid)
}

/// Converts an egui color to tiny-skia's unpremultiplied color
pub(crate) fn skia_color(color: Color32) -> Color {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Color::from_rgba8(r, g, b, a)
}

/// Pixmap data is premultiplied, image buffers are not
fn pixmap_to_image(pixmap: &Pixmap) -> Option<RgbaImage> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let c = pixel.demultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
}

fn image_to_pixmap(image: &RgbaImage) -> Option<Pixmap> {
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

fn draw_bitmap(canvas: &mut Pixmap, bitmap: &RgbaImage, transform: Transform) {
    let Some(source) = image_to_pixmap(bitmap) else {
        return;
    };
    let paint = PixmapPaint {
        quality: FilterQuality::Bilinear,
        ..Default::default()
    };
    canvas.draw_pixmap(0, 0, source.as_ref(), &paint, transform, None);
}

/// The pixmap's area mapped back into the object's local space
fn local_visible_rect(pixmap: &Pixmap, object: &DrawingObject) -> Rect {
    let (w, h) = (pixmap.width() as f32, pixmap.height() as f32);
    let corners = [Pos2::ZERO, Pos2::new(w, 0.0), Pos2::new(0.0, h), Pos2::new(w, h)]
        .map(|corner| object.transform.invert(corner));
    // One pixel of slack for bilinear sampling at the edges
    calculate_bounds(&corners, 1.0)
}

fn draw_object(pixmap: &mut Pixmap, object: &DrawingObject) -> Result<(), RenderError> {
    let transform = object.transform.to_skia();
    match &object.kind {
        ObjectKind::Stroke(stroke) => draw_stroke(pixmap, stroke, &object.style, transform),
        ObjectKind::Shape(shape) => draw_shape(pixmap, shape, &object.style, transform),
        ObjectKind::Text(data) => {
            let visible = local_visible_rect(pixmap, object);
            if let Some(glyphs) = text::rasterize(data, object.style.fill, visible)? {
                let paint = PixmapPaint {
                    quality: FilterQuality::Bilinear,
                    ..Default::default()
                };
                let placed = transform.pre_translate(glyphs.offset.x, glyphs.offset.y);
                pixmap.draw_pixmap(0, 0, glyphs.pixmap.as_ref(), &paint, placed, None);
            }
        }
        ObjectKind::Image(image) => draw_bitmap(pixmap, &image.source, transform),
    }
    Ok(())
}

fn solid_paint(color: Color32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(skia_color(color));
    paint.anti_alias = true;
    paint
}

fn polyline(points: &[Pos2]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for point in rest {
        pb.line_to(point.x, point.y);
    }
    pb.finish()
}

/// Diagonal stripes in `color` on a transparent tile
fn pattern_tile(color: Color32) -> Option<Pixmap> {
    let mut tile = Pixmap::new(PATTERN_TILE, PATTERN_TILE)?;
    let ink = skia_color(color).premultiply().to_color_u8();
    for (index, pixel) in tile.pixels_mut().iter_mut().enumerate() {
        let x = index as u32 % PATTERN_TILE;
        let y = index as u32 / PATTERN_TILE;
        if (x + y) % PATTERN_TILE < 2 {
            *pixel = ink;
        }
    }
    Some(tile)
}

fn draw_stroke(pixmap: &mut Pixmap, stroke: &StrokeData, style: &Style, transform: Transform) {
    let width = style.stroke_width.max(0.5);

    if stroke.brush == BrushType::Spray {
        let mut pb = PathBuilder::new();
        for (center, radius) in stroke.particles(width) {
            pb.push_circle(center.x, center.y, radius);
        }
        if let Some(path) = pb.finish() {
            pixmap.fill_path(&path, &solid_paint(style.stroke), FillRule::Winding, transform, None);
        }
        return;
    }

    let line = Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Default::default()
    };
    let tile = match stroke.brush {
        BrushType::Pattern => pattern_tile(style.stroke),
        _ => None,
    };
    let paint = match &tile {
        Some(tile) => Paint {
            shader: Pattern::new(
                tile.as_ref(),
                SpreadMode::Repeat,
                FilterQuality::Nearest,
                1.0,
                Transform::identity(),
            ),
            anti_alias: true,
            ..Default::default()
        },
        None => solid_paint(style.stroke),
    };

    match polyline(&stroke.points) {
        Some(path) => pixmap.stroke_path(&path, &paint, &line, transform, None),
        // All points coincide; paint a round dot instead
        None => {
            if let Some(dot) = stroke
                .points
                .first()
                .and_then(|p| PathBuilder::from_circle(p.x, p.y, width / 2.0))
            {
                pixmap.fill_path(&dot, &paint, FillRule::Winding, transform, None);
            }
        }
    }
}

fn shape_path(shape: &Shape) -> Option<Path> {
    match *shape {
        Shape::Rect { width, height } => {
            tiny_skia::Rect::from_xywh(0.0, 0.0, width, height).map(PathBuilder::from_rect)
        }
        Shape::Circle { radius } => PathBuilder::from_circle(radius, radius, radius),
        Shape::Triangle { width, height } => {
            let [a, b, c] = Shape::triangle_points(width, height);
            let mut pb = PathBuilder::new();
            pb.move_to(a.x, a.y);
            pb.line_to(b.x, b.y);
            pb.line_to(c.x, c.y);
            pb.close();
            pb.finish()
        }
    }
}

fn fill_paint(fill: Fill, shape: &Shape) -> Option<Paint<'static>> {
    match fill {
        Fill::None => None,
        Fill::Solid(color) => Some(solid_paint(color)),
        Fill::LinearGradient { start, end } => {
            let size = shape.size();
            let shader = LinearGradient::new(
                Point::from_xy(0.0, size.y / 2.0),
                Point::from_xy(size.x, size.y / 2.0),
                vec![
                    GradientStop::new(0.0, skia_color(start)),
                    GradientStop::new(1.0, skia_color(end)),
                ],
                SpreadMode::Pad,
                Transform::identity(),
            )?;
            Some(Paint {
                shader,
                anti_alias: true,
                ..Default::default()
            })
        }
    }
}

fn draw_shape(pixmap: &mut Pixmap, shape: &Shape, style: &Style, transform: Transform) {
    let Some(path) = shape_path(shape) else {
        return;
    };

    if let Some(paint) = fill_paint(style.fill, shape) {
        pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
    }

    if style.stroke_width > 0.0 && style.stroke.a() > 0 {
        let outline = Stroke {
            width: style.stroke_width,
            ..Default::default()
        };
        pixmap.stroke_path(&path, &solid_paint(style.stroke), &outline, transform, None);
    }
}
