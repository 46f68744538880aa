//! Pixel filters for drawing objects.
//!
//! Filters are pure functions of their input pixels. An object's filter list
//! is always run against its unfiltered pixels, so applying the same list
//! again reproduces exactly the same output.

use image::{Rgba, RgbaImage, imageops};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub enum Filter {
    Grayscale,
    Sepia,
    Invert,
    /// Additive brightness in [-1, 1]
    Brightness(f32),
    /// Contrast adjustment in [-1, 1]
    Contrast(f32),
    /// Gaussian blur sigma in pixels
    Blur(f32),
    /// Block size in pixels
    Pixelate(u32),
}

impl Filter {
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Grayscale => "grayscale",
            Filter::Sepia => "sepia",
            Filter::Invert => "invert",
            Filter::Brightness(_) => "brightness",
            Filter::Contrast(_) => "contrast",
            Filter::Blur(_) => "blur",
            Filter::Pixelate(_) => "pixelate",
        }
    }

    pub fn apply(&self, input: &RgbaImage) -> RgbaImage {
        match *self {
            Filter::Grayscale => map_rgb(input, |[r, g, b]| {
                let l = luminance(r, g, b);
                [l, l, l]
            }),
            Filter::Sepia => map_rgb(input, |[r, g, b]| {
                let (r, g, b) = (r as f32, g as f32, b as f32);
                [
                    to_u8(0.393 * r + 0.769 * g + 0.189 * b),
                    to_u8(0.349 * r + 0.686 * g + 0.168 * b),
                    to_u8(0.272 * r + 0.534 * g + 0.131 * b),
                ]
            }),
            Filter::Invert => {
                let mut out = input.clone();
                imageops::invert(&mut out);
                out
            }
            Filter::Brightness(amount) => {
                let delta = amount.clamp(-1.0, 1.0) * 255.0;
                map_rgb(input, |c| c.map(|v| to_u8(v as f32 + delta)))
            }
            Filter::Contrast(amount) => {
                // Same curve as the common canvas-library contrast filter.
                let c = amount.clamp(-1.0, 1.0) * 255.0;
                let factor = (259.0 * (c + 255.0)) / (255.0 * (259.0 - c));
                map_rgb(input, |px| px.map(|v| to_u8(factor * (v as f32 - 128.0) + 128.0)))
            }
            Filter::Blur(sigma) => {
                if sigma > 0.0 {
                    imageops::blur(input, sigma)
                } else {
                    input.clone()
                }
            }
            Filter::Pixelate(block) => pixelate(input, block.max(1)),
        }
    }
}

/// Runs `filters` in order against `source`
pub fn apply_all(filters: &[Filter], source: &RgbaImage) -> RgbaImage {
    let mut current = source.clone();
    for filter in filters {
        current = filter.apply(&current);
    }
    current
}

fn luminance(r: u8, g: u8, b: u8) -> u8 {
    to_u8(0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32)
}

fn to_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Maps the color channels, leaving alpha untouched
fn map_rgb(input: &RgbaImage, f: impl Fn([u8; 3]) -> [u8; 3]) -> RgbaImage {
    let mut out = input.clone();
    for pixel in out.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        let [r, g, b] = f([r, g, b]);
        *pixel = Rgba([r, g, b, a]);
    }
    out
}

fn pixelate(input: &RgbaImage, block: u32) -> RgbaImage {
    let mut out = input.clone();
    let (w, h) = input.dimensions();

    let mut block_y = 0;
    while block_y < h {
        let end_y = (block_y + block).min(h);
        let mut block_x = 0;
        while block_x < w {
            let end_x = (block_x + block).min(w);

            let mut total = [0u64; 4];
            let mut count = 0u64;
            for y in block_y..end_y {
                for x in block_x..end_x {
                    let px = input.get_pixel(x, y);
                    for (sum, channel) in total.iter_mut().zip(px.0) {
                        *sum += channel as u64;
                    }
                    count += 1;
                }
            }

            if count > 0 {
                let avg = Rgba(total.map(|sum| (sum / count) as u8));
                for y in block_y..end_y {
                    for x in block_x..end_x {
                        out.put_pixel(x, y, avg);
                    }
                }
            }
            block_x += block;
        }
        block_y += block;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(8, 8, |x, y| Rgba([(x * 30) as u8, (y * 30) as u8, 200, 255 - x as u8]))
    }

    #[test]
    fn grayscale_is_idempotent() {
        let once = Filter::Grayscale.apply(&sample());
        let twice = Filter::Grayscale.apply(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn filters_keep_alpha() {
        let src = sample();
        for filter in [Filter::Grayscale, Filter::Sepia, Filter::Invert, Filter::Brightness(0.3)] {
            let out = filter.apply(&src);
            for (a, b) in src.pixels().zip(out.pixels()) {
                assert_eq!(a.0[3], b.0[3], "{} changed alpha", filter.name());
            }
        }
    }

    #[test]
    fn apply_all_starts_from_source() {
        let src = sample();
        let list = [Filter::Invert, Filter::Pixelate(4)];
        assert_eq!(apply_all(&list, &src), apply_all(&list, &src));
        assert_eq!(apply_all(&[], &src), src);
    }

    #[test]
    fn pixelate_flattens_blocks() {
        let out = Filter::Pixelate(8).apply(&sample());
        let first = *out.get_pixel(0, 0);
        assert!(out.pixels().all(|p| *p == first));
    }
}
