use std::sync::Arc;

use egui::{Pos2, Rect, Vec2};
use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Bitmap element; `source` is the decoded original and is never modified
/// (filters are re-run from it on every render)
#[derive(Clone, Serialize, Deserialize)]
pub struct ImageData {
    #[serde(with = "bitmap_serde")]
    pub source: Arc<RgbaImage>,
}

// Custom Debug implementation, the pixel buffer is too large to print
impl std::fmt::Debug for ImageData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.source.width())
            .field("height", &self.source.height())
            .finish()
    }
}

impl PartialEq for ImageData {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.source, &other.source) || *self.source == *other.source
    }
}

impl ImageData {
    pub fn new(source: RgbaImage) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.source.width() as f32, self.source.height() as f32)
    }

    pub fn local_bounds(&self) -> Rect {
        Rect::from_min_size(Pos2::ZERO, self.size())
    }

    pub fn hit_test(&self, local: Pos2) -> bool {
        self.local_bounds().contains(local)
    }
}

/// Stores a bitmap as dimensions plus base64 RGBA so document snapshots stay
/// plain JSON
mod bitmap_serde {
    use std::sync::Arc;

    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD;
    use image::RgbaImage;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Bitmap {
        width: u32,
        height: u32,
        rgba: String,
    }

    pub fn serialize<S: Serializer>(image: &Arc<RgbaImage>, serializer: S) -> Result<S::Ok, S::Error> {
        Bitmap {
            width: image.width(),
            height: image.height(),
            rgba: STANDARD.encode(image.as_raw()),
        }
        .serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Arc<RgbaImage>, D::Error> {
        let bitmap = Bitmap::deserialize(deserializer)?;
        let bytes = STANDARD.decode(bitmap.rgba).map_err(D::Error::custom)?;
        RgbaImage::from_raw(bitmap.width, bitmap.height, bytes)
            .map(Arc::new)
            .ok_or_else(|| D::Error::custom("bitmap size does not match its pixel data"))
    }
}
