//! Encoding of exported rasters into the string payload stored with a
//! landmark, and decoding them back for display.

use std::io::Cursor;

use base64::Engine as _;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::CodecError;

const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Opaque encoded raster as handed to persistence
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RasterPayload(String);

impl RasterPayload {
    pub fn new(payload: impl Into<String>) -> Self {
        Self(payload.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RasterPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Payloads are large; show only the head
        let head: String = self.0.chars().take(32).collect();
        write!(f, "{head}… ({} bytes)", self.0.len())
    }
}

/// Turns rasters into payloads and back
pub trait RasterCodec {
    fn encode(&self, image: &RgbaImage) -> Result<RasterPayload, CodecError>;

    /// Decodes into a texture-ready image for the rendering host
    fn decode(&self, payload: &RasterPayload) -> Result<egui::ColorImage, CodecError>;
}

/// PNG bytes wrapped in a base64 `data:` URL
#[derive(Debug, Clone, Copy, Default)]
pub struct PngDataUrlCodec;

impl RasterCodec for PngDataUrlCodec {
    fn encode(&self, image: &RgbaImage) -> Result<RasterPayload, CodecError> {
        let mut png = Vec::new();
        PngEncoder::new(&mut png).write_image(
            image.as_raw(),
            image.width(),
            image.height(),
            ExtendedColorType::Rgba8,
        )?;
        let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
        Ok(RasterPayload(format!("{PNG_DATA_URL_PREFIX}{encoded}")))
    }

    fn decode(&self, payload: &RasterPayload) -> Result<egui::ColorImage, CodecError> {
        let encoded = payload
            .as_str()
            .strip_prefix(PNG_DATA_URL_PREFIX)
            .ok_or(CodecError::NotADataUrl)?;
        let png = base64::engine::general_purpose::STANDARD.decode(encoded.trim())?;
        let image = image::load(Cursor::new(png), ImageFormat::Png)?.to_rgba8();
        let size = [image.width() as usize, image.height() as usize];
        Ok(egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw()))
    }
}
