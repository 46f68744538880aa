use std::fs;
use std::path::Path;

use egui::Color32;
use log::info;
use serde::{Deserialize, Serialize};

use crate::element::{Fill, MAX_FONT_SIZE, MIN_FONT_SIZE, TextStyle};
use crate::error::ConfigError;
use crate::tool::BrushSettings;

pub const MIN_ZOOM: f32 = 0.5;
pub const MAX_ZOOM: f32 = 3.0;

/// Settings for editor sessions and the placement controller.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// Native canvas resolution; exports are always this size
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub background: Color32,
    /// Brush a new session starts with
    pub brush: BrushSettings,
    /// Fill for new shapes and text
    pub fill: Fill,
    pub text_style: TextStyle,
    /// Factor applied per zoom_in/zoom_out step
    pub zoom_step: f32,
    /// Radius of the globe picks are resolved against
    pub sphere_radius: f64,
    /// Height of landmark billboards above the surface
    pub billboard_lift: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 512,
            canvas_height: 512,
            background: Color32::WHITE,
            brush: BrushSettings::default(),
            fill: Fill::None,
            text_style: TextStyle::default(),
            zoom_step: 1.1,
            sphere_radius: 5.0,
            billboard_lift: 0.05,
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        info!("⚙️ Loaded editor config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConfigError::Invalid(format!(
                "canvas must not be empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if !(self.sphere_radius.is_finite() && self.sphere_radius > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "sphere radius must be positive, got {}",
                self.sphere_radius
            )));
        }
        if !(self.billboard_lift.is_finite() && self.billboard_lift >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "billboard lift must not be negative, got {}",
                self.billboard_lift
            )));
        }
        let font_size = self.text_style.font_size;
        if !(MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&font_size) {
            return Err(ConfigError::Invalid(format!(
                "font size must be within {MIN_FONT_SIZE}..={MAX_FONT_SIZE}, got {font_size}"
            )));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 1.0) {
            return Err(ConfigError::Invalid(format!(
                "zoom step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = EditorConfig::from_json(r#"{ "canvas_width": 256 }"#).unwrap();
        assert_eq!(config.canvas_width, 256);
        assert_eq!(config.canvas_height, 512);
        assert_eq!(config.sphere_radius, 5.0);
    }

    #[test]
    fn zero_canvas_is_invalid() {
        let err = EditorConfig::from_json(r#"{ "canvas_height": 0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn oversized_font_is_invalid() {
        let err = EditorConfig::from_json(r#"{ "text_style": { "font_family": "sans-serif", "font_size": 4000.0, "bold": false, "italic": false, "underline": false } }"#)
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn json_round_trip() {
        let config = EditorConfig {
            zoom_step: 1.25,
            ..Default::default()
        };
        let back = EditorConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back, config);
    }
}
