use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_LAYER_NAME: &str = "Layer 1";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layer {
    /// Unique identifier for the layer
    pub id: Uuid,
    /// Display name of the layer
    pub name: String,
    /// Whether the layer's objects are drawn and exported
    pub visible: bool,
}

impl Layer {
    pub fn new(name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            visible: true,
        }
    }
}

impl Default for Layer {
    fn default() -> Self {
        Self::new(DEFAULT_LAYER_NAME)
    }
}
