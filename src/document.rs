use egui::Pos2;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::element::{DrawingObject, Fill, ObjectDraft, ObjectId, ObjectKind, ObjectPatch, clamp_font_size};
use crate::error::ModelError;
use crate::filter::Filter;
use crate::id_generator::IdGenerator;
use crate::layer::Layer;

/// The drawing's object model: objects in z-order plus the layer list.
///
/// Objects are kept in insertion order, which is also their paint order.
/// There is always at least one layer, and new objects join the active one.
#[derive(Debug, Clone)]
pub struct Document {
    objects: Vec<DrawingObject>,
    layers: Vec<Layer>,
    active_layer: usize,
    active_object: Option<ObjectId>,
    ids: IdGenerator,
}

/// What a snapshot of the document contains
#[derive(Serialize, Deserialize)]
struct DocumentState {
    objects: Vec<DrawingObject>,
    layers: Vec<Layer>,
    active_layer: usize,
    ids: IdGenerator,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            layers: vec![Layer::default()],
            active_layer: 0,
            active_object: None,
            ids: IdGenerator::default(),
        }
    }

    pub fn objects(&self) -> &[DrawingObject] {
        &self.objects
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn object(&self, id: ObjectId) -> Option<&DrawingObject> {
        self.objects.iter().find(|o| o.id == id)
    }

    fn object_mut(&mut self, id: ObjectId) -> Result<&mut DrawingObject, ModelError> {
        self.objects
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(ModelError::UnknownObject(id))
    }

    /// Paint order position of an object (0 = bottom)
    pub fn z_index(&self, id: ObjectId) -> Option<usize> {
        self.objects.iter().position(|o| o.id == id)
    }

    /// Adds the object on top of the active layer and selects it
    pub fn add_object(&mut self, draft: ObjectDraft) -> ObjectId {
        let id = self.ids.generate_id();
        let layer = self.layers[self.active_layer].id;
        let object = draft.into_object(id, layer);
        debug!("➕ Adding {} {} to layer {}", object.kind_name(), id, self.layers[self.active_layer].name);
        self.objects.push(object);
        self.active_object = Some(id);
        id
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Result<DrawingObject, ModelError> {
        let index = self.z_index(id).ok_or(ModelError::UnknownObject(id))?;
        if self.active_object == Some(id) {
            self.active_object = None;
        }
        Ok(self.objects.remove(index))
    }

    pub fn update_object(&mut self, id: ObjectId, patch: &ObjectPatch) -> Result<(), ModelError> {
        let object = self.object_mut(id)?;

        if patch.touches_text() && object.as_text().is_none() {
            return Err(ModelError::NotText(id));
        }

        if let Some(position) = patch.position {
            object.transform.position = position;
        }
        if let Some(scale) = patch.scale {
            object.transform.scale = scale;
        }
        if let Some(rotation) = patch.rotation {
            object.transform.rotation = rotation;
        }
        if let Some(color) = patch.stroke_color {
            object.style.stroke = color;
        }
        if let Some(fill) = patch.fill {
            object.style.fill = fill;
        }
        if let Some(width) = patch.stroke_width {
            object.style.stroke_width = width.max(0.0);
        }

        if let ObjectKind::Text(text) = &mut object.kind {
            if let Some(content) = &patch.content {
                text.content = content.clone();
            }
            if let Some(family) = &patch.font_family {
                text.style.font_family = family.clone();
            }
            if let Some(size) = patch.font_size {
                text.style.font_size = clamp_font_size(size);
            }
            if let Some(bold) = patch.bold {
                text.style.bold = bold;
            }
            if let Some(italic) = patch.italic {
                text.style.italic = italic;
            }
            if let Some(underline) = patch.underline {
                text.style.underline = underline;
            }
            // Text with no fill would be invisible.
            if object.style.fill.is_none() {
                object.style.fill = Fill::Solid(egui::Color32::BLACK);
            }
        }

        Ok(())
    }

    /// Replaces the object's filter list wholesale
    pub fn apply_filters(&mut self, id: ObjectId, filters: Vec<Filter>) -> Result<(), ModelError> {
        let object = self.object_mut(id)?;
        debug!(
            "🎨 Filters on {}: {:?}",
            id,
            filters.iter().map(Filter::name).collect::<Vec<_>>()
        );
        object.filters = filters;
        Ok(())
    }

    /// The most recently selected or added object
    pub fn active_object(&self) -> Option<&DrawingObject> {
        self.active_object.and_then(|id| self.object(id))
    }

    pub fn active_object_id(&self) -> Option<ObjectId> {
        self.active_object
    }

    pub fn select(&mut self, id: ObjectId) -> Result<(), ModelError> {
        if self.object(id).is_none() {
            return Err(ModelError::UnknownObject(id));
        }
        self.active_object = Some(id);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.active_object = None;
    }

    /// Selects the topmost visible object under `pos`, or clears the selection
    pub fn select_at(&mut self, pos: Pos2) -> Option<ObjectId> {
        let hit = self
            .objects
            .iter()
            .rev()
            .filter(|o| self.is_layer_visible(o.layer))
            .find(|o| o.hit_test(pos))
            .map(|o| o.id);
        self.active_object = hit;
        hit
    }

    /// Removes every object and resets to a single visible layer
    pub fn clear(&mut self) {
        info!("🧹 Clearing document ({} objects)", self.objects.len());
        self.objects.clear();
        self.layers = vec![Layer::default()];
        self.active_layer = 0;
        self.active_object = None;
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn active_layer_index(&self) -> usize {
        self.active_layer
    }

    /// Adds a layer on top and makes it the active one
    pub fn add_layer(&mut self, name: &str) -> usize {
        self.layers.push(Layer::new(name));
        self.active_layer = self.layers.len() - 1;
        self.active_layer
    }

    pub fn set_active_layer(&mut self, index: usize) -> Result<(), ModelError> {
        if index >= self.layers.len() {
            return Err(ModelError::UnknownLayer(index));
        }
        self.active_layer = index;
        Ok(())
    }

    pub fn set_layer_visible(&mut self, index: usize, visible: bool) -> Result<(), ModelError> {
        let layer = self
            .layers
            .get_mut(index)
            .ok_or(ModelError::UnknownLayer(index))?;
        layer.visible = visible;
        Ok(())
    }

    /// Flips a layer's visibility and returns the new value
    pub fn toggle_layer(&mut self, index: usize) -> Result<bool, ModelError> {
        let layer = self
            .layers
            .get_mut(index)
            .ok_or(ModelError::UnknownLayer(index))?;
        layer.visible = !layer.visible;
        Ok(layer.visible)
    }

    /// Objects whose layer no longer exists count as visible
    pub fn is_layer_visible(&self, layer: Uuid) -> bool {
        self.layers
            .iter()
            .find(|l| l.id == layer)
            .is_none_or(|l| l.visible)
    }

    /// Objects that are drawn, bottom to top
    pub fn visible_objects(&self) -> impl Iterator<Item = &DrawingObject> {
        self.objects.iter().filter(|o| self.is_layer_visible(o.layer))
    }

    pub fn serialize(&self) -> Result<String, ModelError> {
        let state = DocumentState {
            objects: self.objects.clone(),
            layers: self.layers.clone(),
            active_layer: self.active_layer,
            ids: self.ids,
        };
        Ok(serde_json::to_string(&state)?)
    }

    /// Replaces the whole content with a previously serialized state.
    ///
    /// The selection survives if the selected object still exists, and the id
    /// counter never moves backwards.
    pub fn deserialize(&mut self, json: &str) -> Result<(), ModelError> {
        let state: DocumentState = serde_json::from_str(json)?;

        self.objects = state.objects;
        self.layers = if state.layers.is_empty() {
            vec![Layer::default()]
        } else {
            state.layers
        };
        self.active_layer = state.active_layer.min(self.layers.len() - 1);
        self.ids.advance_past(&state.ids);
        if let Some(id) = self.active_object {
            if self.object(id).is_none() {
                self.active_object = None;
            }
        }
        Ok(())
    }
}
