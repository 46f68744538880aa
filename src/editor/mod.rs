//! One in-progress landmark drawing.
//!
//! An [`EditorSession`] owns the document, its undo history, the tool state
//! machine and the view. Every committed change records a history snapshot;
//! transient gesture state (a stroke being dragged, a pan) never does.

mod viewport;

use egui::{Color32, Pos2, Vec2};
use image::RgbaImage;
use log::{debug, info};

use crate::codec::{RasterCodec, RasterPayload};
use crate::config::EditorConfig;
use crate::document::Document;
use crate::element::{
    BrushType, DrawingObject, Fill, ObjectDraft, ObjectId, ObjectPatch, Shape, ShapeKind, TextStyle, factory,
};
use crate::error::{CodecError, EditorError, ModelError};
use crate::filter::Filter;
use crate::geo::GeoPoint;
use crate::history::{History, Snapshot};
use crate::input::PointerEvent;
use crate::renderer;
use crate::tool::{BrushSettings, Tool, ToolAction, ToolMachine, ToolState};

pub use viewport::Viewport;

pub struct EditorSession {
    location: GeoPoint,
    config: EditorConfig,
    document: Document,
    history: History,
    tools: ToolMachine,
    viewport: Viewport,
    /// Last pointer position seen, in screen space
    last_pointer: Option<Pos2>,
}

impl std::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession")
            .field("location", &self.location)
            .field("objects", &self.document.len())
            .field("history", &self.history.cursor())
            .field("tool", &self.tools.tool())
            .finish()
    }
}

impl EditorSession {
    /// Starts an empty drawing for `location`
    pub fn open(location: GeoPoint, config: EditorConfig) -> Result<Self, EditorError> {
        let document = Document::new();
        let history = History::new(Snapshot::new(document.serialize()?));
        let tools = ToolMachine::new(
            config.brush,
            config.fill,
            config.text_style.clone(),
            config.background,
        );
        info!(
            "🗺️ Opened editor at ({:.4}, {:.4}), canvas {}x{}",
            location.latitude, location.longitude, config.canvas_width, config.canvas_height
        );
        Ok(Self {
            location,
            config,
            document,
            history,
            tools,
            viewport: Viewport::default(),
            last_pointer: None,
        })
    }

    /// Ends the session. All objects are released either way; `discard` only
    /// records whether the drawing was thrown away or saved.
    pub fn close(self, discard: bool) {
        if discard {
            info!("🗑️ Discarded drawing with {} objects", self.document.len());
        } else {
            info!("📦 Closed editor after save");
        }
    }

    pub fn location(&self) -> GeoPoint {
        self.location
    }

    pub(crate) fn relocate(&mut self, location: GeoPoint) {
        debug!(
            "📍 Moved pending landmark to ({:.4}, {:.4})",
            location.latitude, location.longitude
        );
        self.location = location;
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Records the current document as a new history step
    fn commit(&mut self) -> Result<(), EditorError> {
        let state = self.document.serialize()?;
        self.history.snapshot(Snapshot::new(state));
        Ok(())
    }

    fn active_id(&self) -> Result<ObjectId, EditorError> {
        self.document
            .active_object_id()
            .ok_or(EditorError::Model(ModelError::NoActiveSelection))
    }

    // ---- Editing -------------------------------------------------------

    pub fn add_object(&mut self, draft: ObjectDraft) -> Result<ObjectId, EditorError> {
        let id = self.document.add_object(draft);
        self.commit()?;
        Ok(id)
    }

    /// Places a default-sized shape with its top-left corner at `at` (canvas space)
    pub fn add_shape(&mut self, kind: ShapeKind, at: Pos2) -> Result<ObjectId, EditorError> {
        let draft = factory::shape(Shape::default_of(kind), at, self.tools.shape_style());
        self.add_object(draft)
    }

    pub fn add_text(&mut self, content: &str, at: Pos2) -> Result<ObjectId, EditorError> {
        let draft = factory::text(content, self.tools.text_style().clone(), at, self.tools.fill());
        self.add_object(draft)
    }

    pub fn add_image(&mut self, bitmap: RgbaImage, at: Pos2) -> Result<ObjectId, EditorError> {
        self.add_object(factory::image(bitmap, at))
    }

    /// Decodes an encoded image file (PNG, JPEG, ...) and places it
    pub fn add_image_bytes(&mut self, bytes: &[u8], at: Pos2) -> Result<ObjectId, EditorError> {
        let bitmap = image::load_from_memory(bytes)
            .map_err(CodecError::from)?
            .to_rgba8();
        debug!("🖼️ Decoded {}x{} image", bitmap.width(), bitmap.height());
        self.add_image(bitmap, at)
    }

    pub fn remove_active(&mut self) -> Result<DrawingObject, EditorError> {
        let id = self.active_id()?;
        let removed = self.document.remove_object(id)?;
        self.commit()?;
        Ok(removed)
    }

    pub fn update_active(&mut self, patch: &ObjectPatch) -> Result<(), EditorError> {
        let id = self.active_id()?;
        self.document.update_object(id, patch)?;
        self.commit()
    }

    /// Replaces the filter list of the active object
    pub fn apply_filters(&mut self, filters: Vec<Filter>) -> Result<(), EditorError> {
        let id = self.active_id()?;
        self.document.apply_filters(id, filters)?;
        self.commit()
    }

    pub fn select(&mut self, id: ObjectId) -> Result<(), EditorError> {
        Ok(self.document.select(id)?)
    }

    /// Selects the topmost object at a canvas position
    pub fn select_at(&mut self, canvas_pos: Pos2) -> Option<ObjectId> {
        self.document.select_at(canvas_pos)
    }

    pub fn clear(&mut self) -> Result<(), EditorError> {
        self.document.clear();
        self.commit()
    }

    // ---- Layers --------------------------------------------------------

    pub fn add_layer(&mut self, name: &str) -> Result<usize, EditorError> {
        let index = self.document.add_layer(name);
        self.commit()?;
        Ok(index)
    }

    pub fn set_layer_visible(&mut self, index: usize, visible: bool) -> Result<(), EditorError> {
        self.document.set_layer_visible(index, visible)?;
        self.commit()
    }

    pub fn toggle_layer(&mut self, index: usize) -> Result<bool, EditorError> {
        let visible = self.document.toggle_layer(index)?;
        self.commit()?;
        Ok(visible)
    }

    /// Picks the layer new objects are added to; not an undoable change
    pub fn set_active_layer(&mut self, index: usize) -> Result<(), EditorError> {
        Ok(self.document.set_active_layer(index)?)
    }

    // ---- Tools ---------------------------------------------------------

    pub fn tool(&self) -> Tool {
        self.tools.tool()
    }

    pub fn tool_state(&self) -> &ToolState {
        self.tools.state()
    }

    /// Switches tools, committing any gesture that was in progress
    pub fn select_tool(&mut self, tool: Tool) -> Result<Option<ObjectId>, EditorError> {
        match self.tools.select_tool(tool) {
            Some(draft) => self.add_object(draft).map(Some),
            None => Ok(None),
        }
    }

    pub fn brush(&self) -> &BrushSettings {
        self.tools.brush()
    }

    pub fn set_brush_color(&mut self, color: Color32) {
        self.tools.brush_mut().set_color(color);
    }

    pub fn set_brush_width(&mut self, width: f32) {
        self.tools.brush_mut().set_width(width);
    }

    pub fn set_brush_type(&mut self, brush_type: BrushType) {
        self.tools.brush_mut().set_brush_type(brush_type);
    }

    pub fn set_spray_density(&mut self, density: f32) {
        self.tools.brush_mut().set_spray_density(density);
    }

    pub fn set_fill(&mut self, fill: Fill) {
        self.tools.set_fill(fill);
    }

    pub fn set_text_style(&mut self, style: TextStyle) {
        self.tools.set_text_style(style);
    }

    // ---- Pointer input -------------------------------------------------

    /// Panning works on raw screen positions, everything else on the canvas
    fn tool_space(&self, screen: Pos2) -> Pos2 {
        if self.tools.state().is_panning() {
            screen
        } else {
            self.viewport.screen_to_canvas(screen)
        }
    }

    fn apply_action(&mut self, action: ToolAction) -> Result<Option<ObjectId>, EditorError> {
        match action {
            ToolAction::None => Ok(None),
            ToolAction::Commit(draft) => self.add_object(draft).map(Some),
            ToolAction::SelectAt(pos) => Ok(self.document.select_at(pos)),
            ToolAction::Pan(delta) => {
                self.viewport.pan_by(delta);
                Ok(None)
            }
        }
    }

    /// Returns the id of an object the event committed, if any
    pub fn pointer_down(&mut self, screen: Pos2) -> Result<Option<ObjectId>, EditorError> {
        self.last_pointer = Some(screen);
        let pos = self.tool_space(screen);
        let action = self.tools.pointer_down(pos);
        self.apply_action(action)
    }

    pub fn pointer_move(&mut self, screen: Pos2) -> Result<Option<ObjectId>, EditorError> {
        self.last_pointer = Some(screen);
        let pos = self.tool_space(screen);
        let action = self.tools.pointer_move(pos);
        self.apply_action(action)
    }

    pub fn pointer_up(&mut self, screen: Pos2) -> Result<Option<ObjectId>, EditorError> {
        self.last_pointer = Some(screen);
        let pos = self.tool_space(screen);
        let action = self.tools.pointer_up(pos);
        self.apply_action(action)
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> Result<Option<ObjectId>, EditorError> {
        if !event.is_primary() {
            return Ok(None);
        }
        match event {
            PointerEvent::Down { pos, .. } => self.pointer_down(pos),
            PointerEvent::Move { pos } => self.pointer_move(pos),
            PointerEvent::Up { pos, .. } => self.pointer_up(pos),
            PointerEvent::Leave => match self.last_pointer {
                Some(pos) if self.tools.state().in_gesture() => self.pointer_up(pos),
                _ => Ok(None),
            },
        }
    }

    // ---- History -------------------------------------------------------

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo(&mut self) -> Result<(), EditorError> {
        let snapshot = self.history.undo()?.clone();
        self.document.deserialize(snapshot.as_str())?;
        Ok(())
    }

    pub fn redo(&mut self) -> Result<(), EditorError> {
        let snapshot = self.history.redo()?.clone();
        self.document.deserialize(snapshot.as_str())?;
        Ok(())
    }

    // ---- View ----------------------------------------------------------

    pub fn zoom(&self) -> f32 {
        self.viewport.zoom()
    }

    pub fn set_zoom(&mut self, zoom: f32) -> f32 {
        self.viewport.set_zoom(zoom)
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.viewport.set_zoom(self.viewport.zoom() * self.config.zoom_step)
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.viewport.set_zoom(self.viewport.zoom() / self.config.zoom_step)
    }

    pub fn pan_by(&mut self, delta: Vec2) {
        self.viewport.pan_by(delta);
    }

    pub fn reset_view(&mut self) {
        self.viewport.reset();
    }

    // ---- Output --------------------------------------------------------

    /// Flattens the document at the canvas's native resolution
    pub fn export_raster(&self) -> Result<RgbaImage, EditorError> {
        let image = renderer::render(
            &self.document,
            self.config.canvas_width,
            self.config.canvas_height,
            self.config.background,
        )?;
        info!("🖨️ Exported {}x{} raster", image.width(), image.height());
        Ok(image)
    }

    pub fn export_payload(&self, codec: &dyn RasterCodec) -> Result<RasterPayload, EditorError> {
        let image = self.export_raster()?;
        Ok(codec.encode(&image)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> EditorSession {
        EditorSession::open(GeoPoint::new(1.0, 2.0), EditorConfig::default()).unwrap()
    }

    #[test]
    fn open_seeds_history_with_empty_document() {
        let editor = session();
        assert!(editor.document().is_empty());
        assert_eq!(editor.history().len(), 1);
        assert!(!editor.can_undo());
    }

    #[test]
    fn filter_without_selection_is_rejected() {
        let mut editor = session();
        let err = editor.apply_filters(vec![Filter::Invert]).unwrap_err();
        assert!(matches!(err, EditorError::Model(ModelError::NoActiveSelection)));
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn pointer_positions_follow_the_viewport() {
        let mut editor = session();
        editor.set_zoom(2.0);
        editor.select_tool(Tool::Shape(ShapeKind::Rect)).unwrap();
        editor.pointer_down(Pos2::new(40.0, 40.0)).unwrap();
        let id = editor.pointer_up(Pos2::new(40.0, 40.0)).unwrap().unwrap();
        let object = editor.document().object(id).unwrap();
        assert_eq!(object.transform.position, Pos2::new(20.0, 20.0));
    }

    #[test]
    fn pan_tool_moves_view_without_history() {
        let mut editor = session();
        editor.select_tool(Tool::Pan).unwrap();
        editor.pointer_down(Pos2::new(0.0, 0.0)).unwrap();
        editor.pointer_move(Pos2::new(10.0, 5.0)).unwrap();
        editor.pointer_up(Pos2::new(10.0, 5.0)).unwrap();
        assert_eq!(editor.viewport().pan(), Vec2::new(10.0, 5.0));
        assert_eq!(editor.history().len(), 1);
    }

    #[test]
    fn leaving_canvas_finishes_stroke() {
        let mut editor = session();
        editor.select_tool(Tool::Brush).unwrap();
        editor.handle_pointer(PointerEvent::down(Pos2::new(5.0, 5.0))).unwrap();
        editor.handle_pointer(PointerEvent::moved(Pos2::new(25.0, 5.0))).unwrap();
        let committed = editor.handle_pointer(PointerEvent::Leave).unwrap();
        assert!(committed.is_some());
        assert_eq!(editor.document().len(), 1);
    }
}
