pub mod brush;
mod state;

use egui::{Color32, Pos2, Vec2};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::element::{
    BrushType, DEFAULT_TEXT, Fill, ObjectDraft, Shape, ShapeKind, Style, TextStyle, factory,
};

pub use brush::{BrushSettings, StrokeBuilder};
pub use state::ToolState;

/// Tools the user can pick
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Select,
    Brush,
    Eraser,
    Shape(ShapeKind),
    Text,
    Pan,
}

impl Tool {
    pub fn name(&self) -> &'static str {
        match self {
            Tool::Select => "Select",
            Tool::Brush => "Brush",
            Tool::Eraser => "Eraser",
            Tool::Shape(ShapeKind::Rect) => "Rectangle",
            Tool::Shape(ShapeKind::Circle) => "Circle",
            Tool::Shape(ShapeKind::Triangle) => "Triangle",
            Tool::Text => "Text",
            Tool::Pan => "Pan",
        }
    }

    /// The resting state this tool puts the machine in
    fn resting_state(self) -> ToolState {
        match self {
            Tool::Select => ToolState::Idle,
            Tool::Brush => ToolState::Drawing { stroke: None },
            Tool::Eraser => ToolState::Erasing { stroke: None },
            Tool::Shape(kind) => ToolState::PlacingShape { kind, drag: None },
            Tool::Text => ToolState::PlacingText,
            Tool::Pan => ToolState::Panning { last: None },
        }
    }
}

/// What the editor has to do in response to a pointer event
#[derive(Debug, Clone, PartialEq)]
pub enum ToolAction {
    None,
    /// Add the object to the document and snapshot history
    Commit(ObjectDraft),
    /// Select the topmost object under the point (canvas space)
    SelectAt(Pos2),
    /// Move the viewport by a screen-space delta
    Pan(Vec2),
}

/// Turns pointer input into document edits for the active tool.
///
/// Positions are canvas coordinates, except while panning where they are
/// screen coordinates so the drag does not chase its own offset.
#[derive(Debug, Clone)]
pub struct ToolMachine {
    tool: Tool,
    state: ToolState,
    brush: BrushSettings,
    fill: Fill,
    text_style: TextStyle,
    background: Color32,
    strokes_started: u32,
}

impl ToolMachine {
    pub fn new(brush: BrushSettings, fill: Fill, text_style: TextStyle, background: Color32) -> Self {
        Self {
            tool: Tool::default(),
            state: ToolState::Idle,
            brush: brush.sanitized(),
            fill,
            text_style: text_style.clamped(),
            background,
            strokes_started: 0,
        }
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn state(&self) -> &ToolState {
        &self.state
    }

    pub fn brush(&self) -> &BrushSettings {
        &self.brush
    }

    pub fn brush_mut(&mut self) -> &mut BrushSettings {
        &mut self.brush
    }

    pub fn fill(&self) -> Fill {
        self.fill
    }

    pub fn set_fill(&mut self, fill: Fill) {
        self.fill = fill;
    }

    pub fn text_style(&self) -> &TextStyle {
        &self.text_style
    }

    pub fn set_text_style(&mut self, style: TextStyle) {
        self.text_style = style.clamped();
    }

    /// Style for newly placed shapes
    pub fn shape_style(&self) -> Style {
        Style {
            stroke: self.brush.color,
            fill: self.fill,
            stroke_width: self.brush.width,
        }
    }

    /// Switches tools. A gesture in progress is finished first and its
    /// result returned so it can be committed.
    pub fn select_tool(&mut self, tool: Tool) -> Option<ObjectDraft> {
        let pending = self.finish_gesture();
        let next = tool.resting_state();
        debug_assert!(self.state.can_transition_to(&next));
        debug!("🔧 Tool {} -> {} ({})", self.tool.name(), tool.name(), next.name());
        self.tool = tool;
        self.state = next;
        pending
    }

    fn transition(&mut self, next: ToolState) {
        if self.state.can_transition_to(&next) {
            self.state = next;
        } else {
            debug!("🚫 Ignoring transition {} -> {}", self.state.name(), next.name());
        }
    }

    fn next_seed(&mut self) -> u32 {
        self.strokes_started = self.strokes_started.wrapping_add(1);
        self.strokes_started
    }

    pub fn pointer_down(&mut self, pos: Pos2) -> ToolAction {
        if self.state.in_gesture() {
            // A down without an up; keep the current gesture going
            self.pointer_move(pos);
            return ToolAction::None;
        }
        match self.state {
            ToolState::Idle => ToolAction::SelectAt(pos),
            ToolState::Drawing { .. } => {
                let seed = self.next_seed();
                let stroke = StrokeBuilder::begin(self.brush, pos, seed);
                self.transition(ToolState::Drawing { stroke: Some(stroke) });
                ToolAction::None
            }
            ToolState::Erasing { .. } => {
                let seed = self.next_seed();
                let eraser = BrushSettings {
                    color: self.background,
                    brush_type: BrushType::Pencil,
                    ..self.brush
                };
                let stroke = StrokeBuilder::begin(eraser, pos, seed);
                self.transition(ToolState::Erasing { stroke: Some(stroke) });
                ToolAction::None
            }
            ToolState::PlacingShape { kind, .. } => {
                self.transition(ToolState::PlacingShape {
                    kind,
                    drag: Some((pos, pos)),
                });
                ToolAction::None
            }
            ToolState::PlacingText => ToolAction::Commit(factory::text(
                DEFAULT_TEXT,
                self.text_style.clone(),
                pos,
                self.fill,
            )),
            ToolState::Panning { .. } => {
                self.transition(ToolState::Panning { last: Some(pos) });
                ToolAction::None
            }
        }
    }

    pub fn pointer_move(&mut self, pos: Pos2) -> ToolAction {
        match &mut self.state {
            ToolState::Drawing { stroke: Some(stroke) } | ToolState::Erasing { stroke: Some(stroke) } => {
                stroke.extend(pos);
                ToolAction::None
            }
            ToolState::PlacingShape {
                drag: Some((_, current)),
                ..
            } => {
                *current = pos;
                ToolAction::None
            }
            ToolState::Panning { last: Some(last) } => {
                let delta = pos - *last;
                *last = pos;
                if delta == Vec2::ZERO {
                    ToolAction::None
                } else {
                    ToolAction::Pan(delta)
                }
            }
            _ => ToolAction::None,
        }
    }

    pub fn pointer_up(&mut self, pos: Pos2) -> ToolAction {
        let moved = self.pointer_move(pos);
        match self.finish_gesture() {
            Some(draft) => ToolAction::Commit(draft),
            None => moved,
        }
    }

    /// Ends the gesture in progress, returning the object it produced
    fn finish_gesture(&mut self) -> Option<ObjectDraft> {
        let rest = self.tool.resting_state();
        match std::mem::replace(&mut self.state, rest) {
            ToolState::Drawing { stroke: Some(stroke) } | ToolState::Erasing { stroke: Some(stroke) } => {
                stroke.finish()
            }
            ToolState::PlacingShape {
                kind,
                drag: Some((anchor, current)),
            } => {
                let shape = Shape::from_drag(kind, current - anchor);
                let top_left = anchor.min(current);
                Some(factory::shape(shape, top_left, self.shape_style()))
            }
            _ => None,
        }
    }
}

impl Default for ToolMachine {
    fn default() -> Self {
        Self::new(
            BrushSettings::default(),
            Fill::None,
            TextStyle::default(),
            Color32::WHITE,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ObjectKind;

    fn drag(machine: &mut ToolMachine, from: Pos2, to: Pos2) -> ToolAction {
        machine.pointer_down(from);
        machine.pointer_move(from + (to - from) / 2.0);
        machine.pointer_up(to)
    }

    #[test]
    fn brush_drag_commits_one_stroke() {
        let mut machine = ToolMachine::default();
        machine.select_tool(Tool::Brush);
        let action = drag(&mut machine, Pos2::new(10.0, 10.0), Pos2::new(60.0, 40.0));
        let ToolAction::Commit(draft) = action else {
            panic!("expected a stroke, got {action:?}");
        };
        assert!(matches!(draft.kind, ObjectKind::Stroke(_)));
        assert!(!machine.state().in_gesture());
    }

    #[test]
    fn eraser_paints_background() {
        let mut machine = ToolMachine::default();
        machine.brush_mut().set_color(Color32::RED);
        machine.select_tool(Tool::Eraser);
        let ToolAction::Commit(draft) = drag(&mut machine, Pos2::ZERO, Pos2::new(30.0, 0.0)) else {
            panic!("eraser produced nothing");
        };
        assert_eq!(draft.style.stroke, Color32::WHITE);
    }

    #[test]
    fn text_click_places_default_text() {
        let mut machine = ToolMachine::default();
        machine.set_text_style(TextStyle {
            font_size: 9000.0,
            ..Default::default()
        });
        machine.select_tool(Tool::Text);
        let ToolAction::Commit(draft) = machine.pointer_down(Pos2::new(30.0, 40.0)) else {
            panic!("no text placed");
        };
        let ObjectKind::Text(text) = &draft.kind else {
            panic!("expected text, got {:?}", draft.kind);
        };
        assert_eq!(text.content, DEFAULT_TEXT);
        assert_eq!(text.style.font_size, crate::element::MAX_FONT_SIZE);
        assert_eq!(draft.transform.position, Pos2::new(30.0, 40.0));
        assert_eq!(machine.pointer_up(Pos2::new(30.0, 40.0)), ToolAction::None);
    }

    #[test]
    fn shape_click_uses_default_size() {
        let mut machine = ToolMachine::default();
        machine.select_tool(Tool::Shape(ShapeKind::Circle));
        machine.pointer_down(Pos2::new(5.0, 5.0));
        let ToolAction::Commit(draft) = machine.pointer_up(Pos2::new(5.0, 5.0)) else {
            panic!("no shape placed");
        };
        assert_eq!(draft.kind, ObjectKind::Shape(Shape::Circle { radius: 50.0 }));
    }

    #[test]
    fn shape_drag_is_normalized_to_top_left() {
        let mut machine = ToolMachine::default();
        machine.select_tool(Tool::Shape(ShapeKind::Rect));
        let ToolAction::Commit(draft) = drag(&mut machine, Pos2::new(80.0, 90.0), Pos2::new(20.0, 30.0)) else {
            panic!("no shape placed");
        };
        assert_eq!(draft.transform.position, Pos2::new(20.0, 30.0));
        assert_eq!(
            draft.kind,
            ObjectKind::Shape(Shape::Rect {
                width: 60.0,
                height: 60.0
            })
        );
    }

    #[test]
    fn switching_tools_commits_pending_stroke() {
        let mut machine = ToolMachine::default();
        machine.select_tool(Tool::Brush);
        machine.pointer_down(Pos2::ZERO);
        machine.pointer_move(Pos2::new(20.0, 20.0));
        assert!(machine.select_tool(Tool::Text).is_some());
        assert!(machine.state().is_placing_text());
    }

    #[test]
    fn pan_reports_deltas() {
        let mut machine = ToolMachine::default();
        machine.select_tool(Tool::Pan);
        machine.pointer_down(Pos2::new(10.0, 10.0));
        assert_eq!(machine.pointer_move(Pos2::new(15.0, 7.0)), ToolAction::Pan(Vec2::new(5.0, -3.0)));
        assert_eq!(machine.pointer_up(Pos2::new(15.0, 7.0)), ToolAction::None);
    }

    #[test]
    fn select_tool_click_selects() {
        let mut machine = ToolMachine::default();
        assert_eq!(machine.pointer_down(Pos2::new(3.0, 4.0)), ToolAction::SelectAt(Pos2::new(3.0, 4.0)));
    }
}
