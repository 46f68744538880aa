//! Gesture state of the active tool.
//!
//! Each tool has a resting state and, while the pointer is held down, an
//! in-progress gesture stored inside that state. Switching to another state
//! is only allowed once the gesture has been committed or dropped:
//!
//! ```text
//!   Idle ◄──► Drawing ◄──► Erasing ◄──► PlacingShape ◄──► PlacingText ◄──► Panning
//!    (any resting state may move to any other resting state)
//! ```
use egui::Pos2;

use crate::element::ShapeKind;
use crate::tool::brush::StrokeBuilder;

#[derive(Debug, Clone)]
pub enum ToolState {
    /// Select tool: clicks pick the topmost object
    Idle,
    Drawing {
        stroke: Option<StrokeBuilder>,
    },
    Erasing {
        stroke: Option<StrokeBuilder>,
    },
    PlacingShape {
        kind: ShapeKind,
        /// Anchor and current corner of the drag
        drag: Option<(Pos2, Pos2)>,
    },
    PlacingText,
    Panning {
        /// Last pointer position of the drag, in screen space
        last: Option<Pos2>,
    },
}

impl PartialEq for ToolState {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ToolState::Idle, ToolState::Idle) => true,
            (ToolState::Drawing { stroke: a }, ToolState::Drawing { stroke: b })
            | (ToolState::Erasing { stroke: a }, ToolState::Erasing { stroke: b }) => {
                // In-progress strokes compare by their points only
                a.as_ref().map(StrokeBuilder::points) == b.as_ref().map(StrokeBuilder::points)
            }
            (
                ToolState::PlacingShape { kind: k1, drag: d1 },
                ToolState::PlacingShape { kind: k2, drag: d2 },
            ) => k1 == k2 && d1 == d2,
            (ToolState::PlacingText, ToolState::PlacingText) => true,
            (ToolState::Panning { last: a }, ToolState::Panning { last: b }) => a == b,
            _ => false,
        }
    }
}

impl ToolState {
    /// Validates whether a transition to the new state is allowed
    pub fn can_transition_to(&self, new_state: &ToolState) -> bool {
        if new_state.in_gesture() {
            // Gestures only start from the resting state of the same tool
            return !self.in_gesture() && std::mem::discriminant(self) == std::mem::discriminant(new_state);
        }
        // Leaving a gesture is the commit or drop of that gesture
        true
    }

    /// Returns true while the pointer is held down in a gesture
    pub fn in_gesture(&self) -> bool {
        match self {
            ToolState::Idle | ToolState::PlacingText => false,
            ToolState::Drawing { stroke } | ToolState::Erasing { stroke } => stroke.is_some(),
            ToolState::PlacingShape { drag, .. } => drag.is_some(),
            ToolState::Panning { last } => last.is_some(),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, ToolState::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, ToolState::Drawing { .. })
    }

    pub fn is_erasing(&self) -> bool {
        matches!(self, ToolState::Erasing { .. })
    }

    pub fn is_placing_shape(&self) -> bool {
        matches!(self, ToolState::PlacingShape { .. })
    }

    pub fn is_placing_text(&self) -> bool {
        matches!(self, ToolState::PlacingText)
    }

    pub fn is_panning(&self) -> bool {
        matches!(self, ToolState::Panning { .. })
    }

    /// The stroke being drawn or erased, if any
    pub fn stroke_in_progress(&self) -> Option<&StrokeBuilder> {
        match self {
            ToolState::Drawing { stroke } | ToolState::Erasing { stroke } => stroke.as_ref(),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolState::Idle => "idle",
            ToolState::Drawing { .. } => "drawing",
            ToolState::Erasing { .. } => "erasing",
            ToolState::PlacingShape { .. } => "placing shape",
            ToolState::PlacingText => "placing text",
            ToolState::Panning { .. } => "panning",
        }
    }
}
