use egui::{PointerButton, Pos2};

/// Pointer input delivered to an editor session, in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// Button was pressed
    Down { pos: Pos2, button: PointerButton },
    /// Pointer moved, with or without a button held
    Move { pos: Pos2 },
    /// Button was released
    Up { pos: Pos2, button: PointerButton },
    /// Pointer left the canvas; any gesture ends where it was last seen
    Leave,
}

impl PointerEvent {
    /// Primary-button press at `pos`
    pub fn down(pos: Pos2) -> Self {
        Self::Down {
            pos,
            button: PointerButton::Primary,
        }
    }

    pub fn moved(pos: Pos2) -> Self {
        Self::Move { pos }
    }

    /// Primary-button release at `pos`
    pub fn up(pos: Pos2) -> Self {
        Self::Up {
            pos,
            button: PointerButton::Primary,
        }
    }

    pub fn position(&self) -> Option<Pos2> {
        match self {
            PointerEvent::Down { pos, .. } | PointerEvent::Move { pos } | PointerEvent::Up { pos, .. } => {
                Some(*pos)
            }
            PointerEvent::Leave => None,
        }
    }

    /// Only the primary button drives tools
    pub fn is_primary(&self) -> bool {
        match self {
            PointerEvent::Down { button, .. } | PointerEvent::Up { button, .. } => {
                *button == PointerButton::Primary
            }
            PointerEvent::Move { .. } | PointerEvent::Leave => true,
        }
    }
}
