//! Pointer events delivered by the host surface.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Pointer event in plan coordinates.
///
/// The host maps its own coordinates into plan space before forwarding;
/// the editor never sees screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PointerEvent {
    Down {
        position: Point,
        #[serde(default)]
        button: PointerButton,
    },
    Move {
        position: Point,
    },
    Up {
        position: Point,
        #[serde(default)]
        button: PointerButton,
    },
}

impl PointerEvent {
    pub fn down(position: Point) -> Self {
        PointerEvent::Down {
            position,
            button: PointerButton::Primary,
        }
    }

    pub fn moved(position: Point) -> Self {
        PointerEvent::Move { position }
    }

    pub fn up(position: Point) -> Self {
        PointerEvent::Up {
            position,
            button: PointerButton::Primary,
        }
    }

    pub fn position(&self) -> Point {
        match *self {
            PointerEvent::Down { position, .. }
            | PointerEvent::Move { position }
            | PointerEvent::Up { position, .. } => position,
        }
    }
}
