//! Gesture and pen events delivered to the editor.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Phase of a pan gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PanPhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// A recognized gesture on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Gesture {
    Tap {
        location: Point,
    },
    /// `translation` is the total offset since the pan began.
    Pan {
        phase: PanPhase,
        translation: Vec2,
    },
}

impl Gesture {
    pub fn tap(x: f64, y: f64) -> Self {
        Gesture::Tap {
            location: Point::new(x, y),
        }
    }

    pub fn pan(phase: PanPhase, dx: f64, dy: f64) -> Self {
        Gesture::Pan {
            phase,
            translation: Vec2::new(dx, dy),
        }
    }
}

/// Raw pen input, forwarded to the surface's tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PenEvent {
    Down { position: Point },
    Move { position: Point },
    Up { position: Point },
    Cancel,
}
