#![forbid(unsafe_code)]

//! Touch events delivered to the mask overlay.

use crate::geometry::Point;

/// Phase of a touch gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    /// Finger down.
    Start,
    /// Finger moved while down.
    Move,
    /// Finger lifted. The overlay acts on this phase only.
    End,
    /// Gesture taken over by the host (scroll, system gesture).
    Cancel,
}

/// A single-finger touch event in page (viewport) coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    pub phase: TouchPhase,
    /// X coordinate relative to the viewport.
    pub page_x: f64,
    /// Y coordinate relative to the viewport.
    pub page_y: f64,
}

impl TouchEvent {
    /// Create a new touch event.
    #[must_use]
    pub const fn new(phase: TouchPhase, page_x: f64, page_y: f64) -> Self {
        Self {
            phase,
            page_x,
            page_y,
        }
    }

    /// Shorthand for a touch-end event.
    #[must_use]
    pub const fn end(page_x: f64, page_y: f64) -> Self {
        Self::new(TouchPhase::End, page_x, page_y)
    }

    /// The touch position as a point.
    #[inline]
    pub const fn point(&self) -> Point {
        Point::new(self.page_x, self.page_y)
    }

    /// Whether this event ends the gesture.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.phase == TouchPhase::End
    }
}
