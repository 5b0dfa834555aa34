// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pointer-drag input for interactive transitions.

use kurbo::{Point, Vec2};

/// Stage of a drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragPhase {
    /// The drag was recognized.
    Began,
    /// The pointer moved.
    Changed,
    /// The pointer was released.
    Ended,
    /// The platform cancelled the drag.
    Cancelled,
}

/// One drag sample, in window space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DragGesture {
    /// Stage of the drag.
    pub phase: DragPhase,
    /// Offset from where the drag began.
    pub translation: Vec2,
    /// Current velocity in points per second.
    pub velocity: Vec2,
    /// Current pointer location.
    pub location: Point,
}

impl DragGesture {
    /// Creates a sample.
    #[must_use]
    pub fn new(phase: DragPhase, translation: Vec2, velocity: Vec2, location: Point) -> Self {
        Self {
            phase,
            translation,
            velocity,
            location,
        }
    }

    /// Returns whether the drag is over.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        matches!(self.phase, DragPhase::Ended | DragPhase::Cancelled)
    }
}

/// What the host should do after a drag sample or tap was handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragOutcome {
    /// The input did not concern the transition.
    Ignored,
    /// The transition is following the input.
    Tracking,
    /// Start an interactive dismissal of the foreground screen.
    RequestDismiss,
    /// The drag was released and the transition runs on its own again.
    Released {
        /// Whether it runs to the presented state of the current session.
        should_finish: bool,
    },
}
