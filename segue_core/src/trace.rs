// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tracing and diagnostics for transition sessions.
//!
//! This module provides a [`TraceSink`] trait with per-event methods that the
//! transition engine calls as a session moves through its phases. All method
//! bodies default to no-ops, so implementing only the events you care about
//! is fine.
//!
//! [`Tracer`] wraps an optional boxed [`TraceSink`]. When the `trace` feature
//! is **off**, every `Tracer` method compiles to nothing. When **on**, each
//! method performs a single `Option` branch before dispatching.
//!
//! Every event carries the session counter and `at`, the animation time
//! accumulated by `tick` since the session began.
//!
//! # Crate features
//!
//! - `trace`: enables the `Tracer` method bodies (one branch per call).

use core::time::Duration;

use crate::state::SnapshotType;
use crate::transition::Phase;
use crate::view::ViewId;

// ---------------------------------------------------------------------------
// Event structs
// ---------------------------------------------------------------------------

/// Emitted when `animate_transition` starts a session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionBeginEvent {
    /// Monotonic session counter.
    pub session: u64,
    /// Name of the transition variant.
    pub variant: &'static str,
    /// Whether the session presents (as opposed to dismisses).
    pub presenting: bool,
    /// Whether the session started interactive.
    pub interactive: bool,
    /// Nominal animation duration.
    pub duration: Duration,
}

/// Emitted whenever the state machine changes phase.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseChangeEvent {
    /// Session counter.
    pub session: u64,
    /// Session time.
    pub at: Duration,
    /// Phase left.
    pub from: Phase,
    /// Phase entered.
    pub to: Phase,
}

/// Emitted once the hero matching pass has resolved both screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewsMatchedEvent {
    /// Session counter.
    pub session: u64,
    /// Views with a non-empty resolved state, both sides.
    pub participants: usize,
    /// Background views whose `match` resolved to a foreground view.
    pub matched_pairs: usize,
}

/// Emitted for every proxy created for a participating view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SnapshotEvent {
    /// Session counter.
    pub session: u64,
    /// The participating view.
    pub view: ViewId,
    /// The proxy standing in for it.
    pub proxy: ViewId,
    /// How the proxy was produced.
    pub snapshot_type: SnapshotType,
}

/// Emitted when an interaction starts or ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InteractionEvent {
    /// Session counter.
    pub session: u64,
    /// Session time.
    pub at: Duration,
    /// Fraction complete when the event fired.
    pub fraction: f64,
    /// For the end of an interaction, whether it will finish.
    pub should_finish: Option<bool>,
}

/// Emitted when `animation_ended` clears the session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SessionEndEvent {
    /// Session counter.
    pub session: u64,
    /// Session time.
    pub at: Duration,
    /// Whether the transition completed rather than being cancelled.
    pub finished: bool,
}

// ---------------------------------------------------------------------------
// TraceSink trait
// ---------------------------------------------------------------------------

/// Receives trace events from the transition engine.
///
/// All methods have default no-op implementations, so you only need to
/// override the events you care about.
pub trait TraceSink {
    /// Called when a session begins.
    fn on_session_begin(&mut self, e: &SessionBeginEvent) {
        _ = e;
    }

    /// Called on every phase change.
    fn on_phase_change(&mut self, e: &PhaseChangeEvent) {
        _ = e;
    }

    /// Called after hero matching.
    fn on_views_matched(&mut self, e: &ViewsMatchedEvent) {
        _ = e;
    }

    /// Called for every proxy created.
    fn on_snapshot(&mut self, e: &SnapshotEvent) {
        _ = e;
    }

    /// Called when an interaction begins.
    fn on_interaction_begin(&mut self, e: &InteractionEvent) {
        _ = e;
    }

    /// Called when an interaction ends.
    fn on_interaction_end(&mut self, e: &InteractionEvent) {
        _ = e;
    }

    /// Called when a session ends.
    fn on_session_end(&mut self, e: &SessionEndEvent) {
        _ = e;
    }
}

// ---------------------------------------------------------------------------
// NoopSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that discards all events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {}

// ---------------------------------------------------------------------------
// Tracer wrapper
// ---------------------------------------------------------------------------

/// Thin wrapper around an optional [`TraceSink`].
///
/// When the `trace` feature is **off**, every method compiles to nothing and
/// the sink passed to [`new`](Self::new) is dropped. When **on**, each method
/// checks the inner `Option` (one branch) before dispatching to the sink.
#[derive(Default)]
pub struct Tracer {
    #[cfg(feature = "trace")]
    sink: Option<Box<dyn TraceSink>>,
}

impl core::fmt::Debug for Tracer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Tracer").finish_non_exhaustive()
    }
}

impl Tracer {
    /// Creates a tracer that dispatches to the given sink.
    #[inline]
    #[must_use]
    pub fn new(sink: impl TraceSink + 'static) -> Self {
        #[cfg(feature = "trace")]
        {
            Self {
                sink: Some(Box::new(sink)),
            }
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = sink;
            Self {}
        }
    }

    /// Creates a tracer that discards all events.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns whether events reach a sink.
    #[inline]
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        #[cfg(feature = "trace")]
        {
            self.sink.is_some()
        }
        #[cfg(not(feature = "trace"))]
        {
            false
        }
    }

    /// Emits a [`SessionBeginEvent`].
    #[inline]
    pub fn session_begin(&mut self, e: &SessionBeginEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_session_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`PhaseChangeEvent`].
    #[inline]
    pub fn phase_change(&mut self, e: &PhaseChangeEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_phase_change(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`ViewsMatchedEvent`].
    #[inline]
    pub fn views_matched(&mut self, e: &ViewsMatchedEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_views_matched(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SnapshotEvent`].
    #[inline]
    pub fn snapshot(&mut self, e: &SnapshotEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_snapshot(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an interaction-begin [`InteractionEvent`].
    #[inline]
    pub fn interaction_begin(&mut self, e: &InteractionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_interaction_begin(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits an interaction-end [`InteractionEvent`].
    #[inline]
    pub fn interaction_end(&mut self, e: &InteractionEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_interaction_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }

    /// Emits a [`SessionEndEvent`].
    #[inline]
    pub fn session_end(&mut self, e: &SessionEndEvent) {
        #[cfg(feature = "trace")]
        if let Some(s) = &mut self.sink {
            s.on_session_end(e);
        }
        #[cfg(not(feature = "trace"))]
        {
            _ = e;
        }
    }
}
