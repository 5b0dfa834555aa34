// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Human-readable trace output.
//!
//! [`PrettyPrintSink`] writes one line per event:
//!
//! ```text
//! [s1 +0.000s] begin hero present duration=0.375s
//! [s1 +0.000s] phase Preparing -> Animating
//! [s1 +0.375s] end finished
//! ```
//!
//! Write errors are ignored; a trace sink has nowhere to report them.

use core::time::Duration;
use std::io::Write;

use segue_core::trace::{
    InteractionEvent, PhaseChangeEvent, SessionBeginEvent, SessionEndEvent, SnapshotEvent,
    TraceSink, ViewsMatchedEvent,
};

/// A [`TraceSink`] that writes one line per event to a writer.
#[derive(Debug)]
pub struct PrettyPrintSink<W: Write> {
    out: W,
}

impl<W: Write> PrettyPrintSink<W> {
    /// Creates a sink writing to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl PrettyPrintSink<std::io::Stderr> {
    /// Creates a sink writing to standard error.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

fn secs(d: Duration) -> f64 {
    d.as_secs_f64()
}

impl<W: Write> TraceSink for PrettyPrintSink<W> {
    fn on_session_begin(&mut self, e: &SessionBeginEvent) {
        let direction = if e.presenting { "present" } else { "dismiss" };
        let mode = if e.interactive { " interactive" } else { "" };
        _ = writeln!(
            self.out,
            "[s{} +0.000s] begin {} {direction}{mode} duration={:.3}s",
            e.session,
            e.variant,
            secs(e.duration),
        );
    }

    fn on_phase_change(&mut self, e: &PhaseChangeEvent) {
        _ = writeln!(
            self.out,
            "[s{} +{:.3}s] phase {:?} -> {:?}",
            e.session,
            secs(e.at),
            e.from,
            e.to,
        );
    }

    fn on_views_matched(&mut self, e: &ViewsMatchedEvent) {
        _ = writeln!(
            self.out,
            "[s{}] matched participants={} pairs={}",
            e.session, e.participants, e.matched_pairs,
        );
    }

    fn on_snapshot(&mut self, e: &SnapshotEvent) {
        _ = writeln!(
            self.out,
            "[s{}] snapshot {:?} -> {:?} ({:?})",
            e.session, e.view, e.proxy, e.snapshot_type,
        );
    }

    fn on_interaction_begin(&mut self, e: &InteractionEvent) {
        _ = writeln!(
            self.out,
            "[s{} +{:.3}s] interaction begin fraction={:.3}",
            e.session,
            secs(e.at),
            e.fraction,
        );
    }

    fn on_interaction_end(&mut self, e: &InteractionEvent) {
        let outcome = match e.should_finish {
            Some(true) => "finish",
            Some(false) => "cancel",
            None => "undecided",
        };
        _ = writeln!(
            self.out,
            "[s{} +{:.3}s] interaction end fraction={:.3} {outcome}",
            e.session,
            secs(e.at),
            e.fraction,
        );
    }

    fn on_session_end(&mut self, e: &SessionEndEvent) {
        let outcome = if e.finished { "finished" } else { "cancelled" };
        _ = writeln!(
            self.out,
            "[s{} +{:.3}s] end {outcome}",
            e.session,
            secs(e.at),
        );
    }
}
