// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chrome Trace Event Format exporter.
//!
//! [`export`] reads recorded bytes from a [`RecorderSink`](super::recorder::RecorderSink)
//! and writes [Chrome Trace Event Format][format] JSON to the given writer.
//!
//! Each session is drawn on its own thread row (`tid` is the session
//! counter). Phases become duration slices; everything else is an instant.
//! Timestamps are session time, so every row starts at zero.
//!
//! [format]: https://docs.google.com/document/d/1CvAClvFfyA5R-PhYUmn5OOQtYMH4h6I0nSsKchNAySU

use core::time::Duration;
use std::collections::HashMap;
use std::io::{self, Write};

use serde_json::{Value, json};

use segue_core::transition::Phase;

use crate::recorder::{RecordedEvent, decode};

/// Exports recorded events as Chrome Trace Event Format JSON.
///
/// The output is a complete JSON array of trace event objects, suitable for
/// loading into `chrome://tracing` or [Perfetto](https://ui.perfetto.dev/).
pub fn export(bytes: &[u8], writer: &mut dyn Write) -> io::Result<()> {
    let mut events: Vec<Value> = Vec::new();
    // Latest session time seen per session, for events that carry none.
    let mut clock: HashMap<u64, f64> = HashMap::new();

    for recorded in decode(bytes) {
        let session = recorded.session();
        match recorded {
            RecordedEvent::SessionBegin(e) => {
                clock.insert(session, 0.0);
                events.push(json!({
                    "ph": "i",
                    "name": "SessionBegin",
                    "cat": "Session",
                    "ts": 0.0,
                    "pid": 0,
                    "tid": session,
                    "s": "t",
                    "args": {
                        "variant": e.variant,
                        "presenting": e.presenting,
                        "interactive": e.interactive,
                        "duration_us": to_us(e.duration),
                    }
                }));
            }
            RecordedEvent::PhaseChange(e) => {
                let ts = to_us(e.at);
                clock.insert(session, ts);
                if e.from != Phase::Idle {
                    events.push(json!({
                        "ph": "E",
                        "name": format!("{:?}", e.from),
                        "cat": "Phase",
                        "ts": ts,
                        "pid": 0,
                        "tid": session,
                    }));
                }
                if e.to != Phase::Idle {
                    events.push(json!({
                        "ph": "B",
                        "name": format!("{:?}", e.to),
                        "cat": "Phase",
                        "ts": ts,
                        "pid": 0,
                        "tid": session,
                    }));
                }
            }
            RecordedEvent::ViewsMatched(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "ViewsMatched",
                    "cat": "Hero",
                    "ts": clock.get(&session).copied().unwrap_or(0.0),
                    "pid": 0,
                    "tid": session,
                    "s": "t",
                    "args": {
                        "participants": e.participants,
                        "matched_pairs": e.matched_pairs,
                    }
                }));
            }
            RecordedEvent::Snapshot(e) => {
                events.push(json!({
                    "ph": "i",
                    "name": "Snapshot",
                    "cat": "Hero",
                    "ts": clock.get(&session).copied().unwrap_or(0.0),
                    "pid": 0,
                    "tid": session,
                    "s": "t",
                    "args": {
                        "view": format!("{:?}", e.view),
                        "proxy": format!("{:?}", e.proxy),
                        "snapshot_type": format!("{:?}", e.snapshot_type),
                    }
                }));
            }
            RecordedEvent::InteractionBegin(e) | RecordedEvent::InteractionEnd(e) => {
                let ts = to_us(e.at);
                clock.insert(session, ts);
                let name = if e.should_finish.is_some() {
                    "InteractionEnd"
                } else {
                    "InteractionBegin"
                };
                events.push(json!({
                    "ph": "i",
                    "name": name,
                    "cat": "Interaction",
                    "ts": ts,
                    "pid": 0,
                    "tid": session,
                    "s": "t",
                    "args": {
                        "fraction": e.fraction,
                        "should_finish": e.should_finish,
                    }
                }));
            }
            RecordedEvent::SessionEnd(e) => {
                let ts = to_us(e.at);
                clock.remove(&session);
                events.push(json!({
                    "ph": "i",
                    "name": "SessionEnd",
                    "cat": "Session",
                    "ts": ts,
                    "pid": 0,
                    "tid": session,
                    "s": "t",
                    "args": {
                        "finished": e.finished,
                    }
                }));
            }
        }
    }

    serde_json::to_writer_pretty(writer, &events)?;
    Ok(())
}

fn to_us(d: Duration) -> f64 {
    d.as_secs_f64() * 1_000_000.0
}
