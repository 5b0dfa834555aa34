// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compact binary event recording and decoding.
//!
//! [`RecorderSink`] implements [`TraceSink`] and encodes events into a shared
//! byte buffer as fixed-size little-endian records. [`decode`] reads them
//! back as an iterator of [`RecordedEvent`].
//!
//! A [`Tracer`](segue_core::trace::Tracer) takes ownership of its sink, so
//! the buffer is reached through a [`Recording`] handle taken before the sink
//! is installed.
//!
//! Variant names are stored as a one-byte code; names other than the
//! built-in variants decode as `"custom"`.

use core::cell::RefCell;
use core::time::Duration;
use std::rc::Rc;

use segue_core::state::SnapshotType;
use segue_core::trace::{
    InteractionEvent, PhaseChangeEvent, SessionBeginEvent, SessionEndEvent, SnapshotEvent,
    TraceSink, ViewsMatchedEvent,
};
use segue_core::transition::Phase;
use segue_core::view::ViewId;

// ---------------------------------------------------------------------------
// Event type discriminants
// ---------------------------------------------------------------------------

const TAG_SESSION_BEGIN: u8 = 1;
const TAG_PHASE_CHANGE: u8 = 2;
const TAG_VIEWS_MATCHED: u8 = 3;
const TAG_SNAPSHOT: u8 = 4;
const TAG_INTERACTION_BEGIN: u8 = 5;
const TAG_INTERACTION_END: u8 = 6;
const TAG_SESSION_END: u8 = 7;

const VARIANTS: [&str; 4] = ["fade", "hero", "match", "sheet"];
const CUSTOM_VARIANT: u8 = u8::MAX;

// ---------------------------------------------------------------------------
// RecorderSink
// ---------------------------------------------------------------------------

/// A [`TraceSink`] that encodes events into a compact binary buffer.
#[derive(Debug, Default)]
pub struct RecorderSink {
    buf: Rc<RefCell<Vec<u8>>>,
}

/// A shared handle onto the buffer of a [`RecorderSink`].
#[derive(Clone, Debug)]
pub struct Recording {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl Recording {
    /// Returns a copy of the bytes recorded so far.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buf.borrow().clone()
    }

    /// Decodes the events recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<RecordedEvent> {
        decode(&self.buf.borrow()).collect()
    }

    /// Returns whether nothing has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.borrow().is_empty()
    }
}

impl RecorderSink {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a handle that observes this recorder's buffer.
    #[must_use]
    pub fn recording(&self) -> Recording {
        Recording {
            buf: Rc::clone(&self.buf),
        }
    }

    /// Returns a copy of the recorded bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buf.borrow().clone()
    }

    // -- encoding helpers --------------------------------------------------

    fn write_u8(&mut self, v: u8) {
        self.buf.borrow_mut().push(v);
    }

    fn write_u32(&mut self, v: u32) {
        self.buf.borrow_mut().extend_from_slice(&v.to_le_bytes());
    }

    fn write_u64(&mut self, v: u64) {
        self.buf.borrow_mut().extend_from_slice(&v.to_le_bytes());
    }

    fn write_f64(&mut self, v: f64) {
        self.write_u64(v.to_bits());
    }

    fn write_bool(&mut self, v: bool) {
        self.write_u8(u8::from(v));
    }

    fn write_option_bool(&mut self, v: Option<bool>) {
        match v {
            Some(true) => self.write_u8(2),
            Some(false) => self.write_u8(1),
            None => self.write_u8(0),
        }
    }

    fn write_duration(&mut self, d: Duration) {
        self.write_u64(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX));
    }

    fn write_count(&mut self, n: usize) {
        self.write_u32(u32::try_from(n).unwrap_or(u32::MAX));
    }

    fn write_view(&mut self, v: ViewId) {
        self.write_u32(v.index());
        self.write_u32(v.generation());
    }

    fn write_variant(&mut self, name: &str) {
        let code = VARIANTS
            .iter()
            .position(|v| *v == name)
            .and_then(|i| u8::try_from(i).ok())
            .unwrap_or(CUSTOM_VARIANT);
        self.write_u8(code);
    }

    fn write_phase(&mut self, p: Phase) {
        self.write_u8(match p {
            Phase::Idle => 0,
            Phase::Preparing => 1,
            Phase::Deferred => 2,
            Phase::Animating => 3,
            Phase::InteractivePaused => 4,
            Phase::Completing => 5,
        });
    }

    fn write_snapshot_type(&mut self, t: SnapshotType) {
        self.write_u8(match t {
            SnapshotType::Bitmap => 0,
            SnapshotType::LiveView => 1,
        });
    }

    fn write_interaction(&mut self, tag: u8, e: &InteractionEvent) {
        self.write_u8(tag);
        self.write_u64(e.session);
        self.write_duration(e.at);
        self.write_f64(e.fraction);
        self.write_option_bool(e.should_finish);
    }
}

impl TraceSink for RecorderSink {
    fn on_session_begin(&mut self, e: &SessionBeginEvent) {
        self.write_u8(TAG_SESSION_BEGIN);
        self.write_u64(e.session);
        self.write_variant(e.variant);
        self.write_bool(e.presenting);
        self.write_bool(e.interactive);
        self.write_duration(e.duration);
    }

    fn on_phase_change(&mut self, e: &PhaseChangeEvent) {
        self.write_u8(TAG_PHASE_CHANGE);
        self.write_u64(e.session);
        self.write_duration(e.at);
        self.write_phase(e.from);
        self.write_phase(e.to);
    }

    fn on_views_matched(&mut self, e: &ViewsMatchedEvent) {
        self.write_u8(TAG_VIEWS_MATCHED);
        self.write_u64(e.session);
        self.write_count(e.participants);
        self.write_count(e.matched_pairs);
    }

    fn on_snapshot(&mut self, e: &SnapshotEvent) {
        self.write_u8(TAG_SNAPSHOT);
        self.write_u64(e.session);
        self.write_view(e.view);
        self.write_view(e.proxy);
        self.write_snapshot_type(e.snapshot_type);
    }

    fn on_interaction_begin(&mut self, e: &InteractionEvent) {
        self.write_interaction(TAG_INTERACTION_BEGIN, e);
    }

    fn on_interaction_end(&mut self, e: &InteractionEvent) {
        self.write_interaction(TAG_INTERACTION_END, e);
    }

    fn on_session_end(&mut self, e: &SessionEndEvent) {
        self.write_u8(TAG_SESSION_END);
        self.write_u64(e.session);
        self.write_duration(e.at);
        self.write_bool(e.finished);
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// A decoded event from a binary recording.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordedEvent {
    /// A [`SessionBeginEvent`].
    SessionBegin(SessionBeginEvent),
    /// A [`PhaseChangeEvent`].
    PhaseChange(PhaseChangeEvent),
    /// A [`ViewsMatchedEvent`].
    ViewsMatched(ViewsMatchedEvent),
    /// A [`SnapshotEvent`].
    Snapshot(SnapshotEvent),
    /// An interaction-begin [`InteractionEvent`].
    InteractionBegin(InteractionEvent),
    /// An interaction-end [`InteractionEvent`].
    InteractionEnd(InteractionEvent),
    /// A [`SessionEndEvent`].
    SessionEnd(SessionEndEvent),
}

impl RecordedEvent {
    /// Returns the session counter the event belongs to.
    #[must_use]
    pub fn session(&self) -> u64 {
        match self {
            Self::SessionBegin(e) => e.session,
            Self::PhaseChange(e) => e.session,
            Self::ViewsMatched(e) => e.session,
            Self::Snapshot(e) => e.session,
            Self::InteractionBegin(e) | Self::InteractionEnd(e) => e.session,
            Self::SessionEnd(e) => e.session,
        }
    }
}

/// Decodes a byte slice produced by [`RecorderSink`] into an iterator of
/// [`RecordedEvent`].
pub fn decode(bytes: &[u8]) -> DecodeIter<'_> {
    DecodeIter {
        data: bytes,
        pos: 0,
    }
}

/// Iterator over decoded events.
#[derive(Debug)]
pub struct DecodeIter<'a> {
    data: &'a [u8],
    pos: usize,
}

impl DecodeIter<'_> {
    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn read_u8(&mut self) -> Option<u8> {
        if self.remaining() < 1 {
            return None;
        }
        let v = self.data[self.pos];
        self.pos += 1;
        Some(v)
    }

    fn read_u32(&mut self) -> Option<u32> {
        if self.remaining() < 4 {
            return None;
        }
        let v = u32::from_le_bytes(self.data[self.pos..self.pos + 4].try_into().ok()?);
        self.pos += 4;
        Some(v)
    }

    fn read_u64(&mut self) -> Option<u64> {
        if self.remaining() < 8 {
            return None;
        }
        let v = u64::from_le_bytes(self.data[self.pos..self.pos + 8].try_into().ok()?);
        self.pos += 8;
        Some(v)
    }

    fn read_f64(&mut self) -> Option<f64> {
        self.read_u64().map(f64::from_bits)
    }

    fn read_bool(&mut self) -> Option<bool> {
        self.read_u8().map(|v| v != 0)
    }

    fn read_option_bool(&mut self) -> Option<Option<bool>> {
        let v = self.read_u8()?;
        Some(match v {
            0 => None,
            1 => Some(false),
            _ => Some(true),
        })
    }

    fn read_duration(&mut self) -> Option<Duration> {
        self.read_u64().map(Duration::from_nanos)
    }

    fn read_count(&mut self) -> Option<usize> {
        usize::try_from(self.read_u32()?).ok()
    }

    fn read_view(&mut self) -> Option<ViewId> {
        let index = self.read_u32()?;
        let generation = self.read_u32()?;
        Some(ViewId::from_raw(index, generation))
    }

    fn read_variant(&mut self) -> Option<&'static str> {
        let code = self.read_u8()?;
        Some(VARIANTS.get(usize::from(code)).copied().unwrap_or("custom"))
    }

    fn read_phase(&mut self) -> Option<Phase> {
        Some(match self.read_u8()? {
            0 => Phase::Idle,
            1 => Phase::Preparing,
            2 => Phase::Deferred,
            3 => Phase::Animating,
            4 => Phase::InteractivePaused,
            5 => Phase::Completing,
            _ => return None,
        })
    }

    fn read_snapshot_type(&mut self) -> Option<SnapshotType> {
        Some(match self.read_u8()? {
            0 => SnapshotType::Bitmap,
            1 => SnapshotType::LiveView,
            _ => return None,
        })
    }

    // -- per-event decoders ------------------------------------------------

    fn decode_session_begin(&mut self) -> Option<RecordedEvent> {
        let session = self.read_u64()?;
        let variant = self.read_variant()?;
        let presenting = self.read_bool()?;
        let interactive = self.read_bool()?;
        let duration = self.read_duration()?;
        Some(RecordedEvent::SessionBegin(SessionBeginEvent {
            session,
            variant,
            presenting,
            interactive,
            duration,
        }))
    }

    fn decode_phase_change(&mut self) -> Option<RecordedEvent> {
        let session = self.read_u64()?;
        let at = self.read_duration()?;
        let from = self.read_phase()?;
        let to = self.read_phase()?;
        Some(RecordedEvent::PhaseChange(PhaseChangeEvent {
            session,
            at,
            from,
            to,
        }))
    }

    fn decode_views_matched(&mut self) -> Option<RecordedEvent> {
        let session = self.read_u64()?;
        let participants = self.read_count()?;
        let matched_pairs = self.read_count()?;
        Some(RecordedEvent::ViewsMatched(ViewsMatchedEvent {
            session,
            participants,
            matched_pairs,
        }))
    }

    fn decode_snapshot(&mut self) -> Option<RecordedEvent> {
        let session = self.read_u64()?;
        let view = self.read_view()?;
        let proxy = self.read_view()?;
        let snapshot_type = self.read_snapshot_type()?;
        Some(RecordedEvent::Snapshot(SnapshotEvent {
            session,
            view,
            proxy,
            snapshot_type,
        }))
    }

    fn decode_interaction(&mut self) -> Option<InteractionEvent> {
        let session = self.read_u64()?;
        let at = self.read_duration()?;
        let fraction = self.read_f64()?;
        let should_finish = self.read_option_bool()?;
        Some(InteractionEvent {
            session,
            at,
            fraction,
            should_finish,
        })
    }

    fn decode_session_end(&mut self) -> Option<RecordedEvent> {
        let session = self.read_u64()?;
        let at = self.read_duration()?;
        let finished = self.read_bool()?;
        Some(RecordedEvent::SessionEnd(SessionEndEvent {
            session,
            at,
            finished,
        }))
    }
}

impl Iterator for DecodeIter<'_> {
    type Item = RecordedEvent;

    fn next(&mut self) -> Option<Self::Item> {
        let tag = self.read_u8()?;
        match tag {
            TAG_SESSION_BEGIN => self.decode_session_begin(),
            TAG_PHASE_CHANGE => self.decode_phase_change(),
            TAG_VIEWS_MATCHED => self.decode_views_matched(),
            TAG_SNAPSHOT => self.decode_snapshot(),
            TAG_INTERACTION_BEGIN => self
                .decode_interaction()
                .map(RecordedEvent::InteractionBegin),
            TAG_INTERACTION_END => self.decode_interaction().map(RecordedEvent::InteractionEnd),
            TAG_SESSION_END => self.decode_session_end(),
            _ => None, // unknown tag → stop iteration
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_begin() -> SessionBeginEvent {
        SessionBeginEvent {
            session: 3,
            variant: "match",
            presenting: true,
            interactive: false,
            duration: Duration::from_millis(375),
        }
    }

    #[test]
    fn session_begin_survives_recording() {
        let mut rec = RecorderSink::new();
        let orig = sample_begin();
        rec.on_session_begin(&orig);

        let events: Vec<_> = decode(&rec.to_bytes()).collect();
        assert_eq!(events, [RecordedEvent::SessionBegin(orig)]);
    }

    #[test]
    fn unknown_variant_decodes_as_custom() {
        let mut rec = RecorderSink::new();
        rec.on_session_begin(&SessionBeginEvent {
            variant: "zoom",
            ..sample_begin()
        });

        match &rec.recording().events()[0] {
            RecordedEvent::SessionBegin(e) => assert_eq!(e.variant, "custom"),
            other => panic!("expected SessionBegin, got {other:?}"),
        }
    }

    #[test]
    fn phase_changes_keep_order() {
        let mut rec = RecorderSink::new();
        let phases = [
            (Phase::Idle, Phase::Preparing),
            (Phase::Preparing, Phase::Animating),
            (Phase::Animating, Phase::InteractivePaused),
            (Phase::InteractivePaused, Phase::Animating),
            (Phase::Animating, Phase::Completing),
            (Phase::Completing, Phase::Idle),
        ];
        for (i, (from, to)) in phases.iter().enumerate() {
            rec.on_phase_change(&PhaseChangeEvent {
                session: 1,
                at: Duration::from_millis(i as u64 * 100),
                from: *from,
                to: *to,
            });
        }

        let decoded: Vec<_> = decode(&rec.to_bytes())
            .map(|e| match e {
                RecordedEvent::PhaseChange(p) => (p.from, p.to),
                other => panic!("expected PhaseChange, got {other:?}"),
            })
            .collect();
        assert_eq!(decoded, phases);
    }

    #[test]
    fn snapshot_keeps_view_handles() {
        let mut rec = RecorderSink::new();
        let orig = SnapshotEvent {
            session: 9,
            view: ViewId::from_raw(4, 2),
            proxy: ViewId::from_raw(11, 0),
            snapshot_type: SnapshotType::LiveView,
        };
        rec.on_snapshot(&orig);

        assert_eq!(
            rec.recording().events(),
            [RecordedEvent::Snapshot(orig)]
        );
    }

    #[test]
    fn interaction_end_keeps_decision() {
        let mut rec = RecorderSink::new();
        rec.on_interaction_begin(&InteractionEvent {
            session: 2,
            at: Duration::from_millis(40),
            fraction: 0.0,
            should_finish: None,
        });
        rec.on_interaction_end(&InteractionEvent {
            session: 2,
            at: Duration::from_millis(90),
            fraction: 0.25,
            should_finish: Some(false),
        });

        let events = rec.recording().events();
        assert_eq!(events.len(), 2);
        match &events[1] {
            RecordedEvent::InteractionEnd(e) => {
                assert_eq!(e.fraction, 0.25);
                assert_eq!(e.should_finish, Some(false));
            }
            other => panic!("expected InteractionEnd, got {other:?}"),
        }
    }

    #[test]
    fn recording_handle_sees_later_events() {
        let mut rec = RecorderSink::new();
        let recording = rec.recording();
        assert!(recording.is_empty());

        rec.on_views_matched(&ViewsMatchedEvent {
            session: 1,
            participants: 6,
            matched_pairs: 2,
        });
        rec.on_session_end(&SessionEndEvent {
            session: 1,
            at: Duration::from_millis(375),
            finished: true,
        });

        let events = recording.events();
        assert_eq!(events.len(), 2);
        assert!(events.iter().all(|e| e.session() == 1));
        assert!(matches!(
            events[1],
            RecordedEvent::SessionEnd(SessionEndEvent { finished: true, .. })
        ));
    }

    #[test]
    fn truncated_buffer_stops_iteration() {
        let mut rec = RecorderSink::new();
        rec.on_session_begin(&sample_begin());
        rec.on_session_end(&SessionEndEvent {
            session: 3,
            at: Duration::from_millis(375),
            finished: true,
        });
        let bytes = rec.to_bytes();

        let events: Vec<_> = decode(&bytes[..bytes.len() - 1]).collect();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn unknown_tag_stops_iteration() {
        let events: Vec<_> = decode(&[0xFF, 0, 0, 0]).collect();
        assert!(events.is_empty());
    }

    #[test]
    fn records_a_live_fade_session() {
        use kurbo::Rect;
        use segue_core::host::{TransitionContext, TransitionHost};
        use segue_core::screen::{Screen, ScreenKind};
        use segue_core::trace::Tracer;
        use segue_core::transition::Transition;
        use segue_core::view::{SurfaceId, ViewStore};

        struct Host;
        impl TransitionHost for Host {
            fn snapshot(&mut self, _store: &ViewStore, _view: ViewId) -> SurfaceId {
                SurfaceId(0)
            }

            fn complete_transition(&mut self, _finished: bool) {}
        }

        let mut store = ViewStore::new();
        let bounds = Rect::new(0.0, 0.0, 320.0, 640.0);
        let container = store.create_view_with_frame(bounds);
        let from = store.create_view_with_frame(bounds);
        let to = store.create_view_with_frame(bounds);
        store.add_child(container, from);

        let sink = RecorderSink::new();
        let recording = sink.recording();
        let mut transition = Transition::fade();
        transition.engine_mut().set_tracer(Tracer::new(sink));
        transition.setup_transition(true, false);
        transition.animate_transition(
            &mut store,
            TransitionContext::new(
                container,
                Screen::new(from, ScreenKind("a")),
                Screen::new(to, ScreenKind("b")),
                Host,
            ),
        );
        let mut ended = None;
        for _ in 0..100 {
            ended = transition.tick(&mut store, Duration::from_millis(16));
            if ended.is_some() {
                break;
            }
        }
        assert_eq!(ended, Some(true));

        let events = recording.events();
        assert!(
            matches!(&events[0], RecordedEvent::SessionBegin(e) if e.variant == "fade" && e.presenting),
            "first event is the session begin: {events:?}"
        );
        let phases: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                RecordedEvent::PhaseChange(p) => Some(p.to),
                _ => None,
            })
            .collect();
        assert_eq!(
            phases,
            [Phase::Preparing, Phase::Animating, Phase::Completing, Phase::Idle]
        );
        assert!(
            matches!(events.last(), Some(RecordedEvent::SessionEnd(e)) if e.finished && e.session == 1),
            "last event is the session end: {events:?}"
        );
        assert!(events.iter().all(|e| e.session() == 1), "one session recorded");
    }
}
