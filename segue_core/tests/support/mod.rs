// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures: a recording navigation host and a window with a
//! transition container.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use kurbo::Rect;
use segue_core::host::TransitionHost;
use segue_core::transition::Transition;
use segue_core::view::{SurfaceId, ViewId, ViewStore};

/// What the host was told, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum HostEvent {
    Snapshot(ViewId),
    Release(SurfaceId),
    Pause,
    Finish,
    Cancel,
    Complete(bool),
}

/// Shared view of a [`TestHost`]'s calls.
#[derive(Clone, Debug, Default)]
pub(crate) struct HostLog(Rc<RefCell<Vec<HostEvent>>>);

impl HostLog {
    pub(crate) fn host(&self) -> TestHost {
        TestHost {
            log: self.clone(),
            next_surface: 1,
        }
    }

    pub(crate) fn events(&self) -> Vec<HostEvent> {
        self.0.borrow().clone()
    }

    pub(crate) fn count(&self, pred: impl Fn(&HostEvent) -> bool) -> usize {
        self.0.borrow().iter().filter(|e| pred(e)).count()
    }

    fn push(&self, event: HostEvent) {
        self.0.borrow_mut().push(event);
    }
}

pub(crate) struct TestHost {
    log: HostLog,
    next_surface: u32,
}

impl TransitionHost for TestHost {
    fn snapshot(&mut self, _store: &ViewStore, view: ViewId) -> SurfaceId {
        self.log.push(HostEvent::Snapshot(view));
        let surface = SurfaceId(self.next_surface);
        self.next_surface += 1;
        surface
    }

    fn release_snapshot(&mut self, surface: SurfaceId) {
        self.log.push(HostEvent::Release(surface));
    }

    fn pause_interactive_transition(&mut self) {
        self.log.push(HostEvent::Pause);
    }

    fn finish_interactive_transition(&mut self) {
        self.log.push(HostEvent::Finish);
    }

    fn cancel_interactive_transition(&mut self) {
        self.log.push(HostEvent::Cancel);
    }

    fn complete_transition(&mut self, finished: bool) {
        self.log.push(HostEvent::Complete(finished));
    }
}

pub(crate) const WIDTH: f64 = 400.0;
pub(crate) const HEIGHT: f64 = 800.0;

/// A window holding a full-size transition container.
pub(crate) struct Scene {
    pub(crate) store: ViewStore,
    pub(crate) window: ViewId,
    pub(crate) container: ViewId,
}

impl Scene {
    pub(crate) fn new() -> Self {
        let mut store = ViewStore::new();
        let window = store.create_view_with_frame(bounds());
        let container = store.create_view_with_frame(bounds());
        store.add_child(window, container);
        Self {
            store,
            window,
            container,
        }
    }

    /// Creates a detached full-size screen view.
    pub(crate) fn screen_view(&mut self) -> ViewId {
        self.store.create_view_with_frame(bounds())
    }

    /// Creates a screen view already shown in the container.
    pub(crate) fn shown_screen_view(&mut self) -> ViewId {
        let view = self.screen_view();
        self.store.add_child(self.container, view);
        view
    }

    pub(crate) fn child(&mut self, parent: ViewId, frame: Rect) -> ViewId {
        let view = self.store.create_view_with_frame(frame);
        self.store.add_child(parent, view);
        view
    }

    pub(crate) fn children(&self, view: ViewId) -> Vec<ViewId> {
        self.store.children(view).collect()
    }
}

pub(crate) fn bounds() -> Rect {
    Rect::new(0.0, 0.0, WIDTH, HEIGHT)
}

/// Ticks in 16 ms steps until the session ends.
pub(crate) fn run_to_end(transition: &mut Transition, store: &mut ViewStore) -> Option<bool> {
    for _ in 0..200 {
        if let Some(finished) = transition.tick(store, Duration::from_millis(16)) {
            return Some(finished);
        }
    }
    None
}

pub(crate) fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

pub(crate) fn rect_approx(a: Rect, b: Rect) -> bool {
    approx(a.x0, b.x0) && approx(a.y0, b.y0) && approx(a.x1, b.x1) && approx(a.y1, b.y1)
}
