// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Match transition sessions driven through the public API.

mod support;

use std::rc::Rc;

use kurbo::{Point, Rect, Vec2};
use segue_core::color::Color;
use segue_core::host::TransitionContext;
use segue_core::screen::{Capabilities, Screen, ScreenKind};
use segue_core::transform::Transform3d;
use segue_core::transition::{DragGesture, DragOutcome, DragPhase, Transition, TransitionKind};
use segue_core::variants::matched::{MatchDelegate, MatchOptions};
use segue_core::view::{ViewId, ViewStore};
use support::{HostEvent, HostLog, Scene, bounds, rect_approx, run_to_end};

const LIST: ScreenKind = ScreenKind("list");
const DETAIL: ScreenKind = ScreenKind("detail");

struct Fixed(ViewId);

impl MatchDelegate for Fixed {
    fn matched_view_for(&self, _store: &ViewStore, _other: &Screen) -> Option<ViewId> {
        Some(self.0)
    }
}

fn with_delegate(screen: Screen, view: ViewId) -> Screen {
    screen.with_capabilities(Capabilities {
        match_delegate: Some(Rc::new(Fixed(view))),
        ..Capabilities::default()
    })
}

fn card(transition: &Transition) -> Option<ViewId> {
    match transition.kind() {
        TransitionKind::Match(t) => t.card(),
        _ => None,
    }
}

fn gesture_view(transition: &Transition) -> Option<ViewId> {
    match transition.kind() {
        TransitionKind::Match(t) => t.dismiss_gesture_view(),
        _ => None,
    }
}

#[test]
fn matched_presentation_grows_out_of_the_cell() {
    let mut scene = Scene::new();
    let list = scene.shown_screen_view();
    let cell_frame = Rect::new(50.0, 100.0, 150.0, 200.0);
    let cell = scene.child(list, cell_frame);
    let detail = scene.screen_view();
    let image = scene.child(detail, Rect::new(0.0, 0.0, 400.0, 300.0));
    let log = HostLog::default();

    let mut transition = Transition::matched(MatchOptions::default());
    transition.setup_transition(true, false);
    transition.animate_transition(
        &mut scene.store,
        TransitionContext::new(
            scene.container,
            with_delegate(Screen::new(list, LIST), cell),
            with_delegate(Screen::new(detail, DETAIL), image),
            log.host(),
        ),
    );

    let card = card(&transition).expect("a card during the session");
    assert!(transition.is_matched(detail));
    assert_eq!(gesture_view(&transition), Some(detail));

    // The card starts on the cell; the detail screen is shrunk into it and
    // the cell rides along on top.
    assert!(rect_approx(scene.store.frame_without_transform(card), cell_frame));
    let content = scene.store.parent(detail).expect("detail inside the card");
    assert_eq!(scene.store.parent(content), Some(card));
    assert_eq!(scene.children(content), [detail, cell]);
    assert!(!scene.store.transform(detail).is_identity());
    assert_eq!(scene.store.alpha(cell), 1.0);
    let overlay = scene.store.overlay(list).expect("dimming overlay");
    assert_eq!(scene.store.background_color(overlay), Some(Color::CLEAR));

    assert_eq!(run_to_end(&mut transition, &mut scene.store), Some(true));

    assert!(!scene.store.is_alive(card));
    assert_eq!(scene.store.parent(detail), Some(scene.container));
    assert!(
        scene
            .store
            .transform(detail)
            .approx_eq(&Transform3d::IDENTITY, 1e-9)
    );
    assert!(rect_approx(scene.store.frame(detail), bounds()));
    // The cell is back where it came from, visible, and nothing else was
    // left behind in the list.
    assert_eq!(scene.store.parent(cell), Some(list));
    assert_eq!(scene.children(list), [cell]);
    assert!(rect_approx(scene.store.frame_without_transform(cell), cell_frame));
    assert_eq!(scene.store.alpha(cell), 1.0);
    assert_eq!(scene.store.overlay(list), None);
    assert_eq!(scene.store.parent(list), None);
    assert_eq!(log.events(), [HostEvent::Complete(true)]);
    assert_eq!(card(&transition), None);
    assert_eq!(gesture_view(&transition), Some(detail));
}

#[test]
fn unmatched_presentation_slides_in_from_the_side() {
    let mut scene = Scene::new();
    let list = scene.shown_screen_view();
    let detail = scene.screen_view();
    let log = HostLog::default();

    let mut transition = Transition::matched(MatchOptions::default());
    transition.setup_transition(true, false);
    transition.animate_transition(
        &mut scene.store,
        TransitionContext::new(
            scene.container,
            Screen::new(list, LIST),
            Screen::new(detail, DETAIL),
            log.host(),
        ),
    );
    let card = card(&transition).expect("a card during the session");
    assert!(!transition.is_matched(detail));
    assert!(rect_approx(
        scene.store.frame_without_transform(card),
        bounds() + Vec2::new(400.0, 0.0)
    ));
    assert_eq!(run_to_end(&mut transition, &mut scene.store), Some(true));
    assert_eq!(scene.store.parent(detail), Some(scene.container));
}

#[test]
fn drag_to_dismiss_round_trip() {
    let mut scene = Scene::new();
    let detail = scene.shown_screen_view();
    let list = scene.screen_view();
    let log = HostLog::default();
    let mut transition = Transition::matched(MatchOptions::default());

    let began = DragGesture::new(
        DragPhase::Began,
        Vec2::ZERO,
        Vec2::new(300.0, 0.0),
        Point::new(10.0, 400.0),
    );
    assert!(transition.gesture_should_begin(&began));
    assert_eq!(
        transition.handle_drag(&mut scene.store, &began),
        DragOutcome::RequestDismiss
    );

    // The host reacts by starting the dismissal, which begins paused.
    transition.setup_transition(false, false);
    transition.animate_transition(
        &mut scene.store,
        TransitionContext::new(
            scene.container,
            Screen::new(detail, DETAIL),
            Screen::new(list, LIST),
            log.host(),
        ),
    );
    assert!(transition.engine().is_interactive());
    let card = card(&transition).expect("a card during the session");
    assert!(rect_approx(scene.store.frame_without_transform(card), bounds()));

    let changed = DragGesture::new(
        DragPhase::Changed,
        Vec2::new(100.0, 0.0),
        Vec2::new(300.0, 0.0),
        Point::new(110.0, 400.0),
    );
    assert_eq!(
        transition.handle_drag(&mut scene.store, &changed),
        DragOutcome::Tracking
    );
    assert!((transition.fraction_completed() - 0.25).abs() < 1e-9);
    assert!(scene.store.center(card).x > 200.0);

    let ended = DragGesture::new(
        DragPhase::Ended,
        Vec2::new(100.0, 0.0),
        Vec2::new(300.0, 0.0),
        Point::new(110.0, 400.0),
    );
    assert_eq!(
        transition.handle_drag(&mut scene.store, &ended),
        DragOutcome::Released {
            should_finish: true
        }
    );
    assert!(!scene.store.user_interaction_enabled(card));

    assert_eq!(run_to_end(&mut transition, &mut scene.store), Some(true));
    assert_eq!(scene.store.parent(detail), None);
    assert_eq!(scene.store.parent(list), Some(scene.container));
    assert_eq!(
        log.events(),
        [HostEvent::Finish, HostEvent::Complete(true)]
    );
    assert_eq!(gesture_view(&transition), None);
}

#[test]
fn short_drag_cancels_the_dismissal() {
    let mut scene = Scene::new();
    let detail = scene.shown_screen_view();
    let list = scene.screen_view();
    let log = HostLog::default();
    let mut transition = Transition::matched(MatchOptions::default());

    let sample = |phase, x: f64, vx: f64| {
        DragGesture::new(phase, Vec2::new(x, 0.0), Vec2::new(vx, 0.0), Point::new(x, 400.0))
    };
    assert!(transition.gesture_should_begin(&sample(DragPhase::Began, 0.0, 300.0)));
    transition.handle_drag(&mut scene.store, &sample(DragPhase::Began, 0.0, 300.0));
    transition.setup_transition(false, false);
    transition.animate_transition(
        &mut scene.store,
        TransitionContext::new(
            scene.container,
            Screen::new(detail, DETAIL),
            Screen::new(list, LIST),
            log.host(),
        ),
    );
    transition.handle_drag(&mut scene.store, &sample(DragPhase::Changed, 40.0, 0.0));
    assert_eq!(
        transition.handle_drag(&mut scene.store, &sample(DragPhase::Ended, 40.0, -100.0)),
        DragOutcome::Released {
            should_finish: false
        }
    );

    assert_eq!(run_to_end(&mut transition, &mut scene.store), Some(false));
    assert_eq!(scene.store.parent(detail), Some(scene.container));
    assert_eq!(scene.store.parent(list), None);
    assert_eq!(
        log.events(),
        [HostEvent::Cancel, HostEvent::Complete(false)]
    );
}
