// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Full fade sessions: presentation, interactive cancel, navigation
//! deferral.

mod support;

use std::collections::HashMap;
use std::time::Duration;

use segue_core::backend::Presenter;
use segue_core::host::TransitionContext;
use segue_core::screen::{Screen, ScreenKind};
use segue_core::transition::{Phase, Transition};
use segue_core::view::{FrameChanges, ViewStore};
use support::{HostEvent, HostLog, Scene, bounds, rect_approx, run_to_end};

const LIST: ScreenKind = ScreenKind("list");
const DETAIL: ScreenKind = ScreenKind("detail");

#[test]
fn present_fades_in_and_removes_the_covered_screen() {
    let mut scene = Scene::new();
    let list = scene.shown_screen_view();
    let detail = scene.screen_view();
    let log = HostLog::default();

    let mut transition = Transition::fade();
    transition.setup_transition(true, false);
    let context = TransitionContext::new(
        scene.container,
        Screen::new(list, LIST),
        Screen::new(detail, DETAIL),
        log.host(),
    );
    transition.animate_transition(&mut scene.store, context);

    assert_eq!(transition.engine().phase(), Phase::Animating);
    assert_eq!(scene.children(scene.container), [list, detail]);
    assert!(rect_approx(scene.store.frame(detail), bounds()));
    assert_eq!(scene.store.alpha(detail), 0.0);
    assert!(!scene.store.user_interaction_enabled(scene.container));

    assert_eq!(transition.tick(&mut scene.store, Duration::from_millis(100)), None);
    let alpha = scene.store.alpha(detail);
    assert!(alpha > 0.0 && alpha < 1.0, "mid-animation alpha {alpha}");

    assert_eq!(run_to_end(&mut transition, &mut scene.store), Some(true));
    assert_eq!(scene.store.alpha(detail), 1.0);
    assert_eq!(scene.children(scene.container), [detail]);
    assert_eq!(scene.store.parent(list), None);
    assert!(scene.store.user_interaction_enabled(scene.container));
    assert_eq!(log.events(), [HostEvent::Complete(true)]);

    let engine = transition.engine();
    assert_eq!(engine.phase(), Phase::Idle);
    assert!(!engine.is_transitioning());
    assert!(engine.context().is_none());
    assert_eq!(engine.session(), 1);
}

#[test]
fn cancelled_interactive_dismissal_restores_the_presented_screen() {
    let mut scene = Scene::new();
    let detail = scene.shown_screen_view();
    let list = scene.screen_view();
    let log = HostLog::default();

    let mut transition = Transition::fade();
    transition.setup_transition(false, false);
    let context = TransitionContext::new(
        scene.container,
        Screen::new(detail, DETAIL),
        Screen::new(list, LIST),
        log.host(),
    );
    transition.animate_transition(&mut scene.store, context);
    assert_eq!(scene.store.alpha(detail), 1.0);

    transition.begin_interactive_transition(&mut scene.store);
    assert_eq!(transition.engine().phase(), Phase::InteractivePaused);
    assert!(transition.engine().is_interactive());

    transition.set_fraction_completed(&mut scene.store, 0.3);
    assert!((transition.fraction_completed() - 0.3).abs() < 1e-9);
    let alpha = scene.store.alpha(detail);
    assert!(alpha > 0.0 && alpha < 1.0, "scrubbed alpha {alpha}");

    // Paused: time does not move the animation.
    assert_eq!(transition.tick(&mut scene.store, Duration::from_millis(100)), None);
    assert!((transition.fraction_completed() - 0.3).abs() < 1e-9);

    transition.end_interactive_transition(&mut scene.store, false);
    assert_eq!(transition.engine().phase(), Phase::Animating);
    assert!(transition.engine().is_reversed());

    assert_eq!(run_to_end(&mut transition, &mut scene.store), Some(false));
    assert_eq!(scene.store.alpha(detail), 1.0);
    assert_eq!(scene.store.parent(detail), Some(scene.container));
    // The screen that would have been revealed is taken out again.
    assert_eq!(scene.store.parent(list), None);
    assert_eq!(
        log.events(),
        [HostEvent::Pause, HostEvent::Cancel, HostEvent::Complete(false)]
    );
    assert_eq!(transition.fraction_completed(), 0.0);
}

#[test]
fn finishing_an_interaction_runs_forward() {
    let mut scene = Scene::new();
    let list = scene.shown_screen_view();
    let detail = scene.screen_view();
    let log = HostLog::default();

    let mut transition = Transition::fade();
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
    transition.begin_interactive_transition(&mut scene.store);
    transition.set_fraction_completed(&mut scene.store, 0.6);
    transition.end_interactive_transition(&mut scene.store, true);
    // A second end is ignored.
    transition.end_interactive_transition(&mut scene.store, false);
    assert!(!transition.engine().is_reversed());

    assert_eq!(run_to_end(&mut transition, &mut scene.store), Some(true));
    assert_eq!(
        log.events(),
        [HostEvent::Pause, HostEvent::Finish, HostEvent::Complete(true)]
    );
}

#[test]
fn push_waits_one_tick_before_attaching() {
    let mut scene = Scene::new();
    let list = scene.shown_screen_view();
    let detail = scene.screen_view();
    let log = HostLog::default();

    let mut transition = Transition::fade();
    transition.setup_transition(true, true);
    transition.animate_transition(
        &mut scene.store,
        TransitionContext::new(
            scene.container,
            Screen::new(list, LIST),
            Screen::new(detail, DETAIL),
            log.host(),
        ),
    );
    assert_eq!(transition.engine().phase(), Phase::Deferred);
    assert!(transition.engine().is_transitioning());
    assert_eq!(scene.store.parent(detail), None);

    assert_eq!(transition.tick(&mut scene.store, Duration::from_millis(16)), None);
    assert_eq!(transition.engine().phase(), Phase::Animating);
    assert_eq!(scene.store.parent(detail), Some(scene.container));

    assert_eq!(run_to_end(&mut transition, &mut scene.store), Some(true));
    assert!(!transition.engine().in_navigation());
}

#[test]
fn sessions_run_back_to_back() {
    let mut scene = Scene::new();
    let list = scene.shown_screen_view();
    let detail = scene.screen_view();
    let log = HostLog::default();
    let mut transition = Transition::fade();

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
    assert_eq!(run_to_end(&mut transition, &mut scene.store), Some(true));

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
    assert_eq!(run_to_end(&mut transition, &mut scene.store), Some(true));

    assert_eq!(transition.engine().session(), 2);
    assert_eq!(scene.children(scene.container), [list]);
    // Dismissed screens get their alpha back for the next presentation.
    assert_eq!(scene.store.alpha(detail), 1.0);
    assert_eq!(scene.store.parent(detail), None);
    assert_eq!(log.count(|e| matches!(e, HostEvent::Complete(true))), 2);
}

#[test]
#[should_panic(expected = "already in progress")]
fn overlapping_sessions_panic() {
    let mut scene = Scene::new();
    let list = scene.shown_screen_view();
    let detail = scene.screen_view();
    let log = HostLog::default();
    let mut transition = Transition::fade();
    transition.setup_transition(true, false);
    for _ in 0..2 {
        transition.animate_transition(
            &mut scene.store,
            TransitionContext::new(
                scene.container,
                Screen::new(list, LIST),
                Screen::new(detail, DETAIL),
                log.host(),
            ),
        );
    }
}

/// Mirrors effective alpha per slot, as a platform tree would.
#[derive(Default)]
struct AlphaMirror {
    alphas: HashMap<u32, f64>,
}

impl Presenter for AlphaMirror {
    fn apply(&mut self, store: &ViewStore, changes: &FrameChanges) {
        for &idx in &changes.alphas {
            self.alphas.insert(idx, store.effective_alpha_at(idx));
        }
        for idx in &changes.removed {
            self.alphas.remove(idx);
        }
    }
}

#[test]
fn presenter_follows_the_fade_frame_by_frame() {
    let mut scene = Scene::new();
    let list = scene.shown_screen_view();
    let detail = scene.screen_view();
    let log = HostLog::default();
    let mut presenter = AlphaMirror::default();
    let changes = scene.store.evaluate();
    presenter.apply(&scene.store, &changes);

    let mut transition = Transition::fade();
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

    let mut seen = Vec::new();
    let mut ended = None;
    for _ in 0..100 {
        let changes = scene.store.evaluate();
        presenter.apply(&scene.store, &changes);
        seen.push(presenter.alphas.get(&detail.index()).copied());
        if ended.is_some() {
            break;
        }
        ended = transition.tick(&mut scene.store, Duration::from_millis(16));
    }

    assert_eq!(ended, Some(true));
    assert_eq!(seen.first(), Some(&Some(0.0)));
    assert_eq!(seen.last(), Some(&Some(1.0)));
    assert!(
        seen.iter().flatten().any(|&a| a > 0.0 && a < 1.0),
        "intermediate frames reach the presenter: {seen:?}"
    );
}
