// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hero sessions: matching by identifier, proxies, and interactive
//! positioning.

mod support;

use kurbo::{Point, Rect, Size};
use segue_core::host::TransitionContext;
use segue_core::modifier::HeroModifier;
use segue_core::screen::{Screen, ScreenKind};
use segue_core::state::SnapshotType;
use segue_core::transition::Transition;
use segue_core::view::{SurfaceId, ViewId};
use support::{HostEvent, HostLog, Scene, approx, rect_approx, run_to_end};

const LIST: ScreenKind = ScreenKind("list");
const DETAIL: ScreenKind = ScreenKind("detail");

struct Photos {
    scene: Scene,
    list: ViewId,
    thumb: ViewId,
    detail: ViewId,
    image: ViewId,
    caption: ViewId,
}

const THUMB: Rect = Rect::new(20.0, 20.0, 120.0, 120.0);

fn photos() -> Photos {
    let mut scene = Scene::new();
    let list = scene.shown_screen_view();
    let thumb = scene.child(list, THUMB);
    scene.store.set_hero_ids(thumb, ["photo"]);
    let detail = scene.screen_view();
    let image = scene.child(detail, Rect::new(0.0, 0.0, 400.0, 400.0));
    scene.store.set_hero_ids(image, ["photo"]);
    let caption = scene.child(detail, Rect::new(0.0, 420.0, 400.0, 460.0));
    scene.store.set_hero_modifiers(caption, vec![HeroModifier::Fade]);
    Photos {
        scene,
        list,
        thumb,
        detail,
        image,
        caption,
    }
}

fn present(p: &mut Photos, log: &HostLog) -> Transition {
    let mut transition = Transition::hero();
    transition.setup_transition(true, false);
    transition.animate_transition(
        &mut p.scene.store,
        TransitionContext::new(
            p.scene.container,
            Screen::new(p.list, LIST),
            Screen::new(p.detail, DETAIL),
            log.host(),
        ),
    );
    transition
}

fn point_approx(a: Point, b: Point) -> bool {
    approx(a.x, b.x) && approx(a.y, b.y)
}

#[test]
fn matched_views_morph_between_each_other() {
    let mut p = photos();
    let log = HostLog::default();
    let mut transition = present(&mut p, &log);

    assert!(transition.is_matched(p.thumb));
    assert!(transition.is_matched(p.image));
    assert!(!transition.is_matched(p.caption));
    assert!(transition.context_for(p.detail).is_none());

    let image = transition.context_for(p.image).expect("image participates");
    assert!(image.is_front);
    assert_eq!(image.matched, Some(p.thumb));
    assert_eq!(image.placeholder, None);
    assert_eq!(image.target.size, Some(Size::new(100.0, 100.0)));
    assert_eq!(image.source.size, Some(Size::new(400.0, 400.0)));
    let image_proxy = image.proxy;
    assert_ne!(image_proxy, p.image);
    assert_eq!(p.scene.store.parent(image_proxy), Some(p.scene.container));
    assert!(p.scene.store.content(image_proxy).is_some());
    assert!(p.scene.store.is_hidden(p.image));

    let caption = transition.context_for(p.caption).expect("caption participates");
    assert_eq!(caption.target.alpha, Some(0.0));
    assert_eq!(caption.source.alpha, Some(1.0));
    assert_eq!(p.scene.store.alpha(caption.proxy), 0.0);

    // The image starts where the thumbnail is.
    let start = transition
        .position_for(&p.scene.store, p.image)
        .expect("image has a proxy");
    assert!(point_approx(start, Point::new(70.0, 70.0)), "{start:?}");
    assert_eq!(p.scene.store.size(image_proxy), Size::new(100.0, 100.0));

    assert_eq!(run_to_end(&mut transition, &mut p.scene.store), Some(true));

    assert!(!p.scene.store.is_alive(image_proxy));
    assert!(!p.scene.store.is_hidden(p.image));
    assert!(!p.scene.store.is_hidden(p.thumb));
    assert_eq!(p.scene.children(p.scene.container), [p.detail]);
    assert!(transition.context_for(p.image).is_none());

    let events = log.events();
    assert_eq!(
        events[..3],
        [
            HostEvent::Snapshot(p.caption),
            HostEvent::Snapshot(p.image),
            HostEvent::Snapshot(p.thumb),
        ]
    );
    assert_eq!(
        events[3..],
        [
            HostEvent::Complete(true),
            HostEvent::Release(SurfaceId(1)),
            HostEvent::Release(SurfaceId(2)),
            HostEvent::Release(SurfaceId(3)),
        ]
    );
}

#[test]
fn live_view_is_animated_itself_and_put_back() {
    let mut p = photos();
    p.scene
        .store
        .set_hero_modifiers(p.thumb, vec![HeroModifier::LIVE_VIEW]);
    p.scene.store.set_hero_modifiers(p.caption, Vec::new());
    let log = HostLog::default();
    let mut transition = present(&mut p, &log);

    let thumb = transition.context_for(p.thumb).expect("thumb participates");
    assert_eq!(thumb.proxy, p.thumb);
    let placeholder = thumb.placeholder.expect("live views leave a placeholder");
    assert_eq!(p.scene.store.parent(placeholder), Some(p.list));
    assert_eq!(p.scene.store.parent(p.thumb), Some(p.scene.container));
    assert!(!p.scene.store.is_hidden(p.thumb));
    assert!(transition.context_for(p.caption).is_none());

    assert_eq!(run_to_end(&mut transition, &mut p.scene.store), Some(true));

    assert!(!p.scene.store.is_alive(placeholder));
    assert_eq!(p.scene.store.parent(p.thumb), Some(p.list));
    assert_eq!(p.scene.children(p.list), [p.thumb]);
    assert!(rect_approx(
        p.scene.store.frame_without_transform(p.thumb),
        THUMB
    ));
    assert!(!p.scene.store.is_hidden(p.thumb));
    assert_eq!(
        log.events(),
        [
            HostEvent::Snapshot(p.image),
            HostEvent::Complete(true),
            HostEvent::Release(SurfaceId(1)),
        ]
    );
}

#[test]
fn dragging_a_proxy_moves_its_counterpart() {
    let mut p = photos();
    let log = HostLog::default();
    let mut transition = present(&mut p, &log);

    transition.begin_interactive_transition(&mut p.scene.store);
    transition.set_fraction_completed(&mut p.scene.store, 0.5);
    let target = Point::new(300.0, 300.0);
    transition.apply_position(&mut p.scene.store, target, p.image);

    let image = transition
        .position_for(&p.scene.store, p.image)
        .expect("image has a proxy");
    let thumb = transition
        .position_for(&p.scene.store, p.thumb)
        .expect("thumb has a proxy");
    assert!(point_approx(image, target), "{image:?}");
    assert!(point_approx(thumb, target), "{thumb:?}");

    // Scrubbing leaves the paused positions alone.
    transition.set_fraction_completed(&mut p.scene.store, 0.8);
    let image = transition
        .position_for(&p.scene.store, p.image)
        .expect("image has a proxy");
    assert!(point_approx(image, target), "{image:?}");

    transition.end_interactive_transition(&mut p.scene.store, true);
    assert_eq!(run_to_end(&mut transition, &mut p.scene.store), Some(true));
    assert_eq!(log.count(|e| *e == HostEvent::Pause), 1);
    assert_eq!(log.count(|e| *e == HostEvent::Finish), 1);
    assert_eq!(log.count(|e| matches!(e, HostEvent::Release(_))), 3);
    assert_eq!(p.scene.store.parent(p.image), Some(p.detail));
}

#[test]
fn dismissal_morphs_back_into_the_thumbnail() {
    let mut p = photos();
    let log = HostLog::default();
    let mut transition = present(&mut p, &log);
    assert_eq!(run_to_end(&mut transition, &mut p.scene.store), Some(true));

    transition.setup_transition(false, false);
    transition.animate_transition(
        &mut p.scene.store,
        TransitionContext::new(
            p.scene.container,
            Screen::new(p.detail, DETAIL),
            Screen::new(p.list, LIST),
            log.host(),
        ),
    );
    // Dismissing starts from the presented state.
    let start = transition
        .position_for(&p.scene.store, p.image)
        .expect("image has a proxy");
    assert!(point_approx(start, Point::new(200.0, 200.0)), "{start:?}");

    assert_eq!(run_to_end(&mut transition, &mut p.scene.store), Some(true));
    assert_eq!(p.scene.children(p.scene.container), [p.list]);
    assert_eq!(p.scene.store.parent(p.detail), None);
}

fn present_screens(scene: &mut Scene, from: ViewId, to: ViewId, log: &HostLog) -> Transition {
    let mut transition = Transition::hero();
    transition.setup_transition(true, false);
    transition.animate_transition(
        &mut scene.store,
        TransitionContext::new(
            scene.container,
            Screen::new(from, LIST),
            Screen::new(to, DETAIL),
            log.host(),
        ),
    );
    transition
}

/// A list screen with a matched card holding a fading badge, and a detail
/// screen with the card's counterpart.
struct Cards {
    scene: Scene,
    list: ViewId,
    card: ViewId,
    badge: ViewId,
    detail: ViewId,
}

fn cards(card_modifiers: Vec<HeroModifier>, badge_modifiers: Vec<HeroModifier>) -> Cards {
    let mut scene = Scene::new();
    let list = scene.shown_screen_view();
    let card = scene.child(list, Rect::new(20.0, 100.0, 380.0, 300.0));
    scene.store.set_hero_ids(card, ["card"]);
    scene.store.set_hero_modifiers(card, card_modifiers);
    let badge = scene.child(card, Rect::new(10.0, 10.0, 40.0, 40.0));
    scene.store.set_hero_modifiers(badge, badge_modifiers);
    let detail = scene.screen_view();
    let header = scene.child(detail, Rect::new(0.0, 0.0, 400.0, 300.0));
    scene.store.set_hero_ids(header, ["card"]);
    Cards {
        scene,
        list,
        card,
        badge,
        detail,
    }
}

#[test]
fn nested_proxy_rides_inside_its_ancestor_proxy() {
    let mut c = cards(Vec::new(), vec![HeroModifier::Fade]);
    let log = HostLog::default();
    let mut transition = present_screens(&mut c.scene, c.list, c.detail, &log);

    let card = transition.context_for(c.card).expect("card participates");
    let badge = transition.context_for(c.badge).expect("badge participates");
    assert_eq!(badge.matched_super_view, Some(c.card));
    assert_eq!(c.scene.store.parent(badge.proxy), Some(card.proxy));
    assert_eq!(c.scene.store.parent(card.proxy), Some(c.scene.container));
    // The badge is hidden before the card is captured.
    let snapshots: Vec<_> = log
        .events()
        .into_iter()
        .filter(|e| matches!(e, HostEvent::Snapshot(_)))
        .collect();
    let badge_at = snapshots.iter().position(|e| *e == HostEvent::Snapshot(c.badge));
    let card_at = snapshots.iter().position(|e| *e == HostEvent::Snapshot(c.card));
    assert!(badge_at.is_some() && badge_at < card_at, "{snapshots:?}");

    assert_eq!(run_to_end(&mut transition, &mut c.scene.store), Some(true));
    assert!(!c.scene.store.is_hidden(c.badge));
    assert_eq!(c.scene.store.parent(c.badge), Some(c.card));
}

#[test]
fn global_container_parents_under_the_transition_container() {
    let mut c = cards(
        Vec::new(),
        vec![HeroModifier::Fade, HeroModifier::GLOBAL_CONTAINER],
    );
    let log = HostLog::default();
    let transition = present_screens(&mut c.scene, c.list, c.detail, &log);

    let badge = transition.context_for(c.badge).expect("badge participates");
    assert_eq!(badge.matched_super_view, None);
    assert_eq!(c.scene.store.parent(badge.proxy), Some(c.scene.container));
}

#[test]
fn skipped_container_passes_children_up() {
    let mut c = cards(vec![HeroModifier::SkipContainer], vec![HeroModifier::Fade]);
    let log = HostLog::default();
    let transition = present_screens(&mut c.scene, c.list, c.detail, &log);

    assert!(transition.is_matched(c.card));
    let badge = transition.context_for(c.badge).expect("badge participates");
    assert_eq!(badge.matched_super_view, None);
    assert_eq!(c.scene.store.parent(badge.proxy), Some(c.scene.container));
}

#[test]
fn later_view_wins_a_shared_id() {
    let mut scene = Scene::new();
    let list = scene.shown_screen_view();
    let first = scene.child(list, Rect::new(0.0, 0.0, 50.0, 50.0));
    let second = scene.child(list, Rect::new(0.0, 60.0, 50.0, 110.0));
    scene.store.set_hero_ids(first, ["photo"]);
    scene.store.set_hero_ids(second, ["photo"]);
    let detail = scene.screen_view();
    let image = scene.child(detail, Rect::new(0.0, 0.0, 400.0, 400.0));
    scene.store.set_hero_ids(image, ["photo"]);
    let log = HostLog::default();
    let transition = present_screens(&mut scene, list, detail, &log);

    let image = transition.context_for(image).expect("image participates");
    assert_eq!(image.matched, Some(second));
    assert_eq!(image.target.size, Some(Size::new(50.0, 50.0)));
}

#[test]
fn forced_view_travels_live() {
    let mut p = photos();
    p.scene
        .store
        .set_hero_modifiers(p.caption, vec![HeroModifier::ForceTransition]);
    let log = HostLog::default();
    let mut transition = present(&mut p, &log);

    let caption = transition.context_for(p.caption).expect("caption participates");
    assert_eq!(caption.proxy, p.caption);
    let placeholder = caption.placeholder.expect("forced views leave a placeholder");
    assert_eq!(p.scene.store.parent(placeholder), Some(p.detail));
    assert_eq!(p.scene.store.parent(p.caption), Some(p.scene.container));
    assert_eq!(log.count(|e| *e == HostEvent::Snapshot(p.caption)), 0);

    assert_eq!(run_to_end(&mut transition, &mut p.scene.store), Some(true));
    assert!(!p.scene.store.is_alive(placeholder));
    assert_eq!(p.scene.store.parent(p.caption), Some(p.detail));
}

#[test]
fn forced_view_keeps_an_explicit_bitmap() {
    let mut p = photos();
    p.scene.store.set_hero_modifiers(
        p.caption,
        vec![
            HeroModifier::ForceTransition,
            HeroModifier::SnapshotType(SnapshotType::Bitmap),
        ],
    );
    let log = HostLog::default();
    let transition = present(&mut p, &log);

    let caption = transition.context_for(p.caption).expect("caption participates");
    assert_ne!(caption.proxy, p.caption);
    assert_eq!(caption.placeholder, None);
    assert_eq!(log.count(|e| *e == HostEvent::Snapshot(p.caption)), 1);
}
