// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hero transition: matches views across two screens and morphs between
//! them.
//!
//! Both screen trees are flattened and every view's hero identifiers are
//! indexed per side. Each view's modifier list (one `match` per identifier,
//! then the authored modifiers) is resolved with
//! [`resolve`](crate::pipeline::resolve). A view *participates* when its
//! match resolved to a view on the other screen, or when the resolved state
//! sets anything besides the match.
//!
//! Every participant gets a proxy: a bitmap snapshot by default, or the
//! live view itself (leaving a placeholder at its original position) with
//! [`HeroModifier::LIVE_VIEW`](crate::modifier::HeroModifier::LIVE_VIEW).
//! Proxies are parented under the proxy of the nearest participating
//! ancestor, or directly under the transition container, and animate
//! between a *source* and a *target* [`ViewState`]:
//!
//! ```text
//!   target   = geometry(match or self) ⊕ current(begin_with fields) ⊕ resolved
//!   source   = geometry(self) ⊕ current(resolved fields) ⊕ begin_with
//!   original = geometry(self) ⊕ current(source fields) ⊕ current(target fields)
//! ```
//!
//! Foreground views are at their source state when presented; background
//! views are at their source state when dismissed.

mod capture;

use std::collections::HashMap;

use kurbo::{Point, Rect};

use crate::animator::AnimatableProperty;
use crate::modifier::HeroModifier;
use crate::pipeline::{ModifierMetadata, resolve};
use crate::state::{ContainerType, SnapshotType, ViewState};
use crate::trace::{SnapshotEvent, ViewsMatchedEvent};
use crate::transition::{TransitionEngine, TransitionStyle};
use crate::view::{ContentMode, SurfaceId, ViewId, ViewStore};

use capture::{apply_view_state, keyframe_timing, original_state, source_state, target_state};

/// Per-view bookkeeping for one hero session.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewTransitionContext {
    /// Whether the view is on the foreground screen.
    pub is_front: bool,
    /// The matched view on the other screen.
    pub matched: Option<ViewId>,
    /// Nearest participating ancestor whose proxy hosts this one.
    pub matched_super_view: Option<ViewId>,
    /// The view that animates in place of this one.
    pub proxy: ViewId,
    /// For live proxies, the view marking the original position.
    pub placeholder: Option<ViewId>,
    /// State at the view's own end of the animation.
    pub source: ViewState,
    /// State at the other end.
    pub target: ViewState,
    /// State restoring a live view once the session ends.
    pub original: ViewState,
}

/// The matching-engine transition.
#[derive(Debug, Default)]
pub struct HeroTransition {
    contexts: HashMap<ViewId, ViewTransitionContext>,
    surfaces: Vec<SurfaceId>,
}

struct Resolved {
    view: ViewId,
    is_front: bool,
    matched: Option<ViewId>,
    matched_super_view: Option<ViewId>,
    source: ViewState,
    target: ViewState,
    original: ViewState,
}

fn index_ids(store: &ViewStore, views: &[ViewId]) -> HashMap<String, ViewId> {
    let mut map = HashMap::new();
    for &view in views {
        for id in store.hero_ids(view) {
            map.insert(id.clone(), view);
        }
    }
    map
}

impl HeroTransition {
    /// Creates a hero transition.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session context of `view`, if it participates.
    #[must_use]
    pub fn context_for(&self, view: ViewId) -> Option<&ViewTransitionContext> {
        self.contexts.get(&view)
    }

    /// Returns whether `view` participates and found a counterpart.
    #[must_use]
    pub fn is_matched(&self, view: ViewId) -> bool {
        self.contexts.get(&view).is_some_and(|c| c.matched.is_some())
    }

    /// Returns where the proxy of `view` currently is, in the space of the
    /// parent `view` had when the session began.
    #[must_use]
    pub fn position_for(&self, store: &ViewStore, view: ViewId) -> Option<Point> {
        let context = self.contexts.get(&view)?;
        let space = context.placeholder.map_or(store.parent(view), |p| store.parent(p))?;
        let proxy_parent = store.parent(context.proxy)?;
        Some(store.convert_point(store.center(context.proxy), proxy_parent, space))
    }

    /// Moves the proxy of `view`, and the proxy of its counterpart, to
    /// `position` given in the space of the parent `view` had when the
    /// session began. Their position tracks are paused until the
    /// interaction ends.
    pub fn apply_position(
        &self,
        engine: &mut TransitionEngine,
        store: &mut ViewStore,
        position: Point,
        view: ViewId,
    ) {
        let Some(context) = self.contexts.get(&view) else {
            return;
        };
        let Some(space) = context.placeholder.map_or(store.parent(view), |p| store.parent(p)) else {
            return;
        };
        let mut proxies = vec![context.proxy];
        if let Some(other) = context.matched.and_then(|m| self.contexts.get(&m)) {
            proxies.push(other.proxy);
        }
        for proxy in proxies {
            let Some(parent) = store.parent(proxy) else {
                continue;
            };
            engine.pause(proxy, AnimatableProperty::Center);
            let center = store.convert_point(position, space, parent);
            store.set_center(proxy, center);
        }
    }

    fn resolve_side(
        engine: &TransitionEngine,
        store: &ViewStore,
        views: &[ViewId],
        is_front: bool,
        tables: (&HashMap<String, ViewId>, &HashMap<String, ViewId>),
        participants: &mut Vec<Resolved>,
    ) {
        let (our_views, other_views) = tables;
        let container = engine.session_views().container;
        let other_screen = if is_front {
            engine.background_screen()
        } else {
            engine.foreground_screen()
        }
        .map(|s| s.kind)
        .unwrap_or_default();

        for &view in views {
            let modifiers: Vec<HeroModifier> = store
                .hero_ids(view)
                .iter()
                .rev()
                .map(|id| HeroModifier::Match(id.clone()))
                .chain(store.hero_modifiers(view).iter().cloned())
                .collect();
            let mut metadata = ModifierMetadata {
                container_size: store.size(container),
                our_views,
                other_views,
                other_screen,
                is_presenting: engine.is_presenting(),
                is_foreground: is_front,
                is_matched: false,
            };
            let mut resolved = resolve(&modifiers, &mut metadata);
            if resolved.force_transition == Some(true) && resolved.snapshot_type.is_none() {
                resolved.snapshot_type = Some(SnapshotType::LiveView);
            }
            let matched = resolved
                .match_id
                .as_ref()
                .and_then(|id| other_views.get(id).copied());
            if matched.is_none() && resolved.is_only_match() {
                continue;
            }

            let matched_super_view = match resolved.container_type.unwrap_or_default() {
                ContainerType::Parent => store
                    .ancestors(view)
                    .find(|a| {
                        participants
                            .iter()
                            .any(|p| p.view == *a && p.target.skip_container != Some(true))
                    }),
                ContainerType::Global => None,
            };
            let source = source_state(store, view, &resolved);
            let target = target_state(store, matched.unwrap_or(view), &resolved);
            let original = original_state(store, view, &source, &target);
            participants.push(Resolved {
                view,
                is_front,
                matched,
                matched_super_view,
                source,
                target,
                original,
            });
        }
    }

    fn snapshot(engine: &mut TransitionEngine, store: &mut ViewStore, view: ViewId) -> (ViewId, SurfaceId) {
        let corner_radius = store.corner_radius(view);
        store.set_corner_radius(view, 0.0);
        let surface = match engine.host_mut() {
            Some(host) => host.snapshot(store, view),
            None => SurfaceId(0),
        };
        store.set_corner_radius(view, corner_radius);

        let shadow = store.shadow(view);
        let proxy = store.create_view_with_frame(Rect::from_origin_size(Point::ZERO, store.size(view)));
        store.set_content(proxy, Some(surface));
        store.set_content_mode(proxy, ContentMode::AspectFill);
        store.set_shadow_color(proxy, shadow.color);
        store.set_shadow_radius(proxy, shadow.radius);
        store.set_shadow_offset(proxy, shadow.offset);
        store.set_corner_radius(proxy, corner_radius);
        store.set_masked_corners(proxy, store.masked_corners(view));
        store.set_clips_to_bounds(proxy, store.clips_to_bounds(view));
        store.set_background_color(proxy, store.background_color(view));
        (proxy, surface)
    }
}

impl TransitionStyle for HeroTransition {
    fn name(&self) -> &'static str {
        "hero"
    }

    fn animate(&mut self, engine: &mut TransitionEngine, store: &mut ViewStore) {
        self.contexts.clear();
        let views = engine.session_views();
        let is_presenting = engine.is_presenting();
        let duration = engine.duration();

        let front = store.flattened(views.foreground);
        let back = store.flattened(views.background);
        let front_ids = index_ids(store, &front);
        let back_ids = index_ids(store, &back);

        let mut participants = Vec::new();
        Self::resolve_side(engine, store, &back, false, (&back_ids, &front_ids), &mut participants);
        Self::resolve_side(engine, store, &front, true, (&front_ids, &back_ids), &mut participants);
        engine.tracer_mut().views_matched(&ViewsMatchedEvent {
            session: engine.session(),
            participants: participants.len(),
            matched_pairs: participants
                .iter()
                .filter(|p| !p.is_front && p.matched.is_some())
                .count(),
        });

        // Children first, so a child is hidden before its parent is captured.
        for resolved in participants.iter().rev() {
            let view = resolved.view;
            let snapshot_type = resolved.target.snapshot_type.unwrap_or_default();
            let (proxy, placeholder) = match snapshot_type {
                SnapshotType::Bitmap => {
                    let (proxy, surface) = Self::snapshot(engine, store, view);
                    self.surfaces.push(surface);
                    (proxy, None)
                }
                SnapshotType::LiveView => {
                    let placeholder = store.create_view();
                    if store.parent(view).is_some() {
                        store.insert_after(placeholder, view);
                    }
                    (view, Some(placeholder))
                }
            };
            if resolved.target.overlay_color.is_some() || resolved.source.overlay_color.is_some() {
                store.ensure_overlay(proxy);
            }
            store.set_hidden(view, true);
            engine.tracer_mut().snapshot(&SnapshotEvent {
                session: engine.session(),
                view,
                proxy,
                snapshot_type,
            });
            self.contexts.insert(
                view,
                ViewTransitionContext {
                    is_front: resolved.is_front,
                    matched: resolved.matched,
                    matched_super_view: resolved.matched_super_view,
                    proxy,
                    placeholder,
                    source: resolved.source.clone(),
                    target: resolved.target.clone(),
                    original: resolved.original.clone(),
                },
            );
        }

        let mut completions = Vec::with_capacity(participants.len());
        for resolved in &participants {
            let context = self.contexts[&resolved.view].clone();
            let proxy = context.proxy;
            let host_view = context
                .matched_super_view
                .and_then(|s| self.contexts.get(&s))
                .map_or(views.container, |c| c.proxy);
            store.reparent(proxy, host_view);
            store.set_hidden(proxy, false);

            for presented in [false, true] {
                let state = if context.is_front == presented {
                    context.source.clone()
                } else {
                    context.target.clone()
                };
                let timing = if presented == is_presenting {
                    keyframe_timing(&context.target, duration)
                } else {
                    None
                };
                let apply = move |store: &mut ViewStore| match timing {
                    Some((start, length)) => {
                        store.animate_keyframe(start, length, |s| apply_view_state(s, &state, proxy));
                    }
                    None => apply_view_state(store, &state, proxy),
                };
                if presented {
                    engine.add_present_state_block(apply);
                } else {
                    engine.add_dismiss_state_block(apply);
                }
            }
            completions.push((resolved.view, context, views.container));
        }

        // Restore children before their parents' proxies are discarded.
        for (view, context, container) in completions.into_iter().rev() {
            engine.add_completion_block(move |store, _finished| {
                let proxy = context.proxy;
                match context.placeholder {
                    Some(placeholder) => {
                        if let Some(parent) = store.parent(placeholder)
                            && parent != container
                        {
                            store.insert_before(proxy, placeholder);
                        }
                        store.detach(placeholder);
                        store.destroy_view(placeholder);
                        store.remove_overlay(proxy);
                        store.set_hidden(proxy, false);
                        apply_view_state(store, &context.original, proxy);
                    }
                    None => {
                        if store.is_alive(proxy) {
                            store.destroy_subtree(proxy);
                        }
                        store.set_hidden(view, false);
                    }
                }
            });
        }
    }

    fn animation_ended(&mut self, engine: &mut TransitionEngine, _store: &mut ViewStore, _completed: bool) {
        self.contexts.clear();
        let surfaces = core::mem::take(&mut self.surfaces);
        if let Some(host) = engine.host_mut() {
            for surface in surfaces {
                host.release_snapshot(surface);
            }
        }
    }
}
