// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A floating card that grows out of a matched view.
//!
//! The foreground screen is moved into a rounded, shadowed container. When
//! the background screen supplies a matched *source* view (through a
//! [`MatchDelegate`] capability), the container starts at the source's frame
//! and the foreground is scaled to fill it; the source itself rides along
//! inside the container and fades out. Without a source, the container slides
//! in from the right (or from below when the dismiss drag was vertical).
//!
//! The transition supports drag-to-dismiss: feed pointer samples to
//! [`MatchTransition::handle_drag`] after
//! [`gesture_should_begin`](MatchTransition::gesture_should_begin) admitted
//! the drag.

use kurbo::{Point, Rect, Size, Vec2};

use crate::animator::AnimatableProperty;
use crate::color::Color;
use crate::screen::{Screen, find_capability};
use crate::transform::Transform3d;
use crate::transition::{DragGesture, DragOutcome, DragPhase, SessionViews, TransitionEngine, TransitionStyle};
use crate::view::{ViewId, ViewStore};

/// Provides the view a match transition morphs from or into.
///
/// Implemented by screens (installed in
/// [`Capabilities::match_delegate`](crate::screen::Capabilities::match_delegate)).
/// The background screen supplies the source view, the foreground screen the
/// destination.
pub trait MatchDelegate {
    /// Returns the matched view in this screen's own tree, given the screen on
    /// the other side of the transition.
    fn matched_view_for(&self, store: &ViewStore, other: &Screen) -> Option<ViewId>;
}

/// Knobs of a [`MatchTransition`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MatchOptions {
    /// Allow dismissing with a downward drag.
    pub can_dismiss_vertically: bool,
    /// Allow dismissing with a rightward drag.
    pub can_dismiss_horizontally: bool,
    /// Report the presented view from
    /// [`dismiss_gesture_view`](MatchTransition::dismiss_gesture_view) so the
    /// host attaches the dismiss drag to it.
    pub automatically_add_dismiss_gesture: bool,
    /// How far the card follows the pointer, per axis. `0.5` moves the card
    /// half as far as the pointer.
    pub drag_translation_factor: Vec2,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            can_dismiss_vertically: true,
            can_dismiss_horizontally: true,
            automatically_add_dismiss_gesture: true,
            drag_translation_factor: Vec2::new(0.5, 0.5),
        }
    }
}

/// The match transition.
#[derive(Debug, Default)]
pub struct MatchTransition {
    options: MatchOptions,
    is_matched: bool,
    is_transitioning_vertically: bool,
    card: Option<ViewId>,
    gesture_view: Option<ViewId>,
    last_translation: Vec2,
}

fn matched_view(store: &ViewStore, screen: &Screen, other: &Screen) -> Option<ViewId> {
    find_capability(screen, |c| c.match_delegate.clone())?.matched_view_for(store, other)
}

fn set_card_corner_radius(store: &mut ViewStore, card: ViewId, content: ViewId, radius: f64) {
    store.set_corner_radius(card, radius);
    store.set_corner_radius(content, radius);
}

fn set_card_frame(store: &mut ViewStore, card: ViewId, content: ViewId, frame: Rect) {
    store.set_frame_without_transform(card, frame);
    store.set_frame_without_transform(content, Rect::from_origin_size(Point::ZERO, frame.size()));
}

/// Transform that shrinks a screen of `container` size so that the
/// `presented` rect inside it fills a card of `dismissed` size, centered.
pub(crate) fn fill_transform(presented: Rect, dismissed: Rect, container: Size) -> Transform3d {
    if presented.width() <= 0.0 || presented.height() <= 0.0 || container.width <= 0.0 {
        return Transform3d::IDENTITY;
    }
    let fill = (dismissed.width() / presented.width()).max(dismissed.height() / presented.height());
    let scaled = Size::new(presented.width() * fill, presented.height() * fill);
    let scale = scaled.width / container.width;
    let size_offset = Vec2::new(
        (dismissed.width() - scaled.width) / 2.0,
        (dismissed.height() - scaled.height) / 2.0,
    );
    let origin_offset = -presented.y0 * scale;
    let offset_x = -(1.0 - scale) / 2.0 * container.width;
    let offset_y = -(1.0 - scale) / 2.0 * container.height;
    Transform3d::from_translation(
        offset_x + size_offset.x,
        offset_y + size_offset.y + origin_offset,
        0.0,
    ) * Transform3d::from_scale(scale, scale, 1.0)
}

impl MatchTransition {
    /// Creates a match transition.
    #[must_use]
    pub fn new(options: MatchOptions) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Returns the options.
    #[must_use]
    pub fn options(&self) -> &MatchOptions {
        &self.options
    }

    /// Returns the options mutably.
    pub fn options_mut(&mut self) -> &mut MatchOptions {
        &mut self.options
    }

    /// Returns whether the current session found a source view.
    #[must_use]
    pub fn is_matched(&self) -> bool {
        self.is_matched
    }

    /// Returns whether the admitted dismiss drag was vertical.
    #[must_use]
    pub fn is_transitioning_vertically(&self) -> bool {
        self.is_transitioning_vertically
    }

    /// Returns the card the foreground screen floats in during a session.
    #[must_use]
    pub fn card(&self) -> Option<ViewId> {
        self.card
    }

    /// Returns the view the host should attach the dismiss drag to.
    #[must_use]
    pub fn dismiss_gesture_view(&self) -> Option<ViewId> {
        self.gesture_view
    }

    // -- Dismiss gesture --

    /// Decides whether a drag with the sample's velocity may start a
    /// dismissal. Only rightward and downward drags qualify.
    pub fn gesture_should_begin(&mut self, gesture: &DragGesture) -> bool {
        let v = gesture.velocity;
        let horizontal = self.options.can_dismiss_horizontally && v.x > v.y.abs();
        let vertical = self.options.can_dismiss_vertically && v.y > v.x.abs();
        self.is_transitioning_vertically = vertical;
        horizontal || vertical
    }

    /// Returns whether the dismiss drag wins over the pan of `scroll_view`:
    /// true while its content sits at the leading edge.
    #[must_use]
    pub fn takes_priority_over(store: &ViewStore, scroll_view: ViewId) -> bool {
        store
            .scroll_state(scroll_view)
            .is_some_and(|s| s.is_at_leading_edge(store.size(scroll_view)))
    }

    fn progress_for(&self, engine: &TransitionEngine, store: &ViewStore, delta: Vec2) -> f64 {
        let Some(container) = engine.container() else {
            return 0.0;
        };
        let size = store.size(container);
        let progress = if self.is_matched {
            let max_axis = size.width.max(size.height);
            if max_axis <= 0.0 {
                return 0.0;
            }
            (delta.x + delta.y) / max_axis
        } else if self.is_transitioning_vertically {
            if size.height <= 0.0 {
                return 0.0;
            }
            delta.y / size.height
        } else {
            if size.width <= 0.0 {
                return 0.0;
            }
            delta.x / size.width
        };
        if engine.is_presenting() { -progress } else { progress }
    }

    /// Feeds one sample of the dismiss drag.
    ///
    /// A drag that begins while no session runs returns
    /// [`DragOutcome::RequestDismiss`]: the host should start the dismissal,
    /// which then begins paused under the drag's control.
    pub fn handle_drag(
        &mut self,
        engine: &mut TransitionEngine,
        store: &mut ViewStore,
        gesture: &DragGesture,
    ) -> DragOutcome {
        match gesture.phase {
            DragPhase::Began => {
                self.last_translation = Vec2::ZERO;
                let was_transitioning = engine.is_transitioning();
                engine.begin_interactive_transition(store);
                if !was_transitioning {
                    return DragOutcome::RequestDismiss;
                }
                if let Some(card) = self.card {
                    engine.pause(card, AnimatableProperty::Center);
                }
                DragOutcome::Tracking
            }
            DragPhase::Changed => {
                if !engine.is_interactive() {
                    return DragOutcome::Ignored;
                }
                let delta = gesture.translation - self.last_translation;
                self.last_translation = gesture.translation;
                if self.is_matched
                    && let Some(card) = self.card
                    && store.is_alive(card)
                {
                    let factor = self.options.drag_translation_factor;
                    let center = store.center(card) + Vec2::new(delta.x * factor.x, delta.y * factor.y);
                    store.set_center(card, center);
                }
                let progress = self.progress_for(engine, store, delta);
                let fraction = (engine.fraction_completed() + progress).clamp(0.0, 1.0);
                engine.set_fraction_completed(store, fraction);
                DragOutcome::Tracking
            }
            DragPhase::Ended | DragPhase::Cancelled => {
                if !engine.is_interactive() {
                    return DragOutcome::Ignored;
                }
                let projected = gesture.translation + gesture.velocity;
                let should_dismiss = projected.x + projected.y > 80.0;
                let should_finish = if engine.is_presenting() {
                    !should_dismiss
                } else {
                    should_dismiss
                };
                if should_dismiss {
                    if let Some(card) = self.card
                        && store.is_alive(card)
                    {
                        store.set_user_interaction_enabled(card, false);
                    }
                    if let Some(overlay) = engine.background_view().and_then(|b| store.overlay(b)) {
                        store.set_user_interaction_enabled(overlay, false);
                    }
                }
                engine.end_interactive_transition(store, should_finish);
                DragOutcome::Released { should_finish }
            }
        }
    }
}

impl TransitionStyle for MatchTransition {
    fn name(&self) -> &'static str {
        "match"
    }

    fn animate(&mut self, engine: &mut TransitionEngine, store: &mut ViewStore) {
        let SessionViews {
            container,
            foreground: front,
            background: back,
        } = engine.session_views();

        let (destination, source) = match (engine.foreground_screen(), engine.background_screen()) {
            (Some(fg), Some(bg)) => (matched_view(store, fg, bg), matched_view(store, bg, fg)),
            _ => (None, None),
        };
        self.is_matched = source.is_some();
        if engine.is_presenting() && self.options.automatically_add_dismiss_gesture {
            self.gesture_view = Some(front);
        }

        let traits = engine.traits();
        let final_corner_radius = if traits.is_full_screen {
            traits.display_corner_radius
        } else {
            0.0
        };
        let bounds = store.bounds(container);

        let card = store.create_view_with_frame(bounds);
        let content = store.create_view_with_frame(Rect::from_origin_size(Point::ZERO, bounds.size()));
        store.set_clips_to_bounds(content, true);
        store.add_child(card, content);
        set_card_corner_radius(store, card, content, final_corner_radius);
        store.set_background_color(card, store.background_color(front));
        store.set_shadow_color(card, Color::BLACK);
        store.add_child(container, card);
        store.reparent(front, content);
        self.card = Some(card);

        let default_dismissed = if self.is_transitioning_vertically {
            bounds + Vec2::new(0.0, bounds.height())
        } else {
            bounds + Vec2::new(bounds.width(), 0.0)
        };
        let dismissed = source.map_or(default_dismissed, |v| {
            store.convert_rect(store.bounds(v), v, container)
        });
        let presented = destination.map_or(bounds, |v| {
            store.convert_rect(store.bounds(v), v, container)
        });
        let source_corner_radius = source.map_or(0.0, |v| store.corner_radius(v));

        let overlay = store.ensure_overlay(back);
        let placeholder = store.create_view();
        if let Some(source) = source {
            if store.parent(source).is_some() {
                store.insert_after(placeholder, source);
            }
            store.reparent(source, content);
        }

        let fill = fill_transform(presented, dismissed, bounds.size());
        engine.add_dismiss_state_block(move |store| {
            set_card_corner_radius(store, card, content, source_corner_radius);
            set_card_frame(store, card, content, dismissed);
            store.set_shadow_opacity(card, 0.0);
            store.set_shadow_radius(card, 8.0);
            if let Some(source) = source {
                store.set_transform(front, fill);
                store.set_frame_without_transform(
                    source,
                    Rect::from_origin_size(Point::ZERO, dismissed.size()),
                );
                store.set_alpha(source, 1.0);
            }
            store.set_background_color(overlay, Some(Color::CLEAR));
        });
        engine.add_present_state_block(move |store| {
            set_card_corner_radius(store, card, content, final_corner_radius);
            set_card_frame(store, card, content, bounds);
            store.set_shadow_opacity(card, 0.4);
            store.set_shadow_radius(card, 32.0);
            store.set_transform(front, Transform3d::IDENTITY);
            if let Some(source) = source {
                store.set_frame_without_transform(source, presented);
                store.set_alpha(source, 0.0);
            }
            store.set_background_color(overlay, Some(Color::BLACK.with_alpha(0.5)));
        });
        engine.add_completion_block(move |store, _finished| {
            if store.is_alive(back) {
                store.remove_overlay(back);
            }
            store.reparent(front, container);
            if let Some(source) = source {
                if let Some(parent) = store.parent(placeholder)
                    && parent != container
                {
                    let frame = store.convert_rect(dismissed, container, parent);
                    store.set_frame_without_transform(source, frame);
                    store.insert_before(source, placeholder);
                } else if store.parent(source) == Some(content) {
                    store.detach(source);
                }
                store.set_alpha(source, 1.0);
            }
            store.destroy_view(placeholder);
            store.destroy_subtree(card);
        });

        let is_matched = self.is_matched;
        engine.add_start_block(move |engine, _store| {
            if engine.is_interactive() && is_matched {
                engine.pause(card, AnimatableProperty::Center);
            }
        });
    }

    fn animation_ended(&mut self, engine: &mut TransitionEngine, _store: &mut ViewStore, completed: bool) {
        if engine.is_presenting() != completed {
            self.gesture_view = None;
        }
        self.is_matched = false;
        self.is_transitioning_vertically = false;
        self.card = None;
        self.last_translation = Vec2::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(velocity: Vec2) -> DragGesture {
        DragGesture::new(DragPhase::Began, Vec2::ZERO, velocity, Point::ZERO)
    }

    #[test]
    fn fill_transform_centers_the_destination_in_the_card() {
        let presented = Rect::new(0.0, 0.0, 400.0, 800.0);
        let dismissed = Rect::new(50.0, 100.0, 150.0, 200.0);
        let t = fill_transform(presented, dismissed, Size::new(400.0, 800.0));
        assert_eq!(t.col(0)[0], 0.25);
        assert_eq!(t.col(1)[1], 0.25);
        assert_eq!(t.translation(), [-150.0, -350.0, 0.0]);
    }

    #[test]
    fn fill_transform_of_the_full_rect_is_identity() {
        let bounds = Rect::new(0.0, 0.0, 400.0, 800.0);
        let t = fill_transform(bounds, bounds, bounds.size());
        assert!(t.approx_eq(&Transform3d::IDENTITY, 1e-12));
    }

    #[test]
    fn admits_only_right_and_down() {
        let mut t = MatchTransition::new(MatchOptions::default());
        assert!(t.gesture_should_begin(&sample(Vec2::new(300.0, 20.0))));
        assert!(!t.is_transitioning_vertically());
        assert!(t.gesture_should_begin(&sample(Vec2::new(10.0, 300.0))));
        assert!(t.is_transitioning_vertically());
        assert!(!t.gesture_should_begin(&sample(Vec2::new(-300.0, 0.0))));
        assert!(!t.gesture_should_begin(&sample(Vec2::new(0.0, -300.0))));
    }

    #[test]
    fn axis_opt_outs() {
        let mut t = MatchTransition::new(MatchOptions {
            can_dismiss_vertically: false,
            ..MatchOptions::default()
        });
        assert!(!t.gesture_should_begin(&sample(Vec2::new(0.0, 300.0))));
        assert!(t.gesture_should_begin(&sample(Vec2::new(300.0, 0.0))));
    }

    #[test]
    fn scroll_priority_follows_leading_edge() {
        use crate::view::ScrollState;
        use kurbo::Insets;

        let mut store = ViewStore::new();
        let scroll = store.create_view_with_frame(Rect::new(0.0, 0.0, 400.0, 800.0));
        store.set_scroll_state(
            scroll,
            Some(ScrollState {
                content_size: Size::new(400.0, 2000.0),
                content_inset: Insets::new(0.0, 20.0, 0.0, 0.0),
                content_offset: Point::new(0.0, -20.0),
                ..ScrollState::default()
            }),
        );
        assert!(MatchTransition::takes_priority_over(&store, scroll));
        store.set_content_offset(scroll, Point::new(0.0, 100.0));
        assert!(!MatchTransition::takes_priority_over(&store, scroll));

        let plain = store.create_view();
        assert!(!MatchTransition::takes_priority_over(&store, plain));
    }
}
