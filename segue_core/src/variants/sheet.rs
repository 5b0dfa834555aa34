// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modal sheets.
//!
//! A sheet slides up over the presenting screen, which is pushed back: scaled
//! down, rounded and dimmed by an overlay. Presenting a sheet from a sheet
//! stacks them; the grandparent screen recedes a little further.
//!
//! Layout depends on the container's class:
//!
//! | class    | condition                          | sheet frame                       |
//! |----------|------------------------------------|-----------------------------------|
//! | compact  | compact vertical size class        | container bounds                  |
//! | wide     | width ≥ 512 and not compact        | preferred size (704×600) centered |
//! | regular  | otherwise                          | full width, below safe area + 10  |
//!
//! A presented sheet keeps its presentation until it is dismissed; call
//! [`Transition::container_did_layout`](crate::transition::Transition::container_did_layout)
//! whenever the container changes size.

use kurbo::{Rect, Size};

use crate::color::Color;
use crate::host::{Appearance, ContainerTraits};
use crate::screen::{PresentationStyle, Screen, find_capability};
use crate::transform::Transform3d;
use crate::transition::{DragGesture, DragOutcome, DragPhase, TransitionEngine, TransitionStyle};
use crate::view::{CornerMask, ViewId, ViewStore};

/// Customizes the screen a sheet is presented over.
pub trait SheetBackgroundDelegate {
    /// Extra distance the receded screen moves up.
    fn sheet_top_inset(&self) -> f64 {
        0.0
    }

    /// Whether the receded screen is dimmed.
    fn sheet_applies_overlay(&self) -> bool {
        true
    }
}

/// Customizes a presented sheet.
pub trait SheetForegroundDelegate {
    /// Whether the sheet can be dragged down to dismiss it.
    fn can_interactively_dismiss(&self) -> bool {
        true
    }

    /// Size of the sheet in the wide layout, given the container size.
    fn preferred_sheet_size(&self, bounding: Size) -> Option<Size> {
        _ = bounding;
        None
    }
}

/// Knobs of a [`SheetTransition`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SheetConfig {
    /// Corner radius of the sheet and of the receded screen.
    pub corner_radius: f64,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self { corner_radius: 10.0 }
    }
}

const WIDE_MIN_WIDTH: f64 = 512.0;
const DEFAULT_WIDE_SIZE: Size = Size::new(704.0, 600.0);
const HEADER_HEIGHT: f64 = 120.0;
const OVERLAY_Z: f64 = 100.0;

/// One presented sheet.
#[derive(Debug)]
struct SheetPresentation {
    container: ViewId,
    presenting: ViewId,
    presented: ViewId,
    presenting_screen: Screen,
    presented_screen: Screen,
    backdrop: ViewId,
    overlay: Option<ViewId>,
    original_superview: Option<ViewId>,
    traits: ContainerTraits,
}

impl SheetPresentation {
    fn is_compact(&self) -> bool {
        self.traits.is_compact_vertical
    }

    fn is_wide(&self, store: &ViewStore) -> bool {
        store.size(self.container).width >= WIDE_MIN_WIDTH && !self.is_compact()
    }

    fn top_inset(&self) -> f64 {
        find_capability(&self.presenting_screen, |c| c.sheet_background.clone())
            .map_or(0.0, |d| d.sheet_top_inset())
    }

    /// Frame `screen` occupies when shown as a sheet in this container.
    fn sheet_frame(&self, store: &ViewStore, screen: &Screen) -> Rect {
        let bounds = store.bounds(self.container);
        if self.is_wide(store) {
            let size = find_capability(screen, |c| c.sheet_foreground.clone())
                .and_then(|d| d.preferred_sheet_size(bounds.size()))
                .unwrap_or(DEFAULT_WIDE_SIZE);
            Rect::from_center_size(bounds.center(), size)
        } else if self.is_compact() {
            bounds
        } else {
            let top = self.traits.safe_area_top + 10.0;
            Rect::new(0.0, top, bounds.width(), bounds.height())
        }
    }
}

/// Resolved view states of one presentation.
#[derive(Clone, Copy, Debug)]
struct SheetState {
    front: ViewId,
    back: ViewId,
    overlay: Option<ViewId>,
    container_height: f64,
    back_transform: Transform3d,
    /// Presenting view of the parent sheet, with its presented and
    /// dismissed transforms.
    parent: Option<(ViewId, Transform3d, Transform3d)>,
    corner_radius: f64,
    dismissed_corner_radius: f64,
}

impl SheetState {
    fn apply_presented(&self, store: &mut ViewStore) {
        store.set_transform(self.front, Transform3d::IDENTITY);
        if let Some((view, third, _)) = self.parent {
            store.set_transform(view, third);
        }
        store.set_transform(self.back, self.back_transform);
        store.set_corner_radius(self.back, self.corner_radius);
        if let Some(overlay) = self.overlay {
            store.set_alpha(overlay, 1.0);
        }
    }

    fn apply_dismissed(&self, store: &mut ViewStore) {
        store.set_transform(
            self.front,
            Transform3d::from_translation(0.0, self.container_height, 0.0),
        );
        store.set_transform(self.back, Transform3d::IDENTITY);
        if let Some((view, _, back)) = self.parent {
            store.set_transform(view, back);
        }
        store.set_corner_radius(self.back, self.dismissed_corner_radius);
        if let Some(overlay) = self.overlay {
            store.set_alpha(overlay, 0.0);
        }
    }
}

#[derive(Debug, Default)]
struct DragState {
    start_location: f64,
    initial_fraction: f64,
    scroll_view: Option<ViewId>,
}

/// The sheet transition.
#[derive(Debug, Default)]
pub struct SheetTransition {
    config: SheetConfig,
    stack: Vec<SheetPresentation>,
    active: Option<usize>,
    drag: DragState,
}

impl SheetTransition {
    /// Creates a sheet transition.
    #[must_use]
    pub fn new(config: SheetConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &SheetConfig {
        &self.config
    }

    /// Returns how many sheets are presented.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Returns the backdrop behind the top sheet.
    #[must_use]
    pub fn backdrop(&self) -> Option<ViewId> {
        self.stack.last().map(|p| p.backdrop)
    }

    /// Returns the overlay dimming the screen behind the top sheet.
    #[must_use]
    pub fn overlay(&self) -> Option<ViewId> {
        self.stack.last().and_then(|p| p.overlay)
    }

    /// Replaces the container traits of every presented sheet. Follow with
    /// a layout pass.
    pub fn set_container_traits(&mut self, traits: ContainerTraits) {
        for presentation in &mut self.stack {
            presentation.traits = traits;
        }
    }

    /// Returns whether status bar content over the top sheet should be
    /// light: the receded screen is only visible in the regular layout.
    #[must_use]
    pub fn prefers_light_content(&self, store: &ViewStore) -> bool {
        self.stack
            .last()
            .is_some_and(|p| !p.is_wide(store) && !p.is_compact())
    }

    fn has_parent(&self, i: usize) -> bool {
        i > 0 && self.stack[i - 1].presented == self.stack[i].presenting
    }

    fn has_child(&self, i: usize) -> bool {
        self.stack
            .get(i + 1)
            .is_some_and(|c| c.presenting == self.stack[i].presented)
    }

    fn index_of(&self, presented: ViewId) -> Option<usize> {
        self.stack.iter().rposition(|p| p.presented == presented)
    }

    fn back_transform(&self, i: usize, store: &ViewStore) -> Transform3d {
        let p = &self.stack[i];
        let bounds = store.bounds(p.container);
        if bounds.width() <= 0.0 || p.is_compact() {
            return Transform3d::IDENTITY;
        }
        let wide = p.is_wide(store);
        let side_inset = if wide { 20.0 } else { 16.0 };
        let factor = side_inset / bounds.width();
        let scale = Transform3d::from_scale(1.0 - factor * 2.0, 1.0 - factor * 2.0, 1.0);
        if self.has_parent(i) {
            let back_height = store.size(p.presenting).height;
            Transform3d::from_translation(0.0, -back_height * factor - 10.0, 0.0) * scale
        } else if wide {
            Transform3d::IDENTITY
        } else {
            let dy = -bounds.height() * factor + p.traits.safe_area_top - p.top_inset();
            Transform3d::from_translation(0.0, dy, 0.0) * scale
        }
    }

    fn third_transform(&self, i: usize, store: &ViewStore) -> Transform3d {
        let p = &self.stack[i];
        if (p.is_wide(store) && !self.has_parent(i)) || p.is_compact() {
            Transform3d::IDENTITY
        } else {
            self.back_transform(i, store) * Transform3d::from_scale(0.985, 0.985, 1.0)
        }
    }

    fn overlay_color(&self, i: usize, store: &ViewStore) -> Color {
        let p = &self.stack[i];
        if p.is_wide(store) || p.is_compact() {
            if self.has_parent(i) {
                Color::white(0.0, 0.15)
            } else {
                Color::white(0.0, 0.35)
            }
        } else {
            match p.traits.appearance {
                Appearance::Dark => Color::white(if p.traits.is_elevated { 0.0 } else { 0.4 }, 0.2),
                Appearance::Light => Color::white(0.3, 0.2),
            }
        }
    }

    fn sheet_state(&self, i: usize, store: &ViewStore) -> SheetState {
        let p = &self.stack[i];
        let has_parent = self.has_parent(i);
        let parent = has_parent.then(|| {
            (
                self.stack[i - 1].presenting,
                self.third_transform(i - 1, store),
                self.back_transform(i - 1, store),
            )
        });
        SheetState {
            front: p.presented,
            back: p.presenting,
            overlay: p.overlay,
            container_height: store.size(p.container).height,
            back_transform: self.back_transform(i, store),
            parent,
            corner_radius: self.config.corner_radius,
            dismissed_corner_radius: if has_parent {
                self.config.corner_radius
            } else {
                p.traits.display_corner_radius
            },
        }
    }

    fn layout(&self, i: usize, store: &mut ViewStore, apply_state: bool) {
        let p = &self.stack[i];
        let bounds = store.bounds(p.container);
        store.set_frame_without_transform(p.backdrop, bounds);
        if let Some(overlay) = p.overlay {
            store.set_background_color(overlay, Some(self.overlay_color(i, store)));
        }
        let presenting_frame = if self.has_parent(i) {
            p.sheet_frame(store, &p.presenting_screen)
        } else {
            bounds
        };
        store.set_frame_without_transform(p.presenting, presenting_frame);
        if let Some(overlay) = p.overlay {
            store.set_frame_without_transform(overlay, store.bounds(p.presenting));
        }

        let sheet_frame = p.sheet_frame(store, &p.presented_screen);
        store.set_frame_without_transform(p.presented, sheet_frame);
        let corner_radius = if p.is_compact() {
            p.traits.display_corner_radius
        } else {
            self.config.corner_radius
        };
        store.set_corner_radius(p.presented, corner_radius);
        let mask = if p.is_wide(store) {
            CornerMask::ALL
        } else {
            CornerMask::TOP
        };
        store.set_masked_corners(p.presented, mask);
        store.set_clips_to_bounds(p.presented, true);

        if apply_state && !self.has_child(i) {
            self.sheet_state(i, store).apply_presented(store);
        }
    }

    /// Lays out every presented sheet for the current container sizes.
    pub fn container_did_layout(&mut self, engine: &TransitionEngine, store: &mut ViewStore) {
        let apply_state = !engine.is_animating();
        for i in 0..self.stack.len() {
            if store.is_alive(self.stack[i].container) {
                self.layout(i, store, apply_state);
            }
        }
    }

    fn tear_down(&mut self, i: usize, store: &mut ViewStore) {
        let p = self.stack.remove(i);
        if let Some(overlay) = p.overlay
            && store.is_alive(overlay)
        {
            store.destroy_subtree(overlay);
        }
        if let Some(superview) = p.original_superview
            && store.is_alive(superview)
            && store.is_alive(p.presenting)
        {
            store.reparent(p.presenting, superview);
        }
        if store.is_alive(p.backdrop) {
            store.destroy_subtree(p.backdrop);
        }
    }

    // -- Input --

    /// Returns [`DragOutcome::RequestDismiss`] for a tap on the backdrop or
    /// overlay of the top sheet.
    #[must_use]
    pub fn handle_tap(&self, view: ViewId) -> DragOutcome {
        match self.stack.last() {
            Some(p) if p.backdrop == view || p.overlay == Some(view) => DragOutcome::RequestDismiss,
            _ => DragOutcome::Ignored,
        }
    }

    /// Returns whether the top sheet may be dragged down.
    #[must_use]
    pub fn gesture_should_begin(&self) -> bool {
        self.stack.last().is_some_and(|p| {
            find_capability(&p.presented_screen, |c| c.sheet_foreground.clone())
                .is_none_or(|d| d.can_interactively_dismiss())
        })
    }

    /// The first scroll view in the sheet that the user is dragging and that
    /// has content to scroll vertically.
    fn child_scroll_view(store: &ViewStore, sheet: ViewId) -> Option<ViewId> {
        store.flattened(sheet).into_iter().find(|&v| {
            store
                .scroll_state(v)
                .is_some_and(|s| s.is_tracking && s.content_size.height > store.size(v).height)
        })
    }

    fn progress(&self, engine: &TransitionEngine, distance: f64, height: f64) -> f64 {
        let progress = distance / height;
        let progress = if engine.is_presenting() != engine.is_reversed() {
            -progress
        } else {
            progress
        };
        (self.drag.initial_fraction + progress).clamp(0.0, 1.0)
    }

    /// Feeds one sample of the dismiss drag on the top sheet.
    ///
    /// The drag takes over once it moves down while the sheet's scroll view
    /// is at its top, or when it starts on the header. If no session is
    /// running the host should start the dismissal on
    /// [`DragOutcome::RequestDismiss`].
    pub fn handle_drag(
        &mut self,
        engine: &mut TransitionEngine,
        store: &mut ViewStore,
        gesture: &DragGesture,
    ) -> DragOutcome {
        let Some(sheet) = self.stack.last().map(|p| p.presented) else {
            return DragOutcome::Ignored;
        };
        let velocity = gesture.velocity;
        let location = gesture.location.y;
        let height = store.frame_without_transform(sheet).height();
        match gesture.phase {
            DragPhase::Began | DragPhase::Changed => {
                let began = gesture.phase == DragPhase::Began;
                if began {
                    self.drag.scroll_view = Self::child_scroll_view(store, sheet);
                    if let Some(scroll) = self.drag.scroll_view {
                        store.set_disable_top_bounce(scroll, true);
                    }
                }
                let from_header = began && location < HEADER_HEIGHT;
                let at_top = self
                    .drag
                    .scroll_view
                    .and_then(|s| store.scroll_state(s))
                    .is_none_or(|s| s.is_at_top());
                let is_down = velocity.y > velocity.x.abs();

                let mut outcome = DragOutcome::Ignored;
                if !engine.is_interactive() && is_down && (at_top || from_header) {
                    if from_header && let Some(scroll) = self.drag.scroll_view {
                        store.cancel_scroll_tracking(scroll);
                    }
                    self.drag.start_location = location;
                    let was_transitioning = engine.is_transitioning();
                    engine.begin_interactive_transition(store);
                    self.drag.initial_fraction = engine.fraction_completed();
                    outcome = if was_transitioning {
                        DragOutcome::Tracking
                    } else {
                        DragOutcome::RequestDismiss
                    };
                }
                if engine.is_interactive() && height > 0.0 {
                    let fraction = self.progress(engine, location - self.drag.start_location, height);
                    engine.set_fraction_completed(store, fraction);
                    if outcome == DragOutcome::Ignored {
                        outcome = DragOutcome::Tracking;
                    }
                }
                outcome
            }
            DragPhase::Ended | DragPhase::Cancelled => {
                if let Some(scroll) = self.drag.scroll_view.take()
                    && store.is_alive(scroll)
                {
                    store.set_disable_top_bounce(scroll, false);
                }
                if !engine.is_interactive() {
                    return DragOutcome::Ignored;
                }
                let distance = velocity.y + (location - self.drag.start_location);
                let fraction = if height > 0.0 {
                    self.progress(engine, distance, height)
                } else {
                    self.drag.initial_fraction
                };
                let should_finish = fraction > 0.5;
                engine.end_interactive_transition(store, should_finish);
                DragOutcome::Released { should_finish }
            }
        }
    }
}

impl TransitionStyle for SheetTransition {
    fn name(&self) -> &'static str {
        "sheet"
    }

    fn automatically_layout_to_view(&self) -> bool {
        false
    }

    fn prepare(&mut self, engine: &mut TransitionEngine, store: &mut ViewStore) {
        let presenting = engine.is_presenting();
        if let Some(context) = engine.context_mut() {
            let sheet_screen = if presenting {
                &mut context.to
            } else {
                &mut context.from
            };
            sheet_screen.presentation_style = PresentationStyle::Custom;
        }
        let views = engine.session_views();
        if !presenting {
            self.active = self.index_of(views.foreground);
            return;
        }
        let (Some(presenting_screen), Some(presented_screen)) =
            (engine.background_screen().cloned(), engine.foreground_screen().cloned())
        else {
            return;
        };

        let back = views.background;
        let front = views.foreground;
        let original_superview = store.parent(back);
        let applies_overlay = find_capability(&presenting_screen, |c| c.sheet_background.clone())
            .is_none_or(|d| d.sheet_applies_overlay());
        let overlay = applies_overlay.then(|| {
            let overlay = store.create_view();
            store.set_z_position(overlay, OVERLAY_Z);
            store.add_child(back, overlay);
            overlay
        });
        store.set_clips_to_bounds(back, true);
        store.set_user_interaction_enabled(views.container, false);

        let backdrop = store.create_view_with_frame(store.bounds(views.container));
        store.add_child(views.container, backdrop);
        store.reparent(back, views.container);
        store.reparent(front, views.container);

        self.stack.push(SheetPresentation {
            container: views.container,
            presenting: back,
            presented: front,
            presenting_screen,
            presented_screen,
            backdrop,
            overlay,
            original_superview,
            traits: engine.traits(),
        });
        let i = self.stack.len() - 1;
        self.layout(i, store, false);
        self.active = Some(i);
    }

    fn animate(&mut self, engine: &mut TransitionEngine, store: &mut ViewStore) {
        let Some(i) = self.active else {
            return;
        };
        let state = self.sheet_state(i, store);
        engine.add_present_state_block(move |store| state.apply_presented(store));
        engine.add_dismiss_state_block(move |store| state.apply_dismissed(store));
    }

    fn animation_ended(&mut self, engine: &mut TransitionEngine, store: &mut ViewStore, completed: bool) {
        let Some(i) = self.active.take() else {
            return;
        };
        // A cancelled presentation or a finished dismissal removes the sheet.
        if engine.is_presenting() != completed && i < self.stack.len() {
            self.tear_down(i, store);
        }
    }
}
