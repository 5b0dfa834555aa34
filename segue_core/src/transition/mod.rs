// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transitions: a session state machine plus a variant describing the
//! animation.
//!
//! A [`Transition`] pairs a [`TransitionEngine`] with one of the built-in
//! [`TransitionKind`]s. Each navigation operation runs one *session*:
//!
//! ```text
//!   Idle ──animate_transition──► Preparing ──► Animating ──► Completing ──► Idle
//!                                   │              ▲ │
//!                          (in a    │        begin │ │ end
//!                    navigation     ▼  interactive │ ▼ interactive
//!                          stack) Deferred     InteractivePaused
//! ```
//!
//! While preparing, the engine attaches both screens to the container and
//! calls the variant's [`TransitionStyle::animate`]. The variant registers
//! *state blocks*: mutations of the [`ViewStore`] describing the dismissed
//! and presented states. When presenting, dismiss blocks run immediately and
//! present blocks become the animation; when dismissing, the reverse. The
//! animator then advances with [`Transition::tick`] until it reaches either
//! end, at which point completion blocks run and the host is told.

mod engine;
mod gesture;

use core::time::Duration;

use kurbo::Point;

pub use engine::{CompletionBlock, Phase, SessionViews, StartBlock, StateBlock, TransitionEngine};
pub use gesture::{DragGesture, DragOutcome, DragPhase};

use crate::animator::AnimatingPosition;
use crate::config::TransitionConfig;
use crate::hero::{HeroTransition, ViewTransitionContext};
use crate::host::TransitionContext;
use crate::variants::fade::FadeTransition;
use crate::variants::matched::{MatchOptions, MatchTransition};
use crate::variants::sheet::{SheetConfig, SheetTransition};
use crate::view::{ViewId, ViewStore};

/// Hooks a transition variant implements.
pub trait TransitionStyle {
    /// Short name used in diagnostics.
    fn name(&self) -> &'static str;

    /// Whether the engine sizes and lays out the incoming view.
    fn automatically_layout_to_view(&self) -> bool {
        true
    }

    /// Runs before the screens are attached to the container.
    fn prepare(&mut self, engine: &mut TransitionEngine, store: &mut ViewStore) {
        _ = (engine, store);
    }

    /// Registers the state and completion blocks of the session.
    fn animate(&mut self, engine: &mut TransitionEngine, store: &mut ViewStore);

    /// Runs after the host was told the session completed.
    fn animation_ended(&mut self, engine: &mut TransitionEngine, store: &mut ViewStore, completed: bool) {
        _ = (engine, store, completed);
    }
}

/// The built-in transition variants.
#[derive(Debug)]
pub enum TransitionKind {
    /// Cross-fade.
    Fade(FadeTransition),
    /// Matched-element morphing.
    Hero(HeroTransition),
    /// Floating card growing out of a matched view.
    Match(MatchTransition),
    /// Modal sheet over a scaled-back presenting screen.
    Sheet(SheetTransition),
}

impl TransitionKind {
    fn style_mut(&mut self) -> &mut dyn TransitionStyle {
        match self {
            Self::Fade(t) => t,
            Self::Hero(t) => t,
            Self::Match(t) => t,
            Self::Sheet(t) => t,
        }
    }

    fn style(&self) -> &dyn TransitionStyle {
        match self {
            Self::Fade(t) => t,
            Self::Hero(t) => t,
            Self::Match(t) => t,
            Self::Sheet(t) => t,
        }
    }
}

impl From<FadeTransition> for TransitionKind {
    fn from(t: FadeTransition) -> Self {
        Self::Fade(t)
    }
}

impl From<HeroTransition> for TransitionKind {
    fn from(t: HeroTransition) -> Self {
        Self::Hero(t)
    }
}

impl From<MatchTransition> for TransitionKind {
    fn from(t: MatchTransition) -> Self {
        Self::Match(t)
    }
}

impl From<SheetTransition> for TransitionKind {
    fn from(t: SheetTransition) -> Self {
        Self::Sheet(t)
    }
}

/// A reusable transition: one session at a time.
#[derive(Debug)]
pub struct Transition {
    engine: TransitionEngine,
    kind: TransitionKind,
}

impl Transition {
    /// Creates a transition with the default configuration.
    pub fn new(kind: impl Into<TransitionKind>) -> Self {
        Self::with_config(kind, TransitionConfig::default())
    }

    /// Creates a transition with `config`.
    pub fn with_config(kind: impl Into<TransitionKind>, config: TransitionConfig) -> Self {
        Self {
            engine: TransitionEngine::new(config),
            kind: kind.into(),
        }
    }

    /// Creates a cross-fade.
    #[must_use]
    pub fn fade() -> Self {
        Self::new(FadeTransition)
    }

    /// Creates a hero transition.
    #[must_use]
    pub fn hero() -> Self {
        Self::new(HeroTransition::new())
    }

    /// Creates a match transition.
    #[must_use]
    pub fn matched(options: MatchOptions) -> Self {
        Self::new(MatchTransition::new(options))
    }

    /// Creates a sheet transition.
    #[must_use]
    pub fn sheet(config: SheetConfig) -> Self {
        Self::new(SheetTransition::new(config))
    }

    /// Returns the engine.
    #[must_use]
    pub fn engine(&self) -> &TransitionEngine {
        &self.engine
    }

    /// Returns the engine mutably.
    pub fn engine_mut(&mut self) -> &mut TransitionEngine {
        &mut self.engine
    }

    /// Returns the variant.
    #[must_use]
    pub fn kind(&self) -> &TransitionKind {
        &self.kind
    }

    /// Returns the variant mutably.
    pub fn kind_mut(&mut self) -> &mut TransitionKind {
        &mut self.kind
    }

    /// Returns the variant's diagnostic name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind.style().name()
    }

    // -- Session --

    /// Records the direction of the next session.
    pub fn setup_transition(&mut self, is_presenting: bool, in_navigation: bool) {
        self.engine.setup(is_presenting, in_navigation);
    }

    /// Starts a session with `context`.
    ///
    /// Inside a navigation stack the animation starts on the next
    /// [`tick`](Self::tick).
    ///
    /// # Panics
    ///
    /// Panics if the previous session has not ended.
    pub fn animate_transition(&mut self, store: &mut ViewStore, context: TransitionContext) {
        let name = self.kind.style().name();
        self.engine.begin_session(context, name);
        if self.engine.in_navigation() {
            self.engine.set_phase(Phase::Deferred);
        } else {
            self.start_animation(store);
        }
    }

    fn start_animation(&mut self, store: &mut ViewStore) {
        let Self { engine, kind } = self;
        let style = kind.style_mut();
        engine.run_prepare_blocks(store);
        style.prepare(engine, store);
        engine.attach_views(store, style.automatically_layout_to_view());

        engine.open_registration();
        style.animate(engine, store);
        let registered = engine.close_registration();
        engine.launch(store, registered);
    }

    /// Advances the session by `dt`.
    ///
    /// Returns `Some(finished)` when the session ended during this call.
    pub fn tick(&mut self, store: &mut ViewStore, dt: Duration) -> Option<bool> {
        match self.engine.phase() {
            Phase::Deferred => {
                self.start_animation(store);
                None
            }
            Phase::Animating | Phase::InteractivePaused => {
                let position = self.engine.advance(store, dt)?;
                let finished = position == AnimatingPosition::End;
                self.finish(store, finished);
                Some(finished)
            }
            Phase::Idle | Phase::Preparing | Phase::Completing => None,
        }
    }

    fn finish(&mut self, store: &mut ViewStore, finished: bool) {
        let Self { engine, kind } = self;
        let style = kind.style_mut();
        engine.complete(store, finished, style.automatically_layout_to_view());
        style.animation_ended(engine, store, finished);
        engine.animation_ended(finished);
    }

    // -- Interaction --

    /// See [`TransitionEngine::begin_interactive_transition`].
    pub fn begin_interactive_transition(&mut self, store: &mut ViewStore) {
        self.engine.begin_interactive_transition(store);
    }

    /// See [`TransitionEngine::end_interactive_transition`].
    pub fn end_interactive_transition(&mut self, store: &mut ViewStore, should_finish: bool) {
        self.engine.end_interactive_transition(store, should_finish);
    }

    /// Returns the fraction complete of the current session.
    #[must_use]
    pub fn fraction_completed(&self) -> f64 {
        self.engine.fraction_completed()
    }

    /// Scrubs the current session. Ignored unless its animator is active.
    pub fn set_fraction_completed(&mut self, store: &mut ViewStore, fraction: f64) {
        self.engine.set_fraction_completed(store, fraction);
    }

    /// Returns whether a drag should be allowed to start driving the
    /// transition.
    pub fn gesture_should_begin(&mut self, gesture: &DragGesture) -> bool {
        match &mut self.kind {
            TransitionKind::Match(t) => t.gesture_should_begin(gesture),
            TransitionKind::Sheet(t) => t.gesture_should_begin(),
            TransitionKind::Fade(_) | TransitionKind::Hero(_) => false,
        }
    }

    /// Returns whether the dismiss drag takes priority over the pan of
    /// `scroll_view`.
    #[must_use]
    pub fn takes_priority_over(&self, store: &ViewStore, scroll_view: ViewId) -> bool {
        match &self.kind {
            TransitionKind::Match(_) => MatchTransition::takes_priority_over(store, scroll_view),
            _ => false,
        }
    }

    /// Feeds a drag sample to the variant's dismiss gesture.
    pub fn handle_drag(&mut self, store: &mut ViewStore, gesture: &DragGesture) -> DragOutcome {
        let Self { engine, kind } = self;
        match kind {
            TransitionKind::Match(t) => t.handle_drag(engine, store, gesture),
            TransitionKind::Sheet(t) => t.handle_drag(engine, store, gesture),
            TransitionKind::Fade(_) | TransitionKind::Hero(_) => DragOutcome::Ignored,
        }
    }

    /// Reports a tap on `view`.
    #[must_use]
    pub fn handle_tap(&self, view: ViewId) -> DragOutcome {
        match &self.kind {
            TransitionKind::Sheet(t) => t.handle_tap(view),
            _ => DragOutcome::Ignored,
        }
    }

    /// Re-applies layout after the container changed size or traits.
    pub fn container_did_layout(&mut self, store: &mut ViewStore) {
        let Self { engine, kind } = self;
        if let TransitionKind::Sheet(t) = kind {
            t.container_did_layout(engine, store);
        }
    }

    // -- Hero helpers --

    /// Returns the hero context of `view` in the current session.
    #[must_use]
    pub fn context_for(&self, view: ViewId) -> Option<&ViewTransitionContext> {
        match &self.kind {
            TransitionKind::Hero(t) => t.context_for(view),
            _ => None,
        }
    }

    /// Returns whether `view` was matched in the current hero session.
    #[must_use]
    pub fn is_matched(&self, view: ViewId) -> bool {
        match &self.kind {
            TransitionKind::Hero(t) => t.is_matched(view),
            TransitionKind::Match(t) => t.is_matched(),
            _ => false,
        }
    }

    /// Returns where the proxy of `view` is.
    #[must_use]
    pub fn position_for(&self, store: &ViewStore, view: ViewId) -> Option<Point> {
        match &self.kind {
            TransitionKind::Hero(t) => t.position_for(store, view),
            _ => None,
        }
    }

    /// Moves the proxy of `view` (and its counterpart) under user control.
    pub fn apply_position(&mut self, store: &mut ViewStore, position: Point, view: ViewId) {
        let Self { engine, kind } = self;
        if let TransitionKind::Hero(t) = kind {
            t.apply_position(engine, store, position, view);
        }
    }
}
