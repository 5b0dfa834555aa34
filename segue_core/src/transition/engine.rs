// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session state machine shared by every transition variant.

use core::fmt;
use core::mem;
use core::time::Duration;

use crate::animator::{AnimatableProperty, AnimatingPosition, Animator, AnimatorState, Track};
use crate::config::TransitionConfig;
use crate::host::{ContainerTraits, TransitionContext, TransitionHost};
use crate::screen::Screen;
use crate::trace::{
    InteractionEvent, PhaseChangeEvent, SessionBeginEvent, SessionEndEvent, Tracer,
};
use crate::view::{ViewId, ViewStore};

/// Mutation applied to put views in their dismissed or presented state.
pub type StateBlock = Box<dyn FnOnce(&mut ViewStore)>;

/// Cleanup run when the animation stops; receives whether it finished.
pub type CompletionBlock = Box<dyn FnOnce(&mut ViewStore, bool)>;

/// Hook run right after the animator starts.
pub type StartBlock = Box<dyn FnOnce(&mut TransitionEngine, &mut ViewStore)>;

/// Where a transition is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No session.
    #[default]
    Idle,
    /// A context was received; views are being set up.
    Preparing,
    /// Waiting one `tick` for a navigation stack to settle.
    Deferred,
    /// The animator is running.
    Animating,
    /// The animator is paused under user control.
    InteractivePaused,
    /// Completion blocks and host callbacks are running.
    Completing,
}

#[derive(Default)]
struct Registration {
    open: bool,
    dismissed: Vec<StateBlock>,
    presented: Vec<StateBlock>,
    completion: Vec<CompletionBlock>,
}

/// The blocks a variant registered while animating.
pub(crate) struct Registered {
    dismissed: Vec<StateBlock>,
    presented: Vec<StateBlock>,
    completion: Vec<CompletionBlock>,
}

/// Views every variant needs during `animate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionViews {
    /// The transition container.
    pub container: ViewId,
    /// Root view of the presented screen.
    pub foreground: ViewId,
    /// Root view of the presenting screen.
    pub background: ViewId,
}

/// Drives one animated handoff between two screens at a time.
///
/// The engine owns the [`Animator`] and the [`TransitionContext`] for the
/// current session, the blocks variants register to describe the dismissed
/// and presented states, and the interactive controls.
pub struct TransitionEngine {
    config: TransitionConfig,
    is_presenting: bool,
    is_interactive: bool,
    is_transitioning: bool,
    is_animating: bool,
    in_navigation: bool,
    phase: Phase,
    animator: Option<Animator>,
    context: Option<TransitionContext>,
    registration: Registration,
    prepare_blocks: Vec<StateBlock>,
    start_blocks: Vec<StartBlock>,
    completion: Vec<CompletionBlock>,
    paused_tracks: Vec<Track>,
    interaction_resolved: bool,
    tracer: Tracer,
    session: u64,
    elapsed: Duration,
}

impl fmt::Debug for TransitionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionEngine")
            .field("config", &self.config)
            .field("is_presenting", &self.is_presenting)
            .field("is_interactive", &self.is_interactive)
            .field("is_transitioning", &self.is_transitioning)
            .field("is_animating", &self.is_animating)
            .field("phase", &self.phase)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl TransitionEngine {
    /// Creates an idle engine.
    #[must_use]
    pub fn new(config: TransitionConfig) -> Self {
        Self {
            config,
            is_presenting: true,
            is_interactive: false,
            is_transitioning: false,
            is_animating: false,
            in_navigation: false,
            phase: Phase::Idle,
            animator: None,
            context: None,
            registration: Registration::default(),
            prepare_blocks: Vec::new(),
            start_blocks: Vec::new(),
            completion: Vec::new(),
            paused_tracks: Vec::new(),
            interaction_resolved: false,
            tracer: Tracer::none(),
            session: 0,
            elapsed: Duration::ZERO,
        }
    }

    // -- Configuration --

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &TransitionConfig {
        &self.config
    }

    /// Replaces the configuration; takes effect at the next session.
    pub fn set_config(&mut self, config: TransitionConfig) {
        self.config = config;
    }

    /// Installs a tracer for session diagnostics.
    pub fn set_tracer(&mut self, tracer: Tracer) {
        self.tracer = tracer;
    }

    pub(crate) fn tracer_mut(&mut self) -> &mut Tracer {
        &mut self.tracer
    }

    // -- State --

    /// Returns whether the current (or last) session presents.
    #[must_use]
    pub fn is_presenting(&self) -> bool {
        self.is_presenting
    }

    /// Returns whether the user is driving the transition.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.is_interactive
    }

    /// Returns whether a session is in progress.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.is_transitioning
    }

    /// Returns whether the animation has been set up and not yet ended.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    /// Returns whether the session runs inside a navigation stack.
    #[must_use]
    pub fn in_navigation(&self) -> bool {
        self.in_navigation
    }

    /// Returns the lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Returns the monotonic session counter.
    #[must_use]
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Returns the nominal duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.config.duration
    }

    /// Returns the session's animator, if one exists.
    #[must_use]
    pub fn animator(&self) -> Option<&Animator> {
        self.animator.as_ref()
    }

    /// Returns the animator's fraction complete, or 0 without a session.
    #[must_use]
    pub fn fraction_completed(&self) -> f64 {
        self.animator.as_ref().map_or(0.0, Animator::fraction_complete)
    }

    /// Scrubs the animator. Ignored unless the animator is active.
    pub fn set_fraction_completed(&mut self, store: &mut ViewStore, fraction: f64) {
        if let Some(animator) = &mut self.animator {
            animator.set_fraction_complete(store, fraction);
        }
    }

    /// Returns whether the animator runs toward the dismissed state.
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.animator.as_ref().is_some_and(Animator::is_reversed)
    }

    // -- Context --

    /// Returns the current context.
    #[must_use]
    pub fn context(&self) -> Option<&TransitionContext> {
        self.context.as_ref()
    }

    pub(crate) fn context_mut(&mut self) -> Option<&mut TransitionContext> {
        self.context.as_mut()
    }

    /// Returns the navigation host of the current session.
    pub fn host_mut(&mut self) -> Option<&mut dyn TransitionHost> {
        match self.context.as_mut() {
            Some(context) => Some(context.host.as_mut()),
            None => None,
        }
    }

    /// Returns the transition container.
    #[must_use]
    pub fn container(&self) -> Option<ViewId> {
        self.context.as_ref().map(|c| c.container)
    }

    /// Returns the container traits, or defaults without a session.
    #[must_use]
    pub fn traits(&self) -> ContainerTraits {
        self.context.as_ref().map(|c| c.traits).unwrap_or_default()
    }

    /// Returns the outgoing screen.
    #[must_use]
    pub fn from_screen(&self) -> Option<&Screen> {
        self.context.as_ref().map(|c| &c.from)
    }

    /// Returns the incoming screen.
    #[must_use]
    pub fn to_screen(&self) -> Option<&Screen> {
        self.context.as_ref().map(|c| &c.to)
    }

    /// Returns the presented screen: incoming when presenting, outgoing
    /// when dismissing.
    #[must_use]
    pub fn foreground_screen(&self) -> Option<&Screen> {
        if self.is_presenting {
            self.to_screen()
        } else {
            self.from_screen()
        }
    }

    /// Returns the presenting screen.
    #[must_use]
    pub fn background_screen(&self) -> Option<&Screen> {
        if self.is_presenting {
            self.from_screen()
        } else {
            self.to_screen()
        }
    }

    /// Returns the presented screen's root view.
    #[must_use]
    pub fn foreground_view(&self) -> Option<ViewId> {
        self.foreground_screen().map(|s| s.view)
    }

    /// Returns the presenting screen's root view.
    #[must_use]
    pub fn background_view(&self) -> Option<ViewId> {
        self.background_screen().map(|s| s.view)
    }

    /// Returns whether the incoming screen leaves the outgoing one attached.
    #[must_use]
    pub fn to_over_full_screen(&self) -> bool {
        self.to_screen()
            .is_some_and(|s| s.presentation_style.is_over_full_screen())
    }

    /// Returns whether the outgoing screen was presented over the incoming one.
    #[must_use]
    pub fn from_over_full_screen(&self) -> bool {
        self.from_screen()
            .is_some_and(|s| s.presentation_style.is_over_full_screen())
    }

    /// Returns the container, foreground and background views.
    ///
    /// # Panics
    ///
    /// Panics if there is no transition context.
    #[must_use]
    pub fn session_views(&self) -> SessionViews {
        let context = self
            .context
            .as_ref()
            .expect("no transition context: animate called outside a session");
        let (foreground, background) = if self.is_presenting {
            (context.to.view, context.from.view)
        } else {
            (context.from.view, context.to.view)
        };
        SessionViews {
            container: context.container,
            foreground,
            background,
        }
    }

    // -- Block registration --

    /// Registers a mutation describing the dismissed state.
    ///
    /// Only legal while the variant's `animate` hook runs.
    pub fn add_dismiss_state_block(&mut self, block: impl FnOnce(&mut ViewStore) + 'static) {
        debug_assert!(self.registration.open, "state blocks can only be added during animate");
        self.registration.dismissed.push(Box::new(block));
    }

    /// Registers a mutation describing the presented state.
    ///
    /// Only legal while the variant's `animate` hook runs.
    pub fn add_present_state_block(&mut self, block: impl FnOnce(&mut ViewStore) + 'static) {
        debug_assert!(self.registration.open, "state blocks can only be added during animate");
        self.registration.presented.push(Box::new(block));
    }

    /// Registers cleanup run when the animation stops.
    ///
    /// Only legal while the variant's `animate` hook runs.
    pub fn add_completion_block(&mut self, block: impl FnOnce(&mut ViewStore, bool) + 'static) {
        debug_assert!(
            self.registration.open,
            "completion blocks can only be added during animate"
        );
        self.registration.completion.push(Box::new(block));
    }

    /// Registers a mutation run before the next session attaches its views.
    pub fn add_prepare_block(&mut self, block: impl FnOnce(&mut ViewStore) + 'static) {
        self.prepare_blocks.push(Box::new(block));
    }

    /// Registers a hook run right after the next animator starts.
    pub fn add_start_block(
        &mut self,
        block: impl FnOnce(&mut Self, &mut ViewStore) + 'static,
    ) {
        self.start_blocks.push(Box::new(block));
    }

    // -- Interaction --

    /// Freezes `property` of `view` at its current value until the
    /// interaction ends. Pausing an already paused property does nothing.
    pub fn pause(&mut self, view: ViewId, property: AnimatableProperty) {
        if self
            .paused_tracks
            .iter()
            .any(|t| t.view == view && t.property == property)
        {
            return;
        }
        if let Some(track) = self
            .animator
            .as_mut()
            .and_then(|a| a.detach_track(view, property))
        {
            self.paused_tracks.push(track);
        }
    }

    /// Hands control of the transition to the user.
    ///
    /// Safe to call before the animator exists; the session then starts
    /// paused.
    pub fn begin_interactive_transition(&mut self, store: &mut ViewStore) {
        self.is_interactive = true;
        self.is_transitioning = true;
        if let Some(animator) = &mut self.animator {
            animator.pause(store);
        }
        if self.phase == Phase::Animating {
            self.set_phase(Phase::InteractivePaused);
        }
        if let Some(host) = self.host_mut() {
            host.pause_interactive_transition();
        }
        self.tracer.interaction_begin(&InteractionEvent {
            session: self.session,
            at: self.elapsed,
            fraction: self.fraction_completed(),
            should_finish: None,
        });
    }

    /// Returns control to the animator, which runs to the presented state
    /// if `should_finish`, otherwise back to where it started.
    pub fn end_interactive_transition(&mut self, store: &mut ViewStore, should_finish: bool) {
        if !self.is_interactive {
            return;
        }
        self.is_interactive = false;
        if !self.interaction_resolved {
            self.interaction_resolved = true;
            if let Some(host) = self.host_mut() {
                if should_finish {
                    host.finish_interactive_transition();
                } else {
                    host.cancel_interactive_transition();
                }
            }
        }
        self.tracer.interaction_end(&InteractionEvent {
            session: self.session,
            at: self.elapsed,
            fraction: self.fraction_completed(),
            should_finish: Some(should_finish),
        });

        let paused = mem::take(&mut self.paused_tracks);
        let Some(animator) = &mut self.animator else {
            // A drag that never got its session: nothing is transitioning.
            if self.phase == Phase::Idle && self.context.is_none() {
                self.is_transitioning = false;
            }
            return;
        };
        animator.set_reversed(!should_finish);
        for track in paused {
            animator.reattach_track(store, track);
        }
        if should_finish && animator.fraction_complete() >= 0.99 {
            animator.snap_to(store, AnimatingPosition::End);
        }
        if animator.state() == AnimatorState::Inactive {
            animator.start(store);
        } else {
            animator.continue_animation(1.0);
        }
        if self.phase == Phase::InteractivePaused {
            self.set_phase(Phase::Animating);
        }
    }

    // -- Session driving --

    pub(crate) fn setup(&mut self, is_presenting: bool, in_navigation: bool) {
        self.is_presenting = is_presenting;
        self.in_navigation = in_navigation;
    }

    /// # Panics
    ///
    /// Panics if the previous session has not ended.
    pub(crate) fn begin_session(&mut self, context: TransitionContext, variant: &'static str) {
        assert!(
            self.phase == Phase::Idle,
            "a transition session is already in progress"
        );
        self.context = Some(context);
        self.is_transitioning = true;
        self.animator = Some(Animator::new(self.config.duration, self.config.timing_curve));
        self.paused_tracks.clear();
        self.completion.clear();
        self.interaction_resolved = false;
        self.session += 1;
        self.elapsed = Duration::ZERO;
        self.tracer.session_begin(&SessionBeginEvent {
            session: self.session,
            variant,
            presenting: self.is_presenting,
            interactive: self.is_interactive,
            duration: self.config.duration,
        });
        self.set_phase(Phase::Preparing);
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        if self.phase == phase {
            return;
        }
        let from = mem::replace(&mut self.phase, phase);
        self.tracer.phase_change(&PhaseChangeEvent {
            session: self.session,
            at: self.elapsed,
            from,
            to: phase,
        });
    }

    pub(crate) fn run_prepare_blocks(&mut self, store: &mut ViewStore) {
        for block in mem::take(&mut self.prepare_blocks) {
            block(store);
        }
    }

    /// Attaches both screens to the container, background first, and lays
    /// out the incoming view.
    ///
    /// # Panics
    ///
    /// Panics if there is no transition context.
    pub(crate) fn attach_views(&mut self, store: &mut ViewStore, auto_layout: bool) {
        let SessionViews {
            container,
            foreground,
            background,
        } = self.session_views();
        let to_view = self.to_screen().map(|s| s.view);
        if !self.config.user_interaction_enabled {
            store.set_user_interaction_enabled(container, false);
        }
        store.reparent(background, container);
        store.reparent(foreground, container);

        let presenting = self.is_presenting;
        let context = self
            .context
            .as_mut()
            .expect("no transition context: animate called outside a session");
        if auto_layout && let Some(to_view) = to_view {
            if presenting {
                let bounds = store.bounds(container);
                store.set_frame_without_transform(to_view, bounds);
            } else {
                context.host.layout_container(store, container);
            }
            context.host.layout(store, to_view);
        }
        self.is_animating = true;
    }

    pub(crate) fn open_registration(&mut self) {
        self.registration.open = true;
    }

    pub(crate) fn close_registration(&mut self) -> Registered {
        let registration = mem::take(&mut self.registration);
        Registered {
            dismissed: registration.dismissed,
            presented: registration.presented,
            completion: registration.completion,
        }
    }

    /// Applies the starting state, records the animated one and starts the
    /// animator.
    pub(crate) fn launch(&mut self, store: &mut ViewStore, registered: Registered) {
        let Registered {
            dismissed,
            presented,
            completion,
        } = registered;
        let (immediate, animated) = if self.is_presenting {
            (dismissed, presented)
        } else {
            (presented, dismissed)
        };
        for block in immediate {
            block(store);
        }
        self.completion = completion;

        let animator = self
            .animator
            .get_or_insert_with(|| Animator::new(self.config.duration, self.config.timing_curve));
        animator.add_animations(store, |store| {
            for block in animated {
                block(store);
            }
        });
        animator.start(store);
        self.set_phase(Phase::Animating);

        for block in mem::take(&mut self.start_blocks) {
            block(self, store);
        }

        if self.is_interactive {
            if let Some(animator) = &mut self.animator {
                animator.pause(store);
            }
            self.set_phase(Phase::InteractivePaused);
        }
    }

    /// Advances the animator, returning where it stopped if it did.
    pub(crate) fn advance(&mut self, store: &mut ViewStore, dt: Duration) -> Option<AnimatingPosition> {
        self.elapsed += dt;
        self.animator.as_mut()?.tick(store, dt)
    }

    /// Runs the registered completion blocks and finishes the handoff with
    /// the host.
    pub(crate) fn complete(&mut self, store: &mut ViewStore, finished: bool, auto_layout: bool) {
        self.set_phase(Phase::Completing);
        if let Some(container) = self.container() {
            store.set_user_interaction_enabled(container, true);
        }
        for block in mem::take(&mut self.completion) {
            block(store, finished);
        }
        self.complete_transition(store, finished, auto_layout);
    }

    /// Removes the view that ended up hidden and reports completion to the
    /// host.
    pub(crate) fn complete_transition(&mut self, store: &mut ViewStore, finished: bool, auto_layout: bool) {
        let to_over = self.to_over_full_screen();
        let from_over = self.from_over_full_screen();
        let presenting = self.is_presenting;
        let Some(context) = self.context.as_mut() else {
            return;
        };
        let (from_view, to_view) = (context.from.view, context.to.view);
        if finished {
            if !to_over && store.is_alive(from_view) {
                store.detach(from_view);
            }
        } else if !from_over && store.is_alive(to_view) {
            store.detach(to_view);
        }

        let container = context.container;
        if auto_layout && store.is_alive(to_view) {
            let bounds = store.bounds(container);
            if store.frame(to_view) != bounds {
                store.set_frame_without_transform(to_view, bounds);
            }
        }

        if !presenting && finished {
            let target = context
                .to
                .presentation_container
                .or_else(|| if from_over { store.parent(container) } else { None });
            context.host.complete_transition(finished);
            if let Some(target) = target
                && store.is_alive(to_view)
            {
                store.reparent(to_view, target);
                context.host.layout_container(store, target);
            }
        } else {
            context.host.complete_transition(finished);
        }
    }

    /// Clears all session state.
    pub(crate) fn animation_ended(&mut self, completed: bool) {
        self.paused_tracks.clear();
        self.completion.clear();
        self.context = None;
        self.animator = None;
        self.in_navigation = false;
        self.is_transitioning = false;
        self.is_interactive = false;
        self.is_animating = false;
        self.set_phase(Phase::Idle);
        self.tracer.session_end(&SessionEndEvent {
            session: self.session,
            at: self.elapsed,
            finished: completed,
        });
    }
}

impl Default for TransitionEngine {
    fn default() -> Self {
        Self::new(TransitionConfig::default())
    }
}
