// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Choosing and driving the transition for each navigation operation.
//!
//! A [`Coordinator`] owns a set of registered [`Transition`]s. Index 0 is the
//! default, a hero transition unless replaced. For every operation, the
//! foreground screen (the incoming screen when presenting or pushing, the
//! outgoing one otherwise) is searched for a [`TransitionProvider`]
//! capability; the key it returns selects the transition, and the default is
//! used when no provider answers.
//!
//! The coordinator also keeps count of the transitions that are currently
//! animating and notifies observers when one starts or stops.

use core::fmt;
use core::time::Duration;

use crate::host::TransitionContext;
use crate::screen::{Screen, find_capability};
use crate::transition::{DragGesture, DragOutcome, Transition};
use crate::view::{ViewId, ViewStore};

/// Handle to a transition registered with a [`Coordinator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransitionKey(pub(crate) usize);

impl TransitionKey {
    /// Returns the registration index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Chooses the transition for operations where the implementing screen is
/// the foreground.
pub trait TransitionProvider {
    /// Returns the transition to use, or `None` for the default. `other` is
    /// the background screen.
    fn transition_for(&self, presenting: bool, other: &Screen) -> Option<TransitionKey>;
}

impl TransitionProvider for TransitionKey {
    fn transition_for(&self, _presenting: bool, _other: &Screen) -> Option<TransitionKey> {
        Some(*self)
    }
}

/// A navigation operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavigationOperation {
    /// Modal presentation.
    Present,
    /// Modal dismissal.
    Dismiss,
    /// Navigation stack push.
    Push,
    /// Navigation stack pop.
    Pop,
}

impl NavigationOperation {
    /// Returns whether the incoming screen is the foreground.
    #[must_use]
    pub fn is_presenting(self) -> bool {
        matches!(self, Self::Present | Self::Push)
    }

    /// Returns whether the operation happens inside a navigation stack.
    #[must_use]
    pub fn in_navigation(self) -> bool {
        matches!(self, Self::Push | Self::Pop)
    }
}

type Observer = Box<dyn FnMut(TransitionKey, bool)>;

/// Routes navigation operations to registered transitions.
pub struct Coordinator {
    transitions: Vec<Transition>,
    animating: Vec<bool>,
    animating_count: usize,
    current: Option<TransitionKey>,
    observers: Vec<Observer>,
}

impl fmt::Debug for Coordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coordinator")
            .field("transitions", &self.transitions)
            .field("animating_count", &self.animating_count)
            .field("current", &self.current)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl Default for Coordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl Coordinator {
    /// Creates a coordinator whose default is a hero transition.
    #[must_use]
    pub fn new() -> Self {
        Self::with_default(Transition::hero())
    }

    /// Creates a coordinator with a custom default transition.
    #[must_use]
    pub fn with_default(default: Transition) -> Self {
        Self {
            transitions: vec![default],
            animating: vec![false],
            animating_count: 0,
            current: None,
            observers: Vec::new(),
        }
    }

    /// Returns the key of the default transition.
    #[must_use]
    pub fn default_key(&self) -> TransitionKey {
        TransitionKey(0)
    }

    /// Registers a transition and returns its key.
    pub fn register(&mut self, transition: Transition) -> TransitionKey {
        self.transitions.push(transition);
        self.animating.push(false);
        TransitionKey(self.transitions.len() - 1)
    }

    /// Returns a registered transition.
    #[must_use]
    pub fn transition(&self, key: TransitionKey) -> Option<&Transition> {
        self.transitions.get(key.0)
    }

    /// Returns a registered transition mutably.
    pub fn transition_mut(&mut self, key: TransitionKey) -> Option<&mut Transition> {
        self.transitions.get_mut(key.0)
    }

    /// Returns the key of the transition chosen for the latest operation.
    #[must_use]
    pub fn current_key(&self) -> Option<TransitionKey> {
        self.current
    }

    /// Returns the transition chosen for the latest operation.
    #[must_use]
    pub fn current(&self) -> Option<&Transition> {
        self.current.and_then(|key| self.transition(key))
    }

    /// Returns the transition chosen for the latest operation mutably.
    pub fn current_mut(&mut self) -> Option<&mut Transition> {
        self.current.and_then(|key| self.transitions.get_mut(key.0))
    }

    /// Returns whether the current transition has a session in progress.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.current().is_some_and(|t| t.engine().is_transitioning())
    }

    /// Returns whether the current transition is animating.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.current().is_some_and(|t| t.engine().is_animating())
    }

    /// Returns how many registered transitions are animating.
    #[must_use]
    pub fn animating_count(&self) -> usize {
        self.animating_count
    }

    /// Registers a callback invoked with `(key, is_animating)` whenever a
    /// transition starts or stops animating.
    pub fn add_observer(&mut self, observer: impl FnMut(TransitionKey, bool) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Returns the key of the transition governing `operation` in `context`.
    #[must_use]
    pub fn transition_for(&self, operation: NavigationOperation, context: &TransitionContext) -> TransitionKey {
        let presenting = operation.is_presenting();
        let (foreground, background) = if presenting {
            (&context.to, &context.from)
        } else {
            (&context.from, &context.to)
        };
        find_capability(foreground, |c| c.transition_provider.clone())
            .and_then(|provider| provider.transition_for(presenting, background))
            .filter(|key| key.0 < self.transitions.len())
            .unwrap_or_else(|| self.default_key())
    }

    /// Starts `operation` with the governing transition, which becomes
    /// current.
    ///
    /// # Panics
    ///
    /// Panics if the governing transition is still running a session.
    pub fn begin(
        &mut self,
        operation: NavigationOperation,
        store: &mut ViewStore,
        context: TransitionContext,
    ) -> TransitionKey {
        let key = self.transition_for(operation, &context);
        self.current = Some(key);
        let transition = &mut self.transitions[key.0];
        transition.setup_transition(operation.is_presenting(), operation.in_navigation());
        transition.animate_transition(store, context);
        self.sync_animating();
        key
    }

    /// Advances every transition with a session in progress.
    ///
    /// Returns `Some(finished)` when the current transition's session ended
    /// during this call.
    pub fn tick(&mut self, store: &mut ViewStore, dt: Duration) -> Option<bool> {
        let mut result = None;
        for (index, transition) in self.transitions.iter_mut().enumerate() {
            if !transition.engine().is_transitioning() {
                continue;
            }
            let ended = transition.tick(store, dt);
            if self.current == Some(TransitionKey(index)) {
                result = ended;
            }
        }
        self.sync_animating();
        result
    }

    // -- Forwarding to the current transition --

    /// Hands control of the current transition to the user.
    pub fn begin_interactive_transition(&mut self, store: &mut ViewStore) {
        if let Some(transition) = self.current_mut() {
            transition.begin_interactive_transition(store);
        }
    }

    /// Releases the current transition from the user.
    pub fn end_interactive_transition(&mut self, store: &mut ViewStore, should_finish: bool) {
        if let Some(transition) = self.current_mut() {
            transition.end_interactive_transition(store, should_finish);
        }
    }

    /// Scrubs the current transition.
    pub fn set_fraction_completed(&mut self, store: &mut ViewStore, fraction: f64) {
        if let Some(transition) = self.current_mut() {
            transition.set_fraction_completed(store, fraction);
        }
    }

    /// Returns the current transition's fraction complete.
    #[must_use]
    pub fn fraction_completed(&self) -> f64 {
        self.current().map_or(0.0, Transition::fraction_completed)
    }

    /// Feeds a drag sample to the current transition.
    pub fn handle_drag(&mut self, store: &mut ViewStore, gesture: &DragGesture) -> DragOutcome {
        let outcome = match self.current_mut() {
            Some(transition) => transition.handle_drag(store, gesture),
            None => DragOutcome::Ignored,
        };
        self.sync_animating();
        outcome
    }

    /// Reports a tap to the current transition.
    #[must_use]
    pub fn handle_tap(&self, view: ViewId) -> DragOutcome {
        self.current()
            .map_or(DragOutcome::Ignored, |t| t.handle_tap(view))
    }

    /// Re-applies layout of every registered transition.
    pub fn container_did_layout(&mut self, store: &mut ViewStore) {
        for transition in &mut self.transitions {
            transition.container_did_layout(store);
        }
    }

    fn sync_animating(&mut self) {
        for (index, transition) in self.transitions.iter().enumerate() {
            let now = transition.engine().is_animating();
            if self.animating[index] == now {
                continue;
            }
            self.animating[index] = now;
            if now {
                self.animating_count += 1;
            } else {
                self.animating_count -= 1;
            }
            for observer in &mut self.observers {
                observer(TransitionKey(index), now);
            }
        }
    }
}
