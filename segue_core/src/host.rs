// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The navigation host a transition runs inside.
//!
//! A [`TransitionContext`] is handed to
//! [`Transition::animate_transition`](crate::transition::Transition::animate_transition)
//! for every navigation operation. It names the container view the two
//! screens animate in, the outgoing and incoming [`Screen`]s, the container's
//! [`ContainerTraits`], and a [`TransitionHost`] that snapshots views and
//! receives the interactive and completion callbacks.

use core::fmt;

use crate::screen::Screen;
use crate::view::{SurfaceId, ViewId, ViewStore};

/// Callbacks into the platform's navigation machinery.
pub trait TransitionHost {
    /// Renders the subtree rooted at `view` into a surface.
    fn snapshot(&mut self, store: &ViewStore, view: ViewId) -> SurfaceId;

    /// A surface produced by [`snapshot`](Self::snapshot) is no longer used.
    fn release_snapshot(&mut self, surface: SurfaceId) {
        _ = surface;
    }

    /// The transition became interactive.
    fn pause_interactive_transition(&mut self) {}

    /// An interaction ended and the transition will finish.
    fn finish_interactive_transition(&mut self) {}

    /// An interaction ended and the transition will be cancelled.
    fn cancel_interactive_transition(&mut self) {}

    /// The transition is over; `finished` is false when it was cancelled.
    fn complete_transition(&mut self, finished: bool);

    /// Lays out the contents of `container` with its current bounds.
    fn layout_container(&mut self, store: &mut ViewStore, container: ViewId) {
        _ = (store, container);
    }

    /// Lays out `view` synchronously.
    fn layout(&mut self, store: &mut ViewStore, view: ViewId) {
        _ = (store, view);
    }
}

/// Light or dark appearance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Appearance {
    /// Light appearance.
    #[default]
    Light,
    /// Dark appearance.
    Dark,
}

/// Environment of the transition container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerTraits {
    /// Top safe-area inset.
    pub safe_area_top: f64,
    /// Whether the vertical size class is compact (landscape phone).
    pub is_compact_vertical: bool,
    /// Corner radius of the physical display.
    pub display_corner_radius: f64,
    /// Whether the container spans the whole display.
    pub is_full_screen: bool,
    /// Current appearance.
    pub appearance: Appearance,
    /// Whether content is drawn at the elevated level.
    pub is_elevated: bool,
}

impl Default for ContainerTraits {
    fn default() -> Self {
        Self {
            safe_area_top: 0.0,
            is_compact_vertical: false,
            display_corner_radius: 0.0,
            is_full_screen: true,
            appearance: Appearance::Light,
            is_elevated: false,
        }
    }
}

/// Everything a transition needs for one session.
pub struct TransitionContext {
    /// View both screens animate in.
    pub container: ViewId,
    /// Outgoing screen.
    pub from: Screen,
    /// Incoming screen.
    pub to: Screen,
    /// Container environment.
    pub traits: ContainerTraits,
    /// Navigation host.
    pub host: Box<dyn TransitionHost>,
}

impl TransitionContext {
    /// Creates a context with default traits.
    pub fn new(container: ViewId, from: Screen, to: Screen, host: impl TransitionHost + 'static) -> Self {
        Self {
            container,
            from,
            to,
            traits: ContainerTraits::default(),
            host: Box::new(host),
        }
    }

    /// Replaces the container traits.
    #[must_use]
    pub fn with_traits(mut self, traits: ContainerTraits) -> Self {
        self.traits = traits;
        self
    }
}

impl fmt::Debug for TransitionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionContext")
            .field("container", &self.container)
            .field("from", &self.from)
            .field("to", &self.to)
            .field("traits", &self.traits)
            .finish_non_exhaustive()
    }
}
