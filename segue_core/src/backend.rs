// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Presentation contract for platform integrations.
//!
//! The engine animates views held in a [`ViewStore`]. Getting those views on
//! screen is the job of a *presenter* owned by the embedding platform: after
//! each frame's animation step the application evaluates the store and hands
//! the resulting [`FrameChanges`] to [`Presenter::apply`], which mirrors them
//! into a native tree (platform layers, DOM elements, a scene graph).
//!
//! Snapshots and navigation callbacks go through
//! [`TransitionHost`](crate::host::TransitionHost) instead.

use crate::view::{FrameChanges, ViewStore};

/// Applies evaluated frame changes to a platform-native presentation tree.
///
/// # Frame loop pseudocode
///
/// ```rust,ignore
/// fn on_frame(dt: Duration) {
///     // Animate: advance the running transition
///     coordinator.tick(&mut store, dt);
///
///     // Evaluate: drain dirty channels, recompute world properties
///     let changes = store.evaluate();
///
///     // Present: apply incremental changes to the native tree
///     presenter.apply(&store, &changes);
/// }
/// ```
pub trait Presenter {
    /// Applies the given [`FrameChanges`] to the backing presentation tree,
    /// reading current property values from `store` as needed.
    fn apply(&mut self, store: &ViewStore, changes: &FrameChanges);
}
