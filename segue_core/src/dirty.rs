// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dirty-tracking channel constants.
//!
//! The view tree uses multi-channel dirty tracking (via [`understory_dirty`])
//! so that a presenter only has to touch views whose properties changed.
//!
//! # Propagation semantics
//!
//! - **Propagating**: [`GEOMETRY`] and [`ALPHA`] use
//!   [`EagerPolicy`](understory_dirty::EagerPolicy) and have dependency
//!   edges from child to parent. A view's world transform depends on its
//!   center, bounds size and transform as well as every ancestor's; hidden
//!   changes are routed through [`GEOMETRY`] so the same drain recomputes
//!   effective hidden state.
//!
//! - **Local-only**: [`STYLE`] (corner radius, shadow, background color,
//!   z-position, clipping) and [`CONTENT`] (surface changes) are marked for
//!   the modified view only.
//!
//! - **Structural**: [`TOPOLOGY`] is marked on add/remove/create/destroy
//!   and triggers a traversal-order rebuild during evaluation.
//!
//! Callers consume the results through
//! [`ViewStore::evaluate`](crate::view::ViewStore::evaluate), which returns
//! [`FrameChanges`](crate::view::FrameChanges).

use understory_dirty::Channel;

/// Center, bounds size, transform or hidden flag changed.
pub const GEOMETRY: Channel = Channel::new(0);

/// Alpha changed; effective alpha of descendants must be recomputed.
pub const ALPHA: Channel = Channel::new(1);

/// Corner radius, shadow, background, z-position or clipping changed.
pub const STYLE: Channel = Channel::new(2);

/// Surface content changed.
pub const CONTENT: Channel = Channel::new(3);

/// Tree topology changed.
pub const TOPOLOGY: Channel = Channel::new(4);
