// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! View tree data model.
//!
//! A *view* is a node in the tree the transition engine animates. Each view
//! has:
//!
//! - An identity ([`ViewId`]), a generational handle that becomes stale when
//!   the view is destroyed.
//! - Topology: parent, first-child, and sibling links forming an ordered
//!   tree. Later siblings draw in front of earlier ones. The root of a tree
//!   plays the role of the window.
//! - **Local properties** set by callers or by running animations: center,
//!   bounds size, transform, alpha, hidden flag, corner radius, shadow,
//!   background color, z-position, and surface content.
//! - **Hero metadata**: identifiers used for cross-screen matching and the
//!   ordered list of [`HeroModifier`](crate::modifier::HeroModifier)s.
//! - **Computed properties** produced by [`evaluate`](ViewStore::evaluate):
//!   world transforms, effective alpha and effective hidden state, consumed by
//!   a [`Presenter`](crate::backend::Presenter).
//!
//! # Dirty tracking
//!
//! Property mutations mark the corresponding channel (see
//! [`dirty`](crate::dirty)); [`evaluate`](ViewStore::evaluate) drains them
//! into a [`FrameChanges`].

mod evaluate;
mod geometry;
mod id;
mod scroll;
mod store;
mod traverse;

pub use evaluate::FrameChanges;
pub use id::{INVALID, SurfaceId, ViewId};
pub use scroll::ScrollState;
pub use store::{ContentMode, CornerMask, Shadow, ViewStore};
pub use traverse::{Ancestors, Children};
