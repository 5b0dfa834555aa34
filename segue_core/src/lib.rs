// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screen transition engine: view matching, a modifier pipeline, and
//! interactive transition variants.
//!
//! `segue_core` animates the handoff between two screens of a retained view
//! tree. Views live in a struct-of-arrays [`ViewStore`](view::ViewStore)
//! addressed by generational handles; transitions mutate view properties and
//! a platform [`Presenter`](backend::Presenter) applies the resulting
//! incremental changes.
//!
//! # Architecture
//!
//! ```text
//!   Coordinator::begin(op, context)
//!       │  picks a Transition via TransitionProvider (or the hero default)
//!       ▼
//!   Transition::animate_transition ──► variant registers state blocks
//!       │
//!       ▼
//!   tick(dt) ──► Animator interpolates tracks ──► ViewStore mutations
//!                                                    │
//!                 ┌──────────────────────────────────┘
//!                 ▼
//!   ViewStore::evaluate() ──► FrameChanges ──► Presenter::apply()
//! ```
//!
//! **[`view`]**: Struct-of-arrays view tree with generational handles,
//! coordinate conversion, scroll state and incremental evaluation.
//!
//! **[`dirty`]**: Multi-channel dirty tracking via `understory_dirty`.
//! GEOMETRY and ALPHA propagate to descendants; STYLE and CONTENT are
//! local-only; TOPOLOGY triggers a traversal rebuild.
//!
//! **[`animator`]**: Property tracks recorded from store mutations and
//! driven by a timing curve, with pausing, scrubbing and reversal.
//!
//! **[`transition`]**: The per-session state machine and the
//! [`Transition`](transition::Transition) facade over the built-in variants.
//!
//! **[`hero`]**: The matching engine: hero identifiers, snapshots and
//! source/target states.
//!
//! **[`modifier`]**, **[`pipeline`]**, **[`state`]**: Hero modifiers and
//! their resolution into sparse [`ViewState`](state::ViewState)s.
//!
//! **[`variants`]**: Fade, match and sheet transitions.
//!
//! **[`coordinator`]**: Chooses the transition per navigation operation and
//! counts animating transitions.
//!
//! **[`screen`]**, **[`host`]**: Screens with capabilities, and the
//! navigation host a session runs inside.
//!
//! **[`trace`]**: [`TraceSink`](trace::TraceSink) trait and event types for
//! session instrumentation, with a zero-overhead [`Tracer`](trace::Tracer)
//! wrapper.
//!
//! # Crate features
//!
//! - `trace` (disabled by default): Enables `Tracer` method bodies (one branch
//!   per call site).

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod animator;
pub mod backend;
pub mod color;
pub mod config;
pub mod coordinator;
pub mod dirty;
pub mod hero;
pub mod host;
pub mod modifier;
pub mod pipeline;
pub mod screen;
pub mod state;
pub mod trace;
pub mod transform;
pub mod transition;
pub mod variants;
pub mod view;
