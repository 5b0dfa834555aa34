// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll metrics for scrollable views.
//!
//! Interactive dismissal has to cooperate with scrolling content: a dismiss
//! drag only starts when the content is at its leading edge, and a sheet can
//! suppress top overscroll while it is being dragged.

use kurbo::{Insets, Point, Size};

use super::id::ViewId;
use super::store::ViewStore;

/// Scroll state of a view that scrolls its content.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollState {
    /// Current content offset.
    pub content_offset: Point,
    /// Size of the scrollable content.
    pub content_size: Size,
    /// Effective content inset (`x0` left, `y0` top).
    pub content_inset: Insets,
    /// Whether the user is currently dragging the content.
    pub is_tracking: bool,
    /// Whether offsets above the top edge are clamped.
    pub disable_top_bounce: bool,
}

impl ScrollState {
    /// The smallest vertical offset that is not overscroll.
    #[must_use]
    pub fn min_offset_y(&self) -> f64 {
        -self.content_inset.y0
    }

    /// Returns whether the content is scrolled to (or past) its top.
    #[must_use]
    pub fn is_at_top(&self) -> bool {
        self.content_offset.y <= self.min_offset_y()
    }

    /// Returns whether the content sits at its leading edge along its
    /// scrolling axis. Content wider than `viewport` scrolls horizontally.
    #[must_use]
    pub fn is_at_leading_edge(&self, viewport: Size) -> bool {
        if self.content_size.width > viewport.width {
            self.content_offset.x <= -self.content_inset.x0
        } else {
            self.content_offset.y <= -self.content_inset.y0
        }
    }

    fn clamped(mut self) -> Self {
        if self.disable_top_bounce && self.content_offset.y < self.min_offset_y() {
            self.content_offset.y = self.min_offset_y();
        }
        self
    }
}

impl ViewStore {
    /// Returns the scroll state of `id`, if it scrolls.
    #[must_use]
    pub fn scroll_state(&self, id: ViewId) -> Option<ScrollState> {
        self.validate(id);
        self.scroll[id.idx as usize]
    }

    /// Makes `id` scrollable with the given state, or non-scrollable.
    pub fn set_scroll_state(&mut self, id: ViewId, state: Option<ScrollState>) {
        self.validate(id);
        self.scroll[id.idx as usize] = state.map(ScrollState::clamped);
    }

    /// Sets the content offset of a scrollable view, honoring top-bounce
    /// suppression. Non-scrollable views are ignored.
    pub fn set_content_offset(&mut self, id: ViewId, offset: Point) {
        self.validate(id);
        if let Some(state) = self.scroll[id.idx as usize].as_mut() {
            state.content_offset = offset;
            *state = state.clamped();
        }
    }

    /// Enables or disables top-bounce suppression, clamping immediately.
    pub fn set_disable_top_bounce(&mut self, id: ViewId, disable: bool) {
        self.validate(id);
        if let Some(state) = self.scroll[id.idx as usize].as_mut() {
            state.disable_top_bounce = disable;
            *state = state.clamped();
        }
    }

    /// Ends the user's current scroll drag on `id`.
    pub fn cancel_scroll_tracking(&mut self, id: ViewId) {
        self.validate(id);
        if let Some(state) = self.scroll[id.idx as usize].as_mut() {
            state.is_tracking = false;
        }
    }
}
