// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reading view states out of the store and writing them back.

use core::time::Duration;

use crate::state::ViewState;
use crate::transform::Transform3d;
use crate::view::{ViewId, ViewStore};

/// Captures the window-space geometry of `view`, plus the properties every
/// proxy animates.
pub(crate) fn geometry_state(store: &ViewStore, view: ViewId) -> ViewState {
    ViewState {
        window_transform: Some(store.window_transform(view)),
        window_position: Some(store.window_position(view)),
        size: Some(store.size(view)),
        corner_radius: Some(store.corner_radius(view)),
        background_color: store.background_color(view),
        ..ViewState::default()
    }
}

/// Captures the current value of every property `fields` sets.
///
/// Overlay colors capture as the same color, fully transparent.
pub(crate) fn carve_out(store: &ViewStore, view: ViewId, fields: &ViewState) -> ViewState {
    let mut state = ViewState::default();
    if fields.alpha.is_some() {
        state.alpha = Some(store.alpha(view));
    }
    if fields.transform.is_some() {
        state.transform = Some(store.transform(view));
    }
    if fields.shadow_opacity.is_some() {
        state.shadow_opacity = Some(store.shadow(view).opacity);
    }
    if fields.z_position.is_some() {
        state.z_position = Some(store.z_position(view));
    }
    if let Some(color) = fields.overlay_color {
        state.overlay_color = Some(color.with_alpha(0.0));
    }
    if fields.background_color.is_some() {
        state.background_color = store.background_color(view);
    }
    state
}

/// State a view animates to: the counterpart's geometry, with the resolved
/// modifiers on top.
pub(crate) fn target_state(store: &ViewStore, view: ViewId, resolved: &ViewState) -> ViewState {
    let begin = resolved.begin_state.as_deref().cloned().unwrap_or_default();
    geometry_state(store, view)
        .merge(&carve_out(store, view, &begin))
        .merge(resolved)
}

/// State a view animates from: its own geometry and current values, with
/// any `begin_with` state on top.
pub(crate) fn source_state(store: &ViewStore, view: ViewId, resolved: &ViewState) -> ViewState {
    let begin = resolved.begin_state.as_deref().cloned().unwrap_or_default();
    geometry_state(store, view)
        .merge(&carve_out(store, view, resolved))
        .merge(&begin)
}

/// State that puts a live view back the way it was found.
pub(crate) fn original_state(
    store: &ViewStore,
    view: ViewId,
    source: &ViewState,
    target: &ViewState,
) -> ViewState {
    geometry_state(store, view)
        .merge(&carve_out(store, view, source))
        .merge(&carve_out(store, view, target))
}

/// Writes `state` onto `view`.
///
/// Window-space fields are converted into the view's current parent and are
/// skipped for parentless views. An explicit `transform` replaces the one
/// derived from `window_transform`. With `scale_size`, a size change becomes
/// a scale and the corner radius is compensated for it.
pub(crate) fn apply_view_state(store: &mut ViewStore, state: &ViewState, view: ViewId) {
    let has_parent = store.parent(view).is_some();
    if let Some(position) = state.window_position
        && has_parent
    {
        store.set_window_position(view, position);
    }
    if let Some(transform) = state.window_transform
        && has_parent
    {
        store.set_window_transform(view, transform);
    }
    if let Some(transform) = state.transform {
        store.set_transform(view, transform);
    }
    let mut size_scale = 1.0;
    if let Some(size) = state.size {
        let bounds = store.size(view);
        if state.scale_size == Some(true) {
            if bounds.width > 0.0 && bounds.height > 0.0 {
                size_scale = size.width / bounds.width;
                let scaled = store.transform(view)
                    * Transform3d::from_scale(size.width / bounds.width, size.height / bounds.height, 1.0);
                store.set_transform(view, scaled);
            }
        } else {
            store.set_size(view, size);
        }
    }
    if let Some(alpha) = state.alpha {
        store.set_alpha(view, alpha);
    }
    if let Some(z) = state.z_position {
        store.set_z_position(view, z);
    }
    if let Some(opacity) = state.shadow_opacity {
        store.set_shadow_opacity(view, opacity);
    }
    if let Some(radius) = state.corner_radius {
        store.set_corner_radius(view, radius / size_scale);
    }
    if let Some(color) = state.overlay_color
        && let Some(overlay) = store.overlay(view)
    {
        store.set_background_color(overlay, Some(color));
    }
    if let Some(color) = state.background_color {
        store.set_background_color(view, Some(color));
    }
}

/// Sub-range of the animation a view's delay and duration select, as
/// `(relative_start, relative_duration)`. `None` when neither is set.
pub(crate) fn keyframe_timing(state: &ViewState, total: Duration) -> Option<(f64, f64)> {
    let delay = state.delay.unwrap_or(Duration::ZERO);
    let duration = state.duration.unwrap_or(Duration::ZERO);
    if (delay.is_zero() && duration.is_zero()) || total.is_zero() {
        return None;
    }
    let total = total.as_secs_f64();
    let start = delay.as_secs_f64() / total;
    let length = if duration.is_zero() {
        1.0 - start
    } else {
        duration.as_secs_f64() / total
    };
    Some((start, length))
}
