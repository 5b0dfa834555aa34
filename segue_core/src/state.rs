// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Sparse visual states and the right-biased merge law.
//!
//! A [`ViewState`] describes the visual properties a transition wants a view
//! to have at one end of the animation. Every field is optional; `None`
//! means "leave as is". States compose only by [`merge`](ViewState::merge),
//! where the right-hand side wins field by field.

use core::time::Duration;

use kurbo::{Point, Size};

use crate::color::Color;
use crate::transform::Transform3d;

/// Where a participating view's proxy is parented during a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContainerType {
    /// Under the proxy of the nearest participating ancestor.
    #[default]
    Parent,
    /// Directly under the transition container.
    Global,
}

/// How a participating view is represented during a transition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SnapshotType {
    /// A bitmap proxy rendered by the host; the original is hidden.
    #[default]
    Bitmap,
    /// The original view itself, with a placeholder holding its place.
    LiveView,
}

/// A sparse record of visual properties.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewState {
    /// Center in window space.
    pub window_position: Option<Point>,
    /// Accumulated transform in window space.
    pub window_transform: Option<Transform3d>,
    /// Bounds size.
    pub size: Option<Size>,
    /// Alpha.
    pub alpha: Option<f64>,
    /// Transform, relative to the view's current one when produced by
    /// modifiers.
    pub transform: Option<Transform3d>,
    /// Shadow opacity.
    pub shadow_opacity: Option<f64>,
    /// Corner radius.
    pub corner_radius: Option<f64>,
    /// Z-position.
    pub z_position: Option<f64>,
    /// Color of the overlay laid over the proxy.
    pub overlay_color: Option<Color>,
    /// Background color.
    pub background_color: Option<Color>,
    /// Delay before this view's animation starts.
    pub delay: Option<Duration>,
    /// Length of this view's animation.
    pub duration: Option<Duration>,
    /// Proxy parenting policy.
    pub container_type: Option<ContainerType>,
    /// Proxy representation.
    pub snapshot_type: Option<SnapshotType>,
    /// Hero identifier of the matched counterpart.
    pub match_id: Option<String>,
    /// Animate size changes as a scale transform.
    pub scale_size: Option<bool>,
    /// Never act as a proxy container for descendants.
    pub skip_container: Option<bool>,
    /// Participate even without other modifiers.
    pub force_transition: Option<bool>,
    /// Starting state distinct from the steady-state target.
    pub begin_state: Option<Box<ViewState>>,
}

impl ViewState {
    /// Returns `self` overlaid with every field `other` sets.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            window_position: other.window_position.or(self.window_position),
            window_transform: other.window_transform.or(self.window_transform),
            size: other.size.or(self.size),
            alpha: other.alpha.or(self.alpha),
            transform: other.transform.or(self.transform),
            shadow_opacity: other.shadow_opacity.or(self.shadow_opacity),
            corner_radius: other.corner_radius.or(self.corner_radius),
            z_position: other.z_position.or(self.z_position),
            overlay_color: other.overlay_color.or(self.overlay_color),
            background_color: other.background_color.or(self.background_color),
            delay: other.delay.or(self.delay),
            duration: other.duration.or(self.duration),
            container_type: other.container_type.or(self.container_type),
            snapshot_type: other.snapshot_type.or(self.snapshot_type),
            match_id: other.match_id.clone().or_else(|| self.match_id.clone()),
            scale_size: other.scale_size.or(self.scale_size),
            skip_container: other.skip_container.or(self.skip_container),
            force_transition: other.force_transition.or(self.force_transition),
            begin_state: other
                .begin_state
                .clone()
                .or_else(|| self.begin_state.clone()),
        }
    }

    /// Returns whether no field other than `match_id` is set.
    #[must_use]
    pub fn is_only_match(&self) -> bool {
        let Self {
            window_position,
            window_transform,
            size,
            alpha,
            transform,
            shadow_opacity,
            corner_radius,
            z_position,
            overlay_color,
            background_color,
            delay,
            duration,
            container_type,
            snapshot_type,
            match_id: _,
            scale_size,
            skip_container,
            force_transition,
            begin_state,
        } = self;
        window_position.is_none()
            && window_transform.is_none()
            && size.is_none()
            && alpha.is_none()
            && transform.is_none()
            && shadow_opacity.is_none()
            && corner_radius.is_none()
            && z_position.is_none()
            && overlay_color.is_none()
            && background_color.is_none()
            && delay.is_none()
            && duration.is_none()
            && container_type.is_none()
            && snapshot_type.is_none()
            && scale_size.is_none()
            && skip_container.is_none()
            && force_transition.is_none()
            && begin_state.is_none()
    }
}
