// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Animated property tracks and their capture.

use kurbo::{Point, Size};

use crate::color::Color;
use crate::transform::Transform3d;
use crate::view::ViewId;

/// A view property that animations can interpolate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimatableProperty {
    /// Center in the parent's space.
    Center,
    /// Bounds size.
    Size,
    /// Local transform.
    Transform,
    /// Alpha.
    Alpha,
    /// Corner radius.
    CornerRadius,
    /// Shadow opacity.
    ShadowOpacity,
    /// Shadow blur radius.
    ShadowRadius,
    /// Z-position.
    ZPosition,
    /// Background color.
    BackgroundColor,
}

/// A value of an [`AnimatableProperty`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PropertyValue {
    /// A point value.
    Point(Point),
    /// A size value.
    Size(Size),
    /// A transform value.
    Transform(Transform3d),
    /// A scalar value.
    Scalar(f64),
    /// An optional color value.
    Color(Option<Color>),
}

impl PropertyValue {
    /// Interpolates from `self` toward `to` by `t`.
    ///
    /// Mismatched variants snap to `to` at `t >= 1` and keep `self` before.
    /// Colors fade in from (or out to) a transparent copy of the other end.
    #[must_use]
    pub fn interpolate(&self, to: &Self, t: f64) -> Self {
        if t >= 1.0 {
            return *to;
        }
        match (*self, *to) {
            (Self::Point(a), Self::Point(b)) => Self::Point(a.lerp(b, t)),
            (Self::Size(a), Self::Size(b)) => Self::Size(Size::new(
                a.width + (b.width - a.width) * t,
                a.height + (b.height - a.height) * t,
            )),
            (Self::Transform(a), Self::Transform(b)) => Self::Transform(a.lerp(&b, t)),
            (Self::Scalar(a), Self::Scalar(b)) => Self::Scalar(a + (b - a) * t),
            (Self::Color(a), Self::Color(b)) => match (a, b) {
                (None, None) => Self::Color(None),
                (a, b) => {
                    let from = a.or(b.map(|c| c.with_alpha(0.0))).unwrap_or(Color::CLEAR);
                    let to = b.or(a.map(|c| c.with_alpha(0.0))).unwrap_or(Color::CLEAR);
                    Self::Color(Some(from.lerp(to, t)))
                }
            },
            (from, _) => from,
        }
    }
}

/// The portion of an animation's progress that a track occupies.
///
/// Both fields are relative to the whole animation, in `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KeyframeWindow {
    /// Relative start.
    pub start: f64,
    /// Relative duration.
    pub duration: f64,
}

impl KeyframeWindow {
    /// The whole animation.
    pub const FULL: Self = Self {
        start: 0.0,
        duration: 1.0,
    };

    /// Creates a window, clamping it into `0..=1`.
    #[must_use]
    pub fn new(start: f64, duration: f64) -> Self {
        let start = start.clamp(0.0, 1.0);
        Self {
            start,
            duration: duration.clamp(0.0, 1.0 - start),
        }
    }

    /// Maps overall progress to progress within the window.
    #[must_use]
    pub fn local(&self, progress: f64) -> f64 {
        if progress <= self.start {
            return 0.0;
        }
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((progress - self.start) / self.duration).clamp(0.0, 1.0)
    }
}

impl Default for KeyframeWindow {
    fn default() -> Self {
        Self::FULL
    }
}

/// One property of one view animated from `from` to `to`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Track {
    /// The animated view.
    pub view: ViewId,
    /// The animated property.
    pub property: AnimatableProperty,
    /// Value at progress 0.
    pub from: PropertyValue,
    /// Value at progress 1.
    pub to: PropertyValue,
    /// Where in the overall progress this track runs.
    pub window: KeyframeWindow,
}

impl Track {
    /// Returns the value at eased overall progress `progress`.
    #[must_use]
    pub fn value_at(&self, progress: f64) -> PropertyValue {
        self.from.interpolate(&self.to, self.window.local(progress))
    }
}

/// Captures property changes made while an animation block runs.
#[derive(Clone, Debug, Default)]
pub(crate) struct Recorder {
    tracks: Vec<Track>,
    window: KeyframeWindow,
}

impl Recorder {
    /// Sets the window for subsequent changes, returning the previous one.
    pub(crate) fn set_window(&mut self, window: KeyframeWindow) -> KeyframeWindow {
        core::mem::replace(&mut self.window, window)
    }

    /// Records a change. Repeated changes to the same property keep the
    /// first `from` and the latest `to`.
    pub(crate) fn record(
        &mut self,
        view: ViewId,
        property: AnimatableProperty,
        from: PropertyValue,
        to: PropertyValue,
    ) {
        if let Some(existing) = self
            .tracks
            .iter_mut()
            .find(|t| t.view == view && t.property == property)
        {
            existing.to = to;
            existing.window = self.window;
            return;
        }
        self.tracks.push(Track {
            view,
            property,
            from,
            to,
            window: self.window,
        });
    }

    pub(crate) fn finish(self) -> Vec<Track> {
        self.tracks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_maps_progress() {
        let w = KeyframeWindow::new(0.25, 0.5);
        assert_eq!(w.local(0.0), 0.0);
        assert_eq!(w.local(0.25), 0.0);
        assert_eq!(w.local(0.5), 0.5);
        assert_eq!(w.local(0.75), 1.0);
        assert_eq!(w.local(1.0), 1.0);
    }

    #[test]
    fn window_is_clamped() {
        let w = KeyframeWindow::new(0.8, 0.5);
        assert_eq!(w.start, 0.8);
        assert!((w.duration - 0.2).abs() < 1e-12);
    }

    #[test]
    fn zero_length_window_jumps() {
        let w = KeyframeWindow::new(0.5, 0.0);
        assert_eq!(w.local(0.4), 0.0);
        assert_eq!(w.local(0.6), 1.0);
    }

    #[test]
    fn color_fades_from_none() {
        let v = PropertyValue::Color(None).interpolate(&PropertyValue::Color(Some(Color::BLACK)), 0.5);
        assert_eq!(v, PropertyValue::Color(Some(Color::rgba(0.0, 0.0, 0.0, 0.5))));
        let end = PropertyValue::Color(Some(Color::BLACK)).interpolate(&PropertyValue::Color(None), 1.0);
        assert_eq!(end, PropertyValue::Color(None));
    }

    #[test]
    fn mismatched_values_snap_at_end() {
        let a = PropertyValue::Scalar(1.0);
        let b = PropertyValue::Point(Point::ORIGIN);
        assert_eq!(a.interpolate(&b, 0.5), a);
        assert_eq!(a.interpolate(&b, 1.0), b);
    }
}
