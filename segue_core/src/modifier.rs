// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative per-view transition instructions.
//!
//! Modifiers are attached to views with
//! [`ViewStore::set_hero_modifiers`](crate::view::ViewStore::set_hero_modifiers)
//! and resolved left to right by [`resolve`](crate::pipeline::resolve).

use core::fmt;
use core::time::Duration;
use std::rc::Rc;

use crate::color::Color;
use crate::pipeline::ModifierMetadata;
use crate::screen::ScreenKind;
use crate::state::{ContainerType, SnapshotType};
use crate::transform::Transform3d;

/// A closure producing modifiers from evaluation metadata.
#[derive(Clone)]
pub struct Computed(pub Rc<dyn Fn(&ModifierMetadata<'_>) -> Vec<HeroModifier>>);

impl fmt::Debug for Computed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Computed(..)")
    }
}

/// A predicate gating a nested modifier list.
#[derive(Clone)]
pub enum Condition {
    /// The transition presents.
    Presenting,
    /// The transition dismisses.
    Dismissing,
    /// A `match` earlier in the list resolved.
    Matched,
    /// No `match` earlier in the list resolved.
    NotMatched,
    /// The view is on the screen that is arriving.
    Appearing,
    /// The view is on the screen that is leaving.
    Disappearing,
    /// The view is on the foreground screen.
    Foreground,
    /// The view is on the background screen.
    Background,
    /// The other screen is of the given kind.
    OtherScreenIs(ScreenKind),
    /// The other screen is not of the given kind.
    OtherScreenIsNot(ScreenKind),
    /// Any of the given hero identifiers exists on the other screen.
    AnyIdMatched(Vec<String>),
    /// None of the given hero identifiers exists on the other screen.
    NoIdMatched(Vec<String>),
    /// A custom predicate.
    Custom(Rc<dyn Fn(&ModifierMetadata<'_>) -> bool>),
}

impl Condition {
    /// Evaluates the predicate.
    #[must_use]
    pub fn holds(&self, metadata: &ModifierMetadata<'_>) -> bool {
        match self {
            Self::Presenting => metadata.is_presenting,
            Self::Dismissing => !metadata.is_presenting,
            Self::Matched => metadata.is_matched,
            Self::NotMatched => !metadata.is_matched,
            Self::Appearing => metadata.is_presenting == metadata.is_foreground,
            Self::Disappearing => metadata.is_presenting != metadata.is_foreground,
            Self::Foreground => metadata.is_foreground,
            Self::Background => !metadata.is_foreground,
            Self::OtherScreenIs(kind) => metadata.other_screen == *kind,
            Self::OtherScreenIsNot(kind) => metadata.other_screen != *kind,
            Self::AnyIdMatched(ids) => ids.iter().any(|id| metadata.other_views.contains_key(id)),
            Self::NoIdMatched(ids) => !ids.iter().any(|id| metadata.other_views.contains_key(id)),
            Self::Custom(predicate) => predicate(metadata),
        }
    }
}

impl fmt::Debug for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Presenting => f.write_str("Presenting"),
            Self::Dismissing => f.write_str("Dismissing"),
            Self::Matched => f.write_str("Matched"),
            Self::NotMatched => f.write_str("NotMatched"),
            Self::Appearing => f.write_str("Appearing"),
            Self::Disappearing => f.write_str("Disappearing"),
            Self::Foreground => f.write_str("Foreground"),
            Self::Background => f.write_str("Background"),
            Self::OtherScreenIs(kind) => f.debug_tuple("OtherScreenIs").field(kind).finish(),
            Self::OtherScreenIsNot(kind) => f.debug_tuple("OtherScreenIsNot").field(kind).finish(),
            Self::AnyIdMatched(ids) => f.debug_tuple("AnyIdMatched").field(ids).finish(),
            Self::NoIdMatched(ids) => f.debug_tuple("NoIdMatched").field(ids).finish(),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A single declarative transition instruction.
#[derive(Clone, Debug)]
pub enum HeroModifier {
    /// Alpha 0.
    Fade,
    /// Composes a transform onto any accumulated one.
    Transform(Transform3d),
    /// Delay before the view animates.
    Delay(Duration),
    /// Length of the view's animation.
    Duration(Duration),
    /// Z-position.
    ZPosition(f64),
    /// Shadow opacity.
    ShadowOpacity(f64),
    /// Tints the proxy with an overlay.
    OverlayColor(Color),
    /// Background color.
    BackgroundColor(Color),
    /// Pairs the view with the view carrying this identifier on the other
    /// screen, if there is one.
    Match(String),
    /// Animate size as a scale transform rather than a bounds change.
    ScaleSize,
    /// Never act as a proxy container for descendants.
    SkipContainer,
    /// Participate regardless of other modifiers. Unless a snapshot type is
    /// given, the view itself moves into the transition container as a live
    /// view, independent of any ancestor's proxy content.
    ForceTransition,
    /// Proxy parenting policy.
    ContainerType(ContainerType),
    /// Proxy representation.
    SnapshotType(SnapshotType),
    /// Applies the nested list only while the condition holds.
    When(Condition, Vec<HeroModifier>),
    /// Evaluates the nested list into the starting state.
    BeginWith(Vec<HeroModifier>),
    /// Produces modifiers from evaluation metadata.
    Computed(Computed),
}

impl HeroModifier {
    /// Use a live-view proxy.
    pub const LIVE_VIEW: Self = Self::SnapshotType(SnapshotType::LiveView);
    /// Parent the proxy directly under the container.
    pub const GLOBAL_CONTAINER: Self = Self::ContainerType(ContainerType::Global);

    /// Translation in points.
    #[must_use]
    pub fn translate(x: f64, y: f64) -> Self {
        Self::Transform(Transform3d::from_translation(x, y, 0.0))
    }

    /// Translation in points, including depth.
    #[must_use]
    pub fn translate_3d(x: f64, y: f64, z: f64) -> Self {
        Self::Transform(Transform3d::from_translation(x, y, z))
    }

    /// Translation as a fraction of the container size.
    #[must_use]
    pub fn translate_percentage(x: f64, y: f64) -> Self {
        Self::computed(move |m| {
            vec![Self::translate(
                x * m.container_size.width,
                y * m.container_size.height,
            )]
        })
    }

    /// Rotation around the Z axis (radians).
    #[must_use]
    pub fn rotate(radians: f64) -> Self {
        Self::Transform(Transform3d::from_rotation_z(radians))
    }

    /// Rotation around an arbitrary axis (radians).
    #[must_use]
    pub fn rotate_about(radians: f64, x: f64, y: f64, z: f64) -> Self {
        Self::Transform(Transform3d::from_rotation(radians, x, y, z))
    }

    /// Uniform planar scale.
    #[must_use]
    pub fn scale(amount: f64) -> Self {
        Self::Transform(Transform3d::from_scale(amount, amount, 1.0))
    }

    /// Non-uniform scale.
    #[must_use]
    pub fn scale_xyz(x: f64, y: f64, z: f64) -> Self {
        Self::Transform(Transform3d::from_scale(x, y, z))
    }

    /// Starting-state modifiers.
    #[must_use]
    pub fn begin_with(modifiers: impl Into<Vec<Self>>) -> Self {
        Self::BeginWith(modifiers.into())
    }

    /// Modifiers computed from evaluation metadata.
    #[must_use]
    pub fn computed(f: impl Fn(&ModifierMetadata<'_>) -> Vec<Self> + 'static) -> Self {
        Self::Computed(Computed(Rc::new(f)))
    }

    /// Modifiers gated by a custom predicate.
    #[must_use]
    pub fn when(
        predicate: impl Fn(&ModifierMetadata<'_>) -> bool + 'static,
        modifiers: impl Into<Vec<Self>>,
    ) -> Self {
        Self::When(Condition::Custom(Rc::new(predicate)), modifiers.into())
    }

    /// Modifiers applied when presenting.
    #[must_use]
    pub fn when_presenting(modifiers: impl Into<Vec<Self>>) -> Self {
        Self::When(Condition::Presenting, modifiers.into())
    }

    /// Modifiers applied when dismissing.
    #[must_use]
    pub fn when_dismissing(modifiers: impl Into<Vec<Self>>) -> Self {
        Self::When(Condition::Dismissing, modifiers.into())
    }

    /// Modifiers applied once an earlier `match` resolved.
    #[must_use]
    pub fn when_matched(modifiers: impl Into<Vec<Self>>) -> Self {
        Self::When(Condition::Matched, modifiers.into())
    }

    /// Modifiers applied while no earlier `match` resolved.
    #[must_use]
    pub fn when_not_matched(modifiers: impl Into<Vec<Self>>) -> Self {
        Self::When(Condition::NotMatched, modifiers.into())
    }

    /// Modifiers applied to views on the arriving screen.
    #[must_use]
    pub fn when_appearing(modifiers: impl Into<Vec<Self>>) -> Self {
        Self::When(Condition::Appearing, modifiers.into())
    }

    /// Modifiers applied to views on the leaving screen.
    #[must_use]
    pub fn when_disappearing(modifiers: impl Into<Vec<Self>>) -> Self {
        Self::When(Condition::Disappearing, modifiers.into())
    }

    /// Modifiers applied to views on the foreground screen.
    #[must_use]
    pub fn when_foreground(modifiers: impl Into<Vec<Self>>) -> Self {
        Self::When(Condition::Foreground, modifiers.into())
    }

    /// Modifiers applied to views on the background screen.
    #[must_use]
    pub fn when_background(modifiers: impl Into<Vec<Self>>) -> Self {
        Self::When(Condition::Background, modifiers.into())
    }

    /// Modifiers applied when the other screen is of `kind`.
    #[must_use]
    pub fn when_other_screen_is(kind: ScreenKind, modifiers: impl Into<Vec<Self>>) -> Self {
        Self::When(Condition::OtherScreenIs(kind), modifiers.into())
    }

    /// Modifiers applied when the other screen is not of `kind`.
    #[must_use]
    pub fn when_other_screen_is_not(kind: ScreenKind, modifiers: impl Into<Vec<Self>>) -> Self {
        Self::When(Condition::OtherScreenIsNot(kind), modifiers.into())
    }

    /// Modifiers applied when another view, identified by its hero
    /// identifiers, has a counterpart on the other screen.
    #[must_use]
    pub fn when_another_view_is_matched<S: Into<String>>(
        ids: impl IntoIterator<Item = S>,
        modifiers: impl Into<Vec<Self>>,
    ) -> Self {
        let ids = ids.into_iter().map(Into::into).collect();
        Self::When(Condition::AnyIdMatched(ids), modifiers.into())
    }

    /// Modifiers applied when another view, identified by its hero
    /// identifiers, has no counterpart on the other screen.
    #[must_use]
    pub fn when_another_view_is_not_matched<S: Into<String>>(
        ids: impl IntoIterator<Item = S>,
        modifiers: impl Into<Vec<Self>>,
    ) -> Self {
        let ids = ids.into_iter().map(Into::into).collect();
        Self::When(Condition::NoIdMatched(ids), modifiers.into())
    }
}
