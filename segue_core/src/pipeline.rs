// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Modifier resolution.
//!
//! [`resolve`] folds an ordered modifier list into a [`ViewState`]. It is a
//! pure function of its inputs: it reads no view geometry and has no side
//! effects beyond the `is_matched` flag in the metadata it is handed, which
//! later conditionals in the same list observe.

use std::collections::HashMap;

use kurbo::Size;

use crate::modifier::HeroModifier;
use crate::screen::ScreenKind;
use crate::state::ViewState;
use crate::transform::Transform3d;
use crate::view::ViewId;

/// Context available while resolving one view's modifiers.
#[derive(Clone, Copy, Debug)]
pub struct ModifierMetadata<'a> {
    /// Size of the transition container.
    pub container_size: Size,
    /// Hero identifiers on the view's own screen.
    pub our_views: &'a HashMap<String, ViewId>,
    /// Hero identifiers on the other screen.
    pub other_views: &'a HashMap<String, ViewId>,
    /// Kind of the other screen.
    pub other_screen: ScreenKind,
    /// Whether the transition presents.
    pub is_presenting: bool,
    /// Whether the view is on the foreground screen.
    pub is_foreground: bool,
    /// Whether a `match` has resolved so far.
    pub is_matched: bool,
}

/// Resolves `modifiers` left to right into a [`ViewState`].
#[must_use]
pub fn resolve(modifiers: &[HeroModifier], metadata: &mut ModifierMetadata<'_>) -> ViewState {
    let mut state = ViewState::default();
    process(modifiers, metadata, &mut state);
    state
}

fn process(modifiers: &[HeroModifier], metadata: &mut ModifierMetadata<'_>, state: &mut ViewState) {
    for modifier in modifiers {
        match modifier {
            HeroModifier::Fade => state.alpha = Some(0.0),
            HeroModifier::Transform(t) => {
                state.transform = Some(state.transform.unwrap_or(Transform3d::IDENTITY).then(*t));
            }
            HeroModifier::Delay(d) => state.delay = Some(*d),
            HeroModifier::Duration(d) => state.duration = Some(*d),
            HeroModifier::ZPosition(z) => state.z_position = Some(*z),
            HeroModifier::ShadowOpacity(o) => state.shadow_opacity = Some(*o),
            HeroModifier::OverlayColor(c) => state.overlay_color = Some(*c),
            HeroModifier::BackgroundColor(c) => state.background_color = Some(*c),
            HeroModifier::Match(id) => {
                if metadata.other_views.contains_key(id) {
                    state.match_id = Some(id.clone());
                    metadata.is_matched = true;
                }
            }
            HeroModifier::ScaleSize => state.scale_size = Some(true),
            HeroModifier::SkipContainer => state.skip_container = Some(true),
            HeroModifier::ForceTransition => state.force_transition = Some(true),
            HeroModifier::ContainerType(t) => state.container_type = Some(*t),
            HeroModifier::SnapshotType(t) => state.snapshot_type = Some(*t),
            HeroModifier::When(condition, nested) => {
                if condition.holds(metadata) {
                    process(nested, metadata, state);
                }
            }
            HeroModifier::BeginWith(nested) => {
                let mut begin = ViewState::default();
                process(nested, metadata, &mut begin);
                let merged = match state.begin_state.take() {
                    Some(existing) => existing.merge(&begin),
                    None => begin,
                };
                state.begin_state = Some(Box::new(merged));
            }
            HeroModifier::Computed(computed) => {
                let produced = (computed.0)(&*metadata);
                process(&produced, metadata, state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use kurbo::Point;

    use super::*;
    use crate::color::Color;
    use crate::state::SnapshotType;
    use crate::view::ViewStore;

    struct Maps {
        ours: HashMap<String, ViewId>,
        others: HashMap<String, ViewId>,
    }

    fn maps() -> Maps {
        let mut store = ViewStore::new();
        let a = store.create_view();
        let b = store.create_view();
        Maps {
            ours: HashMap::from([("mine".to_owned(), a)]),
            others: HashMap::from([("a".to_owned(), b)]),
        }
    }

    fn metadata(maps: &Maps) -> ModifierMetadata<'_> {
        ModifierMetadata {
            container_size: Size::new(400.0, 800.0),
            our_views: &maps.ours,
            other_views: &maps.others,
            other_screen: ScreenKind("detail"),
            is_presenting: true,
            is_foreground: true,
            is_matched: false,
        }
    }

    #[test]
    fn resolution_is_deterministic() {
        let maps = maps();
        let list = vec![
            HeroModifier::Match("a".into()),
            HeroModifier::translate(10.0, 0.0),
            HeroModifier::scale(0.5),
            HeroModifier::Delay(Duration::from_millis(50)),
            HeroModifier::when_matched([HeroModifier::Fade]),
            HeroModifier::begin_with([HeroModifier::OverlayColor(Color::BLACK)]),
        ];
        let first = resolve(&list, &mut metadata(&maps));
        let second = resolve(&list, &mut metadata(&maps));
        assert_eq!(first, second);
    }

    #[test]
    fn match_then_when_matched_fires() {
        let maps = maps();
        let list = [
            HeroModifier::Match("a".into()),
            HeroModifier::when_matched([HeroModifier::Fade]),
        ];
        let state = resolve(&list, &mut metadata(&maps));
        assert_eq!(state.alpha, Some(0.0));
        assert_eq!(state.match_id.as_deref(), Some("a"));
    }

    #[test]
    fn when_matched_before_match_does_not_fire() {
        let maps = maps();
        let list = [
            HeroModifier::when_matched([HeroModifier::Fade]),
            HeroModifier::Match("a".into()),
        ];
        let state = resolve(&list, &mut metadata(&maps));
        assert_eq!(state.alpha, None);
        assert_eq!(state.match_id.as_deref(), Some("a"));
    }

    #[test]
    fn unresolvable_match_is_dropped() {
        let maps = maps();
        let list = [
            HeroModifier::Match("missing".into()),
            HeroModifier::when_not_matched([HeroModifier::ZPosition(5.0)]),
        ];
        let mut meta = metadata(&maps);
        let state = resolve(&list, &mut meta);
        assert_eq!(state.match_id, None);
        assert_eq!(state.z_position, Some(5.0));
        assert!(!meta.is_matched);
    }

    #[test]
    fn begin_with_is_isolated() {
        let maps = maps();
        let list = [
            HeroModifier::ShadowOpacity(0.2),
            HeroModifier::begin_with([HeroModifier::Fade]),
            HeroModifier::begin_with([HeroModifier::ZPosition(9.0)]),
        ];
        let state = resolve(&list, &mut metadata(&maps));
        assert_eq!(state.alpha, None);
        assert_eq!(state.shadow_opacity, Some(0.2));
        let begin = state.begin_state.expect("begin state");
        assert_eq!(begin.alpha, Some(0.0));
        assert_eq!(begin.z_position, Some(9.0));
        assert_eq!(begin.shadow_opacity, None);
    }

    #[test]
    fn transforms_compose_in_authored_order() {
        let maps = maps();
        let list = [HeroModifier::translate(10.0, 0.0), HeroModifier::scale(2.0)];
        let state = resolve(&list, &mut metadata(&maps));
        let p = state
            .transform
            .expect("transform")
            .transform_point(Point::ORIGIN);
        assert!((p.x - 20.0).abs() < 1e-9);

        let swapped = [HeroModifier::scale(2.0), HeroModifier::translate(10.0, 0.0)];
        let state = resolve(&swapped, &mut metadata(&maps));
        let p = state
            .transform
            .expect("transform")
            .transform_point(Point::ORIGIN);
        assert!((p.x - 10.0).abs() < 1e-9);
    }

    #[test]
    fn translate_percentage_uses_container() {
        let maps = maps();
        let state = resolve(
            &[HeroModifier::translate_percentage(0.5, -0.25)],
            &mut metadata(&maps),
        );
        let t = state.transform.expect("transform").translation();
        assert_eq!(t, [200.0, -200.0, 0.0]);
    }

    #[test]
    fn side_conditions() {
        let maps = maps();
        let list = [
            HeroModifier::when_appearing([HeroModifier::ZPosition(1.0)]),
            HeroModifier::when_disappearing([HeroModifier::ZPosition(2.0)]),
            HeroModifier::when_background([HeroModifier::LIVE_VIEW]),
            HeroModifier::when_other_screen_is(ScreenKind("detail"), [HeroModifier::ScaleSize]),
            HeroModifier::when_other_screen_is_not(ScreenKind("detail"), [HeroModifier::SkipContainer]),
            HeroModifier::when_another_view_is_matched(["a"], [HeroModifier::ForceTransition]),
        ];
        let state = resolve(&list, &mut metadata(&maps));
        assert_eq!(state.z_position, Some(1.0));
        assert_eq!(state.snapshot_type, None);
        assert_eq!(state.scale_size, Some(true));
        assert_eq!(state.skip_container, None);
        assert_eq!(state.force_transition, Some(true));

        let mut background = metadata(&maps);
        background.is_foreground = false;
        let state = resolve(&list, &mut background);
        assert_eq!(state.z_position, Some(2.0));
        assert_eq!(state.snapshot_type, Some(SnapshotType::LiveView));
    }

    #[test]
    fn custom_predicate() {
        let maps = maps();
        let list = [HeroModifier::when(
            |m| m.container_size.width > 300.0,
            [HeroModifier::Fade],
        )];
        assert_eq!(resolve(&list, &mut metadata(&maps)).alpha, Some(0.0));
    }
}
