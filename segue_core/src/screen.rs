// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Screens taking part in a transition, and capability lookup over the
//! screen tree.
//!
//! A [`Screen`] is the unit a navigation host presents: a root view, a kind
//! tag used by `when_other_screen_is` conditions, a presentation style, and
//! the child screens it contains (navigation stacks, tab pages). Optional
//! behavior a transition can ask a screen for is carried in
//! [`Capabilities`] and found with [`find_capability`].

use core::fmt;
use std::rc::Rc;

use crate::coordinator::TransitionProvider;
use crate::variants::matched::MatchDelegate;
use crate::variants::sheet::{SheetBackgroundDelegate, SheetForegroundDelegate};
use crate::view::ViewId;

/// Tag naming the type of a screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScreenKind(pub &'static str);

/// How a screen was presented.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PresentationStyle {
    /// Replaces the presenting screen, which is removed when covered.
    #[default]
    FullScreen,
    /// Covers the whole window; the presenting screen stays in the tree.
    OverFullScreen,
    /// Covers the presenting context; the presenting screen stays in the tree.
    OverCurrentContext,
    /// Presentation driven by a custom controller; the presenting screen
    /// stays in the tree.
    Custom,
}

impl PresentationStyle {
    /// Returns whether the screen below stays attached while this one is up.
    #[must_use]
    pub fn is_over_full_screen(self) -> bool {
        matches!(
            self,
            Self::OverFullScreen | Self::OverCurrentContext | Self::Custom
        )
    }
}

/// Optional behavior a screen provides to transitions.
#[derive(Clone, Default)]
pub struct Capabilities {
    /// Supplies matched views for the match transition.
    pub match_delegate: Option<Rc<dyn MatchDelegate>>,
    /// Customizes the screen behind a sheet.
    pub sheet_background: Option<Rc<dyn SheetBackgroundDelegate>>,
    /// Customizes a presented sheet.
    pub sheet_foreground: Option<Rc<dyn SheetForegroundDelegate>>,
    /// Chooses the transition used when this screen is the foreground.
    pub transition_provider: Option<Rc<dyn TransitionProvider>>,
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("match_delegate", &self.match_delegate.is_some())
            .field("sheet_background", &self.sheet_background.is_some())
            .field("sheet_foreground", &self.sheet_foreground.is_some())
            .field("transition_provider", &self.transition_provider.is_some())
            .finish()
    }
}

/// A presentable unit of UI.
#[derive(Clone, Debug)]
pub struct Screen {
    /// Root view.
    pub view: ViewId,
    /// Kind tag.
    pub kind: ScreenKind,
    /// How this screen was presented.
    pub presentation_style: PresentationStyle,
    /// Where the host keeps this screen's view while it is presented, if
    /// that is not the transition container.
    pub presentation_container: Option<ViewId>,
    /// Contained screens, front-most last.
    pub children: Vec<Screen>,
    /// Optional behavior.
    pub capabilities: Capabilities,
}

impl Screen {
    /// Creates a full-screen screen with no children or capabilities.
    #[must_use]
    pub fn new(view: ViewId, kind: ScreenKind) -> Self {
        Self {
            view,
            kind,
            presentation_style: PresentationStyle::FullScreen,
            presentation_container: None,
            children: Vec::new(),
            capabilities: Capabilities::default(),
        }
    }

    /// Sets the presentation style.
    #[must_use]
    pub fn with_presentation_style(mut self, style: PresentationStyle) -> Self {
        self.presentation_style = style;
        self
    }

    /// Sets the presentation container.
    #[must_use]
    pub fn with_presentation_container(mut self, container: ViewId) -> Self {
        self.presentation_container = Some(container);
        self
    }

    /// Appends a child screen.
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Sets the capabilities.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}

/// Finds the first capability `pick` returns for `screen` or its
/// descendants, checking a screen before its children and children
/// front-most first.
pub fn find_capability<T>(screen: &Screen, pick: impl Fn(&Capabilities) -> Option<T> + Copy) -> Option<T> {
    if let Some(found) = pick(&screen.capabilities) {
        return Some(found);
    }
    screen
        .children
        .iter()
        .rev()
        .find_map(|child| find_capability(child, pick))
}
