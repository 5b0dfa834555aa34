// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition configuration.

use core::time::Duration;

use crate::animator::TimingCurve;

/// Timing and interaction settings shared by every session of a transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionConfig {
    /// Nominal animation duration.
    pub duration: Duration,
    /// Easing applied to the animator's progress.
    pub timing_curve: TimingCurve,
    /// Whether the container accepts input while the animation runs.
    pub user_interaction_enabled: bool,
}

impl Default for TransitionConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(400),
            timing_curve: TimingCurve::default(),
            user_interaction_enabled: false,
        }
    }
}

impl TransitionConfig {
    /// Returns a copy with a different duration.
    #[must_use]
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Returns a copy with a different timing curve.
    #[must_use]
    pub fn with_timing_curve(mut self, curve: TimingCurve) -> Self {
        self.timing_curve = curve;
        self
    }
}
