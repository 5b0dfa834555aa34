// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interruptible, reversible animation driver.
//!
//! An [`Animator`] owns a set of [`Track`]s captured from a closure that
//! mutates the [`ViewStore`]: every animatable setter called inside
//! [`add_animations`](Animator::add_animations) records where the property
//! started and where it should end up. The animator then drives those
//! properties by a single *fraction complete* that advances with
//! [`tick`](Animator::tick), can be paused, scrubbed, reversed and resumed.
//!
//! ```text
//!   Inactive ──start/pause──► Active ──reaches end──► Inactive
//!                               │ ▲
//!                          pause│ │continue
//!                               ▼ │
//!                             (paused)
//! ```

mod curve;
mod track;

use core::time::Duration;

pub use curve::TimingCurve;
pub(crate) use track::Recorder;
pub use track::{AnimatableProperty, KeyframeWindow, PropertyValue, Track};

use crate::view::{ViewId, ViewStore};

/// Lifecycle state of an [`Animator`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AnimatorState {
    /// Not started, or finished.
    #[default]
    Inactive,
    /// Started; either running or paused.
    Active,
}

/// Where an animation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimatingPosition {
    /// At the starting values (it was reversed).
    Start,
    /// At the final values.
    End,
}

/// Drives recorded property tracks from their starting to their final values.
#[derive(Clone, Debug)]
pub struct Animator {
    duration: Duration,
    curve: TimingCurve,
    state: AnimatorState,
    running: bool,
    reversed: bool,
    fraction: f64,
    speed: f64,
    tracks: Vec<Track>,
}

impl Animator {
    /// Creates an inactive animator.
    #[must_use]
    pub fn new(duration: Duration, curve: TimingCurve) -> Self {
        Self {
            duration,
            curve,
            state: AnimatorState::Inactive,
            running: false,
            reversed: false,
            fraction: 0.0,
            speed: 1.0,
            tracks: Vec::new(),
        }
    }

    /// Returns the nominal duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Returns the timing curve.
    #[must_use]
    pub fn curve(&self) -> TimingCurve {
        self.curve
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> AnimatorState {
        self.state
    }

    /// Returns whether the animator is active and advancing.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Returns whether progress runs toward the start values.
    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    /// Sets the direction of progress.
    pub fn set_reversed(&mut self, reversed: bool) {
        self.reversed = reversed;
    }

    /// Returns the linear fraction complete in `0..=1`.
    #[must_use]
    pub fn fraction_complete(&self) -> f64 {
        self.fraction
    }

    /// Returns the recorded tracks.
    #[must_use]
    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Scrubs to `fraction` and applies the interpolated values.
    ///
    /// Values outside `0.0..=1.0` are clamped, so callers may pass raw drag
    /// progress. Only takes effect while the animator is
    /// [`Active`](AnimatorState::Active).
    pub fn set_fraction_complete(&mut self, store: &mut ViewStore, fraction: f64) {
        if self.state != AnimatorState::Active {
            return;
        }
        self.fraction = fraction.clamp(0.0, 1.0);
        self.apply(store);
    }

    /// Runs `animations` against `store`, capturing every animatable change
    /// as a track, and restores the starting values so the animator can
    /// drive them.
    ///
    /// # Panics
    ///
    /// Panics if called while another recording is in progress on `store`.
    pub fn add_animations(&mut self, store: &mut ViewStore, animations: impl FnOnce(&mut ViewStore)) {
        store.begin_recording();
        animations(store);
        let tracks = store.end_recording();
        for track in &tracks {
            if store.is_alive(track.view) {
                store.write_value(track.view, track.property, track.from);
            }
        }
        self.tracks.extend(tracks);
        if self.state == AnimatorState::Active {
            self.apply(store);
        }
    }

    /// Activates and starts running from the current fraction.
    pub fn start(&mut self, store: &mut ViewStore) {
        self.state = AnimatorState::Active;
        self.running = true;
        self.apply(store);
    }

    /// Activates (if needed) and stops advancing.
    pub fn pause(&mut self, store: &mut ViewStore) {
        if self.state == AnimatorState::Inactive {
            self.state = AnimatorState::Active;
            self.apply(store);
        }
        self.running = false;
    }

    /// Resumes advancing. The remaining time is `duration * duration_factor`
    /// scaled by how much is left to go.
    pub fn continue_animation(&mut self, duration_factor: f64) {
        if self.state != AnimatorState::Active {
            return;
        }
        self.speed = if duration_factor > 0.0 {
            1.0 / duration_factor
        } else {
            f64::INFINITY
        };
        self.running = true;
    }

    /// Advances by `dt`, returning where the animation ended if it finished.
    pub fn tick(&mut self, store: &mut ViewStore, dt: Duration) -> Option<AnimatingPosition> {
        if self.state != AnimatorState::Active || !self.running {
            return None;
        }
        let delta = if self.duration.is_zero() {
            f64::INFINITY
        } else {
            dt.as_secs_f64() / self.duration.as_secs_f64() * self.speed
        };
        if self.reversed {
            self.fraction = (self.fraction - delta).max(0.0);
        } else {
            self.fraction = (self.fraction + delta).min(1.0);
        }
        self.apply(store);

        let finished = if self.reversed {
            self.fraction <= 0.0
        } else {
            self.fraction >= 1.0
        };
        if !finished {
            return None;
        }
        self.state = AnimatorState::Inactive;
        self.running = false;
        self.speed = 1.0;
        Some(if self.reversed {
            AnimatingPosition::Start
        } else {
            AnimatingPosition::End
        })
    }

    /// Jumps to `position` and applies it; the animator stays active so the
    /// next [`tick`](Self::tick) completes it.
    pub fn snap_to(&mut self, store: &mut ViewStore, position: AnimatingPosition) {
        self.fraction = match position {
            AnimatingPosition::Start => 0.0,
            AnimatingPosition::End => 1.0,
        };
        self.apply(store);
    }

    /// Removes and returns the track for `property` of `view`, leaving the
    /// property at its current value.
    pub fn detach_track(&mut self, view: ViewId, property: AnimatableProperty) -> Option<Track> {
        let i = self
            .tracks
            .iter()
            .position(|t| t.view == view && t.property == property)?;
        Some(self.tracks.remove(i))
    }

    /// Re-adds a track detached with [`detach_track`](Self::detach_track).
    ///
    /// The property continues from its current value: toward the track's end
    /// value over the remaining progress, or back to its start value when
    /// reversed.
    pub fn reattach_track(&mut self, store: &mut ViewStore, mut track: Track) {
        if !store.is_alive(track.view) {
            return;
        }
        let current = store.value(track.view, track.property);
        let progress = self.eased_progress();
        if self.reversed {
            track.to = current;
            track.window = KeyframeWindow::new(0.0, progress);
        } else {
            track.from = current;
            track.window = KeyframeWindow::new(progress, 1.0 - progress);
        }
        self.tracks.push(track);
    }

    fn eased_progress(&self) -> f64 {
        if self.fraction >= 1.0 {
            1.0
        } else {
            self.curve.evaluate(self.fraction)
        }
    }

    fn apply(&self, store: &mut ViewStore) {
        let eased = self.eased_progress();
        for track in &self.tracks {
            if store.is_alive(track.view) {
                store.write_value(track.view, track.property, track.value_at(eased));
            }
        }
    }
}
