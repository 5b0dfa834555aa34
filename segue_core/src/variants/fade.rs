// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cross-fade of the foreground screen.

use crate::transition::{TransitionEngine, TransitionStyle};
use crate::view::ViewStore;

/// Fades the foreground screen in when presenting and out when dismissing.
#[derive(Clone, Copy, Debug, Default)]
pub struct FadeTransition;

impl TransitionStyle for FadeTransition {
    fn name(&self) -> &'static str {
        "fade"
    }

    fn animate(&mut self, engine: &mut TransitionEngine, _store: &mut ViewStore) {
        let front = engine.session_views().foreground;
        engine.add_dismiss_state_block(move |store| store.set_alpha(front, 0.0));
        engine.add_present_state_block(move |store| store.set_alpha(front, 1.0));
        engine.add_completion_block(move |store, _finished| {
            if store.is_alive(front) {
                store.set_alpha(front, 1.0);
            }
        });
    }
}
