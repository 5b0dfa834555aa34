// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tree traversal utilities.

use super::id::{INVALID, ViewId};
use super::store::ViewStore;

/// An iterator over the direct children of a view, back to front.
///
/// Created by [`ViewStore::children`].
#[derive(Debug)]
pub struct Children<'a> {
    store: &'a ViewStore,
    current: u32,
}

impl<'a> Children<'a> {
    pub(crate) fn new(store: &'a ViewStore, first: u32) -> Self {
        Self {
            store,
            current: first,
        }
    }
}

impl Iterator for Children<'_> {
    type Item = ViewId;

    fn next(&mut self) -> Option<ViewId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.store.next_sibling[idx as usize];
        Some(self.store.id_at(idx))
    }
}

/// An iterator over the strict ancestors of a view, nearest first.
///
/// Created by [`ViewStore::ancestors`].
#[derive(Debug)]
pub struct Ancestors<'a> {
    store: &'a ViewStore,
    current: u32,
}

impl<'a> Ancestors<'a> {
    pub(crate) fn new(store: &'a ViewStore, start: u32) -> Self {
        Self {
            store,
            current: store.parent[start as usize],
        }
    }
}

impl Iterator for Ancestors<'_> {
    type Item = ViewId;

    fn next(&mut self) -> Option<ViewId> {
        if self.current == INVALID {
            return None;
        }
        let idx = self.current;
        self.current = self.store.parent[idx as usize];
        Some(self.store.id_at(idx))
    }
}

impl ViewStore {
    /// Returns `root` and all of its descendants in depth-first pre-order.
    ///
    /// Parents always precede their children; siblings appear back to front.
    #[must_use]
    pub fn flattened(&self, root: ViewId) -> Vec<ViewId> {
        self.validate(root);
        let mut out = Vec::new();
        let mut stack = vec![root.idx];
        while let Some(idx) = stack.pop() {
            out.push(self.id_at(idx));
            let mut kids = Vec::new();
            let mut child = self.first_child[idx as usize];
            while child != INVALID {
                kids.push(child);
                child = self.next_sibling[child as usize];
            }
            stack.extend(kids.into_iter().rev());
        }
        out
    }
}
