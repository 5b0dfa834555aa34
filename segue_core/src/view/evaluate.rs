// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Frame evaluation and change tracking.
//!
//! Evaluation follows a drain-recompute pattern for each dirty channel:
//!
//! 1. **GEOMETRY**: Drain dirty indices, recompute each view's
//!    `world_transform` as `parent_world * local_matrix` and
//!    `effective_hidden` as `parent_effective_hidden || hidden`.
//! 2. **ALPHA**: Drain dirty indices, recompute `effective_alpha` as
//!    `parent_effective * alpha`.
//! 3. **STYLE** / **CONTENT**: Drain dirty indices (presenters read the
//!    current values directly from the store).
//! 4. **TOPOLOGY**: Drain and discard (the traversal order was already
//!    rebuilt at the start of evaluation if needed).

use super::id::INVALID;
use super::store::ViewStore;
use crate::dirty;
use crate::transform::Transform3d;

/// The set of changes produced by a single [`ViewStore::evaluate`] call.
///
/// Each field contains the raw slot indices of views that changed in the
/// corresponding category.
#[derive(Clone, Debug, Default)]
pub struct FrameChanges {
    /// Views whose world transform was recomputed.
    pub transforms: Vec<u32>,
    /// Views whose effective alpha was recomputed.
    pub alphas: Vec<u32>,
    /// Views whose corner radius, shadow, background or z-position changed.
    pub styles: Vec<u32>,
    /// Views whose surface content changed.
    pub content: Vec<u32>,
    /// Views that transitioned from visible to effectively hidden.
    pub hidden: Vec<u32>,
    /// Views that transitioned from effectively hidden to visible.
    pub unhidden: Vec<u32>,
    /// Views added since the last evaluate.
    pub added: Vec<u32>,
    /// Views removed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether the tree topology changed (traversal order was rebuilt).
    pub topology_changed: bool,
}

impl FrameChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.transforms.clear();
        self.alphas.clear();
        self.styles.clear();
        self.content.clear();
        self.hidden.clear();
        self.unhidden.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Returns whether nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
            && self.alphas.is_empty()
            && self.styles.is_empty()
            && self.content.is_empty()
            && self.hidden.is_empty()
            && self.unhidden.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}

impl ViewStore {
    /// Evaluates the view tree, recomputing dirty properties and returning
    /// the set of changes.
    pub fn evaluate(&mut self) -> FrameChanges {
        let mut changes = FrameChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer.
    pub fn evaluate_into(&mut self, changes: &mut FrameChanges) {
        changes.clear();

        if self.traversal_dirty {
            self.rebuild_traversal_order();
            changes.topology_changed = true;
            self.traversal_dirty = false;
        }

        let dirty_geometry: Vec<u32> = self
            .dirty
            .drain(dirty::GEOMETRY)
            .affected()
            .deterministic()
            .run()
            .collect();
        for &idx in &dirty_geometry {
            let parent_idx = self.parent[idx as usize];
            let parent_world = if parent_idx != INVALID {
                self.world_transform[parent_idx as usize]
            } else {
                Transform3d::IDENTITY
            };
            self.world_transform[idx as usize] = parent_world * self.local_matrix_at(idx);

            let parent_hidden = parent_idx != INVALID && self.effective_hidden[parent_idx as usize];
            let new_hidden = parent_hidden || self.props[idx as usize].hidden;
            if new_hidden != self.effective_hidden[idx as usize] {
                if new_hidden {
                    changes.hidden.push(idx);
                } else {
                    changes.unhidden.push(idx);
                }
                self.effective_hidden[idx as usize] = new_hidden;
            }
        }
        changes.transforms = dirty_geometry;

        let dirty_alphas: Vec<u32> = self
            .dirty
            .drain(dirty::ALPHA)
            .affected()
            .deterministic()
            .run()
            .collect();
        for &idx in &dirty_alphas {
            let parent_idx = self.parent[idx as usize];
            let parent_alpha = if parent_idx != INVALID {
                self.effective_alpha[parent_idx as usize]
            } else {
                1.0
            };
            self.effective_alpha[idx as usize] = parent_alpha * self.props[idx as usize].alpha;
        }
        changes.alphas = dirty_alphas;

        changes.styles = self.dirty.drain(dirty::STYLE).deterministic().run().collect();
        changes.content = self.dirty.drain(dirty::CONTENT).deterministic().run().collect();
        let _: Vec<u32> = self.dirty.drain(dirty::TOPOLOGY).deterministic().run().collect();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }

    /// Returns the current traversal order (depth-first pre-order).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called at least
    /// once.
    #[must_use]
    pub fn traversal_order(&self) -> &[u32] {
        &self.traversal_order
    }

    fn rebuild_traversal_order(&mut self) {
        self.traversal_order.clear();
        for idx in 0..self.len {
            if self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx) {
                self.dfs_collect(idx);
            }
        }
    }

    fn dfs_collect(&mut self, idx: u32) {
        self.traversal_order.push(idx);
        let mut child = self.first_child[idx as usize];
        while child != INVALID {
            self.dfs_collect(child);
            child = self.next_sibling[child as usize];
        }
    }
}
