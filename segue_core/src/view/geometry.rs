// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Coordinate conversion between views.
//!
//! A view's local matrix maps its bounds space (origin at the top-left of the
//! bounds) into its parent's space: translate to the center, apply the
//! transform about the center, then offset by half the size. These helpers
//! walk the ancestry directly and do not depend on
//! [`evaluate`](ViewStore::evaluate) having run.

use kurbo::{Point, Rect};

use super::id::{INVALID, ViewId};
use super::store::ViewStore;
use crate::transform::Transform3d;

impl ViewStore {
    pub(crate) fn local_matrix_at(&self, idx: u32) -> Transform3d {
        let p = &self.props[idx as usize];
        Transform3d::from_translation(p.center.x, p.center.y, 0.0)
            * p.transform
            * Transform3d::from_translation(-p.size.width / 2.0, -p.size.height / 2.0, 0.0)
    }

    /// Returns the matrix mapping `id`'s bounds space to root space.
    #[must_use]
    pub fn to_root_matrix(&self, id: ViewId) -> Transform3d {
        self.validate(id);
        let mut m = self.local_matrix_at(id.idx);
        let mut p = self.parent[id.idx as usize];
        while p != INVALID {
            m = self.local_matrix_at(p) * m;
            p = self.parent[p as usize];
        }
        m
    }

    /// Returns the matrix mapping `id`'s bounds space to the space of the
    /// root's own bounds (the window), excluding the root's local matrix.
    fn to_window_matrix(&self, id: ViewId) -> Transform3d {
        let root = self.root_of(id);
        let root_inv = self
            .local_matrix_at(root.idx)
            .inverse()
            .unwrap_or(Transform3d::IDENTITY);
        root_inv * self.to_root_matrix(id)
    }

    /// Converts `point` from `from`'s bounds space into `to`'s bounds space.
    ///
    /// Both views must share a root. A singular target transform leaves the
    /// point in window space.
    #[must_use]
    pub fn convert_point(&self, point: Point, from: ViewId, to: ViewId) -> Point {
        let window = self.to_window_matrix(from).transform_point(point);
        match self.to_window_matrix(to).inverse() {
            Some(inv) => inv.transform_point(window),
            None => window,
        }
    }

    /// Converts `rect` from `from`'s bounds space into `to`'s bounds space,
    /// returning the bounding box of the mapped corners.
    #[must_use]
    pub fn convert_rect(&self, rect: Rect, from: ViewId, to: ViewId) -> Rect {
        let corners = [
            Point::new(rect.x0, rect.y0),
            Point::new(rect.x1, rect.y0),
            Point::new(rect.x0, rect.y1),
            Point::new(rect.x1, rect.y1),
        ]
        .map(|c| self.convert_point(c, from, to));
        corners[1..]
            .iter()
            .fold(Rect::from_points(corners[0], corners[0]), |acc, &p| acc.union_pt(p))
    }

    /// Returns the frame of `id` in its parent's space, accounting for its
    /// transform. Parentless views report the untransformed frame.
    #[must_use]
    pub fn frame(&self, id: ViewId) -> Rect {
        match self.parent(id) {
            Some(parent) => self.convert_rect(self.bounds(id), id, parent),
            None => self.frame_without_transform(id),
        }
    }

    /// Returns the center of `id` in window space.
    #[must_use]
    pub fn window_position(&self, id: ViewId) -> Point {
        self.to_window_matrix(id)
            .transform_point(self.bounds(id).center())
    }

    /// Returns the product of the transforms of `id` and its ancestors below
    /// the window, with the planar translation removed.
    #[must_use]
    pub fn window_transform(&self, id: ViewId) -> Transform3d {
        self.validate(id);
        let mut transform = self.props[id.idx as usize].transform;
        let mut p = self.parent[id.idx as usize];
        while p != INVALID && self.parent[p as usize] != INVALID {
            transform = transform.then(self.props[p as usize].transform);
            p = self.parent[p as usize];
        }
        transform.without_planar_translation()
    }

    /// Moves `id` so that its center lands on `position` in window space.
    pub fn set_window_position(&mut self, id: ViewId, position: Point) {
        let center = match self.parent(id) {
            Some(parent) => {
                let window = self.root_of(id);
                self.convert_point(position, window, parent)
            }
            None => position,
        };
        self.set_center(id, center);
    }

    /// Sets the transform of `id` so that its accumulated window transform
    /// equals `transform`.
    pub fn set_window_transform(&mut self, id: ViewId, transform: Transform3d) {
        let local = match self.parent(id) {
            Some(parent) => {
                let parent_inv = self
                    .window_transform(parent)
                    .inverse()
                    .unwrap_or(Transform3d::IDENTITY);
                transform.then(parent_inv)
            }
            None => transform,
        };
        self.set_transform(id, local);
    }
}
