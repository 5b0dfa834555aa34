// Copyright 2026 the Segue Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays view storage with allocation, topology, and property management.

use kurbo::{Point, Rect, Size, Vec2};
use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::id::{INVALID, SurfaceId, ViewId};
use super::scroll::ScrollState;
use super::traverse::{Ancestors, Children};
use crate::animator::{AnimatableProperty, KeyframeWindow, PropertyValue, Recorder, Track};
use crate::color::Color;
use crate::dirty;
use crate::modifier::HeroModifier;
use crate::transform::Transform3d;

/// Drop shadow parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shadow {
    /// Shadow color.
    pub color: Color,
    /// Shadow opacity in `0..=1`.
    pub opacity: f64,
    /// Blur radius.
    pub radius: f64,
    /// Offset of the shadow from the view.
    pub offset: Vec2,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            opacity: 0.0,
            radius: 3.0,
            offset: Vec2::new(0.0, -3.0),
        }
    }
}

/// Which corners a view's corner radius applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CornerMask {
    /// Top-left corner.
    pub top_left: bool,
    /// Top-right corner.
    pub top_right: bool,
    /// Bottom-left corner.
    pub bottom_left: bool,
    /// Bottom-right corner.
    pub bottom_right: bool,
}

impl CornerMask {
    /// All four corners.
    pub const ALL: Self = Self {
        top_left: true,
        top_right: true,
        bottom_left: true,
        bottom_right: true,
    };

    /// The two top corners.
    pub const TOP: Self = Self {
        top_left: true,
        top_right: true,
        bottom_left: false,
        bottom_right: false,
    };
}

impl Default for CornerMask {
    fn default() -> Self {
        Self::ALL
    }
}

/// How a view's surface content is fitted into its bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ContentMode {
    /// Stretch to fill the bounds.
    #[default]
    ScaleToFill,
    /// Preserve aspect ratio and fill the bounds, cropping overflow.
    AspectFill,
}

/// Local properties of a single view.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct ViewProps {
    pub(crate) center: Point,
    pub(crate) size: Size,
    pub(crate) transform: Transform3d,
    pub(crate) alpha: f64,
    pub(crate) hidden: bool,
    pub(crate) corner_radius: f64,
    pub(crate) masked_corners: CornerMask,
    pub(crate) clips_to_bounds: bool,
    pub(crate) shadow: Shadow,
    pub(crate) background_color: Option<Color>,
    pub(crate) z_position: f64,
    pub(crate) content: Option<SurfaceId>,
    pub(crate) content_mode: ContentMode,
    pub(crate) user_interaction_enabled: bool,
    pub(crate) is_overlay: bool,
}

impl Default for ViewProps {
    fn default() -> Self {
        Self {
            center: Point::ORIGIN,
            size: Size::ZERO,
            transform: Transform3d::IDENTITY,
            alpha: 1.0,
            hidden: false,
            corner_radius: 0.0,
            masked_corners: CornerMask::ALL,
            clips_to_bounds: false,
            shadow: Shadow::default(),
            background_color: None,
            z_position: 0.0,
            content: None,
            content_mode: ContentMode::ScaleToFill,
            user_interaction_enabled: true,
            is_overlay: false,
        }
    }
}

/// Transition metadata attached to a view by the application.
#[derive(Clone, Debug, Default)]
pub(crate) struct HeroAttachment {
    pub(crate) ids: Vec<String>,
    pub(crate) modifiers: Vec<HeroModifier>,
}

/// Struct-of-arrays storage for all views.
///
/// Views are addressed by [`ViewId`] handles. Each view occupies a slot in
/// parallel arrays; destroyed views are recycled via a free list, and
/// generation counters prevent stale handle access.
///
/// While an animation is being recorded (see
/// [`Animator::add_animations`](crate::animator::Animator::add_animations)),
/// every animatable setter also captures a [`Track`] from the old to the new
/// value.
#[derive(Debug)]
pub struct ViewStore {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Local properties (set by callers) --
    pub(crate) props: Vec<ViewProps>,
    pub(crate) hero: Vec<HeroAttachment>,
    pub(crate) scroll: Vec<Option<ScrollState>>,

    // -- Computed properties (written by evaluate) --
    pub(crate) world_transform: Vec<Transform3d>,
    pub(crate) effective_alpha: Vec<f64>,
    pub(crate) effective_hidden: Vec<bool>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Traversal cache --
    pub(crate) traversal_order: Vec<u32>,
    pub(crate) traversal_dirty: bool,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,

    // -- Animation capture --
    pub(crate) recorder: Option<Recorder>,
}

impl Default for ViewStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewStore {
    /// Creates an empty view store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            props: Vec::new(),
            hero: Vec::new(),
            scroll: Vec::new(),
            world_transform: Vec::new(),
            effective_alpha: Vec::new(),
            effective_hidden: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            traversal_order: Vec::new(),
            traversal_dirty: true,
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
            recorder: None,
        }
    }

    // -- Allocation API --

    /// Creates a new view and returns its handle.
    ///
    /// The view starts at the origin with zero size, identity transform,
    /// full alpha, no content, and no parent.
    pub fn create_view(&mut self) -> ViewId {
        let idx = if let Some(idx) = self.free_list.pop() {
            // Reuse a freed slot.
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.props[i] = ViewProps::default();
            self.hero[i] = HeroAttachment::default();
            self.scroll[i] = None;
            self.world_transform[i] = Transform3d::IDENTITY;
            self.effective_alpha[i] = 1.0;
            self.effective_hidden[i] = false;
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.props.push(ViewProps::default());
            self.hero.push(HeroAttachment::default());
            self.scroll.push(None);
            self.world_transform.push(Transform3d::IDENTITY);
            self.effective_alpha.push(1.0);
            self.effective_hidden.push(false);
            self.generation.push(0);
            idx
        };

        self.traversal_dirty = true;
        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
        self.dirty.mark_with(idx, dirty::GEOMETRY, &EagerPolicy);

        self.id_at(idx)
    }

    /// Creates a view with the given frame (center and size derived from
    /// `frame`, identity transform).
    pub fn create_view_with_frame(&mut self, frame: Rect) -> ViewId {
        let id = self.create_view();
        self.set_frame_without_transform(id, frame);
        id
    }

    /// Destroys a view, freeing its slot for reuse.
    ///
    /// # Panics
    ///
    /// Panics if the view has children (remove them first) or if the handle
    /// is stale.
    pub fn destroy_view(&mut self, id: ViewId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy view with children"
        );

        if self.parent[idx as usize] != INVALID {
            self.unlink_from_parent(idx);
        }

        self.dirty.remove_key(idx);
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        self.traversal_dirty = true;
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Destroys a view together with every descendant.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_subtree(&mut self, id: ViewId) {
        let views = self.flattened(id);
        self.detach(id);
        // Reverse pre-order visits every descendant before its ancestors.
        for &view in views.iter().rev() {
            self.destroy_view(view);
        }
    }

    /// Returns whether the given handle refers to a live view.
    #[must_use]
    pub fn is_alive(&self, id: ViewId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    // -- Topology API --

    /// Adds `child` as the frontmost child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    pub fn add_child(&mut self, parent: ViewId, child: ViewId) {
        self.validate(parent);
        self.validate(child);
        assert!(
            self.parent[child.idx as usize] == INVALID,
            "child already has a parent"
        );
        self.link_last(parent.idx, child.idx);
    }

    /// Removes `child` from its current parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale or the view has no parent.
    pub fn remove_from_parent(&mut self, child: ViewId) {
        self.validate(child);
        let c = child.idx;
        assert!(self.parent[c as usize] != INVALID, "view has no parent");

        let p = self.parent[c as usize];
        self.unlink_from_parent(c);
        self.dirty.remove_dependency(c, p, dirty::GEOMETRY);
        self.dirty.remove_dependency(c, p, dirty::ALPHA);

        self.mark_subtree_inherited_dirty(c);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Moves `child` to be the frontmost child of `new_parent`.
    ///
    /// If `child` already has a parent, it is removed first.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale.
    pub fn reparent(&mut self, child: ViewId, new_parent: ViewId) {
        self.validate(child);
        self.validate(new_parent);
        self.detach(child);
        self.link_last(new_parent.idx, child.idx);
    }

    /// Removes `child` from its parent if it has one.
    pub fn detach(&mut self, child: ViewId) {
        if self.parent(child).is_some() {
            self.remove_from_parent(child);
        }
    }

    /// Inserts `child` directly behind `sibling` in the sibling list.
    ///
    /// `child` is detached from any current parent first.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale or `sibling` has no parent.
    pub fn insert_before(&mut self, child: ViewId, sibling: ViewId) {
        self.validate(child);
        self.validate(sibling);
        self.detach(child);
        let c = child.idx;
        let s = sibling.idx;
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");

        self.parent[c as usize] = p;
        self.next_sibling[c as usize] = s;
        self.prev_sibling[c as usize] = self.prev_sibling[s as usize];

        if self.prev_sibling[s as usize] != INVALID {
            self.next_sibling[self.prev_sibling[s as usize] as usize] = c;
        } else {
            self.first_child[p as usize] = c;
        }
        self.prev_sibling[s as usize] = c;

        self.link_dependencies(c, p);
    }

    /// Inserts `child` directly in front of `sibling` in the sibling list.
    ///
    /// `child` is detached from any current parent first.
    ///
    /// # Panics
    ///
    /// Panics if handles are stale or `sibling` has no parent.
    pub fn insert_after(&mut self, child: ViewId, sibling: ViewId) {
        self.validate(child);
        self.validate(sibling);
        self.detach(child);
        let c = child.idx;
        let s = sibling.idx;
        let p = self.parent[s as usize];
        assert!(p != INVALID, "sibling has no parent");

        let next = self.next_sibling[s as usize];
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = s;
        self.next_sibling[c as usize] = next;
        if next != INVALID {
            self.prev_sibling[next as usize] = c;
        }
        self.next_sibling[s as usize] = c;

        self.link_dependencies(c, p);
    }

    /// Returns the parent of a view, if any.
    #[must_use]
    pub fn parent(&self, id: ViewId) -> Option<ViewId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.id_at(p))
    }

    /// Returns an iterator over the direct children of a view.
    #[must_use]
    pub fn children(&self, id: ViewId) -> Children<'_> {
        self.validate(id);
        Children::new(self, self.first_child[id.idx as usize])
    }

    /// Returns an iterator over the strict ancestors of a view.
    #[must_use]
    pub fn ancestors(&self, id: ViewId) -> Ancestors<'_> {
        self.validate(id);
        Ancestors::new(self, id.idx)
    }

    /// Returns the root of the tree containing `id` (the window).
    #[must_use]
    pub fn root_of(&self, id: ViewId) -> ViewId {
        self.ancestors(id).last().unwrap_or(id)
    }

    /// Returns whether `ancestor` is `id` or one of its ancestors.
    #[must_use]
    pub fn is_descendant_of(&self, id: ViewId, ancestor: ViewId) -> bool {
        id == ancestor || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Returns the handles of root views (those with no parent).
    #[must_use]
    pub fn roots(&self) -> Vec<ViewId> {
        (0..self.len)
            .filter(|&idx| self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx))
            .map(|idx| self.id_at(idx))
            .collect()
    }

    // -- Property getters (read-only, no dirty marking) --

    /// Returns the center of the view in its parent's coordinate space.
    #[must_use]
    pub fn center(&self, id: ViewId) -> Point {
        self.props(id).center
    }

    /// Returns the bounds size of the view.
    #[must_use]
    pub fn size(&self, id: ViewId) -> Size {
        self.props(id).size
    }

    /// Returns the view's bounds: its size at the local origin.
    #[must_use]
    pub fn bounds(&self, id: ViewId) -> Rect {
        self.props(id).size.to_rect()
    }

    /// Returns the frame the view would have with an identity transform.
    #[must_use]
    pub fn frame_without_transform(&self, id: ViewId) -> Rect {
        let p = self.props(id);
        Rect::from_center_size(p.center, p.size)
    }

    /// Returns the local transform (applied about the view's center).
    #[must_use]
    pub fn transform(&self, id: ViewId) -> Transform3d {
        self.props(id).transform
    }

    /// Returns the local alpha.
    #[must_use]
    pub fn alpha(&self, id: ViewId) -> f64 {
        self.props(id).alpha
    }

    /// Returns whether the view's own hidden flag is set.
    #[must_use]
    pub fn is_hidden(&self, id: ViewId) -> bool {
        self.props(id).hidden
    }

    /// Returns the corner radius.
    #[must_use]
    pub fn corner_radius(&self, id: ViewId) -> f64 {
        self.props(id).corner_radius
    }

    /// Returns which corners are rounded.
    #[must_use]
    pub fn masked_corners(&self, id: ViewId) -> CornerMask {
        self.props(id).masked_corners
    }

    /// Returns whether the view clips its children to its bounds.
    #[must_use]
    pub fn clips_to_bounds(&self, id: ViewId) -> bool {
        self.props(id).clips_to_bounds
    }

    /// Returns the drop shadow parameters.
    #[must_use]
    pub fn shadow(&self, id: ViewId) -> Shadow {
        self.props(id).shadow
    }

    /// Returns the background color.
    #[must_use]
    pub fn background_color(&self, id: ViewId) -> Option<Color> {
        self.props(id).background_color
    }

    /// Returns the z-position.
    #[must_use]
    pub fn z_position(&self, id: ViewId) -> f64 {
        self.props(id).z_position
    }

    /// Returns the surface content.
    #[must_use]
    pub fn content(&self, id: ViewId) -> Option<SurfaceId> {
        self.props(id).content
    }

    /// Returns the content mode.
    #[must_use]
    pub fn content_mode(&self, id: ViewId) -> ContentMode {
        self.props(id).content_mode
    }

    /// Returns whether the view receives user interaction.
    #[must_use]
    pub fn user_interaction_enabled(&self, id: ViewId) -> bool {
        self.props(id).user_interaction_enabled
    }

    /// Returns whether the view is a transition overlay.
    #[must_use]
    pub fn is_overlay(&self, id: ViewId) -> bool {
        self.props(id).is_overlay
    }

    /// Returns the hero identifiers attached to the view.
    #[must_use]
    pub fn hero_ids(&self, id: ViewId) -> &[String] {
        self.validate(id);
        &self.hero[id.idx as usize].ids
    }

    /// Returns the modifiers attached to the view.
    #[must_use]
    pub fn hero_modifiers(&self, id: ViewId) -> &[HeroModifier] {
        self.validate(id);
        &self.hero[id.idx as usize].modifiers
    }

    /// Returns the computed world transform.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn world_transform(&self, id: ViewId) -> Transform3d {
        self.validate(id);
        self.world_transform[id.idx as usize]
    }

    /// Returns the computed effective alpha.
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn effective_alpha(&self, id: ViewId) -> f64 {
        self.validate(id);
        self.effective_alpha[id.idx as usize]
    }

    /// Returns whether the view is effectively hidden (including by an
    /// ancestor's hidden flag).
    ///
    /// Only valid after [`evaluate`](Self::evaluate) has been called.
    #[must_use]
    pub fn effective_hidden(&self, id: ViewId) -> bool {
        self.validate(id);
        self.effective_hidden[id.idx as usize]
    }

    // -- Mutation API (auto-marks dirty, records while capturing) --

    /// Sets the center in the parent's coordinate space.
    pub fn set_center(&mut self, id: ViewId, center: Point) {
        let old = self.props(id).center;
        self.record(id, AnimatableProperty::Center, PropertyValue::Point(old), PropertyValue::Point(center));
        self.props[id.idx as usize].center = center;
        self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
        self.sync_overlay_geometry(id);
    }

    /// Sets the bounds size. Overlay children follow the new size.
    pub fn set_size(&mut self, id: ViewId, size: Size) {
        let old = self.props(id).size;
        self.record(id, AnimatableProperty::Size, PropertyValue::Size(old), PropertyValue::Size(size));
        self.props[id.idx as usize].size = size;
        self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
        self.sync_overlay_geometry(id);
    }

    /// Sets center and size from a frame, ignoring the current transform.
    pub fn set_frame_without_transform(&mut self, id: ViewId, frame: Rect) {
        self.set_size(id, frame.size());
        self.set_center(id, frame.center());
    }

    /// Sets the local transform.
    pub fn set_transform(&mut self, id: ViewId, transform: Transform3d) {
        let old = self.props(id).transform;
        self.record(
            id,
            AnimatableProperty::Transform,
            PropertyValue::Transform(old),
            PropertyValue::Transform(transform),
        );
        self.props[id.idx as usize].transform = transform;
        self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
    }

    /// Sets the local alpha.
    pub fn set_alpha(&mut self, id: ViewId, alpha: f64) {
        let old = self.props(id).alpha;
        self.record(id, AnimatableProperty::Alpha, PropertyValue::Scalar(old), PropertyValue::Scalar(alpha));
        self.props[id.idx as usize].alpha = alpha;
        self.dirty.mark_with(id.idx, dirty::ALPHA, &EagerPolicy);
    }

    /// Sets the view's own hidden flag.
    pub fn set_hidden(&mut self, id: ViewId, hidden: bool) {
        self.validate(id);
        self.props[id.idx as usize].hidden = hidden;
        self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
    }

    /// Sets the corner radius.
    pub fn set_corner_radius(&mut self, id: ViewId, radius: f64) {
        let old = self.props(id).corner_radius;
        self.record(
            id,
            AnimatableProperty::CornerRadius,
            PropertyValue::Scalar(old),
            PropertyValue::Scalar(radius),
        );
        self.props[id.idx as usize].corner_radius = radius;
        self.dirty.mark(id.idx, dirty::STYLE);
    }

    /// Sets which corners are rounded.
    pub fn set_masked_corners(&mut self, id: ViewId, mask: CornerMask) {
        self.validate(id);
        self.props[id.idx as usize].masked_corners = mask;
        self.dirty.mark(id.idx, dirty::STYLE);
    }

    /// Sets whether the view clips its children.
    pub fn set_clips_to_bounds(&mut self, id: ViewId, clips: bool) {
        self.validate(id);
        self.props[id.idx as usize].clips_to_bounds = clips;
        self.dirty.mark(id.idx, dirty::STYLE);
    }

    /// Sets the shadow opacity.
    pub fn set_shadow_opacity(&mut self, id: ViewId, opacity: f64) {
        let old = self.props(id).shadow.opacity;
        self.record(
            id,
            AnimatableProperty::ShadowOpacity,
            PropertyValue::Scalar(old),
            PropertyValue::Scalar(opacity),
        );
        self.props[id.idx as usize].shadow.opacity = opacity;
        self.dirty.mark(id.idx, dirty::STYLE);
    }

    /// Sets the shadow blur radius.
    pub fn set_shadow_radius(&mut self, id: ViewId, radius: f64) {
        let old = self.props(id).shadow.radius;
        self.record(
            id,
            AnimatableProperty::ShadowRadius,
            PropertyValue::Scalar(old),
            PropertyValue::Scalar(radius),
        );
        self.props[id.idx as usize].shadow.radius = radius;
        self.dirty.mark(id.idx, dirty::STYLE);
    }

    /// Sets the shadow color.
    pub fn set_shadow_color(&mut self, id: ViewId, color: Color) {
        self.validate(id);
        self.props[id.idx as usize].shadow.color = color;
        self.dirty.mark(id.idx, dirty::STYLE);
    }

    /// Sets the shadow offset.
    pub fn set_shadow_offset(&mut self, id: ViewId, offset: Vec2) {
        self.validate(id);
        self.props[id.idx as usize].shadow.offset = offset;
        self.dirty.mark(id.idx, dirty::STYLE);
    }

    /// Sets the background color.
    pub fn set_background_color(&mut self, id: ViewId, color: Option<Color>) {
        let old = self.props(id).background_color;
        self.record(
            id,
            AnimatableProperty::BackgroundColor,
            PropertyValue::Color(old),
            PropertyValue::Color(color),
        );
        self.props[id.idx as usize].background_color = color;
        self.dirty.mark(id.idx, dirty::STYLE);
    }

    /// Sets the z-position.
    pub fn set_z_position(&mut self, id: ViewId, z: f64) {
        let old = self.props(id).z_position;
        self.record(id, AnimatableProperty::ZPosition, PropertyValue::Scalar(old), PropertyValue::Scalar(z));
        self.props[id.idx as usize].z_position = z;
        self.dirty.mark(id.idx, dirty::STYLE);
    }

    /// Sets the surface content.
    pub fn set_content(&mut self, id: ViewId, content: Option<SurfaceId>) {
        self.validate(id);
        self.props[id.idx as usize].content = content;
        self.dirty.mark(id.idx, dirty::CONTENT);
    }

    /// Sets the content mode.
    pub fn set_content_mode(&mut self, id: ViewId, mode: ContentMode) {
        self.validate(id);
        self.props[id.idx as usize].content_mode = mode;
        self.dirty.mark(id.idx, dirty::CONTENT);
    }

    /// Enables or disables user interaction.
    pub fn set_user_interaction_enabled(&mut self, id: ViewId, enabled: bool) {
        self.validate(id);
        self.props[id.idx as usize].user_interaction_enabled = enabled;
    }

    /// Attaches hero identifiers. The first identifier with a counterpart on
    /// the other screen wins during matching.
    pub fn set_hero_ids<I, S>(&mut self, id: ViewId, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.validate(id);
        self.hero[id.idx as usize].ids = ids.into_iter().map(Into::into).collect();
    }

    /// Attaches the ordered list of modifiers to apply to the view.
    pub fn set_hero_modifiers(&mut self, id: ViewId, modifiers: Vec<HeroModifier>) {
        self.validate(id);
        self.hero[id.idx as usize].modifiers = modifiers;
    }

    // -- Overlays --

    /// Returns the transition overlay attached to `id`, if any.
    #[must_use]
    pub fn overlay(&self, id: ViewId) -> Option<ViewId> {
        self.children(id).filter(|&c| self.props(c).is_overlay).last()
    }

    /// Returns the overlay attached to `id`, creating a clear one covering
    /// the bounds if none exists.
    pub fn ensure_overlay(&mut self, id: ViewId) -> ViewId {
        if let Some(existing) = self.overlay(id) {
            return existing;
        }
        let overlay = self.create_view_with_frame(self.bounds(id));
        self.props[overlay.idx as usize].is_overlay = true;
        self.props[overlay.idx as usize].background_color = Some(Color::CLEAR);
        self.props[overlay.idx as usize].z_position = 1000.0;
        self.props[overlay.idx as usize].user_interaction_enabled = false;
        self.add_child(id, overlay);
        overlay
    }

    /// Destroys the overlay attached to `id`, if any.
    pub fn remove_overlay(&mut self, id: ViewId) {
        if let Some(overlay) = self.overlay(id) {
            self.destroy_subtree(overlay);
        }
    }

    // -- Raw-index accessors for presenters --
    //
    // These accept raw slot indices (as found in `FrameChanges`) rather than
    // `ViewId` handles, skipping generation validation.

    /// Returns the computed world transform at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn world_transform_at(&self, idx: u32) -> Transform3d {
        assert!(idx < self.len, "slot index {idx} out of range (len {})", self.len);
        self.world_transform[idx as usize]
    }

    /// Returns the computed effective alpha at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn effective_alpha_at(&self, idx: u32) -> f64 {
        assert!(idx < self.len, "slot index {idx} out of range (len {})", self.len);
        self.effective_alpha[idx as usize]
    }

    /// Returns whether the view at raw slot `idx` is effectively hidden.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn effective_hidden_at(&self, idx: u32) -> bool {
        assert!(idx < self.len, "slot index {idx} out of range (len {})", self.len);
        self.effective_hidden[idx as usize]
    }

    /// Returns the surface content at raw slot `idx`.
    ///
    /// # Panics
    ///
    /// Panics if `idx >= self.len`.
    #[must_use]
    pub fn content_at(&self, idx: u32) -> Option<SurfaceId> {
        assert!(idx < self.len, "slot index {idx} out of range (len {})", self.len);
        self.props[idx as usize].content
    }

    // -- Animation capture --

    /// Runs `f` with subsequent changes attributed to the keyframe window
    /// `[relative_start, relative_start + relative_duration]` of the
    /// animation being recorded.
    ///
    /// Outside of recording, `f` simply runs.
    pub fn animate_keyframe(
        &mut self,
        relative_start: f64,
        relative_duration: f64,
        f: impl FnOnce(&mut Self),
    ) {
        let previous = self
            .recorder
            .as_mut()
            .map(|r| r.set_window(KeyframeWindow::new(relative_start, relative_duration)));
        f(self);
        if let (Some(recorder), Some(previous)) = (self.recorder.as_mut(), previous) {
            recorder.set_window(previous);
        }
    }

    pub(crate) fn begin_recording(&mut self) {
        debug_assert!(self.recorder.is_none(), "recording is not reentrant");
        self.recorder = Some(Recorder::default());
    }

    pub(crate) fn end_recording(&mut self) -> Vec<Track> {
        self.recorder.take().map(Recorder::finish).unwrap_or_default()
    }

    /// Reads the current value of an animatable property.
    #[must_use]
    pub fn value(&self, id: ViewId, property: AnimatableProperty) -> PropertyValue {
        let p = self.props(id);
        match property {
            AnimatableProperty::Center => PropertyValue::Point(p.center),
            AnimatableProperty::Size => PropertyValue::Size(p.size),
            AnimatableProperty::Transform => PropertyValue::Transform(p.transform),
            AnimatableProperty::Alpha => PropertyValue::Scalar(p.alpha),
            AnimatableProperty::CornerRadius => PropertyValue::Scalar(p.corner_radius),
            AnimatableProperty::ShadowOpacity => PropertyValue::Scalar(p.shadow.opacity),
            AnimatableProperty::ShadowRadius => PropertyValue::Scalar(p.shadow.radius),
            AnimatableProperty::ZPosition => PropertyValue::Scalar(p.z_position),
            AnimatableProperty::BackgroundColor => PropertyValue::Color(p.background_color),
        }
    }

    /// Writes an animated value without recording it.
    pub(crate) fn write_value(&mut self, id: ViewId, property: AnimatableProperty, value: PropertyValue) {
        self.validate(id);
        let i = id.idx as usize;
        match (property, value) {
            (AnimatableProperty::Center, PropertyValue::Point(v)) => {
                self.props[i].center = v;
                self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
            }
            (AnimatableProperty::Size, PropertyValue::Size(v)) => {
                self.props[i].size = v;
                self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
                self.sync_overlay_geometry(id);
            }
            (AnimatableProperty::Transform, PropertyValue::Transform(v)) => {
                self.props[i].transform = v;
                self.dirty.mark_with(id.idx, dirty::GEOMETRY, &EagerPolicy);
            }
            (AnimatableProperty::Alpha, PropertyValue::Scalar(v)) => {
                self.props[i].alpha = v;
                self.dirty.mark_with(id.idx, dirty::ALPHA, &EagerPolicy);
            }
            (AnimatableProperty::CornerRadius, PropertyValue::Scalar(v)) => {
                self.props[i].corner_radius = v;
                self.dirty.mark(id.idx, dirty::STYLE);
            }
            (AnimatableProperty::ShadowOpacity, PropertyValue::Scalar(v)) => {
                self.props[i].shadow.opacity = v;
                self.dirty.mark(id.idx, dirty::STYLE);
            }
            (AnimatableProperty::ShadowRadius, PropertyValue::Scalar(v)) => {
                self.props[i].shadow.radius = v;
                self.dirty.mark(id.idx, dirty::STYLE);
            }
            (AnimatableProperty::ZPosition, PropertyValue::Scalar(v)) => {
                self.props[i].z_position = v;
                self.dirty.mark(id.idx, dirty::STYLE);
            }
            (AnimatableProperty::BackgroundColor, PropertyValue::Color(v)) => {
                self.props[i].background_color = v;
                self.dirty.mark(id.idx, dirty::STYLE);
            }
            (property, value) => {
                debug_assert!(false, "value {value:?} does not fit property {property:?}");
            }
        }
    }

    // -- Internal helpers --

    #[inline]
    pub(crate) fn id_at(&self, idx: u32) -> ViewId {
        ViewId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    #[inline]
    pub(crate) fn props(&self, id: ViewId) -> &ViewProps {
        self.validate(id);
        &self.props[id.idx as usize]
    }

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: ViewId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale ViewId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    fn record(&mut self, id: ViewId, property: AnimatableProperty, from: PropertyValue, to: PropertyValue) {
        if let Some(recorder) = self.recorder.as_mut() {
            recorder.record(id, property, from, to);
        }
    }

    /// Keeps an overlay child covering its parent's bounds.
    fn sync_overlay_geometry(&mut self, id: ViewId) {
        if self.props[id.idx as usize].is_overlay {
            return;
        }
        if let Some(overlay) = self.overlay(id) {
            let bounds = self.bounds(id);
            let i = overlay.idx as usize;
            self.props[i].size = bounds.size();
            self.props[i].center = bounds.center();
            self.dirty.mark_with(overlay.idx, dirty::GEOMETRY, &EagerPolicy);
        }
    }

    fn link_last(&mut self, p: u32, c: u32) {
        self.parent[c as usize] = p;
        self.prev_sibling[c as usize] = INVALID;
        self.next_sibling[c as usize] = INVALID;

        if self.first_child[p as usize] == INVALID {
            self.first_child[p as usize] = c;
        } else {
            let mut last = self.first_child[p as usize];
            while self.next_sibling[last as usize] != INVALID {
                last = self.next_sibling[last as usize];
            }
            self.next_sibling[last as usize] = c;
            self.prev_sibling[c as usize] = last;
        }

        self.link_dependencies(c, p);
    }

    fn link_dependencies(&mut self, c: u32, p: u32) {
        let _ = self.dirty.add_dependency(c, p, dirty::GEOMETRY);
        let _ = self.dirty.add_dependency(c, p, dirty::ALPHA);

        self.mark_subtree_inherited_dirty(c);
        self.traversal_dirty = true;
        self.dirty.mark(p, dirty::TOPOLOGY);
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }

    /// Marks the subtree rooted at `idx` dirty for inherited channels.
    fn mark_subtree_inherited_dirty(&mut self, idx: u32) {
        self.dirty.mark_with(idx, dirty::GEOMETRY, &EagerPolicy);
        self.dirty.mark_with(idx, dirty::ALPHA, &EagerPolicy);
    }
}
