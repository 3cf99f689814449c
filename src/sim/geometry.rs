//! Axis-aligned rectangle geometry for paddles and ball
//!
//! A `Rect` is owned by the entity that positions it. Its fields are private:
//! everything outside the owner sees it through a shared reference or a copy,
//! and the owner moves it only through the offset/clamp operations below.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// One of the two screen axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// The perpendicular axis
    #[inline]
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    /// Component of `v` along this axis
    #[inline]
    pub fn of(self, v: Vec2) -> f32 {
        match self {
            Axis::X => v.x,
            Axis::Y => v.y,
        }
    }

    /// Overwrite the component of `v` along this axis
    #[inline]
    pub fn set(self, v: &mut Vec2, value: f32) {
        match self {
            Axis::X => v.x = value,
            Axis::Y => v.y = value,
        }
    }

    /// Build a vector from a component along this axis and one across it
    #[inline]
    pub fn compose(self, along: f32, across: f32) -> Vec2 {
        match self {
            Axis::X => Vec2::new(along, across),
            Axis::Y => Vec2::new(across, along),
        }
    }
}

/// Axis-aligned rectangle in screen units (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
}

impl Rect {
    pub fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        debug_assert!(left <= right && top <= bottom, "inverted rect");
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, origin.x + size.x, origin.y + size.y)
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.left
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.top
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.right
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.bottom
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    /// Lower bound along an axis (left or top)
    #[inline]
    pub fn min(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.left,
            Axis::Y => self.top,
        }
    }

    /// Upper bound along an axis (right or bottom)
    #[inline]
    pub fn max(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.right,
            Axis::Y => self.bottom,
        }
    }

    #[inline]
    pub fn extent(&self, axis: Axis) -> f32 {
        self.max(axis) - self.min(axis)
    }

    #[inline]
    pub fn center_on(&self, axis: Axis) -> f32 {
        (self.min(axis) + self.max(axis)) * 0.5
    }

    /// Strict overlap test: rectangles that merely touch do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left < other.right
            && other.left < self.right
            && self.top < other.bottom
            && other.top < self.bottom
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left
            && point.x <= self.right
            && point.y >= self.top
            && point.y <= self.bottom
    }

    /// Translate by `delta`
    pub fn offset(&mut self, delta: Vec2) {
        self.left += delta.x;
        self.right += delta.x;
        self.top += delta.y;
        self.bottom += delta.y;
    }

    /// Translate along a single axis
    pub fn offset_along(&mut self, axis: Axis, delta: f32) {
        self.offset(axis.compose(delta, 0.0));
    }

    /// Move so the lower bound on `axis` sits at `value`, keeping the size
    pub fn move_min_to(&mut self, axis: Axis, value: f32) {
        let delta = value - self.min(axis);
        self.offset_along(axis, delta);
    }

    /// Move so the upper bound on `axis` sits at `value`, keeping the size
    pub fn move_max_to(&mut self, axis: Axis, value: f32) {
        let delta = value - self.max(axis);
        self.offset_along(axis, delta);
    }

    /// Move so the centre on `axis` sits at `value`
    pub fn center_at(&mut self, axis: Axis, value: f32) {
        let delta = value - self.center_on(axis);
        self.offset_along(axis, delta);
    }

    /// Move so the whole rect sits at `center`
    pub fn center_at_point(&mut self, center: Vec2) {
        self.offset(center - self.center());
    }

    /// Push the rect back inside `[lo, hi]` on `axis`. Returns true if it moved.
    ///
    /// A rect longer than the interval is pinned to `lo`.
    pub fn clamp_within(&mut self, axis: Axis, lo: f32, hi: f32) -> bool {
        if self.min(axis) < lo {
            self.move_min_to(axis, lo);
            true
        } else if self.max(axis) > hi {
            self.move_max_to(axis, hi);
            if self.min(axis) < lo {
                self.move_min_to(axis, lo);
            }
            true
        } else {
            false
        }
    }
}
