//! Collision predicates for axis-aligned rectangles and circles
//!
//! Stateless geometry only. Degenerate shapes (zero or negative size)
//! never overlap anything.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle, (x, y) is the top-left corner in screen space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.x + self.w, self.y + self.h)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    /// True if the rectangle has positive, finite area
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.w > 0.0 && self.h > 0.0 && self.min().is_finite() && self.max().is_finite()
    }
}

/// A circle in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Rectangles overlap with non-zero area (touching edges do not count)
pub fn rect_overlap(a: &Rect, b: &Rect) -> bool {
    if !a.is_solid() || !b.is_solid() {
        return false;
    }
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Closest-point circle vs AABB test
///
/// The circle center is clamped to the rectangle bounds and the squared
/// distance to that point is compared against the squared radius.
pub fn circle_rect_overlap(circle: &Circle, rect: &Rect) -> bool {
    if !rect.is_solid() || !(circle.radius > 0.0) || !circle.center.is_finite() {
        return false;
    }
    let closest = circle.center.clamp(rect.min(), rect.max());
    circle.center.distance_squared(closest) < circle.radius * circle.radius
}
