//! Axis-aligned overlap tests
//!
//! Every pairwise check in the game (projectile vs ship, projectile vs mote,
//! ship vs ship, pickup vs ship) goes through `overlaps`. Rectangles that only
//! share an edge do not collide.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// True iff the open rectangles intersect on both axes
#[inline]
#[allow(clippy::too_many_arguments)]
pub fn overlaps(x1: f32, y1: f32, w1: f32, h1: f32, x2: f32, y2: f32, w2: f32, h2: f32) -> bool {
    x1 < x2 + w2 && x1 + w1 > x2 && y1 < y2 + h2 && y1 + h1 > y2
}

/// Axis-aligned rectangle (top-left origin)
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

    /// Rectangle of size `size` centred on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            x: center.x - size.x / 2.0,
            y: center.y - size.y / 2.0,
            w: size.x,
            h: size.y,
        }
    }

    /// Smallest rectangle containing every point
    pub fn bounding(points: &[Vec2]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (mut min, mut max) = (*first, *first);
        for p in &points[1..] {
            min = min.min(*p);
            max = max.max(*p);
        }
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        overlaps(self.x, self.y, self.w, self.h, other.x, other.y, other.w, other.h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Whether the rectangle lies completely outside `bounds` grown by `margin`
    pub fn is_outside(&self, bounds: &Rect, margin: f32) -> bool {
        self.x + self.w < bounds.x - margin
            || self.x > bounds.x + bounds.w + margin
            || self.y + self.h < bounds.y - margin
            || self.y > bounds.y + bounds.h + margin
    }
}
