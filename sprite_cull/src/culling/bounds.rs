/// Axis-aligned bounding boxes in world space.
///
/// The single overlap test used by every culling and query path lives here,
/// so all strategies agree on what "visible" means.

use glam::Vec2;

// ===== AABB =====

/// Axis-Aligned Bounding Box `{x, y, width, height}` (top-left origin, y down)
///
/// Width and height are expected to be non-negative. Negative extents are not
/// rejected; overlap results for such boxes are unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AABB {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl AABB {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Build from a top-left corner and a size.
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    /// Right edge (`x + width`)
    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`)
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Top-left corner
    pub fn min(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Bottom-right corner
    pub fn max(&self) -> Vec2 {
        Vec2::new(self.right(), self.bottom())
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Test if this AABB overlaps another with strictly positive area.
    ///
    /// Open-interval test: boxes that only touch along an edge or a corner
    /// do NOT intersect.
    #[inline]
    pub fn intersects(&self, other: &AABB) -> bool {
        self.right() > other.x
            && self.x < other.right()
            && self.bottom() > other.y
            && self.y < other.bottom()
    }

    /// Half-open point containment: `[min, max)`.
    pub fn contains_point(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.right()
            && point.y < self.bottom()
    }

    /// Smallest AABB enclosing both boxes.
    pub fn union(&self, other: &AABB) -> AABB {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        AABB::new(
            x,
            y,
            self.right().max(other.right()) - x,
            self.bottom().max(other.bottom()) - y,
        )
    }

    /// Grow every edge outward by `margin` (per axis).
    pub fn expanded(&self, margin: Vec2) -> AABB {
        AABB::new(
            self.x - margin.x,
            self.y - margin.y,
            self.width + margin.x * 2.0,
            self.height + margin.y * 2.0,
        )
    }
}

#[cfg(test)]
#[path = "bounds_tests.rs"]
mod tests;
