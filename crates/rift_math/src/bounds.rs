//! Axis-aligned bounding boxes

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-Aligned Bounding Box
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Empty (inverted) box, the identity for [`Aabb::union`]
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::MAX),
        max: Vec3::splat(f32::MIN),
    };

    /// Create from min and max points
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create from center and half-extents
    #[inline]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Create from a set of points
    pub fn from_points(points: &[Vec3]) -> Self {
        points
            .iter()
            .fold(Self::EMPTY, |aabb, &p| aabb.expand_to_include(p))
    }

    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// True when the box has no usable horizontal width (`min.x >= max.x`).
    ///
    /// This is the test model caches are checked with before a box is
    /// recomputed or replaced by a default.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.min.x >= self.max.x
    }

    /// Expand to include a point
    #[inline]
    pub fn expand_to_include(self, point: Vec3) -> Self {
        Self {
            min: self.min.min(point),
            max: self.max.max(point),
        }
    }

    /// Smallest box containing both boxes
    #[inline]
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Check if a point is inside (inclusive)
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Per-axis interval overlap on all three axes. Touching faces count as overlap.
    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Move the box by `offset`
    #[inline]
    pub fn translate(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Shrink the X and Z extents toward the center by `factor`.
    ///
    /// Only `0 < factor < 1` changes the box; anything else returns it as is.
    /// The vertical extent is never touched.
    pub fn shrink_xz(&self, factor: f32) -> Self {
        if !(factor > 0.0 && factor < 1.0) {
            return *self;
        }
        let center = self.center();
        let half_x = (self.max.x - self.min.x) * 0.5 * factor;
        let half_z = (self.max.z - self.min.z) * 0.5 * factor;
        Self {
            min: Vec3::new(center.x - half_x, self.min.y, center.z - half_z),
            max: Vec3::new(center.x + half_x, self.max.y, center.z + half_z),
        }
    }

    /// Grow the X and Z extents outward by `amount` on each side
    #[inline]
    pub fn inflate_xz(&self, amount: f32) -> Self {
        let grow = Vec3::new(amount, 0.0, amount);
        Self {
            min: self.min - grow,
            max: self.max + grow,
        }
    }

    /// Transform the AABB by a matrix.
    ///
    /// The result is the smallest axis-aligned box around the eight
    /// transformed corners, not an oriented box.
    pub fn transform(&self, matrix: &Mat4) -> Self {
        let corners = [
            Vec3::new(self.min.x, self.min.y, self.min.z),
            Vec3::new(self.max.x, self.min.y, self.min.z),
            Vec3::new(self.min.x, self.max.y, self.min.z),
            Vec3::new(self.max.x, self.max.y, self.min.z),
            Vec3::new(self.min.x, self.min.y, self.max.z),
            Vec3::new(self.max.x, self.min.y, self.max.z),
            Vec3::new(self.min.x, self.max.y, self.max.z),
            Vec3::new(self.max.x, self.max.y, self.max.z),
        ];

        corners.iter().fold(Self::EMPTY, |aabb, &corner| {
            aabb.expand_to_include(matrix.transform_point3(corner))
        })
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new(Vec3::ZERO, Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn box_50() -> Aabb {
        Aabb::new(Vec3::new(-25.0, 0.0, -25.0), Vec3::new(25.0, 180.0, 25.0))
    }

    #[test]
    fn test_from_points() {
        let aabb = Aabb::from_points(&[
            Vec3::new(1.0, 5.0, -2.0),
            Vec3::new(-3.0, 0.0, 4.0),
        ]);
        assert_eq!(aabb.min, Vec3::new(-3.0, 0.0, -2.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 5.0, 4.0));
    }

    #[test]
    fn test_intersects() {
        let a = box_50();
        assert!(a.intersects(&a.translate(Vec3::new(10.0, 0.0, 0.0))));
        assert!(a.intersects(&a.translate(Vec3::new(50.0, 0.0, 0.0))));
        assert!(!a.intersects(&a.translate(Vec3::new(50.5, 0.0, 0.0))));
        assert!(!a.intersects(&a.translate(Vec3::new(0.0, 200.0, 0.0))));
    }

    #[test]
    fn test_shrink_xz_scales_horizontal_extents() {
        let original = Aabb::new(Vec3::new(10.0, -5.0, 20.0), Vec3::new(30.0, 95.0, 60.0));
        for &factor in &[0.1_f32, 0.4, 0.75, 0.999] {
            let shrunk = original.shrink_xz(factor);
            assert_relative_eq!(shrunk.size().x, original.size().x * factor, epsilon = 1e-4);
            assert_relative_eq!(shrunk.size().z, original.size().z * factor, epsilon = 1e-4);
            assert_relative_eq!(shrunk.center().x, original.center().x, epsilon = 1e-4);
            assert_relative_eq!(shrunk.center().z, original.center().z, epsilon = 1e-4);
            assert_eq!(shrunk.min.y, original.min.y);
            assert_eq!(shrunk.max.y, original.max.y);
        }
    }

    #[test]
    fn test_shrink_xz_out_of_range_is_identity() {
        let original = box_50();
        assert_eq!(original.shrink_xz(1.0), original);
        assert_eq!(original.shrink_xz(2.5), original);
        assert_eq!(original.shrink_xz(0.0), original);
        assert_eq!(original.shrink_xz(-0.3), original);
    }

    #[test]
    fn test_inflate_xz() {
        let inflated = box_50().inflate_xz(30.0);
        assert_eq!(inflated.min, Vec3::new(-55.0, 0.0, -55.0));
        assert_eq!(inflated.max, Vec3::new(55.0, 180.0, 55.0));
    }

    #[test]
    fn test_transform_translation_and_scale() {
        let m = Mat4::from_translation(Vec3::new(100.0, 0.0, -50.0)) * Mat4::from_scale(Vec3::splat(2.0));
        let world = box_50().transform(&m);
        assert_relative_eq!(world.min.x, 50.0);
        assert_relative_eq!(world.max.x, 150.0);
        assert_relative_eq!(world.max.y, 360.0);
        assert_relative_eq!(world.min.z, -100.0);
    }

    #[test]
    fn test_transform_rotation_stays_axis_aligned() {
        let m = Mat4::from_rotation_y(std::f32::consts::FRAC_PI_4);
        let world = box_50().transform(&m);
        let expected = 25.0 * std::f32::consts::SQRT_2;
        assert_relative_eq!(world.max.x, expected, epsilon = 1e-3);
        assert_relative_eq!(world.min.z, -expected, epsilon = 1e-3);
        assert_relative_eq!(world.max.y, 180.0, epsilon = 1e-3);
    }

    #[test]
    fn test_degenerate() {
        assert!(Aabb::default().is_degenerate());
        assert!(Aabb::EMPTY.is_degenerate());
        assert!(!box_50().is_degenerate());
    }
}
