//! Rays for terrain queries
//!
//! The direction is kept exactly as given. Hit distances are measured in
//! multiples of the direction vector, so a ground probe built with
//! `Vec3::NEG_Y` reports plain world units.

use glam::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    /// Ray origin point
    pub origin: Vec3,
    /// Ray direction, not necessarily normalized
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray. The direction is not normalized.
    #[inline]
    pub const fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Straight-down unit ray, the shape every ground probe uses
    #[inline]
    pub const fn down(origin: Vec3) -> Self {
        Self::new(origin, Vec3::NEG_Y)
    }

    /// Point at parameter `t` along the ray
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self::down(Vec3::ZERO)
    }
}
