//! Entity transform
//!
//! Position and uniform scale make up the node matrix the colliders use.
//! Facing yaw only orients the presentation model and is not part of
//! [`Transform::local_to_world`].

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// World position
    pub position: Vec3,
    /// Facing yaw in degrees around +Y, 0 faces +Z
    pub yaw: f32,
    /// Uniform scale
    pub scale: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        yaw: 0.0,
        scale: 1.0,
    };

    /// Create from position only
    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    /// Set scale (builder pattern)
    #[inline]
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Set yaw (builder pattern)
    #[inline]
    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    /// Node matrix `T * S`
    #[inline]
    pub fn local_to_world(&self) -> Mat4 {
        Mat4::from_translation(self.position) * Mat4::from_scale(Vec3::splat(self.scale))
    }

    /// Turn to face a horizontal direction. Zero-length directions are ignored.
    pub fn face_direction(&mut self, direction: Vec3) {
        if direction.x.abs() > f32::EPSILON || direction.z.abs() > f32::EPSILON {
            self.yaw = direction.x.atan2(direction.z).to_degrees();
        }
    }

    /// Turn toward a horizontal direction by at most `max_degrees`, along the shorter arc
    pub fn turn_toward(&mut self, direction: Vec3, max_degrees: f32) {
        if direction.x.abs() <= f32::EPSILON && direction.z.abs() <= f32::EPSILON {
            return;
        }
        let target = direction.x.atan2(direction.z).to_degrees();
        let delta = (target - self.yaw + 540.0).rem_euclid(360.0) - 180.0;
        let limit = max_degrees.max(0.0);
        self.yaw += delta.clamp(-limit, limit);
    }

    /// Unit forward vector on the XZ plane
    pub fn forward(&self) -> Vec3 {
        let rad = self.yaw.to_radians();
        Vec3::new(rad.sin(), 0.0, rad.cos())
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_local_to_world() {
        let t = Transform::from_position(Vec3::new(10.0, 20.0, 30.0)).with_scale(2.0);
        let p = t.local_to_world().transform_point3(Vec3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p.x, 12.0);
        assert_relative_eq!(p.y, 22.0);
        assert_relative_eq!(p.z, 32.0);
    }

    #[test]
    fn test_yaw_does_not_rotate_node() {
        let t = Transform::IDENTITY.with_yaw(90.0);
        let p = t.local_to_world().transform_point3(Vec3::X);
        assert_relative_eq!(p.x, 1.0);
    }

    #[test]
    fn test_face_direction() {
        let mut t = Transform::IDENTITY;
        t.face_direction(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(t.yaw, 90.0, epsilon = 1e-4);
        assert_relative_eq!(t.forward().x, 1.0, epsilon = 1e-5);

        t.face_direction(Vec3::ZERO);
        assert_relative_eq!(t.yaw, 90.0, epsilon = 1e-4);
    }

    #[test]
    fn test_turn_toward_is_rate_limited() {
        let mut t = Transform::IDENTITY;
        t.turn_toward(Vec3::X, 30.0);
        assert_relative_eq!(t.yaw, 30.0, epsilon = 1e-4);

        t.turn_toward(Vec3::X, 360.0);
        assert_relative_eq!(t.yaw, 90.0, epsilon = 1e-4);
    }

    #[test]
    fn test_turn_toward_takes_short_arc() {
        let mut t = Transform::IDENTITY.with_yaw(170.0);
        // -170 is 20 degrees away across the wrap
        t.turn_toward(Vec3::new(-(10.0f32.to_radians().sin()), 0.0, -(10.0f32.to_radians().cos())), 10.0);
        assert_relative_eq!(t.yaw, 180.0, epsilon = 1e-3);
    }
}
