//! Ray-triangle intersection (Möller-Trumbore)

use crate::ray::Ray;
use glam::Vec3;

/// Tolerance for both the parallel-ray test and the minimum accepted `t`
pub const RAY_EPSILON: f32 = 1e-5;

/// Result of a ray-triangle intersection
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleHit {
    /// Parameter along the ray, in multiples of its direction vector
    pub distance: f32,
    /// Barycentric `u`
    pub u: f32,
    /// Barycentric `v`
    pub v: f32,
}

/// Ray-Triangle intersection using the Möller-Trumbore algorithm.
///
/// Both faces are hit. Returns `None` when the ray is parallel to the
/// triangle plane, misses the triangle, or hits at `t <= RAY_EPSILON`.
pub fn ray_triangle(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<TriangleHit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    if a.abs() < RAY_EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);
    (t > RAY_EPSILON).then_some(TriangleHit { distance: t, u, v })
}
