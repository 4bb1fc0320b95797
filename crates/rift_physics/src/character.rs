//! Per-actor AABB collider
//!
//! Used for melee hit tests and for pushing the player out of enemies.

use rift_math::{Aabb, Transform, Vec3};

/// Collider-facing view of a visual model
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelGeometry {
    /// Cached model-space bounds, possibly stale or degenerate
    pub cached_bounds: Aabb,
    /// Per-sub-mesh bounds used to rebuild a degenerate cache
    pub submesh_bounds: Vec<Aabb>,
}

impl ModelGeometry {
    pub fn from_bounds(bounds: Aabb) -> Self {
        Self {
            cached_bounds: bounds,
            submesh_bounds: Vec::new(),
        }
    }

    pub fn with_submesh(mut self, bounds: Aabb) -> Self {
        self.submesh_bounds.push(bounds);
        self
    }

    /// Cached bounds, or the merge of all sub-meshes when the cache is degenerate
    pub fn resolved_bounds(&self) -> Aabb {
        if !self.cached_bounds.is_degenerate() {
            return self.cached_bounds;
        }
        let mut meshes = self.submesh_bounds.iter();
        match meshes.next() {
            Some(first) => meshes.fold(*first, |acc, b| acc.union(b)),
            None => self.cached_bounds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterCollider {
    local: Aabb,
    world: Aabb,
}

impl CharacterCollider {
    /// Collider with a known local box
    pub fn new(local: Aabb) -> Self {
        Self { local, world: local }
    }

    /// Derive the local box from model geometry.
    ///
    /// A degenerate model falls back to `default_box`. The X and Z extents are
    /// then shrunk toward the center by `xz_shrink` when it lies in `(0, 1)`.
    pub fn calculate_bounding_box(model: &ModelGeometry, xz_shrink: f32, default_box: Aabb) -> Self {
        let mut bounds = model.resolved_bounds();
        if bounds.is_degenerate() {
            log::warn!("Model has no usable bounds; using default character box");
            bounds = default_box;
        }
        let local = bounds.shrink_xz(xz_shrink);
        log::debug!(
            "Collider initialised, local AABB min {:?} max {:?}",
            local.min,
            local.max
        );
        Self::new(local)
    }

    /// Re-derive the world box from the owner's current transform
    pub fn update(&mut self, transform: &Transform) {
        self.world = self.world_aabb_at(transform);
    }

    /// World box the collider would have under `transform`, without storing it
    pub fn world_aabb_at(&self, transform: &Transform) -> Aabb {
        self.local.transform(&transform.local_to_world())
    }

    pub fn local_aabb(&self) -> &Aabb {
        &self.local
    }

    pub fn world_aabb(&self) -> &Aabb {
        &self.world
    }

    /// AABB overlap between the stored world box and `other`
    pub fn check_collision(&self, other: &Aabb) -> bool {
        self.world.intersects(other)
    }

    /// Horizontal push-out that moves `source` (default: the stored world box) out of `other`.
    ///
    /// Each axis picks whichever of its two separations is smaller; then only
    /// the axis with the smaller magnitude is applied. Y is never adjusted.
    /// Zero when the boxes do not overlap.
    pub fn collision_offset(&self, other: &Aabb, source: Option<&Aabb>) -> Vec3 {
        let src = source.unwrap_or(&self.world);
        if !src.intersects(other) {
            return Vec3::ZERO;
        }

        let overlap_x1 = src.max.x - other.min.x;
        let overlap_x2 = other.max.x - src.min.x;
        let overlap_z1 = src.max.z - other.min.z;
        let overlap_z2 = other.max.z - src.min.z;

        let min_x = if overlap_x1 < overlap_x2 { overlap_x1 } else { -overlap_x2 };
        let min_z = if overlap_z1 < overlap_z2 { overlap_z1 } else { -overlap_z2 };

        if min_x.abs() < min_z.abs() {
            Vec3::new(-min_x, 0.0, 0.0)
        } else {
            Vec3::new(0.0, 0.0, -min_z)
        }
    }

    /// Push `position` out of every box in `blockers`, in order.
    ///
    /// The box is evaluated at `position` with the rest of `transform`, and
    /// each correction is applied before the next blocker is tested.
    pub fn push_out<'a>(
        &self,
        transform: &Transform,
        position: Vec3,
        blockers: impl IntoIterator<Item = &'a Aabb>,
    ) -> Vec3 {
        let mut next = self.world_aabb_at(&Transform { position, ..*transform });
        let mut resolved = position;

        for blocker in blockers {
            if next.intersects(blocker) {
                let offset = self.collision_offset(blocker, Some(&next));
                if offset != Vec3::ZERO {
                    resolved += offset;
                    next = next.translate(offset);
                }
            }
        }

        resolved
    }
}

impl Default for CharacterCollider {
    fn default() -> Self {
        Self::new(Aabb::new(Vec3::new(-25.0, 0.0, -25.0), Vec3::new(25.0, 180.0, 25.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn box_50() -> Aabb {
        Aabb::new(Vec3::new(-25.0, 0.0, -25.0), Vec3::new(25.0, 180.0, 25.0))
    }

    fn at(x: f32, z: f32) -> Transform {
        Transform::from_position(Vec3::new(x, 0.0, z))
    }

    #[test]
    fn test_degenerate_model_uses_default_box() {
        let model = ModelGeometry::default();
        let collider = CharacterCollider::calculate_bounding_box(&model, 1.0, box_50());
        assert_eq!(*collider.local_aabb(), box_50());
    }

    #[test]
    fn test_degenerate_cache_recomputed_from_submeshes() {
        let model = ModelGeometry::default()
            .with_submesh(Aabb::new(Vec3::new(-10.0, 0.0, -5.0), Vec3::new(0.0, 100.0, 5.0)))
            .with_submesh(Aabb::new(Vec3::new(0.0, 50.0, -8.0), Vec3::new(12.0, 170.0, 2.0)));
        let collider = CharacterCollider::calculate_bounding_box(&model, 1.0, box_50());
        assert_eq!(collider.local_aabb().min, Vec3::new(-10.0, 0.0, -8.0));
        assert_eq!(collider.local_aabb().max, Vec3::new(12.0, 170.0, 5.0));
    }

    #[test]
    fn test_shrink_applied_after_fallback() {
        let collider = CharacterCollider::calculate_bounding_box(&ModelGeometry::default(), 0.4, box_50());
        let local = collider.local_aabb();
        assert_relative_eq!(local.size().x, 20.0, epsilon = 1e-4);
        assert_relative_eq!(local.size().z, 20.0, epsilon = 1e-4);
        assert_relative_eq!(local.size().y, 180.0);
    }

    #[test]
    fn test_update_follows_transform() {
        let mut collider = CharacterCollider::new(box_50());
        collider.update(&at(100.0, -40.0).with_scale(2.0));
        assert_relative_eq!(collider.world_aabb().min.x, 50.0);
        assert_relative_eq!(collider.world_aabb().max.z, 10.0);
        assert_relative_eq!(collider.world_aabb().max.y, 360.0);
    }

    #[test]
    fn test_separated_boxes_have_zero_offset() {
        let mut collider = CharacterCollider::new(box_50());
        collider.update(&at(0.0, 0.0));
        let other = box_50().translate(Vec3::new(60.0, 0.0, 0.0));
        assert!(!collider.check_collision(&other));
        assert_eq!(collider.collision_offset(&other, None), Vec3::ZERO);
    }

    #[test]
    fn test_offset_picks_smaller_axis() {
        let mut collider = CharacterCollider::new(box_50());
        collider.update(&at(0.0, 0.0));

        // Overlaps 40 on X and 10 on Z: resolve on Z, pushing toward -Z
        let other = box_50().translate(Vec3::new(10.0, 0.0, 40.0));
        let offset = collider.collision_offset(&other, None);
        assert_relative_eq!(offset.x, 0.0);
        assert_relative_eq!(offset.y, 0.0);
        assert_relative_eq!(offset.z, -10.0);
    }

    #[test]
    fn test_offset_resolves_overlap() {
        let mut collider = CharacterCollider::new(box_50());
        collider.update(&at(0.0, 0.0));
        for &(dx, dz) in &[(10.0, 0.0), (-12.0, 3.0), (5.0, -30.0), (-45.0, 44.0), (0.0, 20.0)] {
            let other = box_50().translate(Vec3::new(dx, 0.0, dz));
            let offset = collider.collision_offset(&other, None);
            let moved = collider.world_aabb().translate(offset);
            let gap_x = (moved.center().x - other.center().x).abs();
            let gap_z = (moved.center().z - other.center().z).abs();
            assert!(gap_x >= 50.0 - 1e-3 || gap_z >= 50.0 - 1e-3);
            assert_eq!(offset.y, 0.0);
        }
    }

    #[test]
    fn test_push_out_uses_next_position() {
        let collider = CharacterCollider::new(box_50());
        let blocker = box_50().translate(Vec3::new(60.0, 0.0, 0.0));
        let resolved = collider.push_out(&at(0.0, 0.0), Vec3::new(20.0, 0.0, 0.0), [&blocker]);
        assert_relative_eq!(resolved.x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(resolved.z, 0.0);
    }
}
