//! Grid-accelerated terrain ray collider

use crate::config::PhysicsConfig;
use crate::grid::SpatialGrid;
use crate::mesh::{self, TerrainModel, Triangle};
use rift_math::{ray_triangle, Ray, Vec3};
use std::path::Path;

/// Static triangle soup answering "where is the ground below this point".
///
/// Queries only look at the grid cell under the ray origin. A ray starting
/// outside the grid reports no hit; there is no brute-force fallback.
#[derive(Debug, Clone)]
pub struct TerrainCollider {
    triangles: Vec<Triangle>,
    grid: SpatialGrid,
}

impl TerrainCollider {
    /// Build from a terrain model and an optional OBJ path.
    ///
    /// Never fails: when the path is missing, unreadable or yields no faces,
    /// the collider falls back to a flat floor spanning the model bounds.
    pub fn from_model(model: &TerrainModel, mesh_path: Option<&Path>, config: &PhysicsConfig) -> Self {
        let triangles = match mesh_path {
            Some(path) => match mesh::load_obj(path, model) {
                Ok(triangles) => triangles,
                Err(err) => {
                    log::warn!("{}; using flat floor from model bounds", err);
                    mesh::flat_floor(model).to_vec()
                }
            },
            None => {
                log::info!("No terrain mesh given; using flat floor from model bounds");
                mesh::flat_floor(model).to_vec()
            }
        };
        Self::from_triangles(triangles, config)
    }

    /// Build from OBJ text already in memory, with the same fallback as [`Self::from_model`]
    pub fn from_obj_str(text: &str, model: &TerrainModel, config: &PhysicsConfig) -> Self {
        let mut triangles = mesh::parse_obj(text, model);
        if triangles.is_empty() {
            log::warn!("Terrain mesh produced no triangles; using flat floor from model bounds");
            triangles = mesh::flat_floor(model).to_vec();
        }
        Self::from_triangles(triangles, config)
    }

    /// Build directly from world-space triangles
    pub fn from_triangles(triangles: Vec<Triangle>, config: &PhysicsConfig) -> Self {
        let grid = SpatialGrid::build(
            &triangles,
            config.grid_columns,
            config.grid_rows,
            config.grid_cell_epsilon,
        );
        Self { triangles, grid }
    }

    /// Closest hit distance along the ray, in multiples of its direction.
    ///
    /// Returns `None` when there are no triangles, when the origin lies
    /// outside the grid, or when nothing in the origin's cell is hit.
    pub fn ray_intersects(&self, ray: &Ray) -> Option<f32> {
        if self.triangles.is_empty() {
            return None;
        }

        let (x, z) = (ray.origin.x, ray.origin.z);
        self.grid
            .candidates(x, z)
            .iter()
            .filter_map(|&index| self.triangles.get(index as usize))
            .filter(|tri| tri.footprint_contains(x, z))
            .filter_map(|tri| ray_triangle(ray, tri.v0, tri.v1, tri.v2))
            .map(|hit| hit.distance)
            .fold(None, |closest: Option<f32>, t| match closest {
                Some(best) if best <= t => Some(best),
                _ => Some(t),
            })
    }

    /// Ground height under `position`, probing down from `probe_height` above it
    pub fn ground_height(&self, position: Vec3, probe_height: f32) -> Option<f32> {
        let ray = Ray::down(position + Vec3::new(0.0, probe_height, 0.0));
        self.ray_intersects(&ray).map(|t| ray.origin.y - t)
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn grid(&self) -> &SpatialGrid {
        &self.grid
    }
}
