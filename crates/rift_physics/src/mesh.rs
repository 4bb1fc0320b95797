//! Terrain mesh ingestion
//!
//! Reads the vertex (`v x y z`) and face (`f a b c`) records of Wavefront OBJ
//! text. Everything else is ignored. Face references may carry
//! `/texture/normal` suffixes, which are dropped. Vertices are moved into
//! world space as they are read, using the terrain's uniform scale and
//! position.

use crate::error::{PhysicsError, Result};
use rift_math::{Aabb, Mat4, Vec3};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// World-space triangle with its precomputed XZ footprint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    pub v0: Vec3,
    pub v1: Vec3,
    pub v2: Vec3,
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3) -> Self {
        Self {
            v0,
            v1,
            v2,
            min_x: v0.x.min(v1.x).min(v2.x),
            max_x: v0.x.max(v1.x).max(v2.x),
            min_z: v0.z.min(v1.z).min(v2.z),
            max_z: v0.z.max(v1.z).max(v2.z),
        }
    }

    /// Whether the XZ point lies inside the footprint rectangle (inclusive)
    #[inline]
    pub fn footprint_contains(&self, x: f32, z: f32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }

    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.v0 + self.v1 + self.v2) / 3.0
    }
}

/// Placement of the terrain's visual model.
///
/// `bounds` is in model space. Mesh vertices and the fallback floor are both
/// moved into world space through `scale` then `position`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainModel {
    pub bounds: Aabb,
    pub scale: f32,
    pub position: Vec3,
}

impl TerrainModel {
    pub fn new(bounds: Aabb) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Model space to world space
    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        local * self.scale + self.position
    }

    /// World-space bounds of the model
    pub fn world_bounds(&self) -> Aabb {
        let node = Mat4::from_translation(self.position) * Mat4::from_scale(Vec3::splat(self.scale));
        self.bounds.transform(&node)
    }
}

impl Default for TerrainModel {
    fn default() -> Self {
        Self {
            bounds: Aabb::new(
                Vec3::new(-2000.0, 0.0, -2000.0),
                Vec3::new(2000.0, 0.0, 2000.0),
            ),
            scale: 1.0,
            position: Vec3::ZERO,
        }
    }
}

/// Parse OBJ text into world-space triangles.
///
/// Lines that fail to parse are skipped. A face only sees vertices declared
/// above it; faces whose references fall outside that range are dropped.
/// Only the first three references of a face are used.
pub fn parse_obj(text: &str, model: &TerrainModel) -> Vec<Triangle> {
    let mut vertices: Vec<Vec3> = Vec::new();
    let mut triangles = Vec::new();
    let mut skipped = 0usize;

    for line in text.lines() {
        let line = line.trim_end();
        if let Some(rest) = line.strip_prefix("v ") {
            match parse_vertex(rest) {
                Some(v) => vertices.push(model.to_world(v)),
                None => skipped += 1,
            }
        } else if let Some(rest) = line.strip_prefix("f ") {
            match parse_face(rest, vertices.len()) {
                Some([a, b, c]) => triangles.push(Triangle::new(vertices[a], vertices[b], vertices[c])),
                None => skipped += 1,
            }
        }
    }

    if skipped > 0 {
        log::debug!("Skipped {} malformed OBJ records", skipped);
    }
    triangles
}

/// Read and parse an OBJ file
pub fn load_obj(path: &Path, model: &TerrainModel) -> Result<Vec<Triangle>> {
    let text = std::fs::read_to_string(path).map_err(|source| PhysicsError::MeshIo {
        path: path.to_path_buf(),
        source,
    })?;
    let triangles = parse_obj(&text, model);
    if triangles.is_empty() {
        return Err(PhysicsError::EmptyMesh);
    }
    log::info!("Loaded {} terrain triangles from {}", triangles.len(), path.display());
    Ok(triangles)
}

/// Two triangles spanning the model's world bounds at their lowest Y
pub fn flat_floor(model: &TerrainModel) -> [Triangle; 2] {
    let bounds = model.world_bounds();
    let (min, max) = (bounds.min, bounds.max);
    let y = min.y;
    [
        Triangle::new(
            Vec3::new(min.x, y, min.z),
            Vec3::new(max.x, y, min.z),
            Vec3::new(max.x, y, max.z),
        ),
        Triangle::new(
            Vec3::new(min.x, y, min.z),
            Vec3::new(max.x, y, max.z),
            Vec3::new(min.x, y, max.z),
        ),
    ]
}

fn parse_vertex(rest: &str) -> Option<Vec3> {
    let mut it = rest.split_whitespace().map(|s| s.parse::<f32>());
    let x = it.next()?.ok()?;
    let y = it.next()?.ok()?;
    let z = it.next()?.ok()?;
    Some(Vec3::new(x, y, z))
}

fn parse_face(rest: &str, vertex_count: usize) -> Option<[usize; 3]> {
    let mut refs = rest.split_whitespace();
    let a = resolve_index(refs.next()?, vertex_count)?;
    let b = resolve_index(refs.next()?, vertex_count)?;
    let c = resolve_index(refs.next()?, vertex_count)?;
    Some([a, b, c])
}

/// 1-based reference (with optional `/…` suffix) to a 0-based index
fn resolve_index(token: &str, vertex_count: usize) -> Option<usize> {
    let head = token.split('/').next()?;
    let one_based: i64 = head.parse().ok()?;
    let index = one_based - 1;
    (index >= 0 && (index as usize) < vertex_count).then_some(index as usize)
}
