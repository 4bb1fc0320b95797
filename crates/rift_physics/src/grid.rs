//! Uniform XZ grid over terrain triangles

use crate::mesh::Triangle;

/// Fixed-resolution grid of triangle index buckets.
///
/// Cells are square. The cell size is picked so the grid covers the full
/// extent on both axes, plus a small epsilon so a point-sized extent still
/// gets a positive cell size. A triangle is listed in every cell its XZ
/// footprint overlaps.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    min_x: f32,
    min_z: f32,
    cell_size: f32,
    columns: usize,
    rows: usize,
    cells: Vec<Vec<u32>>,
}

impl SpatialGrid {
    /// Build a grid over `triangles`. An empty slice yields an empty grid.
    pub fn build(triangles: &[Triangle], columns: usize, rows: usize, epsilon: f32) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);

        if triangles.is_empty() {
            return Self {
                min_x: 0.0,
                min_z: 0.0,
                cell_size: epsilon,
                columns,
                rows,
                cells: vec![Vec::new(); columns * rows],
            };
        }

        let (mut min_x, mut max_x) = (f32::MAX, f32::MIN);
        let (mut min_z, mut max_z) = (f32::MAX, f32::MIN);
        for tri in triangles {
            min_x = min_x.min(tri.min_x);
            max_x = max_x.max(tri.max_x);
            min_z = min_z.min(tri.min_z);
            max_z = max_z.max(tri.max_z);
        }

        let cell_size =
            ((max_x - min_x) / columns as f32).max((max_z - min_z) / rows as f32) + epsilon;

        let mut grid = Self {
            min_x,
            min_z,
            cell_size,
            columns,
            rows,
            cells: vec![Vec::new(); columns * rows],
        };

        for (index, tri) in triangles.iter().enumerate() {
            let (c0, c1) = grid.span(tri.min_x, tri.max_x, grid.min_x, columns);
            let (r0, r1) = grid.span(tri.min_z, tri.max_z, grid.min_z, rows);
            for r in r0..=r1 {
                for c in c0..=c1 {
                    grid.cells[r * columns + c].push(index as u32);
                }
            }
        }

        log::info!(
            "Terrain grid built: {} triangles in {}x{} cells of {:.2}",
            triangles.len(),
            columns,
            rows,
            cell_size
        );
        grid
    }

    /// Clamped inclusive cell range covering `[lo, hi]` on one axis
    fn span(&self, lo: f32, hi: f32, origin: f32, count: usize) -> (usize, usize) {
        let last = count as i64 - 1;
        let start = (((lo - origin) / self.cell_size).floor() as i64).clamp(0, last);
        let end = (((hi - origin) / self.cell_size).floor() as i64).clamp(0, last);
        (start as usize, end as usize)
    }

    /// Cell `(column, row)` containing the XZ point, or `None` outside the grid
    pub fn cell_of(&self, x: f32, z: f32) -> Option<(usize, usize)> {
        let c = ((x - self.min_x) / self.cell_size).floor();
        let r = ((z - self.min_z) / self.cell_size).floor();
        if c.is_nan() || r.is_nan() || c < 0.0 || r < 0.0 {
            return None;
        }
        let (c, r) = (c as usize, r as usize);
        (c < self.columns && r < self.rows).then_some((c, r))
    }

    /// Triangle indices listed in a cell
    pub fn cell(&self, column: usize, row: usize) -> &[u32] {
        self.cells
            .get(row * self.columns + column)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Triangle indices in the cell containing the XZ point
    pub fn candidates(&self, x: f32, z: f32) -> &[u32] {
        match self.cell_of(x, z) {
            Some((c, r)) => self.cell(c, r),
            None => &[],
        }
    }

    /// XZ rectangle `(min_x, min_z, max_x, max_z)` of a cell
    pub fn cell_rect(&self, column: usize, row: usize) -> (f32, f32, f32, f32) {
        let x0 = self.min_x + column as f32 * self.cell_size;
        let z0 = self.min_z + row as f32 * self.cell_size;
        (x0, z0, x0 + self.cell_size, z0 + self.cell_size)
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Grid origin on X and Z
    pub fn origin(&self) -> (f32, f32) {
        (self.min_x, self.min_z)
    }
}
