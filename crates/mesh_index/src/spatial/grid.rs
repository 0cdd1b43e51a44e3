//! Uniform grid spatial index
//!
//! Fixed-resolution 3D bucket grid over the mesh bounding box. Insertion
//! stamps a triangle into every cell its bounding box touches; raycasts
//! walk cells front to back with a 3D DDA.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::foundation::math::{IVec3, Mat4, Vec3};
use crate::geometry::{Aabb, MeshGeometry, Ray, RayHit, Vertex};
use crate::spatial::SpatialIndex;

/// Configuration for the uniform grid
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cells per axis
    pub dims: [i32; 3],
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { dims: [16, 16, 16] }
    }
}

/// Uniform bucket grid over the mesh bounding box
///
/// Cell size is derived from the bounding box extent divided by the
/// configured resolution. A triangle straddling cell boundaries is
/// stored in every cell its bounding box touches.
#[derive(Debug, Clone)]
pub struct UniformGrid {
    geometry: MeshGeometry,
    bounds: Aabb,
    dims: IVec3,
    cell_size: Vec3,
    cells: Vec<Vec<usize>>,
}

impl UniformGrid {
    /// Create an empty grid with the given resolution
    pub fn new(config: GridConfig) -> Self {
        Self {
            geometry: MeshGeometry::new(),
            bounds: Aabb::empty(),
            dims: IVec3::new(config.dims[0], config.dims[1], config.dims[2]),
            cell_size: Vec3::zeros(),
            cells: Vec::new(),
        }
    }

    /// World bounding box of the indexed geometry
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Cells per axis
    pub fn dims(&self) -> IVec3 {
        self.dims
    }

    /// Map a world position to a cell coordinate
    ///
    /// `floor((p - min) / cell_size)`, clamped into `[0, dims)` per axis.
    /// Positions slightly outside the box (ray entry and exit points
    /// included) land in the boundary cell instead of being rejected,
    /// which keeps DDA traversal defined at box edges.
    pub fn pos_to_cell(&self, p: Vec3) -> IVec3 {
        let local = (p - self.bounds.min).component_div(&self.cell_size);
        IVec3::new(
            (local.x.floor() as i32).clamp(0, self.dims.x - 1),
            (local.y.floor() as i32).clamp(0, self.dims.y - 1),
            (local.z.floor() as i32).clamp(0, self.dims.z - 1),
        )
    }

    /// Triangle indices stored in one cell
    ///
    /// Cell coordinates must be within `[0, dims)` per axis.
    pub fn cell(&self, x: i32, y: i32, z: i32) -> &[usize] {
        &self.cells[self.cell_index(IVec3::new(x, y, z))]
    }

    fn cell_index(&self, cell: IVec3) -> usize {
        (cell.x + self.dims.x * (cell.y + self.dims.y * cell.z)) as usize
    }

    fn cell_in_bounds(&self, cell: IVec3) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.z >= 0
            && cell.x < self.dims.x
            && cell.y < self.dims.y
            && cell.z < self.dims.z
    }
}

fn step_sign(v: f32) -> i32 {
    if v > 0.0 {
        1
    } else if v < 0.0 {
        -1
    } else {
        0
    }
}

impl SpatialIndex for UniformGrid {
    fn build(&mut self, vertices: &[Vertex], indices: &[u32], transform: Mat4) {
        self.geometry.set_data(vertices, indices, transform);
        self.bounds = self.geometry.compute_bounds();
        self.cell_size = (self.bounds.max - self.bounds.min).component_div(&Vec3::new(
            self.dims.x as f32,
            self.dims.y as f32,
            self.dims.z as f32,
        ));

        let cell_count = (self.dims.x * self.dims.y * self.dims.z) as usize;
        self.cells = vec![Vec::new(); cell_count];

        for i in 0..self.geometry.triangle_count() {
            self.insert(i);
        }

        debug!(
            "built {}x{}x{} grid over {} triangles",
            self.dims.x,
            self.dims.y,
            self.dims.z,
            self.geometry.triangle_count()
        );
    }

    fn insert(&mut self, triangle: usize) {
        let tri_bounds = self.geometry.triangle(triangle).bounds();
        let min_cell = self.pos_to_cell(tri_bounds.min);
        let max_cell = self.pos_to_cell(tri_bounds.max);

        for z in min_cell.z..=max_cell.z {
            for y in min_cell.y..=max_cell.y {
                for x in min_cell.x..=max_cell.x {
                    let idx = self.cell_index(IVec3::new(x, y, z));
                    self.cells[idx].push(triangle);
                }
            }
        }
    }

    fn raycast(&self, ray: &Ray) -> Option<RayHit> {
        // Empty geometry has an inverted box and a non-finite cell size
        // that would poison the DDA accumulators; nothing to hit.
        if self.geometry.triangle_count() == 0 {
            return None;
        }

        let entry = self.bounds.intersect_ray(ray.origin, ray.direction)?;

        // 3D DDA from the entry cell
        let p = ray.point_at(entry);
        let mut cell = self.pos_to_cell(p);

        let dir = ray.direction;
        let step = IVec3::new(step_sign(dir.x), step_sign(dir.y), step_sign(dir.z));
        let t_delta = Vec3::new(
            (self.cell_size.x / dir.x).abs(),
            (self.cell_size.y / dir.y).abs(),
            (self.cell_size.z / dir.z).abs(),
        );

        // Parametric distance from p to the next cell boundary per axis
        let mut next = Vec3::new(
            ((cell.x + i32::from(step.x > 0)) as f32 * self.cell_size.x + self.bounds.min.x
                - p.x)
                / dir.x,
            ((cell.y + i32::from(step.y > 0)) as f32 * self.cell_size.y + self.bounds.min.y
                - p.y)
                / dir.y,
            ((cell.z + i32::from(step.z > 0)) as f32 * self.cell_size.z + self.bounds.min.z
                - p.z)
                / dir.z,
        );

        let mut best_t = f32::MAX;
        let mut best: Option<usize> = None;

        while self.cell_in_bounds(cell) {
            // A triangle stamped into a later cell can still carry the
            // smallest t, so the walk never exits early on a hit.
            for &tri in &self.cells[self.cell_index(cell)] {
                if let Some(t) = self.geometry.triangle(tri).intersect_ray(ray) {
                    if t < best_t {
                        best_t = t;
                        best = Some(tri);
                    }
                }
            }

            // Step along whichever axis reaches its boundary first;
            // exact ties step x before y before z.
            if next.x <= next.y {
                if next.x <= next.z {
                    cell.x += step.x;
                    next.x += t_delta.x;
                } else {
                    cell.z += step.z;
                    next.z += t_delta.z;
                }
            } else if next.y <= next.z {
                cell.y += step.y;
                next.y += t_delta.y;
            } else {
                cell.z += step.z;
                next.z += t_delta.z;
            }
        }

        best.map(|triangle| RayHit { t: best_t, triangle })
    }

    fn query_aabb(&self, aabb: &Aabb) -> Vec<usize> {
        let mut results = Vec::new();
        if !aabb.intersects(&self.bounds) {
            return results;
        }

        let min_cell = self.pos_to_cell(aabb.min);
        let max_cell = self.pos_to_cell(aabb.max);

        for z in min_cell.z..=max_cell.z {
            for y in min_cell.y..=max_cell.y {
                for x in min_cell.x..=max_cell.x {
                    results.extend_from_slice(&self.cells[self.cell_index(IVec3::new(x, y, z))]);
                }
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn build_grid(dims: [i32; 3], vertices: &[Vertex], indices: &[u32]) -> UniformGrid {
        let mut grid = UniformGrid::new(GridConfig { dims });
        grid.build(vertices, indices, Mat4::identity());
        grid
    }

    fn unit_triangle_soup() -> (Vec<Vertex>, Vec<u32>) {
        (
            vec![
                Vertex::from_position(0.0, 0.0, 0.0),
                Vertex::from_position(1.0, 0.0, 0.0),
                Vertex::from_position(0.0, 1.0, 0.0),
            ],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn test_single_triangle_picking_scenario() {
        let (vertices, indices) = unit_triangle_soup();
        let grid = build_grid([16, 16, 16], &vertices, &indices);

        let hit = grid
            .raycast(&Ray::new(Vec3::new(0.25, 0.25, 5.0), Vec3::new(0.0, 0.0, -1.0)))
            .expect("ray passes through the triangle");
        assert_eq!(hit.triangle, 0);
        assert_relative_eq!(hit.t, 5.0, epsilon = 1e-3);

        assert!(grid
            .raycast(&Ray::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(0.0, 0.0, -1.0)))
            .is_none());
    }

    #[test]
    fn test_straddling_triangle_is_stamped_into_every_touched_cell() {
        // Triangle whose bounding box spans the whole 2x2x2 grid: its
        // index must land in all eight cells even though the triangle
        // itself does not pass through all of them.
        let vertices = vec![
            Vertex::from_position(-1.0, -1.0, -1.0),
            Vertex::from_position(1.0, 0.0, 0.0),
            Vertex::from_position(0.0, 1.0, 1.0),
        ];
        let indices = vec![0, 1, 2];
        let grid = build_grid([2, 2, 2], &vertices, &indices);

        for z in 0..2 {
            for y in 0..2 {
                for x in 0..2 {
                    assert!(
                        grid.cell(x, y, z).contains(&0),
                        "cell ({x},{y},{z}) is missing the triangle"
                    );
                }
            }
        }
    }

    #[test]
    fn test_nearest_of_two_triangles_wins() {
        let vertices = vec![
            Vertex::from_position(0.0, 0.0, 0.0),
            Vertex::from_position(1.0, 0.0, 0.0),
            Vertex::from_position(0.0, 1.0, 0.0),
            Vertex::from_position(0.0, 0.0, -3.0),
            Vertex::from_position(1.0, 0.0, -3.0),
            Vertex::from_position(0.0, 1.0, -3.0),
        ];
        let indices = vec![0, 1, 2, 3, 4, 5];
        let grid = build_grid([4, 4, 4], &vertices, &indices);

        let hit = grid
            .raycast(&Ray::new(Vec3::new(0.25, 0.25, 2.0), Vec3::new(0.0, 0.0, -1.0)))
            .expect("ray crosses both planes");
        assert_eq!(hit.triangle, 0);
        assert_relative_eq!(hit.t, 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_query_aabb_is_conservative() {
        let (vertices, indices) = unit_triangle_soup();
        let grid = build_grid([8, 8, 8], &vertices, &indices);

        // Overlapping the triangle's box: index 0 must appear
        let probe = Aabb::new(Vec3::new(-0.1, -0.1, -0.1), Vec3::new(0.2, 0.2, 0.1));
        assert!(grid.query_aabb(&probe).contains(&0));

        // Far outside the grid bounds: empty, not an error
        let far = Aabb::new(Vec3::repeat(50.0), Vec3::repeat(51.0));
        assert!(grid.query_aabb(&far).is_empty());
    }

    #[test]
    fn test_query_duplicates_are_preserved() {
        // The straddling triangle occupies several cells; a query box
        // covering the grid returns one entry per occupied cell.
        let vertices = vec![
            Vertex::from_position(-1.0, -1.0, 0.0),
            Vertex::from_position(1.0, -1.0, 0.0),
            Vertex::from_position(0.0, 1.0, 0.0),
        ];
        let indices = vec![0, 1, 2];
        let grid = build_grid([2, 2, 2], &vertices, &indices);

        let everything = Aabb::new(Vec3::repeat(-2.0), Vec3::repeat(2.0));
        let results = grid.query_aabb(&everything);
        assert!(results.len() > 1);
        assert!(results.iter().all(|&t| t == 0));
    }

    #[test]
    fn test_pos_to_cell_clamps_outside_positions() {
        let (vertices, indices) = unit_triangle_soup();
        let grid = build_grid([4, 4, 4], &vertices, &indices);

        let below = grid.pos_to_cell(Vec3::new(-100.0, -100.0, -100.0));
        assert_eq!(below, IVec3::new(0, 0, 0));

        let above = grid.pos_to_cell(Vec3::new(100.0, 100.0, 100.0));
        assert_eq!(above, IVec3::new(3, 3, 3));
    }

    #[test]
    fn test_axis_aligned_ray_traverses_grid() {
        // Direction with two zero components exercises the IEEE-infinity
        // paths in both the slab test and the DDA accumulators.
        let vertices = vec![
            Vertex::from_position(-1.0, -1.0, 0.0),
            Vertex::from_position(1.0, -1.0, 0.0),
            Vertex::from_position(0.0, 1.0, 0.0),
            Vertex::from_position(-1.0, -1.0, -4.0),
            Vertex::from_position(1.0, -1.0, -4.0),
            Vertex::from_position(0.0, 1.0, -4.0),
        ];
        let indices = vec![0, 1, 2, 3, 4, 5];
        let grid = build_grid([4, 4, 4], &vertices, &indices);

        let hit = grid
            .raycast(&Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, -1.0)))
            .expect("straight-down-z ray hits the front plane");
        assert_eq!(hit.triangle, 0);
        assert_relative_eq!(hit.t, 3.0, epsilon = 1e-3);
    }

    #[test]
    fn test_ray_starting_inside_grid_hits() {
        let vertices = vec![
            Vertex::from_position(-1.0, -1.0, -1.0),
            Vertex::from_position(1.0, -1.0, -1.0),
            Vertex::from_position(0.0, 1.0, -1.0),
            Vertex::from_position(-1.0, -1.0, 1.0),
            Vertex::from_position(1.0, -1.0, 1.0),
            Vertex::from_position(0.0, 1.0, 1.0),
        ];
        let indices = vec![0, 1, 2, 3, 4, 5];
        let grid = build_grid([4, 4, 4], &vertices, &indices);

        let hit = grid
            .raycast(&Ray::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 0.0, -1.0)))
            .expect("origin inside the grid, triangle ahead");
        assert_eq!(hit.triangle, 0);
        assert_relative_eq!(hit.t, 1.0, epsilon = 1e-3);
    }
}
