//! Picking and collision demo
//!
//! Builds a floor and a box mesh procedurally, indexes one with the
//! uniform grid and one with the octree, then runs both query flows:
//! nearest-hit rays pick the closest mesh under a "cursor", and a small
//! probe box around a descending point checks for overlap before every
//! step, exactly the way the collision consumer uses the index.

use log::info;
use mesh_index::prelude::*;
use mesh_index::GridConfig;

/// Flat floor in the y = 0 plane, `divisions` quads per side
fn floor_mesh(half_extent: f32, divisions: u32) -> (Vec<Vertex>, Vec<u32>) {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    let step = (half_extent * 2.0) / divisions as f32;
    for row in 0..=divisions {
        for col in 0..=divisions {
            let mut v = Vertex::from_position(
                -half_extent + col as f32 * step,
                0.0,
                -half_extent + row as f32 * step,
            );
            v.normal = [0.0, 1.0, 0.0];
            v.tex_coord = [
                col as f32 / divisions as f32,
                row as f32 / divisions as f32,
            ];
            vertices.push(v);
        }
    }

    let stride = divisions + 1;
    for row in 0..divisions {
        for col in 0..divisions {
            let a = row * stride + col;
            let b = a + 1;
            let c = a + stride;
            let d = c + 1;
            indices.extend_from_slice(&[a, b, c, b, d, c]);
        }
    }

    (vertices, indices)
}

/// Axis-aligned box of the given half-extent, 12 triangles
fn box_mesh(half: f32) -> (Vec<Vertex>, Vec<u32>) {
    let corners = [
        [-half, -half, -half],
        [half, -half, -half],
        [half, half, -half],
        [-half, half, -half],
        [-half, -half, half],
        [half, -half, half],
        [half, half, half],
        [-half, half, half],
    ];

    let vertices = corners
        .iter()
        .map(|c| Vertex::from_position(c[0], c[1], c[2]))
        .collect();

    let indices = vec![
        0, 1, 2, 0, 2, 3, // back
        4, 6, 5, 4, 7, 6, // front
        0, 3, 7, 0, 7, 4, // left
        1, 5, 6, 1, 6, 2, // right
        3, 2, 6, 3, 6, 7, // top
        0, 4, 5, 0, 5, 1, // bottom
    ];

    (vertices, indices)
}

fn main() {
    mesh_index::foundation::logging::init();

    // The app runs a denser grid than the library default
    let config = SpatialConfig {
        grid: GridConfig { dims: [32, 32, 32] },
        ..SpatialConfig::default()
    };

    let (floor_vertices, floor_indices) = floor_mesh(10.0, 10);
    let (box_vertices, box_indices) = box_mesh(1.0);

    let mut meshes = vec![
        SpatialMesh::new(floor_vertices, floor_indices, IndexKind::Grid, &config),
        SpatialMesh::new(box_vertices, box_indices, IndexKind::Octree, &config),
    ];

    // Lift the box two units above the floor; this rebuilds its index
    meshes[1].set_transform(Mat4::new_translation(&Vec3::new(0.0, 2.0, 0.0)));

    // Picking: cast straight down over the box, closest hit across all
    // meshes wins so the box must occlude the floor
    let ray = Ray::new(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -1.0, 0.0));
    let mut best: Option<(usize, RayHit)> = None;
    for (i, mesh) in meshes.iter().enumerate() {
        if let Some(hit) = mesh.raycast(&ray) {
            if best.map_or(true, |(_, b)| hit.t < b.t) {
                best = Some((i, hit));
            }
        }
    }

    match best {
        Some((picked, hit)) => {
            for (i, mesh) in meshes.iter_mut().enumerate() {
                mesh.set_picked(i == picked);
            }
            info!(
                "picked mesh {} at t={:.3} (triangle {})",
                picked, hit.t, hit.triangle
            );
        }
        None => info!("no objects picked"),
    }

    // Collision: walk a probe point downward until its surrounding box
    // reports an overlap with any mesh
    let mut probe = Vec3::new(0.0, 6.0, 0.0);
    let step = Vec3::new(0.0, -0.5, 0.0);
    for _ in 0..16 {
        let next = probe + step;
        let probe_box = Aabb::new(next - Vec3::repeat(0.2), next + Vec3::repeat(0.2));

        if meshes.iter().any(|m| m.overlaps(&probe_box)) {
            info!("collision at y={:.2}, stopping", next.y);
            break;
        }

        probe = next;
        info!("moved probe to y={:.2}", probe.y);
    }

    // The structures are interchangeable: re-index the floor with the
    // octree and confirm the same ray still resolves
    meshes[0].set_index_kind(IndexKind::Octree);
    if let Some(hit) = meshes[0].raycast(&ray) {
        info!("floor re-indexed as octree, same ray hits at t={:.3}", hit.t);
    }
}
