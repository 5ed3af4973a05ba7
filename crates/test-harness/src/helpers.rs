//! Helper functions: error type and mesh math.

use std::collections::HashMap;

use holder_kernel::{KernelError, RenderMesh};
use holder_model::ModelError;

// ── Error Type ──────────────────────────────────────────────────────────────

/// Unified error type for the test harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("model error: {0}")]
    Model(#[from] ModelError),

    #[error("kernel error: {0}")]
    Kernel(#[from] KernelError),

    #[error("nothing composed yet")]
    NoSolid,

    #[error("oracle failure ({oracle}): {detail}")]
    OracleFailure { oracle: String, detail: String },
}

// ── Mesh Math Utilities ─────────────────────────────────────────────────────

/// Axis-aligned bounding box of a RenderMesh as (min, max), or None for an
/// empty mesh.
pub fn mesh_bounding_box(mesh: &RenderMesh) -> Option<([f32; 3], [f32; 3])> {
    if mesh.vertices.len() < 3 {
        return None;
    }
    let mut min = [f32::MAX; 3];
    let mut max = [f32::MIN; 3];
    for chunk in mesh.vertices.chunks_exact(3) {
        for i in 0..3 {
            min[i] = min[i].min(chunk[i]);
            max[i] = max[i].max(chunk[i]);
        }
    }
    Some((min, max))
}

fn triangle(mesh: &RenderMesh, tri: &[u32]) -> Option<[[f64; 3]; 3]> {
    let verts = &mesh.vertices;
    let mut out = [[0.0; 3]; 3];
    for (slot, &idx) in out.iter_mut().zip(tri) {
        let i = idx as usize * 3;
        if i + 2 >= verts.len() {
            return None;
        }
        *slot = [verts[i] as f64, verts[i + 1] as f64, verts[i + 2] as f64];
    }
    Some(out)
}

/// Compute the signed volume of a triangle mesh using the divergence theorem.
///
/// For a closed (watertight) mesh, this returns the enclosed volume.
/// For open meshes, the result may be meaningless.
pub fn mesh_volume(mesh: &RenderMesh) -> f64 {
    let mut volume = 0.0f64;
    for tri in mesh.indices.chunks_exact(3) {
        let Some([a, b, c]) = triangle(mesh, tri) else {
            continue;
        };
        // Signed volume of tetrahedron formed by triangle and origin
        volume += a[0] * (b[1] * c[2] - c[1] * b[2])
            + b[0] * (c[1] * a[2] - a[1] * c[2])
            + c[0] * (a[1] * b[2] - b[1] * a[2]);
    }
    volume / 6.0
}

/// Area of one triangle, or None if it indexes past the vertex array.
pub fn triangle_area(mesh: &RenderMesh, tri: &[u32]) -> Option<f64> {
    let [a, b, c] = triangle(mesh, tri)?;
    let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let cx = e1[1] * e2[2] - e1[2] * e2[1];
    let cy = e1[2] * e2[0] - e1[0] * e2[2];
    let cz = e1[0] * e2[1] - e1[1] * e2[0];
    Some((cx * cx + cy * cy + cz * cz).sqrt() / 2.0)
}

/// Compute the total surface area of a triangle mesh.
pub fn mesh_surface_area(mesh: &RenderMesh) -> f64 {
    mesh.indices
        .chunks_exact(3)
        .filter_map(|tri| triangle_area(mesh, tri))
        .sum()
}

/// Count mesh edges: returns (total_edges, boundary_edges).
///
/// A boundary edge is shared by exactly 1 triangle (not 2).
/// For a watertight mesh, boundary_edges should be 0.
pub fn count_mesh_edges(mesh: &RenderMesh) -> (usize, usize) {
    let mut edge_counts: HashMap<(u32, u32), usize> = HashMap::new();

    for tri in mesh.indices.chunks_exact(3) {
        for &(a, b) in &[(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
            let key = (a.min(b), a.max(b));
            *edge_counts.entry(key).or_insert(0) += 1;
        }
    }

    let total = edge_counts.len();
    let boundary = edge_counts.values().filter(|&&c| c == 1).count();
    (total, boundary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> RenderMesh {
        RenderMesh {
            vertices: vec![
                0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 1.0,
                0.0, 1.0, 1.0, 1.0, 1.0, 0.0, 1.0, 1.0,
            ],
            normals: vec![0.0; 24],
            indices: vec![
                0, 2, 1, 0, 3, 2, // bottom
                4, 5, 6, 4, 6, 7, // top
                0, 1, 5, 0, 5, 4, // front
                2, 3, 7, 2, 7, 6, // back
                0, 4, 7, 0, 7, 3, // left
                1, 2, 6, 1, 6, 5, // right
            ],
            face_ranges: vec![],
        }
    }

    #[test]
    fn bounding_box_of_unit_cube_mesh() {
        let (min, max) = mesh_bounding_box(&unit_cube()).unwrap();
        assert_eq!(min, [0.0, 0.0, 0.0]);
        assert_eq!(max, [1.0, 1.0, 1.0]);
        assert!(mesh_bounding_box(&RenderMesh::default()).is_none());
    }

    #[test]
    fn outward_cube_has_positive_unit_volume() {
        let volume = mesh_volume(&unit_cube());
        assert!((volume - 1.0).abs() < 1e-12, "volume {}", volume);
    }

    #[test]
    fn surface_area_of_unit_cube() {
        let area = mesh_surface_area(&unit_cube());
        assert!(
            (area - 6.0).abs() < 1e-10,
            "Unit cube area should be 6.0, got {}",
            area
        );
    }

    #[test]
    fn mesh_edge_counts_unit_cube() {
        let (total, boundary) = count_mesh_edges(&unit_cube());
        // 12 cube edges + 6 diagonals from triangulation
        assert_eq!(total, 18);
        assert_eq!(boundary, 0, "Watertight cube should have 0 boundary edges");
    }
}
