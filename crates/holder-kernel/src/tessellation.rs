//! Tessellation wrapper with face-range metadata.
//!
//! Wraps truck-meshalgo to produce a RenderMesh whose FaceRange entries map
//! triangle index ranges back to faces of the solid.

use crate::types::{BoundingBox, FaceRange, KernelError, RenderMesh};
use truck_meshalgo::prelude::*;
use truck_meshalgo::tessellation::{MeshableShape, MeshedShape};

type TruckSolid = truck_modeling::Solid;

/// Tessellate a truck Solid into a RenderMesh with per-face tracking.
pub fn tessellate_solid(
    solid: &TruckSolid,
    tolerance: f64,
) -> std::result::Result<RenderMesh, KernelError> {
    if !(tolerance.is_finite() && tolerance > 0.0) {
        return Err(KernelError::TessellationFailed {
            reason: format!("tolerance must be positive, got {}", tolerance),
        });
    }
    let meshed_solid = solid.triangulation(tolerance);

    let mut mesh = RenderMesh::default();
    let mut face_index = 0u32;

    for shell in meshed_solid.boundaries().iter() {
        for face in shell.face_iter() {
            let index = face_index;
            face_index += 1;

            let maybe_mesh: Option<PolygonMesh> = face.surface();
            let Some(mut face_mesh) = maybe_mesh else {
                continue;
            };
            // An inverted face carries an inverted mesh
            if !face.orientation() {
                face_mesh.invert();
            }

            let start_index = mesh.indices.len() as u32;
            append_polygon(&mut mesh, &face_mesh);
            let end_index = mesh.indices.len() as u32;
            if end_index > start_index {
                mesh.face_ranges.push(FaceRange {
                    face_index: index,
                    start_index,
                    end_index,
                });
            }
        }
    }

    // Fallback if no face produced triangles
    if mesh.indices.is_empty() {
        return tessellate_solid_merged(solid, tolerance);
    }
    Ok(mesh)
}

/// Append positions, normals and triangles of `polygon` to `mesh`.
fn append_polygon(mesh: &mut RenderMesh, polygon: &PolygonMesh) {
    let base_vertex = (mesh.vertices.len() / 3) as u32;
    let positions = polygon.positions();
    let normals = polygon.normals();

    for pos in positions {
        mesh.vertices
            .extend_from_slice(&[pos[0] as f32, pos[1] as f32, pos[2] as f32]);
    }
    if normals.len() == positions.len() {
        for n in normals {
            mesh.normals
                .extend_from_slice(&[n[0] as f32, n[1] as f32, n[2] as f32]);
        }
    } else {
        for _ in positions {
            mesh.normals.extend_from_slice(&[0.0, 0.0, 1.0]);
        }
    }
    for tri in polygon.tri_faces() {
        for v in tri.iter() {
            mesh.indices.push(v.pos as u32 + base_vertex);
        }
    }
}

/// Fallback tessellation: merge everything into a single PolygonMesh.
fn tessellate_solid_merged(
    solid: &TruckSolid,
    tolerance: f64,
) -> std::result::Result<RenderMesh, KernelError> {
    let polygon = solid.triangulation(tolerance).to_polygon();
    let mut mesh = RenderMesh::default();
    append_polygon(&mut mesh, &polygon);
    if mesh.indices.is_empty() {
        return Err(KernelError::TessellationFailed {
            reason: "solid produced no triangles".to_string(),
        });
    }
    mesh.face_ranges.push(FaceRange {
        face_index: 0,
        start_index: 0,
        end_index: mesh.indices.len() as u32,
    });
    Ok(mesh)
}

/// Bounding box of every tessellated position of `solid`.
pub fn mesh_bounds(solid: &TruckSolid, tolerance: f64) -> Option<BoundingBox> {
    let polygon = solid.triangulation(tolerance).to_polygon();
    let positions = polygon.positions();
    if positions.is_empty() {
        return None;
    }
    let mut min = [f64::MAX; 3];
    let mut max = [f64::MIN; 3];
    for p in positions {
        for i in 0..3 {
            min[i] = min[i].min(p[i]);
            max[i] = max[i].max(p[i]);
        }
    }
    Some(BoundingBox::new(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::make_prism;
    use holder_types::Profile2D;

    #[test]
    fn test_mesh_bounds_of_prism() {
        let solid = make_prism(&Profile2D::rect(1.0, 0.0, 4.0, 2.0), 0.5, 3.0).unwrap();
        let bbox: BoundingBox = mesh_bounds(&solid, 0.01).unwrap();
        assert!(bbox.approx_eq(&BoundingBox::new([-1.0, -1.0, 0.5], [3.0, 1.0, 3.5]), 1e-9));
    }

    #[test]
    fn test_face_ranges_cover_polygon_prism() {
        let solid = make_prism(&Profile2D::ellipse(0.0, 0.0, 3.0, 2.0), 0.0, 2.0).unwrap();
        let mesh = tessellate_solid(&solid, 0.05).unwrap();
        assert_eq!(mesh.face_ranges.len(), crate::primitives::ELLIPSE_SEGMENTS + 2);
        assert_eq!(
            mesh.face_ranges.last().map(|r| r.end_index),
            Some(mesh.indices.len() as u32)
        );
    }
}
