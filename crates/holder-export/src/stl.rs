//! STL export from RenderMesh, binary and ASCII.

use holder_kernel::RenderMesh;

use crate::errors::ExportError;

/// Reject meshes that cannot be written as STL.
fn check_mesh(mesh: &RenderMesh) -> Result<usize, ExportError> {
    let tri_count = mesh.triangle_count();
    if tri_count == 0 {
        return Err(ExportError::StlError {
            reason: "mesh has no triangles".to_string(),
        });
    }
    let vertex_count = mesh.vertices.len() / 3;
    if let Some(&idx) = mesh.indices.iter().find(|&&i| i as usize >= vertex_count) {
        return Err(ExportError::StlError {
            reason: format!(
                "index {} out of range (vertex count = {})",
                idx, vertex_count
            ),
        });
    }
    Ok(tri_count)
}

fn vertex(mesh: &RenderMesh, idx: u32) -> [f32; 3] {
    let i = idx as usize * 3;
    [mesh.vertices[i], mesh.vertices[i + 1], mesh.vertices[i + 2]]
}

/// Unit facet normal from the winding; +Z for a degenerate triangle.
fn facet_normal([a, b, c]: [[f32; 3]; 3]) -> [f32; 3] {
    let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let n = [
        e1[1] * e2[2] - e1[2] * e2[1],
        e1[2] * e2[0] - e1[0] * e2[2],
        e1[0] * e2[1] - e1[1] * e2[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > 1e-12 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0, 0.0, 1.0]
    }
}

fn triangles(mesh: &RenderMesh) -> impl Iterator<Item = [[f32; 3]; 3]> + '_ {
    mesh.indices
        .chunks_exact(3)
        .map(|tri| [vertex(mesh, tri[0]), vertex(mesh, tri[1]), vertex(mesh, tri[2])])
}

/// Export a RenderMesh as a binary STL file.
///
/// Binary STL format:
/// - 80-byte header (arbitrary text)
/// - u32 triangle count (little-endian)
/// - For each triangle: 3×f32 normal + 3×(3×f32 vertex) + u16 attribute = 50 bytes
pub fn export_binary_stl(mesh: &RenderMesh, name: &str) -> Result<Vec<u8>, ExportError> {
    let tri_count = check_mesh(mesh)?;
    let mut buf = Vec::with_capacity(84 + tri_count * 50);

    let header = format!("binary STL: {}", name);
    let header_bytes = header.as_bytes();
    buf.extend_from_slice(&header_bytes[..header_bytes.len().min(80)]);
    buf.resize(80, 0u8);
    buf.extend_from_slice(&(tri_count as u32).to_le_bytes());

    for tri in triangles(mesh) {
        let normal = facet_normal(tri);
        for c in normal.iter().chain(tri.iter().flatten()) {
            buf.extend_from_slice(&c.to_le_bytes());
        }
        buf.extend_from_slice(&0u16.to_le_bytes());
    }

    Ok(buf)
}

/// Export a RenderMesh as an ASCII STL string.
pub fn export_ascii_stl(mesh: &RenderMesh, name: &str) -> Result<String, ExportError> {
    let tri_count = check_mesh(mesh)?;
    let mut out = String::with_capacity(tri_count * 300);
    out.push_str(&format!("solid {}\n", name));

    for tri in triangles(mesh) {
        let [nx, ny, nz] = facet_normal(tri);
        out.push_str(&format!("  facet normal {} {} {}\n", nx, ny, nz));
        out.push_str("    outer loop\n");
        for [x, y, z] in tri {
            out.push_str(&format!("      vertex {} {} {}\n", x, y, z));
        }
        out.push_str("    endloop\n");
        out.push_str("  endfacet\n");
    }

    out.push_str(&format!("endsolid {}\n", name));
    Ok(out)
}
