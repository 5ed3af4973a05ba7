//! Verification oracles: pure functions returning pass/fail verdicts.
//!
//! Each oracle returns an `OracleVerdict` with diagnostic detail, not panics.
//! This lets a test collect all failures in one pass.

use std::collections::HashMap;

use holder_kernel::{BoundingBox, KernelIntrospect, KernelSolidHandle, RenderMesh};
use serde::Serialize;

use crate::helpers::{mesh_bounding_box, mesh_volume, triangle_area};

/// The result of a single oracle check.
#[derive(Debug, Clone, Serialize)]
pub struct OracleVerdict {
    pub oracle_name: String,
    pub passed: bool,
    pub detail: String,
    pub value: Option<f64>,
}

impl OracleVerdict {
    fn pass(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: true,
            detail,
            value: None,
        }
    }

    fn pass_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::pass(name, detail)
        }
    }

    fn fail(name: &str, detail: String) -> Self {
        Self {
            oracle_name: name.to_string(),
            passed: false,
            detail,
            value: None,
        }
    }

    fn fail_val(name: &str, detail: String, value: f64) -> Self {
        Self {
            value: Some(value),
            ..Self::fail(name, detail)
        }
    }
}

// ── Solid Oracles ───────────────────────────────────────────────────────────

/// Check that a solid is one closed volume.
pub fn check_single_shell(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
) -> OracleVerdict {
    match introspect.shell_count(solid) {
        1 => OracleVerdict::pass("single_shell", "one boundary shell".to_string()),
        n => OracleVerdict::fail_val("single_shell", format!("{} boundary shells", n), n as f64),
    }
}

/// Check that the kernel holds exactly `expected` solids, i.e. nothing leaked.
pub fn check_live_solids(introspect: &dyn KernelIntrospect, expected: usize) -> OracleVerdict {
    let live = introspect.live_solids();
    if live == expected {
        OracleVerdict::pass("live_solids", format!("{} live solids", live))
    } else {
        OracleVerdict::fail_val(
            "live_solids",
            format!("expected {} live solids, found {}", expected, live),
            live as f64,
        )
    }
}

/// Check a solid's bounding box against the expected one.
pub fn check_solid_bounds(
    introspect: &dyn KernelIntrospect,
    solid: &KernelSolidHandle,
    expected: &BoundingBox,
    tolerance: f64,
) -> OracleVerdict {
    match introspect.bounding_box(solid) {
        None => OracleVerdict::fail("solid_bounds", "solid has no bounding box".to_string()),
        Some(actual) if actual.approx_eq(expected, tolerance) => OracleVerdict::pass(
            "solid_bounds",
            format!("{:?} -> {:?}", actual.min, actual.max),
        ),
        Some(actual) => OracleVerdict::fail(
            "solid_bounds",
            format!(
                "expected {:?} -> {:?}, got {:?} -> {:?} (tol={})",
                expected.min, expected.max, actual.min, actual.max, tolerance
            ),
        ),
    }
}

// ── Mesh Oracles ────────────────────────────────────────────────────────────

/// Check that the mesh is watertight: every triangle edge shared by exactly 2 triangles.
///
/// Uses position-based edge matching (quantized to 1e-4) to handle meshes with
/// per-face vertices (non-shared vertex indices but shared positions).
pub fn check_watertight_mesh(mesh: &RenderMesh) -> OracleVerdict {
    type Key = (i64, i64, i64);

    fn quantize(v: f32) -> i64 {
        (v as f64 * 10000.0).round() as i64
    }

    fn vert_key(mesh: &RenderMesh, idx: u32) -> Key {
        let i = idx as usize * 3;
        (
            quantize(mesh.vertices[i]),
            quantize(mesh.vertices[i + 1]),
            quantize(mesh.vertices[i + 2]),
        )
    }

    let vertex_count = mesh.vertices.len() / 3;
    let mut edge_counts: HashMap<(Key, Key), usize> = HashMap::new();

    for tri in mesh.indices.chunks_exact(3) {
        if tri.iter().any(|&i| i as usize >= vertex_count) {
            continue;
        }
        let keys = [
            vert_key(mesh, tri[0]),
            vert_key(mesh, tri[1]),
            vert_key(mesh, tri[2]),
        ];
        for k in 0..3 {
            let (a, b) = (keys[k], keys[(k + 1) % 3]);
            *edge_counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
        }
    }

    let non_paired = edge_counts.values().filter(|&&c| c != 2).count();

    if non_paired == 0 {
        OracleVerdict::pass(
            "watertight_mesh",
            format!("all {} edges paired", edge_counts.len()),
        )
    } else {
        OracleVerdict::fail_val(
            "watertight_mesh",
            format!(
                "{} unpaired edges out of {} total",
                non_paired,
                edge_counts.len()
            ),
            non_paired as f64,
        )
    }
}

/// Check that no triangles have zero area (degenerate).
pub fn check_no_degenerate_triangles(mesh: &RenderMesh) -> OracleVerdict {
    let total = mesh.triangle_count();
    let degenerate = mesh
        .indices
        .chunks_exact(3)
        .filter(|tri| triangle_area(mesh, tri).is_some_and(|area| area < 1e-12))
        .count();

    if degenerate == 0 {
        OracleVerdict::pass(
            "no_degenerate_triangles",
            format!("all {} triangles have non-zero area", total),
        )
    } else {
        OracleVerdict::fail(
            "no_degenerate_triangles",
            format!("{} of {} triangles are degenerate", degenerate, total),
        )
    }
}

/// Check that all stored normals have approximately unit length.
pub fn check_unit_normals(mesh: &RenderMesh) -> OracleVerdict {
    let vertex_count = mesh.normals.len() / 3;
    let bad = mesh
        .normals
        .chunks_exact(3)
        .filter(|n| ((n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt() - 1.0).abs() > 0.01)
        .count();

    if bad == 0 {
        OracleVerdict::pass(
            "unit_normals",
            format!("all {} normals are unit length", vertex_count),
        )
    } else {
        OracleVerdict::fail(
            "unit_normals",
            format!("{} of {} normals are not unit length", bad, vertex_count),
        )
    }
}

/// Check that face ranges cover all indices without gaps or overlaps.
pub fn check_face_range_coverage(mesh: &RenderMesh) -> OracleVerdict {
    let ranges = &mesh.face_ranges;
    let total_indices = mesh.indices.len() as u32;

    if ranges.is_empty() {
        return OracleVerdict::fail("face_range_coverage", "no face ranges defined".to_string());
    }

    let mut expected_start = 0u32;
    for (i, fr) in ranges.iter().enumerate() {
        if fr.start_index != expected_start {
            return OracleVerdict::fail(
                "face_range_coverage",
                format!(
                    "gap/overlap at range {}: expected start={}, got start={}",
                    i, expected_start, fr.start_index
                ),
            );
        }
        if fr.end_index <= fr.start_index {
            return OracleVerdict::fail(
                "face_range_coverage",
                format!("empty range at index {}", i),
            );
        }
        expected_start = fr.end_index;
    }

    if expected_start != total_indices {
        return OracleVerdict::fail(
            "face_range_coverage",
            format!(
                "ranges end at {} but mesh has {} indices",
                expected_start, total_indices
            ),
        );
    }

    OracleVerdict::pass(
        "face_range_coverage",
        format!("{} ranges, no gaps", ranges.len()),
    )
}

/// Check that all index values are within bounds.
pub fn check_valid_indices(mesh: &RenderMesh) -> OracleVerdict {
    let vertex_count = mesh.vertices.len() / 3;
    let bad: Vec<(usize, u32)> = mesh
        .indices
        .iter()
        .enumerate()
        .filter(|(_, &idx)| idx as usize >= vertex_count)
        .map(|(i, &idx)| (i, idx))
        .collect();

    if bad.is_empty() {
        OracleVerdict::pass("valid_indices", format!("all indices < {}", vertex_count))
    } else {
        OracleVerdict::fail(
            "valid_indices",
            format!(
                "{} out-of-bounds indices (vertex_count={}): {:?}",
                bad.len(),
                vertex_count,
                &bad[..bad.len().min(5)]
            ),
        )
    }
}

/// Check that the mesh bounding box matches the expected box.
pub fn check_bounding_box(
    mesh: &RenderMesh,
    expected: &BoundingBox,
    tolerance: f64,
) -> OracleVerdict {
    let Some((min, max)) = mesh_bounding_box(mesh) else {
        return OracleVerdict::fail("bounding_box", "mesh has no vertices".to_string());
    };
    let actual = BoundingBox::new(min.map(f64::from), max.map(f64::from));

    if actual.approx_eq(expected, tolerance) {
        OracleVerdict::pass(
            "bounding_box",
            format!(
                "({:.1},{:.1},{:.1}) -> ({:.1},{:.1},{:.1})",
                min[0], min[1], min[2], max[0], max[1], max[2],
            ),
        )
    } else {
        OracleVerdict::fail(
            "bounding_box",
            format!(
                "expected {:?} -> {:?}, got {:?} -> {:?} (tol={})",
                expected.min, expected.max, min, max, tolerance
            ),
        )
    }
}

/// Check that the enclosed volume lies in `[min, max]`.
pub fn check_volume_range(mesh: &RenderMesh, min: f64, max: f64) -> OracleVerdict {
    let volume = mesh_volume(mesh);
    if (min..=max).contains(&volume) {
        OracleVerdict::pass_val("volume", format!("{:.3} in [{}, {}]", volume, min, max), volume)
    } else {
        OracleVerdict::fail_val(
            "volume",
            format!("{:.3} outside [{}, {}]", volume, min, max),
            volume,
        )
    }
}

// ── Composite ───────────────────────────────────────────────────────────────

/// Run all structural mesh checks.
/// Verdicts as a pretty JSON array, for attaching to failing test output.
pub fn verdicts_to_json(verdicts: &[OracleVerdict]) -> String {
    serde_json::to_string_pretty(verdicts).unwrap_or_else(|e| format!("<unserializable: {}>", e))
}

pub fn run_all_mesh_checks(mesh: &RenderMesh) -> Vec<OracleVerdict> {
    vec![
        check_watertight_mesh(mesh),
        check_no_degenerate_triangles(mesh),
        check_unit_normals(mesh),
        check_face_range_coverage(mesh),
        check_valid_indices(mesh),
    ]
}
