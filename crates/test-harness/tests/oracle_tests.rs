//! Tests for verification oracles.

use holder_kernel::{BoundingBox, FaceRange, Kernel, MockKernel, Profile2D, RenderMesh};
use test_harness::oracle::*;

/// A MockKernel box mesh, 10 x 6 x 4, standing on z = 0.
fn mock_box_mesh() -> RenderMesh {
    let mut kernel = MockKernel::new();
    let handle = kernel
        .extrude_profile(&Profile2D::rect(0.0, 0.0, 10.0, 6.0), 0.0, 4.0)
        .unwrap();
    kernel.tessellate(&handle, 0.1).unwrap()
}

// ── Mesh Oracle Tests ───────────────────────────────────────────────────

#[test]
fn all_mesh_checks_pass_for_box() {
    let mesh = mock_box_mesh();
    for v in run_all_mesh_checks(&mesh) {
        assert!(v.passed, "oracle '{}' failed: {}", v.oracle_name, v.detail);
    }
}

#[test]
fn watertight_fails_with_missing_triangle() {
    let mut mesh = mock_box_mesh();
    mesh.indices.truncate(mesh.indices.len() - 3);
    let result = check_watertight_mesh(&mesh);
    assert!(!result.passed);
    assert_eq!(result.value, Some(3.0));
}

#[test]
fn degenerate_triangle_detected() {
    let mesh = RenderMesh {
        vertices: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0],
        indices: vec![0, 1, 2],
        ..Default::default()
    };
    assert!(!check_no_degenerate_triangles(&mesh).passed);
}

#[test]
fn short_normals_detected() {
    let mut mesh = mock_box_mesh();
    mesh.normals[0] *= 0.5;
    assert!(!check_unit_normals(&mesh).passed);
}

#[test]
fn face_range_gap_detected() {
    let mut mesh = mock_box_mesh();
    mesh.face_ranges.remove(2);
    assert!(!check_face_range_coverage(&mesh).passed);

    mesh.face_ranges.clear();
    assert!(!check_face_range_coverage(&mesh).passed);
}

#[test]
fn face_range_overrun_detected() {
    let mut mesh = mock_box_mesh();
    let total = mesh.indices.len() as u32;
    mesh.face_ranges.push(FaceRange {
        face_index: 6,
        start_index: total,
        end_index: total + 3,
    });
    assert!(!check_face_range_coverage(&mesh).passed);
}

#[test]
fn invalid_index_detected() {
    let mut mesh = mock_box_mesh();
    mesh.indices[0] = 99;
    let result = check_valid_indices(&mesh);
    assert!(!result.passed);
    assert!(result.detail.contains("vertex_count=8"));
}

#[test]
fn bounding_box_oracle() {
    let mesh = mock_box_mesh();
    let expected = BoundingBox::new([-5.0, -3.0, 0.0], [5.0, 3.0, 4.0]);
    assert!(check_bounding_box(&mesh, &expected, 1e-6).passed);

    let taller = BoundingBox::new([-5.0, -3.0, 0.0], [5.0, 3.0, 4.6]);
    let result = check_bounding_box(&mesh, &taller, 0.1);
    assert!(!result.passed);
    assert!(result.detail.contains("expected"));
}

#[test]
fn volume_oracle() {
    let mesh = mock_box_mesh();
    let result = check_volume_range(&mesh, 239.0, 241.0);
    assert!(result.passed, "{}", result.detail);
    assert!((result.value.unwrap() - 240.0).abs() < 1e-3);
    assert!(!check_volume_range(&mesh, 0.0, 100.0).passed);
}

// ── Solid Oracle Tests ──────────────────────────────────────────────────

#[test]
fn solid_oracles_on_mock_kernel() {
    let mut kernel = MockKernel::new();
    let handle = kernel
        .extrude_profile(&Profile2D::rect(0.0, 0.0, 10.0, 6.0), 0.0, 4.0)
        .unwrap();
    assert!(check_single_shell(&kernel, &handle).passed);
    assert!(check_live_solids(&kernel, 1).passed);
    assert!(!check_live_solids(&kernel, 0).passed);

    let expected = BoundingBox::new([-5.0, -3.0, 0.0], [5.0, 3.0, 4.0]);
    assert!(check_solid_bounds(&kernel, &handle, &expected, 1e-9).passed);

    kernel.release(handle);
    assert!(check_live_solids(&kernel, 0).passed);
}

#[test]
fn verdict_report_is_json_array() {
    let verdicts = run_all_mesh_checks(&mock_box_mesh());
    let report = verdicts_to_json(&verdicts);
    let parsed: serde_json::Value = serde_json::from_str(&report).unwrap();
    let entries = parsed.as_array().unwrap();
    assert_eq!(entries.len(), verdicts.len());
    assert_eq!(entries[0]["passed"], serde_json::Value::Bool(true));
}
