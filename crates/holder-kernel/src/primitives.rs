//! Higher-level primitive builders on top of truck's sweep API.
//!
//! truck has no loft or fillet operator. Straight-sided profiles (rectangles
//! and the polygons standing in for ellipses) are built face by face from
//! planar faces; rounded outlines are lofted from ruled homotopy bands, and a
//! rounded top edge is approximated by a stack of such bands.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use holder_types::Profile2D;
use truck_modeling::builder;
use truck_modeling::topology::{Edge, Face, Shell, Solid, Vertex, Wire};
use truck_modeling::{Point3, Vector3};

use crate::types::KernelError;

/// Straight runs shorter than this are dropped from rounded outlines.
const MIN_SEGMENT: f64 = 1e-9;

/// Number of ruled bands approximating a quarter-round top edge.
pub const TOP_FILLET_BANDS: usize = 6;

/// Edges of the polygon standing in for an ellipse. A multiple of four, so
/// the polygon touches the ellipse at both ends of each axis.
pub const ELLIPSE_SEGMENTS: usize = 32;

/// Corners of the polygon circumscribing an ellipse, counter-clockwise.
///
/// Edge `k` is tangent to the ellipse where its outward normal points at
/// `2πk / ELLIPSE_SEGMENTS`. Every ellipse gets edges in the same directions,
/// so two sections of a loft have pairwise parallel edges and each band
/// between them is planar.
pub fn ellipse_polygon(center: [f64; 2], semi_x: f64, semi_y: f64) -> Vec<[f64; 2]> {
    let n = ELLIPSE_SEGMENTS;
    // Tangent line k: x cos φ + y sin φ = h(φ)
    let line = |k: usize| {
        let phi = 2.0 * PI * k as f64 / n as f64;
        let (s, c) = phi.sin_cos();
        (c, s, (semi_x * c).hypot(semi_y * s))
    };
    (0..n)
        .map(|k| {
            let (c0, s0, h0) = line(k);
            let (c1, s1, h1) = line(k + 1);
            let det = c0 * s1 - s0 * c1;
            [
                center[0] + (h0 * s1 - s0 * h1) / det,
                center[1] + (c0 * h1 - h0 * c1) / det,
            ]
        })
        .collect()
}

/// Corner points of `profile` when it is drawn with straight edges only.
fn polygon_points(profile: &Profile2D) -> Option<Vec<[f64; 2]>> {
    match *profile {
        Profile2D::Ellipse {
            center,
            semi_x,
            semi_y,
        } => Some(ellipse_polygon(center, semi_x, semi_y)),
        Profile2D::Rect { .. } => profile.corners().map(|c| c.to_vec()),
        Profile2D::RoundedRect {
            center,
            width,
            height,
            corner_radius,
        } if corner_radius <= MIN_SEGMENT => Profile2D::rect(center[0], center[1], width, height)
            .corners()
            .map(|c| c.to_vec()),
        Profile2D::RoundedRect { .. } => None,
    }
}

/// Build the boundary wire of `profile` in the plane `z`.
pub fn profile_wire(profile: &Profile2D, z: f64) -> Result<Wire, KernelError> {
    if !profile.is_valid() {
        return Err(KernelError::ProfileFailed {
            reason: format!("degenerate profile {:?}", profile),
        });
    }
    match (polygon_points(profile), *profile) {
        (Some(points), _) => Ok(polygon_wire(&points, z)),
        (
            None,
            Profile2D::RoundedRect {
                center,
                width,
                height,
                corner_radius,
            },
        ) => Ok(rounded_rect_wire(center, width, height, corner_radius, z)),
        (None, other) => Err(KernelError::ProfileFailed {
            reason: format!("no outline for {:?}", other),
        }),
    }
}

/// Closed polygon through `points` (counter-clockwise) at height `z`.
fn polygon_wire(points: &[[f64; 2]], z: f64) -> Wire {
    let vertices: Vec<Vertex> = points
        .iter()
        .map(|p| builder::vertex(Point3::new(p[0], p[1], z)))
        .collect();
    let n = vertices.len();
    (0..n)
        .map(|i| builder::line(&vertices[i], &vertices[(i + 1) % n]))
        .collect()
}

/// Rounded rectangle: four quarter arcs joined by straight runs.
///
/// Zero-length runs are skipped by letting neighbouring arcs share a vertex,
/// so every section of the same rectangle has the same edge count.
fn rounded_rect_wire(center: [f64; 2], width: f64, height: f64, r: f64, z: f64) -> Wire {
    let (hw, hh) = (width / 2.0, height / 2.0);
    // Arc centers counter-clockwise from bottom-right, each arc sweeping 90°.
    let arc_centers = [
        (hw - r, -hh + r),
        (hw - r, hh - r),
        (-hw + r, hh - r),
        (-hw + r, -hh + r),
    ];
    let start_angles = [-FRAC_PI_2, 0.0, FRAC_PI_2, PI];
    // Run following arc k: right, top, left, bottom.
    let run_lengths = [height - 2.0 * r, width - 2.0 * r, height - 2.0 * r, width - 2.0 * r];

    let point = |k: usize, angle: f64| {
        let (cx, cy) = arc_centers[k];
        Point3::new(
            center[0] + cx + r * angle.cos(),
            center[1] + cy + r * angle.sin(),
            z,
        )
    };

    let arc_starts: Vec<Vertex> = (0..4)
        .map(|k| builder::vertex(point(k, start_angles[k])))
        .collect();
    let arc_ends: Vec<Vertex> = (0..4)
        .map(|k| {
            if run_lengths[k] > MIN_SEGMENT {
                builder::vertex(point(k, start_angles[k] + FRAC_PI_2))
            } else {
                arc_starts[(k + 1) % 4].clone()
            }
        })
        .collect();

    let mut edges = Vec::with_capacity(8);
    for k in 0..4 {
        let transit = point(k, start_angles[k] + FRAC_PI_4);
        edges.push(builder::circle_arc(&arc_starts[k], &arc_ends[k], transit));
        if run_lengths[k] > MIN_SEGMENT {
            edges.push(builder::line(&arc_ends[k], &arc_starts[(k + 1) % 4]));
        }
    }
    Wire::from_iter(edges)
}

/// Planar face bounded by `wire`.
fn planar_face(wire: &Wire) -> Result<Face, KernelError> {
    builder::try_attach_plane(&[wire.clone()]).map_err(|e| KernelError::ProfileFailed {
        reason: format!("failed to attach plane: {:?}", e),
    })
}

/// Straight extrusion of a profile along +Z.
pub fn make_prism(profile: &Profile2D, z_base: f64, height: f64) -> Result<Solid, KernelError> {
    if !(height.is_finite() && height > 0.0) {
        return Err(KernelError::ProfileFailed {
            reason: format!("extrusion height must be positive, got {}", height),
        });
    }
    if profile.is_valid() {
        if let Some(points) = polygon_points(profile) {
            return polygon_loft(&[(points.clone(), z_base), (points, z_base + height)]);
        }
    }
    let face = planar_face(&profile_wire(profile, z_base)?)?;
    Ok(builder::tsweep(&face, Vector3::new(0.0, 0.0, height)))
}

/// Closed solid through section wires ordered bottom to top.
///
/// Consecutive sections are joined by ruled bands; the first and last are
/// capped with planar faces. Adjacent wires need equal edge counts.
pub fn loft_solid(sections: &[Wire]) -> Result<Solid, KernelError> {
    let (first, last) = match sections {
        [first, .., last] => (first, last),
        _ => {
            return Err(KernelError::LoftFailed {
                reason: "loft needs at least two sections".to_string(),
            })
        }
    };
    for pair in sections.windows(2) {
        if pair[0].len() != pair[1].len() {
            return Err(KernelError::LoftFailed {
                reason: format!(
                    "adjacent sections have {} and {} edges",
                    pair[0].len(),
                    pair[1].len()
                ),
            });
        }
    }

    let mut faces: Vec<Face> = Vec::new();
    faces.push(planar_face(first)?.inverse());
    for pair in sections.windows(2) {
        let band: Shell =
            builder::try_wire_homotopy(&pair[0], &pair[1]).map_err(|e| KernelError::LoftFailed {
                reason: format!("ruled band failed: {:?}", e),
            })?;
        faces.extend(band.face_iter().cloned());
    }
    faces.push(planar_face(last)?);

    let shell: Shell = faces.into_iter().collect();
    Solid::try_new(vec![shell]).map_err(|e| KernelError::LoftFailed {
        reason: format!("loft shell is not a closed solid: {:?}", e),
    })
}

/// Closed polyhedron through counter-clockwise point rings ordered bottom
/// to top. Every face, caps and side quads alike, is a plane, so corner `i`
/// of one ring must lie in the plane of edge `i` of the next.
pub fn polygon_loft(rings: &[(Vec<[f64; 2]>, f64)]) -> Result<Solid, KernelError> {
    let n = match rings {
        [(first, _), _, ..] => first.len(),
        _ => {
            return Err(KernelError::LoftFailed {
                reason: "loft needs at least two sections".to_string(),
            })
        }
    };
    if n < 3 || rings.iter().any(|(points, _)| points.len() != n) {
        return Err(KernelError::LoftFailed {
            reason: "sections must be polygons with the same corner count".to_string(),
        });
    }

    let corners: Vec<Vec<Vertex>> = rings
        .iter()
        .map(|(points, z)| {
            points
                .iter()
                .map(|p| builder::vertex(Point3::new(p[0], p[1], *z)))
                .collect()
        })
        .collect();
    let around: Vec<Vec<Edge>> = corners
        .iter()
        .map(|ring| (0..n).map(|i| builder::line(&ring[i], &ring[(i + 1) % n])).collect())
        .collect();
    let up: Vec<Vec<Edge>> = corners
        .windows(2)
        .map(|pair| (0..n).map(|i| builder::line(&pair[0][i], &pair[1][i])).collect())
        .collect();

    let mut faces: Vec<Face> = Vec::with_capacity(n * up.len() + 2);
    let bottom: Wire = around[0].iter().cloned().collect();
    faces.push(planar_face(&bottom)?.inverse());
    for (level, rises) in up.iter().enumerate() {
        for i in 0..n {
            let quad: Wire = [
                around[level][i].clone(),
                rises[(i + 1) % n].clone(),
                around[level + 1][i].inverse(),
                rises[i].inverse(),
            ]
            .into_iter()
            .collect();
            faces.push(planar_face(&quad)?);
        }
    }
    let top: Wire = around[around.len() - 1].iter().cloned().collect();
    faces.push(planar_face(&top)?);

    let shell: Shell = faces.into_iter().collect();
    Solid::try_new(vec![shell]).map_err(|e| KernelError::LoftFailed {
        reason: format!("loft shell is not a closed solid: {:?}", e),
    })
}

/// Loft through `(profile, z)` sections.
///
/// Straight-sided sections are joined by planar faces, anything with arcs by
/// ruled bands.
pub fn make_loft(sections: &[(Profile2D, f64)]) -> Result<Solid, KernelError> {
    if sections.windows(2).any(|pair| pair[1].1 <= pair[0].1) {
        return Err(KernelError::LoftFailed {
            reason: "section heights must strictly increase".to_string(),
        });
    }
    if let Some((bad, _)) = sections.iter().find(|(p, _)| !p.is_valid()) {
        return Err(KernelError::ProfileFailed {
            reason: format!("degenerate profile {:?}", bad),
        });
    }
    let rings: Option<Vec<(Vec<[f64; 2]>, f64)>> = sections
        .iter()
        .map(|(profile, z)| polygon_points(profile).map(|points| (points, *z)))
        .collect();
    if let Some(rings) = rings {
        return polygon_loft(&rings);
    }
    let wires = sections
        .iter()
        .map(|(profile, z)| profile_wire(profile, *z))
        .collect::<Result<Vec<_>, _>>()?;
    loft_solid(&wires)
}

/// Axis-aligned block with optionally rounded vertical edges and top perimeter.
///
/// `footprint` must be an unrotated rectangle. The top round is a quarter
/// circle of `top_radius` sampled with `TOP_FILLET_BANDS` ruled bands; each
/// section shrinks the footprint and its corner radius by the same inset.
pub fn make_rounded_block(
    footprint: &Profile2D,
    z_base: f64,
    height: f64,
    corner_radius: f64,
    top_radius: f64,
) -> Result<Solid, KernelError> {
    let (lo, hi) = footprint.extents();
    let center = [(lo[0] + hi[0]) / 2.0, (lo[1] + hi[1]) / 2.0];
    let (width, depth) = (hi[0] - lo[0], hi[1] - lo[1]);
    let section = |inset: f64| {
        Profile2D::rounded_rect(
            center[0],
            center[1],
            width - 2.0 * inset,
            depth - 2.0 * inset,
            (corner_radius - inset).max(0.0),
        )
    };

    if top_radius <= 0.0 {
        return make_prism(&section(0.0), z_base, height);
    }

    let shoulder = z_base + height - top_radius;
    let mut sections = vec![(section(0.0), z_base)];
    if shoulder - z_base > MIN_SEGMENT {
        sections.push((section(0.0), shoulder));
    }
    for k in 1..=TOP_FILLET_BANDS {
        let theta = FRAC_PI_2 * k as f64 / TOP_FILLET_BANDS as f64;
        let inset = top_radius * (1.0 - theta.cos());
        sections.push((section(inset), shoulder + top_radius * theta.sin()));
    }
    make_loft(&sections)
}
