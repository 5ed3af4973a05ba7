use serde::{Deserialize, Serialize};

/// A closed planar profile in the XY plane.
///
/// Profiles are placed at a Z height by the kernel operation that consumes
/// them (extrude or loft). All boundaries run counter-clockwise seen from +Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Profile2D {
    /// Axis-aligned ellipse.
    Ellipse {
        center: [f64; 2],
        semi_x: f64,
        semi_y: f64,
    },
    /// Rectangle rotated about its own center.
    Rect {
        center: [f64; 2],
        width: f64,
        height: f64,
        angle_deg: f64,
    },
    /// Axis-aligned rectangle with circular corners.
    RoundedRect {
        center: [f64; 2],
        width: f64,
        height: f64,
        corner_radius: f64,
    },
}

impl Profile2D {
    pub fn ellipse(cx: f64, cy: f64, semi_x: f64, semi_y: f64) -> Self {
        Profile2D::Ellipse {
            center: [cx, cy],
            semi_x,
            semi_y,
        }
    }

    pub fn rect(cx: f64, cy: f64, width: f64, height: f64) -> Self {
        Self::rotated_rect(cx, cy, width, height, 0.0)
    }

    pub fn rotated_rect(cx: f64, cy: f64, width: f64, height: f64, angle_deg: f64) -> Self {
        Profile2D::Rect {
            center: [cx, cy],
            width,
            height,
            angle_deg,
        }
    }

    pub fn rounded_rect(cx: f64, cy: f64, width: f64, height: f64, corner_radius: f64) -> Self {
        Profile2D::RoundedRect {
            center: [cx, cy],
            width,
            height,
            corner_radius,
        }
    }

    pub fn center(&self) -> [f64; 2] {
        match *self {
            Profile2D::Ellipse { center, .. }
            | Profile2D::Rect { center, .. }
            | Profile2D::RoundedRect { center, .. } => center,
        }
    }

    /// Semi-axes of an ellipse profile.
    pub fn semi_axes(&self) -> Option<[f64; 2]> {
        match *self {
            Profile2D::Ellipse { semi_x, semi_y, .. } => Some([semi_x, semi_y]),
            _ => None,
        }
    }

    /// Offset the boundary outward by `delta` (inward when negative).
    ///
    /// Ellipses grow each semi-axis by `delta`, which is what a 45° funnel
    /// wall produces per unit of height.
    pub fn grown(&self, delta: f64) -> Self {
        match *self {
            Profile2D::Ellipse {
                center,
                semi_x,
                semi_y,
            } => Profile2D::Ellipse {
                center,
                semi_x: semi_x + delta,
                semi_y: semi_y + delta,
            },
            Profile2D::Rect {
                center,
                width,
                height,
                angle_deg,
            } => Profile2D::Rect {
                center,
                width: width + 2.0 * delta,
                height: height + 2.0 * delta,
                angle_deg,
            },
            Profile2D::RoundedRect {
                center,
                width,
                height,
                corner_radius,
            } => Profile2D::RoundedRect {
                center,
                width: width + 2.0 * delta,
                height: height + 2.0 * delta,
                corner_radius: (corner_radius + delta).max(0.0),
            },
        }
    }

    /// Corners of a rectangle, counter-clockwise from the bottom-left.
    pub fn corners(&self) -> Option<[[f64; 2]; 4]> {
        let Profile2D::Rect {
            center,
            width,
            height,
            angle_deg,
        } = *self
        else {
            return None;
        };
        let (s, c) = angle_deg.to_radians().sin_cos();
        let (hw, hh) = (width / 2.0, height / 2.0);
        Some([(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)].map(|(x, y)| {
            [center[0] + x * c - y * s, center[1] + x * s + y * c]
        }))
    }

    /// 2D bounding rectangle as (min, max).
    pub fn extents(&self) -> ([f64; 2], [f64; 2]) {
        match *self {
            Profile2D::Ellipse {
                center,
                semi_x,
                semi_y,
            } => (
                [center[0] - semi_x, center[1] - semi_y],
                [center[0] + semi_x, center[1] + semi_y],
            ),
            Profile2D::RoundedRect {
                center,
                width,
                height,
                ..
            } => (
                [center[0] - width / 2.0, center[1] - height / 2.0],
                [center[0] + width / 2.0, center[1] + height / 2.0],
            ),
            Profile2D::Rect { .. } => {
                let mut lo = [f64::MAX; 2];
                let mut hi = [f64::MIN; 2];
                for p in self.corners().into_iter().flatten() {
                    for i in 0..2 {
                        lo[i] = lo[i].min(p[i]);
                        hi[i] = hi[i].max(p[i]);
                    }
                }
                (lo, hi)
            }
        }
    }

    /// Whether every size parameter is finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        let ok = |v: f64| v.is_finite() && v > 0.0;
        match *self {
            Profile2D::Ellipse { semi_x, semi_y, .. } => ok(semi_x) && ok(semi_y),
            Profile2D::Rect { width, height, .. } => ok(width) && ok(height),
            Profile2D::RoundedRect {
                width,
                height,
                corner_radius,
                ..
            } => {
                ok(width)
                    && ok(height)
                    && corner_radius >= 0.0
                    && corner_radius <= width.min(height) / 2.0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn grown_ellipse_adds_to_both_semi_axes() {
        let e = Profile2D::ellipse(0.0, 0.0, 5.85, 3.85).grown(2.0);
        let [a, b] = e.semi_axes().unwrap();
        assert_relative_eq!(a, 7.85);
        assert_relative_eq!(b, 5.85);
    }

    #[test]
    fn rotated_rect_extents_cover_diagonal() {
        let r = Profile2D::rotated_rect(0.0, 0.0, 2.0, 2.0, 45.0);
        let (lo, hi) = r.extents();
        assert_relative_eq!(hi[0], 2.0_f64.sqrt(), epsilon = 1e-12);
        assert_relative_eq!(lo[1], -(2.0_f64.sqrt()), epsilon = 1e-12);
    }

    #[test]
    fn corners_are_counter_clockwise() {
        let c = Profile2D::rotated_rect(1.0, 1.0, 4.0, 1.0, 30.0)
            .corners()
            .unwrap();
        let mut twice_area = 0.0;
        for i in 0..4 {
            let j = (i + 1) % 4;
            twice_area += c[i][0] * c[j][1] - c[j][0] * c[i][1];
        }
        assert_relative_eq!(twice_area / 2.0, 4.0, epsilon = 1e-12);
    }

    #[test]
    fn rounded_rect_rejects_oversized_corner() {
        assert!(Profile2D::rounded_rect(0.0, 0.0, 10.0, 4.0, 2.0).is_valid());
        assert!(!Profile2D::rounded_rect(0.0, 0.0, 10.0, 4.0, 2.5).is_valid());
    }

    #[test]
    fn profile_serializes_with_type_tag() {
        let json = serde_json::to_string(&Profile2D::ellipse(1.0, 2.0, 3.0, 4.0)).unwrap();
        assert!(json.contains("\"type\":\"ellipse\""));
    }
}
