use serde::{Deserialize, Serialize};

use crate::Profile2D;

/// Axis-aligned bounding box in model space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: [f64; 3],
    pub max: [f64; 3],
}

impl BoundingBox {
    pub fn new(min: [f64; 3], max: [f64; 3]) -> Self {
        Self { min, max }
    }

    /// Box swept by a planar profile between two heights.
    pub fn of_profile(profile: &Profile2D, z_low: f64, z_high: f64) -> Self {
        let (lo, hi) = profile.extents();
        Self {
            min: [lo[0], lo[1], z_low.min(z_high)],
            max: [hi[0], hi[1], z_low.max(z_high)],
        }
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        let mut out = *self;
        for i in 0..3 {
            out.min[i] = out.min[i].min(other.min[i]);
            out.max[i] = out.max[i].max(other.max[i]);
        }
        out
    }

    pub fn size(&self) -> [f64; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// True when every coordinate of both corners is within `tol`.
    pub fn approx_eq(&self, other: &BoundingBox, tol: f64) -> bool {
        (0..3).all(|i| {
            (self.min[i] - other.min[i]).abs() <= tol && (self.max[i] - other.max[i]).abs() <= tol
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn union_grows_to_cover_both() {
        let a = BoundingBox::new([0.0, 0.0, 0.0], [1.0, 1.0, 1.0]);
        let b = BoundingBox::new([-1.0, 0.5, 0.5], [0.5, 2.0, 3.0]);
        let u = a.union(&b);
        assert_eq!(u.min, [-1.0, 0.0, 0.0]);
        assert_eq!(u.max, [1.0, 2.0, 3.0]);
    }

    #[test]
    fn profile_box_spans_heights() {
        let bbox = BoundingBox::of_profile(&Profile2D::ellipse(2.0, 0.0, 3.0, 1.5), 4.0, 13.0);
        assert_relative_eq!(bbox.min[0], -1.0);
        assert_relative_eq!(bbox.max[0], 5.0);
        assert_relative_eq!(bbox.size()[1], 3.0);
        assert_relative_eq!(bbox.size()[2], 9.0);
    }
}
