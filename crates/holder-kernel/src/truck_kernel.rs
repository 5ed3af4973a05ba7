//! TruckKernel: real geometry kernel wrapping truck's API.

use crate::primitives;
use crate::tessellation;
use crate::traits::{Kernel, KernelIntrospect};
use crate::types::*;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

// Import truck types selectively to avoid shadowing std::result::Result
use truck_modeling::topology::Solid;
use truck_stepio::out;

/// Boolean tolerance handed to truck-shapeops.
const BOOLEAN_TOLERANCE: f64 = 0.05;

/// Tessellation tolerance used for bounding-box queries.
const BOUNDS_TOLERANCE: f64 = 0.01;

/// Construction record for an axis-aligned block.
///
/// truck has no fillet operator, so blocks remember how they were made and
/// a fillet rebuilds the block with rounded geometry instead of modifying
/// edges in place.
#[derive(Debug, Clone, Copy)]
struct BlockRecord {
    footprint: Profile2D,
    z_base: f64,
    height: f64,
    corner_radius: f64,
    top_radius: f64,
}

impl BlockRecord {
    fn width_and_depth(&self) -> (f64, f64) {
        let (lo, hi) = self.footprint.extents();
        (hi[0] - lo[0], hi[1] - lo[1])
    }

    /// Record after rounding `edges`, or why the kernel cannot do it.
    fn filleted(&self, edges: EdgeSelector, radius: f64) -> Result<BlockRecord, KernelError> {
        let (w, d) = self.width_and_depth();
        let half_min = w.min(d) / 2.0;
        let fail = |reason: String| Err(KernelError::FilletFailed { reason });
        match edges {
            EdgeSelector::Vertical => {
                if self.top_radius > 0.0 {
                    return fail("vertical edges must be rounded before the top perimeter".into());
                }
                if self.corner_radius > 0.0 {
                    return fail("vertical edges are already rounded".into());
                }
                if radius > half_min {
                    return fail(format!(
                        "radius {} exceeds half the smaller side ({})",
                        radius, half_min
                    ));
                }
                Ok(BlockRecord {
                    corner_radius: radius,
                    ..*self
                })
            }
            EdgeSelector::TopPerimeter => {
                if self.top_radius > 0.0 {
                    return fail("top perimeter is already rounded".into());
                }
                if radius >= self.height {
                    return fail(format!(
                        "radius {} does not fit in block height {}",
                        radius, self.height
                    ));
                }
                if radius >= half_min {
                    return fail(format!(
                        "radius {} does not fit in half the smaller side ({})",
                        radius, half_min
                    ));
                }
                if self.corner_radius > 0.0 && radius >= self.corner_radius {
                    return fail(format!(
                        "radius {} must be smaller than the corner radius {}",
                        radius, self.corner_radius
                    ));
                }
                Ok(BlockRecord {
                    top_radius: radius,
                    ..*self
                })
            }
        }
    }

    fn build(&self) -> Result<Solid, KernelError> {
        primitives::make_rounded_block(
            &self.footprint,
            self.z_base,
            self.height,
            self.corner_radius,
            self.top_radius,
        )
    }
}

struct StoredSolid {
    solid: Solid,
    block: Option<BlockRecord>,
}

/// Real geometry kernel backed by the truck BREP library.
pub struct TruckKernel {
    next_handle: u64,
    solids: HashMap<u64, StoredSolid>,
}

impl TruckKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            solids: HashMap::new(),
        }
    }

    fn store(&mut self, solid: Solid, block: Option<BlockRecord>) -> KernelSolidHandle {
        let handle = KernelSolidHandle(self.next_handle);
        self.next_handle += 1;
        self.solids.insert(handle.id(), StoredSolid { solid, block });
        handle
    }

    fn stored(&self, handle: &KernelSolidHandle) -> Result<&StoredSolid, KernelError> {
        self.solids
            .get(&handle.id())
            .ok_or(KernelError::EntityNotFound {
                handle: handle.id(),
            })
    }

    pub(crate) fn get_solid(&self, handle: &KernelSolidHandle) -> Option<&Solid> {
        self.solids.get(&handle.id()).map(|s| &s.solid)
    }

    /// Serialize a solid as a STEP AP203 document.
    pub fn export_step(
        &self,
        solid: &KernelSolidHandle,
        file_name: &str,
    ) -> Result<String, KernelError> {
        let stored = self.stored(solid)?;
        let compressed = stored.solid.compress();
        let header = out::StepHeaderDescriptor {
            file_name: file_name.to_string(),
            ..Default::default()
        };
        let text = out::CompleteStepDisplay::new(out::StepModel::from(&compressed), header)
            .to_string();
        if text.is_empty() {
            return Err(KernelError::StepExportFailed {
                reason: "empty STEP output".to_string(),
            });
        }
        Ok(text)
    }
}

/// Run a truck-shapeops boolean, turning both a `None` result and a panic
/// inside the intersection code into `BooleanFailed`.
fn run_boolean<F>(operation: &str, op: F) -> Result<Solid, KernelError>
where
    F: FnOnce() -> Option<Solid>,
{
    match panic::catch_unwind(AssertUnwindSafe(op)) {
        Ok(Some(solid)) => Ok(solid),
        Ok(None) => Err(KernelError::BooleanFailed {
            reason: format!("truck {} returned None", operation),
        }),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            warn!(operation, %message, "truck boolean panicked");
            Err(KernelError::BooleanFailed {
                reason: format!("truck {} panicked: {}", operation, message),
            })
        }
    }
}

impl Default for TruckKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for TruckKernel {
    fn extrude_profile(
        &mut self,
        profile: &Profile2D,
        z_base: f64,
        height: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        let solid = primitives::make_prism(profile, z_base, height)?;
        let block = match *profile {
            Profile2D::Rect { angle_deg, .. } if angle_deg == 0.0 => Some(BlockRecord {
                footprint: *profile,
                z_base,
                height,
                corner_radius: 0.0,
                top_radius: 0.0,
            }),
            _ => None,
        };
        Ok(self.store(solid, block))
    }

    fn loft_profiles(
        &mut self,
        sections: &[(Profile2D, f64)],
    ) -> Result<KernelSolidHandle, KernelError> {
        let solid = primitives::make_loft(sections)?;
        Ok(self.store(solid, None))
    }

    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let solid_a = &self.stored(a)?.solid;
        let solid_b = &self.stored(b)?.solid;

        let result = run_boolean("union", || {
            truck_shapeops::or(solid_a, solid_b, BOOLEAN_TOLERANCE)
        })?;
        debug!(a = a.id(), b = b.id(), "truck union");
        Ok(self.store(result, None))
    }

    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        let solid_a = &self.stored(a)?.solid;
        let mut solid_b = self.stored(b)?.solid.clone();

        // Subtraction = A ∩ ¬B. not() mutates in place.
        solid_b.not();
        let result = run_boolean("subtraction", || {
            truck_shapeops::and(solid_a, &solid_b, BOOLEAN_TOLERANCE)
        })?;
        debug!(a = a.id(), b = b.id(), "truck subtract");
        Ok(self.store(result, None))
    }

    fn fillet_edges(
        &mut self,
        solid: &KernelSolidHandle,
        edges: EdgeSelector,
        radius: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        if !(radius.is_finite() && radius > 0.0) {
            return Err(KernelError::FilletFailed {
                reason: "radius must be positive".to_string(),
            });
        }
        let record = self
            .stored(solid)?
            .block
            .ok_or_else(|| KernelError::NotSupported {
                operation: format!("fillet of {} on a non-block solid", edges),
            })?;
        let rounded = record.filleted(edges, radius)?;
        let built = rounded.build()?;
        debug!(%edges, radius, "truck block fillet rebuilt");
        Ok(self.store(built, Some(rounded)))
    }

    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        tessellation::tessellate_solid(&self.stored(solid)?.solid, tolerance)
    }

    fn release(&mut self, solid: KernelSolidHandle) {
        self.solids.remove(&solid.id());
    }
}

impl KernelIntrospect for TruckKernel {
    fn bounding_box(&self, solid: &KernelSolidHandle) -> Option<BoundingBox> {
        self.get_solid(solid)
            .and_then(|s| tessellation::mesh_bounds(s, BOUNDS_TOLERANCE))
    }

    fn shell_count(&self, solid: &KernelSolidHandle) -> usize {
        self.get_solid(solid)
            .map(|s| s.boundaries().len())
            .unwrap_or(0)
    }

    fn live_solids(&self) -> usize {
        self.solids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(kernel: &mut TruckKernel) -> KernelSolidHandle {
        kernel
            .extrude_profile(&Profile2D::rect(0.0, 0.0, 40.0, 20.0), 0.0, 12.0)
            .unwrap()
    }

    #[test]
    fn test_truck_kernel_extrude_and_tessellate_box() {
        let mut kernel = TruckKernel::new();
        let handle = block(&mut kernel);

        let mesh = kernel.tessellate(&handle, 0.1).unwrap();
        assert!(!mesh.vertices.is_empty(), "Mesh should have vertices");
        assert!(!mesh.indices.is_empty(), "Mesh should have indices");
        assert_eq!(mesh.face_ranges.len(), 6, "Box should have 6 face ranges");

        let covered: u32 = mesh
            .face_ranges
            .iter()
            .map(|r| r.end_index - r.start_index)
            .sum();
        assert_eq!(covered, mesh.indices.len() as u32);
    }

    #[test]
    fn test_truck_kernel_bounding_box() {
        let mut kernel = TruckKernel::new();
        let handle = block(&mut kernel);
        let bbox = kernel.bounding_box(&handle).unwrap();
        assert!(bbox.approx_eq(
            &BoundingBox::new([-20.0, -10.0, 0.0], [20.0, 10.0, 12.0]),
            1e-6
        ));
        assert_eq!(kernel.shell_count(&handle), 1);
    }

    #[test]
    fn test_truck_fillet_rebuilds_block() {
        let mut kernel = TruckKernel::new();
        let handle = block(&mut kernel);
        let rounded = kernel
            .fillet_edges(&handle, EdgeSelector::Vertical, 3.0)
            .unwrap();
        let topped = kernel
            .fillet_edges(&rounded, EdgeSelector::TopPerimeter, 1.5)
            .unwrap();
        assert_eq!(kernel.shell_count(&topped), 1);
        // Non-destructive: the inputs are still alive
        assert_eq!(kernel.live_solids(), 3);
    }

    #[test]
    fn test_truck_fillet_order_enforced() {
        let mut kernel = TruckKernel::new();
        let handle = block(&mut kernel);
        let topped = kernel
            .fillet_edges(&handle, EdgeSelector::TopPerimeter, 1.5)
            .unwrap();
        let err = kernel
            .fillet_edges(&topped, EdgeSelector::Vertical, 3.0)
            .unwrap_err();
        assert!(matches!(err, KernelError::FilletFailed { .. }));
    }

    #[test]
    fn test_truck_fillet_radius_too_large() {
        let mut kernel = TruckKernel::new();
        let handle = block(&mut kernel);
        let err = kernel
            .fillet_edges(&handle, EdgeSelector::Vertical, 10.5)
            .unwrap_err();
        assert!(matches!(err, KernelError::FilletFailed { .. }));
    }

    #[test]
    fn test_truck_fillet_on_ellipse_not_supported() {
        let mut kernel = TruckKernel::new();
        let handle = kernel
            .extrude_profile(&Profile2D::ellipse(0.0, 0.0, 3.0, 2.0), 0.0, 5.0)
            .unwrap();
        let err = kernel
            .fillet_edges(&handle, EdgeSelector::Vertical, 1.0)
            .unwrap_err();
        assert!(matches!(err, KernelError::NotSupported { .. }));
    }

    #[test]
    fn test_truck_boolean_panic_becomes_error() {
        let err = run_boolean("subtraction", || panic!("intersection curve diverged")).unwrap_err();
        match err {
            KernelError::BooleanFailed { reason } => {
                assert!(reason.contains("intersection curve diverged"), "{}", reason)
            }
            other => panic!("expected BooleanFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_truck_boolean_none_becomes_error() {
        let err = run_boolean("union", || None).unwrap_err();
        assert!(matches!(err, KernelError::BooleanFailed { .. }));
    }

    #[test]
    fn test_truck_bore_through_block() {
        let mut kernel = TruckKernel::new();
        let handle = block(&mut kernel);
        let bore = kernel
            .extrude_profile(&Profile2D::ellipse(0.0, 0.0, 5.85, 3.85), 4.0, 9.0)
            .unwrap();
        let cut = kernel.boolean_subtract(&handle, &bore).unwrap();
        assert_eq!(kernel.shell_count(&cut), 1);
        let bbox = kernel.bounding_box(&cut).unwrap();
        assert!((bbox.max[2] - 12.0).abs() < 1e-6);
    }

    #[test]
    fn test_truck_release_frees_solid() {
        let mut kernel = TruckKernel::new();
        let handle = block(&mut kernel);
        let id = handle.id();
        kernel.release(handle);
        assert_eq!(kernel.live_solids(), 0);
        assert!(kernel.get_solid(&KernelSolidHandle(id)).is_none());
    }

    #[test]
    fn test_truck_export_step_contains_header() {
        let mut kernel = TruckKernel::new();
        let handle = block(&mut kernel);
        let step = kernel.export_step(&handle, "block.step").unwrap();
        assert!(step.contains("ISO-10303-21"));
    }
}
