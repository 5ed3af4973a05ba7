use holder_kernel::KernelSolidHandle;

use crate::kernel_ext::KernelBundle;
use crate::types::{ModelError, Stage};

/// Boolean operation type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanKind {
    Union,
    Subtract,
}

/// Combine an accumulated solid with a tool solid, consuming both.
///
/// Both inputs are released whether or not the operation succeeds, so the
/// caller only ever owns the returned handle.
pub fn combine(
    kb: &mut dyn KernelBundle,
    acc: KernelSolidHandle,
    tool: KernelSolidHandle,
    kind: BooleanKind,
    stage: Stage,
) -> Result<KernelSolidHandle, ModelError> {
    let result = match kind {
        BooleanKind::Union => kb.boolean_union(&acc, &tool),
        BooleanKind::Subtract => kb.boolean_subtract(&acc, &tool),
    };
    kb.release(acc);
    kb.release(tool);
    result.map_err(ModelError::kernel(stage))
}

#[cfg(test)]
mod tests {
    use super::*;
    use holder_kernel::{Kernel, KernelIntrospect, MockKernel, Profile2D};

    #[test]
    fn combine_releases_inputs() {
        let mut kernel = MockKernel::new();
        let a = kernel
            .extrude_profile(&Profile2D::rect(0.0, 0.0, 10.0, 10.0), 0.0, 5.0)
            .unwrap();
        let b = kernel
            .extrude_profile(&Profile2D::rect(5.0, 0.0, 10.0, 10.0), 0.0, 5.0)
            .unwrap();
        let merged = combine(&mut kernel, a, b, BooleanKind::Union, Stage::Base).unwrap();
        assert_eq!(kernel.live_solids(), 1);
        assert_eq!(kernel.bounding_box(&merged).unwrap().max[0], 10.0);
    }

    #[test]
    fn combine_failure_carries_stage_and_releases() {
        let mut kernel = MockKernel::failing_at(2);
        let a = kernel
            .extrude_profile(&Profile2D::rect(0.0, 0.0, 10.0, 10.0), 0.0, 5.0)
            .unwrap();
        let b = kernel
            .extrude_profile(&Profile2D::ellipse(0.0, 0.0, 2.0, 1.0), 1.0, 5.0)
            .unwrap();
        let err = combine(
            &mut kernel,
            a,
            b,
            BooleanKind::Subtract,
            Stage::Bore { slot: 3 },
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ModelError::Kernel {
                stage: Stage::Bore { slot: 3 },
                ..
            }
        ));
        assert_eq!(kernel.live_solids(), 0);
    }
}
