use holder_kernel::{KernelSolidHandle, Profile2D};
use tracing::debug;

use crate::boolean::{combine, BooleanKind};
use crate::derive::DerivedDimensions;
use crate::kernel_ext::KernelBundle;
use crate::layout::SlotSpec;
use crate::types::{ModelError, Stage};

/// How far cutting tools reach past the faces they open.
pub const CUT_OVERSHOOT: f64 = 1.0;

/// Loft sections of the funnel cutter.
///
/// The funnel surface is carried on past the top face along its own taper so
/// the cutter never shares a plane with the body. When the funnel is wide at
/// the top it is also carried down inside the bore, where it removes nothing.
/// The bore outline itself is always one of the sections, at the plane where
/// funnel and bore meet, so the two cuts share that edge loop exactly.
pub fn funnel_sections(spec: &SlotSpec, dims: &DerivedDimensions) -> Vec<(Profile2D, f64)> {
    let (bottom, top) = spec.chamfer;
    let top_z = dims.base_height;
    let depth = semi_x(&top) - semi_x(&bottom);
    let bottom_z = top_z - depth.abs();
    let reach = CUT_OVERSHOOT.min(dims.slot_short / 4.0);

    if depth > 0.0 {
        // Wide at the top: meets the bore at the bottom section.
        vec![
            (bottom.grown(-reach), bottom_z - reach),
            (bottom, bottom_z),
            (top.grown(reach), top_z + reach),
        ]
    } else {
        // Wide at the bottom: meets the bore in the top face.
        vec![
            (bottom, bottom_z),
            (top, top_z),
            (top.grown(-reach), top_z + reach),
        ]
    }
}

fn semi_x(profile: &Profile2D) -> f64 {
    profile.semi_axes().map_or(0.0, |[a, _]| a)
}

/// Cut one slot into the accumulated solid: bore first, then funnel.
///
/// Consumes `acc`. On failure every intermediate, `acc` included, has been
/// released.
pub fn cut_slot(
    kb: &mut dyn KernelBundle,
    acc: KernelSolidHandle,
    spec: &SlotSpec,
    dims: &DerivedDimensions,
) -> Result<KernelSolidHandle, ModelError> {
    let slot = spec.index;
    debug!(slot, x = spec.center_x, "cutting slot");

    let bore_height = dims.base_height + CUT_OVERSHOOT - dims.floor_thickness;
    let bore = match kb.extrude_profile(&spec.bore, dims.floor_thickness, bore_height) {
        Ok(bore) => bore,
        Err(source) => {
            kb.release(acc);
            return Err(ModelError::Kernel {
                stage: Stage::Bore { slot },
                source,
            });
        }
    };
    let acc = combine(kb, acc, bore, BooleanKind::Subtract, Stage::Bore { slot })?;

    let funnel = match kb.loft_profiles(&funnel_sections(spec, dims)) {
        Ok(funnel) => funnel,
        Err(source) => {
            kb.release(acc);
            return Err(ModelError::Kernel {
                stage: Stage::Funnel { slot },
                source,
            });
        }
    };
    combine(kb, acc, funnel, BooleanKind::Subtract, Stage::Funnel { slot })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive;
    use crate::layout::plan_slots;
    use crate::params::{FunnelDirection, InputParameters};
    use approx::assert_relative_eq;
    use holder_kernel::{Kernel, KernelIntrospect, KernelOp, MockKernel};

    fn setup(params: &InputParameters) -> (DerivedDimensions, Vec<SlotSpec>) {
        let dims = derive(params).unwrap();
        let slots = plan_slots(params, &dims);
        (dims, slots)
    }

    #[test]
    fn funnel_follows_taper_past_both_ends() {
        let params = InputParameters::default();
        let (dims, slots) = setup(&params);
        let sections = funnel_sections(&slots[0], &dims);
        assert_eq!(sections.len(), 3);
        let (low, low_z) = sections[0];
        let (high, high_z) = sections[2];
        assert_relative_eq!(low_z, 12.0 - 2.0 - 1.0);
        assert_relative_eq!(high_z, 13.0);
        // The bore outline sits exactly at the transition plane.
        assert_eq!(sections[1].0, slots[0].bore);
        assert_relative_eq!(sections[1].1, 10.0, epsilon = 1e-9);
        // 45° walls: the semi-axis grows one-for-one with height.
        let [a0, _] = low.semi_axes().unwrap();
        let [a1, _] = high.semi_axes().unwrap();
        assert_relative_eq!(a1 - a0, high_z - low_z, epsilon = 1e-9);
        assert_relative_eq!(a0, 11.7 / 2.0 - 1.0, epsilon = 1e-9);
    }

    #[test]
    fn inverted_funnel_narrows_above_top() {
        let params = InputParameters {
            funnel_direction: FunnelDirection::WideAtBottom,
            ..Default::default()
        };
        let (dims, slots) = setup(&params);
        let sections = funnel_sections(&slots[0], &dims);
        assert_eq!(sections.len(), 3);
        let (low, low_z) = sections[0];
        let (high, high_z) = sections[2];
        assert_relative_eq!(low_z, 10.0);
        assert_eq!(low, slots[0].chamfer.0);
        assert_eq!(sections[1].0, slots[0].bore);
        assert_relative_eq!(sections[1].1, 12.0);
        assert_relative_eq!(high_z, 13.0);
        assert_relative_eq!(
            high.semi_axes().unwrap()[1],
            7.7 / 2.0 - 1.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn bore_reaches_from_floor_past_top() {
        let params = InputParameters::default();
        let (dims, slots) = setup(&params);
        let mut kernel = MockKernel::new();
        let block = kernel
            .extrude_profile(&Profile2D::rect(0.0, 0.0, 91.7, 23.7), 0.0, 12.0)
            .unwrap();
        let cut = cut_slot(&mut kernel, block, &slots[0], &dims).unwrap();
        let bore = kernel
            .log()
            .iter()
            .find_map(|op| match op {
                KernelOp::Extrude {
                    profile: Profile2D::Ellipse { .. },
                    z_base,
                    height,
                    ..
                } => Some((*z_base, *height)),
                _ => None,
            })
            .unwrap();
        assert_relative_eq!(bore.0, 4.0);
        assert_relative_eq!(bore.0 + bore.1, 13.0);
        assert_eq!(kernel.live_solids(), 1);
        assert_eq!(kernel.bounding_box(&cut).unwrap().max[2], 12.0);
    }

    #[test]
    fn funnel_failure_names_slot_and_releases() {
        let params = InputParameters::default();
        let (dims, slots) = setup(&params);
        // extrude block, extrude bore, subtract, loft (fails)
        let mut kernel = MockKernel::failing_at(3);
        let block = kernel
            .extrude_profile(&Profile2D::rect(0.0, 0.0, 91.7, 23.7), 0.0, 12.0)
            .unwrap();
        let err = cut_slot(&mut kernel, block, &slots[2], &dims).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Kernel {
                stage: Stage::Funnel { slot: 2 },
                ..
            }
        ));
        assert_eq!(kernel.live_solids(), 0);
    }
}
