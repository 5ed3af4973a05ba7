use holder_kernel::{EdgeSelector, KernelSolidHandle, Profile2D};
use tracing::debug;

use crate::derive::DerivedDimensions;
use crate::kernel_ext::KernelBundle;
use crate::params::InputParameters;
use crate::types::{ModelError, Stage};

/// Build the rounded base block standing on z = 0.
///
/// The four vertical edges are rounded before the top perimeter; a zero
/// radius leaves that edge set sharp.
pub fn build_base(
    kb: &mut dyn KernelBundle,
    dims: &DerivedDimensions,
    params: &InputParameters,
) -> Result<KernelSolidHandle, ModelError> {
    let footprint = Profile2D::rect(0.0, 0.0, dims.base_length, dims.base_width);
    let mut block = kb
        .extrude_profile(&footprint, 0.0, dims.base_height)
        .map_err(ModelError::kernel(Stage::Base))?;

    let fillets = [
        (EdgeSelector::Vertical, params.outer_fillet_radius, Stage::VerticalFillet),
        (EdgeSelector::TopPerimeter, params.top_fillet_radius, Stage::TopFillet),
    ];
    for (edges, radius, stage) in fillets {
        if radius <= 0.0 {
            continue;
        }
        debug!(%edges, radius, "rounding base");
        let rounded = kb.fillet_edges(&block, edges, radius);
        kb.release(block);
        block = rounded.map_err(ModelError::kernel(stage))?;
    }
    Ok(block)
}
