//! Dimension derivation: every overall size of the holder as a pure function
//! of the input parameters, plus the checks that the result is buildable.

use serde::Serialize;

use crate::params::{HeightMode, InputParameters, LayoutMode};
use crate::types::ConfigError;

/// How deep symbol strokes are sunk into the base before they rise above it.
pub const SYMBOL_EMBED_DEPTH: f64 = 2.0;

/// Overall sizes derived from the input parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedDimensions {
    pub slot_long: f64,
    pub slot_short: f64,
    /// Center-to-center distance between neighbouring slots. None for a
    /// single slot.
    pub slot_spacing: Option<f64>,
    pub base_length: f64,
    pub base_width: f64,
    pub base_height: f64,
    /// Material under the bore.
    pub floor_thickness: f64,
    /// X of the first slot center; slots are centered on the origin.
    pub slot_start_x: f64,
}

impl DerivedDimensions {
    /// X of slot `index`.
    pub fn slot_center_x(&self, index: usize) -> f64 {
        self.slot_start_x + index as f64 * self.slot_spacing.unwrap_or(0.0)
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

/// Derive all overall dimensions, rejecting parameter sets that cannot
/// produce a valid holder.
pub fn derive(params: &InputParameters) -> Result<DerivedDimensions, ConfigError> {
    let n = params.slot_count;
    if n == 0 {
        return Err(ConfigError::ZeroSlots);
    }

    positive("object_long_axis", params.object_long_axis)?;
    positive("object_short_axis", params.object_short_axis)?;
    positive("edge_padding", params.edge_padding)?;
    positive("slot_depth", params.slot_depth)?;
    positive("funnel_height", params.funnel_height)?;
    positive("mark_height", params.mark_height)?;
    positive("mark_width", params.mark_width)?;
    positive("mark_length", params.mark_length)?;
    non_negative("clearance", params.clearance)?;
    non_negative("outer_fillet_radius", params.outer_fillet_radius)?;
    non_negative("top_fillet_radius", params.top_fillet_radius)?;

    let slot_long = params.object_long_axis + params.clearance;
    let slot_short = params.object_short_axis + params.clearance;
    let pad = params.edge_padding;
    let count = n as f64;

    let (slot_spacing, base_length) = match params.layout {
        LayoutMode::Pitch { wall_between_slots } => {
            positive("wall_between_slots", wall_between_slots)?;
            let length =
                count * slot_long + (count - 1.0) * wall_between_slots + 2.0 * pad;
            (slot_long + wall_between_slots, length)
        }
        LayoutMode::FixedSpacing { slot_spacing } => {
            // Spacing is meaningless for a single slot.
            if n > 1 {
                positive("slot_spacing", slot_spacing)?;
                (slot_spacing, (count - 1.0) * slot_spacing + 2.0 * pad + slot_long)
            } else {
                (0.0, 2.0 * pad + slot_long)
            }
        }
    };
    let slot_spacing = (n > 1).then_some(slot_spacing);
    let base_width = slot_short + 2.0 * pad;

    let (base_height, floor_thickness) = match params.height {
        HeightMode::Stacked => {
            positive("bottom_thickness", params.bottom_thickness)?;
            let h = params.bottom_thickness + params.slot_depth + params.funnel_height;
            (h, params.bottom_thickness)
        }
        HeightMode::Fixed { base_height } => {
            positive("base_height", base_height)?;
            (base_height, base_height - params.slot_depth)
        }
    };

    if floor_thickness <= 0.0 {
        return Err(ConfigError::FloorTooThin {
            floor: floor_thickness,
            base_height,
            slot_depth: params.slot_depth,
        });
    }

    let outer_limit = base_length.min(base_width) / 2.0;
    if params.outer_fillet_radius > outer_limit {
        return Err(ConfigError::OuterFilletTooLarge {
            radius: params.outer_fillet_radius,
            limit: outer_limit,
        });
    }

    let top_limit = floor_thickness + params.slot_depth;
    if params.top_fillet_radius >= top_limit {
        return Err(ConfigError::TopFilletTooLarge {
            radius: params.top_fillet_radius,
            limit: top_limit,
        });
    }

    if let Some(spacing) = slot_spacing {
        let limit = (spacing - slot_long) / 2.0;
        if params.funnel_height >= limit {
            return Err(ConfigError::FunnelOverlap {
                funnel_height: params.funnel_height,
                limit,
            });
        }
    }

    if matches!(params.height, HeightMode::Fixed { .. })
        && params.funnel_height >= params.slot_depth
    {
        return Err(ConfigError::FunnelDeeperThanSlot {
            funnel_height: params.funnel_height,
            slot_depth: params.slot_depth,
        });
    }

    if params.funnel_height >= pad {
        return Err(ConfigError::FunnelBreaksEdge {
            funnel_height: params.funnel_height,
            edge_padding: pad,
        });
    }

    if base_height <= SYMBOL_EMBED_DEPTH {
        return Err(ConfigError::BaseTooShallowForSymbols {
            base_height,
            embed_depth: SYMBOL_EMBED_DEPTH,
        });
    }

    Ok(DerivedDimensions {
        slot_long,
        slot_short,
        slot_spacing,
        base_length,
        base_width,
        base_height,
        floor_thickness,
        slot_start_x: -((count - 1.0) * slot_spacing.unwrap_or(0.0)) / 2.0,
    })
}
