//! Placement of slots and symbols. Pure: everything here is decided before
//! the first kernel call, so a bad layout never leaves half-built geometry.

use holder_kernel::Profile2D;
use serde::Serialize;

use crate::derive::DerivedDimensions;
use crate::params::{FunnelDirection, InputParameters};
use crate::symbol::{Stroke, SymbolKind};
use crate::types::ConfigError;

/// Symbols keep this far inside the top fillet.
pub const SAFE_EDGE_INSET: f64 = 1.0;

/// One slot: a straight elliptical bore topped by a funnel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotSpec {
    pub index: usize,
    pub center_x: f64,
    pub center_y: f64,
    pub bore: Profile2D,
    /// Funnel sections at the transition plane and at the top face.
    pub chamfer: (Profile2D, Profile2D),
}

impl SlotSpec {
    /// The larger of the two funnel sections.
    pub fn rim(&self) -> Profile2D {
        let (bottom, top) = self.chamfer;
        let wider = |p: &Profile2D| p.semi_axes().map_or(0.0, |[a, _]| a);
        if wider(&top) >= wider(&bottom) {
            top
        } else {
            bottom
        }
    }
}

/// One raised symbol next to a slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolSpec {
    pub index: usize,
    pub center_x: f64,
    pub center_y: f64,
    pub kind: SymbolKind,
    pub strokes: Vec<Stroke>,
}

/// All symbols of a holder and the non-fatal findings about their placement.
#[derive(Debug, Clone, Default)]
pub struct SymbolPlan {
    pub symbols: Vec<SymbolSpec>,
    pub warnings: Vec<String>,
}

/// Slot specs for indices `0..slot_count`.
pub fn plan_slots(params: &InputParameters, dims: &DerivedDimensions) -> Vec<SlotSpec> {
    (0..params.slot_count)
        .map(|index| {
            let center_x = dims.slot_center_x(index);
            let bore =
                Profile2D::ellipse(center_x, 0.0, dims.slot_long / 2.0, dims.slot_short / 2.0);
            let flared = bore.grown(params.funnel_height);
            let chamfer = match params.funnel_direction {
                FunnelDirection::WideAtTop => (bore, flared),
                FunnelDirection::WideAtBottom => (flared, bore),
            };
            SlotSpec {
                index,
                center_x,
                center_y: 0.0,
                bore,
                chamfer,
            }
        })
        .collect()
}

/// Y of the symbol row: midway between the funnel rim and the usable edge.
pub fn symbol_center_y(params: &InputParameters, dims: &DerivedDimensions) -> f64 {
    let rim = dims.slot_short / 2.0 + params.funnel_height;
    let inset = dims.base_width / 2.0 - params.top_fillet_radius - SAFE_EDGE_INSET;
    (rim + inset) / 2.0
}

/// Symbol specs for every slot, checked against the base footprint.
pub fn plan_symbols(
    params: &InputParameters,
    dims: &DerivedDimensions,
    slots: &[SlotSpec],
) -> Result<SymbolPlan, ConfigError> {
    let available = params.symbol_vocabulary.len();
    if available < params.slot_count {
        return Err(ConfigError::VocabularyTooSmall {
            slots: params.slot_count,
            available,
        });
    }

    let rim = dims.slot_short / 2.0 + params.funnel_height;
    let inset = dims.base_width / 2.0 - params.top_fillet_radius - SAFE_EDGE_INSET;
    if inset <= rim {
        return Err(ConfigError::NoSymbolBand { rim, inset });
    }
    let center_y = symbol_center_y(params, dims);
    let footprint = Footprint {
        half_l: dims.base_length / 2.0,
        half_w: dims.base_width / 2.0,
        corner: params.outer_fillet_radius,
    };

    let mut plan = SymbolPlan::default();
    for slot in slots {
        let kind = params.symbol_vocabulary[slot.index];
        let strokes = kind.strokes(params.mark_length, params.mark_width);
        let center = [slot.center_x, center_y];

        let mut intrudes = false;
        for stroke in &strokes {
            for [x, y] in stroke.profile(center).corners().into_iter().flatten() {
                if !footprint.contains(x, y) {
                    return Err(ConfigError::SymbolOutOfBounds {
                        index: slot.index,
                        x,
                        y,
                    });
                }
                intrudes |= inside_ellipse(&slot.rim(), [x, y]);
            }
        }
        if intrudes {
            plan.warnings.push(format!(
                "symbol {} ('{}') reaches into the funnel rim of its slot",
                slot.index, kind
            ));
        }

        plan.symbols.push(SymbolSpec {
            index: slot.index,
            center_x: slot.center_x,
            center_y,
            kind,
            strokes,
        });
    }
    Ok(plan)
}

/// Top outline of the base: a rectangle centered on the origin with its
/// vertical edges rounded.
struct Footprint {
    half_l: f64,
    half_w: f64,
    corner: f64,
}

impl Footprint {
    fn contains(&self, x: f64, y: f64) -> bool {
        let (x, y) = (x.abs(), y.abs());
        if x > self.half_l || y > self.half_w {
            return false;
        }
        // Inside the corner square only the quarter disc is material.
        let (cx, cy) = (self.half_l - self.corner, self.half_w - self.corner);
        if x > cx && y > cy {
            return (x - cx).hypot(y - cy) <= self.corner;
        }
        true
    }
}

fn inside_ellipse(profile: &Profile2D, p: [f64; 2]) -> bool {
    let Some([a, b]) = profile.semi_axes() else {
        return false;
    };
    let c = profile.center();
    let (u, v) = ((p[0] - c[0]) / a, (p[1] - c[1]) / b);
    u * u + v * v < 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::derive;
    use approx::assert_relative_eq;

    fn plan(params: &InputParameters) -> (Vec<SlotSpec>, Result<SymbolPlan, ConfigError>) {
        let dims = derive(params).unwrap();
        let slots = plan_slots(params, &dims);
        let symbols = plan_symbols(params, &dims, &slots);
        (slots, symbols)
    }

    #[test]
    fn slots_are_centered_on_origin() {
        let (slots, _) = plan(&InputParameters::default());
        assert_eq!(slots.len(), 5);
        assert_relative_eq!(slots[0].center_x, -32.0);
        assert_relative_eq!(slots[2].center_x, 0.0);
        assert_relative_eq!(slots[4].center_x, 32.0);
        assert!(slots.iter().all(|s| s.center_y == 0.0));
    }

    #[test]
    fn funnel_contains_bore_at_transition_plane() {
        for direction in [FunnelDirection::WideAtTop, FunnelDirection::WideAtBottom] {
            let params = InputParameters {
                funnel_direction: direction,
                ..Default::default()
            };
            let (slots, _) = plan(&params);
            let rim = slots[0].rim().semi_axes().unwrap();
            let bore = slots[0].bore.semi_axes().unwrap();
            assert!(rim[0] > bore[0] && rim[1] > bore[1]);
        }
    }

    #[test]
    fn wide_at_bottom_swaps_sections() {
        let params = InputParameters {
            funnel_direction: FunnelDirection::WideAtBottom,
            ..Default::default()
        };
        let (slots, _) = plan(&params);
        assert_eq!(slots[1].chamfer.1, slots[1].bore);
        assert_eq!(slots[1].rim(), slots[1].chamfer.0);
    }

    #[test]
    fn symbol_row_sits_between_rim_and_edge() {
        let (_, symbols) = plan(&InputParameters::default());
        let symbols = symbols.unwrap();
        // ((3.85 + 2.0) + (11.85 - 1.5 - 1.0)) / 2
        assert_relative_eq!(symbols.symbols[0].center_y, 7.6, epsilon = 1e-9);
        let kinds: Vec<char> = symbols.symbols.iter().map(|s| s.kind.glyph()).collect();
        assert_eq!(kinds, vec!['-', '+', 'x', '=', 'z']);
    }

    #[test]
    fn vertical_bars_touching_the_rim_only_warn() {
        // The cross's upright bar reaches y = 5.6, inside the 5.85 rim.
        let (_, symbols) = plan(&InputParameters::default());
        let warnings = symbols.unwrap().warnings;
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("symbol 1"));
    }

    #[test]
    fn short_vocabulary_rejected() {
        let params = InputParameters {
            symbol_vocabulary: vec![SymbolKind::Dash, SymbolKind::Cross],
            ..Default::default()
        };
        let (_, symbols) = plan(&params);
        assert_eq!(
            symbols.unwrap_err(),
            ConfigError::VocabularyTooSmall {
                slots: 5,
                available: 2
            }
        );
    }

    #[test]
    fn no_band_when_padding_is_tight() {
        let params = InputParameters {
            slot_count: 1,
            edge_padding: 4.0,
            funnel_height: 2.0,
            ..Default::default()
        };
        let (_, symbols) = plan(&params);
        assert!(matches!(
            symbols.unwrap_err(),
            ConfigError::NoSymbolBand { .. }
        ));
    }

    #[test]
    fn marks_in_a_rounded_corner_leave_the_footprint() {
        // Single slot: base 27.7 x 23.7 with 8 mm corners, symbol row at y = 7.6.
        let mut params = InputParameters {
            slot_count: 1,
            outer_fillet_radius: 8.0,
            mark_length: 24.0,
            ..Default::default()
        };
        let (_, symbols) = plan(&params);
        assert!(symbols.is_ok(), "dash ends at (12, 8) inside the round");

        // Corner (13, 8) is inside the sharp rectangle but past the round.
        params.mark_length = 26.0;
        let (_, symbols) = plan(&params);
        assert!(matches!(
            symbols.unwrap_err(),
            ConfigError::SymbolOutOfBounds { index: 0, .. }
        ));
    }

    #[test]
    fn oversized_marks_leave_the_footprint() {
        let params = InputParameters {
            slot_count: 1,
            mark_length: 40.0,
            ..Default::default()
        };
        let (_, symbols) = plan(&params);
        assert!(matches!(
            symbols.unwrap_err(),
            ConfigError::SymbolOutOfBounds { index: 0, .. }
        ));
    }
}
