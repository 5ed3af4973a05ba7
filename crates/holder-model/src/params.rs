use serde::{Deserialize, Serialize};

use crate::symbol::SymbolKind;

/// How slot centers are spaced along X.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum LayoutMode {
    /// Spacing follows from a fixed wall thickness between neighbouring slots.
    Pitch { wall_between_slots: f64 },
    /// Slot centers sit a fixed distance apart.
    FixedSpacing { slot_spacing: f64 },
}

/// How the base height is determined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum HeightMode {
    /// Floor, slot and funnel stacked on top of each other.
    Stacked,
    /// Fixed overall height; the slot depth is measured down from the top.
    Fixed { base_height: f64 },
}

/// Which end of the funnel is wide.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FunnelDirection {
    /// Entry guide: the opening flares out at the top face.
    #[default]
    WideAtTop,
    /// Undercut: the cavity widens just below a bore-sized opening.
    WideAtBottom,
}

/// Every physical input of the holder. Lengths are in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputParameters {
    /// Long axis of the held object's elliptical cross-section.
    pub object_long_axis: f64,
    /// Short axis of the held object's elliptical cross-section.
    pub object_short_axis: f64,
    /// Added to both axes to get the slot size.
    pub clearance: f64,
    pub slot_count: usize,
    pub layout: LayoutMode,
    /// Material between the outermost slots and the base edge.
    pub edge_padding: f64,
    pub slot_depth: f64,
    /// Floor under the slots. Only used with `HeightMode::Stacked`.
    pub bottom_thickness: f64,
    pub funnel_height: f64,
    pub height: HeightMode,
    pub funnel_direction: FunnelDirection,
    /// Radius on the four vertical base edges. Zero skips the fillet.
    pub outer_fillet_radius: f64,
    /// Radius on the top face perimeter. Zero skips the fillet.
    pub top_fillet_radius: f64,
    /// How far symbols stand proud of the top face.
    pub mark_height: f64,
    pub mark_width: f64,
    pub mark_length: f64,
    /// Symbol for each slot, by index.
    pub symbol_vocabulary: Vec<SymbolKind>,
}

impl Default for InputParameters {
    fn default() -> Self {
        Self {
            object_long_axis: 11.5,
            object_short_axis: 7.5,
            clearance: 0.2,
            slot_count: 5,
            layout: LayoutMode::FixedSpacing { slot_spacing: 16.0 },
            edge_padding: 8.0,
            slot_depth: 8.0,
            bottom_thickness: 2.0,
            funnel_height: 2.0,
            height: HeightMode::Fixed { base_height: 12.0 },
            funnel_direction: FunnelDirection::WideAtTop,
            outer_fillet_radius: 3.0,
            top_fillet_radius: 1.5,
            mark_height: 0.6,
            mark_width: 0.8,
            mark_length: 4.0,
            symbol_vocabulary: SymbolKind::DEFAULT_VOCABULARY.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let params: InputParameters =
            serde_json::from_str(r#"{ "slot_count": 3, "height": { "mode": "stacked" } }"#)
                .unwrap();
        assert_eq!(params.slot_count, 3);
        assert_eq!(params.height, HeightMode::Stacked);
        assert_eq!(params.object_long_axis, 11.5);
        assert_eq!(params.symbol_vocabulary.len(), 6);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let result: Result<InputParameters, _> = serde_json::from_str(r#"{ "pod_count": 3 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn layout_mode_is_tagged() {
        let json = serde_json::to_string(&LayoutMode::Pitch {
            wall_between_slots: 4.0,
        })
        .unwrap();
        assert_eq!(json, r#"{"mode":"pitch","wall_between_slots":4.0}"#);
    }

    #[test]
    fn funnel_direction_names() {
        let d: FunnelDirection = serde_json::from_str(r#""wide_at_bottom""#).unwrap();
        assert_eq!(d, FunnelDirection::WideAtBottom);
    }
}
