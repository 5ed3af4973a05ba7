use std::fmt;

use serde::Serialize;

use crate::derive::DerivedDimensions;
use crate::params::InputParameters;
use crate::symbol::SymbolKind;

/// Human-readable report of the sizes a parameter set produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionSummary {
    /// Length, width, height of the base.
    pub base: [f64; 3],
    /// Long and short axis of each slot.
    pub slot: [f64; 2],
    pub slot_count: usize,
    pub slot_spacing: Option<f64>,
    pub clearance: f64,
    pub slot_depth: f64,
    pub floor_thickness: f64,
    pub funnel_height: f64,
    pub symbols: Vec<SymbolKind>,
}

impl DimensionSummary {
    pub fn new(params: &InputParameters, dims: &DerivedDimensions) -> Self {
        Self {
            base: [dims.base_length, dims.base_width, dims.base_height],
            slot: [dims.slot_long, dims.slot_short],
            slot_count: params.slot_count,
            slot_spacing: dims.slot_spacing,
            clearance: params.clearance,
            slot_depth: params.slot_depth,
            floor_thickness: dims.floor_thickness,
            funnel_height: params.funnel_height,
            symbols: params
                .symbol_vocabulary
                .iter()
                .take(params.slot_count)
                .copied()
                .collect(),
        }
    }
}

impl fmt::Display for DimensionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [l, w, h] = self.base;
        writeln!(f, "Base:      {:.1} x {:.1} x {:.1} mm", l, w, h)?;
        write!(
            f,
            "Slots:     {} x ({:.1} x {:.1} mm, clearance +{} mm)",
            self.slot_count, self.slot[0], self.slot[1], self.clearance
        )?;
        match self.slot_spacing {
            Some(spacing) => writeln!(f, ", spacing {:.1} mm", spacing)?,
            None => writeln!(f)?,
        }
        writeln!(
            f,
            "Depth:     {:.1} mm over a {:.1} mm floor",
            self.slot_depth, self.floor_thickness
        )?;
        writeln!(f, "Funnel:    {:.1} mm", self.funnel_height)?;
        let glyphs: Vec<String> = self.symbols.iter().map(|s| s.to_string()).collect();
        write!(f, "Symbols:   {}", glyphs.join(" "))
    }
}
