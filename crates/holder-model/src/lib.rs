//! Parametric multi-slot holder: dimension derivation, layout and the
//! solid-construction pipeline, written against the `holder-kernel` traits.

pub mod base;
pub mod boolean;
pub mod compose;
pub mod derive;
pub mod kernel_ext;
pub mod layout;
pub mod params;
pub mod slot;
pub mod summary;
pub mod symbol;
pub mod types;

pub use base::build_base;
pub use boolean::{combine, BooleanKind};
pub use compose::compose;
pub use derive::{derive, DerivedDimensions, SYMBOL_EMBED_DEPTH};
pub use kernel_ext::KernelBundle;
pub use layout::{plan_slots, plan_symbols, SlotSpec, SymbolPlan, SymbolSpec, SAFE_EDGE_INSET};
pub use params::{FunnelDirection, HeightMode, InputParameters, LayoutMode};
pub use slot::{cut_slot, funnel_sections, CUT_OVERSHOOT};
pub use summary::DimensionSummary;
pub use symbol::{build_symbol, emboss_symbol, Stroke, SymbolKind, GLYPH_OFFSET};
pub use types::*;
