use std::fmt;

use holder_kernel::{KernelError, KernelSolidHandle};

use crate::layout::{SlotSpec, SymbolSpec};
use crate::derive::DerivedDimensions;

/// Result of a full holder composition.
#[derive(Debug)]
pub struct Composition {
    /// Handle to the finished solid. Owned by the caller.
    pub solid: KernelSolidHandle,
    pub dims: DerivedDimensions,
    pub slots: Vec<SlotSpec>,
    pub symbols: Vec<SymbolSpec>,
    pub diagnostics: Diagnostics,
}

/// Non-fatal diagnostics from a composition.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    /// Warning messages.
    pub warnings: Vec<String>,
    /// Time spent in kernel operations, in milliseconds.
    pub kernel_time_ms: f64,
}

/// The pipeline step a kernel failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Base,
    VerticalFillet,
    TopFillet,
    Bore { slot: usize },
    Funnel { slot: usize },
    Stroke { slot: usize, stroke: usize },
    SymbolUnion { slot: usize },
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Base => write!(f, "base extrusion"),
            Stage::VerticalFillet => write!(f, "vertical edge fillet"),
            Stage::TopFillet => write!(f, "top perimeter fillet"),
            Stage::Bore { slot } => write!(f, "bore cut of slot {}", slot),
            Stage::Funnel { slot } => write!(f, "funnel cut of slot {}", slot),
            Stage::Stroke { slot, stroke } => {
                write!(f, "stroke {} of symbol {}", stroke, slot)
            }
            Stage::SymbolUnion { slot } => write!(f, "union of symbol {}", slot),
        }
    }
}

/// A parameter set that cannot produce a valid holder.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("slot count must be at least 1")]
    ZeroSlots,

    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error(
        "floor thickness {floor} must be positive (base height {base_height}, slot depth {slot_depth})"
    )]
    FloorTooThin {
        floor: f64,
        base_height: f64,
        slot_depth: f64,
    },

    #[error("outer fillet radius {radius} exceeds half the smaller base side ({limit})")]
    OuterFilletTooLarge { radius: f64, limit: f64 },

    #[error("top fillet radius {radius} must be below floor thickness plus slot depth ({limit})")]
    TopFilletTooLarge { radius: f64, limit: f64 },

    #[error("funnels of neighbouring slots overlap: funnel height {funnel_height} must be below {limit}")]
    FunnelOverlap { funnel_height: f64, limit: f64 },

    #[error("funnel height {funnel_height} reaches the slot bottom (slot depth {slot_depth})")]
    FunnelDeeperThanSlot { funnel_height: f64, slot_depth: f64 },

    #[error("funnel rim breaks through the edge padding: funnel height {funnel_height} must be below {edge_padding}")]
    FunnelBreaksEdge { funnel_height: f64, edge_padding: f64 },

    #[error("base height {base_height} leaves no room to embed symbols {embed_depth} deep")]
    BaseTooShallowForSymbols { base_height: f64, embed_depth: f64 },

    #[error("symbol {index} has a stroke corner at ({x:.3}, {y:.3}) outside the base footprint")]
    SymbolOutOfBounds { index: usize, x: f64, y: f64 },

    #[error("no room for symbols between the funnel rim ({rim}) and the edge inset ({inset})")]
    NoSymbolBand { rim: f64, inset: f64 },

    #[error("{slots} slots need {slots} symbols but the vocabulary has {available}")]
    VocabularyTooSmall { slots: usize, available: usize },
}

/// Errors from building a holder.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("{stage} failed: {source}")]
    Kernel { stage: Stage, source: KernelError },

    #[error("composed solid has {shells} shells, expected one")]
    Disconnected { shells: usize },
}

impl ModelError {
    pub(crate) fn kernel(stage: Stage) -> impl FnOnce(KernelError) -> ModelError {
        move |source| ModelError::Kernel { stage, source }
    }
}
