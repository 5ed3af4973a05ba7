//! Raised symbols: the stroke vocabulary and the emboss step that unions the
//! strokes of one symbol onto the holder.

use std::fmt;

use holder_kernel::{KernelSolidHandle, Profile2D};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::boolean::{combine, BooleanKind};
use crate::derive::{DerivedDimensions, SYMBOL_EMBED_DEPTH};
use crate::kernel_ext::KernelBundle;
use crate::layout::SymbolSpec;
use crate::params::InputParameters;
use crate::types::{ModelError, Stage};

/// Offset between parallel strokes of one glyph.
pub const GLYPH_OFFSET: f64 = 1.0;

/// A tactile glyph identifying one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SymbolKind {
    Dash,
    Cross,
    X,
    Equals,
    Zigzag,
    #[serde(rename = "n_glyph", alias = "n")]
    NGlyph,
    Caret,
}

impl SymbolKind {
    pub const DEFAULT_VOCABULARY: [SymbolKind; 6] = [
        SymbolKind::Dash,
        SymbolKind::Cross,
        SymbolKind::X,
        SymbolKind::Equals,
        SymbolKind::Zigzag,
        SymbolKind::NGlyph,
    ];

    /// Single character drawn by the glyph, for reports.
    pub fn glyph(self) -> char {
        match self {
            SymbolKind::Dash => '-',
            SymbolKind::Cross => '+',
            SymbolKind::X => 'x',
            SymbolKind::Equals => '=',
            SymbolKind::Zigzag => 'z',
            SymbolKind::NGlyph => 'N',
            SymbolKind::Caret => '^',
        }
    }

    /// Strokes of this glyph for marks `length` long and `width` wide,
    /// relative to the symbol center.
    pub fn strokes(self, length: f64, width: f64) -> Vec<Stroke> {
        let l = length;
        let w = width;
        let o = GLYPH_OFFSET;
        match self {
            SymbolKind::Dash => vec![Stroke::new(0.0, 0.0, l, w, 0.0)],
            SymbolKind::Cross => vec![
                Stroke::new(0.0, 0.0, l, w, 0.0),
                Stroke::new(0.0, 0.0, w, l, 0.0),
            ],
            SymbolKind::X => vec![
                Stroke::new(0.0, 0.0, 0.7 * l, w, 45.0),
                Stroke::new(0.0, 0.0, 0.7 * l, w, -45.0),
            ],
            SymbolKind::Equals => vec![
                Stroke::new(0.0, -o, l, w, 0.0),
                Stroke::new(0.0, o, l, w, 0.0),
            ],
            SymbolKind::Zigzag => vec![
                Stroke::new(0.0, o, l, w, 0.0),
                Stroke::new(0.0, -o, l, w, 0.0),
                Stroke::joining([-l / 2.0, -o], [l / 2.0, o], w),
            ],
            SymbolKind::NGlyph => vec![
                Stroke::new(-o, 0.0, w, l, 0.0),
                Stroke::new(o, 0.0, w, l, 0.0),
                Stroke::joining([-o, l / 2.0], [o, -l / 2.0], w),
            ],
            SymbolKind::Caret => vec![
                Stroke::new(-1.2, -0.8, 0.5 * l, w, 45.0),
                Stroke::new(1.2, -0.8, 0.5 * l, w, -45.0),
            ],
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())
    }
}

/// One straight bar of a glyph: a `length` by `width` rectangle (X by Y before
/// rotation) turned `angle_deg` about its own center at (`dx`, `dy`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub dx: f64,
    pub dy: f64,
    pub length: f64,
    pub width: f64,
    pub angle_deg: f64,
}

impl Stroke {
    pub fn new(dx: f64, dy: f64, length: f64, width: f64, angle_deg: f64) -> Self {
        Self {
            dx,
            dy,
            length,
            width,
            angle_deg,
        }
    }

    /// A bar whose center line runs from `from` to `to`.
    pub fn joining(from: [f64; 2], to: [f64; 2], width: f64) -> Self {
        let (ex, ey) = (to[0] - from[0], to[1] - from[1]);
        Self {
            dx: (from[0] + to[0]) / 2.0,
            dy: (from[1] + to[1]) / 2.0,
            length: ex.hypot(ey),
            width,
            angle_deg: ey.atan2(ex).to_degrees(),
        }
    }

    /// Footprint of the stroke for a symbol centered at `center`.
    pub fn profile(&self, center: [f64; 2]) -> Profile2D {
        Profile2D::rotated_rect(
            center[0] + self.dx,
            center[1] + self.dy,
            self.length,
            self.width,
            self.angle_deg,
        )
    }
}

/// Extrude every stroke of a symbol as its own solid.
///
/// Strokes start `SYMBOL_EMBED_DEPTH` below the top face so they fuse with
/// the base and stand `mark_height` above it. On failure the strokes built so
/// far are released.
pub fn build_symbol(
    kb: &mut dyn KernelBundle,
    spec: &SymbolSpec,
    dims: &DerivedDimensions,
    params: &InputParameters,
) -> Result<Vec<KernelSolidHandle>, ModelError> {
    let z_base = dims.base_height - SYMBOL_EMBED_DEPTH;
    let height = SYMBOL_EMBED_DEPTH + params.mark_height;
    let center = [spec.center_x, spec.center_y];

    let mut built = Vec::with_capacity(spec.strokes.len());
    for (i, stroke) in spec.strokes.iter().enumerate() {
        match kb.extrude_profile(&stroke.profile(center), z_base, height) {
            Ok(handle) => built.push(handle),
            Err(source) => {
                for handle in built {
                    kb.release(handle);
                }
                return Err(ModelError::Kernel {
                    stage: Stage::Stroke {
                        slot: spec.index,
                        stroke: i,
                    },
                    source,
                });
            }
        }
    }
    Ok(built)
}

/// Union one symbol onto the accumulated solid, consuming it.
pub fn emboss_symbol(
    kb: &mut dyn KernelBundle,
    acc: KernelSolidHandle,
    spec: &SymbolSpec,
    dims: &DerivedDimensions,
    params: &InputParameters,
) -> Result<KernelSolidHandle, ModelError> {
    let strokes = match build_symbol(kb, spec, dims, params) {
        Ok(strokes) => strokes,
        Err(e) => {
            kb.release(acc);
            return Err(e);
        }
    };
    debug!(slot = spec.index, kind = %spec.kind, strokes = strokes.len(), "embossing symbol");

    let mut acc = acc;
    let mut pending = strokes.into_iter();
    while let Some(stroke) = pending.next() {
        match combine(
            kb,
            acc,
            stroke,
            BooleanKind::Union,
            Stage::SymbolUnion { slot: spec.index },
        ) {
            Ok(next) => acc = next,
            Err(e) => {
                for rest in pending {
                    kb.release(rest);
                }
                return Err(e);
            }
        }
    }
    Ok(acc)
}
