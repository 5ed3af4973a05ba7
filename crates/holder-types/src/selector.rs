use serde::{Deserialize, Serialize};

/// Edge set selected for a fillet.
///
/// Selection is by position on an axis-aligned block, not by kernel id,
/// so the same selector means the same edges in every kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeSelector {
    /// The four edges parallel to Z.
    Vertical,
    /// Every edge bounding the top (max Z) face.
    TopPerimeter,
}

impl std::fmt::Display for EdgeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EdgeSelector::Vertical => write!(f, "vertical edges"),
            EdgeSelector::TopPerimeter => write!(f, "top perimeter"),
        }
    }
}
