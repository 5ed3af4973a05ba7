use serde::{Deserialize, Serialize};

// Re-export shared types from holder-types
pub use holder_types::{BoundingBox, EdgeSelector, Profile2D};

/// Opaque handle to a solid in the geometry kernel.
///
/// Not `Clone`: a handle has a single owner, and giving it to
/// `Kernel::release` ends its life. Valid only for the kernel that issued it.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct KernelSolidHandle(pub(crate) u64);

impl KernelSolidHandle {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Errors from kernel operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum KernelError {
    #[error("boolean operation failed: {reason}")]
    BooleanFailed { reason: String },

    #[error("fillet failed: {reason}")]
    FilletFailed { reason: String },

    #[error("loft failed: {reason}")]
    LoftFailed { reason: String },

    #[error("invalid profile: {reason}")]
    ProfileFailed { reason: String },

    #[error("tessellation failed: {reason}")]
    TessellationFailed { reason: String },

    #[error("STEP export failed: {reason}")]
    StepExportFailed { reason: String },

    #[error("solid not found: handle {handle}")]
    EntityNotFound { handle: u64 },

    #[error("operation not supported: {operation}")]
    NotSupported { operation: String },

    #[error("kernel error: {message}")]
    Other { message: String },
}

/// Tessellated triangle mesh.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RenderMesh {
    /// Flat array of vertex positions [x0, y0, z0, x1, y1, z1, ...].
    pub vertices: Vec<f32>,
    /// Flat array of vertex normals [nx0, ny0, nz0, nx1, ny1, nz1, ...].
    pub normals: Vec<f32>,
    /// Triangle indices into the vertex array.
    pub indices: Vec<u32>,
    /// Mapping from triangle ranges to source faces.
    pub face_ranges: Vec<FaceRange>,
}

impl RenderMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Maps a contiguous range of triangle indices to one face of the solid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaceRange {
    /// Position of the face in the solid's face iteration order.
    pub face_index: u32,
    /// Start index in the indices array (inclusive).
    pub start_index: u32,
    /// End index in the indices array (exclusive).
    pub end_index: u32,
}
