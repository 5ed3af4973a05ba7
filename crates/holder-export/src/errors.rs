/// Errors during parameter file loading.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse parameters: {0}")]
    ParseError(String),

    #[error("unknown file format: {0}")]
    UnknownFormat(String),

    #[error("file version {file_version} is newer than supported version {supported_version}")]
    FutureVersion {
        file_version: u32,
        supported_version: u32,
    },
}

/// Errors during model export.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ExportError {
    #[error("tessellation failed: {0}")]
    TessellationFailed(String),

    #[error("STL export failed: {reason}")]
    StlError { reason: String },

    #[error("STEP export failed: {0}")]
    StepExportFailed(String),
}
