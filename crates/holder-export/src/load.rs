use std::path::Path;

use holder_model::InputParameters;
use serde::Deserialize;
use tracing::debug;

use crate::errors::LoadError;
use crate::save::{FORMAT_NAME, FORMAT_VERSION};

#[derive(Debug, Deserialize)]
struct ParamsFileRaw {
    format: String,
    version: u32,
    #[serde(default)]
    parameters: InputParameters,
}

/// Deserialize parameters from a JSON string.
///
/// Accepts either a full parameter file (`format`, `version`, `parameters`)
/// or a bare parameter object. Missing parameters take their defaults.
pub fn load_params(json: &str) -> Result<InputParameters, LoadError> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if value.get("format").is_none() {
        return serde_json::from_value(value).map_err(|e| LoadError::ParseError(e.to_string()));
    }

    let raw: ParamsFileRaw =
        serde_json::from_value(value).map_err(|e| LoadError::ParseError(e.to_string()))?;
    if raw.format != FORMAT_NAME {
        return Err(LoadError::UnknownFormat(raw.format));
    }
    if raw.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: raw.version,
            supported_version: FORMAT_VERSION,
        });
    }
    Ok(raw.parameters)
}

/// Read and deserialize a parameter file.
pub fn load_params_file(path: &Path) -> Result<InputParameters, LoadError> {
    debug!(path = %path.display(), "loading parameters");
    let json = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_params(&json)
}
