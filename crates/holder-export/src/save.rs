use holder_model::InputParameters;
use serde::Serialize;

/// Format identifier written into parameter files.
pub const FORMAT_NAME: &str = "multi-slot-holder";

/// Current parameter file version.
pub const FORMAT_VERSION: u32 = 1;

/// The top-level parameter file structure.
#[derive(Debug, Clone, Serialize)]
pub struct ParamsFile<'a> {
    pub format: &'a str,
    pub version: u32,
    pub parameters: &'a InputParameters,
}

/// Serialize parameters to a pretty-printed JSON string.
pub fn save_params(params: &InputParameters) -> String {
    let file = ParamsFile {
        format: FORMAT_NAME,
        version: FORMAT_VERSION,
        parameters: params,
    };
    serde_json::to_string_pretty(&file).expect("InputParameters serialization should never fail")
}
