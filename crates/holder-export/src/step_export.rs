use holder_kernel::{KernelSolidHandle, TruckKernel};

use crate::errors::ExportError;

/// Export a composed solid to STEP AP203 text.
pub fn export_step(
    kernel: &TruckKernel,
    solid: &KernelSolidHandle,
    file_name: &str,
) -> Result<String, ExportError> {
    kernel
        .export_step(solid, file_name)
        .map_err(|e| ExportError::StepExportFailed(format!("{}", e)))
}
