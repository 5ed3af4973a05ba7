//! HolderBuilder: compose a holder against either kernel and check it.

use holder_kernel::{BoundingBox, KernelSolidHandle, MockKernel, RenderMesh, TruckKernel};
use holder_model::{compose, Composition, InputParameters, KernelBundle};

use crate::helpers::HarnessError;
use crate::oracle::{self, OracleVerdict};

/// Tessellation tolerance used by the harness, in millimetres.
pub const MESH_TOLERANCE: f64 = 0.05;

/// Composes a holder from parameters and exposes the result for checking.
pub struct HolderBuilder {
    pub params: InputParameters,
    kernel: Box<dyn KernelBundle>,
    composition: Option<Composition>,
}

impl HolderBuilder {
    /// A builder on MockKernel (deterministic, fast).
    pub fn mock() -> Self {
        Self::with_kernel(Box::new(MockKernel::new()))
    }

    /// A builder on TruckKernel (real geometry).
    pub fn truck() -> Self {
        Self::with_kernel(Box::new(TruckKernel::new()))
    }

    pub fn with_kernel(kernel: Box<dyn KernelBundle>) -> Self {
        Self {
            params: InputParameters::default(),
            kernel,
            composition: None,
        }
    }

    /// Replace the parameters used by the next `compose`.
    pub fn with_params(mut self, params: InputParameters) -> Self {
        self.params = params;
        self
    }

    /// Compose the holder, replacing any earlier result.
    pub fn compose(&mut self) -> Result<&Composition, HarnessError> {
        if let Some(old) = self.composition.take() {
            self.kernel.release(old.solid);
        }
        let composition = compose(self.kernel.as_mut(), &self.params)?;
        Ok(self.composition.insert(composition))
    }

    pub fn composition(&self) -> Result<&Composition, HarnessError> {
        self.composition.as_ref().ok_or(HarnessError::NoSolid)
    }

    pub fn solid(&self) -> Result<&KernelSolidHandle, HarnessError> {
        Ok(&self.composition()?.solid)
    }

    pub fn kernel(&self) -> &dyn KernelBundle {
        self.kernel.as_ref()
    }

    pub fn kernel_mut(&mut self) -> &mut dyn KernelBundle {
        self.kernel.as_mut()
    }

    /// The box the finished holder should fill: the base plus the raised marks.
    pub fn expected_bounds(&self) -> Result<BoundingBox, HarnessError> {
        let dims = &self.composition()?.dims;
        let (hl, hw) = (dims.base_length / 2.0, dims.base_width / 2.0);
        Ok(BoundingBox::new(
            [-hl, -hw, 0.0],
            [hl, hw, dims.base_height + self.params.mark_height],
        ))
    }

    pub fn tessellate(&mut self) -> Result<RenderMesh, HarnessError> {
        let solid = &self
            .composition
            .as_ref()
            .ok_or(HarnessError::NoSolid)?
            .solid;
        Ok(self.kernel.tessellate(solid, MESH_TOLERANCE)?)
    }

    /// Run the solid oracles: single shell, expected bounds, no leaked solids.
    pub fn check_solid(&self, tolerance: f64) -> Result<Vec<OracleVerdict>, HarnessError> {
        let solid = self.solid()?;
        let introspect = self.kernel.as_introspect();
        Ok(vec![
            oracle::check_single_shell(introspect, solid),
            oracle::check_solid_bounds(introspect, solid, &self.expected_bounds()?, tolerance),
            oracle::check_live_solids(introspect, 1),
        ])
    }

    /// Tessellate and run the mesh oracles.
    pub fn check_mesh(&mut self) -> Result<Vec<OracleVerdict>, HarnessError> {
        let mesh = self.tessellate()?;
        Ok(oracle::run_all_mesh_checks(&mesh))
    }

    /// Fail on the first verdict that did not pass.
    pub fn assert_all_pass(verdicts: &[OracleVerdict]) -> Result<(), HarnessError> {
        match verdicts.iter().find(|v| !v.passed) {
            None => Ok(()),
            Some(v) => Err(HarnessError::OracleFailure {
                oracle: v.oracle_name.clone(),
                detail: v.detail.clone(),
            }),
        }
    }
}
