use crate::types::*;

/// Core geometry kernel trait: the solid-construction operations the holder
/// pipeline is built from.
///
/// Every operation is non-destructive. Inputs stay valid and a fresh handle is
/// returned; callers drop what they no longer need with `release`.
/// Implemented by TruckKernel (wraps real truck) and MockKernel (deterministic test double).
pub trait Kernel {
    /// Extrude a profile along +Z from `z_base` through `height`.
    fn extrude_profile(
        &mut self,
        profile: &Profile2D,
        z_base: f64,
        height: f64,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Loft through two or more `(profile, z)` sections in increasing Z.
    /// Adjacent sections must be of the same profile kind.
    fn loft_profiles(
        &mut self,
        sections: &[(Profile2D, f64)],
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Boolean union of two solids.
    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Boolean subtraction: a minus b.
    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Round the selected edges with the given radius.
    fn fillet_edges(
        &mut self,
        solid: &KernelSolidHandle,
        edges: EdgeSelector,
        radius: f64,
    ) -> Result<KernelSolidHandle, KernelError>;

    /// Tessellate a solid to a triangle mesh.
    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        tolerance: f64,
    ) -> Result<RenderMesh, KernelError>;

    /// Drop a solid. Releasing an unknown handle is a no-op.
    fn release(&mut self, solid: KernelSolidHandle);
}

/// Read-only queries on kernel solids.
pub trait KernelIntrospect {
    /// Axis-aligned bounding box, or None for an unknown handle.
    fn bounding_box(&self, solid: &KernelSolidHandle) -> Option<BoundingBox>;

    /// Number of boundary shells. A single closed volume has exactly one.
    fn shell_count(&self, solid: &KernelSolidHandle) -> usize;

    /// Number of solids currently held by the kernel.
    fn live_solids(&self) -> usize;
}
