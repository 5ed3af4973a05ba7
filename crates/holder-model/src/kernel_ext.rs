use holder_kernel::{Kernel, KernelIntrospect};

/// A kernel the compositor can both build with and query.
///
/// The pipeline holds one `&mut dyn KernelBundle` and needs read-only
/// queries (shell count, bounds) between mutating steps; `as_introspect`
/// hands out the query view without a second borrow of the kernel.
pub trait KernelBundle: Kernel + KernelIntrospect {
    fn as_introspect(&self) -> &dyn KernelIntrospect;
}

impl<T: Kernel + KernelIntrospect> KernelBundle for T {
    fn as_introspect(&self) -> &dyn KernelIntrospect {
        self
    }
}
