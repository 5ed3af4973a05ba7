pub mod mock_kernel;
pub mod primitives;
pub mod tessellation;
pub mod traits;
pub mod truck_kernel;
pub mod types;

pub use mock_kernel::{KernelOp, MockKernel};
pub use traits::*;
pub use truck_kernel::TruckKernel;
pub use types::*;
