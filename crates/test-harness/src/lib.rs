//! Test harness for holder generation.
//!
//! Provides programmatic tools for composing holders against either kernel,
//! verifying the result with mesh oracles, and reporting failures.
//!
//! # Key Components
//!
//! - [`HolderBuilder`]: Compose a holder and check it in a few calls
//! - [`oracle`]: Verification functions returning pass/fail verdicts
//! - [`helpers`]: Error type and mesh math

pub mod helpers;
pub mod oracle;
pub mod workflow;

pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
pub use workflow::HolderBuilder;
