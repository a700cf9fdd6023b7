//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use corekit_test_helpers::prelude::*;
//! ```

pub use crate::logging::init_test_tracing;
pub use crate::main_thread::{TEST_MAIN_LABEL, test_main_queue};
pub use crate::must::{must, must_some, must_with};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;
