//! Shared test utilities for corekit.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with good error messages and `#[track_caller]`
//! - [`main_thread`] - One shared main thread per test binary
//! - [`logging`] - `tracing` output routed through the test harness
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! corekit-test-helpers = { workspace = true }
//! ```
//!
//! ```rust,ignore
//! use corekit_test_helpers::prelude::*;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]

pub mod logging;
pub mod main_thread;
pub mod must;
pub mod prelude;

pub use logging::init_test_tracing;
pub use main_thread::{TEST_MAIN_LABEL, test_main_queue};
pub use must::*;
