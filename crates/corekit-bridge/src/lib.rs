//! Converts abnormal termination into explicit results, and back.
//!
//! Some call sites cannot let a panic unwind past them: FFI entry points,
//! callbacks driven by foreign runtimes, APIs that promised a `Result`. This
//! crate is the single controlled point where unwinding becomes a value.
//!
//! # Architecture
//!
//! - [`bridge`](mod@bridge): [`try_run`], [`try_run_with`], [`bridge()`] and
//!   [`raise_if_failure`]
//! - [`failure`]: [`CapturedFailure`], the one error kind, and [`Exception`]
//! - [`raises`]: the [`Raises`] token marking termination-capable code
//! - [`perform`](mod@perform): labelled execution that logs and re-raises
//!
//! # Propagation discipline
//!
//! Code that may raise takes `&Raises`. It can only be called by code that
//! holds a token itself or from inside [`bridge()`]. Code that bridges
//! locally takes no token and is safe to call from anywhere.
//!
//! # Example
//!
//! ```
//! use corekit_bridge::prelude::*;
//!
//! fn checked_div(raises: &Raises, a: u32, b: u32) -> u32 {
//!     if b == 0 {
//!         raises.raise(Exception::new("DivideByZero", format!("{a} / 0")));
//!     }
//!     a / b
//! }
//!
//! let failure = bridge(|raises| checked_div(raises, 1, 0)).unwrap_err();
//! assert_eq!(failure.domain(), ERROR_DOMAIN);
//! assert_eq!(failure.code(), ERROR_CODE_THROWN);
//! assert_eq!(failure.message(), Some("DivideByZero: 1 / 0"));
//! ```
//!
//! Interception needs `panic = "unwind"`. Under `panic = "abort"` every
//! termination ends the process before a bridge can see it.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod bridge;
pub mod failure;
pub mod perform;
pub mod prelude;
pub mod raises;

pub use bridge::{bridge, raise_if_failure, try_run, try_run_with};
pub use failure::{CapturedFailure, Exception};
pub use perform::{perform, perform_with};
pub use raises::Raises;

/// Error domain of every [`CapturedFailure`].
pub const ERROR_DOMAIN: &str = "corekit.bridge.unwind";

/// Code meaning "an abnormal termination was trapped". The only code.
pub const ERROR_CODE_THROWN: u32 = 900;

/// Key under which [`CapturedFailure::info`] exposes the original payload.
pub const UNDERLYING_PAYLOAD_KEY: &str = "underlying_payload";

/// Result of running a unit of work under an interception scope.
pub type BridgeResult<T = ()> = std::result::Result<T, CapturedFailure>;
