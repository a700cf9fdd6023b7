//! Compile-time marking of code that may terminate abnormally.
//!
//! A function that can raise (directly, or by calling another raising
//! function without bridging it) takes a `&Raises` parameter:
//!
//! ```
//! use corekit_bridge::{Exception, Raises, bridge};
//!
//! fn parse_header(raises: &Raises, bytes: &[u8]) -> u8 {
//!     match bytes.first() {
//!         Some(b) => *b,
//!         None => raises.raise(Exception::new("Truncated", "empty buffer")),
//!     }
//! }
//!
//! // Raising callers stay raising: they need a token to call `parse_header`.
//! fn parse_packet(raises: &Raises, bytes: &[u8]) -> u8 {
//!     parse_header(raises, bytes)
//! }
//!
//! // Bridging locally ends the chain; this one takes no token.
//! fn packet_kind(bytes: &[u8]) -> Option<u8> {
//!     bridge(|raises| parse_packet(raises, bytes)).ok()
//! }
//!
//! assert_eq!(packet_kind(&[7, 1]), Some(7));
//! assert_eq!(packet_kind(&[]), None);
//! ```
//!
//! Tokens are only minted by [`bridge`](crate::bridge), so holding one
//! proves an interception scope is active further up the current thread's
//! stack. `Raises` is neither `Send` nor `Sync`: a raise on another thread
//! would not unwind into this scope.

use core::fmt;
use core::marker::PhantomData;
use std::any::Any;

use crate::CapturedFailure;

/// Proof that the holder runs inside an interception scope.
pub struct Raises {
    _scope: PhantomData<*const ()>,
}

impl Raises {
    pub(crate) fn new() -> Self {
        Self {
            _scope: PhantomData,
        }
    }

    /// Trigger an abnormal termination carrying `payload`.
    pub fn raise<P: Any + Send>(&self, payload: P) -> ! {
        std::panic::panic_any(payload)
    }

    /// Unwrap a bridged result, re-raising its original payload on failure.
    pub fn rethrow<T>(&self, result: Result<T, CapturedFailure>) -> T {
        match result {
            Ok(value) => value,
            Err(failure) => std::panic::resume_unwind(failure.into_underlying()),
        }
    }
}

impl fmt::Debug for Raises {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Raises")
    }
}
