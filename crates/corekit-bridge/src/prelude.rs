//! Prelude module for convenient bridge imports.
//!
//! ```
//! use corekit_bridge::prelude::*;
//!
//! fn load(raises: &Raises) -> BridgeResult<u8> {
//!     Ok(raises.rethrow(try_run_with(|| 1)))
//! }
//!
//! assert!(matches!(bridge(load), Ok(Ok(1))));
//! ```

pub use crate::{
    BridgeResult, CapturedFailure, ERROR_CODE_THROWN, ERROR_DOMAIN, Exception, Raises,
    UNDERLYING_PAYLOAD_KEY, bridge, perform, perform_with, raise_if_failure, try_run,
    try_run_with,
};

/// Run a block under [`bridge`](crate::bridge), binding the token to a name.
///
/// ```
/// use corekit_bridge::{BridgeResult, Exception, bridged};
///
/// let result: BridgeResult = bridged!(raises => {
///     raises.raise(Exception::new("Stop", "requested"))
/// });
/// assert!(result.is_err());
/// ```
#[macro_export]
macro_rules! bridged {
    ($raises:ident => $body:block) => {
        $crate::bridge(|$raises: &$crate::Raises| $body)
    };
}
