//! The value an intercepted abnormal termination is converted into.
//!
//! A [`CapturedFailure`] only ever comes out of an interception scope
//! ([`try_run`](crate::try_run), [`bridge`](crate::bridge)). It keeps the
//! original panic payload exactly as raised, so callers that care about the
//! cause can downcast it themselves; the bridge never classifies.

use core::fmt;
use std::any::Any;
use std::borrow::Cow;

use crate::{ERROR_CODE_THROWN, ERROR_DOMAIN, UNDERLYING_PAYLOAD_KEY};

/// An abnormal termination that was intercepted and turned into a value.
///
/// Immutable once built. The payload is owned by whoever holds the failure;
/// it is released with [`CapturedFailure::into_underlying`], typically to be
/// re-raised.
#[derive(thiserror::Error)]
#[error(
    "abnormal termination intercepted ({domain}/{code}): {}",
    .message.as_deref().unwrap_or("opaque payload"),
    domain = ERROR_DOMAIN,
    code = ERROR_CODE_THROWN
)]
pub struct CapturedFailure {
    payload: Box<dyn Any + Send>,
    message: Option<String>,
}

impl CapturedFailure {
    pub(crate) fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let message = describe(&*payload);
        Self { payload, message }
    }

    /// Error domain shared by every captured failure.
    pub fn domain(&self) -> &'static str {
        ERROR_DOMAIN
    }

    /// Discriminator for "an abnormal termination was trapped".
    pub fn code(&self) -> u32 {
        ERROR_CODE_THROWN
    }

    /// Human-readable description derived from the payload, if it had one.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The original termination object.
    pub fn underlying(&self) -> &(dyn Any + Send) {
        &*self.payload
    }

    /// Typed view of the original termination object.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.underlying().downcast_ref::<T>()
    }

    /// Whether the original termination object is a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.underlying().is::<T>()
    }

    /// Keyed access to the failure's attached information.
    ///
    /// [`UNDERLYING_PAYLOAD_KEY`] is the only key currently populated.
    pub fn info(&self, key: &str) -> Option<&(dyn Any + Send)> {
        (key == UNDERLYING_PAYLOAD_KEY).then(|| self.underlying())
    }

    /// Give up the failure and take ownership of the original payload.
    pub fn into_underlying(self) -> Box<dyn Any + Send> {
        self.payload
    }
}

impl fmt::Debug for CapturedFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedFailure")
            .field("domain", &ERROR_DOMAIN)
            .field("code", &ERROR_CODE_THROWN)
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// A named termination object.
///
/// Any `Any + Send` value can be raised; this type exists for call sites that
/// want a name and a reason to show up in [`CapturedFailure::message`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exception {
    /// Short identifier, e.g. `"InvalidArgument"`
    pub name: Cow<'static, str>,
    /// Free-form explanation
    pub reason: String,
}

impl Exception {
    /// Create a new exception.
    pub fn new(name: impl Into<Cow<'static, str>>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Trigger an abnormal termination carrying this exception.
    ///
    /// Only call this from code that takes a [`Raises`](crate::Raises) token,
    /// or directly inside a [`try_run`](crate::try_run) closure.
    pub fn raise(self) -> ! {
        std::panic::panic_any(self)
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}

fn describe(payload: &(dyn Any + Send)) -> Option<String> {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        Some((*s).to_owned())
    } else if let Some(s) = payload.downcast_ref::<String>() {
        Some(s.clone())
    } else {
        payload.downcast_ref::<Exception>().map(Exception::to_string)
    }
}
