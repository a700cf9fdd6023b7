//! Labelled execution with logging on abnormal termination.
//!
//! [`perform`] does not swallow anything. It intercepts a termination only
//! long enough to log where it happened, then re-raises the same payload, so
//! the logs are flushed before the unwind continues towards the next bridge.

use std::panic::{Location, resume_unwind};

use crate::{CapturedFailure, Raises, try_run};

/// Run `work`, logging and re-raising if it terminates abnormally.
///
/// The caller's source location is recorded in the log event.
#[track_caller]
pub fn perform<F>(raises: &Raises, label: &str, work: F)
where
    F: FnOnce(),
{
    perform_with(raises, label, work, |_| {});
}

/// Like [`perform`], with a hook that runs after logging and before the
/// termination is re-raised.
///
/// `on_error` sees the captured failure and can log extra state. It runs
/// exactly once, and only on the failure path.
#[track_caller]
pub fn perform_with<F, E>(_raises: &Raises, label: &str, work: F, on_error: E)
where
    F: FnOnce(),
    E: FnOnce(&CapturedFailure),
{
    let location = Location::caller();
    if let Err(failure) = try_run(work) {
        tracing::error!(
            label,
            file = location.file(),
            line = location.line(),
            message = failure.message().unwrap_or_default(),
            "unit of work terminated abnormally, re-raising"
        );
        on_error(&failure);
        resume_unwind(failure.into_underlying());
    }
}
