//! The interception scope.
//!
//! Below a bridge, a panic unwinds normally. At the bridge it is converted
//! once into a [`CapturedFailure`]. Above it, it is an ordinary value.

use std::panic::{AssertUnwindSafe, catch_unwind, resume_unwind};

use crate::{CapturedFailure, ERROR_CODE_THROWN, ERROR_DOMAIN, Raises};

/// Run `work`, turning any abnormal termination into an `Err`.
///
/// Side effects `work` performed before terminating are kept; nothing is
/// rolled back. The closure is treated as unwind safe for that reason.
///
/// # Errors
///
/// Returns [`CapturedFailure`] wrapping the original payload if `work`
/// terminated abnormally at any call depth.
///
/// # Example
///
/// ```
/// use corekit_bridge::try_run;
///
/// assert!(try_run(|| {}).is_ok());
///
/// let failure = try_run(|| std::panic::panic_any(404_u16)).unwrap_err();
/// assert_eq!(failure.downcast_ref::<u16>(), Some(&404));
/// ```
pub fn try_run<F>(work: F) -> Result<(), CapturedFailure>
where
    F: FnOnce(),
{
    try_run_with(work)
}

/// Like [`try_run`], but keeps the value `work` returns.
///
/// # Errors
///
/// Returns [`CapturedFailure`] if `work` terminated abnormally.
pub fn try_run_with<T, F>(work: F) -> Result<T, CapturedFailure>
where
    F: FnOnce() -> T,
{
    catch_unwind(AssertUnwindSafe(work)).map_err(|payload| {
        let failure = CapturedFailure::from_payload(payload);
        tracing::debug!(
            domain = ERROR_DOMAIN,
            code = ERROR_CODE_THROWN,
            message = failure.message().unwrap_or_default(),
            "abnormal termination intercepted"
        );
        failure
    })
}

/// Open an interception scope and hand `work` a [`Raises`] token.
///
/// This is the entry point for code written against the `&Raises`
/// convention; see [`raises`](crate::raises).
///
/// # Errors
///
/// Returns [`CapturedFailure`] if `work` terminated abnormally.
pub fn bridge<T, F>(work: F) -> Result<T, CapturedFailure>
where
    F: FnOnce(&Raises) -> T,
{
    let raises = Raises::new();
    try_run_with(|| work(&raises))
}

/// Re-trigger a previously captured failure at the call site.
///
/// Does nothing for `Ok(())`. For `Err`, unwinds with the very payload that
/// was captured, without running the panic hook a second time. Call this only
/// where an enclosing interception scope exists, or where terminating the
/// process is the intended outcome.
pub fn raise_if_failure(result: Result<(), CapturedFailure>) {
    if let Err(failure) = result {
        resume_unwind(failure.into_underlying());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Exception;
    use std::cell::Cell;

    #[test]
    fn test_success_is_ok() {
        let ran = Cell::new(false);
        let result = try_run(|| ran.set(true));
        assert!(matches!(result, Ok(())));
        assert!(ran.get());
    }

    #[test]
    fn test_panic_becomes_failure() {
        let result = try_run(|| std::panic::panic_any("boom"));
        let Err(failure) = result else {
            panic!("expected a captured failure");
        };
        assert_eq!(failure.message(), Some("boom"));
    }

    #[test]
    fn test_partial_side_effects_are_kept() {
        let steps = Cell::new(0);
        let result = try_run(|| {
            steps.set(1);
            Exception::new("Halt", "after first step").raise();
        });
        assert!(matches!(result, Err(_)));
        assert_eq!(steps.get(), 1);
    }

    #[test]
    fn test_try_run_with_returns_value() {
        let value = try_run_with(|| 6 * 7);
        assert!(matches!(value, Ok(42)));
    }

    #[test]
    fn test_raise_if_failure_noop_on_success() {
        raise_if_failure(Ok(()));
    }

    #[test]
    fn test_raise_if_failure_reraises_into_outer_scope() {
        let outer = try_run(|| {
            let inner = try_run(|| std::panic::panic_any(7_u8));
            raise_if_failure(inner);
        });
        let Err(failure) = outer else {
            panic!("expected the inner failure to be re-raised");
        };
        assert_eq!(failure.downcast_ref::<u8>(), Some(&7));
    }

    #[test]
    fn test_bridge_nested_rethrow() {
        let outer = bridge(|raises| {
            let inner = bridge::<(), _>(|inner| inner.raise(Exception::new("Inner", "deep")));
            raises.rethrow(inner);
        });
        let Err(failure) = outer else {
            panic!("expected the nested failure");
        };
        assert_eq!(failure.message(), Some("Inner: deep"));
    }

    #[test]
    fn test_bridge_passes_value_through() {
        let result = bridge(|raises| raises.rethrow(try_run_with(|| "ok")));
        assert!(matches!(result, Ok("ok")));
    }
}
