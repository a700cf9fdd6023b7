//! Main-thread-safe dispatch.
//!
//! Both entry points check whether the caller already is the main thread and
//! run the work inline if so. That check is the whole algorithm; the queue
//! itself is [`crate::main_queue`].
//!
//! # Deadlock hazard
//!
//! The same-thread check only covers self-dispatch. If the main thread is
//! blocked waiting on thread T (a join, a lock, a `dispatch_sync` onto a
//! serial queue) and T calls [`run_on_main_thread_sync`], both threads wait
//! forever. Avoiding that cycle is the caller's responsibility.

use std::panic::resume_unwind;

use crate::error::{DispatchError, DispatchResult};
use crate::main_queue::main_queue;
use crate::metrics;
use crate::queue::{Closed, is_main_thread, submit_async, submit_sync};

/// Run `work` on the main thread without waiting for it.
///
/// On the main thread, `work` runs inline before this returns. Elsewhere it
/// is queued behind earlier main-queue submissions and this returns at once.
///
/// # Errors
///
/// [`DispatchError::NotInstalled`] or [`DispatchError::MainQueueClosed`].
pub fn try_run_on_main_thread_async<F>(work: F) -> DispatchResult
where
    F: FnOnce() + Send + 'static,
{
    if is_main_thread() {
        metrics::record_inline();
        work();
        return Ok(());
    }

    let queue = main_queue()?;
    match submit_async(&queue.sender, work) {
        Ok(()) => {
            metrics::record_async_hop();
            tracing::debug!(queue = %queue.label, "dispatched async to main queue");
            Ok(())
        }
        Err(Closed) => Err(DispatchError::MainQueueClosed),
    }
}

/// Run `work` on the main thread and wait for it to finish.
///
/// On the main thread, `work` runs inline. Elsewhere the caller blocks until
/// the main thread has run it; everything `work` did is visible to the
/// caller afterwards. If `work` panics on the main thread, the panic is
/// resumed on the caller's thread with the same payload.
///
/// # Errors
///
/// [`DispatchError::NotInstalled`] or [`DispatchError::MainQueueClosed`]. In
/// the latter case `work` may have been dropped without running.
///
/// # Panics
///
/// Resumes any panic raised by `work` on the main thread.
pub fn try_run_on_main_thread_sync<F>(work: F) -> DispatchResult
where
    F: FnOnce() + Send + 'static,
{
    if is_main_thread() {
        metrics::record_inline();
        work();
        return Ok(());
    }

    let queue = main_queue()?;
    tracing::debug!(queue = %queue.label, "dispatching sync to main queue");
    match submit_sync(&queue.sender, work) {
        Ok(Ok(())) => {
            metrics::record_sync_hop();
            Ok(())
        }
        Ok(Err(payload)) => {
            metrics::record_sync_hop();
            metrics::record_panic_carried_back();
            tracing::warn!(queue = %queue.label, "main-thread work panicked, resuming on caller");
            resume_unwind(payload)
        }
        Err(Closed) => Err(DispatchError::MainQueueClosed),
    }
}

/// Run `work` on the main thread without waiting for it.
///
/// See [`try_run_on_main_thread_async`].
///
/// # Panics
///
/// Panics if the main queue was never installed or has been closed. Neither
/// can be recovered from at this level.
pub fn run_on_main_thread_async<F>(work: F)
where
    F: FnOnce() + Send + 'static,
{
    if let Err(err) = try_run_on_main_thread_async(work) {
        unavailable(&err);
    }
}

/// Run `work` on the main thread and wait for it to finish.
///
/// See [`try_run_on_main_thread_sync`].
///
/// # Panics
///
/// Panics if the main queue was never installed or has been closed, and
/// resumes any panic raised by `work` itself.
pub fn run_on_main_thread_sync<F>(work: F)
where
    F: FnOnce() + Send + 'static,
{
    if let Err(err) = try_run_on_main_thread_sync(work) {
        unavailable(&err);
    }
}

#[cold]
#[expect(clippy::panic, reason = "an unavailable main queue is unrecoverable")]
fn unavailable(err: &DispatchError) -> ! {
    tracing::error!(error = %err, "main thread dispatch unavailable");
    panic!("main thread dispatch failed: {err}");
}
