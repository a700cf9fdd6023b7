//! Integration tests for main-thread dispatch.
//!
//! Every test in this binary shares the main thread started by
//! `test_main_queue`.

use corekit_dispatch::{
    DispatchError, QueueConfig, QueueId, SerialQueue, current_queue, current_queue_label,
    dispatch_metrics, install_main_queue, is_main_thread, main_queue_installed, main_thread_id,
    run_on_main_thread_async, run_on_main_thread_sync, try_run_on_main_thread_sync,
};
use corekit_test_helpers::{TEST_MAIN_LABEL, init_test_tracing, must, test_main_queue};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread::ThreadId;

fn setup() -> ThreadId {
    init_test_tracing();
    test_main_queue()
}

#[test]
fn test_sync_from_worker_is_visible_on_return() {
    setup();
    let flag = Arc::new(AtomicBool::new(false));
    let set = Arc::clone(&flag);

    run_on_main_thread_sync(move || set.store(true, Ordering::Relaxed));

    assert!(flag.load(Ordering::Relaxed));
}

#[test]
fn test_sync_runs_on_main_thread() {
    let main = setup();
    let ran_on = Arc::new(Mutex::new(None));
    let record = Arc::clone(&ran_on);

    run_on_main_thread_sync(move || {
        *record.lock() = Some((std::thread::current().id(), is_main_thread()));
    });

    assert_eq!(*ran_on.lock(), Some((main, true)));
    assert!(!is_main_thread());
    assert_eq!(main_thread_id(), Some(main));
}

#[test]
fn test_sync_from_main_runs_inline() {
    setup();
    let observed = Arc::new(Mutex::new(None));
    let report = Arc::clone(&observed);

    run_on_main_thread_sync(move || {
        let before = dispatch_metrics();
        let flag = Arc::new(AtomicBool::new(false));
        let set = Arc::clone(&flag);
        let caller = std::thread::current().id();

        // Already on main: no round trip, so this cannot wait on itself.
        run_on_main_thread_sync(move || {
            assert_eq!(std::thread::current().id(), caller);
            set.store(true, Ordering::Relaxed);
        });

        let delta = dispatch_metrics().since(&before);
        *report.lock() = Some((flag.load(Ordering::Relaxed), delta.inline_executions >= 1));
    });

    assert_eq!(*observed.lock(), Some((true, true)));
}

#[test]
fn test_async_from_main_runs_before_returning() {
    setup();
    let observed = Arc::new(Mutex::new(None));
    let report = Arc::clone(&observed);

    run_on_main_thread_sync(move || {
        let flag = Arc::new(AtomicBool::new(false));
        let set = Arc::clone(&flag);
        run_on_main_thread_async(move || set.store(true, Ordering::Relaxed));
        *report.lock() = Some(flag.load(Ordering::Relaxed));
    });

    assert_eq!(*observed.lock(), Some(true));
}

#[test]
fn test_async_from_worker_returns_without_waiting() {
    setup();
    let (gate_tx, gate_rx) = mpsc::channel::<()>();
    let (started_tx, started_rx) = mpsc::channel::<()>();
    let flag = Arc::new(AtomicBool::new(false));

    // Hold the main thread so the next submission cannot run yet.
    run_on_main_thread_async(move || {
        must(started_tx.send(()));
        must(gate_rx.recv());
    });
    must(started_rx.recv());

    let set = Arc::clone(&flag);
    run_on_main_thread_async(move || set.store(true, Ordering::Relaxed));
    assert!(!flag.load(Ordering::Relaxed));

    must(gate_tx.send(()));

    let seen = Arc::new(AtomicBool::new(false));
    let check_flag = Arc::clone(&flag);
    let check_seen = Arc::clone(&seen);
    run_on_main_thread_sync(move || {
        check_seen.store(check_flag.load(Ordering::Relaxed), Ordering::Relaxed);
    });
    assert!(seen.load(Ordering::Relaxed));
}

#[test]
fn test_async_submissions_run_in_order() {
    setup();
    let order = Arc::new(Mutex::new(Vec::new()));
    for i in 0..64 {
        let order = Arc::clone(&order);
        run_on_main_thread_async(move || order.lock().push(i));
    }
    run_on_main_thread_sync(|| {});
    assert_eq!(*order.lock(), (0..64).collect::<Vec<_>>());
}

#[test]
fn test_main_queue_identity() {
    setup();
    assert!(main_queue_installed());
    assert_eq!(current_queue(), None);

    let seen = Arc::new(Mutex::new(None));
    let report = Arc::clone(&seen);
    run_on_main_thread_sync(move || {
        let label = current_queue_label().map(|label| label.to_string());
        *report.lock() = Some((current_queue(), label));
    });

    assert_eq!(
        *seen.lock(),
        Some((Some(QueueId::MAIN), Some(TEST_MAIN_LABEL.to_string())))
    );
}

#[test]
fn test_sync_panic_resumes_on_caller() {
    setup();
    let before = dispatch_metrics();

    let outcome = std::panic::catch_unwind(|| {
        run_on_main_thread_sync(|| std::panic::panic_any(Arc::new(41_u32)));
    });

    let Err(payload) = outcome else {
        panic!("the main-thread panic should reach the caller");
    };
    let value = payload.downcast_ref::<Arc<u32>>().map(|value| **value);
    assert_eq!(value, Some(41));
    assert!(dispatch_metrics().since(&before).panics_carried_back >= 1);

    // The main loop survives a carried-back panic.
    let alive = Arc::new(AtomicBool::new(false));
    let set = Arc::clone(&alive);
    run_on_main_thread_sync(move || set.store(true, Ordering::Relaxed));
    assert!(alive.load(Ordering::Relaxed));
}

#[test]
fn test_second_install_is_rejected() {
    setup();
    let result = install_main_queue(QueueConfig::main());
    assert!(matches!(result, Err(DispatchError::AlreadyInstalled)));
}

#[test]
fn test_serial_queue_hops_to_main_and_back() {
    setup();
    let queue = must(SerialQueue::labelled("background"));
    let queue_id = queue.id();
    let hops = Arc::new(AtomicUsize::new(0));

    let on_queue = Arc::clone(&hops);
    let result = queue.dispatch_sync(move || {
        assert_eq!(current_queue(), Some(queue_id));
        let on_main = Arc::clone(&on_queue);
        must(try_run_on_main_thread_sync(move || {
            assert!(is_main_thread());
            on_main.fetch_add(1, Ordering::Relaxed);
        }));
        on_queue.fetch_add(1, Ordering::Relaxed);
    });

    assert!(matches!(result, Ok(())));
    assert_eq!(hops.load(Ordering::Relaxed), 2);
}

#[test]
fn test_sync_hops_are_counted() {
    setup();
    let before = dispatch_metrics();
    run_on_main_thread_sync(|| {});
    run_on_main_thread_async(|| {});
    let delta = dispatch_metrics().since(&before);
    assert!(delta.sync_hops >= 1);
    assert!(delta.async_hops >= 1);
}
