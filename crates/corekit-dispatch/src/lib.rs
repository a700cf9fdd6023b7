//! Main-thread-safe dispatch.
//!
//! Many lifecycle and UI-adjacent operations are only valid on one designated
//! thread. This crate makes one thread the main thread and lets any other
//! thread hand it work:
//!
//! - **`run_on_main_thread_async`**: inline when already on main, otherwise
//!   queued in submission order and not waited for
//! - **`run_on_main_thread_sync`**: inline when already on main, otherwise
//!   queued and waited for, with the work's side effects visible afterwards
//! - **`current_queue`**: which queue the calling context is on
//!
//! Rust has no platform main queue, so the crate also provides the
//! scheduling primitive: [`install_main_queue`] binds the calling thread and
//! returns the [`MainLoop`] it must drive, and [`SerialQueue`] offers
//! background queues with their own identity.
//!
//! # Example
//!
//! ```no_run
//! use corekit_dispatch::prelude::*;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! let main_loop = install_main_queue(QueueConfig::main())?;
//! let flag = Arc::new(AtomicBool::new(false));
//!
//! let worker_flag = Arc::clone(&flag);
//! std::thread::spawn(move || {
//!     let set = Arc::clone(&worker_flag);
//!     run_on_main_thread_sync(move || set.store(true, Ordering::SeqCst));
//!     assert!(worker_flag.load(Ordering::SeqCst));
//!     request_main_loop_stop().ok();
//! });
//!
//! main_loop.run();
//! # Ok::<(), DispatchError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]

pub mod config;
pub mod dispatch;
pub mod error;
pub mod main_queue;
pub mod metrics;
pub mod queue;
pub mod serial;

pub mod prelude;

pub use config::{MAIN_QUEUE_LABEL, QueueConfig};
pub use dispatch::{
    run_on_main_thread_async, run_on_main_thread_sync, try_run_on_main_thread_async,
    try_run_on_main_thread_sync,
};
pub use error::{DispatchError, DispatchResult};
pub use main_queue::{
    MainLoop, install_main_queue, main_queue_installed, main_queue_label, main_thread_id,
    request_main_loop_stop,
};
pub use metrics::{DispatchMetrics, dispatch_metrics};
pub use queue::{QueueId, current_queue, current_queue_label, is_main_thread};
pub use serial::SerialQueue;
