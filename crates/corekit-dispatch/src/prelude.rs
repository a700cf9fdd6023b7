//! Prelude module for common dispatch types.
//!
//! This module provides a convenient way to import the most commonly used
//! items from the dispatch crate.

pub use crate::config::QueueConfig;
pub use crate::dispatch::{
    run_on_main_thread_async, run_on_main_thread_sync, try_run_on_main_thread_async,
    try_run_on_main_thread_sync,
};
pub use crate::error::{DispatchError, DispatchResult};
pub use crate::main_queue::{MainLoop, install_main_queue, request_main_loop_stop};
pub use crate::queue::{QueueId, current_queue, is_main_thread};
pub use crate::serial::SerialQueue;
