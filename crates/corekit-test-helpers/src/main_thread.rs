//! A main thread for test binaries.
//!
//! The test harness runs each test on its own worker thread, and none of
//! them is a natural main thread. [`test_main_queue`] spawns one dedicated
//! thread per test binary, installs the main queue there and keeps it
//! running for the rest of the process, so every test in the binary shares
//! the same main thread.
//!
//! Only use this from integration tests. Unit tests inside
//! `corekit-dispatch` link a second copy of that crate, and the queue
//! installed here would not be the one they see.

use std::sync::OnceLock;
use std::sync::mpsc;
use std::thread::ThreadId;

use corekit_dispatch::{QueueConfig, install_main_queue};

/// Label of the queue installed by [`test_main_queue`].
pub const TEST_MAIN_LABEL: &str = "corekit.test-main";

static TEST_MAIN: OnceLock<ThreadId> = OnceLock::new();

/// Install and run the main queue on a dedicated thread, once per process.
///
/// Returns the id of that thread. Blocks until the queue is installed.
///
/// # Panics
///
/// Panics if something else in the process already installed a main queue,
/// or the thread cannot be spawned.
pub fn test_main_queue() -> ThreadId {
    *TEST_MAIN.get_or_init(|| {
        let (ready_tx, ready_rx) = mpsc::sync_channel(1);
        let spawned = std::thread::Builder::new()
            .name(TEST_MAIN_LABEL.to_string())
            .spawn(move || {
                let config = QueueConfig::main().with_label(TEST_MAIN_LABEL);
                let main_loop = match install_main_queue(config) {
                    Ok(main_loop) => main_loop,
                    Err(err) => {
                        tracing::error!(error = %err, "test main queue not installed");
                        drop(ready_tx);
                        return;
                    }
                };
                if ready_tx.send(std::thread::current().id()).is_err() {
                    return;
                }
                main_loop.run();
            });
        if let Err(err) = spawned {
            panic!("failed to spawn test main thread: {err}");
        }
        match ready_rx.recv() {
            Ok(id) => id,
            Err(_) => panic!("test main thread exited before installing the main queue"),
        }
    })
}
