//! The process-wide main queue.
//!
//! Exactly one thread becomes the main thread by calling
//! [`install_main_queue`]. From then on it owns the [`MainLoop`] and is the
//! only thread that runs main-queue work. The handle other threads submit
//! through lives in a `OnceLock` and is never reassigned.
//!
//! # Teardown
//!
//! Dropping the [`MainLoop`] closes the queue. Pending work is discarded and
//! every later submission fails with [`DispatchError::MainQueueClosed`].

use core::marker::PhantomData;
use std::sync::{Arc, OnceLock};
use std::thread::ThreadId;
use std::time::{Duration, Instant};

use crossbeam::channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};

use crate::config::QueueConfig;
use crate::error::{DispatchError, DispatchResult};
use crate::queue::{Message, QueueContext, QueueId, bind_current};

pub(crate) struct MainQueue {
    pub(crate) sender: Sender<Message>,
    pub(crate) thread: ThreadId,
    pub(crate) label: Arc<str>,
}

static MAIN_QUEUE: OnceLock<MainQueue> = OnceLock::new();

pub(crate) fn main_queue() -> DispatchResult<&'static MainQueue> {
    MAIN_QUEUE.get().ok_or(DispatchError::NotInstalled)
}

/// Make the calling thread the main thread.
///
/// Call once, early, from the thread that will drive the returned loop.
///
/// # Errors
///
/// - [`DispatchError::InvalidConfig`] if `config` does not validate, or
///   asks for a bounded queue
/// - [`DispatchError::AlreadyInstalled`] on any call after the first
///   successful one
/// - [`DispatchError::ThreadAlreadyBound`] if the calling thread already
///   drives a serial queue
///
/// # Example
///
/// ```no_run
/// use corekit_dispatch::{QueueConfig, install_main_queue, run_on_main_thread_async};
///
/// let main_loop = install_main_queue(QueueConfig::main())?;
///
/// std::thread::spawn(|| {
///     run_on_main_thread_async(|| println!("hello from main"));
/// });
///
/// main_loop.run();
/// # Ok::<(), corekit_dispatch::DispatchError>(())
/// ```
pub fn install_main_queue(config: QueueConfig) -> DispatchResult<MainLoop> {
    config.validate_main()?;
    if let Some(bound) = crate::queue::current_queue() {
        return Err(DispatchError::ThreadAlreadyBound(bound));
    }

    let (sender, receiver) = config.channel();
    let label: Arc<str> = Arc::from(config.label);
    let queue = MainQueue {
        sender,
        thread: std::thread::current().id(),
        label: Arc::clone(&label),
    };
    if MAIN_QUEUE.set(queue).is_err() {
        return Err(DispatchError::AlreadyInstalled);
    }
    bind_current(QueueContext {
        id: QueueId::MAIN,
        label: Arc::clone(&label),
    })?;

    tracing::info!(label = %label, "main queue installed");

    Ok(MainLoop {
        receiver,
        label,
        _main_thread_only: PhantomData,
    })
}

/// Ask a running [`MainLoop::run`] to return once it reaches this request.
///
/// Work submitted before the request still runs first. Never blocks, so
/// main-queue work may call it too: the main queue is unbounded.
///
/// # Errors
///
/// [`DispatchError::NotInstalled`] or [`DispatchError::MainQueueClosed`].
pub fn request_main_loop_stop() -> DispatchResult {
    let queue = main_queue()?;
    match queue.sender.send(Message::Stop) {
        Ok(()) => Ok(()),
        Err(_) => Err(DispatchError::MainQueueClosed),
    }
}

/// Whether a main queue has been installed in this process.
pub fn main_queue_installed() -> bool {
    MAIN_QUEUE.get().is_some()
}

/// Thread that installed the main queue, if any.
pub fn main_thread_id() -> Option<ThreadId> {
    MAIN_QUEUE.get().map(|queue| queue.thread)
}

/// Label the main queue was installed with, if any.
pub fn main_queue_label() -> Option<&'static str> {
    MAIN_QUEUE.get().map(|queue| &*queue.label)
}

/// Drives the main queue. Lives on the main thread only.
pub struct MainLoop {
    receiver: Receiver<Message>,
    label: Arc<str>,
    _main_thread_only: PhantomData<*const ()>,
}

enum Step {
    Ran,
    Stopped,
}

impl MainLoop {
    /// Run main-queue work until [`request_main_loop_stop`] is observed.
    ///
    /// Returns the number of units of work executed. A panic raised by
    /// asynchronously dispatched work propagates out of this call, exactly as
    /// it would from any other code on the main thread.
    pub fn run(&self) -> usize {
        let mut executed = 0_usize;
        while let Ok(message) = self.receiver.recv() {
            match self.execute(message) {
                Step::Ran => executed = executed.saturating_add(1),
                Step::Stopped => break,
            }
        }
        tracing::info!(label = %self.label, executed, "main loop stopped");
        executed
    }

    /// Run everything already queued without blocking.
    ///
    /// Stops early at a stop request. Returns the number of units of work
    /// executed.
    pub fn drain(&self) -> usize {
        let mut executed = 0_usize;
        loop {
            match self.receiver.try_recv() {
                Ok(message) => match self.execute(message) {
                    Step::Ran => executed = executed.saturating_add(1),
                    Step::Stopped => break,
                },
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        executed
    }

    /// Run main-queue work for at most `timeout`.
    ///
    /// Returns early at a stop request. Returns the number of units of work
    /// executed.
    pub fn run_for(&self, timeout: Duration) -> usize {
        let deadline = Instant::now().checked_add(timeout);
        let mut executed = 0_usize;
        loop {
            let received = match deadline {
                Some(deadline) => self.receiver.recv_deadline(deadline),
                None => self
                    .receiver
                    .recv()
                    .map_err(|_disconnected| RecvTimeoutError::Disconnected),
            };
            match received {
                Ok(message) => match self.execute(message) {
                    Step::Ran => executed = executed.saturating_add(1),
                    Step::Stopped => break,
                },
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => break,
            }
        }
        executed
    }

    /// Number of units of work waiting to run.
    pub fn pending(&self) -> usize {
        self.receiver.len()
    }

    /// Label the main queue was installed with.
    pub fn label(&self) -> &str {
        &self.label
    }

    fn execute(&self, message: Message) -> Step {
        match message {
            Message::Run(job) => {
                job();
                Step::Ran
            }
            Message::Stop => Step::Stopped,
        }
    }
}

impl Drop for MainLoop {
    fn drop(&mut self) {
        tracing::info!(
            label = %self.label,
            discarded = self.receiver.len(),
            "main queue closed"
        );
    }
}

impl core::fmt::Debug for MainLoop {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MainLoop")
            .field("label", &self.label)
            .field("pending", &self.receiver.len())
            .finish()
    }
}
