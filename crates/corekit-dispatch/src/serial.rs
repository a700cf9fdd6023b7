//! Background serial queues.
//!
//! A [`SerialQueue`] is one worker thread draining its own channel in
//! submission order. It gives code a queue identity other than main, which is
//! what [`current_queue`](crate::current_queue) reports while its work runs.

use std::panic::resume_unwind;
use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam::channel::Sender;

use crate::config::QueueConfig;
use crate::error::{DispatchError, DispatchResult};
use crate::queue::{
    Closed, Message, QueueContext, QueueId, Refused, bind_current, current_queue, offer_async,
    submit_async, submit_sync,
};

/// A labelled queue backed by a dedicated worker thread.
///
/// Dropping the queue sends the worker a stop request behind everything
/// already queued, then joins it. A panic in asynchronously dispatched work ends the worker; later
/// submissions fail with [`DispatchError::QueueClosed`].
pub struct SerialQueue {
    id: QueueId,
    label: Arc<str>,
    sender: Option<Sender<Message>>,
    worker: Option<JoinHandle<()>>,
}

impl SerialQueue {
    /// Start a queue with the given configuration.
    ///
    /// # Errors
    ///
    /// [`DispatchError::InvalidConfig`] if `config` does not validate, or
    /// [`DispatchError::Spawn`] if the worker thread cannot be started.
    pub fn new(config: QueueConfig) -> DispatchResult<Self> {
        config.validate()?;

        let id = QueueId::next();
        let label: Arc<str> = Arc::from(config.label.as_str());
        let (sender, receiver) = config.channel::<Message>();
        let context = QueueContext {
            id,
            label: Arc::clone(&label),
        };

        let worker = std::thread::Builder::new()
            .name(config.label)
            .spawn(move || {
                let label = Arc::clone(&context.label);
                if let Err(err) = bind_current(context) {
                    tracing::error!(queue = %label, error = %err, "serial queue worker not bound");
                    return;
                }
                for message in receiver.iter() {
                    match message {
                        Message::Run(job) => job(),
                        Message::Stop => break,
                    }
                }
                tracing::debug!(queue = %label, "serial queue worker exiting");
            })?;

        tracing::debug!(queue = %label, id = %id, "serial queue started");

        Ok(Self {
            id,
            label,
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// Start a queue with default settings and the given label.
    ///
    /// # Errors
    ///
    /// See [`SerialQueue::new`].
    pub fn labelled(label: impl Into<String>) -> DispatchResult<Self> {
        Self::new(QueueConfig::labelled(label))
    }

    /// Identity of this queue.
    pub fn id(&self) -> QueueId {
        self.id
    }

    /// Label of this queue.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the calling context is this queue's worker.
    pub fn is_current(&self) -> bool {
        current_queue() == Some(self.id)
    }

    /// Queue `work` and return without waiting.
    ///
    /// From another thread, a full bounded queue makes this wait for room.
    /// From this queue's own worker it never waits.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::QueueClosed`] if the worker is gone
    /// - [`DispatchError::QueueFull`] if called from this queue's own worker
    ///   while a bounded queue is full
    pub fn dispatch_async<F>(&self, work: F) -> DispatchResult
    where
        F: FnOnce() + Send + 'static,
    {
        let sender = self.sender()?;
        if self.is_current() {
            return match offer_async(sender, work) {
                Ok(()) => Ok(()),
                Err(Refused::Full) => Err(DispatchError::QueueFull(self.label.to_string())),
                Err(Refused::Closed) => Err(self.closed()),
            };
        }
        submit_async(sender, work).map_err(|Closed| self.closed())
    }

    /// Run `work` on this queue and wait for it.
    ///
    /// Runs inline when called from this queue's own worker.
    ///
    /// # Errors
    ///
    /// [`DispatchError::QueueClosed`] if the worker is gone.
    ///
    /// # Panics
    ///
    /// Resumes any panic raised by `work` on the worker.
    pub fn dispatch_sync<F>(&self, work: F) -> DispatchResult
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_current() {
            work();
            return Ok(());
        }
        let sender = self.sender()?;
        match submit_sync(sender, work) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(payload)) => resume_unwind(payload),
            Err(Closed) => Err(self.closed()),
        }
    }

    fn sender(&self) -> DispatchResult<&Sender<Message>> {
        self.sender.as_ref().ok_or_else(|| self.closed())
    }

    fn closed(&self) -> DispatchError {
        DispatchError::QueueClosed(self.label.to_string())
    }
}

impl Drop for SerialQueue {
    fn drop(&mut self) {
        let sender = self.sender.take();
        let Some(worker) = self.worker.take() else {
            return;
        };
        if worker.thread().id() == std::thread::current().id() {
            tracing::warn!(queue = %self.label, "serial queue dropped on its own worker");
            return;
        }
        // Stop queues behind everything already submitted.
        if let Some(sender) = sender
            && sender.send(Message::Stop).is_err()
        {
            tracing::debug!(queue = %self.label, "serial queue worker already gone");
        }
        if worker.join().is_err() {
            tracing::warn!(queue = %self.label, "serial queue worker terminated by a panic");
        }
    }
}

impl core::fmt::Debug for SerialQueue {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SerialQueue")
            .field("id", &self.id)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
