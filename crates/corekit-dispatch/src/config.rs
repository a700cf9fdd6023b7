//! Queue configuration.

use crossbeam::channel::{self, Receiver, Sender};

use crate::error::{DispatchError, DispatchResult};

/// Label used by [`QueueConfig::main`].
pub const MAIN_QUEUE_LABEL: &str = "corekit.main";

/// Configuration for the main queue or a [`SerialQueue`](crate::SerialQueue).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Human-readable queue label.
    ///
    /// Serial queues also use it as the worker thread name.
    pub label: String,

    /// Maximum number of pending units of work (None = unbounded).
    ///
    /// Serial queues only. When a serial queue is full, submitting from
    /// another thread blocks until the queue makes room, and submitting from
    /// its own worker fails with [`DispatchError::QueueFull`]. The main queue
    /// is always unbounded; [`install_main_queue`](crate::install_main_queue)
    /// rejects a capacity.
    pub capacity: Option<usize>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            label: "corekit.queue".to_string(),
            capacity: None,
        }
    }
}

impl QueueConfig {
    /// Create a new QueueConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for the main queue.
    pub fn main() -> Self {
        Self {
            label: MAIN_QUEUE_LABEL.to_string(),
            capacity: None,
        }
    }

    /// Create a labelled serial-queue configuration.
    pub fn labelled(label: impl Into<String>) -> Self {
        Self::default().with_label(label)
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Bound the number of pending units of work.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Remove any bound on pending units of work.
    pub fn unbounded(mut self) -> Self {
        self.capacity = None;
        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`DispatchError::InvalidConfig`] for an empty label or a zero
    /// capacity. A zero-capacity queue would block every asynchronous
    /// submission until the queue picked it up.
    pub fn validate(&self) -> DispatchResult {
        if self.label.trim().is_empty() {
            return Err(DispatchError::invalid_config("label must not be empty"));
        }
        if self.capacity == Some(0) {
            return Err(DispatchError::invalid_config("capacity must be at least 1"));
        }
        Ok(())
    }

    /// Validate the configuration for the main queue.
    ///
    /// # Errors
    ///
    /// Everything [`QueueConfig::validate`] rejects, plus any capacity. A
    /// bounded main queue would make asynchronous dispatch wait, and could
    /// leave the main thread blocked on its own full queue.
    pub fn validate_main(&self) -> DispatchResult {
        self.validate()?;
        if self.capacity.is_some() {
            return Err(DispatchError::invalid_config(
                "the main queue must be unbounded",
            ));
        }
        Ok(())
    }

    pub(crate) fn channel<T>(&self) -> (Sender<T>, Receiver<T>) {
        match self.capacity {
            Some(capacity) => channel::bounded(capacity),
            None => channel::unbounded(),
        }
    }
}
