//! Error types for the dispatch crate.

use crate::queue::QueueId;

/// Reasons a unit of work could not be handed to a queue.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// No thread has called `install_main_queue` yet
    #[error("Main queue has not been installed")]
    NotInstalled,

    /// `install_main_queue` was called a second time
    #[error("Main queue is already installed")]
    AlreadyInstalled,

    /// The calling thread already drives a queue
    #[error("Thread is already bound to {0}")]
    ThreadAlreadyBound(QueueId),

    /// The main loop was dropped; the process is tearing down
    #[error("Main queue is closed")]
    MainQueueClosed,

    /// A serial queue's worker is gone
    #[error("Queue '{0}' is closed")]
    QueueClosed(String),

    /// A bounded serial queue is full and the submitter is its own worker
    #[error("Queue '{0}' is full")]
    QueueFull(String),

    /// Invalid queue configuration
    #[error("Invalid queue configuration: {0}")]
    InvalidConfig(String),

    /// The worker thread could not be started
    #[error("Failed to spawn queue worker: {0}")]
    Spawn(#[from] std::io::Error),
}

impl DispatchError {
    /// Check if retrying later can succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            DispatchError::NotInstalled => true,
            DispatchError::Spawn(_) => true,
            DispatchError::QueueFull(_) => true,
            DispatchError::AlreadyInstalled => false,
            DispatchError::ThreadAlreadyBound(_) => false,
            DispatchError::MainQueueClosed => false,
            DispatchError::QueueClosed(_) => false,
            DispatchError::InvalidConfig(_) => false,
        }
    }

    /// Check if this error means the queue is shutting down.
    pub fn is_teardown(&self) -> bool {
        matches!(
            self,
            DispatchError::MainQueueClosed | DispatchError::QueueClosed(_)
        )
    }

    pub(crate) fn invalid_config(reason: impl Into<String>) -> Self {
        DispatchError::InvalidConfig(reason.into())
    }
}

/// Dispatch result type
pub type DispatchResult<T = ()> = Result<T, DispatchError>;
