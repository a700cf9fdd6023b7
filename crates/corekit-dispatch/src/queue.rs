//! Queue identity and the submission path shared by every queue.
//!
//! A queue is a thread draining a channel. The thread records which queue it
//! drives once, when it starts driving it, so "which queue am I on" is a
//! thread-local lookup with no locking.

use core::fmt;
use std::cell::OnceCell;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam::channel::{Sender, TrySendError};

use crate::error::{DispatchError, DispatchResult};

/// A unit of work accepted by a queue.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

pub(crate) enum Message {
    Run(Job),
    Stop,
}

/// Identity of a serial queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QueueId(u64);

impl QueueId {
    /// The main queue.
    pub const MAIN: QueueId = QueueId(0);

    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        QueueId(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    /// Whether this is the main queue.
    pub fn is_main(self) -> bool {
        self == QueueId::MAIN
    }

    /// Raw numeric value.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for QueueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_main() {
            write!(f, "main")
        } else {
            write!(f, "queue#{}", self.0)
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct QueueContext {
    pub(crate) id: QueueId,
    pub(crate) label: Arc<str>,
}

thread_local! {
    static CURRENT: OnceCell<QueueContext> = const { OnceCell::new() };
}

/// Record that the calling thread drives `context` from now on.
pub(crate) fn bind_current(context: QueueContext) -> DispatchResult {
    CURRENT.with(|current| {
        if let Some(existing) = current.get() {
            return Err(DispatchError::ThreadAlreadyBound(existing.id));
        }
        current
            .set(context)
            .map_err(|rejected| DispatchError::ThreadAlreadyBound(rejected.id))
    })
}

/// The queue the calling context is executing on.
///
/// `None` on a thread that drives no queue (a free-standing spawned thread,
/// a test harness worker).
pub fn current_queue() -> Option<QueueId> {
    CURRENT.with(|current| current.get().map(|context| context.id))
}

/// Label of the queue the calling context is executing on.
pub fn current_queue_label() -> Option<Arc<str>> {
    CURRENT.with(|current| current.get().map(|context| Arc::clone(&context.label)))
}

/// Whether the calling context is the main queue.
pub fn is_main_thread() -> bool {
    current_queue() == Some(QueueId::MAIN)
}

/// The submitted work never reached a queue that could run it.
#[derive(Debug)]
pub(crate) struct Closed;

pub(crate) fn submit_async<F>(sender: &Sender<Message>, work: F) -> Result<(), Closed>
where
    F: FnOnce() + Send + 'static,
{
    match sender.send(Message::Run(Box::new(work))) {
        Ok(()) => Ok(()),
        Err(_) => Err(Closed),
    }
}

/// Why a non-blocking submission was turned away.
#[derive(Debug)]
pub(crate) enum Refused {
    Full,
    Closed,
}

/// Queue `work` without ever blocking the caller.
///
/// Used when the caller is the thread that drains `sender`; waiting for
/// room there would wait forever.
pub(crate) fn offer_async<F>(sender: &Sender<Message>, work: F) -> Result<(), Refused>
where
    F: FnOnce() + Send + 'static,
{
    match sender.try_send(Message::Run(Box::new(work))) {
        Ok(()) => Ok(()),
        Err(TrySendError::Full(_)) => Err(Refused::Full),
        Err(TrySendError::Disconnected(_)) => Err(Refused::Closed),
    }
}

/// Run `work` on the queue behind `sender` and wait for it.
///
/// A panic inside `work` is carried back and returned as `Ok(Err(payload))`
/// so the caller can resume it on its own stack.
pub(crate) fn submit_sync<F>(
    sender: &Sender<Message>,
    work: F,
) -> Result<std::thread::Result<()>, Closed>
where
    F: FnOnce() + Send + 'static,
{
    let (done_tx, done_rx) = crossbeam::channel::bounded::<std::thread::Result<()>>(1);
    let job = move || {
        let outcome = catch_unwind(AssertUnwindSafe(work));
        if done_tx.send(outcome).is_err() {
            tracing::warn!("synchronous dispatch completed after its caller went away");
        }
    };
    submit_async(sender, job)?;
    match done_rx.recv() {
        Ok(outcome) => Ok(outcome),
        Err(_) => Err(Closed),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_id_display() {
        assert_eq!(QueueId::MAIN.to_string(), "main");
        assert_eq!(QueueId(7).to_string(), "queue#7");
    }

    #[test]
    fn test_queue_ids_are_unique() {
        let a = QueueId::next();
        let b = QueueId::next();
        assert_ne!(a, b);
        assert!(!a.is_main());
        assert!(b > a);
    }

    #[test]
    fn test_free_thread_has_no_queue() {
        let seen = std::thread::spawn(|| (current_queue(), is_main_thread())).join();
        assert!(matches!(seen, Ok((None, false))));
    }

    #[test]
    fn test_bind_once_per_thread() {
        let outcome = std::thread::spawn(|| {
            let id = QueueId::next();
            let first = bind_current(QueueContext {
                id,
                label: Arc::from("first"),
            });
            let second = bind_current(QueueContext {
                id: QueueId::next(),
                label: Arc::from("second"),
            });
            (
                matches!(first, Ok(())),
                matches!(second, Err(DispatchError::ThreadAlreadyBound(bound)) if bound == id),
                current_queue() == Some(id),
                current_queue_label().as_deref() == Some("first"),
            )
        })
        .join();
        assert!(matches!(outcome, Ok((true, true, true, true))));
    }

    #[test]
    fn test_sync_submit_carries_panic_back() {
        let (tx, rx) = crossbeam::channel::unbounded::<Message>();
        let worker = std::thread::spawn(move || {
            for message in rx.iter() {
                match message {
                    Message::Run(job) => job(),
                    Message::Stop => break,
                }
            }
        });

        let ok = submit_sync(&tx, || {});
        let carried = submit_sync(&tx, || std::panic::panic_any(3_u8));
        assert!(matches!(submit_async(&tx, || {}), Ok(())));
        assert!(matches!(tx.send(Message::Stop), Ok(())));
        assert!(matches!(worker.join(), Ok(())));

        assert!(matches!(ok, Ok(Ok(()))));
        let Ok(Err(payload)) = carried else {
            panic!("panic payload should come back to the caller");
        };
        assert_eq!(payload.downcast_ref::<u8>(), Some(&3));
    }

    #[test]
    fn test_offer_never_blocks_on_full_queue() {
        let (tx, rx) = crossbeam::channel::bounded::<Message>(1);
        assert!(matches!(offer_async(&tx, || {}), Ok(())));
        assert!(matches!(offer_async(&tx, || {}), Err(Refused::Full)));
        drop(rx);
        assert!(matches!(offer_async(&tx, || {}), Err(Refused::Closed)));
    }

    #[test]
    fn test_submit_to_closed_queue() {
        let (tx, rx) = crossbeam::channel::unbounded::<Message>();
        drop(rx);
        assert!(matches!(submit_async(&tx, || {}), Err(Closed)));
        assert!(matches!(submit_sync(&tx, || {}), Err(Closed)));
    }
}
