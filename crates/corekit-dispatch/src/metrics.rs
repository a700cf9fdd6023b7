//! Dispatch metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

static INLINE_EXECUTIONS: AtomicU64 = AtomicU64::new(0);
static ASYNC_HOPS: AtomicU64 = AtomicU64::new(0);
static SYNC_HOPS: AtomicU64 = AtomicU64::new(0);
static PANICS_CARRIED_BACK: AtomicU64 = AtomicU64::new(0);

/// Snapshot of main-thread dispatch counters.
///
/// Counters are process-wide and monotonically increasing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchMetrics {
    /// Work run inline because the caller already was on the main thread
    pub inline_executions: u64,

    /// Work enqueued on the main queue without waiting
    pub async_hops: u64,

    /// Work run on the main queue while the caller waited for it
    pub sync_hops: u64,

    /// Synchronous work that panicked on the main thread and was resumed on
    /// the caller
    pub panics_carried_back: u64,
}

impl DispatchMetrics {
    /// Total number of units of work dispatched.
    pub fn total_dispatched(&self) -> u64 {
        self.inline_executions
            .saturating_add(self.async_hops)
            .saturating_add(self.sync_hops)
    }

    /// Counter growth since an earlier snapshot.
    pub fn since(&self, earlier: &DispatchMetrics) -> DispatchMetrics {
        DispatchMetrics {
            inline_executions: self.inline_executions.saturating_sub(earlier.inline_executions),
            async_hops: self.async_hops.saturating_sub(earlier.async_hops),
            sync_hops: self.sync_hops.saturating_sub(earlier.sync_hops),
            panics_carried_back: self
                .panics_carried_back
                .saturating_sub(earlier.panics_carried_back),
        }
    }
}

/// Read the current dispatch counters.
pub fn dispatch_metrics() -> DispatchMetrics {
    DispatchMetrics {
        inline_executions: INLINE_EXECUTIONS.load(Ordering::Relaxed),
        async_hops: ASYNC_HOPS.load(Ordering::Relaxed),
        sync_hops: SYNC_HOPS.load(Ordering::Relaxed),
        panics_carried_back: PANICS_CARRIED_BACK.load(Ordering::Relaxed),
    }
}

#[inline]
pub(crate) fn record_inline() {
    INLINE_EXECUTIONS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub(crate) fn record_async_hop() {
    ASYNC_HOPS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub(crate) fn record_sync_hop() {
    SYNC_HOPS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub(crate) fn record_panic_carried_back() {
    PANICS_CARRIED_BACK.fetch_add(1, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_are_monotonic() {
        let before = dispatch_metrics();
        record_inline();
        record_async_hop();
        record_sync_hop();
        let delta = dispatch_metrics().since(&before);
        assert!(delta.inline_executions >= 1);
        assert!(delta.async_hops >= 1);
        assert!(delta.sync_hops >= 1);
        assert!(delta.total_dispatched() >= 3);
    }

    #[test]
    fn test_since_saturates() {
        let later = DispatchMetrics::default();
        let earlier = DispatchMetrics {
            inline_executions: 5,
            ..DispatchMetrics::default()
        };
        assert_eq!(later.since(&earlier), DispatchMetrics::default());
    }
}
