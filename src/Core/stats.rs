use crossbeam_utils::CachePadded;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free counters for one rendezvous channel.
///
/// Updated by whichever thread resolves an operation; readers never take the
/// channel lock. Each counter sits on its own cache line to avoid false
/// sharing between the front and back threads.
#[derive(Default)]
pub struct ChannelStats {
    paired: CachePadded<AtomicU64>,
    parked: CachePadded<AtomicU64>,
    cancelled: CachePadded<AtomicU64>,
    drained: CachePadded<AtomicU64>,
}

/// Point-in-time copy of a channel's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub paired: u64,
    pub parked: u64,
    pub cancelled: u64,
    pub drained: u64,
}

impl ChannelStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_paired(&self) {
        self.paired.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_parked(&self) {
        self.parked.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_cancelled(&self) {
        self.cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_drained(&self, count: usize) {
        self.drained.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            paired: self.paired.load(Ordering::Relaxed),
            parked: self.parked.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
            drained: self.drained.load(Ordering::Relaxed),
        }
    }
}
