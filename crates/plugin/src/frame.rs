//! Per-frame maintenance bookkeeping

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Frame counter and timing of the last maintenance pass
#[derive(Debug, Default)]
pub struct FrameStats {
    /// Frames seen (increments every `on_frame` call)
    count: AtomicU64,
    /// Last frame's maintenance time (nanoseconds)
    last_time_ns: AtomicU64,
}

impl FrameStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the counter, returning the new frame number (first frame is 1)
    pub(crate) fn next(&self) -> u64 {
        self.count.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub(crate) fn record(&self, elapsed: Duration) {
        let nanos = u64::try_from(elapsed.as_nanos()).unwrap_or(u64::MAX);
        self.last_time_ns.store(nanos, Ordering::Relaxed);
    }

    /// Get the current frame count
    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Get the last frame's maintenance time in nanoseconds
    pub fn last_time_ns(&self) -> u64 {
        self.last_time_ns.load(Ordering::Relaxed)
    }
}

/// Whether frame `frame` is due for compaction
pub(crate) fn compaction_due(frame: u64, interval: u64) -> bool {
    interval != 0 && frame % interval == 0
}
