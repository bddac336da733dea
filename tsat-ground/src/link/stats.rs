//! Link counters, updated lock-free by the link threads

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters for one link session
#[derive(Debug, Default)]
pub struct LinkStats {
    pub(super) bytes_received: AtomicU64,
    pub(super) bytes_discarded: AtomicU64,
    pub(super) frames_decoded: AtomicU64,
    pub(super) frames_rejected: AtomicU64,
    pub(super) telemetry_samples: AtomicU64,
    pub(super) pings_received: AtomicU64,
    pub(super) pings_sent: AtomicU64,
}

impl LinkStats {
    /// Increment `counter` by `n`, returning the new value
    #[inline]
    pub(super) fn bump(counter: &AtomicU64, n: u64) -> u64 {
        counter.fetch_add(n, Ordering::Relaxed) + n
    }

    /// Copy of all counters
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            bytes_discarded: self.bytes_discarded.load(Ordering::Relaxed),
            frames_decoded: self.frames_decoded.load(Ordering::Relaxed),
            frames_rejected: self.frames_rejected.load(Ordering::Relaxed),
            telemetry_samples: self.telemetry_samples.load(Ordering::Relaxed),
            pings_received: self.pings_received.load(Ordering::Relaxed),
            pings_sent: self.pings_sent.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time copy of [`LinkStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub bytes_received: u64,
    /// Noise dropped while searching for a frame marker
    pub bytes_discarded: u64,
    pub frames_decoded: u64,
    /// Frames skipped for an unknown type tag
    pub frames_rejected: u64,
    pub telemetry_samples: u64,
    pub pings_received: u64,
    pub pings_sent: u64,
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} bytes ({} discarded), {} frames ({} rejected), {} telemetry, {} pings in, {} pings out",
            self.bytes_received,
            self.bytes_discarded,
            self.frames_decoded,
            self.frames_rejected,
            self.telemetry_samples,
            self.pings_received,
            self.pings_sent
        )
    }
}
