//! Time sources for SITL.
//!
//! [`SitlTimeSource`] is a shared counter advanced by whoever drives the
//! simulation, so tests run deterministically and faster than real time.
//! [`StdTimeSource`] follows the host's monotonic clock for interactive use.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use subsumption_rover::core::TimeSource;

/// Simulated time source backed by a shared atomic counter.
///
/// Multiple clones share the same underlying counter, so a test can advance
/// time while the rover reads it.
#[derive(Debug, Clone, Default)]
pub struct SitlTimeSource {
    time_us: Arc<AtomicU64>,
}

impl SitlTimeSource {
    /// Create a new time source starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance simulation time by the given number of microseconds.
    pub fn advance_us(&self, us: u64) {
        self.time_us.fetch_add(us, Ordering::Relaxed);
    }

    /// Advance simulation time by the given number of milliseconds.
    pub fn advance_ms(&self, ms: u64) {
        self.advance_us(ms * 1000);
    }

    /// Set simulation time to an absolute value.
    pub fn set_us(&self, us: u64) {
        self.time_us.store(us, Ordering::Relaxed);
    }
}

impl TimeSource for SitlTimeSource {
    fn now_us(&self) -> u64 {
        self.time_us.load(Ordering::Relaxed)
    }

    fn now_ms(&self) -> u64 {
        self.now_us() / 1000
    }
}

/// Wall-clock time source measured from its creation.
#[derive(Debug, Clone, Copy)]
pub struct StdTimeSource {
    start: Instant,
}

impl StdTimeSource {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for StdTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for StdTimeSource {
    fn now_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }

    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}
