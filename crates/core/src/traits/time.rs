//! Monotonic time source
//!
//! The scheduler only needs milliseconds since start. Hosts wrap
//! `std::time::Instant`; embedded targets wrap their hardware timer; tests
//! use [`MockTime`].

use core::cell::Cell;

/// Monotonic clock read by the control loop
///
/// # Example
///
/// ```
/// use subsumption_core::traits::{MockTime, TimeSource};
///
/// fn due<T: TimeSource>(time: &T, deadline_ms: u64) -> bool {
///     time.now_ms() >= deadline_ms
/// }
///
/// let time = MockTime::new();
/// assert!(!due(&time, 20));
/// time.advance_ms(20);
/// assert!(due(&time, 20));
/// ```
pub trait TimeSource: Clone {
    /// Milliseconds since start
    fn now_ms(&self) -> u64;

    /// Microseconds since start
    fn now_us(&self) -> u64;

    /// Microseconds elapsed since `reference_us`, zero if it lies ahead
    fn elapsed_since(&self, reference_us: u64) -> u64 {
        self.now_us().saturating_sub(reference_us)
    }
}

/// Manually advanced clock for tests and simulations
#[derive(Clone, Default)]
pub struct MockTime {
    current_us: Cell<u64>,
}

impl MockTime {
    /// Clock reading zero
    pub fn new() -> Self {
        Self {
            current_us: Cell::new(0),
        }
    }

    pub fn with_initial(us: u64) -> Self {
        Self {
            current_us: Cell::new(us),
        }
    }

    /// Jump to an absolute time
    pub fn set(&self, us: u64) {
        self.current_us.set(us);
    }

    pub fn advance(&self, us: u64) {
        self.current_us.set(self.current_us.get() + us);
    }

    pub fn advance_ms(&self, ms: u64) {
        self.advance(ms * 1000);
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.current_us.get() / 1000
    }

    fn now_us(&self) -> u64 {
        self.current_us.get()
    }
}
