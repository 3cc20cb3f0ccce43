//! Per-tick arbitration token
//!
//! The scheduler resets one [`ArbitrationToken`] at the start of every tick
//! and pushes it by reference through the behavior chain. Behaviors visited
//! earlier have higher priority. A behavior that wants to drive the motors
//! claims the token, and later behaviors see the claim and leave the
//! throttles alone. The terminal driver reads whatever is left.
//!
//! Claiming is a convention, not an enforced rule: [`ArbitrationToken::claim`]
//! refuses to overwrite an existing claim, but [`ArbitrationToken::force`]
//! and [`ArbitrationToken::set_throttles`] are still available to the
//! scheduler and to drivers.
//!
//! # Example
//!
//! ```
//! use subsumption_core::arbitration::{ArbitrationToken, Claim};
//! use subsumption_core::bus::SubscriberId;
//!
//! let mut token = ArbitrationToken::new(50);
//! let recovery = Claim::new(SubscriberId::new(4), "Collision");
//! let cruise = Claim::new(SubscriberId::new(1), "Cruise");
//!
//! assert!(token.claim(recovery, -60, -60));
//! assert!(!token.claim(cruise, 120, 120));
//! assert_eq!(token.throttles(), (-60, -60));
//! assert_eq!(token.claimant().map(|c| c.name), Some("Collision"));
//! ```

use core::fmt;

use crate::bus::SubscriberId;

/// Identity of the behavior holding the token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claim {
    /// Arena identity of the claimant
    pub id: SubscriberId,
    /// Display name, reported by drivers
    pub name: &'static str,
}

impl Claim {
    /// Create a claim identity
    pub const fn new(id: SubscriberId, name: &'static str) -> Self {
        Self { id, name }
    }
}

/// Progress of a CSV logging session
///
/// `Headings` lasts exactly one tick: every behavior writes its column
/// names, then the scheduler switches to `Data`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CsvPhase {
    /// Not logging
    #[default]
    Idle,
    /// Writing column names this tick
    Headings,
    /// Writing values every tick
    Data,
}

/// Shared mutable value passed through the control chain once per tick
#[derive(Debug, Clone, PartialEq)]
pub struct ArbitrationToken {
    left: i32,
    right: i32,
    claimant: Option<Claim>,
    interval_ms: u32,
    csv: CsvPhase,
    csv_delimiter: char,
}

impl ArbitrationToken {
    /// Create an unclaimed token with zero throttles
    pub const fn new(interval_ms: u32) -> Self {
        Self {
            left: 0,
            right: 0,
            claimant: None,
            interval_ms,
            csv: CsvPhase::Idle,
            csv_delimiter: '\t',
        }
    }

    /// Current `(left, right)` throttle pair
    pub fn throttles(&self) -> (i32, i32) {
        (self.left, self.right)
    }

    pub fn left(&self) -> i32 {
        self.left
    }

    pub fn right(&self) -> i32 {
        self.right
    }

    /// Whether some behavior already holds this tick's token
    pub fn is_claimed(&self) -> bool {
        self.claimant.is_some()
    }

    /// Behavior holding the token, if any
    pub fn claimant(&self) -> Option<Claim> {
        self.claimant
    }

    /// Claim the token and set throttles, unless already claimed
    ///
    /// Returns `false` and leaves the token untouched when a higher-priority
    /// behavior claimed it first.
    pub fn claim(&mut self, claim: Claim, left: i32, right: i32) -> bool {
        if self.is_claimed() {
            return false;
        }
        self.force(claim, left, right);
        true
    }

    /// Overwrite throttles and claimant unconditionally
    pub fn force(&mut self, claim: Claim, left: i32, right: i32) {
        self.left = left;
        self.right = right;
        self.claimant = Some(claim);
    }

    /// Overwrite throttles without touching the claimant
    pub fn set_throttles(&mut self, left: i32, right: i32) {
        self.left = left;
        self.right = right;
    }

    /// Clear the claimant, keeping the throttle pair
    pub fn release(&mut self) {
        self.claimant = None;
    }

    /// Tick interval in milliseconds
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    pub fn set_interval_ms(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms;
    }

    /// CSV logging phase for this tick
    pub fn csv_phase(&self) -> CsvPhase {
        self.csv
    }

    pub fn set_csv_phase(&mut self, phase: CsvPhase) {
        self.csv = phase;
    }

    /// Field separator used by [`csv_field`](Self::csv_field)
    pub fn csv_delimiter(&self) -> char {
        self.csv_delimiter
    }

    pub fn set_csv_delimiter(&mut self, delimiter: char) {
        self.csv_delimiter = delimiter;
    }

    /// Whether a CSV session is active
    pub fn is_logging(&self) -> bool {
        self.csv != CsvPhase::Idle
    }

    /// Write one CSV column for the current phase
    ///
    /// Writes the column name during `Headings`, the value during `Data`
    /// and nothing while idle. Each field is followed by the delimiter.
    pub fn csv_field(
        &self,
        console: &mut dyn fmt::Write,
        name: &str,
        value: impl fmt::Display,
    ) -> fmt::Result {
        match self.csv {
            CsvPhase::Idle => Ok(()),
            CsvPhase::Headings => write!(console, "{}{}", name, self.csv_delimiter),
            CsvPhase::Data => write!(console, "{}{}", value, self.csv_delimiter),
        }
    }
}

impl Default for ArbitrationToken {
    fn default() -> Self {
        Self::new(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::String;

    const HIGH: Claim = Claim::new(SubscriberId::new(3), "High");
    const LOW: Claim = Claim::new(SubscriberId::new(1), "Low");

    #[test]
    fn test_new_token_is_unclaimed() {
        let token = ArbitrationToken::new(20);
        assert!(!token.is_claimed());
        assert_eq!(token.throttles(), (0, 0));
        assert_eq!(token.interval_ms(), 20);
        assert_eq!(token.csv_phase(), CsvPhase::Idle);
    }

    #[test]
    fn test_higher_priority_claim_wins() {
        let mut token = ArbitrationToken::new(20);
        assert!(token.claim(HIGH, 10, -10));
        assert!(!token.claim(LOW, 99, 99));
        assert_eq!(token.throttles(), (10, -10));
        assert_eq!(token.claimant(), Some(HIGH));
    }

    #[test]
    fn test_force_overrides_claim() {
        let mut token = ArbitrationToken::new(20);
        token.claim(LOW, 5, 5);
        token.force(HIGH, 0, 0);
        assert_eq!(token.claimant(), Some(HIGH));
        assert_eq!(token.throttles(), (0, 0));
    }

    #[test]
    fn test_release_keeps_throttles() {
        let mut token = ArbitrationToken::new(20);
        token.claim(LOW, 7, 8);
        token.release();
        assert!(!token.is_claimed());
        assert_eq!(token.throttles(), (7, 8));
    }

    #[test]
    fn test_csv_field_follows_phase() {
        let mut token = ArbitrationToken::new(20);
        let mut out: String<32> = String::new();

        token.csv_field(&mut out, "x", 1.5).unwrap();
        assert_eq!(out.as_str(), "");

        token.set_csv_phase(CsvPhase::Headings);
        assert!(token.is_logging());
        token.csv_field(&mut out, "x", 1.5).unwrap();
        assert_eq!(out.as_str(), "x\t");

        out.clear();
        token.set_csv_phase(CsvPhase::Data);
        token.set_csv_delimiter(',');
        token.csv_field(&mut out, "x", 1.5).unwrap();
        assert_eq!(out.as_str(), "1.5,");
    }
}
