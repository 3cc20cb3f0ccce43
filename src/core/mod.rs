//! Core rover infrastructure
//!
//! Logging macros plus re-exports of the arbitration engine so that
//! behavior code can name everything through `crate::core`.

pub mod logging;

pub use subsumption_core::arbitration::{ArbitrationToken, Claim, CsvPhase};
pub use subsumption_core::behavior::{Behavior, BehaviorCore, MessageMask};
pub use subsumption_core::command::CommandArgs;
pub use subsumption_core::controller::Controller;
pub use subsumption_core::traits::TimeSource;
pub use subsumption_core::scheduler::ActivityIndicator;
