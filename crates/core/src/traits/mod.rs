//! Platform abstractions consumed by the core
//!
//! Only time is abstracted here; text output goes through
//! `core::fmt::Write` and peripherals live in the rover crate.

pub mod time;

pub use time::{MockTime, TimeSource};
