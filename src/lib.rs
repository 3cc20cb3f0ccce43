#![cfg_attr(not(test), no_std)]

//! subsumption_rover - Behavior-based control for differential-drive rovers
//!
//! The arbitration engine lives in `subsumption_core`. This crate adds the
//! rover itself: platform traits for the motor and sensor pins, the
//! behaviors that make up the subsumption chain, and their parameters.
//!
//! ```text
//!  Position -> CollisionRecovery -> Navigator -> CruiseControl -> MotorDriver
//!  (highest priority)                                       (terminal driver)
//! ```

// Platform abstraction layer
pub mod platform;

// Logging macros and core re-exports
pub mod core;

// Console transport over UART
pub mod console;

// Scheduler activity indicator
pub mod indicator;

// Rover parameter groups
pub mod parameters;

// Behaviors in the subsumption chain
pub mod behaviors;
