//! Rover parameters
//!
//! Parameters live in a [`ParameterStore`] from `subsumption_core`, keyed
//! by short upper-case names. Each group registers its defaults once and
//! reads back a typed, validated struct.
//!
//! ```text
//! ┌────────────────────────────┐
//! │   build.rs environment     │  ROVER_TICK_MS, ROVER_CONSOLE_BAUD
//! └─────────────┬──────────────┘
//!               ▼
//! ┌────────────────────────────┐
//! │  RoverParams::register_    │  defaults into the store
//! │  defaults                  │
//! └─────────────┬──────────────┘
//!               ▼
//! ┌────────────────────────────┐
//! │  ParameterStore            │  runtime overrides via `set`
//! └─────────────┬──────────────┘
//!               ▼
//! ┌────────────────────────────┐
//! │  RoverParams::from_store   │  clamped values for the behaviors
//! └────────────────────────────┘
//! ```

pub mod rover;

pub use rover::RoverParams;
pub use subsumption_core::parameters::{
    ParamFlags, ParamValue, ParameterError, ParameterStore,
};
