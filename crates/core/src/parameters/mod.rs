//! Tunable parameters
//!
//! A small name/value store used to hold behavior gains, speeds and timing
//! defaults. Typed parameter groups (see the rover crate's `RoverParams`)
//! register their defaults here and read back validated values.

pub mod error;
pub mod storage;

pub use error::ParameterError;
pub use storage::{ParamFlags, ParamMetadata, ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN};
