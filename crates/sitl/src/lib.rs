//! Software-in-the-loop host for the subsumption rover
//!
//! Runs the same behaviors as the firmware against simulated peripherals.
//! The LED emulator closes the loop by advancing the encoder counts, so
//! odometry, cruise control and turning all work without hardware.
//!
//! ```text
//! stdin ──► SitlRover::feed_str ──► CommandRouter ──► behaviors
//!                                                       │
//! SitlTimeSource / StdTimeSource ──► SitlRover::poll ──► control chain
//!                                                       │
//!                          SitlPwm / SitlGpio ◄─────────┘
//! ```

pub mod console;
pub mod error;
pub mod platform;
pub mod rover;

pub use console::{console_symbol, StdoutConsole};
pub use error::SitlError;
pub use platform::{
    SitlGpio, SitlHardware, SitlPwm, SitlTimeSource, SitlUart, StdTimeSource,
};
pub use rover::{RoverBehaviors, RoverState, SitlRover, BEHAVIOR_SLOTS};
