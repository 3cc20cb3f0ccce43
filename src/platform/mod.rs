//! Platform abstraction layer
//!
//! The rover touches hardware in three places: PWM outputs for motor speed
//! and LED brightness, GPIO pins for motor direction and bump switches, and
//! a UART carrying the operator console. Behaviors are generic over the
//! traits here so the same code runs on a board, in the simulator and in
//! unit tests.

pub mod error;
pub mod traits;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{GpioInterface, PwmInterface, UartInterface};
