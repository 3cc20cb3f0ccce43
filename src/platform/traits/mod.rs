//! Platform abstraction traits
//!
//! Traits that board support code and simulators must provide.

pub mod gpio;
pub mod pwm;
pub mod uart;

// Re-export trait interfaces
pub use gpio::{GpioInterface, GpioMode};
pub use pwm::{PwmConfig, PwmInterface, PWM_FULL_SCALE};
pub use uart::{UartConfig, UartInterface};
