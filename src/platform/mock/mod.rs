//! Mock peripherals for testing
//!
//! Available during test builds and with the `mock` feature, so the
//! simulator crate can drive the same behaviors without hardware.
//!
//! # Example
//!
//! ```
//! use subsumption_rover::platform::mock::MockPwm;
//! use subsumption_rover::platform::traits::{PwmConfig, PwmInterface};
//!
//! let mut pwm = MockPwm::new(PwmConfig::default());
//! pwm.set_level(255).unwrap();
//! assert_eq!(pwm.level(), 255);
//! assert_eq!(pwm.writes(), 1);
//! ```

#![cfg(any(test, feature = "mock"))]

mod gpio;
mod pwm;
mod uart;

pub use gpio::MockGpio;
pub use pwm::MockPwm;
pub use uart::{MockUart, MOCK_UART_CAPACITY};
