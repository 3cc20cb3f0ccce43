//! Simulated GPIO peripheral for SITL.
//!
//! Clones share one pin. Input pins model the bump switches: a test presses
//! one through its own clone while the collision behavior reads another.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use subsumption_rover::platform::error::GpioError;
use subsumption_rover::platform::traits::GpioMode;
use subsumption_rover::platform::{GpioInterface, PlatformError, Result};

/// Simulated GPIO pin with state tracking.
#[derive(Debug, Clone)]
pub struct SitlGpio {
    pin: u8,
    mode: GpioMode,
    state: Arc<AtomicBool>,
}

impl SitlGpio {
    /// Create a new output pin (initially low).
    pub fn new_output(pin: u8) -> Self {
        Self::with_mode(pin, GpioMode::OutputPushPull)
    }

    /// Create a new pulled-down input pin.
    pub fn new_input(pin: u8) -> Self {
        Self::with_mode(pin, GpioMode::InputPullDown)
    }

    fn with_mode(pin: u8, mode: GpioMode) -> Self {
        Self {
            pin,
            mode,
            state: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get the pin number.
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Inject a state value (for simulating external input).
    pub fn inject_state(&self, high: bool) {
        self.state.store(high, Ordering::Relaxed);
    }

    /// Close the switch wired to this pin.
    pub fn press(&self) {
        self.inject_state(true);
    }

    /// Open the switch wired to this pin.
    pub fn release(&self) {
        self.inject_state(false);
    }

    fn drive(&mut self, high: bool) -> Result<()> {
        if !self.mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.state.store(high, Ordering::Relaxed);
        Ok(())
    }
}

impl GpioInterface for SitlGpio {
    fn set_high(&mut self) -> Result<()> {
        self.drive(true)
    }

    fn set_low(&mut self) -> Result<()> {
        self.drive(false)
    }

    fn read(&self) -> bool {
        self.state.load(Ordering::Relaxed)
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_pin() {
        let mut gpio = SitlGpio::new_output(5);
        assert_eq!(gpio.pin(), 5);
        assert_eq!(gpio.mode(), GpioMode::OutputPushPull);
        assert!(!gpio.read());

        gpio.set_high().unwrap();
        assert!(gpio.read());

        gpio.write(false).unwrap();
        assert!(!gpio.read());
    }

    #[test]
    fn test_input_pin() {
        let mut gpio = SitlGpio::new_input(3);
        assert_eq!(gpio.mode(), GpioMode::InputPullDown);
        assert!(!gpio.read());

        gpio.press();
        assert!(gpio.read());
        gpio.release();
        assert!(!gpio.read());

        assert_eq!(
            gpio.set_high(),
            Err(PlatformError::Gpio(GpioError::InvalidMode))
        );
    }

    #[test]
    fn test_shared_state_via_clone() {
        let bumper = SitlGpio::new_input(10);
        let reader = bumper.clone();
        bumper.press();
        assert!(reader.read());
    }
}
