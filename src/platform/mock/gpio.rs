//! Mock GPIO implementation for testing

use crate::platform::{
    error::{GpioError, PlatformError},
    traits::{GpioInterface, GpioMode},
    Result,
};

/// Mock GPIO pin
///
/// Output pins record their level; input pins report whatever the test
/// injected with [`press`](MockGpio::press) or
/// [`set_input_state`](MockGpio::set_input_state).
#[derive(Debug)]
pub struct MockGpio {
    state: bool,
    mode: GpioMode,
}

impl MockGpio {
    /// Output pin driven low
    pub fn new_output() -> Self {
        Self {
            state: false,
            mode: GpioMode::OutputPushPull,
        }
    }

    /// Input pin reading low, as a released bump switch
    pub fn new_input() -> Self {
        Self {
            state: false,
            mode: GpioMode::InputPullDown,
        }
    }

    /// Simulate an external level on an input pin
    pub fn set_input_state(&mut self, high: bool) {
        self.state = high;
    }

    /// Hold a bump switch closed
    pub fn press(&mut self) {
        self.set_input_state(true);
    }

    pub fn release(&mut self) {
        self.set_input_state(false);
    }

    fn drive(&mut self, high: bool) -> Result<()> {
        if !self.mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.state = high;
        Ok(())
    }
}

impl GpioInterface for MockGpio {
    fn set_high(&mut self) -> Result<()> {
        self.drive(true)
    }

    fn set_low(&mut self) -> Result<()> {
        self.drive(false)
    }

    fn read(&self) -> bool {
        self.state
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}
