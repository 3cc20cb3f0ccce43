//! Tick activity LED
//!
//! Lights a GPIO output while the scheduler runs a tick, so a scope on the
//! pin shows how much of each interval the behaviors use.

use crate::core::ActivityIndicator;
use crate::platform::GpioInterface;

/// [`ActivityIndicator`] driving a GPIO output
pub struct GpioIndicator<G: GpioInterface> {
    pin: G,
    failed: bool,
}

impl<G: GpioInterface> GpioIndicator<G> {
    pub fn new(pin: G) -> Self {
        Self { pin, failed: false }
    }

    pub fn pin(&self) -> &G {
        &self.pin
    }

    /// Whether a pin write has failed
    pub fn has_failed(&self) -> bool {
        self.failed
    }
}

impl<G: GpioInterface> ActivityIndicator for GpioIndicator<G> {
    fn set_active(&mut self, active: bool) {
        if let Err(e) = self.pin.write(active) {
            // Report only the first failure
            if !self.failed {
                crate::log_warn!("activity indicator write failed: {:?}", e);
            }
            self.failed = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Controller;
    use crate::platform::mock::MockGpio;
    use heapless::String;

    #[test]
    fn test_pin_low_after_tick() {
        let mut controller: Controller<'_, 1> = Controller::new(10, 0);
        let mut indicator = GpioIndicator::new(MockGpio::new_output());
        let mut console: String<64> = String::new();

        assert!(controller.poll_with(10, &mut console, &mut indicator));
        assert!(!indicator.pin().read());
        assert!(!indicator.has_failed());
    }

    #[test]
    fn test_input_pin_reports_failure() {
        let mut indicator = GpioIndicator::new(MockGpio::new_input());
        indicator.set_active(true);
        assert!(indicator.has_failed());
    }
}
