//! Simulated platform for SITL.
//!
//! [`SitlHardware`] is the rover's pin set. Every peripheral is a shared
//! handle: the behaviors get clones and the hardware keeps its own for
//! observation and input injection.

pub mod gpio;
pub mod pwm;
pub mod timer;
pub mod uart;

pub use gpio::SitlGpio;
pub use pwm::SitlPwm;
pub use timer::{SitlTimeSource, StdTimeSource};
pub use uart::SitlUart;

use subsumption_rover::platform::traits::PwmConfig;
use subsumption_rover::platform::{GpioInterface, PwmInterface};

/// Simulated motor, LED and bumper pins of one rover.
#[derive(Debug, Clone)]
pub struct SitlHardware {
    pub left_motor: SitlPwm,
    pub left_direction: SitlGpio,
    pub right_motor: SitlPwm,
    pub right_direction: SitlGpio,
    pub left_led_forward: SitlPwm,
    pub left_led_back: SitlPwm,
    pub right_led_forward: SitlPwm,
    pub right_led_back: SitlPwm,
    pub left_bumper: SitlGpio,
    pub right_bumper: SitlGpio,
    /// Lit while a tick runs
    pub activity_led: SitlGpio,
}

impl SitlHardware {
    pub fn new() -> Self {
        let config = PwmConfig::default();
        Self {
            left_motor: SitlPwm::new(2, config),
            left_direction: SitlGpio::new_output(3),
            right_motor: SitlPwm::new(4, config),
            right_direction: SitlGpio::new_output(5),
            left_led_forward: SitlPwm::new(6, config),
            left_led_back: SitlPwm::new(7, config),
            right_led_forward: SitlPwm::new(8, config),
            right_led_back: SitlPwm::new(9, config),
            left_bumper: SitlGpio::new_input(10),
            right_bumper: SitlGpio::new_input(11),
            activity_led: SitlGpio::new_output(25),
        }
    }

    /// Signed motor throttles as driven on the pins
    pub fn motor_output(&self) -> (i32, i32) {
        (
            signed_level(&self.left_motor, &self.left_direction),
            signed_level(&self.right_motor, &self.right_direction),
        )
    }

    /// Signed throttles shown on the LED pairs
    pub fn led_output(&self) -> (i32, i32) {
        (
            i32::from(self.left_led_forward.level()) - i32::from(self.left_led_back.level()),
            i32::from(self.right_led_forward.level()) - i32::from(self.right_led_back.level()),
        )
    }
}

impl Default for SitlHardware {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction pin high means reverse
fn signed_level(pwm: &SitlPwm, direction: &SitlGpio) -> i32 {
    let level = i32::from(pwm.level());
    if direction.read() {
        -level
    } else {
        level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outputs_start_at_rest() {
        let hardware = SitlHardware::new();
        assert_eq!(hardware.motor_output(), (0, 0));
        assert_eq!(hardware.led_output(), (0, 0));
        assert!(!hardware.left_bumper.read());
    }

    #[test]
    fn test_motor_output_follows_direction_pin() {
        let hardware = SitlHardware::new();
        let mut pwm = hardware.left_motor.clone();
        let mut direction = hardware.left_direction.clone();
        pwm.set_level(40).unwrap();
        direction.set_high().unwrap();
        assert_eq!(hardware.motor_output(), (-40, 0));
    }

    #[test]
    fn test_led_output_subtracts_back_from_forward() {
        let hardware = SitlHardware::new();
        let mut back = hardware.right_led_back.clone();
        back.set_level(25).unwrap();
        assert_eq!(hardware.led_output(), (0, -25));
    }
}
