//! Mock PWM implementation for testing

use crate::platform::{
    error::{PlatformError, PwmError},
    traits::{PwmConfig, PwmInterface},
    Result,
};

/// Mock PWM channel
///
/// Records the duty cycle and how many times it was written, so tests can
/// tell "driven to zero" apart from "never driven".
#[derive(Debug)]
pub struct MockPwm {
    duty_cycle: f32,
    frequency: u32,
    enabled: bool,
    writes: u32,
}

impl MockPwm {
    pub fn new(config: PwmConfig) -> Self {
        Self {
            duty_cycle: config.duty_cycle,
            frequency: config.frequency,
            enabled: false,
            writes: 0,
        }
    }

    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    /// Successful duty cycle writes so far
    pub fn writes(&self) -> u32 {
        self.writes
    }
}

impl Default for MockPwm {
    fn default() -> Self {
        Self::new(PwmConfig::default())
    }
}

impl PwmInterface for MockPwm {
    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&duty_cycle) {
            return Err(PlatformError::Pwm(PwmError::InvalidDutyCycle));
        }
        self.duty_cycle = duty_cycle;
        self.writes += 1;
        Ok(())
    }

    fn duty_cycle(&self) -> f32 {
        self.duty_cycle
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_maps_to_duty_cycle() {
        let mut pwm = MockPwm::default();
        pwm.set_level(0).unwrap();
        assert_eq!(pwm.duty_cycle(), 0.0);
        pwm.set_level(255).unwrap();
        assert_eq!(pwm.duty_cycle(), 1.0);
        pwm.set_level(128).unwrap();
        assert_eq!(pwm.level(), 128);
        assert_eq!(pwm.writes(), 3);
    }

    #[test]
    fn test_invalid_duty_cycle_not_recorded() {
        let mut pwm = MockPwm::default();
        assert!(pwm.set_duty_cycle(1.5).is_err());
        assert!(pwm.set_duty_cycle(-0.1).is_err());
        assert_eq!(pwm.writes(), 0);
        assert_eq!(pwm.frequency(), 20_000);
    }
}
