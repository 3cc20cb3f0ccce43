//! Simulated PWM peripheral for SITL.
//!
//! Clones share one channel, so the rover can own a channel while a test or
//! the console runner watches its duty cycle.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use subsumption_rover::platform::error::PwmError;
use subsumption_rover::platform::traits::PwmConfig;
use subsumption_rover::platform::{PlatformError, PwmInterface, Result};

#[derive(Debug)]
struct Channel {
    pin: u8,
    frequency: u32,
    /// `f32` bit pattern
    duty_cycle: AtomicU32,
    enabled: AtomicBool,
}

/// Simulated PWM channel with duty cycle tracking.
#[derive(Debug, Clone)]
pub struct SitlPwm {
    channel: Arc<Channel>,
}

impl SitlPwm {
    /// Create a new enabled channel on the given pin.
    pub fn new(pin: u8, config: PwmConfig) -> Self {
        Self {
            channel: Arc::new(Channel {
                pin,
                frequency: config.frequency,
                duty_cycle: AtomicU32::new(config.duty_cycle.clamp(0.0, 1.0).to_bits()),
                enabled: AtomicBool::new(true),
            }),
        }
    }

    /// Get the pin number.
    pub fn pin(&self) -> u8 {
        self.channel.pin
    }

    /// Get the PWM frequency in Hz.
    pub fn frequency(&self) -> u32 {
        self.channel.frequency
    }
}

impl PwmInterface for SitlPwm {
    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&duty_cycle) {
            return Err(PlatformError::Pwm(PwmError::InvalidDutyCycle));
        }
        self.channel
            .duty_cycle
            .store(duty_cycle.to_bits(), Ordering::Relaxed);
        Ok(())
    }

    /// Zero while disabled.
    fn duty_cycle(&self) -> f32 {
        if self.is_enabled() {
            f32::from_bits(self.channel.duty_cycle.load(Ordering::Relaxed))
        } else {
            0.0
        }
    }

    fn enable(&mut self) {
        self.channel.enabled.store(true, Ordering::Relaxed);
    }

    fn disable(&mut self) {
        self.channel.enabled.store(false, Ordering::Relaxed);
    }

    fn is_enabled(&self) -> bool {
        self.channel.enabled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pwm_creation() {
        let pwm = SitlPwm::new(5, PwmConfig::default());
        assert_eq!(pwm.pin(), 5);
        assert_eq!(pwm.frequency(), 20_000);
        assert_eq!(pwm.duty_cycle(), 0.0);
        assert!(pwm.is_enabled());
    }

    #[test]
    fn test_level_shared_between_clones() {
        let mut pwm = SitlPwm::new(0, PwmConfig::default());
        let observer = pwm.clone();
        pwm.set_level(255).unwrap();
        assert_eq!(observer.level(), 255);
        pwm.set_level(100).unwrap();
        assert_eq!(observer.level(), 100);
    }

    #[test]
    fn test_out_of_range_duty_rejected() {
        let mut pwm = SitlPwm::new(0, PwmConfig::default());
        pwm.set_duty_cycle(0.5).unwrap();
        assert_eq!(
            pwm.set_duty_cycle(1.5),
            Err(PlatformError::Pwm(PwmError::InvalidDutyCycle))
        );
        assert_eq!(pwm.duty_cycle(), 0.5);
    }

    #[test]
    fn test_disable_zeroes_output() {
        let mut pwm = SitlPwm::new(0, PwmConfig::default());
        pwm.set_duty_cycle(0.75).unwrap();
        pwm.disable();
        assert_eq!(pwm.duty_cycle(), 0.0);
        pwm.enable();
        assert_eq!(pwm.duty_cycle(), 0.75);
    }
}
