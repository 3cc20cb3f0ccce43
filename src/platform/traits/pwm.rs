//! PWM interface trait
//!
//! Motor speed and LED brightness are both expressed as an 8-bit level,
//! `0..=255`, mapped onto the channel's duty cycle.

use crate::platform::Result;

/// Level that maps to a 100% duty cycle
pub const PWM_FULL_SCALE: u8 = 255;

/// PWM configuration
#[derive(Debug, Clone, Copy)]
pub struct PwmConfig {
    /// PWM frequency in Hz
    pub frequency: u32,
    /// Initial duty cycle (0.0 to 1.0)
    pub duty_cycle: f32,
}

impl Default for PwmConfig {
    fn default() -> Self {
        Self {
            // Above the audible range for small DC motors
            frequency: 20_000,
            duty_cycle: 0.0,
        }
    }
}

/// PWM interface trait
pub trait PwmInterface {
    /// Set duty cycle (0.0 to 1.0)
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidDutyCycle)` if the
    /// duty cycle is out of range.
    fn set_duty_cycle(&mut self, duty_cycle: f32) -> Result<()>;

    /// Get current duty cycle
    fn duty_cycle(&self) -> f32;

    fn enable(&mut self);

    fn disable(&mut self);

    fn is_enabled(&self) -> bool;

    /// Set the output as an 8-bit level
    fn set_level(&mut self, level: u8) -> Result<()> {
        self.set_duty_cycle(f32::from(level) / f32::from(PWM_FULL_SCALE))
    }

    /// Current output as an 8-bit level, rounded to nearest
    fn level(&self) -> u8 {
        let scaled = self.duty_cycle() * f32::from(PWM_FULL_SCALE) + 0.5;
        scaled.clamp(0.0, f32::from(PWM_FULL_SCALE)) as u8
    }
}
