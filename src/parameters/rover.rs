//! Rover Parameter Definitions
//!
//! # Parameters
//!
//! - `TICK_MS` - Subsumption tick interval in milliseconds
//! - `CONSOLE_BAUD` - Console baud rate (read-only, fixed at build time)
//! - `ENC_TICKS_IN` - Encoder ticks per inch of wheel travel
//! - `WHEEL_SPACING` - Distance between wheel centers in inches
//! - `CRUISE_KP`, `CRUISE_KI`, `CRUISE_KD` - Cruise control PID gains
//! - `CRUISE_IPS` - Cruise speed in inches per second
//! - `BUMP_SPD1`..`BUMP_SPD4` - Recovery throttle for stop, back, turn, forward
//! - `BUMP_TIME1`..`BUMP_TIME4` - Recovery duration in ticks for the same states
//! - `LED_RATIO_L`, `LED_RATIO_R` - Simulated encoder ticks per throttle unit
//!
//! Build-time defaults come from `ROVER_TICK_MS` and `ROVER_CONSOLE_BAUD`.

use super::{ParamFlags, ParamValue, ParameterError, ParameterStore};

/// Tick interval from the build environment
pub const DEFAULT_TICK_MS: u32 = {
    const S: &str = env!("ROVER_TICK_MS");
    const_parse_u32(S, 50)
};

/// Console baud rate from the build environment
pub const DEFAULT_CONSOLE_BAUD: u32 = {
    const S: &str = env!("ROVER_CONSOLE_BAUD");
    const_parse_u32(S, 115_200)
};

const DEFAULT_TICKS_PER_INCH: f32 = 100.0;
const DEFAULT_WHEEL_SPACING: f32 = 6.0;
const DEFAULT_KP: f32 = 1.0;
const DEFAULT_KI: f32 = 0.5;
const DEFAULT_KD: f32 = 0.0;
const DEFAULT_CRUISE_IPS: f32 = 0.0;
const DEFAULT_BUMP_SPEEDS: [i32; 4] = [0, -5, -10, 20];
const DEFAULT_BUMP_TIMES: [i32; 4] = [2, 2, 2, 2];
const DEFAULT_LED_RATIOS: (f32, f32) = (1.0, 0.99);

const BUMP_SPEED_NAMES: [&str; 4] = ["BUMP_SPD1", "BUMP_SPD2", "BUMP_SPD3", "BUMP_SPD4"];
const BUMP_TIME_NAMES: [&str; 4] = ["BUMP_TIME1", "BUMP_TIME2", "BUMP_TIME3", "BUMP_TIME4"];

/// Longest allowed tick interval
pub const MAX_TICK_MS: u32 = 1000;

/// Largest throttle magnitude
pub const MAX_THROTTLE: i32 = 255;

/// Longest recovery state in ticks
pub const MAX_BUMP_TICKS: u16 = 1000;

/// Parse a decimal `u32` at compile time, `fallback` on any bad digit
const fn const_parse_u32(s: &str, fallback: u32) -> u32 {
    let bytes = s.as_bytes();
    if bytes.is_empty() {
        return fallback;
    }
    let mut value: u32 = 0;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        if digit < b'0' || digit > b'9' {
            return fallback;
        }
        value = match value.checked_mul(10) {
            Some(v) => match v.checked_add((digit - b'0') as u32) {
                Some(v) => v,
                None => return fallback,
            },
            None => return fallback,
        };
        i += 1;
    }
    value
}

/// Rover parameters loaded from the parameter store
#[derive(Debug, Clone, PartialEq)]
pub struct RoverParams {
    /// Tick interval in milliseconds
    pub tick_ms: u32,
    /// Console baud rate
    pub console_baud: u32,
    /// Encoder ticks per inch of wheel travel
    pub ticks_per_inch: f32,
    /// Wheel spacing in inches
    pub wheel_spacing: f32,
    /// Cruise control gains `(kp, ki, kd)`
    pub cruise_gains: (f32, f32, f32),
    /// Cruise speed in inches per second
    pub cruise_ips: f32,
    /// Recovery throttle per state: stop, back, turn, forward
    pub bump_speeds: [i32; 4],
    /// Recovery ticks per state: stop, back, turn, forward
    pub bump_times: [u16; 4],
    /// Simulated encoder ratios `(left, right)`
    pub led_ratios: (f32, f32),
}

impl Default for RoverParams {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS.clamp(1, MAX_TICK_MS),
            console_baud: DEFAULT_CONSOLE_BAUD,
            ticks_per_inch: DEFAULT_TICKS_PER_INCH,
            wheel_spacing: DEFAULT_WHEEL_SPACING,
            cruise_gains: (DEFAULT_KP, DEFAULT_KI, DEFAULT_KD),
            cruise_ips: DEFAULT_CRUISE_IPS,
            bump_speeds: DEFAULT_BUMP_SPEEDS,
            bump_times: DEFAULT_BUMP_TIMES.map(|t| t as u16),
            led_ratios: DEFAULT_LED_RATIOS,
        }
    }
}

fn float_or(store: &ParameterStore, name: &str, default: f32) -> f32 {
    store.get_f32(name).unwrap_or(default)
}

fn int_or(store: &ParameterStore, name: &str, default: i32) -> i32 {
    match store.get(name) {
        Some(ParamValue::Int(v)) => *v,
        Some(ParamValue::Float(v)) => *v as i32,
        _ => default,
    }
}

/// Positive length, falling back when zero, negative or not a number
fn positive_or(value: f32, fallback: f32) -> f32 {
    if value > 0.0 {
        value
    } else {
        fallback
    }
}

impl RoverParams {
    /// Register rover parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "TICK_MS",
            ParamValue::Int(DEFAULT_TICK_MS as i32),
            ParamFlags::empty(),
        )?;
        store.register(
            "CONSOLE_BAUD",
            ParamValue::Int(DEFAULT_CONSOLE_BAUD as i32),
            ParamFlags::READ_ONLY,
        )?;
        store.register(
            "ENC_TICKS_IN",
            ParamValue::Float(DEFAULT_TICKS_PER_INCH),
            ParamFlags::empty(),
        )?;
        store.register(
            "WHEEL_SPACING",
            ParamValue::Float(DEFAULT_WHEEL_SPACING),
            ParamFlags::empty(),
        )?;
        store.register("CRUISE_KP", ParamValue::Float(DEFAULT_KP), ParamFlags::empty())?;
        store.register("CRUISE_KI", ParamValue::Float(DEFAULT_KI), ParamFlags::empty())?;
        store.register("CRUISE_KD", ParamValue::Float(DEFAULT_KD), ParamFlags::empty())?;
        store.register(
            "CRUISE_IPS",
            ParamValue::Float(DEFAULT_CRUISE_IPS),
            ParamFlags::empty(),
        )?;

        for (name, speed) in BUMP_SPEED_NAMES.iter().zip(DEFAULT_BUMP_SPEEDS) {
            store.register(name, ParamValue::Int(speed), ParamFlags::empty())?;
        }
        for (name, time) in BUMP_TIME_NAMES.iter().zip(DEFAULT_BUMP_TIMES) {
            store.register(name, ParamValue::Int(time), ParamFlags::empty())?;
        }

        // Simulator tuning, kept out of listings
        store.register(
            "LED_RATIO_L",
            ParamValue::Float(DEFAULT_LED_RATIOS.0),
            ParamFlags::HIDDEN,
        )?;
        store.register(
            "LED_RATIO_R",
            ParamValue::Float(DEFAULT_LED_RATIOS.1),
            ParamFlags::HIDDEN,
        )?;

        Ok(())
    }

    /// Load rover parameters from the store
    ///
    /// Missing entries fall back to defaults; out-of-range values are
    /// clamped into range so the result always passes [`is_valid`](Self::is_valid).
    pub fn from_store(store: &ParameterStore) -> Self {
        let defaults = Self::default();

        let tick_ms = int_or(store, "TICK_MS", defaults.tick_ms as i32).clamp(1, MAX_TICK_MS as i32) as u32;
        let console_baud = match int_or(store, "CONSOLE_BAUD", 0) {
            baud if baud > 0 => baud as u32,
            _ => defaults.console_baud,
        };

        let ticks_per_inch = positive_or(
            float_or(store, "ENC_TICKS_IN", DEFAULT_TICKS_PER_INCH),
            DEFAULT_TICKS_PER_INCH,
        );
        let wheel_spacing = positive_or(
            float_or(store, "WHEEL_SPACING", DEFAULT_WHEEL_SPACING),
            DEFAULT_WHEEL_SPACING,
        );

        let cruise_gains = (
            float_or(store, "CRUISE_KP", DEFAULT_KP),
            float_or(store, "CRUISE_KI", DEFAULT_KI),
            float_or(store, "CRUISE_KD", DEFAULT_KD),
        );
        let cruise_ips = float_or(store, "CRUISE_IPS", DEFAULT_CRUISE_IPS);

        let mut bump_speeds = DEFAULT_BUMP_SPEEDS;
        for (speed, (name, default)) in bump_speeds
            .iter_mut()
            .zip(BUMP_SPEED_NAMES.iter().zip(DEFAULT_BUMP_SPEEDS))
        {
            *speed = int_or(store, name, default).clamp(-MAX_THROTTLE, MAX_THROTTLE);
        }

        let mut bump_times = defaults.bump_times;
        for (time, (name, default)) in bump_times
            .iter_mut()
            .zip(BUMP_TIME_NAMES.iter().zip(DEFAULT_BUMP_TIMES))
        {
            *time = int_or(store, name, default).clamp(1, i32::from(MAX_BUMP_TICKS)) as u16;
        }

        let led_ratios = (
            float_or(store, "LED_RATIO_L", DEFAULT_LED_RATIOS.0),
            float_or(store, "LED_RATIO_R", DEFAULT_LED_RATIOS.1),
        );

        Self {
            tick_ms,
            console_baud,
            ticks_per_inch,
            wheel_spacing,
            cruise_gains,
            cruise_ips,
            bump_speeds,
            bump_times,
            led_ratios,
        }
    }

    /// Validate rover parameters
    pub fn is_valid(&self) -> bool {
        if self.tick_ms == 0 || self.tick_ms > MAX_TICK_MS {
            return false;
        }

        // Both are divisors in the odometry
        if positive_or(self.ticks_per_inch, 0.0) == 0.0 || positive_or(self.wheel_spacing, 0.0) == 0.0 {
            return false;
        }

        if self.bump_speeds.iter().any(|s| s.abs() > MAX_THROTTLE) {
            return false;
        }

        if self
            .bump_times
            .iter()
            .any(|&t| t == 0 || t > MAX_BUMP_TICKS)
        {
            return false;
        }

        let (kp, ki, kd) = self.cruise_gains;
        kp.is_finite() && ki.is_finite() && kd.is_finite() && self.cruise_ips.is_finite()
    }
}
