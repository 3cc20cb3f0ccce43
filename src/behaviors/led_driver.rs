//! LED motor emulator
//!
//! Stands in for the motor driver on a bench board: four LEDs show forward
//! and reverse throttle per side, and the encoder counts are advanced as if
//! the wheels had turned. The per-side ratios let one wheel drag.

use core::fmt;

use super::position::EncoderCounts;
use crate::core::{ArbitrationToken, Behavior, BehaviorCore, CommandArgs, MessageMask};
use crate::parameters::rover::MAX_THROTTLE;
use crate::platform::{PwmInterface, Result};

/// Verb letter
pub const LETTER: u8 = b'L';

/// Forward and back LEDs for one side
pub struct LedPair<P: PwmInterface> {
    forward: P,
    back: P,
}

impl<P: PwmInterface> LedPair<P> {
    pub fn new(forward: P, back: P) -> Self {
        Self { forward, back }
    }

    /// Light the LED matching the throttle's sign, the other goes dark
    pub fn show(&mut self, throttle: i32) -> Result<()> {
        let level = throttle.unsigned_abs().min(MAX_THROTTLE as u32) as u8;
        let (forward, back) = if throttle < 0 { (0, level) } else { (level, 0) };
        self.forward.set_level(forward)?;
        self.back.set_level(back)
    }

    pub fn forward(&self) -> &P {
        &self.forward
    }

    pub fn back(&self) -> &P {
        &self.back
    }
}

/// LED motor emulator with simulated encoder feedback
pub struct LedDriver<'a, P: PwmInterface> {
    core: BehaviorCore,
    left: LedPair<P>,
    right: LedPair<P>,
    encoders: &'a EncoderCounts,
    /// Encoder ticks per throttle unit per tick, `(left, right)`
    ratios: (f32, f32),
}

impl<'a, P: PwmInterface> LedDriver<'a, P> {
    pub fn new(left: LedPair<P>, right: LedPair<P>, encoders: &'a EncoderCounts) -> Self {
        Self {
            core: BehaviorCore::new("LED 'Motor'"),
            left,
            right,
            encoders,
            ratios: (1.0, 0.99),
        }
    }

    pub fn with_ratios(mut self, left: f32, right: f32) -> Self {
        self.ratios = (left, right);
        self
    }

    pub fn ratios(&self) -> (f32, f32) {
        self.ratios
    }

    pub fn left(&self) -> &LedPair<P> {
        &self.left
    }

    pub fn right(&self) -> &LedPair<P> {
        &self.right
    }

    fn show(&mut self, left: i32, right: i32) {
        for result in [self.left.show(left), self.right.show(right)] {
            if let Err(e) = result {
                crate::log_warn!("led write failed: {:?}", e);
            }
        }
    }
}

impl<P: PwmInterface> Behavior for LedDriver<'_, P> {
    fn core(&self) -> &BehaviorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BehaviorCore {
        &mut self.core
    }

    fn handle_control_event(&mut self, token: &mut ArbitrationToken, console: &mut dyn fmt::Write) {
        if !self.core.is_enabled() {
            return;
        }
        let (left, right) = token.throttles();
        self.show(left, right);

        let info = self.core.wants(MessageMask::INFO);
        if info {
            if let Some(claimant) = token.claimant() {
                writeln!(console, "[{}] {}/{}", claimant.name, left, right).ok();
            }
        }

        self.encoders.add(
            (left as f32 * self.ratios.0) as i32,
            (right as f32 * self.ratios.1) as i32,
        );

        if info {
            let (left, right) = self.encoders.snapshot();
            writeln!(console, "Positions set to: {}/{}", left, right).ok();
        }
    }

    fn handle_command_event(&mut self, args: &CommandArgs, console: &mut dyn fmt::Write) {
        let respond = self.core.wants(MessageMask::RESPONSES);
        match args.subcommand() {
            Some(b'S') if self.core.is_enabled() => {
                let (left, right) = (args.int(0), args.int(1));
                self.show(left, right);
                if respond {
                    writeln!(console, "LED simulator speeds directly set to: {}\t{}", left, right).ok();
                }
            }
            Some(b'R') => {
                self.ratios = (args.float(0), args.float(1));
                if respond {
                    writeln!(
                        console,
                        "LED simulator throttle/speed ratios set to: {:.2}\t{:.2}",
                        self.ratios.0, self.ratios.1
                    )
                    .ok();
                }
            }
            _ => {}
        }
    }

    fn help(&self) -> &'static str {
        "  S <LeftSpeed> <RightSpeed>: Set 'Motor' speeds\n  R <LeftRatio> <RightRatio>: Set throttle/speed ratios"
    }

    fn print_parameters(&self, console: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(console, "  Ratios = {:.2}\t{:.2}", self.ratios.0, self.ratios.1)
    }
}
