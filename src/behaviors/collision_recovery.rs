//! Ballistic bump recovery
//!
//! When either bump switch closes the rover stops, backs up, turns away
//! from the obstacle and drives forward before handing control back. Each
//! state lasts a configured number of ticks and drives a configured
//! throttle. The sequence only advances on ticks where no higher-priority
//! behavior holds the token.

use core::fmt;

use crate::core::{ArbitrationToken, Behavior, BehaviorCore, CommandArgs, MessageMask};
use crate::parameters::rover::{MAX_BUMP_TICKS, MAX_THROTTLE};
use crate::platform::GpioInterface;

/// Verb letter
pub const LETTER: u8 = b'B';

/// Recovery sequence state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryState {
    Normal,
    Stopped,
    Reversing,
    Turning,
    Forward,
}

impl RecoveryState {
    /// Slot in the speed and time tables, `None` for `Normal`
    fn slot(self) -> Option<usize> {
        match self {
            RecoveryState::Normal => None,
            RecoveryState::Stopped => Some(0),
            RecoveryState::Reversing => Some(1),
            RecoveryState::Turning => Some(2),
            RecoveryState::Forward => Some(3),
        }
    }

    fn next(self) -> Self {
        match self {
            RecoveryState::Normal => RecoveryState::Normal,
            RecoveryState::Stopped => RecoveryState::Reversing,
            RecoveryState::Reversing => RecoveryState::Turning,
            RecoveryState::Turning => RecoveryState::Forward,
            RecoveryState::Forward => RecoveryState::Normal,
        }
    }

    /// Progress message printed on entering this state
    fn announcement(self) -> &'static str {
        match self {
            RecoveryState::Normal => "Done",
            RecoveryState::Stopped => "Stopped",
            RecoveryState::Reversing => "Reverse",
            RecoveryState::Turning => "Turning",
            RecoveryState::Forward => "Forward",
        }
    }
}

/// Default throttle per state: stop, back, turn, forward
pub const DEFAULT_SPEEDS: [i32; 4] = [0, -5, -10, 20];

/// Default ticks per state
pub const DEFAULT_TIMES: [u16; 4] = [2, 2, 2, 2];

/// Bump recovery behavior with two bump switch inputs
///
/// A switch reads high while pressed. `BL` and `BR` simulate a bump on
/// either side.
pub struct CollisionRecovery<G: GpioInterface> {
    core: BehaviorCore,
    left_bumper: G,
    right_bumper: G,
    state: RecoveryState,
    /// Ticks left in the current state, this one included
    remaining: u16,
    bump_left: bool,
    bump_right: bool,
    speeds: [i32; 4],
    times: [u16; 4],
}

impl<G: GpioInterface> CollisionRecovery<G> {
    pub fn new(left_bumper: G, right_bumper: G) -> Self {
        Self {
            core: BehaviorCore::new("Crash Recover"),
            left_bumper,
            right_bumper,
            state: RecoveryState::Normal,
            remaining: 0,
            bump_left: false,
            bump_right: false,
            speeds: DEFAULT_SPEEDS,
            times: DEFAULT_TIMES,
        }
    }

    /// Replace the speed and time tables
    pub fn with_profile(mut self, speeds: [i32; 4], times: [u16; 4]) -> Self {
        for (slot, speed) in self.speeds.iter_mut().zip(speeds) {
            *slot = speed.clamp(-MAX_THROTTLE, MAX_THROTTLE);
        }
        for (slot, time) in self.times.iter_mut().zip(times) {
            *slot = time.clamp(1, MAX_BUMP_TICKS);
        }
        self
    }

    pub fn state(&self) -> RecoveryState {
        self.state
    }

    pub fn speeds(&self) -> [i32; 4] {
        self.speeds
    }

    pub fn times(&self) -> [u16; 4] {
        self.times
    }

    pub fn left_bumper_mut(&mut self) -> &mut G {
        &mut self.left_bumper
    }

    pub fn right_bumper_mut(&mut self) -> &mut G {
        &mut self.right_bumper
    }

    fn enter(&mut self, state: RecoveryState, console: &mut dyn fmt::Write) {
        self.state = state;
        match state.slot() {
            Some(slot) => self.remaining = self.times[slot],
            None => {
                self.bump_left = false;
                self.bump_right = false;
            }
        }
        if self.core.wants(MessageMask::PROGRESS) {
            writeln!(console, "{}", state.announcement()).ok();
        }
    }

    /// Advance one tick, returning the throttles to claim
    fn step(&mut self, console: &mut dyn fmt::Write) -> Option<(i32, i32)> {
        if self.state == RecoveryState::Normal {
            self.bump_left |= self.left_bumper.read();
            self.bump_right |= self.right_bumper.read();
            if !(self.bump_left || self.bump_right) {
                return None;
            }
            self.enter(RecoveryState::Stopped, console);
        }

        let slot = self.state.slot()?;
        let speed = self.speeds[slot];
        let mut throttles = (speed, speed);
        if self.state == RecoveryState::Turning {
            // Slow the wheel on the bumped side to swing away from it
            if self.bump_left {
                throttles.0 = speed / 2;
            } else {
                throttles.1 = speed / 2;
            }
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.enter(self.state.next(), console);
        }
        Some(throttles)
    }

    fn print_row<T: fmt::Display>(
        console: &mut dyn fmt::Write,
        label: &str,
        values: &[T],
    ) -> fmt::Result {
        write!(console, "{}", label)?;
        for value in values {
            write!(console, "\t{}", value)?;
        }
        writeln!(console)
    }
}

impl<G: GpioInterface> Behavior for CollisionRecovery<G> {
    fn core(&self) -> &BehaviorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BehaviorCore {
        &mut self.core
    }

    fn handle_control_event(&mut self, token: &mut ArbitrationToken, console: &mut dyn fmt::Write) {
        if !self.core.is_enabled() || token.is_claimed() {
            return;
        }
        if let Some((left, right)) = self.step(console) {
            token.claim(self.core.claim_tag(), left, right);
        }
    }

    fn handle_command_event(&mut self, args: &CommandArgs, console: &mut dyn fmt::Write) {
        let respond = self.core.wants(MessageMask::RESPONSES);
        match args.subcommand() {
            Some(b'L') => {
                if self.core.wants(MessageMask::PROGRESS) {
                    writeln!(console, "Bump Left!").ok();
                }
                self.bump_left = true;
            }
            Some(b'R') => {
                if self.core.wants(MessageMask::PROGRESS) {
                    writeln!(console, "Bump Right!").ok();
                }
                self.bump_right = true;
            }
            Some(b'S') => {
                for (i, speed) in args.ints().iter().enumerate() {
                    self.speeds[i] = (*speed).clamp(-MAX_THROTTLE, MAX_THROTTLE);
                    if respond {
                        writeln!(console, "Bump speed {} set to {}", i + 1, self.speeds[i]).ok();
                    }
                }
            }
            Some(b'T') => {
                for (i, time) in args.ints().iter().enumerate() {
                    self.times[i] = (*time).clamp(1, i32::from(MAX_BUMP_TICKS)) as u16;
                    if respond {
                        writeln!(console, "Bump time {} set to {}", i + 1, self.times[i]).ok();
                    }
                }
            }
            _ => {}
        }
    }

    fn help(&self) -> &'static str {
        "  L: Simulate bump left\n  R: Simulate bump right\n  S: <s1> <s2> <s3> <s4> Speeds (throttle)\n  T: <t1> <t2> <t3> <t4> Times (ticks)"
    }

    fn print_parameters(&self, console: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(console, "\t\tStop\tBack\tTurn\tFwd")?;
        Self::print_row(console, " Speeds:", &self.speeds)?;
        Self::print_row(console, " Times: ", &self.times)
    }
}
