//! Constant-speed cruising
//!
//! Cruise control is the default behavior: whenever nothing of higher
//! priority has claimed the token it drives both wheels at the cruise
//! speed. Each wheel runs its own PID loop on the distance travelled per
//! tick, read from the shared pose:
//!
//! - **P**: expected travel this tick minus actual travel
//! - **I**: ideal position minus actual position, accumulated since
//!   cruising began
//! - **D**: change of the P error between ticks
//!
//! The loop output is added to the throttle, so a steady state holds the
//! throttle that yields the target speed. Losing control for even one tick
//! ends the cruise; the next tick re-anchors the ideal positions.

use core::cell::Cell;
use core::fmt;

use super::position::Pose;
use crate::core::{ArbitrationToken, Behavior, BehaviorCore, CommandArgs, MessageMask};
use crate::parameters::rover::MAX_THROTTLE;

/// Verb letter
pub const LETTER: u8 = b'C';

/// PID gains
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gains {
    pub kp: f32,
    pub ki: f32,
    pub kd: f32,
}

impl Default for Gains {
    fn default() -> Self {
        Self {
            kp: 1.0,
            ki: 0.5,
            kd: 0.0,
        }
    }
}

/// One wheel's loop state, positions in inches
#[derive(Debug, Clone, Copy, Default)]
struct WheelLoop {
    throttle: f32,
    ideal: f32,
    prev_position: f32,
    prev_error: f32,
}

/// Terms of one loop update, kept for logging
#[derive(Debug, Clone, Copy)]
struct Terms {
    delta: f32,
    error: f32,
    cumulative: f32,
}

impl WheelLoop {
    fn anchor(&mut self, position: f32) {
        self.ideal = position;
        self.prev_position = position;
        self.prev_error = 0.0;
    }

    fn update(&mut self, position: f32, target: f32, gains: Gains) -> Terms {
        let delta = position - self.prev_position;
        let error = target - delta;
        let delta_error = self.prev_error - error;
        let cumulative = self.ideal - position;

        let limit = MAX_THROTTLE as f32;
        self.throttle = (self.throttle
            + gains.kp * error
            + gains.ki * cumulative
            + gains.kd * delta_error)
            .clamp(-limit, limit);

        self.prev_error = error;
        self.prev_position = position;
        Terms {
            delta,
            error,
            cumulative,
        }
    }

    fn output(&self) -> i32 {
        libm::roundf(self.throttle) as i32
    }
}

/// Cruise control behavior
pub struct CruiseControl<'a> {
    core: BehaviorCore,
    pose: &'a Cell<Pose>,
    gains: Gains,
    speed_ips: f32,
    cruising: bool,
    left: WheelLoop,
    right: WheelLoop,
}

impl<'a> CruiseControl<'a> {
    pub fn new(pose: &'a Cell<Pose>) -> Self {
        Self {
            core: BehaviorCore::new("Cruise Control"),
            pose,
            gains: Gains::default(),
            speed_ips: 0.0,
            cruising: false,
            left: WheelLoop::default(),
            right: WheelLoop::default(),
        }
    }

    pub fn with_gains(mut self, gains: Gains) -> Self {
        self.gains = gains;
        self
    }

    pub fn with_speed(mut self, speed_ips: f32) -> Self {
        self.speed_ips = speed_ips;
        self
    }

    pub fn gains(&self) -> Gains {
        self.gains
    }

    pub fn speed_ips(&self) -> f32 {
        self.speed_ips
    }

    pub fn is_cruising(&self) -> bool {
        self.cruising
    }

    /// Current `(left, right)` throttle outputs
    pub fn throttles(&self) -> (i32, i32) {
        (self.left.output(), self.right.output())
    }

    fn cruise(&mut self, token: &mut ArbitrationToken, console: &mut dyn fmt::Write) {
        let pose = self.pose.get();
        let target = self.speed_ips * token.interval_ms() as f32 / 1000.0;

        if self.cruising {
            let left = self.left.update(pose.left_inches, target, self.gains);
            let right = self.right.update(pose.right_inches, target, self.gains);

            if self.core.wants(MessageMask::PROGRESS) {
                writeln!(
                    console,
                    "\nCruise Control PID calc:\ntarget = {:.3}\tdelta = {:.3}/{:.3}\terror = {:.3}/{:.3}\tcumulative = {:.3}/{:.3}",
                    target, left.delta, right.delta, left.error, right.error, left.cumulative, right.cumulative
                )
                .ok();
            }

            if self.core.wants(MessageMask::CSV_BASIC) {
                let ki = self.gains.ki;
                let columns = [
                    ("target", target),
                    ("errL", left.error),
                    ("cumL", left.cumulative),
                    ("iL", ki * left.cumulative),
                    ("errR", right.error),
                    ("cumR", right.cumulative),
                    ("iR", ki * right.cumulative),
                ];
                for (name, value) in columns {
                    token.csv_field(console, name, value).ok();
                }
            }
        } else {
            self.cruising = true;
            self.left.anchor(pose.left_inches);
            self.right.anchor(pose.right_inches);
        }

        self.left.ideal += target;
        self.right.ideal += target;

        let (left, right) = self.throttles();
        token.claim(self.core.claim_tag(), left, right);
    }
}

impl Behavior for CruiseControl<'_> {
    fn core(&self) -> &BehaviorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BehaviorCore {
        &mut self.core
    }

    fn handle_control_event(&mut self, token: &mut ArbitrationToken, console: &mut dyn fmt::Write) {
        if !self.core.is_enabled() {
            self.cruising = false;
            return;
        }
        if token.is_claimed() {
            self.cruising = false;
        } else {
            self.cruise(token, console);
        }
    }

    fn handle_command_event(&mut self, args: &CommandArgs, console: &mut dyn fmt::Write) {
        let respond = self.core.wants(MessageMask::RESPONSES);
        match args.subcommand() {
            Some(b'S') => {
                self.speed_ips = args.float(0);
                if respond {
                    writeln!(console, "\nCruise Speed set to {:.2} IPS", self.speed_ips).ok();
                }
            }
            Some(b'P') => {
                self.gains = Gains {
                    kp: args.float(0),
                    ki: args.float(1),
                    kd: args.float(2),
                };
                if respond {
                    writeln!(
                        console,
                        "P\tI\tD\n{:.2}\t{:.2}\t{:.2}",
                        self.gains.kp, self.gains.ki, self.gains.kd
                    )
                    .ok();
                }
            }
            _ => {}
        }
    }

    fn help(&self) -> &'static str {
        "  S <Speed> : Set cruising speed (IPS)\n  P <kP> <kI> <kD> : Set PID coefficients"
    }

    fn print_parameters(&self, console: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(console, " Cruising Speed (IPS): {:.2}", self.speed_ips)?;
        writeln!(
            console,
            " PID:\t{:.2}\t{:.2}\t{:.2}",
            self.gains.kp, self.gains.ki, self.gains.kd
        )
    }
}
