//! Terminal motor driver
//!
//! The motor driver sits at the end of the control chain. It never claims
//! the token; it turns whatever throttles the winning behavior left there
//! into PWM duty and direction pins. Front and rear motors on one side are
//! wired in parallel and share a channel.

use core::fmt;

use crate::core::{ArbitrationToken, Behavior, BehaviorCore, CommandArgs, MessageMask};
use crate::parameters::rover::MAX_THROTTLE;
use crate::platform::{GpioInterface, PlatformError, PwmInterface, Result};

/// Verb letter
pub const LETTER: u8 = b'M';

/// One side's speed PWM and direction pin
pub struct MotorChannel<P: PwmInterface, G: GpioInterface> {
    pwm: P,
    direction: G,
}

impl<P: PwmInterface, G: GpioInterface> MotorChannel<P, G> {
    pub fn new(pwm: P, direction: G) -> Self {
        Self { pwm, direction }
    }

    /// Drive at a signed throttle; the direction pin is high in reverse
    pub fn drive(&mut self, throttle: i32) -> Result<()> {
        let level = throttle.unsigned_abs().min(MAX_THROTTLE as u32) as u8;
        self.direction.write(throttle < 0)?;
        self.pwm.set_level(level)
    }

    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    pub fn direction(&self) -> &G {
        &self.direction
    }
}

/// PWM/direction motor driver for a differential drive
pub struct MotorDriver<P: PwmInterface, G: GpioInterface> {
    core: BehaviorCore,
    left: MotorChannel<P, G>,
    right: MotorChannel<P, G>,
    throttles: (i32, i32),
    last_fault: Option<PlatformError>,
}

impl<P: PwmInterface, G: GpioInterface> MotorDriver<P, G> {
    pub fn new(left: MotorChannel<P, G>, right: MotorChannel<P, G>) -> Self {
        Self {
            core: BehaviorCore::new("Motor"),
            left,
            right,
            throttles: (0, 0),
            last_fault: None,
        }
    }

    /// Throttles last written to the motors
    pub fn throttles(&self) -> (i32, i32) {
        self.throttles
    }

    pub fn left(&self) -> &MotorChannel<P, G> {
        &self.left
    }

    pub fn right(&self) -> &MotorChannel<P, G> {
        &self.right
    }

    /// Most recent peripheral failure, cleared on read
    pub fn take_fault(&mut self) -> Option<PlatformError> {
        self.last_fault.take()
    }

    fn drive(&mut self, left: i32, right: i32) {
        let results = [self.left.drive(left), self.right.drive(right)];
        for result in results {
            if let Err(e) = result {
                crate::log_warn!("motor write failed: {:?}", e);
                self.last_fault = Some(e);
            }
        }
        self.throttles = (left, right);
    }
}

impl<P: PwmInterface, G: GpioInterface> Behavior for MotorDriver<P, G> {
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
        self.drive(left, right);

        if self.core.wants(MessageMask::INFO) {
            if let Some(claimant) = token.claimant() {
                writeln!(console, "[{}] {}/{}", claimant.name, left, right).ok();
            }
        }
    }

    fn handle_command_event(&mut self, args: &CommandArgs, console: &mut dyn fmt::Write) {
        if args.subcommand() != Some(b'S') || !self.core.is_enabled() {
            return;
        }
        let (left, right) = (args.int(0), args.int(1));
        self.drive(left, right);
        if self.core.wants(MessageMask::RESPONSES) {
            writeln!(console, "Motor speeds directly set to: {}\t{}", left, right).ok();
        }
    }

    fn help(&self) -> &'static str {
        "  S <LeftSpeed> <RightSpeed>: Set 'Motor' speeds"
    }

    fn print_parameters(&self, console: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(
            console,
            "  Throttles = {}/{}, duty = {}/{}",
            self.throttles.0,
            self.throttles.1,
            self.left.pwm.level(),
            self.right.pwm.level()
        )
    }
}
