//! Dead-reckoning odometry from wheel encoders
//!
//! Position is the highest-priority behavior and never claims the token.
//! On every tick it snapshots both encoder counts once and derives the
//! whole pose from that snapshot, so every behavior visited later in the
//! same tick sees a consistent pose.

use core::cell::Cell;
use core::f32::consts::PI;
use core::fmt;
use core::sync::atomic::{AtomicI32, Ordering};

use crate::core::{ArbitrationToken, Behavior, BehaviorCore, CommandArgs, MessageMask};

/// Verb letter
pub const LETTER: u8 = b'P';

/// Raw encoder counts, written from interrupt context or a simulator
#[derive(Debug, Default)]
pub struct EncoderCounts {
    left: AtomicI32,
    right: AtomicI32,
}

impl EncoderCounts {
    pub const fn new() -> Self {
        Self {
            left: AtomicI32::new(0),
            right: AtomicI32::new(0),
        }
    }

    /// Add signed tick deltas to both wheels
    pub fn add(&self, left: i32, right: i32) {
        self.left.fetch_add(left, Ordering::Relaxed);
        self.right.fetch_add(right, Ordering::Relaxed);
    }

    /// Current `(left, right)` counts
    pub fn snapshot(&self) -> (i32, i32) {
        (
            self.left.load(Ordering::Relaxed),
            self.right.load(Ordering::Relaxed),
        )
    }

    pub fn reset(&self) {
        self.left.store(0, Ordering::Relaxed);
        self.right.store(0, Ordering::Relaxed);
    }
}

/// Rover pose in inches and radians from the last reset
///
/// Heading grows when the left wheel has travelled further than the right,
/// i.e. clockwise seen from above. It is not wrapped.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pose {
    pub left_inches: f32,
    pub right_inches: f32,
    /// Distance travelled by the center of the axle
    pub distance_inches: f32,
    pub theta: f32,
    pub x_inches: f32,
    pub y_inches: f32,
    pub heading_degrees: f32,
}

/// Odometry behavior
pub struct Position<'a> {
    core: BehaviorCore,
    encoders: &'a EncoderCounts,
    pose: &'a Cell<Pose>,
    ticks_per_inch: f32,
    wheel_spacing: f32,
}

impl<'a> Position<'a> {
    pub fn new(
        encoders: &'a EncoderCounts,
        pose: &'a Cell<Pose>,
        ticks_per_inch: f32,
        wheel_spacing: f32,
    ) -> Self {
        Self {
            core: BehaviorCore::fixed("Position"),
            encoders,
            pose,
            ticks_per_inch,
            wheel_spacing,
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose.get()
    }

    /// Zero the encoders and the pose
    pub fn reset(&mut self) {
        self.encoders.reset();
        self.pose.set(Pose::default());
    }

    fn update(&self, counts: (i32, i32)) -> Pose {
        let mut pose = self.pose.get();

        let d_left = counts.0 as f32 / self.ticks_per_inch - pose.left_inches;
        let d_right = counts.1 as f32 / self.ticks_per_inch - pose.right_inches;
        let d_distance = (d_left + d_right) / 2.0;

        pose.left_inches += d_left;
        pose.right_inches += d_right;
        pose.distance_inches += d_distance;

        pose.theta = (pose.left_inches - pose.right_inches) / self.wheel_spacing;
        pose.x_inches += d_distance * libm::sinf(pose.theta);
        pose.y_inches += d_distance * libm::cosf(pose.theta);
        pose.heading_degrees = pose.theta * (180.0 / PI);

        self.pose.set(pose);
        pose
    }
}

impl Behavior for Position<'_> {
    fn core(&self) -> &BehaviorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BehaviorCore {
        &mut self.core
    }

    fn handle_control_event(&mut self, token: &mut ArbitrationToken, console: &mut dyn fmt::Write) {
        let counts = self.encoders.snapshot();
        let pose = self.update(counts);

        if self.core.wants(MessageMask::PROGRESS) {
            writeln!(
                console,
                "enc = {}/{}\tin = {:.2}/{:.2}\tdist = {:.2}\ttheta = {:.3}\tx = {:.2}\ty = {:.2}\thdg = {:.1}",
                counts.0,
                counts.1,
                pose.left_inches,
                pose.right_inches,
                pose.distance_inches,
                pose.theta,
                pose.x_inches,
                pose.y_inches,
                pose.heading_degrees
            )
            .ok();
        }

        if self.core.wants(MessageMask::CSV_BASIC) {
            let columns = [
                ("leftIn", pose.left_inches),
                ("rightIn", pose.right_inches),
                ("distIn", pose.distance_inches),
                ("theta", pose.theta),
                ("xIn", pose.x_inches),
                ("yIn", pose.y_inches),
                ("heading", pose.heading_degrees),
            ];
            for (name, value) in columns {
                token.csv_field(console, name, value).ok();
            }
        }
    }

    fn handle_command_event(&mut self, args: &CommandArgs, console: &mut dyn fmt::Write) {
        if args.subcommand() != Some(b'R') {
            return;
        }
        if args.int(0) == 9 {
            self.reset();
            if self.core.wants(MessageMask::RESPONSES) {
                writeln!(console, "Position reset to zero").ok();
            }
        } else {
            writeln!(console, "Enter \"PR 9\" to reset").ok();
        }
    }

    fn help(&self) -> &'static str {
        "  R 9 : Reset position to zero"
    }

    fn print_parameters(&self, console: &mut dyn fmt::Write) -> fmt::Result {
        let pose = self.pose.get();
        writeln!(
            console,
            "  x = {:.2}, y = {:.2}, heading = {:.1}, distance = {:.2}",
            pose.x_inches, pose.y_inches, pose.heading_degrees, pose.distance_inches
        )
    }
}
