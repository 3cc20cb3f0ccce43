//! Manual driving and heading turns
//!
//! The navigator takes the wheel only when told to: `NG` drives at fixed
//! throttles until `NS`, and `NT` / `NH` spin in place until the shared
//! pose reaches the target heading. Otherwise it stays out of the way.

use core::cell::Cell;
use core::fmt;

use super::position::Pose;
use crate::core::{ArbitrationToken, Behavior, BehaviorCore, CommandArgs, MessageMask};
use crate::parameters::rover::MAX_THROTTLE;

/// Verb letter
pub const LETTER: u8 = b'N';

/// Turn speed used when a turn command gives none
pub const DEFAULT_TURN_SPEED: i32 = 20;

/// A turn ends once the heading is this close to the target, in degrees
pub const HEADING_TOLERANCE: f32 = 2.0;

/// Navigator state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// Not driving
    Normal,
    /// Driving at the commanded throttles
    Manual,
    /// Stop once, then return to `Normal`
    ManualEnd,
    /// Spinning toward the target heading
    Turning,
}

/// Wrap an angle in degrees into `(-180, 180]`
fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = libm::fmodf(angle + 180.0, 360.0);
    let wrapped = if wrapped <= 0.0 { wrapped + 360.0 } else { wrapped };
    wrapped - 180.0
}

/// Manual drive and turn behavior
pub struct Navigator<'a> {
    core: BehaviorCore,
    pose: &'a Cell<Pose>,
    state: NavState,
    manual: (i32, i32),
    target_heading: f32,
    turn_speed: i32,
}

impl<'a> Navigator<'a> {
    pub fn new(pose: &'a Cell<Pose>) -> Self {
        Self {
            core: BehaviorCore::new("Navigator"),
            pose,
            state: NavState::Normal,
            manual: (0, 0),
            target_heading: 0.0,
            turn_speed: DEFAULT_TURN_SPEED,
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn target_heading(&self) -> f32 {
        self.target_heading
    }

    fn start_turn(&mut self, target: f32, speed: i32, console: &mut dyn fmt::Write) {
        self.target_heading = target;
        self.turn_speed = match speed.abs().min(MAX_THROTTLE) {
            0 => DEFAULT_TURN_SPEED,
            speed => speed,
        };
        self.state = NavState::Turning;
        if self.core.wants(MessageMask::RESPONSES) {
            writeln!(console, "Navigator turning to heading {:.1}", self.target_heading).ok();
        }
    }

    /// Throttles for this tick, `None` to stay out of control
    fn steer(&mut self, console: &mut dyn fmt::Write) -> Option<(i32, i32)> {
        match self.state {
            NavState::Normal => None,
            NavState::Manual => Some(self.manual),
            NavState::ManualEnd => {
                self.state = NavState::Normal;
                Some((0, 0))
            }
            NavState::Turning => {
                let heading = self.pose.get().heading_degrees;
                let error = self.target_heading - heading;
                if self.core.wants(MessageMask::PROGRESS) {
                    writeln!(console, "heading = {:.1}\terror = {:.1}", heading, error).ok();
                }
                if error.abs() <= HEADING_TOLERANCE {
                    self.state = NavState::Normal;
                    if self.core.wants(MessageMask::INFO) {
                        writeln!(console, "Navigator turn complete").ok();
                    }
                    return Some((0, 0));
                }
                // Heading grows clockwise: left wheel forward
                let speed = if error > 0.0 { self.turn_speed } else { -self.turn_speed };
                Some((speed, -speed))
            }
        }
    }
}

impl Behavior for Navigator<'_> {
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
        if let Some((left, right)) = self.steer(console) {
            token.claim(self.core.claim_tag(), left, right);
        }
    }

    fn handle_command_event(&mut self, args: &CommandArgs, console: &mut dyn fmt::Write) {
        let respond = self.core.wants(MessageMask::RESPONSES);
        match args.subcommand() {
            Some(b'G') => {
                self.manual = (
                    args.int(0).clamp(-MAX_THROTTLE, MAX_THROTTLE),
                    args.int(1).clamp(-MAX_THROTTLE, MAX_THROTTLE),
                );
                self.state = NavState::Manual;
                if respond {
                    writeln!(console, "Navigator speeds set to {}\t{}", self.manual.0, self.manual.1).ok();
                }
            }
            Some(b'S') => {
                self.manual = (0, 0);
                self.state = NavState::ManualEnd;
                if respond {
                    writeln!(console, "Navigator resuming automatic control.").ok();
                }
            }
            Some(b'T') => {
                let heading = self.pose.get().heading_degrees;
                self.start_turn(heading + args.int(0) as f32, args.int(1), console);
            }
            Some(b'H') => {
                let heading = self.pose.get().heading_degrees;
                let target = heading + wrap_degrees(args.int(0) as f32 - heading);
                self.start_turn(target, args.int(1), console);
            }
            _ => {}
        }
    }

    fn help(&self) -> &'static str {
        "  G <l> <r> : Drive at throttles l, r\n  S : Stop and resume automatic control\n  T <+/- degrees> <speed> : Turn right or left\n  H <heading> <speed> : Turn to heading"
    }

    fn print_parameters(&self, console: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(
            console,
            "  State = {:?}, manual = {}\t{}, target heading = {:.1}, turn speed = {}",
            self.state, self.manual.0, self.manual.1, self.target_heading, self.turn_speed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::String;
    use subsumption_core::arbitration::Claim;
    use subsumption_core::behavior::dispatch_command;
    use subsumption_core::bus::SubscriberId;

    fn tick(navigator: &mut Navigator<'_>, console: &mut String<256>) -> Option<(i32, i32)> {
        let mut token = ArbitrationToken::new(20);
        navigator.handle_control_event(&mut token, console);
        token.is_claimed().then(|| token.throttles())
    }

    fn with_heading(pose: &Cell<Pose>, heading: f32) {
        pose.set(Pose {
            heading_degrees: heading,
            ..Pose::default()
        });
    }

    #[test]
    fn test_wrap_degrees() {
        assert_eq!(wrap_degrees(0.0), 0.0);
        assert_eq!(wrap_degrees(190.0), -170.0);
        assert_eq!(wrap_degrees(-190.0), 170.0);
        assert_eq!(wrap_degrees(180.0), 180.0);
        assert_eq!(wrap_degrees(540.0), 180.0);
    }

    #[test]
    fn test_manual_drive_then_stop() {
        let pose = Cell::new(Pose::default());
        let mut navigator = Navigator::new(&pose);
        let mut console: String<256> = String::new();

        assert_eq!(tick(&mut navigator, &mut console), None);

        dispatch_command(&mut navigator, &CommandArgs::parse("NG 40 -40"), &mut console);
        assert_eq!(console.as_str(), "Navigator speeds set to 40\t-40\n");
        assert_eq!(tick(&mut navigator, &mut console), Some((40, -40)));
        assert_eq!(tick(&mut navigator, &mut console), Some((40, -40)));

        dispatch_command(&mut navigator, &CommandArgs::parse("NS"), &mut console);
        assert_eq!(tick(&mut navigator, &mut console), Some((0, 0)));
        assert_eq!(tick(&mut navigator, &mut console), None);
        assert_eq!(navigator.state(), NavState::Normal);
    }

    #[test]
    fn test_manual_subsumed_by_higher_priority() {
        let pose = Cell::new(Pose::default());
        let mut navigator = Navigator::new(&pose);
        let mut console: String<256> = String::new();
        dispatch_command(&mut navigator, &CommandArgs::parse("NG 40 40"), &mut console);

        let mut token = ArbitrationToken::new(20);
        token.force(Claim::new(SubscriberId::new(3), "Crash Recover"), -5, -5);
        navigator.handle_control_event(&mut token, &mut console);
        assert_eq!(token.throttles(), (-5, -5));
        assert_eq!(token.claimant().map(|c| c.name), Some("Crash Recover"));
    }

    #[test]
    fn test_turn_by_degrees() {
        let pose = Cell::new(Pose::default());
        let mut navigator = Navigator::new(&pose);
        let mut console: String<256> = String::new();
        with_heading(&pose, 10.0);

        dispatch_command(&mut navigator, &CommandArgs::parse("NT -90 30"), &mut console);
        assert_eq!(navigator.target_heading(), -80.0);
        assert_eq!(tick(&mut navigator, &mut console), Some((-30, 30)));

        with_heading(&pose, -79.0);
        assert_eq!(tick(&mut navigator, &mut console), Some((0, 0)));
        assert_eq!(tick(&mut navigator, &mut console), None);
    }

    #[test]
    fn test_turn_to_heading_takes_short_way() {
        let pose = Cell::new(Pose::default());
        let mut navigator = Navigator::new(&pose);
        let mut console: String<256> = String::new();
        with_heading(&pose, 350.0);

        dispatch_command(&mut navigator, &CommandArgs::parse("NH 10 0"), &mut console);
        assert_eq!(navigator.target_heading(), 370.0);
        assert_eq!(
            tick(&mut navigator, &mut console),
            Some((DEFAULT_TURN_SPEED, -DEFAULT_TURN_SPEED))
        );
    }

    #[test]
    fn test_disabled_does_not_claim() {
        let pose = Cell::new(Pose::default());
        let mut navigator = Navigator::new(&pose);
        let mut console: String<256> = String::new();
        dispatch_command(&mut navigator, &CommandArgs::parse("NG 10 10"), &mut console);
        dispatch_command(&mut navigator, &CommandArgs::parse("N0"), &mut console);
        assert_eq!(tick(&mut navigator, &mut console), None);
    }
}
