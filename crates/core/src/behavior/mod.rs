//! Behavior contract and common sub-commands
//!
//! Every participant in the control chain implements [`Behavior`]. A
//! behavior receives two kinds of events:
//!
//! - **Control events**: once per tick, with the shared
//!   [`ArbitrationToken`]. Behaviors are visited in priority order.
//! - **Command events**: whenever a console line names the behavior's verb
//!   letter, with the parsed [`CommandArgs`].
//!
//! Sub-commands common to all behaviors (`?`, `0`, `1`, `Q`, `V`, `V+`,
//! `V-`) are handled by [`dispatch_command`] before the behavior's own
//! handler sees the line.

pub mod arena;

use core::fmt;

use bitflags::bitflags;

use crate::arbitration::{ArbitrationToken, Claim};
use crate::bus::SubscriberId;
use crate::command::CommandArgs;

pub use arena::{ArenaError, BehaviorArena};

bitflags! {
    /// Verbosity bits selecting which console messages a behavior emits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MessageMask: u16 {
        /// Replies to commands
        const RESPONSES = 0b0000_0001;
        /// Informational state changes
        const INFO = 0b0000_0010;
        /// Per-tick progress output
        const PROGRESS = 0b0000_0100;
        /// Trace each visit as `+Name` / `-Name`
        const ID = 0b0000_1000;
        /// Contribute basic columns to CSV logging
        const CSV_BASIC = 0b0001_0000;
    }
}

impl Default for MessageMask {
    fn default() -> Self {
        MessageMask::RESPONSES
    }
}

/// State shared by every behavior: identity, enablement and verbosity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviorCore {
    name: &'static str,
    id: SubscriberId,
    enabled: bool,
    can_be_disabled: bool,
    verbosity: MessageMask,
}

impl BehaviorCore {
    /// Enabled behavior that the `0` sub-command may disable
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            id: SubscriberId::UNBOUND,
            enabled: true,
            can_be_disabled: true,
            verbosity: MessageMask::RESPONSES,
        }
    }

    /// Behavior that ignores `0` and `1`
    pub const fn fixed(name: &'static str) -> Self {
        Self {
            can_be_disabled: false,
            ..Self::new(name)
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Arena identity, [`SubscriberId::UNBOUND`] until inserted
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn bind(&mut self, id: SubscriberId) {
        self.id = id;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn can_be_disabled(&self) -> bool {
        self.can_be_disabled
    }

    pub fn verbosity(&self) -> MessageMask {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, mask: MessageMask) {
        self.verbosity = mask;
    }

    /// Whether any of `mask` is enabled
    #[inline]
    pub fn wants(&self, mask: MessageMask) -> bool {
        self.verbosity.intersects(mask)
    }

    /// Identity to place on the arbitration token
    pub fn claim_tag(&self) -> Claim {
        Claim::new(self.id, self.name)
    }
}

/// A participant in the subsumption chain
///
/// # Claim contract
///
/// Behaviors earlier in the control chain have higher priority. During
/// [`handle_control_event`](Behavior::handle_control_event) a behavior that
/// wants to drive the motors must check
/// [`ArbitrationToken::is_claimed`] first, and only when the token is
/// unclaimed write its throttles and mark itself claimant.
/// [`ArbitrationToken::claim`] does all three. A behavior that finds the
/// token claimed has been subsumed and must not overwrite it. The terminal
/// driver reads the final throttles and claimant and never claims.
///
/// Nothing enforces this; a behavior that writes anyway wins silently.
pub trait Behavior {
    fn core(&self) -> &BehaviorCore;

    fn core_mut(&mut self) -> &mut BehaviorCore;

    /// Handle one control tick
    fn handle_control_event(&mut self, token: &mut ArbitrationToken, console: &mut dyn fmt::Write);

    /// Handle a sub-command not covered by the common set
    fn handle_command_event(&mut self, args: &CommandArgs, console: &mut dyn fmt::Write);

    /// Behavior-specific lines appended to the `?` help
    fn help(&self) -> &'static str {
        ""
    }

    /// Behavior-specific lines printed by `Q` and `?`
    fn print_parameters(&self, console: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(
            console,
            " No parameter query defined for {}",
            self.core().name()
        )
    }
}

/// Deliver a control tick, tracing the visit when `ID` verbosity is set
pub fn dispatch_control<B>(behavior: &mut B, token: &mut ArbitrationToken, console: &mut dyn fmt::Write)
where
    B: Behavior + ?Sized,
{
    let core = behavior.core();
    if core.wants(MessageMask::ID) {
        let mark = if core.is_enabled() { '+' } else { '-' };
        writeln!(console, "{}{}", mark, core.name()).ok();
    }
    behavior.handle_control_event(token, console);
}

/// Deliver a command, handling the common sub-commands first
pub fn dispatch_command<B>(behavior: &mut B, args: &CommandArgs, console: &mut dyn fmt::Write)
where
    B: Behavior + ?Sized,
{
    match args.subcommand() {
        Some(b'?') => {
            print_help(behavior, console).ok();
        }
        Some(sub @ (b'0' | b'1')) => {
            let core = behavior.core_mut();
            if core.can_be_disabled() {
                let enabled = sub == b'1';
                core.set_enabled(enabled);
                if core.wants(MessageMask::RESPONSES) {
                    let state = if enabled { "enabled" } else { "disabled" };
                    writeln!(console, "{} {}.", core.name(), state).ok();
                }
            }
        }
        Some(b'Q') => {
            print_state(behavior, console).ok();
        }
        Some(b'V') => {
            let bits = MessageMask::from_bits_retain(args.int(0) as u16);
            let core = behavior.core_mut();
            let mask = match args.modifier() {
                Some(b'+') => core.verbosity() | bits,
                Some(b'-') => core.verbosity() - bits,
                _ => bits,
            };
            core.set_verbosity(mask);
            writeln!(console, "{} message mask:\t0x{:X}", core.name(), mask.bits()).ok();
        }
        _ => behavior.handle_command_event(args, console),
    }
}

/// Name, enablement, verbosity, then behavior-specific parameters
pub fn print_state<B>(behavior: &B, console: &mut dyn fmt::Write) -> fmt::Result
where
    B: Behavior + ?Sized,
{
    let core = behavior.core();
    writeln!(
        console,
        "{}: {}, verbosity = 0x{:X}",
        core.name(),
        if core.is_enabled() { "Enabled" } else { "Disabled" },
        core.verbosity().bits()
    )?;
    behavior.print_parameters(console)
}

fn print_help<B>(behavior: &B, console: &mut dyn fmt::Write) -> fmt::Result
where
    B: Behavior + ?Sized,
{
    let core = behavior.core();
    write!(console, "\n========\n")?;
    print_state(behavior, console)?;
    write!(console, "\n- - -\n\n{} options:\n\n", core.name())?;
    if core.can_be_disabled() {
        writeln!(console, "  0: Disable")?;
        writeln!(console, "  1: Enable")?;
    }
    writeln!(console, "  Q: Query Parameter Values")?;
    writeln!(console, "  V[+|-] <mask> : Set verbosity mask, or add/remove bits")?;
    writeln!(console, "{}", behavior.help())
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::String;

    struct Sample {
        core: BehaviorCore,
        ticks: u32,
        last_sub: Option<u8>,
    }

    impl Sample {
        fn new(core: BehaviorCore) -> Self {
            Self {
                core,
                ticks: 0,
                last_sub: None,
            }
        }
    }

    impl Behavior for Sample {
        fn core(&self) -> &BehaviorCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut BehaviorCore {
            &mut self.core
        }

        fn handle_control_event(&mut self, _token: &mut ArbitrationToken, _console: &mut dyn fmt::Write) {
            self.ticks += 1;
        }

        fn handle_command_event(&mut self, args: &CommandArgs, _console: &mut dyn fmt::Write) {
            self.last_sub = args.subcommand();
        }

        fn help(&self) -> &'static str {
            "  G <l> <r>: Go"
        }
    }

    #[test]
    fn test_disable_and_enable() {
        let mut sample = Sample::new(BehaviorCore::new("Sample"));
        let mut console: String<256> = String::new();
        dispatch_command(&mut sample, &CommandArgs::parse("P0"), &mut console);
        assert!(!sample.core().is_enabled());
        assert!(console.contains("Sample disabled."));
        dispatch_command(&mut sample, &CommandArgs::parse("P1"), &mut console);
        assert!(sample.core().is_enabled());
        assert_eq!(sample.last_sub, None);
    }

    #[test]
    fn test_fixed_behavior_cannot_be_disabled() {
        let mut sample = Sample::new(BehaviorCore::fixed("Fixed"));
        let mut console: String<512> = String::new();
        dispatch_command(&mut sample, &CommandArgs::parse("P0"), &mut console);
        assert!(sample.core().is_enabled());
        dispatch_command(&mut sample, &CommandArgs::parse("P?"), &mut console);
        assert!(!console.contains("0: Disable"));
    }

    #[test]
    fn test_verbosity_set_add_remove() {
        let mut sample = Sample::new(BehaviorCore::new("Sample"));
        let mut console: String<256> = String::new();

        dispatch_command(&mut sample, &CommandArgs::parse("PV 6"), &mut console);
        assert_eq!(sample.core().verbosity().bits(), 6);
        dispatch_command(&mut sample, &CommandArgs::parse("PV+ 9"), &mut console);
        assert_eq!(sample.core().verbosity().bits(), 15);
        dispatch_command(&mut sample, &CommandArgs::parse("PV- 2"), &mut console);
        assert_eq!(sample.core().verbosity().bits(), 13);
        assert!(console.ends_with("Sample message mask:\t0xD\n"));
    }

    #[test]
    fn test_query_prints_state_and_parameters() {
        let sample = Sample::new(BehaviorCore::new("Sample"));
        let mut console: String<256> = String::new();
        print_state(&sample, &mut console).unwrap();
        assert_eq!(
            console.as_str(),
            "Sample: Enabled, verbosity = 0x1\n No parameter query defined for Sample\n"
        );
    }

    #[test]
    fn test_help_lists_common_and_specific_options() {
        let mut sample = Sample::new(BehaviorCore::new("Sample"));
        let mut console: String<512> = String::new();
        dispatch_command(&mut sample, &CommandArgs::help_request(b'P'), &mut console);
        assert!(console.contains("Sample options:"));
        assert!(console.contains("  0: Disable"));
        assert!(console.contains("  Q: Query Parameter Values"));
        assert!(console.contains("  G <l> <r>: Go"));
        assert_eq!(sample.last_sub, None);
    }

    #[test]
    fn test_unknown_subcommand_reaches_handler() {
        let mut sample = Sample::new(BehaviorCore::new("Sample"));
        let mut console: String<64> = String::new();
        dispatch_command(&mut sample, &CommandArgs::parse("PG 1 2"), &mut console);
        assert_eq!(sample.last_sub, Some(b'G'));
    }

    #[test]
    fn test_id_trace_on_control() {
        let mut sample = Sample::new(BehaviorCore::new("Sample"));
        sample.core_mut().set_verbosity(MessageMask::ID);
        sample.core_mut().set_enabled(false);
        let mut token = ArbitrationToken::new(10);
        let mut console: String<64> = String::new();
        dispatch_control(&mut sample, &mut token, &mut console);
        assert_eq!(console.as_str(), "-Sample\n");
        assert_eq!(sample.ticks, 1);
    }
}
