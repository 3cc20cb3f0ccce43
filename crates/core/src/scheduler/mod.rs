//! Fixed-interval tick scheduler
//!
//! The scheduler owns the [`ArbitrationToken`] and the head of the control
//! chain. Each time [`Scheduler::poll`] finds the deadline reached it
//! prepares the token and publishes it once through the chain, visiting
//! every behavior in priority order.
//!
//! Deadlines advance by exactly one interval per tick. After a stall the
//! scheduler catches up one tick per poll instead of skipping ticks.
//!
//! The scheduler starts inhibited: until a `DG` command arrives it zeroes
//! the throttles and claims the token itself every tick, so no behavior
//! can drive the motors.
//!
//! # Example
//!
//! ```
//! use subsumption_core::behavior::BehaviorArena;
//! use subsumption_core::scheduler::Scheduler;
//!
//! let mut arena: BehaviorArena<'_, 4> = BehaviorArena::new();
//! let mut scheduler = Scheduler::new(50, 0);
//! let mut console = heapless::String::<64>::new();
//!
//! assert!(!scheduler.poll(49, &mut arena, &mut console));
//! assert!(scheduler.poll(50, &mut arena, &mut console));
//! assert_eq!(scheduler.ticks(), 1);
//! ```

use core::fmt;

use crate::arbitration::{ArbitrationToken, CsvPhase};
use crate::behavior::{Behavior, BehaviorCore, MessageMask};
use crate::bus::{EventNotification, EventTag, Publisher, PublisherId, SubscriberArena, SubscriberId};
use crate::command::CommandArgs;

/// Publisher identity carried by control notifications
pub const SCHEDULER_PUBLISHER: PublisherId = PublisherId::new(0);

/// The single event of the control chain
pub const CONTROL_EVENT: EventTag = 0;

/// Hook toggled around each chain traversal
///
/// On hardware this is typically an LED, giving a visual measure of how
/// long a tick takes.
pub trait ActivityIndicator {
    fn set_active(&mut self, active: bool);
}

/// Indicator that does nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIndicator;

impl ActivityIndicator for NoIndicator {
    fn set_active(&mut self, _active: bool) {}
}

/// Tick driver and owner of the arbitration token
#[derive(Debug)]
pub struct Scheduler {
    core: BehaviorCore,
    chain: Publisher,
    interval_ms: u32,
    deadline_ms: u64,
    inhibited: bool,
    token: ArbitrationToken,
    ticks: u32,
}

impl Scheduler {
    /// Create an inhibited scheduler whose first tick is due one interval
    /// after `now_ms`
    pub fn new(interval_ms: u32, now_ms: u64) -> Self {
        let interval_ms = interval_ms.max(1);
        let mut core = BehaviorCore::fixed("Director");
        core.bind(SubscriberId::SCHEDULER);
        Self {
            core,
            chain: Publisher::new(),
            interval_ms,
            deadline_ms: now_ms + u64::from(interval_ms),
            inhibited: true,
            token: ArbitrationToken::new(interval_ms),
            ticks: 0,
        }
    }

    /// Prepend `subscriber` to the control chain
    ///
    /// Returns the previous head, which becomes the subscriber's control
    /// successor.
    pub fn subscribe(&mut self, subscriber: SubscriberId) -> Option<SubscriberId> {
        self.chain.subscribe(subscriber, CONTROL_EVENT)
    }

    /// Run one tick if the deadline has been reached
    pub fn poll<A>(&mut self, now_ms: u64, arena: &mut A, console: &mut dyn fmt::Write) -> bool
    where
        A: SubscriberArena<ArbitrationToken> + ?Sized,
    {
        self.poll_with(now_ms, arena, console, &mut NoIndicator)
    }

    /// [`poll`](Self::poll) with an activity indicator lit during the tick
    pub fn poll_with<A>(
        &mut self,
        now_ms: u64,
        arena: &mut A,
        console: &mut dyn fmt::Write,
        indicator: &mut dyn ActivityIndicator,
    ) -> bool
    where
        A: SubscriberArena<ArbitrationToken> + ?Sized,
    {
        if now_ms < self.deadline_ms {
            return false;
        }

        indicator.set_active(true);
        self.deadline_ms += u64::from(self.interval_ms);

        if self.inhibited {
            self.token.force(self.core.claim_tag(), 0, 0);
        } else {
            self.token.release();
        }
        self.token.set_interval_ms(self.interval_ms);

        let mut event = EventNotification::new(
            SCHEDULER_PUBLISHER,
            CONTROL_EVENT,
            &mut self.token,
            &mut *console,
        );
        self.chain.publish(arena, &mut event);

        if self.token.is_logging() {
            writeln!(console).ok();
            if self.token.csv_phase() == CsvPhase::Headings {
                self.token.set_csv_phase(CsvPhase::Data);
            }
        }

        self.ticks = self.ticks.wrapping_add(1);
        indicator.set_active(false);
        true
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Change the tick interval, clamped to at least 1 ms
    ///
    /// The pending deadline is kept; the new interval applies from the
    /// next tick on.
    pub fn set_interval_ms(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms.max(1);
    }

    /// Time of the next tick
    pub fn deadline_ms(&self) -> u64 {
        self.deadline_ms
    }

    pub fn is_inhibited(&self) -> bool {
        self.inhibited
    }

    pub fn set_inhibited(&mut self, inhibited: bool) {
        self.inhibited = inhibited;
    }

    /// Token as left by the last tick
    pub fn token(&self) -> &ArbitrationToken {
        &self.token
    }

    pub fn token_mut(&mut self) -> &mut ArbitrationToken {
        &mut self.token
    }

    /// Number of ticks run so far
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    pub fn head(&self) -> Option<SubscriberId> {
        self.chain.head()
    }
}

impl Behavior for Scheduler {
    fn core(&self) -> &BehaviorCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut BehaviorCore {
        &mut self.core
    }

    fn handle_control_event(&mut self, _token: &mut ArbitrationToken, _console: &mut dyn fmt::Write) {}

    fn handle_command_event(&mut self, args: &CommandArgs, console: &mut dyn fmt::Write) {
        let respond = self.core.wants(MessageMask::RESPONSES);
        match args.subcommand() {
            Some(b'I') => {
                self.set_interval_ms(args.int(0).max(1) as u32);
                if respond {
                    writeln!(console, "Subsumption Interval milliseconds = {}", self.interval_ms).ok();
                }
            }
            Some(b'S') => {
                self.inhibited = true;
                if respond {
                    writeln!(console, "Director Stopped").ok();
                }
            }
            Some(b'G') => {
                self.inhibited = false;
                if respond {
                    writeln!(console, "Director Started").ok();
                }
            }
            Some(b'L') => {
                self.token.set_csv_phase(CsvPhase::Headings);
            }
            Some(b'E') => {
                self.token.set_csv_phase(CsvPhase::Idle);
            }
            _ => {}
        }
    }

    fn help(&self) -> &'static str {
        "  I <ms>: Set interval ms\n  G: Go\n  S: Stop\n  L: Begin CSV logging\n  E: End CSV logging"
    }

    fn print_parameters(&self, console: &mut dyn fmt::Write) -> fmt::Result {
        writeln!(
            console,
            "  Interval = {} ms, {}, ticks = {}",
            self.interval_ms,
            if self.inhibited { "stopped" } else { "running" },
            self.ticks
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitration::Claim;
    use crate::behavior::{dispatch_command, BehaviorArena};
    use heapless::{String, Vec};

    /// Reads the token like a terminal driver
    struct Driver {
        core: BehaviorCore,
        seen: Vec<((i32, i32), Option<Claim>), 8>,
    }

    impl Driver {
        fn new() -> Self {
            Self {
                core: BehaviorCore::new("Driver"),
                seen: Vec::new(),
            }
        }
    }

    impl Behavior for Driver {
        fn core(&self) -> &BehaviorCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut BehaviorCore {
            &mut self.core
        }

        fn handle_control_event(&mut self, token: &mut ArbitrationToken, console: &mut dyn fmt::Write) {
            token.csv_field(console, "L", token.left()).ok();
            self.seen.push((token.throttles(), token.claimant())).ok();
        }

        fn handle_command_event(&mut self, _args: &CommandArgs, _console: &mut dyn fmt::Write) {}
    }

    struct Blinker {
        toggles: u32,
        active: bool,
    }

    impl ActivityIndicator for Blinker {
        fn set_active(&mut self, active: bool) {
            self.active = active;
            self.toggles += 1;
        }
    }

    fn command(scheduler: &mut Scheduler, line: &str, console: &mut dyn fmt::Write) {
        dispatch_command(scheduler, &CommandArgs::parse(line), console);
    }

    #[test]
    fn test_no_tick_before_deadline() {
        let mut arena: BehaviorArena<'_, 2> = BehaviorArena::new();
        let mut scheduler = Scheduler::new(20, 100);
        let mut console: String<64> = String::new();
        assert!(!scheduler.poll(119, &mut arena, &mut console));
        assert!(scheduler.poll(120, &mut arena, &mut console));
        assert_eq!(scheduler.deadline_ms(), 140);
    }

    #[test]
    fn test_catch_up_one_tick_per_poll() {
        let mut arena: BehaviorArena<'_, 2> = BehaviorArena::new();
        let mut scheduler = Scheduler::new(10, 0);
        let mut console: String<64> = String::new();
        assert!(scheduler.poll(35, &mut arena, &mut console));
        assert!(scheduler.poll(35, &mut arena, &mut console));
        assert!(scheduler.poll(35, &mut arena, &mut console));
        assert!(!scheduler.poll(35, &mut arena, &mut console));
        assert_eq!(scheduler.ticks(), 3);
    }

    #[test]
    fn test_inhibited_tick_claims_zero() {
        let mut driver = Driver::new();
        let mut arena: BehaviorArena<'_, 2> = BehaviorArena::new();
        let mut scheduler = Scheduler::new(10, 0);
        let id = arena.insert(&mut driver).unwrap();
        let next = scheduler.subscribe(id);
        arena.link_control(id, next).unwrap();

        let mut console: String<64> = String::new();
        scheduler.token_mut().set_throttles(40, 40);
        scheduler.poll(10, &mut arena, &mut console);
        drop(arena);

        let (throttles, claimant) = driver.seen[0];
        assert_eq!(throttles, (0, 0));
        assert_eq!(claimant.map(|c| c.id), Some(SubscriberId::SCHEDULER));
    }

    #[test]
    fn test_unclaimed_tick_keeps_reset_pair() {
        let mut driver = Driver::new();
        let mut arena: BehaviorArena<'_, 2> = BehaviorArena::new();
        let mut scheduler = Scheduler::new(10, 0);
        let id = arena.insert(&mut driver).unwrap();
        let next = scheduler.subscribe(id);
        arena.link_control(id, next).unwrap();

        let mut console: String<64> = String::new();
        scheduler.poll(10, &mut arena, &mut console);
        command(&mut scheduler, "DG", &mut console);
        assert!(console.contains("Director Started"));
        scheduler.poll(20, &mut arena, &mut console);
        drop(arena);

        assert_eq!(driver.seen[1], ((0, 0), None));
    }

    #[test]
    fn test_interval_command() {
        let mut arena: BehaviorArena<'_, 2> = BehaviorArena::new();
        let mut scheduler = Scheduler::new(10, 0);
        let mut console: String<128> = String::new();
        command(&mut scheduler, "DI 25", &mut console);
        assert_eq!(scheduler.interval_ms(), 25);
        assert_eq!(scheduler.token().interval_ms(), 10);
        scheduler.poll(10, &mut arena, &mut console);
        assert_eq!(scheduler.deadline_ms(), 35);
        assert_eq!(scheduler.token().interval_ms(), 25);

        command(&mut scheduler, "DI 0", &mut console);
        assert_eq!(scheduler.interval_ms(), 1);
    }

    #[test]
    fn test_stop_and_cannot_disable() {
        let mut scheduler = Scheduler::new(10, 0);
        let mut console: String<128> = String::new();
        command(&mut scheduler, "DG", &mut console);
        command(&mut scheduler, "DS", &mut console);
        assert!(scheduler.is_inhibited());
        command(&mut scheduler, "D0", &mut console);
        assert!(scheduler.core().is_enabled());
    }

    #[test]
    fn test_csv_headings_then_data() {
        let mut driver = Driver::new();
        let mut arena: BehaviorArena<'_, 2> = BehaviorArena::new();
        let mut scheduler = Scheduler::new(10, 0);
        let id = arena.insert(&mut driver).unwrap();
        let next = scheduler.subscribe(id);
        arena.link_control(id, next).unwrap();

        let mut console: String<64> = String::new();
        command(&mut scheduler, "DL", &mut console);
        scheduler.poll(10, &mut arena, &mut console);
        assert_eq!(console.as_str(), "L\t\n");
        scheduler.poll(20, &mut arena, &mut console);
        assert_eq!(console.as_str(), "L\t\n0\t\n");

        command(&mut scheduler, "DE", &mut console);
        scheduler.poll(30, &mut arena, &mut console);
        assert_eq!(console.as_str(), "L\t\n0\t\n");
    }

    #[test]
    fn test_indicator_toggled_around_tick() {
        let mut arena: BehaviorArena<'_, 2> = BehaviorArena::new();
        let mut scheduler = Scheduler::new(10, 0);
        let mut console: String<16> = String::new();
        let mut blinker = Blinker {
            toggles: 0,
            active: false,
        };
        scheduler.poll_with(5, &mut arena, &mut console, &mut blinker);
        assert_eq!(blinker.toggles, 0);
        scheduler.poll_with(10, &mut arena, &mut console, &mut blinker);
        assert_eq!(blinker.toggles, 2);
        assert!(!blinker.active);
    }
}
