//! Router, scheduler and behavior arena bundled into one control loop
//!
//! [`Controller`] owns the wiring: attaching a behavior inserts it into the
//! arena, prepends it to the control chain and subscribes it to its verb
//! letter. The scheduler answers the `D` verb itself.
//!
//! Attach behaviors lowest priority first. The behavior attached last is
//! visited first on every tick.
//!
//! # Example
//!
//! ```
//! use core::fmt;
//! use subsumption_core::arbitration::ArbitrationToken;
//! use subsumption_core::behavior::{Behavior, BehaviorCore};
//! use subsumption_core::command::CommandArgs;
//! use subsumption_core::controller::Controller;
//!
//! struct Idle {
//!     core: BehaviorCore,
//! }
//!
//! impl Behavior for Idle {
//!     fn core(&self) -> &BehaviorCore { &self.core }
//!     fn core_mut(&mut self) -> &mut BehaviorCore { &mut self.core }
//!     fn handle_control_event(&mut self, _: &mut ArbitrationToken, _: &mut dyn fmt::Write) {}
//!     fn handle_command_event(&mut self, _: &CommandArgs, _: &mut dyn fmt::Write) {}
//! }
//!
//! let mut idle = Idle { core: BehaviorCore::new("Idle") };
//! let mut controller: Controller<'_, 4> = Controller::new(20, 0);
//! controller.attach(&mut idle, b'I').unwrap();
//!
//! let mut console = heapless::String::<256>::new();
//! controller.feed_str("DG\r", &mut console);
//! assert!(!controller.scheduler().is_inhibited());
//! assert!(controller.poll(20, &mut console));
//! ```

use core::fmt;

use crate::arbitration::ArbitrationToken;
use crate::behavior::{dispatch_command, ArenaError, Behavior, BehaviorArena};
use crate::bus::{EventNotification, SubscriberArena, SubscriberId};
use crate::command::{CommandArgs, CommandRouter};
use crate::scheduler::{ActivityIndicator, Scheduler};
use crate::traits::TimeSource;

/// Verb letter answered by the scheduler
pub const SCHEDULER_LETTER: u8 = b'D';

/// A complete subsumption controller over at most `N` behaviors
pub struct Controller<'a, const N: usize> {
    router: CommandRouter,
    scheduler: Scheduler,
    arena: BehaviorArena<'a, N>,
}

impl<'a, const N: usize> Controller<'a, N> {
    /// Create a controller whose first tick is due at `now_ms + interval_ms`
    pub fn new(interval_ms: u32, now_ms: u64) -> Self {
        let mut router = CommandRouter::new();
        router.register(SubscriberId::SCHEDULER, SCHEDULER_LETTER);
        Self {
            router,
            scheduler: Scheduler::new(interval_ms, now_ms),
            arena: BehaviorArena::new(),
        }
    }

    /// Add a behavior to the control chain and to verb `letter`
    ///
    /// The new behavior has priority over every behavior attached before it.
    pub fn attach(
        &mut self,
        behavior: &'a mut dyn Behavior,
        letter: u8,
    ) -> Result<SubscriberId, ArenaError> {
        let id = self.attach_commands(behavior, letter)?;
        let next = self.scheduler.subscribe(id);
        self.arena.link_control(id, next)?;
        Ok(id)
    }

    /// Add a behavior that only answers verb `letter` and never ticks
    pub fn attach_commands(
        &mut self,
        behavior: &'a mut dyn Behavior,
        letter: u8,
    ) -> Result<SubscriberId, ArenaError> {
        let id = self.arena.insert(behavior)?;
        let previous = self.router.register(id, letter);
        self.arena.link_command(id, previous)?;
        Ok(id)
    }

    /// Accept one console symbol
    pub fn feed(&mut self, symbol: u8, console: &mut dyn fmt::Write) -> bool {
        let mut participants = Participants {
            scheduler: &mut self.scheduler,
            arena: &mut self.arena,
        };
        self.router.feed(symbol, &mut participants, console)
    }

    /// Feed every byte of `input`, returning the number of lines dispatched
    pub fn feed_str(&mut self, input: &str, console: &mut dyn fmt::Write) -> usize {
        input
            .bytes()
            .filter(|&symbol| self.feed(symbol, console))
            .count()
    }

    /// Run one tick if it is due
    pub fn poll(&mut self, now_ms: u64, console: &mut dyn fmt::Write) -> bool {
        self.scheduler.poll(now_ms, &mut self.arena, console)
    }

    /// [`poll`](Self::poll) with an activity indicator
    pub fn poll_with(
        &mut self,
        now_ms: u64,
        console: &mut dyn fmt::Write,
        indicator: &mut dyn ActivityIndicator,
    ) -> bool {
        self.scheduler
            .poll_with(now_ms, &mut self.arena, console, indicator)
    }

    /// [`poll`](Self::poll) reading the clock from `time`
    pub fn poll_time<T: TimeSource>(&mut self, time: &T, console: &mut dyn fmt::Write) -> bool {
        self.poll(time.now_ms(), console)
    }

    pub fn router(&self) -> &CommandRouter {
        &self.router
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler {
        &mut self.scheduler
    }

    /// Token as left by the last tick
    pub fn token(&self) -> &ArbitrationToken {
        self.scheduler.token()
    }

    pub fn arena(&self) -> &BehaviorArena<'a, N> {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut BehaviorArena<'a, N> {
        &mut self.arena
    }
}

/// Command targets: the arena plus the scheduler under its reserved id
struct Participants<'s, 'a, const N: usize> {
    scheduler: &'s mut Scheduler,
    arena: &'s mut BehaviorArena<'a, N>,
}

impl<const N: usize> SubscriberArena<CommandArgs> for Participants<'_, '_, N> {
    fn notify(
        &mut self,
        id: SubscriberId,
        event: &mut EventNotification<'_, CommandArgs>,
    ) -> Option<SubscriberId> {
        if id == SubscriberId::SCHEDULER {
            let (args, console) = event.parts();
            dispatch_command(&mut *self.scheduler, args, console);
            return None;
        }
        SubscriberArena::<CommandArgs>::notify(&mut *self.arena, id, event)
    }

    fn subscriber_name(&self, id: SubscriberId) -> Option<&str> {
        if id == SubscriberId::SCHEDULER {
            return Some(self.scheduler.core().name());
        }
        SubscriberArena::<CommandArgs>::subscriber_name(&*self.arena, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::{BehaviorCore, MessageMask};
    use crate::traits::MockTime;
    use core::cell::RefCell;
    use heapless::{String, Vec};

    type Log = RefCell<Vec<(&'static str, u8), 32>>;

    /// Records visits and claims when asked to
    struct Layer<'l> {
        core: BehaviorCore,
        log: &'l Log,
        claim: Option<(i32, i32)>,
        claimed: bool,
    }

    impl<'l> Layer<'l> {
        fn new(name: &'static str, log: &'l Log, claim: Option<(i32, i32)>) -> Self {
            Self {
                core: BehaviorCore::new(name),
                log,
                claim,
                claimed: false,
            }
        }
    }

    impl Behavior for Layer<'_> {
        fn core(&self) -> &BehaviorCore {
            &self.core
        }

        fn core_mut(&mut self) -> &mut BehaviorCore {
            &mut self.core
        }

        fn handle_control_event(&mut self, token: &mut ArbitrationToken, _console: &mut dyn fmt::Write) {
            self.log.borrow_mut().push((self.core.name(), 0)).ok();
            if let Some((left, right)) = self.claim {
                if self.core.is_enabled() && !token.is_claimed() {
                    self.claimed = token.claim(self.core.claim_tag(), left, right);
                } else {
                    self.claimed = false;
                }
            }
        }

        fn handle_command_event(&mut self, args: &CommandArgs, _console: &mut dyn fmt::Write) {
            self.log
                .borrow_mut()
                .push((self.core.name(), args.subcommand().unwrap_or(0)))
                .ok();
        }
    }

    #[test]
    fn test_tick_visits_in_reverse_attach_order() {
        let log = Log::default();
        let mut a = Layer::new("A", &log, None);
        let mut b = Layer::new("B", &log, None);
        let mut c = Layer::new("C", &log, None);
        let mut controller: Controller<'_, 4> = Controller::new(10, 0);
        controller.attach(&mut a, b'A').unwrap();
        controller.attach(&mut b, b'B').unwrap();
        controller.attach(&mut c, b'C').unwrap();

        let mut console: String<64> = String::new();
        assert!(controller.poll(10, &mut console));
        let order: Vec<&str, 4> = log.borrow().iter().map(|(n, _)| *n).collect();
        assert_eq!(&order[..], &["C", "B", "A"]);
    }

    #[test]
    fn test_higher_priority_claim_subsumes_lower() {
        let log = Log::default();
        let mut low = Layer::new("Low", &log, Some((100, 100)));
        let mut high = Layer::new("High", &log, Some((-30, 30)));
        let mut controller: Controller<'_, 4> = Controller::new(10, 0);
        controller.attach(&mut low, b'L').unwrap();
        controller.attach(&mut high, b'H').unwrap();

        let mut console: String<256> = String::new();
        controller.feed_str("DG\r", &mut console);
        controller.poll(10, &mut console);
        assert_eq!(controller.token().throttles(), (-30, 30));
        assert_eq!(controller.token().claimant().map(|c| c.name), Some("High"));

        controller.feed_str("H0\r", &mut console);
        controller.poll(20, &mut console);
        assert_eq!(controller.token().throttles(), (100, 100));
        assert_eq!(controller.token().claimant().map(|c| c.name), Some("Low"));
        drop(controller);
        assert!(low.claimed);
        assert!(!high.claimed);
    }

    #[test]
    fn test_scheduler_answers_its_letter() {
        let mut controller: Controller<'_, 2> = Controller::new(10, 0);
        let mut console: String<256> = String::new();
        assert_eq!(controller.feed_str("DI 40\rDG\r", &mut console), 2);
        assert_eq!(controller.scheduler().interval_ms(), 40);
        assert!(!controller.scheduler().is_inhibited());

        console.clear();
        controller.feed_str("?\r", &mut console);
        assert!(console.contains("  D - Director\n"));
    }

    #[test]
    fn test_broadcast_reaches_every_letter() {
        let log = Log::default();
        let mut w = Layer::new("W", &log, None);
        let mut b = Layer::new("B", &log, None);
        let mut controller: Controller<'_, 4> = Controller::new(10, 0);
        controller.attach(&mut w, b'W').unwrap();
        controller.attach_commands(&mut b, b'B').unwrap();

        let mut console: String<512> = String::new();
        controller.feed_str("*Q\r", &mut console);
        let position = |name: &str| console.find(name).unwrap();
        assert!(position("B: Enabled") < position("Director: Enabled"));
        assert!(position("Director: Enabled") < position("W: Enabled"));

        controller.feed_str("*Z\r", &mut console);
        let got: Vec<(&str, u8), 4> = log.borrow().iter().copied().collect();
        assert_eq!(&got[..], &[("B", b'Z'), ("W", b'Z')]);
    }

    #[test]
    fn test_command_only_behavior_never_ticks() {
        let log = Log::default();
        let mut b = Layer::new("B", &log, None);
        let mut controller: Controller<'_, 2> = Controller::new(10, 0);
        controller.attach_commands(&mut b, b'B').unwrap();
        let mut console: String<64> = String::new();
        controller.poll(10, &mut console);
        assert!(log.borrow().is_empty());
        controller.feed_str("BX\r", &mut console);
        assert_eq!(&log.borrow()[..], &[("B", b'X')]);
    }

    #[test]
    fn test_menu_mode_equivalent_to_full_line() {
        let log = Log::default();
        let mut n = Layer::new("N", &log, None);
        let mut controller: Controller<'_, 2> = Controller::new(10, 0);
        controller.attach(&mut n, b'N').unwrap();
        let mut console: String<1024> = String::new();

        controller.feed_str("N\rS 1 2\r\rNS 1 2\r", &mut console);
        let got: Vec<(&str, u8), 4> = log.borrow().iter().copied().collect();
        assert_eq!(&got[..], &[("N", b'S'), ("N", b'S')]);
        assert_eq!(controller.router().menu_letter(), None);
    }

    #[test]
    fn test_id_trace_through_controller() {
        let log = Log::default();
        let mut a = Layer::new("A", &log, None);
        a.core_mut().set_verbosity(MessageMask::ID);
        let mut controller: Controller<'_, 2> = Controller::new(10, 0);
        controller.attach(&mut a, b'A').unwrap();
        let mut console: String<64> = String::new();
        let time = MockTime::new();
        time.set(10_000);
        assert!(controller.poll_time(&time, &mut console));
        assert_eq!(console.as_str(), "+A\n");
    }
}
