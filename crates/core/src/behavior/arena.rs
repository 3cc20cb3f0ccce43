//! Fixed-capacity arena of behaviors with per-chain successor links

use core::fmt;

use heapless::Vec;

use super::{dispatch_command, dispatch_control, Behavior};
use crate::arbitration::ArbitrationToken;
use crate::bus::{EventNotification, SubscriberArena, SubscriberId};
use crate::command::CommandArgs;

/// Errors from arena construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArenaError {
    /// No free slot left
    Full,
    /// Identity does not name a slot in this arena
    UnknownSubscriber,
}

impl fmt::Display for ArenaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArenaError::Full => write!(f, "behavior arena full"),
            ArenaError::UnknownSubscriber => write!(f, "unknown subscriber"),
        }
    }
}

struct Slot<'a> {
    behavior: &'a mut dyn Behavior,
    next_control: Option<SubscriberId>,
    next_command: Option<SubscriberId>,
}

/// Behaviors borrowed for the lifetime of a controller
///
/// Each slot keeps one successor for the control chain and one for its
/// command letter. Both are filled in once during wiring.
pub struct BehaviorArena<'a, const N: usize> {
    slots: Vec<Slot<'a>, N>,
}

impl<'a, const N: usize> BehaviorArena<'a, N> {
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Store `behavior` and bind it to its new identity
    pub fn insert(&mut self, behavior: &'a mut dyn Behavior) -> Result<SubscriberId, ArenaError> {
        let index = self.slots.len();
        if index >= N || index >= SubscriberId::MAX_SLOTS {
            return Err(ArenaError::Full);
        }
        let id = SubscriberId::new(index as u8);
        behavior.core_mut().bind(id);
        self.slots
            .push(Slot {
                behavior,
                next_control: None,
                next_command: None,
            })
            .map_err(|_| ArenaError::Full)?;
        Ok(id)
    }

    /// Set the control-chain successor of `id`
    pub fn link_control(
        &mut self,
        id: SubscriberId,
        next: Option<SubscriberId>,
    ) -> Result<(), ArenaError> {
        let slot = self
            .slots
            .get_mut(id.index())
            .ok_or(ArenaError::UnknownSubscriber)?;
        slot.next_control = next;
        Ok(())
    }

    /// Set the command successor of `id`
    pub fn link_command(
        &mut self,
        id: SubscriberId,
        next: Option<SubscriberId>,
    ) -> Result<(), ArenaError> {
        let slot = self
            .slots
            .get_mut(id.index())
            .ok_or(ArenaError::UnknownSubscriber)?;
        slot.next_command = next;
        Ok(())
    }

    pub fn get(&self, id: SubscriberId) -> Option<&dyn Behavior> {
        self.slots.get(id.index()).map(|slot| &*slot.behavior)
    }

    pub fn get_mut(&mut self, id: SubscriberId) -> Option<&mut (dyn Behavior + 'a)> {
        self.slots
            .get_mut(id.index())
            .map(|slot| &mut *slot.behavior)
    }

    pub fn next_control(&self, id: SubscriberId) -> Option<SubscriberId> {
        self.slots.get(id.index()).and_then(|slot| slot.next_control)
    }

    pub fn next_command(&self, id: SubscriberId) -> Option<SubscriberId> {
        self.slots.get(id.index()).and_then(|slot| slot.next_command)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<const N: usize> Default for BehaviorArena<'_, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> SubscriberArena<ArbitrationToken> for BehaviorArena<'_, N> {
    fn notify(
        &mut self,
        id: SubscriberId,
        event: &mut EventNotification<'_, ArbitrationToken>,
    ) -> Option<SubscriberId> {
        let slot = self.slots.get_mut(id.index())?;
        let (token, console) = event.parts();
        dispatch_control(&mut *slot.behavior, token, console);
        slot.next_control
    }

    fn subscriber_name(&self, id: SubscriberId) -> Option<&str> {
        self.get(id).map(|behavior| behavior.core().name())
    }
}

impl<const N: usize> SubscriberArena<CommandArgs> for BehaviorArena<'_, N> {
    fn notify(
        &mut self,
        id: SubscriberId,
        event: &mut EventNotification<'_, CommandArgs>,
    ) -> Option<SubscriberId> {
        let slot = self.slots.get_mut(id.index())?;
        let (args, console) = event.parts();
        dispatch_command(&mut *slot.behavior, args, console);
        slot.next_command
    }

    fn subscriber_name(&self, id: SubscriberId) -> Option<&str> {
        self.get(id).map(|behavior| behavior.core().name())
    }
}
