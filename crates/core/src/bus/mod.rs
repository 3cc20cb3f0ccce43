//! Publisher/subscriber chain primitives
//!
//! Subscribers live in an arena owned by the caller and are addressed by a
//! stable [`SubscriberId`]. A [`Publisher`] only remembers the head of its
//! chain; each subscriber keeps its own successor, which it receives from
//! [`Publisher::subscribe`] when it registers. Publishing walks the chain by
//! asking each subscriber which one comes next.
//!
//! Registration prepends, so the subscriber registered last is notified
//! first. Chains are built once at startup and never edited afterwards.
//!
//! # Example
//!
//! ```
//! use subsumption_core::bus::{
//!     EventNotification, Publisher, PublisherId, Subscriber, SubscriberId,
//! };
//!
//! struct Counter {
//!     next: Option<SubscriberId>,
//! }
//!
//! impl Subscriber<u32> for Counter {
//!     fn handle_event(&mut self, event: &mut EventNotification<'_, u32>) -> Option<SubscriberId> {
//!         *event.payload_mut() += 1;
//!         self.next
//!     }
//! }
//!
//! let mut chain = Publisher::new();
//! let mut subscribers = [Counter { next: None }, Counter { next: None }];
//! subscribers[0].next = chain.subscribe(SubscriberId::new(0), 0);
//! subscribers[1].next = chain.subscribe(SubscriberId::new(1), 0);
//!
//! let mut hits = 0u32;
//! let mut sink = heapless::String::<8>::new();
//! let mut event = EventNotification::new(PublisherId::new(0), 0, &mut hits, &mut sink);
//! chain.publish(&mut subscribers[..], &mut event);
//! assert_eq!(hits, 2);
//! ```

use core::fmt;

/// Tag addressing one event of a publisher
///
/// The scheduler publishes a single control event; the command router uses
/// the verb letter itself as the tag.
pub type EventTag = u8;

/// Stable index of a subscriber inside its arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriberId(u8);

impl SubscriberId {
    /// Reserved identity of the tick scheduler.
    ///
    /// The scheduler is not stored in a behavior arena but still claims the
    /// arbitration token and answers its own command letter.
    pub const SCHEDULER: SubscriberId = SubscriberId(u8::MAX);

    /// Identity carried by a subscriber that has not been placed in an arena.
    pub const UNBOUND: SubscriberId = SubscriberId(u8::MAX - 1);

    /// Largest number of arena slots addressable by a `SubscriberId`.
    pub const MAX_SLOTS: usize = (u8::MAX - 1) as usize;

    /// Create an identity from an arena index
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Arena index of this subscriber
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Identity of the publisher that produced a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublisherId(u8);

impl PublisherId {
    /// Create a publisher identity
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// Raw identity value
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Envelope handed to every subscriber along a chain
///
/// The envelope itself never changes during a traversal. The payload is
/// borrowed mutably so subscribers can update it in place, and the console
/// is the text sink for diagnostics and command responses.
pub struct EventNotification<'a, P: ?Sized> {
    source: PublisherId,
    tag: EventTag,
    payload: &'a mut P,
    console: &'a mut dyn fmt::Write,
}

impl<'a, P: ?Sized> EventNotification<'a, P> {
    /// Build a notification for one traversal
    pub fn new(
        source: PublisherId,
        tag: EventTag,
        payload: &'a mut P,
        console: &'a mut dyn fmt::Write,
    ) -> Self {
        Self {
            source,
            tag,
            payload,
            console,
        }
    }

    /// Publisher that produced this notification
    pub fn source(&self) -> PublisherId {
        self.source
    }

    /// Event tag within the publisher
    pub fn tag(&self) -> EventTag {
        self.tag
    }

    /// Shared view of the payload
    pub fn payload(&self) -> &P {
        &*self.payload
    }

    /// Mutable view of the payload
    pub fn payload_mut(&mut self) -> &mut P {
        &mut *self.payload
    }

    /// Text sink for diagnostics
    pub fn console(&mut self) -> &mut dyn fmt::Write {
        &mut *self.console
    }

    /// Borrow payload and console at the same time
    pub fn parts(&mut self) -> (&mut P, &mut dyn fmt::Write) {
        (&mut *self.payload, &mut *self.console)
    }
}

/// A chain participant that handles one kind of payload
///
/// The return value is the next subscriber to notify, normally the
/// successor stored at subscription time. Returning `None` ends the
/// traversal; there is no other way to stop it.
pub trait Subscriber<P: ?Sized> {
    /// Handle the notification and name the next subscriber
    fn handle_event(&mut self, event: &mut EventNotification<'_, P>) -> Option<SubscriberId>;
}

/// Index-addressed storage of subscribers
///
/// Publishing goes through this trait so that the arena, not the publisher,
/// owns the subscribers and their chain links.
pub trait SubscriberArena<P: ?Sized> {
    /// Deliver `event` to subscriber `id` and return its successor
    ///
    /// An identity the arena does not know ends the traversal.
    fn notify(
        &mut self,
        id: SubscriberId,
        event: &mut EventNotification<'_, P>,
    ) -> Option<SubscriberId>;

    /// Display name of a subscriber, used by help listings
    fn subscriber_name(&self, _id: SubscriberId) -> Option<&str> {
        None
    }
}

impl<P: ?Sized, S: Subscriber<P>> SubscriberArena<P> for [S] {
    fn notify(
        &mut self,
        id: SubscriberId,
        event: &mut EventNotification<'_, P>,
    ) -> Option<SubscriberId> {
        self.get_mut(id.index())
            .and_then(|subscriber| subscriber.handle_event(event))
    }
}

/// Head of a chain-of-responsibility subscription
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Publisher {
    head: Option<SubscriberId>,
}

impl Publisher {
    /// Create a publisher with an empty chain
    pub const fn new() -> Self {
        Self { head: None }
    }

    /// Register `subscriber` as the new head of the chain
    ///
    /// Returns the previous head, which the caller must store as the
    /// subscriber's successor. The tag is accepted but not interpreted; a
    /// chain publisher has a single event.
    pub fn subscribe(&mut self, subscriber: SubscriberId, _tag: EventTag) -> Option<SubscriberId> {
        self.head.replace(subscriber)
    }

    /// Current head of the chain
    pub fn head(&self) -> Option<SubscriberId> {
        self.head
    }

    /// Walk the whole chain with `event`
    pub fn publish<P, A>(&self, arena: &mut A, event: &mut EventNotification<'_, P>)
    where
        P: ?Sized,
        A: SubscriberArena<P> + ?Sized,
    {
        publish(arena, self.head, event);
    }
}

/// Walk a chain starting at `head`
///
/// Each subscriber names its successor; the walk ends at the first `None`.
/// Publishing on an empty chain does nothing.
pub fn publish<P, A>(arena: &mut A, head: Option<SubscriberId>, event: &mut EventNotification<'_, P>)
where
    P: ?Sized,
    A: SubscriberArena<P> + ?Sized,
{
    let mut current = head;
    while let Some(id) = current {
        current = arena.notify(id, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::fmt::Write;
    use heapless::{String, Vec};

    struct Recorder {
        id: u8,
        next: Option<SubscriberId>,
    }

    impl Subscriber<Vec<u8, 16>> for Recorder {
        fn handle_event(
            &mut self,
            event: &mut EventNotification<'_, Vec<u8, 16>>,
        ) -> Option<SubscriberId> {
            event.payload_mut().push(self.id).unwrap();
            self.next
        }
    }

    fn build_chain(count: u8) -> (Publisher, Vec<Recorder, 16>) {
        let mut chain = Publisher::new();
        let mut recorders = Vec::new();
        for id in 0..count {
            let next = chain.subscribe(SubscriberId::new(id), 0);
            recorders.push(Recorder { id, next }).ok().unwrap();
        }
        (chain, recorders)
    }

    #[test]
    fn test_traversal_is_reverse_of_subscription() {
        for count in 1..=8u8 {
            let (chain, mut recorders) = build_chain(count);
            let mut visited: Vec<u8, 16> = Vec::new();
            let mut sink: String<8> = String::new();
            let mut event = EventNotification::new(PublisherId::new(1), 0, &mut visited, &mut sink);
            chain.publish(&mut recorders[..], &mut event);

            let expected: Vec<u8, 16> = (0..count).rev().collect();
            assert_eq!(visited, expected);
        }
    }

    #[test]
    fn test_subscribe_returns_previous_head() {
        let mut chain = Publisher::new();
        assert_eq!(chain.subscribe(SubscriberId::new(3), 0), None);
        assert_eq!(
            chain.subscribe(SubscriberId::new(5), 0),
            Some(SubscriberId::new(3))
        );
        assert_eq!(chain.head(), Some(SubscriberId::new(5)));
    }

    #[test]
    fn test_publish_on_empty_chain_is_noop() {
        let chain = Publisher::new();
        let mut recorders: [Recorder; 0] = [];
        let mut visited: Vec<u8, 16> = Vec::new();
        let mut sink: String<8> = String::new();
        let mut event = EventNotification::new(PublisherId::new(1), 0, &mut visited, &mut sink);
        chain.publish(&mut recorders[..], &mut event);
        assert!(visited.is_empty());
    }

    #[test]
    fn test_unknown_successor_ends_traversal() {
        let mut recorders = [Recorder {
            id: 7,
            next: Some(SubscriberId::new(42)),
        }];
        let mut visited: Vec<u8, 16> = Vec::new();
        let mut sink: String<8> = String::new();
        let mut event = EventNotification::new(PublisherId::new(1), 0, &mut visited, &mut sink);
        publish(&mut recorders[..], Some(SubscriberId::new(0)), &mut event);
        assert_eq!(&visited[..], &[7]);
    }

    #[test]
    fn test_notification_envelope() {
        let mut payload = 10u32;
        let mut sink: String<16> = String::new();
        {
            let mut event =
                EventNotification::new(PublisherId::new(2), b'Q', &mut payload, &mut sink);
            assert_eq!(event.source(), PublisherId::new(2));
            assert_eq!(event.tag(), b'Q');
            let (value, console) = event.parts();
            *value += 1;
            console.write_str("ok").unwrap();
        }
        assert_eq!(payload, 11);
        assert_eq!(sink.as_str(), "ok");
    }
}
