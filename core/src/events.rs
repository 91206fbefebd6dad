use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    None,
    Boot,
    Playing,
    Completed,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A card started turning, towards the face when `face_up` is set.
    CardFlipStarted { index: CardIndex, face_up: bool },
    CardMatchResolved {
        first_index: CardIndex,
        second_index: CardIndex,
        pair_id: PairId,
    },
    CardMismatchResolved {
        first_index: CardIndex,
        second_index: CardIndex,
    },
    GameCompleted,
    PhaseChanged { from: GamePhase, to: GamePhase },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&GameEvent)>;

/// Publish/subscribe registry owned by a session.
///
/// Publishing only queues the event. Whoever owns the bus pulls events with
/// [`EventBus::next_pending`] and fans them out with [`EventBus::deliver`], so
/// an event published while another is being handled is delivered after the
/// current fan-out, never in the middle of it.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Handler)>,
    pending: VecDeque<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler`; handlers run in subscription order.
    pub fn subscribe<F>(&mut self, handler: F) -> SubscriptionId
    where
        F: FnMut(&GameEvent) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(handler)));
        log::trace!("subscribed {:?}", id);
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub_id, _)| *sub_id != id);
        let removed = self.subscribers.len() != before;
        if removed {
            log::trace!("unsubscribed {:?}", id);
        }
        removed
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn publish(&mut self, event: GameEvent) {
        log::trace!("publish {:?}", event);
        self.pending.push_back(event);
    }

    pub fn next_pending(&mut self) -> Option<GameEvent> {
        self.pending.pop_front()
    }

    /// Hands `event` to every subscriber, in subscription order.
    pub fn deliver(&mut self, event: &GameEvent) {
        for (_, handler) in self.subscribers.iter_mut() {
            handler(event);
        }
    }

    /// Drops every subscriber and every undelivered event.
    pub fn teardown(&mut self) {
        log::debug!(
            "Tearing down event bus ({} subscribers, {} pending)",
            self.subscribers.len(),
            self.pending.len()
        );
        self.subscribers.clear();
        self.pending.clear();
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .field("pending", &self.pending)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::rc::Rc;
    use core::cell::RefCell;

    type Log = Rc<RefCell<Vec<(u8, GameEvent)>>>;

    fn recorder(bus: &mut EventBus, tag: u8, log: &Log) -> SubscriptionId {
        let log = Rc::clone(log);
        bus.subscribe(move |event| log.borrow_mut().push((tag, *event)))
    }

    fn drain(bus: &mut EventBus) {
        while let Some(event) = bus.next_pending() {
            bus.deliver(&event);
        }
    }

    #[test]
    fn delivers_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        recorder(&mut bus, 1, &log);
        recorder(&mut bus, 2, &log);

        bus.publish(GameEvent::GameCompleted);
        drain(&mut bus);

        assert_eq!(
            *log.borrow(),
            [(1, GameEvent::GameCompleted), (2, GameEvent::GameCompleted)]
        );
    }

    #[test]
    fn publish_only_queues() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        recorder(&mut bus, 1, &log);

        bus.publish(GameEvent::CardFlipStarted {
            index: 0,
            face_up: true,
        });

        assert!(log.borrow().is_empty());
        assert_eq!(
            bus.next_pending(),
            Some(GameEvent::CardFlipStarted {
                index: 0,
                face_up: true
            })
        );
    }

    #[test]
    fn unsubscribed_handlers_stop_receiving() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        let first = recorder(&mut bus, 1, &log);
        recorder(&mut bus, 2, &log);

        assert!(bus.unsubscribe(first));
        assert!(!bus.unsubscribe(first));
        bus.publish(GameEvent::GameCompleted);
        drain(&mut bus);

        assert_eq!(*log.borrow(), [(2, GameEvent::GameCompleted)]);
    }

    #[test]
    fn teardown_drops_subscribers_and_pending() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut bus = EventBus::new();
        recorder(&mut bus, 1, &log);
        bus.publish(GameEvent::GameCompleted);

        bus.teardown();
        drain(&mut bus);

        assert_eq!(bus.subscriber_count(), 0);
        assert!(log.borrow().is_empty());
        assert_eq!(Rc::strong_count(&log), 1);
    }
}
