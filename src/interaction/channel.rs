//! Single-threaded broadcast channel owned by one chart instance.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

type Queue<E> = Rc<RefCell<VecDeque<E>>>;

/// Broadcast channel delivering every published event to each live
/// subscription, in subscription order.
#[derive(Debug)]
pub struct EventChannel<E> {
    name: &'static str,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Weak<RefCell<VecDeque<E>>>)>,
}

impl<E: Clone> EventChannel<E> {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn subscribe(&mut self) -> Subscription<E> {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        let queue: Queue<E> = Rc::new(RefCell::new(VecDeque::new()));
        self.subscribers.push((id, Rc::downgrade(&queue)));
        trace!(channel = self.name, subscription = id.0, "subscribed");
        Subscription { id, queue }
    }

    /// Detaches a subscription immediately. Returns `true` when it was live.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(entry, _)| *entry != id);
        let removed = self.subscribers.len() != before;
        if removed {
            trace!(channel = self.name, subscription = id.0, "unsubscribed");
        }
        removed
    }

    /// Queues `event` for every live subscription and returns how many
    /// received it. Subscriptions dropped by their owner are pruned.
    pub fn publish(&mut self, event: E) -> usize {
        self.subscribers
            .retain(|(_, queue)| queue.strong_count() > 0);
        let mut delivered = 0;
        for (_, queue) in &self.subscribers {
            if let Some(queue) = queue.upgrade() {
                queue.borrow_mut().push_back(event.clone());
                delivered += 1;
            }
        }
        delivered
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .iter()
            .filter(|(_, queue)| queue.strong_count() > 0)
            .count()
    }
}

/// Receiving end of an [`EventChannel`]. Dropping it unsubscribes.
#[derive(Debug)]
pub struct Subscription<E> {
    id: SubscriptionId,
    queue: Queue<E>,
}

impl<E> Subscription<E> {
    #[must_use]
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn try_recv(&self) -> Option<E> {
        self.queue.borrow_mut().pop_front()
    }

    /// Takes every queued event in publish order.
    pub fn drain(&self) -> Vec<E> {
        self.queue.borrow_mut().drain(..).collect()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

#[cfg(test)]
mod tests {
    use super::EventChannel;

    #[test]
    fn events_reach_subscribers_registered_before_publish() {
        let mut channel = EventChannel::new("test");
        let first = channel.subscribe();
        channel.publish(1);
        let second = channel.subscribe();
        channel.publish(2);

        assert_eq!(first.drain(), vec![1, 2]);
        assert_eq!(second.drain(), vec![2]);
    }

    #[test]
    fn dropped_subscription_stops_receiving() {
        let mut channel = EventChannel::new("test");
        let kept = channel.subscribe();
        let dropped = channel.subscribe();
        drop(dropped);

        assert_eq!(channel.publish("a"), 1);
        assert_eq!(channel.subscriber_count(), 1);
        assert_eq!(kept.try_recv(), Some("a"));
        assert_eq!(kept.try_recv(), None);
    }

    #[test]
    fn explicit_unsubscribe_is_synchronous() {
        let mut channel = EventChannel::new("test");
        let subscription = channel.subscribe();
        assert!(channel.unsubscribe(subscription.id()));
        assert!(!channel.unsubscribe(subscription.id()));
        assert_eq!(channel.publish(7), 0);
        assert_eq!(subscription.pending(), 0);
    }
}
