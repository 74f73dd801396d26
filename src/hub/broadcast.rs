use crate::position::PositionRecord;
use dashmap::DashMap;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Per-subscriber queue bound. A subscriber that falls this far behind
/// starts missing events until it catches up.
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 1000;

/// Event fanned out to every subscriber
#[derive(Clone, Debug, PartialEq)]
pub enum HubEvent {
    /// A report was accepted for this entity
    Update(PositionRecord),
    /// The entity's position expired and was removed from the store
    Evicted { id: String },
}

/// Handle returned by [`BroadcastHub::subscribe`].
///
/// Dropping the handle closes the channel; the hub forgets the subscriber on
/// its next publish.
pub struct Subscription {
    pub id: Uuid,
    rx: mpsc::Receiver<HubEvent>,
}

impl Subscription {
    /// Wait for the next event. `None` once the hub has dropped this subscriber.
    pub async fn recv(&mut self) -> Option<HubEvent> {
        self.rx.recv().await
    }

    /// Non-blocking receive, mainly for tests
    pub fn try_recv(&mut self) -> Option<HubEvent> {
        self.rx.try_recv().ok()
    }
}

/// Set of live subscriber channels.
///
/// Delivery is best-effort and never fails the publisher: a closed channel is
/// an implicit unsubscribe, a full channel drops the event for that
/// subscriber only.
pub struct BroadcastHub {
    subscribers: DashMap<Uuid, mpsc::Sender<HubEvent>>,
    capacity: usize,
}

impl BroadcastHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: DashMap::new(),
            capacity: capacity.max(1),
        }
    }

    /// Register a new subscriber channel
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::channel(self.capacity);
        let id = Uuid::new_v4();
        self.subscribers.insert(id, tx);

        info!(
            subscriber_id = %id,
            subscribers = self.subscribers.len(),
            "Subscriber connected"
        );

        Subscription { id, rx }
    }

    /// Remove a subscriber. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: Uuid) -> bool {
        let removed = self.subscribers.remove(&id).is_some();
        if removed {
            info!(
                subscriber_id = %id,
                subscribers = self.subscribers.len(),
                "Subscriber disconnected"
            );
        }
        removed
    }

    /// Deliver `event` to every current subscriber.
    ///
    /// Returns how many subscribers accepted the event.
    pub fn publish(&self, event: HubEvent) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();

        for entry in self.subscribers.iter() {
            match entry.value().try_send(event.clone()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    warn!(subscriber_id = %entry.key(), "Subscriber lagging, event dropped");
                }
                Err(TrySendError::Closed(_)) => closed.push(*entry.key()),
            }
        }

        // Removal must wait until the iterator has released its shard locks
        for id in closed {
            if self.subscribers.remove(&id).is_some() {
                debug!(subscriber_id = %id, "Subscriber channel closed, removed");
            }
        }

        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for BroadcastHub {
    fn default() -> Self {
        Self::new(DEFAULT_SUBSCRIBER_CAPACITY)
    }
}
