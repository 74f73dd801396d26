// Broadcast hub: explicit fan-out of position events to connected subscribers

mod broadcast;

pub use broadcast::{BroadcastHub, HubEvent, Subscription, DEFAULT_SUBSCRIBER_CAPACITY};
