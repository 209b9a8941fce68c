/// Bid Update Hub - per-listing publish/subscribe
///
/// Maps listing id to the channels of every viewer currently watching it.
/// Delivery is message passing: each subscriber owns an unbounded
/// receiver, so publishers never block and ordering is FIFO per
/// listing-subscriber pair. Nothing is persisted and nothing is
/// redelivered.
///
/// ## Lifecycle
/// - `subscribe` registers a fresh channel under the listing
/// - `unsubscribe` is an idempotent removal
/// - `publish` clones the event to every live channel; channels whose
///   receiver is gone are pruned on the spot, and listings left with no
///   subscribers leave the registry

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::shared::metrics::METRICS;
use crate::shared::protocol::BidUpdate;

/// A viewer's registration of interest in one listing.
///
/// Dropping the subscription closes the channel; the hub prunes the dead
/// sender on the next publish.
pub struct Subscription {
    listing_id: u64,
    subscriber_id: u64,
    receiver: UnboundedReceiver<BidUpdate>,
}

impl Subscription {
    pub fn listing_id(&self) -> u64 {
        self.listing_id
    }

    /// Next event, in publish order. `None` once unsubscribed and drained.
    pub async fn recv(&mut self) -> Option<BidUpdate> {
        self.receiver.recv().await
    }

    /// Non-blocking receive for drain loops and tests.
    pub fn try_recv(&mut self) -> Option<BidUpdate> {
        self.receiver.try_recv().ok()
    }
}

/// Per-listing fan-out registry.
#[derive(Default)]
pub struct BidHub {
    subscribers: DashMap<u64, HashMap<u64, UnboundedSender<BidUpdate>>>,
    next_subscriber_id: AtomicU64,
}

impl BidHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a viewer for events on `listing_id`.
    ///
    /// A viewer may hold subscriptions to many listings at once; each call
    /// returns an independent channel.
    pub fn subscribe(&self, listing_id: u64) -> Subscription {
        let subscriber_id = self.next_subscriber_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribers
            .entry(listing_id)
            .or_default()
            .insert(subscriber_id, tx);
        METRICS.subscribers_active.inc();
        Subscription {
            listing_id,
            subscriber_id,
            receiver: rx,
        }
    }

    /// Removes a subscription. Removing one that is already gone is a no-op.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        let mut emptied = false;
        if let Some(mut entry) = self.subscribers.get_mut(&subscription.listing_id) {
            if entry.remove(&subscription.subscriber_id).is_some() {
                METRICS.subscribers_active.dec();
            }
            emptied = entry.is_empty();
        }
        if emptied {
            self.subscribers
                .remove_if(&subscription.listing_id, |_, subs| subs.is_empty());
        }
    }

    /// Delivers `update` to every current subscriber of the listing.
    ///
    /// Returns how many channels accepted the event. Channels whose
    /// receiver has disconnected are dropped from the set, never retried.
    pub fn publish(&self, listing_id: u64, update: BidUpdate) -> usize {
        let mut delivered = 0;
        let mut emptied = false;
        if let Some(mut entry) = self.subscribers.get_mut(&listing_id) {
            entry.retain(|_, tx| match tx.send(update.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => {
                    METRICS.subscribers_active.dec();
                    false
                }
            });
            emptied = entry.is_empty();
        }
        if emptied {
            self.subscribers.remove_if(&listing_id, |_, subs| subs.is_empty());
        }
        if delivered > 0 {
            METRICS.events_published_total.inc_by(delivered as u64);
        }
        delivered
    }

    /// Current live subscriber count for a listing.
    pub fn subscriber_count(&self, listing_id: u64) -> usize {
        self.subscribers
            .get(&listing_id)
            .map_or(0, |subs| subs.len())
    }
}
