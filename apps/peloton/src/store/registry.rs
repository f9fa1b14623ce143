use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;

use super::{ChangeEvent, EventMask, Filter, Subscription, SubscriptionId, Table};

struct Entry {
    table: Table,
    events: EventMask,
    filter: Filter,
    sender: mpsc::UnboundedSender<ChangeEvent>,
}

impl Entry {
    fn wants(&self, event: &ChangeEvent) -> bool {
        self.table == event.table
            && self.events.contains(event.kind)
            && self.filter.matches(&event.record)
    }
}

/// Subscriptions keyed by token, each with its own channel.
#[derive(Default)]
pub struct SubscriptionRegistry {
    entries: DashMap<SubscriptionId, Entry>,
}

impl SubscriptionRegistry {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn register(
        self: &Arc<Self>,
        table: Table,
        events: EventMask,
        filter: Filter,
    ) -> Subscription {
        let id = SubscriptionId::new();
        let (sender, receiver) = mpsc::unbounded_channel();
        debug!(subscription = %id, table = %table, ?filter, "Subscription registered");
        self.entries.insert(
            id,
            Entry {
                table,
                events,
                filter,
                sender,
            },
        );
        Subscription::new(id, table, receiver, Arc::clone(self))
    }

    pub fn unregister(&self, id: SubscriptionId) -> bool {
        let removed = self.entries.remove(&id).is_some();
        if removed {
            debug!(subscription = %id, "Subscription released");
        }
        removed
    }

    /// Deliver to every matching subscription. Returns how many received it.
    pub fn publish(&self, event: &ChangeEvent) -> usize {
        let mut delivered = 0;
        let mut closed = Vec::new();
        for entry in self.entries.iter() {
            if !entry.wants(event) {
                continue;
            }
            if entry.sender.send(event.clone()).is_ok() {
                delivered += 1;
            } else {
                closed.push(*entry.key());
            }
        }
        // Removal happens after iteration; DashMap shards are still locked above.
        for id in closed {
            self.entries.remove(&id);
        }
        delivered
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
