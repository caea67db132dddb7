//! Per-engine observer registry.
//!
//! Handlers are called synchronously on the thread that changed the depth,
//! so they should return quickly.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use crate::snapshot::HistorySnapshot;

/// Subscription handle for unsubscribing from snapshot updates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

type SnapshotHandler<T> = Arc<dyn Fn(&HistorySnapshot<T>) + Send + Sync>;

pub(crate) struct SubscriberRegistry<T> {
    handlers: RwLock<HashMap<SubscriptionId, SnapshotHandler<T>>>,
}

impl<T> SubscriberRegistry<T> {
    pub(crate) fn new() -> Self {
        Self {
            handlers: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&HistorySnapshot<T>) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.write().insert(id, Arc::new(handler));
        tracing::debug!("Subscription {} added", id);
        id
    }

    pub(crate) fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.handlers.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    pub(crate) fn len(&self) -> usize {
        self.handlers.read().len()
    }

    pub(crate) fn notify(&self, snapshot: &HistorySnapshot<T>) {
        // copy the handler list out so a handler may (un)subscribe
        let handlers: Vec<SnapshotHandler<T>> = self.handlers.read().values().cloned().collect();
        for handler in handlers {
            handler(snapshot);
        }
    }
}
