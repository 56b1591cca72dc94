//! Observer registry and subscription handles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use uuid::Uuid;

use crate::store::DerivedResult;

/// Callback invoked with each new derived result.
pub(crate) type Observer = dyn Fn(&DerivedResult) + Send + Sync;

/// Identifies one registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Default)]
struct Registry {
    entries: HashMap<SubscriptionId, Arc<Observer>>,
    /// Revision of the newest result handed to observers.
    delivered: u64,
}

#[derive(Default)]
pub(crate) struct Observers {
    registry: Mutex<Registry>,
}

impl Observers {
    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn insert(&self, observer: Arc<Observer>) -> SubscriptionId {
        let id = SubscriptionId::new();
        self.registry().entries.insert(id, observer);
        id
    }

    pub(crate) fn remove(&self, id: SubscriptionId) -> bool {
        self.registry().entries.remove(&id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.registry().entries.len()
    }

    /// Calls every observer with `result`, computed at `revision`.
    ///
    /// Returns false without calling anyone if a newer revision has already
    /// been delivered. The registry lock is released before any observer
    /// runs, so observers may subscribe, unsubscribe, or read the store.
    pub(crate) fn notify(&self, revision: u64, result: &DerivedResult) -> bool {
        let observers: Vec<Arc<Observer>> = {
            let mut registry = self.registry();
            if revision <= registry.delivered {
                tracing::debug!(
                    revision,
                    delivered = registry.delivered,
                    "skipping stale derived result"
                );
                return false;
            }
            registry.delivered = revision;
            registry.entries.values().cloned().collect()
        };

        for observer in observers {
            observer(result);
        }
        true
    }
}

/// Handle returned by [`RosterStore::subscribe`](crate::RosterStore::subscribe).
///
/// The observer stays registered for as long as the handle lives.
#[must_use = "dropping a Subscription unsubscribes its observer"]
pub struct Subscription {
    id: SubscriptionId,
    observers: Weak<Observers>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, observers: &Arc<Observers>) -> Self {
        Self {
            id,
            observers: Arc::downgrade(observers),
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Removes the observer now.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(observers) = self.observers.upgrade() {
            observers.remove(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
