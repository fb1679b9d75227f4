//! Kind-keyed event channel implementation.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use combat_core::{CombatEvent, CombatEventKind};
use parking_lot::RwLock;
use tracing::{error, trace};

use crate::error::HandlerError;

/// Subscriber callback.
pub type EventHandler = Arc<dyn Fn(&CombatEvent) -> Result<(), HandlerError> + Send + Sync>;

/// Handle returned by [`CombatEventChannel::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

#[derive(Clone)]
struct Subscription {
    id: SubscriptionId,
    handler: EventHandler,
}

/// Result of one publish call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub kind: CombatEventKind,
    /// Subscribers that returned `Ok`.
    pub delivered: usize,
    /// Subscribers that failed, in call order.
    pub failures: Vec<(SubscriptionId, HandlerError)>,
}

impl PublishReport {
    fn new(kind: CombatEventKind) -> Self {
        Self {
            kind,
            delivered: 0,
            failures: Vec::new(),
        }
    }

    /// Number of subscribers that were called.
    pub fn attempted(&self) -> usize {
        self.delivered + self.failures.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Synchronous, best-effort broadcast of combat events.
///
/// Cloning is cheap; clones share the same subscriber table. Delivery is
/// at most once with no queueing or retry. Within one kind, subscribers run
/// in registration order; there is no ordering across kinds.
pub struct CombatEventChannel {
    subscribers: Arc<RwLock<HashMap<CombatEventKind, Vec<Subscription>>>>,
    next_id: Arc<AtomicU64>,
}

impl CombatEventChannel {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Registers `handler` for events of `kind`.
    pub fn subscribe<F>(&self, kind: CombatEventKind, handler: F) -> SubscriptionId
    where
        F: Fn(&CombatEvent) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .entry(kind)
            .or_default()
            .push(Subscription {
                id,
                handler: Arc::new(handler),
            });
        trace!(target: "combat::events", %kind, subscription = %id, "subscribed");
        id
    }

    /// Removes a subscription. Returns whether one was removed.
    pub fn unsubscribe(&self, kind: CombatEventKind, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let Some(list) = subscribers.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|sub| sub.id != id);
        let removed = list.len() != before;
        if list.is_empty() {
            subscribers.remove(&kind);
        }
        removed
    }

    /// Delivers `event` to every subscriber of its kind.
    ///
    /// Handlers run against a snapshot taken before the first call, with the
    /// table unlocked, so a handler may subscribe or unsubscribe without
    /// changing who receives this event. A failing handler is logged and
    /// recorded; the remaining handlers still run.
    pub fn publish(&self, event: &CombatEvent) -> PublishReport {
        let kind = event.kind();
        let snapshot: Vec<Subscription> = self
            .subscribers
            .read()
            .get(&kind)
            .cloned()
            .unwrap_or_default();

        let mut report = PublishReport::new(kind);
        if snapshot.is_empty() {
            trace!(target: "combat::events", %kind, "no subscribers");
            return report;
        }

        for sub in snapshot {
            match (sub.handler)(event) {
                Ok(()) => report.delivered += 1,
                Err(err) => {
                    error!(
                        target: "combat::events",
                        %kind,
                        subscription = %sub.id,
                        error = %err,
                        "subscriber failed, continuing"
                    );
                    report.failures.push((sub.id, err));
                }
            }
        }

        trace!(
            target: "combat::events",
            %kind,
            delivered = report.delivered,
            failed = report.failures.len(),
            "published"
        );
        report
    }

    pub fn subscriber_count(&self, kind: CombatEventKind) -> usize {
        self.subscribers.read().get(&kind).map_or(0, Vec::len)
    }

    pub fn total_subscribers(&self) -> usize {
        self.subscribers.read().values().map(Vec::len).sum()
    }

    /// Drops every subscription.
    pub fn clear(&self) {
        self.subscribers.write().clear();
    }
}

impl Clone for CombatEventChannel {
    fn clone(&self) -> Self {
        Self {
            subscribers: Arc::clone(&self.subscribers),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl Default for CombatEventChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CombatEventChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CombatEventChannel")
            .field("subscribers", &self.total_subscribers())
            .finish()
    }
}
