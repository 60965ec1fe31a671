//! Ordered, identity-keyed subscriber registry shared by every publisher.
//!
//! A subscriber's identity is the address of its shared `Arc`: registering the
//! same `Arc` (or a clone of it) twice keeps a single entry, while two
//! separately allocated subscribers of the same type are distinct. Each entry
//! also gets a monotonically assigned [`SubscriberId`].
//!
//! ## Broadcast semantics
//! - Subscribers are invoked sequentially, in insertion order.
//! - The entry list is snapshotted before the first call, so a subscriber may
//!   add or remove entries (itself included) while a broadcast runs; the
//!   change only affects later broadcasts.
//! - A failing subscriber does not stop the broadcast. Failures are collected
//!   into a [`BroadcastError`].
//!
//! ```text
//!    broadcast(&payload)
//!        │        (snapshot under read lock, lock released)
//!        ├──► S1.receive(&payload)
//!        ├──► S2.receive(&payload)   ── Err ──► collected
//!        └──► SN.receive(&payload)
//! ```

use crate::core::Subscriber;
use crate::error::{BroadcastError, DeliveryFailure};
use log::{debug, warn};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Handle assigned to a subscriber when it is first registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

struct Entry<P: ?Sized> {
    id: SubscriberId,
    subscriber: Arc<dyn Subscriber<P>>,
}

impl<P: ?Sized> Clone for Entry<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            subscriber: Arc::clone(&self.subscriber),
        }
    }
}

struct Entries<P: ?Sized> {
    list: Vec<Entry<P>>,
    next_id: u64,
}

/// Subscriber registry for payloads of type `P`.
pub struct Registry<P: ?Sized> {
    entries: RwLock<Entries<P>>,
}

impl<P: ?Sized> Registry<P> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Entries {
                list: Vec::new(),
                next_id: 1,
            }),
        }
    }

    /// Registers a subscriber and returns its handle.
    ///
    /// Re-adding an already registered subscriber replaces the stored
    /// reference in place and returns the existing handle.
    pub fn add(&self, subscriber: Arc<dyn Subscriber<P>>) -> SubscriberId {
        let mut entries = self.write();
        if let Some(entry) = entries
            .list
            .iter_mut()
            .find(|entry| is_same(&entry.subscriber, &subscriber))
        {
            debug!(
                "Subscriber '{}' ({}) already registered, replacing reference",
                subscriber.name(),
                entry.id
            );
            entry.subscriber = subscriber;
            return entry.id;
        }

        let id = SubscriberId(entries.next_id);
        entries.next_id += 1;
        debug!("Registered subscriber '{}' as {}", subscriber.name(), id);
        entries.list.push(Entry { id, subscriber });
        id
    }

    /// Unregisters a subscriber by identity.
    ///
    /// Returns `false` if it was not registered.
    pub fn remove<S: ?Sized>(&self, subscriber: &Arc<S>) -> bool {
        let mut entries = self.write();
        let before = entries.list.len();
        entries
            .list
            .retain(|entry| !is_same(&entry.subscriber, subscriber));
        let removed = entries.list.len() != before;
        if removed {
            debug!("Removed subscriber, {} left", entries.list.len());
        }
        removed
    }

    /// Unregisters a subscriber by handle.
    pub fn remove_id(&self, id: SubscriberId) -> bool {
        let mut entries = self.write();
        let before = entries.list.len();
        entries.list.retain(|entry| entry.id != id);
        entries.list.len() != before
    }

    /// True if the subscriber is currently registered.
    pub fn contains<S: ?Sized>(&self, subscriber: &Arc<S>) -> bool {
        self.read()
            .list
            .iter()
            .any(|entry| is_same(&entry.subscriber, subscriber))
    }

    /// Handles of the registered subscribers, in broadcast order.
    pub fn ids(&self) -> Vec<SubscriberId> {
        self.read().list.iter().map(|entry| entry.id).collect()
    }

    /// Number of registered subscribers.
    pub fn len(&self) -> usize {
        self.read().list.len()
    }

    /// True if there are no subscribers.
    pub fn is_empty(&self) -> bool {
        self.read().list.is_empty()
    }

    /// Delivers `payload` to every registered subscriber.
    ///
    /// Returns the number of successful deliveries, or a [`BroadcastError`]
    /// listing every subscriber that failed.
    pub fn broadcast(&self, payload: &P) -> Result<usize, BroadcastError> {
        let snapshot: Vec<Entry<P>> = self.read().list.clone();

        let mut delivered = 0;
        let mut failures = Vec::new();
        for entry in snapshot {
            match entry.subscriber.receive(payload) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    warn!(
                        "Subscriber '{}' ({}) failed to receive broadcast: {}",
                        entry.subscriber.name(),
                        entry.id,
                        e
                    );
                    failures.push(DeliveryFailure {
                        id: entry.id,
                        subscriber: entry.subscriber.name().to_string(),
                        source: e,
                    });
                }
            }
        }

        debug!(
            "Broadcast delivered to {} subscribers ({} failed)",
            delivered,
            failures.len()
        );
        if failures.is_empty() {
            Ok(delivered)
        } else {
            Err(BroadcastError {
                delivered,
                failures,
            })
        }
    }

    // The list is always left consistent, so a poisoned lock is still usable.
    fn read(&self) -> RwLockReadGuard<'_, Entries<P>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries<P>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: ?Sized> Default for Registry<P> {
    fn default() -> Self {
        Self::new()
    }
}

/// Identity comparison on the allocation address, ignoring vtable metadata.
fn is_same<P: ?Sized, S: ?Sized>(registered: &Arc<dyn Subscriber<P>>, other: &Arc<S>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(registered), Arc::as_ptr(other))
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;
    use std::sync::Mutex;

    /// Records its own name into a shared log on every delivery.
    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Recorder {
        fn new(name: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
            Arc::new(Self {
                name,
                log: Arc::clone(log),
            })
        }
    }

    impl Subscriber<str> for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn receive(&self, payload: &str) -> anyhow::Result<()> {
            self.log
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.name, payload));
            Ok(())
        }
    }

    struct Broken;

    impl Subscriber<str> for Broken {
        fn name(&self) -> &str {
            "broken"
        }

        fn receive(&self, _payload: &str) -> anyhow::Result<()> {
            bail!("channel unavailable")
        }
    }

    fn shared_log() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[test]
    fn test_broadcast_follows_insertion_order() {
        let log = shared_log();
        let registry: Registry<str> = Registry::new();
        registry.add(Recorder::new("b", &log));
        registry.add(Recorder::new("a", &log));
        registry.add(Recorder::new("c", &log));

        assert_eq!(registry.broadcast("x").unwrap(), 3);
        assert_eq!(*log.lock().unwrap(), vec!["b:x", "a:x", "c:x"]);
    }

    #[test]
    fn test_re_adding_keeps_one_entry_and_position() {
        let log = shared_log();
        let registry: Registry<str> = Registry::new();
        let first = Recorder::new("first", &log);
        let second = Recorder::new("second", &log);

        let id = registry.add(first.clone());
        registry.add(second.clone());
        assert_eq!(registry.add(first.clone()), id);

        assert_eq!(registry.len(), 2);
        registry.broadcast("x").unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["first:x", "second:x"]);
    }

    #[test]
    fn test_same_type_distinct_allocations_are_distinct_subscribers() {
        let log = shared_log();
        let registry: Registry<str> = Registry::new();
        registry.add(Recorder::new("same", &log));
        registry.add(Recorder::new("same", &log));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let log = shared_log();
        let registry: Registry<str> = Registry::new();
        let kept = Recorder::new("kept", &log);
        let stranger = Recorder::new("stranger", &log);
        registry.add(kept.clone());

        assert!(!registry.remove(&stranger));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains(&kept));
        assert!(!registry.contains(&stranger));
    }

    #[test]
    fn test_remove_by_identity_and_by_id() {
        let log = shared_log();
        let registry: Registry<str> = Registry::new();
        let a = Recorder::new("a", &log);
        let b = Recorder::new("b", &log);
        let c = Recorder::new("c", &log);
        registry.add(a.clone());
        let b_id = registry.add(b.clone());
        registry.add(c.clone());

        assert!(registry.remove(&a));
        assert!(registry.remove_id(b_id));
        assert!(!registry.remove_id(b_id));

        registry.broadcast("x").unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["c:x"]);
    }

    #[test]
    fn test_membership_after_interleaved_add_remove() {
        let log = shared_log();
        let registry: Registry<str> = Registry::new();
        let a = Recorder::new("a", &log);
        let b = Recorder::new("b", &log);
        let c = Recorder::new("c", &log);

        registry.add(a.clone());
        registry.remove(&b);
        registry.add(b.clone());
        registry.add(c.clone());
        registry.remove(&a);
        registry.add(b.clone());
        registry.remove(&a);

        registry.broadcast("x").unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["b:x", "c:x"]);
    }

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let log = shared_log();
        let registry: Registry<str> = Registry::new();
        let a = Recorder::new("a", &log);
        let first = registry.add(a.clone());
        registry.remove(&a);
        let second = registry.add(a.clone());
        assert!(second > first);
        assert_eq!(registry.ids(), vec![second]);
    }

    #[test]
    fn test_failure_does_not_stop_remaining_deliveries() {
        let log = shared_log();
        let registry: Registry<str> = Registry::new();
        registry.add(Recorder::new("a", &log));
        let broken_id = registry.add(Arc::new(Broken));
        registry.add(Recorder::new("c", &log));

        let err = registry.broadcast("x").unwrap_err();
        assert_eq!(err.delivered, 2);
        assert_eq!(err.failures.len(), 1);
        assert_eq!(err.failures[0].id, broken_id);
        assert_eq!(err.failures[0].subscriber, "broken");
        assert_eq!(
            err.to_string(),
            "1 of 3 subscribers failed to receive the broadcast"
        );
        assert_eq!(*log.lock().unwrap(), vec!["a:x", "c:x"]);
    }

    #[test]
    fn test_empty_registry_broadcasts_to_nobody() {
        let registry: Registry<str> = Registry::default();
        assert!(registry.is_empty());
        assert_eq!(registry.broadcast("x").unwrap(), 0);
    }

    /// Removes a target subscriber from the registry the first time it runs.
    struct Unsubscriber {
        registry: Arc<Registry<str>>,
        target: Mutex<Option<Arc<Recorder>>>,
    }

    impl Subscriber<str> for Unsubscriber {
        fn name(&self) -> &str {
            "unsubscriber"
        }

        fn receive(&self, _payload: &str) -> anyhow::Result<()> {
            if let Some(target) = self.target.lock().unwrap().take() {
                self.registry.remove(&target);
            }
            Ok(())
        }
    }

    #[test]
    fn test_removal_during_broadcast_applies_to_next_broadcast() {
        let log = shared_log();
        let registry: Arc<Registry<str>> = Arc::new(Registry::new());
        let victim = Recorder::new("victim", &log);
        registry.add(Arc::new(Unsubscriber {
            registry: Arc::clone(&registry),
            target: Mutex::new(Some(victim.clone())),
        }));
        registry.add(victim.clone());

        assert_eq!(registry.broadcast("first").unwrap(), 2);
        assert_eq!(registry.broadcast("second").unwrap(), 1);
        assert_eq!(*log.lock().unwrap(), vec!["victim:first"]);
    }
}
