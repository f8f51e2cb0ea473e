//! The by-event index: event name → observer → payload key → callbacks.
//!
//! This is the index `post` reads. Every level prunes itself when it
//! becomes empty, so the presence of an event name in the top-level map
//! always means at least one live registration exists under it.

use std::collections::{HashMap, HashSet};

use herald_types::{ObserverId, RegistryKey, Target};

/// Callbacks registered by one observer under one event name, grouped by
/// payload key. `None` is the "any payload" bucket.
#[derive(Debug)]
struct ObserverNode<P, C> {
    payloads: HashMap<Option<P>, HashSet<C>>,
}

impl<P: RegistryKey, C: RegistryKey> ObserverNode<P, C> {
    fn new() -> Self {
        Self {
            payloads: HashMap::new(),
        }
    }

    fn add(&mut self, payload_key: Option<P>, callback: C) -> bool {
        self.payloads.entry(payload_key).or_default().insert(callback)
    }

    /// Drops every callback under `payload_key`. Returns how many were dropped.
    fn remove(&mut self, payload_key: &Option<P>) -> usize {
        self.payloads.remove(payload_key).map_or(0, |set| set.len())
    }

    fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

/// All observers registered under one event name.
#[derive(Debug)]
struct EventNode<P, C> {
    observers: HashMap<ObserverId, ObserverNode<P, C>>,
}

impl<P: RegistryKey, C: RegistryKey> EventNode<P, C> {
    fn new() -> Self {
        Self {
            observers: HashMap::new(),
        }
    }

    fn targets(&self) -> impl Iterator<Item = Target<P, C>> + '_ {
        self.observers.iter().flat_map(|(observer, node)| {
            node.payloads.iter().flat_map(move |(payload_key, callbacks)| {
                callbacks.iter().map(move |callback| Target {
                    observer: *observer,
                    payload_key: payload_key.clone(),
                    callback: callback.clone(),
                })
            })
        })
    }

    fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

/// Index from event name down to callback sets.
#[derive(Debug)]
pub struct ByEventIndex<E, P, C> {
    events: HashMap<E, EventNode<P, C>>,
}

impl<E: RegistryKey, P: RegistryKey, C: RegistryKey> ByEventIndex<E, P, C> {
    pub fn new() -> Self {
        Self {
            events: HashMap::new(),
        }
    }

    /// Inserts `callback` under `(name, observer, payload_key)`, creating
    /// intermediate nodes as needed. Returns `false` if it was already there.
    pub fn add(&mut self, name: E, observer: ObserverId, payload_key: Option<P>, callback: C) -> bool {
        self.events
            .entry(name)
            .or_insert_with(EventNode::new)
            .observers
            .entry(observer)
            .or_insert_with(ObserverNode::new)
            .add(payload_key, callback)
    }

    /// Removes every callback under `(name, observer, payload_key)` and
    /// prunes the observer and event nodes if they are left empty.
    ///
    /// Returns the number of callbacks removed; zero when any level of the
    /// path is absent.
    pub fn remove(&mut self, name: &E, observer: ObserverId, payload_key: &Option<P>) -> usize {
        let Some(event) = self.events.get_mut(name) else {
            return 0;
        };
        let Some(node) = event.observers.get_mut(&observer) else {
            return 0;
        };

        let removed = node.remove(payload_key);
        if node.is_empty() {
            event.observers.remove(&observer);
            if event.is_empty() {
                self.events.remove(name);
                tracing::debug!(event = ?name, "pruned empty event node");
            }
        }
        removed
    }

    /// Returns every target registered under `name`. Order follows the
    /// index's iteration order and is stable only until the next mutation.
    pub fn all_for_event(&self, name: &E) -> Vec<Target<P, C>> {
        self.events
            .get(name)
            .map(|event| event.targets().collect())
            .unwrap_or_default()
    }

    /// Returns `true` if no observer is registered under `name`.
    pub fn is_empty_under(&self, name: &E) -> bool {
        self.events.get(name).map_or(true, EventNode::is_empty)
    }

    pub fn contains(&self, name: &E, observer: ObserverId, payload_key: &Option<P>, callback: &C) -> bool {
        self.events
            .get(name)
            .and_then(|event| event.observers.get(&observer))
            .and_then(|node| node.payloads.get(payload_key))
            .is_some_and(|callbacks| callbacks.contains(callback))
    }

    /// Returns `true` if any callback is registered for the exact group.
    pub fn has_group(&self, name: &E, observer: ObserverId, payload_key: &Option<P>) -> bool {
        self.events
            .get(name)
            .and_then(|event| event.observers.get(&observer))
            .is_some_and(|node| node.payloads.contains_key(payload_key))
    }

    pub fn names(&self) -> impl Iterator<Item = &E> {
        self.events.keys()
    }

    /// Iterates `(name, target)` across the whole index.
    pub fn iter(&self) -> impl Iterator<Item = (&E, Target<P, C>)> + '_ {
        self.events
            .iter()
            .flat_map(|(name, event)| event.targets().map(move |target| (name, target)))
    }

    /// Iterates every `(name, observer, payload_key)` group with the number
    /// of callbacks it holds.
    pub(crate) fn groups(&self) -> impl Iterator<Item = (&E, ObserverId, &Option<P>, usize)> + '_ {
        self.events.iter().flat_map(|(name, event)| {
            event.observers.iter().flat_map(move |(observer, node)| {
                node.payloads
                    .iter()
                    .map(move |(payload_key, callbacks)| (name, *observer, payload_key, callbacks.len()))
            })
        })
    }

    /// Total number of registrations across every event name.
    pub fn len(&self) -> usize {
        self.groups().map(|(_, _, _, count)| count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Describes the first empty node that survived pruning, if any.
    pub(crate) fn find_residual(&self) -> Option<String> {
        for (name, event) in &self.events {
            if event.is_empty() {
                return Some(format!("event {name:?} has no observers"));
            }
            for (observer, node) in &event.observers {
                if node.is_empty() {
                    return Some(format!("observer {observer} under event {name:?} has no payload buckets"));
                }
                for (payload_key, callbacks) in &node.payloads {
                    if callbacks.is_empty() {
                        return Some(format!(
                            "payload bucket {payload_key:?} of observer {observer} under event {name:?} has no callbacks"
                        ));
                    }
                }
            }
        }
        None
    }

    pub(crate) fn clear(&mut self) {
        self.events.clear();
    }
}

impl<E: RegistryKey, P: RegistryKey, C: RegistryKey> Default for ByEventIndex<E, P, C> {
    fn default() -> Self {
        Self::new()
    }
}
