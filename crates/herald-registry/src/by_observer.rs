//! The by-observer index: observer → set of `(event name, payload key)`.
//!
//! Presence only. Callback identifiers live in the by-event index; this
//! side exists so that removing an observer costs time proportional to
//! that observer's own registrations.

use std::collections::{HashMap, HashSet};

use herald_types::{ObserverId, RegistryKey};

#[derive(Debug)]
pub struct ByObserverIndex<E, P> {
    observers: HashMap<ObserverId, HashSet<(E, Option<P>)>>,
}

impl<E: RegistryKey, P: RegistryKey> ByObserverIndex<E, P> {
    pub fn new() -> Self {
        Self {
            observers: HashMap::new(),
        }
    }

    /// Records that `observer` has a group under `(name, payload_key)`.
    pub fn add(&mut self, observer: ObserverId, name: E, payload_key: Option<P>) -> bool {
        self.observers
            .entry(observer)
            .or_default()
            .insert((name, payload_key))
    }

    /// Forgets the group and drops the observer entry once it has none left.
    pub fn remove(&mut self, observer: ObserverId, name: &E, payload_key: &Option<P>) -> bool {
        let Some(groups) = self.observers.get_mut(&observer) else {
            return false;
        };
        // HashSet lookups need an owned tuple key here.
        let removed = groups.remove(&(name.clone(), payload_key.clone()));
        if groups.is_empty() {
            self.observers.remove(&observer);
        }
        removed
    }

    /// Returns every `(name, payload_key)` group for `observer`.
    pub fn all_groups_for(&self, observer: ObserverId) -> Vec<(E, Option<P>)> {
        self.observers
            .get(&observer)
            .map(|groups| groups.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Drops the observer entry outright and returns the groups it held.
    pub fn take(&mut self, observer: ObserverId) -> HashSet<(E, Option<P>)> {
        self.observers.remove(&observer).unwrap_or_default()
    }

    pub fn contains(&self, observer: ObserverId, name: &E, payload_key: &Option<P>) -> bool {
        self.observers
            .get(&observer)
            .is_some_and(|groups| groups.contains(&(name.clone(), payload_key.clone())))
    }

    pub fn observers(&self) -> impl Iterator<Item = ObserverId> + '_ {
        self.observers.keys().copied()
    }

    /// Iterates `(observer, name, payload_key)` across the whole index.
    pub fn iter(&self) -> impl Iterator<Item = (ObserverId, &E, &Option<P>)> + '_ {
        self.observers.iter().flat_map(|(observer, groups)| {
            groups
                .iter()
                .map(move |(name, payload_key)| (*observer, name, payload_key))
        })
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Total number of groups across every observer.
    pub fn group_count(&self) -> usize {
        self.observers.values().map(HashSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub(crate) fn find_residual(&self) -> Option<String> {
        self.observers
            .iter()
            .find(|(_, groups)| groups.is_empty())
            .map(|(observer, _)| format!("observer {observer} has no groups"))
    }

    pub(crate) fn clear(&mut self) {
        self.observers.clear();
    }
}

impl<E: RegistryKey, P: RegistryKey> Default for ByObserverIndex<E, P> {
    fn default() -> Self {
        Self::new()
    }
}
