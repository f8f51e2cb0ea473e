//! The registration store: both indices behind one façade.
//!
//! Every mutation goes through [`RegistrationStore`], which updates the
//! by-event and by-observer indices together. Either both change or
//! neither does; there is no other write path into the indices.
//!
//! `post` reads only the by-event side. Removing an observer entirely reads
//! the by-observer side to learn which groups to clear, so it costs time
//! proportional to that observer's registrations rather than the whole
//! store.

use std::collections::HashSet;

use herald_types::{EventRegistration, Notification, ObserverId, ObserverRegistration, RegistryKey, Target};
use serde::Serialize;

use crate::by_event::ByEventIndex;
use crate::by_observer::ByObserverIndex;
use crate::dispatch::Dispatch;
use crate::error::RegistryError;

/// Dual-indexed set of `(observer, event name, payload key, callback)`
/// registrations.
///
/// Single-threaded: mutation takes `&mut self`. Wrap it in a lock to
/// share it, as `herald-center` does.
#[derive(Debug)]
pub struct RegistrationStore<E, P, C> {
    by_event: ByEventIndex<E, P, C>,
    by_observer: ByObserverIndex<E, P>,
}

/// Summary counts of a store, suitable for reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSnapshot<E> {
    /// Event names with at least one registration, in no particular order.
    pub event_names: Vec<E>,
    /// Number of `(observer, name, payload key, callback)` registrations.
    pub registrations: usize,
    /// Number of `(observer, name, payload key)` groups.
    pub groups: usize,
    /// Number of observers with at least one registration.
    pub observers: usize,
}

impl<E: RegistryKey, P: RegistryKey, C: RegistryKey> RegistrationStore<E, P, C> {
    pub fn new() -> Self {
        Self {
            by_event: ByEventIndex::new(),
            by_observer: ByObserverIndex::new(),
        }
    }

    /// Registers `callback` for `observer` under `(name, payload_key)`.
    ///
    /// A `None` name is ignored and leaves the store untouched. A `None`
    /// payload key registers for any payload. Adding an existing
    /// registration again changes nothing.
    ///
    /// Returns `true` if a new registration was created.
    pub fn add_observer(
        &mut self,
        observer: ObserverId,
        callback: C,
        name: Option<E>,
        payload_key: Option<P>,
    ) -> bool {
        let Some(name) = name else {
            return false;
        };

        let inserted = self
            .by_event
            .add(name.clone(), observer, payload_key.clone(), callback);
        self.by_observer.add(observer, name, payload_key);

        if inserted {
            tracing::trace!(observer = %observer, "registration added");
        }
        inserted
    }

    /// Removes every callback `observer` registered under exactly
    /// `(name, payload_key)`.
    ///
    /// Scopes are independent buckets: removing with a `None` payload key
    /// only clears the "any payload" registrations and leaves payload-scoped
    /// ones in place, and vice versa. A `None` name is ignored.
    ///
    /// Returns the number of registrations removed.
    pub fn remove_observer(&mut self, observer: ObserverId, name: Option<&E>, payload_key: Option<&P>) -> usize {
        let Some(name) = name else {
            return 0;
        };
        let payload_key = payload_key.cloned();

        let removed = self.by_event.remove(name, observer, &payload_key);
        self.by_observer.remove(observer, name, &payload_key);
        removed
    }

    /// Removes every registration `observer` holds, across all event names
    /// and payload keys.
    ///
    /// Returns the number of registrations removed.
    pub fn remove_observer_entirely(&mut self, observer: ObserverId) -> usize {
        let groups = self.by_observer.take(observer);
        if groups.is_empty() {
            return 0;
        }

        let removed: usize = groups
            .iter()
            .map(|(name, payload_key)| self.by_event.remove(name, observer, payload_key))
            .sum();

        tracing::debug!(
            observer = %observer,
            groups = groups.len(),
            removed,
            "observer removed from registry"
        );
        removed
    }

    /// Delivers a posted event to every registration under `name`.
    ///
    /// Each target is handed to `dispatcher` once, synchronously, in the
    /// by-event index's iteration order. Payload-scoped and unscoped
    /// registrations alike are delivered; the target carries its scope so
    /// the dispatcher can tell them apart.
    ///
    /// Returns the number of dispatches performed.
    pub fn post<D>(&self, name: &E, payload: Option<&P>, dispatcher: &D) -> usize
    where
        D: Dispatch<E, P, C> + ?Sized,
    {
        let targets = self.by_event.all_for_event(name);
        deliver(&targets, name, payload, dispatcher)
    }

    // ── Introspection ────────────────────────────────────────────────

    /// Every `(observer, name, payload key)` group, read from the
    /// by-observer index.
    pub fn all_observer_registrations(&self) -> Vec<ObserverRegistration<E, P>> {
        self.by_observer
            .iter()
            .map(|(observer, name, payload_key)| ObserverRegistration {
                observer,
                name: name.clone(),
                payload_key: payload_key.clone(),
            })
            .collect()
    }

    /// Every registration, read from the by-event index.
    pub fn all_event_registrations(&self) -> Vec<EventRegistration<E, P, C>> {
        self.by_event
            .iter()
            .map(|(name, target)| EventRegistration {
                observer: target.observer,
                callback: target.callback,
                name: name.clone(),
                payload_key: target.payload_key,
            })
            .collect()
    }

    /// Every target registered under `name`.
    pub fn all_registrations_for_event(&self, name: &E) -> Vec<Target<P, C>> {
        self.by_event.all_for_event(name)
    }

    /// Every event name with at least one registration.
    pub fn all_event_names(&self) -> Vec<E> {
        self.by_event.names().cloned().collect()
    }

    /// Every `(name, payload key)` group `observer` participates in.
    pub fn groups_for(&self, observer: ObserverId) -> Vec<(E, Option<P>)> {
        self.by_observer.all_groups_for(observer)
    }

    pub fn contains(&self, observer: ObserverId, name: &E, payload_key: Option<&P>, callback: &C) -> bool {
        self.by_event
            .contains(name, observer, &payload_key.cloned(), callback)
    }

    /// Returns `true` if no observer is registered under `name`.
    pub fn is_empty_under(&self, name: &E) -> bool {
        self.by_event.is_empty_under(name)
    }

    /// Number of registrations in the store.
    pub fn len(&self) -> usize {
        self.by_event.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_event.is_empty() && self.by_observer.is_empty()
    }

    /// Number of observers with at least one registration.
    pub fn observer_count(&self) -> usize {
        self.by_observer.observer_count()
    }

    pub fn snapshot(&self) -> StoreSnapshot<E> {
        StoreSnapshot {
            event_names: self.all_event_names(),
            registrations: self.len(),
            groups: self.by_observer.group_count(),
            observers: self.observer_count(),
        }
    }

    /// Drops every registration.
    pub fn clear(&mut self) {
        self.by_event.clear();
        self.by_observer.clear();
    }

    #[cfg(test)]
    pub(crate) fn by_observer_mut(&mut self) -> &mut ByObserverIndex<E, P> {
        &mut self.by_observer
    }

    /// Audits the two indices against each other.
    ///
    /// Checks that no empty node survived pruning and that both indices
    /// hold exactly the same `(observer, name, payload key)` groups.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::ResidualNode` or
    /// `RegistryError::IndexMismatch` describing the first problem found.
    pub fn check_consistency(&self) -> Result<(), RegistryError> {
        if let Some(detail) = self.by_event.find_residual() {
            return Err(RegistryError::ResidualNode(detail));
        }
        if let Some(detail) = self.by_observer.find_residual() {
            return Err(RegistryError::ResidualNode(detail));
        }

        let mut event_groups = 0usize;
        for (name, observer, payload_key, _) in self.by_event.groups() {
            if !self.by_observer.contains(observer, name, payload_key) {
                return Err(RegistryError::IndexMismatch(format!(
                    "group ({observer}, {name:?}, {payload_key:?}) missing from by-observer index"
                )));
            }
            event_groups += 1;
        }

        for (observer, name, payload_key) in self.by_observer.iter() {
            if !self.by_event.has_group(name, observer, payload_key) {
                return Err(RegistryError::IndexMismatch(format!(
                    "group ({observer}, {name:?}, {payload_key:?}) missing from by-event index"
                )));
            }
        }

        let observer_groups = self.by_observer.group_count();
        if event_groups != observer_groups {
            return Err(RegistryError::IndexMismatch(format!(
                "by-event index holds {event_groups} groups, by-observer index holds {observer_groups}"
            )));
        }

        let event_observers: HashSet<ObserverId> = self
            .by_event
            .groups()
            .map(|(_, observer, _, _)| observer)
            .collect();
        if event_observers.len() != self.by_observer.observer_count() {
            return Err(RegistryError::IndexMismatch(format!(
                "by-event index references {} observers, by-observer index holds {}",
                event_observers.len(),
                self.by_observer.observer_count()
            )));
        }

        Ok(())
    }
}

impl<E: RegistryKey, P: RegistryKey, C: RegistryKey> Default for RegistrationStore<E, P, C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Hands each target to `dispatcher`. Shared by the store and by callers
/// that snapshot targets before releasing a lock.
pub fn deliver<E, P, C, D>(targets: &[Target<P, C>], name: &E, payload: Option<&P>, dispatcher: &D) -> usize
where
    D: Dispatch<E, P, C> + ?Sized,
{
    let notification = Notification { name, payload };
    for target in targets {
        dispatcher.dispatch(target, notification);
    }
    targets.len()
}
