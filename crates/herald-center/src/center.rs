//! Shared, lock-guarded front end over a [`RegistrationStore`].

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use herald_registry::{deliver, Dispatch, RegistrationStore, StoreSnapshot};
use herald_types::{EventRegistration, ObserverId, ObserverRegistration, RegistryKey, Target};

use crate::config::{CenterConfig, MissingNamePolicy};
use crate::error::CenterError;

type SharedDispatch<E, P, C> = Arc<dyn Dispatch<E, P, C> + Send + Sync>;

/// Thread-safe notification center.
///
/// Cloning is cheap and every clone shares the same registry and
/// dispatcher.
///
/// Lock discipline: mutations hold the write lock only for the index
/// update; introspection holds the read lock. [`post`](Self::post) copies
/// the matching targets under the read lock and dispatches after releasing
/// it, so a callback may add, remove or post through the same center.
/// Such changes do not alter the round already in flight; they apply from
/// the next post.
pub struct NotificationCenter<E, P, C> {
    store: Arc<RwLock<RegistrationStore<E, P, C>>>,
    dispatcher: SharedDispatch<E, P, C>,
    missing_name: MissingNamePolicy,
}

impl<E, P, C> Clone for NotificationCenter<E, P, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            dispatcher: Arc::clone(&self.dispatcher),
            missing_name: self.missing_name,
        }
    }
}

impl<E: RegistryKey, P: RegistryKey, C: RegistryKey> NotificationCenter<E, P, C> {
    /// Creates a center with the default configuration.
    pub fn new<D>(dispatcher: D) -> Self
    where
        D: Dispatch<E, P, C> + Send + Sync + 'static,
    {
        Self::with_config(dispatcher, &CenterConfig::default())
    }

    pub fn with_config<D>(dispatcher: D, config: &CenterConfig) -> Self
    where
        D: Dispatch<E, P, C> + Send + Sync + 'static,
    {
        Self {
            store: Arc::new(RwLock::new(RegistrationStore::new())),
            dispatcher: Arc::new(dispatcher),
            missing_name: config.missing_name,
        }
    }

    pub fn missing_name_policy(&self) -> MissingNamePolicy {
        self.missing_name
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistrationStore<E, P, C>> {
        self.store.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistrationStore<E, P, C>> {
        self.store.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Applies the missing-name policy. `Ok(None)` means "ignore the call".
    fn require_name<T>(&self, name: Option<T>, operation: &'static str) -> Result<Option<T>, CenterError> {
        match (name, self.missing_name) {
            (Some(name), _) => Ok(Some(name)),
            (None, MissingNamePolicy::Ignore) => {
                tracing::debug!(operation, "ignoring call without an event name");
                Ok(None)
            }
            (None, MissingNamePolicy::Reject) => Err(CenterError::MissingEventName),
        }
    }

    /// Registers `callback` for `observer` under `(name, payload_key)`.
    ///
    /// Returns `Ok(true)` if a new registration was created.
    ///
    /// # Errors
    ///
    /// Returns `CenterError::MissingEventName` when `name` is `None` and the
    /// center rejects such calls. Under the default policy the call is a
    /// no-op returning `Ok(false)`.
    pub fn add_observer(
        &self,
        observer: ObserverId,
        callback: C,
        name: Option<E>,
        payload_key: Option<P>,
    ) -> Result<bool, CenterError> {
        let Some(name) = self.require_name(name, "add_observer")? else {
            return Ok(false);
        };
        Ok(self
            .write()
            .add_observer(observer, callback, Some(name), payload_key))
    }

    /// Removes every callback `observer` registered under exactly
    /// `(name, payload_key)`. Returns the number of registrations removed.
    ///
    /// # Errors
    ///
    /// Same policy as [`add_observer`](Self::add_observer).
    pub fn remove_observer(
        &self,
        observer: ObserverId,
        name: Option<&E>,
        payload_key: Option<&P>,
    ) -> Result<usize, CenterError> {
        let Some(name) = self.require_name(name, "remove_observer")? else {
            return Ok(0);
        };
        Ok(self.write().remove_observer(observer, Some(name), payload_key))
    }

    /// Removes every registration `observer` holds.
    pub fn remove_observer_entirely(&self, observer: ObserverId) -> usize {
        self.write().remove_observer_entirely(observer)
    }

    /// Posts `name` with an optional payload and dispatches synchronously to
    /// every registration under it. Returns the number of dispatches.
    pub fn post(&self, name: &E, payload: Option<&P>) -> usize {
        let targets = self.read().all_registrations_for_event(name);
        if targets.is_empty() {
            return 0;
        }

        let dispatched = deliver(&targets, name, payload, self.dispatcher.as_ref());
        tracing::trace!(event = ?name, dispatched, "event posted");
        dispatched
    }

    pub fn all_event_names(&self) -> Vec<E> {
        self.read().all_event_names()
    }

    pub fn all_registrations_for_event(&self, name: &E) -> Vec<Target<P, C>> {
        self.read().all_registrations_for_event(name)
    }

    pub fn all_observer_registrations(&self) -> Vec<ObserverRegistration<E, P>> {
        self.read().all_observer_registrations()
    }

    pub fn all_event_registrations(&self) -> Vec<EventRegistration<E, P, C>> {
        self.read().all_event_registrations()
    }

    pub fn groups_for(&self, observer: ObserverId) -> Vec<(E, Option<P>)> {
        self.read().groups_for(observer)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    pub fn observer_count(&self) -> usize {
        self.read().observer_count()
    }

    pub fn snapshot(&self) -> StoreSnapshot<E> {
        self.read().snapshot()
    }

    /// Drops every registration.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Audits the registry's two indices against each other.
    ///
    /// # Errors
    ///
    /// Returns `CenterError::Registry` describing the first inconsistency.
    pub fn check_consistency(&self) -> Result<(), CenterError> {
        self.read().check_consistency()?;
        Ok(())
    }
}
