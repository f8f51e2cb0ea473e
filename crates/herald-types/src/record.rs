//! Flat registration records and the dispatch envelope.

use serde::Serialize;

use crate::ObserverId;

/// One dispatch target under an event name: who to call, under which
/// payload scope, and with which callback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Target<P, C> {
    /// The registered observer.
    pub observer: ObserverId,
    /// The payload scope of the registration. `None` means "any payload".
    pub payload_key: Option<P>,
    /// The opaque callback identifier to invoke.
    pub callback: C,
}

impl<P, C> Target<P, C> {
    /// Returns `true` if the registration was scoped to a concrete payload.
    pub fn is_scoped(&self) -> bool {
        self.payload_key.is_some()
    }
}

/// One `(observer, event name, payload key)` group as seen from the
/// by-observer side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ObserverRegistration<E, P> {
    pub observer: ObserverId,
    pub name: E,
    pub payload_key: Option<P>,
}

/// A complete registration as seen from the by-event side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EventRegistration<E, P, C> {
    pub observer: ObserverId,
    pub callback: C,
    pub name: E,
    pub payload_key: Option<P>,
}

impl<E, P, C> EventRegistration<E, P, C> {
    /// Drops the callback, leaving the group this registration belongs to.
    pub fn group(self) -> ObserverRegistration<E, P> {
        ObserverRegistration {
            observer: self.observer,
            name: self.name,
            payload_key: self.payload_key,
        }
    }
}

/// A posted event as handed to the dispatcher.
#[derive(Debug, PartialEq, Eq)]
pub struct Notification<'a, E, P> {
    /// The event name that was posted.
    pub name: &'a E,
    /// The payload object supplied by the publisher, if any.
    pub payload: Option<&'a P>,
}

// Manual impls: a derive would demand `E: Copy` and `P: Copy`.
impl<E, P> Clone for Notification<'_, E, P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, P> Copy for Notification<'_, E, P> {}
