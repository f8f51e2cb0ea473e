//! Shared identity and record types for the Herald registry.
//!
//! Every other Herald crate depends on these definitions: the observer
//! identity handle, the key bound used for event names, payload keys and
//! callback identifiers, and the flat registration records returned by
//! the introspection queries.
//!
//! Observers are compared by identity, never by value. Callers mint an
//! [`ObserverId`] per subscriber instance and keep their own mapping from
//! id to object; the registry only ever holds the id, so it never extends
//! the lifetime of the caller's objects.

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod record;
pub use record::{EventRegistration, Notification, ObserverRegistration, Target};

/// Identity handle for a subscriber.
///
/// Two distinct subscribers with identical contents get distinct ids, so
/// registrations made under one are invisible to the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObserverId(Uuid);

impl ObserverId {
    /// Mints a fresh, random identity.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Builds an identity from a fixed value. Intended for tests and tools
    /// that need reproducible ids.
    pub fn from_u128(value: u128) -> Self {
        Self(Uuid::from_u128(value))
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ObserverId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObserverId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bound shared by event names, payload keys and callback identifiers.
///
/// All three are compared and hashed by value. Blanket implemented, so
/// `String`, `&'static str`, integers and small enums qualify as-is.
pub trait RegistryKey: Eq + Hash + Clone + Debug {}

impl<T: Eq + Hash + Clone + Debug> RegistryKey for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_distinct() {
        let a = ObserverId::new();
        let b = ObserverId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn fixed_ids_compare_equal() {
        assert_eq!(ObserverId::from_u128(7), ObserverId::from_u128(7));
        assert_ne!(ObserverId::from_u128(7), ObserverId::from_u128(8));
    }

    #[test]
    fn observer_id_serializes_as_plain_uuid() {
        let id = ObserverId::from_u128(1);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"00000000-0000-0000-0000-000000000001\"");
        let back: ObserverId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn target_exposes_scope() {
        let unscoped: Target<&str, u8> = Target {
            observer: ObserverId::from_u128(1),
            payload_key: None,
            callback: 3,
        };
        assert!(!unscoped.is_scoped());

        let scoped = Target {
            payload_key: Some("obj"),
            ..unscoped.clone()
        };
        assert!(scoped.is_scoped());
    }
}
