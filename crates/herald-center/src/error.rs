//! Error types for the shared notification center.

use herald_registry::RegistryError;

/// Errors surfaced by [`NotificationCenter`](crate::NotificationCenter).
#[derive(Debug, thiserror::Error)]
pub enum CenterError {
    /// A registration call arrived without an event name while the center
    /// runs under [`MissingNamePolicy::Reject`](crate::MissingNamePolicy::Reject).
    #[error("center rejected call without an event name")]
    MissingEventName,

    /// The registry failed a consistency audit.
    #[error("center registry error: {0}")]
    Registry(#[from] RegistryError),
}
