//! Error types for the registration store.

/// Inconsistencies reported by
/// [`RegistrationStore::check_consistency`](crate::RegistrationStore::check_consistency).
///
/// Registry operations themselves never fail; these only surface when an
/// audit finds the two indices disagreeing.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// A group is present in one index but not the other.
    #[error("registry index mismatch: {0}")]
    IndexMismatch(String),

    /// An empty node survived pruning.
    #[error("registry residual node: {0}")]
    ResidualNode(String),
}
