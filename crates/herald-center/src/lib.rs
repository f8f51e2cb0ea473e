//! Shared notification center for the Herald registry.
//!
//! Wraps a [`RegistrationStore`](herald_registry::RegistrationStore) behind
//! a read-write lock so observers and publishers on different threads can
//! use one registry, and pairs it with the caller's
//! [`Dispatch`] implementation.
//!
//! Also hosts the ambient pieces the `herald-soak` binary needs:
//! configuration loading, tracing setup and the randomised soak workload.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! use herald_center::{Dispatch, NotificationCenter};
//! use herald_types::{Notification, ObserverId, Target};
//!
//! #[derive(Clone, Default)]
//! struct Counter(Arc<AtomicUsize>);
//!
//! impl Dispatch<String, String, u8> for Counter {
//!     fn dispatch(&self, _: &Target<String, u8>, _: Notification<'_, String, String>) {
//!         self.0.fetch_add(1, Ordering::SeqCst);
//!     }
//! }
//!
//! let counter = Counter::default();
//! let center: NotificationCenter<String, String, u8> = NotificationCenter::new(counter.clone());
//! let observer = ObserverId::new();
//!
//! center.add_observer(observer, 1, Some("chirp".to_string()), None).unwrap();
//! center.post(&"chirp".to_string(), None);
//! assert_eq!(counter.0.load(Ordering::SeqCst), 1);
//! ```

pub mod center;
pub mod config;
pub mod error;
pub mod logging;
pub mod soak;

pub use center::NotificationCenter;
pub use config::{load_config, CenterConfig, Config, ConfigError, LoggingConfig, MissingNamePolicy, SoakConfig};
pub use error::CenterError;
pub use herald_registry::{Dispatch, RegistryError, StoreSnapshot};
pub use soak::{run_soak, SoakReport};

#[cfg(test)]
mod tests;
