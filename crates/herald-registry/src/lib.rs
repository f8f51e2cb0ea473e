//! In-memory registration store for the Herald publish/subscribe registry.
//!
//! Observers register interest in named events, optionally scoped to one
//! payload key, together with an opaque callback identifier. Publishers
//! post an event by name and every registration under that name is handed
//! to a caller-supplied [`Dispatch`] implementation.
//!
//! # Indices
//!
//! | Index | Shape | Answers |
//! |-------|-------|---------|
//! | [`ByEventIndex`] | name → observer → payload key → callbacks | `post`, per-event listings |
//! | [`ByObserverIndex`] | observer → {(name, payload key)} | removing an observer entirely |
//!
//! Both are only ever mutated together, through [`RegistrationStore`].
//! Empty nodes are pruned bottom-up on every removal, so an event name is
//! listed if and only if something is registered under it.
//!
//! # Usage
//!
//! ```rust
//! use herald_registry::{Dispatch, RegistrationStore};
//! use herald_types::{Notification, ObserverId, Target};
//!
//! struct Print;
//!
//! impl Dispatch<&'static str, u32, &'static str> for Print {
//!     fn dispatch(&self, target: &Target<u32, &'static str>, note: Notification<'_, &'static str, u32>) {
//!         println!("{} -> {} ({:?})", note.name, target.callback, note.payload);
//!     }
//! }
//!
//! let mut store: RegistrationStore<&str, u32, &str> = RegistrationStore::new();
//! let observer = ObserverId::new();
//! store.add_observer(observer, "on_chirp", Some("chirp"), None);
//!
//! assert_eq!(store.post(&"chirp", Some(&7), &Print), 1);
//! assert_eq!(store.post(&"other", None, &Print), 0);
//! ```

mod by_event;
mod by_observer;
mod dispatch;
mod error;
mod store;

pub use by_event::ByEventIndex;
pub use by_observer::ByObserverIndex;
pub use dispatch::Dispatch;
pub use error::RegistryError;
pub use store::{deliver, RegistrationStore, StoreSnapshot};
