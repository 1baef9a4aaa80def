//! Sentiscope Store
//!
//! Keyed storage of search queries, their comment sets and cached
//! analytics, plus platform credentials and alert preferences.
//!
//! Backends:
//! - [`MemoryStore`]: process memory, used by tests and one-shot runs
//! - [`FileStore`]: JSON and JSON-lines files under a data directory

pub mod config;
pub mod file;
pub mod memory;
pub mod store;

pub use config::{open_store, StoreBackend, StoreSettings};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use store::{
    configured_platforms, paginate, AlertPreferences, CommentListing, PageRequest, SearchSnapshot, SearchStore,
};
