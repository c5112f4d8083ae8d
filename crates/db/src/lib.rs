//! Storage layer: the key/value store seam, its backends, and the typed
//! repositories the engine uses on top of it.

pub mod error;
pub mod keys;
pub mod memory;
pub mod postgres;
pub mod repositories;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::KeyValueStore;

use std::sync::Arc;

/// Shared handle to whichever backend the process runs with.
pub type SharedStore = Arc<dyn KeyValueStore>;
