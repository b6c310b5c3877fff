//! # Persistence
//!
//! Thin glue between documents and a collection of flat data:
//! - `Collection`: storage trait (insert, update, find, remove)
//! - `MemoryCollection`: in-memory collection
//! - `Store`: validate-then-write, hydration on reads, operation logging
//!
//! No database protocol lives here; a real backend implements `Collection`.

mod collection;
mod config;
mod errors;
mod store;

pub use collection::{matches, Collection, MemoryCollection, ID_KEY};
pub use config::StoreConfig;
pub use errors::{StoreError, StoreResult};
pub use store::{PersistedDocument, Store};
