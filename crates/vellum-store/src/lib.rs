//! Key-value persistence port for the Vellum CMS engine.
//!
//! This crate provides a [`KvStore`] trait for abstracting the persistence
//! medium behind the content stores. Each collection (pages, menus, settings,
//! ...) is a JSON-serialized value under a fixed string key, overwritten as a
//! whole on every save. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Backend flexibility** (local files, embedded databases, remote stores)
//! - **Clean separation** between content logic and I/O operations
//!
//! # Architecture
//!
//! The crate provides:
//! - [`KvStore`] trait with `get_raw()`, `set_raw()`, `remove()`, and `keys()`
//! - [`KvStoreExt`] for typed JSON access over any `KvStore`
//! - [`FsStore`] implementation storing one JSON file per key
//! - [`MemoryStore`] for testing
//! - [`keys`] with the fixed storage-key constants
//!
//! # Example
//!
//! ```ignore
//! use std::path::PathBuf;
//! use vellum_store::{FsStore, KvStoreExt, keys};
//!
//! let store = FsStore::new(PathBuf::from(".vellum/data"));
//! store.set_json(keys::SETTINGS, &settings)?;
//! ```

mod fs;
pub mod keys;
mod memory;
mod store;

pub use fs::FsStore;
pub use memory::MemoryStore;
pub use store::{KvStore, KvStoreExt, StoreError, StoreErrorKind};
