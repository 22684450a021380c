//! bukumark Core Library
//!
//! This crate provides a concurrent store over buku bookmark databases.
//!
//! # Architecture
//!
//! - **SQLite**: the buku `bookmarks` table is the only persisted state
//! - **Store**: one mutex guards the connection and the cached bookmark
//!   count, so mutations run one at a time
//! - **Loader**: reading every bookmark fans out across worker threads,
//!   one id partition each
//!
//! Bookmark ids are positions: they always form the range `1..=len`.
//!
//! # Quick Start
//!
//! ```text
//! let store = Store::open(config.db_path)?;
//!
//! store.add(Bookmark::new("https://example.com").with_title("Example"))?;
//! let bookmarks = store.get_all()?;
//! ```
//!
//! # Modules
//!
//! - `store`: the `Store` and the `BookmarkStore` trait (main entry point)
//! - `loader`: partitioned parallel loading
//! - `models`: the `Bookmark` record and tag helpers
//! - `storage`: schema, row decoding and errors
//! - `config`: application configuration

pub mod config;
pub mod loader;
pub mod models;
pub mod storage;
pub mod store;

pub use config::Config;
pub use models::Bookmark;
pub use storage::{StoreError, StoreResult};
pub use store::{BookmarkStore, Store, StoreOptions, MAX_BOOKMARKS};
