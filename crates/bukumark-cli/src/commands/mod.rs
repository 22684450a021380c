//! Command handlers
//!
//! Handlers take any [`bukumark_core::BookmarkStore`], never the concrete
//! store, so they only see the operations the store exposes.

pub mod bookmark;
pub mod config;
pub mod tag;
