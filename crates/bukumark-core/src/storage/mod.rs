//! Storage layer
//!
//! Everything that knows about the buku SQLite layout: the schema, row
//! decoding and the typed store errors.

pub mod error;
pub mod schema;

use rusqlite::Row;

use crate::models::{decode_tags, Bookmark};

pub use error::{StoreError, StoreResult};
pub use schema::{init_schema, needs_init};

/// Decode a row selected with [`schema::COLUMNS`]
///
/// `metadata`, `tags` and `desc` carry SQL defaults but may still be NULL in
/// files written by other tools.
pub(crate) fn bookmark_from_row(row: &Row<'_>) -> rusqlite::Result<Bookmark> {
    let tags: Option<String> = row.get(3)?;
    Ok(Bookmark {
        id: row.get(0)?,
        url: row.get(1)?,
        title: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
        tags: decode_tags(tags.as_deref().unwrap_or_default()),
        comment: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
    })
}
