//! Bookmark store
//!
//! The `Store` is the single authoritative handle to a buku database. It
//! owns the connection and the cached bookmark count `len`, both behind one
//! mutex, so every operation runs one at a time and sees a consistent `len`.
//!
//! ## Id contiguity
//!
//! Persisted ids always form the range `1..=len`. `add` appends at `len + 1`
//! and `remove` shifts every later id down by one. Callers must treat ids as
//! positions and re-read them after a removal.
//!
//! ## Usage
//!
//! ```ignore
//! let store = Store::open("bookmarks.db")?;
//!
//! store.add(Bookmark::new("https://example.com").with_title("Example"))?;
//! store.add_tags(1, &["web".to_string()])?;
//!
//! let all = store.get_all()?; // loaded in parallel, sorted by id
//! ```

use std::fmt;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;

use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode};
use tracing::{debug, info, warn};

use crate::loader;
use crate::models::{contains_ignore_case, encode_tags, normalize_tags, sort_tags, Bookmark};
use crate::storage::error::StorageContext;
use crate::storage::schema::{self, COLUMNS};
use crate::storage::{bookmark_from_row, StoreError, StoreResult};

/// Default maximum number of bookmarks a store will hold
pub const MAX_BOOKMARKS: u16 = 1000;

/// Operations the bookmark front end consumes
///
/// Implemented by [`Store`]; front ends depend on this trait rather than on
/// the storage engine.
pub trait BookmarkStore {
    /// Number of bookmarks
    fn len(&self) -> u16;

    /// Whether the store holds no bookmarks
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get a bookmark by id
    fn get(&self, id: u16) -> StoreResult<Bookmark>;

    /// Get every bookmark, sorted by id
    fn get_all(&self) -> StoreResult<Vec<Bookmark>>;

    /// Append a bookmark, ignoring its `id`
    ///
    /// Returns `false` without touching the store when the URL is already
    /// present.
    fn add(&self, bookmark: Bookmark) -> StoreResult<bool>;

    /// Replace the title of a bookmark
    fn update_title(&self, id: u16, title: &str) -> StoreResult<()>;

    /// Replace the URL of a bookmark
    fn update_url(&self, id: u16, url: &str) -> StoreResult<()>;

    /// Replace the comment of a bookmark
    fn update_comment(&self, id: u16, comment: &str) -> StoreResult<()>;

    /// Merge tags into a bookmark's tag set
    fn add_tags(&self, id: u16, tags: &[String]) -> StoreResult<()>;

    /// Remove tags (exact match) from a bookmark's tag set
    fn remove_tags(&self, id: u16, tags: &[String]) -> StoreResult<()>;

    /// Remove every tag from a bookmark
    fn clear_tags(&self, id: u16) -> StoreResult<()>;

    /// Delete a bookmark and shift later ids down by one
    fn remove(&self, id: u16) -> StoreResult<()>;
}

/// Options for opening a [`Store`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Worker threads used by `get_all`
    pub workers: usize,
    /// Maximum number of bookmarks
    pub capacity: u16,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            capacity: MAX_BOOKMARKS,
        }
    }
}

/// Number of available processing units, at least one
pub fn default_workers() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Single-column updates
///
/// Column names only ever come from this closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Url,
    Comment,
    Tags,
}

impl Field {
    fn column(self) -> &'static str {
        match self {
            Field::Title => "metadata",
            Field::Url => "URL",
            Field::Comment => "desc",
            Field::Tags => "tags",
        }
    }
}

/// State guarded by the store lock
struct Inner {
    conn: Connection,
    len: u16,
}

/// Concurrent store over a buku bookmark database
pub struct Store {
    path: PathBuf,
    options: StoreOptions,
    inner: Mutex<Inner>,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.path)
            .field("options", &self.options)
            .field("len", &self.inner.lock().len)
            .finish()
    }
}

impl Store {
    /// Open the database at `path` with default options
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::open_with_options(path, StoreOptions::default())
    }

    /// Open the database at `path`
    ///
    /// Creates the bookmarks table if the file is new, then seeds `len` from
    /// the highest stored id (capped at `options.capacity`).
    ///
    /// `path` must name a file: `get_all` reopens it from every worker, so
    /// in-memory databases and `file:` URIs are rejected.
    pub fn open_with_options(path: impl AsRef<Path>, options: StoreOptions) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        check_file_path(&path)?;

        let conn = Connection::open(&path)
            .storage_context(&format!("failed to open database {:?}", path))?;

        if schema::needs_init(&conn) {
            schema::init_schema(&conn).storage_context("failed to create bookmarks table")?;
            info!(path = ?path, "Created bookmarks table");
        }

        let max_id = schema::max_id(&conn).storage_context("failed to get database length")?;
        let capacity = i64::from(options.capacity);
        if max_id > capacity {
            warn!(
                max_id,
                capacity, "Database holds more bookmarks than the store capacity"
            );
        }
        // Clamped into [0, capacity], which fits in u16
        let len = max_id.clamp(0, capacity) as u16;

        debug!(path = ?path, len, workers = options.workers, "Opened bookmark store");

        Ok(Self {
            path,
            options,
            inner: Mutex::new(Inner { conn, len }),
        })
    }

    /// Close the database connection
    pub fn close(self) -> StoreResult<()> {
        let inner = self.inner.into_inner();
        inner
            .conn
            .close()
            .map_err(|(_, e)| StoreError::storage("failed to close database", e))
    }

    /// Path of the database file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Options the store was opened with
    pub fn options(&self) -> StoreOptions {
        self.options
    }

    fn update_field(&self, id: u16, field: Field, value: &str) -> StoreResult<()> {
        let inner = self.inner.lock();
        check_range(id, inner.len)?;
        write_field(&inner.conn, id, field, value)?;
        info!(id, field = field.column(), "Updated bookmark");
        Ok(())
    }
}

impl BookmarkStore for Store {
    fn len(&self) -> u16 {
        self.inner.lock().len
    }

    fn get(&self, id: u16) -> StoreResult<Bookmark> {
        let inner = self.inner.lock();
        check_range(id, inner.len)?;
        fetch(&inner.conn, id)
    }

    fn get_all(&self) -> StoreResult<Vec<Bookmark>> {
        // Held for the whole load so no mutation interleaves with the workers
        let inner = self.inner.lock();
        loader::load_all(&self.path, inner.len, self.options.workers)
    }

    fn add(&self, bookmark: Bookmark) -> StoreResult<bool> {
        if bookmark.url.is_empty() {
            return Err(StoreError::EmptyUrl);
        }

        let mut inner = self.inner.lock();
        if inner.len >= self.options.capacity {
            return Err(StoreError::CapacityExceeded {
                max: self.options.capacity,
            });
        }

        let id = inner.len + 1;
        let tags = normalize_tags(bookmark.tags);
        let result = inner.conn.execute(
            "INSERT INTO bookmarks (id, URL, metadata, tags, desc, flags) VALUES (?1, ?2, ?3, ?4, ?5, 0)",
            params![id, bookmark.url, bookmark.title, encode_tags(&tags), bookmark.comment],
        );

        match result {
            Ok(_) => {
                inner.len = id;
                info!(id, url = %bookmark.url, "Added bookmark");
                Ok(true)
            }
            Err(e) if is_duplicate_url(&e) => {
                debug!(url = %bookmark.url, "Bookmark URL already stored");
                Ok(false)
            }
            Err(e) => Err(StoreError::storage("failed to insert bookmark", e)),
        }
    }

    fn update_title(&self, id: u16, title: &str) -> StoreResult<()> {
        self.update_field(id, Field::Title, title)
    }

    fn update_url(&self, id: u16, url: &str) -> StoreResult<()> {
        if url.is_empty() {
            return Err(StoreError::EmptyUrl);
        }
        self.update_field(id, Field::Url, url)
    }

    fn update_comment(&self, id: u16, comment: &str) -> StoreResult<()> {
        self.update_field(id, Field::Comment, comment)
    }

    fn add_tags(&self, id: u16, tags: &[String]) -> StoreResult<()> {
        let inner = self.inner.lock();
        check_range(id, inner.len)?;

        let mut current = fetch(&inner.conn, id)?.tags;
        for tag in normalize_tags(tags.iter().cloned()) {
            if !contains_ignore_case(&current, &tag) {
                current.push(tag);
            }
        }
        sort_tags(&mut current);

        write_field(&inner.conn, id, Field::Tags, &encode_tags(&current))?;
        info!(id, tags = current.len(), "Added tags");
        Ok(())
    }

    fn remove_tags(&self, id: u16, tags: &[String]) -> StoreResult<()> {
        let inner = self.inner.lock();
        check_range(id, inner.len)?;

        let mut current = fetch(&inner.conn, id)?.tags;
        current.retain(|t| !tags.contains(t));

        write_field(&inner.conn, id, Field::Tags, &encode_tags(&current))?;
        info!(id, tags = current.len(), "Removed tags");
        Ok(())
    }

    fn clear_tags(&self, id: u16) -> StoreResult<()> {
        self.update_field(id, Field::Tags, &encode_tags(&[]))
    }

    fn remove(&self, id: u16) -> StoreResult<()> {
        let mut inner = self.inner.lock();
        let len = inner.len;
        check_range(id, len)?;

        // Dropping the transaction on an early return rolls everything back,
        // leaving both the file and `len` untouched.
        let tx = inner
            .conn
            .transaction()
            .storage_context("failed to begin remove")?;

        tx.execute("DELETE FROM bookmarks WHERE id = ?1", [id])
            .storage_context("failed to delete bookmark")?;

        // Shift id + 1..=len down one; written from the low side so the
        // bound never exceeds `len`
        for new in id..len {
            tx.execute(
                "UPDATE bookmarks SET id = ?1 WHERE id = ?2",
                [new, new + 1],
            )
            .storage_context("failed to update bookmark id")?;
        }

        tx.commit().storage_context("failed to commit remove")?;
        inner.len = len - 1;

        info!(id, len = inner.len, "Removed bookmark");
        Ok(())
    }
}

fn check_file_path(path: &Path) -> StoreResult<()> {
    let raw = path.to_string_lossy();
    if raw.is_empty() || raw == ":memory:" || raw.starts_with("file:") {
        return Err(StoreError::UnsupportedPath {
            path: raw.into_owned(),
        });
    }
    Ok(())
}

fn check_range(id: u16, len: u16) -> StoreResult<()> {
    if id < 1 || id > len {
        return Err(StoreError::OutOfRange { id, len });
    }
    Ok(())
}

fn fetch(conn: &Connection, id: u16) -> StoreResult<Bookmark> {
    conn.query_row(
        &format!("SELECT {} FROM bookmarks WHERE id = ?1", COLUMNS),
        [id],
        bookmark_from_row,
    )
    .storage_context("failed to scan bookmark")
}

fn write_field(conn: &Connection, id: u16, field: Field, value: &str) -> StoreResult<()> {
    conn.execute(
        &format!("UPDATE bookmarks SET {} = ?1 WHERE id = ?2", field.column()),
        params![value, id],
    )
    .map(|_| ())
    .storage_context(&format!("failed to update field {}", field.column()))
}

fn is_duplicate_url(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
        }
        _ => false,
    }
}
