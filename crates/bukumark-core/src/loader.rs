//! Parallel bulk loader
//!
//! Splits the id space `[1, N]` into contiguous partitions, one per worker,
//! and loads them concurrently. Each worker opens its own read-only
//! connection to the database file and inserts decoded rows into a shared
//! map. The result is sorted by id, so worker completion order never shows.

use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::Path;
use std::thread;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OpenFlags};
use tracing::{debug, warn};

use crate::models::Bookmark;
use crate::storage::error::StorageContext;
use crate::storage::schema::COLUMNS;
use crate::storage::{bookmark_from_row, StoreResult};

/// Split `[1, len]` into at most `workers` contiguous partitions
///
/// Every partition except possibly the last holds `ceil(len / workers)` ids.
/// Partitions that would start past `len` are dropped, so the result tiles
/// `[1, len]` exactly with no gaps or overlaps.
pub fn partition(len: u16, workers: usize) -> Vec<RangeInclusive<u16>> {
    let len = usize::from(len);
    if len == 0 {
        return Vec::new();
    }

    let workers = workers.max(1);
    let per_worker = len.div_ceil(workers);

    (0..workers)
        .map(|i| (i * per_worker + 1, ((i + 1) * per_worker).min(len)))
        .filter(|(start, end)| start <= end)
        // Both bounds are <= len, which came from a u16
        .map(|(start, end)| start as u16..=end as u16)
        .collect()
}

/// Load bookmarks `[1, len]` from the database at `path`
///
/// Waits for every worker before returning. If any partition fails, the
/// first failure in partition order is returned and everything loaded so
/// far is discarded.
pub fn load_all(path: &Path, len: u16, workers: usize) -> StoreResult<Vec<Bookmark>> {
    let partitions = partition(len, workers);
    if partitions.is_empty() {
        return Ok(Vec::new());
    }

    debug!(
        len,
        workers = partitions.len(),
        "Loading bookmarks in parallel"
    );

    let loaded = Mutex::new(HashMap::with_capacity(usize::from(len)));

    let results: Vec<StoreResult<()>> = thread::scope(|scope| {
        let handles: Vec<_> = partitions
            .into_iter()
            .map(|range| {
                let loaded = &loaded;
                scope.spawn(move || load_range(path, range, loaded))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    });

    if let Some(err) = results.into_iter().find_map(Result::err) {
        warn!(error = %err, "Parallel load failed");
        return Err(err);
    }

    let mut bookmarks: Vec<Bookmark> = loaded.into_inner().into_values().collect();
    bookmarks.sort_by_key(|b| b.id);

    if bookmarks.len() != usize::from(len) {
        warn!(
            expected = len,
            found = bookmarks.len(),
            "Loaded fewer bookmarks than the store length"
        );
    }

    Ok(bookmarks)
}

/// Load one partition into the shared map
fn load_range(
    path: &Path,
    range: RangeInclusive<u16>,
    loaded: &Mutex<HashMap<u16, Bookmark>>,
) -> StoreResult<()> {
    let (start, end) = range.into_inner();
    let context = format!("failed to query bookmarks in range ({}-{})", start, end);

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .storage_context(&context)?;

    let mut stmt = conn
        .prepare(&format!(
            "SELECT {} FROM bookmarks WHERE id BETWEEN ?1 AND ?2",
            COLUMNS
        ))
        .storage_context(&context)?;
    let rows = stmt
        .query_map(params![start, end], bookmark_from_row)
        .storage_context(&context)?;

    for row in rows {
        let bookmark = row.storage_context("failed to scan bookmark")?;
        loaded.lock().insert(bookmark.id, bookmark);
    }

    Ok(())
}
