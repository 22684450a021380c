//! Tag command handlers

use std::collections::BTreeMap;

use anyhow::{Context, Result};

use bukumark_core::{Bookmark, BookmarkStore};

use crate::output::Output;

/// Merge tags into a bookmark
pub fn add<S: BookmarkStore + ?Sized>(
    store: &S,
    id: u16,
    tags: Vec<String>,
    output: &Output,
) -> Result<()> {
    store.add_tags(id, &tags).context("Failed to add tags")?;
    output.success(&format!("Tagged bookmark {}", id));
    output.print_bookmark(&store.get(id)?);
    Ok(())
}

/// Remove tags from a bookmark
pub fn remove<S: BookmarkStore + ?Sized>(
    store: &S,
    id: u16,
    tags: Vec<String>,
    output: &Output,
) -> Result<()> {
    store.remove_tags(id, &tags).context("Failed to remove tags")?;
    output.success(&format!("Untagged bookmark {}", id));
    output.print_bookmark(&store.get(id)?);
    Ok(())
}

/// Remove every tag from a bookmark
pub fn clear<S: BookmarkStore + ?Sized>(store: &S, id: u16, output: &Output) -> Result<()> {
    store.clear_tags(id).context("Failed to clear tags")?;
    output.success(&format!("Cleared tags on bookmark {}", id));
    Ok(())
}

/// List all tags with usage counts
pub fn list<S: BookmarkStore + ?Sized>(store: &S, output: &Output) -> Result<()> {
    let bookmarks = store.get_all().context("Failed to load bookmarks")?;
    output.print_tags(&tag_counts(&bookmarks));
    Ok(())
}

/// Count tag usage across bookmarks
///
/// Tags differing only in case are counted together under the first
/// spelling seen. The result is sorted case-insensitively.
fn tag_counts(bookmarks: &[Bookmark]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<String, (String, usize)> = BTreeMap::new();
    for tag in bookmarks.iter().flat_map(|b| &b.tags) {
        counts
            .entry(tag.to_lowercase())
            .or_insert_with(|| (tag.clone(), 0))
            .1 += 1;
    }
    counts.into_values().collect()
}
