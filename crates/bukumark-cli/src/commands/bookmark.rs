//! Bookmark command handlers

use anyhow::{bail, Context, Result};

use bukumark_core::{Bookmark, BookmarkStore};

use crate::browser::open_url;
use crate::output::Output;
use crate::prompt::{confirm, prompt_with_default, CLEAR_TOKEN};

/// List all bookmarks, optionally filtered by tag
pub fn list<S: BookmarkStore + ?Sized>(
    store: &S,
    tag: Option<String>,
    output: &Output,
) -> Result<()> {
    let mut bookmarks = store.get_all().context("Failed to load bookmarks")?;
    if let Some(ref tag) = tag {
        bookmarks.retain(|b| b.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)));
    }

    output.print_bookmarks(&bookmarks);
    Ok(())
}

/// Show a single bookmark
pub fn show<S: BookmarkStore + ?Sized>(store: &S, id: u16, output: &Output) -> Result<()> {
    let bookmark = store.get(id)?;
    output.print_bookmark(&bookmark);
    Ok(())
}

/// Add a new bookmark
pub fn add<S: BookmarkStore + ?Sized>(
    store: &S,
    url: String,
    title: Option<String>,
    comment: Option<String>,
    tags: Vec<String>,
    output: &Output,
) -> Result<()> {
    let url = url.trim().to_string();
    if url.is_empty() {
        bail!("URL must not be empty");
    }

    let bookmark = Bookmark::new(&url)
        .with_title(title.unwrap_or_default())
        .with_comment(comment.unwrap_or_default())
        .with_tags(tags);

    if !store.add(bookmark).context("Failed to add bookmark")? {
        output.message(&format!("Already bookmarked: {}", url));
        return Ok(());
    }

    let id = store.len();
    output.success(&format!("Added bookmark {}", id));
    output.print_bookmark(&store.get(id)?);
    Ok(())
}

/// Edit a bookmark
///
/// Without any field flags, prompts for each field interactively.
pub fn edit<S: BookmarkStore + ?Sized>(
    store: &S,
    id: u16,
    title: Option<String>,
    url: Option<String>,
    comment: Option<String>,
    output: &Output,
) -> Result<()> {
    let current = store.get(id)?;

    let (title, url, comment) = if title.is_none() && url.is_none() && comment.is_none() {
        println!("Editing bookmark {}", id);
        println!(
            "Press Enter to keep current value, type '{}' to clear it, or type new value.\n",
            CLEAR_TOKEN
        );
        (
            prompt_with_default("Title", &current.title)?,
            prompt_with_default("URL", &current.url)?,
            prompt_with_default("Comment", &current.comment)?,
        )
    } else {
        (title, url, comment)
    };

    let title = title.filter(|t| *t != current.title);
    let url = url
        .map(|u| u.trim().to_string())
        .filter(|u| *u != current.url);
    let comment = comment.filter(|c| *c != current.comment);

    if title.is_none() && url.is_none() && comment.is_none() {
        output.message("No changes.");
        return Ok(());
    }

    if let Some(title) = title {
        store.update_title(id, &title).context("Failed to update title")?;
    }
    if let Some(url) = url {
        store.update_url(id, &url).context("Failed to update URL")?;
    }
    if let Some(comment) = comment {
        store
            .update_comment(id, &comment)
            .context("Failed to update comment")?;
    }

    output.success("Bookmark updated");
    output.print_bookmark(&store.get(id)?);
    Ok(())
}

/// Delete a bookmark
///
/// Later bookmarks move down by one id.
pub fn remove<S: BookmarkStore + ?Sized>(
    store: &S,
    id: u16,
    yes: bool,
    output: &Output,
) -> Result<()> {
    let bookmark = store.get(id)?;

    if !yes && output.should_prompt() {
        println!("Delete bookmark: {}. {}", bookmark.id, bookmark.display_title());
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    store.remove(id).context("Failed to delete bookmark")?;
    output.success(&format!("Deleted bookmark {}: {}", id, bookmark.url));
    Ok(())
}

/// Open a bookmark in the browser
pub fn open<S: BookmarkStore + ?Sized>(
    store: &S,
    id: u16,
    browser: Option<&str>,
    output: &Output,
) -> Result<()> {
    let bookmark = store.get(id)?;
    open_url(&bookmark.url, browser)?;
    output.success(&format!("Opened {}", bookmark.url));
    Ok(())
}

/// Print the number of bookmarks
pub fn count<S: BookmarkStore + ?Sized>(store: &S, output: &Output) -> Result<()> {
    output.print_count(store.len());
    Ok(())
}
