//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use bukumark_core::Bookmark;

/// Longest line printed for a single entry in human output
const ENTRY_MAX_LEN: usize = 100;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Print a single bookmark
    pub fn print_bookmark(&self, bookmark: &Bookmark) {
        match self.format {
            OutputFormat::Human => {
                for line in detail_lines(bookmark) {
                    println!("{}", line);
                }
            }
            OutputFormat::Json => {
                println!("{}", to_json(bookmark));
            }
            OutputFormat::Quiet => {
                println!("{}", bookmark.url);
            }
        }
    }

    /// Print a list of bookmarks
    pub fn print_bookmarks(&self, bookmarks: &[Bookmark]) {
        match self.format {
            OutputFormat::Human => {
                if bookmarks.is_empty() {
                    println!("No bookmarks found.");
                    return;
                }
                for bookmark in bookmarks {
                    println!("{}", list_line(bookmark));
                }
                println!("\n{} bookmark(s)", bookmarks.len());
            }
            OutputFormat::Json => {
                println!("{}", to_json(bookmarks));
            }
            OutputFormat::Quiet => {
                for bookmark in bookmarks {
                    println!("{}", bookmark.id);
                }
            }
        }
    }

    /// Print a list of tags with usage counts
    pub fn print_tags(&self, tags: &[(String, usize)]) {
        match self.format {
            OutputFormat::Human => {
                if tags.is_empty() {
                    println!("No tags found.");
                    return;
                }
                for (name, count) in tags {
                    println!("{} ({})", name, count);
                }
                println!("\n{} tag(s)", tags.len());
            }
            OutputFormat::Json => {
                let json_tags: Vec<_> = tags
                    .iter()
                    .map(|(name, count)| serde_json::json!({"name": name, "count": count}))
                    .collect();
                println!("{}", to_json(&json_tags));
            }
            OutputFormat::Quiet => {
                for (name, _) in tags {
                    println!("{}", name);
                }
            }
        }
    }

    /// Print the number of bookmarks
    pub fn print_count(&self, count: u16) {
        match self.format {
            OutputFormat::Json => println!("{}", serde_json::json!({ "count": count })),
            _ => println!("{}", count),
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| {
        serde_json::json!({"status": "error", "message": e.to_string()}).to_string()
    })
}

/// One-line summary used in lists
///
/// `N. title | tags url`. The url is left out of the trailer when it is
/// already shown in place of a missing title.
fn list_line(bookmark: &Bookmark) -> String {
    let mut meta = bookmark.tags.join(" ");
    if !bookmark.title.is_empty() {
        if !meta.is_empty() {
            meta.push(' ');
        }
        meta.push_str(&clean_url(&bookmark.url));
    }

    let mut line = format!("{}. {}", bookmark.id, bookmark.display_title());
    if !meta.is_empty() {
        line.push_str(" | ");
        line.push_str(&meta);
    }
    entry_text(&line)
}

/// Url without its scheme or a leading `www.`
fn clean_url(url: &str) -> &str {
    let rest = url.split_once("://").map_or(url, |(_, rest)| rest);
    rest.strip_prefix("www.").unwrap_or(rest)
}

/// Field-per-line detail view
fn detail_lines(bookmark: &Bookmark) -> Vec<String> {
    let comment = if bookmark.comment.is_empty() {
        "(Comment)".to_string()
    } else {
        bookmark.comment.clone()
    };
    let tags = if bookmark.tags.is_empty() {
        "(Tags)".to_string()
    } else {
        bookmark.tags.join(", ")
    };

    vec![
        entry_text(&format!("{}. {}", bookmark.id, bookmark.display_title())),
        entry_text(&format!("> {}", bookmark.url)),
        entry_text(&format!("+ {}", comment)),
        entry_text(&format!("# {}", tags)),
    ]
}

/// Single-line, length-limited entry text
fn entry_text(s: &str) -> String {
    truncate(&s.replace('\n', " "), ENTRY_MAX_LEN)
}

/// Truncate a string to max characters, adding "..." if truncated
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
