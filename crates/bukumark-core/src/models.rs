//! Data models for bukumark
//!
//! Defines the `Bookmark` record and the helpers that keep its tag set in
//! the shape the buku database expects.

use serde::{Deserialize, Serialize};

/// Delimiter used inside the `tags` column
pub const TAG_DELIMITER: char = ',';

/// A single bookmark record
///
/// The `id` is positional: it always lies in `[1, N]` and shifts down when an
/// earlier bookmark is removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Bookmark {
    /// Position of the bookmark in the store (1-based)
    pub id: u16,
    /// The URL
    pub url: String,
    /// Title, empty when unset
    #[serde(default)]
    pub title: String,
    /// Tags, deduplicated and sorted case-insensitively
    #[serde(default)]
    pub tags: Vec<String>,
    /// Free-text comment, empty when unset
    #[serde(default)]
    pub comment: String,
}

impl Bookmark {
    /// Create a new bookmark with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Set the title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the comment
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Set the tags, normalizing them
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = normalize_tags(tags);
        self
    }

    /// Title to show to a user, falling back to the URL when unset
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            &self.url
        } else {
            &self.title
        }
    }
}

/// Normalize a tag list
///
/// Trims each tag, splits on the column delimiter, drops empty entries,
/// removes case-insensitive duplicates (the first spelling wins) and sorts
/// case-insensitively.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag: String = tag.into();
        for part in tag.split(TAG_DELIMITER) {
            let part = part.trim();
            if part.is_empty() || contains_ignore_case(&out, part) {
                continue;
            }
            out.push(part.to_string());
        }
    }
    sort_tags(&mut out);
    out
}

/// Sort tags case-insensitively (stable)
pub fn sort_tags(tags: &mut [String]) {
    tags.sort_by_cached_key(|t| t.to_lowercase());
}

/// Case-insensitive membership test
pub fn contains_ignore_case(tags: &[String], tag: &str) -> bool {
    let needle = tag.to_lowercase();
    tags.iter().any(|t| t.to_lowercase() == needle)
}

/// Encode tags in the wrapped column format (`,a,b,`)
///
/// The empty set encodes to a lone delimiter.
pub fn encode_tags(tags: &[String]) -> String {
    if tags.is_empty() {
        return TAG_DELIMITER.to_string();
    }
    format!(
        "{d}{}{d}",
        tags.join(&TAG_DELIMITER.to_string()),
        d = TAG_DELIMITER
    )
}

/// Decode the `tags` column, dropping empty entries
pub fn decode_tags(column: &str) -> Vec<String> {
    column
        .split(TAG_DELIMITER)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookmark_new() {
        let b = Bookmark::new("https://example.com");
        assert_eq!(b.id, 0);
        assert_eq!(b.url, "https://example.com");
        assert!(b.title.is_empty());
        assert!(b.tags.is_empty());
        assert!(b.comment.is_empty());
    }

    #[test]
    fn test_display_title_falls_back_to_url() {
        let b = Bookmark::new("https://example.com");
        assert_eq!(b.display_title(), "https://example.com");

        let b = b.with_title("Example");
        assert_eq!(b.display_title(), "Example");
    }

    #[test]
    fn test_normalize_dedups_case_insensitively() {
        let tags = normalize_tags(["a", "a", "A"]);
        assert_eq!(tags, vec!["a"]);
    }

    #[test]
    fn test_normalize_sorts_case_insensitively() {
        let tags = normalize_tags(["rust", "Zig", "go", "C"]);
        assert_eq!(tags, vec!["C", "go", "rust", "Zig"]);
    }

    #[test]
    fn test_normalize_drops_empty_and_splits_delimiters() {
        let tags = normalize_tags(["", "  ", " web ", "a,b", ",,"]);
        assert_eq!(tags, vec!["a", "b", "web"]);
    }

    #[test]
    fn test_encode_tags() {
        assert_eq!(encode_tags(&[]), ",");
        assert_eq!(
            encode_tags(&["tag1".to_string(), "tag2".to_string()]),
            ",tag1,tag2,"
        );
    }

    #[test]
    fn test_decode_tags() {
        assert!(decode_tags(",").is_empty());
        assert!(decode_tags("").is_empty());
        assert_eq!(decode_tags(",a,tag2,tag3,"), vec!["a", "tag2", "tag3"]);
        // Unwrapped values written by older tools still decode
        assert_eq!(decode_tags("a,b"), vec!["a", "b"]);
    }

    #[test]
    fn test_bookmark_serialization() {
        let b = Bookmark::new("https://example.com")
            .with_title("Example")
            .with_tags(["web"])
            .with_comment("note");
        let json = serde_json::to_string(&b).unwrap();
        let deserialized: Bookmark = serde_json::from_str(&json).unwrap();
        assert_eq!(b, deserialized);
    }
}
