//! SQLite schema of a buku bookmark database
//!
//! The layout is owned by buku; bukumark only creates the table when the
//! file is new and never migrates it.

use rusqlite::{Connection, OptionalExtension, Result};

/// Name of the bookmarks table
pub const TABLE: &str = "bookmarks";

/// Columns read for every bookmark, in row order
pub const COLUMNS: &str = "id, URL, metadata, tags, desc";

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS bookmarks (
            id INTEGER PRIMARY KEY,
            URL TEXT NOT NULL UNIQUE,
            metadata TEXT DEFAULT '',
            tags TEXT DEFAULT ',',
            desc TEXT DEFAULT '',
            flags INTEGER DEFAULT 0
        );
        "#,
    )
}

/// Check if the bookmarks table is missing
pub fn needs_init(conn: &Connection) -> bool {
    !conn
        .prepare("SELECT 1 FROM sqlite_master WHERE type='table' AND name=?1")
        .and_then(|mut stmt| stmt.exists([TABLE]))
        .unwrap_or(false)
}

/// Highest id currently stored, or 0 for an empty table
pub fn max_id(conn: &Connection) -> Result<i64> {
    let max: Option<i64> = conn
        .query_row("SELECT MAX(id) FROM bookmarks", [], |row| {
            row.get::<_, Option<i64>>(0)
        })
        .optional()?
        .flatten();
    Ok(max.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_schema() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(needs_init(&conn));

        init_schema(&conn).unwrap();
        assert!(!needs_init(&conn));

        // Idempotent
        init_schema(&conn).unwrap();
    }

    #[test]
    fn test_defaults() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        conn.execute("INSERT INTO bookmarks (id, URL) VALUES (1, 'https://a.com')", [])
            .unwrap();
        let (title, tags, desc, flags): (String, String, String, i64) = conn
            .query_row(
                "SELECT metadata, tags, desc, flags FROM bookmarks WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();

        assert_eq!(title, "");
        assert_eq!(tags, ",");
        assert_eq!(desc, "");
        assert_eq!(flags, 0);
    }

    #[test]
    fn test_url_is_unique() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        conn.execute("INSERT INTO bookmarks (id, URL) VALUES (1, 'https://a.com')", [])
            .unwrap();
        let dup = conn.execute("INSERT INTO bookmarks (id, URL) VALUES (2, 'https://a.com')", []);
        assert!(dup.is_err());
    }

    #[test]
    fn test_max_id() {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        assert_eq!(max_id(&conn).unwrap(), 0);

        conn.execute("INSERT INTO bookmarks (id, URL) VALUES (7, 'https://a.com')", [])
            .unwrap();
        assert_eq!(max_id(&conn).unwrap(), 7);
    }

    #[test]
    fn test_max_id_without_table_fails() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(max_id(&conn).is_err());
    }
}
