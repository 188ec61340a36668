//! Schema definition, connection pragmas and database reset.

use rusqlite::Connection;
use std::io;
use std::path::{Path, PathBuf};

/// Suffixes of the side files SQLite may keep next to the database.
const SIDE_FILE_SUFFIXES: [&str; 3] = ["-wal", "-shm", "-journal"];

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id          INTEGER PRIMARY KEY,
    name        TEXT    NOT NULL,
    description TEXT    NOT NULL,
    price       INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    product_id INTEGER NOT NULL REFERENCES products(id) ON DELETE CASCADE,
    text       TEXT    NOT NULL,
    posted_at  INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_comments_product_id ON comments(product_id);
"#;

/// Apply pragmas for the writer connection.
///
/// Foreign keys are off by default in SQLite and must be enabled per
/// connection for the comment → product reference to be enforced.
pub fn apply_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;
        PRAGMA synchronous = NORMAL;
        "#,
    )
}

/// Apply pragmas for pooled read-only connections.
pub fn apply_reader_pragmas(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA query_only = ON;
        PRAGMA foreign_keys = ON;
        "#,
    )
}

/// Create the catalog tables and index if they do not exist.
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA)
}

/// Delete the database file and its side files.
///
/// Missing files are not an error; any other I/O failure is.
pub fn reset_database(db_path: &Path) -> io::Result<()> {
    let mut paths = vec![db_path.to_path_buf()];
    paths.extend(SIDE_FILE_SUFFIXES.iter().map(|suffix| side_file(db_path, suffix)));

    for path in paths {
        match std::fs::remove_file(&path) {
            Ok(()) => tracing::debug!(path = %path.display(), "Removed previous database file"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn side_file(db_path: &Path, suffix: &str) -> PathBuf {
    let mut name = db_path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open(path: &Path) -> Connection {
        let conn = Connection::open(path).unwrap();
        apply_pragmas(&conn).unwrap();
        initialize_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn test_schema_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let conn = open(&temp_dir.path().join("catalog.db"));
        initialize_schema(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('products', 'comments')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }

    #[test]
    fn test_foreign_key_rejects_unknown_product() {
        let temp_dir = TempDir::new().unwrap();
        let conn = open(&temp_dir.path().join("catalog.db"));

        let result = conn.execute(
            "INSERT INTO comments (product_id, text, posted_at) VALUES (42, 'orphan', 0)",
            [],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_deleting_product_cascades_to_comments() {
        let temp_dir = TempDir::new().unwrap();
        let conn = open(&temp_dir.path().join("catalog.db"));

        conn.execute(
            "INSERT INTO products (id, name, description, price) VALUES (1, 'a', 'b', 1)",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO comments (product_id, text, posted_at) VALUES (1, 'c', 0)",
            [],
        )
        .unwrap();
        conn.execute("DELETE FROM products WHERE id = 1", []).unwrap();

        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM comments", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }

    #[test]
    fn test_reset_removes_database_and_tolerates_missing() {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("catalog.db");

        // Nothing there yet
        reset_database(&db_path).unwrap();

        drop(open(&db_path));
        std::fs::write(side_file(&db_path, "-journal"), b"stale").unwrap();
        assert!(db_path.exists());

        reset_database(&db_path).unwrap();
        assert!(!db_path.exists());
        assert!(!side_file(&db_path, "-journal").exists());
    }
}
