//! Read connection pool for catalog queries.
//!
//! Uses r2d2 with r2d2_sqlite for pooled read access. Rows are never
//! modified after bootstrap, so every pooled connection is read-only.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::types::Type;
use rusqlite::{OpenFlags, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;

use super::schema::apply_reader_pragmas;
use crate::from_millis;
use crate::model::{Comment, Product};

/// Error type for reader pool operations.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("Failed to create connection pool: {0}")]
    PoolCreation(#[from] r2d2::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Read-only handle to a seeded catalog.
///
/// Cheap to clone; clones share the same pool.
#[derive(Clone)]
pub struct CatalogReader {
    pool: Pool<SqliteConnectionManager>,
}

impl std::fmt::Debug for CatalogReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogReader")
            .field("state", &self.pool.state())
            .finish()
    }
}

impl CatalogReader {
    /// Create a new reader pool for the given database path.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to an existing SQLite database file
    /// * `max_size` - Maximum number of connections in the pool
    pub fn new<P: AsRef<Path>>(db_path: P, max_size: u32) -> Result<Self, ReaderError> {
        let manager = SqliteConnectionManager::file(db_path)
            .with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX);

        let pool = Pool::builder()
            .max_size(max_size.max(1))
            .connection_customizer(Box::new(ReaderConnectionCustomizer))
            .build(manager)?;

        Ok(Self { pool })
    }

    /// Get a connection from the pool.
    pub fn get(&self) -> Result<PooledConnection<SqliteConnectionManager>, ReaderError> {
        Ok(self.pool.get()?)
    }

    /// All products, ordered by id for stable display.
    pub fn load_products(&self) -> Result<Vec<Product>, ReaderError> {
        let conn = self.get()?;
        let mut stmt =
            conn.prepare("SELECT id, name, description, price FROM products ORDER BY id ASC")?;
        let rows = stmt
            .query_map([], product_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// A single product, or `None` if no product has this id.
    pub fn load_product(&self, id: i64) -> Result<Option<Product>, ReaderError> {
        let conn = self.get()?;
        let product = conn
            .query_row(
                "SELECT id, name, description, price FROM products WHERE id = ?1",
                [id],
                product_from_row,
            )
            .optional()?;
        Ok(product)
    }

    /// Comments for a product, oldest first.
    pub fn load_comments(&self, product_id: i64) -> Result<Vec<Comment>, ReaderError> {
        let conn = self.get()?;
        let mut stmt = conn.prepare(
            "SELECT id, product_id, text, posted_at FROM comments
             WHERE product_id = ?1 ORDER BY posted_at ASC, id ASC",
        )?;
        let rows = stmt
            .query_map([product_id], comment_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn count_products(&self) -> Result<usize, ReaderError> {
        self.count("SELECT COUNT(*) FROM products")
    }

    pub fn count_comments(&self) -> Result<usize, ReaderError> {
        self.count("SELECT COUNT(*) FROM comments")
    }

    fn count(&self, sql: &str) -> Result<usize, ReaderError> {
        let conn = self.get()?;
        let count: i64 = conn.query_row(sql, [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
    })
}

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    let millis: i64 = row.get(3)?;
    let posted_at = from_millis(millis).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            3,
            Type::Integer,
            format!("timestamp out of range: {millis}").into(),
        )
    })?;
    Ok(Comment {
        id: row.get(0)?,
        product_id: row.get(1)?,
        text: row.get(2)?,
        posted_at,
    })
}

/// Connection customizer that applies reader pragmas.
#[derive(Debug)]
struct ReaderConnectionCustomizer;

impl r2d2::CustomizeConnection<rusqlite::Connection, rusqlite::Error>
    for ReaderConnectionCustomizer
{
    fn on_acquire(&self, conn: &mut rusqlite::Connection) -> Result<(), rusqlite::Error> {
        apply_reader_pragmas(conn)
    }
}
