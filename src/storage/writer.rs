//! Seed writer: owns the single write connection used during bootstrap.

use rusqlite::{params, Connection};
use std::path::Path;
use thiserror::Error;

use super::schema::{apply_pragmas, initialize_schema};
use crate::seed::Seed;

/// Error type for writer operations.
#[derive(Debug, Error)]
pub enum WriterError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
}

/// Row counts written by a seed transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub products: usize,
    pub comments: usize,
}

/// Write connection with the catalog schema in place.
pub struct SeedWriter {
    conn: Connection,
}

impl SeedWriter {
    /// Open (or create) the database at `db_path` and initialize the schema.
    pub fn open<P: AsRef<Path>>(db_path: P) -> Result<Self, WriterError> {
        let conn = Connection::open(db_path)?;
        apply_pragmas(&conn)?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Insert every product and comment of `seed` in one transaction.
    ///
    /// On any error the transaction is dropped and rolled back, so either
    /// the whole seed is visible or none of it is.
    #[tracing::instrument(skip_all, fields(products = seed.products.len(), comments = seed.comments.len()))]
    pub fn insert_seed(&mut self, seed: &Seed) -> Result<SeedSummary, WriterError> {
        let tx = self.conn.transaction()?;
        {
            let mut insert_product = tx.prepare(
                "INSERT INTO products (id, name, description, price) VALUES (?1, ?2, ?3, ?4)",
            )?;
            for product in &seed.products {
                insert_product.execute(params![
                    product.id,
                    product.name,
                    product.description,
                    product.price
                ])?;
            }

            let mut insert_comment = tx.prepare(
                "INSERT INTO comments (product_id, text, posted_at) VALUES (?1, ?2, ?3)",
            )?;
            for comment in &seed.comments {
                insert_comment.execute(params![
                    comment.product_id,
                    comment.text,
                    comment.posted_at.timestamp_millis()
                ])?;
            }
        }
        tx.commit()?;

        tracing::debug!("Seed transaction committed");
        Ok(SeedSummary {
            products: seed.products.len(),
            comments: seed.comments.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewComment;
    use chrono::Utc;
    use tempfile::TempDir;

    fn count(writer: &SeedWriter, table: &str) -> i64 {
        writer
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_insert_seed_writes_all_rows() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = SeedWriter::open(temp_dir.path().join("catalog.db")).unwrap();
        let seed = Seed::random();

        let summary = writer.insert_seed(&seed).unwrap();

        assert_eq!(summary.products, 20);
        assert_eq!(summary.comments, seed.comments.len());
        assert_eq!(count(&writer, "products"), 20);
        assert_eq!(count(&writer, "comments") as usize, seed.comments.len());
    }

    #[test]
    fn test_failed_seed_rolls_back_everything() {
        let temp_dir = TempDir::new().unwrap();
        let mut writer = SeedWriter::open(temp_dir.path().join("catalog.db")).unwrap();
        let mut seed = Seed::random();
        seed.comments.push(NewComment {
            product_id: 999,
            text: "orphan".into(),
            posted_at: Utc::now(),
        });

        assert!(writer.insert_seed(&seed).is_err());
        assert_eq!(count(&writer, "products"), 0);
        assert_eq!(count(&writer, "comments"), 0);
    }
}
