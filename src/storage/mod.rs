//! SQLite storage layer for the catalog.
//!
//! Provides:
//! - Schema initialization and database reset
//! - Seed writer with a single all-or-nothing transaction
//! - Read-only connection pool for catalog queries

pub mod reader;
pub mod schema;
pub mod writer;

pub use reader::{CatalogReader, ReaderError};
pub use writer::{SeedSummary, SeedWriter, WriterError};
