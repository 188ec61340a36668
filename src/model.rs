//! Catalog records.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A catalog product. Immutable once seeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: i64,
}

/// A stored comment, as read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    /// Assigned by the store on insert.
    pub id: i64,
    pub product_id: i64,
    pub text: String,
    pub posted_at: DateTime<Utc>,
}

/// A comment that has not been inserted yet (no id).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    pub product_id: i64,
    pub text: String,
    pub posted_at: DateTime<Utc>,
}
