//! Catalog: a product catalog backed by a SQLite store that is created and
//! seeded once per process.
//!
//! The store is rebuilt from scratch by an asynchronous bootstrap. Consumers
//! watch a readiness signal and only query once it reports `Ready`.
//!
//! # Architecture
//!
//! - **One-shot bootstrap**: a compare-and-set guard lets exactly one caller
//!   build the store, on a blocking worker
//! - **Readiness signal**: `tokio::sync::watch` carrying `Unset → NotReady → Ready`
//! - **All-or-nothing seed**: products and comments land in one transaction
//! - **Observable queries**: view models re-query whenever readiness changes
//!
//! # Modules
//!
//! - [`bootstrap`]: bootstrap coordinator and its error type
//! - [`config`]: CLI and environment configuration
//! - [`flow`]: readiness signal
//! - [`model`]: product and comment records
//! - [`observability`]: tracing setup
//! - [`seed`]: sample dataset generator
//! - [`storage`]: SQLite persistence layer
//! - [`view`]: observable queries for presentation code

// Lint configuration
#![warn(clippy::all)]
#![allow(
    clippy::module_name_repetitions,    // storage::reader::CatalogReader is fine
    clippy::must_use_candidate,         // Not all functions need #[must_use]
    clippy::missing_errors_doc,         // Error docs can be verbose
    clippy::missing_panics_doc,         // Panic docs can be verbose
    clippy::needless_raw_string_hashes  // r#""# is fine for SQL
)]

pub mod bootstrap;
pub mod config;
pub mod flow;
pub mod model;
pub mod observability;
pub mod seed;
pub mod storage;
pub mod view;

pub use bootstrap::{BootstrapConfig, BootstrapError, Bootstrapper};
pub use flow::readiness::Readiness;
pub use model::{Comment, NewComment, Product};

use chrono::{DateTime, Utc};

/// Convert a stored Unix timestamp in milliseconds back into a UTC time.
///
/// Returns `None` for values outside chrono's representable range.
#[must_use]
pub fn from_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}
