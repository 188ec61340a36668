//! Test utilities for catalog integration tests.
//!
//! Provides:
//! - Temporary database fixtures
//! - Bootstrapper construction with no artificial delay
//! - Polling helper with timeout

#![allow(dead_code)]

use catalog::{BootstrapConfig, Bootstrapper};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

/// Test fixture that manages a temporary database directory.
///
/// The directory is automatically cleaned up when the fixture is dropped.
pub struct TestFixture {
    /// Temporary directory for test database
    pub temp_dir: TempDir,
    /// Path to the database file
    pub db_path: PathBuf,
}

impl TestFixture {
    /// Create a new test fixture with a temporary database directory.
    pub fn new() -> Self {
        catalog::observability::tracing::init_test_tracing();
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let db_path = temp_dir.path().join("catalog.db");
        Self { temp_dir, db_path }
    }

    /// Bootstrap config for this fixture's database, without seed delay.
    pub fn config(&self) -> BootstrapConfig {
        BootstrapConfig::immediate(&self.db_path)
    }

    /// Bootstrapper bound to the current runtime.
    pub fn bootstrapper(&self) -> Bootstrapper {
        Bootstrapper::new(self.config()).expect("no tokio runtime")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for a condition to become true with timeout.
///
/// Returns `true` if the condition was met, `false` if the timeout expired.
pub async fn wait_for<F>(timeout: Duration, mut condition: F) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    while start.elapsed() < timeout {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
