//! One-shot asynchronous creation and seeding of the catalog store.
//!
//! The first call to [`Bootstrapper::ensure_created`] wins a compare-and-set
//! and starts two tasks:
//!
//! - a blocking worker that wipes the previous database, builds a fresh one
//!   and inserts the seed in one transaction
//! - a foreground task that receives the worker's outcome over a `oneshot`
//!   and publishes it on the readiness signal
//!
//! The store handle is stored before `Ready` is published, so any consumer
//! that has observed `Ready` can read it.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::{Handle, TryCurrentError};
use tokio::sync::{oneshot, watch};

use crate::config::Config;
use crate::flow::readiness::{Readiness, ReadinessSignal};
use crate::seed::Seed;
use crate::storage::{CatalogReader, ReaderError, SeedSummary, SeedWriter, WriterError};

/// Error type for bootstrap and store access.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("No tokio runtime available: {0}")]
    NoRuntime(#[from] TryCurrentError),

    #[error("Failed to discard previous database: {0}")]
    Reset(#[source] std::io::Error),

    #[error("Failed to open database: {0}")]
    Open(#[source] WriterError),

    #[error("Failed to seed database: {0}")]
    Seed(#[source] WriterError),

    #[error("Failed to open reader pool: {0}")]
    Reader(#[source] ReaderError),

    #[error("Bootstrap worker terminated unexpectedly")]
    WorkerPanic,

    #[error("Database is not ready")]
    NotReady,

    #[error("Database bootstrap failed: {0}")]
    Failed(String),
}

/// Settings for a bootstrap run.
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// Database file; deleted and recreated on every run.
    pub db_path: PathBuf,
    /// Artificial delay before seeding, simulating a slow backing store.
    pub seed_delay: Duration,
    /// Size of the read-only connection pool.
    pub reader_pool_size: u32,
}

impl BootstrapConfig {
    /// Create a BootstrapConfig from application config values.
    pub fn from_config(config: &Config) -> Self {
        Self {
            db_path: config.db_path(),
            seed_delay: Duration::from_millis(config.seed_delay_ms),
            reader_pool_size: config.reader_pool_size,
        }
    }

    /// Config for a database at `db_path` with no artificial delay.
    pub fn immediate(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            seed_delay: Duration::ZERO,
            reader_pool_size: 2,
        }
    }
}

struct Shared {
    config: BootstrapConfig,
    runtime: Handle,
    started: AtomicBool,
    runs: AtomicUsize,
    store: OnceLock<CatalogReader>,
    readiness: ReadinessSignal,
}

/// Owner of the catalog store and its readiness signal.
///
/// Construct one per process and hand clones to consumers; clones share
/// the same state.
#[derive(Clone)]
pub struct Bootstrapper {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Bootstrapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bootstrapper")
            .field("db_path", &self.shared.config.db_path)
            .field("readiness", &self.shared.readiness.current())
            .finish()
    }
}

impl Bootstrapper {
    /// Create a bootstrapper bound to the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`BootstrapError::NoRuntime`] outside a runtime context.
    pub fn new(config: BootstrapConfig) -> Result<Self, BootstrapError> {
        let runtime = Handle::try_current()?;
        Ok(Self::with_runtime(config, runtime))
    }

    /// Create a bootstrapper that spawns its tasks on `runtime`.
    ///
    /// `ensure_created` may then be called from any thread.
    pub fn with_runtime(config: BootstrapConfig, runtime: Handle) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                runtime,
                started: AtomicBool::new(false),
                runs: AtomicUsize::new(0),
                store: OnceLock::new(),
                readiness: ReadinessSignal::new(),
            }),
        }
    }

    /// Start creating the store unless some earlier call already did.
    ///
    /// Returns true if this call started the bootstrap. Never blocks.
    pub fn ensure_created(&self) -> bool {
        tracing::debug!(thread = ?std::thread::current().name(), "Database creation requested");

        if self
            .shared
            .started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return false;
        }

        self.shared.readiness.publish(Readiness::NotReady);

        let (done_tx, done_rx) = oneshot::channel();

        let worker = Arc::clone(&self.shared);
        self.shared.runtime.spawn_blocking(move || {
            worker.runs.fetch_add(1, Ordering::SeqCst);
            tracing::debug!(thread = ?std::thread::current().name(), "Starting bootstrap job");
            // Receiver only goes away if the runtime is shutting down.
            let _ = done_tx.send(run_bootstrap(&worker.config));
        });

        let foreground = Arc::clone(&self.shared);
        self.shared.runtime.spawn(async move {
            let outcome = done_rx.await.unwrap_or(Err(BootstrapError::WorkerPanic));
            foreground.complete(outcome);
        });

        true
    }

    /// Subscribe to the readiness signal.
    pub fn subscribe(&self) -> watch::Receiver<Readiness> {
        self.shared.readiness.subscribe()
    }

    /// Current readiness state.
    pub fn readiness(&self) -> Readiness {
        self.shared.readiness.current()
    }

    /// The seeded store, or an explicit error if it is not available.
    pub fn store(&self) -> Result<CatalogReader, BootstrapError> {
        match self.readiness() {
            Readiness::Ready => self
                .shared
                .store
                .get()
                .cloned()
                .ok_or(BootstrapError::NotReady),
            Readiness::Failed(reason) => Err(BootstrapError::Failed(reason)),
            Readiness::Unset | Readiness::NotReady => Err(BootstrapError::NotReady),
        }
    }

    /// Wait until bootstrap has settled, then return the store.
    ///
    /// Does not start the bootstrap; pair with [`Self::ensure_created`].
    pub async fn wait_ready(&self) -> Result<CatalogReader, BootstrapError> {
        let mut rx = self.subscribe();
        // The sender lives in `shared`, which we hold, so this cannot close.
        rx.wait_for(Readiness::is_settled)
            .await
            .map_err(|_| BootstrapError::NotReady)?;
        self.store()
    }

    /// Number of bootstrap jobs started so far; never more than one.
    pub fn bootstrap_runs(&self) -> usize {
        self.shared.runs.load(Ordering::SeqCst)
    }

    /// Database file this bootstrapper manages.
    pub fn db_path(&self) -> &std::path::Path {
        &self.shared.config.db_path
    }
}

impl Shared {
    fn complete(&self, outcome: Result<(CatalogReader, SeedSummary), BootstrapError>) {
        match outcome {
            Ok((reader, summary)) => {
                if self.store.set(reader).is_err() {
                    tracing::warn!("Store was already published");
                }
                tracing::info!(
                    products = summary.products,
                    comments = summary.comments,
                    "Database ready"
                );
                self.readiness.publish(Readiness::Ready);
            }
            Err(e) => {
                tracing::error!(error = %e, "Database bootstrap failed");
                self.readiness.publish(Readiness::Failed(e.to_string()));
            }
        }
    }
}

/// Blocking body of the bootstrap job.
fn run_bootstrap(
    config: &BootstrapConfig,
) -> Result<(CatalogReader, SeedSummary), BootstrapError> {
    // Reset the database to have new data on every run.
    crate::storage::schema::reset_database(&config.db_path).map_err(BootstrapError::Reset)?;

    let mut writer = SeedWriter::open(&config.db_path).map_err(BootstrapError::Open)?;

    if !config.seed_delay.is_zero() {
        tracing::debug!(delay_ms = config.seed_delay.as_millis() as u64, "Simulating slow store");
        std::thread::sleep(config.seed_delay);
    }

    let seed = Seed::random();
    let summary = writer.insert_seed(&seed).map_err(BootstrapError::Seed)?;
    drop(writer);

    tracing::debug!(
        thread = ?std::thread::current().name(),
        path = %config.db_path.display(),
        "Database populated"
    );

    let reader = CatalogReader::new(&config.db_path, config.reader_pool_size)
        .map_err(BootstrapError::Reader)?;
    Ok((reader, summary))
}
