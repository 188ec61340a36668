//! Catalog: builds a fresh, seeded product catalog and prints it.
//!
//! # Usage
//!
//! ```bash
//! catalog --data-dir ./data list
//! catalog --seed-delay-ms 0 --output json show 3
//! ```
//!
//! Environment variables can also be used:
//! - `CATALOG_DATA_DIR`: Data directory for SQLite
//! - `CATALOG_SEED_DELAY_MS`: Artificial delay before seeding
//! - `RUST_LOG`: Log filter (overrides `--log-level`)

use anyhow::{bail, Context, Result};
use catalog::config::{Command, Config, OutputFormat};
use catalog::model::{Comment, Product};
use catalog::observability::tracing::init_tracing;
use catalog::view::{ProductListModel, ProductModel, QueryState};
use catalog::{BootstrapConfig, Bootstrapper};
use futures::{pin_mut, Stream, StreamExt};
use serde::Serialize;
use std::fs;

/// Print startup banner with version and configuration.
fn print_banner(config: &Config) {
    let version = env!("CARGO_PKG_VERSION");
    eprintln!(
        r#"
  Catalog v{}

  Configuration:
    Database:    {}
    Seed delay:  {} ms
    Log Level:   {}
"#,
        version,
        config.db_path().display(),
        config.seed_delay_ms,
        config.log_level
    );
}

#[derive(Serialize)]
struct ProductDetail {
    product: Product,
    comments: Vec<Comment>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration from CLI arguments and environment
    let config = Config::parse_args();

    init_tracing(&config.log_level);

    // Ensure data directory exists
    fs::create_dir_all(&config.data_dir)
        .with_context(|| format!("failed to create {}", config.data_dir.display()))?;

    print_banner(&config);

    let bootstrapper = Bootstrapper::new(BootstrapConfig::from_config(&config))?;

    match config.command() {
        Command::List => {
            let model = ProductListModel::new(&bootstrapper);
            let Some(products) = await_loaded(model.products()).await? else {
                return Ok(());
            };
            print_products(&products, config.output)?;
        }
        Command::Show { id } => {
            let model = ProductModel::new(&bootstrapper, id);
            let Some(product) = await_loaded(model.product()).await? else {
                return Ok(());
            };
            let Some(product) = product else {
                bail!("no product with id {id}");
            };
            let comments = model.current().await.loaded().map(|(_, c)| c).unwrap_or_default();
            print_detail(&ProductDetail { product, comments }, config.output)?;
        }
    }

    tracing::debug!("Catalog shutdown complete");
    Ok(())
}

/// Drive a query stream until it loads, fails, or the user presses Ctrl+C.
///
/// Returns `Ok(None)` on Ctrl+C.
async fn await_loaded<T, S>(stream: S) -> Result<Option<T>>
where
    S: Stream<Item = QueryState<T>>,
{
    pin_mut!(stream);
    let mut announced = false;
    loop {
        let next = tokio::select! {
            item = stream.next() => item,
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl+C, abandoning catalog load");
                return Ok(None);
            }
        };
        match next {
            Some(QueryState::Loading) => {
                if !announced {
                    eprintln!("Loading catalog...");
                    announced = true;
                }
            }
            Some(QueryState::Loaded(value)) => return Ok(Some(value)),
            Some(QueryState::Failed(reason)) => bail!("catalog unavailable: {reason}"),
            None => bail!("readiness signal closed"),
        }
    }
}

fn print_products(products: &[Product], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{:>4}  {:<40} {:>8}", "ID", "PRODUCT", "PRICE");
            println!("{}", "-".repeat(54));
            for product in products {
                println!("{:>4}  {:<40} {:>8}", product.id, product.name, format!("${}", product.price));
            }
            println!();
            println!("Total: {} product(s)", products.len());
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(products)?);
        }
    }
    Ok(())
}

fn print_detail(detail: &ProductDetail, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            let product = &detail.product;
            println!("{} (#{})", product.name, product.id);
            println!("{}", product.description);
            println!("Price: ${}", product.price);
            println!();
            if detail.comments.is_empty() {
                println!("No comments.");
            }
            for comment in &detail.comments {
                println!("  [{}] {}", comment.posted_at.format("%Y-%m-%d %H:%M"), comment.text);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(detail)?);
        }
    }
    Ok(())
}
