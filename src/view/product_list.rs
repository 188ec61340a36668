//! Product list view model.

use futures::Stream;

use super::{observe, resolve, QueryState};
use crate::bootstrap::Bootstrapper;
use crate::model::Product;
use crate::storage::CatalogReader;

/// Observable list of every product in the catalog.
#[derive(Debug, Clone)]
pub struct ProductListModel {
    bootstrapper: Bootstrapper,
}

impl ProductListModel {
    /// Create the view model and kick off the bootstrap if needed.
    pub fn new(bootstrapper: &Bootstrapper) -> Self {
        bootstrapper.ensure_created();
        Self {
            bootstrapper: bootstrapper.clone(),
        }
    }

    /// Products, re-queried whenever readiness changes.
    pub fn products(&self) -> impl Stream<Item = QueryState<Vec<Product>>> + Send + 'static {
        observe(&self.bootstrapper, CatalogReader::load_products)
    }

    /// One-shot snapshot of the product list.
    pub async fn current(&self) -> QueryState<Vec<Product>> {
        resolve(
            &self.bootstrapper,
            self.bootstrapper.readiness(),
            |reader: &CatalogReader| reader.load_products(),
        )
        .await
    }
}
