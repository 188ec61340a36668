//! Single product view model: the product plus its comments.

use futures::Stream;

use super::{observe, resolve, QueryState};
use crate::bootstrap::Bootstrapper;
use crate::model::{Comment, Product};
use crate::storage::CatalogReader;

/// Observable detail view of one product.
#[derive(Debug, Clone)]
pub struct ProductModel {
    bootstrapper: Bootstrapper,
    product_id: i64,
}

impl ProductModel {
    /// Create the view model for `product_id` and kick off the bootstrap if
    /// needed.
    pub fn new(bootstrapper: &Bootstrapper, product_id: i64) -> Self {
        bootstrapper.ensure_created();
        Self {
            bootstrapper: bootstrapper.clone(),
            product_id,
        }
    }

    pub fn product_id(&self) -> i64 {
        self.product_id
    }

    /// The product; `Loaded(None)` if no product has this id.
    pub fn product(&self) -> impl Stream<Item = QueryState<Option<Product>>> + Send + 'static {
        let id = self.product_id;
        observe(&self.bootstrapper, move |reader: &CatalogReader| {
            reader.load_product(id)
        })
    }

    /// The product's comments, oldest first.
    pub fn comments(&self) -> impl Stream<Item = QueryState<Vec<Comment>>> + Send + 'static {
        let id = self.product_id;
        observe(&self.bootstrapper, move |reader: &CatalogReader| {
            reader.load_comments(id)
        })
    }

    /// One-shot snapshot of the product and its comments.
    pub async fn current(&self) -> QueryState<(Option<Product>, Vec<Comment>)> {
        let id = self.product_id;
        resolve(
            &self.bootstrapper,
            self.bootstrapper.readiness(),
            move |reader: &CatalogReader| Ok((reader.load_product(id)?, reader.load_comments(id)?)),
        )
        .await
    }
}
