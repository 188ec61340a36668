//! Observable catalog queries for presentation code.
//!
//! A view model triggers the bootstrap when it is built, then maps each
//! readiness change to a query result: `Loading` until the store is ready,
//! a fresh query once it is, or `Failed` if the bootstrap failed.

mod product;
mod product_list;

pub use product::ProductModel;
pub use product_list::ProductListModel;

use futures::{Stream, StreamExt};
use serde::Serialize;
use tokio_stream::wrappers::WatchStream;

use crate::bootstrap::Bootstrapper;
use crate::flow::readiness::Readiness;
use crate::storage::{CatalogReader, ReaderError};

/// Result of an observable query at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum QueryState<T> {
    Loading,
    Loaded(T),
    Failed(String),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The loaded value, if any.
    pub fn loaded(self) -> Option<T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Loading | Self::Failed(_) => None,
        }
    }
}

/// Stream of query results, re-evaluated on every readiness change.
///
/// The first item reflects the readiness at subscription time.
fn observe<T, F>(
    bootstrapper: &Bootstrapper,
    query: F,
) -> impl Stream<Item = QueryState<T>> + Send + 'static
where
    T: Send + 'static,
    F: Fn(&CatalogReader) -> Result<T, ReaderError> + Clone + Send + Sync + 'static,
{
    let owner = bootstrapper.clone();
    WatchStream::new(bootstrapper.subscribe()).then(move |readiness| {
        let owner = owner.clone();
        let query = query.clone();
        async move { resolve(&owner, readiness, query).await }
    })
}

/// Evaluate `query` against the store for one readiness value.
async fn resolve<T, F>(bootstrapper: &Bootstrapper, readiness: Readiness, query: F) -> QueryState<T>
where
    T: Send + 'static,
    F: FnOnce(&CatalogReader) -> Result<T, ReaderError> + Send + 'static,
{
    match readiness {
        Readiness::Unset | Readiness::NotReady => QueryState::Loading,
        Readiness::Failed(reason) => QueryState::Failed(reason),
        Readiness::Ready => {
            let reader = match bootstrapper.store() {
                Ok(reader) => reader,
                Err(e) => return QueryState::Failed(e.to_string()),
            };
            match tokio::task::spawn_blocking(move || query(&reader)).await {
                Ok(Ok(value)) => QueryState::Loaded(value),
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "Catalog query failed");
                    QueryState::Failed(e.to_string())
                }
                Err(e) => QueryState::Failed(format!("query task failed: {e}")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_state_accessors() {
        assert!(QueryState::<i32>::Loading.is_loading());
        assert_eq!(QueryState::Loaded(3).loaded(), Some(3));
        assert_eq!(QueryState::<i32>::Failed("x".into()).loaded(), None);
    }

    #[test]
    fn test_query_state_json_shape() {
        let json = serde_json::to_value(QueryState::Loaded(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({"state": "loaded", "data": [1, 2]}));

        let json = serde_json::to_value(QueryState::<()>::Loading).unwrap();
        assert_eq!(json, serde_json::json!({"state": "loading"}));
    }
}
