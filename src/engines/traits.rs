//! Product search traits

use crate::results::ProductRecord;
use async_trait::async_trait;

/// Catalog search backend
#[async_trait]
pub trait ProductSearch: Send + Sync {
    /// Engine name, used in logs and metrics
    fn name(&self) -> &str;

    /// Search the catalog with an English query.
    ///
    /// `Ok(Some(vec![]))` means the search succeeded with no matches;
    /// `Ok(None)` means the service answered without a usable result list.
    async fn search(&self, query: &str) -> anyhow::Result<Option<Vec<ProductRecord>>>;
}
