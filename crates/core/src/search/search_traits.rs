use async_trait::async_trait;

use super::search_model::{SearchResponse, SearchResultItem};
use crate::errors::Result;

/// A module that contributes hits to the global search.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Stable module name, e.g. `finances`.
    fn module(&self) -> &'static str;

    async fn search(&self, user_id: &str, query: &str, limit: i64)
        -> Result<Vec<SearchResultItem>>;
}

#[async_trait]
pub trait SearchServiceTrait: Send + Sync {
    fn modules(&self) -> Vec<String>;

    async fn search(&self, user_id: &str, query: &str, limit: Option<i64>)
        -> Result<SearchResponse>;
}
