use async_trait::async_trait;
use log::{debug, warn};
use std::sync::Arc;

use super::search_model::{
    SearchModuleResults, SearchResponse, DEFAULT_SEARCH_LIMIT, MAX_SEARCH_LIMIT,
};
use super::search_traits::{SearchProvider, SearchServiceTrait};
use crate::errors::{Error, Result};

/// Aggregates the registered providers.
///
/// Providers are queried in registration order. A failing provider is
/// logged and left out of the response.
pub struct SearchService {
    providers: Vec<Arc<dyn SearchProvider>>,
}

impl SearchService {
    pub fn new(providers: Vec<Arc<dyn SearchProvider>>) -> Self {
        Self { providers }
    }
}

#[async_trait]
impl SearchServiceTrait for SearchService {
    fn modules(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|p| p.module().to_string())
            .collect()
    }

    async fn search(
        &self,
        user_id: &str,
        query: &str,
        limit: Option<i64>,
    ) -> Result<SearchResponse> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::invalid_input("Search query cannot be empty"));
        }
        let limit = limit
            .unwrap_or(DEFAULT_SEARCH_LIMIT)
            .clamp(1, MAX_SEARCH_LIMIT);

        let mut results = Vec::new();
        for provider in &self.providers {
            match provider.search(user_id, query, limit).await {
                Ok(items) if items.is_empty() => {}
                Ok(items) => results.push(SearchModuleResults {
                    module: provider.module().to_string(),
                    items,
                }),
                Err(e) => warn!("Search provider '{}' failed: {}", provider.module(), e),
            }
        }

        let total = results.iter().map(|r| r.items.len()).sum();
        debug!("Search '{}' returned {} hits", query, total);
        Ok(SearchResponse {
            query: query.to_string(),
            total,
            results,
        })
    }
}
