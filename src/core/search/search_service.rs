// Web search - a small port over whatever search backend is configured.
//
// The Discord layer only ever talks to `SearchService`; the Google client in
// infra implements `SearchProvider`.

use crate::core::moderation::search_result_limit;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub link: String,
    pub snippet: String,
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search query must not be empty")]
    EmptyQuery,

    #[error("Search API error: {0}")]
    Api(String),
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<SearchResult>, SearchError>;
}

pub struct SearchService<P: SearchProvider> {
    provider: P,
}

impl<P: SearchProvider> SearchService<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Run a search. `limit` is clamped into 1..=5 and defaults to 3.
    pub async fn search(
        &self,
        query: &str,
        limit: Option<u8>,
    ) -> Result<Vec<SearchResult>, SearchError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let limit = search_result_limit(limit);
        let mut results = self.provider.search(query, limit).await?;
        // Providers are allowed to over-deliver.
        results.truncate(usize::from(limit));
        Ok(results)
    }
}
