use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::config::GoogleSearchConfig;
use crate::core::search::{SearchError, SearchProvider, SearchResult};

const CUSTOM_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";

/// Google Programmable Search (Custom Search JSON API) client.
pub struct GoogleSearchClient {
    client: Client,
    base_url: String,
    api_key: String,
    cse_id: String,
}

impl GoogleSearchClient {
    pub fn new(config: &GoogleSearchConfig) -> Result<Self, SearchError> {
        let client = Client::builder()
            .user_agent("HearthBot/1.0")
            .build()
            .map_err(|e| SearchError::Api(e.to_string()))?;

        Ok(Self {
            client,
            base_url: CUSTOM_SEARCH_URL.to_string(),
            api_key: config.api_key.clone(),
            cse_id: config.cse_id.clone(),
        })
    }

    fn map_item(item: ApiItem) -> SearchResult {
        SearchResult {
            title: item.title.unwrap_or_else(|| "Untitled result".to_string()),
            link: item.link.unwrap_or_else(|| "https://google.com".to_string()),
            snippet: item
                .snippet
                .map(|s| s.replace('\n', " "))
                .unwrap_or_else(|| "No description available.".to_string()),
        }
    }

    fn map_response(body: ApiSearchResponse) -> Vec<SearchResult> {
        body.items
            .unwrap_or_default()
            .into_iter()
            .map(Self::map_item)
            .collect()
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchClient {
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<SearchResult>, SearchError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.cse_id.as_str()),
                ("q", query),
                ("num", &limit.to_string()),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Api(e.to_string()))?;

        match resp.status() {
            status if status.is_success() => {
                let body: ApiSearchResponse = resp
                    .json()
                    .await
                    .map_err(|e| SearchError::Api(e.to_string()))?;
                Ok(Self::map_response(body))
            }
            StatusCode::TOO_MANY_REQUESTS | StatusCode::FORBIDDEN => Err(SearchError::Api(
                "Google search quota exhausted or key not permitted".to_string(),
            )),
            status => Err(SearchError::Api(format!(
                "Google search returned {}",
                status
            ))),
        }
    }
}

// ============================================================================
// API payloads
// ============================================================================

#[derive(Deserialize)]
struct ApiSearchResponse {
    items: Option<Vec<ApiItem>>,
}

#[derive(Deserialize)]
struct ApiItem {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}
