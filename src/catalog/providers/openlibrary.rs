//! Open Library catalog over plain JSON GET requests.
//!
//! Endpoints used:
//! - `/search.json?title=..&limit=..&offset=..`
//! - `/works/<id>.json`
//! - `/authors/<id>.json`

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info, warn};
use serde::de::DeserializeOwned;

use crate::catalog::types::key_id;
use crate::catalog::{
    AuthorDetails, Catalog, CatalogError, SearchQuery, SearchResponse, WorkDetails,
};

pub const DEFAULT_OPENLIBRARY_BASE_URL: &str = "https://openlibrary.org";

/// Open Library API client
pub struct OpenLibraryCatalog {
    base_url: String,
    client: reqwest::Client,
}

impl OpenLibraryCatalog {
    pub fn new(base_url: Option<String>) -> Self {
        let env_url = std::env::var("FOLIO_CATALOG_URL").ok();
        let final_url = base_url
            .or(env_url)
            .unwrap_or_else(|| DEFAULT_OPENLIBRARY_BASE_URL.to_string());

        Self {
            base_url: final_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Like `new`, but every request gives up after `timeout`.
    pub fn with_timeout(base_url: Option<String>, timeout: Duration) -> Self {
        let mut catalog = Self::new(base_url);
        match reqwest::Client::builder().timeout(timeout).build() {
            Ok(client) => catalog.client = client,
            Err(e) => warn!("Failed to build HTTP client with timeout, using default: {}", e),
        }
        catalog
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
        what: &str,
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = response.status();
        debug!("Open Library response status for {}: {}", what, status);

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(what.to_string()));
        }

        if !status.is_success() {
            let err_body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("Open Library API error: {} - {}", status.as_u16(), err_body);
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: err_body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;
        debug!("{} body: {} bytes", what, body.len());

        let trimmed = body.trim();
        if trimmed.is_empty() || trimmed == "null" {
            return Err(CatalogError::NotFound(what.to_string()));
        }

        serde_json::from_str(trimmed).map_err(|e| CatalogError::Parse(format!("{what}: {e}")))
    }
}

#[async_trait]
impl Catalog for OpenLibraryCatalog {
    fn name(&self) -> &str {
        "openlibrary"
    }

    async fn search(&self, query: SearchQuery<'_>) -> Result<SearchResponse, CatalogError> {
        info!(
            "Open Library search: title={:?}, limit={}, offset={}",
            query.title, query.limit, query.offset
        );
        let params = [
            ("title", query.title.to_string()),
            ("limit", query.limit.to_string()),
            ("offset", query.offset.to_string()),
        ];
        let response: SearchResponse = self
            .get_json(&format!("{}/search.json", self.base_url), &params, "search results")
            .await?;
        info!(
            "Search complete: numFound={}, docs={}",
            response.num_found,
            response.docs.len()
        );
        Ok(response)
    }

    async fn work(&self, id: &str) -> Result<WorkDetails, CatalogError> {
        let id = key_id(id);
        info!("Open Library work lookup: {}", id);
        self.get_json(
            &format!("{}/works/{}.json", self.base_url, id),
            &[],
            &format!("work {id}"),
        )
        .await
    }

    async fn author(&self, id: &str) -> Result<AuthorDetails, CatalogError> {
        let id = key_id(id);
        info!("Open Library author lookup: {}", id);
        self.get_json(
            &format!("{}/authors/{}.json", self.base_url, id),
            &[],
            &format!("author {id}"),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let catalog = OpenLibraryCatalog::new(Some("http://localhost:9999/".to_string()));
        assert_eq!(catalog.base_url, "http://localhost:9999");
        assert_eq!(catalog.name(), "openlibrary");
    }
}
