//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::catalog::types::{AuthorRef, SearchDoc, WorkAuthor};
use crate::catalog::{
    AuthorDetails, Catalog, CatalogError, SearchQuery, SearchResponse, WorkDetails,
};
use crate::core::config::{FolioConfig, resolve};
use crate::core::navigation::Location;
use crate::core::state::App;

/// In-memory catalog with canned responses. Records every search it serves.
#[derive(Default)]
pub struct FakeCatalog {
    search: Option<SearchResponse>,
    works: HashMap<String, WorkDetails>,
    authors: HashMap<String, AuthorDetails>,
    searches: Mutex<Vec<(String, u32, u64)>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every search returns `docs` (id, title, cover id) with the given `num_found`.
    pub fn with_search(mut self, num_found: u64, docs: &[(&str, &str, Option<i64>)]) -> Self {
        self.search = Some(SearchResponse {
            num_found,
            docs: docs
                .iter()
                .map(|(id, title, cover)| SearchDoc {
                    key: format!("/works/{id}"),
                    title: title.to_string(),
                    author_name: vec!["Test Author".to_string()],
                    cover_i: *cover,
                })
                .collect(),
        });
        self
    }

    pub fn with_work(mut self, id: &str, title: &str, author_key: Option<&str>) -> Self {
        self.works.insert(
            id.to_string(),
            WorkDetails {
                title: title.to_string(),
                authors: author_key
                    .map(|key| {
                        vec![WorkAuthor {
                            author: Some(AuthorRef {
                                key: key.to_string(),
                                name: None,
                            }),
                        }]
                    })
                    .unwrap_or_default(),
                description: None,
                covers: vec![],
                first_publish_date: None,
                subjects: vec![],
                number_of_pages_median: None,
            },
        );
        self
    }

    pub fn with_author(mut self, id: &str, name: &str) -> Self {
        self.authors.insert(
            id.to_string(),
            AuthorDetails {
                name: name.to_string(),
                birth_date: None,
                death_date: None,
                bio: None,
            },
        );
        self
    }

    /// (title, limit, offset) of every search served so far.
    pub fn searches(&self) -> Vec<(String, u32, u64)> {
        self.searches.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    fn name(&self) -> &str {
        "fake"
    }

    async fn search(&self, query: SearchQuery<'_>) -> Result<SearchResponse, CatalogError> {
        self.searches
            .lock()
            .unwrap()
            .push((query.title.to_string(), query.limit, query.offset));
        self.search
            .clone()
            .ok_or_else(|| CatalogError::Network("no canned search".to_string()))
    }

    async fn work(&self, id: &str) -> Result<WorkDetails, CatalogError> {
        self.works
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("work {id}")))
    }

    async fn author(&self, id: &str) -> Result<AuthorDetails, CatalogError> {
        self.authors
            .get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("author {id}")))
    }
}

/// Creates a test App at `/` backed by an empty FakeCatalog.
pub fn test_app() -> App {
    test_app_at(Location::root())
}

/// Creates a test App starting at the given location.
pub fn test_app_at(location: Location) -> App {
    let config = resolve(&FolioConfig::default(), None);
    App::from_config(Arc::new(FakeCatalog::new()), &config, location)
}
