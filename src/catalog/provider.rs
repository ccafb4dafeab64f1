use std::fmt;

use async_trait::async_trait;

use super::types::{AuthorDetails, SearchResponse, WorkDetails};

/// Errors that can occur while talking to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Transport failure (timeout, DNS, connection refused).
    Network(String),
    /// The catalog answered with a non-success status other than 404.
    Api { status: u16, message: String },
    /// The requested entity does not exist (404 or empty body).
    NotFound(String),
    /// The response body could not be decoded.
    Parse(String),
}

impl CatalogError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::Network(msg) => write!(f, "network error: {msg}"),
            CatalogError::Api { status, message } => {
                write!(f, "catalog error (HTTP {status}): {message}")
            }
            CatalogError::NotFound(what) => write!(f, "not found: {what}"),
            CatalogError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

/// Parameters of one title search.
#[derive(Debug, Clone, Copy)]
pub struct SearchQuery<'a> {
    pub title: &'a str,
    pub limit: u32,
    pub offset: u64,
}

/// Read-only bibliographic catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Returns the name of the catalog.
    fn name(&self) -> &str;

    async fn search(&self, query: SearchQuery<'_>) -> Result<SearchResponse, CatalogError>;

    /// Looks up a work by its bare identifier (e.g. `OL45804W`).
    async fn work(&self, id: &str) -> Result<WorkDetails, CatalogError>;

    /// Looks up an author by its bare identifier (e.g. `OL79034A`).
    async fn author(&self, id: &str) -> Result<AuthorDetails, CatalogError>;
}
