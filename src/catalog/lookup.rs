//! # Lookups
//!
//! The two fetch flows the screens run: a paginated title search, and a
//! work lookup followed by a best-effort author lookup.

use log::{debug, info, warn};

use crate::catalog::types::{key_id, page_offset};
use crate::catalog::{BookDetail, Catalog, CatalogError, Covers, SearchPage, SearchQuery};

/// Fetches one page of title search results.
///
/// An empty term means "no active search": no request is made and an empty
/// page is returned.
pub async fn search_books(
    catalog: &dyn Catalog,
    term: &str,
    page: u32,
    page_size: u32,
    covers: &Covers,
) -> Result<SearchPage, CatalogError> {
    if term.is_empty() {
        debug!("Empty search term, skipping catalog query");
        return Ok(SearchPage::default());
    }

    let query = SearchQuery {
        title: term,
        limit: page_size,
        offset: page_offset(page, page_size),
    };
    let response = catalog.search(query).await?;
    let result = SearchPage::from_response(response, page_size, covers);

    if result.hidden_without_cover > 0 {
        debug!(
            "Search page {} for {:?}: {} results hidden without cover",
            page, term, result.hidden_without_cover
        );
    }
    Ok(result)
}

/// Fetches a work, then its first author.
///
/// Returns only after both lookups have settled so the caller can record the
/// book with the resolved author name. Author failures are logged and
/// swallowed.
pub async fn load_book(catalog: &dyn Catalog, id: &str) -> Result<BookDetail, CatalogError> {
    let id = key_id(id).to_string();
    let work = catalog.work(&id).await?;

    let author = match work.first_author().map(|a| key_id(&a.key).to_string()) {
        Some(author_id) => match catalog.author(&author_id).await {
            Ok(author) => Some(author),
            Err(e) => {
                warn!("Failed to fetch author details for {}: {}", author_id, e);
                None
            }
        },
        None => None,
    };

    info!(
        "Loaded book {} ({:?}), author resolved: {}",
        id,
        work.title,
        author.is_some()
    );
    Ok(BookDetail { id, work, author })
}
