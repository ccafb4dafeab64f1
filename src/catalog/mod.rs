pub mod lookup;
pub mod provider;
pub mod providers;
pub mod types;

pub use provider::{Catalog, CatalogError, SearchQuery};
pub use providers::OpenLibraryCatalog;
pub use types::{
    AuthorDetails, BookDetail, BookSummary, CoverSize, Covers, SearchPage, SearchResponse,
    TextValue, WorkDetails,
};
