pub mod openlibrary;

pub use openlibrary::OpenLibraryCatalog;
