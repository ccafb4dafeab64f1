//! # Application State
//!
//! Core business state for Folio. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── catalog: Arc<dyn Catalog>     // remote catalog
//! ├── scope: SessionScope           // owns SharedSearchState
//! ├── navigator: Navigator          // current location + back/forward
//! ├── search: SearchView            // last results, loading, error
//! ├── detail: DetailView            // open book, loading, error
//! ├── status_message: String        // status bar text
//! ├── page_size: u32                // results per page
//! ├── clamp_page: bool              // clamp ?page= to the result count
//! └── covers: Covers                // cover URL derivation
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.
//! This keeps things predictable, so no surprise mutations.

use std::sync::Arc;

use crate::catalog::{BookDetail, Catalog, Covers, SearchPage};
use crate::core::books::SessionScope;
use crate::core::config::ResolvedConfig;
use crate::core::navigation::{Location, Navigator};

/// Which screen the current location shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Search,
    Detail,
}

/// Search screen data.
#[derive(Debug, Default)]
pub struct SearchView {
    pub results: Option<SearchPage>,
    /// Term the current `results` were fetched for.
    pub results_term: String,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Bumped for every search issued; older responses are dropped.
    pub generation: u64,
}

/// Detail screen data.
#[derive(Debug, Default)]
pub struct DetailView {
    pub book_id: Option<String>,
    pub book: Option<BookDetail>,
    pub not_found: bool,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Bumped for every lookup issued; older responses are dropped.
    pub generation: u64,
}

pub struct App {
    pub catalog: Arc<dyn Catalog>,
    pub scope: SessionScope,
    pub navigator: Navigator,
    pub search: SearchView,
    pub detail: DetailView,
    pub status_message: String,
    pub page_size: u32,
    pub clamp_page: bool,
    pub covers: Covers,
}

impl App {
    pub fn from_config(catalog: Arc<dyn Catalog>, config: &ResolvedConfig, initial: Location) -> Self {
        let mut scope = SessionScope::default();
        scope.mount();
        Self {
            catalog,
            scope,
            navigator: Navigator::new(initial),
            search: SearchView::default(),
            detail: DetailView::default(),
            status_message: String::from("Search Open Library by title"),
            page_size: config.page_size,
            clamp_page: config.clamp_page,
            covers: config.covers.clone(),
        }
    }

    pub fn screen(&self) -> Screen {
        match self.navigator.current() {
            Location::Search(_) => Screen::Search,
            Location::Book(_) => Screen::Detail,
        }
    }

    pub fn is_loading(&self) -> bool {
        match self.screen() {
            Screen::Search => self.search.is_loading,
            Screen::Detail => self.detail.is_loading,
        }
    }

    /// Page count of the loaded results, if they belong to `term`.
    pub fn known_total_pages(&self, term: &str) -> Option<u32> {
        self.search
            .results
            .as_ref()
            .filter(|_| self.search.results_term == term)
            .map(|page| page.total_pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_app, test_app_at};

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.status_message, "Search Open Library by title");
        assert!(!app.is_loading());
        assert_eq!(app.page_size, 6);
        assert_eq!(app.screen(), Screen::Search);
        assert!(app.scope.is_mounted());
    }

    #[test]
    fn test_screen_follows_location() {
        let app = test_app_at(Location::book("OL1W"));
        assert_eq!(app.screen(), Screen::Detail);
    }

    #[test]
    fn test_known_total_pages_matches_term() {
        let mut app = test_app();
        app.search.results = Some(SearchPage {
            total_pages: 3,
            ..Default::default()
        });
        app.search.results_term = "dune".to_string();
        assert_eq!(app.known_total_pages("dune"), Some(3));
        assert_eq!(app.known_total_pages("emma"), None);
    }
}
