//! # Navigation
//!
//! Locations play the part of URLs: `/?q=dune&page=2` for the search screen
//! and `/book/OL45804W` for a detail page. They are shareable (pass one with
//! `--location`) and the navigator keeps a back/forward history of them.
//!
//! Synchronization runs in two directions:
//!
//! ```text
//! attach (startup, back, forward):   location ──sync_from_location──▶ state
//! user search / page change:         state ──Location::search──▶ navigator.push
//! ```

use std::fmt;

use log::debug;
use reqwest::Url;

use crate::catalog::types::key_id;
use crate::core::books::SharedSearchState;

/// Base the relative locations are resolved against.
const APP_BASE: &str = "folio://app/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    Invalid(String),
    UnknownRoute(String),
}

impl fmt::Display for LocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationError::Invalid(msg) => write!(f, "invalid location: {msg}"),
            LocationError::UnknownRoute(path) => write!(f, "unknown route: {path}"),
        }
    }
}

impl std::error::Error for LocationError {}

/// Raw query parameters of the search route, as written in the location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub q: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Search(SearchParams),
    Book(String),
}

impl Location {
    /// `/`
    pub fn root() -> Self {
        Location::Search(SearchParams::default())
    }

    /// Location written after a user search or page change: `q` is omitted
    /// when empty, `page` is always present.
    pub fn search(term: &str, page: u32) -> Self {
        Location::Search(SearchParams {
            q: (!term.is_empty()).then(|| term.to_string()),
            page: Some(page.to_string()),
        })
    }

    /// Location the detail page returns to. Page 1 is left implicit.
    pub fn back_to_search(term: &str, page: u32) -> Self {
        Location::Search(SearchParams {
            q: (!term.is_empty()).then(|| term.to_string()),
            page: (page > 1).then(|| page.to_string()),
        })
    }

    /// Detail route for a catalog id; any key prefix is stripped.
    pub fn book(id: &str) -> Self {
        Location::Book(key_id(id).to_string())
    }

    pub fn parse(input: &str) -> Result<Self, LocationError> {
        let base = Url::parse(APP_BASE).map_err(|e| LocationError::Invalid(e.to_string()))?;
        let url = base
            .join(input.trim())
            .map_err(|e| LocationError::Invalid(format!("{input}: {e}")))?;

        let segments: Vec<&str> = url
            .path()
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();

        match segments.as_slice() {
            [] => {
                let mut params = SearchParams::default();
                for (key, value) in url.query_pairs() {
                    match key.as_ref() {
                        "q" => params.q = Some(value.into_owned()),
                        "page" => params.page = Some(value.into_owned()),
                        _ => debug!("Ignoring unknown location parameter {:?}", key),
                    }
                }
                Ok(Location::Search(params))
            }
            ["book", id] => Ok(Location::book(id)),
            _ => Err(LocationError::UnknownRoute(url.path().to_string())),
        }
    }

    pub fn is_search(&self) -> bool {
        matches!(self, Location::Search(_))
    }

    fn href(&self) -> Result<String, LocationError> {
        match self {
            Location::Book(id) => Ok(format!("/book/{id}")),
            Location::Search(params) => {
                let mut url =
                    Url::parse(APP_BASE).map_err(|e| LocationError::Invalid(e.to_string()))?;
                if params.q.is_none() && params.page.is_none() {
                    return Ok("/".to_string());
                }
                {
                    let mut pairs = url.query_pairs_mut();
                    if let Some(q) = &params.q {
                        pairs.append_pair("q", q);
                    }
                    if let Some(page) = &params.page {
                        pairs.append_pair("page", page);
                    }
                }
                Ok(format!("/?{}", url.query().unwrap_or_default()))
            }
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let href = self.href().map_err(|_| fmt::Error)?;
        f.write_str(&href)
    }
}

// ============================================================================
// Location → State
// ============================================================================

/// What `sync_from_location` changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    pub term_changed: bool,
    pub page_changed: bool,
}

/// Copies `q` and `page` from the location into the shared state.
///
/// An empty or missing `q` leaves the term alone. `page` must parse as an
/// integer; it is raised to at least 1 and, when `max_page` is known, cut
/// down to it before being compared with the current page.
pub fn sync_from_location(
    books: &mut SharedSearchState,
    params: &SearchParams,
    max_page: Option<u32>,
) -> SyncOutcome {
    let mut outcome = SyncOutcome::default();

    if let Some(q) = params.q.as_deref()
        && !q.is_empty()
        && q != books.search_term()
    {
        books.set_search_term(q);
        outcome.term_changed = true;
    }

    if let Some(parsed) = params.page.as_deref().and_then(parse_page) {
        let page = clamp_page(parsed, max_page);
        if page != books.current_page() {
            books.set_current_page(page);
            outcome.page_changed = true;
        }
    }

    outcome
}

fn parse_page(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// `max(1, min(page, max_page))`. An unknown `max_page` only applies the
/// lower bound; a known zero pins the page to 1.
pub fn clamp_page(page: i64, max_page: Option<u32>) -> u32 {
    let upper = match max_page {
        Some(max) => i64::from(max.max(1)),
        None => i64::from(u32::MAX),
    };
    // In range [1, u32::MAX] after the clamp.
    u32::try_from(page.clamp(1, upper)).unwrap_or(1)
}

// ============================================================================
// History
// ============================================================================

/// Back/forward history of visited locations.
#[derive(Debug, Clone)]
pub struct Navigator {
    entries: Vec<Location>,
    index: usize,
}

impl Navigator {
    pub fn new(initial: Location) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
        }
    }

    pub fn current(&self) -> &Location {
        &self.entries[self.index]
    }

    /// Visits `location`, dropping any forward history.
    /// Pushing the current location again is a no-op.
    pub fn push(&mut self, location: Location) {
        if *self.current() == location {
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index = self.entries.len() - 1;
    }

    /// Swaps the current entry without adding history.
    pub fn replace(&mut self, location: Location) {
        self.entries[self.index] = location;
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn back(&mut self) -> Option<&Location> {
        if !self.can_go_back() {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<&Location> {
        if !self.can_go_forward() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(q: Option<&str>, page: Option<&str>) -> SearchParams {
        SearchParams {
            q: q.map(str::to_string),
            page: page.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_search_location() {
        let loc = Location::parse("/?q=dune&page=2").unwrap();
        assert_eq!(loc, Location::Search(params(Some("dune"), Some("2"))));
    }

    #[test]
    fn test_parse_root_and_empty() {
        assert_eq!(Location::parse("/").unwrap(), Location::root());
        assert_eq!(Location::parse("").unwrap(), Location::root());
    }

    #[test]
    fn test_parse_decodes_query() {
        let loc = Location::parse("/?q=the+left+hand%20of%20darkness").unwrap();
        assert_eq!(
            loc,
            Location::Search(params(Some("the left hand of darkness"), None))
        );
    }

    #[test]
    fn test_parse_book_location() {
        assert_eq!(
            Location::parse("/book/OL45804W").unwrap(),
            Location::Book("OL45804W".to_string())
        );
    }

    #[test]
    fn test_parse_unknown_route() {
        assert!(matches!(
            Location::parse("/authors/OL1A"),
            Err(LocationError::UnknownRoute(_))
        ));
    }

    #[test]
    fn test_search_location_display() {
        assert_eq!(Location::search("dune", 1).to_string(), "/?q=dune&page=1");
        assert_eq!(Location::search("", 2).to_string(), "/?page=2");
        assert_eq!(
            Location::search("left hand", 1).to_string(),
            "/?q=left+hand&page=1"
        );
        assert_eq!(Location::root().to_string(), "/");
    }

    #[test]
    fn test_back_to_search_omits_first_page() {
        assert_eq!(Location::back_to_search("dune", 1).to_string(), "/?q=dune");
        assert_eq!(
            Location::back_to_search("dune", 3).to_string(),
            "/?q=dune&page=3"
        );
        assert_eq!(Location::back_to_search("", 1).to_string(), "/");
    }

    #[test]
    fn test_book_location_strips_prefix() {
        assert_eq!(Location::book("/works/OL1W").to_string(), "/book/OL1W");
    }

    #[test]
    fn test_display_parse_agree() {
        let loc = Location::search("dune & spice", 4);
        assert_eq!(Location::parse(&loc.to_string()).unwrap(), loc);
    }

    #[test]
    fn test_sync_sets_term_and_page() {
        let mut books = SharedSearchState::default();
        let outcome = sync_from_location(&mut books, &params(Some("dune"), Some("2")), None);
        assert_eq!(books.search_term(), "dune");
        assert_eq!(books.current_page(), 2);
        assert!(outcome.term_changed && outcome.page_changed);
    }

    #[test]
    fn test_sync_is_noop_when_equal() {
        let mut books = SharedSearchState::default();
        books.set_search_term("dune");
        books.set_current_page(2);
        let outcome = sync_from_location(&mut books, &params(Some("dune"), Some("2")), None);
        assert_eq!(outcome, SyncOutcome::default());
    }

    #[test]
    fn test_sync_ignores_empty_or_missing_term() {
        let mut books = SharedSearchState::default();
        books.set_search_term("dune");
        sync_from_location(&mut books, &params(Some(""), None), None);
        assert_eq!(books.search_term(), "dune");
        sync_from_location(&mut books, &params(None, None), None);
        assert_eq!(books.search_term(), "dune");
    }

    #[test]
    fn test_sync_ignores_unparseable_page() {
        let mut books = SharedSearchState::default();
        books.set_current_page(3);
        let outcome = sync_from_location(&mut books, &params(None, Some("two")), None);
        assert!(!outcome.page_changed);
        assert_eq!(books.current_page(), 3);
    }

    #[test]
    fn test_sync_clamps_page() {
        let mut books = SharedSearchState::default();
        books.set_current_page(2);
        sync_from_location(&mut books, &params(None, Some("-4")), None);
        assert_eq!(books.current_page(), 1);

        sync_from_location(&mut books, &params(None, Some("99")), Some(3));
        assert_eq!(books.current_page(), 3);

        sync_from_location(&mut books, &params(None, Some("99")), None);
        assert_eq!(books.current_page(), 99);
    }

    #[test]
    fn test_clamp_page_with_zero_total() {
        assert_eq!(clamp_page(5, Some(0)), 1);
        assert_eq!(clamp_page(0, Some(0)), 1);
        assert_eq!(clamp_page(5, None), 5);
    }

    #[test]
    fn test_navigator_back_forward() {
        let mut nav = Navigator::new(Location::root());
        nav.push(Location::search("dune", 1));
        nav.push(Location::book("OL1W"));
        assert!(nav.can_go_back());
        assert!(!nav.can_go_forward());

        assert_eq!(nav.back(), Some(&Location::search("dune", 1)));
        assert_eq!(nav.back(), Some(&Location::root()));
        assert_eq!(nav.back(), None);
        assert_eq!(nav.forward(), Some(&Location::search("dune", 1)));
    }

    #[test]
    fn test_navigator_push_drops_forward_history() {
        let mut nav = Navigator::new(Location::root());
        nav.push(Location::search("dune", 1));
        nav.back();
        nav.push(Location::search("emma", 1));
        assert!(!nav.can_go_forward());
        assert_eq!(nav.current(), &Location::search("emma", 1));
    }

    #[test]
    fn test_navigator_push_same_location_is_noop() {
        let mut nav = Navigator::new(Location::search("dune", 1));
        nav.push(Location::search("dune", 1));
        assert!(!nav.can_go_back());
    }

    #[test]
    fn test_navigator_replace() {
        let mut nav = Navigator::new(Location::search("dune", 9));
        nav.replace(Location::search("dune", 3));
        assert_eq!(nav.current(), &Location::search("dune", 3));
        assert!(!nav.can_go_back());
    }
}
