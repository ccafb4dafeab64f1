//! # Shared Search State
//!
//! The one piece of state every screen reads: the active search term, the
//! current page, and the recently-viewed books.
//!
//! ```text
//! SessionScope
//! └── SharedSearchState           // only while mounted
//!     ├── search_term: String      // "" = no active search
//!     ├── current_page: u32        // >= 1
//!     └── recently_viewed: Vec     // most recent first, <= 6, unique ids
//! ```
//!
//! The state lives inside a `SessionScope` created at the root of the app.
//! Reading through a scope that is not mounted is an error, never a silent
//! default.

use std::fmt;

use crate::catalog::BookSummary;

/// How many books the recently-viewed list keeps.
pub const RECENTLY_VIEWED_CAPACITY: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    /// The search state was read before the session scope was mounted.
    NotInitialized,
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::NotInitialized => {
                write!(f, "search state used outside an active session scope")
            }
        }
    }
}

impl std::error::Error for StateError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedSearchState {
    search_term: String,
    current_page: u32,
    recently_viewed: Vec<BookSummary>,
}

impl Default for SharedSearchState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            current_page: 1,
            recently_viewed: Vec::with_capacity(RECENTLY_VIEWED_CAPACITY + 1),
        }
    }
}

impl SharedSearchState {
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn recently_viewed(&self) -> &[BookSummary] {
        &self.recently_viewed
    }

    /// Moves `book` to the front of the recently-viewed list.
    ///
    /// Any entry with the same id is dropped first, then the list is cut back
    /// to capacity, so the oldest book falls off the end.
    pub fn record_viewed(&mut self, book: BookSummary) {
        self.recently_viewed.retain(|b| b.id != book.id);
        self.recently_viewed.insert(0, book);
        self.recently_viewed.truncate(RECENTLY_VIEWED_CAPACITY);
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// No upper bound is applied here; callers keep the page within the
    /// result count. Page 0 is stored as 1.
    pub fn set_current_page(&mut self, page: u32) {
        self.current_page = page.max(1);
    }
}

/// Owner of the session's `SharedSearchState`.
#[derive(Debug, Default)]
pub struct SessionScope {
    state: Option<SharedSearchState>,
}

impl SessionScope {
    /// Creates fresh state. Any previous state is discarded.
    pub fn mount(&mut self) {
        self.state = Some(SharedSearchState::default());
    }

    pub fn unmount(&mut self) {
        self.state = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.state.is_some()
    }

    pub fn books(&self) -> Result<&SharedSearchState, StateError> {
        self.state.as_ref().ok_or(StateError::NotInitialized)
    }

    pub fn books_mut(&mut self) -> Result<&mut SharedSearchState, StateError> {
        self.state.as_mut().ok_or(StateError::NotInitialized)
    }
}
