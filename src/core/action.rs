//! # Actions
//!
//! Everything that can happen in Folio becomes an `Action`.
//! User submits a search? That's `Action::Submit(term)`.
//! The catalog responds? That's `Action::SearchLoaded { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing the I/O to run next.
//! No side effects here. Fetches happen in the TUI adapter.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! Every fetch carries a generation number. A response whose generation is
//! no longer current belongs to a search or book the user has moved away
//! from, and is dropped.

use log::{debug, error, info, warn};

use crate::catalog::{BookDetail, BookSummary, CatalogError, SearchPage};
use crate::core::books::StateError;
use crate::core::navigation::{Location, sync_from_location};
use crate::core::state::App;

#[derive(Debug)]
pub enum Action {
    /// Load the current location into state (startup, after navigation).
    Attach,
    /// User searched for a title.
    Submit(String),
    /// User moved to another result page.
    ChangePage(u32),
    /// User opened a search result.
    OpenBook(BookSummary),
    /// User opened a recently viewed book.
    OpenRecent(String),
    /// Leave the detail page for the search it came from.
    BackToSearch,
    HistoryBack,
    HistoryForward,
    SearchLoaded {
        generation: u64,
        result: Result<SearchPage, CatalogError>,
    },
    BookLoaded {
        generation: u64,
        result: Result<BookDetail, CatalogError>,
    },
    Quit,
}

/// I/O requested by `update()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Quit,
    FetchSearch {
        generation: u64,
        term: String,
        page: u32,
    },
    FetchBook {
        generation: u64,
        id: String,
    },
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match apply(app, action) {
        Ok(effect) => effect,
        Err(e) => {
            error!("State update failed: {}", e);
            app.status_message = e.to_string();
            Effect::None
        }
    }
}

fn apply(app: &mut App, action: Action) -> Result<Effect, StateError> {
    match action {
        Action::Quit => Ok(Effect::Quit),
        Action::Attach => attach(app),
        Action::Submit(term) => {
            let books = app.scope.books_mut()?;
            books.set_search_term(term.as_str());
            books.set_current_page(1);
            app.navigator.push(Location::search(&term, 1));
            start_search(app)
        }
        Action::ChangePage(page) => {
            let books = app.scope.books_mut()?;
            books.set_current_page(page);
            let location = Location::search(books.search_term(), books.current_page());
            app.navigator.push(location);
            start_search(app)
        }
        Action::OpenBook(book) => {
            let id = book.id.clone();
            app.scope.books_mut()?.record_viewed(book);
            app.navigator.push(Location::book(&id));
            Ok(start_detail(app, id))
        }
        Action::OpenRecent(id) => {
            app.navigator.push(Location::book(&id));
            Ok(start_detail(app, id))
        }
        Action::BackToSearch => {
            let books = app.scope.books()?;
            let location = Location::back_to_search(books.search_term(), books.current_page());
            app.navigator.push(location);
            attach(app)
        }
        Action::HistoryBack => match app.navigator.back() {
            Some(_) => attach(app),
            None => Ok(Effect::None),
        },
        Action::HistoryForward => match app.navigator.forward() {
            Some(_) => attach(app),
            None => Ok(Effect::None),
        },
        Action::SearchLoaded { generation, result } => on_search_loaded(app, generation, result),
        Action::BookLoaded { generation, result } => on_book_loaded(app, generation, result),
    }
}

/// Syncs the current location into state and starts the fetch it needs.
fn attach(app: &mut App) -> Result<Effect, StateError> {
    match app.navigator.current().clone() {
        Location::Search(params) => {
            let current_term = app.scope.books()?.search_term().to_string();
            let term = params
                .q
                .as_deref()
                .filter(|q| !q.is_empty())
                .unwrap_or(&current_term);
            let max_page = if app.clamp_page {
                app.known_total_pages(term)
            } else {
                None
            };

            let outcome = sync_from_location(app.scope.books_mut()?, &params, max_page);
            debug!(
                "Attached {}: term changed {}, page changed {}",
                app.navigator.current(),
                outcome.term_changed,
                outcome.page_changed
            );
            start_search(app)
        }
        Location::Book(id) => Ok(start_detail(app, id)),
    }
}

fn start_search(app: &mut App) -> Result<Effect, StateError> {
    let books = app.scope.books()?;
    let term = books.search_term().to_string();
    let page = books.current_page();

    app.search.generation += 1;
    app.search.error = None;
    if term != app.search.results_term {
        // Results for another term must not stay selectable while loading
        app.search.results = None;
        app.search.results_term.clear();
    }

    if term.is_empty() {
        app.search.results = None;
        app.search.results_term.clear();
        app.search.is_loading = false;
        return Ok(Effect::None);
    }

    app.search.is_loading = true;
    app.status_message = format!("Searching for \"{term}\"...");
    Ok(Effect::FetchSearch {
        generation: app.search.generation,
        term,
        page,
    })
}

fn start_detail(app: &mut App, id: String) -> Effect {
    app.detail.generation += 1;
    app.detail.book_id = Some(id.clone());
    app.detail.book = None;
    app.detail.not_found = false;
    app.detail.error = None;
    app.detail.is_loading = true;
    app.status_message = format!("Loading {id}...");
    Effect::FetchBook {
        generation: app.detail.generation,
        id,
    }
}

fn on_search_loaded(
    app: &mut App,
    generation: u64,
    result: Result<SearchPage, CatalogError>,
) -> Result<Effect, StateError> {
    if generation != app.search.generation {
        debug!(
            "Dropping stale search response (generation {}, current {})",
            generation, app.search.generation
        );
        return Ok(Effect::None);
    }
    app.search.is_loading = false;

    let books = app.scope.books()?;
    let term = books.search_term().to_string();
    let current_page = books.current_page();

    match result {
        Ok(page) => {
            let last_page = page.total_pages.max(1);
            let mut current_page = current_page;
            if app.clamp_page && current_page > last_page {
                info!(
                    "Page {} is past the last page {} for {:?}, clamping",
                    current_page, last_page, term
                );
                app.scope.books_mut()?.set_current_page(last_page);
                if app.navigator.current().is_search() {
                    app.navigator.replace(Location::search(&term, last_page));
                }
                // Nothing to refetch when the term has no results at all
                if page.total_pages > 0 {
                    app.search.results = Some(page);
                    app.search.results_term = term;
                    return start_search(app);
                }
                current_page = last_page;
            }

            app.status_message = results_status(&page, current_page);
            app.search.results = Some(page);
            app.search.results_term = term;
            app.search.error = None;
        }
        Err(e) => {
            warn!("Search for {:?} failed: {}", term, e);
            app.search.results = None;
            app.search.results_term.clear();
            app.search.error = Some(format!("Failed to fetch books: {e}"));
            app.status_message = String::from("Search failed");
        }
    }
    Ok(Effect::None)
}

fn on_book_loaded(
    app: &mut App,
    generation: u64,
    result: Result<BookDetail, CatalogError>,
) -> Result<Effect, StateError> {
    if generation != app.detail.generation {
        debug!(
            "Dropping stale book response (generation {}, current {})",
            generation, app.detail.generation
        );
        return Ok(Effect::None);
    }
    app.detail.is_loading = false;

    match result {
        Ok(detail) => {
            let summary = detail.summary(&app.covers);
            app.scope.books_mut()?.record_viewed(summary);
            app.status_message = format!("Viewing \"{}\"", detail.work.title);
            app.detail.book = Some(detail);
        }
        Err(e) if e.is_not_found() => {
            info!("Book not found: {}", e);
            app.detail.book = None;
            app.detail.not_found = true;
            app.status_message = String::from("Book not found");
        }
        Err(e) => {
            warn!("Book lookup failed: {}", e);
            app.detail.book = None;
            app.detail.error = Some(format!("Failed to fetch book details: {e}"));
            app.status_message = String::from("Lookup failed");
        }
    }
    Ok(Effect::None)
}

fn results_status(page: &SearchPage, current_page: u32) -> String {
    let mut status = format!(
        "{} books found · page {} of {}",
        page.num_found,
        current_page,
        page.total_pages.max(1)
    );
    if page.hidden_without_cover > 0 {
        status.push_str(&format!(
            " · {} without cover hidden",
            page.hidden_without_cover
        ));
    }
    status
}
