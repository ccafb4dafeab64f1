//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Fetches
//!
//! `update()` returns an `Effect` naming the fetch it wants. The adapter
//! spawns it as a tokio task, which sends the result back through an mpsc
//! channel tagged with the generation it was issued for. A newer fetch for
//! the same screen aborts the older task.
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~80ms so the spinner animates.
//! - **Idle**: sleeps up to 500ms, only redraws on events or results.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use tokio::task::AbortHandle;

use crate::catalog::{Catalog, OpenLibraryCatalog, lookup};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::navigation::Location;
use crate::core::state::{App, Screen};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    BookDetail, BookDetailEvent, BookDetailState, BookGrid, BookGridEvent, BookGridState,
    Pagination, SearchBar, SearchBarEvent,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which component receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    SearchBar,
    Results,
    Recent,
    Detail,
}

impl Focus {
    fn order(screen: Screen) -> &'static [Focus] {
        match screen {
            Screen::Search => &[Focus::SearchBar, Focus::Results, Focus::Recent],
            Screen::Detail => &[Focus::Detail, Focus::Recent],
        }
    }

    fn default_for(screen: Screen) -> Focus {
        Focus::order(screen)[0]
    }
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub search_bar: SearchBar,
    pub results: BookGridState,
    pub recent: BookGridState,
    pub detail: BookDetailState,
    pub focus: Focus,
    /// Location the components were last synced to.
    synced_location: String,
}

impl TuiState {
    pub fn new(app: &App) -> Self {
        let term = app
            .scope
            .books()
            .map(|books| books.search_term().to_string())
            .unwrap_or_default();
        Self {
            search_bar: SearchBar::new(&term),
            results: BookGridState::new(),
            recent: BookGridState::new(),
            detail: BookDetailState::new(),
            focus: Focus::default_for(app.screen()),
            synced_location: app.navigator.current().to_string(),
        }
    }

    /// Brings component state in line with the app after the location moved.
    pub fn sync(&mut self, app: &App) {
        let location = app.navigator.current().to_string();
        if location == self.synced_location {
            return;
        }
        debug!("TUI sync: {} -> {}", self.synced_location, location);
        self.synced_location = location;

        let screen = app.screen();
        match screen {
            Screen::Search => {
                if let Ok(books) = app.scope.books() {
                    self.search_bar.set_text(books.search_term());
                }
                self.results.reset();
            }
            Screen::Detail => self.detail.reset(),
        }
        if !Focus::order(screen).contains(&self.focus) {
            self.focus = Focus::default_for(screen);
        }
    }

    fn cycle_focus(&mut self, screen: Screen, forward: bool) {
        let order = Focus::order(screen);
        let index = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (index + 1) % order.len()
        } else {
            (index + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Keyboard enhancement reports key releases; event mapping drops them
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

/// Abort handles for the fetch in flight on each screen.
#[derive(Default)]
struct Tasks {
    search: Option<AbortHandle>,
    book: Option<AbortHandle>,
}

impl Tasks {
    fn abort_all(&mut self) {
        for handle in [self.search.take(), self.book.take()].into_iter().flatten() {
            handle.abort();
        }
    }
}

pub fn build_catalog(config: &ResolvedConfig) -> Arc<dyn Catalog> {
    Arc::new(OpenLibraryCatalog::with_timeout(
        Some(config.catalog_base_url.clone()),
        config.timeout,
    ))
}

pub fn run(config: ResolvedConfig, initial: Location) -> std::io::Result<()> {
    let catalog = build_catalog(&config);
    info!("Catalog: {}", catalog.name());
    let mut app = App::from_config(catalog, &config, initial);
    let mut tui = TuiState::new(&app);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut tasks = Tasks::default();

    let mut should_quit = dispatch(&mut app, &mut tui, Action::Attach, &tx, &mut tasks);

    let start_time = Instant::now();
    let mut needs_redraw = true;

    while !should_quit {
        let animating = app.is_loading();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Drain all pending input before the next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if let Some(action) = route_event(&app, &mut tui, &event)
                && dispatch(&mut app, &mut tui, action, &tx, &mut tasks)
            {
                should_quit = true;
                break;
            }
        }

        // Results from background fetches
        while !should_quit && let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            should_quit = dispatch(&mut app, &mut tui, action, &tx, &mut tasks);
        }
    }

    tasks.abort_all();
    info!("Folio shutting down");
    ratatui::restore();
    Ok(())
}

/// Runs an action through `update`, resyncs the TUI, and starts any fetch.
/// Returns true when the app should quit.
fn dispatch(
    app: &mut App,
    tui: &mut TuiState,
    action: Action,
    tx: &mpsc::Sender<Action>,
    tasks: &mut Tasks,
) -> bool {
    let effect = update(app, action);
    tui.sync(app);
    apply_effect(effect, app, tx, tasks)
}

fn apply_effect(
    effect: Effect,
    app: &App,
    tx: &mpsc::Sender<Action>,
    tasks: &mut Tasks,
) -> bool {
    match effect {
        Effect::None => false,
        Effect::Quit => true,
        Effect::FetchSearch {
            generation,
            term,
            page,
        } => {
            if let Some(previous) = tasks.search.take() {
                previous.abort();
            }
            tasks.search = Some(spawn_search(app, generation, term, page, tx.clone()));
            false
        }
        Effect::FetchBook { generation, id } => {
            if let Some(previous) = tasks.book.take() {
                previous.abort();
            }
            tasks.book = Some(spawn_book(app, generation, id, tx.clone()));
            false
        }
    }
}

fn spawn_search(
    app: &App,
    generation: u64,
    term: String,
    page: u32,
    tx: mpsc::Sender<Action>,
) -> AbortHandle {
    info!(
        "Spawning search for {:?} page {} (generation {})",
        term, page, generation
    );
    let catalog = app.catalog.clone();
    let covers = app.covers.clone();
    let page_size = app.page_size;

    let handle = tokio::spawn(async move {
        let result =
            lookup::search_books(catalog.as_ref(), &term, page, page_size, &covers).await;
        if tx.send(Action::SearchLoaded { generation, result }).is_err() {
            warn!("Failed to send search result: receiver dropped");
        }
    });
    handle.abort_handle()
}

fn spawn_book(app: &App, generation: u64, id: String, tx: mpsc::Sender<Action>) -> AbortHandle {
    info!("Spawning book lookup for {} (generation {})", id, generation);
    let catalog = app.catalog.clone();

    let handle = tokio::spawn(async move {
        let result = lookup::load_book(catalog.as_ref(), &id).await;
        if tx.send(Action::BookLoaded { generation, result }).is_err() {
            warn!("Failed to send book result for {}: receiver dropped", id);
        }
    });
    handle.abort_handle()
}

/// Translates one input event into the action it triggers, updating
/// presentation state along the way.
fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::ForceQuit => return Some(Action::Quit),
        TuiEvent::HistoryBack => return Some(Action::HistoryBack),
        TuiEvent::HistoryForward => return Some(Action::HistoryForward),
        TuiEvent::Resize => return None,
        TuiEvent::FocusNext | TuiEvent::FocusPrev => {
            tui.cycle_focus(app.screen(), *event == TuiEvent::FocusNext);
            return None;
        }
        _ => {}
    }

    match app.screen() {
        Screen::Search => route_search(app, tui, event),
        Screen::Detail => route_detail(app, tui, event),
    }
}

fn route_search(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    let is_page_key = match event {
        TuiEvent::PrevPage | TuiEvent::NextPage => true,
        TuiEvent::InputChar('[' | ']') => tui.focus != Focus::SearchBar,
        _ => false,
    };
    if is_page_key {
        let forward = matches!(event, TuiEvent::NextPage | TuiEvent::InputChar(']'));
        return page_target(app, forward).map(Action::ChangePage);
    }

    // Results are hidden behind the loading notice until the fetch lands
    let results = app
        .search
        .results
        .as_ref()
        .filter(|_| !app.search.is_loading)
        .map(|page| page.books.as_slice())
        .unwrap_or_default();
    let recent = app
        .scope
        .books()
        .map(|books| books.recently_viewed())
        .unwrap_or_default();

    match tui.focus {
        Focus::SearchBar | Focus::Detail => {
            tui.focus = Focus::SearchBar;
            if *event == TuiEvent::CursorDown && !results.is_empty() {
                tui.focus = Focus::Results;
                return None;
            }
            match tui.search_bar.handle_event(event)? {
                SearchBarEvent::Submit(term) => Some(Action::Submit(term.trim().to_string())),
                SearchBarEvent::ContentChanged => None,
            }
        }
        Focus::Results | Focus::Recent => {
            if matches!(
                event,
                TuiEvent::InputChar(_) | TuiEvent::Paste(_) | TuiEvent::Backspace
            ) || *event == TuiEvent::Escape
            {
                // Typing jumps back to the query
                tui.focus = Focus::SearchBar;
                tui.search_bar.handle_event(event);
                return None;
            }
            if tui.focus == Focus::Results {
                match BookGrid::new(&mut tui.results, results, "").handle_event(event)? {
                    BookGridEvent::Open(index) => {
                        results.get(index).cloned().map(Action::OpenBook)
                    }
                    BookGridEvent::SelectionChanged => None,
                }
            } else {
                open_recent(&mut tui.recent, recent, event)
            }
        }
    }
}

fn route_detail(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    if *event == TuiEvent::Escape {
        return Some(Action::BackToSearch);
    }
    match tui.focus {
        Focus::Recent => {
            let recent = app
                .scope
                .books()
                .map(|books| books.recently_viewed())
                .unwrap_or_default();
            open_recent(&mut tui.recent, recent, event)
        }
        _ => {
            tui.focus = Focus::Detail;
            match BookDetail::new(&mut tui.detail, &app.detail, &app.covers).handle_event(event)? {
                BookDetailEvent::Back => Some(Action::BackToSearch),
                BookDetailEvent::Scrolled => None,
            }
        }
    }
}

fn open_recent(
    state: &mut BookGridState,
    recent: &[crate::catalog::BookSummary],
    event: &TuiEvent,
) -> Option<Action> {
    match BookGrid::new(state, recent, "").handle_event(event)? {
        BookGridEvent::Open(index) => recent
            .get(index)
            .map(|book| Action::OpenRecent(book.id.clone())),
        BookGridEvent::SelectionChanged => None,
    }
}

/// Page the previous/next control leads to, if it is enabled.
fn page_target(app: &App, forward: bool) -> Option<u32> {
    if app.search.is_loading {
        return None;
    }
    let total_pages = app.search.results.as_ref()?.total_pages;
    let current_page = app.scope.books().ok()?.current_page();
    let pagination = Pagination::new(current_page, total_pages);
    if forward {
        pagination.next()
    } else {
        pagination.previous()
    }
}
