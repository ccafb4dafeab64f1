//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as fields:
//! - `TitleBar`: location, status message, loading spinner
//! - `Pagination`: previous/next controls and the page label
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that keep local state and emit events:
//! - `SearchBar`: title query input
//! - `BookGrid`: card grid with a selection, for results and recently viewed
//! - `BookDetail`: scrollable page for one work
//!
//! Persistent state (`BookGridState`, `BookDetailState`) lives in `TuiState`.
//! The component itself is rebuilt each frame around that state and the props
//! it needs from `App`.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs          (this file)
//! ├── title_bar.rs    (top status bar)
//! ├── search_bar.rs   (query input)
//! ├── book_grid.rs    (card grid)
//! ├── pagination.rs   (page controls)
//! └── book_detail.rs  (detail page)
//! ```

pub mod book_detail;
pub mod book_grid;
pub mod pagination;
pub mod search_bar;
mod title_bar;

pub use book_detail::{BookDetail, BookDetailEvent, BookDetailState};
pub use book_grid::{BookGrid, BookGridEvent, BookGridState};
pub use pagination::Pagination;
pub use search_bar::{SearchBar, SearchBarEvent};
pub use title_bar::TitleBar;
