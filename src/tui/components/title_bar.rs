//! # TitleBar Component
//!
//! Top status bar showing where the user is and what is happening.
//!
//! ## Responsibilities
//!
//! - Display the current location (`/?q=dune&page=2`, `/book/OL45804W`)
//! - Display the status message ("Searching...", "13 books found ...")
//! - Show a spinner while a fetch is in flight
//!
//! TitleBar is purely presentational: it receives all data as props and has
//! no internal state.
//!
//! ## Conditional Formatting
//!
//! 1. **Loading**: `"Folio | /?q=dune | ⠋ Searching for "dune"..."`
//! 2. **Status message**: `"Folio | /?q=dune | 13 books found"`
//! 3. **Default**: `"Folio | /"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const SPINNER: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Top status bar component showing location, status, and a loading spinner.
pub struct TitleBar {
    /// Current location (e.g., "/?q=dune&page=1")
    pub location: String,
    /// Status message (e.g., "Searching for \"dune\"...")
    pub status_message: String,
    pub is_loading: bool,
    pub spinner_frame: usize,
}

impl TitleBar {
    pub fn new(location: String, status_message: String, is_loading: bool) -> Self {
        Self {
            location,
            status_message,
            is_loading,
            spinner_frame: 0,
        }
    }

    fn text(&self) -> String {
        let mut text = format!("Folio | {}", self.location);
        if self.is_loading {
            let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
            text.push_str(&format!(" | {} {}", spinner, self.status_message));
        } else if !self.status_message.is_empty() {
            text.push_str(&format!(" | {}", self.status_message));
        }
        text
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let line = Line::from(Span::styled(self.text(), style)).style(style);
        frame.render_widget(line, area);
    }
}
