//! # BookGrid Component
//!
//! Card grid used for both search results and the recently viewed strip.
//!
//! ## Architecture
//!
//! `BookGrid` is a transient component (created each frame) that wraps
//! `&'a mut BookGridState` (persistent selection) and the book slice (props).
//! The column count depends on the render width, so it is written back into
//! the state during render and read by the next key event.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::catalog::BookSummary;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Rows per card, borders included.
pub const CARD_HEIGHT: u16 = 5;

/// Columns for a given width: three on wide terminals, one on narrow ones.
pub fn columns_for_width(width: u16) -> usize {
    match width {
        w if w >= 90 => 3,
        w if w >= 60 => 2,
        _ => 1,
    }
}

/// Fits `text` on one line of `width` columns, ending in `…` when cut.
fn fit(text: &str, width: usize) -> String {
    let lines = textwrap::wrap(text, width.saturating_sub(1).max(1));
    match lines.as_slice() {
        [] => String::new(),
        [only] => only.to_string(),
        [first, ..] => format!("{}…", first.trim_end()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookGridEvent {
    /// Enter on the selected card.
    Open(usize),
    SelectionChanged,
}

/// Selection state for a grid. Persisted in TuiState.
#[derive(Debug, Default)]
pub struct BookGridState {
    pub selected: usize,
    /// Columns at the last render.
    pub columns: usize,
    /// First visible card row.
    pub scroll_row: usize,
}

impl BookGridState {
    pub fn new() -> Self {
        Self {
            selected: 0,
            columns: 1,
            scroll_row: 0,
        }
    }

    pub fn reset(&mut self) {
        self.selected = 0;
        self.scroll_row = 0;
    }

    fn clamp(&mut self, len: usize) {
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    fn scroll_to_selected(&mut self, visible_rows: usize) {
        let cols = self.columns.max(1);
        let row = self.selected / cols;
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if visible_rows > 0 && row >= self.scroll_row + visible_rows {
            self.scroll_row = row + 1 - visible_rows;
        }
    }
}

pub struct BookGrid<'a> {
    pub state: &'a mut BookGridState,
    pub books: &'a [BookSummary],
    pub title: &'a str,
    pub focused: bool,
    /// Shown in place of the grid when `books` is empty.
    pub empty_message: &'a str,
}

impl<'a> BookGrid<'a> {
    pub fn new(state: &'a mut BookGridState, books: &'a [BookSummary], title: &'a str) -> Self {
        Self {
            state,
            books,
            title,
            focused: false,
            empty_message: "",
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn empty_message(mut self, message: &'a str) -> Self {
        self.empty_message = message;
        self
    }

    fn render_card(&self, frame: &mut Frame, area: Rect, book: &BookSummary, selected: bool) {
        let border_style = if selected {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let title_style = if selected {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let width = area.width.saturating_sub(2) as usize;
        let cover = match &book.cover_url {
            Some(url) => Span::styled(url.as_str(), Style::default().fg(Color::DarkGray)),
            None => Span::styled(
                "no cover",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        };
        let lines = vec![
            Line::from(Span::styled(fit(&book.title, width), title_style)),
            Line::from(Span::styled(
                fit(&format!("by {}", book.author), width),
                Style::default().fg(Color::Gray),
            )),
            Line::from(cover),
        ];
        let card = Paragraph::new(lines).block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(border_style),
        );
        frame.render_widget(card, area);
    }
}

impl Component for BookGrid<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let title_style = if self.focused {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let [heading_area, body] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(area);
        frame.render_widget(Line::from(Span::styled(self.title, title_style)), heading_area);

        if self.books.is_empty() {
            frame.render_widget(
                Paragraph::new(self.empty_message).style(Style::default().fg(Color::DarkGray)),
                body,
            );
            return;
        }

        let cols = columns_for_width(body.width);
        self.state.columns = cols;
        self.state.clamp(self.books.len());
        let visible_rows = (body.height / CARD_HEIGHT).max(1) as usize;
        self.state.scroll_to_selected(visible_rows);

        let col_constraints = vec![Constraint::Ratio(1, cols as u32); cols];
        let first = self.state.scroll_row * cols;
        let last = (first + visible_rows * cols).min(self.books.len());

        for (slot, index) in (first..last).enumerate() {
            let row = (slot / cols) as u16;
            let row_area = Rect {
                x: body.x,
                y: body.y + row * CARD_HEIGHT,
                width: body.width,
                height: CARD_HEIGHT.min(body.height.saturating_sub(row * CARD_HEIGHT)),
            };
            let cells = Layout::horizontal(col_constraints.clone()).split(row_area);
            let selected = self.focused && index == self.state.selected;
            self.render_card(frame, cells[slot % cols], &self.books[index], selected);
        }
    }
}

impl EventHandler for BookGrid<'_> {
    type Event = BookGridEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let len = self.books.len();
        if len == 0 {
            return None;
        }
        self.state.clamp(len);
        let cols = self.state.columns.max(1);
        let selected = self.state.selected;

        let next = match event {
            TuiEvent::Submit => return Some(BookGridEvent::Open(selected)),
            TuiEvent::CursorLeft => selected.checked_sub(1),
            TuiEvent::CursorRight => Some(selected + 1).filter(|&i| i < len),
            TuiEvent::CursorUp => selected.checked_sub(cols),
            TuiEvent::CursorDown => Some(selected + cols).filter(|&i| i < len),
            TuiEvent::CursorHome => Some(0),
            TuiEvent::CursorEnd => Some(len - 1),
            _ => None,
        };

        match next {
            Some(index) if index != selected => {
                self.state.selected = index;
                Some(BookGridEvent::SelectionChanged)
            }
            _ => None,
        }
    }
}
