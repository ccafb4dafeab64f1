//! # SearchBar Component
//!
//! Single-line title query input.
//!
//! ## Responsibilities
//!
//! - Capture text input and paste
//! - Handle editing (backspace, delete, cursor movement, Ctrl+U clear)
//! - Emit a search on Enter, unless the query is blank
//!
//! The buffer is internal state. `focused` is a prop from the TUI state. The
//! buffer is kept after a search so the user can refine the query.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const PLACEHOLDER: &str = "Search for books...";

/// High-level events emitted by the SearchBar
#[derive(Debug, Clone, PartialEq)]
pub enum SearchBarEvent {
    /// User submitted the query (Enter pressed)
    Submit(String),
    /// Text content or cursor changed
    ContentChanged,
}

pub struct SearchBar {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Whether keyboard input goes here (Prop)
    pub focused: bool,
    /// Byte offset of the cursor in `buffer`
    cursor: usize,
    /// Horizontal scroll, in display columns
    scroll: usize,
}

impl SearchBar {
    pub fn new(initial_query: &str) -> Self {
        Self {
            buffer: initial_query.to_string(),
            focused: true,
            cursor: initial_query.len(),
            scroll: 0,
        }
    }

    /// Replaces the buffer, e.g. when the location sets a new term.
    pub fn set_text(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.buffer.len();
        self.scroll = 0;
    }

    /// Whether Enter would submit.
    pub fn can_submit(&self) -> bool {
        !self.buffer.trim().is_empty()
    }

    fn cursor_column(&self) -> usize {
        self.buffer[..self.cursor].width()
    }

    /// Keeps the cursor within the visible `width` columns.
    fn update_scroll(&mut self, width: usize) {
        let column = self.cursor_column();
        if column < self.scroll {
            self.scroll = column;
        } else if width > 0 && column >= self.scroll + width {
            self.scroll = column + 1 - width;
        }
    }

    fn visible_text(&self, width: usize) -> String {
        let mut skipped = 0;
        let mut taken = 0;
        let mut out = String::new();
        for c in self.buffer.chars() {
            let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
            if skipped < self.scroll {
                skipped += w;
                continue;
            }
            if taken + w > width {
                break;
            }
            taken += w;
            out.push(c);
        }
        out
    }
}

fn prev_char_boundary(s: &str, pos: usize) -> usize {
    s[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn next_char_boundary(s: &str, pos: usize) -> usize {
    s[pos..]
        .chars()
        .next()
        .map(|c| pos + c.len_utf8())
        .unwrap_or(s.len())
}

impl Component for SearchBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let inner_width = area.width.saturating_sub(2) as usize;
        self.update_scroll(inner_width.saturating_sub(1));

        let border_style = if self.focused {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let hint = if self.can_submit() {
            " Enter Search  Ctrl+U Clear "
        } else {
            " Type a title "
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(" Search ")
            .title_bottom(hint);

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(PLACEHOLDER).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Paragraph::new(self.visible_text(inner_width)).style(Style::default().fg(Color::White))
        };

        frame.render_widget(paragraph.block(block), area);

        if self.focused {
            let x = area.x + 1 + (self.cursor_column() - self.scroll) as u16;
            frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
        }
    }
}

impl EventHandler for SearchBar {
    type Event = SearchBarEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(SearchBarEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single-line input: newlines become spaces
                let text = text.replace(['\r', '\n'], " ");
                self.buffer.insert_str(self.cursor, &text);
                self.cursor += text.len();
                Some(SearchBarEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.cursor > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                SearchBarEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                SearchBarEvent::ContentChanged
            }),
            TuiEvent::ClearInput => (!self.buffer.is_empty()).then(|| {
                self.set_text("");
                SearchBarEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor > 0).then(|| {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                SearchBarEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor < self.buffer.len()).then(|| {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                SearchBarEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor != 0).then(|| {
                self.cursor = 0;
                SearchBarEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor != self.buffer.len()).then(|| {
                self.cursor = self.buffer.len();
                SearchBarEvent::ContentChanged
            }),
            TuiEvent::Submit => self
                .can_submit()
                .then(|| SearchBarEvent::Submit(self.buffer.clone())),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_handle_input() {
        let mut bar = SearchBar::new("");

        assert_eq!(
            bar.handle_event(&TuiEvent::InputChar('d')),
            Some(SearchBarEvent::ContentChanged)
        );
        bar.handle_event(&TuiEvent::InputChar('u'));
        assert_eq!(bar.buffer, "du");

        bar.handle_event(&TuiEvent::Backspace);
        assert_eq!(bar.buffer, "d");
    }

    #[test]
    fn test_submit_keeps_buffer() {
        let mut bar = SearchBar::new("dune");
        assert_eq!(
            bar.handle_event(&TuiEvent::Submit),
            Some(SearchBarEvent::Submit("dune".to_string()))
        );
        assert_eq!(bar.buffer, "dune");
    }

    #[test]
    fn test_blank_query_cannot_submit() {
        let mut bar = SearchBar::new("   ");
        assert!(!bar.can_submit());
        assert_eq!(bar.handle_event(&TuiEvent::Submit), None);
    }

    #[test]
    fn test_clear_input() {
        let mut bar = SearchBar::new("dune");
        assert_eq!(
            bar.handle_event(&TuiEvent::ClearInput),
            Some(SearchBarEvent::ContentChanged)
        );
        assert!(bar.buffer.is_empty());
        assert_eq!(bar.handle_event(&TuiEvent::ClearInput), None);
    }

    #[test]
    fn test_cursor_editing_multibyte() {
        let mut bar = SearchBar::new("café");
        bar.handle_event(&TuiEvent::CursorLeft);
        bar.handle_event(&TuiEvent::Delete);
        assert_eq!(bar.buffer, "caf");

        bar.handle_event(&TuiEvent::CursorHome);
        bar.handle_event(&TuiEvent::InputChar('x'));
        assert_eq!(bar.buffer, "xcaf");
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut bar = SearchBar::new("");
        bar.handle_event(&TuiEvent::Paste("the left\nhand".to_string()));
        assert_eq!(bar.buffer, "the left hand");
    }

    #[test]
    fn test_render_shows_placeholder() {
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut bar = SearchBar::new("");

        terminal.draw(|f| bar.render(f, f.area())).unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("Search for books..."));
    }

    #[test]
    fn test_long_query_scrolls_to_cursor() {
        let backend = TestBackend::new(12, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut bar = SearchBar::new("abcdefghijklmnopqrstuvwxyz");

        terminal.draw(|f| bar.render(f, f.area())).unwrap();

        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>();
        assert!(text.contains("xyz"));
    }
}
