//! # BookDetail Component
//!
//! Scrollable detail page for one work: cover, title, author, publication
//! facts, description, author section, and subjects.
//!
//! `BookDetail` is transient and wraps `&'a mut BookDetailState` (scroll
//! position) plus the detail view data. Content height is measured during
//! render and cached in the state so scroll events can be clamped.

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::catalog::types::UNKNOWN_AUTHOR;
use crate::catalog::{BookDetail as Book, Covers};
use crate::core::state::DetailView;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::markdown;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookDetailEvent {
    Back,
    Scrolled,
}

#[derive(Default)]
pub struct BookDetailState {
    pub scroll_state: ScrollViewState,
    pub content_height: u16,
    pub viewport_height: u16,
}

impl BookDetailState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        self.scroll_state = ScrollViewState::default();
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    fn scroll_by(&mut self, delta: i32) {
        let current = self.scroll_state.offset().y as i32;
        let y = (current + delta).clamp(0, self.max_offset() as i32) as u16;
        self.scroll_state.set_offset(Position { x: 0, y });
    }
}

pub struct BookDetail<'a> {
    pub state: &'a mut BookDetailState,
    pub view: &'a DetailView,
    pub covers: &'a Covers,
}

impl<'a> BookDetail<'a> {
    pub fn new(state: &'a mut BookDetailState, view: &'a DetailView, covers: &'a Covers) -> Self {
        Self {
            state,
            view,
            covers,
        }
    }
}

fn label(text: &'static str) -> Span<'static> {
    Span::styled(text, Style::default().fg(Color::DarkGray))
}

fn section_heading(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        text,
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ))
}

/// Builds the full page text for a loaded book.
pub fn book_text(book: &Book, covers: &Covers) -> Text<'static> {
    let mut lines: Vec<Line<'static>> = vec![
        Line::from(vec![label("Cover  "), Span::raw(book.cover_url(covers))]),
        Line::default(),
        Line::from(Span::styled(
            book.work.title.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("by {}", book.author_name().unwrap_or(UNKNOWN_AUTHOR)),
            Style::default().fg(Color::Cyan),
        )),
    ];

    if let Some(date) = &book.work.first_publish_date {
        lines.push(Line::from(vec![
            label("First published  "),
            Span::raw(date.clone()),
        ]));
    }
    if let Some(pages) = book.work.number_of_pages_median {
        lines.push(Line::from(vec![label("Pages  "), Span::raw(pages.to_string())]));
    }

    lines.push(Line::default());
    lines.push(section_heading("Description"));
    lines.extend(markdown::render(book.description(), Color::Gray).lines);

    if let Some(author) = &book.author {
        lines.push(Line::default());
        lines.push(section_heading("About the author"));
        lines.push(Line::from(Span::styled(
            author.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        let mut life = Vec::new();
        if let Some(born) = &author.birth_date {
            life.push(label("Born "));
            life.push(Span::raw(born.clone()));
        }
        if let Some(died) = &author.death_date {
            if !life.is_empty() {
                life.push(Span::raw("  "));
            }
            life.push(label("Died "));
            life.push(Span::raw(died.clone()));
        }
        if !life.is_empty() {
            lines.push(Line::from(life));
        }
        lines.extend(markdown::render(author.biography(), Color::Gray).lines);
    }

    let subjects = book.subjects();
    if !subjects.is_empty() {
        lines.push(Line::default());
        lines.push(section_heading("Subjects"));
        lines.push(Line::from(Span::styled(
            subjects.join(" · "),
            Style::default().fg(Color::Yellow),
        )));
    }

    Text::from(lines)
}

impl BookDetail<'_> {
    fn render_message(&self, frame: &mut Frame, area: Rect, message: Text<'static>) {
        let paragraph = Paragraph::new(message)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        let y = area.y + area.height / 3;
        let message_area = Rect {
            y,
            height: area.bottom().saturating_sub(y),
            ..area
        };
        frame.render_widget(paragraph, message_area);
    }
}

impl Component for BookDetail<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Book ")
            .title_bottom(" Esc Back to search  ↑↓ Scroll ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let view = self.view;
        if view.is_loading {
            self.render_message(frame, inner, Text::from("Loading book details..."));
            return;
        }
        if view.not_found {
            self.render_message(
                frame,
                inner,
                Text::from(vec![
                    Line::from(Span::styled(
                        "Book not found",
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        "Press Esc to go back to search",
                        Style::default().fg(Color::DarkGray),
                    )),
                ]),
            );
            return;
        }
        if let Some(error) = &view.error {
            self.render_message(
                frame,
                inner,
                Text::from(Span::styled(error.clone(), Style::default().fg(Color::Red))),
            );
            return;
        }
        let Some(book) = &view.book else {
            return;
        };

        let content_width = inner.width.saturating_sub(1);
        let paragraph = Paragraph::new(book_text(book, self.covers)).wrap(Wrap { trim: false });
        let height = paragraph.line_count(content_width) as u16;
        self.state.content_height = height;
        self.state.viewport_height = inner.height;

        let mut scroll_view = ScrollView::new(Size::new(content_width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, content_width, height));
        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);
    }
}

impl EventHandler for BookDetail<'_> {
    type Event = BookDetailEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let page = self.state.viewport_height.max(1) as i32;
        let delta = match event {
            TuiEvent::Escape => return Some(BookDetailEvent::Back),
            TuiEvent::CursorUp | TuiEvent::ScrollUp => -1,
            TuiEvent::CursorDown | TuiEvent::ScrollDown => 1,
            TuiEvent::PrevPage => -page,
            TuiEvent::NextPage => page,
            TuiEvent::CursorHome => i32::MIN / 2,
            TuiEvent::CursorEnd => i32::MAX / 2,
            _ => return None,
        };
        self.state.scroll_by(delta);
        Some(BookDetailEvent::Scrolled)
    }
}
