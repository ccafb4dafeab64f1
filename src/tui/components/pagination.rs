//! # Pagination Component
//!
//! `‹ Previous   Page 2 of 3   Next ›` under the search results. Stateless:
//! the page keys are handled by the event loop, which asks `previous()` and
//! `next()` for the target page.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: u32,
    pub total_pages: u32,
}

impl Pagination {
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        Self {
            current_page,
            total_pages,
        }
    }

    /// Only worth drawing when there is more than one page.
    pub fn is_visible(&self) -> bool {
        self.total_pages > 1
    }

    pub fn previous(&self) -> Option<u32> {
        (self.current_page > 1).then(|| (self.current_page - 1).min(self.total_pages.max(1)))
    }

    pub fn next(&self) -> Option<u32> {
        (self.current_page < self.total_pages).then_some(self.current_page + 1)
    }
}

fn control(label: &'static str, enabled: bool) -> Span<'static> {
    if enabled {
        Span::styled(
            label,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(label, Style::default().fg(Color::DarkGray))
    }
}

impl Component for Pagination {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        if !self.is_visible() {
            return;
        }
        let line = Line::from(vec![
            control("‹ Previous [", self.previous().is_some()),
            Span::raw(format!(
                "   Page {} of {}   ",
                self.current_page, self.total_pages
            )),
            control("] Next ›", self.next().is_some()),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }
}
