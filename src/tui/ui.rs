use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::catalog::BookSummary;
use crate::core::state::{App, Screen};
use crate::tui::component::Component;
use crate::tui::components::book_grid::CARD_HEIGHT;
use crate::tui::components::{BookDetail, BookGrid, Pagination, TitleBar};
use crate::tui::{Focus, TuiState};

/// Rows for the recently viewed strip: heading plus one row of cards.
const RECENT_HEIGHT: u16 = CARD_HEIGHT + 1;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(RECENT_HEIGHT), Length(1)]);
    let [title_area, main_area, recent_area, help_area] = layout.areas(frame.area());

    let mut title_bar = TitleBar::new(
        app.navigator.current().to_string(),
        app.status_message.clone(),
        app.is_loading(),
    );
    title_bar.spinner_frame = spinner_frame;
    title_bar.render(frame, title_area);

    match app.screen() {
        Screen::Search => draw_search(frame, main_area, app, tui),
        Screen::Detail => {
            BookDetail::new(&mut tui.detail, &app.detail, &app.covers).render(frame, main_area)
        }
    }

    let recent: &[BookSummary] = app
        .scope
        .books()
        .map(|books| books.recently_viewed())
        .unwrap_or_default();
    BookGrid::new(&mut tui.recent, recent, "Recently viewed")
        .focused(tui.focus == Focus::Recent)
        .empty_message("Books you open show up here")
        .render(frame, recent_area);

    frame.render_widget(
        Line::from(Span::styled(
            help_text(app.screen()),
            Style::default().fg(Color::DarkGray),
        )),
        help_area,
    );
}

fn help_text(screen: Screen) -> &'static str {
    match screen {
        Screen::Search => {
            "Tab Focus · ←→↑↓ Select · Enter Open · [ ] Page · Alt+←/→ History · Ctrl+C Quit"
        }
        Screen::Detail => "Esc Back · ↑↓ Scroll · Tab Focus · Alt+←/→ History · Ctrl+C Quit",
    }
}

fn draw_search(frame: &mut Frame, area: Rect, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let [search_area, results_area, pagination_area] =
        Layout::vertical([Length(3), Min(0), Length(1)]).areas(area);

    tui.search_bar.focused = tui.focus == Focus::SearchBar;
    tui.search_bar.render(frame, search_area);

    let search = &app.search;
    if let Some(error) = &search.error {
        draw_notice(frame, results_area, error, Color::Red);
        return;
    }

    if search.is_loading {
        draw_notice(frame, results_area, "Loading books...", Color::DarkGray);
        return;
    }
    let Some(page) = &search.results else {
        let notice = "Type a title and press Enter to search Open Library";
        draw_notice(frame, results_area, notice, Color::DarkGray);
        return;
    };

    let title = format!("Results for \"{}\"", search.results_term);
    let empty = if page.num_found == 0 {
        "No books found"
    } else {
        "No books with covers on this page"
    };
    BookGrid::new(&mut tui.results, &page.books, &title)
        .focused(tui.focus == Focus::Results)
        .empty_message(empty)
        .render(frame, results_area);

    let current_page = app
        .scope
        .books()
        .map(|books| books.current_page())
        .unwrap_or(1);
    Pagination::new(current_page, page.total_pages).render(frame, pagination_area);
}

fn draw_notice(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let paragraph = Paragraph::new(message)
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    frame.render_widget(paragraph, area);
}
