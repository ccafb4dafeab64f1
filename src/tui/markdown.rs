//! Markdown → ratatui `Text` for catalog prose.
//!
//! Open Library descriptions and author bios are free text that often
//! carries markdown: emphasis, reference links, `----` separators, and the
//! odd list. This renders the subset that shows up there into styled lines.
//! Code blocks render as plain indented text.

use pulldown_cmark::{CowStr, Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

/// Renders markdown `content` with `base_fg` as the body color.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);

    let mut w = Writer::new(base_fg);
    for event in Parser::new_ext(content, opts) {
        w.handle(event);
    }
    w.text
}

struct Writer {
    text: Text<'static>,
    base_fg: Color,
    /// Inline styles compose via `patch`, so bold inside italic stays italic.
    styles: Vec<Style>,
    quote_depth: usize,
    list_indices: Vec<Option<u64>>,
    in_code: bool,
    code_line_started: bool,
    link_url: Option<String>,
    needs_blank: bool,
}

impl Writer {
    fn new(base_fg: Color) -> Self {
        Self {
            text: Text::default(),
            base_fg,
            styles: vec![],
            quote_depth: 0,
            list_indices: vec![],
            in_code: false,
            code_line_started: false,
            link_url: None,
            needs_blank: false,
        }
    }

    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn new_line(&mut self) {
        let mut line = Line::default();
        for _ in 0..self.quote_depth {
            line.push_span(Span::styled("│ ", Style::default().fg(Color::DarkGray)));
        }
        self.text.lines.push(line);
    }

    fn push_span(&mut self, span: Span<'static>) {
        if self.text.lines.is_empty() {
            self.new_line();
        }
        if let Some(line) = self.text.lines.last_mut() {
            line.push_span(span);
        }
    }

    fn start_block(&mut self) {
        if self.needs_blank {
            self.text.lines.push(Line::default());
            self.needs_blank = false;
        }
        self.new_line();
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(t),
            Event::Code(c) => {
                let style = self.style().add_modifier(Modifier::BOLD);
                self.push_span(Span::styled(c.to_string(), style));
            }
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.new_line(),
            Event::Rule => {
                self.start_block();
                self.push_span(Span::styled(
                    "─".repeat(24),
                    Style::default().fg(Color::DarkGray),
                ));
                self.needs_blank = true;
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => {
                // List items already opened their line
                if !self.list_indices.is_empty() {
                    return;
                }
                self.start_block();
            }
            Tag::Heading { .. } => {
                self.start_block();
                self.push_style(Style::default().add_modifier(Modifier::BOLD));
            }
            Tag::BlockQuote(_) => {
                self.quote_depth += 1;
                self.push_style(Style::default().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(_) => {
                self.start_block();
                self.in_code = true;
                self.code_line_started = false;
            }
            Tag::List(start) => {
                if self.list_indices.is_empty() && self.needs_blank {
                    self.text.lines.push(Line::default());
                    self.needs_blank = false;
                }
                self.list_indices.push(start);
            }
            Tag::Item => {
                self.needs_blank = false;
                self.new_line();
                let indent = "  ".repeat(self.list_indices.len().saturating_sub(1));
                let marker = match self.list_indices.last_mut() {
                    Some(Some(n)) => {
                        let marker = format!("{indent}{n}. ");
                        *n += 1;
                        marker
                    }
                    _ => format!("{indent}• "),
                };
                self.push_span(Span::styled(marker, Style::default().fg(Color::DarkGray)));
            }
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(dest_url.to_string());
                self.push_style(Style::default().fg(Color::Cyan));
            }
            _ => {}
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph | TagEnd::CodeBlock => {
                self.in_code = false;
                self.needs_blank = true;
            }
            TagEnd::Heading(_) => {
                self.styles.pop();
                self.needs_blank = true;
            }
            TagEnd::BlockQuote(_) => {
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.styles.pop();
                self.needs_blank = true;
            }
            TagEnd::List(_) => {
                self.list_indices.pop();
                self.needs_blank = true;
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => {
                self.styles.pop();
            }
            TagEnd::Link => {
                self.styles.pop();
                // Catalog prose links mostly point back at openlibrary.org
                // or wikipedia; show the target after the text.
                if let Some(url) = self.link_url.take()
                    && !url.is_empty()
                {
                    self.push_span(Span::styled(
                        format!(" <{url}>"),
                        Style::default().fg(Color::DarkGray),
                    ));
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, cow: CowStr<'_>) {
        let text = cow.replace('\t', "    ");
        if self.in_code {
            let style = Style::default().fg(self.base_fg).add_modifier(Modifier::DIM);
            for line in text.lines() {
                if self.code_line_started {
                    self.new_line();
                }
                self.code_line_started = true;
                self.push_span(Span::styled(format!("    {line}"), style));
            }
            return;
        }
        let style = self.style();
        self.push_span(Span::styled(text, style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_lines(text: &Text<'_>) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn plain_text_uses_base_color() {
        let text = render("A desert planet.", Color::Green);
        assert_eq!(text.lines[0].spans[0].style.fg, Some(Color::Green));
        assert_eq!(plain_lines(&text), vec!["A desert planet."]);
    }

    #[test]
    fn paragraphs_separated_by_blank_line() {
        let text = render("First.\n\nSecond.", Color::White);
        assert_eq!(plain_lines(&text), vec!["First.", "", "Second."]);
    }

    #[test]
    fn emphasis_is_italic() {
        let text = render("The *Dune* saga", Color::White);
        let span = text.lines[0]
            .spans
            .iter()
            .find(|s| s.content == "Dune")
            .unwrap();
        assert!(span.style.add_modifier.contains(Modifier::ITALIC));
        assert_eq!(span.style.fg, Some(Color::White));
    }

    #[test]
    fn reference_link_shows_target() {
        let text = render(
            "From [Wikipedia][1]\n\n[1]: https://en.wikipedia.org/wiki/Dune",
            Color::White,
        );
        let lines = plain_lines(&text);
        assert_eq!(lines[0], "From Wikipedia <https://en.wikipedia.org/wiki/Dune>");
    }

    #[test]
    fn rule_renders_separator() {
        let text = render("Body\n\n----------\n\nSource", Color::White);
        let lines = plain_lines(&text);
        assert!(lines.iter().any(|l| l.starts_with("───")));
        assert_eq!(lines.last().map(String::as_str), Some("Source"));
    }

    #[test]
    fn list_items_get_markers() {
        let text = render("- one\n- two", Color::White);
        assert_eq!(plain_lines(&text), vec!["• one", "• two"]);
    }

    #[test]
    fn code_block_is_indented_plain_text() {
        let text = render("```\nline1\n\tline2\n```", Color::White);
        let lines = plain_lines(&text);
        assert!(lines.contains(&"    line1".to_string()));
        assert!(lines.contains(&"        line2".to_string()));
    }
}
