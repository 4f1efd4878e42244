//! Log viewer widget.
//!
//! A bordered, scrolling log pane above a single start button.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::state::LogViewState;

const TITLE: &str = " Flutter Environment Setup ";
const BUTTON_LABEL: &str = "[ Start Setup ]";
const KEY_HINTS: &str = " Enter/s start  ↑↓ PgUp PgDn scroll  q quit ";

/// Widget rendering a [`LogViewState`].
pub struct LogView<'a> {
    state: &'a LogViewState,
}

impl<'a> LogView<'a> {
    pub fn new(state: &'a LogViewState) -> Self {
        Self { state }
    }

    fn button_style(&self) -> Style {
        if self.state.can_start() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    fn render_log(&self, area: Rect, buf: &mut Buffer) {
        let follow = if self.state.is_following() {
            ""
        } else {
            " [scrolled] "
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(TITLE)
            .title_bottom(Line::from(follow).alignment(Alignment::Right))
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(area);
        block.render(area, buf);

        let range = self.state.visible_range(inner.height as usize);
        let lines: Vec<Line> = self.state.lines()[range]
            .iter()
            .map(|line| Line::from(line.as_str()))
            .collect();
        Paragraph::new(lines).render(inner, buf);
    }

    fn render_footer(&self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Line::from(KEY_HINTS).style(Style::default().fg(Color::DarkGray)))
            .border_style(Style::default().fg(Color::DarkGray));
        let inner = block.inner(area);
        block.render(area, buf);

        let line = Line::from(vec![
            Span::styled(BUTTON_LABEL, self.button_style()),
            Span::raw("  "),
            Span::styled(
                self.state.status_text(),
                Style::default().fg(Color::Yellow),
            ),
        ]);
        Paragraph::new(line)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}

impl Widget for LogView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(area);

        self.render_log(chunks[0], buf);
        self.render_footer(chunks[1], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(state: &LogViewState, width: u16, height: u16) -> (Buffer, String) {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        LogView::new(state).render(area, &mut buf);
        let text = buf
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>();
        (buf, text)
    }

    fn find(buf: &Buffer, needle: &str) -> Option<(u16, u16)> {
        let area = buf.area;
        let width = needle.chars().count() as u16;
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right().saturating_sub(width) {
                let cells: String = (x..x + width).map(|cx| buf[(cx, y)].symbol()).collect();
                if cells == needle {
                    return Some((x, y));
                }
            }
        }
        None
    }

    #[test]
    fn test_renders_title_welcome_and_button() {
        let state = LogViewState::new();
        let (_, text) = render(&state, 60, 12);
        assert!(text.contains("Flutter Environment Setup"));
        assert!(text.contains("Press Enter to start Flutter setup."));
        assert!(text.contains("Start Setup"));
        assert!(text.contains("Ready"));
    }

    #[test]
    fn test_button_disabled_while_running() {
        let mut state = LogViewState::new();
        let (buf, _) = render(&state, 60, 12);
        let (x, y) = find(&buf, "Start Setup").unwrap();
        assert_eq!(buf[(x, y)].bg, Color::Green);

        state.start();
        let (buf, text) = render(&state, 60, 12);
        assert!(text.contains("Running..."));
        let (x, y) = find(&buf, "Start Setup").unwrap();
        assert_eq!(buf[(x, y)].fg, Color::DarkGray);
        assert_ne!(buf[(x, y)].bg, Color::Green);
    }

    #[test]
    fn test_shows_tail_of_long_log() {
        let mut state = LogViewState::new();
        for i in 0..50 {
            state.push_line(format!("step {:02}", i));
        }
        let (_, text) = render(&state, 40, 10);
        assert!(text.contains("step 49"));
        assert!(!text.contains("step 10"));
    }
}
