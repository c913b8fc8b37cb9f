//! Navigation bar: back / forward / refresh buttons, the URL field and the
//! search button.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Position, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget},
};

use super::layout::NavGeometry;
use super::theme::Theme;

pub struct NavBar<'a> {
    pub url: &'a str,
    /// Cursor as a char index into `url`.
    pub cursor: usize,
    pub focused: bool,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

/// First char of the URL shown in a field `width` cells wide, chosen so the
/// cursor stays visible.
fn scroll_offset(cursor: usize, width: usize) -> usize {
    if width == 0 {
        return cursor;
    }
    cursor.saturating_sub(width - 1)
}

/// Terminal cursor position for the URL field at `area` (the whole nav bar).
pub fn cursor_position(area: Rect, cursor: usize) -> Position {
    let url = NavGeometry::from_area(area).url;
    let width = url.width.saturating_sub(2) as usize;
    let col = cursor - scroll_offset(cursor, width);
    Position::new(url.x + 1 + col as u16, url.y + 1)
}

fn button(symbol: &str, enabled: bool, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_style());
    Paragraph::new(Line::from(Span::styled(
        symbol.to_string(),
        Theme::button_style(enabled),
    )))
    .alignment(Alignment::Center)
    .block(block)
    .render(area, buf);
}

impl<'a> Widget for NavBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let nav = NavGeometry::from_area(area);

        button("←", self.can_go_back, nav.back, buf);
        button("→", self.can_go_forward, nav.forward, buf);
        button("⟳", true, nav.refresh, buf);
        button("⌕", true, nav.search, buf);

        let border = if self.focused {
            Theme::focused_border_style()
        } else {
            Theme::border_style()
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        let inner = block.inner(nav.url);
        block.render(nav.url, buf);

        let width = inner.width as usize;
        let offset = if self.focused {
            scroll_offset(self.cursor, width)
        } else {
            0
        };
        let visible: String = self.url.chars().skip(offset).take(width).collect();
        buf.set_stringn(inner.x, inner.y, &visible, width, Theme::title_style());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_scroll_offset_keeps_cursor_visible() {
        assert_eq!(scroll_offset(5, 10), 0);
        assert_eq!(scroll_offset(9, 10), 0);
        assert_eq!(scroll_offset(10, 10), 1);
        assert_eq!(scroll_offset(30, 10), 21);
    }

    #[test]
    fn test_cursor_position_inside_url_field() {
        let area = Rect::new(0, 0, 80, 3);
        // URL field starts at x=15; its text at x=16.
        assert_eq!(cursor_position(area, 0), Position::new(16, 1));
        assert_eq!(cursor_position(area, 4), Position::new(20, 1));
        // A long URL scrolls: the cursor pins to the right edge.
        assert_eq!(cursor_position(area, 500), Position::new(16 + 57, 1));
    }

    #[test]
    fn test_renders_buttons_and_url() {
        let area = Rect::new(0, 0, 60, 3);
        let mut buf = Buffer::empty(area);
        NavBar {
            url: "/tmp/page.snap",
            cursor: 0,
            focused: false,
            can_go_back: false,
            can_go_forward: true,
        }
        .render(area, &mut buf);

        let middle = row(&buf, 1);
        assert!(middle.contains('←'));
        assert!(middle.contains('→'));
        assert!(middle.contains('⟳'));
        assert!(middle.contains("/tmp/page.snap"));
        assert_eq!(buf[(2, 1)].fg, Theme::button_style(false).fg.unwrap_or_default());
    }
}
