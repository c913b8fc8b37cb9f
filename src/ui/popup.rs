//! Help overlay listing every action and its key bindings.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use crate::config::{Action, AppConfig};

/// Rows that aren't configurable but still worth listing.
const FIXED_KEYS: &[(&str, &str)] = &[
    ("Top / Bottom", "Home/End"),
    ("Submit URL", "Enter"),
    ("Cancel editing", "Esc"),
    ("Force quit", "Ctrl+c"),
];

pub struct HelpPopup<'a> {
    pub config: &'a AppConfig,
}

impl<'a> Widget for HelpPopup<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // actions + fixed rows + 3 blanks + 1 hint + 2 border
        let height = (Action::ALL.len() + FIXED_KEYS.len()) as u16 + 6;
        let popup = centered_fixed(52, height, area);
        Clear.render(popup, buf);

        let block = Block::default()
            .title(" Keys ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(popup);
        block.render(popup, buf);

        let inner_width = inner.width as usize;
        let row = |label: &str, keys: String| {
            // Fixed-width columns: label left-aligned, keys right-aligned.
            let label_col = format!("   {label:<22}");
            let keys_width = inner_width.saturating_sub(label_col.chars().count()).max(1);
            Line::from(vec![
                Span::styled(label_col, Style::default().fg(Color::White)),
                Span::styled(format!("{keys:>keys_width$}"), Style::default().fg(Color::Yellow)),
            ])
        };

        let mut lines = vec![Line::raw("")];
        for &action in Action::ALL {
            lines.push(row(action.label(), self.config.display_bindings(action)));
        }
        lines.push(Line::raw(""));
        for &(label, keys) in FIXED_KEYS {
            lines.push(row(label, keys.to_string()));
        }
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "  Esc/?: close",
            Style::default().fg(Color::DarkGray),
        )));

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Create a centered rectangle with fixed dimensions, clamped to the available area.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_fixed_clamps() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(centered_fixed(52, 20, area), Rect::new(24, 10, 52, 20));
        assert_eq!(centered_fixed(52, 20, Rect::new(0, 0, 30, 10)), Rect::new(0, 0, 30, 10));
    }

    #[test]
    fn test_lists_bindings() {
        let config = AppConfig::default();
        let area = Rect::new(0, 0, 80, 30);
        let mut buf = Buffer::empty(area);
        HelpPopup { config: &config }.render(area, &mut buf);

        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|(x, y)| buf[(x, y)].symbol().to_string())
            .collect();
        assert!(text.contains("New Tab"));
        assert!(text.contains("t/Ctrl+t"));
        assert!(text.contains("Force quit"));
    }
}
