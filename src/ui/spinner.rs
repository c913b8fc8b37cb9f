//! Loading indicator: a small spinner + label rendered on the top border of
//! the page area.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

/// Braille-dot spinner frames.  Cycles through these on each tick.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn frame(tick: u64) -> &'static str {
    SPINNER_FRAMES[(tick as usize) % SPINNER_FRAMES.len()]
}

/// A "loading…" indicator, drawn top-right of `area` while visible.
pub struct LoadIndicator {
    pub visible: bool,
    pub tick: u64,
}

impl Widget for LoadIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if !self.visible || area.width < 16 || area.height == 0 {
            return;
        }

        let label = format!(" {} loading ", frame(self.tick));
        let label_width = label.chars().count() as u16;
        // Top border row, leaving the corner character alone.
        let x = area.x + area.width.saturating_sub(label_width + 2);
        let y = area.y;

        let line = Line::from(Span::styled(
            label,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));

        buf.set_line(x, y, &line, label_width);
    }
}
