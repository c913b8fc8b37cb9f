//! Colour palette and text styles used across the UI.

use ratatui::style::{Color, Modifier, Style};

use crate::core::display::{FontWeight, StyledText};

/// Central theme: change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    // ── page ───────────────────────────────────────────────────
    pub fn page_style() -> Style {
        Style::default().bg(Color::White).fg(Color::Black)
    }

    /// Terminal style for a text drawable.  There is only one font size in a
    /// terminal, so large text is marked as a heading instead.
    pub fn text_style(text: &StyledText<'_>, heading_size: f64) -> Style {
        let mut style = Self::page_style();
        if text.weight == FontWeight::Bold {
            style = style.add_modifier(Modifier::BOLD);
        }
        if text.point_size >= heading_size {
            style = style.fg(Color::Blue).add_modifier(Modifier::BOLD);
        }
        style
    }

    pub fn placeholder_style() -> Style {
        Self::page_style()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn focused_border_style() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD)
    }

    pub fn button_style(enabled: bool) -> Style {
        if enabled {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    pub fn tab_style(active: bool) -> Style {
        if active {
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().bg(Color::DarkGray).fg(Color::White)
        }
    }

    pub fn tab_close_style() -> Style {
        Style::default().fg(Color::LightRed)
    }

    pub fn new_tab_style() -> Style {
        Style::default().bg(Color::Blue).fg(Color::White)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn error_status_style() -> Style {
        Style::default().bg(Color::Red).fg(Color::White)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled(point_size: f64, weight: FontWeight) -> StyledText<'static> {
        StyledText {
            text: "x",
            font_family: "Arial",
            point_size,
            weight,
        }
    }

    #[test]
    fn test_text_styles() {
        let body = Theme::text_style(&styled(16.0, FontWeight::Regular), 24.0);
        assert!(!body.add_modifier.contains(Modifier::BOLD));

        let bold = Theme::text_style(&styled(16.0, FontWeight::Bold), 24.0);
        assert!(bold.add_modifier.contains(Modifier::BOLD));

        let heading = Theme::text_style(&styled(32.0, FontWeight::Regular), 24.0);
        assert_eq!(heading.fg, Some(Color::Blue));
        assert!(heading.add_modifier.contains(Modifier::BOLD));
    }
}
