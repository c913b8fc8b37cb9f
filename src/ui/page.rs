//! Page view: draws a tab's display list into the terminal.
//!
//! Each item is asked for its drawable form and placed at the cell its pixel
//! position maps to.  Items scrolled out of view or lying past the right
//! edge are clipped.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    widgets::{Block, Widget},
};

use super::theme::Theme;
use crate::core::display::{DisplayItem, Drawable};
use crate::core::viewport::CellMetrics;

pub struct PageWidget<'a> {
    pub items: &'a [DisplayItem],
    pub metrics: CellMetrics,
    pub heading_size: f64,
    /// First content row shown.
    pub scroll: usize,
    pub block: Option<Block<'a>>,
    /// Shown dimmed when there is nothing to draw.
    pub placeholder: Option<&'a str>,
}

impl<'a> Widget for PageWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, Theme::page_style());
        let inner = match self.block {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };
        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let mut drawn = 0;
        for item in self.items {
            let Drawable::Text(text) = item.render() else {
                continue;
            };
            let (col, row) = self.metrics.cell_of(item.position());
            let Some(row) = row.checked_sub(self.scroll) else {
                continue;
            };
            if row >= inner.height as usize || col >= inner.width as usize {
                continue;
            }

            // One line per item; embedded newlines would break the grid.
            let line: String = text
                .text
                .chars()
                .map(|c| if c.is_control() { ' ' } else { c })
                .collect();
            let x = inner.x + col as u16;
            let y = inner.y + row as u16;
            let room = (inner.right() - x) as usize;
            buf.set_stringn(x, y, &line, room, Theme::text_style(&text, self.heading_size));
            drawn += 1;
        }

        if drawn == 0 {
            if let Some(placeholder) = self.placeholder {
                buf.set_stringn(
                    inner.x + 1,
                    inner.y,
                    placeholder,
                    inner.width.saturating_sub(1) as usize,
                    Theme::placeholder_style(),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Modifier;

    use crate::core::display::TextItem;

    fn text(value: &str, x: f64, y: f64, size: f64, bold: bool) -> DisplayItem {
        let mut item = DisplayItem::text(TextItem {
            value: value.into(),
            font_family: "Times New Roman".into(),
            font_size: size,
            bold,
        });
        item.set_position(x, y);
        item
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    fn widget(items: &[DisplayItem], scroll: usize) -> PageWidget<'_> {
        PageWidget {
            items,
            metrics: CellMetrics::default(),
            heading_size: 24.0,
            scroll,
            block: None,
            placeholder: None,
        }
    }

    #[test]
    fn test_items_land_on_mapped_cells() {
        let items = vec![
            text("Title", 16.0, 0.0, 32.0, true),
            text("body text", 0.0, 32.0, 16.0, false),
        ];
        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        widget(&items, 0).render(area, &mut buf);

        assert_eq!(row(&buf, 0), "  Title             ");
        assert_eq!(row(&buf, 2), "body text           ");
        assert!(buf[(2, 0)].modifier.contains(Modifier::BOLD));
        assert!(!buf[(0, 2)].modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn test_scroll_and_clip() {
        let items = vec![
            text("gone", 0.0, 0.0, 16.0, false),
            text("first", 0.0, 16.0, 16.0, false),
            text("far below", 0.0, 160.0, 16.0, false),
            text("truncated line", 64.0, 16.0, 16.0, false),
            text("off to the right", 400.0, 16.0, 16.0, false),
        ];
        let area = Rect::new(0, 0, 12, 3);
        let mut buf = Buffer::empty(area);
        widget(&items, 1).render(area, &mut buf);

        assert_eq!(row(&buf, 0), "first   trun");
        assert_eq!(row(&buf, 1).trim(), "");
        assert_eq!(row(&buf, 2).trim(), "");
    }

    #[test]
    fn test_newlines_are_flattened() {
        let items = vec![text("a\nb", 0.0, 0.0, 16.0, false)];
        let area = Rect::new(0, 0, 5, 2);
        let mut buf = Buffer::empty(area);
        widget(&items, 0).render(area, &mut buf);
        assert_eq!(row(&buf, 0), "a b  ");
    }

    #[test]
    fn test_placeholder_for_empty_page() {
        let area = Rect::new(0, 0, 20, 2);
        let mut buf = Buffer::empty(area);
        PageWidget {
            placeholder: Some("(empty page)"),
            ..widget(&[], 0)
        }
        .render(area, &mut buf);
        assert!(row(&buf, 0).contains("(empty page)"));
    }
}
