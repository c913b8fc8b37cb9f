//! Tab strip: one fixed-width button per tab with a close mark, followed by
//! a `+` button.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::Widget,
};

use super::layout::hit;
use super::spinner;
use super::theme::Theme;

const TAB_WIDTH: u16 = 20;
const MIN_TAB_WIDTH: u16 = 8;
const NEW_TAB_WIDTH: u16 = 3;
const CLOSE_WIDTH: u16 = 3;

/// Screen regions of one tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabSlot {
    /// Index of the tab this slot shows.
    pub index: usize,
    pub tab: Rect,
    pub close: Rect,
}

/// Geometry of the whole strip.  When not every tab fits, the strip shows a
/// window of consecutive tabs that contains the active one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabStrip {
    pub slots: Vec<TabSlot>,
    pub new_tab: Option<Rect>,
}

pub fn tab_strip(area: Rect, count: usize, active: usize) -> TabStrip {
    let mut slots = Vec::new();
    if area.height == 0 || area.width <= NEW_TAB_WIDTH {
        return TabStrip { slots, new_tab: None };
    }

    // The `+` button always keeps its place; tabs share what is left and
    // shrink down to a readable minimum.
    let available = area.width.saturating_sub(1 + NEW_TAB_WIDTH);
    let per_tab = match u16::try_from(count) {
        Ok(0) => TAB_WIDTH,
        Ok(n) => (available / n).saturating_sub(1),
        Err(_) => 0,
    };
    let width = per_tab.clamp(MIN_TAB_WIDTH, TAB_WIDTH);
    let fits = (available / (width + 1)) as usize;
    let visible = count.min(fits);

    let first = if active < visible {
        0
    } else {
        (active + 1).min(count) - visible
    };

    let mut x = area.x + 1;
    for index in first..first + visible {
        let tab = Rect::new(x, area.y, width, 1);
        let close = Rect::new(x + width - CLOSE_WIDTH, area.y, CLOSE_WIDTH, 1);
        slots.push(TabSlot { index, tab, close });
        x += width + 1;
    }

    let new_tab = Some(Rect::new(x, area.y, NEW_TAB_WIDTH, 1));
    TabStrip { slots, new_tab }
}

/// What a click on the strip means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabHit {
    Select(usize),
    Close(usize),
    NewTab,
}

pub fn hit_test(area: Rect, count: usize, active: usize, col: u16, row: u16) -> Option<TabHit> {
    let strip = tab_strip(area, count, active);
    for slot in &strip.slots {
        if hit(slot.close, col, row) {
            return Some(TabHit::Close(slot.index));
        }
        if hit(slot.tab, col, row) {
            return Some(TabHit::Select(slot.index));
        }
    }
    match strip.new_tab {
        Some(rect) if hit(rect, col, row) => Some(TabHit::NewTab),
        _ => None,
    }
}

// ───────────────────────────────────────── widget ────────────

pub struct TabLabel<'a> {
    pub title: &'a str,
    pub loading: bool,
}

pub struct TabBar<'a> {
    pub tabs: Vec<TabLabel<'a>>,
    pub active: usize,
    pub tick: u64,
}

impl<'a> Widget for TabBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let strip = tab_strip(area, self.tabs.len(), self.active);
        let frame = spinner::frame(self.tick);

        for slot in &strip.slots {
            let Some(label) = self.tabs.get(slot.index) else {
                continue;
            };
            let style = Theme::tab_style(slot.index == self.active);
            let title_width = slot.tab.width.saturating_sub(CLOSE_WIDTH + 1) as usize;
            let icon = if label.loading { frame } else { " " };
            let title: String = label.title.chars().take(title_width.saturating_sub(2)).collect();
            let text = format!("{icon} {title:<w$}", w = title_width.saturating_sub(2));

            buf.set_stringn(slot.tab.x, slot.tab.y, &text, slot.tab.width as usize, style);
            buf.set_line(
                slot.close.x,
                slot.close.y,
                &Line::from(Span::styled(" × ", Theme::tab_close_style().bg(style.bg.unwrap_or_default()))),
                CLOSE_WIDTH,
            );
        }

        if let Some(rect) = strip.new_tab {
            buf.set_stringn(rect.x, rect.y, " + ", rect.width as usize, Theme::new_tab_style());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_width_tabs() {
        let strip = tab_strip(Rect::new(0, 3, 100, 1), 2, 0);
        assert_eq!(strip.slots.len(), 2);
        assert_eq!(strip.slots[0].tab, Rect::new(1, 3, 20, 1));
        assert_eq!(strip.slots[0].close, Rect::new(18, 3, 3, 1));
        assert_eq!(strip.slots[1].tab.x, 22);
        assert_eq!(strip.new_tab, Some(Rect::new(43, 3, 3, 1)));
    }

    #[test]
    fn test_tabs_shrink_then_clip() {
        let strip = tab_strip(Rect::new(0, 0, 40, 1), 4, 0);
        assert!(strip.slots.iter().all(|s| s.tab.width == MIN_TAB_WIDTH));
        assert_eq!(strip.slots.len(), 4);

        let crowded = tab_strip(Rect::new(0, 0, 40, 1), 10, 0);
        assert!(crowded.slots.len() < 10);
        assert!(crowded.slots.iter().all(|s| s.tab.x + s.tab.width <= 40));
    }

    #[test]
    fn test_crowded_strip_keeps_active_tab_and_new_button() {
        let area = Rect::new(0, 0, 40, 1);
        let strip = tab_strip(area, 10, 9);
        let indices: Vec<usize> = strip.slots.iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![6, 7, 8, 9]);
        assert_eq!(strip.new_tab, Some(Rect::new(37, 0, 3, 1)));

        // Clicks map back to the real tab indices.
        assert_eq!(hit_test(area, 10, 9, 2, 0), Some(TabHit::Select(6)));
        assert_eq!(hit_test(area, 10, 9, 35, 0), Some(TabHit::Close(9)));
        assert_eq!(hit_test(area, 10, 9, 38, 0), Some(TabHit::NewTab));

        // An active tab inside the first window leaves the strip unscrolled.
        let start = tab_strip(area, 10, 2);
        assert_eq!(start.slots[0].index, 0);

        let huge = tab_strip(area, usize::MAX, 5);
        assert!(huge.slots.iter().any(|s| s.index == 5));
        assert!(huge.new_tab.is_some());
    }

    #[test]
    fn test_hit_test() {
        let area = Rect::new(0, 3, 100, 1);
        assert_eq!(hit_test(area, 2, 0, 5, 3), Some(TabHit::Select(0)));
        assert_eq!(hit_test(area, 2, 0, 19, 3), Some(TabHit::Close(0)));
        assert_eq!(hit_test(area, 2, 0, 30, 3), Some(TabHit::Select(1)));
        assert_eq!(hit_test(area, 2, 0, 44, 3), Some(TabHit::NewTab));
        assert_eq!(hit_test(area, 2, 0, 80, 3), None);
        assert_eq!(hit_test(area, 2, 0, 5, 4), None);
    }

    #[test]
    fn test_renders_titles() {
        let area = Rect::new(0, 0, 60, 1);
        let mut buf = Buffer::empty(area);
        TabBar {
            tabs: vec![
                TabLabel { title: "New Tab", loading: false },
                TabLabel { title: "page.html", loading: true },
            ],
            active: 1,
            tick: 0,
        }
        .render(area, &mut buf);

        let row: String = (0..area.width)
            .map(|x| buf[(x, 0)].symbol().to_string())
            .collect();
        assert!(row.contains("New Tab"));
        assert!(row.contains("⠋ page.html"));
        assert!(row.contains(" + "));
    }
}
