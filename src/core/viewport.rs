//! Mapping from engine pixels to terminal cells, plus per-tab scrolling.

use super::display::{DisplayItem, ItemKind, Position};

/// Size of one terminal cell in engine pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMetrics {
    pub width_px: f64,
    pub height_px: f64,
}

impl Default for CellMetrics {
    fn default() -> Self {
        Self {
            width_px: 8.0,
            height_px: 16.0,
        }
    }
}

impl CellMetrics {
    /// Cell containing `pos`.  Negative coordinates land in the first
    /// row/column.
    pub fn cell_of(&self, pos: Position) -> (usize, usize) {
        let col = (pos.x / self.width_px).floor().max(0.0) as usize;
        let row = (pos.y / self.height_px).floor().max(0.0) as usize;
        (col, row)
    }
}

/// Number of rows the page needs: one past the lowest row holding
/// something drawable.
pub fn content_rows(items: &[DisplayItem], metrics: CellMetrics) -> usize {
    items
        .iter()
        .filter(|item| !matches!(item.kind(), ItemKind::Empty))
        .map(|item| metrics.cell_of(item.position()).1 + 1)
        .max()
        .unwrap_or(0)
}

/// Vertical scroll state of one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewportState {
    /// First content row shown at the top of the view.
    pub scroll: usize,
}

impl ViewportState {
    /// Largest useful offset: the last content row at the top of the view.
    fn max_scroll(content_rows: usize, view_rows: usize) -> usize {
        if content_rows <= view_rows {
            0
        } else {
            content_rows - 1
        }
    }

    pub fn scroll_by(&mut self, delta: isize, content_rows: usize, view_rows: usize) {
        let max = Self::max_scroll(content_rows, view_rows);
        let next = if delta < 0 {
            self.scroll.saturating_sub(delta.unsigned_abs())
        } else {
            self.scroll.saturating_add(delta as usize)
        };
        self.scroll = next.min(max);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    /// Bring the last content row to the bottom of the view.
    pub fn scroll_to_bottom(&mut self, content_rows: usize, view_rows: usize) {
        self.scroll = content_rows.saturating_sub(view_rows);
    }

    /// Re-clamp after the content changed underneath us.
    pub fn clamp(&mut self, content_rows: usize, view_rows: usize) {
        self.scroll = self.scroll.min(Self::max_scroll(content_rows, view_rows));
    }
}
