//! Layout helpers: split the terminal area into regions.
//!
//! The same geometry drives rendering and mouse hit-testing, so a click
//! always lands on what was drawn.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Primary screen layout: browser chrome on top, page in the middle, and a
/// status bar at the bottom.
pub struct AppLayout {
    pub nav_area: Rect,
    pub tab_area: Rect,
    pub page_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Compute the layout from the full terminal area.
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // navigation buttons + URL bar
                Constraint::Length(1), // tab strip
                Constraint::Min(3),    // page (takes all remaining space)
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            nav_area: chunks[0],
            tab_area: chunks[1],
            page_area: chunks[2],
            status_area: chunks[3],
        }
    }

    /// Rows of page content visible inside the page border.
    pub fn page_view_rows(&self) -> usize {
        self.page_area.height.saturating_sub(2) as usize
    }
}

/// Regions of the navigation bar.
pub struct NavGeometry {
    pub back: Rect,
    pub forward: Rect,
    pub refresh: Rect,
    pub url: Rect,
    pub search: Rect,
}

impl NavGeometry {
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(5),
                Constraint::Length(5),
                Constraint::Min(10),
                Constraint::Length(5),
            ])
            .split(area);

        Self {
            back: chunks[0],
            forward: chunks[1],
            refresh: chunks[2],
            url: chunks[3],
            search: chunks[4],
        }
    }
}

/// Does `rect` contain the cell at (`col`, `row`)?
pub fn hit(rect: Rect, col: u16, row: u16) -> bool {
    col >= rect.x
        && col < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
