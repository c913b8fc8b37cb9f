//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::path::PathBuf;

use ratatui::layout::Rect;

use super::tabs::{BrowserTabs, TabId};
use super::url_bar::UrlEditor;
use crate::config::AppConfig;
use crate::core::engine::RenderEngine;

/// Which view / overlay currently receives input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Page,
    UrlBar,
    Help,
}

/// A file read the event loop still has to start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRequest {
    pub tab: TabId,
    pub generation: u64,
    pub path: PathBuf,
}

/// Top-level application state.
pub struct AppState<E: RenderEngine> {
    /// Engine used to build every tab's render tree.
    pub engine: E,
    pub tabs: BrowserTabs<E>,
    pub config: AppConfig,
    /// Contents of the URL bar (mirrors the active tab unless being edited).
    pub url_bar: UrlEditor,
    pub active_view: ActiveView,
    /// An optional status message shown in the bottom bar.
    pub status_message: Option<String>,
    /// File loads queued by input handling, drained by the event loop.
    pub pending_loads: Vec<LoadRequest>,
    /// Terminal area of the last drawn frame (for mouse hit-testing).
    pub screen: Rect,
    /// Monotonic tick counter (drives the loading spinner).
    pub tick: u64,
    /// Controls the main event loop.
    pub should_quit: bool,
}

impl<E: RenderEngine + Clone> AppState<E> {
    pub fn new(engine: E, config: AppConfig) -> Self {
        let tabs = BrowserTabs::new(&engine);
        let mut state = Self {
            engine,
            tabs,
            config,
            url_bar: UrlEditor::default(),
            active_view: ActiveView::default(),
            status_message: None,
            pending_loads: Vec::new(),
            screen: Rect::default(),
            tick: 0,
            should_quit: false,
        };
        state.sync_url_bar();
        state
    }

    /// Show the active tab's current URL in the URL bar.
    pub fn sync_url_bar(&mut self) {
        let url = self.tabs.active().history.current().to_string();
        self.url_bar.set(url);
    }
}
