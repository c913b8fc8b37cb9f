//! Tab bookkeeping.
//!
//! Each tab owns its history, scroll position, and, when a page is shown,
//! its own [`TreeAdapter`] (and through it, its own engine tree).  Tabs are
//! addressed by a stable [`TabId`] so background loads still find the right
//! tab after others have been closed.

use crate::core::{
    adapter::TreeAdapter,
    display::DisplayItem,
    engine::RenderEngine,
    history::History,
    url::NEW_TAB_URL,
    viewport::ViewportState,
};

pub type TabId = u64;

// ───────────────────────────────────────── tab ───────────────

pub struct Tab<E: RenderEngine> {
    pub id: TabId,
    pub title: String,
    pub history: History,
    pub viewport: ViewportState,
    /// `None` renders as an empty document.
    page: Option<TreeAdapter<E>>,
    /// Why the last page could not be shown, if it couldn't.
    pub error: Option<String>,
    pub loading: bool,
    /// Bumped per load so late results for superseded loads are dropped.
    pub load_generation: u64,
}

impl<E: RenderEngine + Clone> Tab<E> {
    fn new(id: TabId) -> Self {
        Self {
            id,
            title: "New Tab".to_string(),
            history: History::new(NEW_TAB_URL),
            viewport: ViewportState::default(),
            page: None,
            error: None,
            loading: false,
            load_generation: 0,
        }
    }

    /// Replace the page with a freshly built one.  The previous display list
    /// is discarded as a whole.
    pub fn show_markup(&mut self, engine: &E, markup: &str) {
        self.loading = false;
        match TreeAdapter::construct(engine.clone(), markup) {
            Ok(adapter) => {
                self.page = Some(adapter);
                self.error = None;
            }
            Err(err) => {
                tracing::warn!(tab = self.id, engine = E::NAME, "render tree construction failed: {err}");
                self.page = None;
                self.error = Some(err.to_string());
            }
        }
    }

    /// Drop the page and show `message` instead.
    pub fn show_error(&mut self, message: impl Into<String>) {
        self.loading = false;
        self.page = None;
        self.error = Some(message.into());
    }

    /// Start a background load; returns its generation.
    pub fn begin_load(&mut self) -> u64 {
        self.load_generation += 1;
        self.loading = true;
        self.load_generation
    }

    pub fn render_list(&self) -> &[DisplayItem] {
        match &self.page {
            Some(page) => page.render_list(),
            None => &[],
        }
    }
}

// ───────────────────────────────────────── tab list ──────────

pub struct BrowserTabs<E: RenderEngine> {
    tabs: Vec<Tab<E>>,
    active: usize,
    next_id: TabId,
}

impl<E: RenderEngine + Clone> BrowserTabs<E> {
    /// A tab list holding one new tab.
    pub fn new(engine: &E) -> Self {
        let mut tabs = Self {
            tabs: Vec::new(),
            active: 0,
            next_id: 0,
        };
        tabs.add_tab(engine);
        tabs
    }

    /// Open a new tab showing the engine's placeholder page and activate it.
    pub fn add_tab(&mut self, engine: &E) -> TabId {
        let index = self.tabs.len();
        let id = self.next_id;
        self.next_id += 1;

        let mut tab = Tab::new(id);
        tab.show_markup(engine, &engine.blank_page(&format!("Tab {index}")));
        self.tabs.push(tab);
        self.active = index;
        tracing::debug!(tab = id, index, "opened tab");
        id
    }

    /// Close the tab at `index`.  The last remaining tab is never closed.
    pub fn remove_tab(&mut self, index: usize) -> bool {
        if self.tabs.len() <= 1 || index >= self.tabs.len() {
            return false;
        }
        let closed = self.tabs.remove(index);
        tracing::debug!(tab = closed.id, index, "closed tab");

        if self.active > index {
            self.active -= 1;
        } else if self.active >= self.tabs.len() {
            self.active = self.tabs.len() - 1;
        }
        true
    }

    pub fn select(&mut self, index: usize) -> bool {
        if index < self.tabs.len() {
            self.active = index;
            true
        } else {
            false
        }
    }

    pub fn select_next(&mut self) {
        self.active = (self.active + 1) % self.tabs.len();
    }

    pub fn select_prev(&mut self) {
        self.active = (self.active + self.tabs.len() - 1) % self.tabs.len();
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active(&self) -> &Tab<E> {
        &self.tabs[self.active]
    }

    pub fn active_mut(&mut self) -> &mut Tab<E> {
        &mut self.tabs[self.active]
    }

    pub fn get_mut(&mut self, id: TabId) -> Option<&mut Tab<E>> {
        self.tabs.iter_mut().find(|t| t.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tab<E>> {
        self.tabs.iter()
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }
}
