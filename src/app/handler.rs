//! Input handling: maps key/mouse events to state mutations.

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use crate::config::Action;
use crate::core::engine::RenderEngine;
use crate::core::url::{self, PageRequest};
use crate::core::viewport::content_rows;
use crate::ui::layout::{hit, AppLayout, NavGeometry};
use crate::ui::tab_bar::{self, TabHit};

use super::load_runtime::PageLoad;
use super::state::{ActiveView, AppState, LoadRequest};

/// Process a key event, dispatching based on the active view.
pub fn handle_key<E: RenderEngine + Clone>(state: &mut AppState<E>, key: KeyEvent) {
    if key.kind == KeyEventKind::Release {
        return;
    }

    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Page => handle_page_key(state, key),
        ActiveView::UrlBar => handle_url_key(state, key),
        ActiveView::Help => handle_help_key(state, key),
    }
}

// ── Page view (configurable bindings) ───────────────────────────

fn handle_page_key<E: RenderEngine + Clone>(state: &mut AppState<E>, key: KeyEvent) {
    match key.code {
        KeyCode::Home => {
            state.tabs.active_mut().viewport.scroll_to_top();
            return;
        }
        KeyCode::End => {
            let (content, view) = page_extent(state);
            state.tabs.active_mut().viewport.scroll_to_bottom(content, view);
            return;
        }
        _ => {}
    }

    if let Some(action) = state.config.match_key(key) {
        run_action(state, action);
    }
}

pub fn run_action<E: RenderEngine + Clone>(state: &mut AppState<E>, action: Action) {
    match action {
        Action::NewTab => {
            state.tabs.add_tab(&state.engine);
            state.sync_url_bar();
        }
        Action::CloseTab => {
            let index = state.tabs.active_index();
            if state.tabs.remove_tab(index) {
                state.sync_url_bar();
            } else {
                state.status_message = Some("Can't close the last tab".into());
            }
        }
        Action::NextTab => {
            state.tabs.select_next();
            state.sync_url_bar();
        }
        Action::PrevTab => {
            state.tabs.select_prev();
            state.sync_url_bar();
        }
        Action::Back => go_back(state),
        Action::Forward => go_forward(state),
        Action::Refresh => refresh(state),
        Action::FocusUrl => focus_url_bar(state),
        Action::ScrollUp => scroll_steps(state, -1),
        Action::ScrollDown => scroll_steps(state, 1),
        Action::PageUp => {
            let (_, view) = page_extent(state);
            scroll_page(state, -(view.max(1) as isize));
        }
        Action::PageDown => {
            let (_, view) = page_extent(state);
            scroll_page(state, view.max(1) as isize);
        }
        Action::Help => state.active_view = ActiveView::Help,
        Action::Quit => state.should_quit = true,
    }
}

// ── URL bar ─────────────────────────────────────────────────────

fn handle_url_key<E: RenderEngine + Clone>(state: &mut AppState<E>, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => {
            let input = state.url_bar.text().to_string();
            state.active_view = ActiveView::Page;
            navigate(state, &input);
        }
        KeyCode::Esc => {
            state.sync_url_bar();
            state.active_view = ActiveView::Page;
        }
        KeyCode::Backspace => state.url_bar.backspace(),
        KeyCode::Delete => state.url_bar.delete(),
        KeyCode::Left => state.url_bar.move_left(),
        KeyCode::Right => state.url_bar.move_right(),
        KeyCode::Home => state.url_bar.home(),
        KeyCode::End => state.url_bar.end(),
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            state.url_bar.insert(c);
        }
        _ => {}
    }
}

fn focus_url_bar<E: RenderEngine + Clone>(state: &mut AppState<E>) {
    state.sync_url_bar();
    state.active_view = ActiveView::UrlBar;
}

/// Pasted text always goes to the URL bar.
pub fn handle_paste<E: RenderEngine + Clone>(state: &mut AppState<E>, text: &str) {
    match state.active_view {
        ActiveView::UrlBar => {}
        ActiveView::Page => {
            state.url_bar.set(String::new());
            state.active_view = ActiveView::UrlBar;
        }
        ActiveView::Help => return,
    }
    for c in text.chars().filter(|c| !c.is_control()) {
        state.url_bar.insert(c);
    }
}

// ── Help overlay ────────────────────────────────────────────────

fn handle_help_key<E: RenderEngine + Clone>(state: &mut AppState<E>, key: KeyEvent) {
    let closes = matches!(key.code, KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?'))
        || state.config.match_key(key) == Some(Action::Help);
    if closes {
        state.active_view = ActiveView::Page;
    }
}

// ── Mouse ───────────────────────────────────────────────────────

pub fn handle_mouse<E: RenderEngine + Clone>(state: &mut AppState<E>, mouse: MouseEvent) {
    if state.active_view == ActiveView::Help {
        if let MouseEventKind::Down(_) = mouse.kind {
            state.active_view = ActiveView::Page;
        }
        return;
    }

    let layout = AppLayout::from_area(state.screen);
    let (col, row) = (mouse.column, mouse.row);

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if hit(layout.tab_area, col, row) {
                if state.active_view == ActiveView::UrlBar {
                    state.active_view = ActiveView::Page;
                }
                match tab_bar::hit_test(
                    layout.tab_area,
                    state.tabs.len(),
                    state.tabs.active_index(),
                    col,
                    row,
                ) {
                    Some(TabHit::Select(i)) => {
                        state.tabs.select(i);
                    }
                    Some(TabHit::Close(i)) => {
                        if !state.tabs.remove_tab(i) {
                            state.status_message = Some("Can't close the last tab".into());
                        }
                    }
                    Some(TabHit::NewTab) => {
                        state.tabs.add_tab(&state.engine);
                    }
                    None => return,
                }
                state.sync_url_bar();
                return;
            }

            if hit(layout.nav_area, col, row) {
                let nav = NavGeometry::from_area(layout.nav_area);
                if hit(nav.url, col, row) {
                    focus_url_bar(state);
                    return;
                }
                if hit(nav.search, col, row) {
                    state.url_bar.set(String::new());
                    state.active_view = ActiveView::UrlBar;
                    return;
                }
                state.active_view = ActiveView::Page;
                if hit(nav.back, col, row) {
                    go_back(state);
                } else if hit(nav.forward, col, row) {
                    go_forward(state);
                } else if hit(nav.refresh, col, row) {
                    refresh(state);
                }
                return;
            }

            // Clicking the page abandons an edit in progress.
            if state.active_view == ActiveView::UrlBar {
                state.sync_url_bar();
                state.active_view = ActiveView::Page;
            }
        }
        MouseEventKind::ScrollUp if hit(layout.page_area, col, row) => scroll_steps(state, -1),
        MouseEventKind::ScrollDown if hit(layout.page_area, col, row) => scroll_steps(state, 1),
        _ => {}
    }
}

// ── Navigation ──────────────────────────────────────────────────

/// Load URL-bar text into the active tab as a new history entry.
pub fn navigate<E: RenderEngine + Clone>(state: &mut AppState<E>, input: &str) {
    let (request, url) = url::resolve_with_text(input);
    tracing::debug!(?request, "navigate");
    state.tabs.active_mut().history.push(url);
    load_request(state, request);
    state.sync_url_bar();
}

pub fn go_back<E: RenderEngine + Clone>(state: &mut AppState<E>) {
    let Some(url) = state.tabs.active_mut().history.back().map(str::to_string) else {
        return;
    };
    load_request(state, url::resolve(&url));
    state.sync_url_bar();
}

pub fn go_forward<E: RenderEngine + Clone>(state: &mut AppState<E>) {
    let Some(url) = state.tabs.active_mut().history.forward().map(str::to_string) else {
        return;
    };
    load_request(state, url::resolve(&url));
    state.sync_url_bar();
}

/// Rebuild the current entry from scratch.
pub fn refresh<E: RenderEngine + Clone>(state: &mut AppState<E>) {
    let url = state.tabs.active().history.current().to_string();
    load_request(state, url::resolve(&url));
}

/// Show `request` in the active tab.  Built-in pages are constructed right
/// away; files are queued for the event loop to read.
fn load_request<E: RenderEngine + Clone>(state: &mut AppState<E>, request: PageRequest) {
    state.status_message = None;
    let index = state.tabs.active_index();
    let tab = state.tabs.active_mut();
    tab.title = url::title_for(&request);
    tab.viewport.scroll_to_top();
    // Any load still in flight for this tab is now stale.
    let generation = tab.begin_load();

    match request {
        PageRequest::NewTab => {
            let markup = state.engine.blank_page(&format!("Tab {index}"));
            tab.show_markup(&state.engine, &markup);
        }
        PageRequest::Blank => tab.show_markup(&state.engine, ""),
        PageRequest::File(path) => {
            tab.error = None;
            state.pending_loads.push(LoadRequest {
                tab: tab.id,
                generation,
                path,
            });
        }
        PageRequest::Unsupported(scheme) => {
            let message = format!("Can't load {scheme}: URLs, only local files are supported");
            tab.show_error(message.clone());
            state.status_message = Some(message);
        }
    }
}

/// Apply a finished background read.  Loads for closed tabs or superseded
/// requests are dropped.
pub fn apply_page_load<E: RenderEngine + Clone>(state: &mut AppState<E>, load: PageLoad) {
    let (_, view) = page_extent(state);
    let metrics = state.config.cell_metrics();

    let Some(tab) = state.tabs.get_mut(load.tab) else {
        tracing::debug!(tab = load.tab, "dropping page load for closed tab");
        return;
    };
    if load.generation != tab.load_generation {
        tracing::debug!(
            tab = load.tab,
            generation = load.generation,
            current = tab.load_generation,
            "dropping stale page load"
        );
        return;
    }

    match load.result {
        Ok(markup) => tab.show_markup(&state.engine, &markup),
        Err(err) => {
            tracing::warn!(tab = load.tab, "page load failed: {err:#}");
            tab.show_error(format!("{err:#}"));
        }
    }
    let content = content_rows(tab.render_list(), metrics);
    tab.viewport.clamp(content, view);
}

// ── Scrolling ───────────────────────────────────────────────────

/// (content rows of the active page, visible page rows)
fn page_extent<E: RenderEngine + Clone>(state: &AppState<E>) -> (usize, usize) {
    let view = AppLayout::from_area(state.screen).page_view_rows();
    let content = content_rows(state.tabs.active().render_list(), state.config.cell_metrics());
    (content, view)
}

/// Scroll by `steps` multiples of the configured step.
fn scroll_steps<E: RenderEngine + Clone>(state: &mut AppState<E>, steps: isize) {
    let delta = steps * state.config.scroll_step as isize;
    scroll_page(state, delta);
}

fn scroll_page<E: RenderEngine + Clone>(state: &mut AppState<E>, delta: isize) {
    let (content, view) = page_extent(state);
    state
        .tabs
        .active_mut()
        .viewport
        .scroll_by(delta, content, view);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::core::display::ItemKind;
    use crate::core::engine::snapshot::SnapshotEngine;
    use crate::core::url::NEW_TAB_URL;
    use ratatui::layout::Rect;

    fn state() -> AppState<SnapshotEngine> {
        let mut state = AppState::new(SnapshotEngine::new(), AppConfig::default());
        state.screen = Rect::new(0, 0, 80, 24);
        state
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_url(state: &mut AppState<SnapshotEngine>, text: &str) {
        handle_key(state, press(KeyCode::Char('o')));
        assert_eq!(state.active_view, ActiveView::UrlBar);
        for _ in 0..state.url_bar.text().chars().count() {
            handle_key(state, press(KeyCode::Backspace));
        }
        for c in text.chars() {
            handle_key(state, press(KeyCode::Char(c)));
        }
        handle_key(state, press(KeyCode::Enter));
    }

    fn click(state: &mut AppState<SnapshotEngine>, column: u16, row: u16) {
        handle_mouse(
            state,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            },
        );
    }

    fn finish_loads(state: &mut AppState<SnapshotEngine>, markup: &str) {
        for request in std::mem::take(&mut state.pending_loads) {
            apply_page_load(
                state,
                PageLoad {
                    tab: request.tab,
                    generation: request.generation,
                    result: Ok(markup.to_string()),
                },
            );
        }
    }

    fn texts(state: &AppState<SnapshotEngine>) -> Vec<String> {
        state
            .tabs
            .active()
            .render_list()
            .iter()
            .filter_map(|item| match item.kind() {
                ItemKind::Text(t) => Some(t.value.clone()),
                ItemKind::Empty => None,
            })
            .collect()
    }

    #[test]
    fn test_ctrl_c_quits_from_any_view() {
        let mut s = state();
        s.active_view = ActiveView::UrlBar;
        handle_key(&mut s, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(s.should_quit);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let mut s = state();
        let release =
            KeyEvent::new_with_kind(KeyCode::Char('t'), KeyModifiers::NONE, KeyEventKind::Release);
        handle_key(&mut s, release);
        assert_eq!(s.tabs.len(), 1);
    }

    #[test]
    fn test_new_and_close_tab_keys() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('t')));
        assert_eq!(s.tabs.len(), 2);
        assert_eq!(texts(&s), vec!["Tab 1"]);

        handle_key(&mut s, press(KeyCode::Char('w')));
        handle_key(&mut s, press(KeyCode::Char('w')));
        assert_eq!(s.tabs.len(), 1);
        assert!(s.status_message.is_some());
    }

    #[test]
    fn test_typing_a_path_queues_a_load() {
        let mut s = state();
        type_url(&mut s, "/tmp/page.snap");

        assert_eq!(s.active_view, ActiveView::Page);
        assert_eq!(s.pending_loads.len(), 1);
        assert!(s.tabs.active().loading);
        assert_eq!(s.tabs.active().title, "page.snap");
        assert_eq!(s.url_bar.text(), "/tmp/page.snap");

        finish_loads(&mut s, "root\ntext 0 0 16 regular \"Arial\" hello\n");
        assert_eq!(texts(&s), vec!["hello"]);
        assert!(!s.tabs.active().loading);
    }

    #[test]
    fn test_escape_restores_url() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('o')));
        handle_key(&mut s, press(KeyCode::Char('x')));
        assert_eq!(s.url_bar.text(), format!("{NEW_TAB_URL}x"));
        handle_key(&mut s, press(KeyCode::Esc));
        assert_eq!(s.url_bar.text(), NEW_TAB_URL);
        assert_eq!(s.active_view, ActiveView::Page);
    }

    #[test]
    fn test_stale_and_orphaned_loads_are_dropped() {
        let mut s = state();
        type_url(&mut s, "/tmp/a.snap");
        let first = s.pending_loads.remove(0);
        type_url(&mut s, "/tmp/b.snap");

        // The superseded read finishes late.
        apply_page_load(
            &mut s,
            PageLoad {
                tab: first.tab,
                generation: first.generation,
                result: Ok("root\ntext 0 0 16 regular \"Arial\" stale\n".into()),
            },
        );
        assert_eq!(texts(&s), vec!["Tab 0"]);

        finish_loads(&mut s, "root\ntext 0 0 16 regular \"Arial\" fresh\n");
        assert_eq!(texts(&s), vec!["fresh"]);

        apply_page_load(
            &mut s,
            PageLoad {
                tab: 99,
                generation: 1,
                result: Ok("root\n".into()),
            },
        );
        assert_eq!(texts(&s), vec!["fresh"]);
    }

    #[test]
    fn test_failed_read_shows_error() {
        let mut s = state();
        type_url(&mut s, "/tmp/missing.snap");
        let request = s.pending_loads.remove(0);
        apply_page_load(
            &mut s,
            PageLoad {
                tab: request.tab,
                generation: request.generation,
                result: Err(anyhow::anyhow!("could not read /tmp/missing.snap")),
            },
        );
        assert!(texts(&s).is_empty());
        assert!(s.tabs.active().error.as_deref().unwrap().contains("could not read"));
    }

    #[test]
    fn test_unsupported_scheme() {
        let mut s = state();
        type_url(&mut s, "https://example.com");
        assert!(s.pending_loads.is_empty());
        assert!(texts(&s).is_empty());
        assert!(s.status_message.as_deref().unwrap().contains("https"));
        assert_eq!(s.url_bar.text(), "https://example.com");
    }

    #[test]
    fn test_back_and_forward_reload_without_pushing() {
        let mut s = state();
        type_url(&mut s, "/tmp/a.snap");
        finish_loads(&mut s, "root\n");
        type_url(&mut s, "about:blank");
        assert!(s.pending_loads.is_empty());

        handle_key(&mut s, press(KeyCode::Char('b')));
        assert_eq!(s.url_bar.text(), "/tmp/a.snap");
        assert_eq!(s.pending_loads.len(), 1);
        finish_loads(&mut s, "root\n");

        handle_key(&mut s, press(KeyCode::Char('b')));
        assert_eq!(s.url_bar.text(), NEW_TAB_URL);
        assert_eq!(texts(&s), vec!["Tab 0"]);

        handle_key(&mut s, press(KeyCode::Char('f')));
        handle_key(&mut s, press(KeyCode::Char('f')));
        assert_eq!(s.url_bar.text(), "about:blank");
        assert!(!s.tabs.active().history.can_go_forward());
    }

    #[test]
    fn test_refresh_rebuilds_the_page() {
        let mut s = state();
        let before = s.engine.stats().inits();
        handle_key(&mut s, press(KeyCode::Char('r')));
        assert_eq!(s.engine.stats().inits(), before + 1);
        assert_eq!(s.engine.stats().live(), 1);
        assert_eq!(texts(&s), vec!["Tab 0"]);
    }

    #[test]
    fn test_scrolling_is_clamped() {
        let mut s = state();
        let markup: String = std::iter::once("root\n".to_string())
            .chain((0..40).map(|i| format!("text 0 {} 16 regular \"Arial\" line {i}\n", i * 16)))
            .collect();
        s.tabs.active_mut().show_markup(&s.engine, &markup);

        handle_key(&mut s, press(KeyCode::End));
        assert_eq!(s.tabs.active().viewport.scroll, 40 - 17);
        handle_key(&mut s, press(KeyCode::PageDown));
        assert_eq!(s.tabs.active().viewport.scroll, 39);
        handle_key(&mut s, press(KeyCode::Home));
        assert_eq!(s.tabs.active().viewport.scroll, 0);
        handle_key(&mut s, press(KeyCode::Up));
        assert_eq!(s.tabs.active().viewport.scroll, 0);
    }

    #[test]
    fn test_mouse_on_tab_strip() {
        let mut s = state();
        // Tab strip is row 3; the `+` follows the first tab.
        click(&mut s, 23, 3);
        assert_eq!(s.tabs.len(), 2);
        assert_eq!(s.tabs.active_index(), 1);

        click(&mut s, 5, 3);
        assert_eq!(s.tabs.active_index(), 0);

        click(&mut s, 19, 3);
        assert_eq!(s.tabs.len(), 1);
        assert_eq!(texts(&s), vec!["Tab 1"]);
    }

    #[test]
    fn test_mouse_on_nav_bar() {
        let mut s = state();
        type_url(&mut s, "about:blank");
        click(&mut s, 2, 1);
        assert_eq!(s.url_bar.text(), NEW_TAB_URL);

        click(&mut s, 30, 1);
        assert_eq!(s.active_view, ActiveView::UrlBar);
        click(&mut s, 30, 10);
        assert_eq!(s.active_view, ActiveView::Page);
    }

    #[test]
    fn test_paste_opens_url_bar() {
        let mut s = state();
        handle_paste(&mut s, "/tmp/x.snap\n");
        assert_eq!(s.active_view, ActiveView::UrlBar);
        assert_eq!(s.url_bar.text(), "/tmp/x.snap");
    }

    #[test]
    fn test_help_toggles() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('?')));
        assert_eq!(s.active_view, ActiveView::Help);
        handle_key(&mut s, press(KeyCode::Char('q')));
        assert_eq!(s.active_view, ActiveView::Page);
        assert!(!s.should_quit);
    }
}
