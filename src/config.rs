//! User configuration: keybindings, page rendering knobs, and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/gosub-client/config.toml`
//! (default `~/.config/gosub-client/config.toml`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::viewport::CellMetrics;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions in the page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    NewTab,
    CloseTab,
    NextTab,
    PrevTab,
    Back,
    Forward,
    Refresh,
    FocusUrl,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Help,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the help popup).
    pub const ALL: &[Action] = &[
        Action::NewTab,
        Action::CloseTab,
        Action::NextTab,
        Action::PrevTab,
        Action::Back,
        Action::Forward,
        Action::Refresh,
        Action::FocusUrl,
        Action::ScrollUp,
        Action::ScrollDown,
        Action::PageUp,
        Action::PageDown,
        Action::Help,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::NewTab => "New Tab",
            Action::CloseTab => "Close Tab",
            Action::NextTab => "Next Tab",
            Action::PrevTab => "Previous Tab",
            Action::Back => "Back",
            Action::Forward => "Forward",
            Action::Refresh => "Refresh",
            Action::FocusUrl => "Edit URL",
            Action::ScrollUp => "Scroll Up",
            Action::ScrollDown => "Scroll Down",
            Action::PageUp => "Page Up",
            Action::PageDown => "Page Down",
            Action::Help => "Help",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::NewTab => "new_tab",
            Action::CloseTab => "close_tab",
            Action::NextTab => "next_tab",
            Action::PrevTab => "prev_tab",
            Action::Back => "back",
            Action::Forward => "forward",
            Action::Refresh => "refresh",
            Action::FocusUrl => "focus_url",
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::Help => "help",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code + modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Only CTRL/ALT/SHIFT are compared; SUPER and friends are ignored.
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code
            && (self.modifiers & MODIFIER_MASK) == (event.modifiers & MODIFIER_MASK)
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// User-friendly display string (e.g. `"Alt+←"`, `"Ctrl+t"`, `"q"`).
    pub fn display(&self) -> String {
        let key = match self.code {
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Backspace => "Bksp".into(),
            KeyCode::Delete => "Del".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            _ => key_name(self.code),
        };
        format!("{}{key}", self.modifier_prefix())
    }

    /// Serialise to config-file format (e.g. `"Alt+Left"`, `"Ctrl+t"`).
    fn to_config_string(&self) -> String {
        format!("{}{}", self.modifier_prefix(), key_name(self.code))
    }

    /// Parse a key string like `"Ctrl+t"`, `"Alt+Left"`, `"q"`, `"F5"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let key_part = parts.last()?;

        for &part in &parts[..parts.len() - 1] {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backtab" => KeyCode::BackTab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => KeyCode::F(s[1..].parse().ok()?),
            _ if key_part.chars().count() == 1 => KeyCode::Char(key_part.chars().next()?),
            _ => return None,
        };

        Some(KeyBind { code, modifiers })
    }
}

/// Config-file name of a key code.
fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::BackTab => "BackTab".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration: keybindings and page rendering settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Engine pixels per terminal column.
    pub cell_width_px: f64,
    /// Engine pixels per terminal row.
    pub cell_height_px: f64,
    /// Rows moved per scroll step (keys and mouse wheel).
    pub scroll_step: usize,
    /// Text at or above this point size is drawn in the heading style.
    pub heading_size: f64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            cell_width_px: 8.0,
            cell_height_px: 16.0,
            scroll_step: 3,
            heading_size: 24.0,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let ctrl = KeyModifiers::CONTROL;
        let alt = KeyModifiers::ALT;
        let mut m = HashMap::new();

        m.insert(Action::NewTab, vec![KeyBind::new(Char('t'), n), KeyBind::new(Char('t'), ctrl)]);
        m.insert(Action::CloseTab, vec![KeyBind::new(Char('w'), n), KeyBind::new(Char('w'), ctrl)]);
        m.insert(Action::NextTab, vec![KeyBind::new(Tab, n), KeyBind::new(Char(']'), n)]);
        m.insert(
            Action::PrevTab,
            vec![KeyBind::new(BackTab, KeyModifiers::SHIFT), KeyBind::new(Char('['), n)],
        );
        m.insert(Action::Back, vec![KeyBind::new(Left, alt), KeyBind::new(Char('b'), n)]);
        m.insert(Action::Forward, vec![KeyBind::new(Right, alt), KeyBind::new(Char('f'), n)]);
        m.insert(Action::Refresh, vec![KeyBind::new(Char('r'), n), KeyBind::new(F(5), n)]);
        m.insert(Action::FocusUrl, vec![KeyBind::new(Char('o'), n), KeyBind::new(Char('l'), ctrl)]);
        m.insert(Action::ScrollUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(Action::ScrollDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(Action::PageUp, vec![KeyBind::new(PageUp, n)]);
        m.insert(
            Action::PageDown,
            vec![KeyBind::new(PageDown, n), KeyBind::new(Char(' '), n)],
        );
        m.insert(Action::Help, vec![KeyBind::new(Char('?'), n)]);
        m.insert(Action::Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action bound to a key event.  When several bindings match,
    /// the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    pub fn cell_metrics(&self) -> CellMetrics {
        CellMetrics {
            width_px: self.cell_width_px,
            height_px: self.cell_height_px,
        }
    }

    /// Format the binding list for a given action (e.g. `"↑/k"`).
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(|b| b.display()).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => binds[0].display(),
            _ => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}: url | {}/{}: back/fwd | {}: new tab | {}: close | {}: help",
            self.short_binding(Action::FocusUrl),
            self.short_binding(Action::Back),
            self.short_binding(Action::Forward),
            self.short_binding(Action::NewTab),
            self.short_binding(Action::CloseTab),
            self.short_binding(Action::Help),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse_config(&contents),
            Err(err) => {
                if path.exists() {
                    tracing::warn!("could not read {}: {err}", path.display());
                }
                Self::default()
            }
        }
    }

    /// Persist the config to the default location and return that path.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path();
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(path, self.serialise())
            .with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            match key {
                "cell_width_px" => {
                    if let Ok(v) = value.parse::<f64>() {
                        config.cell_width_px = v.clamp(1.0, 64.0);
                    }
                    continue;
                }
                "cell_height_px" => {
                    if let Ok(v) = value.parse::<f64>() {
                        config.cell_height_px = v.clamp(1.0, 64.0);
                    }
                    continue;
                }
                "scroll_step" => {
                    if let Ok(v) = value.parse::<usize>() {
                        config.scroll_step = v.clamp(1, 50);
                    }
                    continue;
                }
                "heading_size" => {
                    if let Ok(v) = value.parse::<f64>() {
                        if v.is_finite() && v > 0.0 {
                            config.heading_size = v;
                        }
                    }
                    continue;
                }
                _ => {}
            }

            let Some(action) = Action::from_config_key(key) else {
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# gosub-client configuration".to_string(),
            String::new(),
            "# Page rendering".to_string(),
            format!("cell_width_px = {}", self.cell_width_px),
            format!("cell_height_px = {}", self.cell_height_px),
            format!("scroll_step = {}", self.scroll_step),
            format!("heading_size = {}", self.heading_size),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab, BackTab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/gosub-client/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("gosub-client").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventKind;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        let mut ev = KeyEvent::new(code, modifiers);
        ev.kind = KeyEventKind::Press;
        ev
    }

    #[test]
    fn test_default_bindings_resolve() {
        let config = AppConfig::default();
        assert_eq!(
            config.match_key(key(KeyCode::Char('t'), KeyModifiers::NONE)),
            Some(Action::NewTab)
        );
        assert_eq!(
            config.match_key(key(KeyCode::Left, KeyModifiers::ALT)),
            Some(Action::Back)
        );
        assert_eq!(config.match_key(key(KeyCode::Left, KeyModifiers::NONE)), None);
    }

    #[test]
    fn test_paging_keys_resolve_to_paging_actions() {
        let config = AppConfig::default();
        assert_eq!(
            config.match_key(key(KeyCode::PageUp, KeyModifiers::NONE)),
            Some(Action::PageUp)
        );
        assert_eq!(
            config.match_key(key(KeyCode::PageDown, KeyModifiers::NONE)),
            Some(Action::PageDown)
        );
        assert_eq!(
            config.match_key(key(KeyCode::Char(' '), KeyModifiers::NONE)),
            Some(Action::PageDown)
        );
        assert_eq!(config.display_bindings(Action::PageDown), "PgDn/Space");
    }

    #[test]
    fn test_super_modifier_ignored() {
        let config = AppConfig::default();
        assert_eq!(
            config.match_key(key(KeyCode::Char('q'), KeyModifiers::SUPER)),
            Some(Action::Quit)
        );
    }

    #[test]
    fn test_key_parse() {
        assert_eq!(
            KeyBind::parse("Ctrl+l"),
            Some(KeyBind::new(KeyCode::Char('l'), KeyModifiers::CONTROL))
        );
        assert_eq!(
            KeyBind::parse("alt+LEFT"),
            Some(KeyBind::new(KeyCode::Left, KeyModifiers::ALT))
        );
        assert_eq!(KeyBind::parse("F5"), Some(KeyBind::new(KeyCode::F(5), KeyModifiers::NONE)));
        assert_eq!(
            KeyBind::parse("Space"),
            Some(KeyBind::new(KeyCode::Char(' '), KeyModifiers::NONE))
        );
        assert_eq!(
            KeyBind::parse("R"),
            Some(KeyBind::new(KeyCode::Char('R'), KeyModifiers::NONE))
        );
        assert_eq!(KeyBind::parse("Hyper+x"), None);
        assert_eq!(KeyBind::parse("banana"), None);
    }

    #[test]
    fn test_parse_config_overrides() {
        let config = AppConfig::parse_config(
            "# comment\n\
             cell_width_px = 10\n\
             cell_height_px = 900\n\
             scroll_step = 0\n\
             heading_size = nope\n\
             quit = Ctrl+q, \"x\"\n\
             mystery = z\n",
        );
        assert_eq!(config.cell_width_px, 10.0);
        assert_eq!(config.cell_height_px, 64.0);
        assert_eq!(config.scroll_step, 1);
        assert_eq!(config.heading_size, 24.0);
        assert_eq!(config.display_bindings(Action::Quit), "Ctrl+q/x");
        assert_eq!(config.display_bindings(Action::Help), "?");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.scroll_step = 7;
        config
            .bindings
            .insert(Action::Refresh, vec![KeyBind::new(KeyCode::F(5), KeyModifiers::SHIFT)]);
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.scroll_step, 7);
        assert_eq!(loaded.bindings, config.bindings);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppConfig::load_from(&dir.path().join("absent.toml"));
        assert_eq!(loaded.cell_metrics(), CellMetrics::default());
        assert_eq!(loaded.bindings, AppConfig::default_bindings());
    }

    #[test]
    fn test_status_hint_uses_first_binding() {
        let hint = AppConfig::default().status_bar_hint();
        assert!(hint.starts_with("o: url"));
        assert!(hint.contains("?: help"));
    }
}
