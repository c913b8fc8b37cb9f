//! URL-bar input resolution.
//!
//! The client has no network stack: pages come from local files or from the
//! built-in `about:` pages.

use std::path::{Path, PathBuf};

pub const NEW_TAB_URL: &str = "about:newtab";
pub const BLANK_URL: &str = "about:blank";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    /// The placeholder page a new tab opens with.
    NewTab,
    /// An empty document.
    Blank,
    File(PathBuf),
    /// A URL whose scheme we can't load (carries the scheme).
    Unsupported(String),
}

impl PageRequest {
    /// Canonical text for the URL bar and history.
    pub fn display_url(&self) -> String {
        match self {
            PageRequest::NewTab => NEW_TAB_URL.to_string(),
            PageRequest::Blank => BLANK_URL.to_string(),
            PageRequest::File(path) => path.display().to_string(),
            PageRequest::Unsupported(_) => String::new(),
        }
    }
}

/// Interpret URL-bar text.
pub fn resolve(input: &str) -> PageRequest {
    let input = input.trim();
    if input.is_empty() || input.eq_ignore_ascii_case(BLANK_URL) {
        return PageRequest::Blank;
    }
    if input.eq_ignore_ascii_case(NEW_TAB_URL) {
        return PageRequest::NewTab;
    }
    if let Some(path) = input.strip_prefix("file://") {
        return PageRequest::File(PathBuf::from(path));
    }
    if let Some((scheme, _)) = input.split_once("://") {
        if is_scheme(scheme) {
            return PageRequest::Unsupported(scheme.to_ascii_lowercase());
        }
    }
    PageRequest::File(expand_home(input))
}

/// Like [`resolve`], but an unsupported URL keeps its original text so it
/// can be shown back to the user.
pub fn resolve_with_text(input: &str) -> (PageRequest, String) {
    let request = resolve(input);
    let text = match &request {
        PageRequest::Unsupported(_) => input.trim().to_string(),
        other => other.display_url(),
    };
    (request, text)
}

/// Tab title for a request.
pub fn title_for(request: &PageRequest) -> String {
    match request {
        PageRequest::NewTab => "New Tab".to_string(),
        PageRequest::Blank => BLANK_URL.to_string(),
        PageRequest::File(path) => file_title(path),
        PageRequest::Unsupported(scheme) => format!("{scheme}: unsupported"),
    }
}

fn file_title(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn expand_home(input: &str) -> PathBuf {
    if let Some(rest) = input.strip_prefix("~/") {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(input)
}
