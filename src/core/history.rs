//! Back/forward history for a single tab.

#[derive(Debug, Clone)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

impl History {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            entries: vec![initial.into()],
            index: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    /// Visit `url`.  Forward entries are discarded; re-visiting the current
    /// URL leaves history untouched.
    pub fn push(&mut self, url: impl Into<String>) {
        let url = url.into();
        if url == self.current() {
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(url);
        self.index += 1;
    }

    pub fn back(&mut self) -> Option<&str> {
        if !self.can_go_back() {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<&str> {
        if !self.can_go_forward() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_and_forward() {
        let mut h = History::new("about:newtab");
        h.push("/tmp/a.html");
        h.push("/tmp/b.html");

        assert_eq!(h.back(), Some("/tmp/a.html"));
        assert_eq!(h.back(), Some("about:newtab"));
        assert_eq!(h.back(), None);
        assert!(!h.can_go_back());

        assert_eq!(h.forward(), Some("/tmp/a.html"));
        assert_eq!(h.forward(), Some("/tmp/b.html"));
        assert_eq!(h.forward(), None);
    }

    #[test]
    fn test_push_drops_forward_entries() {
        let mut h = History::new("a");
        h.push("b");
        h.push("c");
        h.back();
        h.back();
        h.push("d");

        assert_eq!(h.current(), "d");
        assert!(!h.can_go_forward());
        assert_eq!(h.back(), Some("a"));
    }

    #[test]
    fn test_push_current_is_noop() {
        let mut h = History::new("a");
        h.push("a");
        assert!(!h.can_go_back());
    }
}
