//! Single-line text editor behind the URL bar.
//!
//! The cursor is a char index, so multi-byte input never splits a code point.

#[derive(Debug, Clone, Default)]
pub struct UrlEditor {
    text: String,
    cursor: usize,
}

impl UrlEditor {
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Cursor position in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Replace the contents and move the cursor to the end.
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.text.chars().count();
    }

    fn byte_offset(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map_or(self.text.len(), |(i, _)| i)
    }

    pub fn insert(&mut self, c: char) {
        let at = self.byte_offset(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let at = self.byte_offset(self.cursor);
        self.text.remove(at);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.text.chars().count() {
            let at = self.byte_offset(self.cursor);
            self.text.remove(at);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.text.chars().count());
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.text.chars().count();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_cursor_movement() {
        let mut ed = UrlEditor::default();
        for c in "file.html".chars() {
            ed.insert(c);
        }
        ed.home();
        ed.insert('/');
        assert_eq!(ed.text(), "/file.html");
        assert_eq!(ed.cursor(), 1);

        ed.end();
        ed.move_right();
        assert_eq!(ed.cursor(), 10);
    }

    #[test]
    fn test_backspace_and_delete() {
        let mut ed = UrlEditor::default();
        ed.set("abcd");
        ed.backspace();
        assert_eq!(ed.text(), "abc");

        ed.home();
        ed.backspace();
        assert_eq!(ed.text(), "abc");
        ed.delete();
        assert_eq!(ed.text(), "bc");

        ed.end();
        ed.delete();
        assert_eq!(ed.text(), "bc");
    }

    #[test]
    fn test_multibyte_text() {
        let mut ed = UrlEditor::default();
        ed.set("ñandú");
        assert_eq!(ed.cursor(), 5);
        ed.move_left();
        ed.backspace();
        assert_eq!(ed.text(), "ñanú");
        ed.insert('d');
        assert_eq!(ed.text(), "ñandú");
    }
}
