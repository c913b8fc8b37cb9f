//! Display items: the flat, positioned units the page view draws.
//!
//! A [`DisplayItem`] is a closed set of variants.  Adding a variant forces
//! every `match` over [`ItemKind`] to handle it, so [`DisplayItem::render`]
//! stays total.

// ───────────────────────────────────────── position ──────────

/// Screen position in engine pixels (top-left origin).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

// ───────────────────────────────────────── variants ──────────

/// A run of styled text reported by the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct TextItem {
    pub value: String,
    pub font_family: String,
    /// Point size, in the display unit.
    pub font_size: f64,
    pub bold: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum ItemKind {
    /// Occupies a position but draws nothing.
    #[default]
    Empty,
    Text(TextItem),
}

/// One visually placeable unit of a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayItem {
    position: Position,
    kind: ItemKind,
}

impl DisplayItem {
    pub fn text(item: TextItem) -> Self {
        Self {
            position: Position::default(),
            kind: ItemKind::Text(item),
        }
    }

    /// Place the item.  Callers must pass finite coordinates.
    pub fn set_position(&mut self, x: f64, y: f64) {
        self.position = Position::new(x, y);
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn kind(&self) -> &ItemKind {
        &self.kind
    }

    /// Produce the drawable for the current state.  Pure: the page widget
    /// decides where and how the result ends up on screen.
    pub fn render(&self) -> Drawable<'_> {
        match &self.kind {
            ItemKind::Empty => Drawable::Empty,
            ItemKind::Text(text) => Drawable::Text(StyledText {
                text: &text.value,
                font_family: &text.font_family,
                point_size: text.font_size,
                weight: if text.bold {
                    FontWeight::Bold
                } else {
                    FontWeight::Regular
                },
            }),
        }
    }
}

// ───────────────────────────────────────── drawables ─────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

impl FontWeight {
    pub fn label(self) -> &'static str {
        match self {
            FontWeight::Regular => "regular",
            FontWeight::Bold => "bold",
        }
    }
}

/// Text plus the styling needed to draw it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StyledText<'a> {
    pub text: &'a str,
    pub font_family: &'a str,
    pub point_size: f64,
    pub weight: FontWeight,
}

/// Renderable representation of a [`DisplayItem`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Drawable<'a> {
    Empty,
    Text(StyledText<'a>),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading() -> TextItem {
        TextItem {
            value: "heading 1".into(),
            font_family: "Times New Roman".into(),
            font_size: 32.0,
            bold: true,
        }
    }

    #[test]
    fn test_text_renders_styled_text() {
        let mut item = DisplayItem::text(heading());
        item.set_position(5.0, 12.5);

        assert_eq!(item.position(), Position::new(5.0, 12.5));
        match item.render() {
            Drawable::Text(styled) => {
                assert_eq!(styled.text, "heading 1");
                assert_eq!(styled.font_family, "Times New Roman");
                assert_eq!(styled.point_size, 32.0);
                assert_eq!(styled.weight, FontWeight::Bold);
            }
            other => panic!("expected text drawable, got {other:?}"),
        }
    }

    #[test]
    fn test_regular_weight_when_not_bold() {
        let item = DisplayItem::text(TextItem {
            bold: false,
            ..heading()
        });
        let Drawable::Text(styled) = item.render() else {
            panic!("expected text drawable");
        };
        assert_eq!(styled.weight, FontWeight::Regular);
    }

    #[test]
    fn test_empty_item_renders_nothing() {
        let item = DisplayItem::default();
        assert_eq!(item.render(), Drawable::Empty);
        assert_eq!(item.position(), Position::default());
    }

    #[test]
    fn test_render_is_repeatable() {
        let item = DisplayItem::text(heading());
        assert_eq!(item.render(), item.render());
    }
}
