//! Tree adapter: turns an engine render tree into a display list.
//!
//! One adapter owns one engine tree for its whole lifetime.  The tree is
//! walked exactly once, during [`TreeAdapter::construct`]; afterwards the
//! adapter only hands out the resulting list.

use super::display::{DisplayItem, TextItem};
use super::engine::{NodeKind, RenderEngine, RenderNode, RenderTree, TreeHandle};

pub struct TreeAdapter<E: RenderEngine> {
    /// Held so the engine tree lives exactly as long as the adapter.
    _tree: TreeHandle<E>,
    items: Vec<DisplayItem>,
}

impl<E: RenderEngine> TreeAdapter<E> {
    /// Build the render tree for `markup` and flatten it.
    ///
    /// The only failure is the engine refusing to build a tree; its error is
    /// returned unchanged.
    pub fn construct(engine: E, markup: &str) -> Result<Self, E::Error> {
        let mut tree = TreeHandle::acquire(engine, markup)?;
        let items = collect_items(tree.tree_mut());
        tracing::debug!(
            engine = E::NAME,
            markup_bytes = markup.len(),
            items = items.len(),
            "render tree flattened"
        );
        Ok(Self { _tree: tree, items })
    }

    /// The display list, in document order.
    pub fn render_list(&self) -> &[DisplayItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Single forward pass over `tree`.
///
/// Roots are skipped by their kind, wherever they appear, so the walk does
/// not depend on the engine yielding the root first.
fn collect_items<T: RenderTree>(tree: &mut T) -> Vec<DisplayItem> {
    let mut items = Vec::new();
    while let Some(node) = tree.next_node() {
        let kind = node.kind();
        if kind.is_root() {
            continue;
        }
        match kind {
            NodeKind::Text => items.push(text_item(&node)),
            other => tracing::trace!(node_kind = ?other, "skipping unrecognised node"),
        }
    }
    items
}

fn text_item<N: RenderNode>(node: &N) -> DisplayItem {
    let mut item = DisplayItem::text(TextItem {
        value: node.text_value(),
        font_family: node.font_family(),
        font_size: node.font_size(),
        bold: node.bold(),
    });
    item.set_position(node.x(), node.y());
    item
}
