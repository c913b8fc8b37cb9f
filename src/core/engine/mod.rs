//! Render-tree engine interface.
//!
//! The engine parses markup and lays it out into a tree of typed nodes.  We
//! only ever see that tree through three capabilities:
//!
//! * [`RenderEngine`]: build a tree from markup and release it again,
//! * [`RenderTree`]: walk the nodes in document order,
//! * [`RenderNode`]: read a node's type, text attributes, and position.
//!
//! [`TreeHandle`] wraps the build/release pair so a tree is freed exactly
//! once no matter how the owner goes away.

#[cfg(feature = "native")]
pub mod native;
pub mod snapshot;

// ───────────────────────────────────────── node kinds ────────

/// Node type discriminant as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The synthetic document root.  Never displayable.
    Root,
    Text,
    /// A type this client does not understand yet.
    Unknown(i32),
}

impl NodeKind {
    const RAW_ROOT: i32 = 0;
    const RAW_TEXT: i32 = 1;

    /// Decode the engine's numeric `node_type_e`.
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            Self::RAW_ROOT => NodeKind::Root,
            Self::RAW_TEXT => NodeKind::Text,
            other => NodeKind::Unknown(other),
        }
    }

    pub fn is_root(self) -> bool {
        self == NodeKind::Root
    }
}

// ───────────────────────────────────────── capabilities ──────

/// Per-node accessors.
///
/// The text accessors are only meaningful when [`RenderNode::kind`] is
/// [`NodeKind::Text`]; callers must check the kind first.
pub trait RenderNode {
    fn kind(&self) -> NodeKind;
    fn text_value(&self) -> String;
    fn font_family(&self) -> String;
    /// Font size in the engine's unit, which is also the display unit.
    fn font_size(&self) -> f64;
    fn bold(&self) -> bool;
    fn x(&self) -> f64;
    fn y(&self) -> f64;
}

impl<N: RenderNode + ?Sized> RenderNode for &N {
    fn kind(&self) -> NodeKind {
        (**self).kind()
    }
    fn text_value(&self) -> String {
        (**self).text_value()
    }
    fn font_family(&self) -> String {
        (**self).font_family()
    }
    fn font_size(&self) -> f64 {
        (**self).font_size()
    }
    fn bold(&self) -> bool {
        (**self).bold()
    }
    fn x(&self) -> f64 {
        (**self).x()
    }
    fn y(&self) -> f64 {
        (**self).y()
    }
}

/// Forward-only iteration over a built tree.  Each node borrows the tree,
/// so it cannot outlive the next call to [`RenderTree::next_node`].
pub trait RenderTree {
    type Node<'a>: RenderNode
    where
        Self: 'a;

    /// Advance to the next node in document order.  `None` once exhausted.
    fn next_node(&mut self) -> Option<Self::Node<'_>>;
}

/// A render-tree engine back-end.
pub trait RenderEngine {
    /// Short name used in logs and the status bar.
    const NAME: &'static str;

    type Tree: RenderTree;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Parse `markup` and build its render tree.  On failure no tree exists
    /// and nothing needs releasing.
    fn tree_init(&self, markup: &str) -> Result<Self::Tree, Self::Error>;

    /// Release everything behind `tree`.  Called exactly once per tree.
    fn tree_free(&self, tree: &mut Self::Tree);

    /// Markup for a freshly opened tab.
    fn blank_page(&self, title: &str) -> String {
        format!("<html><h1>{title}</h1></html>")
    }
}

// ───────────────────────────────────────── scoped handle ─────

/// Owns one engine tree and releases it on drop.
pub struct TreeHandle<E: RenderEngine> {
    engine: E,
    tree: E::Tree,
}

impl<E: RenderEngine> TreeHandle<E> {
    /// Build a tree from `markup`.  The engine's error is returned as-is.
    pub fn acquire(engine: E, markup: &str) -> Result<Self, E::Error> {
        let tree = engine.tree_init(markup)?;
        Ok(Self { engine, tree })
    }

    pub fn tree_mut(&mut self) -> &mut E::Tree {
        &mut self.tree
    }
}

impl<E: RenderEngine> Drop for TreeHandle<E> {
    fn drop(&mut self) {
        self.engine.tree_free(&mut self.tree);
    }
}

#[cfg(test)]
mod tests {
    use super::snapshot::SnapshotEngine;
    use super::*;

    #[test]
    fn test_node_kind_decoding() {
        assert_eq!(NodeKind::from_raw(0), NodeKind::Root);
        assert_eq!(NodeKind::from_raw(1), NodeKind::Text);
        assert_eq!(NodeKind::from_raw(7), NodeKind::Unknown(7));
        assert!(NodeKind::Root.is_root());
        assert!(!NodeKind::Text.is_root());
    }

    #[test]
    fn test_handle_frees_once_on_drop() {
        let engine = SnapshotEngine::new();
        {
            let _handle = TreeHandle::acquire(engine.clone(), "root\n").unwrap();
            assert_eq!(engine.stats().live(), 1);
        }
        assert_eq!(engine.stats().inits(), 1);
        assert_eq!(engine.stats().frees(), 1);
    }

    #[test]
    fn test_failed_acquire_frees_nothing() {
        let engine = SnapshotEngine::new();
        assert!(TreeHandle::acquire(engine.clone(), "bogus line").is_err());
        assert_eq!(engine.stats().inits(), 0);
        assert_eq!(engine.stats().frees(), 0);
    }

    #[test]
    fn test_default_blank_page_is_heading_markup() {
        struct Stub;
        struct NoTree;
        impl RenderTree for NoTree {
            type Node<'a> = &'a snapshot::SnapshotNode;
            fn next_node(&mut self) -> Option<Self::Node<'_>> {
                None
            }
        }
        impl RenderEngine for Stub {
            const NAME: &'static str = "stub";
            type Tree = NoTree;
            type Error = std::convert::Infallible;
            fn tree_init(&self, _markup: &str) -> Result<NoTree, Self::Error> {
                Ok(NoTree)
            }
            fn tree_free(&self, _tree: &mut NoTree) {}
        }

        assert_eq!(Stub.blank_page("Tab 0"), "<html><h1>Tab 0</h1></html>");
    }
}
