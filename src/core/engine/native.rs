//! Native gosub engine via its C bindings (`libgosub_bindings`).
//!
//! Build with `--features native` and make the library visible to the
//! linker (e.g. `RUSTFLAGS="-L /path/to/gosub/target/release"`).

use std::ffi::{c_char, c_double, c_float, c_void, CStr, CString};
use std::marker::PhantomData;

use thiserror::Error;

use super::{NodeKind, RenderEngine, RenderNode, RenderTree};

#[derive(Debug, Error)]
pub enum NativeError {
    #[error("markup contains a NUL byte at offset {0}")]
    InteriorNul(usize),
    #[error("gosub could not build a render tree (status {0})")]
    InitFailed(i8),
}

// ───────────────────────────────────────── raw bindings ──────

/// `struct render_tree_t`: filled in by `render_tree_init`.  Fields are
/// mirrored for layout only; Rust never reads them.
#[allow(dead_code)]
#[repr(C)]
struct RawRenderTree {
    tree: *mut c_void,
    iterator: *mut c_void,
    data: *const RawNode,
}

/// Leading field of `struct node_t`.  The remainder is only read through
/// the accessor functions, so it is left undeclared.
#[repr(C)]
struct RawNode {
    node_type: u32,
}

#[link(name = "gosub_bindings")]
extern "C" {
    fn render_tree_init(render_tree: *mut RawRenderTree, html: *const c_char) -> i8;
    fn render_tree_next(render_tree: *mut RawRenderTree) -> *const RawNode;
    fn render_tree_free(render_tree: *mut RawRenderTree);

    fn render_tree_node_text_value(node: *const RawNode) -> *const c_char;
    fn render_tree_node_text_font(node: *const RawNode) -> *const c_char;
    fn render_tree_node_text_font_size(node: *const RawNode) -> c_float;
    fn render_tree_node_text_bold(node: *const RawNode) -> bool;
    fn render_tree_node_get_x(node: *const RawNode) -> c_double;
    fn render_tree_node_get_y(node: *const RawNode) -> c_double;
}

/// Copy a C string owned by the engine.  Null reads as empty.
///
/// # Safety
/// `ptr` must be null or point to a NUL-terminated string that stays valid
/// for the duration of the call.
unsafe fn owned_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

// ───────────────────────────────────────── tree & nodes ──────

/// A tree built by gosub.  Boxed so the address handed to the engine stays
/// put while the engine keeps pointers into it.
pub struct NativeTree {
    raw: Box<RawRenderTree>,
}

/// A node borrowed from a [`NativeTree`]; valid until the next advance.
pub struct NativeNode<'a> {
    ptr: *const RawNode,
    _tree: PhantomData<&'a mut NativeTree>,
}

impl RenderTree for NativeTree {
    type Node<'a> = NativeNode<'a>;

    fn next_node(&mut self) -> Option<NativeNode<'_>> {
        // SAFETY: `raw` was initialised by `render_tree_init` and not freed.
        let ptr = unsafe { render_tree_next(self.raw.as_mut()) };
        if ptr.is_null() {
            None
        } else {
            Some(NativeNode {
                ptr,
                _tree: PhantomData,
            })
        }
    }
}

// SAFETY (all accessors): `ptr` is non-null and was returned by
// `render_tree_next` on a live tree that is mutably borrowed for `'a`, so
// the engine cannot have advanced or freed it.
impl RenderNode for NativeNode<'_> {
    fn kind(&self) -> NodeKind {
        let raw = unsafe { (*self.ptr).node_type };
        NodeKind::from_raw(raw as i32)
    }

    fn text_value(&self) -> String {
        unsafe { owned_string(render_tree_node_text_value(self.ptr)) }
    }

    fn font_family(&self) -> String {
        unsafe { owned_string(render_tree_node_text_font(self.ptr)) }
    }

    fn font_size(&self) -> f64 {
        f64::from(unsafe { render_tree_node_text_font_size(self.ptr) })
    }

    fn bold(&self) -> bool {
        unsafe { render_tree_node_text_bold(self.ptr) }
    }

    fn x(&self) -> f64 {
        unsafe { render_tree_node_get_x(self.ptr) }
    }

    fn y(&self) -> f64 {
        unsafe { render_tree_node_get_y(self.ptr) }
    }
}

// ───────────────────────────────────────── engine ────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct GosubEngine;

impl RenderEngine for GosubEngine {
    const NAME: &'static str = "gosub";

    type Tree = NativeTree;
    type Error = NativeError;

    fn tree_init(&self, markup: &str) -> Result<NativeTree, NativeError> {
        let html = CString::new(markup).map_err(|e| NativeError::InteriorNul(e.nul_position()))?;
        let mut raw = Box::new(RawRenderTree {
            tree: std::ptr::null_mut(),
            iterator: std::ptr::null_mut(),
            data: std::ptr::null(),
        });

        // SAFETY: `raw` is a valid, writable render_tree_t and `html` is a
        // NUL-terminated string that outlives the call.
        let status = unsafe { render_tree_init(raw.as_mut(), html.as_ptr()) };
        if status != 0 {
            return Err(NativeError::InitFailed(status));
        }
        Ok(NativeTree { raw })
    }

    fn tree_free(&self, tree: &mut NativeTree) {
        // SAFETY: only reached from `TreeHandle::drop`, once per tree.
        unsafe { render_tree_free(tree.raw.as_mut()) };
        tree.raw.tree = std::ptr::null_mut();
        tree.raw.iterator = std::ptr::null_mut();
        tree.raw.data = std::ptr::null();
    }
}
