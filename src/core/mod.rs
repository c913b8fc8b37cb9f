//! Core model: display items, the engine interface, and the tree adapter,
//! plus the browser bookkeeping (history, URL resolution, viewport maths).
//!
//! Nothing in this module depends on any TUI or rendering crate.

pub mod adapter;
pub mod display;
pub mod engine;
pub mod history;
pub mod url;
pub mod viewport;
