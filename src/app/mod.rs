//! Application orchestration: state management, event loop, and input handling.

pub mod event;
pub mod handler;
pub mod load_runtime;
pub mod state;
pub mod tabs;
pub mod url_bar;
