//! UI / rendering layer: everything that touches Ratatui widgets.
//!
//! This layer takes the *core* data structures and turns them into cells on
//! the terminal.  No engine calls or file I/O happen here.

pub mod layout;
pub mod nav_bar;
pub mod page;
pub mod popup;
pub mod spinner;
pub mod tab_bar;
pub mod theme;
