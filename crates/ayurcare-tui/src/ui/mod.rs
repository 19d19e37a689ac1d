//! UI building blocks for the AyurCare TUI.

pub mod layout;
pub mod theme;
pub mod widgets;

pub use layout::*;
