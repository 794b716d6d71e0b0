//! Terminal UI module using ratatui.
//!
//! - `render`: Main frame rendering and layout
//! - `input`: Keyboard event handling
//! - `styles`: Color scheme and day-cell styling
//! - `views`: View-specific content (calendar, lists, year summary)

pub mod input;
pub mod render;
pub mod styles;
pub mod views;
