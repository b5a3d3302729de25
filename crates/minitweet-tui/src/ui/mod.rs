//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, feed list, forms, overlays
//! - `input`: keyboard event handling per view
//! - `styles`: color scheme and text styling

pub mod input;
pub mod render;
pub mod styles;
