//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `helpers` - Background task spawning (refresh, summarize, export)
//! - `render` - Layout and overlay dispatch
//! - `categories` - Category sidebar widget
//! - `articles` - Grouped article list widget
//! - `detail` - Selected article detail pane
//! - `status` - Status bar widget
//! - `help` - Key table overlay

mod articles;
mod categories;
mod detail;
mod events;
mod help;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod status;

pub use loop_runner::{run, Action};
