//! Terminal User Interface module.
//!
//! # Module Structure
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling for the grid and the search box
//! - `events` - Background task event processing
//! - `fetch` - Spawning catalog requests
//! - `render` - Layout and view dispatch
//! - `cards` - Movie card grid widget
//! - `status` - Status bar widget
//! - `help` - Keybinding overlay

mod cards;
mod events;
mod fetch;
mod help;
mod input;
mod loop_runner;
mod render;
mod status;

pub use loop_runner::{run, Action};
