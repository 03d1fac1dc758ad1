//! Terminal browser for the TMDB movie catalog.
//!
//! The library half holds everything but process setup, so integration tests
//! can drive the catalog client and the controller directly.

pub mod app;
pub mod catalog;
pub mod config;
pub mod controller;
pub mod keybindings;
pub mod theme;
pub mod ui;
pub mod util;
