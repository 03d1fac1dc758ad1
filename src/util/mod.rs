//! Text helpers for terminal rendering of catalog data.
//!
//! Catalog strings are untrusted: they are sanitized before they reach the
//! terminal and measured in display columns, not bytes.

mod text;

pub use text::{display_width, sanitize_line, truncate_to_width, wrap_to_width};

/// Maximum accepted search query length in characters.
pub const MAX_SEARCH_QUERY_LENGTH: usize = 256;
