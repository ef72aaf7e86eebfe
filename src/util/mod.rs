//! Utility functions for terminal-safe text output.

mod text;

pub use text::{preview, strip_control_chars, truncate_to_width};
