//! Shared utility functions.
//!
//! This module contains reusable utilities used across the codebase:
//! - `format`: Human-readable formatting (sizes, dates)
//! - `mime`: MIME type display helpers

mod format;
mod mime;

pub use format::{format_date, format_size};
pub use mime::mime_icon;
