//! Utility functions for display formatting.

pub mod format;

pub use format::{format_currency, format_date, format_optional, format_phone, truncate_string};
