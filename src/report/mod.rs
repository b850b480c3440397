//! Terminal report formatting.
//!
//! Formatting stays in one place so the pipeline code remains clean and
//! output changes stay localized.

pub mod format;

pub use format::{format_removal_summary, format_run_summary};
