//! `pv-clean` library crate.
//!
//! The binary (`pv`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future HTTP layer, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod clean;
pub mod cli;
pub mod data;
pub mod debug;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod outlier;
pub mod report;
pub mod stage;
pub mod stats;
