//! Shared numeric helpers.
//!
//! Quantiles and moments are needed by several detectors and by the stats
//! builder; keeping them here avoids subtle per-module drift in how (for
//! example) Q1/Q3 are interpolated.

pub mod stats;

pub use stats::{mean, quantile, sample_std};
