//! Domain model: records, tables, masks, configuration, and bundle shapes.

pub mod table;
pub mod types;

pub use table::{reindex_mask, AnomalyMask, RecordTable};
pub use types::*;
