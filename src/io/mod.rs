//! JSON export of pipeline outputs.

pub mod export;
