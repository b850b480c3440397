//! Shared "cleaning pipeline" logic used by the CLI front-end.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! sample generation -> stage runner -> diagnostics
//!
//! The CLI can then focus on presentation (printing vs exports).

use crate::data::{generate_sample, SampleConfig};
use crate::domain::{CleanConfig, RemovalSummary, StageOutput};
use crate::error::AppError;
use crate::stage;

/// Generate the synthetic sample and run all three cleaning stages.
pub fn run_clean(
    sample: &SampleConfig,
    config: &CleanConfig,
) -> Result<StageOutput, AppError> {
    let records = generate_sample(sample)?;
    stage::run_stages(records, config)
}

/// Generate the synthetic sample and compute the forced-removal summary.
pub fn run_removal_summary(
    sample: &SampleConfig,
    config: &CleanConfig,
) -> Result<RemovalSummary, AppError> {
    let records = generate_sample(sample)?;
    stage::removal_summary(records, config)
}
