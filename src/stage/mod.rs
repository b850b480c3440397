//! The three-stage cleaning runner.
//!
//! Stages are ordered and non-skippable:
//!
//! 1. **raw** — the deduplicated, time-sorted input table
//! 2. **after_gi_tm** — physical filter + gap interpolation
//! 3. **after_outlier** — detection against stage 2, with optional removal
//!
//! Detection logically happens once, on stage 2's table; its mask is
//! projected back onto the other stages (reindex with default false) so all
//! three bundles highlight the same anomalies. Each stage works on its own
//! table snapshot and produces its own bundle.

use crate::clean::{apply_physical_filter, interpolate_missing};
use crate::domain::{
    reindex_mask, CleanConfig, RawRecord, RecordTable, RemovalSummary, StageOutput,
};
use crate::error::AppError;
use crate::outlier;
use crate::stats::{build_bundle, correlation_base, correlation_pair};

/// Run the full pipeline and assemble the three per-stage bundles.
///
/// Errors: `NotFound` when no input rows exist, `InvalidParameter` from
/// detector parameter validation. Per-column sparsity never errors.
pub fn run_stages(records: Vec<RawRecord>, config: &CleanConfig) -> Result<StageOutput, AppError> {
    let raw = RecordTable::from_records(records);
    if raw.is_empty() {
        return Err(AppError::not_found("no records for the requested dataset"));
    }

    // Correlation is a query-level artifact computed from its own base table,
    // independent of which cleaning stage is displayed.
    let corr = correlation_pair(&correlation_base(&raw));

    let filtered = filtered_stage(&raw, config);
    let mask = outlier::detect(&filtered, &config.method)?;

    let raw_mask = reindex_mask(&filtered, &mask, &raw);

    let mut resolved = filtered.clone();
    let resolved_mask = if config.remove_outliers {
        // Remediate instead of dropping: blank flagged cells in the detection
        // columns and re-fill them from neighbors. Nothing remains flagged.
        blank_flagged_cells(&mut resolved, &mask, config);
        interpolate_missing(&mut resolved);
        vec![false; resolved.len()]
    } else {
        mask.clone()
    };

    Ok(StageOutput {
        raw: build_bundle(&raw, &raw_mask, &corr, config.remove_outliers),
        after_gi_tm: build_bundle(&filtered, &mask, &corr, config.remove_outliers),
        after_outlier: build_bundle(&resolved, &resolved_mask, &corr, config.remove_outliers),
    })
}

/// Forced-removal cleaning pass reporting only row counts, for persistence.
///
/// Unlike the display path (which blanks cells in place), the recorded
/// summary drops flagged rows outright, so `after_rows` and `removed_ratio`
/// reflect how much data the configuration would discard.
pub fn removal_summary(
    records: Vec<RawRecord>,
    config: &CleanConfig,
) -> Result<RemovalSummary, AppError> {
    let raw = RecordTable::from_records(records);
    if raw.is_empty() {
        return Err(AppError::not_found("no records for the requested dataset"));
    }

    let filtered = filtered_stage(&raw, config);
    let mask = outlier::detect(&filtered, &config.method)?;
    let before_rows = filtered.len();

    let mut survivors_rows = Vec::with_capacity(before_rows);
    for (row, &flagged) in filtered.rows().iter().zip(&mask) {
        if !flagged {
            survivors_rows.push(row.clone());
        }
    }
    let mut survivors = RecordTable::from_rows(survivors_rows);
    interpolate_missing(&mut survivors);
    let after_rows = survivors.len();

    let removed_ratio = if before_rows == 0 {
        0.0
    } else {
        round3((before_rows - after_rows) as f64 / before_rows as f64)
    };

    Ok(RemovalSummary {
        before_rows,
        after_rows,
        removed_ratio,
    })
}

fn filtered_stage(raw: &RecordTable, config: &CleanConfig) -> RecordTable {
    let mut filtered = apply_physical_filter(raw, config.apply_gi_tm);
    if config.apply_gi_tm {
        interpolate_missing(&mut filtered);
    }
    filtered
}

fn blank_flagged_cells(table: &mut RecordTable, mask: &[bool], config: &CleanConfig) {
    let columns = config.method.columns();
    for (row, &flagged) in table.rows_mut().iter_mut().zip(mask) {
        if flagged {
            for &column in columns {
                row.set_value(column, None);
            }
        }
    }
}

fn round3(x: f64) -> f64 {
    (x * 1000.0).round() / 1000.0
}
