//! Physically-invalid reading filter.

use crate::domain::{Column, RecordTable};

/// Remove or neutralize physically-invalid readings.
///
/// When `apply` is false the table is returned unchanged. Otherwise:
///
/// 1. rows without positive irradiance are dropped (GI missing or <= 0 means
///    no solar signal, so the row carries no usable observation), and
/// 2. within the survivors, non-positive TM is set to missing (a temperature
///    at or below 0 from these sensors is a fault, not a reading) so the
///    interpolator can fill it from neighbors.
///
/// An empty result is valid and propagates downstream as the empty-data case.
pub fn apply_physical_filter(table: &RecordTable, apply: bool) -> RecordTable {
    if !apply {
        return table.clone();
    }

    let mut filtered = table.clone();
    filtered.retain(|row| row.gi.is_some_and(|gi| gi > 0.0));

    for row in filtered.rows_mut() {
        if row.tm.is_some_and(|tm| tm <= 0.0) {
            row.set_value(Column::Tm, None);
        }
    }

    filtered
}
