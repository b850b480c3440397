//! Pairwise scatter data.

use std::collections::BTreeMap;

use crate::domain::{AnomalyMask, Column, RecordTable, ScatterPair};

/// Build scatter data for every ordered pair of distinct sensor variables.
///
/// Rows missing either variable are dropped; the `is_outlier` flags stay
/// aligned with the surviving rows (so the front end can highlight flagged
/// points without recomputing anything).
pub fn scatter_pairs(table: &RecordTable, mask: &AnomalyMask) -> BTreeMap<String, ScatterPair> {
    debug_assert_eq!(table.len(), mask.len());

    let mut pairs = BTreeMap::new();
    for x_col in Column::ALL {
        for y_col in Column::ALL {
            if x_col == y_col {
                continue;
            }

            let mut pair = ScatterPair::default();
            for (row, &flagged) in table.rows().iter().zip(mask) {
                if let (Some(x), Some(y)) = (row.value(x_col), row.value(y_col)) {
                    pair.x.push(x);
                    pair.y.push(y);
                    pair.is_outlier.push(flagged);
                }
            }

            pairs.insert(format!("{}__{}", x_col.as_str(), y_col.as_str()), pair);
        }
    }
    pairs
}
