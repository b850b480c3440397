//! The in-memory record table and mask alignment helpers.
//!
//! Tables are value types: every stage works on its own snapshot, so mutating
//! stage N's table can never reach back into stage N-1's retained bundle.

use std::collections::HashMap;
use std::collections::HashSet;

use chrono::NaiveDate;

use crate::domain::types::{Column, RawRecord, Record};

/// Boolean vector aligned 1:1 with a table's row order; `true` marks a row
/// flagged anomalous by the active detector.
pub type AnomalyMask = Vec<bool>;

/// Ordered sequence of records, deduplicated by (date, hour) and sorted
/// ascending. Construction is the only place dedup/sort/sanitization happen,
/// so every downstream consumer can rely on those invariants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    rows: Vec<Record>,
}

impl RecordTable {
    /// Build a table from raw records.
    ///
    /// - non-finite floats become missing
    /// - duplicate (date, hour) keys keep the first occurrence
    /// - rows are sorted by (date, hour) ascending
    pub fn from_records(records: Vec<RawRecord>) -> Self {
        let mut seen: HashSet<(NaiveDate, u32)> = HashSet::with_capacity(records.len());
        let mut rows = Vec::with_capacity(records.len());

        for raw in records {
            let key = (raw.date, raw.hour % 24);
            if !seen.insert(key) {
                continue;
            }
            rows.push(Record {
                date: raw.date,
                hour: raw.hour % 24,
                gi: sanitize(raw.gi),
                tm: sanitize(raw.tm),
                eac: sanitize(raw.eac),
            });
        }

        rows.sort_by_key(Record::key);
        Self { rows }
    }

    pub fn from_rows(rows: Vec<Record>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One column's values in row order.
    pub fn column(&self, column: Column) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.value(column)).collect()
    }

    /// Overwrite one column from a row-aligned vector.
    pub fn set_column(&mut self, column: Column, values: &[Option<f64>]) {
        assert_eq!(values.len(), self.rows.len(), "column/row length mismatch");
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.set_value(column, *value);
        }
    }

    /// Keep only rows for which `keep` returns true.
    pub fn retain(&mut self, keep: impl FnMut(&Record) -> bool) {
        self.rows.retain(keep);
    }

    pub fn rows_mut(&mut self) -> &mut [Record] {
        &mut self.rows
    }
}

/// Project a mask computed against `sub` onto `superset` row order.
///
/// Rows of `superset` absent from `sub` default to `false`: reindexing is a
/// display alignment, never a recomputation.
pub fn reindex_mask(sub: &RecordTable, mask: &AnomalyMask, superset: &RecordTable) -> AnomalyMask {
    debug_assert_eq!(sub.len(), mask.len());

    let flagged: HashMap<(NaiveDate, u32), bool> = sub
        .rows()
        .iter()
        .zip(mask)
        .map(|(row, &f)| (row.key(), f))
        .collect();

    superset
        .rows()
        .iter()
        .map(|row| flagged.get(&row.key()).copied().unwrap_or(false))
        .collect()
}

fn sanitize(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn raw(date: NaiveDate, hour: u32, gi: f64, tm: f64, eac: f64) -> RawRecord {
        RawRecord {
            date,
            hour,
            gi: Some(gi),
            tm: Some(tm),
            eac: Some(eac),
        }
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let records = vec![
            raw(d(1), 0, 0.0, 20.0, 5.0),
            raw(d(1), 1, 300.0, 25.0, 10.0),
            raw(d(1), 1, 999.0, 99.0, 50.0),
        ];
        let table = RecordTable::from_records(records);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1].gi, Some(300.0));
    }

    #[test]
    fn dedup_is_idempotent() {
        let records = vec![
            raw(d(2), 5, 100.0, 21.0, 3.0),
            raw(d(1), 9, 200.0, 22.0, 4.0),
            raw(d(2), 5, 150.0, 23.0, 5.0),
        ];
        let once = RecordTable::from_records(records);
        let twice = RecordTable::from_records(
            once.rows()
                .iter()
                .map(|r| RawRecord {
                    date: r.date,
                    hour: r.hour,
                    gi: r.gi,
                    tm: r.tm,
                    eac: r.eac,
                })
                .collect(),
        );
        assert_eq!(once.len(), twice.len());
        assert_eq!(once, twice);
    }

    #[test]
    fn rows_sorted_by_date_then_hour() {
        let records = vec![
            raw(d(2), 3, 1.0, 1.0, 1.0),
            raw(d(1), 10, 2.0, 2.0, 2.0),
            raw(d(1), 4, 3.0, 3.0, 3.0),
        ];
        let table = RecordTable::from_records(records);
        let keys: Vec<_> = table.rows().iter().map(Record::key).collect();
        assert_eq!(keys, vec![(d(1), 4), (d(1), 10), (d(2), 3)]);
    }

    #[test]
    fn non_finite_values_become_missing() {
        let records = vec![RawRecord {
            date: d(1),
            hour: 12,
            gi: Some(f64::NAN),
            tm: Some(f64::INFINITY),
            eac: Some(7.0),
        }];
        let table = RecordTable::from_records(records);
        assert_eq!(table.rows()[0].gi, None);
        assert_eq!(table.rows()[0].tm, None);
        assert_eq!(table.rows()[0].eac, Some(7.0));
    }

    #[test]
    fn reindex_defaults_missing_rows_to_false() {
        let superset = RecordTable::from_records(vec![
            raw(d(1), 0, 1.0, 1.0, 1.0),
            raw(d(1), 1, 2.0, 2.0, 2.0),
            raw(d(1), 2, 3.0, 3.0, 3.0),
        ]);
        let mut sub = superset.clone();
        sub.retain(|r| r.hour != 1);

        let mask = vec![true, true];
        let projected = reindex_mask(&sub, &mask, &superset);
        assert_eq!(projected, vec![true, false, true]);
    }
}
