//! Fixed physical-plausibility rules.
//!
//! These are sanity checks on the physics of a PV site, not statistics: a
//! panel cannot produce large yield in the dark, and an overheating sensor
//! paired with near-zero yield points at a logging fault. Thresholds are
//! tunable constants, deliberately not user parameters.

use crate::domain::{AnomalyMask, RecordTable};

/// Irradiance below this (W/m2) counts as "effectively dark".
const LOW_GI: f64 = 50.0;

/// Yield above this (kWh) is implausible while dark.
const HIGH_EAC_WHILE_DARK: f64 = 5.0;

/// Module temperature above this (deg C) counts as "very hot".
const HIGH_TM: f64 = 45.0;

/// Yield below this (kWh) is implausible while the module runs very hot
/// (heat comes from converting real irradiance).
const LOW_EAC_WHILE_HOT: f64 = 0.5;

/// Apply every rule and OR the per-rule masks.
pub fn detect(table: &RecordTable) -> AnomalyMask {
    table
        .rows()
        .iter()
        .map(|row| {
            let dark_but_producing = matches!(
                (row.gi, row.eac),
                (Some(gi), Some(eac)) if gi < LOW_GI && eac > HIGH_EAC_WHILE_DARK
            );
            let hot_but_idle = matches!(
                (row.tm, row.eac),
                (Some(tm), Some(eac)) if tm > HIGH_TM && eac < LOW_EAC_WHILE_HOT
            );
            dark_but_producing || hot_but_idle
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RawRecord;
    use chrono::NaiveDate;

    fn table(rows: Vec<(Option<f64>, Option<f64>, Option<f64>)>) -> RecordTable {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        RecordTable::from_records(
            rows.into_iter()
                .enumerate()
                .map(|(hour, (gi, tm, eac))| RawRecord {
                    date,
                    hour: hour as u32,
                    gi,
                    tm,
                    eac,
                })
                .collect(),
        )
    }

    #[test]
    fn dark_but_producing_is_flagged() {
        let t = table(vec![
            (Some(10.0), Some(20.0), Some(8.0)),
            (Some(600.0), Some(30.0), Some(8.0)),
        ]);
        assert_eq!(detect(&t), vec![true, false]);
    }

    #[test]
    fn hot_but_idle_is_flagged() {
        let t = table(vec![
            (Some(700.0), Some(55.0), Some(0.1)),
            (Some(700.0), Some(55.0), Some(6.0)),
        ]);
        assert_eq!(detect(&t), vec![true, false]);
    }

    #[test]
    fn missing_values_disable_a_rule() {
        let t = table(vec![
            (None, Some(20.0), Some(8.0)),
            (Some(10.0), None, Some(8.0)),
        ]);
        // Row 0 has no GI, so the dark rule can't fire; row 1 still fires it.
        assert_eq!(detect(&t), vec![false, true]);
    }
}
