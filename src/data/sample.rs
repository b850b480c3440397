//! Synthetic PV sensor data generation.
//!
//! The CLI demos the pipeline without any upload/persistence layer, so this
//! module fabricates a plausible site: a diurnal irradiance curve, a
//! temperature cycle that lags irradiance, and a yield roughly proportional
//! to irradiance with a small temperature derate. Sensor pathologies are
//! injected at configurable rates — missing values, frozen temperature
//! faults, yield spikes, and duplicated (date, hour) uploads — precisely the
//! things the cleaning stages exist to handle.

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::RawRecord;
use crate::error::AppError;

/// Peak clear-sky irradiance (W/m2).
const PEAK_GI: f64 = 900.0;

/// Baseline night temperature (deg C).
const BASE_TM: f64 = 16.0;

/// Diurnal temperature swing (deg C).
const TM_SWING: f64 = 10.0;

/// Nominal yield per unit irradiance (kWh per W/m2 at 25 deg C).
const EAC_PER_GI: f64 = 0.0042;

/// Yield derate per degree above 25 deg C.
const TEMP_DERATE: f64 = 0.004;

/// Value written by a frozen temperature sensor.
const TM_FAULT_VALUE: f64 = -40.0;

/// Multiplier applied to yield by a logging spike.
const EAC_SPIKE_FACTOR: f64 = 12.0;

#[derive(Debug, Clone)]
pub struct SampleConfig {
    pub start_date: NaiveDate,
    pub days: u32,
    pub seed: u64,
    /// Per-cell probability of a missing value.
    pub missing_rate: f64,
    /// Per-row probability of a frozen temperature fault.
    pub fault_rate: f64,
    /// Per-row probability of a yield spike.
    pub spike_rate: f64,
    /// Per-row probability of a duplicated (date, hour) upload.
    pub duplicate_rate: f64,
}

impl Default for SampleConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).expect("valid date"),
            days: 30,
            seed: 42,
            missing_rate: 0.02,
            fault_rate: 0.01,
            spike_rate: 0.01,
            duplicate_rate: 0.005,
        }
    }
}

/// Generate one hourly record per (day, hour), plus injected duplicates.
pub fn generate_sample(config: &SampleConfig) -> Result<Vec<RawRecord>, AppError> {
    if config.days == 0 {
        return Err(AppError::invalid_parameter("sample days must be > 0"));
    }
    for (name, rate) in [
        ("missing_rate", config.missing_rate),
        ("fault_rate", config.fault_rate),
        ("spike_rate", config.spike_rate),
        ("duplicate_rate", config.duplicate_rate),
    ] {
        if !(rate.is_finite() && (0.0..1.0).contains(&rate)) {
            return Err(AppError::invalid_parameter(format!(
                "{name} must be in [0, 1), got {rate}"
            )));
        }
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let gi_noise = Normal::new(0.0, 12.0)
        .map_err(|e| AppError::internal(format!("noise distribution error: {e}")))?;
    let tm_noise = Normal::new(0.0, 1.2)
        .map_err(|e| AppError::internal(format!("noise distribution error: {e}")))?;
    let eac_noise = Normal::new(0.0, 0.15)
        .map_err(|e| AppError::internal(format!("noise distribution error: {e}")))?;

    let mut records = Vec::with_capacity((config.days as usize) * 24);

    for day in 0..config.days {
        let date = config.start_date + Duration::days(day as i64);
        // Mild seasonal modulation over the generated window.
        let season = 1.0 - 0.15 * (day as f64 / config.days.max(1) as f64);

        for hour in 0..24u32 {
            let elevation = solar_elevation(hour);

            let gi = PEAK_GI * season * elevation + gi_noise.sample(&mut rng);
            let tm = BASE_TM + TM_SWING * elevation + tm_noise.sample(&mut rng);
            let derate = 1.0 - TEMP_DERATE * (tm - 25.0).max(0.0);
            let eac = (gi.max(0.0) * EAC_PER_GI * derate + eac_noise.sample(&mut rng)).max(0.0);

            let mut record = RawRecord {
                date,
                hour,
                gi: Some(gi),
                tm: Some(tm),
                eac: Some(eac),
            };

            if rng.gen_bool(config.fault_rate) {
                record.tm = Some(TM_FAULT_VALUE);
            }
            if rng.gen_bool(config.spike_rate) {
                record.eac = record.eac.map(|v| (v + 1.0) * EAC_SPIKE_FACTOR);
            }
            for slot in [&mut record.gi, &mut record.tm, &mut record.eac] {
                if rng.gen_bool(config.missing_rate) {
                    *slot = None;
                }
            }

            if rng.gen_bool(config.duplicate_rate) {
                let mut dup = record.clone();
                dup.eac = dup.eac.map(|v| v * 1.1);
                records.push(dup);
            }
            records.push(record);
        }
    }

    Ok(records)
}

/// Normalized solar elevation proxy: 0 at night, peaking at solar noon.
fn solar_elevation(hour: u32) -> f64 {
    if (6..=18).contains(&hour) {
        (std::f64::consts::PI * (hour as f64 - 6.0) / 12.0).sin()
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RecordTable;

    #[test]
    fn same_seed_reproduces_the_sample() {
        let config = SampleConfig::default();
        let a = generate_sample(&config).unwrap();
        let b = generate_sample(&config).unwrap();
        assert_eq!(a.len(), b.len());
        for (ra, rb) in a.iter().zip(&b) {
            assert_eq!(ra.date, rb.date);
            assert_eq!(ra.hour, rb.hour);
            assert_eq!(ra.gi, rb.gi);
            assert_eq!(ra.eac, rb.eac);
        }
    }

    #[test]
    fn night_hours_carry_no_signal() {
        let config = SampleConfig {
            missing_rate: 0.0,
            fault_rate: 0.0,
            spike_rate: 0.0,
            duplicate_rate: 0.0,
            days: 2,
            ..SampleConfig::default()
        };
        let records = generate_sample(&config).unwrap();
        for r in records.iter().filter(|r| r.hour < 6 || r.hour > 18) {
            // Only sensor noise at night; well under any daylight reading.
            assert!(r.gi.unwrap().abs() < 100.0);
        }
    }

    #[test]
    fn duplicates_collapse_under_dedup() {
        let config = SampleConfig {
            duplicate_rate: 0.5,
            days: 3,
            ..SampleConfig::default()
        };
        let records = generate_sample(&config).unwrap();
        assert!(records.len() > 3 * 24, "expected injected duplicates");
        let table = RecordTable::from_records(records);
        assert_eq!(table.len(), 3 * 24);
    }

    #[test]
    fn invalid_rates_are_rejected() {
        let config = SampleConfig {
            missing_rate: 1.5,
            ..SampleConfig::default()
        };
        assert!(generate_sample(&config).is_err());
        let config = SampleConfig {
            days: 0,
            ..SampleConfig::default()
        };
        assert!(generate_sample(&config).is_err());
    }
}
