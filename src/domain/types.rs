//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory while the stages run
//! - returned to an HTTP/persistence layer as plain nested data
//! - exported to JSON for inspection or plotting

use std::collections::BTreeMap;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Default Tukey-fence multiplier for the IQR methods.
pub const DEFAULT_IQR_FACTOR: f64 = 1.5;

/// Default |z| threshold for the z-score method.
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Default isolation-forest contamination fraction.
pub const DEFAULT_CONTAMINATION: f64 = 0.1;

/// Sensor columns carried by every record.
///
/// Grouping keys (month/day/hour) are derived from the record date on demand
/// and are deliberately *not* columns: they can never be missing and never
/// need interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Column {
    Eac,
    Gi,
    Tm,
}

impl Column {
    pub const ALL: [Column; 3] = [Column::Eac, Column::Gi, Column::Tm];

    /// Column label as it appears in bundle keys and exports.
    pub fn as_str(self) -> &'static str {
        match self {
            Column::Eac => "EAC",
            Column::Gi => "GI",
            Column::Tm => "TM",
        }
    }
}

/// One raw observation as handed over by the upload/persistence layer.
///
/// Values may be missing; non-finite floats are treated as missing when the
/// record enters a [`crate::domain::RecordTable`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRecord {
    pub date: NaiveDate,
    /// Hour of day, 0-23.
    pub hour: u32,
    pub gi: Option<f64>,
    pub tm: Option<f64>,
    pub eac: Option<f64>,
}

/// A normalized observation inside a table (all stored floats are finite).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub date: NaiveDate,
    pub hour: u32,
    pub gi: Option<f64>,
    pub tm: Option<f64>,
    pub eac: Option<f64>,
}

impl Record {
    pub fn value(&self, column: Column) -> Option<f64> {
        match column {
            Column::Eac => self.eac,
            Column::Gi => self.gi,
            Column::Tm => self.tm,
        }
    }

    pub fn set_value(&mut self, column: Column, value: Option<f64>) {
        match column {
            Column::Eac => self.eac = value,
            Column::Gi => self.gi = value,
            Column::Tm => self.tm = value,
        }
    }

    /// Dedup/sort key: records are unique per (date, hour).
    pub fn key(&self) -> (NaiveDate, u32) {
        (self.date, self.hour)
    }
}

/// Outlier-detection method selector for the CLI.
///
/// The pipeline itself takes the parameterized [`OutlierMethod`]; this enum
/// exists so clap can offer the closed set of names, with the numeric
/// parameters supplied by separate flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    None,
    Iqr,
    IqrSingle,
    Zscore,
    IsolationForest,
    Custom,
}

/// Outlier-detection method with its parameters.
///
/// A closed enum (rather than a method string + parameter map) so that an
/// unsupported method is unrepresentable and each method carries exactly the
/// parameters it understands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum OutlierMethod {
    /// No detection; the mask is all-false.
    None,
    /// Tukey fences per column over EAC, GI and TM, OR-combined.
    Iqr { factor: f64 },
    /// Tukey fences over EAC only.
    IqrSingle { factor: f64 },
    /// |value - mean| / stddev threshold per column, OR-combined.
    Zscore { threshold: f64 },
    /// Isolation forest over the jointly non-missing rows of EAC/GI/TM.
    ///
    /// `contamination` is the expected outlier fraction, valid in [0.01, 0.5].
    IsolationForest { contamination: f64 },
    /// Fixed physical-plausibility rules (thresholds are tunable constants,
    /// not user parameters).
    Custom,
}

impl OutlierMethod {
    /// Columns the method detects on (and that removal blanks).
    pub fn columns(&self) -> &'static [Column] {
        match self {
            OutlierMethod::None => &[],
            OutlierMethod::IqrSingle { .. } => &[Column::Eac],
            OutlierMethod::Iqr { .. }
            | OutlierMethod::Zscore { .. }
            | OutlierMethod::IsolationForest { .. }
            | OutlierMethod::Custom => &Column::ALL,
        }
    }

    /// Human-readable label for reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            OutlierMethod::None => "none",
            OutlierMethod::Iqr { .. } => "iqr",
            OutlierMethod::IqrSingle { .. } => "iqr_single",
            OutlierMethod::Zscore { .. } => "zscore",
            OutlierMethod::IsolationForest { .. } => "isolation_forest",
            OutlierMethod::Custom => "custom",
        }
    }
}

/// A full cleaning run's configuration as understood by the stage runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanConfig {
    /// Enable the physical filter (GI/TM) and gap interpolation for stage 2.
    pub apply_gi_tm: bool,
    pub method: OutlierMethod,
    /// Remediate flagged cells in stage 3 instead of merely highlighting them.
    pub remove_outliers: bool,
}

impl Default for CleanConfig {
    fn default() -> Self {
        Self {
            apply_gi_tm: true,
            method: OutlierMethod::Iqr {
                factor: DEFAULT_IQR_FACTOR,
            },
            remove_outliers: false,
        }
    }
}

/// Fixed 10-bin histogram: 11 edges, 10 counts. Empty when the column had
/// fewer than 5 non-missing values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bins: Vec<f64>,
    pub counts: Vec<u64>,
}

impl Histogram {
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Parallel x/y value lists for one ordered variable pair, with the outlier
/// flag aligned to the rows that survived the missing-either filter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScatterPair {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub is_outlier: Vec<bool>,
}

/// Five-number summary plus Tukey whiskers for one box-plot group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    /// Q1 - 1.5*IQR; collapses to the median when IQR is 0.
    pub whisker_low: f64,
    /// Q3 + 1.5*IQR; collapses to the median when IQR is 0.
    pub whisker_high: f64,
    /// Values outside the whiskers. Emptied when the caller chose removal.
    pub outliers: Vec<f64>,
}

/// Pairwise Pearson correlation matrix. Empty (`variables == []`) when fewer
/// than 2 complete rows were available. Non-finite entries are null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub variables: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// The fixed-shape diagnostic output for one cleaning stage.
///
/// Produced fresh per stage and never mutated afterwards. All maps are
/// ordered so serialized output is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageBundle {
    pub row_count: usize,
    pub flagged_rows: usize,
    pub histograms: BTreeMap<String, Histogram>,
    pub scatter_pairs: BTreeMap<String, ScatterPair>,
    pub box_plots_by_month: BTreeMap<u32, BoxSummary>,
    pub box_plots_by_day: BTreeMap<u32, BoxSummary>,
    pub box_plots_by_hour: BTreeMap<u32, BoxSummary>,
    /// Sensor-only (EAC/GI/TM) matrix.
    pub correlation_matrix: CorrelationMatrix,
    /// Full matrix over EAC/GI/TM/day/hour/month.
    pub correlation_matrix_full: CorrelationMatrix,
}

/// All three per-stage bundles of a cleaning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageOutput {
    pub raw: StageBundle,
    pub after_gi_tm: StageBundle,
    pub after_outlier: StageBundle,
}

/// Row counts recorded after a forced-removal cleaning pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovalSummary {
    pub before_rows: usize,
    pub after_rows: usize,
    /// (before - after) / before, rounded to 3 decimals. 0.0 when no rows.
    pub removed_ratio: f64,
}
