//! Command-line parsing for the PV data-cleaning pipeline.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the cleaning/statistics code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::domain::{
    MethodArg, DEFAULT_CONTAMINATION, DEFAULT_IQR_FACTOR, DEFAULT_Z_THRESHOLD,
};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "pv", version, about = "PV sensor data cleaning and outlier detection")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the three cleaning stages on synthetic data and print diagnostics.
    Run(RunArgs),
    /// Print the forced-removal row-count summary only (useful for scripting).
    Summary(RunArgs),
}

/// Common options for cleaning runs.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// First day of the synthetic sample.
    #[arg(long, default_value = "2024-01-01")]
    pub start_date: NaiveDate,

    /// Number of days to generate.
    #[arg(short = 'd', long, default_value_t = 30)]
    pub days: u32,

    /// Random seed for sample generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Per-cell probability of a missing value.
    #[arg(long, default_value_t = 0.02)]
    pub missing_rate: f64,

    /// Per-row probability of a frozen temperature fault.
    #[arg(long, default_value_t = 0.01)]
    pub fault_rate: f64,

    /// Per-row probability of a yield spike.
    #[arg(long, default_value_t = 0.01)]
    pub spike_rate: f64,

    /// Per-row probability of a duplicated (date, hour) upload.
    #[arg(long, default_value_t = 0.005)]
    pub duplicate_rate: f64,

    /// Outlier-detection method.
    #[arg(short = 'm', long, value_enum, default_value_t = MethodArg::Iqr)]
    pub method: MethodArg,

    /// Tukey-fence multiplier for the IQR methods.
    #[arg(long, default_value_t = DEFAULT_IQR_FACTOR)]
    pub iqr_factor: f64,

    /// |z| threshold for the z-score method.
    #[arg(long, default_value_t = DEFAULT_Z_THRESHOLD)]
    pub z_threshold: f64,

    /// Expected outlier fraction for the isolation forest (0.01 to 0.5).
    #[arg(long, default_value_t = DEFAULT_CONTAMINATION)]
    pub contamination: f64,

    /// Blank flagged cells and re-interpolate instead of merely highlighting them.
    #[arg(long)]
    pub remove_outliers: bool,

    /// Skip the physical GI/TM filter and gap interpolation.
    #[arg(long)]
    pub no_gi_tm: bool,

    /// Export all three stage bundles to JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Write a markdown debug bundle under `debug/`.
    #[arg(long)]
    pub debug_bundle: bool,
}
