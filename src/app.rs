//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - generates the synthetic sample
//! - runs the cleaning stages and outlier detection
//! - prints reports
//! - writes optional exports

use clap::Parser;

use crate::cli::{Command, RunArgs};
use crate::data::SampleConfig;
use crate::domain::{CleanConfig, MethodArg, OutlierMethod};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `pv` binary.
pub fn run() -> Result<(), AppError> {
    // We want `pv` and `pv -m zscore` to behave like `pv run ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing. This preserves a clean clap structure while
    // retaining the requested UX.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args),
        Command::Summary(args) => handle_summary(args),
    }
}

fn handle_run(args: RunArgs) -> Result<(), AppError> {
    let sample = sample_config_from_args(&args);
    let config = clean_config_from_args(&args)?;
    let output = pipeline::run_clean(&sample, &config)?;

    println!("{}", crate::report::format_run_summary(&output, &config));

    if let Some(path) = &args.export {
        crate::io::export::write_bundles_json(path, &output)?;
        println!("Exported stage bundles to {}", path.display());
    }
    if args.debug_bundle {
        let path = crate::debug::write_debug_bundle(&output, &config)?;
        println!("Wrote debug bundle to {}", path.display());
    }

    Ok(())
}

fn handle_summary(args: RunArgs) -> Result<(), AppError> {
    let sample = sample_config_from_args(&args);
    let config = clean_config_from_args(&args)?;
    let summary = pipeline::run_removal_summary(&sample, &config)?;

    println!("{}", crate::report::format_removal_summary(&summary, &config));
    Ok(())
}

pub fn sample_config_from_args(args: &RunArgs) -> SampleConfig {
    SampleConfig {
        start_date: args.start_date,
        days: args.days,
        seed: args.seed,
        missing_rate: args.missing_rate,
        fault_rate: args.fault_rate,
        spike_rate: args.spike_rate,
        duplicate_rate: args.duplicate_rate,
    }
}

pub fn clean_config_from_args(args: &RunArgs) -> Result<CleanConfig, AppError> {
    let method = match args.method {
        MethodArg::None => OutlierMethod::None,
        MethodArg::Iqr => OutlierMethod::Iqr {
            factor: args.iqr_factor,
        },
        MethodArg::IqrSingle => OutlierMethod::IqrSingle {
            factor: args.iqr_factor,
        },
        MethodArg::Zscore => OutlierMethod::Zscore {
            threshold: args.z_threshold,
        },
        MethodArg::IsolationForest => OutlierMethod::IsolationForest {
            contamination: args.contamination,
        },
        MethodArg::Custom => OutlierMethod::Custom,
    };

    if args.iqr_factor <= 0.0 {
        return Err(AppError::invalid_parameter("--iqr-factor must be > 0"));
    }
    if args.z_threshold <= 0.0 {
        return Err(AppError::invalid_parameter("--z-threshold must be > 0"));
    }

    Ok(CleanConfig {
        apply_gi_tm: !args.no_gi_tm,
        method,
        remove_outliers: args.remove_outliers,
    })
}

/// Rewrite argv so `pv` defaults to `pv run`.
///
/// Rules:
/// - `pv`                      -> `pv run`
/// - `pv -m zscore ...`        -> `pv run -m zscore ...`
/// - `pv --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "summary");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "run flags".
    if arg1.starts_with('-') {
        argv.insert(1, "run".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_run() {
        assert_eq!(rewrite_args(args(&["pv"])), args(&["pv", "run"]));
    }

    #[test]
    fn leading_flag_defaults_to_run() {
        assert_eq!(
            rewrite_args(args(&["pv", "-m", "zscore"])),
            args(&["pv", "run", "-m", "zscore"])
        );
    }

    #[test]
    fn explicit_subcommand_and_help_pass_through() {
        assert_eq!(
            rewrite_args(args(&["pv", "summary", "-d", "7"])),
            args(&["pv", "summary", "-d", "7"])
        );
        assert_eq!(rewrite_args(args(&["pv", "--help"])), args(&["pv", "--help"]));
    }

    #[test]
    fn method_flags_map_to_parameterized_methods() {
        use clap::Parser;

        let cli = crate::cli::Cli::parse_from([
            "pv", "run", "-m", "zscore", "--z-threshold", "2.5",
        ]);
        let Command::Run(run_args) = cli.command else {
            panic!("expected run subcommand");
        };

        let config = clean_config_from_args(&run_args).unwrap();
        assert_eq!(config.method, OutlierMethod::Zscore { threshold: 2.5 });
        assert!(config.apply_gi_tm);
        assert!(!config.remove_outliers);
    }

    #[test]
    fn nonpositive_iqr_factor_is_rejected() {
        use clap::Parser;

        let cli = crate::cli::Cli::parse_from(["pv", "run", "--iqr-factor", "0"]);
        let Command::Run(run_args) = cli.command else {
            panic!("expected run subcommand");
        };
        assert!(clean_config_from_args(&run_args).is_err());
    }
}
