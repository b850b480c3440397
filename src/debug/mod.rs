//! Debug bundle writer for inspecting a full cleaning run.
//!
//! Dumps one markdown file per run under `debug/` with the configuration,
//! per-stage row/flag accounting, histogram coverage, box-plot group counts,
//! and both correlation matrices. Meant for eyeballing why a particular
//! method flagged (or missed) something, without wiring up a frontend.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::PathBuf;

use chrono::Local;

use crate::domain::{CleanConfig, CorrelationMatrix, StageBundle, StageOutput};
use crate::error::AppError;

pub fn write_debug_bundle(output: &StageOutput, config: &CleanConfig) -> Result<PathBuf, AppError> {
    let dir = PathBuf::from("debug");
    create_dir_all(&dir)
        .map_err(|e| AppError::internal(format!("Failed to create debug dir: {e}")))?;

    let ts = Local::now().format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("pv_debug_{}_{ts}.md", config.method.display_name()));

    let mut file = File::create(&path)
        .map_err(|e| AppError::internal(format!("Failed to create debug file: {e}")))?;

    write_markdown(&mut file, output, config)
        .map_err(|e| AppError::internal(format!("Failed to write debug bundle: {e}")))?;

    Ok(path)
}

fn write_markdown(
    file: &mut File,
    output: &StageOutput,
    config: &CleanConfig,
) -> std::io::Result<()> {
    writeln!(file, "# pv debug bundle")?;
    writeln!(file, "- generated: {}", Local::now().to_rfc3339())?;
    writeln!(file, "- method: {}", config.method.display_name())?;
    writeln!(file, "- method_params: {:?}", config.method)?;
    writeln!(file, "- apply_gi_tm: {}", config.apply_gi_tm)?;
    writeln!(file, "- remove_outliers: {}", config.remove_outliers)?;

    writeln!(file, "\n## Stages")?;
    writeln!(file, "| stage | rows | flagged |")?;
    writeln!(file, "| - | - | - |")?;
    for (name, bundle) in stages(output) {
        writeln!(file, "| {name} | {} | {} |", bundle.row_count, bundle.flagged_rows)?;
    }

    for (name, bundle) in stages(output) {
        writeln!(file, "\n## Stage: {name}")?;

        writeln!(file, "\n### Histograms")?;
        writeln!(file, "| column | n | min_edge | max_edge |")?;
        writeln!(file, "| - | - | - | - |")?;
        for (column, hist) in &bundle.histograms {
            if hist.is_empty() {
                writeln!(file, "| {column} | 0 | - | - |")?;
            } else {
                writeln!(
                    file,
                    "| {column} | {} | {:.3} | {:.3} |",
                    hist.counts.iter().sum::<u64>(),
                    hist.bins[0],
                    hist.bins[hist.bins.len() - 1]
                )?;
            }
        }

        writeln!(file, "\n### Box-plot groups")?;
        writeln!(
            file,
            "- by month: {} | by day: {} | by hour: {}",
            bundle.box_plots_by_month.len(),
            bundle.box_plots_by_day.len(),
            bundle.box_plots_by_hour.len()
        )?;
    }

    writeln!(file, "\n## Correlation (sensor)")?;
    write_matrix(file, &output.raw.correlation_matrix)?;
    writeln!(file, "\n## Correlation (full)")?;
    write_matrix(file, &output.raw.correlation_matrix_full)?;

    Ok(())
}

fn write_matrix(file: &mut File, matrix: &CorrelationMatrix) -> std::io::Result<()> {
    if matrix.is_empty() {
        writeln!(file, "(insufficient data)")?;
        return Ok(());
    }

    writeln!(file, "| | {} |", matrix.variables.join(" | "))?;
    let dashes: Vec<&str> = std::iter::repeat("-").take(matrix.variables.len() + 1).collect();
    writeln!(file, "| {} |", dashes.join(" | "))?;
    for (name, row) in matrix.variables.iter().zip(&matrix.values) {
        let cells: Vec<String> = row
            .iter()
            .map(|v| match v {
                Some(v) => format!("{v:.3}"),
                None => "-".to_string(),
            })
            .collect();
        writeln!(file, "| {name} | {} |", cells.join(" | "))?;
    }
    Ok(())
}

fn stages(output: &StageOutput) -> [(&'static str, &StageBundle); 3] {
    [
        ("raw", &output.raw),
        ("after_gi_tm", &output.after_gi_tm),
        ("after_outlier", &output.after_outlier),
    ]
}
