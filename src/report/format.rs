//! Formatted terminal output for a cleaning run.

use crate::domain::{CleanConfig, CorrelationMatrix, RemovalSummary, StageBundle, StageOutput};

/// Format the full run summary: configuration, per-stage row/flag counts,
/// histogram coverage, and the sensor correlation matrix.
pub fn format_run_summary(output: &StageOutput, config: &CleanConfig) -> String {
    let mut out = String::new();

    out.push_str("=== pv - PV data cleaning ===\n");
    out.push_str(&format!(
        "Method: {} | physical filter: {} | remove outliers: {}\n",
        config.method.display_name(),
        on_off(config.apply_gi_tm),
        on_off(config.remove_outliers),
    ));

    out.push_str("\nStages:\n");
    for (name, bundle) in stages(output) {
        out.push_str(&format!(
            "  {name:<14} rows={:<6} flagged={}\n",
            bundle.row_count, bundle.flagged_rows
        ));
    }

    out.push_str("\nHistograms (after_gi_tm):\n");
    for (column, hist) in &output.after_gi_tm.histograms {
        if hist.is_empty() {
            out.push_str(&format!("  {column:<4} (insufficient data)\n"));
        } else {
            let n: u64 = hist.counts.iter().sum();
            out.push_str(&format!(
                "  {column:<4} n={n} range=[{:.2}, {:.2}]\n",
                hist.bins[0],
                hist.bins[hist.bins.len() - 1]
            ));
        }
    }

    out.push_str("\nSensor correlation:\n");
    out.push_str(&format_matrix(&output.after_gi_tm.correlation_matrix));

    out
}

/// Format the forced-removal row-count summary.
pub fn format_removal_summary(summary: &RemovalSummary, config: &CleanConfig) -> String {
    format!(
        "=== pv - removal summary ===\n\
         Method: {}\n\
         before_rows: {}\n\
         after_rows: {}\n\
         removed_ratio: {:.3}\n",
        config.method.display_name(),
        summary.before_rows,
        summary.after_rows,
        summary.removed_ratio
    )
}

fn stages(output: &StageOutput) -> [(&'static str, &StageBundle); 3] {
    [
        ("raw", &output.raw),
        ("after_gi_tm", &output.after_gi_tm),
        ("after_outlier", &output.after_outlier),
    ]
}

fn format_matrix(matrix: &CorrelationMatrix) -> String {
    if matrix.is_empty() {
        return "  (insufficient data)\n".to_string();
    }

    let mut out = String::new();
    out.push_str("       ");
    for name in &matrix.variables {
        out.push_str(&format!("{name:>8}"));
    }
    out.push('\n');

    for (name, row) in matrix.variables.iter().zip(&matrix.values) {
        out.push_str(&format!("  {name:<5}"));
        for value in row {
            match value {
                Some(v) => out.push_str(&format!("{v:>8.3}")),
                None => out.push_str(&format!("{:>8}", "-")),
            }
        }
        out.push('\n');
    }
    out
}

fn on_off(flag: bool) -> &'static str {
    if flag { "on" } else { "off" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{generate_sample, SampleConfig};
    use crate::stage::run_stages;

    #[test]
    fn run_summary_mentions_all_stages() {
        let records = generate_sample(&SampleConfig {
            days: 3,
            ..SampleConfig::default()
        })
        .unwrap();
        let config = CleanConfig::default();
        let output = run_stages(records, &config).unwrap();

        let text = format_run_summary(&output, &config);
        assert!(text.contains("raw"));
        assert!(text.contains("after_gi_tm"));
        assert!(text.contains("after_outlier"));
        assert!(text.contains("Method: iqr"));
    }

    #[test]
    fn removal_summary_prints_three_decimals() {
        let summary = RemovalSummary {
            before_rows: 100,
            after_rows: 97,
            removed_ratio: 0.03,
        };
        let text = format_removal_summary(&summary, &CleanConfig::default());
        assert!(text.contains("removed_ratio: 0.030"));
    }
}
