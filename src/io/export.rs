//! Write stage bundles to a JSON file.
//!
//! The export is the "portable" representation of a cleaning run: all three
//! stage bundles, exactly as an HTTP layer would return them. Non-finite
//! values never appear — the stats builder emits null in their place.

use std::fs::File;
use std::path::Path;

use crate::domain::StageOutput;
use crate::error::AppError;

/// Write the three stage bundles as pretty-printed JSON.
pub fn write_bundles_json(path: &Path, output: &StageOutput) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::internal(format!(
            "Failed to create export JSON '{}': {e}",
            path.display()
        ))
    })?;

    serde_json::to_writer_pretty(file, output)
        .map_err(|e| AppError::internal(format!("Failed to write export JSON: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{generate_sample, SampleConfig};
    use crate::domain::CleanConfig;
    use crate::stage::run_stages;

    #[test]
    fn export_round_trips_through_serde_json() {
        let records = generate_sample(&SampleConfig {
            days: 2,
            ..SampleConfig::default()
        })
        .unwrap();
        let output = run_stages(records, &CleanConfig::default()).unwrap();

        let json = serde_json::to_string(&output).unwrap();
        assert!(!json.contains("NaN"), "non-finite values must serialize as null");

        let parsed: StageOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.raw.row_count, output.raw.row_count);
        assert_eq!(
            parsed.after_gi_tm.histograms["EAC"],
            output.after_gi_tm.histograms["EAC"]
        );
    }
}
