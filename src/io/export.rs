//! CSV export of the canonical monthly series.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::MonthlySample;
use crate::error::AppError;
use crate::report::month_label;

/// Write the monthly series as `month,timestamp,apy` rows.
pub fn write_series_csv(path: &Path, series: &[MonthlySample]) -> Result<(), AppError> {
    let mut file = File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create {}: {e}", path.display())))?;

    writeln!(file, "month,timestamp,apy")
        .map_err(|e| AppError::new(4, format!("Failed to write CSV header: {e}")))?;

    for sample in series {
        writeln!(
            file,
            "{},{},{:.6}",
            month_label(&sample.timestamp),
            sample.timestamp,
            sample.apy
        )
        .map_err(|e| AppError::new(4, format!("Failed to write CSV row: {e}")))?;
    }

    Ok(())
}
