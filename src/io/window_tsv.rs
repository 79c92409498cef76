use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Result, bail};

use crate::error::GrowthError;
use crate::io::{column_index, open_maybe_gz, parse_number};
use crate::measure::{FeatureRow, MeasurementWindow};

/// Reads `month  height_cm  weight_kg  muac_cm` rows (month optional).
/// Row count and value ranges are checked by [`MeasurementWindow`].
pub fn read_window_rows(path: &Path) -> Result<Vec<FeatureRow>> {
    let reader = open_maybe_gz(path)?;
    let mut reader = BufReader::new(reader);

    let mut width: Option<usize> = None;
    let mut cols = (0usize, 0usize, 0usize);
    let mut month_col: Option<usize> = None;
    let mut last_month: Option<f64> = None;
    let mut rows = Vec::new();

    let mut line = String::new();
    while reader.read_line(&mut line)? > 0 {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed.trim().is_empty() || trimmed.starts_with('#') {
            line.clear();
            continue;
        }
        let parts: Vec<&str> = trimmed.split('\t').map(str::trim).collect();

        let Some(n_columns) = width else {
            let names: Vec<String> = parts.iter().map(|s| s.to_ascii_lowercase()).collect();
            cols = (
                column_index(&names, "height_cm")?,
                column_index(&names, "weight_kg")?,
                column_index(&names, "muac_cm")?,
            );
            month_col = names.iter().position(|n| n == "month");
            width = Some(names.len());
            line.clear();
            continue;
        };

        let record = rows.len() + 1;
        if parts.len() != n_columns {
            return Err(GrowthError::validation(format!(
                "record {}: expected {} columns, found {}",
                record,
                n_columns,
                parts.len()
            ))
            .into());
        }
        if let Some(mc) = month_col {
            let month = parse_number(parts[mc], record, "month")?;
            if let Some(prev) = last_month {
                if month <= prev {
                    return Err(GrowthError::validation(format!(
                        "record {}: month {} does not increase after {}",
                        record, month, prev
                    ))
                    .into());
                }
            }
            last_month = Some(month);
        }
        rows.push([
            parse_number(parts[cols.0], record, "height_cm")?,
            parse_number(parts[cols.1], record, "weight_kg")?,
            parse_number(parts[cols.2], record, "muac_cm")?,
        ]);
        line.clear();
    }

    if width.is_none() {
        bail!("{} is empty", path.display());
    }
    Ok(rows)
}

pub fn read_window(path: &Path) -> Result<MeasurementWindow> {
    let rows = read_window_rows(path)?;
    Ok(MeasurementWindow::from_rows(&rows)?)
}
