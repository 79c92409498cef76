use std::fs::File;
use std::io::{BufWriter, Read};
use std::path::Path;

use anyhow::Result;
use flate2::read::GzDecoder;

use crate::error::GrowthError;
use crate::schema::v1::GrowthQcV1;

pub mod cohort;
pub mod json_writer;
pub mod summary;
pub mod tsv_writer;
pub mod window_tsv;

pub fn write_json(path: &Path, report: &GrowthQcV1) -> Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, report)?;
    Ok(())
}

pub(crate) fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path)?;
    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let decoder = GzDecoder::new(file);
        Ok(Box::new(decoder))
    } else {
        Ok(Box::new(file))
    }
}

pub(crate) fn column_index(header: &[String], name: &str) -> Result<usize, GrowthError> {
    header
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| GrowthError::validation(format!("missing column '{}'", name)))
}

pub(crate) fn parse_number(field: &str, record: usize, name: &str) -> Result<f64, GrowthError> {
    if field.is_empty() {
        return Err(GrowthError::validation(format!(
            "record {}: {} is missing",
            record, name
        )));
    }
    field.parse::<f64>().map_err(|_| {
        GrowthError::validation(format!(
            "record {}: {} is not numeric ('{}')",
            record, name, field
        ))
    })
}
