use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::error::{GrowthError, GrowthResult};
use crate::measure::Sex;
use crate::reference::{Indicator, REFERENCE_AGES, ReferenceEntry, ReferenceTable};

pub fn load_builtin_v1() -> GrowthResult<ReferenceTable> {
    let content = include_str!("../../assets/reference/who_growth_v1.tsv");
    parse_reference_tsv(content, "built-in v1")
}

/// Loads a user table; `.json` selects the keyed format, anything else is TSV.
pub fn load_reference(path: &Path) -> GrowthResult<ReferenceTable> {
    if path.extension().and_then(|s| s.to_str()) == Some("json") {
        load_reference_json(path)
    } else {
        load_reference_tsv(path)
    }
}

pub fn load_reference_tsv(path: &Path) -> GrowthResult<ReferenceTable> {
    let content = read(path)?;
    parse_reference_tsv(&content, &path.display().to_string())
}

pub fn load_reference_json(path: &Path) -> GrowthResult<ReferenceTable> {
    let content = read(path)?;
    parse_reference_json(&content, &path.display().to_string())
}

fn read(path: &Path) -> GrowthResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        GrowthError::configuration(format!(
            "failed to read reference table {}: {}",
            path.display(),
            e
        ))
    })
}

/// An uncommented `sex  indicator  ...` column line.
fn is_header(parts: &[&str]) -> bool {
    parts.len() >= 2 && parts[0].eq_ignore_ascii_case("sex") && parts[1].eq_ignore_ascii_case("indicator")
}

pub fn parse_reference_tsv(content: &str, source: &str) -> GrowthResult<ReferenceTable> {
    let mut slots: BTreeMap<(Sex, Indicator), Vec<Option<ReferenceEntry>>> = BTreeMap::new();

    let mut first_row = true;
    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let parts: Vec<&str> = trimmed.split('\t').map(str::trim).collect();
        if std::mem::take(&mut first_row) && is_header(&parts) {
            continue;
        }
        if parts.len() != 5 {
            return Err(malformed(source, line_no, "expected 5 columns"));
        }
        let sex: Sex = parts[0]
            .parse()
            .map_err(|_| malformed(source, line_no, "invalid sex"))?;
        let indicator: Indicator = parts[1]
            .parse()
            .map_err(|_| malformed(source, line_no, "invalid indicator"))?;
        let age: usize = parts[2]
            .parse()
            .map_err(|_| malformed(source, line_no, "invalid age_months"))?;
        if age >= REFERENCE_AGES {
            return Err(malformed(source, line_no, "age_months outside 0-24"));
        }
        let median: f64 = parts[3]
            .parse()
            .map_err(|_| malformed(source, line_no, "invalid median"))?;
        let minus_2sd: f64 = parts[4]
            .parse()
            .map_err(|_| malformed(source, line_no, "invalid minus_2sd"))?;

        let slot = slots
            .entry((sex, indicator))
            .or_insert_with(|| vec![None; REFERENCE_AGES]);
        if slot[age].is_some() {
            return Err(malformed(source, line_no, "duplicate row"));
        }
        slot[age] = Some(ReferenceEntry { median, minus_2sd });
    }

    let mut series = BTreeMap::new();
    for (key, entries) in slots {
        let filled: Option<Vec<ReferenceEntry>> = entries.into_iter().collect();
        match filled {
            Some(v) => {
                series.insert(key, v);
            }
            None => {
                return Err(GrowthError::configuration(format!(
                    "{}: series {}_{} is missing one or more ages",
                    source,
                    key.0.key(),
                    key.1.key()
                )));
            }
        }
    }

    ReferenceTable::from_series("v1", source, series)
}

/// Keyed format: `MALE_HT`, `MALE_HT_SD2`, ... each holding 25 values.
/// A sex-independent `MUAC` / `MUAC_SD2` pair fills both sexes when the
/// per-sex MUAC keys are absent.
pub fn parse_reference_json(content: &str, source: &str) -> GrowthResult<ReferenceTable> {
    let raw: HashMap<String, Vec<f64>> = serde_json::from_str(content).map_err(|e| {
        GrowthError::configuration(format!("{}: invalid reference JSON: {}", source, e))
    })?;

    let mut series = BTreeMap::new();
    for sex in [Sex::Male, Sex::Female] {
        for indicator in Indicator::ALL {
            let key = format!("{}_{}", sex.key(), indicator.key());
            let (median, sd2) = match (raw.get(&key), raw.get(&format!("{}_SD2", key))) {
                (Some(m), Some(s)) => (m, s),
                _ if indicator == Indicator::Muac => {
                    match (raw.get("MUAC"), raw.get("MUAC_SD2")) {
                        (Some(m), Some(s)) => (m, s),
                        _ => {
                            return Err(GrowthError::configuration(format!(
                                "{}: missing key {} (and no shared MUAC pair)",
                                source, key
                            )));
                        }
                    }
                }
                _ => {
                    return Err(GrowthError::configuration(format!(
                        "{}: missing key {} or {}_SD2",
                        source, key, key
                    )));
                }
            };
            if median.len() != sd2.len() {
                return Err(GrowthError::configuration(format!(
                    "{}: {} and {}_SD2 differ in length",
                    source, key, key
                )));
            }
            let entries = median
                .iter()
                .zip(sd2.iter())
                .map(|(&median, &minus_2sd)| ReferenceEntry { median, minus_2sd })
                .collect::<Vec<_>>();
            series.insert((sex, indicator), entries);
        }
    }

    ReferenceTable::from_series("v1", source, series)
}

fn malformed(source: &str, line_no: usize, what: &str) -> GrowthError {
    GrowthError::configuration(format!("{}:{} malformed reference TSV ({})", source, line_no, what))
}
