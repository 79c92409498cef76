use std::collections::HashMap;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Result, bail};

use crate::error::GrowthError;
use crate::io::{column_index, open_maybe_gz, parse_number};
use crate::measure::{FeatureRow, Sex, WINDOW_LEN};

/// One child's most recent window, ready to become an assessment request.
#[derive(Debug, Clone)]
pub struct CohortChild {
    pub child_id: String,
    pub name: String,
    pub sex: Sex,
    pub age_months: u32,
    pub rows: Vec<FeatureRow>,
}

#[derive(Debug, Clone, Default)]
pub struct Cohort {
    pub children: Vec<CohortChild>,
    pub skipped: Vec<String>,
}

struct Record {
    name: String,
    sex: String,
    age: f64,
    row: FeatureRow,
}

/// Long-format cohort: one measurement per line, any number of children.
/// Children keep first-appearance order; each child's records are ordered by
/// age and the last [`WINDOW_LEN`] form its window.
pub fn read_cohort(path: &Path) -> Result<Cohort> {
    let reader = open_maybe_gz(path)?;
    let mut reader = BufReader::new(reader);

    let mut cols: Option<[usize; 7]> = None;
    let mut n_columns = 0usize;
    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<Record>> = HashMap::new();
    let mut line_no = 0usize;

    let mut line = String::new();
    while reader.read_line(&mut line)? > 0 {
        line_no += 1;
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed.trim().is_empty() || trimmed.starts_with('#') {
            line.clear();
            continue;
        }
        let parts: Vec<&str> = trimmed.split('\t').map(str::trim).collect();

        let Some(c) = cols else {
            let names: Vec<String> = parts.iter().map(|s| s.to_ascii_lowercase()).collect();
            cols = Some([
                column_index(&names, "child_id")?,
                column_index(&names, "name")?,
                column_index(&names, "sex")?,
                column_index(&names, "age_months")?,
                column_index(&names, "height_cm")?,
                column_index(&names, "weight_kg")?,
                column_index(&names, "muac_cm")?,
            ]);
            n_columns = names.len();
            line.clear();
            continue;
        };

        if parts.len() != n_columns {
            return Err(GrowthError::validation(format!(
                "{}:{} expected {} columns, found {}",
                path.display(),
                line_no,
                n_columns,
                parts.len()
            ))
            .into());
        }
        let id = parts[c[0]].to_string();
        if id.is_empty() {
            bail!("{}:{} empty child_id", path.display(), line_no);
        }
        let age = parse_number(parts[c[3]], line_no, "age_months")?;
        if !age.is_finite() || age < 0.0 {
            return Err(GrowthError::validation(format!(
                "{}:{} age_months must be a non-negative number",
                path.display(),
                line_no
            ))
            .into());
        }
        let record = Record {
            name: parts[c[1]].to_string(),
            sex: parts[c[2]].to_string(),
            age,
            row: [
                parse_number(parts[c[4]], line_no, "height_cm")?,
                parse_number(parts[c[5]], line_no, "weight_kg")?,
                parse_number(parts[c[6]], line_no, "muac_cm")?,
            ],
        };

        if !groups.contains_key(&id) {
            order.push(id.clone());
        }
        groups.entry(id).or_default().push(record);
        line.clear();
    }

    if cols.is_none() {
        bail!("{} is empty", path.display());
    }

    let mut cohort = Cohort::default();
    for id in order {
        let Some(mut records) = groups.remove(&id) else {
            continue;
        };
        if records.len() < WINDOW_LEN {
            cohort.skipped.push(format!(
                "child '{}' has {} records (need {})",
                id,
                records.len(),
                WINDOW_LEN
            ));
            continue;
        }
        records.sort_by(|a, b| a.age.total_cmp(&b.age));
        let tail = records.split_off(records.len() - WINDOW_LEN);
        let Some(last) = tail.last() else {
            continue;
        };
        let sex: Sex = match last.sex.parse() {
            Ok(s) => s,
            Err(e) => {
                cohort.skipped.push(format!("child '{}': {}", id, e));
                continue;
            }
        };
        cohort.children.push(CohortChild {
            child_id: id,
            name: last.name.clone(),
            sex,
            age_months: last.age as u32,
            rows: tail.iter().map(|r| r.row).collect(),
        });
    }

    Ok(cohort)
}
