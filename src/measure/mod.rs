//! Per-request inputs: the child profile and the 12-month measurement window.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, GrowthResult};

pub const WINDOW_LEN: usize = 12;
pub const FEATURES: usize = 3;
pub const MIN_AGE_MONTHS: u32 = 12;
/// Upper bound on the profile age; keeps forecast ages far from overflow.
pub const MAX_AGE_MONTHS: u32 = 240;

pub const MAX_HEIGHT_CM: f64 = 150.0;
pub const MAX_WEIGHT_KG: f64 = 50.0;
pub const MAX_MUAC_CM: f64 = 30.0;

/// One row of a measurement matrix: height, weight, MUAC in that column order.
pub type FeatureRow = [f64; FEATURES];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
        }
    }

    /// Upper-case key prefix used by the keyed reference format.
    pub fn key(&self) -> &'static str {
        match self {
            Sex::Male => "MALE",
            Sex::Female => "FEMALE",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = GrowthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" | "l" | "laki-laki" => Ok(Sex::Male),
            "female" | "f" | "p" | "perempuan" => Ok(Sex::Female),
            other => Err(GrowthError::validation(format!("unrecognised sex '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub name: String,
    pub sex: Sex,
    pub current_age_months: u32,
}

impl ChildProfile {
    pub fn new(name: impl Into<String>, sex: Sex, current_age_months: u32) -> GrowthResult<Self> {
        if current_age_months < MIN_AGE_MONTHS {
            return Err(GrowthError::validation(format!(
                "current_age_months must be >= {} (got {})",
                MIN_AGE_MONTHS, current_age_months
            )));
        }
        if current_age_months > MAX_AGE_MONTHS {
            return Err(GrowthError::validation(format!(
                "current_age_months must be <= {} (got {})",
                MAX_AGE_MONTHS, current_age_months
            )));
        }
        Ok(Self {
            name: name.into(),
            sex,
            current_age_months,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub height_cm: f64,
    pub weight_kg: f64,
    pub muac_cm: f64,
}

impl Measurement {
    pub fn new(height_cm: f64, weight_kg: f64, muac_cm: f64) -> Self {
        Self {
            height_cm,
            weight_kg,
            muac_cm,
        }
    }

    pub fn from_row(row: FeatureRow) -> Self {
        Self::new(row[0], row[1], row[2])
    }

    pub fn as_row(&self) -> FeatureRow {
        [self.height_cm, self.weight_kg, self.muac_cm]
    }
}

/// Exactly [`WINDOW_LEN`] validated measurements, oldest first.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementWindow {
    records: Vec<Measurement>,
}

impl MeasurementWindow {
    pub fn new(records: Vec<Measurement>) -> GrowthResult<Self> {
        if records.len() != WINDOW_LEN {
            return Err(GrowthError::validation(format!(
                "measurement window must have exactly {} records (got {})",
                WINDOW_LEN,
                records.len()
            )));
        }
        for (idx, m) in records.iter().enumerate() {
            check_field(idx, "height_cm", m.height_cm, MAX_HEIGHT_CM)?;
            check_field(idx, "weight_kg", m.weight_kg, MAX_WEIGHT_KG)?;
            check_field(idx, "muac_cm", m.muac_cm, MAX_MUAC_CM)?;
        }
        Ok(Self { records })
    }

    pub fn from_rows(rows: &[FeatureRow]) -> GrowthResult<Self> {
        Self::new(rows.iter().copied().map(Measurement::from_row).collect())
    }

    pub fn records(&self) -> &[Measurement] {
        &self.records
    }

    pub fn rows(&self) -> Vec<FeatureRow> {
        self.records.iter().map(Measurement::as_row).collect()
    }

    pub fn heights(&self) -> Vec<f64> {
        self.records.iter().map(|m| m.height_cm).collect()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.records.iter().map(|m| m.weight_kg).collect()
    }

    pub fn muacs(&self) -> Vec<f64> {
        self.records.iter().map(|m| m.muac_cm).collect()
    }
}

fn check_field(idx: usize, name: &str, value: f64, max: f64) -> GrowthResult<()> {
    if !value.is_finite() {
        return Err(GrowthError::validation(format!(
            "record {}: {} is not a finite number",
            idx + 1,
            name
        )));
    }
    if !(0.0..=max).contains(&value) {
        return Err(GrowthError::validation(format!(
            "record {}: {} = {} outside [0, {}]",
            idx + 1,
            name,
            value,
            max
        )));
    }
    Ok(())
}
