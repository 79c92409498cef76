mod loader;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, GrowthResult};
use crate::measure::Sex;

pub use loader::{
    load_builtin_v1, load_reference, load_reference_json, load_reference_tsv, parse_reference_json,
    parse_reference_tsv,
};

/// Oldest age (months) covered by the reference curves; older ages reuse this row.
pub const MAX_REFERENCE_AGE: u32 = 24;
pub const REFERENCE_AGES: usize = MAX_REFERENCE_AGE as usize + 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Height,
    Weight,
    Muac,
}

impl Indicator {
    pub const ALL: [Indicator; 3] = [Indicator::Height, Indicator::Weight, Indicator::Muac];

    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Height => "height",
            Indicator::Weight => "weight",
            Indicator::Muac => "muac",
        }
    }

    /// Suffix used by the keyed reference format (`MALE_HT`, `FEMALE_WT_SD2`, ...).
    pub fn key(&self) -> &'static str {
        match self {
            Indicator::Height => "HT",
            Indicator::Weight => "WT",
            Indicator::Muac => "MUAC",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Indicator::Height => "cm",
            Indicator::Weight => "kg",
            Indicator::Muac => "cm",
        }
    }

    /// Column of this indicator inside a feature row.
    pub fn column(&self) -> usize {
        match self {
            Indicator::Height => 0,
            Indicator::Weight => 1,
            Indicator::Muac => 2,
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Indicator {
    type Err = GrowthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "height" | "ht" => Ok(Indicator::Height),
            "weight" | "wt" => Ok(Indicator::Weight),
            "muac" => Ok(Indicator::Muac),
            other => Err(GrowthError::reference_lookup(format!(
                "unsupported indicator '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceEntry {
    pub median: f64,
    pub minus_2sd: f64,
}

/// Immutable WHO median / -2SD lookup keyed by (sex, indicator, age).
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceTable {
    pub version: String,
    pub source: String,
    series: BTreeMap<(Sex, Indicator), Vec<ReferenceEntry>>,
}

impl ReferenceTable {
    /// Builds a table, rejecting anything short of 6 complete, well-ordered series.
    pub fn from_series(
        version: impl Into<String>,
        source: impl Into<String>,
        series: BTreeMap<(Sex, Indicator), Vec<ReferenceEntry>>,
    ) -> GrowthResult<Self> {
        let source = source.into();
        for sex in [Sex::Male, Sex::Female] {
            for indicator in Indicator::ALL {
                let entries = series.get(&(sex, indicator)).ok_or_else(|| {
                    GrowthError::configuration(format!(
                        "{}: missing reference series {}_{}",
                        source,
                        sex.key(),
                        indicator.key()
                    ))
                })?;
                if entries.len() != REFERENCE_AGES {
                    return Err(GrowthError::configuration(format!(
                        "{}: series {}_{} has {} ages, expected {}",
                        source,
                        sex.key(),
                        indicator.key(),
                        entries.len(),
                        REFERENCE_AGES
                    )));
                }
                for (age, e) in entries.iter().enumerate() {
                    if !e.median.is_finite() || !e.minus_2sd.is_finite() {
                        return Err(GrowthError::configuration(format!(
                            "{}: non-finite value in {}_{} at age {}",
                            source,
                            sex.key(),
                            indicator.key(),
                            age
                        )));
                    }
                    if e.minus_2sd > e.median {
                        return Err(GrowthError::configuration(format!(
                            "{}: -2SD above median in {}_{} at age {}",
                            source,
                            sex.key(),
                            indicator.key(),
                            age
                        )));
                    }
                }
            }
        }
        Ok(Self {
            version: version.into(),
            source,
            series,
        })
    }

    pub fn lookup(&self, sex: Sex, indicator: Indicator, age_months: u32) -> GrowthResult<ReferenceEntry> {
        let age = clamp_age(age_months) as usize;
        self.series(sex, indicator)?
            .get(age)
            .copied()
            .ok_or_else(|| {
                GrowthError::reference_lookup(format!(
                    "no {}_{} entry for age {}",
                    sex.key(),
                    indicator.key(),
                    age
                ))
            })
    }

    pub fn series(&self, sex: Sex, indicator: Indicator) -> GrowthResult<&[ReferenceEntry]> {
        self.series
            .get(&(sex, indicator))
            .map(Vec::as_slice)
            .ok_or_else(|| {
                GrowthError::reference_lookup(format!(
                    "no reference series {}_{}",
                    sex.key(),
                    indicator.key()
                ))
            })
    }
}

pub fn clamp_age(age_months: u32) -> u32 {
    age_months.min(MAX_REFERENCE_AGE)
}
