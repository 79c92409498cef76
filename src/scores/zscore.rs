//! Z-score against the WHO median / -2SD curves.
//!
//! The divisor is `median - minus_2sd`, the one-sided distance to the -2SD
//! curve, applied to values on either side of the median.

use crate::error::GrowthResult;
use crate::measure::Sex;
use crate::reference::{Indicator, ReferenceTable};
use crate::scores::{Category, Classification, ZScore};

pub fn score(
    table: &ReferenceTable,
    value: f64,
    age_months: u32,
    sex: Sex,
    indicator: Indicator,
) -> GrowthResult<ZScore> {
    let entry = table.lookup(sex, indicator, age_months)?;
    let sd = entry.median - entry.minus_2sd;
    // Degenerate row: median equals -2SD.
    if sd == 0.0 {
        return Ok(ZScore {
            z: 0.0,
            median: entry.median,
            minus_2sd: entry.minus_2sd,
            category: Category::Normal,
        });
    }
    let z = (value - entry.median) / sd;
    Ok(ZScore {
        z,
        median: entry.median,
        minus_2sd: entry.minus_2sd,
        category: category_for(z),
    })
}

pub fn classify(
    table: &ReferenceTable,
    value: f64,
    age_months: u32,
    sex: Sex,
    indicator: Indicator,
) -> GrowthResult<Classification> {
    let s = score(table, value, age_months, sex, indicator)?;
    Ok(Classification {
        indicator,
        z_score: s.z,
        category: s.category,
        reference_median: s.median,
    })
}

pub fn category_for(z: f64) -> Category {
    if z < -3.0 {
        Category::Severe
    } else if z < -2.0 {
        Category::Moderate
    } else if z < -1.0 {
        Category::AtRisk
    } else {
        Category::Normal
    }
}
