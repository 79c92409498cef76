pub mod risk;
pub mod trajectory;
pub mod zscore;

use serde::{Deserialize, Serialize};

use crate::measure::{ChildProfile, FeatureRow};
use crate::reference::Indicator;

/// Undernutrition risk band; no upper-tail categories exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Severe,
    Moderate,
    AtRisk,
    Normal,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Severe => "severe",
            Category::Moderate => "moderate",
            Category::AtRisk => "at_risk",
            Category::Normal => "normal",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZScore {
    pub z: f64,
    pub median: f64,
    pub minus_2sd: f64,
    pub category: Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub indicator: Indicator,
    pub z_score: f64,
    pub category: Category,
    pub reference_median: f64,
}

/// One predicted month, de-normalized but not yet classified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    pub month_index: u32,
    pub age_months: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub muac_cm: f64,
}

impl ForecastPoint {
    pub fn value(&self, indicator: Indicator) -> f64 {
        self.as_row()[indicator.column()]
    }

    pub fn as_row(&self) -> FeatureRow {
        [self.height_cm, self.weight_kg, self.muac_cm]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedPoint {
    pub point: ForecastPoint,
    /// Always Height, Weight, MUAC in that order.
    pub classifications: Vec<Classification>,
}

impl ClassifiedPoint {
    pub fn classification(&self, indicator: Indicator) -> Option<&Classification> {
        self.classifications.iter().find(|c| c.indicator == indicator)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActualSeries {
    pub height_cm: Vec<f64>,
    pub weight_kg: Vec<f64>,
    pub muac_cm: Vec<f64>,
}

/// Reference curve sampled on the combined historical + forecast age axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceCurve {
    pub indicator: Indicator,
    pub ages: Vec<u32>,
    pub median: Vec<f64>,
    pub minus_2sd: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrajectoryReport {
    pub profile: ChildProfile,
    pub historical_ages: Vec<u32>,
    pub forecast_ages: Vec<u32>,
    pub actual: ActualSeries,
    pub points: Vec<ClassifiedPoint>,
    pub reference_curves: Vec<ReferenceCurve>,
}

impl TrajectoryReport {
    pub fn combined_ages(&self) -> Vec<u32> {
        let mut ages = self.historical_ages.clone();
        ages.extend_from_slice(&self.forecast_ages);
        ages
    }

    /// Classifications of the last forecast month.
    pub fn outlook(&self) -> &[Classification] {
        self.points
            .last()
            .map(|p| p.classifications.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskFlag {
    pub name: String,
    pub indicator: Indicator,
    pub fired: bool,
    pub threshold: String,
    pub details: Option<String>,
}
