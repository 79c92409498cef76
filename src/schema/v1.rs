use serde::{Deserialize, Serialize};

use crate::measure::Sex;
use crate::reference::Indicator;
use crate::scores::Category;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildMeta {
    pub name: String,
    pub sex: Sex,
    pub current_age_months: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Axes {
    pub historical: Vec<u32>,
    pub forecast: Vec<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Actual {
    pub height_cm: Vec<f64>,
    pub weight_kg: Vec<f64>,
    pub muac_cm: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub indicator: Indicator,
    pub z_score: f64,
    pub category: Category,
    pub reference_median: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastRow {
    pub month_index: u32,
    pub age_months: u32,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub muac_cm: f64,
    pub classifications: Vec<Classification>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceCurve {
    pub indicator: Indicator,
    pub ages: Vec<u32>,
    pub median: Vec<f64>,
    pub minus_2sd: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFlag {
    pub name: String,
    pub indicator: Indicator,
    pub fired: bool,
    pub threshold: Option<String>,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthQcV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub child: ChildMeta,
    pub forecaster: String,
    pub reference: String,
    pub axes: Axes,
    pub actual: Actual,
    pub forecast: Vec<ForecastRow>,
    pub reference_curves: Vec<ReferenceCurve>,
    pub outlook: Vec<Classification>,
    pub risk_flags: Vec<RiskFlag>,
}

impl GrowthQcV1 {
    pub fn empty(tool_version: &str, child: ChildMeta) -> Self {
        Self {
            tool: "kira-growthqc".to_string(),
            version: tool_version.to_string(),
            schema_version: "v1".to_string(),
            child,
            forecaster: String::new(),
            reference: String::new(),
            axes: Axes {
                historical: Vec::new(),
                forecast: Vec::new(),
            },
            actual: Actual {
                height_cm: Vec::new(),
                weight_kg: Vec::new(),
                muac_cm: Vec::new(),
            },
            forecast: Vec::new(),
            reference_curves: Vec::new(),
            outlook: Vec::new(),
            risk_flags: Vec::new(),
        }
    }
}
