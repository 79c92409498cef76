use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{GrowthError, GrowthResult};
use crate::math::stats::{mean, population_std};
use crate::measure::{FEATURES, FeatureRow};

/// Reversible per-column normalization. `inverse(forward(x)) == x` up to
/// floating point error.
pub trait FeatureScaler: Send + Sync {
    fn name(&self) -> &'static str;
    fn forward(&self, rows: &[FeatureRow]) -> Vec<FeatureRow>;
    fn inverse(&self, rows: &[FeatureRow]) -> Vec<FeatureRow>;
}

/// On-disk scaler description, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScalerConfig {
    Standard {
        mean: [f64; FEATURES],
        scale: [f64; FEATURES],
    },
    Minmax {
        data_min: [f64; FEATURES],
        data_max: [f64; FEATURES],
        #[serde(default = "default_feature_range")]
        feature_range: [f64; 2],
    },
}

fn default_feature_range() -> [f64; 2] {
    [0.0, 1.0]
}

impl ScalerConfig {
    pub fn build(self) -> GrowthResult<Box<dyn FeatureScaler>> {
        match self {
            ScalerConfig::Standard { mean, scale } => Ok(Box::new(StandardScaler::new(mean, scale)?)),
            ScalerConfig::Minmax {
                data_min,
                data_max,
                feature_range,
            } => Ok(Box::new(MinMaxScaler::new(data_min, data_max, feature_range)?)),
        }
    }
}

pub fn load_scaler(path: &Path) -> GrowthResult<Box<dyn FeatureScaler>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        GrowthError::configuration(format!("failed to read scaler {}: {}", path.display(), e))
    })?;
    let config: ScalerConfig = serde_json::from_str(&content).map_err(|e| {
        GrowthError::configuration(format!("invalid scaler {}: {}", path.display(), e))
    })?;
    config.build()
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    pub mean: [f64; FEATURES],
    pub scale: [f64; FEATURES],
}

impl StandardScaler {
    pub fn new(mean: [f64; FEATURES], scale: [f64; FEATURES]) -> GrowthResult<Self> {
        for i in 0..FEATURES {
            if !mean[i].is_finite() || !scale[i].is_finite() || scale[i] == 0.0 {
                return Err(GrowthError::configuration(format!(
                    "standard scaler column {} has invalid mean/scale ({}, {})",
                    i, mean[i], scale[i]
                )));
            }
        }
        Ok(Self { mean, scale })
    }

    pub fn identity() -> Self {
        Self {
            mean: [0.0; FEATURES],
            scale: [1.0; FEATURES],
        }
    }

    /// Population mean and standard deviation per column; a constant column
    /// gets scale 1.
    pub fn fit(rows: &[FeatureRow]) -> GrowthResult<Self> {
        if rows.is_empty() {
            return Err(GrowthError::configuration("cannot fit scaler on zero rows"));
        }
        let mut m = [0.0; FEATURES];
        let mut s = [1.0; FEATURES];
        for col in 0..FEATURES {
            let values: Vec<f64> = rows.iter().map(|r| r[col]).collect();
            m[col] = mean(&values);
            let std = population_std(&values);
            if std > 0.0 {
                s[col] = std;
            }
        }
        Self::new(m, s)
    }
}

impl FeatureScaler for StandardScaler {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn forward(&self, rows: &[FeatureRow]) -> Vec<FeatureRow> {
        rows.iter()
            .map(|r| std::array::from_fn(|i| (r[i] - self.mean[i]) / self.scale[i]))
            .collect()
    }

    fn inverse(&self, rows: &[FeatureRow]) -> Vec<FeatureRow> {
        rows.iter()
            .map(|r| std::array::from_fn(|i| r[i] * self.scale[i] + self.mean[i]))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxScaler {
    scale: [f64; FEATURES],
    min: [f64; FEATURES],
}

impl MinMaxScaler {
    pub fn new(
        data_min: [f64; FEATURES],
        data_max: [f64; FEATURES],
        feature_range: [f64; 2],
    ) -> GrowthResult<Self> {
        let [lo, hi] = feature_range;
        if !(lo.is_finite() && hi.is_finite() && lo < hi) {
            return Err(GrowthError::configuration(format!(
                "minmax scaler feature_range ({}, {}) is invalid",
                lo, hi
            )));
        }
        let mut scale = [0.0; FEATURES];
        let mut min = [0.0; FEATURES];
        for i in 0..FEATURES {
            if !data_min[i].is_finite() || !data_max[i].is_finite() || data_max[i] < data_min[i] {
                return Err(GrowthError::configuration(format!(
                    "minmax scaler column {} has invalid range ({}, {})",
                    i, data_min[i], data_max[i]
                )));
            }
            let mut range = data_max[i] - data_min[i];
            if range == 0.0 {
                range = 1.0;
            }
            scale[i] = (hi - lo) / range;
            min[i] = lo - data_min[i] * scale[i];
        }
        Ok(Self { scale, min })
    }
}

impl FeatureScaler for MinMaxScaler {
    fn name(&self) -> &'static str {
        "minmax"
    }

    fn forward(&self, rows: &[FeatureRow]) -> Vec<FeatureRow> {
        rows.iter()
            .map(|r| std::array::from_fn(|i| r[i] * self.scale[i] + self.min[i]))
            .collect()
    }

    fn inverse(&self, rows: &[FeatureRow]) -> Vec<FeatureRow> {
        rows.iter()
            .map(|r| std::array::from_fn(|i| (r[i] - self.min[i]) / self.scale[i]))
            .collect()
    }
}
