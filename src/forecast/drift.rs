use anyhow::{Result, bail};

use crate::forecast::{FORECAST_HORIZON, Forecaster};
use crate::math::stats::linear_fit;
use crate::measure::{FEATURES, FeatureRow};

/// Extrapolates a per-column least-squares line fitted over the input window.
#[derive(Debug, Clone, Default)]
pub struct DriftForecaster;

impl DriftForecaster {
    pub fn new() -> Self {
        Self
    }
}

impl Forecaster for DriftForecaster {
    fn name(&self) -> &'static str {
        "drift"
    }

    fn predict(&self, input: &[FeatureRow]) -> Result<Vec<FeatureRow>> {
        if input.len() < 2 {
            bail!("drift forecaster needs at least 2 steps, got {}", input.len());
        }
        let n = input.len();
        let mut fits = [(0.0f64, 0.0f64); FEATURES];
        for (col, fit) in fits.iter_mut().enumerate() {
            let column: Vec<f64> = input.iter().map(|r| r[col]).collect();
            *fit = linear_fit(&column);
        }
        Ok((0..FORECAST_HORIZON)
            .map(|step| {
                let x = (n + step) as f64;
                std::array::from_fn(|col| fits[col].0 + fits[col].1 * x)
            })
            .collect())
    }
}
