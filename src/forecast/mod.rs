//! Forecast pipeline: normalize, infer, de-normalize, attach ages.
//!
//! The forecaster and the scaler are opaque collaborators. The same scaler
//! instance must drive both directions; pairing a model with a scaler fitted
//! on other data corrupts every output silently.

pub mod drift;
pub mod lstm;
pub mod preprocess;
pub mod scaler;

use tracing::debug;

use crate::error::{GrowthError, GrowthResult};
use crate::measure::{FEATURES, FeatureRow, MeasurementWindow};
use crate::scores::ForecastPoint;

pub use preprocess::{NormalizedSequence, normalize};
pub use scaler::FeatureScaler;

pub const FORECAST_HORIZON: usize = 6;

/// Any sequence model mapping a 12x3 normalized window to a 6x3 forecast.
pub trait Forecaster: Send + Sync {
    fn name(&self) -> &'static str;
    fn predict(&self, input: &[FeatureRow]) -> anyhow::Result<Vec<FeatureRow>>;
}

pub fn forecast(
    forecaster: &dyn Forecaster,
    scaler: &dyn FeatureScaler,
    window: &MeasurementWindow,
    current_age_months: u32,
) -> GrowthResult<Vec<ForecastPoint>> {
    let normalized = normalize(window, scaler)?;
    forecast_normalized(forecaster, scaler, &normalized, current_age_months)
}

/// Either all [`FORECAST_HORIZON`] points come back or an error does.
pub fn forecast_normalized(
    forecaster: &dyn Forecaster,
    scaler: &dyn FeatureScaler,
    normalized: &NormalizedSequence,
    current_age_months: u32,
) -> GrowthResult<Vec<ForecastPoint>> {
    let ages = forecast_ages(current_age_months)?;
    let raw = forecaster.predict(normalized.rows()).map_err(|e| {
        GrowthError::inference(format!("{} forecaster failed: {:#}", forecaster.name(), e))
    })?;
    if raw.len() != FORECAST_HORIZON {
        return Err(GrowthError::inference(format!(
            "{} forecaster returned {}x{} output, expected {}x{}",
            forecaster.name(),
            raw.len(),
            FEATURES,
            FORECAST_HORIZON,
            FEATURES
        )));
    }
    if raw.iter().flatten().any(|v| !v.is_finite()) {
        return Err(GrowthError::inference(format!(
            "{} forecaster returned non-finite values",
            forecaster.name()
        )));
    }

    let denorm = scaler.inverse(&raw);
    debug!(
        forecaster = forecaster.name(),
        scaler = scaler.name(),
        "forecast de-normalized"
    );

    Ok(denorm
        .iter()
        .zip(ages)
        .enumerate()
        .map(|(i, (row, age_months))| ForecastPoint {
            month_index: i as u32 + 1,
            age_months,
            height_cm: row[0],
            weight_kg: row[1],
            muac_cm: row[2],
        })
        .collect())
}

fn forecast_ages(current_age_months: u32) -> GrowthResult<Vec<u32>> {
    (1..=FORECAST_HORIZON as u32)
        .map(|step| {
            current_age_months.checked_add(step).ok_or_else(|| {
                GrowthError::validation(format!(
                    "current_age_months {} leaves no room for a {}-month forecast",
                    current_age_months, FORECAST_HORIZON
                ))
            })
        })
        .collect()
}
