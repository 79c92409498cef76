use crate::error::{GrowthError, GrowthResult};
use crate::forecast::scaler::FeatureScaler;
use crate::measure::{FEATURES, FeatureRow, MeasurementWindow, WINDOW_LEN};

/// Scaled 12x3 model input.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedSequence {
    rows: Vec<FeatureRow>,
}

impl NormalizedSequence {
    pub fn rows(&self) -> &[FeatureRow] {
        &self.rows
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), FEATURES)
    }
}

pub fn normalize(window: &MeasurementWindow, scaler: &dyn FeatureScaler) -> GrowthResult<NormalizedSequence> {
    let raw = window.rows();
    if raw.len() != WINDOW_LEN {
        return Err(GrowthError::validation(format!(
            "measurement window must have exactly {} records (got {})",
            WINDOW_LEN,
            raw.len()
        )));
    }
    let rows = scaler.forward(&raw);
    if rows.len() != WINDOW_LEN || rows.iter().flatten().any(|v| !v.is_finite()) {
        return Err(GrowthError::configuration(format!(
            "{} scaler produced an invalid normalized window",
            scaler.name()
        )));
    }
    Ok(NormalizedSequence { rows })
}
