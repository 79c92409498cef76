//! Long-lived collaborators shared by every assessment request.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::{GrowthError, GrowthResult};
use crate::forecast::drift::DriftForecaster;
use crate::forecast::lstm::LstmForecaster;
use crate::forecast::scaler::{StandardScaler, load_scaler};
use crate::forecast::{self, FeatureScaler, Forecaster, NormalizedSequence};
use crate::measure::{ChildProfile, MeasurementWindow};
use crate::reference::{self, ReferenceTable};
use crate::scores::trajectory::summarize;
use crate::scores::{ForecastPoint, TrajectoryReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ForecasterKind {
    Drift,
    Lstm,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub forecaster: ForecasterKind,
    pub model_path: Option<PathBuf>,
    pub scaler_path: Option<PathBuf>,
    pub reference_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            forecaster: ForecasterKind::Drift,
            model_path: None,
            scaler_path: None,
            reference_path: None,
        }
    }
}

pub struct GrowthEngine {
    forecaster: Box<dyn Forecaster>,
    scaler: Box<dyn FeatureScaler>,
    reference: ReferenceTable,
}

impl GrowthEngine {
    pub fn new(
        forecaster: Box<dyn Forecaster>,
        scaler: Box<dyn FeatureScaler>,
        reference: ReferenceTable,
    ) -> Self {
        Self {
            forecaster,
            scaler,
            reference,
        }
    }

    /// Loads every collaborator named by `cfg`. Failure here is fatal for the
    /// process; no request should be attempted afterwards.
    pub fn load(cfg: &EngineConfig) -> GrowthResult<Self> {
        let reference = load_reference_table(cfg.reference_path.as_ref())?;

        let scaler: Box<dyn FeatureScaler> = match (&cfg.scaler_path, cfg.forecaster) {
            (Some(path), _) => load_scaler(path)?,
            (None, ForecasterKind::Lstm) => {
                return Err(GrowthError::configuration(
                    "the lstm forecaster requires --scaler fitted with its training data",
                ));
            }
            (None, ForecasterKind::Drift) => {
                warn!("no scaler supplied; using identity scaler");
                Box::new(StandardScaler::identity())
            }
        };

        let forecaster: Box<dyn Forecaster> = match cfg.forecaster {
            ForecasterKind::Drift => Box::new(DriftForecaster::new()),
            ForecasterKind::Lstm => {
                let path = cfg.model_path.as_ref().ok_or_else(|| {
                    GrowthError::configuration("the lstm forecaster requires --model")
                })?;
                let model = LstmForecaster::load(path)?;
                info!(
                    model = %path.display(),
                    units = ?model.layer_units(),
                    "lstm weights loaded"
                );
                Box::new(model)
            }
        };

        info!(
            forecaster = forecaster.name(),
            scaler = scaler.name(),
            reference = %reference.source,
            "growth engine ready"
        );
        Ok(Self::new(forecaster, scaler, reference))
    }

    pub fn forecaster_name(&self) -> &'static str {
        self.forecaster.name()
    }

    pub fn reference(&self) -> &ReferenceTable {
        &self.reference
    }

    pub fn normalize(&self, window: &MeasurementWindow) -> GrowthResult<NormalizedSequence> {
        forecast::normalize(window, self.scaler.as_ref())
    }

    pub fn forecast(
        &self,
        window: &MeasurementWindow,
        profile: &ChildProfile,
    ) -> GrowthResult<Vec<ForecastPoint>> {
        forecast::forecast(
            self.forecaster.as_ref(),
            self.scaler.as_ref(),
            window,
            profile.current_age_months,
        )
    }

    pub fn forecast_normalized(
        &self,
        normalized: &NormalizedSequence,
        profile: &ChildProfile,
    ) -> GrowthResult<Vec<ForecastPoint>> {
        forecast::forecast_normalized(
            self.forecaster.as_ref(),
            self.scaler.as_ref(),
            normalized,
            profile.current_age_months,
        )
    }

    pub fn summarize(
        &self,
        window: &MeasurementWindow,
        profile: &ChildProfile,
        points: &[ForecastPoint],
    ) -> GrowthResult<TrajectoryReport> {
        summarize(&self.reference, window, profile, points)
    }

    pub fn assess(
        &self,
        window: &MeasurementWindow,
        profile: &ChildProfile,
    ) -> GrowthResult<TrajectoryReport> {
        let points = self.forecast(window, profile)?;
        self.summarize(window, profile, &points)
    }
}

pub fn load_reference_table(path: Option<&PathBuf>) -> GrowthResult<ReferenceTable> {
    match path {
        Some(p) => reference::load_reference(p),
        None => reference::load_builtin_v1(),
    }
}
