use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crate::engine::GrowthEngine;
use crate::forecast::NormalizedSequence;
use crate::measure::{ChildProfile, FeatureRow, MeasurementWindow, Sex};
use crate::schema::v1::GrowthQcV1;
use crate::scores::{ForecastPoint, RiskFlag, TrajectoryReport};

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub json_path: PathBuf,
    pub tsv_path: PathBuf,
}

/// Caller-supplied profile fields, validated into a [`ChildProfile`] by stage 1.
#[derive(Debug, Clone)]
pub struct ProfileRequest {
    pub name: String,
    pub sex: Sex,
    pub age_months: u32,
}

/// State of one assessment request. Never shared between requests.
pub struct Ctx {
    pub input: Option<PathBuf>,
    pub raw_rows: Option<Vec<FeatureRow>>,
    pub request: Option<ProfileRequest>,
    pub engine: Option<Arc<GrowthEngine>>,
    pub write_json: bool,
    pub write_tsv: bool,
    pub tool_version: String,
    pub warnings: Vec<String>,
    pub profile: Option<ChildProfile>,
    pub window: Option<MeasurementWindow>,
    pub normalized: Option<NormalizedSequence>,
    pub forecast_points: Vec<ForecastPoint>,
    pub trajectory: Option<TrajectoryReport>,
    pub risk_flags: Vec<RiskFlag>,
    pub output: OutputPaths,
    pub report: Option<GrowthQcV1>,
}

impl Ctx {
    pub fn new(
        input: Option<PathBuf>,
        out_dir: PathBuf,
        engine: Option<Arc<GrowthEngine>>,
        write_json: bool,
        write_tsv: bool,
        tool_version: &str,
    ) -> Self {
        let json_path = out_dir.join("growthqc.json");
        let tsv_path = out_dir.join("growthqc.tsv");
        Self {
            input,
            raw_rows: None,
            request: None,
            engine,
            write_json,
            write_tsv,
            tool_version: tool_version.to_string(),
            warnings: Vec::new(),
            profile: None,
            window: None,
            normalized: None,
            forecast_points: Vec::new(),
            trajectory: None,
            risk_flags: Vec::new(),
            output: OutputPaths {
                out_dir,
                json_path,
                tsv_path,
            },
            report: None,
        }
    }

    pub fn engine(&self) -> anyhow::Result<&GrowthEngine> {
        self.engine.as_deref().context("growth engine not loaded")
    }

    pub fn profile(&self) -> anyhow::Result<&ChildProfile> {
        self.profile.as_ref().context("child profile missing")
    }

    pub fn window(&self) -> anyhow::Result<&MeasurementWindow> {
        self.window.as_ref().context("measurement window missing")
    }

    pub fn trajectory(&self) -> anyhow::Result<&TrajectoryReport> {
        self.trajectory.as_ref().context("trajectory report missing")
    }
}
