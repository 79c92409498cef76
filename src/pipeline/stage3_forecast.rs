use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::measure::{MAX_HEIGHT_CM, MAX_MUAC_CM, MAX_WEIGHT_KG};
use crate::pipeline::Stage;
use crate::scores::ForecastPoint;

pub struct Stage3Forecast;

impl Stage3Forecast {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Forecast {
    fn name(&self) -> &'static str {
        "stage3_forecast"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let engine = ctx.engine()?;
        let normalized = ctx.normalized.as_ref().context("normalized window missing")?;
        let points = engine.forecast_normalized(normalized, ctx.profile()?)?;
        info!(
            forecaster = engine.forecaster_name(),
            months = points.len(),
            "forecast_ready"
        );
        let warnings = implausible_values(&points);
        for w in &warnings {
            warn!(warning = %w, "implausible forecast value");
        }
        ctx.warnings.extend(warnings);
        ctx.forecast_points = points;
        Ok(())
    }
}

/// Forecasts are not clamped; values outside the input bounds are reported.
fn implausible_values(points: &[ForecastPoint]) -> Vec<String> {
    let mut out = Vec::new();
    for p in points {
        for (name, value, max) in [
            ("height_cm", p.height_cm, MAX_HEIGHT_CM),
            ("weight_kg", p.weight_kg, MAX_WEIGHT_KG),
            ("muac_cm", p.muac_cm, MAX_MUAC_CM),
        ] {
            if !(0.0..=max).contains(&value) {
                out.push(format!(
                    "forecast month {}: {} = {:.2} outside [0, {}]",
                    p.month_index, name, value, max
                ));
            }
        }
    }
    out
}
