use anyhow::{Context, Result, bail};
use tracing::info;

use crate::ctx::Ctx;
use crate::io::window_tsv::read_window_rows;
use crate::measure::{ChildProfile, MeasurementWindow};
use crate::pipeline::Stage;

pub struct Stage1Input;

impl Stage1Input {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Input {
    fn name(&self) -> &'static str {
        "stage1_input"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        if ctx.window.is_none() {
            let rows = match (&ctx.raw_rows, &ctx.input) {
                (Some(rows), _) => rows.clone(),
                (None, Some(path)) => read_window_rows(path)
                    .with_context(|| format!("failed to load window {}", path.display()))?,
                (None, None) => bail!("no measurement window supplied"),
            };
            let window = MeasurementWindow::from_rows(&rows)?;
            for (idx, m) in window.records().iter().enumerate() {
                if m.height_cm == 0.0 && m.weight_kg == 0.0 && m.muac_cm == 0.0 {
                    ctx.warnings
                        .push(format!("record {} is all zeros (unfilled month?)", idx + 1));
                }
            }
            ctx.window = Some(window);
        }

        if ctx.profile.is_none() {
            if let Some(req) = &ctx.request {
                ctx.profile = Some(ChildProfile::new(req.name.clone(), req.sex, req.age_months)?);
            }
        }

        if let Some(profile) = &ctx.profile {
            info!(
                child = %profile.name,
                sex = %profile.sex,
                age_months = profile.current_age_months,
                "window_ready"
            );
        } else {
            info!("window_ready");
        }
        Ok(())
    }
}
