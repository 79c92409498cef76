use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage4Trajectory;

impl Stage4Trajectory {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Trajectory {
    fn name(&self) -> &'static str {
        "stage4_trajectory"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let report = ctx
            .engine()?
            .summarize(ctx.window()?, ctx.profile()?, &ctx.forecast_points)?;
        ctx.trajectory = Some(report);
        info!("trajectory_ready");
        Ok(())
    }
}
