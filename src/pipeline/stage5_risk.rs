use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::scores::risk::compute_risk_flags;

pub struct Stage5Risk;

impl Stage5Risk {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Risk {
    fn name(&self) -> &'static str {
        "stage5_risk"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let flags = compute_risk_flags(ctx.trajectory()?);
        let fired = flags.iter().filter(|f| f.fired).count();
        ctx.risk_flags = flags;
        info!(fired, "risk_flags_ready");
        Ok(())
    }
}
