use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;

pub struct Stage2Normalize;

impl Stage2Normalize {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2Normalize {
    fn name(&self) -> &'static str {
        "stage2_normalize"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let normalized = ctx.engine()?.normalize(ctx.window()?)?;
        let (steps, features) = normalized.shape();
        ctx.normalized = Some(normalized);
        info!(steps, features, "window_normalized");
        Ok(())
    }
}
