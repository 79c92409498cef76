use anyhow::Result;
use tracing::{info, warn};

use crate::ctx::Ctx;
use crate::io::{json_writer, tsv_writer};
use crate::pipeline::Stage;

pub struct Stage6Output;

impl Stage6Output {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage6Output {
    fn name(&self) -> &'static str {
        "stage6_output"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let report = json_writer::build_report(ctx)?;

        if ctx.write_json {
            crate::io::write_json(&ctx.output.json_path, &report)?;
        }
        if ctx.write_tsv {
            if let Err(err) = tsv_writer::write_tsv(&ctx.output.tsv_path, ctx) {
                // Outputs are all-or-nothing; drop the JSON written above.
                if ctx.write_json {
                    if let Err(rm) = std::fs::remove_file(&ctx.output.json_path) {
                        warn!(path = %ctx.output.json_path.display(), error = %rm, "failed to remove partial output");
                    }
                }
                return Err(err);
            }
        }
        ctx.report = Some(report);

        info!("stage6_output_ready");
        Ok(())
    }
}
