use anyhow::Result;
use std::time::Instant;
use tracing::{info, warn};

use crate::ctx::Ctx;

pub mod stage0_scaffold;
pub mod stage1_input;
pub mod stage2_normalize;
pub mod stage3_forecast;
pub mod stage4_trajectory;
pub mod stage5_risk;
pub mod stage6_output;

use stage0_scaffold::Stage0Scaffold;
use stage1_input::Stage1Input;
use stage2_normalize::Stage2Normalize;
use stage3_forecast::Stage3Forecast;
use stage4_trajectory::Stage4Trajectory;
use stage5_risk::Stage5Risk;
use stage6_output::Stage6Output;

pub trait Stage {
    fn name(&self) -> &'static str;
    fn run(&self, ctx: &mut Ctx) -> Result<()>;
}

pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Full assessment: input through written report.
    pub fn assessment() -> Self {
        Self::new(vec![
            Box::new(Stage0Scaffold::new()),
            Box::new(Stage1Input::new()),
            Box::new(Stage2Normalize::new()),
            Box::new(Stage3Forecast::new()),
            Box::new(Stage4Trajectory::new()),
            Box::new(Stage5Risk::new()),
            Box::new(Stage6Output::new()),
        ])
    }

    pub fn run(&self, ctx: &mut Ctx) -> Result<()> {
        for stage in &self.stages {
            let start = Instant::now();
            info!(stage = stage.name(), "stage started");
            if let Err(err) = stage.run(ctx) {
                let elapsed_ms = start.elapsed().as_millis();
                warn!(
                    stage = stage.name(),
                    elapsed_ms = elapsed_ms as u64,
                    error = %err,
                    "stage failed"
                );
                return Err(err);
            }
            let elapsed_ms = start.elapsed().as_millis();
            info!(
                stage = stage.name(),
                elapsed_ms = elapsed_ms as u64,
                "stage finished"
            );
        }
        Ok(())
    }
}
