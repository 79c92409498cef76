use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::engine::{EngineConfig, ForecasterKind};
use crate::measure::Sex;
use crate::reference::Indicator;

#[derive(Debug, Parser)]
#[command(
    name = "kira-growthqc",
    version,
    about = "Child growth forecasting and WHO z-score risk classification"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    Assess(AssessArgs),
    Batch(BatchArgs),
    Validate(ValidateArgs),
    Reference(ReferenceArgs),
}

#[derive(Debug, Clone, Args)]
pub struct EngineArgs {
    #[arg(long, value_enum, default_value_t = ForecasterArg::Drift)]
    pub forecaster: ForecasterArg,

    #[arg(long, help = "LSTM weights JSON (required for --forecaster lstm)")]
    pub model: Option<PathBuf>,

    #[arg(long, help = "Feature scaler JSON fitted with the model's training data")]
    pub scaler: Option<PathBuf>,

    #[arg(long, help = "Reference table (.tsv or keyed .json); built-in WHO table if omitted")]
    pub reference: Option<PathBuf>,
}

impl EngineArgs {
    pub fn to_config(&self) -> EngineConfig {
        EngineConfig {
            forecaster: match self.forecaster {
                ForecasterArg::Drift => ForecasterKind::Drift,
                ForecasterArg::Lstm => ForecasterKind::Lstm,
            },
            model_path: self.model.clone(),
            scaler_path: self.scaler.clone(),
            reference_path: self.reference.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct AssessArgs {
    #[arg(long, help = "Measurement window TSV (12 rows, optionally .gz)")]
    pub input: PathBuf,

    #[arg(long, default_value = "child")]
    pub name: String,

    #[arg(long, value_enum)]
    pub sex: SexArg,

    #[arg(long, help = "Age in months at the last measurement (>= 12)")]
    pub age_months: u32,

    #[arg(long, default_value = ".")]
    pub out: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub tsv: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Debug, Args)]
pub struct BatchArgs {
    #[arg(long, help = "Long-format cohort TSV (optionally .gz)")]
    pub cohort: PathBuf,

    #[arg(long)]
    pub out: PathBuf,

    #[arg(long, default_value_t = false)]
    pub json: bool,

    #[arg(long, default_value_t = false)]
    pub tsv: bool,

    #[arg(long, default_value_t = 0, help = "Number of threads (0 = auto)")]
    pub threads: usize,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[arg(long, help = "Measurement window TSV (12 rows, optionally .gz)")]
    pub input: PathBuf,

    #[arg(long, help = "Also validate the profile age")]
    pub age_months: Option<u32>,
}

#[derive(Debug, Args)]
pub struct ReferenceArgs {
    #[command(subcommand)]
    pub command: ReferenceCommand,
}

#[derive(Debug, Subcommand)]
pub enum ReferenceCommand {
    Show(ReferenceShowArgs),
}

#[derive(Debug, Args)]
pub struct ReferenceShowArgs {
    #[arg(long, help = "Optional reference table to show instead of the built-in one")]
    pub reference: Option<PathBuf>,

    #[arg(long, value_enum)]
    pub sex: Option<SexArg>,

    #[arg(long, value_enum)]
    pub indicator: Option<IndicatorArg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ForecasterArg {
    Drift,
    Lstm,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SexArg {
    Male,
    Female,
}

impl From<SexArg> for Sex {
    fn from(arg: SexArg) -> Self {
        match arg {
            SexArg::Male => Sex::Male,
            SexArg::Female => Sex::Female,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IndicatorArg {
    Height,
    Weight,
    Muac,
}

impl From<IndicatorArg> for Indicator {
    fn from(arg: IndicatorArg) -> Self {
        match arg {
            IndicatorArg::Height => Indicator::Height,
            IndicatorArg::Weight => Indicator::Weight,
            IndicatorArg::Muac => Indicator::Muac,
        }
    }
}
