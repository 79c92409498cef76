use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use kira_growthqc::batch::{self, BatchOptions};
use kira_growthqc::cli::{AssessArgs, BatchArgs, Cli, Commands, ReferenceCommand, ReferenceShowArgs, ValidateArgs};
use kira_growthqc::ctx::{Ctx, ProfileRequest};
use kira_growthqc::engine::{self, GrowthEngine};
use kira_growthqc::io;
use kira_growthqc::measure::{ChildProfile, Sex};
use kira_growthqc::pipeline::Pipeline;
use kira_growthqc::reference::Indicator;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Assess(args) => run_assess(args)?,
        Commands::Batch(args) => run_batch(args)?,
        Commands::Validate(args) => run_validate(args)?,
        Commands::Reference(args) => match args.command {
            ReferenceCommand::Show(show) => handle_reference_show(show)?,
        },
    }

    Ok(())
}

fn load_engine(args: &kira_growthqc::cli::EngineArgs) -> Result<Arc<GrowthEngine>> {
    let engine = GrowthEngine::load(&args.to_config()).context("failed to initialise growth engine")?;
    Ok(Arc::new(engine))
}

fn run_assess(args: AssessArgs) -> Result<()> {
    let engine = load_engine(&args.engine)?;
    let mut ctx = Ctx::new(
        Some(args.input),
        args.out,
        Some(engine),
        args.json,
        args.tsv,
        env!("CARGO_PKG_VERSION"),
    );
    ctx.request = Some(ProfileRequest {
        name: args.name,
        sex: args.sex.into(),
        age_months: args.age_months,
    });

    Pipeline::assessment().run(&mut ctx)?;
    print_summary(&ctx)
}

fn run_batch(args: BatchArgs) -> Result<()> {
    let engine = load_engine(&args.engine)?;
    let cohort = io::cohort::read_cohort(&args.cohort)
        .with_context(|| format!("failed to read cohort {}", args.cohort.display()))?;
    for skipped in &cohort.skipped {
        warn!(reason = %skipped, "child skipped");
    }

    let opts = BatchOptions {
        out_dir: args.out,
        write_json: args.json,
        write_tsv: args.tsv,
        threads: args.threads,
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
    };
    let outcomes = batch::assess_cohort(engine, &cohort.children, &opts)?;

    println!(
        "kira-growthqc batch: {} children assessed, {} skipped",
        outcomes.len(),
        cohort.skipped.len()
    );
    for outcome in &outcomes {
        println!("{}", batch::format_outcome(outcome));
    }

    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
    if failed > 0 {
        anyhow::bail!("{} of {} children failed", failed, outcomes.len());
    }
    Ok(())
}

fn run_validate(args: ValidateArgs) -> Result<()> {
    let window = io::window_tsv::read_window(&args.input)
        .with_context(|| format!("invalid window {}", args.input.display()))?;
    if let Some(age) = args.age_months {
        // Sex does not take part in profile validation.
        ChildProfile::new("validate", Sex::Male, age)?;
    }

    println!("kira-growthqc validate ok");
    println!("records: {}", window.records().len());
    for (name, values) in [
        ("height_cm", window.heights()),
        ("weight_kg", window.weights()),
        ("muac_cm", window.muacs()),
    ] {
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        println!("{}: {:.1}..{:.1}", name, min, max);
    }
    Ok(())
}

fn handle_reference_show(args: ReferenceShowArgs) -> Result<()> {
    let table = engine::load_reference_table(args.reference.as_ref())?;
    let sexes: Vec<Sex> = match args.sex {
        Some(s) => vec![s.into()],
        None => vec![Sex::Male, Sex::Female],
    };
    let indicators: Vec<Indicator> = match args.indicator {
        Some(i) => vec![i.into()],
        None => Indicator::ALL.to_vec(),
    };

    println!("reference (version {}, source {}):", table.version, table.source);
    println!("sex\tindicator\tage_months\tmedian\tminus_2sd");
    for sex in &sexes {
        for indicator in &indicators {
            for (age, e) in table.series(*sex, *indicator)?.iter().enumerate() {
                println!(
                    "{}\t{}\t{}\t{:.1}\t{:.1}",
                    sex, indicator, age, e.median, e.minus_2sd
                );
            }
        }
    }
    Ok(())
}

fn print_summary(ctx: &Ctx) -> Result<()> {
    let summary = io::summary::format_summary(ctx)?;
    print!("{}", summary);
    if !ctx.warnings.is_empty() {
        println!("warnings:");
        for warning in &ctx.warnings {
            println!("- {}", warning);
        }
    }
    Ok(())
}
