//! Cohort assessment: one independent request per child over a shared engine.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

#[cfg(feature = "mt")]
use rayon::prelude::*;

use crate::ctx::{Ctx, ProfileRequest};
use crate::engine::GrowthEngine;
use crate::io::cohort::CohortChild;
use crate::pipeline::Pipeline;
use crate::scores::Classification;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub out_dir: PathBuf,
    pub write_json: bool,
    pub write_tsv: bool,
    /// 0 lets rayon pick.
    pub threads: usize,
    pub tool_version: String,
}

#[derive(Debug, Clone)]
pub struct ChildSummary {
    pub outlook: Vec<Classification>,
    pub fired_flags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ChildOutcome {
    pub child_id: String,
    pub result: std::result::Result<ChildSummary, String>,
}

/// Runs every child through the assessment pipeline. Outcomes keep cohort
/// order; a failed child does not affect the others.
pub fn assess_cohort(
    engine: Arc<GrowthEngine>,
    children: &[CohortChild],
    opts: &BatchOptions,
) -> Result<Vec<ChildOutcome>> {
    let dirs = unique_dir_names(children);

    #[cfg(feature = "mt")]
    let outcomes = {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.threads)
            .build()
            .map_err(|e| anyhow::anyhow!("failed to build thread pool: {}", e))?;
        pool.install(|| {
            children
                .par_iter()
                .zip(dirs.par_iter())
                .map(|(child, dir)| assess_child(&engine, child, dir, opts))
                .collect::<Vec<_>>()
        })
    };

    #[cfg(not(feature = "mt"))]
    let outcomes = children
        .iter()
        .zip(dirs.iter())
        .map(|(child, dir)| assess_child(&engine, child, dir, opts))
        .collect::<Vec<_>>();

    Ok(outcomes)
}

fn assess_child(
    engine: &Arc<GrowthEngine>,
    child: &CohortChild,
    dir: &str,
    opts: &BatchOptions,
) -> ChildOutcome {
    let out_dir = opts.out_dir.join(dir);
    let mut ctx = Ctx::new(
        None,
        out_dir,
        Some(Arc::clone(engine)),
        opts.write_json,
        opts.write_tsv,
        &opts.tool_version,
    );
    ctx.raw_rows = Some(child.rows.clone());
    ctx.request = Some(ProfileRequest {
        name: child.name.clone(),
        sex: child.sex,
        age_months: child.age_months,
    });

    let result = Pipeline::assessment()
        .run(&mut ctx)
        .and_then(|_| child_summary(&ctx))
        .map_err(|e| format!("{:#}", e));

    match &result {
        Ok(_) => info!(child = %child.child_id, "child_assessed"),
        Err(err) => warn!(child = %child.child_id, error = %err, "child assessment failed"),
    }

    ChildOutcome {
        child_id: child.child_id.clone(),
        result,
    }
}

fn child_summary(ctx: &Ctx) -> Result<ChildSummary> {
    let trajectory = ctx.trajectory()?;
    Ok(ChildSummary {
        outlook: trajectory.outlook().to_vec(),
        fired_flags: ctx
            .risk_flags
            .iter()
            .filter(|f| f.fired)
            .map(|f| f.name.clone())
            .collect(),
    })
}

fn dir_name(child_id: &str) -> String {
    child_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// One output directory per child, in cohort order. Ids that sanitize to
/// the same name get a `-2`, `-3`, ... suffix.
fn unique_dir_names(children: &[CohortChild]) -> Vec<String> {
    let mut taken = HashSet::new();
    children
        .iter()
        .map(|child| {
            let base = dir_name(&child.child_id);
            let mut name = base.clone();
            let mut n = 2;
            while !taken.insert(name.clone()) {
                name = format!("{}-{}", base, n);
                n += 1;
            }
            if name != base {
                warn!(child = %child.child_id, dir = %name, "output directory renamed to avoid a collision");
            }
            name
        })
        .collect()
}

pub fn format_outcome(outcome: &ChildOutcome) -> String {
    match &outcome.result {
        Ok(summary) => {
            let statuses: Vec<String> = summary
                .outlook
                .iter()
                .map(|c| format!("{}={}", c.indicator, c.category.as_str()))
                .collect();
            let flags = if summary.fired_flags.is_empty() {
                "none".to_string()
            } else {
                summary.fired_flags.join(",")
            };
            format!("{}\tok\t{}\tflags={}", outcome.child_id, statuses.join(" "), flags)
        }
        Err(err) => format!("{}\tfailed\t{}", outcome.child_id, err),
    }
}
