use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::ctx::Ctx;
use crate::reference::Indicator;

pub fn write_tsv(path: &Path, ctx: &Ctx) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    let trajectory = ctx.trajectory()?;

    writeln!(
        w,
        "month\tage_months\theight_cm\theight_z\theight_status\theight_median\tweight_kg\tweight_z\tweight_status\tweight_median\tmuac_cm\tmuac_z\tmuac_status\tmuac_median"
    )?;
    for p in &trajectory.points {
        write!(w, "{}\t{}", p.point.month_index, p.point.age_months)?;
        for indicator in Indicator::ALL {
            let Some(c) = p.classification(indicator) else {
                bail!(
                    "month {} lacks a {} classification",
                    p.point.month_index,
                    indicator
                );
            };
            write!(
                w,
                "\t{:.6}\t{:.6}\t{}\t{:.6}",
                p.point.value(indicator),
                c.z_score,
                c.category.as_str(),
                c.reference_median
            )?;
        }
        writeln!(w)?;
    }

    w.flush()?;
    Ok(())
}
