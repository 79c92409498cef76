use anyhow::Result;

use crate::ctx::Ctx;

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let trajectory = ctx.trajectory()?;
    let profile = &trajectory.profile;

    let mut out = String::new();
    out.push_str(&format!("kira-growthqc v{}\n", version));
    out.push_str(&format!(
        "Child: {}, sex={}, age={} months\n",
        profile.name, profile.sex, profile.current_age_months
    ));
    if let (Some(first), Some(last)) = (
        trajectory.forecast_ages.first(),
        trajectory.forecast_ages.last(),
    ) {
        out.push_str(&format!("Forecast: ages {}..{} months\n", first, last));
    }

    if let Some(last) = trajectory.points.last() {
        for c in &last.classifications {
            out.push_str(&format!(
                "Month {} {}: {:.2} {} (z={:+.2}, {}, median {:.1})\n",
                last.point.month_index,
                c.indicator,
                last.point.value(c.indicator),
                c.indicator.unit(),
                c.z_score,
                c.category.as_str(),
                c.reference_median
            ));
        }
    }

    let fired: Vec<String> = ctx
        .risk_flags
        .iter()
        .filter(|f| f.fired)
        .map(|f| f.name.clone())
        .collect();
    if fired.is_empty() {
        out.push_str("Flags: none\n");
    } else {
        out.push_str(&format!("Flags: {}\n", fired.join(", ")));
    }

    Ok(out)
}
