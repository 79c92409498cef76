use anyhow::Result;

use crate::ctx::Ctx;
use crate::schema::v1::{
    Actual, Axes, ChildMeta, Classification, ForecastRow, GrowthQcV1, ReferenceCurve, RiskFlag,
};
use crate::scores;

pub fn build_report(ctx: &Ctx) -> Result<GrowthQcV1> {
    let trajectory = ctx.trajectory()?;
    let engine = ctx.engine()?;

    let profile = &trajectory.profile;
    let mut report = GrowthQcV1::empty(
        &ctx.tool_version,
        ChildMeta {
            name: profile.name.clone(),
            sex: profile.sex,
            current_age_months: profile.current_age_months,
        },
    );

    report.forecaster = engine.forecaster_name().to_string();
    report.reference = engine.reference().source.clone();
    report.axes = Axes {
        historical: trajectory.historical_ages.clone(),
        forecast: trajectory.forecast_ages.clone(),
    };
    report.actual = Actual {
        height_cm: trajectory.actual.height_cm.clone(),
        weight_kg: trajectory.actual.weight_kg.clone(),
        muac_cm: trajectory.actual.muac_cm.clone(),
    };
    report.forecast = trajectory
        .points
        .iter()
        .map(|p| ForecastRow {
            month_index: p.point.month_index,
            age_months: p.point.age_months,
            height_cm: p.point.height_cm,
            weight_kg: p.point.weight_kg,
            muac_cm: p.point.muac_cm,
            classifications: p.classifications.iter().map(to_schema).collect(),
        })
        .collect();
    report.reference_curves = trajectory
        .reference_curves
        .iter()
        .map(|c| ReferenceCurve {
            indicator: c.indicator,
            ages: c.ages.clone(),
            median: c.median.clone(),
            minus_2sd: c.minus_2sd.clone(),
        })
        .collect();
    report.outlook = trajectory.outlook().iter().map(to_schema).collect();
    report.risk_flags = ctx
        .risk_flags
        .iter()
        .map(|f| RiskFlag {
            name: f.name.clone(),
            indicator: f.indicator,
            fired: f.fired,
            threshold: Some(f.threshold.clone()),
            details: f.details.clone(),
        })
        .collect();

    Ok(report)
}

fn to_schema(c: &scores::Classification) -> Classification {
    Classification {
        indicator: c.indicator,
        z_score: c.z_score,
        category: c.category,
        reference_median: c.reference_median,
    }
}
