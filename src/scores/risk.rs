use crate::reference::Indicator;
use crate::scores::{RiskFlag, TrajectoryReport};

const MODERATE_THRESHOLD: f64 = -2.0;

pub fn compute_risk_flags(report: &TrajectoryReport) -> Vec<RiskFlag> {
    vec![
        flag_for(report, "stunting", Indicator::Height),
        flag_for(report, "underweight", Indicator::Weight),
        flag_for(report, "wasting", Indicator::Muac),
    ]
}

fn flag_for(report: &TrajectoryReport, name: &str, indicator: Indicator) -> RiskFlag {
    let mut first_hit: Option<(u32, u32)> = None;
    let mut min_z = f64::INFINITY;
    for p in &report.points {
        let Some(c) = p.classification(indicator) else {
            continue;
        };
        if c.z_score < min_z {
            min_z = c.z_score;
        }
        if c.z_score < MODERATE_THRESHOLD && first_hit.is_none() {
            first_hit = Some((p.point.month_index, p.point.age_months));
        }
    }

    let details = match first_hit {
        Some((month, age)) => Some(format!(
            "first_month={}, age_months={}, min_z={:.4}",
            month, age, min_z
        )),
        None if min_z.is_finite() => Some(format!("min_z={:.4}", min_z)),
        None => None,
    };

    RiskFlag {
        name: name.to_string(),
        indicator,
        fired: first_hit.is_some(),
        threshold: format!("{}_z < {}", indicator.as_str(), MODERATE_THRESHOLD),
        details,
    }
}
