use crate::error::GrowthResult;
use crate::forecast::FORECAST_HORIZON;
use crate::measure::{ChildProfile, MeasurementWindow, WINDOW_LEN};
use crate::reference::{Indicator, ReferenceTable};
use crate::scores::zscore::classify;
use crate::scores::{ActualSeries, ClassifiedPoint, ForecastPoint, ReferenceCurve, TrajectoryReport};

/// Ages of the historical window; the last entry equals `current_age_months`.
pub fn historical_ages(current_age_months: u32) -> Vec<u32> {
    let start = current_age_months.saturating_sub(WINDOW_LEN as u32 - 1);
    (0..WINDOW_LEN as u32).map(|i| start + i).collect()
}

pub fn forecast_ages(current_age_months: u32) -> Vec<u32> {
    (0..FORECAST_HORIZON as u32)
        .map(|i| current_age_months.saturating_add(i + 1))
        .collect()
}

/// Classifies every forecast month and lines up the actual, forecast and
/// reference series on one age axis. Pure: equal inputs give equal reports.
pub fn summarize(
    table: &ReferenceTable,
    window: &MeasurementWindow,
    profile: &ChildProfile,
    forecast_points: &[ForecastPoint],
) -> GrowthResult<TrajectoryReport> {
    let historical = historical_ages(profile.current_age_months);
    let forecast = forecast_ages(profile.current_age_months);

    let mut points = Vec::with_capacity(forecast_points.len());
    for point in forecast_points {
        let mut classifications = Vec::with_capacity(Indicator::ALL.len());
        for indicator in Indicator::ALL {
            classifications.push(classify(
                table,
                point.value(indicator),
                point.age_months,
                profile.sex,
                indicator,
            )?);
        }
        points.push(ClassifiedPoint {
            point: *point,
            classifications,
        });
    }

    let combined: Vec<u32> = historical.iter().chain(forecast.iter()).copied().collect();
    let mut reference_curves = Vec::with_capacity(Indicator::ALL.len());
    for indicator in Indicator::ALL {
        let mut median = Vec::with_capacity(combined.len());
        let mut minus_2sd = Vec::with_capacity(combined.len());
        for &age in &combined {
            let entry = table.lookup(profile.sex, indicator, age)?;
            median.push(entry.median);
            minus_2sd.push(entry.minus_2sd);
        }
        reference_curves.push(ReferenceCurve {
            indicator,
            ages: combined.clone(),
            median,
            minus_2sd,
        });
    }

    Ok(TrajectoryReport {
        profile: profile.clone(),
        historical_ages: historical,
        forecast_ages: forecast,
        actual: ActualSeries {
            height_cm: window.heights(),
            weight_kg: window.weights(),
            muac_cm: window.muacs(),
        },
        points,
        reference_curves,
    })
}
