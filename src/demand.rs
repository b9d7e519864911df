//! Blood demand time-series generation.
//!
//! Produces per-(date, component, blood type) detail rows plus a daily
//! aggregate per (date, component). Demand follows a base level per component
//! modulated by weekly, seasonal, holiday, and festival patterns, with rare
//! emergency spikes.

use chrono::{Datelike, Duration, NaiveDate};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Normal, Uniform};

use crate::constants::{BASE_DAILY_DEMAND, BLOOD_TYPE_DISTRIBUTION};

/// One (date, component, blood type) demand observation.
#[derive(Debug, Clone)]
pub struct DemandRecord {
    pub date: NaiveDate,
    pub component: &'static str,
    pub blood_type: &'static str,
    pub demand_units: i64,
    pub day_of_week: u32,
    pub month: u32,
    pub is_weekend: bool,
    pub is_holiday_season: bool,
}

/// Daily demand aggregated over blood types for one (date, component).
#[derive(Debug, Clone)]
pub struct DailyDemandRecord {
    pub date: NaiveDate,
    pub component: &'static str,
    pub demand_units: i64,
    pub day_of_week: u32,
    pub month: u32,
    pub is_weekend: bool,
    pub is_holiday_season: bool,
}

/// Chance of an emergency spike on any given day/component.
const EMERGENCY_SPIKE_PROB: f64 = 0.02;

/// Generate the demand time-series starting at `start_date` for `periods` days.
///
/// Returns the detail table and its daily aggregate. The daily total is the
/// sum of the per-type splits, so the two tables are exactly consistent.
pub fn generate_demand_timeseries(
    start_date: NaiveDate,
    periods: u32,
    rng: &mut StdRng,
) -> crate::Result<(Vec<DemandRecord>, Vec<DailyDemandRecord>)> {
    if periods == 0 {
        anyhow::bail!("periods must be at least 1");
    }

    let spike_dist = Uniform::new(1.5, 2.5);
    let split_noise = Normal::new(0.0, 1.0)?;

    let mut detail = Vec::with_capacity(periods as usize * BASE_DAILY_DEMAND.len() * 8);
    let mut daily = Vec::with_capacity(periods as usize * BASE_DAILY_DEMAND.len());

    for offset in 0..periods {
        let date = start_date + Duration::days(i64::from(offset));
        let day_of_week = date.weekday().num_days_from_monday();
        let month = date.month();
        let day = date.day();
        let is_weekend = day_of_week >= 5;
        let is_holiday_season = month == 11 || month == 12;

        for &(component, base) in BASE_DAILY_DEMAND.iter() {
            let noise = Normal::new(0.0, base * 0.15)?;
            let mut demand = base + noise.sample(rng);

            // Elective procedures drop on weekends.
            if is_weekend {
                demand *= 0.7;
            }
            // Summer travel season.
            if (6..=8).contains(&month) {
                demand *= 1.1;
            }
            // Winter: accidents and flu season.
            if month == 12 || month <= 2 {
                demand *= 1.15;
            }
            // Year-end holidays.
            if (month == 12 && day >= 20) || (month == 1 && day <= 5) {
                demand *= 1.25;
            }
            // Festival window (Diwali season).
            if (month == 10 || month == 11) && (15..=30).contains(&day) {
                demand *= 1.2;
            }
            // Rare emergency spikes (mass casualty events).
            if rng.gen::<f64>() < EMERGENCY_SPIKE_PROB {
                demand *= spike_dist.sample(rng);
            }

            let total_units = (demand.trunc() as i64).max(1);

            let mut day_total = 0i64;
            for &(blood_type, share) in BLOOD_TYPE_DISTRIBUTION.iter() {
                let split = total_units as f64 * share + split_noise.sample(rng);
                let units = (split.trunc() as i64).max(1);
                day_total += units;
                detail.push(DemandRecord {
                    date,
                    component,
                    blood_type,
                    demand_units: units,
                    day_of_week,
                    month,
                    is_weekend,
                    is_holiday_season,
                });
            }

            daily.push(DailyDemandRecord {
                date,
                component,
                demand_units: day_total,
                day_of_week,
                month,
                is_weekend,
                is_holiday_season,
            });
        }
    }

    Ok((detail, daily))
}

/// Convert detail records to a DataFrame for export.
pub fn detail_to_dataframe(records: &[DemandRecord]) -> crate::Result<DataFrame> {
    let dates: Vec<String> = records.iter().map(|r| r.date.format("%Y-%m-%d").to_string()).collect();
    let df = DataFrame::new(vec![
        Series::new("date", dates),
        Series::new("component", records.iter().map(|r| r.component).collect::<Vec<_>>()),
        Series::new("blood_type", records.iter().map(|r| r.blood_type).collect::<Vec<_>>()),
        Series::new("demand_units", records.iter().map(|r| r.demand_units).collect::<Vec<_>>()),
        Series::new("day_of_week", records.iter().map(|r| r.day_of_week as i64).collect::<Vec<_>>()),
        Series::new("month", records.iter().map(|r| r.month as i64).collect::<Vec<_>>()),
        Series::new("is_weekend", records.iter().map(|r| r.is_weekend as i64).collect::<Vec<_>>()),
        Series::new(
            "is_holiday_season",
            records.iter().map(|r| r.is_holiday_season as i64).collect::<Vec<_>>(),
        ),
    ])?;
    Ok(df)
}

/// Convert daily aggregate records to a DataFrame for export.
pub fn daily_to_dataframe(records: &[DailyDemandRecord]) -> crate::Result<DataFrame> {
    let dates: Vec<String> = records.iter().map(|r| r.date.format("%Y-%m-%d").to_string()).collect();
    let df = DataFrame::new(vec![
        Series::new("date", dates),
        Series::new("component", records.iter().map(|r| r.component).collect::<Vec<_>>()),
        Series::new("demand_units", records.iter().map(|r| r.demand_units).collect::<Vec<_>>()),
        Series::new("day_of_week", records.iter().map(|r| r.day_of_week as i64).collect::<Vec<_>>()),
        Series::new("month", records.iter().map(|r| r.month as i64).collect::<Vec<_>>()),
        Series::new("is_weekend", records.iter().map(|r| r.is_weekend as i64).collect::<Vec<_>>()),
        Series::new(
            "is_holiday_season",
            records.iter().map(|r| r.is_holiday_season as i64).collect::<Vec<_>>(),
        ),
    ])?;
    Ok(df)
}
