//! Calendar feature derivation and reporting metrics.

use anyhow::{bail, Context};
use chrono::{Datelike, NaiveDate};
use ndarray::Array1;
use polars::prelude::*;

/// Append calendar columns derived from `date_col` (a `YYYY-MM-DD` string
/// column): year, month, day, day_of_week (Monday = 0), week_of_year (ISO),
/// quarter, and 0/1 weekend/seasonal flags.
pub fn add_calendar_features(df: &DataFrame, date_col: &str) -> crate::Result<DataFrame> {
    let dates = df
        .column(date_col)
        .with_context(|| format!("missing required column '{}'", date_col))?
        .str()
        .with_context(|| format!("column '{}' is not a string date column", date_col))?;

    let n = df.height();
    let mut year = Vec::with_capacity(n);
    let mut month = Vec::with_capacity(n);
    let mut day = Vec::with_capacity(n);
    let mut day_of_week = Vec::with_capacity(n);
    let mut week_of_year = Vec::with_capacity(n);
    let mut quarter = Vec::with_capacity(n);
    let mut is_weekend = Vec::with_capacity(n);
    let mut is_summer = Vec::with_capacity(n);
    let mut is_winter = Vec::with_capacity(n);
    let mut is_holiday_season = Vec::with_capacity(n);

    for value in dates.into_iter() {
        let raw = value.with_context(|| format!("null date in column '{}'", date_col))?;
        let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .with_context(|| format!("unparsable date '{}' in column '{}'", raw, date_col))?;

        let m = date.month();
        let dow = date.weekday().num_days_from_monday();

        year.push(i64::from(date.year()));
        month.push(i64::from(m));
        day.push(i64::from(date.day()));
        day_of_week.push(i64::from(dow));
        week_of_year.push(i64::from(date.iso_week().week()));
        quarter.push(i64::from((m - 1) / 3 + 1));
        is_weekend.push((dow >= 5) as i64);
        is_summer.push(((6..=8).contains(&m)) as i64);
        is_winter.push((m == 12 || m <= 2) as i64);
        is_holiday_season.push((m == 11 || m == 12) as i64);
    }

    let mut out = df.clone();
    out.with_column(Series::new("year", year))?;
    out.with_column(Series::new("month", month))?;
    out.with_column(Series::new("day", day))?;
    out.with_column(Series::new("day_of_week", day_of_week))?;
    out.with_column(Series::new("week_of_year", week_of_year))?;
    out.with_column(Series::new("quarter", quarter))?;
    out.with_column(Series::new("is_weekend", is_weekend))?;
    out.with_column(Series::new("is_summer", is_summer))?;
    out.with_column(Series::new("is_winter", is_winter))?;
    out.with_column(Series::new("is_holiday_season", is_holiday_season))?;
    Ok(out)
}

/// Aggregate inventory health figures. All ratios resolve to 0 when their
/// denominator is 0.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryMetrics {
    pub total_demand: f64,
    pub total_supply: f64,
    pub utilization_rate: f64,
    pub shortage_risk: f64,
    pub wastage_risk: f64,
}

pub fn inventory_metrics(demand: &Array1<f64>, supply: &Array1<f64>) -> InventoryMetrics {
    let total_demand = demand.sum();
    let total_supply = supply.sum();

    let utilization_rate = if total_supply > 0.0 {
        (total_demand / total_supply).min(1.0)
    } else {
        0.0
    };
    let shortage_risk = if total_demand > 0.0 {
        ((total_demand - total_supply) / total_demand).max(0.0)
    } else {
        0.0
    };
    let wastage_risk = if total_supply > 0.0 {
        ((total_supply - total_demand) / total_supply).max(0.0)
    } else {
        0.0
    };

    InventoryMetrics {
        total_demand,
        total_supply,
        utilization_rate,
        shortage_risk,
        wastage_risk,
    }
}

/// Forecast error metrics. MAE and RMSE cover every point; MAPE only averages
/// over points whose true value is nonzero (0.0 when there are none).
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastAccuracy {
    pub mae: f64,
    pub rmse: f64,
    pub mape: f64,
}

pub fn forecast_accuracy(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> crate::Result<ForecastAccuracy> {
    if y_true.len() != y_pred.len() {
        bail!("y_true and y_pred lengths differ ({} vs {})", y_true.len(), y_pred.len());
    }
    if y_true.is_empty() {
        bail!("forecast accuracy requires at least one point");
    }

    let n = y_true.len() as f64;
    let mae = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).abs())
        .sum::<f64>()
        / n;
    let rmse = (y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum::<f64>()
        / n)
        .sqrt();

    let nonzero: Vec<(f64, f64)> = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, _)| **t != 0.0)
        .map(|(t, p)| (*t, *p))
        .collect();
    let mape = if nonzero.is_empty() {
        0.0
    } else {
        nonzero.iter().map(|(t, p)| ((t - p) / t).abs()).sum::<f64>() / nonzero.len() as f64 * 100.0
    };

    Ok(ForecastAccuracy { mae, rmse, mape })
}
