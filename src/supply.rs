//! Supply and wastage generation from the daily demand table.
//!
//! Supply tracks demand with a random buffer; unused buffer plus a small
//! unconditional expiry loss becomes wastage. Rates are reporting-only and
//! never feed back into later rows.

use polars::prelude::*;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Uniform};

use crate::constants::{benchmark_wastage_rate, shelf_life_days};
use crate::demand::DailyDemandRecord;

/// Supply and wastage figures for one (date, component).
#[derive(Debug, Clone)]
pub struct SupplyRecord {
    pub date: chrono::NaiveDate,
    pub component: &'static str,
    pub supply_units: i64,
    pub demand_units: i64,
    pub utilized_units: i64,
    pub wasted_units: i64,
    pub utilization_rate: f64,
    pub wastage_rate: f64,
}

/// Generate one supply record per daily demand row.
pub fn generate_supply(daily_demand: &[DailyDemandRecord], rng: &mut StdRng) -> Vec<SupplyRecord> {
    let buffer_dist = Uniform::new(1.05, 1.20);
    let expiry_dist = Uniform::new(0.01, 0.05);

    daily_demand
        .iter()
        .map(|row| {
            let demand = row.demand_units;
            let supply = (demand as f64 * buffer_dist.sample(rng)).trunc() as i64;

            let utilized = supply.min(demand);
            let mut wasted = (supply - demand).max(0);
            // Expiry losses happen even when every unit is spoken for.
            wasted += (supply as f64 * expiry_dist.sample(rng)).trunc() as i64;

            let (utilization_rate, wastage_rate) = if supply > 0 {
                (utilized as f64 / supply as f64, wasted as f64 / supply as f64)
            } else {
                (0.0, 0.0)
            };

            SupplyRecord {
                date: row.date,
                component: row.component,
                supply_units: supply,
                demand_units: demand,
                utilized_units: utilized,
                wasted_units: wasted,
                utilization_rate,
                wastage_rate,
            }
        })
        .collect()
}

/// Realized wastage per component, paired with the published benchmark.
#[derive(Debug, Clone)]
pub struct ComponentWastage {
    pub component: &'static str,
    pub realized_rate: f64,
    pub benchmark_rate: Option<f64>,
    pub shelf_life_days: Option<u32>,
}

/// Summarize realized wastage per component over a supply table, in first-seen
/// component order, alongside the benchmark rate and shelf life.
pub fn component_wastage_summary(records: &[SupplyRecord]) -> Vec<ComponentWastage> {
    let mut components: Vec<&'static str> = Vec::new();
    for r in records {
        if !components.contains(&r.component) {
            components.push(r.component);
        }
    }

    components
        .into_iter()
        .map(|component| {
            let (supply, wasted) = records
                .iter()
                .filter(|r| r.component == component)
                .fold((0i64, 0i64), |(s, w), r| (s + r.supply_units, w + r.wasted_units));
            let realized_rate = if supply > 0 { wasted as f64 / supply as f64 } else { 0.0 };
            ComponentWastage {
                component,
                realized_rate,
                benchmark_rate: benchmark_wastage_rate(component),
                shelf_life_days: shelf_life_days(component),
            }
        })
        .collect()
}

/// Convert supply records to a DataFrame for export.
pub fn supply_to_dataframe(records: &[SupplyRecord]) -> crate::Result<DataFrame> {
    let dates: Vec<String> = records.iter().map(|r| r.date.format("%Y-%m-%d").to_string()).collect();
    let df = DataFrame::new(vec![
        Series::new("date", dates),
        Series::new("component", records.iter().map(|r| r.component).collect::<Vec<_>>()),
        Series::new("supply_units", records.iter().map(|r| r.supply_units).collect::<Vec<_>>()),
        Series::new("demand_units", records.iter().map(|r| r.demand_units).collect::<Vec<_>>()),
        Series::new("utilized_units", records.iter().map(|r| r.utilized_units).collect::<Vec<_>>()),
        Series::new("wasted_units", records.iter().map(|r| r.wasted_units).collect::<Vec<_>>()),
        Series::new("utilization_rate", records.iter().map(|r| r.utilization_rate).collect::<Vec<_>>()),
        Series::new("wastage_rate", records.iter().map(|r| r.wastage_rate).collect::<Vec<_>>()),
    ])?;
    Ok(df)
}
