//! DonorForge: synthetic blood bank datasets with RFM donor segmentation
//!
//! This library generates a blood bank's demand time-series, donor registry,
//! supply/wastage records, and the derived RFM (Recency, Frequency, Monetary)
//! dataset, plus the analytics helpers to score and segment donors.

pub mod cli;
pub mod constants;
pub mod demand;
pub mod donors;
pub mod export;
pub mod features;
pub mod rfm;
pub mod supply;

// Re-export public items for easier access
pub use cli::Args;
pub use demand::{generate_demand_timeseries, DailyDemandRecord, DemandRecord};
pub use donors::{generate_donor_registry, DonorRecord};
pub use features::{add_calendar_features, forecast_accuracy, inventory_metrics};
pub use rfm::{assign_segment, derive_rfm, outreach_recommendation, score_rfm, Segment};
pub use supply::{component_wastage_summary, generate_supply, ComponentWastage, SupplyRecord};

/// Common result type used throughout the application
pub type Result<T> = anyhow::Result<T>;
