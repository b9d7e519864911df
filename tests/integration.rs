//! Integration tests for DonorForge

use chrono::NaiveDate;
use donorforge::{demand, donors, export, features, rfm, supply};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const DATASET_FILES: [&str; 5] = [
    "demand_detailed.csv",
    "demand_daily.csv",
    "donor_registry.csv",
    "rfm_dataset.csv",
    "supply_inventory.csv",
];

fn start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()
}

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

/// Generate every dataset with one seeded RNG and write all five CSVs.
fn generate_all(dir: &Path, seed: u64, n_donors: usize, periods: u32) {
    let mut rng = StdRng::seed_from_u64(seed);

    let (detail, daily) =
        demand::generate_demand_timeseries(start_date(), periods, &mut rng).unwrap();
    let registry = donors::generate_donor_registry(n_donors, as_of(), &mut rng).unwrap();
    let rfm_df = rfm::derive_rfm(&registry).unwrap();
    let supply_records = supply::generate_supply(&daily, &mut rng);

    export::write_csv(&mut demand::detail_to_dataframe(&detail).unwrap(), dir, DATASET_FILES[0])
        .unwrap();
    export::write_csv(&mut demand::daily_to_dataframe(&daily).unwrap(), dir, DATASET_FILES[1])
        .unwrap();
    export::write_csv(&mut donors::donors_to_dataframe(&registry).unwrap(), dir, DATASET_FILES[2])
        .unwrap();
    export::write_csv(&mut rfm_df.clone(), dir, DATASET_FILES[3]).unwrap();
    export::write_csv(&mut supply::supply_to_dataframe(&supply_records).unwrap(), dir, DATASET_FILES[4])
        .unwrap();
}

#[test]
fn test_end_to_end_generation() {
    let dir = tempdir().unwrap();
    generate_all(dir.path(), 42, 200, 30);

    for file in DATASET_FILES {
        let path = dir.path().join(file);
        assert!(path.exists(), "{} missing", file);

        let df = export::read_csv(&path).unwrap();
        assert!(df.height() > 0, "{} is empty", file);
    }

    // Expected row counts: 30 days x 4 components (x 8 blood types for detail).
    let detail = export::read_csv(&dir.path().join(DATASET_FILES[0])).unwrap();
    assert_eq!(detail.height(), 30 * 4 * 8);
    let daily = export::read_csv(&dir.path().join(DATASET_FILES[1])).unwrap();
    assert_eq!(daily.height(), 30 * 4);
    let registry = export::read_csv(&dir.path().join(DATASET_FILES[2])).unwrap();
    assert_eq!(registry.height(), 200);
}

#[test]
fn test_reproducibility_byte_identical() {
    let dir_a = tempdir().unwrap();
    let dir_b = tempdir().unwrap();
    generate_all(dir_a.path(), 42, 100, 14);
    generate_all(dir_b.path(), 42, 100, 14);

    for file in DATASET_FILES {
        let bytes_a = fs::read(dir_a.path().join(file)).unwrap();
        let bytes_b = fs::read(dir_b.path().join(file)).unwrap();
        assert_eq!(bytes_a, bytes_b, "{} differs between identical runs", file);
    }
}

#[test]
fn test_different_seeds_differ() {
    let dir_a = tempdir().unwrap();
    let dir_b = tempdir().unwrap();
    generate_all(dir_a.path(), 1, 100, 14);
    generate_all(dir_b.path(), 2, 100, 14);

    let bytes_a = fs::read(dir_a.path().join("donor_registry.csv")).unwrap();
    let bytes_b = fs::read(dir_b.path().join("donor_registry.csv")).unwrap();
    assert_ne!(bytes_a, bytes_b);
}

/// Golden regression anchor for the default seed: donor D00001's recorded
/// values for seed 42 / 100 donors. Any drift in the draw sequence or the
/// distribution tables shows up here.
#[test]
fn test_first_donor_matches_golden_values() {
    let mut rng = StdRng::seed_from_u64(42);
    let first = donors::generate_donor_registry(100, as_of(), &mut rng)
        .unwrap()
        .into_iter()
        .next()
        .unwrap();

    assert_eq!(first.donor_id, "D00001");
    assert_eq!(first.age, 37);
    assert_eq!(first.blood_type, "B-");
    assert_eq!(first.total_donations, 5);
    assert_eq!(first.gender, "Female");
    assert_eq!(first.months_since_first_donation, 30);
    assert_eq!(first.total_volume_cc, 5 * 450);
}

#[test]
fn test_scoring_generated_rfm_dataset() {
    let dir = tempdir().unwrap();
    generate_all(dir.path(), 42, 300, 7);

    // Reload from CSV the way scoring mode does.
    let rfm_df = export::read_csv(&dir.path().join(DATASET_FILES[3])).unwrap();
    let scored = rfm::score_rfm(&rfm_df).unwrap();

    for col in ["R_Score", "F_Score", "M_Score"] {
        let scores = scored.column(col).unwrap().i64().unwrap();
        assert!(scores.into_no_null_iter().all(|v| (1..=5).contains(&v)));
    }

    let counts = rfm::segment_counts(&scored).unwrap();
    let total: usize = counts.iter().map(|(_, n)| n).sum();
    assert_eq!(total, 300);
}

#[test]
fn test_rfm_derivation_is_idempotent() {
    let mut rng = StdRng::seed_from_u64(42);
    let registry = donors::generate_donor_registry(150, as_of(), &mut rng).unwrap();

    let rfm_a = rfm::derive_rfm(&registry).unwrap();
    let rfm_b = rfm::derive_rfm(&registry).unwrap();
    assert!(rfm_a.equals(&rfm_b));
}

#[test]
fn test_generated_supply_invariants_via_csv() {
    let dir = tempdir().unwrap();
    generate_all(dir.path(), 42, 50, 21);

    let supply_df = export::read_csv(&dir.path().join(DATASET_FILES[4])).unwrap();
    let supply_units = supply_df.column("supply_units").unwrap().i64().unwrap();
    let utilized = supply_df.column("utilized_units").unwrap().i64().unwrap();
    let rates = supply_df.column("utilization_rate").unwrap().f64().unwrap();

    for ((s, u), r) in supply_units
        .into_no_null_iter()
        .zip(utilized.into_no_null_iter())
        .zip(rates.into_no_null_iter())
    {
        assert!(u <= s);
        assert!((0.0..=1.0).contains(&r));
    }
}

#[test]
fn test_calendar_features_on_generated_daily_demand() {
    let dir = tempdir().unwrap();
    generate_all(dir.path(), 42, 50, 10);

    let daily = export::read_csv(&dir.path().join(DATASET_FILES[1])).unwrap();
    let with_features = features::add_calendar_features(&daily, "date").unwrap();

    for col in ["year", "quarter", "week_of_year", "is_summer", "is_winter"] {
        assert!(with_features.column(col).is_ok(), "missing derived column {}", col);
    }
    assert_eq!(with_features.height(), daily.height());
}

#[test]
fn test_forecast_accuracy_on_demand_series() {
    let mut rng = StdRng::seed_from_u64(42);
    let (_, daily) = demand::generate_demand_timeseries(start_date(), 30, &mut rng).unwrap();

    // A naive "forecast": yesterday's demand for the same component.
    let actual: Array1<f64> = daily[4..].iter().map(|r| r.demand_units as f64).collect();
    let forecast: Array1<f64> = daily[..daily.len() - 4].iter().map(|r| r.demand_units as f64).collect();

    let acc = features::forecast_accuracy(&actual, &forecast).unwrap();
    assert!(acc.mae >= 0.0);
    assert!(acc.rmse >= acc.mae);
    assert!(acc.mape >= 0.0);
}
