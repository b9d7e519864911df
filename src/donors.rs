//! Donor registry generation.
//!
//! Donor demographics follow NBCUS 2019 distributions, blood types follow the
//! WHO population shares, and donation-frequency behavior follows a power law
//! for repeat donors. All draws go through the caller's seeded RNG, so a fixed
//! (seed, n_donors, as_of) triple reproduces the registry exactly.

use anyhow::bail;
use chrono::{Duration, NaiveDate};
use polars::prelude::*;
use rand::distributions::WeightedIndex;
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Exp, Pareto};

use crate::constants::{
    AGE_GROUPS, BLOOD_TYPE_DISTRIBUTION, CITIES, DEFERRAL_RATE, DEFERRAL_REASONS,
    DONATION_VOLUME_CC, EMAIL_DOMAINS, FIRST_NAMES, FIRST_TIME_DONOR_SHARE, LAST_NAMES,
    MALE_DONOR_SHARE, MIN_DONATION_INTERVAL_DAYS,
};

/// One registered donor.
#[derive(Debug, Clone)]
pub struct DonorRecord {
    pub donor_id: String,
    pub name: String,
    pub age: i64,
    pub gender: &'static str,
    pub blood_type: &'static str,
    pub city: &'static str,
    pub email: String,
    pub phone: String,
    pub registration_date: NaiveDate,
    pub last_donation_date: NaiveDate,
    pub total_donations: i64,
    pub total_volume_cc: i64,
    pub months_since_first_donation: i64,
    pub months_since_last_donation: i64,
    pub availability_status: &'static str,
    pub is_first_time_donor: bool,
    pub has_deferral_history: bool,
    pub deferral_reason: Option<&'static str>,
}

/// Repeat donors cap out at 50 lifetime donations.
const MAX_DONATIONS: i64 = 50;
/// Donation history caps at 10 years.
const MAX_MONTHS_SINCE_FIRST: i64 = 120;

/// Generate `n_donors` donor records. `as_of` anchors all date arithmetic so
/// two runs with the same inputs produce identical records.
pub fn generate_donor_registry(
    n_donors: usize,
    as_of: NaiveDate,
    rng: &mut StdRng,
) -> crate::Result<Vec<DonorRecord>> {
    if n_donors == 0 {
        bail!("number of donors must be at least 1");
    }

    // WeightedIndex renormalizes internally, guarding against tables whose
    // shares don't sum to exactly 1.0.
    let age_dist = WeightedIndex::new(AGE_GROUPS.iter().map(|g| g.3))?;
    let blood_dist = WeightedIndex::new(BLOOD_TYPE_DISTRIBUTION.iter().map(|b| b.1))?;
    let deferral_dist = WeightedIndex::new(DEFERRAL_REASONS.iter().map(|d| d.1))?;
    // numpy's pareto convention: samples are (X - 1) for X ~ Pareto(scale 1).
    let donation_pareto: Pareto<f64> = Pareto::new(1.0, 1.5)?;
    let recency_exp: Exp<f64> = Exp::new(1.0 / 6.0)?;

    let mut donors = Vec::with_capacity(n_donors);

    for i in 0..n_donors {
        let (_, age_min, age_max, _) = AGE_GROUPS[age_dist.sample(rng)];
        let age = i64::from(rng.gen_range(age_min..=age_max));

        let gender = if rng.gen_bool(MALE_DONOR_SHARE) { "Male" } else { "Female" };
        let blood_type = BLOOD_TYPE_DISTRIBUTION[blood_dist.sample(rng)].0;
        let city = CITIES[rng.gen_range(0..CITIES.len())];

        let is_first_time = rng.gen_bool(FIRST_TIME_DONOR_SHARE);

        let (total_donations, months_since_first, months_since_last) = if is_first_time {
            let months = rng.gen_range(0..6i64);
            (1, months, months)
        } else {
            let draw = donation_pareto.sample(rng) - 1.0;
            let total = ((draw * 3.0).trunc() as i64 + 2).min(MAX_DONATIONS);
            let first = (total * rng.gen_range(3..8i64)).min(MAX_MONTHS_SINCE_FIRST);
            let last = (recency_exp.sample(rng).trunc() as i64).min(first);
            (total, first, last)
        };

        let total_volume_cc = total_donations * DONATION_VOLUME_CC;

        let registration_date = as_of - Duration::days(months_since_first * 30);
        let last_donation_date = as_of - Duration::days(months_since_last * 30);

        let days_since_last = (as_of - last_donation_date).num_days();
        let availability_status = if days_since_last >= MIN_DONATION_INTERVAL_DAYS {
            "Available"
        } else {
            "Not Eligible"
        };

        let has_deferral_history = rng.gen_bool(DEFERRAL_RATE);
        let deferral_reason = if has_deferral_history {
            let mut reason = DEFERRAL_REASONS[deferral_dist.sample(rng)].0;
            // Female donors are disproportionately deferred for low hemoglobin.
            if gender == "Female" && rng.gen_bool(0.3) {
                reason = "Low hemoglobin";
            }
            Some(reason)
        } else {
            None
        };

        let first_name = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
        let last_name = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
        let domain = EMAIL_DOMAINS[rng.gen_range(0..EMAIL_DOMAINS.len())];
        let email = format!(
            "{}.{}{}@{}",
            first_name.to_lowercase(),
            last_name.to_lowercase(),
            rng.gen_range(1..1000),
            domain
        );
        let phone = format!("+91-{}{:09}", rng.gen_range(6..=9), rng.gen_range(0..1_000_000_000u64));

        donors.push(DonorRecord {
            donor_id: format!("D{:05}", i + 1),
            name: format!("{} {}", first_name, last_name),
            age,
            gender,
            blood_type,
            city,
            email,
            phone,
            registration_date,
            last_donation_date,
            total_donations,
            total_volume_cc,
            months_since_first_donation: months_since_first,
            months_since_last_donation: months_since_last,
            availability_status,
            is_first_time_donor: is_first_time,
            has_deferral_history,
            deferral_reason,
        });
    }

    Ok(donors)
}

/// Convert donor records to a DataFrame for export.
pub fn donors_to_dataframe(donors: &[DonorRecord]) -> crate::Result<DataFrame> {
    let df = DataFrame::new(vec![
        Series::new("donor_id", donors.iter().map(|d| d.donor_id.as_str()).collect::<Vec<_>>()),
        Series::new("name", donors.iter().map(|d| d.name.as_str()).collect::<Vec<_>>()),
        Series::new("age", donors.iter().map(|d| d.age).collect::<Vec<_>>()),
        Series::new("gender", donors.iter().map(|d| d.gender).collect::<Vec<_>>()),
        Series::new("blood_type", donors.iter().map(|d| d.blood_type).collect::<Vec<_>>()),
        Series::new("city", donors.iter().map(|d| d.city).collect::<Vec<_>>()),
        Series::new("email", donors.iter().map(|d| d.email.as_str()).collect::<Vec<_>>()),
        Series::new("phone", donors.iter().map(|d| d.phone.as_str()).collect::<Vec<_>>()),
        Series::new(
            "registration_date",
            donors.iter().map(|d| d.registration_date.format("%Y-%m-%d").to_string()).collect::<Vec<_>>(),
        ),
        Series::new(
            "last_donation_date",
            donors.iter().map(|d| d.last_donation_date.format("%Y-%m-%d").to_string()).collect::<Vec<_>>(),
        ),
        Series::new("total_donations", donors.iter().map(|d| d.total_donations).collect::<Vec<_>>()),
        Series::new("total_volume_cc", donors.iter().map(|d| d.total_volume_cc).collect::<Vec<_>>()),
        Series::new(
            "months_since_first_donation",
            donors.iter().map(|d| d.months_since_first_donation).collect::<Vec<_>>(),
        ),
        Series::new(
            "months_since_last_donation",
            donors.iter().map(|d| d.months_since_last_donation).collect::<Vec<_>>(),
        ),
        Series::new(
            "availability_status",
            donors.iter().map(|d| d.availability_status).collect::<Vec<_>>(),
        ),
        Series::new(
            "is_first_time_donor",
            donors.iter().map(|d| d.is_first_time_donor as i64).collect::<Vec<_>>(),
        ),
        Series::new(
            "has_deferral_history",
            donors.iter().map(|d| d.has_deferral_history as i64).collect::<Vec<_>>(),
        ),
        Series::new(
            "deferral_reason",
            donors.iter().map(|d| d.deferral_reason.unwrap_or("")).collect::<Vec<_>>(),
        ),
    ])?;
    Ok(df)
}
