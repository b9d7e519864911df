//! Distribution tables and benchmarks driving the synthetic generators.
//!
//! Sources: NBCUS 2019 survey (donor demographics, deferral reasons),
//! WHO blood type distributions, Nepal BPKIHS study (utilization/wastage).

/// Blood type population shares. Weighted draws renormalize, so the table
/// does not need to sum to exactly 1.0.
pub const BLOOD_TYPE_DISTRIBUTION: [(&str, f64); 8] = [
    ("O+", 0.37),
    ("A+", 0.28),
    ("B+", 0.20),
    ("AB+", 0.05),
    ("O-", 0.06),
    ("A-", 0.025),
    ("B-", 0.015),
    ("AB-", 0.01),
];

/// Donor age brackets: (label, min age, max age, population share).
pub const AGE_GROUPS: [(&str, u32, u32, f64); 7] = [
    ("16-18", 16, 18, 0.08),
    ("19-24", 19, 24, 0.15),
    ("25-34", 25, 34, 0.22),
    ("35-44", 35, 44, 0.18),
    ("45-54", 45, 54, 0.17),
    ("55-64", 55, 64, 0.12),
    ("65+", 65, 75, 0.08),
];

/// Share of donors that are male.
pub const MALE_DONOR_SHARE: f64 = 0.54;

/// Share of donors that are first-time donors.
pub const FIRST_TIME_DONOR_SHARE: f64 = 0.30;

/// Share of donors with a recorded deferral.
pub const DEFERRAL_RATE: f64 = 0.15;

/// Deferral reasons with NBCUS 2019 shares.
pub const DEFERRAL_REASONS: [(&str, f64); 7] = [
    ("Low hemoglobin", 0.431),
    ("Non-medical reasons", 0.214),
    ("Blood pressure/pulse", 0.112),
    ("Travel history", 0.089),
    ("Medication", 0.072),
    ("Recent tattoo/piercing", 0.045),
    ("Other medical", 0.037),
];

pub const CITIES: &[&str] = &[
    "Mumbai",
    "Delhi",
    "Bangalore",
    "Chennai",
    "Kolkata",
    "Hyderabad",
    "Pune",
    "Ahmedabad",
    "Jaipur",
    "Lucknow",
    "Chandigarh",
    "Bhopal",
    "Indore",
    "Nagpur",
    "Kochi",
];

/// Base daily demand in units per component for a regional blood bank,
/// scaled down from the NBCUS national average of ~30,000 units/day.
pub const BASE_DAILY_DEMAND: [(&str, f64); 4] = [
    ("Packed RBC", 80.0),
    ("Platelets", 30.0),
    ("Fresh Frozen Plasma", 25.0),
    ("Cryoprecipitate", 10.0),
];

/// Maximum usable days per component after collection.
pub const COMPONENT_SHELF_LIFE_DAYS: [(&str, u32); 5] = [
    ("Whole Blood", 35),
    ("Packed RBC", 42),
    ("Platelets", 5),
    ("Fresh Frozen Plasma", 365),
    ("Cryoprecipitate", 365),
];

/// Benchmark wastage rates per component (Nepal BPKIHS study).
/// Platelets waste the most due to their 5-day shelf life.
pub const COMPONENT_WASTAGE_RATES: [(&str, f64); 4] = [
    ("Packed RBC", 0.05),
    ("Platelets", 0.15),
    ("Fresh Frozen Plasma", 0.04),
    ("Cryoprecipitate", 0.06),
];

/// Utilization rate benchmark (92.9%, Nepal BPKIHS study).
pub const UTILIZATION_RATE_TARGET: f64 = 0.929;

/// Shelf life lookup for a component, if it is a tracked component.
pub fn shelf_life_days(component: &str) -> Option<u32> {
    COMPONENT_SHELF_LIFE_DAYS
        .iter()
        .find(|(name, _)| *name == component)
        .map(|(_, days)| *days)
}

/// Benchmark wastage rate lookup for a component.
pub fn benchmark_wastage_rate(component: &str) -> Option<f64> {
    COMPONENT_WASTAGE_RATES
        .iter()
        .find(|(name, _)| *name == component)
        .map(|(_, rate)| *rate)
}

/// Volume collected per donation, in cc.
pub const DONATION_VOLUME_CC: i64 = 450;

/// Mandatory wait between whole-blood donations, in days.
pub const MIN_DONATION_INTERVAL_DAYS: i64 = 56;

// Name pools for synthesized donor contact details.

pub const FIRST_NAMES: &[&str] = &[
    "Aarav", "Vivaan", "Aditya", "Arjun", "Rohan", "Karan", "Rahul", "Amit", "Suresh", "Vikram",
    "Nikhil", "Sanjay", "Rajesh", "Manish", "Deepak", "Ananya", "Priya", "Kavya", "Sneha", "Pooja",
    "Divya", "Neha", "Riya", "Meera", "Anjali", "Shreya", "Lakshmi", "Sunita", "Geeta", "Asha",
];

pub const LAST_NAMES: &[&str] = &[
    "Sharma", "Verma", "Gupta", "Mehta", "Patel", "Reddy", "Nair", "Iyer", "Rao", "Singh",
    "Kumar", "Das", "Chopra", "Malhotra", "Joshi", "Desai", "Kulkarni", "Banerjee", "Mukherjee",
    "Chatterjee", "Menon", "Pillai", "Shah", "Agarwal", "Mishra",
];

pub const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net", "mail.example"];
