//! DonorForge: synthetic blood bank dataset generation with RFM segmentation
//!
//! This is the main entrypoint that orchestrates dataset generation, CSV
//! export, and the donor segmentation report.

use anyhow::Result;
use clap::Parser;
use donorforge::{demand, donors, export, features, rfm, supply, Args};
use ndarray::Array1;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::time::Instant;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    if args.verbose {
        println!("DonorForge - Synthetic Blood Bank Datasets");
        println!("==========================================\n");
    }

    // Check if in scoring mode
    if let Some(ref rfm_path) = args.score {
        run_scoring_mode(&args, rfm_path)?;
    } else {
        run_generation_pipeline(&args)?;
    }

    Ok(())
}

/// Score an existing RFM CSV and print the segment report
fn run_scoring_mode(args: &Args, rfm_path: &str) -> Result<()> {
    println!("=== Scoring Mode ===");
    println!("Input RFM file: {}", rfm_path);

    let start_time = Instant::now();

    let rfm_df = export::read_csv(Path::new(rfm_path))?;
    if args.verbose {
        println!("\nLoaded {} donors", rfm_df.height());
    }

    let scored = rfm::score_rfm(&rfm_df)?;
    let elapsed = start_time.elapsed();

    println!("\n✓ Scored {} donors", scored.height());
    println!("  Processing time: {:.2}s", elapsed.as_secs_f64());

    print_segment_report(&scored, args.verbose)?;
    Ok(())
}

/// Run the full dataset generation pipeline
fn run_generation_pipeline(args: &Args) -> Result<()> {
    println!("=== Blood Bank Dataset Generation ===\n");

    let start_date = args.parsed_start_date()?;
    let as_of = args.reference_date()?;
    let out_dir = Path::new(&args.output_dir);
    let mut rng = StdRng::seed_from_u64(args.seed);

    let start_time = Instant::now();

    // Step 1: Demand time-series
    if args.verbose {
        println!("Step 1: Generating demand time-series");
        println!("  Start date: {}, periods: {}", start_date, args.periods);
    }
    let step = Instant::now();
    let (detail, daily) = demand::generate_demand_timeseries(start_date, args.periods, &mut rng)?;
    let mut detail_df = demand::detail_to_dataframe(&detail)?;
    let mut daily_df = demand::daily_to_dataframe(&daily)?;
    export::write_csv(&mut detail_df, out_dir, "demand_detailed.csv")?;
    export::write_csv(&mut daily_df, out_dir, "demand_daily.csv")?;
    println!(
        "✓ Demand: {} detailed records, {} daily aggregates",
        detail.len(),
        daily.len()
    );
    if args.verbose {
        println!("  Generation time: {:.2}s", step.elapsed().as_secs_f64());
    }

    // Step 2: Donor registry
    if args.verbose {
        println!("\nStep 2: Generating donor registry ({} donors)", args.donors);
    }
    let step = Instant::now();
    let registry = donors::generate_donor_registry(args.donors, as_of, &mut rng)?;
    let mut registry_df = donors::donors_to_dataframe(&registry)?;
    export::write_csv(&mut registry_df, out_dir, "donor_registry.csv")?;
    println!("✓ Donor registry: {} records", registry.len());
    if args.verbose {
        println!("  Generation time: {:.2}s", step.elapsed().as_secs_f64());
    }

    // Step 3: RFM dataset (pure derivation, no randomness)
    let rfm_df = rfm::derive_rfm(&registry)?;
    let mut rfm_out = rfm_df.clone();
    export::write_csv(&mut rfm_out, out_dir, "rfm_dataset.csv")?;
    println!("✓ RFM dataset: {} records", rfm_df.height());

    // Step 4: Supply and wastage
    let supply_records = supply::generate_supply(&daily, &mut rng);
    let mut supply_df = supply::supply_to_dataframe(&supply_records)?;
    export::write_csv(&mut supply_df, out_dir, "supply_inventory.csv")?;
    println!("✓ Supply inventory: {} records", supply_records.len());

    // Segment report over the freshly derived RFM dataset
    let scored = rfm::score_rfm(&rfm_df)?;
    print_segment_report(&scored, args.verbose)?;

    // Inventory health over the generated supply table
    let demand_units: Array1<f64> =
        supply_records.iter().map(|r| r.demand_units as f64).collect();
    let supply_units: Array1<f64> =
        supply_records.iter().map(|r| r.supply_units as f64).collect();
    let metrics = features::inventory_metrics(&demand_units, &supply_units);

    println!("\n=== Inventory Metrics ===");
    println!("Total demand:     {:.0} units", metrics.total_demand);
    println!("Total supply:     {:.0} units", metrics.total_supply);
    println!(
        "Utilization rate: {:.1}% (benchmark {:.1}%)",
        metrics.utilization_rate * 100.0,
        donorforge::constants::UTILIZATION_RATE_TARGET * 100.0
    );
    println!("Shortage risk:    {:.1}%", metrics.shortage_risk * 100.0);
    println!("Wastage risk:     {:.1}%", metrics.wastage_risk * 100.0);

    println!("\nWastage by component:");
    for cw in supply::component_wastage_summary(&supply_records) {
        let benchmark = cw
            .benchmark_rate
            .map(|r| format!("{:.1}%", r * 100.0))
            .unwrap_or_else(|| "n/a".to_string());
        let shelf_life = cw
            .shelf_life_days
            .map(|d| format!("{}d", d))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "  {:<20} {:>5.1}% (benchmark {}, shelf life {})",
            cw.component,
            cw.realized_rate * 100.0,
            benchmark,
            shelf_life
        );
    }

    println!("\n=== Generation Complete ===");
    println!("Total processing time: {:.2}s", start_time.elapsed().as_secs_f64());
    println!("Files saved to: {}", out_dir.display());
    println!("  demand_detailed.csv   - {} records", detail.len());
    println!("  demand_daily.csv      - {} records", daily.len());
    println!("  donor_registry.csv    - {} records", registry.len());
    println!("  rfm_dataset.csv       - {} records", rfm_df.height());
    println!("  supply_inventory.csv  - {} records", supply_records.len());

    Ok(())
}

/// Print segment distribution and, in verbose mode, outreach recommendations
fn print_segment_report(scored: &polars::prelude::DataFrame, verbose: bool) -> Result<()> {
    let counts = rfm::segment_counts(scored)?;
    let total: usize = counts.iter().map(|(_, n)| n).sum();

    println!("\n=== Donor Segments ===");
    for (segment, n) in &counts {
        let percentage = if total > 0 {
            *n as f64 / total as f64 * 100.0
        } else {
            0.0
        };
        println!("{:<12} {:>6} donors ({:.1}%)", segment.name(), n, percentage);
    }

    if verbose {
        println!("\n=== Outreach Recommendations ===");
        for (segment, n) in counts.iter().filter(|(_, n)| *n > 0) {
            let rec = rfm::outreach_recommendation(*segment);
            println!("\n{} ({} donors)", segment.name(), n);
            println!("  Action:    {}", rec.action);
            println!("  Strategy:  {}", rec.strategy);
            println!("  Frequency: {}", rec.frequency);
            println!("  Channel:   {}", rec.channel);
        }
    }

    Ok(())
}
