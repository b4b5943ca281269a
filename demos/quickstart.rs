//! Quickstart example demonstrating basic usage of tsstat.
//!
//! Run with: cargo run --example quickstart
//! Set RUST_LOG=tsstat=debug to follow the pipeline stages.

use tsstat::prelude::*;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== tsstat Quickstart ===\n");

    // 1. Monthly data with trend, seasonality and a little wobble
    let values: Vec<f64> = (0..144)
        .map(|i| {
            100.0                                                       // base level
            + 0.8 * i as f64                                            // linear trend
            + 12.0 * (2.0 * std::f64::consts::PI * i as f64 / 12.0).sin() // yearly cycle
            + 0.5 * (i as f64 * 1.7).cos()                              // wobble
        })
        .collect();
    println!("Created series with {} observations", values.len());

    // 2. Natural period of the calendar frequency
    let period = seasonal_period("M").unwrap();
    println!("Natural seasonal period of 'M': {period}");

    // 3. Extract statistics with the default configuration
    println!("\n--- Default extraction ---");
    let extractor = ExtractStats::new(ExtractConfig::default().with_frequency("M")).unwrap();
    let stats = extractor.extract_statistics(&values).unwrap();
    println!("{stats}");

    // 4. Keep every significant period, without harmonics
    println!("\n--- All periods, harmonics removed ---");
    let config = ExtractConfig::default()
        .with_frequency("M")
        .with_no_sp_to_use(0)
        .with_remove_harmonics(HarmonicOrder::RawStrength);
    let stats = ExtractStats::new(config)
        .unwrap()
        .extract_statistics(&values)
        .unwrap();
    println!("Candidates:  {:?}", stats.candidate_sps());
    println!("Significant: {:?}", stats.significant_sps());

    // 5. Export for a model selector
    println!("\n--- JSON ---");
    println!("{}", stats.to_json().unwrap());

    println!("\n=== Quickstart Complete ===");
}
