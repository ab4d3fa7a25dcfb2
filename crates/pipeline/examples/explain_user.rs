//! Example: explain the recommendations for one user
//!
//! Run with: cargo run --package pipeline --example explain_user -- data/ratings_data.csv 0
//!
//! This example shows how to:
//! 1. Load a ratings CSV
//! 2. Compute the similarity vector for a user
//! 3. Inspect every prediction, not just the top K

use anyhow::Context;
use data_loader::RatingMatrix;
use pipeline::Recommender;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/ratings_data.csv"));
    let target: usize = args
        .next()
        .map(|s| s.parse::<usize>())
        .transpose()
        .context("Target user must be a zero-based index")?
        .unwrap_or(0);

    let matrix = Arc::new(RatingMatrix::load_from_file(&path)?);
    let recommender = Recommender::new(matrix);

    let start = Instant::now();
    let report = recommender.explain(target, 5)?;
    println!("Explained user {} in {:?}\n", target, start.elapsed());

    println!("Similarities:");
    for (user, score) in report.similarities.neighbors() {
        println!("  user {:>3}: {:+.4}", user, score);
    }

    println!("\nPredictions:");
    for (item, slot) in report.predictions.values().iter().enumerate() {
        match slot {
            Some(p) => println!("  item {:>3}: {:+.4}", item, p),
            None => println!("  item {:>3}: (already rated)", item),
        }
    }

    println!("\nTop 5:");
    for (rank, rec) in report.recommendations.iter().enumerate() {
        println!("  {}. item {} ({:.3})", rank + 1, rec.item, rec.predicted_rating);
    }
    Ok(())
}
