use anyhow::Context;
use data_loader::RatingMatrix;
use std::path::PathBuf;
use std::time::Instant;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data/ratings_data.csv"));

    println!("Loading ratings from {}...\n", path.display());

    let start = Instant::now();
    let matrix = RatingMatrix::load_from_file(&path).context("Failed to load ratings")?;
    let elapsed = start.elapsed();

    let (users, items, ratings) = matrix.counts();
    let density = if users * items > 0 {
        ratings as f64 / (users * items) as f64
    } else {
        0.0
    };

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Users: {}", users);
    println!("Items: {}", items);
    println!("Ratings: {} ({:.1}% dense)", ratings, density * 100.0);
    println!("\nPerformance: {:.0} cells/second",
             (users * items) as f64 / elapsed.as_secs_f64());
    Ok(())
}
