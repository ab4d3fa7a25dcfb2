use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use data_loader::{ItemIndex, RatingMatrix, UserIndex};
use pipeline::{RecommendationList, RecommendationReport, Recommender};
use serde::Serialize;
use similarity::SimilarityEngine;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// CineGuide - collaborative filtering recommendations from a ratings CSV
///
/// Users and items are numbered from 1 on the command line and in output;
/// `User 1` is the first row of the file.
#[derive(Parser)]
#[command(name = "cineguide")]
#[command(about = "Item recommendations using user-based collaborative filtering", long_about = None)]
struct Cli {
    /// Path to the ratings CSV (one user per line, 0 = unrated)
    #[arg(short, long, default_value = "data/ratings_data.csv")]
    ratings: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Get item recommendations for a user
    Recommend {
        /// User number to get recommendations for
        #[arg(long, default_value = "1")]
        user: usize,

        /// Number of recommendations to return
        #[arg(long, default_value = "5")]
        limit: usize,

        /// Also print every prediction and the user's nearest neighbors
        #[arg(long)]
        explain: bool,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a user's rating profile
    User {
        /// User number to display
        #[arg(long)]
        user: usize,
    },

    /// List the users most similar to a user
    Similar {
        /// User number to compare against
        #[arg(long)]
        user: usize,

        /// Number of neighbors to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Run benchmark to test performance
    Benchmark {
        /// Number of requests to make
        #[arg(long, default_value = "100")]
        requests: usize,

        /// Recommendations per request
        #[arg(long, default_value = "5")]
        limit: usize,
    },
}

/// One line of `recommend --json` output
#[derive(Serialize)]
struct JsonRecommendation {
    rank: usize,
    item: usize,
    predicted_rating: f64,
}

/// One item slot of `recommend --json --explain`; `null` when already rated
#[derive(Serialize)]
struct JsonPrediction {
    item: usize,
    predicted_rating: Option<f64>,
}

#[derive(Serialize)]
struct JsonNeighbor {
    user: usize,
    similarity: f64,
}

#[derive(Serialize)]
struct JsonOutput {
    user: usize,
    recommendations: Vec<JsonRecommendation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    predictions: Option<Vec<JsonPrediction>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    neighbors: Option<Vec<JsonNeighbor>>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let start = Instant::now();
    let matrix = Arc::new(
        RatingMatrix::load_from_file(&cli.ratings)
            .with_context(|| format!("Failed to load ratings from {}", cli.ratings.display()))?,
    );
    tracing::info!("Loaded ratings in {:?}", start.elapsed());

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Recommend {
            user,
            limit,
            explain,
            json,
        } => handle_recommend(matrix, user, limit, explain, json)?,
        Commands::User { user } => handle_user(matrix, user)?,
        Commands::Similar { user, limit } => handle_similar(matrix, user, limit)?,
        Commands::Benchmark { requests, limit } => handle_benchmark(matrix, requests, limit)?,
    }

    Ok(())
}

/// Convert a 1-based user number into a row index
fn user_index(matrix: &RatingMatrix, user: usize) -> Result<UserIndex> {
    if user == 0 || user > matrix.user_count() {
        bail!(
            "User {} not found (valid users: 1..={})",
            user,
            matrix.user_count()
        );
    }
    Ok(user - 1)
}

/// Neighbors listed by `--explain`
const EXPLAIN_NEIGHBORS: usize = 5;

fn item_number(item: ItemIndex) -> usize {
    item + 1
}

/// Handle the 'recommend' command
fn handle_recommend(
    matrix: Arc<RatingMatrix>,
    user: usize,
    limit: usize,
    explain: bool,
    json: bool,
) -> Result<()> {
    let target = user_index(&matrix, user)?;
    let recommender = Recommender::new(matrix);

    let report = recommender
        .explain(target, limit)
        .context("Failed to compute recommendations")?;

    if json {
        let output = json_output(user, &report, explain);
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    print_recommendations(user, limit, &report.recommendations);

    if explain {
        print_explanation(&report);
    }
    Ok(())
}

/// Build the `--json` document; `explain` adds every prediction and the
/// nearest neighbors, numbered from 1 like the rest of the output
fn json_output(user: usize, report: &RecommendationReport, explain: bool) -> JsonOutput {
    let recommendations = report
        .recommendations
        .iter()
        .enumerate()
        .map(|(rank, rec)| JsonRecommendation {
            rank: rank + 1,
            item: item_number(rec.item),
            predicted_rating: rec.predicted_rating,
        })
        .collect();

    let predictions = explain.then(|| {
        report
            .predictions
            .values()
            .iter()
            .enumerate()
            .map(|(item, slot)| JsonPrediction {
                item: item_number(item),
                predicted_rating: *slot,
            })
            .collect()
    });

    let neighbors = explain.then(|| {
        report
            .similarities
            .top_neighbors(EXPLAIN_NEIGHBORS)
            .into_iter()
            .map(|(other, similarity)| JsonNeighbor {
                user: other + 1,
                similarity,
            })
            .collect()
    });

    JsonOutput {
        user,
        recommendations,
        predictions,
        neighbors,
    }
}

/// Handle the 'user' command
fn handle_user(matrix: Arc<RatingMatrix>, user: usize) -> Result<()> {
    let target = user_index(&matrix, user)?;
    let stats = matrix.user_stats_for(target)?;

    println!("{}", format!("User {}", user).bold().blue());
    println!("{}Rated items: {} of {}", "• ".cyan(), stats.rated_count, matrix.item_count());
    println!("{}Average rating: {:.2}", "• ".cyan(), stats.mean_rating);

    println!("Top rated items:");
    for (item, rating) in matrix.top_rated_items(target, 5)? {
        println!("  - Item {} (Rating: {})", item_number(item), rating);
    }

    let neighbors = SimilarityEngine::new(matrix.clone()).nearest_neighbors(target, 3)?;
    println!("Most similar users:");
    for (other, score) in neighbors {
        println!("  - User {} (similarity {:+.3})", other + 1, score);
    }
    Ok(())
}

/// Handle the 'similar' command
fn handle_similar(matrix: Arc<RatingMatrix>, user: usize, limit: usize) -> Result<()> {
    let target = user_index(&matrix, user)?;
    let neighbors = SimilarityEngine::new(matrix).nearest_neighbors(target, limit)?;

    println!("{}", format!("Users most similar to User {}:", user).bold().blue());
    for (rank, (other, score)) in neighbors.iter().enumerate() {
        let score_str = format!("{:+.4}", score);
        let score_str = if *score > 0.0 {
            score_str.green()
        } else if *score < 0.0 {
            score_str.red()
        } else {
            score_str.normal()
        };
        println!("{}. User {} {}", (rank + 1).to_string().green(), other + 1, score_str);
    }
    Ok(())
}

/// Handle the 'benchmark' command
fn handle_benchmark(matrix: Arc<RatingMatrix>, requests: usize, limit: usize) -> Result<()> {
    if matrix.is_empty() {
        bail!("Cannot benchmark an empty ratings matrix");
    }
    if requests == 0 {
        bail!("Benchmark needs at least one request");
    }

    let recommender = Recommender::new(matrix.clone());

    // Random target users
    let targets: Vec<UserIndex> = (0..requests)
        .map(|_| rand::random_range(0..matrix.user_count()))
        .collect();

    // Sequential requests for per-request latency
    let mut timings: Vec<Duration> = Vec::with_capacity(requests);
    for &target in &targets {
        let start = Instant::now();
        recommender.recommend(target, limit)?;
        timings.push(start.elapsed());
    }

    // One parallel batch for throughput
    let batch_start = Instant::now();
    let failed = recommender
        .recommend_batch(&targets, limit)
        .iter()
        .filter(|r| r.is_err())
        .count();
    let batch_time = batch_start.elapsed();

    let total_time: Duration = timings.iter().sum();
    let avg_latency = total_time / (timings.len() as u32);
    timings.sort();
    let p50 = timings[timings.len() / 2];
    let p95 = timings[((timings.len() as f64 * 0.95) as usize).min(timings.len() - 1)];
    let p99 = timings[((timings.len() as f64 * 0.99) as usize).min(timings.len() - 1)];

    println!("Benchmark results:");
    println!("Sequential total time: {:?}", total_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", p50);
    println!("P95 latency: {:?}", p95);
    println!("P99 latency: {:?}", p99);
    println!(
        "Sequential throughput: {:.2} requests/second",
        requests as f64 / total_time.as_secs_f64()
    );
    println!(
        "Parallel batch: {:?} ({:.2} requests/second, {} failed)",
        batch_time,
        requests as f64 / batch_time.as_secs_f64(),
        failed
    );

    Ok(())
}

/// Helper function to format and print recommendations
fn print_recommendations(user: usize, limit: usize, list: &RecommendationList) {
    println!(
        "{}",
        format!("Top {} recommendations for User {}:", limit, user).bold().blue()
    );
    if list.is_empty() {
        println!("  (no item has a positive predicted rating)");
        return;
    }
    for (rank, rec) in list.iter().enumerate() {
        println!(
            "{}. Item {} with predicted rating {:.3}",
            (rank + 1).to_string().green(),
            item_number(rec.item),
            rec.predicted_rating
        );
    }
}

/// Print every prediction and the strongest neighbors behind them
fn print_explanation(report: &RecommendationReport) {
    println!("\n{}", "Predictions:".bold());
    for (item, slot) in report.predictions.values().iter().enumerate() {
        match slot {
            Some(p) if *p == 0.0 => {
                println!("  Item {}: no confident prediction", item_number(item))
            }
            Some(p) => println!("  Item {}: {:.3}", item_number(item), p),
            None => println!("  Item {}: {}", item_number(item), "already rated".dimmed()),
        }
    }

    println!("\n{}", "Nearest neighbors:".bold());
    for (other, score) in report.similarities.top_neighbors(EXPLAIN_NEIGHBORS) {
        println!("  User {}: {:+.3}", other + 1, score);
    }
}
