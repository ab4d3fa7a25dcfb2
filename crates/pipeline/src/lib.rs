//! Prediction and ranking for user-based collaborative filtering.
//!
//! This crate provides:
//! - `PredictionEngine` for similarity-weighted rating predictions
//! - `Ranker` for selecting the top-K positive predictions
//! - `Recommender`, which runs similarity → prediction → ranking
//!
//! ## Architecture
//! Data flows one way for each request:
//! 1. `RatingMatrix` → `SimilarityVector` (similarity crate)
//! 2. `SimilarityVector` → `PredictionVector`
//! 3. `PredictionVector` → `RecommendationList`
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::Recommender;
//! use std::sync::Arc;
//!
//! let recommender = Recommender::new(Arc::new(matrix));
//! let list = recommender.recommend(0, 5)?;
//! for rec in &list {
//!     println!("item {} -> {:.3}", rec.item, rec.predicted_rating);
//! }
//! ```

pub mod prediction;
pub mod ranker;
pub mod recommender;

// Re-export main types
pub use prediction::{PredictionEngine, PredictionVector};
pub use ranker::{Ranker, Recommendation, RecommendationList};
pub use recommender::{RecommendationReport, Recommender};
