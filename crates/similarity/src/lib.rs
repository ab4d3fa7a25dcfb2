//! # Similarity Crate
//!
//! User-to-user similarity for collaborative filtering.
//!
//! ## Components
//!
//! ### Measures
//! `SimilarityMeasure` is the seam for scoring two rating rows.
//! `AdjustedCosine` centers each user's co-rated ratings on their mean
//! over the co-rated items before taking the cosine, which removes the
//! bias of users who rate everything high or everything low.
//!
//! ### Engine
//! `SimilarityEngine` scores one target user against every other user of
//! a shared `RatingMatrix` and returns a `SimilarityVector`.
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::RatingMatrix;
//! use similarity::SimilarityEngine;
//! use std::sync::Arc;
//!
//! let matrix = Arc::new(RatingMatrix::load_from_file(path)?);
//! let engine = SimilarityEngine::new(matrix.clone());
//!
//! let sims = engine.similarity_vector(0)?;
//! for (user, score) in sims.top_neighbors(5) {
//!     println!("user {user}: {score:.3}");
//! }
//! ```

pub mod measure;
pub mod engine;

pub use measure::{adjusted_cosine_similarity, AdjustedCosine, SimilarityMeasure};
pub use engine::{SimilarityEngine, SimilarityVector};
