//! # Data Loader Crate
//!
//! This crate owns the user–item rating matrix and loads it from CSV.
//!
//! ## Main Components
//!
//! - **types**: `RatingMatrix`, index aliases, per-user and per-item stats
//! - **parser**: Parse comma-separated rating files into raw rows
//! - **index**: Load a validated matrix from disk and derive statistics
//! - **error**: `RatingsError`, shared by every crate in the workspace
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::RatingMatrix;
//! use std::path::Path;
//!
//! let matrix = RatingMatrix::load_from_file(Path::new("data/ratings_data.csv"))?;
//! let (users, items, ratings) = matrix.counts();
//! println!("{} users rated {} of {} cells", users, ratings, users * items);
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;

// Re-export commonly used types for convenience
pub use error::{RatingsError, Result};
pub use types::{
    is_rated,
    ItemIndex,
    ItemStats,
    Rating,
    RatingMatrix,
    UserIndex,
    UserStats,
    UNRATED,
};
