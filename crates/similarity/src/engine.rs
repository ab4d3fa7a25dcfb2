//! Similarity Engine - target user versus every other user
//!
//! Builds a `SimilarityVector` for one target user by scoring the target's
//! row against every other row of the matrix.
//!
//! ## Algorithm
//! 1. Validate the target index
//! 2. Score each other user with the configured `SimilarityMeasure`
//!    (rayon, one task per user; every pair is independent)
//! 3. Leave the target's own slot unset, so it can never act as its
//!    own neighbor

use crate::measure::{AdjustedCosine, SimilarityMeasure};
use data_loader::{RatingMatrix, Result, UserIndex};
use rayon::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Similarity of one target user to every user in the matrix.
///
/// Indexed like the matrix rows. The target's own slot holds no score
/// (`None`, serialized as `null`); it is excluded by index, never by value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarityVector {
    target: UserIndex,
    scores: Vec<Option<f64>>,
}

impl SimilarityVector {
    /// Build from raw scores. `scores[target]` is discarded.
    pub fn new(target: UserIndex, scores: Vec<f64>) -> Self {
        let scores = scores
            .into_iter()
            .enumerate()
            .map(|(user, s)| (user != target).then_some(s))
            .collect();
        Self { target, scores }
    }

    pub fn target(&self) -> UserIndex {
        self.target
    }

    /// Number of slots, including the target's own
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Score for `user`, or `None` for the target itself or an unknown index
    pub fn get(&self, user: UserIndex) -> Option<f64> {
        self.scores.get(user).copied().flatten()
    }

    /// Every other user with their score, in index order
    pub fn neighbors(&self) -> impl Iterator<Item = (UserIndex, f64)> + '_ {
        self.scores
            .iter()
            .enumerate()
            .filter_map(|(user, s)| s.map(|score| (user, score)))
    }

    /// The `n` most similar other users, highest score first.
    ///
    /// Ties are broken by ascending user index.
    pub fn top_neighbors(&self, n: usize) -> Vec<(UserIndex, f64)> {
        let mut ranked: Vec<(UserIndex, f64)> = self.neighbors().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        ranked.truncate(n);
        ranked
    }
}

/// Scores a target user against every other user of a shared matrix
#[derive(Clone)]
pub struct SimilarityEngine {
    /// Shared reference to the ratings (read-only, so no Mutex needed)
    matrix: Arc<RatingMatrix>,

    measure: Arc<dyn SimilarityMeasure>,
}

impl SimilarityEngine {
    /// Create an engine using adjusted cosine similarity
    pub fn new(matrix: Arc<RatingMatrix>) -> Self {
        Self {
            matrix,
            measure: Arc::new(AdjustedCosine),
        }
    }

    /// Swap the similarity measure (default: `AdjustedCosine`)
    pub fn with_measure(mut self, measure: impl SimilarityMeasure + 'static) -> Self {
        self.measure = Arc::new(measure);
        self
    }

    pub fn matrix(&self) -> &Arc<RatingMatrix> {
        &self.matrix
    }

    /// Similarity between two users of the matrix
    pub fn similarity(&self, a: UserIndex, b: UserIndex) -> Result<f64> {
        let row_a = self.matrix.user(a)?;
        let row_b = self.matrix.user(b)?;
        Ok(self.measure.similarity(row_a, row_b))
    }

    /// Build the full similarity vector for `target`
    #[instrument(skip(self), fields(measure = self.measure.name()))]
    pub fn similarity_vector(&self, target: UserIndex) -> Result<SimilarityVector> {
        let target_row = self.matrix.user(target)?;
        let rows: Vec<_> = self.matrix.rows().collect();

        let scores: Vec<Option<f64>> = rows
            .par_iter()
            .enumerate()
            .map(|(user, row)| (user != target).then(|| self.measure.similarity(target_row, row)))
            .collect();

        debug!(
            "Scored user {} against {} other users",
            target,
            scores.len().saturating_sub(1)
        );
        Ok(SimilarityVector { target, scores })
    }

    /// The `n` users most similar to `target`
    pub fn nearest_neighbors(
        &self,
        target: UserIndex,
        n: usize,
    ) -> Result<Vec<(UserIndex, f64)>> {
        Ok(self.similarity_vector(target)?.top_neighbors(n))
    }
}
