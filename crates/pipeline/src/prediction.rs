//! Rating prediction for the items a target user has not rated.
//!
//! ## Algorithm
//! For each item `m` the target left unrated, over every other user `u`
//! who rated `m`:
//!
//! ```text
//! weighted_sum += sim(u) * rating(u, m)
//! weight_total += |sim(u)|
//! prediction    = weighted_sum / weight_total   (0 if weight_total == 0)
//! ```
//!
//! A negative neighbor pulls the prediction down while still adding to
//! the total weight, so a strongly dissimilar rater counts as uncertainty
//! rather than being ignored. Predictions can therefore be negative.

use data_loader::{is_rated, ItemIndex, RatingMatrix, Result, UserIndex};
use rayon::prelude::*;
use serde::Serialize;
use similarity::{SimilarityEngine, SimilarityMeasure, SimilarityVector};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Predicted ratings of one target user, one slot per item.
///
/// A slot is `None` when the target already rated the item; such items
/// are never candidates for recommendation. `Some(0.0)` means no
/// neighbor gave a usable signal ("no confident prediction"), which is
/// deliberately not distinguished from a predicted rating of zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionVector {
    target: UserIndex,
    values: Vec<Option<f64>>,
}

impl PredictionVector {
    pub fn new(target: UserIndex, values: Vec<Option<f64>>) -> Self {
        Self { target, values }
    }

    pub fn target(&self) -> UserIndex {
        self.target
    }

    /// Number of items, rated or not
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Raw slots in item order
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Prediction for `item`; `None` if already rated or out of range
    pub fn get(&self, item: ItemIndex) -> Option<f64> {
        self.values.get(item).copied().flatten()
    }

    /// True if `item` was unrated by the target
    pub fn is_candidate(&self, item: ItemIndex) -> bool {
        self.get(item).is_some()
    }

    /// Unrated items with their predictions, in item order
    pub fn candidates(&self) -> impl Iterator<Item = (ItemIndex, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(item, v)| v.map(|p| (item, p)))
    }

    /// Flat per-item scores with already-rated items reported as 0
    pub fn scores(&self) -> Vec<f64> {
        self.values.iter().map(|v| v.unwrap_or(0.0)).collect()
    }
}

/// Predicts ratings from neighbor similarities
#[derive(Clone)]
pub struct PredictionEngine {
    similarity: SimilarityEngine,
}

impl PredictionEngine {
    /// Create an engine over a shared matrix using adjusted cosine similarity
    pub fn new(matrix: Arc<RatingMatrix>) -> Self {
        Self {
            similarity: SimilarityEngine::new(matrix),
        }
    }

    /// Swap the similarity measure (default: `AdjustedCosine`)
    pub fn with_measure(mut self, measure: impl SimilarityMeasure + 'static) -> Self {
        self.similarity = self.similarity.with_measure(measure);
        self
    }

    pub fn similarity_engine(&self) -> &SimilarityEngine {
        &self.similarity
    }

    /// Predict every unrated item for `target`.
    ///
    /// Fails with `InvalidUser` for an empty matrix or an out-of-range target.
    #[instrument(skip(self))]
    pub fn predict(&self, target: UserIndex) -> Result<PredictionVector> {
        let similarities = self.similarity.similarity_vector(target)?;
        self.predict_with(&similarities)
    }

    /// Predict using an already computed similarity vector.
    ///
    /// Users missing from `similarities` contribute nothing.
    pub fn predict_with(&self, similarities: &SimilarityVector) -> Result<PredictionVector> {
        let matrix = self.similarity.matrix();
        let target = similarities.target();
        let target_row = matrix.user(target)?;

        // Only neighbors with a finite, non-zero weight can move a prediction
        let neighbors: Vec<(&[f64], f64)> = matrix
            .rows()
            .enumerate()
            .filter_map(|(user, row)| {
                let sim = similarities.get(user)?;
                (sim != 0.0 && sim.is_finite()).then_some((row, sim))
            })
            .collect();

        let values: Vec<Option<f64>> = target_row
            .par_iter()
            .enumerate()
            .map(|(item, &own)| {
                if is_rated(own) {
                    None
                } else {
                    Some(predict_item(&neighbors, item))
                }
            })
            .collect();

        let candidates = values.iter().filter(|v| v.is_some()).count();
        debug!(
            "Predicted {} unrated items for user {} from {} weighted neighbors",
            candidates,
            target,
            neighbors.len()
        );
        Ok(PredictionVector::new(target, values))
    }
}

/// Similarity-weighted average of the neighbors who rated `item`
fn predict_item(neighbors: &[(&[f64], f64)], item: ItemIndex) -> f64 {
    let (weighted_sum, weight_total) = neighbors
        .iter()
        .filter(|(row, _)| is_rated(row[item]))
        .fold((0.0, 0.0), |(sum, total), (row, sim)| {
            (sum + sim * row[item], total + sim.abs())
        });

    if weight_total > 0.0 {
        weighted_sum / weight_total
    } else {
        0.0
    }
}
