//! # Recommender
//!
//! Coordinates the recommendation flow for a target user:
//! 1. Score the target against every other user (similarity vector)
//! 2. Predict ratings for the target's unrated items
//! 3. Rank and select the top K
//!
//! Every request is recomputed from scratch over the shared, immutable
//! `RatingMatrix`. Independent targets can be served in parallel with
//! [`Recommender::recommend_batch`].

use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info, instrument};

use data_loader::{RatingMatrix, Result, UserIndex};
use similarity::{SimilarityMeasure, SimilarityVector};

use crate::prediction::{PredictionEngine, PredictionVector};
use crate::ranker::{Ranker, RecommendationList};

/// Recommendations together with the intermediate vectors they came from
#[derive(Debug, Clone, Serialize)]
pub struct RecommendationReport {
    pub recommendations: RecommendationList,
    pub predictions: PredictionVector,
    pub similarities: SimilarityVector,
}

/// Main entry point for producing recommendations
#[derive(Clone)]
pub struct Recommender {
    predictor: PredictionEngine,
    ranker: Ranker,
}

impl Recommender {
    /// Create a recommender over a shared matrix (adjusted cosine similarity)
    pub fn new(matrix: Arc<RatingMatrix>) -> Self {
        Self {
            predictor: PredictionEngine::new(matrix),
            ranker: Ranker,
        }
    }

    /// Swap the similarity measure (default: `AdjustedCosine`)
    pub fn with_measure(mut self, measure: impl SimilarityMeasure + 'static) -> Self {
        self.predictor = self.predictor.with_measure(measure);
        self
    }

    pub fn matrix(&self) -> &Arc<RatingMatrix> {
        self.predictor.similarity_engine().matrix()
    }

    /// Top `k` recommendations for `target`
    #[instrument(skip(self))]
    pub fn recommend(&self, target: UserIndex, k: usize) -> Result<RecommendationList> {
        let start_time = Instant::now();

        let predictions = self.predictor.predict(target)?;
        let recommendations = self.ranker.top_n(&predictions, k);

        debug!(
            "Selected {} of {} candidates for user {} in {:.2?}",
            recommendations.len(),
            predictions.candidates().count(),
            target,
            start_time.elapsed()
        );
        Ok(recommendations)
    }

    /// Top `k` recommendations plus the full prediction and similarity vectors
    pub fn explain(&self, target: UserIndex, k: usize) -> Result<RecommendationReport> {
        let similarities = self
            .predictor
            .similarity_engine()
            .similarity_vector(target)?;
        let predictions = self.predictor.predict_with(&similarities)?;
        let recommendations = self.ranker.top_n(&predictions, k);

        Ok(RecommendationReport {
            recommendations,
            predictions,
            similarities,
        })
    }

    /// Recommendations for many targets, computed in parallel.
    ///
    /// Results come back in the same order as `targets`; one bad index
    /// fails only its own entry.
    pub fn recommend_batch(
        &self,
        targets: &[UserIndex],
        k: usize,
    ) -> Vec<Result<RecommendationList>> {
        let start_time = Instant::now();

        let results: Vec<Result<RecommendationList>> = targets
            .par_iter()
            .map(|&target| self.recommend(target, k))
            .collect();

        let failed = results.iter().filter(|r| r.is_err()).count();
        info!(
            "Served {} recommendation requests ({} failed) in {:.2?}",
            targets.len(),
            failed,
            start_time.elapsed()
        );
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::RatingsError;

    fn create_test_recommender() -> Recommender {
        let matrix = RatingMatrix::new(vec![
            vec![5.0, 4.0, 0.0, 1.0, 0.0],
            vec![5.0, 4.0, 4.0, 1.0, 2.0],
            vec![4.0, 5.0, 5.0, 2.0, 0.0],
            vec![1.0, 2.0, 0.0, 5.0, 4.0],
        ])
        .unwrap();
        Recommender::new(Arc::new(matrix))
    }

    #[test]
    fn test_recommend_excludes_rated_items() {
        let recommender = create_test_recommender();
        let list = recommender.recommend(0, 5).unwrap();

        assert!(!list.is_empty());
        for rec in &list {
            assert!(rec.item == 2 || rec.item == 4);
            assert!(rec.predicted_rating > 0.0);
        }
    }

    #[test]
    fn test_explain_matches_recommend() {
        let recommender = create_test_recommender();
        let report = recommender.explain(0, 5).unwrap();

        assert_eq!(report.recommendations, recommender.recommend(0, 5).unwrap());
        assert_eq!(report.predictions.len(), 5);
        assert_eq!(report.similarities.len(), 4);
        assert_eq!(report.similarities.get(0), None);
    }

    #[test]
    fn test_batch_preserves_order_and_errors() {
        let recommender = create_test_recommender();
        let results = recommender.recommend_batch(&[3, 9, 0], 2);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().target, 3);
        assert!(matches!(results[1], Err(RatingsError::InvalidUser { index: 9, .. })));
        assert_eq!(
            results[2].as_ref().unwrap(),
            &recommender.recommend(0, 2).unwrap()
        );
    }

    #[test]
    fn test_zero_k() {
        let recommender = create_test_recommender();
        assert!(recommender.recommend(0, 0).unwrap().is_empty());
    }
}
