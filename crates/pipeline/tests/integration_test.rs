//! Integration tests for the recommendation flow.
//!
//! These tests run similarity, prediction and ranking together over
//! small hand-checked matrices.

use data_loader::{RatingMatrix, RatingsError};
use pipeline::{PredictionEngine, Ranker, Recommender};
use similarity::SimilarityEngine;
use std::sync::Arc;

fn create_reference_matrix() -> Arc<RatingMatrix> {
    Arc::new(
        RatingMatrix::new(vec![
            vec![5.0, 3.0, 0.0, 1.0],
            vec![4.0, 0.0, 0.0, 1.0],
            vec![1.0, 1.0, 0.0, 5.0],
            vec![1.0, 0.0, 0.0, 4.0],
            vec![0.0, 1.0, 5.0, 4.0],
        ])
        .unwrap(),
    )
}

#[test]
fn test_reference_scenario_prediction() {
    let matrix = create_reference_matrix();
    let predictor = PredictionEngine::new(matrix.clone());

    let predictions = predictor.predict(0).unwrap();

    // Item 2 is the only item user 0 has not rated
    let candidates: Vec<_> = predictions.candidates().map(|(item, _)| item).collect();
    assert_eq!(candidates, vec![2]);

    // Only user 4 rated item 2 (a 5). Over the co-rated items 1 and 3,
    // user 0 rated (3, 1) and user 4 rated (1, 4): adjusted similarity -1.
    let sim = SimilarityEngine::new(matrix).similarity(0, 4).unwrap();
    assert!((sim + 1.0).abs() < 1e-9);

    let predicted = predictions.get(2).unwrap();
    assert_eq!(format!("{:.6}", predicted), "-5.000000");
}

#[test]
fn test_reference_scenario_recommendations() {
    let recommender = Recommender::new(create_reference_matrix());
    let list = recommender.recommend(0, 2).unwrap();

    // One candidate at most, and its prediction is negative
    assert!(list.len() <= 1);
    assert!(list.is_empty());
}

#[test]
fn test_user_without_overlap_gets_nothing() {
    let matrix = Arc::new(
        RatingMatrix::new(vec![
            vec![5.0, 0.0, 0.0, 0.0],
            vec![0.0, 3.0, 4.0, 0.0],
            vec![0.0, 2.0, 0.0, 5.0],
        ])
        .unwrap(),
    );

    let predictions = PredictionEngine::new(matrix.clone()).predict(0).unwrap();
    assert!(predictions.scores().iter().all(|&p| p == 0.0));

    let list = Recommender::new(matrix).recommend(0, 3).unwrap();
    assert!(list.is_empty());
}

#[test]
fn test_zero_k_returns_empty_list() {
    let matrix = Arc::new(
        RatingMatrix::new(vec![vec![5.0, 1.0, 0.0], vec![5.0, 1.0, 4.0]]).unwrap(),
    );
    let recommender = Recommender::new(matrix);

    assert_eq!(recommender.recommend(0, 1).unwrap().len(), 1);
    assert!(recommender.recommend(0, 0).unwrap().is_empty());
}

#[test]
fn test_constant_co_ratings_give_zero_predictions() {
    // Everyone agrees with user 0 wherever both rated, but user 0 rated
    // everything the same, so every centered vector is zero.
    let matrix = Arc::new(
        RatingMatrix::new(vec![
            vec![3.0, 3.0, 0.0, 0.0],
            vec![3.0, 3.0, 4.0, 0.0],
            vec![3.0, 3.0, 0.0, 2.0],
        ])
        .unwrap(),
    );

    let engine = SimilarityEngine::new(matrix.clone());
    let sims = engine.similarity_vector(0).unwrap();
    assert!(sims.neighbors().all(|(_, s)| s == 0.0));

    let predictions = PredictionEngine::new(matrix.clone()).predict(0).unwrap();
    assert_eq!(predictions.get(2), Some(0.0));
    assert_eq!(predictions.get(3), Some(0.0));
    assert!(Recommender::new(matrix).recommend(0, 5).unwrap().is_empty());
}

#[test]
fn test_invalid_target_user() {
    let recommender = Recommender::new(create_reference_matrix());
    let err = recommender.recommend(5, 2).unwrap_err();
    assert!(matches!(err, RatingsError::InvalidUser { index: 5, user_count: 5 }));

    let empty = Recommender::new(Arc::new(RatingMatrix::empty()));
    assert!(matches!(empty.recommend(0, 2), Err(RatingsError::InvalidUser { .. })));
}

#[test]
fn test_ragged_matrix_rejected_before_prediction() {
    let err = RatingMatrix::new(vec![vec![1.0, 2.0, 3.0], vec![1.0, 2.0]]).unwrap_err();
    assert!(matches!(err, RatingsError::DimensionMismatch { row: 1, .. }));
}

#[test]
fn test_recommendations_are_idempotent() {
    let recommender = Recommender::new(create_reference_matrix());

    for target in 0..5 {
        let first = recommender.recommend(target, 3).unwrap();
        let second = recommender.recommend(target, 3).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}

#[test]
fn test_batch_matches_single_requests() {
    let recommender = Recommender::new(create_reference_matrix());
    let targets: Vec<usize> = (0..5).collect();

    let batch = recommender.recommend_batch(&targets, 3);
    for (target, result) in targets.iter().zip(batch) {
        assert_eq!(result.unwrap(), recommender.recommend(*target, 3).unwrap());
    }
}

#[test]
fn test_full_flow_from_csv_text() {
    let rows = data_loader::parser::parse_ratings(
        "5,4,0,1,0\n5,4,4,1,2\n4,5,5,2,0\n1,2,0,5,4\n",
        "inline.csv",
    )
    .unwrap();
    let matrix = Arc::new(RatingMatrix::new(rows).unwrap());

    let predictions = PredictionEngine::new(matrix.clone()).predict(0).unwrap();
    let list = Ranker.top_n(&predictions, 5);

    // Item 4 is pulled negative by user 3, who mirrors user 0
    assert_eq!(list.items(), vec![2]);
    assert!(list.entries[0].predicted_rating > 4.0);
}
