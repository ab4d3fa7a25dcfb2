//! Ranking predictions into a top-K recommendation list.
//!
//! ## Algorithm
//! 1. Pair each candidate item with its prediction
//! 2. Sort descending by prediction, ties by ascending item index
//! 3. Take the first `k`
//! 4. Drop anything not strictly positive (0 means "no prediction")

use crate::prediction::PredictionVector;
use data_loader::{ItemIndex, UserIndex};
use serde::Serialize;

/// One recommended item
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Recommendation {
    pub item: ItemIndex,
    pub predicted_rating: f64,
}

/// Ranked recommendations for one target user.
///
/// Strictly positive scores only, highest first, never longer than the
/// `k` it was ranked with.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RecommendationList {
    pub target: UserIndex,
    pub entries: Vec<Recommendation>,
}

impl RecommendationList {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recommended item indices, best first
    pub fn items(&self) -> Vec<ItemIndex> {
        self.entries.iter().map(|r| r.item).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Recommendation> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a RecommendationList {
    type Item = &'a Recommendation;
    type IntoIter = std::slice::Iter<'a, Recommendation>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Selects the top-K positive predictions.
///
/// `k == 0` is not an error; it yields an empty list.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker;

impl Ranker {
    pub fn top_n(&self, predictions: &PredictionVector, k: usize) -> RecommendationList {
        let mut ranked: Vec<Recommendation> = predictions
            .candidates()
            .map(|(item, predicted_rating)| Recommendation {
                item,
                predicted_rating,
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.predicted_rating
                .total_cmp(&a.predicted_rating)
                .then(a.item.cmp(&b.item))
        });
        ranked.truncate(k);
        ranked.retain(|r| r.predicted_rating > 0.0);

        RecommendationList {
            target: predictions.target(),
            entries: ranked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn predictions(values: Vec<Option<f64>>) -> PredictionVector {
        PredictionVector::new(0, values)
    }

    #[test]
    fn test_sorted_descending() {
        let list = Ranker.top_n(&predictions(vec![Some(2.0), Some(4.5), Some(3.0)]), 3);
        assert_eq!(list.items(), vec![1, 2, 0]);
        assert_eq!(list.entries[0].predicted_rating, 4.5);
    }

    #[test]
    fn test_ties_broken_by_item_index() {
        let list = Ranker.top_n(&predictions(vec![Some(3.0), Some(4.0), Some(3.0), Some(4.0)]), 4);
        assert_eq!(list.items(), vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_truncates_to_k() {
        let list = Ranker.top_n(&predictions(vec![Some(1.0), Some(2.0), Some(3.0)]), 2);
        assert_eq!(list.items(), vec![2, 1]);
    }

    #[test]
    fn test_zero_k_is_empty() {
        let list = Ranker.top_n(&predictions(vec![Some(5.0)]), 0);
        assert!(list.is_empty());
    }

    #[test]
    fn test_drops_zero_and_negative_predictions() {
        let list = Ranker.top_n(
            &predictions(vec![Some(0.0), Some(-2.0), Some(1.5), Some(0.0)]),
            10,
        );
        assert_eq!(list.items(), vec![2]);
    }

    #[test]
    fn test_skips_already_rated_items() {
        let list = Ranker.top_n(&predictions(vec![None, Some(2.0), None]), 3);
        assert_eq!(list.items(), vec![1]);
        assert_eq!(list.target, 0);
    }
}
