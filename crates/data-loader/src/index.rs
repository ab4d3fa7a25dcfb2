//! Loading a `RatingMatrix` from disk and computing summary statistics.
//!
//! Statistics are derived on demand rather than stored, since the matrix
//! itself never changes after it is built.

use crate::error::Result;
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info};

impl RatingMatrix {
    /// Load a ratings CSV file and build a validated matrix.
    ///
    /// Steps:
    /// 1. Parse the file into raw rows
    /// 2. Build the matrix (rejects ragged rows)
    /// 3. Log the resulting shape
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading ratings from {:?}", path);

        let rows = parser::parse_ratings_file(path)?;
        debug!("Parsed {} rows", rows.len());

        let matrix = RatingMatrix::new(rows)?;

        let (users, items, ratings) = matrix.counts();
        info!(
            "Loaded {} users, {} items, {} ratings",
            users, items, ratings
        );
        Ok(matrix)
    }

    /// Per-user rated count and mean, indexed by user
    pub fn user_stats(&self) -> Vec<UserStats> {
        let rows: Vec<&[Rating]> = self.rows().collect();
        rows.par_iter()
            .enumerate()
            .map(|(user, row)| row_stats(user, row))
            .collect()
    }

    /// Rated count and mean of a single user
    pub fn user_stats_for(&self, user: UserIndex) -> Result<UserStats> {
        Ok(row_stats(user, self.user(user)?))
    }

    /// Per-item rater count and mean, indexed by item
    pub fn item_stats(&self) -> Vec<ItemStats> {
        (0..self.item_count())
            .into_par_iter()
            .map(|item| {
                let (sum, rater_count) = sum_rated(self.rows().map(|row| row[item]));
                ItemStats {
                    item,
                    rater_count,
                    mean_rating: mean(sum, rater_count),
                }
            })
            .collect()
    }

    /// Items a user rated, highest rating first (ties by item index)
    pub fn top_rated_items(
        &self,
        user: UserIndex,
        limit: usize,
    ) -> Result<Vec<(ItemIndex, Rating)>> {
        let row = self.user(user)?;
        let mut rated: Vec<(ItemIndex, Rating)> = row
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, v)| is_rated(v))
            .collect();

        rated.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        rated.truncate(limit);
        Ok(rated)
    }
}

fn row_stats(user: UserIndex, row: &[Rating]) -> UserStats {
    let (sum, rated_count) = sum_rated(row.iter().copied());
    UserStats {
        user,
        rated_count,
        mean_rating: mean(sum, rated_count),
    }
}

fn sum_rated(values: impl Iterator<Item = Rating>) -> (f64, usize) {
    values
        .filter(|&v| is_rated(v))
        .fold((0.0, 0), |(sum, count), v| (sum + v, count + 1))
}

fn mean(sum: f64, count: usize) -> f64 {
    if count > 0 { sum / count as f64 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RatingsError;

    fn sample() -> RatingMatrix {
        RatingMatrix::new(vec![
            vec![5.0, 3.0, 0.0, 1.0],
            vec![4.0, 0.0, 0.0, 1.0],
            vec![0.0, 0.0, 0.0, 0.0],
        ])
        .unwrap()
    }

    #[test]
    fn test_user_stats() {
        let stats = sample().user_stats();

        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].rated_count, 3);
        assert!((stats[0].mean_rating - 3.0).abs() < 1e-12);
        assert_eq!(stats[1].user, 1);
        assert!((stats[1].mean_rating - 2.5).abs() < 1e-12);
        assert_eq!(stats[2].rated_count, 0);
        assert_eq!(stats[2].mean_rating, 0.0);
    }

    #[test]
    fn test_user_stats_for_single_user() {
        let matrix = sample();
        let all = matrix.user_stats();

        for user in 0..matrix.user_count() {
            assert_eq!(matrix.user_stats_for(user).unwrap(), all[user]);
        }
        assert!(matches!(
            matrix.user_stats_for(3),
            Err(RatingsError::InvalidUser { index: 3, user_count: 3 })
        ));
    }

    #[test]
    fn test_item_stats() {
        let stats = sample().item_stats();

        assert_eq!(stats.len(), 4);
        assert_eq!(stats[0].rater_count, 2);
        assert!((stats[0].mean_rating - 4.5).abs() < 1e-12);
        assert_eq!(stats[2].rater_count, 0);
        assert_eq!(stats[2].mean_rating, 0.0);
        assert_eq!(stats[3].item, 3);
    }

    #[test]
    fn test_top_rated_items() {
        let matrix = sample();
        assert_eq!(matrix.top_rated_items(0, 2).unwrap(), vec![(0, 5.0), (1, 3.0)]);
        assert!(matrix.top_rated_items(2, 5).unwrap().is_empty());
        assert!(matches!(
            matrix.top_rated_items(9, 5),
            Err(RatingsError::InvalidUser { index: 9, .. })
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join("data_loader_index_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ratings.csv");
        std::fs::write(&path, "5,3,0,1\n4,0,0,1\n").unwrap();

        let matrix = RatingMatrix::load_from_file(&path).unwrap();
        assert_eq!(matrix.counts(), (2, 4, 5));
    }

    #[test]
    fn test_load_ragged_file() {
        let dir = std::env::temp_dir().join("data_loader_index_ragged_test");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ratings.csv");
        std::fs::write(&path, "5,3,0,1\n4,0,1\n").unwrap();

        let err = RatingMatrix::load_from_file(&path).unwrap_err();
        assert!(matches!(
            err,
            RatingsError::DimensionMismatch { row: 1, expected: 4, found: 3 }
        ));
    }
}
