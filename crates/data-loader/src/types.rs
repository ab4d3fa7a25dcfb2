//! Core domain types for the user–item rating matrix.
//!
//! Users and items are identified only by their position: a user is a
//! row, an item is a column. All rows share one item ordering.

use crate::error::{RatingsError, Result};
use serde::Serialize;

// =============================================================================
// Type Aliases
// =============================================================================

/// Zero-based row position of a user in a `RatingMatrix`
pub type UserIndex = usize;

/// Zero-based column position of an item in a `RatingMatrix`
pub type ItemIndex = usize;

/// A single rating value. `0.0` means the item is unrated.
pub type Rating = f64;

/// The value that marks an item as unrated
pub const UNRATED: Rating = 0.0;

/// Returns true when `value` counts as a rating (strictly positive)
#[inline]
pub fn is_rated(value: Rating) -> bool {
    value > UNRATED
}

// =============================================================================
// RatingMatrix
// =============================================================================

/// Dense user × item matrix of ratings.
///
/// Every row has exactly `item_count` entries; this is checked once in
/// [`RatingMatrix::new`] and never re-checked afterwards. The matrix is
/// read-only after construction, so it can be shared across threads
/// behind an `Arc` without any locking.
///
/// Known limitation: a literal `0` is read as "unrated". A user who
/// genuinely rated an item zero is indistinguishable from one who never
/// rated it, and that rating is silently ignored everywhere.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingMatrix {
    rows: Vec<Vec<Rating>>,
    item_count: usize,
}

impl RatingMatrix {
    /// Build a matrix from user rows, rejecting ragged input.
    ///
    /// The item count is taken from the first row. An empty `rows` vector
    /// yields an empty matrix with zero items.
    pub fn new(rows: Vec<Vec<Rating>>) -> Result<Self> {
        let item_count = rows.first().map(|r| r.len()).unwrap_or(0);

        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != item_count)
            .map(|(i, r)| (i, r.len()))
        {
            return Err(RatingsError::DimensionMismatch {
                row,
                expected: item_count,
                found,
            });
        }

        Ok(Self { rows, item_count })
    }

    /// Creates a matrix with no users and no items
    pub fn empty() -> Self {
        Self {
            rows: Vec::new(),
            item_count: 0,
        }
    }

    pub fn user_count(&self) -> usize {
        self.rows.len()
    }

    pub fn item_count(&self) -> usize {
        self.item_count
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Fails with `InvalidUser` unless `user` is a row of this matrix
    pub fn check_user(&self, user: UserIndex) -> Result<()> {
        if user < self.rows.len() {
            Ok(())
        } else {
            Err(RatingsError::InvalidUser {
                index: user,
                user_count: self.rows.len(),
            })
        }
    }

    /// Get one user's ratings as a slice
    pub fn user(&self, user: UserIndex) -> Result<&[Rating]> {
        self.check_user(user)?;
        Ok(&self.rows[user])
    }

    /// Get a single cell, or `None` if either index is out of range
    pub fn rating(&self, user: UserIndex, item: ItemIndex) -> Option<Rating> {
        self.rows.get(user)?.get(item).copied()
    }

    /// Iterate over all user rows in index order
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[Rating]> + '_ {
        self.rows.iter().map(|r| r.as_slice())
    }

    /// Number of non-zero cells
    pub fn rated_count(&self) -> usize {
        self.rows
            .iter()
            .map(|r| r.iter().filter(|&&v| is_rated(v)).count())
            .sum()
    }

    /// (users, items, ratings) for logging and validation
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.user_count(), self.item_count, self.rated_count())
    }
}

impl Default for RatingMatrix {
    fn default() -> Self {
        Self::empty()
    }
}

// =============================================================================
// Statistics Types
// =============================================================================

/// Summary of one user's row, for display and diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UserStats {
    pub user: UserIndex,
    pub rated_count: usize,
    /// Mean over rated items only; 0.0 when nothing is rated
    pub mean_rating: f64,
}

/// Summary of one item's column
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ItemStats {
    pub item: ItemIndex,
    pub rater_count: usize,
    /// Mean over users who rated the item; 0.0 when nobody did
    pub mean_rating: f64,
}
