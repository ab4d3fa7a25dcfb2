//! Pairwise user similarity measures.
//!
//! ## Adjusted cosine similarity
//! 1. Co-rated set: items both users rated (> 0). Empty set → 0.
//! 2. Each user's mean over the co-rated set only, not over their whole row
//! 3. Center every co-rated value on that mean
//! 4. Dot product of the centered vectors over the product of their L2 norms
//! 5. Either norm 0 → 0
//!
//! The result is always in `[-1, 1]` and never divides by zero.

use data_loader::{is_rated, Rating};

/// A symmetric similarity score between two users' rating rows.
///
/// `Send + Sync` so one measure can score many pairs from rayon workers.
pub trait SimilarityMeasure: Send + Sync {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Score two rows of equal length. Must be pure and symmetric.
    fn similarity(&self, a: &[Rating], b: &[Rating]) -> f64;
}

/// Mean-centered cosine over co-rated items
#[derive(Debug, Clone, Copy, Default)]
pub struct AdjustedCosine;

impl SimilarityMeasure for AdjustedCosine {
    fn name(&self) -> &str {
        "AdjustedCosine"
    }

    fn similarity(&self, a: &[Rating], b: &[Rating]) -> f64 {
        adjusted_cosine_similarity(a, b)
    }
}

/// Adjusted cosine similarity between two users.
///
/// Rows of different length are compared over their common prefix.
pub fn adjusted_cosine_similarity(a: &[Rating], b: &[Rating]) -> f64 {
    let co_rated = || {
        a.iter()
            .zip(b)
            .filter(|&(&x, &y)| is_rated(x) && is_rated(y))
    };

    let (max_a, max_b, count) = co_rated().fold(
        (0.0_f64, 0.0_f64, 0usize),
        |(ma, mb, n), (&x, &y)| (ma.max(x), mb.max(y), n + 1),
    );
    if count == 0 {
        return 0.0;
    }

    // Each user's values are divided by their own co-rated maximum so the
    // squares below stay in (0, 1]. A per-user scale leaves the cosine unchanged.
    let (sum_a, sum_b) = co_rated().fold((0.0, 0.0), |(sa, sb), (&x, &y)| {
        (sa + x / max_a, sb + y / max_b)
    });
    let mean_a = sum_a / count as f64;
    let mean_b = sum_b / count as f64;

    let (dot, norm_a, norm_b) = co_rated().fold((0.0, 0.0, 0.0), |(dot, na, nb), (&x, &y)| {
        let dx = x / max_a - mean_a;
        let dy = y / max_b - mean_b;
        (dot + dx * dy, na + dx * dx, nb + dy * dy)
    });

    if norm_a > 0.0 && norm_b > 0.0 {
        let score = dot / (norm_a.sqrt() * norm_b.sqrt());
        if score.is_nan() {
            return 0.0;
        }
        // Rounding can push |score| a hair past 1 for parallel vectors
        score.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
