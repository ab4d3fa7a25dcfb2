//! Parser for comma-separated rating files.
//!
//! Format: one user per line, one numeric rating per column, no header.
//!
//! ```text
//! 5,3,0,1
//! 4,0,0,1
//! ```
//!
//! Blank lines are skipped. Each value must be a finite, non-negative
//! number; `0` marks an unrated item. Row lengths are not compared here,
//! that check belongs to `RatingMatrix::new`.

use crate::error::{RatingsError, Result};
use crate::types::Rating;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read and parse a ratings CSV file into raw rows
pub fn parse_ratings_file(path: &Path) -> Result<Vec<Vec<Rating>>> {
    let content = fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => RatingsError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => RatingsError::Io(e),
    })?;

    let file = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    parse_ratings(&content, &file)
}

/// Parse CSV text into raw rows.
///
/// `file` is only used to label parse errors.
pub fn parse_ratings(content: &str, file: &str) -> Result<Vec<Vec<Rating>>> {
    let mut rows = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let line_trimmed = line.trim();
        if line_trimmed.is_empty() {
            continue;
        }

        let row = line_trimmed
            .split(',')
            .enumerate()
            .map(|(column, field)| parse_rating(field, file, line_no, column + 1))
            .collect::<Result<Vec<Rating>>>()?;

        rows.push(row);
    }

    Ok(rows)
}

/// Parse one field into a rating value
fn parse_rating(field: &str, file: &str, line: usize, column: usize) -> Result<Rating> {
    let field = field.trim();
    if field.is_empty() {
        return Err(RatingsError::Parse {
            file: file.to_string(),
            line,
            reason: format!("Missing rating in column {}", column),
        });
    }

    let value: Rating = field.parse().map_err(|e| RatingsError::Parse {
        file: file.to_string(),
        line,
        reason: format!("Invalid rating in column {}: {}", column, e),
    })?;

    if !value.is_finite() || value < 0.0 {
        return Err(RatingsError::InvalidValue {
            field: format!("rating (line {}, column {})", line, column),
            value: field.to_string(),
        });
    }

    Ok(value)
}
