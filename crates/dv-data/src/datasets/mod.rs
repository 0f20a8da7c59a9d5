//! Bundled regression datasets

pub mod longley;

use serde::{Deserialize, Serialize};

use crate::{DataError, Result};

/// A regression dataset: one response and a set of regressors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub endog_name: String,
    pub exog_names: Vec<String>,
    pub endog: Vec<f64>,
    /// One row per observation, columns ordered as `exog_names`
    pub exog: Vec<Vec<f64>>,
}

impl Dataset {
    pub fn nobs(&self) -> usize {
        self.endog.len()
    }

    /// Values of one regressor
    pub fn exog_column(&self, name: &str) -> Result<Vec<f64>> {
        let idx = self
            .exog_names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| DataError::MissingColumn(name.to_string()))?;
        Ok(self.exog.iter().map(|row| row[idx]).collect())
    }
}

/// Add a column of ones to each row, first when `prepend`, otherwise last.
///
/// Rows that already hold a constant column are returned unchanged.
pub fn add_constant(rows: &[Vec<f64>], prepend: bool) -> Result<Vec<Vec<f64>>> {
    let k = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().position(|r| r.len() != k) {
        return Err(DataError::Shape(format!(
            "row {} has {} columns, expected {}",
            bad,
            rows[bad].len(),
            k
        )));
    }
    let has_constant = !rows.is_empty()
        && (0..k).any(|j| rows.iter().all(|r| r[j] == rows[0][j]) && rows[0][j] != 0.0);
    if has_constant {
        return Ok(rows.to_vec());
    }

    Ok(rows
        .iter()
        .map(|row| {
            let mut out = Vec::with_capacity(k + 1);
            if prepend {
                out.push(1.0);
                out.extend_from_slice(row);
            } else {
                out.extend_from_slice(row);
                out.push(1.0);
            }
            out
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_constant_prepend_and_append() {
        let rows = vec![vec![2.0, 3.0], vec![4.0, 5.0]];
        assert_eq!(
            add_constant(&rows, true).unwrap(),
            vec![vec![1.0, 2.0, 3.0], vec![1.0, 4.0, 5.0]]
        );
        assert_eq!(
            add_constant(&rows, false).unwrap(),
            vec![vec![2.0, 3.0, 1.0], vec![4.0, 5.0, 1.0]]
        );
    }

    #[test]
    fn test_add_constant_skips_existing_constant() {
        let rows = vec![vec![7.0, 1.0], vec![7.0, 2.0]];
        assert_eq!(add_constant(&rows, true).unwrap(), rows);
    }

    #[test]
    fn test_add_constant_ragged_rows() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        assert!(matches!(add_constant(&rows, true), Err(DataError::Shape(_))));
    }
}
