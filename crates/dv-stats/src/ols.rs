//! Ordinary least squares

use nalgebra::{DMatrix, DVector};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{check_sample, Result, StatsError};

/// Results of an OLS fit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OlsResults {
    pub params: Vec<f64>,
    pub fitted_values: Vec<f64>,
    pub resid: Vec<f64>,
    /// Sum of squared residuals
    pub ssr: f64,
    pub df_resid: f64,
    /// Residual variance, `ssr / df_resid`
    pub scale: f64,
    /// NaN when the response has no variation
    pub r_squared: f64,
}

/// Least squares solver for `endog ~ exog`
pub struct Ols;

impl Ols {
    /// Fit `endog` on the rows of `exog`. Add a constant column yourself if
    /// an intercept is wanted.
    ///
    /// Columns are equilibrated before an SVD solve, so badly scaled designs
    /// such as Longley still solve to near full precision.
    pub fn fit(endog: &[f64], exog: &[Vec<f64>]) -> Result<OlsResults> {
        let n = endog.len();
        if exog.len() != n {
            return Err(StatsError::ShapeMismatch(format!(
                "endog has {} rows but exog has {}",
                n,
                exog.len()
            )));
        }
        let k = exog.first().map_or(0, Vec::len);
        if k == 0 {
            return Err(StatsError::ShapeMismatch(
                "design matrix has no columns".to_string(),
            ));
        }
        if let Some(row) = exog.iter().position(|r| r.len() != k) {
            return Err(StatsError::ShapeMismatch(format!(
                "row {} has {} columns, expected {}",
                row,
                exog[row].len(),
                k
            )));
        }
        if n < k {
            return Err(StatsError::ShapeMismatch(format!(
                "{n} observations cannot identify {k} parameters"
            )));
        }
        check_sample(endog, 1)?;
        for row in exog {
            check_sample(row, 1)?;
        }

        let x = DMatrix::from_fn(n, k, |i, j| exog[i][j]);
        let y = DVector::from_column_slice(endog);

        let norms: Vec<f64> = (0..k)
            .map(|j| {
                let norm = x.column(j).norm();
                if norm > 0.0 {
                    norm
                } else {
                    1.0
                }
            })
            .collect();
        let scaled = DMatrix::from_fn(n, k, |i, j| x[(i, j)] / norms[j]);

        let svd = scaled.svd(true, true);
        let max_sv = svd.singular_values.max();
        if max_sv <= 0.0 {
            return Err(StatsError::Singular("all singular values are zero".to_string()));
        }
        let eps = f64::EPSILON * n.max(k) as f64 * max_sv;
        let scaled_beta = svd
            .solve(&y, eps)
            .map_err(|e| StatsError::Singular(e.to_string()))?;
        let beta = DVector::from_fn(k, |j, _| scaled_beta[j] / norms[j]);

        let fitted = &x * &beta;
        let resid = &y - &fitted;
        let ssr = resid.norm_squared();
        let df_resid = (n - k) as f64;
        let y_mean = y.mean();
        let tss: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
        let r_squared = if tss > 0.0 { 1.0 - ssr / tss } else { f64::NAN };

        debug!(nobs = n, nparams = k, ssr, r_squared, "OLS fit");

        Ok(OlsResults {
            params: beta.iter().copied().collect(),
            fitted_values: fitted.iter().copied().collect(),
            resid: resid.iter().copied().collect(),
            ssr,
            df_resid,
            scale: if df_resid > 0.0 { ssr / df_resid } else { f64::NAN },
            r_squared,
        })
    }
}

/// Slope and intercept of `y ~ x + 1`
pub fn simple_regression(x: &[f64], y: &[f64]) -> Result<(f64, f64)> {
    if x.len() != y.len() {
        return Err(StatsError::ShapeMismatch(format!(
            "x has {} values but y has {}",
            x.len(),
            y.len()
        )));
    }
    check_sample(x, 2)?;
    let rows: Vec<Vec<f64>> = x.iter().map(|&xi| vec![xi, 1.0]).collect();
    let results = Ols::fit(y, &rows)?;
    Ok((results.params[0], results.params[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_exact_line() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 2.5 * v - 1.0).collect();
        let (slope, intercept) = simple_regression(&x, &y).unwrap();
        assert_relative_eq!(slope, 2.5, epsilon = 1e-10);
        assert_relative_eq!(intercept, -1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_residuals_orthogonal_to_design() {
        let endog = [1.0, 3.0, 2.0, 5.0, 4.0, 6.0];
        let exog: Vec<Vec<f64>> = (0..6).map(|i| vec![i as f64, 1.0]).collect();
        let res = Ols::fit(&endog, &exog).unwrap();

        let resid_sum: f64 = res.resid.iter().sum();
        assert_relative_eq!(resid_sum, 0.0, epsilon = 1e-10);
        let cross: f64 = res.resid.iter().zip(&exog).map(|(r, row)| r * row[0]).sum();
        assert_relative_eq!(cross, 0.0, epsilon = 1e-10);
        assert_eq!(res.df_resid, 4.0);
        assert!(res.r_squared > 0.0 && res.r_squared < 1.0);
        for ((f, r), y) in res.fitted_values.iter().zip(&res.resid).zip(&endog) {
            assert_relative_eq!(f + r, *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_shape_errors() {
        let exog = vec![vec![1.0, 1.0], vec![2.0]];
        assert!(matches!(
            Ols::fit(&[1.0, 2.0], &exog),
            Err(StatsError::ShapeMismatch(_))
        ));
        assert!(matches!(
            Ols::fit(&[1.0], &[vec![1.0], vec![2.0]]),
            Err(StatsError::ShapeMismatch(_))
        ));
        assert!(matches!(
            Ols::fit(&[1.0], &[vec![1.0, 2.0]]),
            Err(StatsError::ShapeMismatch(_))
        ));
        assert!(matches!(
            simple_regression(&[1.0, 2.0], &[1.0]),
            Err(StatsError::ShapeMismatch(_))
        ));
    }

    #[test]
    fn test_non_finite_rejected() {
        let exog = vec![vec![1.0, 1.0], vec![f64::NAN, 1.0], vec![3.0, 1.0]];
        assert!(matches!(
            Ols::fit(&[1.0, 2.0, 3.0], &exog),
            Err(StatsError::NonFinite(_))
        ));
    }
}
