//! Reference line geometry

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::distribution::ReferenceDistribution;
use crate::ols::simple_regression;
use crate::positions::{mean, median, population_std, score_at_percentile};
use crate::{check_sample, Result, StatsError};

/// Overlay line drawn over a probability plot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ReferenceLine {
    /// `y = x`
    Identity,
    /// Slope `std(y)`, intercept `mean(y)`
    Standardized,
    /// Least squares fit of y on x
    Regression,
    /// Through the sample quartiles, matched to the reference quartiles
    Quartile,
    /// Theil-Sen median-of-slopes fit
    Robust,
}

impl ReferenceLine {
    pub const ALL: [ReferenceLine; 5] = [
        ReferenceLine::Regression,
        ReferenceLine::Quartile,
        ReferenceLine::Identity,
        ReferenceLine::Standardized,
        ReferenceLine::Robust,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            ReferenceLine::Identity => "45",
            ReferenceLine::Standardized => "s",
            ReferenceLine::Regression => "r",
            ReferenceLine::Quartile => "q",
            ReferenceLine::Robust => "robust",
        }
    }
}

impl FromStr for ReferenceLine {
    type Err = StatsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "45" => Ok(ReferenceLine::Identity),
            "s" => Ok(ReferenceLine::Standardized),
            "r" => Ok(ReferenceLine::Regression),
            "q" => Ok(ReferenceLine::Quartile),
            "robust" => Ok(ReferenceLine::Robust),
            other => Err(StatsError::InvalidLine(other.to_string())),
        }
    }
}

impl fmt::Display for ReferenceLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<String> for ReferenceLine {
    type Error = StatsError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ReferenceLine> for String {
    fn from(line: ReferenceLine) -> Self {
        line.code().to_string()
    }
}

/// Endpoints of the reference line for paired plot coordinates
///
/// For [`ReferenceLine::Quartile`] the y quartiles are matched to the
/// theoretical quartiles of `dist`, or to the quartiles of `x` itself when
/// no distribution is given (two-sample plots).
pub fn reference_line_points(
    line: ReferenceLine,
    x: &[f64],
    y: &[f64],
    dist: Option<&ReferenceDistribution>,
) -> Result<Vec<(f64, f64)>> {
    if x.len() != y.len() {
        return Err(StatsError::ShapeMismatch(format!(
            "reference line needs paired values, got {} x and {} y",
            x.len(),
            y.len()
        )));
    }
    check_sample(x, 2)?;
    check_sample(y, 2)?;

    let x_min = x.iter().copied().fold(f64::INFINITY, f64::min);
    let x_max = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let (slope, intercept) = match line {
        ReferenceLine::Identity => {
            let y_min = y.iter().copied().fold(f64::INFINITY, f64::min);
            let y_max = y.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let lo = x_min.min(y_min);
            let hi = x_max.max(y_max);
            return Ok(vec![(lo, lo), (hi, hi)]);
        }
        ReferenceLine::Standardized => (population_std(y), mean(y)),
        ReferenceLine::Regression => simple_regression(x, y)?,
        ReferenceLine::Quartile => {
            let (q25, q75) = quartiles(y)?;
            let (t25, t75) = match dist {
                Some(dist) => (dist.ppf(0.25)?, dist.ppf(0.75)?),
                None => quartiles(x)?,
            };
            if t75 == t25 {
                return Err(StatsError::DegenerateSample(
                    "reference quartiles coincide".to_string(),
                ));
            }
            let slope = (q75 - q25) / (t75 - t25);
            (slope, q25 - slope * t25)
        }
        ReferenceLine::Robust => theil_sen(x, y)?,
    };

    Ok(vec![
        (x_min, slope * x_min + intercept),
        (x_max, slope * x_max + intercept),
    ])
}

fn quartiles(values: &[f64]) -> Result<(f64, f64)> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok((
        score_at_percentile(&sorted, 25.0)?,
        score_at_percentile(&sorted, 75.0)?,
    ))
}

/// Largest number of pairwise slopes held in memory at once
const MAX_ENUMERATED_PAIRS: usize = 1 << 22;

/// Median of pairwise slopes, intercept `median(y - slope * x)`
///
/// Pairs with equal x carry no slope and are skipped. Small samples list
/// every slope. Past [`MAX_ENUMERATED_PAIRS`] the median slope is located by
/// bisection, counting the slopes below a candidate in `O(n log n)`.
fn theil_sen(x: &[f64], y: &[f64]) -> Result<(f64, f64)> {
    let n = x.len();
    let slope = if n * (n - 1) / 2 <= MAX_ENUMERATED_PAIRS {
        enumerated_median_slope(x, y)?
    } else {
        bisected_median_slope(x, y)?
    };
    let offsets: Vec<f64> = x.iter().zip(y).map(|(xi, yi)| yi - slope * xi).collect();
    Ok((slope, median(&offsets)))
}

fn no_slopes() -> StatsError {
    StatsError::DegenerateSample("all x values are equal".to_string())
}

fn enumerated_median_slope(x: &[f64], y: &[f64]) -> Result<f64> {
    let mut slopes = Vec::with_capacity(x.len() * (x.len() - 1) / 2);
    for i in 0..x.len() {
        for j in (i + 1)..x.len() {
            let dx = x[j] - x[i];
            if dx != 0.0 {
                slopes.push((y[j] - y[i]) / dx);
            }
        }
    }
    if slopes.is_empty() {
        return Err(no_slopes());
    }
    Ok(median(&slopes))
}

fn bisected_median_slope(x: &[f64], y: &[f64]) -> Result<f64> {
    let mut points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut tied = 0;
    let mut run = 1;
    for w in points.windows(2) {
        if w[0].0 == w[1].0 {
            tied += run;
            run += 1;
        } else {
            run = 1;
        }
    }
    let n = points.len();
    let total = n * (n - 1) / 2 - tied;
    if total == 0 {
        return Err(no_slopes());
    }

    let mut residuals = Vec::with_capacity(n);
    let mut scratch = Vec::with_capacity(n);
    let mut at_most =
        |t: f64| slopes_at_most(&points, t, &mut residuals, &mut scratch).saturating_sub(tied);
    let lower = kth_slope(&mut at_most, (total + 1) / 2);
    let upper = if total % 2 == 0 {
        kth_slope(&mut at_most, total / 2 + 1)
    } else {
        lower
    };
    Ok(0.5 * (lower + upper))
}

/// Number of pairs with slope `<= t`, plus every pair sharing an x value.
///
/// For `x_i < x_j` the slope is at most `t` exactly when
/// `y_j - t x_j <= y_i - t x_i`, so the count is the number of
/// non-increasing pairs in the residual sequence. Residuals within an x
/// group are ordered descending, which makes each tied pair count once.
fn slopes_at_most(
    points: &[(f64, f64)],
    t: f64,
    residuals: &mut Vec<f64>,
    scratch: &mut Vec<f64>,
) -> usize {
    residuals.clear();
    residuals.extend(points.iter().map(|(x, y)| y - t * x));
    let mut start = 0;
    while start < points.len() {
        let mut end = start + 1;
        while end < points.len() && points[end].0 == points[start].0 {
            end += 1;
        }
        residuals[start..end].sort_by(|a, b| b.total_cmp(a));
        start = end;
    }
    scratch.clear();
    scratch.resize(residuals.len(), 0.0);
    count_non_increasing(residuals, scratch)
}

/// Merge sort `values` ascending, returning the number of pairs `i < j`
/// with `values[i] >= values[j]`
fn count_non_increasing(values: &mut [f64], scratch: &mut [f64]) -> usize {
    let n = values.len();
    if n < 2 {
        return 0;
    }
    let mid = n / 2;
    let mut count = {
        let (left, right) = values.split_at_mut(mid);
        let (left_scratch, right_scratch) = scratch.split_at_mut(mid);
        count_non_increasing(left, left_scratch) + count_non_increasing(right, right_scratch)
    };

    let (mut i, mut j, mut k) = (0, mid, 0);
    while i < mid && j < n {
        if values[i] < values[j] {
            scratch[k] = values[i];
            i += 1;
        } else {
            scratch[k] = values[j];
            count += mid - i;
            j += 1;
        }
        k += 1;
    }
    scratch[k..k + mid - i].copy_from_slice(&values[i..mid]);
    k += mid - i;
    scratch[k..k + n - j].copy_from_slice(&values[j..n]);
    values.copy_from_slice(&scratch[..n]);
    count
}

/// Smallest slope `t` with at least `k` slopes `<= t`
fn kth_slope(at_most: &mut impl FnMut(f64) -> usize, k: usize) -> f64 {
    const STEPS: usize = 1100;
    let (mut lo, mut hi) = (-1.0_f64, 1.0_f64);
    let mut steps = 0;
    while at_most(lo) >= k && steps < STEPS {
        lo *= 2.0;
        steps += 1;
    }
    steps = 0;
    while at_most(hi) < k && steps < STEPS {
        hi *= 2.0;
        steps += 1;
    }
    for _ in 0..STEPS {
        let mid = 0.5 * (lo + hi);
        if mid <= lo || mid >= hi {
            break;
        }
        if at_most(mid) >= k {
            hi = mid;
        } else {
            lo = mid;
        }
    }
    hi
}
