//! Numeric summaries behind the histogram, boxplot and heatmap charts

use polars::prelude::*;

use crate::constants::chart::WHISKER_IQR;

/// Five-number summary plus the points beyond the whiskers
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
    pub count: usize,
}

/// Equal-width histogram; `edges` has one more entry than `counts`
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub edges: Vec<f64>,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn bin_width(&self) -> f64 {
        match self.edges.as_slice() {
            [first, second, ..] => second - first,
            _ => 0.0,
        }
    }

    pub fn max_count(&self) -> usize {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

/// Drop NaN and infinite values
pub fn finite_values(values: &[f64]) -> Vec<f64> {
    values.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Linear-interpolated quantile, `p` in [0, 1]; NaN for an empty array
pub fn quantile(values: &Float64Chunked, p: f64) -> f64 {
    values
        .quantile(p.clamp(0.0, 1.0), QuantileMethod::Linear)
        .ok()
        .flatten()
        .unwrap_or(f64::NAN)
}

/// Box plot statistics with whiskers at the furthest points inside
/// 1.5 IQR of the box. Returns None when there are no finite values.
pub fn box_summary(values: &[f64]) -> Option<BoxSummary> {
    let mut sorted = finite_values(values);
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let chunked = Float64Chunked::from_slice("values".into(), &sorted);
    let q1 = quantile(&chunked, 0.25);
    let median = quantile(&chunked, 0.5);
    let q3 = quantile(&chunked, 0.75);
    let iqr = q3 - q1;
    let low_fence = q1 - WHISKER_IQR * iqr;
    let high_fence = q3 + WHISKER_IQR * iqr;

    let lower_whisker = sorted
        .iter()
        .copied()
        .find(|&v| v >= low_fence)
        .unwrap_or(sorted[0]);
    let upper_whisker = sorted
        .iter()
        .rev()
        .copied()
        .find(|&v| v <= high_fence)
        .unwrap_or(sorted[sorted.len() - 1]);

    let outliers = sorted
        .iter()
        .copied()
        .filter(|&v| v < lower_whisker || v > upper_whisker)
        .collect();

    Some(BoxSummary {
        lower_whisker,
        q1,
        median,
        q3,
        upper_whisker,
        outliers,
        count: sorted.len(),
    })
}

/// Bucket finite values into `bins` equal-width buckets spanning
/// [min, max]; the last bucket is closed. A constant column is spread over
/// [v - 0.5, v + 0.5]. Returns None when there are no finite values or
/// `bins` is zero.
pub fn histogram(values: &[f64], bins: usize) -> Option<Histogram> {
    let clean = finite_values(values);
    if clean.is_empty() || bins == 0 {
        return None;
    }

    let mut min = clean.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = clean.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let bin_width = (max - min) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| min + i as f64 * bin_width).collect();
    let mut counts = vec![0usize; bins];

    for v in clean {
        let bin_idx = ((v - min) / bin_width).floor() as usize;
        counts[bin_idx.min(bins - 1)] += 1;
    }

    Some(Histogram { edges, counts })
}

/// Pearson correlation matrix of the given columns over pairwise-complete
/// rows. NaN counts as missing; a pair with fewer than two complete rows or
/// a constant side correlates as NaN.
pub fn correlation_matrix(frame: &DataFrame, columns: &[String]) -> PolarsResult<Vec<Vec<f64>>> {
    profiling::scope!("correlation_matrix");

    let n = columns.len();
    let cleaned: Vec<Expr> = columns
        .iter()
        .map(|name| {
            col(name.as_str())
                .cast(DataType::Float64)
                .fill_nan(lit(NULL))
        })
        .collect();

    let mut pairs = Vec::with_capacity(n * (n + 1) / 2);
    for i in 0..n {
        for j in i..n {
            pairs.push(
                pearson_corr(col(columns[i].as_str()), col(columns[j].as_str()))
                    .alias(format!("{}_{}", i, j)),
            );
        }
    }

    let coefficients = frame
        .clone()
        .lazy()
        .select(cleaned)
        .select(pairs)
        .collect()?;

    let mut matrix = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = coefficients
                .column(&format!("{}_{}", i, j))?
                .as_materialized_series()
                .cast(&DataType::Float64)?
                .f64()?
                .get(0)
                .map(|r| r.clamp(-1.0, 1.0))
                .unwrap_or(f64::NAN);
            matrix[i][j] = r;
            matrix[j][i] = r;
        }
    }
    Ok(matrix)
}
