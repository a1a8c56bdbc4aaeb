//! Numeric helpers for the dashboard aggregates
//!
//! Everything here takes plain slices and returns `None` instead of a
//! placeholder number when the input cannot support the statistic.

use serde::Serialize;

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (n - 1 denominator).
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - m) * (v - m)).sum();
    Some((sum_sq / (values.len() - 1) as f64).sqrt())
}

/// Quantile `q` in `[0, 1]` of already sorted values, interpolating linearly
/// between the two nearest ranks.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Pearson correlation coefficient.
///
/// `None` for mismatched or short inputs, and when either series is constant.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    if x.len() != y.len() || x.len() < 2 {
        return None;
    }

    let n = x.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y.iter()).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|a| a * a).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let denominator = ((n * sum_x2 - sum_x * sum_x) * (n * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator == 0.0 || !denominator.is_finite() {
        return None;
    }

    Some((numerator / denominator).clamp(-1.0, 1.0))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Equal-width histogram over the range of `values`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// Bucket `values` into `bins` equal-width bins spanning min..=max.
    ///
    /// The last bin is closed on the right. When every value is identical a
    /// single bin holds them all.
    pub fn build(values: &[f64], bins: usize) -> Self {
        if values.is_empty() || bins == 0 {
            return Self { bins: vec![] };
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        if max == min {
            return Self {
                bins: vec![Bin {
                    start: min,
                    end: max,
                    count: values.len(),
                }],
            };
        }

        let width = (max - min) / bins as f64;
        let mut out: Vec<Bin> = (0..bins)
            .map(|i| Bin {
                start: min + width * i as f64,
                end: if i + 1 == bins {
                    max
                } else {
                    min + width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        for &v in values {
            let idx = (((v - min) / width) as usize).min(bins - 1);
            out[idx].count += 1;
        }

        Self { bins: out }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}
