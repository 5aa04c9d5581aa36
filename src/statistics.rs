// ABOUTME: Generic numeric primitives for longitudinal series analysis
// ABOUTME: Split-half trends, Pearson correlation, consistency ratios, and z-score anomaly detection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vida Wellness Intelligence

use chrono::{DateTime, Datelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Minimum points required before a trend is attempted.
const MIN_TREND_POINTS: usize = 3;

/// Percentage change below which a series counts as stable.
const TREND_STABLE_BAND_PERCENT: f64 = 5.0;

/// Floor for trend confidence; a computed trend is never fully distrusted.
const TREND_CONFIDENCE_FLOOR: f64 = 0.3;

/// Ceiling for trend confidence; split-half averaging never earns certainty.
const TREND_CONFIDENCE_CEILING: f64 = 0.95;

/// Confidence reported when the first-half average is zero and the
/// percentage change is undefined.
const DEGENERATE_TREND_CONFIDENCE: f64 = 0.5;

/// Minimum points required before anomaly detection is attempted.
const MIN_ANOMALY_POINTS: usize = 5;

///// Tolerance band for consistency: samples within 10% of target still count.
const CONSISTENCY_TOLERANCE: f64 = 0.9;

/// Sentinel returned by [`days_since`] when the date is absent, large enough
/// that "at least N days ago" comparisons read as "effectively never".
pub const DAYS_SINCE_SENTINEL: i64 = 999;

/// Direction of a series trend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    /// Second half of the series averages more than 5% above the first.
    Up,
    /// Second half averages more than 5% below the first.
    Down,
    /// Change stayed within the stable band.
    Stable,
}

/// Direction, magnitude, and confidence summary of a numeric series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendAnalysis {
    /// Which way the series is moving.
    pub direction: TrendDirection,
    /// Absolute percentage change between half-averages; the direction
    /// carries the sign, so this is always non-negative.
    pub percentage: f64,
    /// Confidence in the trend, 0..1.
    pub confidence: f64,
}

impl TrendAnalysis {
    /// The no-signal trend returned for series too short to analyze.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            direction: TrendDirection::Stable,
            percentage: 0.0,
            confidence: 0.0,
        }
    }
}

/// Arithmetic mean; 0.0 for an empty slice.
#[must_use]
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population variance; 0.0 for fewer than two points.
#[must_use]
pub fn variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = average(values);
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Split-half trend over a chronologically ordered series.
///
/// The series is split at `floor(n/2)` so the first half takes the smaller
/// share on odd lengths. A zero first-half average yields a stable trend at
/// half confidence rather than a division by zero dressed up as precision.
/// Confidence falls as variance grows relative to the mean, clamped into
/// `[0.3, 0.95]`.
#[must_use]
pub fn trend(values: &[f64]) -> TrendAnalysis {
    if values.len() < MIN_TREND_POINTS {
        return TrendAnalysis::none();
    }

    let split = values.len() / 2;
    let first_avg = average(&values[..split]);
    let second_avg = average(&values[split..]);

    if first_avg == 0.0 {
        return TrendAnalysis {
            direction: TrendDirection::Stable,
            percentage: 0.0,
            confidence: DEGENERATE_TREND_CONFIDENCE,
        };
    }

    let pct = (second_avg - first_avg) / first_avg * 100.0;
    let direction = if pct > TREND_STABLE_BAND_PERCENT {
        TrendDirection::Up
    } else if pct < -TREND_STABLE_BAND_PERCENT {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };

    let confidence = (1.0 - variance(values) / (first_avg.abs() + 1.0))
        .clamp(TREND_CONFIDENCE_FLOOR, TREND_CONFIDENCE_CEILING);

    TrendAnalysis {
        direction,
        percentage: pct.abs(),
        confidence,
    }
}

/// Pearson correlation coefficient between two aligned series.
///
/// Returns 0.0 for mismatched lengths, fewer than three points, or a
/// degenerate (constant) series on either side.
#[must_use]
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < MIN_TREND_POINTS {
        return 0.0;
    }

    let mean_x = average(x);
    let mean_y = average(y);

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        return 0.0;
    }

    covariance / denominator
}

/// Qualitative strength and direction label for a correlation coefficient.
#[must_use]
pub fn interpret_correlation(r: f64) -> String {
    let strength = match r.abs() {
        a if a < 0.2 => "very weak",
        a if a < 0.4 => "weak",
        a if a < 0.6 => "moderate",
        a if a < 0.8 => "strong",
        _ => "very strong",
    };
    let sign = if r >= 0.0 { "positive" } else { "negative" };
    format!("{strength} {sign}")
}

/// Fraction of samples that reach at least 90% of the target.
#[must_use]
pub fn consistency(actual: &[f64], target: f64) -> f64 {
    if actual.is_empty() {
        return 0.0;
    }
    let on_target = actual
        .iter()
        .filter(|v| **v >= target * CONSISTENCY_TOLERANCE)
        .count();
    on_target as f64 / actual.len() as f64
}

/// Whole days elapsed since `date`, floored.
///
/// An absent date returns [`DAYS_SINCE_SENTINEL`] so threshold comparisons
/// like "at least 5 days ago" behave as "effectively never happened".
#[must_use]
pub fn days_since(date: Option<DateTime<Utc>>, now: DateTime<Utc>) -> i64 {
    date.map_or(DAYS_SINCE_SENTINEL, |d| (now - d).num_days())
}

/// Indices of samples whose z-score magnitude exceeds the threshold.
///
/// Needs at least five points; fewer, or a zero-variance series, yields no
/// anomalies.
#[must_use]
pub fn anomalies(values: &[f64], z_threshold: f64) -> Vec<usize> {
    if values.len() < MIN_ANOMALY_POINTS {
        return Vec::new();
    }

    let mean = average(values);
    let std_dev = variance(values).sqrt();
    if std_dev == 0.0 {
        return Vec::new();
    }

    values
        .iter()
        .enumerate()
        .filter(|(_, v)| ((**v - mean) / std_dev).abs() > z_threshold)
        .map(|(i, _)| i)
        .collect()
}

/// Weekday with the highest average sample value, or `None` on empty input.
#[must_use]
pub fn best_day_of_week(samples: &[(DateTime<Utc>, f64)]) -> Option<Weekday> {
    if samples.is_empty() {
        return None;
    }

    let mut sums: HashMap<Weekday, (f64, u32)> = HashMap::new();
    for (date, value) in samples {
        let entry = sums.entry(date.weekday()).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(day, (sum, count))| (day, sum / f64::from(count)))
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(day, _)| day)
}
