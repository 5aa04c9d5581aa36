// ABOUTME: Domain-aware pattern analysis over the statistics primitives
// ABOUTME: Volume/sleep trends, cross-metric correlation discovery, muscle balance, schedule consistency
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vida Wellness Intelligence

use crate::config::{EngineConfig, PatternThresholds};
use crate::errors::{ensure_finite, EngineError};
use crate::insight::{
    stable_key, InsightCategory, InsightDraft, InsightPayload, InsightPriority, InsightType,
};
use crate::snapshot::UserAnalysisData;
use crate::statistics::{
    anomalies, best_day_of_week, interpret_correlation, pearson, trend, TrendAnalysis,
    TrendDirection,
};
use chrono::{DateTime, NaiveDate, Timelike, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Width of a schedule bucket in hours.
const SCHEDULE_WINDOW_HOURS: u32 = 2;

/// Pearson coefficient between two aligned metrics plus a qualitative label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// First metric name.
    pub metric_a: String,
    /// Second metric name.
    pub metric_b: String,
    /// Pearson coefficient, -1..1 by construction.
    pub coefficient: f64,
    /// Human-readable strength/direction label.
    pub interpretation: String,
}

/// Muscle-group training balance across recent workouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MuscleBalance {
    /// Most-trained muscle group.
    pub most_trained: String,
    /// Sessions tagging the most-trained group.
    pub most_count: u32,
    /// Least-trained muscle group.
    pub least_trained: String,
    /// Sessions tagging the least-trained group.
    pub least_count: u32,
    /// `most_count / least_count`.
    pub ratio: f64,
}

/// Dominant training time window across recent workouts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePattern {
    /// Start hour of the most common 2-hour window.
    pub window_start_hour: u32,
    /// Fraction of sessions falling in that window.
    pub share: f64,
    /// Total sessions examined.
    pub sessions: usize,
    /// Weekday with the highest average session volume, if known.
    pub best_day: Option<String>,
}

/// Metrics eligible for cross-correlation discovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Metric {
    SleepQuality,
    WorkoutPerformance,
    Mood,
    Stress,
    Energy,
}

impl Metric {
    const fn label(self) -> &'static str {
        match self {
            Self::SleepQuality => "sleep quality",
            Self::WorkoutPerformance => "workout performance",
            Self::Mood => "mood",
            Self::Stress => "stress",
            Self::Energy => "energy",
        }
    }

    const fn slug(self) -> &'static str {
        match self {
            Self::SleepQuality => "sleep-quality",
            Self::WorkoutPerformance => "workout-performance",
            Self::Mood => "mood",
            Self::Stress => "stress",
            Self::Energy => "energy",
        }
    }
}

/// Fixed candidate set; pairs outside it are never probed.
const CORRELATION_CANDIDATES: [(Metric, Metric); 4] = [
    (Metric::SleepQuality, Metric::WorkoutPerformance),
    (Metric::SleepQuality, Metric::Mood),
    (Metric::Stress, Metric::Energy),
    (Metric::WorkoutPerformance, Metric::Mood),
];

/// Trend of total workout volume, chronological.
#[must_use]
pub fn volume_trend(data: &UserAnalysisData) -> TrendAnalysis {
    let volumes: Vec<f64> = data
        .workouts_by_date()
        .iter()
        .map(|w| w.total_volume_kg)
        .collect();
    trend(&volumes)
}

/// Trend of nightly sleep duration, chronological.
#[must_use]
pub fn sleep_trend(data: &UserAnalysisData) -> TrendAnalysis {
    let hours = data.recent_sleep_hours(data.sleep_nights.len());
    trend(&hours)
}

/// Daily samples of one metric, keyed by calendar date.
fn metric_by_date(data: &UserAnalysisData, metric: Metric) -> HashMap<NaiveDate, f64> {
    let mut samples = HashMap::new();
    match metric {
        Metric::SleepQuality => {
            for night in &data.sleep_nights {
                if let Some(quality) = night.quality {
                    samples.insert(night.date, quality);
                }
            }
        }
        Metric::WorkoutPerformance => {
            for workout in &data.workouts {
                *samples.entry(workout.date.date_naive()).or_insert(0.0) += workout.total_volume_kg;
            }
        }
        Metric::Mood | Metric::Stress | Metric::Energy => {
            for checkin in &data.wellness_checkins {
                let value = match metric {
                    Metric::Mood => checkin.mood,
                    Metric::Stress => checkin.stress,
                    _ => checkin.energy,
                };
                samples.insert(checkin.date, f64::from(value));
            }
        }
    }
    samples
}

/// Probe the fixed candidate pairs and keep the non-noise findings.
///
/// Series are aligned on shared calendar dates before correlation; pairs with
/// `|r|` at or below the configured floor are dropped.
#[must_use]
pub fn discover_correlations(
    data: &UserAnalysisData,
    thresholds: &PatternThresholds,
) -> Vec<CorrelationResult> {
    let mut findings = Vec::new();

    for (a, b) in CORRELATION_CANDIDATES {
        let series_a = metric_by_date(data, a);
        let series_b = metric_by_date(data, b);

        let mut shared_dates: Vec<NaiveDate> = series_a
            .keys()
            .filter(|d| series_b.contains_key(*d))
            .copied()
            .collect();
        shared_dates.sort_unstable();

        let x: Vec<f64> = shared_dates.iter().map(|d| series_a[d]).collect();
        let y: Vec<f64> = shared_dates.iter().map(|d| series_b[d]).collect();

        let coefficient = pearson(&x, &y);
        if coefficient.abs() > thresholds.min_surfaced_correlation {
            findings.push(CorrelationResult {
                metric_a: a.label().to_owned(),
                metric_b: b.label().to_owned(),
                coefficient,
                interpretation: interpret_correlation(coefficient),
            });
        }
    }

    findings
}

/// Muscle-group balance across the workout history.
///
/// Returns `Some` only when at least two groups are tagged and the
/// most/least ratio exceeds the configured threshold.
#[must_use]
pub fn muscle_balance(
    data: &UserAnalysisData,
    thresholds: &PatternThresholds,
) -> Option<MuscleBalance> {
    let mut counts: HashMap<&str, u32> = HashMap::new();
    for workout in &data.workouts {
        for group in &workout.muscle_groups {
            *counts.entry(group.as_str()).or_insert(0) += 1;
        }
    }
    if counts.len() < 2 {
        return None;
    }

    let (most_trained, most_count) = counts
        .iter()
        .max_by(|a, b| a.1.cmp(b.1).then(b.0.cmp(a.0)))
        .map(|(name, count)| ((*name).to_owned(), *count))?;
    let (least_trained, least_count) = counts
        .iter()
        .min_by(|a, b| a.1.cmp(b.1).then(a.0.cmp(b.0)))
        .map(|(name, count)| ((*name).to_owned(), *count))?;

    if least_count == 0 {
        return None;
    }
    let ratio = f64::from(most_count) / f64::from(least_count);
    if ratio <= thresholds.muscle_imbalance_ratio {
        return None;
    }

    Some(MuscleBalance {
        most_trained,
        most_count,
        least_trained,
        least_count,
        ratio,
    })
}

/// Dominant 2-hour training window, or `None` below the session minimum.
#[must_use]
pub fn schedule_consistency(
    data: &UserAnalysisData,
    thresholds: &PatternThresholds,
) -> Option<SchedulePattern> {
    if data.workouts.len() < thresholds.min_schedule_workouts {
        return None;
    }

    let mut buckets: HashMap<u32, usize> = HashMap::new();
    for workout in &data.workouts {
        let bucket = workout.date.hour() / SCHEDULE_WINDOW_HOURS;
        *buckets.entry(bucket).or_insert(0) += 1;
    }

    let (bucket, count) = buckets
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))?;

    let volume_by_day: Vec<_> = data
        .workouts
        .iter()
        .map(|w| (w.date, w.total_volume_kg))
        .collect();

    Some(SchedulePattern {
        window_start_hour: bucket * SCHEDULE_WINDOW_HOURS,
        share: count as f64 / data.workouts.len() as f64,
        sessions: data.workouts.len(),
        best_day: best_day_of_week(&volume_by_day).map(day_name),
    })
}

fn day_name(day: Weekday) -> String {
    let name = match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    };
    name.to_owned()
}

/// Pattern producer: trend, correlation, and structure insights.
///
/// # Errors
///
/// Returns `EngineError::InvalidSnapshot` when the workout-volume or sleep
/// series contains non-finite values.
pub fn generate_insights(
    data: &UserAnalysisData,
    config: &EngineConfig,
    _now: DateTime<Utc>,
) -> Result<Vec<InsightDraft>, EngineError> {
    let volumes: Vec<f64> = data.workouts.iter().map(|w| w.total_volume_kg).collect();
    ensure_finite("workout volume", &volumes)?;
    let sleep_hours: Vec<f64> = data.sleep_nights.iter().map(|s| s.duration_hours).collect();
    ensure_finite("sleep duration", &sleep_hours)?;

    let thresholds = &config.patterns;
    let mut drafts = Vec::new();

    let volume = volume_trend(data);
    match volume.direction {
        TrendDirection::Up => drafts.push(InsightDraft {
            insight_type: InsightType::Trend,
            priority: InsightPriority::Medium,
            category: InsightCategory::Workout,
            title: "Training volume is climbing".to_owned(),
            description: format!(
                "Your session volume is up {:.0}% compared to the start of this period. Keep the progression gradual.",
                volume.percentage
            ),
            icon: "trending-up".to_owned(),
            payload: Some(InsightPayload::Trend(volume)),
            action: None,
            stable_key: stable_key(
                InsightType::Trend,
                InsightCategory::Workout,
                "volume-trend-up",
            ),
        }),
        TrendDirection::Down => drafts.push(InsightDraft {
            insight_type: InsightType::Trend,
            priority: InsightPriority::High,
            category: InsightCategory::Workout,
            title: "Training volume is slipping".to_owned(),
            description: format!(
                "Your session volume has dropped {:.0}% over this period. A lighter block is fine if it is planned.",
                volume.percentage
            ),
            icon: "trending-down".to_owned(),
            payload: Some(InsightPayload::Trend(volume)),
            action: None,
            stable_key: stable_key(
                InsightType::Trend,
                InsightCategory::Workout,
                "volume-trend-down",
            ),
        }),
        TrendDirection::Stable => {}
    }

    let sleep = sleep_trend(data);
    if sleep.direction == TrendDirection::Down && sleep.percentage >= thresholds.sleep_trend_min_percent
    {
        drafts.push(InsightDraft {
            insight_type: InsightType::Trend,
            priority: InsightPriority::High,
            category: InsightCategory::Sleep,
            title: "Sleep is trending down".to_owned(),
            description: format!(
                "You are sleeping about {:.0}% less than at the start of this period. Recovery and performance follow sleep.",
                sleep.percentage
            ),
            icon: "moon".to_owned(),
            payload: Some(InsightPayload::Trend(sleep)),
            action: None,
            stable_key: stable_key(InsightType::Trend, InsightCategory::Sleep, "sleep-trend-down"),
        });
    }

    for finding in discover_correlations(data, thresholds) {
        let pair_slug = format!(
            "{}-{}",
            crate::insight::slugify(&finding.metric_a),
            crate::insight::slugify(&finding.metric_b)
        );
        drafts.push(InsightDraft {
            insight_type: InsightType::Correlation,
            priority: InsightPriority::Low,
            category: InsightCategory::Wellness,
            title: format!(
                "Your {} and {} move together",
                finding.metric_a, finding.metric_b
            ),
            description: format!(
                "There is a {} relationship between your {} and {} (r = {:.2}).",
                finding.interpretation, finding.metric_a, finding.metric_b, finding.coefficient
            ),
            icon: "git-compare".to_owned(),
            payload: Some(InsightPayload::Correlation(finding)),
            action: None,
            stable_key: stable_key(InsightType::Correlation, InsightCategory::Wellness, &pair_slug),
        });
    }

    if let Some(balance) = muscle_balance(data, thresholds) {
        drafts.push(InsightDraft {
            insight_type: InsightType::Optimization,
            priority: InsightPriority::Medium,
            category: InsightCategory::Workout,
            title: "Muscle-group balance is skewed".to_owned(),
            description: format!(
                "You trained {} {} times but {} only {} times. Evening that out reduces injury risk.",
                balance.most_trained, balance.most_count, balance.least_trained, balance.least_count
            ),
            icon: "scale".to_owned(),
            payload: None,
            action: None,
            stable_key: stable_key(
                InsightType::Optimization,
                InsightCategory::Workout,
                "muscle-balance",
            ),
        });
    }

    if let Some(pattern) = schedule_consistency(data, thresholds) {
        if pattern.share >= thresholds.schedule_dominant_share {
            let best_day_note = pattern
                .best_day
                .as_ref()
                .map_or_else(String::new, |day| format!(" {day} is your strongest day."));
            drafts.push(InsightDraft {
                insight_type: InsightType::Optimization,
                priority: InsightPriority::Low,
                category: InsightCategory::Consistency,
                title: "You have a reliable training window".to_owned(),
                description: format!(
                    "{:.0}% of your sessions start between {}:00 and {}:00.{}",
                    pattern.share * 100.0,
                    pattern.window_start_hour,
                    pattern.window_start_hour + SCHEDULE_WINDOW_HOURS,
                    best_day_note
                ),
                icon: "calendar".to_owned(),
                payload: None,
                action: None,
                stable_key: stable_key(
                    InsightType::Optimization,
                    InsightCategory::Consistency,
                    "schedule-consistency",
                ),
            });
        }
    }

    let chronological: Vec<f64> = data
        .workouts_by_date()
        .iter()
        .map(|w| w.total_volume_kg)
        .collect();
    let unusual = anomalies(&chronological, thresholds.volume_anomaly_z);
    if !unusual.is_empty() {
        drafts.push(InsightDraft {
            insight_type: InsightType::Optimization,
            priority: InsightPriority::Low,
            category: InsightCategory::Workout,
            title: "Unusual session volume detected".to_owned(),
            description: format!(
                "{} of your recent sessions deviated sharply from your usual volume. Large jumps are where strains happen.",
                unusual.len()
            ),
            icon: "activity".to_owned(),
            payload: None,
            action: None,
            stable_key: stable_key(
                InsightType::Optimization,
                InsightCategory::Workout,
                "volume-anomaly",
            ),
        });
    }

    Ok(drafts)
}
