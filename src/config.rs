// ABOUTME: Injected threshold and milestone configuration for all insight producers
// ABOUTME: Defaults carry the documented rule constants; nothing is hard-coded in rule bodies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vida Wellness Intelligence

use serde::{Deserialize, Serialize};

/// Full engine configuration, injected into the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pattern producer thresholds.
    pub patterns: PatternThresholds,
    /// Alert rule thresholds.
    pub alerts: AlertThresholds,
    /// Recommendation rule thresholds.
    pub recommendations: RecommendationThresholds,
    /// Projection and risk-score tuning.
    pub predictor: PredictorThresholds,
    /// Streak milestone ladder, ascending.
    pub milestones: Vec<u32>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            patterns: PatternThresholds::default(),
            alerts: AlertThresholds::default(),
            recommendations: RecommendationThresholds::default(),
            predictor: PredictorThresholds::default(),
            milestones: vec![7, 14, 21, 30, 60, 90, 100, 150, 200, 365],
        }
    }
}

/// Thresholds for the pattern producer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatternThresholds {
    /// Pearson magnitude a correlation must exceed to be surfaced.
    pub min_surfaced_correlation: f64,
    /// Sleep-duration drop (percent) worth a trend insight.
    pub sleep_trend_min_percent: f64,
    /// Most/least muscle-group count ratio beyond which training is imbalanced.
    pub muscle_imbalance_ratio: f64,
    /// Share of sessions in one time window that counts as a fixed schedule.
    pub schedule_dominant_share: f64,
    /// Minimum workouts before schedule analysis is attempted.
    pub min_schedule_workouts: usize,
    /// Z-score threshold for unusual session volumes.
    pub volume_anomaly_z: f64,
}

impl Default for PatternThresholds {
    fn default() -> Self {
        Self {
            min_surfaced_correlation: 0.3,
            sleep_trend_min_percent: 10.0,
            muscle_imbalance_ratio: 2.0,
            schedule_dominant_share: 0.6,
            min_schedule_workouts: 3,
            volume_anomaly_z: 2.0,
        }
    }
}

/// Thresholds for the alert rule table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Days of high-priority supplement stock left that is critical.
    pub supplement_critical_days: u32,
    /// Days of high-priority supplement stock left that is urgent.
    pub supplement_high_days: u32,
    /// Days of high-priority supplement stock left worth a reorder reminder.
    pub supplement_reorder_days: u32,
    /// Overtraining risk score that is critical.
    pub overtraining_critical: f64,
    /// Overtraining risk score that is high.
    pub overtraining_high: f64,
    /// 7-day calorie shortfall (kcal) that is high priority.
    pub calorie_deficit_high: f64,
    /// 7-day calorie shortfall (kcal) that is medium priority.
    pub calorie_deficit_medium: f64,
    /// 7-day calorie excess (kcal) worth a surplus alert.
    pub calorie_surplus: f64,
    /// 7-day protein shortfall (grams) that is high priority.
    pub protein_deficit_g: f64,
    /// 7-day average sleep (hours) that is critical.
    pub sleep_critical_hours: f64,
    /// 7-day average sleep (hours) that is high priority.
    pub sleep_high_hours: f64,
    /// Fraction of the water goal below which hydration is high priority.
    pub hydration_high_ratio: f64,
    /// Fraction of the water goal below which hydration is medium priority.
    pub hydration_medium_ratio: f64,
    /// Days without a workout that is high priority.
    pub inactivity_high_days: i64,
    /// Days without a workout worth a medium nudge.
    pub inactivity_medium_days: i64,
    /// Days of meal history scanned for medication-window violations.
    pub medication_lookback_days: i64,
    /// Minimum nutrition samples before calorie/protein rules evaluate.
    pub min_nutrition_samples: usize,
    /// Minimum sleep samples before the sleep rule evaluates.
    pub min_sleep_samples: usize,
    /// Minimum hydration samples before the hydration rule evaluates.
    pub min_hydration_samples: usize,
    /// Minimum workout history before streak/inactivity commentary fires.
    pub min_workout_samples: usize,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            supplement_critical_days: 3,
            supplement_high_days: 7,
            supplement_reorder_days: 14,
            overtraining_critical: 0.8,
            overtraining_high: 0.6,
            calorie_deficit_high: 700.0,
            calorie_deficit_medium: 500.0,
            calorie_surplus: 500.0,
            protein_deficit_g: 30.0,
            sleep_critical_hours: 5.5,
            sleep_high_hours: 6.5,
            hydration_high_ratio: 0.6,
            hydration_medium_ratio: 0.8,
            inactivity_high_days: 5,
            inactivity_medium_days: 3,
            medication_lookback_days: 7,
            min_nutrition_samples: 3,
            min_sleep_samples: 3,
            min_hydration_samples: 3,
            min_workout_samples: 3,
        }
    }
}

/// Thresholds for the recommendation rule table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationThresholds {
    /// Weekly-volume change (percent) under which a stable trend is a plateau.
    pub plateau_max_change_pct: f64,
    /// Weeks of volume history required before plateau detection.
    pub plateau_min_weeks: usize,
    /// Sessions in the trailing 7 days that earn a rest-day suggestion.
    pub rest_day_session_count: usize,
    /// Sessions examined for workout variety.
    pub variety_window: usize,
    /// Distinct workout names at or below which variety is suggested.
    pub variety_max_distinct: usize,
    /// Days of the last 7 on protein target that earn a celebration.
    pub protein_celebrate_days: usize,
    /// Days of the last 7 on protein target below which a warning fires.
    pub protein_warn_days: usize,
    /// 7-day average sleep (hours) that earns a celebration.
    pub sleep_celebrate_hours: f64,
    /// Lower bound of the gentle-nudge sleep band (hours).
    pub sleep_nudge_low_hours: f64,
    /// Upper bound of the gentle-nudge sleep band (hours).
    pub sleep_nudge_high_hours: f64,
    /// 7-day average sleep-quality score below which a warning fires.
    pub sleep_quality_low: f64,
    /// Days since the last body measurement that earn a reminder.
    pub measurement_stale_days: i64,
    /// Days before the next streak milestone worth announcing.
    pub milestone_window_days: u32,
    /// Week-over-week daily-score swing (percent) worth commentary.
    pub score_swing_pct: f64,
}

impl Default for RecommendationThresholds {
    fn default() -> Self {
        Self {
            plateau_max_change_pct: 3.0,
            plateau_min_weeks: 4,
            rest_day_session_count: 6,
            variety_window: 10,
            variety_max_distinct: 2,
            protein_celebrate_days: 6,
            protein_warn_days: 4,
            sleep_celebrate_hours: 7.5,
            sleep_nudge_low_hours: 6.5,
            sleep_nudge_high_hours: 7.0,
            sleep_quality_low: 60.0,
            measurement_stale_days: 30,
            milestone_window_days: 3,
            score_swing_pct: 15.0,
        }
    }
}

/// Projection and composite-score tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictorThresholds {
    /// Minimum body-composition samples before a projection is attempted.
    pub min_body_samples: usize,
    /// Most recent samples the weekly rate is computed over.
    pub projection_window: usize,
    /// Weekly rate magnitude under which no trend is discernible.
    pub min_weekly_rate: f64,
    /// Horizon (days) reported by the no-trend and diverging fallbacks.
    pub fallback_days: i64,
    /// Confidence of the no-discernible-trend fallback.
    pub flat_fallback_confidence: f64,
    /// Confidence of the moving-away-from-goal fallback.
    pub diverging_fallback_confidence: f64,
    /// Confidence a projection keeps relative to its underlying trend.
    pub projection_confidence_factor: f64,
    /// Projection confidence below which no insight is emitted.
    pub projection_insight_confidence: f64,
    /// Minimum per-exercise data points before a PR forecast.
    pub pr_min_points: usize,
    /// Minimum upward trend (percent) before a PR forecast.
    pub pr_min_trend_pct: f64,
    /// Maximum PR forecasts surfaced per run.
    pub pr_max_predictions: usize,
    /// Trend confidence above which a PR is called likely.
    pub pr_likely_confidence: f64,
    /// Ratio of latest week to trailing average that counts as a volume spike.
    pub volume_spike_ratio: f64,
    /// 7-day average sleep (hours) contributing severe overtraining risk.
    pub risk_sleep_severe_hours: f64,
    /// 7-day average sleep (hours) contributing moderate overtraining risk.
    pub risk_sleep_moderate_hours: f64,
    /// 7-day average stress contributing severe overtraining risk.
    pub risk_stress_severe: f64,
    /// 7-day average stress contributing moderate overtraining risk.
    pub risk_stress_moderate: f64,
    /// 7-day average energy below which overtraining risk accrues.
    pub risk_energy_low: f64,
    /// Body-fat bands for the readiness body-composition score, ascending:
    /// the first band whose upper bound exceeds the measurement wins.
    pub readiness_fat_bands: Vec<(f64, f64)>,
    /// Body-composition score above the last band's upper bound.
    pub readiness_fat_floor_score: f64,
    /// Body-composition score when no body-fat measurement exists.
    pub readiness_fat_unknown_score: f64,
}

impl Default for PredictorThresholds {
    fn default() -> Self {
        Self {
            min_body_samples: 4,
            projection_window: 8,
            min_weekly_rate: 0.05,
            fallback_days: 365,
            flat_fallback_confidence: 0.2,
            diverging_fallback_confidence: 0.1,
            projection_confidence_factor: 0.8,
            projection_insight_confidence: 0.3,
            pr_min_points: 4,
            pr_min_trend_pct: 3.0,
            pr_max_predictions: 3,
            pr_likely_confidence: 0.5,
            volume_spike_ratio: 1.3,
            risk_sleep_severe_hours: 6.0,
            risk_sleep_moderate_hours: 7.0,
            risk_stress_severe: 4.0,
            risk_stress_moderate: 3.0,
            risk_energy_low: 2.5,
            readiness_fat_bands: vec![(15.0, 100.0), (20.0, 85.0), (25.0, 70.0), (30.0, 50.0)],
            readiness_fat_floor_score: 30.0,
            readiness_fat_unknown_score: 50.0,
        }
    }
}
