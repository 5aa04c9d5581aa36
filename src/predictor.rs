// ABOUTME: Goal-oriented projections: body-composition trajectories, PR forecasts, event readiness
// ABOUTME: Also computes the composite overtraining risk consumed by the alert generator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vida Wellness Intelligence

use crate::config::{EngineConfig, PredictorThresholds};
use crate::errors::{ensure_finite, EngineError};
use crate::insight::{
    slugify, stable_key, InsightCategory, InsightDraft, InsightPayload, InsightPriority,
    InsightType,
};
use crate::snapshot::{UserAnalysisData, WorkoutRecord};
use crate::statistics::trend;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Risk contribution of a week-over-week volume spike.
const RISK_VOLUME_SPIKE: f64 = 0.3;

/// Risk contribution of severe sleep shortage.
const RISK_SLEEP_SEVERE: f64 = 0.3;

/// Risk contribution of moderate sleep shortage.
const RISK_SLEEP_MODERATE: f64 = 0.15;

/// Risk contribution of severe self-reported stress.
const RISK_STRESS_SEVERE: f64 = 0.25;

/// Risk contribution of elevated self-reported stress.
const RISK_STRESS_MODERATE: f64 = 0.10;

/// Risk contribution of depleted self-reported energy.
const RISK_ENERGY_LOW: f64 = 0.20;

/// Trailing weeks averaged when checking for a volume spike.
const SPIKE_TRAILING_WEEKS: usize = 4;

/// Days of history considered "recent" for readiness scoring.
const READINESS_LOOKBACK_DAYS: i64 = 28;

/// Sessions per four weeks that earn the full strength frequency score.
const READINESS_TARGET_SESSIONS: f64 = 12.0;

/// Share of sessions with core work that earns the full core score.
const READINESS_TARGET_CORE_SHARE: f64 = 0.2;

/// Readiness component score below which a recommendation is attached.
const READINESS_COMPONENT_FLOOR: f64 = 70.0;

/// Exercise/tag keywords that mark a session as core work.
const CORE_KEYWORDS: [&str; 3] = ["core", "abs", "plank"];

/// A body-composition trajectory toward a declared target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyProjection {
    /// Latest measured value.
    pub current: f64,
    /// Declared target value.
    pub target: f64,
    /// Recent linear rate of change per week; sign is the direction of travel.
    pub weekly_rate: f64,
    /// Estimated days until the target at the current rate.
    pub days_to_target: i64,
    /// Date the target is projected to be reached.
    pub projected_date: DateTime<Utc>,
    /// Confidence in the projection, 0..1.
    pub confidence: f64,
}

/// Personal-record forecast for one exercise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrPrediction {
    /// Exercise name.
    pub exercise: String,
    /// Heaviest top set in the history.
    pub current_max_kg: f64,
    /// Forecast top set two sessions ahead.
    pub predicted_kg: f64,
    /// Sessions ahead the forecast covers.
    pub sessions_ahead: u32,
    /// Confidence inherited from the progression trend, 0..1.
    pub confidence: f64,
    /// Whether the forecast clears the likelihood bar.
    pub likely: bool,
}

/// Composite readiness for a declared goal event, each component 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventReadiness {
    /// Weighted overall score, 0-100.
    pub overall: f64,
    /// Strength component: training frequency and progression.
    pub strength: f64,
    /// Core component: share of sessions with dedicated core work.
    pub core: f64,
    /// Endurance component: session duration, sleep, and streak.
    pub endurance: f64,
    /// Body-composition component from body-fat bands.
    pub body_composition: f64,
    /// Concrete suggestions for any component under the floor.
    pub recommendations: Vec<String>,
}

/// Composite overtraining risk with the factors that contributed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Additive risk score clamped to 0..1.
    pub score: f64,
    /// Human-readable contributing factors.
    pub factors: Vec<String>,
}

/// Project a dated series toward a target at its recent weekly rate.
///
/// Needs at least `min_body_samples` points. A rate too small to matter
/// yields the 365-day low-confidence fallback (no discernible trend); a rate
/// pointing away from the target yields the same horizon at even lower
/// confidence (actively diverging).
#[must_use]
pub fn project_series(
    samples: &[(DateTime<Utc>, f64)],
    target: f64,
    config: &PredictorThresholds,
) -> Option<BodyProjection> {
    if samples.len() < config.min_body_samples {
        return None;
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by_key(|(date, _)| *date);
    let start = sorted.len().saturating_sub(config.projection_window);
    let window = &sorted[start..];

    let (oldest_date, oldest) = window[0];
    let (latest_date, latest) = window[window.len() - 1];
    let weeks = (latest_date - oldest_date).num_days() as f64 / 7.0;
    if weeks <= 0.0 {
        return None;
    }

    let weekly_rate = (latest - oldest) / weeks;
    let gap = target - latest;

    let fallback = |confidence: f64| BodyProjection {
        current: latest,
        target,
        weekly_rate,
        days_to_target: config.fallback_days,
        projected_date: latest_date + Duration::days(config.fallback_days),
        confidence,
    };

    if weekly_rate.abs() < config.min_weekly_rate {
        return Some(fallback(config.flat_fallback_confidence));
    }
    if weekly_rate * gap < 0.0 {
        return Some(fallback(config.diverging_fallback_confidence));
    }

    let weeks_to_target = gap / weekly_rate;
    let days_to_target = (weeks_to_target * 7.0).abs().round() as i64;

    let values: Vec<f64> = window.iter().map(|(_, v)| *v).collect();
    let confidence = trend(&values).confidence * config.projection_confidence_factor;

    Some(BodyProjection {
        current: latest,
        target,
        weekly_rate,
        days_to_target,
        projected_date: latest_date + Duration::days(days_to_target),
        confidence,
    })
}

/// Weight trajectory toward the declared weight target.
#[must_use]
pub fn project_weight(data: &UserAnalysisData, config: &PredictorThresholds) -> Option<BodyProjection> {
    let target = data.goals.target_weight_kg?;
    let samples: Vec<(DateTime<Utc>, f64)> = data
        .body_measurements
        .iter()
        .map(|m| (m.date, m.weight_kg))
        .collect();
    project_series(&samples, target, config)
}

/// Muscle-mass trajectory toward the declared muscle target.
#[must_use]
pub fn project_muscle(data: &UserAnalysisData, config: &PredictorThresholds) -> Option<BodyProjection> {
    let target = data.goals.target_muscle_kg?;
    let samples: Vec<(DateTime<Utc>, f64)> = data
        .body_measurements
        .iter()
        .filter_map(|m| m.muscle_mass_kg.map(|kg| (m.date, kg)))
        .collect();
    project_series(&samples, target, config)
}

/// Forecast personal records from per-exercise top-set progressions.
///
/// Only exercises with an upward trend above the configured percentage are
/// forecast, and output is capped to the most confident few.
#[must_use]
pub fn predict_prs(data: &UserAnalysisData, config: &PredictorThresholds) -> Vec<PrPrediction> {
    let mut history: HashMap<&str, Vec<f64>> = HashMap::new();
    for workout in data.workouts_by_date() {
        for exercise in &workout.exercises {
            history
                .entry(exercise.name.as_str())
                .or_default()
                .push(exercise.top_weight_kg);
        }
    }

    let mut predictions = Vec::new();
    for (name, weights) in history {
        if weights.len() < config.pr_min_points {
            continue;
        }
        let progression = trend(&weights);
        if progression.direction != crate::statistics::TrendDirection::Up
            || progression.percentage <= config.pr_min_trend_pct
        {
            continue;
        }

        let current_max = weights.iter().copied().fold(f64::MIN, f64::max);
        let last = weights[weights.len() - 1];
        let first = weights[0];
        let avg_session_increase = (last - first) / (weights.len() - 1) as f64;

        predictions.push(PrPrediction {
            exercise: name.to_owned(),
            current_max_kg: current_max,
            predicted_kg: (current_max + avg_session_increase * 2.0).round(),
            sessions_ahead: 2,
            confidence: progression.confidence,
            likely: progression.confidence > config.pr_likely_confidence,
        });
    }

    // Confidence then name keeps output deterministic across hash orders.
    predictions.sort_by(|a, b| {
        b.confidence
            .total_cmp(&a.confidence)
            .then_with(|| a.exercise.cmp(&b.exercise))
    });
    predictions.truncate(config.pr_max_predictions);
    predictions
}

fn is_core_session(workout: &WorkoutRecord) -> bool {
    let tagged = workout
        .muscle_groups
        .iter()
        .any(|g| CORE_KEYWORDS.iter().any(|k| g.to_lowercase().contains(k)));
    let named = workout
        .exercises
        .iter()
        .any(|e| CORE_KEYWORDS.iter().any(|k| e.name.to_lowercase().contains(k)));
    tagged || named
}

fn body_composition_score(data: &UserAnalysisData, config: &PredictorThresholds) -> f64 {
    let latest_fat = data
        .measurements_by_date()
        .iter()
        .rev()
        .find_map(|m| m.body_fat_pct);
    let Some(fat) = latest_fat else {
        return config.readiness_fat_unknown_score;
    };
    config
        .readiness_fat_bands
        .iter()
        .find(|(upper, _)| fat < *upper)
        .map_or(config.readiness_fat_floor_score, |(_, score)| *score)
}

/// Composite readiness for the declared goal event.
///
///// Weighted blend: strength 35%, core 20%, endurance 25%, body composition
/// 20%. Returns `None` when no event date is declared.
#[must_use]
pub fn event_readiness(
    data: &UserAnalysisData,
    config: &PredictorThresholds,
    now: DateTime<Utc>,
) -> Option<EventReadiness> {
    data.goals.event_date?;

    let recent: Vec<&WorkoutRecord> = data
        .workouts
        .iter()
        .filter(|w| (now - w.date).num_days() <= READINESS_LOOKBACK_DAYS)
        .collect();

    let frequency_score = (recent.len() as f64 / READINESS_TARGET_SESSIONS * 60.0).min(60.0);
    let progression = crate::patterns::volume_trend(data);
    let progression_score = match progression.direction {
        crate::statistics::TrendDirection::Up => 40.0 * progression.confidence,
        crate::statistics::TrendDirection::Stable => 20.0,
        crate::statistics::TrendDirection::Down => 10.0,
    };
    let strength = (frequency_score + progression_score).min(100.0);

    let core = if recent.is_empty() {
        0.0
    } else {
        let core_share =
            recent.iter().filter(|w| is_core_session(w)).count() as f64 / recent.len() as f64;
        (core_share / READINESS_TARGET_CORE_SHARE * 100.0).min(100.0)
    };

    let avg_duration = if recent.is_empty() {
        0.0
    } else {
        recent.iter().map(|w| w.duration_minutes).sum::<f64>() / recent.len() as f64
    };
    let duration_score = (avg_duration / 60.0 * 50.0).min(50.0);
    let sleep_hours = data.recent_sleep_hours(7);
    let sleep_score = if sleep_hours.is_empty() {
        0.0
    } else {
        (crate::statistics::average(&sleep_hours) / 8.0 * 30.0).min(30.0)
    };
    let streak_score = (f64::from(data.gamification.streak) / 14.0 * 20.0).min(20.0);
    let endurance = (duration_score + sleep_score + streak_score).min(100.0);

    let body_composition = body_composition_score(data, config);

    let overall = strength * 0.35 + core * 0.20 + endurance * 0.25 + body_composition * 0.20;

    let mut recommendations = Vec::new();
    if strength < READINESS_COMPONENT_FLOOR {
        recommendations.push("Add a dedicated leg-strength session each week.".to_owned());
    }
    if core < READINESS_COMPONENT_FLOOR {
        recommendations.push("Add core work two or three times per week.".to_owned());
    }
    if endurance < READINESS_COMPONENT_FLOOR {
        recommendations.push("Build longer steady sessions and protect your sleep.".to_owned());
    }
    if body_composition < READINESS_COMPONENT_FLOOR {
        recommendations.push("Tighten nutrition to bring body composition along.".to_owned());
    }

    Some(EventReadiness {
        overall,
        strength,
        core,
        endurance,
        body_composition,
        recommendations,
    })
}

/// Composite overtraining risk, 0..1, from additive capped contributions.
///
/// Factors: a volume spike over the trailing four-week average, short sleep,
/// high stress, and depleted energy over the last seven days. Each factor
/// guards its own minimum sample count.
#[must_use]
pub fn overtraining_risk(data: &UserAnalysisData, config: &PredictorThresholds) -> RiskAssessment {
    let mut score = 0.0;
    let mut factors = Vec::new();

    if data.weekly_volumes.len() >= 2 {
        let latest = data.weekly_volumes[data.weekly_volumes.len() - 1];
        let trailing = &data.weekly_volumes
            [data.weekly_volumes.len().saturating_sub(SPIKE_TRAILING_WEEKS + 1)
                ..data.weekly_volumes.len() - 1];
        let trailing_avg = crate::statistics::average(trailing);
        if trailing_avg > 0.0 && latest > config.volume_spike_ratio * trailing_avg {
            score += RISK_VOLUME_SPIKE;
            factors.push(format!(
                "Weekly volume spiked to {:.0}% of your recent average",
                latest / trailing_avg * 100.0
            ));
        }
    }

    let sleep_hours = data.recent_sleep_hours(7);
    if sleep_hours.len() >= 3 {
        let avg = crate::statistics::average(&sleep_hours);
        if avg < config.risk_sleep_severe_hours {
            score += RISK_SLEEP_SEVERE;
            factors.push(format!("Averaging only {avg:.1}h of sleep this week"));
        } else if avg < config.risk_sleep_moderate_hours {
            score += RISK_SLEEP_MODERATE;
            factors.push(format!("Sleep is a little short at {avg:.1}h on average"));
        }
    }

    let checkins = data.recent_checkins(7);
    if checkins.len() >= 3 {
        let stress: Vec<f64> = checkins.iter().map(|c| f64::from(c.stress)).collect();
        let avg_stress = crate::statistics::average(&stress);
        if avg_stress > config.risk_stress_severe {
            score += RISK_STRESS_SEVERE;
            factors.push(format!("Self-reported stress is very high ({avg_stress:.1}/5)"));
        } else if avg_stress > config.risk_stress_moderate {
            score += RISK_STRESS_MODERATE;
            factors.push(format!("Self-reported stress is elevated ({avg_stress:.1}/5)"));
        }

        let energy: Vec<f64> = checkins.iter().map(|c| f64::from(c.energy)).collect();
        let avg_energy = crate::statistics::average(&energy);
        if avg_energy < config.risk_energy_low {
            score += RISK_ENERGY_LOW;
            factors.push(format!("Energy levels are depleted ({avg_energy:.1}/5)"));
        }
    }

    RiskAssessment {
        score: score.clamp(0.0, 1.0),
        factors,
    }
}

/// Predictor producer: projections, PR forecasts, and event readiness.
///
/// The overtraining risk computed here is alerted by the alert generator,
/// not by this producer.
///
/// # Errors
///
/// Returns `EngineError::InvalidSnapshot` when the weekly-volume or
/// body-measurement series contains non-finite values.
pub fn generate_insights(
    data: &UserAnalysisData,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Result<Vec<InsightDraft>, EngineError> {
    ensure_finite("weekly volume", &data.weekly_volumes)?;
    let weights: Vec<f64> = data.body_measurements.iter().map(|m| m.weight_kg).collect();
    ensure_finite("body weight", &weights)?;

    let cfg = &config.predictor;
    let mut drafts = Vec::new();

    if let Some(projection) = project_weight(data, cfg) {
        if projection.confidence >= cfg.projection_insight_confidence {
            drafts.push(InsightDraft {
                insight_type: InsightType::Prediction,
                priority: InsightPriority::Medium,
                category: InsightCategory::Body,
                title: "Weight goal projection".to_owned(),
                description: format!(
                    "At {:+.2} kg/week you reach {:.1} kg in about {} days (around {}).",
                    projection.weekly_rate,
                    projection.target,
                    projection.days_to_target,
                    projection.projected_date.format("%Y-%m-%d")
                ),
                icon: "target".to_owned(),
                payload: Some(InsightPayload::WeightProjection(projection)),
                action: None,
                stable_key: stable_key(InsightType::Prediction, InsightCategory::Body, "weight-goal"),
            });
        }
    }

    if let Some(projection) = project_muscle(data, cfg) {
        if projection.confidence >= cfg.projection_insight_confidence {
            drafts.push(InsightDraft {
                insight_type: InsightType::Prediction,
                priority: InsightPriority::Medium,
                category: InsightCategory::Body,
                title: "Muscle goal projection".to_owned(),
                description: format!(
                    "Muscle mass is moving {:+.2} kg/week; the {:.1} kg target is about {} days out.",
                    projection.weekly_rate, projection.target, projection.days_to_target
                ),
                icon: "dumbbell".to_owned(),
                payload: Some(InsightPayload::MuscleProjection(projection)),
                action: None,
                stable_key: stable_key(InsightType::Prediction, InsightCategory::Body, "muscle-goal"),
            });
        }
    }

    for prediction in predict_prs(data, cfg) {
        if !prediction.likely {
            continue;
        }
        let slug = format!("pr-{}", slugify(&prediction.exercise));
        drafts.push(InsightDraft {
            insight_type: InsightType::Prediction,
            priority: InsightPriority::Low,
            category: InsightCategory::Workout,
            title: format!("PR within reach: {}", prediction.exercise),
            description: format!(
                "Your {} is trending up. Around {:.0} kg looks achievable within {} sessions.",
                prediction.exercise, prediction.predicted_kg, prediction.sessions_ahead
            ),
            icon: "trophy".to_owned(),
            payload: Some(InsightPayload::PersonalRecord(prediction)),
            action: None,
            stable_key: stable_key(InsightType::Prediction, InsightCategory::Workout, &slug),
        });
    }

    if let Some(event_date) = data.goals.event_date {
        if event_date >= now.date_naive() {
            if let Some(readiness) = event_readiness(data, cfg, now) {
                let days_out = (event_date - now.date_naive()).num_days();
                let advice = if readiness.recommendations.is_empty() {
                    "Keep doing what you are doing.".to_owned()
                } else {
                    readiness.recommendations.join(" ")
                };
                drafts.push(InsightDraft {
                    insight_type: InsightType::Prediction,
                    priority: InsightPriority::Medium,
                    category: InsightCategory::Goals,
                    title: format!("Event readiness: {:.0}%", readiness.overall),
                    description: format!(
                        "{days_out} days to your event. Strength {:.0}, core {:.0}, endurance {:.0}, body composition {:.0}. {advice}",
                        readiness.strength, readiness.core, readiness.endurance, readiness.body_composition
                    ),
                    icon: "mountain".to_owned(),
                    payload: Some(InsightPayload::Readiness(readiness)),
                    action: None,
                    stable_key: stable_key(
                        InsightType::Prediction,
                        InsightCategory::Goals,
                        "event-readiness",
                    ),
                });
            }
        }
    }

    Ok(drafts)
}
