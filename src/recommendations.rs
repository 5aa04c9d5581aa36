// ABOUTME: Lower-urgency optimization and celebration insights
// ABOUTME: Heuristic rule table: plateaus, rest days, variety, consistency, milestones, recomposition
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vida Wellness Intelligence

use crate::config::EngineConfig;
use crate::errors::{ensure_finite, EngineError};
use crate::insight::{
    stable_key, InsightAction, InsightCategory, InsightDraft, InsightPayload, InsightPriority,
    InsightType,
};
use crate::snapshot::UserAnalysisData;
use crate::statistics::{average, consistency, days_since, trend, TrendDirection};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// Samples required on both sides of a week-over-week score comparison.
const SCORE_COMPARISON_DAYS: usize = 7;

/// Everything one recommendation rule may inspect.
pub struct RuleContext<'a> {
    /// The snapshot under analysis.
    pub data: &'a UserAnalysisData,
    /// Injected engine configuration.
    pub config: &'a EngineConfig,
    /// The run timestamp, from the injected clock.
    pub now: DateTime<Utc>,
}

/// One entry of the recommendation rule table.
pub struct RecommendationRule {
    /// Rule name, used for logging and trace output.
    pub slug: &'static str,
    /// Predicate-and-build function; empty output means the rule did not fire.
    pub eval: fn(&RuleContext<'_>) -> Vec<InsightDraft>,
}

/// The full recommendation rule table, evaluated uniformly per run.
#[must_use]
pub fn recommendation_rules() -> &'static [RecommendationRule] {
    &[
        RecommendationRule { slug: "plateau", eval: plateau },
        RecommendationRule { slug: "rest-day", eval: rest_day },
        RecommendationRule { slug: "variety", eval: variety },
        RecommendationRule { slug: "protein-consistency", eval: protein_consistency },
        RecommendationRule { slug: "sleep-feedback", eval: sleep_feedback },
        RecommendationRule { slug: "sleep-quality", eval: sleep_quality },
        RecommendationRule { slug: "body-measurement", eval: body_measurement },
        RecommendationRule { slug: "recomposition", eval: recomposition },
        RecommendationRule { slug: "streak-milestone", eval: streak_milestone },
        RecommendationRule { slug: "score-trend", eval: score_trend },
    ]
}

/// Recommendation producer: evaluates every rule in the table.
///
/// # Errors
///
/// Returns `EngineError::InvalidSnapshot` when the daily-score or
/// weekly-volume series contains non-finite values.
pub fn generate_insights(
    data: &UserAnalysisData,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Result<Vec<InsightDraft>, EngineError> {
    let scores: Vec<f64> = data.daily_scores.iter().map(|s| s.value).collect();
    ensure_finite("daily score", &scores)?;
    ensure_finite("weekly volume", &data.weekly_volumes)?;

    let ctx = RuleContext { data, config, now };
    let mut drafts = Vec::new();
    for rule in recommendation_rules() {
        let fired = (rule.eval)(&ctx);
        if !fired.is_empty() {
            tracing::debug!(rule = rule.slug, count = fired.len(), "recommendation rule fired");
        }
        drafts.extend(fired);
    }
    Ok(drafts)
}

fn plateau(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.recommendations;
    if ctx.data.weekly_volumes.len() < thresholds.plateau_min_weeks {
        return Vec::new();
    }

    let volume = trend(&ctx.data.weekly_volumes);
    if volume.direction != TrendDirection::Stable
        || volume.percentage >= thresholds.plateau_max_change_pct
    {
        return Vec::new();
    }

    vec![InsightDraft {
        insight_type: InsightType::Recommendation,
        priority: InsightPriority::Medium,
        category: InsightCategory::Workout,
        title: "Your training volume has plateaued".to_owned(),
        description: format!(
            "Weekly volume has moved less than {:.0}% for over a month. Add weight, reps, or a set to keep progressing.",
            thresholds.plateau_max_change_pct
        ),
        icon: "bar-chart".to_owned(),
        payload: Some(InsightPayload::Trend(volume)),
        action: None,
        stable_key: stable_key(InsightType::Recommendation, InsightCategory::Workout, "plateau"),
    }]
}

fn rest_day(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.recommendations;
    let week_ago = ctx.now - Duration::days(7);
    let sessions = ctx
        .data
        .workouts
        .iter()
        .filter(|w| w.date > week_ago && w.date <= ctx.now)
        .count();

    if sessions < thresholds.rest_day_session_count {
        return Vec::new();
    }

    vec![InsightDraft {
        insight_type: InsightType::Recommendation,
        priority: InsightPriority::Medium,
        category: InsightCategory::Workout,
        title: "Consider a rest day".to_owned(),
        description: format!(
            "You trained {sessions} times in the last seven days. Adaptation happens while you rest."
        ),
        icon: "bed".to_owned(),
        payload: None,
        action: None,
        stable_key: stable_key(InsightType::Recommendation, InsightCategory::Workout, "rest-day"),
    }]
}

fn variety(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.recommendations;
    let recent = ctx.data.workouts_by_date();
    if recent.len() < thresholds.variety_window {
        return Vec::new();
    }

    let last: Vec<_> = recent[recent.len() - thresholds.variety_window..].to_vec();
    let distinct: HashSet<&str> = last.iter().map(|w| w.name.as_str()).collect();
    if distinct.len() > thresholds.variety_max_distinct {
        return Vec::new();
    }

    vec![InsightDraft {
        insight_type: InsightType::Recommendation,
        priority: InsightPriority::Low,
        category: InsightCategory::Workout,
        title: "Your routine is getting repetitive".to_owned(),
        description: format!(
            "Only {} distinct workouts in your last {} sessions. New stimulus drives new adaptation.",
            distinct.len(),
            thresholds.variety_window
        ),
        icon: "shuffle".to_owned(),
        payload: None,
        action: None,
        stable_key: stable_key(InsightType::Recommendation, InsightCategory::Workout, "variety"),
    }]
}

fn protein_consistency(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.recommendations;
    let Some(goal) = ctx.data.goals.daily_protein_g else {
        return Vec::new();
    };

    let recent = ctx.data.recent_nutrition(7);
    if recent.len() < 7 {
        return Vec::new();
    }
    let protein: Vec<f64> = recent.iter().map(|d| d.protein_g).collect();
    let on_target = (consistency(&protein, goal) * protein.len() as f64).round() as usize;

    if on_target >= thresholds.protein_celebrate_days {
        vec![InsightDraft {
            insight_type: InsightType::Achievement,
            priority: InsightPriority::Low,
            category: InsightCategory::Nutrition,
            title: "Protein has been dialed in".to_owned(),
            description: format!(
                "You hit your protein target {on_target} of the last 7 days. That consistency is what builds muscle."
            ),
            icon: "award".to_owned(),
            payload: None,
            action: None,
            stable_key: stable_key(
                InsightType::Achievement,
                InsightCategory::Nutrition,
                "protein-consistency",
            ),
        }]
    } else if on_target < thresholds.protein_warn_days {
        vec![InsightDraft {
            insight_type: InsightType::Recommendation,
            priority: InsightPriority::Medium,
            category: InsightCategory::Nutrition,
            title: "Protein is inconsistent".to_owned(),
            description: format!(
                "You reached your protein target only {on_target} of the last 7 days. Front-load protein earlier in the day."
            ),
            icon: "utensils".to_owned(),
            payload: None,
            action: None,
            stable_key: stable_key(
                InsightType::Recommendation,
                InsightCategory::Nutrition,
                "protein-inconsistent",
            ),
        }]
    } else {
        Vec::new()
    }
}

fn sleep_feedback(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.recommendations;
    let hours = ctx.data.recent_sleep_hours(7);
    if hours.len() < 3 {
        return Vec::new();
    }
    let avg = average(&hours);

    if avg >= thresholds.sleep_celebrate_hours {
        vec![InsightDraft {
            insight_type: InsightType::Achievement,
            priority: InsightPriority::Low,
            category: InsightCategory::Sleep,
            title: "Excellent sleep this week".to_owned(),
            description: format!(
                "You averaged {avg:.1}h per night. Recovery like this is where gains are made."
            ),
            icon: "moon".to_owned(),
            payload: None,
            action: None,
            stable_key: stable_key(InsightType::Achievement, InsightCategory::Sleep, "sleep-strong"),
        }]
    } else if avg >= thresholds.sleep_nudge_low_hours && avg < thresholds.sleep_nudge_high_hours {
        vec![InsightDraft {
            insight_type: InsightType::Recommendation,
            priority: InsightPriority::Low,
            category: InsightCategory::Sleep,
            title: "A little more sleep would help".to_owned(),
            description: format!(
                "You averaged {avg:.1}h per night this week. Thirty more minutes would put you in the recovery zone."
            ),
            icon: "moon".to_owned(),
            payload: None,
            action: None,
            stable_key: stable_key(InsightType::Recommendation, InsightCategory::Sleep, "sleep-nudge"),
        }]
    } else {
        Vec::new()
    }
}

fn sleep_quality(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.recommendations;
    let mut nights = ctx.data.sleep_nights.clone();
    nights.sort_by_key(|n| n.date);
    let qualities: Vec<f64> = nights
        .iter()
        .rev()
        .take(7)
        .filter_map(|n| n.quality)
        .collect();
    if qualities.len() < 3 {
        return Vec::new();
    }

    let avg = average(&qualities);
    if avg >= thresholds.sleep_quality_low {
        return Vec::new();
    }

    vec![InsightDraft {
        insight_type: InsightType::Recommendation,
        priority: InsightPriority::Medium,
        category: InsightCategory::Sleep,
        title: "Sleep quality is low".to_owned(),
        description: format!(
            "Your average sleep-quality score this week is {avg:.0}/100. Look at caffeine timing, screens, and room temperature."
        ),
        icon: "moon".to_owned(),
        payload: None,
        action: None,
        stable_key: stable_key(
            InsightType::Recommendation,
            InsightCategory::Sleep,
            "sleep-quality-low",
        ),
    }]
}

fn body_measurement(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.recommendations;

    if ctx.data.body_measurements.is_empty() {
        return vec![InsightDraft {
            insight_type: InsightType::Recommendation,
            priority: InsightPriority::Low,
            category: InsightCategory::Body,
            title: "Take your first measurement".to_owned(),
            description: "Log a starting weight and body composition so your progress has a baseline."
                .to_owned(),
            icon: "scale".to_owned(),
            payload: None,
            action: Some(InsightAction::navigate("Add measurement", "/body/measure")),
            stable_key: stable_key(
                InsightType::Recommendation,
                InsightCategory::Body,
                "first-measurement",
            ),
        }];
    }

    let latest = ctx.data.body_measurements.iter().map(|m| m.date).max();
    let stale_days = days_since(latest, ctx.now);
    if stale_days <= thresholds.measurement_stale_days {
        return Vec::new();
    }

    vec![InsightDraft {
        insight_type: InsightType::Recommendation,
        priority: InsightPriority::Low,
        category: InsightCategory::Body,
        title: "Time for a fresh measurement".to_owned(),
        description: format!(
            "Your last body measurement was {stale_days} days ago. Regular check-ins keep your projections honest."
        ),
        icon: "scale".to_owned(),
        payload: None,
        action: Some(InsightAction::navigate("Add measurement", "/body/measure")),
        stable_key: stable_key(
            InsightType::Recommendation,
            InsightCategory::Body,
            "measurement-stale",
        ),
    }]
}

fn recomposition(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let sorted = ctx.data.measurements_by_date();
    let with_both: Vec<_> = sorted
        .iter()
        .filter(|m| m.muscle_mass_kg.is_some() && m.body_fat_pct.is_some())
        .collect();
    if with_both.len() < 2 {
        return Vec::new();
    }

    let previous = with_both[with_both.len() - 2];
    let latest = with_both[with_both.len() - 1];
    let (Some(muscle_prev), Some(muscle_now)) = (previous.muscle_mass_kg, latest.muscle_mass_kg)
    else {
        return Vec::new();
    };
    let (Some(fat_prev), Some(fat_now)) = (previous.body_fat_pct, latest.body_fat_pct) else {
        return Vec::new();
    };

    if muscle_now <= muscle_prev || fat_now >= fat_prev {
        return Vec::new();
    }

    vec![InsightDraft {
        insight_type: InsightType::Achievement,
        priority: InsightPriority::Low,
        category: InsightCategory::Body,
        title: "Body recomposition in progress".to_owned(),
        description: format!(
            "Muscle up {:.1} kg and body fat down {:.1} points since your last measurement. That is the hardest combination to pull off.",
            muscle_now - muscle_prev,
            fat_prev - fat_now
        ),
        icon: "sparkles".to_owned(),
        payload: None,
        action: None,
        stable_key: stable_key(InsightType::Achievement, InsightCategory::Body, "recomposition"),
    }]
}

fn streak_milestone(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.recommendations;
    let streak = ctx.data.gamification.streak;
    if streak == 0 {
        return Vec::new();
    }

    if ctx.config.milestones.contains(&streak) {
        return vec![InsightDraft {
            insight_type: InsightType::Milestone,
            priority: InsightPriority::Medium,
            category: InsightCategory::Consistency,
            title: format!("{streak}-day streak!"),
            description: format!(
                "You just hit a {streak}-day streak. Consistency is the single best predictor of results."
            ),
            icon: "flame".to_owned(),
            payload: None,
            action: None,
            stable_key: stable_key(
                InsightType::Milestone,
                InsightCategory::Consistency,
                &format!("streak-{streak}"),
            ),
        }];
    }

    let Some(next) = ctx.config.milestones.iter().find(|m| **m > streak) else {
        return Vec::new();
    };
    let days_away = next - streak;
    if days_away > thresholds.milestone_window_days {
        return Vec::new();
    }

    vec![InsightDraft {
        insight_type: InsightType::Milestone,
        priority: InsightPriority::Low,
        category: InsightCategory::Consistency,
        title: format!("{days_away} days from a {next}-day streak"),
        description: format!(
            "You are at {streak} days. Keep showing up and the {next}-day milestone is yours this week."
        ),
        icon: "flag".to_owned(),
        payload: None,
        action: None,
        stable_key: stable_key(
            InsightType::Milestone,
            InsightCategory::Consistency,
            &format!("streak-approaching-{next}"),
        ),
    }]
}

fn score_trend(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.recommendations;
    let mut scores = ctx.data.daily_scores.clone();
    scores.sort_by_key(|s| s.date);
    if scores.len() < SCORE_COMPARISON_DAYS * 2 {
        return Vec::new();
    }

    let values: Vec<f64> = scores.iter().map(|s| s.value).collect();
    let recent = average(&values[values.len() - SCORE_COMPARISON_DAYS..]);
    let prior = average(
        &values[values.len() - SCORE_COMPARISON_DAYS * 2..values.len() - SCORE_COMPARISON_DAYS],
    );
    if prior <= 0.0 {
        return Vec::new();
    }

    let swing = (recent - prior) / prior * 100.0;
    if swing >= thresholds.score_swing_pct {
        vec![InsightDraft {
            insight_type: InsightType::Trend,
            priority: InsightPriority::Low,
            category: InsightCategory::Consistency,
            title: "Your daily scores are surging".to_owned(),
            description: format!(
                "Daily scores are up {swing:.0}% week over week. Whatever changed, keep it."
            ),
            icon: "trending-up".to_owned(),
            payload: None,
            action: None,
            stable_key: stable_key(InsightType::Trend, InsightCategory::Consistency, "score-up"),
        }]
    } else if swing <= -thresholds.score_swing_pct {
        vec![InsightDraft {
            insight_type: InsightType::Trend,
            priority: InsightPriority::Medium,
            category: InsightCategory::Consistency,
            title: "Your daily scores dipped".to_owned(),
            description: format!(
                "Daily scores are down {:.0}% week over week. Worth a look at what slipped.",
                swing.abs()
            ),
            icon: "trending-down".to_owned(),
            payload: None,
            action: None,
            stable_key: stable_key(InsightType::Trend, InsightCategory::Consistency, "score-down"),
        }]
    } else {
        Vec::new()
    }
}
