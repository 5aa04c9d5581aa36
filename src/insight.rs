// ABOUTME: Output data model: typed, ranked insights with strongly-typed payloads
// ABOUTME: Drafts carry everything but id/timestamp; the aggregator stamps those at the end
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vida Wellness Intelligence

use crate::patterns::CorrelationResult;
use crate::predictor::{BodyProjection, EventReadiness, PrPrediction, RiskAssessment};
use crate::statistics::TrendAnalysis;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of insight produced by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightType {
    /// High-urgency threshold breach.
    Alert,
    /// Lower-urgency suggestion.
    Recommendation,
    /// Direction-of-travel report on a metric.
    Trend,
    /// Cross-metric relationship finding.
    Correlation,
    /// Goal-oriented forecast.
    Prediction,
    /// Celebration of something already accomplished.
    Achievement,
    /// Streak milestone hit or approaching.
    Milestone,
    /// Training-structure improvement opportunity.
    Optimization,
}

impl InsightType {
    /// Stable lowercase tag used in stable keys and serialization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Recommendation => "recommendation",
            Self::Trend => "trend",
            Self::Correlation => "correlation",
            Self::Prediction => "prediction",
            Self::Achievement => "achievement",
            Self::Milestone => "milestone",
            Self::Optimization => "optimization",
        }
    }
}

/// Urgency of an insight; drives sort order and UI styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightPriority {
    /// Needs attention today.
    Critical,
    /// Needs attention this week.
    High,
    /// Worth acting on.
    Medium,
    /// Informational.
    Low,
}

impl InsightPriority {
    /// Numeric rank for sorting: critical is 0, low is 3.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Critical => 0,
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

/// Domain the insight belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightCategory {
    /// Training sessions and volume.
    Workout,
    /// Calories and macros.
    Nutrition,
    /// Sleep duration and quality.
    Sleep,
    /// Water intake.
    Hydration,
    /// Body composition.
    Body,
    /// Habits, streaks, and schedules.
    Consistency,
    /// Physiological risk and supplements.
    Health,
    /// Mood, stress, and energy.
    Wellness,
    /// Declared goal progress.
    Goals,
}

impl InsightCategory {
    /// Stable lowercase tag used in stable keys and serialization.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Workout => "workout",
            Self::Nutrition => "nutrition",
            Self::Sleep => "sleep",
            Self::Hydration => "hydration",
            Self::Body => "body",
            Self::Consistency => "consistency",
            Self::Health => "health",
            Self::Wellness => "wellness",
            Self::Goals => "goals",
        }
    }
}

/// Strongly-typed numeric detail backing an insight.
///
/// One variant per producer output, so consumers match exhaustively instead
/// of casting an untyped map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsightPayload {
    /// The trend analysis that produced a trend insight.
    Trend(TrendAnalysis),
    /// The correlation finding behind a correlation insight.
    Correlation(CorrelationResult),
    /// Weight trajectory toward the declared target.
    WeightProjection(BodyProjection),
    /// Muscle-mass trajectory toward the declared target.
    MuscleProjection(BodyProjection),
    /// Personal-record forecast for one exercise.
    PersonalRecord(PrPrediction),
    /// Goal-event readiness breakdown.
    Readiness(EventReadiness),
    /// Composite overtraining risk.
    OvertrainingRisk(RiskAssessment),
    /// Supplement running low.
    SupplementStock {
        /// Supplement name.
        name: String,
        /// Estimated days of stock left.
        days_remaining: u32,
    },
}

/// Advisory follow-up action attached to an insight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsightAction {
    /// Action kind understood by the consumer ("navigate").
    pub action_type: String,
    /// Button label.
    pub label: String,
    /// Target route or URL.
    pub href: String,
}

impl InsightAction {
    /// Navigation action to an in-app route.
    #[must_use]
    pub fn navigate(label: &str, href: &str) -> Self {
        Self {
            action_type: "navigate".to_owned(),
            label: label.to_owned(),
            href: href.to_owned(),
        }
    }
}

/// A producer's output before the aggregator stamps id and timestamp.
///
/// Keeping drafts free of wall-clock and randomness keeps every producer a
/// pure function of the snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightDraft {
    /// Kind of insight.
    pub insight_type: InsightType,
    /// Urgency.
    pub priority: InsightPriority,
    /// Domain tag.
    pub category: InsightCategory,
    /// Pre-rendered headline.
    pub title: String,
    /// Pre-rendered body text.
    pub description: String,
    /// Presentation hint, opaque to the engine.
    pub icon: String,
    /// Typed numeric detail, when a consumer wants it.
    pub payload: Option<InsightPayload>,
    /// Advisory follow-up action.
    pub action: Option<InsightAction>,
    /// Identity that survives across runs; see [`stable_key`].
    pub stable_key: String,
}

impl InsightDraft {
    /// Stamp the draft with a fresh id and the run timestamp.
    #[must_use]
    pub fn into_insight(self, id: String, created_at: DateTime<Utc>) -> Insight {
        Insight {
            id,
            insight_type: self.insight_type,
            priority: self.priority,
            category: self.category,
            title: self.title,
            description: self.description,
            icon: self.icon,
            payload: self.payload,
            action: self.action,
            created_at,
            stable_key: self.stable_key,
        }
    }
}

/// A single ranked, typed output record of one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Insight {
    /// Opaque unique id, regenerated every run.
    pub id: String,
    /// Kind of insight.
    pub insight_type: InsightType,
    /// Urgency.
    pub priority: InsightPriority,
    /// Domain tag.
    pub category: InsightCategory,
    /// Pre-rendered headline.
    pub title: String,
    /// Pre-rendered body text.
    pub description: String,
    /// Presentation hint, opaque to the engine.
    pub icon: String,
    /// Typed numeric detail, when a consumer wants it.
    pub payload: Option<InsightPayload>,
    /// Advisory follow-up action.
    pub action: Option<InsightAction>,
    /// Wall-clock timestamp of the run that produced this insight.
    pub created_at: DateTime<Utc>,
    /// Identity that survives across runs, used for dismissal filtering.
    pub stable_key: String,
}

/// Compose the cross-run identity of an insight: `type:category:rule-slug`.
///
/// Ids are regenerated every run, so dismissal and dedup key on this instead.
#[must_use]
pub fn stable_key(insight_type: InsightType, category: InsightCategory, slug: &str) -> String {
    format!("{}:{}:{slug}", insight_type.as_str(), category.as_str())
}

/// Lowercase a free-form name into a key-safe slug.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}
