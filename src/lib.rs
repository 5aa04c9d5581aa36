// ABOUTME: Longitudinal health-behavior insight engine
// ABOUTME: Deterministic analytics turning a multi-domain activity snapshot into ranked, typed insights
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vida Wellness Intelligence

//! # Vida Insights
//!
//! A deterministic analytics pipeline that ingests a snapshot of a user's
//! recent multi-domain activity (training, nutrition, sleep, hydration, body
//! composition, mood, supplements, goals) and produces a ranked list of
//! typed, actionable insights: alerts, recommendations, trends, correlation
//! findings, predictions, and milestone notices.
//!
//! The pipeline is pure: producers are functions of the immutable snapshot,
//! and the only non-determinism (insight ids and timestamps) flows through
//! injectable [`runtime::Clock`] and [`runtime::IdGenerator`] capabilities.
//!
//! ```
//! use std::collections::HashSet;
//! use vida_insights::{InsightAggregator, UserAnalysisData};
//!
//! let snapshot = UserAnalysisData::default();
//! let insights = InsightAggregator::new().analyze(&snapshot, &HashSet::new());
//! assert!(insights.iter().all(|i| !i.id.is_empty()));
//! ```

/// Orchestration: runs producers, filters dismissals, ranks output.
pub mod aggregator;
/// High-urgency threshold rule table.
pub mod alerts;
/// Injected thresholds and milestone configuration.
pub mod config;
/// Engine error types.
pub mod errors;
/// Output data model: insights, priorities, typed payloads.
pub mod insight;
/// Domain-aware pattern analysis: trends, correlations, balance, schedule.
pub mod patterns;
/// Goal projections, PR forecasts, readiness, and overtraining risk.
pub mod predictor;
/// Lower-urgency optimization and celebration rules.
pub mod recommendations;
/// Clock and id-generation capabilities.
pub mod runtime;
/// Input data model: the immutable analysis snapshot.
pub mod snapshot;
/// Generic numeric primitives.
pub mod statistics;

pub use aggregator::InsightAggregator;
pub use config::{
    AlertThresholds, EngineConfig, PatternThresholds, PredictorThresholds,
    RecommendationThresholds,
};
pub use errors::EngineError;
pub use insight::{
    Insight, InsightAction, InsightCategory, InsightDraft, InsightPayload, InsightPriority,
    InsightType,
};
pub use patterns::{CorrelationResult, MuscleBalance, SchedulePattern};
pub use predictor::{BodyProjection, EventReadiness, PrPrediction, RiskAssessment};
pub use runtime::{
    Clock, FixedClock, IdGenerator, RandomIdGenerator, SequentialIdGenerator, SystemClock,
};
pub use snapshot::{
    BodyMeasurement, DatedValue, ExerciseEntry, GamificationSnapshot, MealEntry,
    MedicationWindow, NutritionDay, SleepNight, SupplementItem, SupplementPriority,
    UserAnalysisData, UserGoals, WaterDay, WellnessCheckin, WorkoutRecord,
};
pub use statistics::{TrendAnalysis, TrendDirection};
