// ABOUTME: Input data model for one analysis run: the immutable multi-domain activity snapshot
// ABOUTME: Assembled by the data-acquisition layer; the engine only reads it, never mutates it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vida Wellness Intelligence

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged workout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutRecord {
    /// When the session started.
    pub date: DateTime<Utc>,
    /// User-facing workout name ("Push Day A", "5k easy").
    pub name: String,
    /// Session length in minutes.
    pub duration_minutes: f64,
    /// Total lifted volume across all sets, in kilograms.
    pub total_volume_kg: f64,
    /// Number of distinct exercises performed.
    pub exercise_count: u32,
    /// Muscle-group tags attached to the session.
    pub muscle_groups: Vec<String>,
    /// Per-exercise top sets; feeds personal-record forecasting.
    pub exercises: Vec<ExerciseEntry>,
}

/// Heaviest successful set of one exercise within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseEntry {
    /// Exercise name ("Bench Press").
    pub name: String,
    /// Weight of the top set in kilograms.
    pub top_weight_kg: f64,
}

/// One day of nutrition totals.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct NutritionDay {
    /// Calendar day the totals cover.
    pub date: NaiveDate,
    /// Total calories consumed.
    pub calories: f64,
    /// Total protein consumed, in grams.
    pub protein_g: f64,
}

/// A single logged meal; feeds the medication-window rule.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MealEntry {
    /// When the meal was eaten.
    pub eaten_at: DateTime<Utc>,
    /// Whether the meal contained dairy.
    pub contains_dairy: bool,
}

/// One body-composition sample.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BodyMeasurement {
    /// When the measurement was taken.
    pub date: DateTime<Utc>,
    /// Body weight in kilograms.
    pub weight_kg: f64,
    /// Body-fat percentage, if measured.
    pub body_fat_pct: Option<f64>,
    /// Muscle mass in kilograms, if measured.
    pub muscle_mass_kg: Option<f64>,
}

/// One night of sleep.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SleepNight {
    /// Calendar day the night belongs to.
    pub date: NaiveDate,
    /// Hours slept.
    pub duration_hours: f64,
    /// Self-reported or device quality score, 0-100.
    pub quality: Option<f64>,
}

/// One wellness check-in; mood, stress, and energy are each rated 1-5.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WellnessCheckin {
    /// Calendar day of the check-in.
    pub date: NaiveDate,
    /// Mood rating, 1 (worst) to 5 (best).
    pub mood: u8,
    /// Stress rating, 1 (calm) to 5 (maximal).
    pub stress: u8,
    /// Energy rating, 1 (drained) to 5 (fresh).
    pub energy: u8,
}

/// One day of water intake.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WaterDay {
    /// Calendar day the intake covers.
    pub date: NaiveDate,
    /// Intake in milliliters.
    pub intake_ml: f64,
}

/// Restock urgency of a supplement as declared by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplementPriority {
    /// Must not run out (prescribed or essential).
    High,
    /// Preferred but skippable.
    Medium,
    /// Optional.
    Low,
}

/// Current stock of one supplement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplementItem {
    /// Supplement name ("Ferro", "Creatine").
    pub name: String,
    /// Estimated days of stock remaining at current dosage.
    pub days_remaining: u32,
    /// Restock urgency.
    pub priority: SupplementPriority,
}

/// Precomputed scalars supplied by the gamification subsystem.
///
/// The engine only reads these; streak bookkeeping lives elsewhere.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GamificationSnapshot {
    /// Current consecutive-day activity streak.
    pub streak: u32,
    /// Current level.
    pub level: u32,
    /// Accumulated experience points.
    pub xp: u64,
}

/// Medication timing constraint: no dairy for `restricted_hours` after the dose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MedicationWindow {
    /// Daily dose time.
    pub dose_time: NaiveTime,
    /// Hours after the dose during which dairy is restricted.
    pub restricted_hours: f64,
}

/// Declared goal targets. Every field is optional; absent targets
/// short-circuit only the rules that depend on them.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct UserGoals {
    /// Daily calorie target.
    pub daily_calories: Option<f64>,
    /// Daily protein target in grams.
    pub daily_protein_g: Option<f64>,
    /// Body-weight target in kilograms.
    pub target_weight_kg: Option<f64>,
    /// Muscle-mass target in kilograms.
    pub target_muscle_kg: Option<f64>,
    /// Date of a goal event (a ski trip, a race) readiness is scored against.
    pub event_date: Option<NaiveDate>,
    /// Medication timing constraint, if any.
    pub medication: Option<MedicationWindow>,
}

/// A dated scalar sample, used for the gamification daily-score series.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DatedValue {
    /// Calendar day of the sample.
    pub date: NaiveDate,
    /// Sample value.
    pub value: f64,
}

/// The immutable input bundle for one analysis run.
///
/// Assembled whole by the data-acquisition collaborator. Series arrive in no
/// guaranteed order; anything order-sensitive sorts a copy by date first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserAnalysisData {
    /// Recent workout history.
    pub workouts: Vec<WorkoutRecord>,
    /// Weekly training volume in kilograms, chronological.
    pub weekly_volumes: Vec<f64>,
    /// Daily nutrition totals.
    pub nutrition_days: Vec<NutritionDay>,
    /// Raw meal log.
    pub meals: Vec<MealEntry>,
    /// Body-composition samples.
    pub body_measurements: Vec<BodyMeasurement>,
    /// Sleep history.
    pub sleep_nights: Vec<SleepNight>,
    /// Wellness check-ins.
    pub wellness_checkins: Vec<WellnessCheckin>,
    /// Daily water intake.
    pub water_days: Vec<WaterDay>,
    /// Daily water-intake goal in milliliters.
    pub water_goal_ml: f64,
    /// Supplement inventory.
    pub supplements: Vec<SupplementItem>,
    /// Gamification scalars (streak, level, xp).
    pub gamification: GamificationSnapshot,
    /// Declared goals and optional configuration.
    pub goals: UserGoals,
    /// Gamification daily-score series.
    pub daily_scores: Vec<DatedValue>,
}

impl UserAnalysisData {
    /// Workouts sorted chronologically, oldest first.
    #[must_use]
    pub fn workouts_by_date(&self) -> Vec<&WorkoutRecord> {
        let mut sorted: Vec<&WorkoutRecord> = self.workouts.iter().collect();
        sorted.sort_by_key(|w| w.date);
        sorted
    }

    /// Timestamp of the most recent workout, if any.
    #[must_use]
    pub fn last_workout_date(&self) -> Option<DateTime<Utc>> {
        self.workouts.iter().map(|w| w.date).max()
    }

    /// Body measurements sorted chronologically, oldest first.
    #[must_use]
    pub fn measurements_by_date(&self) -> Vec<&BodyMeasurement> {
        let mut sorted: Vec<&BodyMeasurement> = self.body_measurements.iter().collect();
        sorted.sort_by_key(|m| m.date);
        sorted
    }

    /// Sleep durations for the most recent `n` nights, oldest first.
    #[must_use]
    pub fn recent_sleep_hours(&self, n: usize) -> Vec<f64> {
        let mut nights: Vec<&SleepNight> = self.sleep_nights.iter().collect();
        nights.sort_by_key(|s| s.date);
        let start = nights.len().saturating_sub(n);
        nights[start..].iter().map(|s| s.duration_hours).collect()
    }

    /// Nutrition totals for the most recent `n` days, oldest first.
    #[must_use]
    pub fn recent_nutrition(&self, n: usize) -> Vec<NutritionDay> {
        let mut days = self.nutrition_days.clone();
        days.sort_by_key(|d| d.date);
        let start = days.len().saturating_sub(n);
        days[start..].to_vec()
    }

    /// Wellness check-ins for the most recent `n` days, oldest first.
    #[must_use]
    pub fn recent_checkins(&self, n: usize) -> Vec<WellnessCheckin> {
        let mut checkins = self.wellness_checkins.clone();
        checkins.sort_by_key(|c| c.date);
        let start = checkins.len().saturating_sub(n);
        checkins[start..].to_vec()
    }

    /// Water intakes for the most recent `n` days, oldest first.
    #[must_use]
    pub fn recent_water_ml(&self, n: usize) -> Vec<f64> {
        let mut days = self.water_days.clone();
        days.sort_by_key(|d| d.date);
        let start = days.len().saturating_sub(n);
        days[start..].iter().map(|d| d.intake_ml).collect()
    }
}
