// ABOUTME: Threshold rule engine producing high-urgency insights
// ABOUTME: A uniform table of predicate rules over the snapshot; each rule guards its own sample minimums
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vida Wellness Intelligence

use crate::config::EngineConfig;
use crate::errors::{ensure_finite, EngineError};
use crate::insight::{
    slugify, stable_key, InsightAction, InsightCategory, InsightDraft, InsightPayload,
    InsightPriority, InsightType,
};
use crate::predictor::overtraining_risk;
use crate::snapshot::{SupplementPriority, UserAnalysisData};
use crate::statistics::{average, days_since};
use chrono::{DateTime, Timelike, Utc};

/// Everything one alert rule may inspect.
pub struct RuleContext<'a> {
    /// The snapshot under analysis.
    pub data: &'a UserAnalysisData,
    /// Injected engine configuration.
    pub config: &'a EngineConfig,
    /// The run timestamp, from the injected clock.
    pub now: DateTime<Utc>,
}

/// One entry of the alert rule table.
pub struct AlertRule {
    /// Rule name, used for logging and trace output.
    pub slug: &'static str,
    /// Predicate-and-build function; empty output means the rule did not fire.
    pub eval: fn(&RuleContext<'_>) -> Vec<InsightDraft>,
}

/// The full alert rule table, evaluated uniformly per run.
#[must_use]
pub fn alert_rules() -> &'static [AlertRule] {
    &[
        AlertRule { slug: "supplement-stock", eval: supplement_stock },
        AlertRule { slug: "overtraining", eval: overtraining },
        AlertRule { slug: "calorie-balance", eval: calorie_balance },
        AlertRule { slug: "protein-deficit", eval: protein_deficit },
        AlertRule { slug: "sleep-deficit", eval: sleep_deficit },
        AlertRule { slug: "hydration", eval: hydration },
        AlertRule { slug: "inactivity", eval: inactivity },
        AlertRule { slug: "broken-streak", eval: broken_streak },
        AlertRule { slug: "medication-window", eval: medication_window },
    ]
}

/// Alert producer: evaluates every rule in the table.
///
/// # Errors
///
/// Returns `EngineError::InvalidSnapshot` when the nutrition or water series
/// contains non-finite values.
pub fn generate_insights(
    data: &UserAnalysisData,
    config: &EngineConfig,
    now: DateTime<Utc>,
) -> Result<Vec<InsightDraft>, EngineError> {
    let calories: Vec<f64> = data.nutrition_days.iter().map(|d| d.calories).collect();
    ensure_finite("calories", &calories)?;
    let water: Vec<f64> = data.water_days.iter().map(|d| d.intake_ml).collect();
    ensure_finite("water intake", &water)?;

    let ctx = RuleContext { data, config, now };
    let mut drafts = Vec::new();
    for rule in alert_rules() {
        let fired = (rule.eval)(&ctx);
        if !fired.is_empty() {
            tracing::debug!(rule = rule.slug, count = fired.len(), "alert rule fired");
        }
        drafts.extend(fired);
    }
    Ok(drafts)
}

fn supplement_stock(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.alerts;
    let mut drafts = Vec::new();

    for supplement in &ctx.data.supplements {
        if supplement.priority != SupplementPriority::High {
            continue;
        }

        let (insight_type, priority, title) =
            if supplement.days_remaining <= thresholds.supplement_critical_days {
                (
                    InsightType::Alert,
                    InsightPriority::Critical,
                    format!("{} is almost gone", supplement.name),
                )
            } else if supplement.days_remaining <= thresholds.supplement_high_days {
                (
                    InsightType::Alert,
                    InsightPriority::High,
                    format!("{} is running low", supplement.name),
                )
            } else if supplement.days_remaining <= thresholds.supplement_reorder_days {
                (
                    InsightType::Recommendation,
                    InsightPriority::Medium,
                    format!("Time to reorder {}", supplement.name),
                )
            } else {
                continue;
            };

        let slug = format!("supplement-stock-{}", slugify(&supplement.name));
        drafts.push(InsightDraft {
            insight_type,
            priority,
            category: InsightCategory::Health,
            title,
            description: format!(
                "You have about {} days of {} left at your current dosage.",
                supplement.days_remaining, supplement.name
            ),
            icon: "pill".to_owned(),
            payload: Some(InsightPayload::SupplementStock {
                name: supplement.name.clone(),
                days_remaining: supplement.days_remaining,
            }),
            action: Some(InsightAction::navigate("Reorder", "/supplements")),
            stable_key: stable_key(insight_type, InsightCategory::Health, &slug),
        });
    }

    drafts
}

fn overtraining(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.alerts;
    let risk = overtraining_risk(ctx.data, &ctx.config.predictor);

    let priority = if risk.score >= thresholds.overtraining_critical {
        InsightPriority::Critical
    } else if risk.score >= thresholds.overtraining_high {
        InsightPriority::High
    } else {
        return Vec::new();
    };

    let factors = risk.factors.join(". ");
    vec![InsightDraft {
        insight_type: InsightType::Alert,
        priority,
        category: InsightCategory::Health,
        title: "Overtraining risk detected".to_owned(),
        description: format!(
            "Several recovery signals are pointing the wrong way. {factors}. Plan an easy day or two."
        ),
        icon: "alert-triangle".to_owned(),
        payload: Some(InsightPayload::OvertrainingRisk(risk)),
        action: None,
        stable_key: stable_key(InsightType::Alert, InsightCategory::Health, "overtraining"),
    }]
}

fn calorie_balance(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.alerts;
    let Some(goal) = ctx.data.goals.daily_calories else {
        return Vec::new();
    };

    let recent = ctx.data.recent_nutrition(7);
    if recent.len() < thresholds.min_nutrition_samples {
        return Vec::new();
    }
    let calories: Vec<f64> = recent.iter().map(|d| d.calories).collect();
    let avg = average(&calories);
    let shortfall = goal - avg;

    if shortfall > thresholds.calorie_deficit_high {
        vec![calorie_draft(
            InsightPriority::High,
            "calorie-deficit",
            "You are eating well under your target",
            format!(
                "You averaged {avg:.0} kcal over the last week, {shortfall:.0} kcal under your {goal:.0} kcal goal. Under-fueling this hard stalls training and recovery."
            ),
        )]
    } else if shortfall > thresholds.calorie_deficit_medium {
        vec![calorie_draft(
            InsightPriority::Medium,
            "calorie-deficit",
            "Calories are coming in short",
            format!(
                "You averaged {avg:.0} kcal over the last week against a {goal:.0} kcal goal."
            ),
        )]
    } else if shortfall < -thresholds.calorie_surplus {
        vec![calorie_draft(
            InsightPriority::Medium,
            "calorie-surplus",
            "You are eating over your target",
            format!(
                "You averaged {avg:.0} kcal over the last week, {:.0} kcal above your {goal:.0} kcal goal.",
                -shortfall
            ),
        )]
    } else {
        Vec::new()
    }
}

fn calorie_draft(
    priority: InsightPriority,
    slug: &str,
    title: &str,
    description: String,
) -> InsightDraft {
    InsightDraft {
        insight_type: InsightType::Alert,
        priority,
        category: InsightCategory::Nutrition,
        title: title.to_owned(),
        description,
        icon: "utensils".to_owned(),
        payload: None,
        action: Some(InsightAction::navigate("Log a meal", "/meals/new")),
        stable_key: stable_key(InsightType::Alert, InsightCategory::Nutrition, slug),
    }
}

fn protein_deficit(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.alerts;
    let Some(goal) = ctx.data.goals.daily_protein_g else {
        return Vec::new();
    };

    let recent = ctx.data.recent_nutrition(7);
    if recent.len() < thresholds.min_nutrition_samples {
        return Vec::new();
    }
    let protein: Vec<f64> = recent.iter().map(|d| d.protein_g).collect();
    let avg = average(&protein);

    if goal - avg <= thresholds.protein_deficit_g {
        return Vec::new();
    }

    vec![InsightDraft {
        insight_type: InsightType::Alert,
        priority: InsightPriority::High,
        category: InsightCategory::Nutrition,
        title: "Protein intake is falling short".to_owned(),
        description: format!(
            "You averaged {avg:.0} g of protein over the last week against a {goal:.0} g goal. Muscle retention depends on closing that gap."
        ),
        icon: "beef".to_owned(),
        payload: None,
        action: Some(InsightAction::navigate("Log a meal", "/meals/new")),
        stable_key: stable_key(InsightType::Alert, InsightCategory::Nutrition, "protein-deficit"),
    }]
}

fn sleep_deficit(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.alerts;
    let hours = ctx.data.recent_sleep_hours(7);
    if hours.len() < thresholds.min_sleep_samples {
        return Vec::new();
    }
    let avg = average(&hours);

    let priority = if avg < thresholds.sleep_critical_hours {
        InsightPriority::Critical
    } else if avg < thresholds.sleep_high_hours {
        InsightPriority::High
    } else {
        return Vec::new();
    };

    vec![InsightDraft {
        insight_type: InsightType::Alert,
        priority,
        category: InsightCategory::Sleep,
        title: "You are running a sleep deficit".to_owned(),
        description: format!(
            "You averaged {avg:.1}h of sleep over the last week. Everything else in your training rests on fixing this first."
        ),
        icon: "moon".to_owned(),
        payload: None,
        action: None,
        stable_key: stable_key(InsightType::Alert, InsightCategory::Sleep, "sleep-deficit"),
    }]
}

fn hydration(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.alerts;
    if ctx.data.water_goal_ml <= 0.0 {
        return Vec::new();
    }
    let intakes = ctx.data.recent_water_ml(7);
    if intakes.len() < thresholds.min_hydration_samples {
        return Vec::new();
    }
    let ratio = average(&intakes) / ctx.data.water_goal_ml;

    let priority = if ratio < thresholds.hydration_high_ratio {
        InsightPriority::High
    } else if ratio < thresholds.hydration_medium_ratio {
        InsightPriority::Medium
    } else {
        return Vec::new();
    };

    vec![InsightDraft {
        insight_type: InsightType::Alert,
        priority,
        category: InsightCategory::Hydration,
        title: "Hydration is below goal".to_owned(),
        description: format!(
            "You hit {:.0}% of your water goal on average this week.",
            ratio * 100.0
        ),
        icon: "droplet".to_owned(),
        payload: None,
        action: Some(InsightAction::navigate("Log water", "/hydration")),
        stable_key: stable_key(InsightType::Alert, InsightCategory::Hydration, "hydration-low"),
    }]
}

fn inactivity(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.alerts;
    let idle_days = days_since(ctx.data.last_workout_date(), ctx.now);

    if idle_days >= thresholds.inactivity_high_days {
        vec![InsightDraft {
            insight_type: InsightType::Alert,
            priority: InsightPriority::High,
            category: InsightCategory::Workout,
            title: "It has been a while since you trained".to_owned(),
            description: format!(
                "No workout logged in {idle_days} days. Even a short session restarts the habit."
            ),
            icon: "alarm-clock".to_owned(),
            payload: None,
            action: Some(InsightAction::navigate("Start a workout", "/workouts/new")),
            stable_key: stable_key(InsightType::Alert, InsightCategory::Workout, "inactivity"),
        }]
    } else if idle_days >= thresholds.inactivity_medium_days {
        vec![InsightDraft {
            insight_type: InsightType::Recommendation,
            priority: InsightPriority::Medium,
            category: InsightCategory::Workout,
            title: "Ready for your next session?".to_owned(),
            description: format!("Your last workout was {idle_days} days ago."),
            icon: "dumbbell".to_owned(),
            payload: None,
            action: Some(InsightAction::navigate("Start a workout", "/workouts/new")),
            stable_key: stable_key(
                InsightType::Recommendation,
                InsightCategory::Workout,
                "inactivity-nudge",
            ),
        }]
    } else {
        Vec::new()
    }
}

fn broken_streak(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.alerts;
    if ctx.data.gamification.streak != 0 || ctx.data.workouts.len() < thresholds.min_workout_samples
    {
        return Vec::new();
    }

    vec![InsightDraft {
        insight_type: InsightType::Alert,
        priority: InsightPriority::Medium,
        category: InsightCategory::Consistency,
        title: "Your streak reset".to_owned(),
        description: "Your activity streak is back to zero. One session today starts the next one."
            .to_owned(),
        icon: "flame".to_owned(),
        payload: None,
        action: Some(InsightAction::navigate("Start a workout", "/workouts/new")),
        stable_key: stable_key(InsightType::Alert, InsightCategory::Consistency, "broken-streak"),
    }]
}

fn medication_window(ctx: &RuleContext<'_>) -> Vec<InsightDraft> {
    let thresholds = &ctx.config.alerts;
    let Some(window) = ctx.data.goals.medication else {
        return Vec::new();
    };

    let window_secs = (window.restricted_hours * 3600.0) as i64;
    let dose_secs = i64::from(window.dose_time.num_seconds_from_midnight());

    let violations = ctx
        .data
        .meals
        .iter()
        .filter(|meal| {
            meal.contains_dairy
                && (ctx.now - meal.eaten_at).num_days() < thresholds.medication_lookback_days
        })
        .filter(|meal| {
            // Distance after the daily dose, wrapping midnight for evening doses.
            let meal_secs = i64::from(meal.eaten_at.time().num_seconds_from_midnight());
            let after_dose = (meal_secs - dose_secs).rem_euclid(86_400);
            after_dose <= window_secs
        })
        .count();

    if violations == 0 {
        return Vec::new();
    }

    vec![InsightDraft {
        insight_type: InsightType::Alert,
        priority: InsightPriority::Critical,
        category: InsightCategory::Health,
        title: "Dairy logged inside your medication window".to_owned(),
        description: format!(
            "{violations} dairy meal(s) this week fell within {:.0}h of your {} dose. Dairy in that window blocks absorption.",
            window.restricted_hours,
            window.dose_time.format("%H:%M")
        ),
        icon: "alert-octagon".to_owned(),
        payload: None,
        action: None,
        stable_key: stable_key(InsightType::Alert, InsightCategory::Health, "medication-window"),
    }]
}
