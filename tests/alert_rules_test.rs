// ABOUTME: Unit tests for the alert rule table
// ABOUTME: Each rule's fire and silence boundaries, plus the medication midnight wrap
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vida Wellness Intelligence

use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use vida_insights::alerts::generate_insights;
use vida_insights::{
    EngineConfig, InsightDraft, InsightPriority, MealEntry, MedicationWindow, NutritionDay,
    SleepNight, SupplementItem, SupplementPriority, UserAnalysisData, WaterDay, WellnessCheckin,
    WorkoutRecord,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
}

fn run(data: &UserAnalysisData) -> Vec<InsightDraft> {
    generate_insights(data, &EngineConfig::default(), now()).unwrap()
}

fn find<'a>(drafts: &'a [InsightDraft], key: &str) -> Option<&'a InsightDraft> {
    drafts.iter().find(|d| d.stable_key == key)
}

fn supplement(name: &str, days_remaining: u32, priority: SupplementPriority) -> SupplementItem {
    SupplementItem {
        name: name.to_owned(),
        days_remaining,
        priority,
    }
}

fn workout(date: DateTime<Utc>) -> WorkoutRecord {
    WorkoutRecord {
        date,
        name: "Session".to_owned(),
        duration_minutes: 45.0,
        total_volume_kg: 2000.0,
        exercise_count: 4,
        muscle_groups: Vec::new(),
        exercises: Vec::new(),
    }
}

fn nutrition_week(data: &mut UserAnalysisData, calories: f64, protein_g: f64) {
    for i in 1..=7 {
        data.nutrition_days.push(NutritionDay {
            date: (now() - Duration::days(i)).date_naive(),
            calories,
            protein_g,
        });
    }
}

#[test]
fn two_days_of_an_essential_supplement_is_critical() {
    let mut data = UserAnalysisData::default();
    data.gamification.streak = 1;
    data.supplements
        .push(supplement("Ferro", 2, SupplementPriority::High));

    let drafts = run(&data);
    let critical = find(&drafts, "alert:health:supplement-stock-ferro")
        .expect("essential supplement at 2 days should alert");
    assert_eq!(critical.priority, InsightPriority::Critical);
    assert!(critical.title.contains("Ferro"));
    assert!(critical.description.contains("2 days"));
    assert_eq!(
        drafts
            .iter()
            .filter(|d| d.priority == InsightPriority::Critical)
            .count(),
        1
    );
}

#[test]
fn supplement_stock_tiers_by_days_remaining() {
    let mut data = UserAnalysisData::default();
    data.supplements = vec![
        supplement("Ferro", 5, SupplementPriority::High),
        supplement("Magnesium", 10, SupplementPriority::High),
        supplement("Creatine", 20, SupplementPriority::High),
    ];

    let drafts = run(&data);
    assert_eq!(
        find(&drafts, "alert:health:supplement-stock-ferro").unwrap().priority,
        InsightPriority::High
    );
    assert_eq!(
        find(&drafts, "recommendation:health:supplement-stock-magnesium")
            .unwrap()
            .priority,
        InsightPriority::Medium
    );
    assert!(drafts.iter().all(|d| !d.stable_key.contains("creatine")));
}

#[test]
fn low_priority_supplements_never_alert() {
    let mut data = UserAnalysisData::default();
    data.supplements
        .push(supplement("Vitamin C", 1, SupplementPriority::Low));
    assert!(run(&data).iter().all(|d| !d.stable_key.contains("supplement")));
}

#[test]
fn critical_overtraining_risk_raises_a_critical_alert() {
    let mut data = UserAnalysisData::default();
    data.weekly_volumes = vec![100.0, 100.0, 100.0, 160.0];
    for i in 1..=7 {
        let date = (now() - Duration::days(i)).date_naive();
        data.sleep_nights.push(SleepNight {
            date,
            duration_hours: 5.0,
            quality: None,
        });
        data.wellness_checkins.push(WellnessCheckin {
            date,
            mood: 3,
            stress: 5,
            energy: 3,
        });
    }

    let drafts = run(&data);
    let alert = find(&drafts, "alert:health:overtraining").unwrap();
    assert_eq!(alert.priority, InsightPriority::Critical);
}

#[test]
fn elevated_overtraining_risk_is_high_not_critical() {
    let mut data = UserAnalysisData::default();
    // Severe sleep 0.3 + severe stress 0.25 + depleted energy 0.2 = 0.75.
    for i in 1..=7 {
        let date = (now() - Duration::days(i)).date_naive();
        data.sleep_nights.push(SleepNight {
            date,
            duration_hours: 5.0,
            quality: None,
        });
        data.wellness_checkins.push(WellnessCheckin {
            date,
            mood: 2,
            stress: 5,
            energy: 2,
        });
    }

    let drafts = run(&data);
    let alert = find(&drafts, "alert:health:overtraining").unwrap();
    assert_eq!(alert.priority, InsightPriority::High);
}

#[test]
fn deep_calorie_deficit_is_high_priority() {
    let mut data = UserAnalysisData::default();
    data.goals.daily_calories = Some(2500.0);
    nutrition_week(&mut data, 1700.0, 0.0);

    let drafts = run(&data);
    let alert = find(&drafts, "alert:nutrition:calorie-deficit").unwrap();
    assert_eq!(alert.priority, InsightPriority::High);
}

#[test]
fn moderate_calorie_deficit_is_medium_priority() {
    let mut data = UserAnalysisData::default();
    data.goals.daily_calories = Some(2500.0);
    nutrition_week(&mut data, 1950.0, 0.0);

    let drafts = run(&data);
    let alert = find(&drafts, "alert:nutrition:calorie-deficit").unwrap();
    assert_eq!(alert.priority, InsightPriority::Medium);
}

#[test]
fn calorie_surplus_gets_its_own_alert() {
    let mut data = UserAnalysisData::default();
    data.goals.daily_calories = Some(2000.0);
    nutrition_week(&mut data, 2600.0, 0.0);

    let drafts = run(&data);
    assert!(find(&drafts, "alert:nutrition:calorie-surplus").is_some());
    assert!(find(&drafts, "alert:nutrition:calorie-deficit").is_none());
}

#[test]
fn calorie_rule_needs_a_goal_and_three_samples() {
    let mut data = UserAnalysisData::default();
    nutrition_week(&mut data, 1000.0, 0.0);
    assert!(find(&run(&data), "alert:nutrition:calorie-deficit").is_none());

    let mut sparse = UserAnalysisData::default();
    sparse.goals.daily_calories = Some(2500.0);
    sparse.nutrition_days.push(NutritionDay {
        date: (now() - Duration::days(1)).date_naive(),
        calories: 1000.0,
        protein_g: 0.0,
    });
    assert!(find(&run(&sparse), "alert:nutrition:calorie-deficit").is_none());
}

#[test]
fn protein_gap_over_thirty_grams_alerts() {
    let mut data = UserAnalysisData::default();
    data.goals.daily_protein_g = Some(150.0);
    nutrition_week(&mut data, 2200.0, 110.0);

    let drafts = run(&data);
    assert!(find(&drafts, "alert:nutrition:protein-deficit").is_some());
}

#[test]
fn small_protein_gap_stays_silent() {
    let mut data = UserAnalysisData::default();
    data.goals.daily_protein_g = Some(150.0);
    nutrition_week(&mut data, 2200.0, 130.0);
    assert!(find(&run(&data), "alert:nutrition:protein-deficit").is_none());
}

fn sleep_week(data: &mut UserAnalysisData, hours: f64) {
    for i in 1..=7 {
        data.sleep_nights.push(SleepNight {
            date: (now() - Duration::days(i)).date_naive(),
            duration_hours: hours,
            quality: None,
        });
    }
}

#[test]
fn sleep_deficit_escalates_with_severity() {
    let mut critical = UserAnalysisData::default();
    sleep_week(&mut critical, 5.0);
    assert_eq!(
        find(&run(&critical), "alert:sleep:sleep-deficit").unwrap().priority,
        InsightPriority::Critical
    );

    let mut high = UserAnalysisData::default();
    sleep_week(&mut high, 6.0);
    assert_eq!(
        find(&run(&high), "alert:sleep:sleep-deficit").unwrap().priority,
        InsightPriority::High
    );

    let mut rested = UserAnalysisData::default();
    sleep_week(&mut rested, 7.5);
    assert!(find(&run(&rested), "alert:sleep:sleep-deficit").is_none());
}

fn water_week(data: &mut UserAnalysisData, intake_ml: f64) {
    data.water_goal_ml = 2000.0;
    for i in 1..=7 {
        data.water_days.push(WaterDay {
            date: (now() - Duration::days(i)).date_naive(),
            intake_ml,
        });
    }
}

#[test]
fn hydration_escalates_with_shortfall() {
    let mut dry = UserAnalysisData::default();
    water_week(&mut dry, 1000.0);
    assert_eq!(
        find(&run(&dry), "alert:hydration:hydration-low").unwrap().priority,
        InsightPriority::High
    );

    let mut short = UserAnalysisData::default();
    water_week(&mut short, 1500.0);
    assert_eq!(
        find(&run(&short), "alert:hydration:hydration-low").unwrap().priority,
        InsightPriority::Medium
    );

    let mut fine = UserAnalysisData::default();
    water_week(&mut fine, 1800.0);
    assert!(find(&run(&fine), "alert:hydration:hydration-low").is_none());
}

#[test]
fn hydration_without_a_goal_stays_silent() {
    let mut data = UserAnalysisData::default();
    for i in 1..=7 {
        data.water_days.push(WaterDay {
            date: (now() - Duration::days(i)).date_naive(),
            intake_ml: 500.0,
        });
    }
    assert!(find(&run(&data), "alert:hydration:hydration-low").is_none());
}

#[test]
fn inactivity_escalates_with_idle_days() {
    let mut idle = UserAnalysisData::default();
    idle.gamification.streak = 1;
    idle.workouts.push(workout(now() - Duration::days(6)));
    assert!(find(&run(&idle), "alert:workout:inactivity").is_some());

    let mut resting = UserAnalysisData::default();
    resting.gamification.streak = 1;
    resting.workouts.push(workout(now() - Duration::days(3)));
    let drafts = run(&resting);
    assert!(find(&drafts, "alert:workout:inactivity").is_none());
    assert!(find(&drafts, "recommendation:workout:inactivity-nudge").is_some());

    let mut active = UserAnalysisData::default();
    active.gamification.streak = 1;
    active.workouts.push(workout(now() - Duration::days(1)));
    let drafts = run(&active);
    assert!(find(&drafts, "alert:workout:inactivity").is_none());
    assert!(find(&drafts, "recommendation:workout:inactivity-nudge").is_none());
}

#[test]
fn empty_workout_history_reads_as_inactive() {
    let data = UserAnalysisData::default();
    assert!(find(&run(&data), "alert:workout:inactivity").is_some());
}

#[test]
fn reset_streak_with_history_is_called_out() {
    let mut data = UserAnalysisData::default();
    for i in 1..=3 {
        data.workouts.push(workout(now() - Duration::days(i)));
    }
    assert!(find(&run(&data), "alert:consistency:broken-streak").is_some());

    data.gamification.streak = 5;
    assert!(find(&run(&data), "alert:consistency:broken-streak").is_none());
}

#[test]
fn dairy_inside_the_medication_window_is_critical() {
    let mut data = UserAnalysisData::default();
    data.goals.medication = Some(MedicationWindow {
        dose_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        restricted_hours: 4.0,
    });
    let yesterday = (now() - Duration::days(1)).date_naive();
    data.meals = vec![
        MealEntry {
            eaten_at: yesterday.and_hms_opt(10, 0, 0).unwrap().and_utc(),
            contains_dairy: true,
        },
        MealEntry {
            eaten_at: yesterday.and_hms_opt(13, 0, 0).unwrap().and_utc(),
            contains_dairy: true,
        },
        MealEntry {
            eaten_at: yesterday.and_hms_opt(10, 30, 0).unwrap().and_utc(),
            contains_dairy: false,
        },
    ];

    let drafts = run(&data);
    let alert = find(&drafts, "alert:health:medication-window").unwrap();
    assert_eq!(alert.priority, InsightPriority::Critical);
    assert!(alert.description.contains("1 dairy meal"));
}

#[test]
fn evening_dose_window_wraps_past_midnight() {
    let mut data = UserAnalysisData::default();
    data.goals.medication = Some(MedicationWindow {
        dose_time: NaiveTime::from_hms_opt(22, 0, 0).unwrap(),
        restricted_hours: 4.0,
    });
    let yesterday = (now() - Duration::days(1)).date_naive();
    data.meals.push(MealEntry {
        eaten_at: yesterday.and_hms_opt(1, 0, 0).unwrap().and_utc(),
        contains_dairy: true,
    });

    assert!(find(&run(&data), "alert:health:medication-window").is_some());
}

#[test]
fn old_dairy_meals_fall_out_of_the_lookback() {
    let mut data = UserAnalysisData::default();
    data.goals.medication = Some(MedicationWindow {
        dose_time: NaiveTime::from_hms_opt(8, 0, 0).unwrap(),
        restricted_hours: 4.0,
    });
    data.meals.push(MealEntry {
        eaten_at: now() - Duration::days(10),
        contains_dairy: true,
    });

    assert!(find(&run(&data), "alert:health:medication-window").is_none());
}

#[test]
fn non_finite_nutrition_is_rejected() {
    let mut data = UserAnalysisData::default();
    data.nutrition_days.push(NutritionDay {
        date: now().date_naive(),
        calories: f64::NAN,
        protein_g: 0.0,
    });
    assert!(generate_insights(&data, &EngineConfig::default(), now()).is_err());
}
