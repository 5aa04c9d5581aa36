// ABOUTME: Unit tests for goal projections, PR forecasts, readiness, and overtraining risk
// ABOUTME: Exercises the fallback horizons, likelihood gating, and additive risk contributions
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vida Wellness Intelligence

use chrono::{DateTime, Duration, TimeZone, Utc};
use vida_insights::predictor::{
    event_readiness, generate_insights, overtraining_risk, predict_prs, project_weight,
};
use vida_insights::{
    BodyMeasurement, EngineConfig, ExerciseEntry, PredictorThresholds, SleepNight,
    UserAnalysisData, WellnessCheckin, WorkoutRecord,
};

fn base_date() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
}

fn weight_sample(date: DateTime<Utc>, weight_kg: f64) -> BodyMeasurement {
    BodyMeasurement {
        date,
        weight_kg,
        body_fat_pct: None,
        muscle_mass_kg: None,
    }
}

fn weekly_weights(start: DateTime<Utc>, weights: &[f64]) -> Vec<BodyMeasurement> {
    weights
        .iter()
        .enumerate()
        .map(|(i, w)| weight_sample(start + Duration::weeks(i as i64), *w))
        .collect()
}

#[test]
fn flat_weight_series_falls_back_to_a_year_at_low_confidence() {
    let mut data = UserAnalysisData::default();
    data.goals.target_weight_kg = Some(75.0);
    data.body_measurements = weekly_weights(base_date(), &[80.0; 8]);

    let projection = project_weight(&data, &PredictorThresholds::default()).unwrap();
    assert_eq!(projection.days_to_target, 365);
    assert!(projection.confidence <= 0.2);
    assert!(projection.weekly_rate.abs() < 0.05);
}

#[test]
fn steady_loss_projects_the_target_date() {
    let mut data = UserAnalysisData::default();
    data.goals.target_weight_kg = Some(78.0);
    data.body_measurements = weekly_weights(
        base_date(),
        &[83.5, 83.0, 82.5, 82.0, 81.5, 81.0, 80.5, 80.0],
    );

    let projection = project_weight(&data, &PredictorThresholds::default()).unwrap();
    assert!((projection.weekly_rate + 0.5).abs() < 1e-9);
    // 2 kg gap at 0.5 kg/week is 4 weeks out.
    assert_eq!(projection.days_to_target, 28);
    assert!((projection.confidence - 0.76).abs() < 1e-9);
}

#[test]
fn gaining_while_targeting_a_loss_is_the_diverging_fallback() {
    let mut data = UserAnalysisData::default();
    data.goals.target_weight_kg = Some(75.0);
    data.body_measurements = weekly_weights(
        base_date(),
        &[80.0, 80.5, 81.0, 81.5, 82.0, 82.5, 83.0, 83.5],
    );

    let projection = project_weight(&data, &PredictorThresholds::default()).unwrap();
    assert_eq!(projection.days_to_target, 365);
    assert!((projection.confidence - 0.1).abs() < 1e-9);
}

#[test]
fn projection_needs_four_samples_and_a_target() {
    let cfg = PredictorThresholds::default();

    let mut data = UserAnalysisData::default();
    data.body_measurements = weekly_weights(base_date(), &[80.0; 8]);
    assert!(project_weight(&data, &cfg).is_none());

    data.goals.target_weight_kg = Some(75.0);
    data.body_measurements.truncate(3);
    assert!(project_weight(&data, &cfg).is_none());
}

fn bench_session(date: DateTime<Utc>, top_weight_kg: f64) -> WorkoutRecord {
    WorkoutRecord {
        date,
        name: "Push Day".to_owned(),
        duration_minutes: 60.0,
        total_volume_kg: 3000.0,
        exercise_count: 4,
        muscle_groups: vec!["chest".to_owned()],
        exercises: vec![ExerciseEntry {
            name: "Bench Press".to_owned(),
            top_weight_kg,
        }],
    }
}

#[test]
fn steady_bench_progression_forecasts_a_likely_pr() {
    let base = base_date();
    let mut data = UserAnalysisData::default();
    for (i, weight) in [100.0, 105.0, 110.0, 115.0].iter().enumerate() {
        data.workouts
            .push(bench_session(base + Duration::days(3 * i as i64), *weight));
    }

    let predictions = predict_prs(&data, &PredictorThresholds::default());
    assert_eq!(predictions.len(), 1);
    let pr = &predictions[0];
    assert_eq!(pr.exercise, "Bench Press");
    assert!((pr.current_max_kg - 115.0).abs() < 1e-9);
    // Average increase of 5 kg per session, projected two sessions ahead.
    assert!((pr.predicted_kg - 125.0).abs() < 1e-9);
    assert!(pr.likely);
}

#[test]
fn pr_forecast_needs_four_data_points() {
    let base = base_date();
    let mut data = UserAnalysisData::default();
    for (i, weight) in [100.0, 105.0, 110.0].iter().enumerate() {
        data.workouts
            .push(bench_session(base + Duration::days(3 * i as i64), *weight));
    }
    assert!(predict_prs(&data, &PredictorThresholds::default()).is_empty());
}

#[test]
fn erratic_progression_is_forecast_but_not_likely() {
    let base = base_date();
    let mut data = UserAnalysisData::default();
    for (i, weight) in [100.0, 140.0, 105.0, 145.0, 110.0, 150.0].iter().enumerate() {
        data.workouts
            .push(bench_session(base + Duration::days(3 * i as i64), *weight));
    }

    let predictions = predict_prs(&data, &PredictorThresholds::default());
    assert_eq!(predictions.len(), 1);
    assert!(!predictions[0].likely);
}

#[test]
fn overtraining_scenario_scores_critical() {
    let base = base_date();
    let mut data = UserAnalysisData::default();
    data.weekly_volumes = vec![100.0, 100.0, 100.0, 160.0];
    for i in 0..7 {
        let date = (base + Duration::days(i)).date_naive();
        data.sleep_nights.push(SleepNight {
            date,
            duration_hours: 5.0,
            quality: None,
        });
        data.wellness_checkins.push(WellnessCheckin {
            date,
            mood: 3,
            stress: if i % 2 == 0 { 5 } else { 4 },
            energy: 3,
        });
    }

    let risk = overtraining_risk(&data, &PredictorThresholds::default());
    // Spike 0.3 + severe sleep 0.3 + severe stress 0.25.
    assert!((risk.score - 0.85).abs() < 1e-9);
    assert!(risk.score >= 0.8);
    assert_eq!(risk.factors.len(), 3);
}

#[test]
fn rested_week_carries_no_overtraining_risk() {
    let base = base_date();
    let mut data = UserAnalysisData::default();
    data.weekly_volumes = vec![100.0, 105.0, 100.0, 102.0];
    for i in 0..7 {
        let date = (base + Duration::days(i)).date_naive();
        data.sleep_nights.push(SleepNight {
            date,
            duration_hours: 8.0,
            quality: None,
        });
        data.wellness_checkins.push(WellnessCheckin {
            date,
            mood: 4,
            stress: 2,
            energy: 4,
        });
    }

    let risk = overtraining_risk(&data, &PredictorThresholds::default());
    assert!(risk.score.abs() < 1e-9);
    assert!(risk.factors.is_empty());
}

#[test]
fn event_readiness_blends_weighted_components() {
    let base = base_date();
    let now = base + Duration::days(27);
    let mut data = UserAnalysisData::default();
    data.goals.event_date = Some((now + Duration::days(30)).date_naive());
    data.gamification.streak = 14;

    for i in 0..12 {
        let mut workout = bench_session(base + Duration::days(2 * i), 100.0);
        workout.total_volume_kg = 3000.0;
        if i < 3 {
            workout.muscle_groups.push("core".to_owned());
        }
        data.workouts.push(workout);
    }
    for i in 0..7 {
        data.sleep_nights.push(SleepNight {
            date: (now - Duration::days(7 - i)).date_naive(),
            duration_hours: 8.0,
            quality: None,
        });
    }
    data.body_measurements.push(BodyMeasurement {
        date: now - Duration::days(2),
        weight_kg: 80.0,
        body_fat_pct: Some(18.0),
        muscle_mass_kg: None,
    });

    let readiness = event_readiness(&data, &PredictorThresholds::default(), now).unwrap();
    // Strength 60+20 (full frequency, stable volume), core and endurance
    // saturated, body fat in the 15-20 band.
    assert!((readiness.strength - 80.0).abs() < 1e-9);
    assert!((readiness.core - 100.0).abs() < 1e-9);
    assert!((readiness.endurance - 100.0).abs() < 1e-9);
    assert!((readiness.body_composition - 85.0).abs() < 1e-9);
    assert!((readiness.overall - 90.0).abs() < 1e-9);
    assert!(readiness.recommendations.is_empty());
}

#[test]
fn readiness_recommends_core_work_when_missing() {
    let base = base_date();
    let now = base + Duration::days(27);
    let mut data = UserAnalysisData::default();
    data.goals.event_date = Some((now + Duration::days(30)).date_naive());
    for i in 0..12 {
        data.workouts.push(bench_session(base + Duration::days(2 * i), 100.0));
    }

    let readiness = event_readiness(&data, &PredictorThresholds::default(), now).unwrap();
    assert!(readiness.core.abs() < 1e-9);
    assert!(readiness
        .recommendations
        .iter()
        .any(|r| r.contains("core")));
}

#[test]
fn readiness_needs_a_declared_event() {
    let data = UserAnalysisData::default();
    assert!(event_readiness(&data, &PredictorThresholds::default(), base_date()).is_none());
}

#[test]
fn body_fat_bands_come_from_configuration() {
    let base = base_date();
    let now = base + Duration::days(27);
    let mut data = UserAnalysisData::default();
    data.goals.event_date = Some((now + Duration::days(30)).date_naive());
    data.workouts.push(bench_session(base, 100.0));
    data.body_measurements.push(BodyMeasurement {
        date: now - Duration::days(2),
        weight_kg: 80.0,
        body_fat_pct: Some(18.0),
        muscle_mass_kg: None,
    });

    // A single lean band with a higher floor re-scores the same measurement.
    let cfg = PredictorThresholds {
        readiness_fat_bands: vec![(10.0, 100.0)],
        readiness_fat_floor_score: 40.0,
        ..PredictorThresholds::default()
    };

    let readiness = event_readiness(&data, &cfg, now).unwrap();
    assert!((readiness.body_composition - 40.0).abs() < 1e-9);
}

#[test]
fn confident_projection_becomes_an_insight() {
    let mut data = UserAnalysisData::default();
    data.goals.target_weight_kg = Some(78.0);
    data.body_measurements = weekly_weights(
        base_date(),
        &[83.5, 83.0, 82.5, 82.0, 81.5, 81.0, 80.5, 80.0],
    );

    let now = base_date() + Duration::weeks(8);
    let drafts = generate_insights(&data, &EngineConfig::default(), now).unwrap();
    assert!(drafts
        .iter()
        .any(|d| d.stable_key == "prediction:body:weight-goal"));
}

#[test]
fn flat_projection_stays_out_of_the_insight_feed() {
    let mut data = UserAnalysisData::default();
    data.goals.target_weight_kg = Some(75.0);
    data.body_measurements = weekly_weights(base_date(), &[80.0; 8]);

    let now = base_date() + Duration::weeks(8);
    let drafts = generate_insights(&data, &EngineConfig::default(), now).unwrap();
    assert!(drafts
        .iter()
        .all(|d| d.stable_key != "prediction:body:weight-goal"));
}
