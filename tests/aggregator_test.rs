// ABOUTME: Integration tests for the insight aggregator
// ABOUTME: Determinism, priority ordering, dismissal filtering, and producer failure isolation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vida Wellness Intelligence

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashSet;
use vida_insights::{
    EngineConfig, FixedClock, InsightAggregator, InsightPriority, SequentialIdGenerator,
    SleepNight, SupplementItem, SupplementPriority, UserAnalysisData,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap()
}

/// Installs a test-writer subscriber so aggregator warnings surface in
/// captured test output. Safe to call from multiple tests.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn deterministic_aggregator() -> InsightAggregator<FixedClock, SequentialIdGenerator> {
    InsightAggregator::with_runtime(
        FixedClock(now()),
        SequentialIdGenerator::new(),
        EngineConfig::default(),
    )
}

/// A snapshot that exercises several producers at different priorities.
fn busy_snapshot() -> UserAnalysisData {
    let mut data = UserAnalysisData::default();
    data.gamification.streak = 1;
    data.supplements.push(SupplementItem {
        name: "Ferro".to_owned(),
        days_remaining: 2,
        priority: SupplementPriority::High,
    });
    for i in 0..14 {
        let hours = if i < 7 { 7.5 } else { 6.0 };
        data.sleep_nights.push(SleepNight {
            date: (now() - Duration::days(14 - i)).date_naive(),
            duration_hours: hours,
            quality: None,
        });
    }
    data
}

#[test]
fn identical_runs_produce_identical_output() {
    let data = busy_snapshot();
    let first = deterministic_aggregator().analyze(&data, &HashSet::new());
    let second = deterministic_aggregator().analyze(&data, &HashSet::new());

    assert!(!first.is_empty());
    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.id, b.id);
        assert_eq!(a.stable_key, b.stable_key);
        assert_eq!(a.title, b.title);
        assert_eq!(a.description, b.description);
        assert_eq!(a.priority, b.priority);
        assert_eq!(a.created_at, b.created_at);
    }
}

#[test]
fn output_is_sorted_by_priority_rank() {
    let insights = deterministic_aggregator().analyze(&busy_snapshot(), &HashSet::new());

    assert_eq!(insights[0].priority, InsightPriority::Critical);
    assert!(insights[0].title.contains("Ferro"));
    let ranks: Vec<u8> = insights.iter().map(|i| i.priority.rank()).collect();
    assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn ids_and_timestamps_come_from_the_injected_runtime() {
    let insights = deterministic_aggregator().analyze(&busy_snapshot(), &HashSet::new());

    for (i, insight) in insights.iter().enumerate() {
        assert_eq!(insight.id, format!("insight-{i}"));
        assert_eq!(insight.created_at, now());
    }
}

#[test]
fn dismissed_keys_are_filtered_out() {
    let data = busy_snapshot();
    let aggregator = deterministic_aggregator();

    let with_prompt = aggregator.analyze(&data, &HashSet::new());
    assert!(with_prompt
        .iter()
        .any(|i| i.stable_key == "recommendation:body:first-measurement"));

    let dismissed: HashSet<String> =
        ["recommendation:body:first-measurement".to_owned()].into();
    let without_prompt = aggregator.analyze(&data, &dismissed);
    assert!(without_prompt
        .iter()
        .all(|i| i.stable_key != "recommendation:body:first-measurement"));
    assert_eq!(without_prompt.len(), with_prompt.len() - 1);
}

#[test]
fn a_failing_producer_does_not_take_down_the_run() {
    init_tracing();
    let mut data = busy_snapshot();
    // Poisons the predictor and recommendation producers; patterns and
    // alerts read other series and still run.
    data.weekly_volumes = vec![1000.0, f64::NAN];

    let insights = deterministic_aggregator().analyze(&data, &HashSet::new());
    assert!(insights
        .iter()
        .any(|i| i.stable_key == "alert:health:supplement-stock-ferro"));
    assert!(insights
        .iter()
        .any(|i| i.stable_key == "trend:sleep:sleep-trend-down"));
    assert!(insights
        .iter()
        .all(|i| i.stable_key != "recommendation:body:first-measurement"));
}

#[test]
fn insights_serialize_with_stable_tags() {
    let insights = deterministic_aggregator().analyze(&busy_snapshot(), &HashSet::new());
    let json = serde_json::to_value(&insights[0]).unwrap();

    assert_eq!(json["insight_type"], "alert");
    assert_eq!(json["priority"], "critical");
    assert_eq!(json["category"], "health");
    assert_eq!(json["payload"]["kind"], "supplement_stock");
    assert_eq!(json["payload"]["days_remaining"], 2);
}

#[test]
fn an_empty_snapshot_still_yields_a_valid_ranked_list() {
    let insights = deterministic_aggregator().analyze(&UserAnalysisData::default(), &HashSet::new());

    // Nothing logged reads as inactivity plus a measurement prompt.
    assert!(!insights.is_empty());
    let ranks: Vec<u8> = insights.iter().map(|i| i.priority.rank()).collect();
    assert!(ranks.windows(2).all(|w| w[0] <= w[1]));
    assert!(insights.iter().all(|i| !i.id.is_empty()));
}
