// ABOUTME: Orchestrates all insight producers against one snapshot
// ABOUTME: Filters dismissed keys, stamps ids/timestamps, and ranks by priority then recency
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vida Wellness Intelligence

use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::insight::{Insight, InsightDraft};
use crate::runtime::{Clock, IdGenerator, RandomIdGenerator, SystemClock};
use crate::snapshot::UserAnalysisData;
use crate::{alerts, patterns, predictor, recommendations};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// One insight producer: a pure function of snapshot, config, and run time.
type Producer = fn(
    &UserAnalysisData,
    &EngineConfig,
    DateTime<Utc>,
) -> Result<Vec<InsightDraft>, EngineError>;

/// Every producer the aggregator runs, in evaluation order.
const PRODUCERS: [(&str, Producer); 4] = [
    ("patterns", patterns::generate_insights),
    ("predictor", predictor::generate_insights),
    ("alerts", alerts::generate_insights),
    ("recommendations", recommendations::generate_insights),
];

/// Runs the full analysis pipeline against one snapshot.
///
/// Producers are independent: one failing is logged and skipped, the rest
/// still contribute. The output is the complete ranked insight list for the
/// run; there is no paging and no state kept between runs.
pub struct InsightAggregator<C = SystemClock, G = RandomIdGenerator> {
    clock: C,
    ids: G,
    config: EngineConfig,
}

impl InsightAggregator {
    /// Aggregator with the system clock, random ids, and default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            clock: SystemClock,
            ids: RandomIdGenerator,
            config: EngineConfig::default(),
        }
    }
}

impl Default for InsightAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock, G: IdGenerator> InsightAggregator<C, G> {
    /// Aggregator with injected clock, id generator, and configuration.
    ///
    /// Injecting a fixed clock and sequential ids makes a run fully
    /// deterministic for a given snapshot.
    #[must_use]
    pub fn with_runtime(clock: C, ids: G, config: EngineConfig) -> Self {
        Self { clock, ids, config }
    }

    /// Analyze one snapshot and return the ranked insight list.
    ///
    /// `dismissed_keys` holds stable keys the user has already dismissed;
    /// matching insights are dropped before ranking.
    #[must_use]
    pub fn analyze(
        &self,
        data: &UserAnalysisData,
        dismissed_keys: &HashSet<String>,
    ) -> Vec<Insight> {
        let now = self.clock.now();
        let mut drafts: Vec<InsightDraft> = Vec::new();

        for (name, producer) in PRODUCERS {
            match producer(data, &self.config, now) {
                Ok(produced) => {
                    tracing::debug!(producer = name, count = produced.len(), "producer finished");
                    drafts.extend(produced);
                }
                Err(error) => {
                    tracing::warn!(producer = name, %error, "producer failed, skipping");
                }
            }
        }

        drafts.retain(|draft| !dismissed_keys.contains(&draft.stable_key));

        let mut insights: Vec<Insight> = drafts
            .into_iter()
            .map(|draft| draft.into_insight(self.ids.next_id(), now))
            .collect();

        insights.sort_by(|a, b| {
            a.priority
                .rank()
                .cmp(&b.priority.rank())
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        insights
    }
}
