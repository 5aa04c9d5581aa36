// ABOUTME: Injectable clock and id-generation capabilities for deterministic analysis runs
// ABOUTME: Producers stay pure; all wall-clock and randomness flows through these traits
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vida Wellness Intelligence

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Source of the current time for an analysis run.
pub trait Clock {
    /// Current wall-clock time.
    fn now(&self) -> DateTime<Utc>;
}

/// Source of fresh insight ids.
///
/// Ids carry no cross-run identity; dedup uses the insight's stable key.
pub trait IdGenerator {
    /// Produce a new unique id.
    fn next_id(&self) -> String;
}

/// Production clock backed by the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Production id generator: epoch millis plus a random suffix.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> String {
        format!("{}-{}", Utc::now().timestamp_millis(), Uuid::new_v4().simple())
    }
}

/// Monotonic id generator for deterministic tests.
#[derive(Debug, Default)]
pub struct SequentialIdGenerator {
    counter: AtomicU64,
}

impl SequentialIdGenerator {
    /// Create a generator starting at `insight-0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> String {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("insight-{n}")
    }
}
