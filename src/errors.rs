// ABOUTME: Engine error types for the insight pipeline
// ABOUTME: Producers surface malformed-snapshot conditions; everything else degrades gracefully
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Vida Wellness Intelligence

use thiserror::Error;

/// Errors an individual insight producer can surface.
///
/// The aggregator logs and skips a failing producer rather than aborting the
/// run, so these never propagate to the caller of `analyze`.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A numeric series the producer depends on contains NaN or infinite values.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),
}

/// Check that a slice of samples is entirely finite before analysis.
///
/// # Errors
///
/// Returns `EngineError::InvalidSnapshot` naming the offending series when
/// any value is NaN or infinite.
pub fn ensure_finite(series: &str, values: &[f64]) -> Result<(), EngineError> {
    if values.iter().all(|v| v.is_finite()) {
        Ok(())
    } else {
        Err(EngineError::InvalidSnapshot(format!(
            "series '{series}' contains non-finite values"
        )))
    }
}
