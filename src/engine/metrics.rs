//! Stream run metrics.
//!
//! `StreamParser::run` discards these; `StreamParser::run_with_metrics` keeps
//! them for the verbose API and the CLI timing section.

use crate::StreamReport;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct RunMetrics {
    /// Total elapsed time for the run.
    pub total: Duration,
    /// Inventory tally: lines counted.
    pub inventory: StageMetrics,
    /// Rule parsing: lines seen, lines rejected.
    pub rules: StageMetrics,
    /// Fulfillment: orders seen, orders that could not be filled.
    pub fulfillment: StageMetrics,
}

/// Timing and counts for one stage.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct StageMetrics {
    pub duration: Duration,
    /// Items the stage looked at.
    pub processed: usize,
    /// Items the stage turned into errors.
    pub rejected: usize,
}

/// Report bundled with timing information.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub report: StreamReport,
    pub metrics: RunMetrics,
}
