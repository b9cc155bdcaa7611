//! Metrics reports for scenario runs and CI artifacts.
//!
//! Reports are exported as pretty JSON so regressions in propagation cost
//! (frontier visits per batch) can be tracked across commits.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use voxlight_world::LightUpdate;

/// Top-level metrics report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Run identifier
    pub test_name: String,

    /// Timestamp when metrics were collected (RFC 3339)
    pub timestamp: String,

    /// Git commit hash (if available)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,

    /// Overall result
    pub result: TestResult,

    /// Light propagation metrics
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lighting: Option<LightingMetrics>,

    /// Execution metrics
    pub test_execution: TestExecutionMetrics,
}

/// Overall result status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    /// All validations passed
    Pass,
    /// A validation failed
    Fail,
    /// Skipped
    Skip,
}

/// Light propagation cost, accumulated batch by batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LightingMetrics {
    /// Batches handed to the propagator
    pub batches: usize,

    /// Change records across all batches
    pub records: usize,

    /// Seeds left after duplicate resolution
    pub seeds: usize,

    /// Voxels whose light changed
    pub changed_voxels: usize,

    /// Decrease frontier entries drained
    pub decrease_visits: usize,

    /// Increase frontier entries drained
    pub increase_visits: usize,

    /// Total propagation time (microseconds)
    pub total_time_us: u128,

    /// Average time per batch (microseconds)
    pub avg_batch_time_us: f64,
}

impl LightingMetrics {
    /// Fold one batch into the totals.
    pub fn record(&mut self, records: usize, update: &LightUpdate, elapsed: Duration) {
        self.batches += 1;
        self.records += records;
        self.seeds += update.seeds;
        self.changed_voxels += update.changed.len();
        self.decrease_visits += update.decrease_visits;
        self.increase_visits += update.increase_visits;
        self.total_time_us += elapsed.as_micros();
        self.avg_batch_time_us = self.total_time_us as f64 / self.batches as f64;
    }

    /// Frontier entries drained by both passes.
    pub fn nodes_processed(&self) -> usize {
        self.decrease_visits + self.increase_visits
    }
}

/// Execution metrics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TestExecutionMetrics {
    /// Total duration (seconds)
    pub duration_seconds: f64,

    /// Positions checked against the fixed-point rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertions_checked: Option<usize>,

    /// Positions that passed the check
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validations_passed: Option<usize>,
}

/// Builder for constructing metrics reports
pub struct MetricsReportBuilder {
    report: MetricsReport,
}

impl MetricsReportBuilder {
    /// Create a new builder with a run name
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            report: MetricsReport {
                test_name: test_name.into(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                commit_hash: None,
                result: TestResult::Pass,
                lighting: None,
                test_execution: TestExecutionMetrics::default(),
            },
        }
    }

    /// Set result
    pub fn result(mut self, result: TestResult) -> Self {
        self.report.result = result;
        self
    }

    /// Set commit hash
    pub fn commit_hash(mut self, hash: impl Into<String>) -> Self {
        self.report.commit_hash = Some(hash.into());
        self
    }

    /// Set lighting metrics
    pub fn lighting(mut self, metrics: LightingMetrics) -> Self {
        self.report.lighting = Some(metrics);
        self
    }

    /// Set execution metrics
    pub fn execution(mut self, metrics: TestExecutionMetrics) -> Self {
        self.report.test_execution = metrics;
        self
    }

    /// Build the metrics report
    pub fn build(self) -> MetricsReport {
        self.report
    }
}

/// Sink for writing metrics reports to JSON files
pub struct MetricsSink {
    path: std::path::PathBuf,
}

impl MetricsSink {
    /// Create a new metrics sink at the specified path
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    /// Write metrics report to file
    pub fn write(&self, report: &MetricsReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        tracing::debug!(path = %self.path.display(), "metrics report written");
        Ok(())
    }
}
