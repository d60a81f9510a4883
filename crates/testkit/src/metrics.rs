//! Standardized metrics collection for CI integration.
//!
//! Headless tests export a JSON report for regression tracking. Only the
//! subsystems this workspace actually has appear in the schema.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Top-level metrics report exported by headless tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    /// Test identifier.
    pub test_name: String,

    /// Timestamp when metrics were collected (ISO 8601).
    pub timestamp: String,

    /// Overall test result.
    pub result: TestResult,

    /// Terrain generation metrics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terrain: Option<TerrainMetrics>,

    /// Simulation tick metrics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation: Option<SimulationMetrics>,

    /// Protocol encoding metrics.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkMetrics>,

    /// Test execution metrics.
    pub test_execution: TestExecutionMetrics,
}

/// Overall test result status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestResult {
    /// Test passed all validations.
    Pass,
    /// Test failed.
    Fail,
    /// Test was skipped.
    Skip,
}

/// Terrain generation performance and quality metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainMetrics {
    /// Total chunks realized.
    pub chunks_realized: usize,
    /// Total cells classified.
    pub cells_classified: usize,
    /// Columns cross-checked against the scan oracle.
    pub columns_cross_checked: usize,
    /// Columns where closed form and scan disagreed (must be zero).
    pub height_disagreements: usize,
    /// Total generation time (milliseconds).
    pub total_gen_time_ms: f64,
}

/// Simulation tick metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationMetrics {
    /// Ticks advanced.
    pub ticks: u64,
    /// Entities alive at the end of the run.
    pub entities_alive: usize,
    /// Projectiles spawned over the run.
    pub projectiles_spawned: usize,
    /// Hit events emitted.
    pub hits: usize,
    /// Average tick time (microseconds).
    pub avg_tick_time_us: f64,
}

/// Protocol encoding metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkMetrics {
    /// Messages encoded.
    pub messages_encoded: usize,
    /// Total encoded bytes.
    pub bytes_encoded: u64,
    /// Messages rejected by validation.
    pub messages_rejected: usize,
}

/// Test execution metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestExecutionMetrics {
    /// Total test duration (seconds).
    pub duration_seconds: f64,
    /// Number of assertions checked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assertions_checked: Option<usize>,
}

/// Builder for constructing metrics reports.
pub struct MetricsReportBuilder {
    report: MetricsReport,
}

impl MetricsReportBuilder {
    /// Create a new builder with test name.
    pub fn new(test_name: impl Into<String>) -> Self {
        Self {
            report: MetricsReport {
                test_name: test_name.into(),
                timestamp: chrono::Utc::now().to_rfc3339(),
                result: TestResult::Pass,
                terrain: None,
                simulation: None,
                network: None,
                test_execution: TestExecutionMetrics {
                    duration_seconds: 0.0,
                    assertions_checked: None,
                },
            },
        }
    }

    /// Set test result.
    pub fn result(mut self, result: TestResult) -> Self {
        self.report.result = result;
        self
    }

    /// Set terrain metrics.
    pub fn terrain(mut self, metrics: TerrainMetrics) -> Self {
        self.report.terrain = Some(metrics);
        self
    }

    /// Set simulation metrics.
    pub fn simulation(mut self, metrics: SimulationMetrics) -> Self {
        self.report.simulation = Some(metrics);
        self
    }

    /// Set network metrics.
    pub fn network(mut self, metrics: NetworkMetrics) -> Self {
        self.report.network = Some(metrics);
        self
    }

    /// Set test execution metrics.
    pub fn execution(mut self, metrics: TestExecutionMetrics) -> Self {
        self.report.test_execution = metrics;
        self
    }

    /// Build the metrics report.
    pub fn build(self) -> MetricsReport {
        self.report
    }
}

/// Sink for writing metrics reports to JSON files.
pub struct MetricsSink {
    path: std::path::PathBuf,
}

impl MetricsSink {
    /// Create a new metrics sink at the specified path.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    /// Write metrics report to file.
    pub fn write(&self, report: &MetricsReport) -> Result<()> {
        let json = serde_json::to_string_pretty(report)?;
        let mut file = File::create(&self.path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
