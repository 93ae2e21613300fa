//! Page captures: recorded metric reports, long tasks and environment
//!
//! A capture is a JSON dump of everything the reporter would have seen on a
//! single page view. Replaying it through the reporter reproduces the events
//! the page would have sent.
//!
//! ```json
//! {
//!   "longTasksSupported": true,
//!   "longTasks": [{"startTime": 90, "duration": 150, "scripts": []}],
//!   "environment": {"deviceMemory": 8},
//!   "reports": [{"name": "CLS", "delta": 0.05, "id": "v3-1", "attribution": {}}]
//! }
//! ```

use crate::environment::StaticEnvironment;
use crate::error::Result;
use crate::long_task::{LongTaskEntry, LongTaskLog};
use crate::metric::{MetricKind, MetricReport};
use crate::reporter::MetricObserver;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_supported() -> bool {
    true
}

/// Everything recorded on one page view
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCapture {
    #[serde(default)]
    pub reports: Vec<MetricReport>,

    #[serde(default)]
    pub long_tasks: Vec<LongTaskEntry>,

    #[serde(default = "default_supported")]
    pub long_tasks_supported: bool,

    #[serde(default)]
    pub environment: StaticEnvironment,
}

impl PageCapture {
    /// Load a capture from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let capture: Self = serde_json::from_str(content)?;
        tracing::debug!(
            "Loaded capture: {} reports, {} long tasks (supported: {})",
            capture.reports.len(),
            capture.long_tasks.len(),
            capture.long_tasks_supported
        );
        Ok(capture)
    }

    /// Split the capture into its long-task log, environment and report observer
    pub fn into_parts(self) -> (LongTaskLog, StaticEnvironment, ReplayObserver) {
        let log = if self.long_tasks_supported {
            LongTaskLog::from_entries(self.long_tasks)
        } else {
            LongTaskLog::unsupported()
        };
        (log, self.environment, ReplayObserver::new(self.reports))
    }
}

/// Replays captured reports in file order
#[derive(Debug, Clone)]
pub struct ReplayObserver {
    reports: Vec<MetricReport>,
}

impl ReplayObserver {
    pub fn new(reports: Vec<MetricReport>) -> Self {
        Self { reports }
    }

    pub fn pending(&self) -> usize {
        self.reports.len()
    }
}

impl MetricObserver for ReplayObserver {
    fn observe(
        &mut self,
        kinds: &[MetricKind],
        sink: &mut dyn FnMut(MetricReport) -> Result<()>,
    ) -> Result<()> {
        for report in self.reports.drain(..) {
            match report.kind() {
                Some(kind) if kinds.contains(&kind) => sink(report)?,
                _ => tracing::warn!("Skipping report for unsubscribed metric '{}'", report.name),
            }
        }
        Ok(())
    }
}
