//! Metric reports delivered by the Web Vitals observation layer
//!
//! A report is created once per finalized metric occurrence and consumed once
//! by the parameter builder. Attribution fields are optional individually:
//! a field that the metric kind does not carry is `None`, never `0`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of metric kinds this reporter understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    #[serde(rename = "CLS")]
    Cls,
    #[serde(rename = "FCP")]
    Fcp,
    #[serde(rename = "FID")]
    Fid,
    #[serde(rename = "INP")]
    Inp,
    #[serde(rename = "LCP")]
    Lcp,
    #[serde(rename = "TTFB")]
    Ttfb,
}

impl MetricKind {
    /// All kinds in the order handlers are registered
    pub const ALL: [MetricKind; 6] = [
        MetricKind::Fcp,
        MetricKind::Lcp,
        MetricKind::Cls,
        MetricKind::Ttfb,
        MetricKind::Fid,
        MetricKind::Inp,
    ];

    /// Wire name of the metric (also used as the analytics event name)
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Cls => "CLS",
            MetricKind::Fcp => "FCP",
            MetricKind::Fid => "FID",
            MetricKind::Inp => "INP",
            MetricKind::Lcp => "LCP",
            MetricKind::Ttfb => "TTFB",
        }
    }

    /// Responsiveness metrics are the only ones attributed to long tasks
    pub fn is_interaction(&self) -> bool {
        matches!(self, MetricKind::Fid | MetricKind::Inp)
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CLS" => Ok(MetricKind::Cls),
            "FCP" => Ok(MetricKind::Fcp),
            "FID" => Ok(MetricKind::Fid),
            "INP" => Ok(MetricKind::Inp),
            "LCP" => Ok(MetricKind::Lcp),
            "TTFB" => Ok(MetricKind::Ttfb),
            other => Err(format!("Unknown metric kind: {}", other)),
        }
    }
}

/// Timestamps of the user interaction being measured (milliseconds, monotonic)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventEntry {
    pub start_time: f64,
    pub processing_start: f64,
    pub processing_end: f64,
    pub duration: f64,
}

impl EventEntry {
    /// End of the event window (`startTime + duration`)
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Time from input to the first event handler running
    pub fn interaction_delay(&self) -> f64 {
        self.processing_start - self.start_time
    }

    /// Time spent running event handlers
    pub fn processing_time(&self) -> f64 {
        self.processing_end - self.processing_start
    }

    /// Time from the end of handlers to the next paint
    pub fn presentation_delay(&self) -> f64 {
        self.duration + self.start_time - self.processing_end
    }
}

/// Metric-specific diagnostic payload
///
/// One flat bag covering every metric kind. Each kind reads only the fields
/// it understands; the rest stay `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributionRecord {
    // CLS
    pub largest_shift_time: Option<f64>,
    pub largest_shift_target: Option<String>,

    // Shared by CLS, FCP, FID, INP
    pub load_state: Option<String>,

    // FCP, LCP
    pub time_to_first_byte: Option<f64>,
    #[serde(rename = "firstByteToFCP")]
    pub first_byte_to_fcp: Option<f64>,

    // FID, INP
    pub event_type: Option<String>,
    pub event_time: Option<f64>,
    pub event_target: Option<String>,
    pub event_entry: Option<EventEntry>,

    // LCP
    pub url: Option<String>,
    pub resource_load_delay: Option<f64>,
    pub resource_load_time: Option<f64>,
    pub element_render_delay: Option<f64>,
    pub element: Option<String>,

    // TTFB
    pub waiting_time: Option<f64>,
    pub dns_time: Option<f64>,
    pub connection_time: Option<f64>,
    pub request_time: Option<f64>,
}

/// A single finalized metric occurrence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricReport {
    /// Metric name exactly as delivered (e.g. "INP")
    pub name: String,
    pub delta: f64,
    pub id: String,
    #[serde(default)]
    pub navigation_type: Option<String>,
    #[serde(default)]
    pub attribution: Option<AttributionRecord>,
}

impl MetricReport {
    /// Create a report with no attribution payload
    pub fn new(kind: MetricKind, delta: f64, id: impl Into<String>) -> Self {
        Self {
            name: kind.as_str().to_string(),
            delta,
            id: id.into(),
            navigation_type: None,
            attribution: None,
        }
    }

    /// Attach an attribution payload
    pub fn with_attribution(mut self, attribution: AttributionRecord) -> Self {
        self.attribution = Some(attribution);
        self
    }

    /// Set the navigation type (e.g. "navigate", "reload")
    pub fn with_navigation_type(mut self, navigation_type: impl Into<String>) -> Self {
        self.navigation_type = Some(navigation_type.into());
        self
    }

    /// Parsed metric kind, `None` for names outside the known set
    pub fn kind(&self) -> Option<MetricKind> {
        self.name.parse().ok()
    }
}
