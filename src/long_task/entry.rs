// Long-task log records as exposed by the platform
//
// Field names follow the platform's `long-animation-frame` entries so a
// captured `performance.getEntriesByType(...)` dump deserializes directly.

use crate::metric::EventEntry;
use serde::{Deserialize, Serialize};

/// One attributable unit of script work inside a long task
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScriptExecution {
    pub start_time: f64,
    pub duration: f64,
    pub execution_start: f64,

    // Identity, first non-empty wins
    pub source_location: Option<String>,
    pub invoker: Option<String>,
    pub name: Option<String>,

    // Classification, first non-empty wins
    pub invoker_type: Option<String>,
    #[serde(rename = "type")]
    pub script_type: Option<String>,

    #[serde(rename = "sourceURL")]
    pub source_url: Option<String>,
    pub source_function_name: Option<String>,
    pub source_char_position: Option<f64>,
    pub forced_style_and_layout_duration: Option<f64>,
}

impl ScriptExecution {
    /// Create a script record with timing only
    pub fn new(start_time: f64, duration: f64, execution_start: f64) -> Self {
        Self {
            start_time,
            duration,
            execution_start,
            ..Default::default()
        }
    }

    /// When the script finished (`startTime + duration`)
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Time between the script being scheduled and starting to execute
    pub fn compile_duration(&self) -> f64 {
        self.execution_start - self.start_time
    }

    /// Time from execution start to the end of the script
    pub fn exec_duration(&self) -> f64 {
        self.end_time() - self.execution_start
    }
}

/// One recorded long rendering/scripting task
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LongTaskEntry {
    pub start_time: f64,
    pub duration: f64,
    #[serde(default)]
    pub render_start: Option<f64>,
    #[serde(default)]
    pub style_and_layout_start: Option<f64>,
    #[serde(default)]
    pub scripts: Vec<ScriptExecution>,
}

impl LongTaskEntry {
    /// Create an entry with no render markers and no scripts
    pub fn new(start_time: f64, duration: f64) -> Self {
        Self {
            start_time,
            duration,
            ..Default::default()
        }
    }

    /// Append a script record (builder style)
    pub fn with_script(mut self, script: ScriptExecution) -> Self {
        self.scripts.push(script);
        self
    }

    /// End of the task window (`startTime + duration`)
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Whether this task's window intersects the event's window
    ///
    /// Open-interval test: windows that merely touch at an endpoint do not
    /// overlap.
    pub fn overlaps(&self, event: &EventEntry) -> bool {
        event.start_time < self.end_time() && self.start_time < event.end_time()
    }

    /// Work before rendering began; the whole task if it never rendered
    pub fn work_duration(&self) -> f64 {
        match self.render_start {
            Some(render_start) => render_start - self.start_time,
            None => self.duration,
        }
    }

    /// Rendering time at the tail of the task
    pub fn render_duration(&self) -> f64 {
        match self.render_start {
            Some(render_start) => self.end_time() - render_start,
            None => 0.0,
        }
    }

    /// Time between render start and style/layout start
    pub fn pre_layout_duration(&self) -> f64 {
        match (self.style_and_layout_start, self.render_start) {
            (Some(style_start), Some(render_start)) => style_start - render_start,
            _ => 0.0,
        }
    }

    /// Style and layout time at the tail of the task
    pub fn style_and_layout_duration(&self) -> f64 {
        match self.style_and_layout_start {
            Some(style_start) => self.end_time() - style_start,
            None => 0.0,
        }
    }

    /// Forced style/layout time summed over every script in the task
    pub fn total_forced_style_and_layout_duration(&self) -> f64 {
        self.scripts
            .iter()
            .map(|s| s.forced_style_and_layout_duration.unwrap_or(0.0))
            .sum()
    }
}

/// Platform-wide, append-only, time-ordered log of long tasks
///
/// The `supported` flag mirrors the platform's capability probe: when long
/// tasks cannot be recorded, the log is always empty and attribution is
/// skipped.
#[derive(Debug, Clone, Default)]
pub struct LongTaskLog {
    entries: Vec<LongTaskEntry>,
    supported: bool,
}

impl LongTaskLog {
    /// An empty log on a platform that records long tasks
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            supported: true,
        }
    }

    /// A log on a platform without long-task support
    pub fn unsupported() -> Self {
        Self {
            entries: Vec::new(),
            supported: false,
        }
    }

    /// A supported log seeded with existing entries
    pub fn from_entries(entries: Vec<LongTaskEntry>) -> Self {
        Self {
            entries,
            supported: true,
        }
    }

    /// Append a newly recorded task
    pub fn record(&mut self, entry: LongTaskEntry) {
        if let Some(last) = self.entries.last() {
            if entry.start_time < last.start_time {
                tracing::warn!(
                    "Long task at {} recorded after task at {}; log is no longer time-ordered",
                    entry.start_time,
                    last.start_time
                );
            }
        }
        self.entries.push(entry);
    }

    /// All recorded entries, oldest first
    pub fn entries(&self) -> &[LongTaskEntry] {
        &self.entries
    }

    pub fn is_supported(&self) -> bool {
        self.supported
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(start_time: f64, duration: f64) -> EventEntry {
        EventEntry {
            start_time,
            processing_start: start_time,
            processing_end: start_time,
            duration,
        }
    }

    #[test]
    fn test_overlap_partial() {
        let task = LongTaskEntry::new(90.0, 150.0);
        assert!(task.overlaps(&event(100.0, 200.0)));
    }

    #[test]
    fn test_overlap_touching_endpoints_excluded() {
        // Task ends exactly where the event starts
        let task = LongTaskEntry::new(0.0, 100.0);
        assert!(!task.overlaps(&event(100.0, 50.0)));

        // Event ends exactly where the task starts
        let task = LongTaskEntry::new(150.0, 10.0);
        assert!(!task.overlaps(&event(100.0, 50.0)));
    }

    #[test]
    fn test_overlap_containment_both_ways() {
        let outer = LongTaskEntry::new(0.0, 1000.0);
        assert!(outer.overlaps(&event(100.0, 10.0)));

        let inner = LongTaskEntry::new(105.0, 1.0);
        assert!(inner.overlaps(&event(100.0, 10.0)));
    }

    #[test]
    fn test_work_and_render_without_render_start() {
        let task = LongTaskEntry::new(10.0, 80.0);
        assert_eq!(task.work_duration(), 80.0);
        assert_eq!(task.render_duration(), 0.0);
        assert_eq!(task.pre_layout_duration(), 0.0);
        assert_eq!(task.style_and_layout_duration(), 0.0);
    }

    #[test]
    fn test_render_markers_split_the_task() {
        let task = LongTaskEntry {
            start_time: 10.0,
            duration: 90.0,
            render_start: Some(70.0),
            style_and_layout_start: Some(85.0),
            scripts: vec![],
        };
        assert_eq!(task.work_duration(), 60.0);
        assert_eq!(task.render_duration(), 30.0);
        assert_eq!(task.pre_layout_duration(), 15.0);
        assert_eq!(task.style_and_layout_duration(), 15.0);
    }

    #[test]
    fn test_render_start_zero_is_present() {
        let task = LongTaskEntry {
            start_time: 0.0,
            duration: 50.0,
            render_start: Some(0.0),
            ..Default::default()
        };
        assert_eq!(task.work_duration(), 0.0);
        assert_eq!(task.render_duration(), 50.0);
    }

    #[test]
    fn test_forced_layout_sum_treats_missing_as_zero() {
        let mut a = ScriptExecution::new(0.0, 10.0, 1.0);
        a.forced_style_and_layout_duration = Some(2.5);
        let b = ScriptExecution::new(10.0, 10.0, 11.0);
        let mut c = ScriptExecution::new(20.0, 10.0, 21.0);
        c.forced_style_and_layout_duration = Some(4.0);

        let task = LongTaskEntry::new(0.0, 40.0)
            .with_script(a)
            .with_script(b)
            .with_script(c);
        assert_eq!(task.total_forced_style_and_layout_duration(), 6.5);
    }

    #[test]
    fn test_script_phases() {
        let script = ScriptExecution::new(95.0, 60.0, 110.0);
        assert_eq!(script.end_time(), 155.0);
        assert_eq!(script.compile_duration(), 15.0);
        assert_eq!(script.exec_duration(), 45.0);
    }

    #[test]
    fn test_log_supported_flags() {
        assert!(LongTaskLog::new().is_supported());
        assert!(!LongTaskLog::unsupported().is_supported());
        assert!(LongTaskLog::from_entries(vec![]).is_supported());
    }

    #[test]
    fn test_log_record_appends_in_order() {
        let mut log = LongTaskLog::new();
        log.record(LongTaskEntry::new(10.0, 60.0));
        log.record(LongTaskEntry::new(100.0, 60.0));
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries()[0].start_time, 10.0);
        assert_eq!(log.entries()[1].start_time, 100.0);
    }

    #[test]
    fn test_script_deserializes_platform_names() {
        let json = r#"{
            "startTime": 1.0,
            "duration": 2.0,
            "executionStart": 1.5,
            "invokerType": "event-listener",
            "type": "user-callback",
            "sourceURL": "https://example.com/app.js",
            "sourceCharPosition": 42
        }"#;
        let script: ScriptExecution = serde_json::from_str(json).unwrap();
        assert_eq!(script.invoker_type.as_deref(), Some("event-listener"));
        assert_eq!(script.script_type.as_deref(), Some("user-callback"));
        assert_eq!(script.source_url.as_deref(), Some("https://example.com/app.js"));
        assert_eq!(script.source_char_position, Some(42.0));
        assert_eq!(script.forced_style_and_layout_duration, None);
    }
}
