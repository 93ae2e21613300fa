//! Per-metric reporting pipeline
//!
//! One synchronous chain per metric occurrence:
//! resolver (interaction kinds only) → environment snapshot → parameter
//! builder → transport. The reporter holds no per-event state; the long-task
//! log is only read.
//!
//! # Example
//!
//! ```
//! use vitalscope::config::ReporterConfig;
//! use vitalscope::environment::StaticEnvironment;
//! use vitalscope::long_task::LongTaskLog;
//! use vitalscope::metric::{AttributionRecord, MetricKind, MetricReport};
//! use vitalscope::reporter::Reporter;
//! use vitalscope::transport::RecordingTransport;
//! use vitalscope::value::ParamValue;
//!
//! # fn main() -> vitalscope::error::Result<()> {
//! let mut reporter = Reporter::new(
//!     ReporterConfig::default(),
//!     LongTaskLog::new(),
//!     StaticEnvironment::default(),
//!     RecordingTransport::new(),
//! );
//!
//! let report = MetricReport::new(MetricKind::Cls, 0.05, "v3-1")
//!     .with_attribution(AttributionRecord::default());
//! reporter.handle(&report)?;
//!
//! let event = &reporter.transport().events()[0];
//! assert_eq!(event.event, "CLS");
//! assert_eq!(event.params["event_value"], ParamValue::Int(50));
//! # Ok(())
//! # }
//! ```

use crate::config::ReporterConfig;
use crate::environment::{snapshot, EnvironmentProbe};
use crate::error::{Result, VitalsError};
use crate::long_task::{resolve_with, LoafAttribution, LongTaskLog};
use crate::metric::{MetricKind, MetricReport};
use crate::params::ParameterBuilder;
use crate::transport::Transport;

/// Source of metric reports
///
/// Implementations deliver every finalized report for the subscribed kinds
/// to `sink`, synchronously and in occurrence order.
pub trait MetricObserver {
    fn observe(
        &mut self,
        kinds: &[MetricKind],
        sink: &mut dyn FnMut(MetricReport) -> Result<()>,
    ) -> Result<()>;
}

/// Turns metric reports into analytics events
pub struct Reporter<E: EnvironmentProbe, T: Transport> {
    config: ReporterConfig,
    long_tasks: LongTaskLog,
    environment: E,
    transport: T,
}

impl<E: EnvironmentProbe, T: Transport> Reporter<E, T> {
    pub fn new(config: ReporterConfig, long_tasks: LongTaskLog, environment: E, transport: T) -> Self {
        Self {
            config,
            long_tasks,
            environment,
            transport,
        }
    }

    pub fn config(&self) -> &ReporterConfig {
        &self.config
    }

    /// The platform's long-task log, for appending newly recorded tasks
    pub fn long_tasks_mut(&mut self) -> &mut LongTaskLog {
        &mut self.long_tasks
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Build and emit the event for a single metric occurrence
    pub fn handle(&mut self, report: &MetricReport) -> Result<()> {
        let loaf = match report.kind() {
            Some(kind) if kind.is_interaction() => resolve_with(
                report.attribution.as_ref(),
                self.long_tasks.entries(),
                self.long_tasks.is_supported(),
                self.config.script_fields,
            ),
            _ => LoafAttribution::empty(),
        };

        let env = snapshot(&self.environment);
        let params = ParameterBuilder::new(&self.config).build(
            report,
            &loaf,
            &env,
            self.environment.scroll_y(),
        );

        tracing::debug!(
            "Emitting {} ({}) with {} params, {} from LoAF",
            report.name,
            report.id,
            params.len(),
            loaf.len()
        );
        self.transport.emit(&report.name, &params)
    }
}

/// Subscribe the reporter to every metric kind and forward each report
///
/// Without an observer nothing is processed: a single diagnostic is logged
/// and `ObserverUnavailable` is returned. Returns the number of events
/// emitted otherwise.
pub fn send_web_vitals<E: EnvironmentProbe, T: Transport>(
    observer: Option<&mut dyn MetricObserver>,
    reporter: &mut Reporter<E, T>,
) -> Result<usize> {
    let Some(observer) = observer else {
        tracing::error!("Web Vitals is not loaded!!");
        return Err(VitalsError::ObserverUnavailable);
    };

    let mut emitted = 0usize;
    observer.observe(&MetricKind::ALL, &mut |report: MetricReport| -> Result<()> {
        reporter.handle(&report)?;
        emitted += 1;
        Ok(())
    })?;

    tracing::info!("Forwarded {} web vitals events", emitted);
    Ok(emitted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::StaticEnvironment;
    use crate::long_task::{keys, LongTaskEntry, ScriptExecution};
    use crate::metric::{AttributionRecord, EventEntry};
    use crate::transport::RecordingTransport;
    use crate::value::{ParamValue, ParameterMap};

    struct VecObserver {
        reports: Vec<MetricReport>,
        subscribed: Vec<MetricKind>,
    }

    impl MetricObserver for VecObserver {
        fn observe(
            &mut self,
            kinds: &[MetricKind],
            sink: &mut dyn FnMut(MetricReport) -> Result<()>,
        ) -> Result<()> {
            self.subscribed = kinds.to_vec();
            for report in self.reports.drain(..) {
                sink(report)?;
            }
            Ok(())
        }
    }

    struct FailingTransport;

    impl Transport for FailingTransport {
        fn emit(&mut self, event_name: &str, _params: &ParameterMap) -> Result<()> {
            Err(VitalsError::Transport {
                event: event_name.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::Other, "offline"),
            })
        }
    }

    fn inp_report() -> MetricReport {
        MetricReport::new(MetricKind::Inp, 200.0, "v3-inp").with_attribution(AttributionRecord {
            event_entry: Some(EventEntry {
                start_time: 100.0,
                processing_start: 120.0,
                processing_end: 150.0,
                duration: 200.0,
            }),
            ..Default::default()
        })
    }

    fn long_tasks() -> LongTaskLog {
        LongTaskLog::from_entries(vec![LongTaskEntry::new(90.0, 150.0)
            .with_script(ScriptExecution::new(95.0, 60.0, 110.0))])
    }

    fn reporter(log: LongTaskLog) -> Reporter<StaticEnvironment, RecordingTransport> {
        Reporter::new(
            ReporterConfig::default(),
            log,
            StaticEnvironment::default(),
            RecordingTransport::new(),
        )
    }

    #[test]
    fn test_inp_gets_loaf_attribution() {
        let mut reporter = reporter(long_tasks());
        reporter.handle(&inp_report()).unwrap();

        let event = &reporter.transport().events()[0];
        assert_eq!(event.event, "INP");
        assert_eq!(event.params[keys::SCRIPT_TOTAL_DURATION], ParamValue::Int(155));
        assert_eq!(event.params["debug_interaction_delay"], ParamValue::Int(20));
        assert_eq!(event.params["debug_processing_time"], ParamValue::Int(30));
        assert_eq!(event.params["debug_presentation_delay"], ParamValue::Int(150));
    }

    #[test]
    fn test_non_interaction_kinds_skip_resolver() {
        let mut reporter = reporter(long_tasks());
        let mut report = inp_report();
        report.name = "LCP".to_string();
        reporter.handle(&report).unwrap();

        let event = &reporter.transport().events()[0];
        assert!(!event.params.keys().any(|k| k.starts_with("debug_loaf_")));
    }

    #[test]
    fn test_unsupported_long_tasks_still_emit() {
        let mut reporter = reporter(LongTaskLog::unsupported());
        reporter.handle(&inp_report()).unwrap();

        let event = &reporter.transport().events()[0];
        assert!(!event.params.contains_key(keys::SCRIPT_TOTAL_DURATION));
        assert_eq!(event.params["debug_interaction_delay"], ParamValue::Int(20));
    }

    #[test]
    fn test_newly_recorded_tasks_are_seen() {
        let mut reporter = reporter(LongTaskLog::new());
        reporter.handle(&inp_report()).unwrap();
        reporter
            .long_tasks_mut()
            .record(LongTaskEntry::new(90.0, 150.0).with_script(ScriptExecution::new(95.0, 60.0, 110.0)));
        reporter.handle(&inp_report()).unwrap();

        let events = reporter.transport().events();
        assert!(!events[0].params.contains_key(keys::META_LENGTH));
        assert_eq!(events[1].params[keys::META_LENGTH], ParamValue::Int(1));
    }

    #[test]
    fn test_unknown_metric_emitted_under_received_name() {
        let mut reporter = reporter(LongTaskLog::new());
        let report = MetricReport {
            name: "TBT".to_string(),
            delta: 3.0,
            id: "x".to_string(),
            navigation_type: None,
            attribution: None,
        };
        reporter.handle(&report).unwrap();
        assert_eq!(reporter.transport().events()[0].event, "TBT");
    }

    #[test]
    fn test_send_web_vitals_subscribes_all_kinds() {
        let mut reporter = reporter(long_tasks());
        let mut observer = VecObserver {
            reports: vec![
                MetricReport::new(MetricKind::Ttfb, 300.0, "a"),
                inp_report(),
            ],
            subscribed: vec![],
        };

        let emitted = send_web_vitals(Some(&mut observer as &mut dyn MetricObserver), &mut reporter).unwrap();
        assert_eq!(emitted, 2);
        assert_eq!(observer.subscribed, MetricKind::ALL.to_vec());
        let names: Vec<_> = reporter
            .transport()
            .events()
            .iter()
            .map(|e| e.event.clone())
            .collect();
        assert_eq!(names, vec!["TTFB", "INP"]);
    }

    #[test]
    fn test_send_web_vitals_without_observer() {
        let mut reporter = reporter(long_tasks());
        let err = send_web_vitals(None, &mut reporter).unwrap_err();
        assert!(matches!(err, VitalsError::ObserverUnavailable));
        assert!(reporter.transport().events().is_empty());
    }

    #[test]
    fn test_transport_failure_propagates() {
        let mut reporter = Reporter::new(
            ReporterConfig::default(),
            long_tasks(),
            StaticEnvironment::default(),
            FailingTransport,
        );
        let mut observer = VecObserver {
            reports: vec![inp_report()],
            subscribed: vec![],
        };
        let err = send_web_vitals(Some(&mut observer as &mut dyn MetricObserver), &mut reporter).unwrap_err();
        assert!(matches!(err, VitalsError::Transport { .. }));
    }
}
