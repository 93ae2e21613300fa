//! Event parameter construction for each metric kind
//!
//! Every event carries a shared base (category, value, label, environment)
//! plus a per-kind set of `debug_*` overrides taken from the attribution
//! record. Overrides win on key collisions. Absent attribution values omit
//! their key; missing targets fall back to the configured placeholder.

use crate::config::ReporterConfig;
use crate::environment::EnvironmentSnapshot;
use crate::long_task::LoafAttribution;
use crate::metric::{AttributionRecord, MetricKind, MetricReport};
use crate::value::{round_half_up, ParamValue, ParameterMap};

/// Builds the flat parameter map for one metric occurrence
#[derive(Debug, Clone, Copy)]
pub struct ParameterBuilder<'a> {
    config: &'a ReporterConfig,
}

impl<'a> ParameterBuilder<'a> {
    pub fn new(config: &'a ReporterConfig) -> Self {
        Self { config }
    }

    /// Base fields merged with the per-kind overrides
    ///
    /// `scroll_y` is the page's vertical scroll offset at build time; only
    /// LCP events report it.
    pub fn build(
        &self,
        report: &MetricReport,
        loaf: &LoafAttribution,
        env: &EnvironmentSnapshot,
        scroll_y: f64,
    ) -> ParameterMap {
        let mut params = self.base(report, env);
        params.extend(self.overrides(report, loaf, scroll_y));
        params
    }

    /// Fields shared by every metric kind
    pub fn base(&self, report: &MetricReport, env: &EnvironmentSnapshot) -> ParameterMap {
        let mut params = ParameterMap::new();
        params.insert(
            "event_category".to_string(),
            ParamValue::from(self.config.event_category.as_str()),
        );
        params.insert(
            "event_value".to_string(),
            ParamValue::Int(event_value(report)),
        );
        params.insert(
            "event_label".to_string(),
            ParamValue::from(report.id.as_str()),
        );
        params.insert(
            "nonInteraction".to_string(),
            ParamValue::Bool(self.config.non_interaction),
        );
        env.insert_into(&mut params);
        if let Some(navigation_type) = &report.navigation_type {
            params.insert(
                "navigation_type".to_string(),
                ParamValue::from(navigation_type.as_str()),
            );
        }
        if let Some(version) = &self.config.debug_version {
            params.insert(
                "debug_version".to_string(),
                ParamValue::from(version.as_str()),
            );
        }
        params
    }

    /// Kind-specific `debug_*` fields; empty for unknown kinds
    pub fn overrides(
        &self,
        report: &MetricReport,
        loaf: &LoafAttribution,
        scroll_y: f64,
    ) -> ParameterMap {
        let fallback = AttributionRecord::default();
        let attribution = report.attribution.as_ref().unwrap_or(&fallback);

        let mut out = Overrides::default();
        match report.kind() {
            Some(MetricKind::Cls) => {
                out.float("debug_time", attribution.largest_shift_time);
                out.text("debug_load_state", attribution.load_state.as_deref());
                out.target(&attribution.largest_shift_target, self.not_set());
            }
            Some(MetricKind::Fcp) => {
                out.float("debug_time_to_first_byte", attribution.time_to_first_byte);
                out.float("debug_first_byte_to_fcp", attribution.first_byte_to_fcp);
                out.text("debug_load_state", attribution.load_state.as_deref());
                // FCP has no element target; the load state stands in for it
                out.target(&attribution.load_state, self.not_set());
            }
            Some(MetricKind::Fid) | Some(MetricKind::Inp) => {
                out.text("debug_event", attribution.event_type.as_deref());
                out.int("debug_time", attribution.event_time.map(round_half_up));
                out.text("debug_load_state", attribution.load_state.as_deref());
                out.target(&attribution.event_target, self.not_set());
                loaf.spread_into(&mut out.0);

                if let Some(entry) = &attribution.event_entry {
                    out.int(
                        "debug_interaction_delay",
                        Some(round_half_up(entry.interaction_delay())),
                    );
                    out.int(
                        "debug_processing_time",
                        Some(round_half_up(entry.processing_time())),
                    );
                    out.int(
                        "debug_presentation_delay",
                        Some(round_half_up(entry.presentation_delay())),
                    );
                }
            }
            Some(MetricKind::Lcp) => {
                out.text("debug_url", attribution.url.as_deref());
                out.float("debug_time_to_first_byte", attribution.time_to_first_byte);
                out.float("debug_resource_load_delay", attribution.resource_load_delay);
                out.float("debug_resource_load_time", attribution.resource_load_time);
                out.float(
                    "debug_element_render_delay",
                    attribution.element_render_delay,
                );
                out.target(&attribution.element, self.not_set());
                out.float("debug_scroll_y", Some(scroll_y));
            }
            Some(MetricKind::Ttfb) => {
                out.float("debug_waiting_time", attribution.waiting_time);
                out.float("debug_dns_time", attribution.dns_time);
                out.float("debug_connection_time", attribution.connection_time);
                out.float("debug_request_time", attribution.request_time);
            }
            None => {
                tracing::debug!("No overrides for unrecognized metric '{}'", report.name);
            }
        }
        out.0
    }

    fn not_set(&self) -> &str {
        &self.config.not_set_label
    }
}

/// CLS is unitless and tiny, so it is scaled to thousandths before rounding
fn event_value(report: &MetricReport) -> i64 {
    match report.kind() {
        Some(MetricKind::Cls) => round_half_up(report.delta * 1000.0),
        _ => round_half_up(report.delta),
    }
}

#[derive(Default)]
struct Overrides(ParameterMap);

impl Overrides {
    fn float(&mut self, key: &str, value: Option<f64>) {
        if let Some(value) = value {
            self.0.insert(key.to_string(), ParamValue::Float(value));
        }
    }

    fn int(&mut self, key: &str, value: Option<i64>) {
        if let Some(value) = value {
            self.0.insert(key.to_string(), ParamValue::Int(value));
        }
    }

    fn text(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.0.insert(key.to_string(), ParamValue::from(value));
        }
    }

    /// `debug_target`, with empty or missing targets replaced by the placeholder
    fn target(&mut self, value: &Option<String>, not_set: &str) {
        let target = value
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(not_set);
        self.0
            .insert("debug_target".to_string(), ParamValue::from(target));
    }
}
