#![no_main]

use libfuzzer_sys::fuzz_target;
use vitalscope::capture::PageCapture;
use vitalscope::config::ReporterConfig;
use vitalscope::reporter::{send_web_vitals, MetricObserver, Reporter};
use vitalscope::transport::RecordingTransport;

fuzz_target!(|data: &[u8]| {
    // Any capture that parses must replay without panicking
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(capture) = PageCapture::from_json_str(input) {
            let (log, environment, mut observer) = capture.into_parts();
            let mut reporter = Reporter::new(
                ReporterConfig::default(),
                log,
                environment,
                RecordingTransport::new(),
            );
            let _ = send_web_vitals(Some(&mut observer as &mut dyn MetricObserver), &mut reporter);
        }
    }
});
