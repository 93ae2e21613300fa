use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use tracing_subscriber::EnvFilter;
use vitalscope::capture::PageCapture;
use vitalscope::cli::{Cli, OutputFormat};
use vitalscope::config::ReporterConfig;
use vitalscope::error::VitalsError;
use vitalscope::long_task::{LongTaskLog, ScriptFieldPolicy};
use vitalscope::reporter::{send_web_vitals, MetricObserver, Reporter};
use vitalscope::transport::{JsonLinesTransport, TextTransport, Transport};

/// Initialize tracing subscriber; warnings always, everything with --debug
fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::TRACE
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// Load reporter configuration and apply CLI overrides
fn load_config(args: &Cli) -> Result<ReporterConfig> {
    let mut config = match &args.config {
        Some(path) => ReporterConfig::from_toml(path)?,
        None => ReporterConfig::default(),
    };
    if args.canonical_fields {
        config.script_fields = ScriptFieldPolicy::Canonical;
    }
    Ok(config)
}

/// Replay a capture through the reporter into the given transport
fn replay<T: Transport>(
    capture: Option<PageCapture>,
    config: ReporterConfig,
    no_long_tasks: bool,
    transport: T,
) -> vitalscope::error::Result<usize> {
    let (long_tasks, environment, mut observer) = match capture {
        Some(capture) => {
            let (log, environment, observer) = capture.into_parts();
            (log, environment, Some(observer))
        }
        None => (LongTaskLog::unsupported(), Default::default(), None),
    };
    let long_tasks = if no_long_tasks {
        LongTaskLog::unsupported()
    } else {
        long_tasks
    };

    let mut reporter = Reporter::new(config, long_tasks, environment, transport);
    send_web_vitals(
        observer.as_mut().map(|o| o as &mut dyn MetricObserver),
        &mut reporter,
    )
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = load_config(&args)?;

    let capture = match &args.capture {
        Some(path) => Some(
            PageCapture::from_file(path)
                .with_context(|| format!("Failed to load capture: {}", path.display()))?,
        ),
        None => None,
    };

    let stdout = std::io::stdout();
    let result = match args.format {
        OutputFormat::Json => replay(
            capture,
            config,
            args.no_long_tasks,
            JsonLinesTransport::new(stdout.lock()),
        ),
        OutputFormat::Text => replay(
            capture,
            config,
            args.no_long_tasks,
            TextTransport::new(stdout.lock()),
        ),
    };

    match result {
        Ok(emitted) => {
            std::io::stdout().flush()?;
            tracing::debug!("Replay complete: {} events", emitted);
            Ok(())
        }
        // Already reported once through tracing; nothing was processed
        Err(VitalsError::ObserverUnavailable) => std::process::exit(1),
        Err(e) => Err(e.into()),
    }
}
