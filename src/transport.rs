//! Analytics transports
//!
//! A transport accepts a named event plus its flat parameter map. Delivery,
//! batching and retries belong to the transport; the reporter only calls
//! `emit` once per metric occurrence.

use crate::error::{Result, VitalsError};
use crate::value::ParameterMap;
use serde::Serialize;
use std::io::Write;

/// Sink for finished analytics events
pub trait Transport {
    fn emit(&mut self, event_name: &str, params: &ParameterMap) -> Result<()>;
}

/// One emitted event, as recorded or serialized
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmittedEvent {
    pub event: String,
    pub params: ParameterMap,
}

/// Keeps every event in memory, in emission order
#[derive(Debug, Default)]
pub struct RecordingTransport {
    events: Vec<EmittedEvent>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[EmittedEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<EmittedEvent> {
        self.events
    }
}

impl Transport for RecordingTransport {
    fn emit(&mut self, event_name: &str, params: &ParameterMap) -> Result<()> {
        self.events.push(EmittedEvent {
            event: event_name.to_string(),
            params: params.clone(),
        });
        Ok(())
    }
}

/// Writes one JSON object per event, newline-delimited
pub struct JsonLinesTransport<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesTransport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[derive(Serialize)]
struct JsonLine<'a> {
    event: &'a str,
    params: &'a ParameterMap,
}

impl<W: Write> Transport for JsonLinesTransport<W> {
    fn emit(&mut self, event_name: &str, params: &ParameterMap) -> Result<()> {
        let line = JsonLine {
            event: event_name,
            params,
        };
        serde_json::to_writer(&mut self.writer, &line)
            .map_err(std::io::Error::from)
            .and_then(|_| writeln!(self.writer))
            .map_err(|source| VitalsError::Transport {
                event: event_name.to_string(),
                source,
            })
    }
}

/// Human-readable `EVENT key=value ...` lines
pub struct TextTransport<W: Write> {
    writer: W,
}

impl<W: Write> TextTransport<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Transport for TextTransport<W> {
    fn emit(&mut self, event_name: &str, params: &ParameterMap) -> Result<()> {
        let mut line = event_name.to_string();
        for (key, value) in params {
            line.push_str(&format!(" {}={}", key, value));
        }
        writeln!(self.writer, "{}", line).map_err(|source| VitalsError::Transport {
            event: event_name.to_string(),
            source,
        })
    }
}
