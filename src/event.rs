use crate::error::SensorError;
use serde::{Deserialize, Serialize};
use std::io::Write;

/// One focus/idle change record. The serialized key names and their order
/// (`ts`, `app`, `title`, `idle`) are part of the sink contract; consumers
/// parse the stream line by line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEvent {
    /// Unix seconds at emission time.
    #[serde(rename = "ts")]
    pub timestamp: f64,
    pub app: String,
    pub title: String,
    /// Raw idle seconds at emission time, not the bucketed value.
    #[serde(rename = "idle")]
    pub idle_seconds: f64,
}

/// Destination for emitted events. Implementations decide transport and
/// framing; the sampler hands over one immutable record at a time.
pub trait EventSink {
    fn emit(&mut self, event: &ActivityEvent) -> Result<(), SensorError>;
}

/// Writes one JSON object per line to the wrapped writer.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn emit(&mut self, event: &ActivityEvent) -> Result<(), SensorError> {
        let line = serde_json::to_string(event)?;
        writeln!(self.writer, "{}", line)?;
        self.writer.flush()?;
        Ok(())
    }
}
