//! SSE (Server-Sent Events) stream processing utilities
//!
//! Handles parsing of SSE streams from AI providers

use serde_json::Value;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::format::openai;
use super::stream::TextSink;

/// Events that can be parsed from SSE data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SseEvent {
    TextDelta(String),
    Skip,
}

/// Trait for provider-specific SSE parsing logic
pub trait SseParser: Send + Sync {
    /// Parse a JSON event into an SSE event
    fn parse_event(&self, json: &Value) -> SseEvent;
}

/// OpenAI chat completions chunk parser
pub struct OpenAIParser;

impl SseParser for OpenAIParser {
    fn parse_event(&self, json: &Value) -> SseEvent {
        match openai::extract_stream_delta(json) {
            Some(text) => SseEvent::TextDelta(text),
            None => SseEvent::Skip,
        }
    }
}

/// What the caller should do after a chunk was processed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamFlow {
    Continue,
    /// Provider signalled the end of the stream
    Done,
    /// The consumer dropped the stream
    Closed,
}

/// Common SSE stream processor that handles partial lines and buffering
pub struct SseStreamProcessor {
    /// Bytes of an incomplete line carried over from the previous chunk.
    /// Kept as bytes so multi-byte characters split across chunks survive.
    partial_line: Vec<u8>,
    /// When the stream started
    stream_start: Instant,
    /// Event counter for logging
    event_count: usize,
    /// Bytes received counter
    bytes_received: usize,
}

impl Default for SseStreamProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl SseStreamProcessor {
    pub fn new() -> Self {
        Self {
            partial_line: Vec::new(),
            stream_start: Instant::now(),
            event_count: 0,
            bytes_received: 0,
        }
    }

    /// Process a chunk of bytes from the SSE stream, forwarding text to `sink`
    pub async fn process_chunk<P: SseParser>(
        &mut self,
        bytes: &[u8],
        parser: &P,
        sink: &TextSink,
    ) -> StreamFlow {
        self.bytes_received += bytes.len();
        self.partial_line.extend_from_slice(bytes);

        debug!(
            "SSE chunk received: {} bytes (total: {} bytes)",
            bytes.len(),
            self.bytes_received
        );

        while let Some(pos) = self.partial_line.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.partial_line.drain(..=pos).collect();
            let line = String::from_utf8_lossy(&line);
            let flow = self.process_line(line.trim_end_matches(['\n', '\r']), parser, sink).await;
            if flow != StreamFlow::Continue {
                return flow;
            }
        }

        StreamFlow::Continue
    }

    /// Flush a trailing line that arrived without a newline
    pub async fn finish<P: SseParser>(&mut self, parser: &P, sink: &TextSink) -> StreamFlow {
        let remaining = std::mem::take(&mut self.partial_line);
        let flow = if remaining.is_empty() {
            StreamFlow::Done
        } else {
            let line = String::from_utf8_lossy(&remaining);
            match self.process_line(line.trim_end_matches('\r'), parser, sink).await {
                StreamFlow::Continue => StreamFlow::Done,
                other => other,
            }
        };

        info!(
            "SSE stream finished: {:?} elapsed, {} events, {} bytes total",
            self.stream_start.elapsed(),
            self.event_count,
            self.bytes_received
        );
        flow
    }

    async fn process_line<P: SseParser>(
        &mut self,
        line: &str,
        parser: &P,
        sink: &TextSink,
    ) -> StreamFlow {
        // Skip empty lines, SSE comments and non-data fields (event:, id:, retry:)
        let Some(data) = line.strip_prefix("data:") else {
            return StreamFlow::Continue;
        };
        let data = data.strip_prefix(' ').unwrap_or(data);
        self.process_sse_data(data, parser, sink).await
    }

    /// Process SSE data using the provider-specific parser
    pub async fn process_sse_data<P: SseParser>(
        &mut self,
        data: &str,
        parser: &P,
        sink: &TextSink,
    ) -> StreamFlow {
        self.event_count += 1;

        // Handle end-of-stream marker
        if data == "[DONE]" {
            info!(
                "SSE stream [DONE] marker received after {:?}, {} events, {} bytes",
                self.stream_start.elapsed(),
                self.event_count,
                self.bytes_received
            );
            return StreamFlow::Done;
        }

        match serde_json::from_str::<Value>(data) {
            Ok(json) => match parser.parse_event(&json) {
                SseEvent::TextDelta(text) => {
                    debug!("  -> TextDelta: {} chars", text.len());
                    if sink.send(text).await {
                        StreamFlow::Continue
                    } else {
                        debug!("Stream consumer dropped, stopping producer");
                        StreamFlow::Closed
                    }
                }
                SseEvent::Skip => StreamFlow::Continue,
            },
            Err(_) => {
                if !data.trim().is_empty() {
                    warn!(
                        "Failed to parse SSE JSON (event #{}): {}",
                        self.event_count, data
                    );
                }
                StreamFlow::Continue
            }
        }
    }
}
