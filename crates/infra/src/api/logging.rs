//! Application log streaming
//!
//! The log endpoint answers with a long-lived body of length-prefixed frames:
//! a 4-byte big-endian length followed by one JSON envelope.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use serde::Deserialize;
use skiff_core::LogSource;
use skiff_domain::constants::LOG_ENVELOPE_MAX_BYTES;
use skiff_domain::{LogMessage, LogMessageType, Result, Warned};
use tokio::sync::mpsc;
use tokio_util::codec::{FramedRead, LengthDelimitedCodec};
use tracing::{debug, instrument};

use crate::errors::into_domain;
use crate::http::{BodyReader, BodySink, Gateway, Request};

const NANOS_PER_SEC: i64 = 1_000_000_000;

#[derive(Debug, Deserialize)]
struct Envelope {
    message: String,
    message_type: LogMessageType,
    /// Nanoseconds since the epoch.
    timestamp: i64,
    #[serde(default)]
    source_type: String,
    #[serde(default)]
    source_instance: String,
}

impl From<Envelope> for LogMessage {
    fn from(value: Envelope) -> Self {
        LogMessage {
            message: value.message,
            message_type: value.message_type,
            timestamp: timestamp_from_nanos(value.timestamp),
            source_type: value.source_type,
            source_instance: value.source_instance,
        }
    }
}

fn timestamp_from_nanos(nanos: i64) -> DateTime<Utc> {
    let secs = nanos.div_euclid(NANOS_PER_SEC);
    let subsec = nanos.rem_euclid(NANOS_PER_SEC) as u32;
    DateTime::from_timestamp(secs, subsec).unwrap_or_default()
}

fn envelope_codec() -> LengthDelimitedCodec {
    LengthDelimitedCodec::builder()
        .length_field_length(4)
        .big_endian()
        .max_frame_length(LOG_ENVELOPE_MAX_BYTES)
        .new_codec()
}

/// Decodes frames from the body and forwards them until the body ends or
/// the receiving side goes away.
struct EnvelopeSink {
    sink: mpsc::Sender<LogMessage>,
}

#[async_trait]
impl BodySink for EnvelopeSink {
    async fn consume(&mut self, body: BodyReader) -> Result<()> {
        let mut frames = FramedRead::new(body, envelope_codec());
        loop {
            // An idle stream must still notice the receiver going away.
            let next = tokio::select! {
                next = frames.next() => next,
                () = self.sink.closed() => {
                    debug!("log receiver dropped, closing stream");
                    break;
                }
            };
            let Some(frame) = next else {
                break;
            };
            let frame = frame.map_err(into_domain)?;
            let envelope: Envelope = serde_json::from_slice(&frame).map_err(into_domain)?;
            if self.sink.send(envelope.into()).await.is_err() {
                debug!("log receiver dropped, closing stream");
                break;
            }
        }
        Ok(())
    }
}

/// Base URL for the log stream gateway.
///
/// The root document advertises the logging endpoint with a websocket
/// scheme; the stream itself is read over plain HTTP(S) on the same host.
pub fn log_stream_base_url(endpoint: &str) -> String {
    match endpoint.split_once("://") {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("wss") => format!("https://{rest}"),
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("ws") => format!("http://{rest}"),
        _ => endpoint.to_string(),
    }
}

/// Client for the logging endpoint.
#[derive(Debug, Clone)]
pub struct LogClient {
    gateway: Gateway,
}

impl LogClient {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }
}

#[async_trait]
impl LogSource for LogClient {
    #[instrument(skip(self, sink))]
    async fn stream_logs(&self, app_guid: &str, sink: mpsc::Sender<LogMessage>) -> Warned<()> {
        let request = Request::get(format!("/apps/{app_guid}/stream")).authenticated();
        let mut envelopes = EnvelopeSink { sink };
        self.gateway.perform_request_for_streaming_body(request, &mut envelopes).await
    }
}
