//! Transport trait and failure taxonomy.

use async_trait::async_trait;
use serde_json::Value;
use svpi_protocol::Command;
use thiserror::Error;

/// Errors that can occur while moving one request/response pair.
///
/// Every variant means the same thing to callers: the command may or may
/// not have reached the device, and no usable reply exists. Transport
/// errors are never retried by this layer - the endpoint is a local,
/// always-or-never-available process, not a flaky network peer.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Invalid transport configuration (bad base URL, unusable manifest).
    #[error("invalid configuration: {0}")]
    Config(String),

    /// HTTP request failed (connection refused, timeout, protocol error).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint replied with a non-2xx HTTP status.
    #[error("endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Reply body was not parseable JSON.
    #[error("malformed response body: {0}")]
    MalformedBody(#[from] serde_json::Error),

    /// Pipe or process failure on the native-messaging channel.
    #[error("native bridge I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No native-messaging host manifest or program was found for the
    /// configured host id.
    #[error("native host '{host}' is not installed")]
    HostNotInstalled { host: String },

    /// The native host exited before a full reply frame arrived.
    #[error("native host closed the channel before replying")]
    ChannelClosed,

    /// The native host announced a reply frame larger than the channel
    /// allows.
    #[error("native host reply of {size} bytes exceeds the {limit} byte limit")]
    ReplyTooLarge { size: u32, limit: u32 },
}

/// One-shot request/response channel to an SVPI endpoint.
///
/// Implementations are stateless across calls: each `send` is one
/// independent transaction, and overlapping calls need no coordination.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Delivers one command and returns the endpoint's raw JSON reply.
    ///
    /// # Errors
    ///
    /// [`TransportError`] if the command could not be delivered or no
    /// parseable reply was received. Replies are returned unexamined;
    /// interpreting them is the normalizer's job.
    async fn send(&self, command: &Command) -> Result<Value, TransportError>;

    /// Short transport label for tracing output.
    fn name(&self) -> &'static str;
}
