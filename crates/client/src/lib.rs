//! Transport-agnostic client for the SVPI vault device.
//!
//! The device is reached through one of two architecturally equivalent
//! endpoints, selected at construction time:
//!
//! - **Companion server** - HTTP/JSON on a fixed local base URL
//!   ([`HttpTransport`]).
//! - **Native-messaging host** - length-prefixed JSON over the host
//!   process's stdio, identified by a host application id
//!   ([`NativeBridgeTransport`]).
//!
//! [`VaultClient`] exposes the three logical operations (`status`, `list`,
//! `get_data`) over either transport and normalizes both known response
//! envelope generations into `svpi_protocol::CanonicalResult`.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use svpi_client::VaultClient;
//! use svpi_protocol::ListPayload;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = VaultClient::over_http(svpi_client::DEFAULT_SERVER_URL)?;
//!
//!     let result = client.list().await?;
//!     if let Some(fault) = result.fault() {
//!         eprintln!("device error: {}", fault.code);
//!         return Ok(());
//!     }
//!     let list: ListPayload = result.decode()?;
//!     for segment in list.segments {
//!         println!("{} ({:?}, {} bytes)", segment.name, segment.data_type, segment.size);
//!     }
//!
//!     // Encrypted segments need a password; plain ones must not send one.
//!     let data = client.get_data("mail", Some("secret")).await?;
//!     println!("{:?}", data.payload());
//!     Ok(())
//! }
//! ```
//!
//! ## Error model
//!
//! Three disjoint classes, never conflated:
//!
//! - [`TransportError`] (wrapped as [`ClientError::Transport`]) - request
//!   never reached the endpoint or no parseable reply came back.
//! - Device errors - the endpoint replied with a recognized failure code;
//!   returned as a value inside `CanonicalResult`, not as an `Err`.
//! - [`ClientError::UnknownEnvelope`] - valid JSON matching neither known
//!   envelope generation (protocol version mismatch).

pub mod client;
pub mod error;
pub mod transport;

pub use client::VaultClient;
pub use error::ClientError;
pub use transport::{
    HttpTransport, NativeBridgeTransport, Transport, TransportError, DEFAULT_NATIVE_HOST,
    DEFAULT_SERVER_URL,
};
