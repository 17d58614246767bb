//! Transport adapters for the SVPI endpoint.
//!
//! Each adapter moves one opaque command to the remote endpoint and returns
//! one opaque JSON reply, translating its transport-specific failures into
//! [`TransportError`]. No adapter retries, caches, or interprets replies.

pub mod http;
pub mod native;
mod traits;

pub use http::{HttpTransport, DEFAULT_SERVER_URL};
pub use native::{NativeBridgeTransport, DEFAULT_NATIVE_HOST};
pub use traits::{Transport, TransportError};
