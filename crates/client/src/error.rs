//! Client-level error type.

use svpi_protocol::EnvelopeError;
use thiserror::Error;

use crate::transport::TransportError;

/// Errors surfaced by [`crate::VaultClient`] operations.
///
/// Device-reported failures are *not* errors at this level; they come back
/// as `Outcome::DeviceError` inside a successful `CanonicalResult` so
/// callers can branch on the code without a generic failure path.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The request never reached the endpoint, or no parseable reply was
    /// received. The transport's diagnostic text is preserved verbatim.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The reply was valid JSON but matched neither known envelope shape.
    /// Usually means the endpoint speaks a newer or older protocol
    /// generation than this client.
    #[error("unknown response envelope: {0}")]
    UnknownEnvelope(#[from] EnvelopeError),
}
