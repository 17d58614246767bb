//! Protocol layer for the SVPI vault device.
//!
//! This crate defines the logical command set understood by every SVPI
//! endpoint, the two response envelope generations observed in the wild,
//! and the normalization pass that folds both into one canonical result:
//!
//! - **Commands** - `status`, `list`, `get_data` ([`Command`]). The same
//!   logical command is carried as a query string by the HTTP transport and
//!   as an externally tagged JSON object by the native-messaging transport.
//! - **Envelopes** - the legacy flat shape (a `status` string plus payload
//!   fields) and the versioned `svpi.response.v1` shape (`ok` flag with a
//!   `result` or `error` object and a `meta` block).
//! - **Normalization** - [`normalize`] detects the envelope generation and
//!   maps it to [`CanonicalResult`], so callers never branch on which
//!   protocol version the endpoint speaks.
//!
//! No I/O lives here; transports belong to the `svpi-client` crate.

pub mod command;
pub mod envelope;
pub mod normalize;

pub use command::{Command, GetDataCommand};
pub use envelope::{
    DataPayload, DataType, EndpointMeta, LegacyStatus, ListPayload, SegmentDescriptor,
    StatusPayload, RESPONSE_SCHEMA_V1,
};
pub use normalize::{normalize, CanonicalResult, DeviceFault, EnvelopeError, Outcome};
