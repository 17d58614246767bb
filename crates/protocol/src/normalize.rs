//! Normalization of raw endpoint replies into one canonical result.
//!
//! [`normalize`] is a pure function: it inspects a raw JSON reply, decides
//! which envelope generation produced it, and maps it to
//! [`CanonicalResult`]. Detection is a discriminated parse - the versioned
//! shape (top-level boolean `ok`) is attempted first, then the legacy flat
//! shape (top-level string `status`). A reply matching neither shape, or a
//! legacy status outside the fixed enumeration, is an [`EnvelopeError`]:
//! callers must be able to tell "the device reported a failure" apart from
//! "we do not understand what the device said".

use serde_json::Value;
use thiserror::Error;

use crate::envelope::{EndpointMeta, LegacyStatus, VersionedEnvelope};

/// Errors produced when a syntactically valid JSON reply cannot be mapped
/// to a canonical result.
#[derive(Error, Debug)]
pub enum EnvelopeError {
    /// Legacy `status` string outside the fixed enumeration - most likely
    /// an endpoint newer than this client.
    #[error("unrecognized status value '{0}'")]
    UnknownStatus(String),

    /// Neither a versioned nor a legacy envelope.
    #[error("response matches no known envelope shape")]
    UnknownShape,

    /// A success payload did not decode into the requested typed view.
    #[error("payload decode failed: {0}")]
    Payload(String),
}

/// A device-reported failure, normalized across envelope generations.
///
/// Legacy envelopes only carry a status string, so `message` and `details`
/// are populated from versioned envelopes alone.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceFault {
    /// Failure code: a legacy status string or a versioned `error.code`.
    pub code: String,
    pub message: Option<String>,
    pub details: Option<Value>,
}

/// Terminal outcome of one command, after normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The endpoint reported success; the payload is the versioned
    /// envelope's `result` object, or the whole legacy reply.
    Ok(Value),
    /// The endpoint was reached and reported a recognized failure. This is
    /// an expected outcome (e.g. wrong password), returned as a value so
    /// callers can branch on the code.
    DeviceError(DeviceFault),
}

/// The single result shape every envelope generation is mapped into.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalResult {
    pub outcome: Outcome,
    /// Endpoint version info, present only on versioned envelopes.
    pub meta: Option<EndpointMeta>,
}

impl CanonicalResult {
    /// Returns `true` if the outcome is [`Outcome::Ok`].
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self.outcome, Outcome::Ok(_))
    }

    /// The success payload, if any.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Ok(payload) => Some(payload),
            Outcome::DeviceError(_) => None,
        }
    }

    /// The device failure, if any.
    #[must_use]
    pub fn fault(&self) -> Option<&DeviceFault> {
        match &self.outcome {
            Outcome::Ok(_) => None,
            Outcome::DeviceError(fault) => Some(fault),
        }
    }

    /// Decodes the success payload into a typed view such as
    /// [`crate::envelope::ListPayload`].
    ///
    /// # Errors
    ///
    /// [`EnvelopeError::Payload`] if the outcome is a device error or the
    /// payload does not match the requested shape.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Result<T, EnvelopeError> {
        match &self.outcome {
            Outcome::Ok(payload) => serde_json::from_value(payload.clone())
                .map_err(|err| EnvelopeError::Payload(err.to_string())),
            Outcome::DeviceError(fault) => Err(EnvelopeError::Payload(format!(
                "device error '{}' carries no payload",
                fault.code
            ))),
        }
    }
}

/// Maps a raw endpoint reply to a [`CanonicalResult`].
///
/// # Errors
///
/// [`EnvelopeError`] when the reply matches neither known envelope shape
/// or carries a legacy status outside the fixed enumeration.
pub fn normalize(raw: &Value) -> Result<CanonicalResult, EnvelopeError> {
    if raw.get("ok").is_some_and(Value::is_boolean) {
        return normalize_versioned(raw);
    }
    if let Some(status) = raw.get("status").and_then(Value::as_str) {
        return normalize_legacy(raw, status);
    }
    Err(EnvelopeError::UnknownShape)
}

fn normalize_versioned(raw: &Value) -> Result<CanonicalResult, EnvelopeError> {
    let envelope: VersionedEnvelope =
        serde_json::from_value(raw.clone()).map_err(|_| EnvelopeError::UnknownShape)?;

    let outcome = if envelope.ok {
        Outcome::Ok(envelope.result.unwrap_or(Value::Null))
    } else {
        // ok:false without an error object is a malformed envelope, not a
        // device error with an empty code.
        let fault = envelope.error.ok_or(EnvelopeError::UnknownShape)?;
        Outcome::DeviceError(DeviceFault {
            code: fault.code,
            message: fault.message,
            details: fault.details,
        })
    };

    Ok(CanonicalResult {
        outcome,
        meta: envelope.meta,
    })
}

fn normalize_legacy(raw: &Value, status: &str) -> Result<CanonicalResult, EnvelopeError> {
    let status =
        LegacyStatus::parse(status).ok_or_else(|| EnvelopeError::UnknownStatus(status.into()))?;

    let outcome = match status {
        // The payload is the rest of the reply object; keeping the status
        // field in place costs nothing and preserves the original bytes.
        LegacyStatus::Ok => Outcome::Ok(raw.clone()),
        failure => Outcome::DeviceError(DeviceFault {
            code: failure.as_str().to_string(),
            message: None,
            details: None,
        }),
    };

    Ok(CanonicalResult {
        outcome,
        meta: None,
    })
}
