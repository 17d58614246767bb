//! Response envelope models for both protocol generations.
//!
//! The versioned envelope (`svpi.response.v1`) wraps every reply in an
//! `ok` flag with a `result` or `error` object plus a `meta` block. Older
//! endpoints reply with a flat object whose `status` string doubles as the
//! success/error discriminator and whose remaining fields are the payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema identifier carried by every versioned envelope.
pub const RESPONSE_SCHEMA_V1: &str = "svpi.response.v1";

/// The `svpi.response.v1` envelope as received off the wire.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionedEnvelope {
    pub ok: bool,
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<EnvelopeFault>,
    #[serde(default)]
    pub meta: Option<EndpointMeta>,
}

/// The `error` object of a versioned envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct EnvelopeFault {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
}

/// The `meta` block of a versioned envelope.
///
/// Fields are optional on the client side: older v1 endpoints have been
/// observed omitting parts of the block, and losing the rest of the reply
/// over a missing version string helps nobody.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointMeta {
    #[serde(default)]
    pub app_version: Option<String>,
    #[serde(default)]
    pub architecture_version: Option<u32>,
}

/// Status strings of the legacy flat envelope.
///
/// Everything except `Ok` is a device-level failure. An unlisted string is
/// not representable here on purpose: the normalizer treats it as an
/// unknown envelope rather than coercing it into a catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyStatus {
    Ok,
    DeviceNotFound,
    DeviceError,
    PasswordError,
    ErrorDecodePassword,
    PasswordNotProvided,
    DataNotFound,
    ErrorReadData,
}

impl LegacyStatus {
    /// Parses a raw status string, returning `None` for values outside the
    /// fixed enumeration.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ok" => Some(Self::Ok),
            "device_not_found" => Some(Self::DeviceNotFound),
            "device_error" => Some(Self::DeviceError),
            "password_error" => Some(Self::PasswordError),
            "error_decode_password" => Some(Self::ErrorDecodePassword),
            "password_not_provided" => Some(Self::PasswordNotProvided),
            "data_not_found" => Some(Self::DataNotFound),
            "error_read_data" => Some(Self::ErrorReadData),
            _ => None,
        }
    }

    /// The wire string for this status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::DeviceNotFound => "device_not_found",
            Self::DeviceError => "device_error",
            Self::PasswordError => "password_error",
            Self::ErrorDecodePassword => "error_decode_password",
            Self::PasswordNotProvided => "password_not_provided",
            Self::DataNotFound => "data_not_found",
            Self::ErrorReadData => "error_read_data",
        }
    }
}

impl std::fmt::Display for LegacyStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Payload views
// ============================================================================

/// Storage class of a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataType {
    /// Readable without a password.
    Plain,
    /// Requires a password; decryption happens on the endpoint.
    Encrypted,
}

/// One entry of a `list` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentDescriptor {
    pub name: String,
    pub data_type: DataType,
    pub size: u64,
}

/// Typed view of a successful `list` payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPayload {
    pub segments: Vec<SegmentDescriptor>,
}

/// Typed view of a successful `get_data` payload.
///
/// `data_type` and `encrypted` are only emitted by versioned endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct DataPayload {
    pub name: String,
    pub data: String,
    #[serde(default)]
    pub data_type: Option<String>,
    #[serde(default)]
    pub encrypted: Option<bool>,
}

/// Typed view of a successful `status` payload.
///
/// Legacy endpoints report a firmware `version` string; versioned endpoints
/// report the `architecture_version` number alongside a nested `status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusPayload {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub architecture_version: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_legacy_status_parse_known_values() {
        assert_eq!(LegacyStatus::parse("ok"), Some(LegacyStatus::Ok));
        assert_eq!(
            LegacyStatus::parse("error_decode_password"),
            Some(LegacyStatus::ErrorDecodePassword)
        );
        assert_eq!(LegacyStatus::parse("totally_new_status"), None);
        assert_eq!(LegacyStatus::parse(""), None);
    }

    #[test]
    fn test_legacy_status_round_trip() {
        for status in [
            LegacyStatus::Ok,
            LegacyStatus::DeviceNotFound,
            LegacyStatus::DeviceError,
            LegacyStatus::PasswordError,
            LegacyStatus::ErrorDecodePassword,
            LegacyStatus::PasswordNotProvided,
            LegacyStatus::DataNotFound,
            LegacyStatus::ErrorReadData,
        ] {
            assert_eq!(LegacyStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_versioned_envelope_success_deserializes() {
        let raw = json!({
            "schema": RESPONSE_SCHEMA_V1,
            "ok": true,
            "command": "api.status",
            "result": {"status": "ok", "architecture_version": 8},
            "meta": {"app_version": "6.0.0", "architecture_version": 8}
        });
        let envelope: VersionedEnvelope = serde_json::from_value(raw).unwrap();
        assert!(envelope.ok);
        assert_eq!(envelope.command.as_deref(), Some("api.status"));
        assert!(envelope.error.is_none());
        let meta = envelope.meta.unwrap();
        assert_eq!(meta.app_version.as_deref(), Some("6.0.0"));
        assert_eq!(meta.architecture_version, Some(8));
    }

    #[test]
    fn test_versioned_envelope_error_deserializes() {
        let raw = json!({
            "schema": RESPONSE_SCHEMA_V1,
            "ok": false,
            "command": "api.get",
            "error": {
                "code": "password_required",
                "message": "Password required for decryption",
                "details": {"name": "mail"}
            },
            "meta": {"app_version": "6.0.0", "architecture_version": 8}
        });
        let envelope: VersionedEnvelope = serde_json::from_value(raw).unwrap();
        assert!(!envelope.ok);
        let fault = envelope.error.unwrap();
        assert_eq!(fault.code, "password_required");
        assert_eq!(
            fault.message.as_deref(),
            Some("Password required for decryption")
        );
        assert_eq!(fault.details.unwrap()["name"], "mail");
    }

    #[test]
    fn test_segment_descriptor_wire_shape() {
        let seg: SegmentDescriptor =
            serde_json::from_value(json!({"name": "a", "data_type": "plain", "size": 4})).unwrap();
        assert_eq!(seg.name, "a");
        assert_eq!(seg.data_type, DataType::Plain);
        assert_eq!(seg.size, 4);

        let encrypted: SegmentDescriptor =
            serde_json::from_value(json!({"name": "b", "data_type": "encrypted", "size": 0}))
                .unwrap();
        assert_eq!(encrypted.data_type, DataType::Encrypted);
    }

    #[test]
    fn test_status_payload_accepts_both_generations() {
        let legacy: StatusPayload =
            serde_json::from_value(json!({"status": "ok", "version": "5.2.1"})).unwrap();
        assert_eq!(legacy.version.as_deref(), Some("5.2.1"));
        assert_eq!(legacy.architecture_version, None);

        let versioned: StatusPayload =
            serde_json::from_value(json!({"status": "ok", "architecture_version": 8})).unwrap();
        assert_eq!(versioned.architecture_version, Some(8));
        assert_eq!(versioned.version, None);
    }
}
