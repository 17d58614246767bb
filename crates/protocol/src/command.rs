//! Logical command model shared by every transport.

use serde::{Deserialize, Serialize};

/// One logical request to an SVPI endpoint.
///
/// Serialization produces the native-messaging wire shape: an externally
/// tagged object such as `{"status":{}}` or
/// `{"get_data":{"name":"mail","password":"pw"}}`. The HTTP transport does
/// not serialize `Command` directly; it maps each variant to a route and
/// query-parameter pairs carrying the same field values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Query device presence and firmware/architecture version.
    #[serde(rename = "status")]
    Status {},
    /// Enumerate stored data segments.
    #[serde(rename = "list")]
    List {},
    /// Retrieve one segment's contents by name.
    #[serde(rename = "get_data")]
    GetData(GetDataCommand),
}

impl Command {
    /// Wire name of the command (`status`, `list`, `get_data`).
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Command::Status {} => "status",
            Command::List {} => "list",
            Command::GetData(_) => "get_data",
        }
    }
}

/// Arguments for [`Command::GetData`].
///
/// `password` and `use_root_password` are omitted from the wire entirely
/// when unset. Encoding absence as an empty string would make the endpoint
/// believe a password was supplied, so both transports rely on the
/// `skip_serializing_if` semantics here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetDataCommand {
    /// Segment name. Non-empty by caller contract; an empty name is
    /// forwarded as-is and surfaces as a `data_not_found` device error.
    pub name: String,
    /// Segment password, required only for encrypted segments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Ask the endpoint to decode the segment password with the device's
    /// root password. Presence is preserved exactly as the caller set it;
    /// the endpoint applies its own default when the flag is absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_root_password: Option<bool>,
}

impl GetDataCommand {
    /// Plain request for a named segment.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            password: None,
            use_root_password: None,
        }
    }

    /// Attach a segment password.
    #[must_use]
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    /// Set the root-password flag explicitly.
    #[must_use]
    pub fn with_root_password(mut self, use_root_password: bool) -> Self {
        self.use_root_password = Some(use_root_password);
        self
    }
}

impl From<GetDataCommand> for Command {
    fn from(cmd: GetDataCommand) -> Self {
        Command::GetData(cmd)
    }
}
