//! Typed command client over any transport.

use svpi_protocol::{normalize, CanonicalResult, Command, GetDataCommand};
use tracing::{debug, instrument, warn};

use crate::error::ClientError;
use crate::transport::{HttpTransport, NativeBridgeTransport, Transport, TransportError};

/// Client for the three logical SVPI operations.
///
/// The transport is fixed at construction; every operation builds one
/// [`Command`], hands it to the transport, and normalizes the raw reply.
/// The client keeps no state across calls, so one instance can serve
/// overlapping calls without coordination.
#[derive(Debug, Clone)]
pub struct VaultClient<T: Transport> {
    transport: T,
}

impl VaultClient<HttpTransport> {
    /// Client over the companion server's HTTP API.
    ///
    /// # Errors
    ///
    /// [`TransportError`] if the base URL is invalid or the HTTP client
    /// cannot be built.
    pub fn over_http(base_url: &str) -> Result<Self, TransportError> {
        Ok(Self::new(HttpTransport::new(base_url)?))
    }
}

impl VaultClient<NativeBridgeTransport> {
    /// Client over the registered native-messaging host.
    ///
    /// # Errors
    ///
    /// [`TransportError`] if no host manifest is registered for `host`.
    pub fn over_native_bridge(host: impl Into<String>) -> Result<Self, TransportError> {
        Ok(Self::new(NativeBridgeTransport::new(host)?))
    }
}

impl<T: Transport> VaultClient<T> {
    /// Wraps an already-constructed transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Queries device presence and version information.
    ///
    /// # Errors
    ///
    /// [`ClientError`] on transport failure or an unrecognizable reply.
    /// Device-level failures are part of the returned result, not errors.
    #[instrument(skip(self), fields(transport = self.transport.name()))]
    pub async fn status(&self) -> Result<CanonicalResult, ClientError> {
        self.dispatch(&Command::Status {}).await
    }

    /// Enumerates stored data segments.
    ///
    /// # Errors
    ///
    /// Same conditions as [`VaultClient::status`].
    #[instrument(skip(self), fields(transport = self.transport.name()))]
    pub async fn list(&self) -> Result<CanonicalResult, ClientError> {
        self.dispatch(&Command::List {}).await
    }

    /// Retrieves one segment's contents, with a password for encrypted
    /// segments.
    ///
    /// A non-empty `name` is the caller's contract; an empty name is
    /// forwarded and comes back as a `data_not_found` device error.
    ///
    /// # Errors
    ///
    /// Same conditions as [`VaultClient::status`].
    #[instrument(skip(self, password), fields(transport = self.transport.name()))]
    pub async fn get_data(
        &self,
        name: &str,
        password: Option<&str>,
    ) -> Result<CanonicalResult, ClientError> {
        let mut cmd = GetDataCommand::new(name);
        cmd.password = password.map(str::to_string);
        self.dispatch(&Command::GetData(cmd)).await
    }

    /// Retrieves a segment with full control over the request, including
    /// the `use_root_password` flag.
    ///
    /// # Errors
    ///
    /// Same conditions as [`VaultClient::status`].
    #[instrument(skip(self, cmd), fields(transport = self.transport.name()))]
    pub async fn get_data_with(&self, cmd: GetDataCommand) -> Result<CanonicalResult, ClientError> {
        self.dispatch(&Command::GetData(cmd)).await
    }

    async fn dispatch(&self, command: &Command) -> Result<CanonicalResult, ClientError> {
        let raw = self.transport.send(command).await?;
        let result = normalize(&raw)?;
        match result.fault() {
            Some(fault) => warn!(command = command.name(), code = %fault.code, "device error"),
            None => debug!(command = command.name(), "command completed"),
        }
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;
    use svpi_protocol::{EnvelopeError, Outcome};

    /// Test transport with a canned reply; records every command it sees.
    struct ScriptedTransport {
        reply: Result<Value, &'static str>,
        sent: Mutex<Vec<Value>>,
    }

    impl ScriptedTransport {
        fn replying(reply: Value) -> Self {
            Self {
                reply: Ok(reply),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn failing(message: &'static str) -> Self {
            Self {
                reply: Err(message),
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<Value> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for &ScriptedTransport {
        async fn send(&self, command: &Command) -> Result<Value, TransportError> {
            self.sent
                .lock()
                .unwrap()
                .push(serde_json::to_value(command).unwrap());
            match &self.reply {
                Ok(value) => Ok(value.clone()),
                Err(message) => Err(TransportError::Config((*message).to_string())),
            }
        }

        fn name(&self) -> &'static str {
            "scripted"
        }
    }

    #[tokio::test]
    async fn test_status_sends_status_command() {
        let transport = ScriptedTransport::replying(json!({"status": "ok", "version": "5.2.1"}));
        let client = VaultClient::new(&transport);
        let result = client.status().await.unwrap();
        assert!(result.is_ok());
        assert_eq!(transport.sent(), vec![json!({"status": {}})]);
    }

    #[tokio::test]
    async fn test_get_data_without_password_sends_no_password_field() {
        let transport = ScriptedTransport::replying(json!({"ok": true, "result": {}}));
        let client = VaultClient::new(&transport);
        client.get_data("n", None).await.unwrap();
        assert_eq!(transport.sent(), vec![json!({"get_data": {"name": "n"}})]);
    }

    #[tokio::test]
    async fn test_get_data_with_preserves_root_password_flag() {
        let transport = ScriptedTransport::replying(json!({"ok": true, "result": {}}));
        let client = VaultClient::new(&transport);
        client
            .get_data_with(
                GetDataCommand::new("n")
                    .with_password("pw")
                    .with_root_password(true),
            )
            .await
            .unwrap();
        assert_eq!(
            transport.sent(),
            vec![json!({"get_data": {"name": "n", "password": "pw", "use_root_password": true}})]
        );
    }

    #[tokio::test]
    async fn test_device_error_is_a_value_not_an_err() {
        let transport = ScriptedTransport::replying(json!({"status": "password_error"}));
        let client = VaultClient::new(&transport);
        let result = client.get_data("n", Some("wrong")).await.unwrap();
        match result.outcome {
            Outcome::DeviceError(fault) => assert_eq!(fault.code, "password_error"),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_transport_failure_skips_normalization() {
        let transport = ScriptedTransport::failing("host not found");
        let client = VaultClient::new(&transport);
        let err = client.list().await.unwrap_err();
        match err {
            ClientError::Transport(inner) => {
                assert!(inner.to_string().contains("host not found"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_envelope_surfaces_distinctly() {
        let transport = ScriptedTransport::replying(json!({"foo": "bar"}));
        let client = VaultClient::new(&transport);
        let err = client.status().await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::UnknownEnvelope(EnvelopeError::UnknownShape)
        ));
    }
}
