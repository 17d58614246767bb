//! HTTP transport adapter for the companion server.

use async_trait::async_trait;
use serde_json::Value;
use svpi_protocol::{Command, GetDataCommand};
use tracing::debug;
use url::Url;

use super::traits::{Transport, TransportError};

/// Base URL of a locally-running companion server.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:3333";

const SERVER_URL_ENV: &str = "SVPI_SERVER_URL";

/// Transport adapter that reaches the device through the companion
/// server's HTTP API (`GET /status`, `GET /list`, `GET /get`).
///
/// One GET request per command, no retries. Connection reuse across calls
/// is whatever `reqwest` does naturally; it is not part of the contract.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Creates a transport against the given base URL.
    ///
    /// # Errors
    ///
    /// [`TransportError::Config`] if `base_url` is not a valid absolute
    /// URL; [`TransportError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url)
            .map_err(|err| TransportError::Config(format!("invalid base URL '{base_url}': {err}")))?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::Config(format!(
                "base URL '{base_url}' cannot carry a path"
            )));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("svpi-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Creates a transport from the `SVPI_SERVER_URL` environment
    /// variable, falling back to [`DEFAULT_SERVER_URL`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`HttpTransport::new`].
    pub fn from_env() -> Result<Self, TransportError> {
        let base_url =
            std::env::var(SERVER_URL_ENV).unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
        Self::new(&base_url)
    }

    /// Route for a command.
    fn route(command: &Command) -> &'static str {
        match command {
            Command::Status {} => "/status",
            Command::List {} => "/list",
            Command::GetData(_) => "/get",
        }
    }

    /// Query pairs for a `get_data` command. Absent options contribute no
    /// pair at all, so the endpoint never sees an empty `password`.
    fn query_pairs(cmd: &GetDataCommand) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("name", cmd.name.clone())];
        if let Some(password) = &cmd.password {
            pairs.push(("password", password.clone()));
        }
        if let Some(use_root) = cmd.use_root_password {
            pairs.push(("use_root_password", use_root.to_string()));
        }
        pairs
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, command: &Command) -> Result<Value, TransportError> {
        let mut url = self.base_url.clone();
        url.set_path(Self::route(command));

        let mut request = self.client.get(url.clone());
        if let Command::GetData(cmd) = command {
            request = request.query(&Self::query_pairs(cmd));
        }
        debug!(command = command.name(), url = %url, "dispatching HTTP request");

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_mapping() {
        assert_eq!(HttpTransport::route(&Command::Status {}), "/status");
        assert_eq!(HttpTransport::route(&Command::List {}), "/list");
        assert_eq!(
            HttpTransport::route(&Command::GetData(GetDataCommand::new("x"))),
            "/get"
        );
    }

    #[test]
    fn test_query_pairs_without_password() {
        let pairs = HttpTransport::query_pairs(&GetDataCommand::new("mail"));
        assert_eq!(pairs, vec![("name", "mail".to_string())]);
    }

    #[test]
    fn test_query_pairs_with_password() {
        let pairs = HttpTransport::query_pairs(&GetDataCommand::new("mail").with_password("pw"));
        assert_eq!(
            pairs,
            vec![
                ("name", "mail".to_string()),
                ("password", "pw".to_string())
            ]
        );
    }

    #[test]
    fn test_query_pairs_preserve_root_password_flag() {
        let pairs = HttpTransport::query_pairs(
            &GetDataCommand::new("mail")
                .with_password("pw")
                .with_root_password(false),
        );
        assert!(pairs.contains(&("use_root_password", "false".to_string())));
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        assert!(matches!(
            HttpTransport::new("not a url"),
            Err(TransportError::Config(_))
        ));
        assert!(matches!(
            HttpTransport::new("mailto:root@localhost"),
            Err(TransportError::Config(_))
        ));
    }

    #[test]
    fn test_new_accepts_default_url() {
        assert!(HttpTransport::new(DEFAULT_SERVER_URL).is_ok());
    }
}
