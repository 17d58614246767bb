//! Native-messaging transport adapter.
//!
//! Stands in for the browser side of a native-messaging channel: the host
//! application registered for a host id is spawned, one request frame is
//! written to its stdin, and exactly one reply frame is read from its
//! stdout. Frames are a little-endian `u32` byte length followed by UTF-8
//! JSON, the framing every Chromium-family browser uses on this channel.
//!
//! There is deliberately no timeout here: if the host accepts the request
//! and never replies, the call stays pending. That limitation is inherited
//! from the platform channel this adapter emulates, and compensating for
//! it would change the contract callers rely on.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use svpi_protocol::Command;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command as ProcessCommand};
use tracing::debug;

use super::traits::{Transport, TransportError};

/// Host application id of the SVPI native-messaging host.
pub const DEFAULT_NATIVE_HOST: &str = "com.binqbit.svpi_chrome_app";

const NATIVE_HOST_ENV: &str = "SVPI_NATIVE_HOST";

/// Largest reply frame the channel accepts, matching the browser-side cap.
/// Also bounds the allocation a corrupt length prefix could request.
const REPLY_LIMIT: u32 = 1024 * 1024;

/// Host manifest as registered in the browser's native-messaging-host
/// directories. Only the fields this adapter needs.
#[derive(Debug, Deserialize)]
struct HostManifest {
    path: PathBuf,
}

/// Transport adapter that reaches the device through the registered
/// native-messaging host.
///
/// Each `send` is one-shot: spawn the host, exchange one frame pair, tear
/// the process down. That mirrors `chrome.runtime.sendNativeMessage`
/// semantics and keeps calls fully independent.
#[derive(Debug, Clone)]
pub struct NativeBridgeTransport {
    host: String,
    program: PathBuf,
}

impl NativeBridgeTransport {
    /// Creates a transport for `host`, locating its program through the
    /// platform's native-messaging-host manifests.
    ///
    /// # Errors
    ///
    /// [`TransportError::HostNotInstalled`] if no manifest for `host`
    /// exists; [`TransportError::Config`] if a manifest exists but cannot
    /// be read or parsed.
    pub fn new(host: impl Into<String>) -> Result<Self, TransportError> {
        let host = host.into();
        let dirs = manifest_dirs();
        Self::with_manifest_dirs(host, &dirs)
    }

    /// Creates a transport from the `SVPI_NATIVE_HOST` environment
    /// variable, falling back to [`DEFAULT_NATIVE_HOST`].
    ///
    /// # Errors
    ///
    /// Same conditions as [`NativeBridgeTransport::new`].
    pub fn from_env() -> Result<Self, TransportError> {
        let host =
            std::env::var(NATIVE_HOST_ENV).unwrap_or_else(|_| DEFAULT_NATIVE_HOST.to_string());
        Self::new(host)
    }

    /// Creates a transport for `host`, searching only the given manifest
    /// directories. Used for fixed deployments and tests.
    ///
    /// # Errors
    ///
    /// Same conditions as [`NativeBridgeTransport::new`].
    pub fn with_manifest_dirs(
        host: impl Into<String>,
        dirs: &[PathBuf],
    ) -> Result<Self, TransportError> {
        let host = host.into();
        let program = resolve_program(&host, dirs)?;
        Ok(Self { host, program })
    }

    /// Creates a transport that spawns `program` directly, bypassing
    /// manifest resolution.
    pub fn with_program(host: impl Into<String>, program: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            program: program.into(),
        }
    }

    /// The host application id this transport talks to.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// The host program this transport spawns.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    fn spawn_host(&self) -> Result<Child, TransportError> {
        ProcessCommand::new(&self.program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| match err.kind() {
                std::io::ErrorKind::NotFound => TransportError::HostNotInstalled {
                    host: self.host.clone(),
                },
                _ => TransportError::Io(err),
            })
    }
}

#[async_trait]
impl Transport for NativeBridgeTransport {
    async fn send(&self, command: &Command) -> Result<Value, TransportError> {
        debug!(
            command = command.name(),
            host = %self.host,
            program = %self.program.display(),
            "dispatching native-messaging request"
        );

        let mut child = self.spawn_host()?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or(TransportError::ChannelClosed)?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or(TransportError::ChannelClosed)?;

        let frame = encode_frame(command)?;
        stdin.write_all(&frame).await?;
        stdin.flush().await?;
        // Closing stdin tells one-shot hosts the request is complete.
        drop(stdin);

        let reply = read_frame(&mut stdout).await;

        // The browser tears the channel down after one reply; do the same
        // so a lingering host cannot outlive the call.
        let _ = child.kill().await;

        reply
    }

    fn name(&self) -> &'static str {
        "native-bridge"
    }
}

/// Encodes one value as a native-messaging frame.
fn encode_frame<T: serde::Serialize>(value: &T) -> Result<Vec<u8>, TransportError> {
    let body = serde_json::to_vec(value)?;
    let len = u32::try_from(body.len()).map_err(|_| {
        TransportError::Config("request frame exceeds the u32 framing limit".to_string())
    })?;
    let mut frame = Vec::with_capacity(4 + body.len());
    frame.extend_from_slice(&len.to_le_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

/// Reads exactly one frame and parses its JSON body.
async fn read_frame<R: AsyncRead + Unpin>(reader: &mut R) -> Result<Value, TransportError> {
    let mut len_buf = [0u8; 4];
    read_exact_or_closed(reader, &mut len_buf).await?;

    let len = u32::from_le_bytes(len_buf);
    if len > REPLY_LIMIT {
        return Err(TransportError::ReplyTooLarge {
            size: len,
            limit: REPLY_LIMIT,
        });
    }

    let mut body = vec![0u8; len as usize];
    read_exact_or_closed(reader, &mut body).await?;

    Ok(serde_json::from_slice(&body)?)
}

async fn read_exact_or_closed<R: AsyncRead + Unpin>(
    reader: &mut R,
    buf: &mut [u8],
) -> Result<(), TransportError> {
    reader.read_exact(buf).await.map_err(|err| {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            TransportError::ChannelClosed
        } else {
            TransportError::Io(err)
        }
    })?;
    Ok(())
}

/// Finds the program a host id is registered to, scanning `dirs` in order.
fn resolve_program(host: &str, dirs: &[PathBuf]) -> Result<PathBuf, TransportError> {
    for dir in dirs {
        let manifest_path = dir.join(format!("{host}.json"));
        if !manifest_path.is_file() {
            continue;
        }
        let raw = std::fs::read_to_string(&manifest_path).map_err(|err| {
            TransportError::Config(format!(
                "manifest {} is unreadable: {err}",
                manifest_path.display()
            ))
        })?;
        let manifest: HostManifest = serde_json::from_str(&raw).map_err(|err| {
            TransportError::Config(format!(
                "manifest {} is invalid: {err}",
                manifest_path.display()
            ))
        })?;
        debug!(host, manifest = %manifest_path.display(), "resolved native host");
        return Ok(manifest.path);
    }
    Err(TransportError::HostNotInstalled { host: host.into() })
}

/// Native-messaging-host manifest directories of the Chrome/Chromium
/// family on this platform, user locations first.
fn manifest_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        if cfg!(target_os = "macos") {
            dirs.push(home.join("Library/Application Support/Google/Chrome/NativeMessagingHosts"));
            dirs.push(home.join("Library/Application Support/Chromium/NativeMessagingHosts"));
        } else {
            dirs.push(home.join(".config/google-chrome/NativeMessagingHosts"));
            dirs.push(home.join(".config/chromium/NativeMessagingHosts"));
        }
    }

    if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/Library/Google/Chrome/NativeMessagingHosts"));
        dirs.push(PathBuf::from(
            "/Library/Application Support/Chromium/NativeMessagingHosts",
        ));
    } else {
        dirs.push(PathBuf::from("/etc/opt/chrome/native-messaging-hosts"));
        dirs.push(PathBuf::from("/etc/chromium/native-messaging-hosts"));
    }

    dirs
}
