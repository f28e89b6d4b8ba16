//! # Device Sessions
//!
//! The search engine never talks SSH directly. It opens sessions through a
//! [`SessionConnector`] and issues commands through [`DeviceSession`], which
//! keeps the traversal logic testable against scripted devices.
//!
//! Sessions are always passed explicitly; there is no shared handle.

use async_trait::async_trait;
use mactrace_common::network::device::DeviceRef;
use mactrace_protocols::prompt;
use tracing::{debug, warn};

use crate::error::{SearchError, SessionError};

/// An authenticated command channel bound to one device.
#[async_trait]
pub trait DeviceSession: Send {
    /// Address or hostname the session is connected to.
    fn host(&self) -> &str;

    /// The prompt the device printed last (`SW1>` or `SW1#`).
    fn prompt(&self) -> &str;

    /// Sends one command and returns its output without echo or prompt.
    async fn run(&mut self, command: &str) -> Result<String, SessionError>;

    /// Moves from user EXEC to privileged EXEC mode.
    async fn escalate_privilege(&mut self) -> Result<(), SessionError>;

    async fn close(&mut self) -> Result<(), SessionError>;
}

/// Opens sessions. Owns whatever is needed to log in (credentials, ports).
#[async_trait]
pub trait SessionConnector: Send + Sync {
    async fn open(&self, device: &DeviceRef) -> Result<Box<dyn DeviceSession>, SessionError>;
}

/// Opens a session and enters privileged mode when the login lands in user mode.
///
/// The session is closed again if escalation fails.
pub async fn establish(
    connector: &dyn SessionConnector,
    device: &DeviceRef,
) -> Result<Box<dyn DeviceSession>, SessionError> {
    let mut session: Box<dyn DeviceSession> = connector.open(device).await?;

    if prompt::is_unprivileged(session.prompt()) {
        debug!(host = %device.host, prompt = session.prompt(), "escalating privilege");
        if let Err(e) = session.escalate_privilege().await {
            if let Err(close_err) = session.close().await {
                warn!("Failed to close session to {}: {close_err}", device.host);
            }
            return Err(e);
        }
    }

    Ok(session)
}

/// Runs a command, attributing failures to the session's device.
pub(crate) async fn run_command(
    session: &mut dyn DeviceSession,
    command: &str,
) -> Result<String, SearchError> {
    let host: String = session.host().to_string();
    debug!(%host, command, "running command");
    let output: String = session
        .run(command)
        .await
        .map_err(|source| SearchError::Command {
            device: host.clone(),
            source,
        })?;
    debug!(%host, %output, "command output");
    Ok(output)
}
