//! # SSH Sessions
//!
//! [`SessionConnector`] implementation for Cisco IOS switches over SSH.
//!
//! IOS exposes an interactive shell rather than an exec channel, so commands
//! are written to a PTY and the output is read until the prompt comes back.
//! Paging is disabled right after login so long tables never stop at
//! `--More--`.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mactrace_common::config::Config;
use mactrace_common::credentials::Credentials;
use mactrace_common::network::device::DeviceRef;
use mactrace_protocols::prompt;
use russh::client::{self, Handle, Msg};
use russh::keys::ssh_key::PublicKey;
use russh::{Channel, ChannelMsg, Disconnect};
use tokio::time;
use tracing::debug;

use crate::error::SessionError;
use crate::session::{DeviceSession, SessionConnector};

const TERMINAL_TYPE: &str = "vt100";
const TERMINAL_COLUMNS: u32 = 200;
const TERMINAL_ROWS: u32 = 24;

/// Accepts any host key, like an operator answering "yes" on first connect.
struct AcceptAnyHostKey;

impl client::Handler for AcceptAnyHostKey {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        debug!(algorithm = %server_public_key.algorithm(), "accepting host key");
        Ok(true)
    }
}

pub struct SshConnector {
    credentials: Credentials,
    port: u16,
    connect_timeout: Duration,
    command_timeout: Duration,
}

impl SshConnector {
    pub fn new(credentials: Credentials, cfg: &Config) -> Self {
        Self {
            credentials,
            port: cfg.port,
            connect_timeout: cfg.connect_timeout,
            command_timeout: cfg.command_timeout,
        }
    }

    /// Connects and authenticates, both within `connect_timeout`.
    async fn connect(&self, host: &str) -> Result<Handle<AcceptAnyHostKey>, SessionError> {
        time::timeout(self.connect_timeout, self.login(host))
            .await
            .map_err(|_| SessionError::Timeout {
                host: host.to_string(),
                command: String::from("login"),
            })?
    }

    async fn login(&self, host: &str) -> Result<Handle<AcceptAnyHostKey>, SessionError> {
        let config = Arc::new(client::Config {
            inactivity_timeout: Some(self.command_timeout * 6),
            ..Default::default()
        });

        let mut handle = client::connect(config, (host, self.port), AcceptAnyHostKey)
            .await
            .map_err(|e| SessionError::Connect {
                host: host.to_string(),
                reason: e.to_string(),
            })?;

        let auth = handle
            .authenticate_password(
                self.credentials.username.clone(),
                self.credentials.password.clone(),
            )
            .await
            .map_err(|e| SessionError::Connect {
                host: host.to_string(),
                reason: e.to_string(),
            })?;

        if !auth.success() {
            return Err(SessionError::Authentication {
                host: host.to_string(),
            });
        }

        Ok(handle)
    }
}

async fn open_shell(
    handle: &Handle<AcceptAnyHostKey>,
    host: &str,
) -> Result<Channel<Msg>, SessionError> {
    let channel_err = |e: russh::Error| SessionError::Channel {
        host: host.to_string(),
        reason: e.to_string(),
    };
    let channel: Channel<Msg> = handle.channel_open_session().await.map_err(channel_err)?;
    channel
        .request_pty(false, TERMINAL_TYPE, TERMINAL_COLUMNS, TERMINAL_ROWS, 0, 0, &[])
        .await
        .map_err(channel_err)?;
    channel.request_shell(false).await.map_err(channel_err)?;
    Ok(channel)
}

async fn disconnect(handle: &Handle<AcceptAnyHostKey>) -> Result<(), russh::Error> {
    handle
        .disconnect(Disconnect::ByApplication, "", "English")
        .await
}

#[async_trait]
impl SessionConnector for SshConnector {
    async fn open(&self, device: &DeviceRef) -> Result<Box<dyn DeviceSession>, SessionError> {
        let host: &str = &device.host;
        let handle = self.connect(host).await?;

        let channel: Channel<Msg> = match open_shell(&handle, host).await {
            Ok(channel) => channel,
            Err(e) => {
                if let Err(close_err) = disconnect(&handle).await {
                    debug!(host, "disconnect after failed shell request: {close_err}");
                }
                return Err(e);
            }
        };

        let mut session = SshSession {
            host: host.to_string(),
            handle,
            channel,
            prompt: String::new(),
            enable_secret: self.credentials.enable_secret.clone(),
            command_timeout: self.command_timeout,
        };

        if let Err(e) = session.prepare().await {
            if let Err(close_err) = session.close().await {
                debug!(host, "disconnect after failed session setup: {close_err}");
            }
            return Err(e);
        }

        debug!(host, prompt = %session.prompt, "session ready");
        Ok(Box::new(session))
    }
}

pub struct SshSession {
    host: String,
    handle: Handle<AcceptAnyHostKey>,
    channel: Channel<Msg>,
    prompt: String,
    enable_secret: Option<String>,
    command_timeout: Duration,
}

impl SshSession {
    /// Waits for the login prompt and turns paging off.
    async fn prepare(&mut self) -> Result<(), SessionError> {
        let banner: String = self.read_until_prompt("login").await?;
        self.update_prompt(&banner);
        self.run(prompt::DISABLE_PAGING).await?;
        Ok(())
    }

    async fn send_line(&mut self, line: &str) -> Result<(), SessionError> {
        let bytes: Vec<u8> = format!("{line}\n").into_bytes();
        self.channel
            .data(&bytes[..])
            .await
            .map_err(|e| SessionError::Channel {
                host: self.host.clone(),
                reason: e.to_string(),
            })
    }

    async fn read_until_prompt(&mut self, command: &str) -> Result<String, SessionError> {
        self.read_until(|buffer| prompt::find_prompt(buffer).is_some(), command)
            .await
    }

    /// Collects shell output until `done` accepts the buffer.
    ///
    /// The timeout applies to each wait for data, not the whole command.
    async fn read_until(
        &mut self,
        done: impl Fn(&str) -> bool,
        command: &str,
    ) -> Result<String, SessionError> {
        let mut buffer = String::new();

        loop {
            let msg: Option<ChannelMsg> = time::timeout(self.command_timeout, self.channel.wait())
                .await
                .map_err(|_| SessionError::Timeout {
                    host: self.host.clone(),
                    command: command.to_string(),
                })?;

            match msg {
                Some(ChannelMsg::Data { ref data }) => {
                    buffer.push_str(&String::from_utf8_lossy(&data[..]));
                    if done(&buffer) {
                        return Ok(buffer);
                    }
                }
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    return Err(SessionError::Closed {
                        host: self.host.clone(),
                    });
                }
                Some(_) => {}
            }
        }
    }

    fn update_prompt(&mut self, buffer: &str) {
        if let Some(found) = prompt::find_prompt(buffer) {
            self.prompt = found.to_string();
        }
    }

    fn escalation_error(&self, reason: &str) -> SessionError {
        SessionError::PrivilegeEscalation {
            host: self.host.clone(),
            reason: reason.to_string(),
        }
    }
}

#[async_trait]
impl DeviceSession for SshSession {
    fn host(&self) -> &str {
        &self.host
    }

    fn prompt(&self) -> &str {
        &self.prompt
    }

    async fn run(&mut self, command: &str) -> Result<String, SessionError> {
        self.send_line(command).await?;
        let raw: String = self.read_until_prompt(command).await?;
        self.update_prompt(&raw);
        Ok(prompt::clean_output(&raw, command))
    }

    async fn escalate_privilege(&mut self) -> Result<(), SessionError> {
        self.send_line(prompt::ENABLE).await?;
        let reply: String = self
            .read_until(
                |buffer| prompt::is_password_prompt(buffer) || prompt::find_prompt(buffer).is_some(),
                prompt::ENABLE,
            )
            .await?;

        let reply: String = if prompt::is_password_prompt(&reply) {
            let Some(secret) = self.enable_secret.clone() else {
                return Err(self.escalation_error("no enable secret configured"));
            };
            self.send_line(&secret).await?;
            // A wrong secret is answered with another password prompt.
            let answer: String = self
                .read_until(
                    |buffer| {
                        prompt::is_password_prompt(buffer) || prompt::find_prompt(buffer).is_some()
                    },
                    prompt::ENABLE,
                )
                .await?;
            if prompt::is_password_prompt(&answer) {
                return Err(self.escalation_error("enable secret rejected"));
            }
            answer
        } else {
            reply
        };
        self.update_prompt(&reply);

        if prompt::is_unprivileged(&self.prompt) {
            return Err(self.escalation_error("enable secret rejected"));
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        // The channel may already be gone if the device hung up first.
        let _ = self.channel.eof().await;
        disconnect(&self.handle).await.map_err(|e| SessionError::Channel {
                host: self.host.clone(),
                reason: e.to_string(),
            })
    }
}
