//! SSH reverse tunnel to a public relay.
//!
//! Publishes the local HTTPS listener by running the system `ssh` client with a
//! `-R` forward. The relay accepts connections on its public port and sends
//! them back through the SSH session to the local listener.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::process::ExitStatus;

use tokio::process::Command;

use crate::config::TunnelConfig;

#[derive(Debug, thiserror::Error)]
pub enum TunnelError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("SSH tunnel exited with {0}")]
    Exit(ExitStatus),
}

/// A `-R` forward specification: `<domain>:<remote_port>:<local host>:<local port>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseForward {
    pub domain: String,
    pub remote_port: u16,
    pub local: SocketAddr,
}

impl ReverseForward {
    pub fn new(domain: impl Into<String>, remote_port: u16, local: SocketAddr) -> Self {
        Self {
            domain: domain.into(),
            remote_port,
            local,
        }
    }
}

impl fmt::Display for ReverseForward {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:", self.domain, self.remote_port)?;
        // ssh wants IPv6 forward targets in brackets
        match self.local.ip() {
            IpAddr::V4(ip) => write!(f, "{}", ip)?,
            IpAddr::V6(ip) => write!(f, "[{}]", ip)?,
        }
        write!(f, ":{}", self.local.port())
    }
}

/// Build the ssh invocation for `forward`.
///
/// The child is killed if the handle is dropped, so ssh never outlives the
/// listener it forwards to.
pub fn tunnel_command(config: &TunnelConfig, forward: &ReverseForward) -> Command {
    let mut command = Command::new(&config.ssh_program);
    command
        .kill_on_drop(true)
        .args(&config.ssh_args)
        .arg("-R")
        .arg(forward.to_string())
        .arg(&config.relay_host);
    command
}

/// Run ssh and wait for it to exit.
///
/// Stdio is inherited, so the relay's banner (including the public URL) is
/// shown to the operator. There is no timeout: a hung session blocks here.
pub async fn open_tunnel(
    config: &TunnelConfig,
    forward: &ReverseForward,
) -> Result<(), TunnelError> {
    if forward.local.ip().is_unspecified() {
        tracing::warn!(
            local = %forward.local,
            "Forwarding to an unspecified address; ssh will connect to it as-is"
        );
    }

    tracing::info!(
        program = %config.ssh_program,
        relay = %config.relay_host,
        forward = %forward,
        "Opening SSH reverse tunnel"
    );

    let status = tunnel_command(config, forward)
        .status()
        .await
        .map_err(|source| TunnelError::Spawn {
            program: config.ssh_program.clone(),
            source,
        })?;

    if !status.success() {
        return Err(TunnelError::Exit(status));
    }

    tracing::info!(relay = %config.relay_host, "SSH tunnel closed");
    Ok(())
}
