//! Configuration loading and constants.
//!
//! All settings have defaults, so the configuration file is optional. When a
//! file is given it is parsed as TOML and only the keys it sets override the
//! defaults. `AppConfig` is the root configuration struct.

use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

use const_format::formatcp;
use serde::Deserialize;

// =============================================================================
// Responses
// =============================================================================

/// Body returned by the `hello` responder for every request
pub const HELLO_BODY: &str = "<h1>Hello, World!</h1>";

/// Content type of the `hello` responder, sent without a charset parameter
pub const HELLO_CONTENT_TYPE: &str = "text/html";

/// Static site index - short cache so a rebuilt page shows up quickly
pub const HTTP_CACHE_SITE_MAX_AGE: u32 = 300;

pub const CACHE_CONTROL_SITE: &str = formatcp!("public, max-age={}", HTTP_CACHE_SITE_MAX_AGE);

// =============================================================================
// TLS file names
// =============================================================================

/// Certificate chain file name prefix
pub const CERT_FILE_STEM: &str = "fullchain";

/// Private key file name prefix
pub const KEY_FILE_STEM: &str = "privkey";

/// Extension shared by certificate and key files
pub const PEM_EXTENSION: &str = "pem";

// =============================================================================
// Server lifecycle
// =============================================================================

/// Seconds to wait for open connections to finish after SIGINT/SIGTERM
pub const SHUTDOWN_GRACE_SECS: u64 = 30;

// =============================================================================
// Defaults
// =============================================================================

pub const DEFAULT_HTTP_HOST: &str = "0.0.0.0";

pub const DEFAULT_HTTP_PORT: u16 = 3000;

pub const DEFAULT_CERT_DIR: &str = ".";

pub const DEFAULT_SITE_INDEX: &str = "site/index.html";

pub const DEFAULT_SSH_PROGRAM: &str = "ssh";

/// Public relay that accepts anonymous reverse tunnels
pub const DEFAULT_RELAY_HOST: &str = "localhost.run";

/// Port the relay exposes publicly
pub const DEFAULT_REMOTE_PORT: u16 = 443;

/// Default log filter when neither --log-level nor RUST_LOG is set
pub const DEFAULT_LOG_FILTER: &str = "pemserve=info,tower_http=info";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpServerConfig,
    #[serde(default)]
    pub tls: TlsConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub tunnel: TunnelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTPS listener configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpServerConfig {
    #[serde(default = "HttpServerConfig::default_host")]
    pub host: String,
    /// Listen port, 0 picks an ephemeral one
    #[serde(default = "HttpServerConfig::default_port")]
    pub port: u16,
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

impl HttpServerConfig {
    fn default_host() -> String {
        DEFAULT_HTTP_HOST.to_string()
    }

    fn default_port() -> u16 {
        DEFAULT_HTTP_PORT
    }

    /// Address the listener binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|e| {
            ConfigError::Validation(format!("Invalid http.host '{}': {}", self.host, e))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TlsConfig {
    /// Directory holding the fullchain/privkey PEM files
    #[serde(default = "TlsConfig::default_cert_dir")]
    pub cert_dir: PathBuf,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_dir: Self::default_cert_dir(),
        }
    }
}

impl TlsConfig {
    fn default_cert_dir() -> PathBuf {
        PathBuf::from(DEFAULT_CERT_DIR)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Pre-built HTML page served at `/`
    #[serde(default = "SiteConfig::default_index_path")]
    pub index_path: PathBuf,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            index_path: Self::default_index_path(),
        }
    }
}

impl SiteConfig {
    fn default_index_path() -> PathBuf {
        PathBuf::from(DEFAULT_SITE_INDEX)
    }
}

/// SSH reverse tunnel settings
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TunnelConfig {
    #[serde(default = "TunnelConfig::default_ssh_program")]
    pub ssh_program: String,
    /// Extra arguments placed before `-R`
    #[serde(default)]
    pub ssh_args: Vec<String>,
    #[serde(default = "TunnelConfig::default_relay_host")]
    pub relay_host: String,
    #[serde(default = "TunnelConfig::default_remote_port")]
    pub remote_port: u16,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            ssh_program: Self::default_ssh_program(),
            ssh_args: Vec::new(),
            relay_host: Self::default_relay_host(),
            remote_port: Self::default_remote_port(),
        }
    }
}

impl TunnelConfig {
    fn default_ssh_program() -> String {
        DEFAULT_SSH_PROGRAM.to_string()
    }

    fn default_relay_host() -> String {
        DEFAULT_RELAY_HOST.to_string()
    }

    fn default_remote_port() -> u16 {
        DEFAULT_REMOTE_PORT
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,
}

impl AppConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Load from `path` if given, otherwise fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(contents)?;

        // Fail on a bad listen address now rather than at bind time
        config.http.socket_addr()?;

        if config.tunnel.ssh_program.trim().is_empty() {
            return Err(ConfigError::Validation(
                "tunnel.ssh_program must not be empty".to_string(),
            ));
        }

        Ok(config)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
}
