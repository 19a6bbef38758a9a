use std::path::PathBuf;

use crate::config::ConfigError;
use crate::http::ServerError;
use crate::tunnel::TunnelError;

/// Anything that stops a serve mode. All of these end the process.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Server(#[from] ServerError),

    #[error(transparent)]
    Tunnel(#[from] TunnelError),

    #[error("Static site page not found: {}", .0.display())]
    MissingAsset(PathBuf),
}
