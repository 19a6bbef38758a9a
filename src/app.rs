//! The three serve modes.
//!
//! Each mode builds its router, derives the certificate paths, binds the
//! HTTPS listener and then serves until the process is stopped. Every failure
//! is returned to the caller unchanged; nothing is retried.

use crate::config::AppConfig;
use crate::error::AppError;
use crate::http::start_server;
use crate::routes::{create_hello_router, create_site_router};
use crate::tls::CertPaths;
use crate::tunnel::{open_tunnel, ReverseForward};

/// Answer every request with the fixed page, using `fullchain.pem`/`privkey.pem`.
pub async fn run_hello(config: &AppConfig) -> Result<(), AppError> {
    let certs = CertPaths::default_in(&config.tls.cert_dir);
    let mut server = start_server(create_hello_router(), &config.http, &certs).await?;
    server.wait().await?;
    Ok(())
}

/// Serve the static page for `hostname` with its per-host certificate.
pub async fn run_site(config: &AppConfig, hostname: &str) -> Result<(), AppError> {
    check_site_asset(config)?;

    let certs = CertPaths::for_host(&config.tls.cert_dir, hostname);
    let app = create_site_router(&config.site.index_path);
    let mut server = start_server(app, &config.http, &certs).await?;

    tracing::info!(%hostname, addr = %server.local_addr(), "Serving static site");
    server.wait().await?;
    Ok(())
}

/// Serve the static page for `domain` and publish it through the SSH relay.
///
/// The tunnel is opened only after the listener is bound. If ssh exits
/// cleanly the server keeps running; if it fails the error is returned. If
/// the server stops first (SIGINT/SIGTERM), ssh is killed and this returns.
pub async fn run_tunnel(config: &AppConfig, domain: &str) -> Result<(), AppError> {
    check_site_asset(config)?;

    let certs = CertPaths::for_host(&config.tls.cert_dir, domain);
    let app = create_site_router(&config.site.index_path);
    let mut server = start_server(app, &config.http, &certs).await?;

    let forward = ReverseForward::new(domain, config.tunnel.remote_port, server.local_addr());

    tokio::select! {
        tunnel = open_tunnel(&config.tunnel, &forward) => tunnel?,
        served = server.wait() => {
            // Dropping the tunnel future kills ssh
            served?;
            tracing::info!(%domain, "Server stopped, closing SSH tunnel");
            return Ok(());
        }
    }

    server.wait().await?;
    Ok(())
}

/// The page is part of the deployment, so a missing one is a startup error.
fn check_site_asset(config: &AppConfig) -> Result<(), AppError> {
    if config.site.index_path.is_file() {
        Ok(())
    } else {
        Err(AppError::MissingAsset(config.site.index_path.clone()))
    }
}
