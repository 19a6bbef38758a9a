//! HTTPS listener startup.
//!
//! Loads the certificate pair, binds the listener in a background task and
//! hands back a [`RunningServer`] once the socket is actually bound, so callers
//! can use the real address (important when port 0 is configured).

use std::net::SocketAddr;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;
use tokio::task::JoinHandle;

use crate::config::HttpServerConfig;
use crate::tls::CertPaths;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Failed to load TLS configuration: {0}")]
    TlsConfig(String),

    /// I/O failure after the listener was bound
    #[error("Server I/O error: {0}")]
    Io(#[source] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// A bound HTTPS listener serving in the background.
pub struct RunningServer {
    local_addr: SocketAddr,
    task: JoinHandle<std::io::Result<()>>,
}

impl RunningServer {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Block until the server stops.
    ///
    /// Cancel-safe: dropping the future leaves the server running, so this can
    /// sit in a `select!` next to other work.
    pub async fn wait(&mut self) -> Result<(), ServerError> {
        join_server(&mut self.task).await?.map_err(ServerError::Io)
    }
}

/// Load TLS credentials and start serving `app` over HTTPS.
///
/// Returns once the listener is bound. Certificate problems are reported
/// before any socket is opened.
pub async fn start_server(
    app: Router,
    http: &HttpServerConfig,
    certs: &CertPaths,
) -> Result<RunningServer, ServerError> {
    let addr = http
        .socket_addr()
        .map_err(|e| ServerError::Server(e.to_string()))?;

    tracing::info!(
        %addr,
        cert = %certs.cert.display(),
        key = %certs.key.display(),
        "Starting HTTPS server"
    );

    let rustls_config = RustlsConfig::from_pem_file(&certs.cert, &certs.key)
        .await
        .map_err(|e| {
            ServerError::TlsConfig(format!(
                "Failed to load certificates from '{}' and '{}': {}",
                certs.cert.display(),
                certs.key.display(),
                e
            ))
        })?;

    let handle = Handle::new();

    shutdown::setup_shutdown_handler(handle.clone());
    shutdown::setup_reload_handler(rustls_config.clone(), certs.clone());

    let server = axum_server::bind_rustls(addr, rustls_config).handle(handle.clone());
    let mut task = tokio::spawn(async move { server.serve(app.into_make_service()).await });

    // `listening` resolves to None when the server exits before binding
    let local_addr = match handle.listening().await {
        Some(local_addr) => local_addr,
        None => {
            return Err(match join_server(&mut task).await? {
                Ok(()) => ServerError::Server("Server stopped before listening".to_string()),
                Err(e) => ServerError::Bind(e),
            });
        }
    };

    tracing::info!(%local_addr, "HTTPS server listening");

    Ok(RunningServer {
        local_addr,
        task,
    })
}

async fn join_server(
    task: &mut JoinHandle<std::io::Result<()>>,
) -> Result<std::io::Result<()>, ServerError> {
    task.await.map_err(|e| ServerError::Server(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(task: JoinHandle<std::io::Result<()>>) -> RunningServer {
        RunningServer {
            local_addr: "127.0.0.1:8443".parse().unwrap(),
            task,
        }
    }

    #[tokio::test]
    async fn test_wait_keeps_io_error() {
        let mut server = running(tokio::spawn(async {
            Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "listener failed",
            ))
        }));

        match server.wait().await {
            Err(ServerError::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::ConnectionReset),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_wait_clean_stop() {
        let mut server = running(tokio::spawn(async { Ok(()) }));
        server.wait().await.unwrap();
    }

    #[tokio::test]
    async fn test_wait_is_cancel_safe() {
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let mut server = running(tokio::spawn(async move {
            let _ = rx.await;
            Ok(())
        }));

        // Dropping an unfinished wait must not lose the task
        let pending =
            tokio::time::timeout(std::time::Duration::from_millis(20), server.wait()).await;
        assert!(pending.is_err());

        tx.send(()).unwrap();
        server.wait().await.unwrap();
    }
}
