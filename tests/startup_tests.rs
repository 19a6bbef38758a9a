//! Startup failure tests.
//!
//! Every serve mode must fail before opening a socket when its inputs are
//! missing. These tests run against a temporary working directory with no
//! certificates in it, so nothing ever binds.
use std::io::Write;
use std::path::Path;

use pemserve::app::{run_hello, run_site, run_tunnel};
use pemserve::config::AppConfig;
use pemserve::http::{start_server, ServerError};
use pemserve::routes::create_hello_router;
use pemserve::tls::CertPaths;
use pemserve::AppError;

/// Config pointing at `dir` for certificates, listening on an ephemeral port
fn config_in(dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.http.host = "127.0.0.1".to_string();
    config.http.port = 0;
    config.tls.cert_dir = dir.to_path_buf();
    config.site.index_path = dir.join("index.html");
    config
}

fn write_index(dir: &Path) {
    let mut file = std::fs::File::create(dir.join("index.html")).unwrap();
    file.write_all(b"<!DOCTYPE html><title>site</title>").unwrap();
}

#[tokio::test]
async fn test_start_server_missing_certificates() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let certs = CertPaths::for_host(dir.path(), "example.com");

    let result = start_server(create_hello_router(), &config.http, &certs).await;
    assert!(matches!(result, Err(ServerError::TlsConfig(_))));
}

#[tokio::test]
async fn test_start_server_invalid_certificates() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let certs = CertPaths::default_in(dir.path());
    std::fs::write(&certs.cert, "not a certificate").unwrap();
    std::fs::write(&certs.key, "not a key").unwrap();

    let result = start_server(create_hello_router(), &config.http, &certs).await;
    assert!(matches!(result, Err(ServerError::TlsConfig(_))));
}

#[tokio::test]
async fn test_hello_without_certificates() {
    let dir = tempfile::tempdir().unwrap();
    let err = run_hello(&config_in(dir.path())).await.unwrap_err();
    assert!(matches!(err, AppError::Server(ServerError::TlsConfig(_))));
}

#[tokio::test]
async fn test_site_missing_page() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let err = run_site(&config, "example.com").await.unwrap_err();
    match err {
        AppError::MissingAsset(path) => assert_eq!(path, dir.path().join("index.html")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_site_error_names_host_certificate() {
    let dir = tempfile::tempdir().unwrap();
    write_index(dir.path());

    let err = run_site(&config_in(dir.path()), "example.com")
        .await
        .unwrap_err();
    let message = err.to_string();
    assert!(message.contains("fullchain-example.com.pem"), "{message}");
    assert!(message.contains("privkey-example.com.pem"), "{message}");
}

#[tokio::test]
async fn test_tunnel_never_runs_ssh_without_certificates() {
    let dir = tempfile::tempdir().unwrap();
    write_index(dir.path());
    let mut config = config_in(dir.path());
    // Would fail with TunnelError::Spawn if it were ever reached
    config.tunnel.ssh_program = "/nonexistent/pemserve-test-ssh".to_string();

    let err = run_tunnel(&config, "example.com").await.unwrap_err();
    assert!(matches!(err, AppError::Server(ServerError::TlsConfig(_))));
}
