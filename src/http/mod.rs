//! HTTPS server module.
//!
//! Terminates TLS with a certificate/key pair read from PEM files and serves
//! an Axum router. The server includes:
//! - Bound-address reporting once the listener is up
//! - Graceful shutdown on SIGTERM/SIGINT
//! - Certificate hot-reload via SIGHUP

mod server;
mod shutdown;

pub use server::{start_server, RunningServer, ServerError};
