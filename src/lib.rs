//! pemserve - HTTPS from local PEM files
//!
//! Starts an HTTPS server whose certificate and key are read from PEM files in
//! the working directory. Three modes are available: a fixed "hello" page, a
//! static site keyed to a hostname, and the same site published through an SSH
//! reverse tunnel.

pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod tls;
pub mod tunnel;

pub use error::AppError;
