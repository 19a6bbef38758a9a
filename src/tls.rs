//! Certificate and private key file locations.
//!
//! Credentials are plain PEM files produced by whatever issues the
//! certificates. Their names are either fixed (`fullchain.pem`/`privkey.pem`)
//! or carry the served hostname (`fullchain-<host>.pem`/`privkey-<host>.pem`).

use std::path::{Path, PathBuf};

use crate::config::{CERT_FILE_STEM, KEY_FILE_STEM, PEM_EXTENSION};

/// A certificate chain and its private key on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

impl CertPaths {
    /// `fullchain.pem` and `privkey.pem` inside `dir`.
    pub fn default_in(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            cert: dir.join(format!("{CERT_FILE_STEM}.{PEM_EXTENSION}")),
            key: dir.join(format!("{KEY_FILE_STEM}.{PEM_EXTENSION}")),
        }
    }

    /// `fullchain-<host>.pem` and `privkey-<host>.pem` inside `dir`.
    ///
    /// The host is inserted verbatim.
    pub fn for_host(dir: impl AsRef<Path>, host: &str) -> Self {
        let dir = dir.as_ref();
        Self {
            cert: dir.join(format!("{CERT_FILE_STEM}-{host}.{PEM_EXTENSION}")),
            key: dir.join(format!("{KEY_FILE_STEM}-{host}.{PEM_EXTENSION}")),
        }
    }
}
