//! pemserve: HTTPS from local PEM files.
//!
//! This is the application entry point. It parses the command line, loads the
//! optional configuration file, initializes tracing and runs the selected
//! serve mode until it fails or the process is stopped.

use clap::{builder::NonEmptyStringValueParser, Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pemserve::app::{run_hello, run_site, run_tunnel};
use pemserve::config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER};

/// pemserve: serve a page over HTTPS from local PEM files
#[derive(Parser, Debug)]
#[command(name = "pemserve", version, about)]
struct Args {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<String>,

    /// Log level filter (e.g., "pemserve=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Answer every request with a fixed HTML page (uses fullchain.pem/privkey.pem)
    Hello,

    /// Serve the static site for HOSTNAME (uses fullchain-HOSTNAME.pem/privkey-HOSTNAME.pem)
    Site {
        /// Hostname the certificate was issued for
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        hostname: String,
    },

    /// Serve the static site for DOMAIN and publish it through an SSH reverse tunnel
    Tunnel {
        /// Public domain name forwarded by the relay
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        domain: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments; a missing hostname exits here
    let args = Args::parse();

    let config = AppConfig::load_or_default(args.config.as_deref())?;

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let registry =
        tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&log_filter));

    match config.logging.format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
    }

    tracing::info!(
        config = args.config.as_deref().unwrap_or("<defaults>"),
        host = %config.http.host,
        port = config.http.port,
        cert_dir = %config.tls.cert_dir.display(),
        "Loaded configuration"
    );

    match args.command {
        Command::Hello => run_hello(&config).await?,
        Command::Site { hostname } => run_site(&config, &hostname).await?,
        Command::Tunnel { domain } => run_tunnel(&config, &domain).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_hello_takes_no_argument() {
        let args = Args::try_parse_from(["pemserve", "hello"]).unwrap();
        assert_eq!(args.command, Command::Hello);
        assert!(Args::try_parse_from(["pemserve", "hello", "extra"]).is_err());
    }

    #[test]
    fn test_site_requires_hostname() {
        let err = Args::try_parse_from(["pemserve", "site"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_tunnel_requires_domain() {
        let err = Args::try_parse_from(["pemserve", "tunnel"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn test_empty_hostname_rejected() {
        assert!(Args::try_parse_from(["pemserve", "site", ""]).is_err());
    }

    #[test]
    fn test_site_hostname_and_options() {
        let args = Args::try_parse_from([
            "pemserve",
            "--config",
            "dist/pemserve.toml",
            "-l",
            "pemserve=debug",
            "site",
            "example.com",
        ])
        .unwrap();
        assert_eq!(args.config.as_deref(), Some("dist/pemserve.toml"));
        assert_eq!(args.log_level.as_deref(), Some("pemserve=debug"));
        assert_eq!(
            args.command,
            Command::Site {
                hostname: "example.com".to_string()
            }
        );
    }

    #[test]
    fn test_command_required() {
        assert!(Args::try_parse_from(["pemserve"]).is_err());
    }
}
