//! Environment-driven gateway configuration.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address; `MARKET_ADDR`, default `0.0.0.0:8080`.
    pub bind_addr: SocketAddr,
    /// HS256 secret shared with the identity service; `MARKET_AUTH_SECRET`.
    pub auth_secret: String,
    /// Journal directory; `MARKET_JOURNAL_DIR`. Unset = in-memory engine.
    pub journal_dir: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let bind_addr = match env::var("MARKET_ADDR") {
            Ok(raw) => raw.parse()?,
            Err(_) => SocketAddr::from(([0, 0, 0, 0], 8080)),
        };
        let auth_secret =
            env::var("MARKET_AUTH_SECRET").unwrap_or_else(|_| "dev-only-secret".to_string());
        let journal_dir = env::var("MARKET_JOURNAL_DIR").ok().map(PathBuf::from);
        Ok(Self {
            bind_addr,
            auth_secret,
            journal_dir,
        })
    }
}
