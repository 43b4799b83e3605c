use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub data_dir: PathBuf,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Base64 or 32-byte ASCII; a random key is generated when unset.
    pub jwt_secret: Option<String>,
    pub session_ttl: Duration,
    /// Interest accrual period; `None` disables the scheduler.
    pub interest_interval: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            data_dir: PathBuf::from("./data"),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30_000),
            jwt_secret: None,
            session_ttl: Duration::from_secs(3600),
            interest_interval: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match std::env::var("CX_LISTEN_ADDR") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("Invalid CX_LISTEN_ADDR '{raw}'"))?,
            Err(_) => defaults.listen_addr,
        };
        let data_dir = std::env::var("CX_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let cors_allow = std::env::var("CX_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("CX_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);
        let jwt_secret = std::env::var("CX_JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());
        let session_ttl_secs: u64 = std::env::var("CX_SESSION_TTL_SECS")
            .unwrap_or_else(|_| "3600".into())
            .parse()
            .unwrap_or(3600);
        let interest_interval = std::env::var("CX_INTEREST_INTERVAL_SECS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            listen_addr,
            data_dir,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            jwt_secret,
            session_ttl: Duration::from_secs(session_ttl_secs),
            interest_interval,
        })
    }
}
