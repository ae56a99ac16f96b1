use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;
use clubsite_core::constants::SYNC_INTERVAL_SECS;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub data_dir: PathBuf,
    /// Base URL of a hosted document store. When unset the server keeps its
    /// documents in JSON files under `data_dir`.
    pub remote_url: Option<String>,
    pub sync_interval: Duration,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub static_dir: String,
    pub delete_phrase: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 3000)),
            data_dir: PathBuf::from("./data"),
            remote_url: None,
            sync_interval: Duration::from_secs(SYNC_INTERVAL_SECS),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30000),
            static_dir: "public".to_string(),
            delete_phrase: None,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let listen_addr = match non_empty_var("CLUB_LISTEN_ADDR") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid CLUB_LISTEN_ADDR '{}'", raw))?,
            None => defaults.listen_addr,
        };
        let data_dir = non_empty_var("CLUB_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);
        let sync_secs: u64 = non_empty_var("CLUB_SYNC_INTERVAL_SECS")
            .and_then(|s| s.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(SYNC_INTERVAL_SECS);
        let cors_allow = std::env::var("CLUB_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = non_empty_var("CLUB_REQUEST_TIMEOUT_MS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(30000);

        Ok(Self {
            listen_addr,
            data_dir,
            remote_url: non_empty_var("CLUB_REMOTE_URL"),
            sync_interval: Duration::from_secs(sync_secs),
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            static_dir: non_empty_var("CLUB_STATIC_DIR").unwrap_or(defaults.static_dir),
            delete_phrase: non_empty_var("CLUB_DELETE_PHRASE"),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
