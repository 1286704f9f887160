use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Simulated round-trip applied to every register/login call.
    pub delay_ms: u64,
    pub min_password_len: usize,
}

impl AuthConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Directory for the file-backed store; `None` keeps everything in memory.
    pub data_dir: Option<PathBuf>,
    pub auth: AuthConfig,
    pub avatar_max_bytes: usize,
    pub seed_on_empty: bool,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let data_dir = std::env::var("DATA_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);
        if let Some(dir) = &data_dir {
            anyhow::ensure!(!dir.is_file(), "DATA_DIR {} is a file", dir.display());
        }
        let auth = AuthConfig {
            delay_ms: std::env::var("AUTH_DELAY_MS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(500),
            min_password_len: std::env::var("MIN_PASSWORD_LEN")
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(8),
        };
        let avatar_max_bytes = std::env::var("AVATAR_MAX_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(2 * 1024 * 1024);
        let seed_on_empty = std::env::var("SEED_ON_EMPTY")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);
        Ok(Self {
            data_dir,
            auth,
            avatar_max_bytes,
            seed_on_empty,
        })
    }

    /// In-memory configuration with no simulated latency.
    pub fn for_tests() -> Self {
        Self {
            data_dir: None,
            auth: AuthConfig {
                delay_ms: 0,
                min_password_len: 8,
            },
            avatar_max_bytes: 64 * 1024,
            seed_on_empty: true,
        }
    }
}
