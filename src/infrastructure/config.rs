//! Application configuration

use std::env;
use std::str::FromStr;

use anyhow::{Context, Result};

/// Where characters and sessions live
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Sqlite,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "sqlite" => Ok(Self::Sqlite),
            other => anyhow::bail!("Unsupported storage backend: {}", other),
        }
    }
}

/// Application configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP server port
    pub server_port: u16,

    /// Storage backend for characters and combat sessions
    pub storage_backend: StorageBackend,
    /// SQLite database URL, used when the backend is `sqlite`
    pub database_url: String,

    /// Active sessions untouched for this long are swept
    pub session_idle_timeout_minutes: i64,
    /// Finished sessions are kept this long so clients can read the outcome
    pub finished_session_retention_minutes: i64,
    /// How often the sweeper runs
    pub session_sweep_interval_secs: u64,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .context("SERVER_PORT must be a valid port number")?,

            storage_backend: env::var("STORAGE_BACKEND")
                .unwrap_or_else(|_| "memory".to_string())
                .parse()
                .context("STORAGE_BACKEND must be 'memory' or 'sqlite'")?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://taskquest.db".to_string()),

            session_idle_timeout_minutes: env::var("SESSION_IDLE_TIMEOUT_MINUTES")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .context("SESSION_IDLE_TIMEOUT_MINUTES must be a whole number of minutes")?,
            finished_session_retention_minutes: env::var("FINISHED_SESSION_RETENTION_MINUTES")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("FINISHED_SESSION_RETENTION_MINUTES must be a whole number of minutes")?,
            session_sweep_interval_secs: parse_sweep_interval(
                &env::var("SESSION_SWEEP_INTERVAL_SECS").unwrap_or_else(|_| "60".to_string()),
            )?,
        })
    }

    pub fn session_idle_timeout(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.session_idle_timeout_minutes)
    }

    pub fn finished_session_retention(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.finished_session_retention_minutes)
    }
}

fn parse_sweep_interval(raw: &str) -> Result<u64> {
    let secs: u64 = raw
        .trim()
        .parse()
        .context("SESSION_SWEEP_INTERVAL_SECS must be a whole number of seconds")?;
    if secs == 0 {
        anyhow::bail!("SESSION_SWEEP_INTERVAL_SECS must be at least 1");
    }
    Ok(secs)
}
