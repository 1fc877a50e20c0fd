//! Persistence adapters for characters and combat sessions
//!
//! Two backends implement the repository ports: an in-memory store and a
//! SQLite store. The backend is picked at startup from configuration.

mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::application::ports::outbound::{CharacterRepositoryPort, CombatSessionRepositoryPort};
use crate::infrastructure::config::{AppConfig, StorageBackend};

/// Both repositories, backed by the same store
#[derive(Clone)]
pub struct Repositories {
    pub characters: Arc<dyn CharacterRepositoryPort>,
    pub sessions: Arc<dyn CombatSessionRepositoryPort>,
}

impl Repositories {
    fn from_store<S>(store: Arc<S>) -> Self
    where
        S: CharacterRepositoryPort + CombatSessionRepositoryPort + 'static,
    {
        Self {
            characters: store.clone(),
            sessions: store,
        }
    }

    /// Open the configured backend
    pub async fn connect(config: &AppConfig) -> Result<Self> {
        match config.storage_backend {
            StorageBackend::Memory => {
                tracing::info!("Using in-memory storage");
                Ok(Self::from_store(Arc::new(MemoryStore::new())))
            }
            StorageBackend::Sqlite => {
                // Ensure data directory exists
                if let Some(parent) = sqlite_file_path(&config.database_url)
                    .and_then(|path| std::path::Path::new(path).parent())
                {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)
                            .context("Failed to create database directory")?;
                    }
                }

                let store = SqliteStore::connect(&config.database_url)
                    .await
                    .context("Failed to connect to SQLite database")?;
                tracing::info!("Connected to SQLite database: {}", config.database_url);
                Ok(Self::from_store(Arc::new(store)))
            }
        }
    }
}

/// File path portion of a `sqlite:` URL, if it names a file
fn sqlite_file_path(url: &str) -> Option<&str> {
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(path)
}
