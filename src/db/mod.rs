mod schema;
pub mod backend;
pub mod file;
pub mod memory;
pub mod sqlite;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

pub use backend::KeyValueStore;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::config::{StorageBackend, StorageConfig};

/// Open the key-value store selected by the storage configuration.
pub fn open(config: &StorageConfig) -> Result<Arc<dyn KeyValueStore>> {
    let store: Arc<dyn KeyValueStore> = match config.backend {
        StorageBackend::Sqlite => {
            let path = config.sqlite_path();
            let db = SqliteStore::open(&path)
                .with_context(|| format!("Failed to open database at {}", path.display()))?;
            db.initialize().context("Failed to initialize database schema")?;
            info!("Using SQLite storage at {:?}", path);
            Arc::new(db)
        }
        StorageBackend::File => {
            let dir = config.file_dir();
            info!("Using file storage in {:?}", dir);
            Arc::new(FileStore::new(dir))
        }
        StorageBackend::Memory => {
            info!("Using in-memory storage; nothing will be kept after exit");
            Arc::new(MemoryStore::new())
        }
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_open_each_backend() {
        let dir = tempdir().unwrap();
        for backend in [StorageBackend::Sqlite, StorageBackend::File, StorageBackend::Memory] {
            let config = StorageConfig {
                backend,
                path: dir.path().to_path_buf(),
                ..StorageConfig::default()
            };
            let store = open(&config).unwrap();
            store.set("appData", "{}").await.unwrap();
            assert_eq!(store.get("appData").await.unwrap().as_deref(), Some("{}"));
        }
        assert!(dir.path().join("travelog.db").exists());
        assert!(dir.path().join("store").join("appData.json").exists());
    }
}
