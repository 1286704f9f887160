use crate::config::AppConfig;
use crate::storage::{FileStore, KeyValueStore, MemoryStore, Store};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Store,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let backend = match &config.data_dir {
            Some(dir) => Arc::new(FileStore::open(dir)?) as Arc<dyn KeyValueStore>,
            None => {
                tracing::warn!("DATA_DIR not set; catalog will not outlive this process");
                Arc::new(MemoryStore::new()) as Arc<dyn KeyValueStore>
            }
        };

        Ok(Self {
            config,
            store: Store::new(backend),
        })
    }

    pub fn from_parts(config: Arc<AppConfig>, store: Store) -> Self {
        Self { config, store }
    }

    pub fn fake() -> Self {
        Self {
            config: Arc::new(AppConfig::for_tests()),
            store: Store::in_memory(),
        }
    }
}
