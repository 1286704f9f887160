use std::{
    collections::HashMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, RwLock},
};

use anyhow::Context;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, trace};

use crate::error::{AppError, AppResult};

pub const RECIPES_KEY: &str = "recipes";
pub const FAVORITES_KEY: &str = "favorites";
pub const REGISTERED_USERS_KEY: &str = "registeredUsers";
pub const SESSION_USER_KEY: &str = "user";

/// String-keyed storage of JSON text, the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&self, key: &str) -> anyhow::Result<()>;
}

#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| anyhow::anyhow!("memory store lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key under `dir`.
#[derive(Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).with_context(|| format!("create data dir {}", dir.display()))?;
        debug!(dir = %dir.display(), "file store opened");
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.path_for(key);
        fs::write(&path, value).with_context(|| format!("write {}", path.display()))
    }

    fn remove(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }
}

/// Typed accessor over a [`KeyValueStore`]. Every write replaces the whole
/// collection stored under a key.
#[derive(Clone)]
pub struct Store {
    backend: Arc<dyn KeyValueStore>,
    write_lock: Arc<Mutex<()>>,
}

impl Store {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Missing keys load as `T::default()`.
    pub fn load<T>(&self, key: &str) -> AppResult<T>
    where
        T: DeserializeOwned + Default,
    {
        let Some(text) = self.backend.get(key)? else {
            trace!(key, "missing key, using default");
            return Ok(T::default());
        };
        let value = serde_json::from_str(&text).with_context(|| format!("decode key {}", key))?;
        Ok(value)
    }

    pub fn save<T>(&self, key: &str, value: &T) -> AppResult<()>
    where
        T: Serialize + ?Sized,
    {
        let text = serde_json::to_string(value).with_context(|| format!("encode key {}", key))?;
        self.backend.set(key, &text)?;
        trace!(key, bytes = text.len(), "saved");
        Ok(())
    }

    pub fn remove(&self, key: &str) -> AppResult<()> {
        self.backend.remove(key)?;
        Ok(())
    }

    /// Read-modify-write under the store's write lock. The value is only
    /// written back when `f` succeeds.
    pub fn update<T, R, F>(&self, key: &str, f: F) -> AppResult<R>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T) -> AppResult<R>,
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| AppError::Internal(anyhow::anyhow!("store write lock poisoned")))?;
        let mut value: T = self.load(key)?;
        let out = f(&mut value)?;
        self.save(key, &value)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_loads_default() {
        let store = Store::in_memory();
        let list: Vec<i64> = store.load(RECIPES_KEY).unwrap();
        assert!(list.is_empty());
        let user: Option<String> = store.load(SESSION_USER_KEY).unwrap();
        assert!(user.is_none());
    }

    #[test]
    fn save_then_load_and_remove() {
        let store = Store::in_memory();
        store.save(FAVORITES_KEY, &vec![3_i64, 1, 2]).unwrap();
        let loaded: Vec<i64> = store.load(FAVORITES_KEY).unwrap();
        assert_eq!(loaded, vec![3, 1, 2]);

        store.remove(FAVORITES_KEY).unwrap();
        let loaded: Vec<i64> = store.load(FAVORITES_KEY).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn corrupt_json_is_an_error() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(RECIPES_KEY, "{not json").unwrap();
        let store = Store::new(backend);
        let err = store.load::<Vec<i64>>(RECIPES_KEY).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn failed_update_leaves_value_untouched() {
        let store = Store::in_memory();
        store.save(FAVORITES_KEY, &vec![1_i64]).unwrap();
        let res: AppResult<()> = store.update(FAVORITES_KEY, |list: &mut Vec<i64>| {
            list.push(2);
            Err(AppError::DuplicateEmail)
        });
        assert!(res.is_err());
        let loaded: Vec<i64> = store.load(FAVORITES_KEY).unwrap();
        assert_eq!(loaded, vec![1]);
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = Store::new(Arc::new(FileStore::open(dir.path()).unwrap()));
            store.save(RECIPES_KEY, &vec!["a", "b"]).unwrap();
        }
        let store = Store::new(Arc::new(FileStore::open(dir.path()).unwrap()));
        let loaded: Vec<String> = store.load(RECIPES_KEY).unwrap();
        assert_eq!(loaded, vec!["a", "b"]);
        assert!(dir.path().join("recipes.json").exists());

        store.remove(RECIPES_KEY).unwrap();
        store.remove(RECIPES_KEY).unwrap();
        assert!(!dir.path().join("recipes.json").exists());
    }
}
