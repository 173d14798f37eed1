//! キー・バリューストア実装
//!
//! FileKeyValueStore: `<dir>/<key>.json` に 1 キー 1 ファイルで保存する。書き込みは一時ファイル + rename。
//! MemoryKeyValueStore: テスト・ドライラン用のメモリ実装。

use crate::error::Error;
use crate::ports::outbound::{is_safe_key, FileSystem, KeyValueStore};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

const VALUE_SUFFIX: &str = ".json";

fn check_key(key: &str) -> Result<(), Error> {
    if is_safe_key(key) {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!("Invalid storage key: '{}'", key)))
    }
}

/// ディレクトリ配下にキーごとのファイルを置く KeyValueStore
pub struct FileKeyValueStore {
    fs: Arc<dyn FileSystem>,
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(fs: Arc<dyn FileSystem>, dir: impl Into<PathBuf>) -> Self {
        Self { fs, dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}{}", key, VALUE_SUFFIX))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        check_key(key)?;
        let path = self.path_for(key);
        if !self.fs.exists(&path) {
            return Ok(None);
        }
        self.fs.read_to_string(&path).map(Some)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        check_key(key)?;
        self.fs.create_dir_all(&self.dir)?;
        let tmp = self.dir.join(format!(".{}.tmp", key));
        self.fs.write(&tmp, value)?;
        self.fs.rename(&tmp, &self.path_for(key))
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        check_key(key)?;
        let path = self.path_for(key);
        if self.fs.exists(&path) {
            self.fs.remove_file(&path)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, Error> {
        if !self.fs.exists(&self.dir) {
            return Ok(Vec::new());
        }
        let mut keys: Vec<String> = self
            .fs
            .read_dir(&self.dir)?
            .into_iter()
            .filter_map(|p| {
                let name = p.file_name()?.to_str()?.to_string();
                let key = name.strip_suffix(VALUE_SUFFIX)?;
                is_safe_key(key).then(|| key.to_string())
            })
            .collect();
        keys.sort();
        Ok(keys)
    }
}

/// メモリ上の KeyValueStore
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>, Error> {
        self.entries
            .lock()
            .map_err(|_| Error::system("key-value store lock poisoned"))
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        check_key(key)?;
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Error> {
        check_key(key)?;
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), Error> {
        check_key(key)?;
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, Error> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}
