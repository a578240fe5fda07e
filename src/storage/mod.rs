/// 本地持久化存储模块
/// 以字符串键值对模拟浏览器 localStorage 的语义
pub mod keys;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::{ClientError, Result};

pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// 进程内存储，用于测试和临时会话
#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}

/// 以 JSON 对象形式落盘的存储，首次写入时创建文件
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            // 文件损坏时当作空存储，下一次写入会覆盖
            Ok(raw) => Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
                tracing::warn!(
                    "Ignoring unreadable storage file {}: {}",
                    self.path.display(),
                    e
                );
                BTreeMap::new()
            })),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(ClientError::Storage(e.to_string())),
        }
    }

    fn save(&self, items: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| ClientError::Storage(e.to_string()))?;
            }
        }
        let json = serde_json::to_string_pretty(items)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        // 先写临时文件再改名，中断的写入不会留下半个文件
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| ClientError::Storage(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| ClientError::Storage(e.to_string()))
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.load()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.load()?;
        items.insert(key.to_string(), value.to_string());
        self.save(&items)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut items = self.load()?;
        if items.remove(key).is_some() {
            self.save(&items)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_roundtrip() {
        let storage = MemoryStorage::new();
        storage.set_item(keys::ACCESS_TOKEN_KEY, "abc").unwrap();
        assert_eq!(storage.get_item(keys::ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        storage.remove_item(keys::ACCESS_TOKEN_KEY).unwrap();
        assert!(storage.is_empty());
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("storage.json");

        let storage = FileStorage::new(&path);
        assert_eq!(storage.get_item(keys::USER_KEY).unwrap(), None);
        storage.set_item(keys::USER_KEY, r#"{"id":"u1"}"#).unwrap();
        storage.set_item(keys::REFRESH_TOKEN_KEY, "r1").unwrap();

        let reopened = FileStorage::new(&path);
        assert_eq!(
            reopened.get_item(keys::USER_KEY).unwrap().as_deref(),
            Some(r#"{"id":"u1"}"#)
        );

        reopened.remove_item(keys::REFRESH_TOKEN_KEY).unwrap();
        assert_eq!(storage.get_item(keys::REFRESH_TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn test_corrupt_file_reads_as_empty_and_is_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, r#"{"user": "{\"id\":"#).unwrap();

        let storage = FileStorage::new(&path);
        assert_eq!(storage.get_item(keys::USER_KEY).unwrap(), None);
        storage.remove_item(keys::USER_KEY).unwrap();

        storage.set_item(keys::ACCESS_TOKEN_KEY, "fresh").unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        let items: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(items.get(keys::ACCESS_TOKEN_KEY).map(String::as_str), Some("fresh"));
        assert!(!path.with_extension("json.tmp").exists());
    }
}
