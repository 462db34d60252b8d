//! 永続ストアアダプタ
//!
//! key → 文字列のストアに、スライスごとに独立してJSONを書き込む。
//! 読み込み失敗・破損データはデフォルト値として扱い、書き込み失敗は握りつぶす。

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

/// ストアのキー
pub mod keys {
    pub const RESULTS: &str = "hieroglyph_results";
    pub const CUSTOM_VARIANTS: &str = "hieroglyph_custom_variants";
    pub const FILTERS: &str = "hieroglyph_filters";
    pub const ACTIVE_VARIANT: &str = "hieroglyph_active_variant";
    pub const API_KEY: &str = "hieroglyph_api_key";
}

/// key → 文字列の永続ストア
///
/// CLIはファイル、ブラウザはlocalStorageで実装する
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// メモリ上のストア（テスト・ストア無し環境用）
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 全操作が失敗するストア
    pub fn unavailable() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            unavailable: true,
        }
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        if self.unavailable {
            return Err(Error::Storage("store unavailable".into()));
        }
        self.entries
            .lock()
            .map_err(|_| Error::Storage("store lock poisoned".into()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries()?.remove(key);
        Ok(())
    }
}

/// 失敗を外に出さないストアラッパー
#[derive(Debug)]
pub struct StoreAdapter<S> {
    inner: S,
}

impl<S: KeyValueStore> StoreAdapter<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// 未保存・読み込み失敗・パース失敗はすべて`None`
    pub fn load_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.load_string(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key, error = %e, "discarding corrupt stored value");
                None
            }
        }
    }

    pub fn load_string(&self, key: &str) -> Option<String> {
        match self.inner.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "store read failed");
                None
            }
        }
    }

    pub fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.save_string(key, &json),
            Err(e) => tracing::warn!(key, error = %e, "store serialize failed"),
        }
    }

    pub fn save_string(&self, key: &str, value: &str) {
        if let Err(e) = self.inner.set(key, value) {
            tracing::warn!(key, error = %e, "store write skipped");
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(e) = self.inner.remove(key) {
            tracing::warn!(key, error = %e, "store remove skipped");
        }
    }
}
