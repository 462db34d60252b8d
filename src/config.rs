use crate::error::{HieroglyphError, Result};
use hieroglyph_common::gemini::DEFAULT_MODEL;
use hieroglyph_common::links::DEFAULT_DENYLIST;
use hieroglyph_common::{PipelinePolicy, DEFAULT_CAPACITY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// ビルド時に埋め込む既定キー
pub const BUILD_API_KEY: Option<&str> = option_env!("GEMINI_API_KEY");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub model: String,
    pub capacity: usize,
    pub denylist: Vec<String>,
    pub timeout_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.into(),
            capacity: DEFAULT_CAPACITY,
            denylist: DEFAULT_DENYLIST.iter().map(|d| d.to_string()).collect(),
            timeout_seconds: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// ファイルが無ければ既定値
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)?;
            config.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| HieroglyphError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("hieroglyph").join("config.json"))
    }

    /// データ保存先（`--data-dir`未指定時）
    pub fn default_data_dir() -> Result<PathBuf> {
        let base = dirs::data_dir()
            .ok_or_else(|| HieroglyphError::Config("データディレクトリが見つかりません".into()))?;
        Ok(base.join("hieroglyph"))
    }

    pub fn policy(&self) -> PipelinePolicy {
        PipelinePolicy {
            capacity: self.capacity,
            denylist: self.denylist.clone(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(HieroglyphError::Config("capacity は1以上にしてください".into()));
        }
        if self.model.trim().is_empty() {
            return Err(HieroglyphError::Config("model が空です".into()));
        }
        Ok(())
    }
}
