//! データモデル
//!
//! CLIとWeb(WASM)で共有される型:
//! - Variant: 連想バリアント（内蔵 + カスタム）
//! - FilterSettings: 表現形式/主体/同音連想/除外内容
//! - SearchResult: 結果カード（スケルトン → 終端状態）
//! - ResultPatch: idでSearchResultにマージするフィールドパッチ

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// リクエスト失敗時にカードへ書き込むユーザー向け文言
pub const CONNECTION_ERROR_MESSAGE: &str = "AI Connection Error";

/// 連想バリアント
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub is_custom: bool,
}

/// 表現形式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterStyle {
    #[default]
    #[serde(rename = "所有")]
    Any,
    #[serde(rename = "图标/Logo")]
    Icon,
    #[serde(rename = "插画")]
    Illustration,
    #[serde(rename = "真实照片")]
    Photo,
    #[serde(rename = "艺术字")]
    Art,
}

impl FilterStyle {
    pub const ALL: [FilterStyle; 5] = [
        FilterStyle::Any,
        FilterStyle::Icon,
        FilterStyle::Illustration,
        FilterStyle::Photo,
        FilterStyle::Art,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterStyle::Any => "所有",
            FilterStyle::Icon => "图标/Logo",
            FilterStyle::Illustration => "插画",
            FilterStyle::Photo => "真实照片",
            FilterStyle::Art => "艺术字",
        }
    }
}

impl FromStr for FilterStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        if let Some(style) = Self::ALL.iter().find(|v| v.label() == key) {
            return Ok(*style);
        }
        match key.to_lowercase().as_str() {
            "any" | "all" => Ok(FilterStyle::Any),
            "icon" | "logo" => Ok(FilterStyle::Icon),
            "illustration" => Ok(FilterStyle::Illustration),
            "photo" => Ok(FilterStyle::Photo),
            "art" | "lettering" => Ok(FilterStyle::Art),
            _ => Err(format!(
                "Unknown style: {}. Use any, icon, illustration, photo, or art",
                s
            )),
        }
    }
}

impl fmt::Display for FilterStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// 主体タイプ
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FilterSubject {
    #[default]
    #[serde(rename = "所有")]
    Any,
    #[serde(rename = "人物/角色")]
    Person,
    #[serde(rename = "动物")]
    Animal,
    #[serde(rename = "抽象符号")]
    Abstract,
    #[serde(rename = "地点/建筑")]
    Place,
}

impl FilterSubject {
    pub const ALL: [FilterSubject; 5] = [
        FilterSubject::Any,
        FilterSubject::Person,
        FilterSubject::Animal,
        FilterSubject::Abstract,
        FilterSubject::Place,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FilterSubject::Any => "所有",
            FilterSubject::Person => "人物/角色",
            FilterSubject::Animal => "动物",
            FilterSubject::Abstract => "抽象符号",
            FilterSubject::Place => "地点/建筑",
        }
    }
}

impl FromStr for FilterSubject {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        if let Some(subject) = Self::ALL.iter().find(|v| v.label() == key) {
            return Ok(*subject);
        }
        match key.to_lowercase().as_str() {
            "any" | "all" => Ok(FilterSubject::Any),
            "person" | "character" => Ok(FilterSubject::Person),
            "animal" => Ok(FilterSubject::Animal),
            "abstract" | "symbol" => Ok(FilterSubject::Abstract),
            "place" | "building" => Ok(FilterSubject::Place),
            _ => Err(format!(
                "Unknown subject: {}. Use any, person, animal, abstract, or place",
                s
            )),
        }
    }
}

impl fmt::Display for FilterSubject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// フィルタ設定（丸ごと置換、フィールド単位の更新はしない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSettings {
    pub style: FilterStyle,
    pub subject: FilterSubject,
    pub allow_homophone: bool,
    #[serde(default)]
    pub exclude_content: String,
}

impl Default for FilterSettings {
    fn default() -> Self {
        Self {
            style: FilterStyle::Any,
            subject: FilterSubject::Any,
            allow_homophone: true,
            exclude_content: String::new(),
        }
    }
}

/// カードの失敗コード（既存データ互換のため従来の文言でシリアライズ）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResultError {
    #[serde(rename = "Retrieval failed")]
    RetrievalFailed,
}

/// 結果カード
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: String,

    /// 入力中の一文字（または語全体）
    #[serde(rename = "char")]
    pub character: String,

    pub query: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_query: Option<String>,

    #[serde(default)]
    pub explanation: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,

    pub variant_id: String,

    #[serde(default)]
    pub loading: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<ResultError>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub is_favorite: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl SearchResult {
    /// loading状態のスケルトン（idは一意）
    pub fn skeleton(query: &str, variant_id: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            character: query.to_string(),
            query: query.to_string(),
            variant_id: variant_id.to_string(),
            loading: true,
            ..Default::default()
        }
    }

    /// 直接表示できる画像があるか
    pub fn has_image(&self) -> bool {
        self.image_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    /// 表示する画像URL。読み込みに失敗した画像はリンク表示に切り替える
    pub fn visible_image(&self, load_failed: bool) -> Option<&str> {
        if load_failed || !self.has_image() {
            return None;
        }
        self.image_url.as_deref()
    }

    /// 外部検索リンク用のクエリ
    pub fn link_query(&self) -> &str {
        self.fallback_query.as_deref().unwrap_or(&self.query)
    }
}

/// カードへマージするパッチ。`None`は元の値を維持
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultPatch {
    pub image_url: Option<String>,
    pub fallback_query: Option<String>,
    pub explanation: Option<String>,
    pub source_title: Option<String>,
    pub source_url: Option<String>,
    pub loading: Option<bool>,
    pub error: Option<ResultError>,
}

impl ResultPatch {
    /// 失敗の終端状態: loading=false, error, 接続エラー文言
    pub fn failure() -> Self {
        Self {
            explanation: Some(CONNECTION_ERROR_MESSAGE.to_string()),
            loading: Some(false),
            error: Some(ResultError::RetrievalFailed),
            ..Default::default()
        }
    }

    pub fn apply_to(&self, result: &mut SearchResult) {
        if let Some(url) = &self.image_url {
            result.image_url = Some(url.clone());
        }
        if let Some(query) = &self.fallback_query {
            result.fallback_query = Some(query.clone());
        }
        if let Some(text) = &self.explanation {
            result.explanation = text.clone();
        }
        if let Some(title) = &self.source_title {
            result.source_title = Some(title.clone());
        }
        if let Some(url) = &self.source_url {
            result.source_url = Some(url.clone());
        }
        if let Some(loading) = self.loading {
            result.loading = loading;
        }
        if let Some(error) = self.error {
            result.error = Some(error);
        }
    }
}
