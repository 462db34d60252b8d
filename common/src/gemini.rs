//! Gemini REST ワイヤ型
//!
//! CLI(reqwest)とWeb(fetch)で共有する。送受信そのものは各トランスポートが行う。

use crate::error::{Error, Result};
use crate::parser::{parse_association_response, AssociationPayload};
use crate::pipeline::AssociationRequest;
use crate::prompts::{build_association_prompt, SYSTEM_INSTRUCTION};
use serde::{Deserialize, Serialize};

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// generateContent のURL
pub fn endpoint(model: &str, api_key: &str) -> String {
    format!(
        "{}/{}:generateContent?key={}",
        GEMINI_API_BASE,
        model,
        urlencoding::encode(api_key)
    )
}

/// Gemini APIリクエスト
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    pub contents: Vec<Content>,
    pub system_instruction: Content,
    pub tools: Vec<Tool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Part {
    pub text: String,
}

/// 検索グラウンディング
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_search: GoogleSearch,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GoogleSearch {}

/// Gemini APIレスポンス
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<ResponseContent>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

impl GeminiResponse {
    /// 先頭候補のテキストパートを連結
    ///
    /// グラウンディング有効時は本文が複数パートに分かれることがある
    pub fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    /// レスポンス → 連想ペイロード
    pub fn into_payload(self) -> Result<AssociationPayload> {
        parse_association_response(&self.text())
    }
}

/// 連想リクエスト → Geminiリクエスト
pub fn build_request(request: &AssociationRequest) -> GeminiRequest {
    let prompt = build_association_prompt(&request.query, &request.variant, &request.filters);
    GeminiRequest {
        contents: vec![Content {
            role: Some("user".to_string()),
            parts: vec![Part { text: prompt }],
        }],
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: SYSTEM_INSTRUCTION.to_string(),
            }],
        },
        tools: vec![Tool {
            google_search: GoogleSearch::default(),
        }],
    }
}

/// リクエストのキーを取り出す。空・未設定は`MissingApiKey`
pub fn require_api_key(request: &AssociationRequest) -> Result<&str> {
    request
        .api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .ok_or(Error::MissingApiKey)
}
