//! APIレスポンスパーサー
//!
//! Geminiの自由テキストからJSONオブジェクトを取り出し、
//! 連想ペイロード（AssociationPayload）にする

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// 連想ペイロード
///
/// 欠けているフィールドは空文字
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssociationPayload {
    pub association_logic: String,
    pub visual_subject: String,
    pub search_query: String,
    pub explanation: String,
    pub source_page_url: String,
    pub image_url: String,
}

/// Markdownのコードフェンス（```json / ```）を除去
pub fn strip_code_fence(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// レスポンスからJSONオブジェクト部分を抽出
///
/// 抽出優先順位:
/// 1. コードフェンス除去後の全体が `{...}`
/// 2. 前後に説明文がある場合は最初の `{` から最後の `}` まで
/// 3. エラー
///
/// # Examples
/// ```
/// use hieroglyph_common::extract_json_object;
///
/// let response = "结果如下：\n```json\n{\"explanation\": \"明日香\"}\n```";
/// let json = extract_json_object(response).unwrap();
/// assert_eq!(json, "{\"explanation\": \"明日香\"}");
/// ```
pub fn extract_json_object(response: &str) -> Result<String> {
    let cleaned = strip_code_fence(response);
    if cleaned.starts_with('{') && cleaned.ends_with('}') {
        return Ok(cleaned);
    }

    if let (Some(start), Some(end)) = (cleaned.find('{'), cleaned.rfind('}')) {
        if end > start {
            return Ok(cleaned[start..=end].to_string());
        }
    }

    Err(Error::MalformedResponse("AI 返回格式错误".into()))
}

/// 連想レスポンスをパース
///
/// # Returns
/// * `Ok(AssociationPayload)` - パース成功
/// * `Err(MalformedResponse)` - 空レスポンス、またはJSONオブジェクトとして読めない
pub fn parse_association_response(response: &str) -> Result<AssociationPayload> {
    if response.trim().is_empty() {
        return Err(Error::MalformedResponse("AI 未返回内容".into()));
    }

    let json_str = extract_json_object(response)?;
    let value: serde_json::Value = serde_json::from_str(&json_str).map_err(|e| {
        tracing::warn!(error = %e, response, "association JSON parse failed");
        Error::MalformedResponse("AI 返回格式错误".into())
    })?;

    let obj = match value {
        serde_json::Value::Array(items) => items.into_iter().next().unwrap_or_default(),
        other => other,
    };
    let Some(map) = obj.as_object() else {
        return Err(Error::MalformedResponse("JSON object not found".into()));
    };

    Ok(AssociationPayload {
        association_logic: get_string(map, "associationLogic"),
        visual_subject: get_string(map, "visualSubject"),
        search_query: get_string(map, "searchQuery"),
        explanation: get_string(map, "explanation"),
        source_page_url: get_url(map, "sourcePageUrl"),
        image_url: get_url(map, "imageUrl"),
    })
}

fn get_string(map: &serde_json::Map<String, serde_json::Value>, key: &str) -> String {
    match map.get(key) {
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        Some(serde_json::Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// URLフィールドは文字列のみ受け付ける（`false` 等は空扱い）
fn get_url(map: &serde_json::Map<String, serde_json::Value>, key: &str) -> String {
    match map.get(key) {
        Some(serde_json::Value::String(s)) => s.trim().to_string(),
        _ => String::new(),
    }
}
