//! Gemini API連携（fetch）
//!
//! リクエスト/レスポンス型とプロンプトは共通ライブラリのものを使い、
//! ここでは送受信だけを行う。

use async_trait::async_trait;
use hieroglyph_common::gemini::{self, GeminiRequest, GeminiResponse};
use hieroglyph_common::{AssociationPayload, AssociationProvider, AssociationRequest, Error, Result};
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

/// ブラウザから直接Geminiを呼ぶプロバイダ
#[derive(Debug, Clone)]
pub struct FetchGemini {
    model: String,
}

impl Default for FetchGemini {
    fn default() -> Self {
        Self::new(gemini::DEFAULT_MODEL)
    }
}

impl FetchGemini {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
        }
    }
}

fn provider_error(e: JsValue) -> Error {
    Error::ProviderCall(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// Gemini API呼び出し（共通処理）
async fn call_gemini_api(url: &str, request: &GeminiRequest) -> Result<GeminiResponse> {
    let body = serde_json::to_string(request)?;

    let opts = RequestInit::new();
    opts.set_method("POST");
    opts.set_mode(RequestMode::Cors);
    opts.set_body(&JsValue::from_str(&body));

    let request = Request::new_with_str_and_init(url, &opts).map_err(provider_error)?;
    request
        .headers()
        .set("Content-Type", "application/json")
        .map_err(provider_error)?;

    let window = web_sys::window().ok_or_else(|| Error::ProviderCall("window unavailable".into()))?;
    let resp_value = JsFuture::from(window.fetch_with_request(&request))
        .await
        .map_err(provider_error)?;
    let resp: Response = resp_value.dyn_into().map_err(provider_error)?;

    if !resp.ok() {
        return Err(Error::ProviderCall(format!("API error: {}", resp.status())));
    }

    let json = JsFuture::from(resp.json().map_err(provider_error)?)
        .await
        .map_err(|e| Error::MalformedResponse(format!("{:?}", e)))?;
    serde_wasm_bindgen::from_value(json).map_err(|e| Error::MalformedResponse(e.to_string()))
}

#[async_trait(?Send)]
impl AssociationProvider for FetchGemini {
    async fn associate(&self, request: &AssociationRequest) -> Result<AssociationPayload> {
        let api_key = gemini::require_api_key(request)?;
        let url = gemini::endpoint(&self.model, api_key);
        let response = call_gemini_api(&url, &gemini::build_request(request)).await?;
        response.into_payload()
    }
}
