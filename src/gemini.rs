//! Gemini API クライアント（reqwest）

use crate::config::Config;
use crate::error::Result;
use async_trait::async_trait;
use hieroglyph_common::gemini::{self, GeminiResponse};
use hieroglyph_common::{AssociationPayload, AssociationProvider, AssociationRequest, Error};
use std::time::Duration;

pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            base_url: gemini::GEMINI_API_BASE.to_string(),
            model: config.model.clone(),
        })
    }

    /// 接続先を差し替える（ローカルのモックサーバー用）
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, api_key: &str) -> String {
        let default_base = gemini::GEMINI_API_BASE;
        let full = gemini::endpoint(&self.model, api_key);
        if self.base_url == default_base {
            full
        } else {
            full.replacen(default_base, self.base_url.trim_end_matches('/'), 1)
        }
    }

    async fn generate(&self, request: &AssociationRequest) -> hieroglyph_common::Result<String> {
        let api_key = gemini::require_api_key(request)?;
        let body = gemini::build_request(request);

        tracing::debug!(query = %request.query, model = %self.model, "gemini request");
        let response = self
            .client
            .post(self.url(api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::ProviderCall(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Error::ProviderCall(format!("API error {}: {}", status, text)));
        }

        let response: GeminiResponse = response
            .json()
            .await
            .map_err(|e| Error::MalformedResponse(e.to_string()))?;
        Ok(response.text())
    }
}

#[async_trait(?Send)]
impl AssociationProvider for GeminiClient {
    async fn associate(
        &self,
        request: &AssociationRequest,
    ) -> hieroglyph_common::Result<AssociationPayload> {
        let text = self.generate(request).await?;
        hieroglyph_common::parse_association_response(&text)
    }
}
