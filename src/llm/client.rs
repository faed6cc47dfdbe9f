use super::types::*;
use crate::{Error, Result, config::LlmConfig};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

/// Gemini `generateContent` over REST.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            model: config.model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate_content(
        &self,
        request: GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        debug!(
            "Calling {} with {} content entries",
            self.model,
            request.contents.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ApiErrorResponse>(&body)
                .map(|e| format!("{} {}: {}", e.error.code, e.error.status, e.error.message))
                .unwrap_or(body);
            return Err(Error::provider(format!(
                "Provider returned {}: {}",
                status, detail
            )));
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| Error::provider(format!("Malformed provider response: {}", e)))?;

        debug!(
            "Received response with {} candidates",
            parsed.candidates.len()
        );

        Ok(parsed)
    }
}
