use super::{
    client::LlmClient,
    types::{Content, GenerateContentRequest, GenerationConfig, Part},
};
use crate::{Error, Result, upload::StagedAttachment};
use std::{sync::Arc, time::Duration};
use tracing::{debug, warn};

pub const TEMPERATURE: f32 = 1.0;
pub const TOP_P: f32 = 0.95;
pub const TOP_K: u32 = 64;
pub const MAX_OUTPUT_TOKENS: u32 = 8192;
pub const RESPONSE_MIME_TYPE: &str = "text/plain";

pub fn generation_config() -> GenerationConfig {
    GenerationConfig {
        temperature: TEMPERATURE,
        top_p: TOP_P,
        top_k: TOP_K,
        max_output_tokens: MAX_OUTPUT_TOKENS,
        response_mime_type: RESPONSE_MIME_TYPE.to_string(),
    }
}

/// Single-turn context: one user message, attachment first, prompt last.
pub fn build_request(prompt: &str, attachment: Option<&StagedAttachment>) -> GenerateContentRequest {
    let mut parts = Vec::with_capacity(2);
    if let Some(attachment) = attachment {
        parts.push(Part::inline_data(&attachment.media_type, &attachment.data));
    }
    parts.push(Part::text(prompt));

    GenerateContentRequest {
        contents: vec![Content::user(parts)],
        generation_config: generation_config(),
    }
}

/// Stateless one-shot question answering on top of an [`LlmClient`].
#[derive(Clone)]
pub struct CompletionClient {
    llm: Arc<dyn LlmClient>,
    timeout: Duration,
}

impl CompletionClient {
    pub fn new(llm: Arc<dyn LlmClient>, timeout: Duration) -> Self {
        Self { llm, timeout }
    }

    /// Returns the reply text verbatim. Every failure, including an expired
    /// timeout or a reply without text, comes back as a provider error.
    pub async fn complete(
        &self,
        prompt: &str,
        attachment: Option<&StagedAttachment>,
    ) -> Result<String> {
        let request = build_request(prompt, attachment);

        debug!(
            "Requesting completion (prompt {} chars, attachment: {})",
            prompt.chars().count(),
            attachment.map_or("none", |a| a.sanitized_name.as_str())
        );

        let response = match tokio::time::timeout(self.timeout, self.llm.generate_content(request))
            .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(Error::Provider(msg))) => return Err(Error::Provider(msg)),
            Ok(Err(e)) => return Err(Error::provider(e.to_string())),
            Err(_) => {
                return Err(Error::ProviderTimeout {
                    seconds: self.timeout.as_secs(),
                });
            }
        };

        match response.text() {
            Some(text) => Ok(text),
            None => {
                let reason = response
                    .prompt_feedback
                    .as_ref()
                    .and_then(|f| f.block_reason.clone())
                    .or_else(|| {
                        response
                            .candidates
                            .first()
                            .and_then(|c| c.finish_reason.clone())
                    })
                    .unwrap_or_else(|| "no candidates".to_string());
                warn!("Provider returned no text: {}", reason);
                Err(Error::provider(format!("Empty reply from provider: {}", reason)))
            }
        }
    }
}
