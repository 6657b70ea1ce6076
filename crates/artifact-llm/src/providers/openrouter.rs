use artifact_core::GenerationRequest;
use async_trait::async_trait;
use serde_json::Value;

use crate::credentials::CredentialSource;
use crate::provider::{ComponentProvider, LLMStream, ProviderKind, ProviderOutput, Result};

use super::common::openai_compat::{parse_json_content, parse_stream_delta};
use super::common::sse::{collect_text, llm_stream_from_sse};
use super::common::OpenAICompatClient;

/// Sent as `HTTP-Referer` for OpenRouter's app attribution.
pub const APP_REFERER: &str = "http://localhost:8090";
/// Sent as `X-Title`.
pub const APP_TITLE: &str = "Artifact Studio";

pub struct OpenRouterProvider {
    inner: OpenAICompatClient,
}

impl OpenRouterProvider {
    pub fn new(credentials: CredentialSource) -> Self {
        Self::from_client(OpenAICompatClient::new(ProviderKind::OpenRouter, credentials))
    }

    pub fn from_client(inner: OpenAICompatClient) -> Self {
        Self {
            inner: inner
                .with_header("HTTP-Referer", APP_REFERER)
                .with_header("X-Title", APP_TITLE),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.inner = self.inner.with_base_url(url);
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.inner = self.inner.with_model(model);
        self
    }
}

/// Drain a delta stream and parse the concatenated text as the component JSON.
pub async fn collect_stream(stream: LLMStream) -> Result<Value> {
    let text = collect_text(stream).await?;
    parse_json_content(ProviderKind::OpenRouter, &text)
}

#[async_trait]
impl ComponentProvider for OpenRouterProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenRouter
    }

    fn is_configured(&self) -> bool {
        self.inner.is_configured()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<ProviderOutput> {
        self.inner.complete(request).await
    }

    async fn generate_stream(&self, request: &GenerationRequest) -> Result<LLMStream> {
        let body = self.inner.build_body(request, true);
        let response = self.inner.post(&body).await?;
        log::debug!("OpenRouter stream opened");
        Ok(llm_stream_from_sse(response, parse_stream_delta))
    }
}
