use artifact_core::GenerationRequest;
use async_trait::async_trait;

use crate::credentials::CredentialSource;
use crate::provider::{ComponentProvider, ProviderKind, ProviderOutput, Result};

use super::common::OpenAICompatClient;

/// AI/ML API (aimlapi.com), an OpenAI-compatible aggregator.
pub struct AimlProvider {
    inner: OpenAICompatClient,
}

impl AimlProvider {
    pub fn new(credentials: CredentialSource) -> Self {
        Self {
            inner: OpenAICompatClient::new(ProviderKind::Aiml, credentials),
        }
    }

    pub fn from_client(inner: OpenAICompatClient) -> Self {
        Self { inner }
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

#[async_trait]
impl ComponentProvider for AimlProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Aiml
    }

    fn is_configured(&self) -> bool {
        self.inner.is_configured()
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<ProviderOutput> {
        self.inner.complete(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_aimlapi() {
        let provider = AimlProvider::new(CredentialSource::from_map([("AIML_API_KEY", " ")]));
        assert_eq!(provider.inner.endpoint(), "https://api.aimlapi.com/v1/chat/completions");
        assert!(!provider.is_configured());
    }
}
