use artifact_core::GenerationRequest;
use async_trait::async_trait;

use crate::credentials::CredentialSource;
use crate::provider::{ComponentProvider, ProviderKind, ProviderOutput, Result};

use super::common::OpenAICompatClient;

pub struct OpenAIProvider {
    inner: OpenAICompatClient,
}

impl OpenAIProvider {
    pub fn new(credentials: CredentialSource) -> Self {
        Self {
            inner: OpenAICompatClient::new(ProviderKind::OpenAi, credentials),
        }
    }

    /// Wrap a client that was configured elsewhere (timeouts, model).
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
impl ComponentProvider for OpenAIProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::OpenAi
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
    fn test_new_provider() {
        let provider = OpenAIProvider::new(CredentialSource::from_map([("OPENAI_API_KEY", "k")]));
        assert_eq!(provider.kind(), ProviderKind::OpenAi);
        assert!(provider.is_configured());
        assert_eq!(provider.inner.endpoint(), "https://api.openai.com/v1/chat/completions");
        assert_eq!(provider.inner.model(), "gpt-4o-mini");
    }

    #[test]
    fn test_with_model() {
        let provider = OpenAIProvider::new(CredentialSource::new(|_| None)).with_model("gpt-4o");
        assert_eq!(provider.inner.model(), "gpt-4o");
        assert!(!provider.is_configured());
    }
}
