//! Provider Factory
//!
//! Builds one adapter per supported backend from the loaded configuration.

use std::sync::Arc;
use std::time::Duration;

use artifact_core::{Config, ProviderSettings};

use crate::credentials::CredentialSource;
use crate::provider::{ComponentProvider, ProviderKind, PROVIDER_PRIORITY};
use crate::providers::common::OpenAICompatClient;
use crate::providers::{AimlProvider, OpenAIProvider, OpenRouterProvider};

fn settings_for(config: &Config, kind: ProviderKind) -> &ProviderSettings {
    match kind {
        ProviderKind::OpenRouter => &config.providers.openrouter,
        ProviderKind::Aiml => &config.providers.aiml,
        ProviderKind::OpenAi => &config.providers.openai,
    }
}

fn http_client(config: &Config) -> reqwest::Client {
    let timeout = Duration::from_secs(config.request_timeout_secs);
    match reqwest::Client::builder().timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            log::warn!("Failed to build HTTP client with timeout: {}", e);
            reqwest::Client::new()
        }
    }
}

/// Build a configured client for `kind`. The API key itself is read per call.
pub fn create_client(
    config: &Config,
    credentials: &CredentialSource,
    kind: ProviderKind,
    http: reqwest::Client,
) -> OpenAICompatClient {
    let settings = settings_for(config, kind);
    let mut client = OpenAICompatClient::new(kind, credentials.clone())
        .with_client(http)
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens);

    if let Some(model) = settings.model.as_deref().filter(|m| !m.trim().is_empty()) {
        client = client.with_model(model.trim());
    }
    if let Some(url) = settings.base_url.as_deref().filter(|u| !u.trim().is_empty()) {
        client = client.with_base_url(url.trim());
    }
    client
}

/// All adapters in priority order, configured or not.
pub fn create_providers(
    config: &Config,
    credentials: &CredentialSource,
) -> Vec<Arc<dyn ComponentProvider>> {
    let http = http_client(config);

    PROVIDER_PRIORITY
        .into_iter()
        .map(|kind| {
            let client = create_client(config, credentials, kind, http.clone());
            log::debug!("Registered provider {} (model {})", kind, client.model());
            let provider: Arc<dyn ComponentProvider> = match kind {
                ProviderKind::OpenRouter => Arc::new(OpenRouterProvider::from_client(client)),
                ProviderKind::Aiml => Arc::new(AimlProvider::from_client(client)),
                ProviderKind::OpenAi => Arc::new(OpenAIProvider::from_client(client)),
            };
            provider
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_every_kind_in_priority_order() {
        let credentials = CredentialSource::from_map([("OPENAI_API_KEY", "k")]);
        let providers = create_providers(&Config::default(), &credentials);

        let kinds: Vec<_> = providers.iter().map(|p| p.kind()).collect();
        assert_eq!(kinds, PROVIDER_PRIORITY.to_vec());

        let configured: Vec<_> = providers
            .iter()
            .filter(|p| p.is_configured())
            .map(|p| p.kind())
            .collect();
        assert_eq!(configured, vec![ProviderKind::OpenAi]);
    }

    #[test]
    fn config_overrides_model_and_base_url() {
        let mut config = Config::default();
        config.providers.aiml.model = Some("claude-3-haiku".to_string());
        config.providers.aiml.base_url = Some("http://localhost:7000/v1".to_string());

        let client = create_client(
            &config,
            &CredentialSource::new(|_| None),
            ProviderKind::Aiml,
            reqwest::Client::new(),
        );
        assert_eq!(client.model(), "claude-3-haiku");
        assert_eq!(client.endpoint(), "http://localhost:7000/v1/chat/completions");
    }

    #[test]
    fn blank_settings_keep_defaults() {
        let mut config = Config::default();
        config.providers.openai.model = Some("  ".to_string());

        let client = create_client(
            &config,
            &CredentialSource::new(|_| None),
            ProviderKind::OpenAi,
            reqwest::Client::new(),
        );
        assert_eq!(client.model(), "gpt-4o-mini");
    }
}
