//! Provider selection with sequential fallback.

use std::sync::Arc;

use artifact_core::{Config, GenerationRequest};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::credentials::CredentialSource;
use crate::provider::{ComponentProvider, LLMError, ProviderKind, Usage};
use crate::provider_factory::create_providers;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateOptions {
    /// Try this provider first instead of the highest-priority one.
    #[serde(default)]
    pub provider: Option<ProviderKind>,
}

impl CreateOptions {
    pub fn with_provider(provider: ProviderKind) -> Self {
        Self {
            provider: Some(provider),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedAttempt {
    pub provider: ProviderKind,
    pub error: String,
}

/// Raw AI JSON tagged with the provider that produced it.
#[derive(Debug, Clone)]
pub struct Generation {
    pub provider: ProviderKind,
    pub response: Value,
    pub usage: Option<Usage>,
    /// Providers that failed before this one succeeded.
    pub attempts: Vec<FailedAttempt>,
}

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("no AI providers configured; set OPENROUTER_API_KEY, AIML_API_KEY or OPENAI_API_KEY")]
    NoProvidersConfigured,

    #[error("the AI returned output that could not be used: {last}")]
    MalformedOutput {
        attempts: Vec<FailedAttempt>,
        #[source]
        last: LLMError,
    },

    #[error("all AI providers failed ({} attempts); last error: {last}", .attempts.len())]
    AllProvidersFailed {
        attempts: Vec<FailedAttempt>,
        #[source]
        last: LLMError,
    },
}

impl GenerationError {
    pub fn attempts(&self) -> &[FailedAttempt] {
        match self {
            GenerationError::NoProvidersConfigured => &[],
            GenerationError::MalformedOutput { attempts, .. }
            | GenerationError::AllProvidersFailed { attempts, .. } => attempts,
        }
    }
}

/// Ordered strategy list of providers sharing one request shape.
#[derive(Clone)]
pub struct UnifiedProvider {
    providers: Vec<Arc<dyn ComponentProvider>>,
}

impl UnifiedProvider {
    /// `providers` is taken to be in priority order.
    pub fn new(providers: Vec<Arc<dyn ComponentProvider>>) -> Self {
        Self { providers }
    }

    pub fn from_config(config: &Config, credentials: &CredentialSource) -> Self {
        Self::new(create_providers(config, credentials))
    }

    pub fn from_env(config: &Config) -> Self {
        Self::from_config(config, &CredentialSource::from_env())
    }

    pub fn providers(&self) -> &[Arc<dyn ComponentProvider>] {
        &self.providers
    }

    pub fn provider(&self, kind: ProviderKind) -> Option<Arc<dyn ComponentProvider>> {
        self.providers.iter().find(|p| p.kind() == kind).cloned()
    }

    /// Kinds with a usable credential right now, in priority order.
    pub fn available_providers(&self) -> Vec<ProviderKind> {
        self.providers
            .iter()
            .filter(|p| p.is_configured())
            .map(|p| p.kind())
            .collect()
    }

    fn attempt_order(&self, preferred: Option<ProviderKind>) -> Vec<Arc<dyn ComponentProvider>> {
        let mut order: Vec<Arc<dyn ComponentProvider>> = Vec::new();

        if let Some(first) = preferred.and_then(|kind| self.provider(kind)) {
            order.push(first);
        }
        for provider in &self.providers {
            if Some(provider.kind()) != preferred && provider.is_configured() {
                order.push(provider.clone());
            }
        }
        order
    }

    /// Generate and return only the raw component JSON.
    pub async fn create(
        &self,
        request: &GenerationRequest,
        options: &CreateOptions,
    ) -> Result<Value, GenerationError> {
        self.create_with_fallback(request, options)
            .await
            .map(|generation| generation.response)
    }

    /// Try the preferred (or highest-priority) provider, then every other
    /// available one in order, one at a time.
    pub async fn create_with_fallback(
        &self,
        request: &GenerationRequest,
        options: &CreateOptions,
    ) -> Result<Generation, GenerationError> {
        if self.available_providers().is_empty() {
            log::warn!("Generation requested but no provider has an API key");
            return Err(GenerationError::NoProvidersConfigured);
        }

        let mut attempts = Vec::new();
        let mut last_error = None;
        let mut counted = 0usize;
        let mut all_malformed = true;

        for provider in self.attempt_order(options.provider) {
            let kind = provider.kind();
            log::info!("Generating components with {}", kind);

            match provider.generate(request).await {
                Ok(output) => {
                    if !attempts.is_empty() {
                        log::info!("{} succeeded after {} failed attempt(s)", kind, attempts.len());
                    }
                    return Ok(Generation {
                        provider: kind,
                        response: output.response,
                        usage: output.usage,
                        attempts,
                    });
                }
                Err(err) => {
                    log::warn!("{} failed: {}", kind, err);
                    if !err.is_not_configured() {
                        counted += 1;
                        all_malformed &= err.is_malformed_output();
                    }
                    attempts.push(FailedAttempt {
                        provider: kind,
                        error: err.to_string(),
                    });
                    last_error = Some(err);
                }
            }
        }

        let Some(last) = last_error else {
            return Err(GenerationError::NoProvidersConfigured);
        };

        if counted > 0 && all_malformed {
            Err(GenerationError::MalformedOutput { attempts, last })
        } else {
            Err(GenerationError::AllProvidersFailed { attempts, last })
        }
    }
}
