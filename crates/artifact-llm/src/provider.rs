use std::fmt;
use std::pin::Pin;
use std::str::FromStr;

use artifact_core::GenerationRequest;
use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Supported AI backends. All speak the OpenAI chat-completions dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenRouter,
    Aiml,
    OpenAi,
}

/// Order in which providers are picked and fallen back to.
pub const PROVIDER_PRIORITY: [ProviderKind; 3] =
    [ProviderKind::OpenRouter, ProviderKind::Aiml, ProviderKind::OpenAi];

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "openrouter",
            ProviderKind::Aiml => "aiml",
            ProviderKind::OpenAi => "openai",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "OpenRouter",
            ProviderKind::Aiml => "AIML",
            ProviderKind::OpenAi => "OpenAI",
        }
    }

    /// Environment variable holding the API key.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
            ProviderKind::Aiml => "AIML_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// Environment variable overriding the base URL.
    pub fn api_url_var(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "OPENROUTER_API_URL",
            ProviderKind::Aiml => "AIML_API_URL",
            ProviderKind::OpenAi => "OPENAI_API_URL",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "https://openrouter.ai/api/v1",
            ProviderKind::Aiml => "https://api.aimlapi.com/v1",
            ProviderKind::OpenAi => "https://api.openai.com/v1",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "openai/gpt-4o-mini",
            ProviderKind::Aiml => "gpt-4o",
            ProviderKind::OpenAi => "gpt-4o-mini",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for ProviderKind {
    type Err = LLMError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "aiml" => Ok(ProviderKind::Aiml),
            "openai" => Ok(ProviderKind::OpenAi),
            other => Err(LLMError::UnknownProvider(other.to_string())),
        }
    }
}

#[derive(Error, Debug)]
pub enum LLMError {
    #[error("{provider} is not configured: {var} is missing or blank")]
    NotConfigured {
        provider: ProviderKind,
        var: &'static str,
    },

    #[error("{provider} request failed: {source}")]
    Http {
        provider: ProviderKind,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} API error: HTTP {status}: {body}")]
    Api {
        provider: ProviderKind,
        status: u16,
        body: String,
    },

    #[error("{0} returned an empty response")]
    EmptyResponse(ProviderKind),

    #[error("{provider} returned malformed output: {reason}")]
    MalformedOutput {
        provider: ProviderKind,
        reason: String,
    },

    #[error("{0} does not support streaming")]
    StreamingUnsupported(ProviderKind),

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Unknown provider: {0}. Available providers: openrouter, aiml, openai")]
    UnknownProvider(String),
}

impl LLMError {
    /// The provider answered, but not with a usable component payload.
    pub fn is_malformed_output(&self) -> bool {
        matches!(
            self,
            LLMError::EmptyResponse(_) | LLMError::MalformedOutput { .. }
        )
    }

    pub fn is_not_configured(&self) -> bool {
        matches!(self, LLMError::NotConfigured { .. })
    }
}

pub type Result<T> = std::result::Result<T, LLMError>;

/// Stream of text deltas from a streamed completion.
pub type LLMStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: u32,
}

/// Parsed model output: the raw component JSON object plus token usage.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderOutput {
    pub response: Value,
    pub usage: Option<Usage>,
}

#[async_trait]
pub trait ComponentProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Whether a non-blank credential is present right now.
    fn is_configured(&self) -> bool;

    /// Ask the model for a component tree JSON object.
    async fn generate(&self, request: &GenerationRequest) -> Result<ProviderOutput>;

    /// Streamed variant yielding raw text deltas of the JSON document.
    async fn generate_stream(&self, _request: &GenerationRequest) -> Result<LLMStream> {
        Err(LLMError::StreamingUnsupported(self.kind()))
    }
}
