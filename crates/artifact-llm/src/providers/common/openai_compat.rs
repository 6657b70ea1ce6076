//! OpenAI-compatible chat-completions client.
//!
//! OpenRouter, AIML and OpenAI all accept the same request and response shape,
//! so the adapters only differ in defaults and a few extra headers.

use artifact_core::config::{DEFAULT_MAX_TOKENS, DEFAULT_TEMPERATURE};
use artifact_core::{AiResponse, GenerationRequest};
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::credentials::CredentialSource;
use crate::prompt::{build_user_prompt, SYSTEM_PROMPT};
use crate::provider::{LLMError, ProviderKind, ProviderOutput, Result, Usage};

#[derive(Debug, Clone)]
pub struct OpenAICompatClient {
    kind: ProviderKind,
    client: Client,
    credentials: CredentialSource,
    base_url: String,
    model: String,
    temperature: f64,
    max_tokens: u32,
    headers: Vec<(&'static str, String)>,
}

impl OpenAICompatClient {
    pub fn new(kind: ProviderKind, credentials: CredentialSource) -> Self {
        Self {
            kind,
            client: Client::new(),
            credentials,
            base_url: kind.default_base_url().to_string(),
            model: kind.default_model().to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            headers: Vec::new(),
        }
    }

    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn kind(&self) -> ProviderKind {
        self.kind
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn is_configured(&self) -> bool {
        self.credentials.is_available(self.kind)
    }

    /// `*_API_URL` wins over the configured base URL, checked per call.
    pub fn base_url(&self) -> String {
        self.credentials
            .base_url_override(self.kind)
            .unwrap_or_else(|| self.base_url.clone())
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url().trim_end_matches('/'))
    }

    fn api_key(&self) -> Result<String> {
        self.credentials
            .api_key(self.kind)
            .ok_or(LLMError::NotConfigured {
                provider: self.kind,
                var: self.kind.api_key_var(),
            })
    }

    pub fn build_body(&self, request: &GenerationRequest, stream: bool) -> Value {
        build_chat_body(&self.model, request, self.temperature, self.max_tokens, stream)
    }

    /// POST the body and return the response once it is known to be 2xx.
    pub async fn post(&self, body: &Value) -> Result<Response> {
        let api_key = self.api_key()?;
        let url = self.endpoint();
        log::debug!("{} POST {} (model {})", self.kind, url, self.model);

        let mut builder = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .header("Content-Type", "application/json");
        for (name, value) in &self.headers {
            builder = builder.header(*name, value);
        }

        let response = builder
            .json(body)
            .send()
            .await
            .map_err(|source| LLMError::Http {
                provider: self.kind,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            log::warn!("{} returned HTTP {}", self.kind, status.as_u16());
            return Err(LLMError::Api {
                provider: self.kind,
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(response)
    }

    /// Non-streaming completion parsed into the component JSON object.
    pub async fn complete(&self, request: &GenerationRequest) -> Result<ProviderOutput> {
        let body = self.build_body(request, false);
        let response = self.post(&body).await?;
        let text = response.text().await.map_err(|source| LLMError::Http {
            provider: self.kind,
            source,
        })?;
        parse_completion(self.kind, &text)
    }
}

/// Standard non-tool chat body with JSON-object output mode.
pub fn build_chat_body(
    model: &str,
    request: &GenerationRequest,
    temperature: f64,
    max_tokens: u32,
    stream: bool,
) -> Value {
    let mut body = json!({
        "model": model,
        "messages": [
            { "role": "system", "content": SYSTEM_PROMPT },
            { "role": "user", "content": build_user_prompt(request) },
        ],
        "response_format": { "type": "json_object" },
        "temperature": temperature,
        "max_tokens": max_tokens,
    });

    if stream {
        body["stream"] = json!(true);
    }

    body
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    message: Option<CompletionMessage>,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Parse a full chat-completions body: `choices[0].message.content` must hold
/// a JSON object.
pub fn parse_completion(kind: ProviderKind, body: &str) -> Result<ProviderOutput> {
    let completion: ChatCompletion =
        serde_json::from_str(body).map_err(|e| LLMError::MalformedOutput {
            provider: kind,
            reason: format!("unreadable completion body: {e}"),
        })?;

    let content = completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .ok_or(LLMError::EmptyResponse(kind))?;

    Ok(ProviderOutput {
        response: parse_json_content(kind, &content)?,
        usage: completion.usage,
    })
}

/// Parse model text as a JSON object, tolerating a surrounding code fence.
pub fn parse_json_content(kind: ProviderKind, content: &str) -> Result<Value> {
    let text = strip_code_fence(content.trim());
    if text.is_empty() {
        return Err(LLMError::EmptyResponse(kind));
    }

    let value: Value = serde_json::from_str(text).map_err(|e| LLMError::MalformedOutput {
        provider: kind,
        reason: e.to_string(),
    })?;

    if !value.is_object() {
        return Err(LLMError::MalformedOutput {
            provider: kind,
            reason: "expected a JSON object".to_string(),
        });
    }

    if !AiResponse::has_required_keys(&value) {
        log::warn!(
            "{} response lacks one of components, layout or componentDetails",
            kind
        );
    }

    Ok(value)
}

fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    // Drop the info string (`json`) on the opening line.
    let rest = rest.split_once('\n').map_or("", |(_, body)| body);
    rest.trim_end().strip_suffix("```").unwrap_or(rest).trim()
}

// --- streaming deltas ---

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    #[serde(default)]
    delta: StreamDelta,
}

#[derive(Debug, Default, Deserialize)]
struct StreamDelta {
    #[serde(default)]
    content: Option<String>,
}

/// Text delta carried by one streamed chunk, if any.
pub fn parse_stream_delta(data: &str) -> Result<Option<String>> {
    let chunk: StreamChunk =
        serde_json::from_str(data).map_err(|e| LLMError::Stream(format!("bad chunk: {e}")))?;
    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty()))
}
