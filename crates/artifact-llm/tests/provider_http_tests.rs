//! Provider adapters and fallback against wiremock-served completions.

use artifact_codegen::EmitOptions;
use artifact_core::{Config, Framework, GenerationRequest};
use artifact_llm::{
    AimlProvider, ArtifactPipeline, ComponentProvider, CreateOptions, CredentialSource,
    GenerationError, LLMError, OpenAIProvider, ProviderKind, UnifiedProvider,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn component_json() -> Value {
    json!({
        "components": [{"id": "form", "type": "container"}, {"id": "submit", "type": "button"}],
        "layout": {"form": {"children": ["submit"]}},
        "componentDetails": {
            "form": {"type": "container", "props": {"className": "login"}},
            "submit": {"type": "button", "content": "Sign in"}
        }
    })
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}],
        "usage": {"prompt_tokens": 12, "completion_tokens": 34, "total_tokens": 46}
    })
}

fn request() -> GenerationRequest {
    GenerationRequest::new("a login form").unwrap()
}

async fn mock_completions(status: u16, body: Value, expected_calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .expect(expected_calls)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn openai_adapter_posts_json_mode_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "response_format": {"type": "json_object"},
            "max_tokens": 4000
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion(&component_json().to_string())),
        )
        .expect(1)
        .mount(&server)
        .await;

    let provider = OpenAIProvider::new(CredentialSource::from_map([("OPENAI_API_KEY", "sk-test")]))
        .with_base_url(server.uri());
    let output = provider.generate(&request()).await.unwrap();

    assert_eq!(output.response, component_json());
    assert_eq!(output.usage.unwrap().total_tokens, 46);
}

#[tokio::test]
async fn non_2xx_is_an_api_error_with_body() {
    let server = mock_completions(429, json!({"error": {"message": "rate limited"}}), 1).await;

    let provider = AimlProvider::new(CredentialSource::from_map([("AIML_API_KEY", "k")]))
        .with_base_url(server.uri());
    let err = provider.generate(&request()).await.unwrap_err();

    match err {
        LLMError::Api {
            provider,
            status,
            body,
        } => {
            assert_eq!(provider, ProviderKind::Aiml);
            assert_eq!(status, 429);
            assert!(body.contains("rate limited"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_content_is_malformed_output() {
    let server = mock_completions(200, completion("{\"components\": [ oops"), 1).await;

    let provider = AimlProvider::new(CredentialSource::from_map([("AIML_API_KEY", "k")]))
        .with_base_url(server.uri());
    let err = provider.generate(&request()).await.unwrap_err();

    assert!(matches!(
        err,
        LLMError::MalformedOutput {
            provider: ProviderKind::Aiml,
            ..
        }
    ));
}

#[tokio::test]
async fn missing_key_fails_before_any_request() {
    let server = mock_completions(200, completion("{}"), 0).await;

    let provider = OpenAIProvider::new(CredentialSource::from_map([("OPENAI_API_KEY", "  ")]))
        .with_base_url(server.uri());
    let err = provider.generate(&request()).await.unwrap_err();

    assert!(err.is_not_configured());
}

#[tokio::test]
async fn only_aiml_key_means_only_aiml_available() {
    let unified = UnifiedProvider::from_config(
        &Config::default(),
        &CredentialSource::from_map([("AIML_API_KEY", "k")]),
    );
    assert_eq!(unified.available_providers(), vec![ProviderKind::Aiml]);
}

#[tokio::test]
async fn no_keys_means_no_providers_configured() {
    let unified = UnifiedProvider::from_config(&Config::default(), &CredentialSource::new(|_| None));

    assert!(unified.available_providers().is_empty());
    let err = unified
        .create(&request(), &CreateOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::NoProvidersConfigured));
}

#[tokio::test]
async fn primary_failure_falls_back_and_tags_secondary() {
    let openrouter = mock_completions(503, json!({"error": "unavailable"}), 1).await;
    let openai = mock_completions(200, completion(&component_json().to_string()), 1).await;
    let (openrouter_uri, openai_uri) = (openrouter.uri(), openai.uri());

    let unified = UnifiedProvider::from_config(
        &Config::default(),
        &CredentialSource::from_map([
            ("OPENROUTER_API_KEY", "or"),
            ("OPENROUTER_API_URL", openrouter_uri.as_str()),
            ("OPENAI_API_KEY", "oa"),
            ("OPENAI_API_URL", openai_uri.as_str()),
        ]),
    );

    let generation = unified
        .create_with_fallback(&request(), &CreateOptions::default())
        .await
        .unwrap();

    assert_eq!(generation.provider, ProviderKind::OpenAi);
    assert_eq!(generation.response, component_json());
    assert_eq!(generation.attempts.len(), 1);
    assert_eq!(generation.attempts[0].provider, ProviderKind::OpenRouter);
    assert!(generation.attempts[0].error.contains("503"));
}

#[tokio::test]
async fn every_provider_failing_reports_all_failed() {
    let aiml = mock_completions(500, json!({"error": "boom"}), 1).await;
    let openai = mock_completions(502, json!({"error": "bad gateway"}), 1).await;
    let (aiml_uri, openai_uri) = (aiml.uri(), openai.uri());

    let unified = UnifiedProvider::from_config(
        &Config::default(),
        &CredentialSource::from_map([
            ("AIML_API_KEY", "a"),
            ("AIML_API_URL", aiml_uri.as_str()),
            ("OPENAI_API_KEY", "o"),
            ("OPENAI_API_URL", openai_uri.as_str()),
        ]),
    );

    let err = unified
        .create(&request(), &CreateOptions::default())
        .await
        .unwrap_err();

    match err {
        GenerationError::AllProvidersFailed { attempts, last } => {
            assert_eq!(attempts.len(), 2);
            assert!(matches!(last, LLMError::Api { status: 502, .. }));
        }
        other => panic!("expected AllProvidersFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn pipeline_turns_completion_into_code() {
    let server = mock_completions(200, completion(&component_json().to_string()), 1).await;
    let uri = server.uri();

    let pipeline = ArtifactPipeline::new(UnifiedProvider::from_config(
        &Config::default(),
        &CredentialSource::from_map([("AIML_API_KEY", "k"), ("AIML_API_URL", uri.as_str())]),
    ));

    let artifact = pipeline
        .generate(
            &request().with_framework(Framework::Svelte),
            &CreateOptions::default(),
            &EmitOptions::new().with_component_name("LoginForm"),
        )
        .await
        .unwrap();

    assert_eq!(artifact.provider, ProviderKind::Aiml);
    assert_eq!(artifact.components.len(), 1);
    assert_eq!(artifact.components[0].children.len(), 1);
    assert!(artifact.code.starts_with("<!-- LoginForm.svelte -->"));
    assert!(artifact.code.contains("<button>Sign in</button>"));
    assert!(artifact.code.contains("class=\"login\""));
}
