use actix_web::http::header;
use actix_web::{web, HttpResponse};
use artifact_codegen::generate_code;
use artifact_core::{build_component_tree_from_value, ComponentNode, SnapshotKey};
use artifact_llm::providers::common::openai_compat::parse_json_content;
use artifact_llm::{LLMError, ProviderKind};
use futures::StreamExt;
use serde::Serialize;

use crate::error::Result;
use crate::handlers::generate::GenerateBody;
use crate::state::AppState;

/// Events pushed over the SSE channel.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StreamEvent {
    Token {
        content: String,
    },
    Complete {
        provider: ProviderKind,
        components: Vec<ComponentNode>,
        code: String,
    },
    Error {
        message: String,
    },
}

fn sse_frame(event: &StreamEvent) -> web::Bytes {
    let json = serde_json::to_string(event).unwrap_or_else(|e| {
        format!(r#"{{"type":"error","message":"failed to encode event: {e}"}}"#)
    });
    web::Bytes::from(format!("data: {json}\n\n"))
}

/// Streamed generation through OpenRouter. Tokens are forwarded as they
/// arrive; the tree and code are built once the stream ends.
pub async fn handler(
    state: web::Data<AppState>,
    body: web::Json<GenerateBody>,
) -> Result<HttpResponse> {
    let (request, _create, emit) = body.into_inner().into_parts()?;

    let provider = state
        .provider()
        .provider(ProviderKind::OpenRouter)
        .filter(|p| p.is_configured())
        .ok_or(LLMError::NotConfigured {
            provider: ProviderKind::OpenRouter,
            var: ProviderKind::OpenRouter.api_key_var(),
        })?;

    let mut deltas = provider.generate_stream(&request).await?;
    log::info!("Streaming generation started ({})", request.framework);

    let store = state.store.clone();
    let framework = request.framework;

    let stream = async_stream::stream! {
        let mut text = String::new();
        let mut failure = None;

        while let Some(item) = deltas.next().await {
            match item {
                Ok(delta) => {
                    text.push_str(&delta);
                    yield Ok::<_, actix_web::Error>(sse_frame(&StreamEvent::Token { content: delta }));
                }
                Err(e) => {
                    failure = Some(e.to_string());
                    break;
                }
            }
        }

        let last = match failure {
            Some(message) => StreamEvent::Error { message },
            None => match parse_json_content(ProviderKind::OpenRouter, &text) {
                Ok(value) => {
                    let components = build_component_tree_from_value(&value);
                    let code = generate_code(framework, &components, &emit);
                    if let Err(e) = store.save(SnapshotKey::Canvas, &components).await {
                        log::warn!("Failed to save canvas snapshot: {}", e);
                    }
                    StreamEvent::Complete {
                        provider: ProviderKind::OpenRouter,
                        components,
                        code,
                    }
                }
                Err(e) => StreamEvent::Error { message: e.to_string() },
            },
        };

        if let StreamEvent::Error { message } = &last {
            log::warn!("Streaming generation failed: {}", message);
        }
        yield Ok(sse_frame(&last));
    };

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .append_header((header::CACHE_CONTROL, "no-cache"))
        .streaming(stream))
}
