//! Shared SSE -> [`LLMStream`] adapter.

use eventsource_stream::Eventsource;
use futures_util::StreamExt;
use reqwest::Response;

use crate::provider::{LLMError, LLMStream, Result};

/// Terminal data payload used by OpenAI-compatible streams.
pub const DONE_MARKER: &str = "[DONE]";

fn to_stream_error(err: LLMError) -> LLMError {
    match err {
        LLMError::Stream(msg) => LLMError::Stream(msg),
        other => LLMError::Stream(other.to_string()),
    }
}

/// Convert an SSE HTTP [`Response`] into an [`LLMStream`] of text deltas.
///
/// `handler` receives each event's data payload and returns `Ok(Some(text))`
/// to emit a delta, `Ok(None)` to skip, or an error that ends up as
/// `LLMError::Stream`. The `[DONE]` marker is skipped before the handler sees it.
pub fn llm_stream_from_sse<H>(response: Response, mut handler: H) -> LLMStream
where
    H: FnMut(&str) -> Result<Option<String>> + Send + 'static,
{
    let stream = response
        .bytes_stream()
        .eventsource()
        .map(move |event| {
            let event = event.map_err(|e| LLMError::Stream(e.to_string()))?;
            if event.data.trim() == DONE_MARKER {
                return Ok(None);
            }
            handler(event.data.as_str()).map_err(to_stream_error)
        })
        .filter_map(|result| async move {
            match result {
                Ok(Some(delta)) => Some(Ok(delta)),
                Ok(None) => None,
                Err(err) => Some(Err(err)),
            }
        });

    Box::pin(stream)
}

/// Concatenate every delta; the first error aborts.
pub async fn collect_text(mut stream: LLMStream) -> Result<String> {
    let mut text = String::new();
    while let Some(delta) = stream.next().await {
        text.push_str(&delta?);
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn sse_response(body: &'static str) -> (MockServer, Response) {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sse"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("content-type", "text/event-stream")
                    .set_body_string(body),
            )
            .mount(&mock_server)
            .await;

        let response = reqwest::Client::new()
            .get(format!("{}/sse", mock_server.uri()))
            .send()
            .await
            .expect("response");
        (mock_server, response)
    }

    #[tokio::test]
    async fn skips_none_and_done_marker() {
        let (_server, response) = sse_response(concat!(
            "data: hello\n\n",
            "data: skip\n\n",
            "data: world\n\n",
            "data: [DONE]\n\n",
        ))
        .await;

        let stream = llm_stream_from_sse(response, |data| {
            assert_ne!(data, DONE_MARKER);
            if data == "skip" {
                return Ok(None);
            }
            Ok(Some(data.to_string()))
        });

        assert_eq!(collect_text(stream).await.unwrap(), "helloworld");
    }

    #[tokio::test]
    async fn handler_errors_become_stream_errors() {
        let (_server, response) = sse_response("data: boom\n\n").await;

        let mut stream = llm_stream_from_sse(response, |_data| {
            Err(LLMError::Api {
                provider: crate::provider::ProviderKind::OpenRouter,
                status: 500,
                body: "boom".to_string(),
            })
        });

        let Some(item) = stream.next().await else {
            panic!("expected one stream item");
        };
        match item {
            Err(LLMError::Stream(msg)) => assert!(msg.contains("API error")),
            other => panic!("expected LLMError::Stream, got: {other:?}"),
        }
    }
}
