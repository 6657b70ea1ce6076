//! Prompt → provider → component tree → source code.

use artifact_codegen::{generate_code, EmitOptions};
use artifact_core::{build_component_tree_from_value, ComponentNode, Framework, GenerationRequest};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::provider::{ProviderKind, Usage};
use crate::unified::{CreateOptions, FailedAttempt, GenerationError, UnifiedProvider};

/// One finished generation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    pub provider: ProviderKind,
    pub framework: Framework,
    pub components: Vec<ComponentNode>,
    pub code: String,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_attempts: Vec<FailedAttempt>,
}

#[derive(Clone)]
pub struct ArtifactPipeline {
    provider: UnifiedProvider,
}

impl ArtifactPipeline {
    pub fn new(provider: UnifiedProvider) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &UnifiedProvider {
        &self.provider
    }

    pub async fn generate(
        &self,
        request: &GenerationRequest,
        create: &CreateOptions,
        emit: &EmitOptions,
    ) -> Result<Artifact, GenerationError> {
        let generation = self.provider.create_with_fallback(request, create).await?;

        let components = build_component_tree_from_value(&generation.response);
        let code = generate_code(request.framework, &components, emit);
        log::info!(
            "Generated {} root component(s) as {} via {}",
            components.len(),
            request.framework,
            generation.provider
        );

        Ok(Artifact {
            provider: generation.provider,
            framework: request.framework,
            components,
            code,
            generated_at: Utc::now(),
            usage: generation.usage,
            failed_attempts: generation.attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{ComponentProvider, ProviderOutput, Result as LLMResult};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Arc;

    struct FixedProvider;

    #[async_trait]
    impl ComponentProvider for FixedProvider {
        fn kind(&self) -> ProviderKind {
            ProviderKind::Aiml
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn generate(&self, _request: &GenerationRequest) -> LLMResult<ProviderOutput> {
            Ok(ProviderOutput {
                response: json!({
                    "components": [{"id": "root", "type": "container"}, {"id": "title", "type": "text"}],
                    "layout": {"root": {"children": ["title"]}},
                    "componentDetails": {
                        "root": {"type": "container"},
                        "title": {"type": "text", "content": "Hello World"}
                    }
                }),
                usage: None,
            })
        }
    }

    #[tokio::test]
    async fn chains_dispatch_tree_and_codegen() {
        let pipeline = ArtifactPipeline::new(UnifiedProvider::new(vec![
            Arc::new(FixedProvider) as Arc<dyn ComponentProvider>,
        ]));
        let request = GenerationRequest::new("hello")
            .unwrap()
            .with_framework(Framework::Vue);

        let artifact = pipeline
            .generate(&request, &CreateOptions::default(), &EmitOptions::default())
            .await
            .unwrap();

        assert_eq!(artifact.provider, ProviderKind::Aiml);
        assert_eq!(artifact.framework, Framework::Vue);
        assert_eq!(artifact.components.len(), 1);
        assert_eq!(artifact.components[0].children[0].text_content(), Some("Hello World"));
        assert!(artifact.code.contains("<template>"));
        assert!(artifact.code.contains("Hello World"));

        let json = serde_json::to_value(&artifact).unwrap();
        assert_eq!(json["provider"], "aiml");
        assert!(json.get("generatedAt").is_some());
        assert!(json.get("failedAttempts").is_none());
    }
}
