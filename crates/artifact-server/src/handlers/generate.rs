use actix_web::{web, HttpResponse};
use artifact_codegen::EmitOptions;
use artifact_core::{GenerationRequest, SnapshotKey};
use artifact_llm::{CreateOptions, ProviderKind};
use serde::Deserialize;

use crate::error::Result;
use crate::state::AppState;

/// Body shared by `/generate` and `/generate/stream`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    pub prompt: String,
    #[serde(default)]
    pub framework: Option<String>,
    #[serde(default)]
    pub styling: Option<String>,
    #[serde(default)]
    pub interactivity: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub provider: Option<String>,
    #[serde(flatten)]
    pub emit: EmitOptions,
}

impl GenerateBody {
    /// Validate into typed request and dispatch options.
    pub fn into_parts(self) -> Result<(GenerationRequest, CreateOptions, EmitOptions)> {
        let request = GenerationRequest::from_parts(
            &self.prompt,
            self.framework.as_deref(),
            self.styling.as_deref(),
            self.interactivity.as_deref(),
            self.theme.as_deref(),
        )?;

        let provider = self
            .provider
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::parse::<ProviderKind>)
            .transpose()?;

        Ok((request, CreateOptions { provider }, self.emit))
    }
}

pub async fn handler(
    state: web::Data<AppState>,
    body: web::Json<GenerateBody>,
) -> Result<HttpResponse> {
    let (request, create, emit) = body.into_inner().into_parts()?;
    log::info!(
        "Generate request: framework={}, provider={:?}, prompt={} chars",
        request.framework,
        create.provider,
        request.prompt.chars().count()
    );

    let artifact = state.pipeline.generate(&request, &create, &emit).await?;

    if let Err(e) = state.store.save(SnapshotKey::Canvas, &artifact.components).await {
        log::warn!("Failed to save canvas snapshot: {}", e);
    }

    Ok(HttpResponse::Ok().json(artifact))
}
