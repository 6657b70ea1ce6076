use actix_web::{web, HttpResponse};
use artifact_codegen::{emitter_for, EmitOptions};
use artifact_core::{ComponentNode, Framework};
use serde::Deserialize;

use crate::error::Result;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportBody {
    pub framework: String,
    #[serde(default)]
    pub components: Vec<ComponentNode>,
    #[serde(flatten)]
    pub emit: EmitOptions,
}

pub async fn handler(body: web::Json<ExportBody>) -> Result<HttpResponse> {
    let body = body.into_inner();
    let framework: Framework = body.framework.parse()?;
    let emitter = emitter_for(framework);
    let code = emitter.emit(&body.components, &body.emit);

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "framework": framework,
        "extension": emitter.file_extension(),
        "code": code,
    })))
}
