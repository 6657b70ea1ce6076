use actix_web::{web, HttpResponse};
use artifact_core::{ComponentNode, SnapshotKey};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::state::AppState;

fn parse_key(path: web::Path<String>) -> Result<SnapshotKey> {
    Ok(path.into_inner().parse()?)
}

pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let key = parse_key(path)?;
    match state.store.load::<Value>(key).await? {
        Some(value) => Ok(HttpResponse::Ok().json(value)),
        None => Err(AppError::SnapshotNotFound(key.to_string())),
    }
}

/// The canvas must be a component forest; the other keys take any JSON object.
pub async fn put(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> Result<HttpResponse> {
    let key = parse_key(path)?;
    let value = body.into_inner();

    match key {
        SnapshotKey::Canvas => {
            let forest: Vec<ComponentNode> = serde_json::from_value(value)
                .map_err(|e| AppError::BadRequest(format!("canvas must be a component list: {e}")))?;
            state.store.save(key, &forest).await?;
        }
        SnapshotKey::AppState | SnapshotKey::ApiData => {
            if !value.is_object() {
                return Err(AppError::BadRequest(format!("{key} must be a JSON object")));
            }
            state.store.save(key, &value).await?;
        }
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({ "saved": key.as_str() })))
}

pub async fn delete(state: web::Data<AppState>, path: web::Path<String>) -> Result<HttpResponse> {
    let key = parse_key(path)?;
    let deleted = state.store.delete(key).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "deleted": deleted })))
}
