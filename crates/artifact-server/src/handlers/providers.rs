use actix_web::{web, HttpResponse};
use artifact_llm::PROVIDER_PRIORITY;

use crate::state::AppState;

/// Availability is recomputed on every request.
pub async fn handler(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "available": state.provider().available_providers(),
        "priority": PROVIDER_PRIORITY,
    }))
}
