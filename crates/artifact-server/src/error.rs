use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use artifact_core::{RequestError, StorageError};
use artifact_llm::{GenerationError, LLMError};
use serde::Serialize;
use thiserror::Error;

pub type Result<T, E = AppError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(#[from] RequestError),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Generation(#[from] GenerationError),

    #[error("{0}")]
    Provider(#[from] LLMError),

    #[error("snapshot '{0}' not found")]
    SnapshotNotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AppError {
    fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidRequest(_) | AppError::BadRequest(_) => "invalid_request_error",
            AppError::Generation(GenerationError::NoProvidersConfigured) => "no_providers_configured",
            AppError::Generation(GenerationError::MalformedOutput { .. }) => "malformed_output",
            AppError::Generation(GenerationError::AllProvidersFailed { .. }) => "upstream_error",
            AppError::Provider(LLMError::UnknownProvider(_)) => "invalid_request_error",
            AppError::Provider(LLMError::NotConfigured { .. }) => "no_providers_configured",
            AppError::Provider(err) if err.is_malformed_output() => "malformed_output",
            AppError::Provider(_) => "upstream_error",
            AppError::SnapshotNotFound(_) | AppError::Storage(StorageError::UnknownKey(_)) => {
                "not_found"
            }
            AppError::Storage(_) => "storage_error",
        }
    }
}

#[derive(Serialize)]
struct JsonError {
    message: String,
    r#type: String,
}

#[derive(Serialize)]
struct JsonErrorWrapper {
    error: JsonError,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Generation(GenerationError::NoProvidersConfigured)
            | AppError::Provider(LLMError::NotConfigured { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Provider(LLMError::UnknownProvider(_)) => StatusCode::BAD_REQUEST,
            AppError::Generation(_) | AppError::Provider(_) => StatusCode::BAD_GATEWAY,
            AppError::SnapshotNotFound(_) | AppError::Storage(StorageError::UnknownKey(_)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        if status_code.is_server_error() {
            log::error!("{}", self);
        }
        let error_response = JsonErrorWrapper {
            error: JsonError {
                message: self.to_string(),
                r#type: self.error_type().to_string(),
            },
        };
        HttpResponse::build(status_code).json(error_response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artifact_llm::ProviderKind;

    #[test]
    fn status_codes_follow_error_class() {
        assert_eq!(
            AppError::InvalidRequest(RequestError::EmptyPrompt).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Generation(GenerationError::NoProvidersConfigured).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Generation(GenerationError::MalformedOutput {
                attempts: vec![],
                last: LLMError::EmptyResponse(ProviderKind::Aiml),
            })
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            AppError::Provider(LLMError::UnknownProvider("x".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Storage(StorageError::UnknownKey("x".into())).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn error_type_distinguishes_malformed_from_upstream() {
        let malformed = AppError::Generation(GenerationError::MalformedOutput {
            attempts: vec![],
            last: LLMError::EmptyResponse(ProviderKind::OpenAi),
        });
        let upstream = AppError::Generation(GenerationError::AllProvidersFailed {
            attempts: vec![],
            last: LLMError::Api {
                provider: ProviderKind::OpenAi,
                status: 500,
                body: String::new(),
            },
        });
        assert_eq!(malformed.error_type(), "malformed_output");
        assert_eq!(upstream.error_type(), "upstream_error");
    }
}
