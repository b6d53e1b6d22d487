//! Shared HTTP building blocks: the response envelope, domain error
//! mapping and the validating JSON extractor.

mod validated_json;

pub use validated_json::{ValidatedJson, ValidatedJsonRejection};

use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{DomainError, ErrorKind};

/// Uniform JSON envelope returned by every endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request succeeded
    pub success: bool,
    /// Payload; `null` on failure
    pub data: Option<T>,
    /// Human readable failure reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine readable failure class
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            error_kind: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::failure(ErrorKind::Validation, message)
    }

    pub fn failure(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            error_kind: Some(kind),
        }
    }
}

/// Error half of every handler's `Result`
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidReadingOrder | ErrorKind::Validation => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::PersistenceFailure => StatusCode::INTERNAL_SERVER_ERROR,
        ErrorKind::StoreUnavailable => StatusCode::SERVICE_UNAVAILABLE,
    }
}

pub fn domain_error(e: DomainError) -> ApiError {
    let kind = e.kind();
    if matches!(
        kind,
        ErrorKind::PersistenceFailure | ErrorKind::StoreUnavailable
    ) {
        tracing::error!(error = %e, kind = %kind, "Request failed");
    }
    (
        status_for(kind),
        Json(ApiResponse::failure(kind, e.to_string())),
    )
}
