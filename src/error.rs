use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Response type for health check endpoint
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

/// Response type for unhealthy status
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct UnhealthyResponse {
    pub status: String,
    pub error: String,
}

/// Custom error type for API endpoints
///
/// Every variant renders as a JSON object with a single `error` key and
/// the matching HTTP status code.
#[derive(Debug)]
pub enum ApiError {
    /// Request did not declare a JSON body
    MissingJson,
    /// Body declared as JSON but could not be parsed
    MalformedJson(String),
    /// Body could not be read at all; keeps axum's status (413 over the size limit)
    UnreadableBody(StatusCode, String),
    /// Body parsed but is not a non-empty JSON object
    InvalidData(&'static str),
    /// No document with this id in the collection
    TodoNotFound(String),
    /// Document store operation error
    DatabaseError(anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::MissingJson => (
                StatusCode::BAD_REQUEST,
                "Missing JSON in request".to_string(),
            ),
            ApiError::MalformedJson(detail) => (
                StatusCode::BAD_REQUEST,
                format!("Malformed JSON in request: {}", detail),
            ),
            ApiError::UnreadableBody(status, detail) => (
                status,
                format!("Request body could not be read: {}", detail),
            ),
            ApiError::InvalidData(message) => (StatusCode::BAD_REQUEST, message.to_string()),
            ApiError::TodoNotFound(id) => {
                tracing::debug!("Todo not found: {}", id);
                (StatusCode::NOT_FOUND, "Todo not found".to_string())
            }
            ApiError::DatabaseError(err) => {
                tracing::error!("Document store failure: {:#}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", err),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => ApiError::MissingJson,
            JsonRejection::BytesRejection(rejection) => {
                ApiError::UnreadableBody(rejection.status(), rejection.body_text())
            }
            other => ApiError::MalformedJson(other.body_text()),
        }
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::DatabaseError(err)
    }
}
